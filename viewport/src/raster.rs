//! Completed images and the requests that produce them.
//!
//! A [`RenderRequest`] goes out to the computation worker; an [`Image`] plus
//! the request's scale comes back. Once the coordinator adopts a delivery it
//! wraps it in a [`RasterSnapshot`], which is never mutated again: the next
//! delivery replaces it wholesale.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::view::{ViewState, ViewportSize};

/// Error returned when constructing an [`Image`] from raw pixels.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RasterError {
    /// The pixel buffer length does not equal `width * height`.
    #[error("pixel buffer holds {actual} pixels, expected {expected} for {width}x{height}")]
    SizeMismatch { width: u32, height: u32, expected: usize, actual: usize },
}

/// A rendered raster in row-major `0xAARRGGBB` pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Image {
    /// Build an image from a pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::SizeMismatch`] if `pixels.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, RasterError> {
        let expected = pixel_count(width, height);
        if pixels.len() != expected {
            return Err(RasterError::SizeMismatch { width, height, expected, actual: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    /// An image with every pixel set to `color`.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        Self { width, height, pixels: vec![color; pixel_count(width, height)] }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn size(&self) -> ViewportSize {
        ViewportSize::new(self.width, self.height)
    }

    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// The most recently adopted raster and the scale it was rendered at.
#[derive(Debug, Clone)]
pub struct RasterSnapshot {
    image: Arc<Image>,
    captured_scale: f64,
}

impl RasterSnapshot {
    #[must_use]
    pub fn new(image: Arc<Image>, captured_scale: f64) -> Self {
        Self { image, captured_scale }
    }

    #[must_use]
    pub fn image(&self) -> &Arc<Image> {
        &self.image
    }

    #[must_use]
    pub fn captured_scale(&self) -> f64 {
        self.captured_scale
    }

    #[must_use]
    pub fn size(&self) -> ViewportSize {
        self.image.size()
    }
}

/// Parameters for one fractal render. Immutable once submitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub center_x: f64,
    pub center_y: f64,
    pub scale: f64,
    pub width: u32,
    pub height: u32,
}

impl RenderRequest {
    #[must_use]
    pub fn new(view: ViewState, size: ViewportSize) -> Self {
        Self {
            center_x: view.center_x,
            center_y: view.center_y,
            scale: view.scale,
            width: size.width,
            height: size.height,
        }
    }

    #[must_use]
    pub fn size(&self) -> ViewportSize {
        ViewportSize::new(self.width, self.height)
    }
}
