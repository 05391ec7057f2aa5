//! Presentation: decide what to draw for the current state.
//!
//! This module never touches a real surface. [`compose`] reads the current
//! snapshot, pixel offset, and scales and returns a [`Drawable`] describing
//! where and how large the stale raster should appear. A compositor blits
//! `placement.exposed` (raster pixels) into the rectangle it maps to.
//!
//! When the logical scale differs from the scale the raster was captured at,
//! the raster is scaled by `captured / current` about its own midpoint. This
//! is exact for a pure zoom about the center; panning since capture rides on
//! the pixel offset and is only approximated.

#[cfg(test)]
#[path = "present_test.rs"]
mod present_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::consts::PLACEHOLDER_TEXT;
use crate::raster::{Image, RasterSnapshot};
use crate::view::{PixelOffset, ViewportSize};

/// Axis-aligned rectangle in floating-point pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Grow by `d` on every side.
    #[must_use]
    pub fn inflate(&self, d: f64) -> Self {
        Self::new(self.x - d, self.y - d, self.width + 2.0 * d, self.height + 2.0 * d)
    }

    /// Overlap of two rectangles; zero-sized when they do not meet.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Self::new(x, y, (right - x).max(0.0), (bottom - y).max(0.0))
    }
}

/// Where a raster lands in the viewport.
///
/// `(x, y)` is the top-left of the scaled raster in viewport pixels and
/// `scale_factor` multiplies raster pixels into viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub scale_factor: f64,
    /// Raster-space region that is visible, widened by one pixel for filtering.
    pub exposed: Rect,
}

impl Placement {
    /// Viewport rectangle covered by a raster of `size` under this placement.
    #[must_use]
    pub fn target(&self, size: ViewportSize) -> Rect {
        Rect::new(
            self.x,
            self.y,
            f64::from(size.width) * self.scale_factor,
            f64::from(size.height) * self.scale_factor,
        )
    }
}

/// The single thing handed to the presentation surface per redraw.
#[derive(Debug, Clone)]
pub enum Drawable {
    /// Zero-area viewport or an unusable scale; draw nothing.
    Empty,
    /// No raster has been adopted yet.
    Placeholder { text: &'static str, size: ViewportSize },
    /// Draw `image` under `placement` over a black background.
    Raster { image: Arc<Image>, placement: Placement },
}

/// Compose the drawable for the current coordinator state.
///
/// `display_scale` is the scale the user is looking at right now, which may
/// include an unfinished pinch.
#[must_use]
pub fn compose(
    snapshot: Option<&RasterSnapshot>,
    offset: PixelOffset,
    display_scale: f64,
    viewport: ViewportSize,
) -> Drawable {
    if viewport.is_empty() {
        return Drawable::Empty;
    }
    let Some(snapshot) = snapshot else {
        return Drawable::Placeholder { text: PLACEHOLDER_TEXT, size: viewport };
    };

    let raster = snapshot.size();
    let (ox, oy) = (f64::from(offset.dx), f64::from(offset.dy));

    #[allow(clippy::float_cmp)]
    let placement = if snapshot.captured_scale() == display_scale {
        Placement { x: ox, y: oy, scale_factor: 1.0, exposed: exposed_rect(ox, oy, 1.0, raster, viewport) }
    } else {
        let scale_factor = snapshot.captured_scale() / display_scale;
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Drawable::Empty;
        }
        let (rw, rh) = (f64::from(raster.width), f64::from(raster.height));
        let x = ox + (rw - rw * scale_factor) / 2.0;
        let y = oy + (rh - rh * scale_factor) / 2.0;
        Placement { x, y, scale_factor, exposed: exposed_rect(x, y, scale_factor, raster, viewport) }
    };

    Drawable::Raster { image: Arc::clone(snapshot.image()), placement }
}

/// Map the viewport back into raster space and clip to the raster.
fn exposed_rect(x: f64, y: f64, scale_factor: f64, raster: ViewportSize, viewport: ViewportSize) -> Rect {
    let in_raster = Rect::new(
        -x / scale_factor,
        -y / scale_factor,
        f64::from(viewport.width) / scale_factor,
        f64::from(viewport.height) / scale_factor,
    )
    .inflate(1.0);
    let bounds = Rect::new(0.0, 0.0, f64::from(raster.width), f64::from(raster.height));
    in_raster.intersect(&bounds)
}
