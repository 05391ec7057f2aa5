#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CENTER_X, DEFAULT_CENTER_Y, DEFAULT_SCALE};

/// A pointer position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScreenPos {
    pub x: i32,
    pub y: i32,
}

impl ScreenPos {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Sub for ScreenPos {
    type Output = PixelOffset;

    /// Saturates at the `i32` range for far-apart positions.
    fn sub(self, rhs: Self) -> PixelOffset {
        PixelOffset::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// On-screen displacement of the raster relative to its natural position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelOffset {
    pub dx: i32,
    pub dy: i32,
}

impl PixelOffset {
    #[must_use]
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

impl Add for PixelOffset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.dx.saturating_add(rhs.dx), self.dy.saturating_add(rhs.dy))
    }
}

impl AddAssign for PixelOffset {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Live viewport dimensions in pixels. Either side may be zero while the
/// host window is minimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the viewport has no drawable area.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Logical view into fractal space.
///
/// `center_x` / `center_y` are fractal coordinates of the viewport center.
/// `scale` is fractal units per pixel, so a smaller scale shows less of the
/// plane in more detail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub center_x: f64,
    pub center_y: f64,
    pub scale: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { center_x: DEFAULT_CENTER_X, center_y: DEFAULT_CENTER_Y, scale: DEFAULT_SCALE }
    }
}

impl ViewState {
    #[must_use]
    pub fn new(center_x: f64, center_y: f64, scale: f64) -> Self {
        Self { center_x, center_y, scale }
    }

    /// Multiply the scale by `factor`. No bounds are enforced here.
    pub fn zoom(&mut self, factor: f64) {
        self.scale *= factor;
    }

    /// Move the center by a pixel delta, converted at the current scale.
    pub fn scroll(&mut self, dx: i32, dy: i32) {
        self.center_x += self.pixels_to_fractal(f64::from(dx));
        self.center_y += self.pixels_to_fractal(f64::from(dy));
    }

    /// Convert a pixel distance to a fractal-space distance at the current scale.
    #[must_use]
    pub fn pixels_to_fractal(&self, pixels: f64) -> f64 {
        pixels * self.scale
    }
}
