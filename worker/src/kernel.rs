//! Per-pixel fractal computation.
//!
//! The worker only depends on the [`Kernel`] trait. [`EscapeTime`] is the
//! stock Mandelbrot kernel: plain `f64` escape-time iteration with a smooth
//! palette. It checks the cancellation callback once per row so a superseded
//! render stops within one row of work.

#[cfg(test)]
#[path = "kernel_test.rs"]
mod kernel_test;

use tracing::error;
use viewport::raster::{Image, RenderRequest};

/// Opaque black, used for points that never escape.
pub const INSIDE_COLOR: u32 = 0xFF00_0000;

pub const DEFAULT_MAX_ITERATIONS: u32 = 512;

/// Squared escape radius.
const BAILOUT_SQUARED: f64 = 4.0;

/// Computes a raster for a request.
pub trait Kernel: Send + Sync + 'static {
    /// Render `request`, polling `cancelled` periodically.
    ///
    /// Returns `None` if the render was abandoned. Zero width or height is
    /// treated as one pixel.
    fn render(&self, request: &RenderRequest, cancelled: &dyn Fn() -> bool) -> Option<Image>;
}

/// Escape-time Mandelbrot kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeTime {
    pub max_iterations: u32,
}

impl Default for EscapeTime {
    fn default() -> Self {
        Self { max_iterations: DEFAULT_MAX_ITERATIONS }
    }
}

impl EscapeTime {
    #[must_use]
    pub fn new(max_iterations: u32) -> Self {
        Self { max_iterations: max_iterations.max(1) }
    }

    /// Iterations before `c = (cx, cy)` escapes, or `None` if it never does.
    #[must_use]
    pub fn escape(&self, cx: f64, cy: f64) -> Option<u32> {
        let (mut x, mut y) = (0.0_f64, 0.0_f64);
        for i in 0..self.max_iterations {
            let (x2, y2) = (x * x, y * y);
            if x2 + y2 > BAILOUT_SQUARED {
                return Some(i);
            }
            y = 2.0 * x * y + cy;
            x = x2 - y2 + cx;
        }
        None
    }

    /// Color for a pixel given its escape count.
    #[must_use]
    pub fn color(&self, escape: Option<u32>) -> u32 {
        escape.map_or(INSIDE_COLOR, |n| palette(f64::from(n) / f64::from(self.max_iterations)))
    }
}

impl Kernel for EscapeTime {
    fn render(&self, request: &RenderRequest, cancelled: &dyn Fn() -> bool) -> Option<Image> {
        let width = request.width.max(1);
        let height = request.height.max(1);
        let half_w = f64::from(width / 2);
        let half_h = f64::from(height / 2);

        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for py in 0..height {
            if cancelled() {
                return None;
            }
            let cy = request.center_y + (f64::from(py) - half_h) * request.scale;
            for px in 0..width {
                let cx = request.center_x + (f64::from(px) - half_w) * request.scale;
                pixels.push(self.color(self.escape(cx, cy)));
            }
        }

        match Image::from_pixels(width, height, pixels) {
            Ok(image) => Some(image),
            Err(e) => {
                error!(error = %e, "kernel produced a malformed raster");
                None
            }
        }
    }
}

/// Map `t` in `[0, 1]` to an opaque color along a cosine gradient.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn palette(t: f64) -> u32 {
    let t = t.clamp(0.0, 1.0).sqrt();
    let channel = |phase: f64| -> u32 {
        let v = 0.5 + 0.5 * (std::f64::consts::TAU * (t + phase)).cos();
        (v * 255.0).round() as u32
    };
    0xFF00_0000 | (channel(0.0) << 16) | (channel(0.33) << 8) | channel(0.67)
}
