//! Input model: buttons, keys, wheel mapping, and the gesture state machine.
//!
//! The host window system delivers raw events; this module defines the
//! shapes the coordinator consumes. `Key::command` and [`wheel_zoom_factor`]
//! translate discrete input into view commands. `InputState` tracks the
//! gestures in progress between their start and terminal events: a primary
//! button drag and a pinch whose scale is accumulated until it ends.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::{SCROLL_STEP, WHEEL_DEGREES_PER_STEP, WHEEL_UNITS_PER_DEGREE, ZOOM_IN_FACTOR};
use crate::view::ScreenPos;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger press). The only button that drags.
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Discrete navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// `+`
    ZoomIn,
    /// `-`
    ZoomOut,
    Left,
    Right,
    Up,
    Down,
}

/// A view change expressed in coordinator terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Multiply the scale by the factor.
    Zoom(f64),
    /// Shift the center by a pixel delta.
    Scroll(i32, i32),
}

impl Key {
    /// The view command bound to this key with the default steps.
    #[must_use]
    pub fn command(self) -> Command {
        self.command_with(ZOOM_IN_FACTOR, SCROLL_STEP)
    }

    /// The view command bound to this key for a given zoom-in factor and scroll step.
    /// Zooming out uses the reciprocal of `zoom_in`.
    #[must_use]
    pub fn command_with(self, zoom_in: f64, step: i32) -> Command {
        match self {
            Self::ZoomIn => Command::Zoom(zoom_in),
            Self::ZoomOut => Command::Zoom(1.0 / zoom_in),
            Self::Left => Command::Scroll(-step, 0),
            Self::Right => Command::Scroll(step, 0),
            Self::Down => Command::Scroll(0, -step),
            Self::Up => Command::Scroll(0, step),
        }
    }
}

/// Zoom factor for a wheel rotation of `delta_degrees`.
///
/// One 15° notch forward zooms in by one key step; backward zooms out.
#[must_use]
pub fn wheel_zoom_factor(delta_degrees: f64) -> f64 {
    ZOOM_IN_FACTOR.powf(delta_degrees / WHEEL_DEGREES_PER_STEP)
}

/// Convert a raw wheel delta in eighths of a degree to degrees.
#[must_use]
pub fn wheel_degrees_from_delta(raw: i32) -> f64 {
    f64::from(raw) / WHEEL_UNITS_PER_DEGREE
}

/// Lifecycle phase of a continuous gesture update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Started,
    Updated,
    /// Terminal: commit what was accumulated.
    Finished,
    /// Terminal: discard what was accumulated.
    Canceled,
}

impl GesturePhase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Canceled)
    }
}

/// Present only while a primary-button drag is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    /// Pointer position at the previous drag event, used to compute the next delta.
    pub last_pos: ScreenPos,
}

/// Running scale multiplier for an in-progress pinch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchState {
    pub accumulated: f64,
}

impl Default for PinchState {
    fn default() -> Self {
        Self { accumulated: 1.0 }
    }
}

/// Sub-pixel remainder of a two-finger pan, carried between updates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanState {
    pub residual_x: f64,
    pub residual_y: f64,
}

impl PanState {
    /// Add a delta and split off the whole pixels, keeping the fraction.
    pub fn take_whole(&mut self, dx: f64, dy: f64) -> (f64, f64) {
        let (x, y) = (self.residual_x + dx, self.residual_y + dy);
        let whole = (x.round(), y.round());
        self.residual_x = x - whole.0;
        self.residual_y = y - whole.1;
        whole
    }
}

/// Gestures in progress. All are `None` when the pointer is idle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub drag: Option<DragState>,
    pub pinch: Option<PinchState>,
    pub pan: Option<PanState>,
}

impl InputState {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Multiplier to apply to the logical scale for display while a pinch is live.
    #[must_use]
    pub fn pending_zoom(&self) -> f64 {
        self.pinch.map_or(1.0, |p| p.accumulated)
    }
}
