//! View coordinator: the state machine between input and the render worker.
//!
//! DESIGN
//! ======
//! `CoordinatorCore` owns the logical view, the last adopted raster, the
//! pixel offset, and in-progress gestures. It is driven strictly
//! sequentially by the host's interactive loop and never talks to the worker
//! directly: every operation returns the [`Action`]s the host must carry out.
//! `Action::Render` submissions supersede one another in the worker's
//! single-slot mailbox, so issuing one per state change is cheap.
//!
//! DRAG SUPPRESSION
//! ================
//! While a primary-button drag is active, worker deliveries are dropped. The
//! raster under the pointer must not jump; the drag issues its own request
//! on release, and that request's delivery is adopted normally.

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod coordinator_test;

use std::sync::Arc;

use tracing::{debug, trace};

use crate::consts::{SCROLL_STEP, ZOOM_IN_FACTOR};
use crate::input::{
    Button, Command, DragState, GesturePhase, InputState, Key, PanState, PinchState, wheel_zoom_factor,
};
use crate::present::{Drawable, compose};
use crate::raster::{Image, RasterSnapshot, RenderRequest};
use crate::view::{PixelOffset, ScreenPos, ViewState, ViewportSize};

/// Side effects returned from coordinator operations for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Submit this request to the computation worker.
    Render(RenderRequest),
    /// Call [`CoordinatorCore::present`] and show the result.
    Redraw,
}

/// Coarse presentation mode, derived from state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No raster adopted yet; presentation shows a placeholder.
    AwaitingFirstRender,
    /// A raster is shown and no drag is active.
    IdleDisplaying,
    /// A primary-button drag is moving the raster.
    Dragging,
}

/// Tunables for a coordinator instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorConfig {
    /// View shown before any input.
    pub initial: ViewState,
    /// Scale multiplier for one zoom-in key press.
    pub zoom_in_factor: f64,
    /// Pixels per arrow-key press.
    pub scroll_step: i32,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self { initial: ViewState::default(), zoom_in_factor: ZOOM_IN_FACTOR, scroll_step: SCROLL_STEP }
    }
}

/// Viewport state and the rules for changing it.
///
/// One instance per viewport; the embedding host owns it and drops it with
/// the viewport.
#[derive(Debug, Clone)]
pub struct CoordinatorCore {
    config: CoordinatorConfig,
    view: ViewState,
    snapshot: Option<RasterSnapshot>,
    offset: PixelOffset,
    input: InputState,
    viewport: ViewportSize,
}

impl Default for CoordinatorCore {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}

impl CoordinatorCore {
    #[must_use]
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            view: config.initial,
            snapshot: None,
            offset: PixelOffset::default(),
            input: InputState::default(),
            viewport: ViewportSize::default(),
        }
    }

    // --- View commands ---

    /// Multiply the scale by `factor` (< 1 zooms in) and request a render.
    ///
    /// `zoom(1.0)` still requests a render.
    pub fn zoom(&mut self, factor: f64) -> Vec<Action> {
        self.view.zoom(factor);
        self.changed()
    }

    /// Shift the center by a pixel delta at the current scale and request a render.
    pub fn scroll(&mut self, dx: i32, dy: i32) -> Vec<Action> {
        self.view.scroll(dx, dy);
        self.changed()
    }

    /// Apply a view command.
    pub fn apply(&mut self, command: Command) -> Vec<Action> {
        match command {
            Command::Zoom(factor) => self.zoom(factor),
            Command::Scroll(dx, dy) => self.scroll(dx, dy),
        }
    }

    // --- Discrete input ---

    pub fn handle_key(&mut self, key: Key) -> Vec<Action> {
        let command = key.command_with(self.config.zoom_in_factor, self.config.scroll_step);
        self.apply(command)
    }

    /// Zoom by `0.8 ^ (delta_degrees / 15)`.
    pub fn handle_wheel(&mut self, delta_degrees: f64) -> Vec<Action> {
        self.zoom(wheel_zoom_factor(delta_degrees))
    }

    // --- Pointer drag ---

    /// Begin a drag on primary-button press. Other buttons are ignored.
    pub fn handle_pointer_down(&mut self, pos: ScreenPos, button: Button) -> Vec<Action> {
        if button == Button::Primary {
            self.input.drag = Some(DragState { last_pos: pos });
        }
        Vec::new()
    }

    /// Slide the current raster with the pointer. No render is requested.
    pub fn handle_pointer_move(&mut self, pos: ScreenPos) -> Vec<Action> {
        let Some(drag) = self.input.drag.as_mut() else {
            return Vec::new();
        };
        self.offset += pos - drag.last_pos;
        drag.last_pos = pos;
        vec![Action::Redraw]
    }

    /// Finish a drag: fold the accumulated offset into one scroll.
    ///
    /// The delta is `(viewport - raster) / 2 - offset` per axis, which
    /// re-centers the raster under the new logical center. When no raster
    /// exists yet the viewport size stands in for it.
    pub fn handle_pointer_up(&mut self, pos: ScreenPos, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let Some(drag) = self.input.drag.take() else {
            return Vec::new();
        };
        self.offset += pos - drag.last_pos;

        let raster = self.snapshot.as_ref().map_or(self.viewport, RasterSnapshot::size);
        let dx = centering_delta(self.viewport.width, raster.width, self.offset.dx);
        let dy = centering_delta(self.viewport.height, raster.height, self.offset.dy);
        self.scroll(dx, dy)
    }

    // --- Gestures ---

    /// Two-finger pan: each update scrolls by the whole pixels accumulated so
    /// far, including the terminal one. The sub-pixel remainder carries to the
    /// next update and is dropped when the gesture ends. A canceled gesture
    /// only redraws.
    pub fn handle_gesture_pan(&mut self, dx: f64, dy: f64, phase: GesturePhase) -> Vec<Action> {
        if phase == GesturePhase::Canceled {
            self.input.pan = None;
            return vec![Action::Redraw];
        }
        let (wx, wy) = self.input.pan.get_or_insert_with(PanState::default).take_whole(dx, dy);
        if phase.is_terminal() {
            self.input.pan = None;
        }
        let (wx, wy) = (round_pixels(wx), round_pixels(wy));
        if wx == 0 && wy == 0 {
            return vec![Action::Redraw];
        }
        self.scroll(wx, wy)
    }

    /// Pinch: accumulate step factors and zoom once when the gesture finishes.
    ///
    /// Intermediate updates only redraw; the display scale includes the
    /// running factor so the affine approximation tracks the fingers.
    pub fn handle_gesture_pinch(&mut self, step: f64, phase: GesturePhase) -> Vec<Action> {
        if phase == GesturePhase::Canceled {
            self.input.pinch = None;
            return vec![Action::Redraw];
        }
        let pinch = self.input.pinch.get_or_insert_with(PinchState::default);
        pinch.accumulated *= step;
        if !phase.is_terminal() {
            return vec![Action::Redraw];
        }
        let factor = pinch.accumulated;
        self.input.pinch = None;
        self.zoom(factor)
    }

    // --- Worker delivery ---

    /// Adopt a completed render unless a drag is active.
    ///
    /// A delivery whose scale or size no longer matches the view is adopted
    /// all the same; [`present`](Self::present) bridges the gap.
    pub fn on_worker_delivery(&mut self, image: Image, scale: f64) -> Vec<Action> {
        if self.input.is_dragging() {
            debug!(width = image.width(), height = image.height(), scale, "delivery dropped during drag");
            return Vec::new();
        }
        trace!(width = image.width(), height = image.height(), scale, "delivery adopted");
        self.snapshot = Some(RasterSnapshot::new(Arc::new(image), scale));
        self.offset = PixelOffset::default();
        self.input.drag = None;
        vec![Action::Redraw]
    }

    // --- Viewport ---

    /// Track the new size and request a render at it. A zero-area viewport
    /// requests nothing.
    pub fn on_resize(&mut self, size: ViewportSize) -> Vec<Action> {
        self.viewport = size;
        if size.is_empty() {
            debug!(width = size.width, height = size.height, "viewport has no area; render skipped");
            return Vec::new();
        }
        self.changed()
    }

    // --- Presentation ---

    /// What to draw right now.
    #[must_use]
    pub fn present(&self) -> Drawable {
        compose(self.snapshot.as_ref(), self.offset, self.display_scale(), self.viewport)
    }

    // --- Queries ---

    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.input.is_dragging() {
            Mode::Dragging
        } else if self.snapshot.is_none() {
            Mode::AwaitingFirstRender
        } else {
            Mode::IdleDisplaying
        }
    }

    #[must_use]
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Scale the user is looking at, including an unfinished pinch.
    #[must_use]
    pub fn display_scale(&self) -> f64 {
        self.view.scale * self.input.pending_zoom()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&RasterSnapshot> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub fn offset(&self) -> PixelOffset {
        self.offset
    }

    #[must_use]
    pub fn input(&self) -> InputState {
        self.input
    }

    #[must_use]
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// The request that would be submitted for the current state, if the
    /// viewport has any area.
    #[must_use]
    pub fn current_request(&self) -> Option<RenderRequest> {
        if self.viewport.is_empty() {
            return None;
        }
        Some(RenderRequest::new(self.view, self.viewport))
    }

    fn changed(&self) -> Vec<Action> {
        let mut actions = vec![Action::Redraw];
        actions.extend(self.current_request().map(Action::Render));
        actions
    }
}

fn centering_delta(viewport: u32, raster: u32, offset: i32) -> i32 {
    let slack = (i64::from(viewport) - i64::from(raster)) / 2 - i64::from(offset);
    clamp_to_i32(slack)
}

#[allow(clippy::cast_possible_truncation)]
fn clamp_to_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[allow(clippy::cast_possible_truncation)]
fn round_pixels(v: f64) -> i32 {
    // `as` saturates and maps NaN to zero.
    v.round() as i32
}
