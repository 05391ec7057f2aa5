//! Presentation reports.
//!
//! The host has no window, so each redraw is recorded as a [`PresentReport`]
//! describing what a compositor would draw. [`JsonLines`] writes them to
//! stdout, one JSON object per line.

#[cfg(test)]
#[path = "report_test.rs"]
mod report_test;

use std::io::Write;

use serde::Serialize;
use tracing::{error, warn};
use viewport::coordinator::{CoordinatorCore, Mode};
use viewport::present::{Drawable, Placement, Rect};
use viewport::view::{PixelOffset, ViewState, ViewportSize};

/// What one redraw shows, plus the state behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentReport {
    pub mode: &'static str,
    pub view: ViewState,
    pub display_scale: f64,
    pub offset: PixelOffset,
    pub viewport: ViewportSize,
    pub frame: Frame,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frame {
    Empty,
    Placeholder { text: &'static str },
    /// `target` is the viewport rectangle the scaled raster covers.
    Raster { raster: ViewportSize, placement: Placement, target: Rect },
}

impl PresentReport {
    #[must_use]
    pub fn capture(core: &CoordinatorCore) -> Self {
        let frame = match core.present() {
            Drawable::Empty => Frame::Empty,
            Drawable::Placeholder { text, .. } => Frame::Placeholder { text },
            Drawable::Raster { image, placement } => {
                Frame::Raster { raster: image.size(), target: placement.target(image.size()), placement }
            }
        };
        Self {
            mode: mode_name(core.mode()),
            view: core.view(),
            display_scale: core.display_scale(),
            offset: core.offset(),
            viewport: core.viewport(),
            frame,
        }
    }
}

fn mode_name(mode: Mode) -> &'static str {
    match mode {
        Mode::AwaitingFirstRender => "awaiting_first_render",
        Mode::IdleDisplaying => "idle",
        Mode::Dragging => "dragging",
    }
}

/// Where presentation reports go.
pub trait Surface {
    fn show(&mut self, report: PresentReport);
}

impl Surface for Vec<PresentReport> {
    fn show(&mut self, report: PresentReport) {
        self.push(report);
    }
}

/// Writes each report as a JSON line.
pub struct JsonLines<W> {
    out: W,
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Surface for JsonLines<W> {
    fn show(&mut self, report: PresentReport) {
        let line = match serde_json::to_string(&report) {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "failed to serialize presentation report");
                return;
            }
        };
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            warn!(error = %e, "failed to write presentation report");
        }
    }
}
