#![allow(clippy::float_cmp)]

use viewport::consts::PLACEHOLDER_TEXT;
use viewport::input::GesturePhase;
use viewport::raster::Image;

use super::*;

fn core_with_viewport(width: u32, height: u32) -> CoordinatorCore {
    let mut core = CoordinatorCore::default();
    let _ = core.on_resize(ViewportSize::new(width, height));
    core
}

#[test]
fn capture_before_first_render_is_placeholder() {
    let report = PresentReport::capture(&core_with_viewport(100, 80));
    assert_eq!(report.mode, "awaiting_first_render");
    assert_eq!(report.frame, Frame::Placeholder { text: PLACEHOLDER_TEXT });
    assert_eq!(report.viewport, ViewportSize::new(100, 80));
}

#[test]
fn capture_empty_viewport_is_empty_frame() {
    let report = PresentReport::capture(&CoordinatorCore::default());
    assert_eq!(report.frame, Frame::Empty);
}

#[test]
fn capture_after_delivery_reports_raster() {
    let mut core = core_with_viewport(10, 10);
    let scale = core.view().scale;
    let _ = core.on_worker_delivery(Image::filled(10, 10, 0xFF00_0000), scale);

    let report = PresentReport::capture(&core);
    assert_eq!(report.mode, "idle");
    let Frame::Raster { raster, placement, target } = report.frame else {
        panic!("expected raster frame, got {:?}", report.frame);
    };
    assert_eq!(raster, ViewportSize::new(10, 10));
    assert_eq!(placement.scale_factor, 1.0);
    assert_eq!((placement.x, placement.y), (0.0, 0.0));
    assert_eq!(target, Rect::new(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn raster_target_follows_zoom_preview() {
    let mut core = core_with_viewport(10, 10);
    let scale = core.view().scale;
    let _ = core.on_worker_delivery(Image::filled(10, 10, 0xFF00_0000), scale);
    let _ = core.handle_gesture_pinch(0.5, GesturePhase::Started);

    let Frame::Raster { placement, target, .. } = PresentReport::capture(&core).frame else {
        panic!("expected raster frame");
    };
    assert_eq!(placement.scale_factor, 2.0);
    assert_eq!((target.width, target.height), (20.0, 20.0));
    assert_eq!((target.x, target.y), (placement.x, placement.y));
}

#[test]
fn frame_serializes_with_kind_tag() {
    let json = serde_json::to_value(Frame::Placeholder { text: PLACEHOLDER_TEXT }).unwrap();
    assert_eq!(json["kind"], "placeholder");
    assert_eq!(json["text"], PLACEHOLDER_TEXT);
    assert_eq!(serde_json::to_value(Frame::Empty).unwrap()["kind"], "empty");
}

#[test]
fn json_lines_writes_one_object_per_report() {
    let core = core_with_viewport(4, 3);
    let mut buf: Vec<u8> = Vec::new();
    let mut sink = JsonLines::new(&mut buf);
    sink.show(PresentReport::capture(&core));
    sink.show(PresentReport::capture(&core));
    drop(sink);

    let out = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["mode"], "awaiting_first_render");
    assert_eq!(first["viewport"]["width"], 4);
    assert_eq!(first["frame"]["kind"], "placeholder");
}

#[test]
fn vec_surface_collects_reports() {
    let mut reports: Vec<PresentReport> = Vec::new();
    reports.show(PresentReport::capture(&CoordinatorCore::default()));
    assert_eq!(reports.len(), 1);
}
