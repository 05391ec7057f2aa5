#![allow(clippy::float_cmp)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use viewport::view::{ViewState, ViewportSize};

use super::*;

const WAIT: Duration = Duration::from_secs(5);

fn request(scale: f64, width: u32, height: u32) -> RenderRequest {
    RenderRequest::new(ViewState::new(0.0, 0.0, scale), ViewportSize::new(width, height))
}

/// Fills the raster with one color and counts calls.
#[derive(Default)]
struct Solid {
    renders: Arc<AtomicUsize>,
}

impl Kernel for Solid {
    fn render(&self, request: &RenderRequest, cancelled: &dyn Fn() -> bool) -> Option<Image> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        if cancelled() {
            return None;
        }
        Some(Image::filled(request.width.max(1), request.height.max(1), 0xFF12_3456))
    }
}

/// Blocks until released or cancelled.
#[derive(Default)]
struct Gated {
    started: Arc<AtomicUsize>,
    release: Arc<AtomicBool>,
}

impl Kernel for Gated {
    fn render(&self, request: &RenderRequest, cancelled: &dyn Fn() -> bool) -> Option<Image> {
        self.started.fetch_add(1, Ordering::SeqCst);
        loop {
            if cancelled() {
                return None;
            }
            if self.release.load(Ordering::SeqCst) {
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        Some(Image::filled(request.width.max(1), request.height.max(1), 0xFF00_00FF))
    }
}

async fn wait_for_starts(started: &AtomicUsize, n: usize) {
    tokio::time::timeout(WAIT, async {
        while started.load(Ordering::SeqCst) < n {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("kernel never started");
}

async fn assert_no_delivery(rx: &mut mpsc::Receiver<Delivery>) {
    let extra = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
    assert!(extra.is_err(), "unexpected extra delivery");
}

// =============================================================================
// delivery
// =============================================================================

#[tokio::test]
async fn delivers_single_request() {
    let (handle, mut rx) = spawn_render_worker(Solid::default(), WorkerConfig::default());
    handle.submit(request(0.25, 6, 4));

    let delivery = tokio::time::timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(delivery.scale, 0.25);
    assert_eq!(delivery.generation, 1);
    assert_eq!((delivery.image.width(), delivery.image.height()), (6, 4));

    handle.shutdown().await;
}

#[tokio::test]
async fn burst_before_worker_runs_renders_only_latest() {
    let kernel = Solid::default();
    let renders = Arc::clone(&kernel.renders);
    let (handle, mut rx) = spawn_render_worker(kernel, WorkerConfig::default());

    handle.submit(request(1.0, 4, 4));
    handle.submit(request(0.8, 4, 4));
    handle.submit(request(0.64, 4, 4));

    let delivery = tokio::time::timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(delivery.scale, 0.64);
    assert_eq!(delivery.generation, 3);
    assert_no_delivery(&mut rx).await;
    assert_eq!(renders.load(Ordering::SeqCst), 1);

    handle.shutdown().await;
}

#[tokio::test]
async fn superseded_render_is_never_delivered() {
    let kernel = Gated::default();
    let started = Arc::clone(&kernel.started);
    let release = Arc::clone(&kernel.release);
    let (handle, mut rx) = spawn_render_worker(kernel, WorkerConfig::default());

    handle.submit(request(1.0, 8, 8));
    wait_for_starts(&started, 1).await;

    handle.submit(request(0.5, 8, 8));
    wait_for_starts(&started, 2).await;
    release.store(true, Ordering::SeqCst);

    let delivery = tokio::time::timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(delivery.scale, 0.5);
    assert_eq!(delivery.generation, 2);
    assert_no_delivery(&mut rx).await;

    handle.shutdown().await;
}

#[tokio::test]
async fn latest_reports_newest_submission() {
    let (handle, _rx) = spawn_render_worker(Solid::default(), WorkerConfig::default());
    assert!(handle.latest().is_none());
    handle.submit(request(2.0, 3, 3));
    handle.submit(request(4.0, 5, 5));
    let job = handle.latest().unwrap();
    assert_eq!(job.request.scale, 4.0);
    assert_eq!(job.generation, 2);
    handle.shutdown().await;
}

#[test]
fn default_config_has_single_delivery_slot() {
    assert_eq!(WorkerConfig::default().delivery_capacity, 1);
}

// =============================================================================
// shutdown
// =============================================================================

#[tokio::test]
async fn shutdown_closes_delivery_channel() {
    let (handle, mut rx) = spawn_render_worker(Solid::default(), WorkerConfig::default());
    tokio::time::timeout(WAIT, handle.shutdown()).await.unwrap();
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn shutdown_cancels_in_flight_render() {
    let kernel = Gated::default();
    let started = Arc::clone(&kernel.started);
    let (handle, mut rx) = spawn_render_worker(kernel, WorkerConfig::default());

    handle.submit(request(1.0, 8, 8));
    wait_for_starts(&started, 1).await;

    tokio::time::timeout(WAIT, handle.shutdown()).await.unwrap();
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn worker_stops_when_receiver_dropped() {
    let (handle, rx) = spawn_render_worker(Solid::default(), WorkerConfig::default());
    drop(rx);
    handle.submit(request(1.0, 2, 2));
    tokio::time::timeout(WAIT, handle.shutdown()).await.unwrap();
}
