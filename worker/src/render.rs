//! Render worker task.
//!
//! DESIGN
//! ======
//! One tokio task per viewport waits on the mailbox, runs the kernel on the
//! blocking pool, and hands finished images back on a bounded channel. The
//! interactive side never blocks: `submit` is a slot overwrite. A result is
//! delivered only if its job is still the newest one; superseded results
//! are dropped without a trace on the delivery channel.
//!
//! SHUTDOWN
//! ========
//! `WorkerHandle::shutdown` cancels the running job and closes the mailbox;
//! the task exits and the delivery channel closes. Dropping the delivery
//! receiver also stops the task after its current job.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use viewport::raster::{Image, RenderRequest};

use crate::kernel::Kernel;
use crate::mailbox::{Job, MailboxReceiver, MailboxSender, mailbox};

pub const DEFAULT_DELIVERY_CAPACITY: usize = 1;

/// A finished render on its way back to the interactive context.
#[derive(Debug)]
pub struct Delivery {
    pub image: Image,
    /// Scale of the request that produced `image`.
    pub scale: f64,
    pub generation: u64,
}

/// Tuning knobs for the render worker.
#[derive(Debug, Clone, Copy)]
pub struct WorkerConfig {
    /// Bounded channel capacity for finished renders.
    pub delivery_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { delivery_capacity: DEFAULT_DELIVERY_CAPACITY }
    }
}

/// Interactive-side handle to a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    mailbox: MailboxSender,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Queue `request`, superseding anything pending or in flight. Never blocks.
    pub fn submit(&self, request: RenderRequest) {
        let generation = self.mailbox.submit(request);
        debug!(
            generation,
            scale = request.scale,
            width = request.width,
            height = request.height,
            "render submitted"
        );
    }

    /// The newest job submitted.
    #[must_use]
    pub fn latest(&self) -> Option<Job> {
        self.mailbox.latest()
    }

    /// Cancel in-flight work and wait for the task to exit.
    pub async fn shutdown(self) {
        self.mailbox.cancel_all();
        drop(self.mailbox);
        if let Err(e) = self.task.await {
            warn!(error = %e, "render worker task ended abnormally");
        }
    }
}

/// Spawn a render worker on the current tokio runtime.
///
/// Returns the handle used to submit requests and the receiver finished
/// renders arrive on.
#[must_use]
pub fn spawn_render_worker<K: Kernel>(kernel: K, config: WorkerConfig) -> (WorkerHandle, mpsc::Receiver<Delivery>) {
    let (mailbox_tx, mailbox_rx) = mailbox();
    let (delivery_tx, delivery_rx) = mpsc::channel(config.delivery_capacity.max(1));

    info!(delivery_capacity = config.delivery_capacity, "render worker configured");

    let task = tokio::spawn(run(Arc::new(kernel), mailbox_rx, delivery_tx));
    (WorkerHandle { mailbox: mailbox_tx, task }, delivery_rx)
}

async fn run<K: Kernel>(kernel: Arc<K>, mut inbox: MailboxReceiver, deliveries: mpsc::Sender<Delivery>) {
    while let Some(job) = inbox.recv().await {
        let started = Instant::now();
        let Some(image) = compute(Arc::clone(&kernel), &inbox, job).await else {
            debug!(generation = job.generation, "render superseded");
            continue;
        };

        // PHASE: STALENESS CHECK
        // A newer submit may have landed after the last row check.
        if !inbox.is_current(job.generation) {
            debug!(generation = job.generation, "render finished after being superseded; dropped");
            continue;
        }

        info!(
            generation = job.generation,
            width = image.width(),
            height = image.height(),
            elapsed_ms = started.elapsed().as_millis(),
            "render complete"
        );
        let delivery = Delivery { image, scale: job.request.scale, generation: job.generation };
        if deliveries.send(delivery).await.is_err() {
            info!("delivery receiver closed; render worker exiting");
            return;
        }
    }
    info!("render mailbox closed; render worker exiting");
}

async fn compute<K: Kernel>(kernel: Arc<K>, inbox: &MailboxReceiver, job: Job) -> Option<Image> {
    let generation = inbox.generation();
    let result = tokio::task::spawn_blocking(move || {
        let cancelled = || !generation.is_current(job.generation);
        kernel.render(&job.request, &cancelled)
    })
    .await;

    match result {
        Ok(image) => image,
        Err(e) => {
            error!(error = %e, generation = job.generation, "render task failed");
            None
        }
    }
}
