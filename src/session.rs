//! Interactive context.
//!
//! DESIGN
//! ======
//! `Session` owns the coordinator core and the worker handle and is the only
//! place either is touched. Input events and worker deliveries are merged in
//! one `tokio::select!` loop, so every coordinator operation runs
//! sequentially on this task. Actions returned by the core are carried out
//! here: renders go to the worker mailbox, redraws are coalesced into one
//! presentation report per event.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use tokio::sync::mpsc;
use tracing::{debug, info};
use viewport::coordinator::{Action, CoordinatorConfig, CoordinatorCore};
use viewport::input::wheel_degrees_from_delta;
use viewport::view::ViewportSize;
use worker::kernel::Kernel;
use worker::render::{Delivery, WorkerConfig, WorkerHandle, spawn_render_worker};

use crate::report::{PresentReport, Surface};
use crate::script::InputEvent;

pub struct Session<S> {
    core: CoordinatorCore,
    worker: WorkerHandle,
    deliveries: mpsc::Receiver<Delivery>,
    surface: S,
    last_delivered: u64,
}

impl<S: Surface> Session<S> {
    /// Spawn the worker and size the viewport, which requests the first render.
    pub fn start<K: Kernel>(
        config: CoordinatorConfig,
        viewport: ViewportSize,
        kernel: K,
        worker_config: WorkerConfig,
        surface: S,
    ) -> Self {
        let (worker, deliveries) = spawn_render_worker(kernel, worker_config);
        let mut session =
            Self { core: CoordinatorCore::new(config), worker, deliveries, surface, last_delivered: 0 };
        info!(width = viewport.width, height = viewport.height, scale = config.initial.scale, "session started");
        let actions = session.core.on_resize(viewport);
        session.perform(actions);
        session
    }

    /// Run until `Quit` or the end of input, then stop the worker.
    /// Returns the surface.
    pub async fn run(mut self, mut events: mpsc::Receiver<InputEvent>) -> S {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    None | Some(InputEvent::Quit) => break,
                    Some(InputEvent::Wait) => self.wait_for_latest().await,
                    Some(event) => self.handle_event(event),
                },
                Some(delivery) = self.deliveries.recv() => self.deliver(delivery),
            }
        }
        self.shutdown().await
    }

    /// Apply one input event to the core.
    pub fn handle_event(&mut self, event: InputEvent) {
        let actions = match event {
            InputEvent::Key(key) => self.core.handle_key(key),
            InputEvent::Wheel(raw) => self.core.handle_wheel(wheel_degrees_from_delta(raw)),
            InputEvent::PointerDown(pos, button) => self.core.handle_pointer_down(pos, button),
            InputEvent::PointerMove(pos) => self.core.handle_pointer_move(pos),
            InputEvent::PointerUp(pos, button) => self.core.handle_pointer_up(pos, button),
            InputEvent::Pan { dx, dy, phase } => self.core.handle_gesture_pan(dx, dy, phase),
            InputEvent::Pinch { factor, phase } => self.core.handle_gesture_pinch(factor, phase),
            InputEvent::Resize(size) => self.core.on_resize(size),
            InputEvent::Present => vec![Action::Redraw],
            InputEvent::Wait | InputEvent::Quit => Vec::new(),
        };
        self.perform(actions);
    }

    /// Hand a worker result to the core.
    fn deliver(&mut self, delivery: Delivery) {
        debug!(generation = delivery.generation, scale = delivery.scale, "delivery received");
        self.last_delivered = self.last_delivered.max(delivery.generation);
        let actions = self.core.on_worker_delivery(delivery.image, delivery.scale);
        self.perform(actions);
    }

    /// Process deliveries until the newest submitted render has arrived.
    /// Returns at once if nothing is outstanding.
    async fn wait_for_latest(&mut self) {
        let Some(target) = self.worker.latest().map(|job| job.generation) else {
            return;
        };
        while self.last_delivered < target {
            let Some(delivery) = self.deliveries.recv().await else {
                debug!("delivery channel closed while waiting");
                return;
            };
            self.deliver(delivery);
        }
    }

    fn perform(&mut self, actions: Vec<Action>) {
        let mut redraw = false;
        for action in actions {
            match action {
                Action::Render(request) => self.worker.submit(request),
                Action::Redraw => redraw = true,
            }
        }
        if redraw {
            self.surface.show(PresentReport::capture(&self.core));
        }
    }

    async fn shutdown(self) -> S {
        let Self { worker, deliveries, surface, .. } = self;
        drop(deliveries);
        worker.shutdown().await;
        info!("session ended");
        surface
    }
}
