//! Single-slot request mailbox.
//!
//! DESIGN
//! ======
//! Render requests are not queued. `MailboxSender::submit` overwrites the
//! slot (a `tokio::sync::watch` channel) and bumps a shared generation
//! counter. The worker always picks up the newest value, and a job whose
//! generation is no longer current has been superseded: the kernel polls
//! that to abandon work, and the worker checks it before delivering.

#[cfg(test)]
#[path = "mailbox_test.rs"]
mod mailbox_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use viewport::raster::RenderRequest;

/// A request plus the generation it was submitted under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Job {
    pub request: RenderRequest,
    pub generation: u64,
}

/// Shared view of the newest generation, cheap to clone into blocking tasks.
#[derive(Debug, Clone)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    #[must_use]
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }

    fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// Submitting side, owned by the interactive context.
#[derive(Debug)]
pub struct MailboxSender {
    slot: watch::Sender<Option<Job>>,
    generation: Generation,
}

/// Receiving side, owned by the worker task.
#[derive(Debug)]
pub struct MailboxReceiver {
    slot: watch::Receiver<Option<Job>>,
    generation: Generation,
}

/// Create a connected sender/receiver pair with an empty slot.
#[must_use]
pub fn mailbox() -> (MailboxSender, MailboxReceiver) {
    let (tx, rx) = watch::channel(None);
    let generation = Generation(Arc::new(AtomicU64::new(0)));
    (
        MailboxSender { slot: tx, generation: generation.clone() },
        MailboxReceiver { slot: rx, generation },
    )
}

impl MailboxSender {
    /// Replace the slot with `request`. Returns the new generation.
    pub fn submit(&self, request: RenderRequest) -> u64 {
        let generation = self.generation.advance();
        self.slot.send_replace(Some(Job { request, generation }));
        generation
    }

    /// The newest job submitted, whether or not the worker has taken it.
    #[must_use]
    pub fn latest(&self) -> Option<Job> {
        *self.slot.borrow()
    }

    /// Invalidate whatever is running so the kernel stops at its next check.
    pub fn cancel_all(&self) {
        self.generation.advance();
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation.clone()
    }
}

impl MailboxReceiver {
    /// Wait for the next job. Intermediate submissions made while the worker
    /// was busy are skipped; only the newest is returned. `None` once the
    /// sender is gone.
    pub async fn recv(&mut self) -> Option<Job> {
        loop {
            if self.slot.changed().await.is_err() {
                return None;
            }
            if let Some(job) = *self.slot.borrow_and_update() {
                return Some(job);
            }
        }
    }

    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.is_current(generation)
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation.clone()
    }
}
