//! Background fractal computation for the explorer.
//!
//! The worker accepts [`viewport::raster::RenderRequest`]s through a
//! single-slot [`mailbox`]: a new submission replaces whatever was pending
//! and aborts whatever was running. Finished images come back on a bounded
//! channel as [`render::Delivery`] values, tagged with the scale of the
//! request that produced them.
//!
//! | Module | Role |
//! |--------|------|
//! | [`render`] | Worker task, [`render::WorkerHandle`], and deliveries |
//! | [`mailbox`] | Latest-wins request slot with a generation counter |
//! | [`kernel`] | [`kernel::Kernel`] trait and the escape-time implementation |

pub mod kernel;
pub mod mailbox;
pub mod render;
