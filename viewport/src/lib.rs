//! View coordination core for the fractal explorer.
//!
//! This crate owns everything about the interactive viewport that does not
//! depend on a window system or on how fractal pixels are computed: the
//! logical view (center and scale), the last completed raster and the scale
//! it was captured at, the pixel offset accumulated while dragging, and the
//! gesture state machine. Every operation returns a list of
//! [`coordinator::Action`]s that the host turns into render submissions and
//! redraws, so the whole core runs (and is tested) without threads.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`coordinator`] | [`coordinator::CoordinatorCore`] state machine and its actions |
//! | [`view`] | Logical view state, pixel offsets, and screen positions |
//! | [`raster`] | Completed images, raster snapshots, and render requests |
//! | [`input`] | Input event types, key/wheel mapping, drag and pinch state |
//! | [`present`] | Compositing policy: placeholder, exact blit, or affine approximation |
//! | [`consts`] | Shared numeric constants (default view, zoom and scroll steps) |

pub mod consts;
pub mod coordinator;
pub mod input;
pub mod present;
pub mod raster;
pub mod view;
