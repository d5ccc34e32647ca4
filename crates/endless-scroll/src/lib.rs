//! Scroll coordination for paged lists.
//!
//! Connects a rendering surface to an `endless-core` paged list:
//! [`ViewportSignal`]s go in once per layout pass, and out come fetch tasks
//! (started on near-end rising edges), a resolved selection index, and
//! scroll-to-index requests. The surface stays in charge of measuring and
//! drawing; this crate only decides *when* things should happen.

pub mod coordinator;
pub mod near_end;
pub mod selection;
pub mod viewport;

pub use coordinator::{LoadPhase, ScrollCoordinator, DEFAULT_LOAD_MORE_THRESHOLD};
pub use near_end::NearEndEdge;
pub use selection::{KeyFn, NoopSelection, SelectionObserver};
pub use viewport::{ViewportSignal, VisibleRange};
