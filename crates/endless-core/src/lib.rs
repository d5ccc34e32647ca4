//! Core pagination state for endless scrolling surfaces.
//!
//! The entry point is [`PagedListState`]: an append-only item list plus the
//! loading flag, error slot, and fetch-more operation that drive it. Batches
//! come from a [`BatchSource`] (a trait; plain closures work too), and state
//! transitions are announced through registered change listeners.
//!
//! Everything here is single-threaded and runtime-agnostic: fetches are
//! returned as boxed futures ([`LoadTask`]) for the integration layer to
//! drive however it likes.

pub mod paged_list;
pub mod source;

pub use paged_list::{ErrorRef, ItemsRef, ListStatus, ListenerId, LoadTask, PagedListState};
pub use source::{BatchFuture, BatchResult, BatchSource, LoadError};
