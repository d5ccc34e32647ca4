//! Deterministic test harness for the endless engine.
//!
//! Two pieces: [`TaskPump`] / [`run`] drive the boxed load tasks the engine
//! hands out, and [`ScriptedSource`] plays back a programmed sequence of
//! batches, failures, and gated (held-pending) steps so tests can observe
//! every phase of a load.

pub mod pump;
pub mod scripted;

pub use pump::{run, TaskPump};
pub use scripted::{Gate, ScriptedFailure, ScriptedSource, SourceProbe};
