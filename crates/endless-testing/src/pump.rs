//! Single-threaded task driving for tests and headless runs.
//!
//! The engine hands fetches back as boxed futures and never spawns anything
//! itself, so tests need a place to run them. [`TaskPump`] is that place: a
//! task list polled with a no-op waker, one pass at a time, fully
//! deterministic. Nothing here blocks on I/O; a future that reports pending
//! without an external flag to flip will stay pending forever, which is why
//! the drive loops are capped and loud.

use std::future::Future;
use std::task::{Context, Poll};

use endless_core::LoadTask;

/// Poll cap for [`run`] and [`TaskPump::run_until_stalled`]. Deterministic
/// futures finish in a handful of polls; hitting the cap means a gate was
/// never opened.
const POLL_CAP: usize = 64;

/// Drives one future to completion on the current thread.
///
/// # Panics
///
/// Panics when the future is still pending after [`POLL_CAP`] polls.
pub fn run<F: Future>(fut: F) -> F::Output {
    let waker = futures_task::noop_waker();
    let mut cx = Context::from_waker(&waker);
    let mut fut = Box::pin(fut);
    for _ in 0..POLL_CAP {
        if let Poll::Ready(value) = fut.as_mut().poll(&mut cx) {
            return value;
        }
    }
    panic!("future still pending after {POLL_CAP} polls; is a gate still closed?");
}

/// Deterministic executor for [`LoadTask`]s.
#[derive(Default)]
pub struct TaskPump {
    tasks: Vec<LoadTask>,
}

impl TaskPump {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a task; nothing is polled until [`pump`](Self::pump).
    pub fn spawn(&mut self, task: LoadTask) {
        self.tasks.push(task);
    }

    /// Number of tasks that have not completed yet.
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Polls every queued task once. Returns true when at least one
    /// completed.
    pub fn pump(&mut self) -> bool {
        let waker = futures_task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        let entries = std::mem::take(&mut self.tasks);
        let mut completed = false;
        for mut task in entries {
            match task.as_mut().poll(&mut cx) {
                Poll::Ready(()) => completed = true,
                Poll::Pending => self.tasks.push(task),
            }
        }
        completed
    }

    /// Pumps until every task completed or a pass makes no progress.
    /// Returns the number of tasks completed.
    pub fn run_until_stalled(&mut self) -> usize {
        let mut completed = 0;
        for _ in 0..POLL_CAP {
            if self.tasks.is_empty() {
                break;
            }
            let before = self.tasks.len();
            self.pump();
            completed += before - self.tasks.len();
            if self.tasks.len() == before {
                break;
            }
        }
        completed
    }
}
