//! Scripted batch sources for exercising load flows.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use endless_core::{BatchFuture, BatchResult, BatchSource};
use thiserror::Error;

/// Failure value produced by a [`Fail`](ScriptedSource::then_fail) step.
///
/// The engine treats errors opaquely; this type exists so tests can assert
/// on something concrete.
#[derive(Debug, Error)]
#[error("scripted failure: {0}")]
pub struct ScriptedFailure(pub String);

/// Shared open/closed flag holding a gated step's future pending.
///
/// Lets a test observe in-flight state: start a fetch, assert the loading
/// flag, then [`open`](Gate::open) and pump to let it commit.
#[derive(Clone, Default)]
pub struct Gate(Rc<Cell<bool>>);

impl Gate {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        self.0.set(true);
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.0.get()
    }
}

enum Step<T> {
    Batch(Vec<T>),
    Fail(String),
    Gated(Vec<T>, Gate),
}

/// Read-side handle to a [`ScriptedSource`] that was moved into a list.
#[derive(Clone)]
pub struct SourceProbe {
    calls: Rc<Cell<usize>>,
    seen_lens: Rc<RefCell<Vec<usize>>>,
}

impl SourceProbe {
    /// How many times the source was invoked.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Length of the snapshot the source saw on each invocation, in order.
    pub fn seen_lens(&self) -> Vec<usize> {
        self.seen_lens.borrow().clone()
    }
}

/// Programmable [`BatchSource`] with a step queue.
///
/// Steps play in order; a source that runs out of steps keeps answering with
/// empty successes, which the engine treats as valid no-op batches.
///
/// # Example
///
/// ```rust,ignore
/// let source = ScriptedSource::new()
///     .then_fail("offline")
///     .then_batch(vec![4, 5, 6]);
/// let probe = source.probe();
/// let list = PagedListState::with_items(vec![1, 2, 3], source);
/// ```
pub struct ScriptedSource<T> {
    steps: VecDeque<Step<T>>,
    calls: Rc<Cell<usize>>,
    seen_lens: Rc<RefCell<Vec<usize>>>,
}

impl<T> Default for ScriptedSource<T> {
    fn default() -> Self {
        Self {
            steps: VecDeque::new(),
            calls: Rc::default(),
            seen_lens: Rc::default(),
        }
    }
}

impl<T> ScriptedSource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step that succeeds with `batch`.
    pub fn then_batch(mut self, batch: Vec<T>) -> Self {
        self.steps.push_back(Step::Batch(batch));
        self
    }

    /// Appends a step that fails with a [`ScriptedFailure`].
    pub fn then_fail(mut self, message: impl Into<String>) -> Self {
        self.steps.push_back(Step::Fail(message.into()));
        self
    }

    /// Appends a step that stays pending until `gate` opens, then succeeds
    /// with `batch`.
    pub fn then_gated(mut self, batch: Vec<T>, gate: &Gate) -> Self {
        self.steps.push_back(Step::Gated(batch, gate.clone()));
        self
    }

    /// Handle for inspecting calls after the source is moved into a list.
    pub fn probe(&self) -> SourceProbe {
        SourceProbe {
            calls: Rc::clone(&self.calls),
            seen_lens: Rc::clone(&self.seen_lens),
        }
    }
}

impl<T: 'static> BatchSource<T> for ScriptedSource<T> {
    fn load_batch(&mut self, current: &[T]) -> BatchFuture<T> {
        self.calls.set(self.calls.get() + 1);
        self.seen_lens.borrow_mut().push(current.len());
        match self.steps.pop_front() {
            None => Box::pin(async { Ok(Vec::new()) }),
            Some(Step::Batch(batch)) => Box::pin(async move { Ok(batch) }),
            Some(Step::Fail(message)) => {
                Box::pin(async move { Err(ScriptedFailure(message).into()) })
            }
            Some(Step::Gated(batch, gate)) => Box::pin(GatedBatch {
                gate,
                batch: Some(batch),
            }),
        }
    }
}

struct GatedBatch<T> {
    gate: Gate,
    batch: Option<Vec<T>>,
}

// No self-references: poll only reads the gate flag and takes the batch,
// so pinning places no constraint on the item type.
impl<T> Unpin for GatedBatch<T> {}

impl<T> Future for GatedBatch<T> {
    type Output = BatchResult<T>;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.gate.is_open() {
            Poll::Ready(Ok(this.batch.take().unwrap_or_default()))
        } else {
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pump::run;
    use endless_core::PagedListState;

    #[test]
    fn test_steps_play_in_order() {
        let source = ScriptedSource::new()
            .then_batch(vec![1, 2])
            .then_fail("down")
            .then_batch(vec![3]);
        let probe = source.probe();
        let list = PagedListState::new(source);

        run(list.load_more_items());
        assert_eq!(&*list.items(), &[1, 2]);

        run(list.load_more_items());
        assert!(list.has_error());
        assert_eq!(
            list.error().map(|e| e.to_string()),
            Some("scripted failure: down".into())
        );

        run(list.load_more_items());
        assert_eq!(&*list.items(), &[1, 2, 3]);
        assert_eq!(probe.calls(), 3);
        assert_eq!(probe.seen_lens(), vec![0, 2, 2]);
    }

    #[test]
    fn test_exhausted_script_answers_empty() {
        let list = PagedListState::with_items(vec![9], ScriptedSource::new());
        run(list.load_more_items());
        assert_eq!(&*list.items(), &[9]);
        assert!(!list.has_error());
    }

    #[test]
    fn test_gated_step_waits_for_gate() {
        let gate = Gate::closed();
        let source = ScriptedSource::new().then_gated(vec![1], &gate);
        let list = PagedListState::new(source);

        let mut task = list.start_load_more().unwrap();
        let waker = futures_task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        assert!(task.as_mut().poll(&mut cx).is_pending());
        assert!(list.is_loading());

        gate.open();
        assert!(task.as_mut().poll(&mut cx).is_ready());
        assert_eq!(&*list.items(), &[1]);
        assert!(!list.is_loading());
    }

    #[test]
    fn test_gated_steps_work_for_non_unpin_items() {
        use std::marker::PhantomPinned;

        struct Anchored {
            value: u32,
            _pin: PhantomPinned,
        }

        let gate = Gate::closed();
        let source = ScriptedSource::new().then_gated(
            vec![Anchored {
                value: 7,
                _pin: PhantomPinned,
            }],
            &gate,
        );
        let list = PagedListState::new(source);

        let mut task = list.start_load_more().unwrap();
        let waker = futures_task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        assert!(task.as_mut().poll(&mut cx).is_pending());

        gate.open();
        assert!(task.as_mut().poll(&mut cx).is_ready());
        assert_eq!(list.items()[0].value, 7);
    }
}
