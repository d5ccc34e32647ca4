//! Paged list state management.
//!
//! Provides [`PagedListState`] for holding an endlessly appending item list
//! together with its fetch lifecycle.
//!
//! Design follows the Jetpack Compose pagination pattern (a state holder with
//! `items` / `isLoading` / `error` driven from a coroutine), rendered in plain
//! Rust: a struct behind an `Rc<RefCell<..>>` handle plus an explicit
//! invalidation callback list instead of snapshot state. The rendering surface
//! registers a callback, gets poked after every committed transition, and
//! re-reads whatever it displays.

use std::cell::{Ref, RefCell};
use std::error::Error;
use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::source::{BatchResult, BatchSource};

/// Future that drives one in-flight fetch to completion and commits its
/// outcome. Single-threaded; the caller decides where it gets polled.
pub type LoadTask = Pin<Box<dyn Future<Output = ()>>>;

/// Handle for removing a change listener registered with
/// [`PagedListState::on_change`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerId(u64);

/// Presentation summary of a paged list, derived from its three flags.
///
/// Mirrors the empty / error / content cascade a list surface renders:
/// `Empty` only when there is nothing to show and nothing pending, `Error`
/// whenever a failure value is held, otherwise `Content` with a flag for the
/// trailing load indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListStatus {
    /// No items, no fetch in flight, no error. Show the placeholder.
    Empty,
    /// The last fetch failed; the failure value is in [`PagedListState::error`].
    Error,
    /// Show the items. `loading_more` is true while a fetch is in flight.
    Content { loading_more: bool },
}

struct PagedInner<T> {
    /// Display order. Append-only: never reordered, never pruned.
    items: Vec<T>,
    is_loading: bool,
    error: Option<Box<dyn Error>>,
    change_listeners: SmallVec<[(u64, Rc<dyn Fn()>); 2]>,
    next_listener_id: u64,
}

/// State holder for a paged, endlessly appending list.
///
/// Owns the item vector, the loading flag, the error slot, and the
/// [`BatchSource`] that produces further batches. Cloning the state clones a
/// handle to the same list, so a coordinator and a rendering surface can share
/// one instance.
///
/// Single-threaded by construction (`Rc` inside): one logical owner drives it,
/// and the compiler rejects attempts to move a handle to another thread.
///
/// # Example
///
/// ```rust,ignore
/// let state = PagedListState::with_items(seed, move |current: &[u32]| {
///     let from = current.last().copied().unwrap_or(0);
///     Box::pin(async move { Ok((from + 1..=from + 50).collect()) })
/// });
/// state.load_more_items().await;
/// ```
pub struct PagedListState<T> {
    inner: Rc<RefCell<PagedInner<T>>>,
    source: Rc<RefCell<Box<dyn BatchSource<T>>>>,
}

impl<T> Clone for PagedListState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            source: Rc::clone(&self.source),
        }
    }
}

impl<T: 'static> PagedListState<T> {
    /// Creates an empty list backed by `source`.
    pub fn new(source: impl BatchSource<T> + 'static) -> Self {
        Self::with_items(Vec::new(), source)
    }

    /// Creates a list seeded with `items`, backed by `source`.
    pub fn with_items(items: Vec<T>, source: impl BatchSource<T> + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PagedInner {
                items,
                is_loading: false,
                error: None,
                change_listeners: SmallVec::new(),
                next_listener_id: 1,
            })),
            source: Rc::new(RefCell::new(Box::new(source))),
        }
    }

    /// Begins a fetch synchronously and returns the future that completes it.
    ///
    /// On success this sets the loading flag, clears any stored error, hands
    /// the source the current items, and returns a [`LoadTask`] the caller
    /// must drive (spawn it, pump it, or await it). The flag flip is visible
    /// to listeners before the task is first polled.
    ///
    /// Returns `None` when a fetch is already in flight: overlapping calls
    /// are a caller error and are ignored, which guarantees batches never
    /// interleave. A warning is logged so the misuse is visible.
    pub fn start_load_more(&self) -> Option<LoadTask> {
        if self.inner.borrow().is_loading {
            log::warn!("load requested while another fetch is in flight; ignoring");
            return None;
        }
        {
            let mut inner = self.inner.borrow_mut();
            inner.is_loading = true;
            inner.error = None;
        }
        self.notify_listeners();

        // The source reads the snapshot during this call; the borrow ends
        // before the returned future is polled.
        let batch = {
            let inner = self.inner.borrow();
            self.source.borrow_mut().load_batch(&inner.items)
        };
        log::debug!("fetch started at {} item(s)", self.len());

        let state = self.clone();
        Some(Box::pin(async move {
            let outcome = batch.await;
            state.commit(outcome);
        }))
    }

    /// Requests the next batch and waits for it to be applied.
    ///
    /// Exactly one of two things happens: the batch (possibly empty) is
    /// appended after the current items, or the failure value is stored in
    /// the error slot with the items untouched. The loading flag is false
    /// again in both outcomes. Nothing is retried automatically.
    ///
    /// Calling this while a fetch is in flight is ignored (see
    /// [`start_load_more`](Self::start_load_more)).
    pub async fn load_more_items(&self) {
        if let Some(task) = self.start_load_more() {
            task.await;
        }
    }

    fn commit(&self, outcome: BatchResult<T>) {
        {
            let mut inner = self.inner.borrow_mut();
            match outcome {
                Ok(batch) => {
                    log::debug!("fetch appended {} item(s)", batch.len());
                    inner.items.extend(batch);
                }
                Err(err) => {
                    log::debug!("fetch failed: {err}");
                    inner.error = Some(err);
                }
            }
            inner.is_loading = false;
        }
        self.notify_listeners();
    }
}

impl<T> PagedListState<T> {
    /// Clears the stored error, if any. Never touches the items and never
    /// starts a fetch; pair it with
    /// [`load_more_items`](Self::load_more_items) to actually try again.
    pub fn retry(&self) {
        let cleared = self.inner.borrow_mut().error.take().is_some();
        if cleared {
            self.notify_listeners();
        }
    }

    /// Read access to the items, in display order.
    ///
    /// The returned guard borrows the list; drop it before calling anything
    /// that mutates the state.
    pub fn items(&self) -> ItemsRef<'_, T> {
        ItemsRef(Ref::map(self.inner.borrow(), |inner| {
            inner.items.as_slice()
        }))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.inner.borrow().is_loading
    }

    #[inline]
    pub fn has_error(&self) -> bool {
        self.inner.borrow().error.is_some()
    }

    /// Read access to the stored failure value, if the last fetch failed.
    pub fn error(&self) -> Option<ErrorRef<'_>> {
        Ref::filter_map(self.inner.borrow(), |inner| inner.error.as_deref())
            .ok()
            .map(ErrorRef)
    }

    /// Derives the empty / error / content presentation state.
    pub fn status(&self) -> ListStatus {
        let inner = self.inner.borrow();
        if inner.error.is_some() {
            ListStatus::Error
        } else if inner.items.is_empty() && !inner.is_loading {
            ListStatus::Empty
        } else {
            ListStatus::Content {
                loading_more: inner.is_loading,
            }
        }
    }

    /// Registers a callback poked after every committed state transition.
    ///
    /// The callback must re-read the state rather than capture values, and
    /// must not start a fetch synchronously from inside the notification.
    pub fn on_change(&self, listener: impl Fn() + 'static) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.change_listeners.push((id, Rc::new(listener)));
        ListenerId(id)
    }

    /// Removes a previously registered change listener.
    pub fn remove_listener(&self, id: ListenerId) {
        self.inner
            .borrow_mut()
            .change_listeners
            .retain(|(listener_id, _)| *listener_id != id.0);
    }

    fn notify_listeners(&self) {
        // Clone callbacks to avoid holding the borrow while calling them.
        let listeners: SmallVec<[Rc<dyn Fn()>; 2]> = self
            .inner
            .borrow()
            .change_listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

/// Borrow guard over the item slice, from [`PagedListState::items`].
pub struct ItemsRef<'a, T>(Ref<'a, [T]>);

impl<T> Deref for ItemsRef<'_, T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.0
    }
}

/// Borrow guard over the stored failure value, from [`PagedListState::error`].
pub struct ErrorRef<'a>(Ref<'a, dyn Error + 'static>);

impl Deref for ErrorRef<'_> {
    type Target = dyn Error;

    #[inline]
    fn deref(&self) -> &(dyn Error + 'static) {
        &*self.0
    }
}
