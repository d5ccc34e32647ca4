//! Scroll coordination for a paged list.
//!
//! [`ScrollCoordinator`] sits between a rendering surface and a
//! [`PagedListState`]: the surface feeds it one [`ViewportSignal`] per layout
//! pass and drains one optional scroll request per render cycle; the
//! coordinator decides when the list should fetch, resolves the selected key
//! to an index, and forwards activation events.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use endless_core::{LoadTask, PagedListState};

use crate::near_end::NearEndEdge;
use crate::selection::{KeyFn, NoopSelection, SelectionObserver, SelectionResolver};
use crate::viewport::ViewportSignal;

/// Default number of unloaded trailing items below which the next batch is
/// requested.
pub const DEFAULT_LOAD_MORE_THRESHOLD: usize = 5;

/// Load lifecycle of the coordinated list, derived from its flags.
///
/// `Idle` is the only phase in which a near-end edge starts a fetch. `Error`
/// is sticky: it is left exclusively through [`ScrollCoordinator::retry`],
/// never by scrolling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Error,
}

/// Interaction layer that turns viewport signals into fetches, selection
/// resolution, and scroll requests.
///
/// Per-instance and single-threaded like the list itself. Fetches are handed
/// back as [`LoadTask`]s rather than spawned internally, so the integration
/// decides where they run.
///
/// # Example
///
/// ```rust,ignore
/// let mut coordinator = ScrollCoordinator::new(list.clone())
///     .load_more_threshold(5)
///     .selection_observer(|item: &Entry, _previous: Option<&Entry>| {
///         println!("selected {item:?}");
///     });
///
/// // once per layout pass:
/// if let Some(task) = coordinator.handle_viewport(signal) {
///     executor.spawn(task);
/// }
/// // once per render cycle:
/// if let Some(index) = coordinator.take_scroll_request() {
///     surface.scroll_to(index);
/// }
/// ```
pub struct ScrollCoordinator<T> {
    list: PagedListState<T>,
    key_of: KeyFn<T>,
    threshold: usize,
    edge: NearEndEdge,
    selection: SelectionResolver,
    /// Resolution as of the last viewport pass or key change; scroll
    /// requests are issued when this moves.
    resolved_index: Option<usize>,
    observer: Box<dyn SelectionObserver<T>>,
    /// Last-writer-wins slot; at most one scroll target per render cycle.
    pending_scroll: Option<usize>,
}

impl<T: Hash + 'static> ScrollCoordinator<T> {
    /// Coordinator with item keys derived by hashing the item.
    ///
    /// Fine whenever distinct items hash apart (the usual case). Supply
    /// [`with_key_fn`](Self::with_key_fn) when the items carry a natural
    /// identity instead.
    pub fn new(list: PagedListState<T>) -> Self {
        Self::with_key_fn(list, |item: &T| {
            let mut hasher = DefaultHasher::new();
            item.hash(&mut hasher);
            hasher.finish()
        })
    }
}

impl<T: 'static> ScrollCoordinator<T> {
    /// Coordinator with an explicit key function.
    pub fn with_key_fn(list: PagedListState<T>, key_of: impl Fn(&T) -> u64 + 'static) -> Self {
        Self {
            list,
            key_of: Box::new(key_of),
            threshold: DEFAULT_LOAD_MORE_THRESHOLD,
            edge: NearEndEdge::new(),
            selection: SelectionResolver::default(),
            resolved_index: None,
            observer: Box::new(NoopSelection),
            pending_scroll: None,
        }
    }

    /// Sets how close to the end counts as "near" (see
    /// [`ViewportSignal::near_end`]). Zero disables proximity prefetch.
    pub fn load_more_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Installs the receiver for activation events.
    pub fn selection_observer(mut self, observer: impl SelectionObserver<T> + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// The coordinated list.
    #[inline]
    pub fn list(&self) -> &PagedListState<T> {
        &self.list
    }

    /// Current load phase, read straight off the list's flags.
    pub fn phase(&self) -> LoadPhase {
        if self.list.is_loading() {
            LoadPhase::Loading
        } else if self.list.has_error() {
            LoadPhase::Error
        } else {
            LoadPhase::Idle
        }
    }

    /// Feeds one layout pass report.
    ///
    /// Re-resolves the selection against the (possibly grown) list, then
    /// runs the near-end edge detector. On a rising edge in the `Idle` phase
    /// a fetch begins and its [`LoadTask`] is returned for the caller to
    /// drive. Edges observed while `Loading` or `Error` are dropped, not
    /// queued; an errored list loads again only through
    /// [`retry`](Self::retry).
    pub fn handle_viewport(&mut self, signal: ViewportSignal) -> Option<LoadTask> {
        self.resync_selection();
        let rising = self.edge.observe(signal.near_end(self.threshold));
        if !rising {
            return None;
        }
        match self.phase() {
            LoadPhase::Idle => {
                log::debug!(
                    "near end at {}/{} item(s); fetching",
                    signal.last_visible().map_or(0, |last| last + 1),
                    signal.total_items
                );
                self.list.start_load_more()
            }
            LoadPhase::Loading | LoadPhase::Error => {
                log::trace!("near-end edge dropped in {:?} phase", self.phase());
                None
            }
        }
    }

    /// Sets (or clears) the externally driven selection key and re-resolves.
    ///
    /// When the resolved index changes to a present item, a scroll request
    /// for it is recorded. A key with no matching item resolves to nothing
    /// until a later batch supplies the item.
    pub fn set_selected_key(&mut self, key: Option<u64>) {
        self.selection.set_key(key);
        self.resync_selection();
    }

    /// Index of the selected item, as of the most recent viewport pass or
    /// key change. First match wins when keys collide.
    #[inline]
    pub fn selected_index(&self) -> Option<usize> {
        self.resolved_index
    }

    /// Reports a user activation of the item at `index`.
    ///
    /// Emits `(activated, previously selected)` to the selection observer
    /// and records a scroll request for the activated index. The selection
    /// key itself is not touched; the owner decides whether the event
    /// becomes the new selection. Out-of-range indices are logged and
    /// dropped.
    pub fn activate_item(&mut self, index: usize) {
        {
            let items = self.list.items();
            let Some(item) = items.get(index) else {
                log::warn!("activate_item({index}) out of range, len {}", items.len());
                return;
            };
            let previous = self.resolved_index.and_then(|i| items.get(i));
            self.observer.item_selected(item, previous);
        }
        self.pending_scroll = Some(index);
    }

    /// Takes the pending scroll target, if one was recorded since the last
    /// call. Later requests overwrite earlier ones; nothing is queued.
    pub fn take_scroll_request(&mut self) -> Option<usize> {
        self.pending_scroll.take()
    }

    /// Clears a stored error and begins a fresh fetch, returning its task.
    ///
    /// The only path from `Error` back to `Loading`. Calling it while a
    /// fetch is already in flight is ignored (`None`).
    pub fn retry(&mut self) -> Option<LoadTask> {
        self.list.retry();
        self.list.start_load_more()
    }

    fn resync_selection(&mut self) {
        let resolved = {
            let items = self.list.items();
            self.selection.resolve(&items, &*self.key_of)
        };
        if resolved != self.resolved_index {
            if let Some(index) = resolved {
                log::debug!("selection resolved to index {index}");
                self.pending_scroll = Some(index);
            }
            self.resolved_index = resolved;
        }
    }
}
