//! Selection plumbing: item keys, event observers, key-to-index resolution.

/// Function deriving a stable `u64` key from an item.
///
/// Keys identify items across appends, like lazy layout keys do; distinct
/// items should map to distinct keys, and duplicates resolve to their first
/// occurrence.
pub type KeyFn<T> = Box<dyn Fn(&T) -> u64>;

/// Receiver for user-driven selection events.
///
/// Called from [`ScrollCoordinator::activate_item`] with the activated item
/// and the previously selected one, if any. The engine never stores a
/// selection itself; what to do with the event is the caller's decision.
///
/// The references borrow the item list for the duration of the call, so the
/// implementation must not synchronously call back into the same list (start
/// a fetch, append). Record the event and act on it afterwards.
///
/// Closures `FnMut(&T, Option<&T>)` implement this trait.
///
/// [`ScrollCoordinator::activate_item`]: crate::ScrollCoordinator::activate_item
pub trait SelectionObserver<T> {
    fn item_selected(&mut self, selected: &T, previous: Option<&T>);
}

/// Observer that ignores every event; the default for coordinators built
/// without one.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSelection;

impl<T> SelectionObserver<T> for NoopSelection {
    fn item_selected(&mut self, _selected: &T, _previous: Option<&T>) {}
}

impl<T, F> SelectionObserver<T> for F
where
    F: FnMut(&T, Option<&T>),
{
    fn item_selected(&mut self, selected: &T, previous: Option<&T>) {
        self(selected, previous)
    }
}

/// Incremental key-to-index resolver.
///
/// The list is append-only, so once a prefix has been scanned without a
/// match it never needs rescanning: resolution picks up where it left off
/// when new items arrive, and restarts only when the key changes. The first
/// matching index wins and stays resolved.
#[derive(Debug, Default)]
pub(crate) struct SelectionResolver {
    key: Option<u64>,
    resolved: Option<usize>,
    scanned: usize,
}

impl SelectionResolver {
    pub(crate) fn set_key(&mut self, key: Option<u64>) {
        if self.key != key {
            self.key = key;
            self.resolved = None;
            self.scanned = 0;
        }
    }

    /// Resolves against the current items, scanning only the unseen tail.
    pub(crate) fn resolve<T>(
        &mut self,
        items: &[T],
        key_of: impl Fn(&T) -> u64,
    ) -> Option<usize> {
        let key = self.key?;
        if self.resolved.is_none() {
            while self.scanned < items.len() {
                let index = self.scanned;
                self.scanned += 1;
                if key_of(&items[index]) == key {
                    self.resolved = Some(index);
                    break;
                }
            }
        }
        self.resolved
    }
}
