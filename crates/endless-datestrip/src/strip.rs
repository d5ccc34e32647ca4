//! The date strip state holder.
//!
//! Bundles a paged day list, its scroll coordinator, and the enablement
//! policy into one headless widget state. A rendering surface draws the date
//! cards; everything about *which* dates exist, when more load, which one is
//! selected, and where to scroll lives here.

use chrono::{Local, NaiveDate};
use endless_core::{ItemsRef, ListStatus, LoadTask, PagedListState};
use endless_scroll::{
    ScrollCoordinator, SelectionObserver, ViewportSignal, DEFAULT_LOAD_MORE_THRESHOLD,
};

use crate::days::{descending_days, epoch_day_key};
use crate::feed::DayFeed;
use crate::policy::DatePolicy;

/// Construction parameters for a [`DateStripState`].
#[derive(Clone, Copy, Debug)]
pub struct DateStripConfig {
    /// Newest date of the strip; the sequence counts down from here.
    pub origin: NaiveDate,
    /// Number of days seeded before the first fetch.
    pub initial_count: usize,
    /// Days added per fetch.
    pub batch_size: usize,
    /// Near-end threshold, see [`ViewportSignal::near_end`].
    pub load_more_threshold: usize,
}

impl Default for DateStripConfig {
    /// Today, 50 days seeded, 50 per batch, threshold 5.
    fn default() -> Self {
        Self {
            origin: Local::now().date_naive(),
            initial_count: 50,
            batch_size: 50,
            load_more_threshold: DEFAULT_LOAD_MORE_THRESHOLD,
        }
    }
}

/// Headless state for an endless strip of selectable dates.
///
/// # Example
///
/// ```rust,ignore
/// let mut strip = DateStripState::new(DateStripConfig::default())
///     .on_date_select(|date, previous| println!("{previous:?} -> {date}"));
///
/// strip.set_selected_date(Some(some_date));
/// if let Some(task) = strip.handle_viewport(signal) {
///     executor.spawn(task);
/// }
/// if let Some(index) = strip.take_scroll_request() {
///     surface.scroll_to(index);
/// }
/// ```
pub struct DateStripState {
    list: PagedListState<NaiveDate>,
    coordinator: ScrollCoordinator<NaiveDate>,
    policy: DatePolicy,
}

impl DateStripState {
    /// Strip with the default all-enabled policy.
    pub fn new(config: DateStripConfig) -> Self {
        Self::with_policy(config, DatePolicy::default())
    }

    pub fn with_policy(config: DateStripConfig, policy: DatePolicy) -> Self {
        let seed = descending_days(config.origin, config.initial_count);
        let list = PagedListState::with_items(
            seed,
            DayFeed::new(config.origin, config.batch_size),
        );
        let coordinator =
            ScrollCoordinator::with_key_fn(list.clone(), |date: &NaiveDate| epoch_day_key(*date))
                .load_more_threshold(config.load_more_threshold);
        Self {
            list,
            coordinator,
            policy,
        }
    }

    /// Installs the receiver for date activation events; it gets the tapped
    /// date and the previously selected one.
    pub fn on_date_select(
        mut self,
        observer: impl SelectionObserver<NaiveDate> + 'static,
    ) -> Self {
        self.coordinator = self.coordinator.selection_observer(observer);
        self
    }

    /// Sets or clears the selected date. The matching entry (once loaded)
    /// resolves to an index and produces a scroll request.
    pub fn set_selected_date(&mut self, date: Option<NaiveDate>) {
        self.coordinator.set_selected_key(date.map(epoch_day_key));
    }

    /// Index of the selected date within [`dates`](Self::dates), if its
    /// entry has been loaded.
    #[inline]
    pub fn selected_index(&self) -> Option<usize> {
        self.coordinator.selected_index()
    }

    /// Feeds one layout pass report; see
    /// [`ScrollCoordinator::handle_viewport`].
    pub fn handle_viewport(&mut self, signal: ViewportSignal) -> Option<LoadTask> {
        self.coordinator.handle_viewport(signal)
    }

    /// Reports a tap on the entry at `index`, if that date is enabled.
    /// Disabled dates swallow the tap, like a disabled button; out-of-range
    /// indices are logged and dropped.
    pub fn activate_date(&mut self, index: usize) {
        let enabled = match self.list.items().get(index) {
            Some(date) => self.policy.is_enabled(*date),
            None => {
                log::warn!("activate_date({index}) out of range, len {}", self.list.len());
                return;
            }
        };
        if !enabled {
            log::debug!("tap on disabled entry {index} ignored");
            return;
        }
        self.coordinator.activate_item(index);
    }

    /// Takes the pending scroll target, if any. Last writer wins.
    pub fn take_scroll_request(&mut self) -> Option<usize> {
        self.coordinator.take_scroll_request()
    }

    /// Clears a load error and fetches again; the returned task must be
    /// driven by the caller.
    pub fn retry(&mut self) -> Option<LoadTask> {
        self.coordinator.retry()
    }

    /// True when `date` passes the strip's enablement policy.
    #[inline]
    pub fn is_enabled(&self, date: NaiveDate) -> bool {
        self.policy.is_enabled(date)
    }

    /// The loaded dates, newest first.
    #[inline]
    pub fn dates(&self) -> ItemsRef<'_, NaiveDate> {
        self.list.items()
    }

    /// Empty / error / content presentation state of the underlying list.
    #[inline]
    pub fn status(&self) -> ListStatus {
        self.list.status()
    }

    /// The underlying paged list, for change listeners and flag reads.
    #[inline]
    pub fn list(&self) -> &PagedListState<NaiveDate> {
        &self.list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn config(origin: NaiveDate) -> DateStripConfig {
        DateStripConfig {
            origin,
            initial_count: 10,
            batch_size: 10,
            load_more_threshold: 3,
        }
    }

    #[test]
    fn test_seeds_descending_from_origin() {
        let strip = DateStripState::new(config(date(2024, 6, 15)));
        let dates = strip.dates();
        assert_eq!(dates.len(), 10);
        assert_eq!(dates[0], date(2024, 6, 15));
        assert_eq!(dates[9], date(2024, 6, 6));
    }

    #[test]
    fn test_selection_by_date_scrolls_to_it() {
        let mut strip = DateStripState::new(config(date(2024, 6, 15)));

        strip.set_selected_date(Some(date(2024, 6, 12)));
        assert_eq!(strip.selected_index(), Some(3));
        assert_eq!(strip.take_scroll_request(), Some(3));

        strip.set_selected_date(None);
        assert_eq!(strip.selected_index(), None);
        assert_eq!(strip.take_scroll_request(), None);
    }

    #[test]
    fn test_selection_of_unloaded_date_stays_pending() {
        let mut strip = DateStripState::new(config(date(2024, 6, 15)));
        strip.set_selected_date(Some(date(2024, 1, 1)));
        assert_eq!(strip.selected_index(), None);
        assert_eq!(strip.take_scroll_request(), None);
    }

    #[test]
    fn test_disabled_date_swallows_activation() {
        let events: std::rc::Rc<std::cell::RefCell<Vec<NaiveDate>>> = std::rc::Rc::default();
        let seen = std::rc::Rc::clone(&events);
        let policy = DatePolicy::new().disable(date(2024, 6, 14));
        let mut strip = DateStripState::with_policy(config(date(2024, 6, 15)), policy)
            .on_date_select(move |selected: &NaiveDate, _previous: Option<&NaiveDate>| {
                seen.borrow_mut().push(*selected);
            });

        strip.activate_date(1); // 2024-06-14, disabled
        assert!(events.borrow().is_empty());
        assert_eq!(strip.take_scroll_request(), None);

        strip.activate_date(2); // 2024-06-13, enabled
        assert_eq!(&*events.borrow(), &[date(2024, 6, 13)]);
        assert_eq!(strip.take_scroll_request(), Some(2));
    }

    #[test]
    fn test_out_of_range_tap_is_dropped() {
        let events: std::rc::Rc<std::cell::RefCell<Vec<NaiveDate>>> = std::rc::Rc::default();
        let seen = std::rc::Rc::clone(&events);
        let mut strip = DateStripState::new(config(date(2024, 6, 15)))
            .on_date_select(move |selected: &NaiveDate, _previous: Option<&NaiveDate>| {
                seen.borrow_mut().push(*selected);
            });

        strip.activate_date(99);
        assert!(events.borrow().is_empty());
        assert_eq!(strip.take_scroll_request(), None);
    }

    #[test]
    fn test_default_config_is_fifty_days_from_today() {
        // Bracket the clock read so a midnight rollover cannot flake.
        let before = Local::now().date_naive();
        let config = DateStripConfig::default();
        let after = Local::now().date_naive();

        assert_eq!(config.initial_count, 50);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.load_more_threshold, 5);
        assert!(
            (before..=after).contains(&config.origin),
            "origin reads the local date at construction"
        );
    }
}
