//! Which days of the strip can actually be picked.

use chrono::NaiveDate;
use rustc_hash::FxHashSet;

/// Enablement rules for strip entries.
///
/// A date is enabled when every configured rule passes: it is not in the
/// disabled set, it lies within the optional `min`/`max` bounds (inclusive),
/// and the optional custom predicate accepts it. An empty policy enables
/// everything.
///
/// The strip still *shows* disabled dates; this only gates activation.
#[derive(Default)]
pub struct DatePolicy {
    disabled: FxHashSet<NaiveDate>,
    min_date: Option<NaiveDate>,
    max_date: Option<NaiveDate>,
    predicate: Option<Box<dyn Fn(NaiveDate) -> bool>>,
}

impl DatePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables one date.
    pub fn disable(mut self, date: NaiveDate) -> Self {
        self.disabled.insert(date);
        self
    }

    /// Disables every date in `dates`.
    pub fn disable_all(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.disabled.extend(dates);
        self
    }

    /// Earliest enabled date (inclusive).
    pub fn min_date(mut self, date: NaiveDate) -> Self {
        self.min_date = Some(date);
        self
    }

    /// Latest enabled date (inclusive).
    pub fn max_date(mut self, date: NaiveDate) -> Self {
        self.max_date = Some(date);
        self
    }

    /// Custom rule, ANDed with the others.
    pub fn predicate(mut self, predicate: impl Fn(NaiveDate) -> bool + 'static) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// True when `date` passes every configured rule.
    pub fn is_enabled(&self, date: NaiveDate) -> bool {
        !self.disabled.contains(&date)
            && self.min_date.map_or(true, |min| date >= min)
            && self.max_date.map_or(true, |max| date <= max)
            && self.predicate.as_ref().map_or(true, |pred| pred(date))
    }
}
