//! The strip's batch source: an infinite descending day feed.

use chrono::NaiveDate;
use endless_core::{BatchFuture, BatchSource};

use crate::days::descending_days;

/// [`BatchSource`] producing consecutive days, newest first.
///
/// Each batch continues one day past the last date in the snapshot; an empty
/// snapshot starts at `origin`. The feed never fails, and it only answers an
/// empty batch once the calendar's minimum date has been reached.
pub struct DayFeed {
    origin: NaiveDate,
    batch_size: usize,
}

impl DayFeed {
    pub fn new(origin: NaiveDate, batch_size: usize) -> Self {
        Self { origin, batch_size }
    }
}

impl BatchSource<NaiveDate> for DayFeed {
    fn load_batch(&mut self, current: &[NaiveDate]) -> BatchFuture<NaiveDate> {
        // Continuation point must be read out before the future is built;
        // the snapshot borrow ends when this call returns.
        let start = match current.last() {
            Some(last) => last.pred_opt(),
            None => Some(self.origin),
        };
        let count = self.batch_size;
        Box::pin(async move {
            Ok(match start {
                Some(start) => descending_days(start, count),
                None => Vec::new(),
            })
        })
    }
}
