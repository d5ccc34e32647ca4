//! An endless, selectable strip of dates.
//!
//! The strip starts at an origin day and grows backwards through the
//! calendar as the user scrolls: 50 days seeded, 50 more per fetch by
//! default. [`DateStripState`] is the headless widget state; a rendering
//! surface feeds it viewport signals and taps, and reads back dates,
//! selection, scroll requests, and enablement.

pub mod days;
pub mod feed;
pub mod policy;
pub mod strip;

pub use days::{descending_days, epoch_day_key};
pub use feed::DayFeed;
pub use policy::DatePolicy;
pub use strip::{DateStripConfig, DateStripState};
