//! Edge detection over the near-end predicate.
//!
//! Viewport signals arrive once per layout pass and repeat the same values
//! for as long as nothing moves, so acting on the predicate level would fire
//! a fetch every pass. This is the stream chain a Compose implementation
//! spells as `distinctUntilChanged().filter { it }`, written out as an
//! explicit previous-value flag.

/// Rising-edge detector for a boolean signal.
///
/// [`observe`](NearEndEdge::observe) returns true only when the value flips
/// from false to true, or when the very first observed value is already true
/// (a list short enough to sit near its end from the start must still load).
#[derive(Clone, Copy, Debug, Default)]
pub struct NearEndEdge {
    was_near: Option<bool>,
}

impl NearEndEdge {
    pub const fn new() -> Self {
        Self { was_near: None }
    }

    /// Feeds one predicate value; returns true on a rising edge.
    pub fn observe(&mut self, near: bool) -> bool {
        let rising = near && self.was_near != Some(true);
        self.was_near = Some(near);
        rising
    }

    /// Last observed value, defaulting to false before any observation.
    #[inline]
    pub fn is_near(&self) -> bool {
        self.was_near == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_true_observation_fires() {
        let mut edge = NearEndEdge::new();
        assert!(edge.observe(true));
    }

    #[test]
    fn test_rising_edge_fires_once() {
        let mut edge = NearEndEdge::new();
        assert!(!edge.observe(false));
        assert!(edge.observe(true));
        assert!(!edge.observe(true), "level must not re-fire");
        assert!(!edge.observe(true));
    }

    #[test]
    fn test_falling_edge_rearms() {
        let mut edge = NearEndEdge::new();
        assert!(edge.observe(true));
        assert!(!edge.observe(false));
        assert!(edge.observe(true));
    }

    #[test]
    fn test_is_near_tracks_level() {
        let mut edge = NearEndEdge::new();
        assert!(!edge.is_near());
        edge.observe(true);
        assert!(edge.is_near());
        edge.observe(false);
        assert!(!edge.is_near());
    }
}
