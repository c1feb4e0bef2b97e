//! Time Sampling
//!
//! Animations are measured on the monotonic clock, deadlines on the wall
//! clock. A [`Moment`] samples both at once so every engine operation sees a
//! single, consistent "now" and tests can step time without sleeping.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// A point in time on both the monotonic and the wall clock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Moment {
    /// Monotonic instant, used for animation timing
    pub instant: Instant,
    /// Wall-clock time, used for deadlines and persisted timestamps
    pub wall: DateTime<Utc>,
}

impl Moment {
    /// Sample the current time
    #[must_use]
    pub fn now() -> Self {
        Self {
            instant: Instant::now(),
            wall: Utc::now(),
        }
    }

    /// Build a moment from explicit parts
    #[must_use]
    pub fn new(instant: Instant, wall: DateTime<Utc>) -> Self {
        Self { instant, wall }
    }

    /// The same moment shifted forward on both clocks
    #[must_use]
    pub fn after(&self, delta: Duration) -> Self {
        let wall_delta = chrono::Duration::from_std(delta).unwrap_or(chrono::Duration::MAX);
        Self {
            instant: self.instant + delta,
            wall: self
                .wall
                .checked_add_signed(wall_delta)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Monotonic time elapsed since an earlier instant (zero if `earlier` is later)
    #[must_use]
    pub fn since(&self, earlier: Instant) -> Duration {
        self.instant.saturating_duration_since(earlier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_after_moves_both_clocks() {
        let start = Moment::now();
        let later = start.after(Duration::from_millis(1500));

        assert_eq!(later.since(start.instant), Duration::from_millis(1500));
        assert_eq!((later.wall - start.wall).num_milliseconds(), 1500);
    }

    #[test]
    fn test_since_saturates() {
        let start = Moment::now();
        let later = start.after(Duration::from_secs(1));
        assert_eq!(start.since(later.instant), Duration::ZERO);
    }
}
