//! Elapsed-time tracking.
//!
//! Elapsed time is never advanced incrementally; it is recomputed from the
//! start instant of the current running segment plus whatever was banked by
//! earlier segments.

use chrono::{DateTime, Duration, Utc};

use crate::clock::Clock;

/// Total elapsed duration.
///
/// - No `started_at`: the running segment has not begun, so the result is
///   `accumulated` (zero when absent).
/// - Otherwise: `(now - started_at) + accumulated`.
///
/// A clock that reads earlier than `started_at` contributes zero rather than
/// a negative delta.
pub fn elapsed<C: Clock + ?Sized>(
    clock: &C,
    started_at: Option<DateTime<Utc>>,
    accumulated: Option<Duration>,
) -> Duration {
    let banked = accumulated.unwrap_or_else(Duration::zero);
    match started_at {
        None => banked,
        Some(start) => segment(clock.now(), start) + banked,
    }
}

/// Length of the current running segment, clamped at zero.
pub(crate) fn segment(now: DateTime<Utc>, started_at: DateTime<Utc>) -> Duration {
    let delta = now - started_at;
    if delta < Duration::zero() {
        tracing::warn!(
            skew_ms = -delta.num_milliseconds(),
            "clock reads earlier than segment start; treating segment as empty"
        );
        return Duration::zero();
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn absent_start_returns_accumulated() {
        let clock = ManualClock::at_epoch();
        assert_eq!(
            elapsed(&clock, None, Some(Duration::seconds(42))),
            Duration::seconds(42)
        );
        assert_eq!(elapsed(&clock, None, None), Duration::zero());
    }

    #[test]
    fn running_segment_adds_to_banked_time() {
        let clock = ManualClock::at_epoch();
        let start = clock.now();
        clock.advance_ms(2_500);

        assert_eq!(elapsed(&clock, Some(start), None), Duration::milliseconds(2_500));
        assert_eq!(
            elapsed(&clock, Some(start), Some(Duration::seconds(10))),
            Duration::milliseconds(12_500)
        );
    }

    #[test]
    fn backward_clock_jump_is_clamped() {
        let clock = ManualClock::at_epoch();
        let start = clock.now() + Duration::seconds(5);

        assert_eq!(elapsed(&clock, Some(start), None), Duration::zero());
        assert_eq!(
            elapsed(&clock, Some(start), Some(Duration::seconds(3))),
            Duration::seconds(3)
        );
    }
}
