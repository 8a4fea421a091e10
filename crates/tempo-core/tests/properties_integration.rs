//! Property tests for the timing arithmetic.

use chrono::Duration;
use proptest::prelude::*;
use tempo_core::{elapsed, format_hms_millis, phase, remaining, Clock, ManualClock, TabataConfig};

proptest! {
    #[test]
    fn elapsed_without_start_is_accumulated(ms in 0i64..10_000_000_000) {
        let clock = ManualClock::at_epoch();
        let acc = Duration::milliseconds(ms);
        prop_assert_eq!(elapsed(&clock, None, Some(acc)), acc);
    }

    #[test]
    fn elapsed_is_monotonic(steps in proptest::collection::vec(0i64..5_000, 1..50)) {
        let clock = ManualClock::at_epoch();
        let start = clock.now();
        let mut last = elapsed(&clock, Some(start), None);
        for step in steps {
            clock.advance_ms(step);
            let next = elapsed(&clock, Some(start), None);
            prop_assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn stopped_remaining_is_idempotent(
        target in 0i64..1_000_000,
        acc in 0i64..2_000_000,
        drift in 0i64..1_000_000,
    ) {
        let clock = ManualClock::at_epoch();
        let target = Duration::milliseconds(target);
        let acc = Some(Duration::milliseconds(acc));
        let a = remaining(&clock, target, None, acc, false);
        clock.advance_ms(drift);
        let b = remaining(&clock, target, None, acc, false);
        prop_assert_eq!(a, b);
        prop_assert!(a >= Duration::zero());
    }

    #[test]
    fn phase_is_bounded(
        exercises in 1u32..12,
        rounds in 1u32..12,
        work in 1u32..60,
        rest in 1u32..60,
        fraction in 0.0f64..=1.0,
    ) {
        let config = TabataConfig::new(exercises, rounds, work, rest).unwrap();
        let total_ms = config.total_duration().num_milliseconds();
        let at = Duration::milliseconds((total_ms as f64 * fraction) as i64);
        let p = phase(at, &config);
        prop_assert!((1..=rounds).contains(&p.round));
        prop_assert!((1..=exercises).contains(&p.exercise));
    }

    #[test]
    fn phase_is_monotonic_as_time_runs_down(
        exercises in 1u32..6,
        rounds in 1u32..6,
        work in 1u32..10,
        rest in 1u32..10,
        step_ms in 37i64..997,
    ) {
        let config = TabataConfig::new(exercises, rounds, work, rest).unwrap();
        let mut at = config.total_duration();
        let mut last = phase(at, &config);
        while at > Duration::zero() {
            at = (at - Duration::milliseconds(step_ms)).max(Duration::zero());
            let next = phase(at, &config);
            prop_assert!((next.round, next.exercise) >= (last.round, last.exercise));
            last = next;
        }
    }

    #[test]
    fn formatting_has_fixed_fields(ms in 0i64..360_000_000) {
        let s = format_hms_millis(Duration::milliseconds(ms));
        prop_assert_eq!(s.len(), 12);
        prop_assert_eq!(&s[2..3], ":");
        prop_assert_eq!(&s[5..6], ":");
        prop_assert_eq!(&s[8..9], ".");
    }
}
