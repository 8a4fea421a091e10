//! Sources of the current instant.
//!
//! Every evaluation reads the clock exactly through this trait, so tests can
//! drive time by hand with [`ManualClock`] instead of sleeping.

use std::cell::Cell;

use chrono::{DateTime, Duration, Utc};

/// Supplies the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Single-threaded by construction (`Cell`), which matches the evaluation
/// model: passes never overlap.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Starts at the Unix epoch; handy when only differences matter.
    pub fn at_epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.advance(Duration::milliseconds(ms));
    }

    /// Jump to an arbitrary instant, including one in the past.
    pub fn set(&self, to: DateTime<Utc>) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Largest acceleration factor a configured [`ScaledClock`] accepts.
pub const MAX_SPEED: f64 = 1_000.0;

/// Runs an inner clock faster (or slower) than real time.
///
/// Time before `origin` is unaffected; time after it is stretched by `speed`.
/// Readings saturate at the ends of the representable range instead of
/// overflowing.
#[derive(Debug, Clone)]
pub struct ScaledClock<C> {
    inner: C,
    origin: DateTime<Utc>,
    speed: f64,
}

impl<C: Clock> ScaledClock<C> {
    pub fn new(inner: C, speed: f64) -> Self {
        let origin = inner.now();
        Self {
            inner,
            origin,
            speed,
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }
}

impl<C: Clock> Clock for ScaledClock<C> {
    fn now(&self) -> DateTime<Utc> {
        let real = self.inner.now() - self.origin;
        let saturated = if real >= Duration::zero() {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        };
        real.num_microseconds()
            .map(|us| us as f64 * self.speed)
            .filter(|us| us.abs() < i64::MAX as f64)
            .and_then(|us| self.origin.checked_add_signed(Duration::microseconds(us as i64)))
            .unwrap_or(saturated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_moves_only_when_advanced() {
        let clock = ManualClock::at_epoch();
        let t0 = clock.now();
        assert_eq!(clock.now(), t0);

        clock.advance_ms(1500);
        assert_eq!(clock.now() - t0, Duration::milliseconds(1500));
    }

    #[test]
    fn manual_clock_can_jump_backwards() {
        let clock = ManualClock::at_epoch();
        clock.advance_ms(10_000);
        clock.set(DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(clock.now(), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn scaled_clock_multiplies_elapsed_time() {
        let base = ManualClock::at_epoch();
        let fast = ScaledClock::new(&base, 4.0);
        let t0 = fast.now();

        base.advance_ms(250);
        assert_eq!(fast.now() - t0, Duration::milliseconds(1000));
    }

    #[test]
    fn scaled_clock_saturates_instead_of_overflowing() {
        let base = ManualClock::new(Utc::now());
        let fast = ScaledClock::new(&base, 1e15);
        base.advance_ms(10);
        assert_eq!(fast.now(), DateTime::<Utc>::MAX_UTC);

        base.advance_ms(-20);
        assert_eq!(fast.now(), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn clock_is_usable_through_a_reference() {
        fn read(clock: &dyn Clock) -> DateTime<Utc> {
            clock.now()
        }
        let clock = ManualClock::at_epoch();
        assert_eq!(read(&clock), DateTime::<Utc>::UNIX_EPOCH);
    }
}
