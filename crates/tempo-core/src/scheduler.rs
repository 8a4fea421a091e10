//! Refresh contract between the core and whatever drives it.
//!
//! The core owns no timers and does no work unless invoked. A host (an async
//! interval, a frame callback, a test loop) must:
//!
//! 1. while the timer is running, call the evaluation pass at least every
//!    [`RefreshPolicy::cadence`];
//! 2. deliver queued notifications after each pass returns and before the
//!    next pass begins;
//! 3. stop calling once a pass reports [`Refresh::Cease`] or the timer is torn
//!    down.

use std::time::Duration as StdDuration;

use crate::error::ConfigError;

/// Default re-evaluation cadence.
pub const DEFAULT_CADENCE_MS: u64 = 50;

/// Above this, zero-crossings and phase flips are visibly late.
const RECOMMENDED_MAX_CADENCE_MS: u64 = 100;

/// Whether the host should keep re-invoking the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Continue,
    Cease,
}

impl Refresh {
    pub fn from_running(running: bool) -> Self {
        if running {
            Refresh::Continue
        } else {
            Refresh::Cease
        }
    }

    pub fn should_continue(self) -> bool {
        self == Refresh::Continue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    cadence: StdDuration,
}

impl RefreshPolicy {
    pub fn new(cadence_ms: u64) -> Result<Self, ConfigError> {
        if cadence_ms == 0 {
            return Err(ConfigError::invalid("refresh.cadence_ms", "must be at least 1"));
        }
        if cadence_ms > RECOMMENDED_MAX_CADENCE_MS {
            tracing::warn!(
                cadence_ms,
                "refresh cadence above {RECOMMENDED_MAX_CADENCE_MS} ms; transitions will lag"
            );
        }
        Ok(Self {
            cadence: StdDuration::from_millis(cadence_ms),
        })
    }

    pub fn cadence(&self) -> StdDuration {
        self.cadence
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            cadence: StdDuration::from_millis(DEFAULT_CADENCE_MS),
        }
    }
}

/// Anything that can run one evaluate-then-deliver pass.
pub trait RefreshHost {
    fn pass(&mut self) -> Refresh;
}

impl<F: FnMut() -> Refresh> RefreshHost for F {
    fn pass(&mut self) -> Refresh {
        self()
    }
}

/// Drive a host synchronously until it ceases or `max_passes` is reached.
///
/// Returns the number of passes run. Useful wherever wall-clock cadence does
/// not matter, e.g. with a manual clock advanced inside the pass.
pub fn run_until_ceased<H: RefreshHost + ?Sized>(host: &mut H, max_passes: usize) -> usize {
    let mut passes = 0;
    while passes < max_passes {
        passes += 1;
        if !host.pass().should_continue() {
            break;
        }
    }
    passes
}
