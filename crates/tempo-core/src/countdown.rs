//! Remaining-time projection for countdowns.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::elapsed::elapsed;

/// Result of projecting a countdown at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    /// `target - elapsed`, may be negative.
    #[serde(with = "crate::events::millis")]
    pub unclamped: Duration,
}

impl Projection {
    /// Remaining time for display and phase purposes, floored at zero.
    pub fn remaining(&self) -> Duration {
        self.unclamped.max(Duration::zero())
    }

    /// True once the unclamped remaining time has gone below zero.
    pub fn is_past_zero(&self) -> bool {
        self.unclamped < Duration::zero()
    }
}

/// Project a countdown of `target` length.
///
/// While stopped with banked time the projection depends only on
/// `accumulated`, so repeated calls return the same value.
pub fn project<C: Clock + ?Sized>(
    clock: &C,
    target: Duration,
    started_at: Option<DateTime<Utc>>,
    accumulated: Option<Duration>,
    running: bool,
) -> Projection {
    let spent = match (running, accumulated) {
        (false, Some(banked)) => banked,
        _ => elapsed(clock, started_at, accumulated),
    };
    Projection {
        unclamped: target - spent,
    }
}

/// Remaining duration, floored at zero.
pub fn remaining<C: Clock + ?Sized>(
    clock: &C,
    target: Duration,
    started_at: Option<DateTime<Utc>>,
    accumulated: Option<Duration>,
    running: bool,
) -> Duration {
    project(clock, target, started_at, accumulated, running).remaining()
}
