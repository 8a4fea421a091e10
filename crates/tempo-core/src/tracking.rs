//! Time-tracking state owned by the host.
//!
//! The evaluation pass only ever reads this value. The `start`/`stop`/`reset`
//! actions are what a host wires to its buttons.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::elapsed::elapsed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeTrackingState {
    /// Whether the timer is actively accumulating time.
    pub running: bool,
    /// When the current running segment began.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Time banked by earlier segments. Absent means zero.
    #[serde(default, with = "opt_millis")]
    pub accumulated: Option<Duration>,
}

impl TimeTrackingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed time as the evaluation pass sees it.
    ///
    /// While stopped with banked time the value is frozen, so repeated calls
    /// agree regardless of the clock.
    pub fn elapsed<C: Clock + ?Sized>(&self, clock: &C) -> Duration {
        if !self.running {
            if let Some(banked) = self.accumulated {
                return banked;
            }
        }
        elapsed(clock, self.started_at, self.accumulated)
    }

    /// Begin a running segment. No-op while already running.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.started_at = Some(now);
        true
    }

    /// Bank the current segment and stop. No-op while stopped.
    pub fn stop(&mut self, now: DateTime<Utc>) -> bool {
        if !self.running {
            return false;
        }
        let banked = self.accumulated.unwrap_or_else(Duration::zero);
        let segment = self
            .started_at
            .map(|start| crate::elapsed::segment(now, start))
            .unwrap_or_else(Duration::zero);
        self.accumulated = Some(banked + segment);
        self.started_at = None;
        self.running = false;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// `Option<chrono::Duration>` as optional integer milliseconds.
mod opt_millis {
    use chrono::Duration;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.num_milliseconds()),
            None => s.serialize_none(),
        }
    }

    /// Banked time is never negative.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Option::<i64>::deserialize(d)?
            .map(|ms| {
                if ms < 0 {
                    return Err(D::Error::custom(format!("negative accumulated time: {ms} ms")));
                }
                Duration::try_milliseconds(ms)
                    .ok_or_else(|| D::Error::custom(format!("{ms} ms is out of range")))
            })
            .transpose()
    }
}
