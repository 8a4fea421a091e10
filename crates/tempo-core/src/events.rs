//! Serde-tagged session events for hosts and the JSON output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tabata::Phase;
use crate::timer::ModeKind;

/// Every host-visible action and notification produces an Event.
/// The CLI prints them; other hosts may subscribe to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: ModeKind,
        at: DateTime<Utc>,
    },
    TimerStopped {
        elapsed_ms: i64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A new timer instance replaced the old one; latch and phase history
    /// start over.
    ModeSwitched {
        mode: ModeKind,
        at: DateTime<Utc>,
    },
    CountdownCompleted {
        at: DateTime<Utc>,
    },
    WorkRestTransition {
        is_work: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: ModeKind,
        running: bool,
        /// "HH:MM:SS.mmm" of what the timer shows.
        display: String,
        elapsed_ms: i64,
        /// Clamped remaining time; absent for the stopwatch.
        remaining_ms: Option<i64>,
        phase: Option<Phase>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// One line of JSON, for line-oriented consumers.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// `chrono::Duration` as signed integer milliseconds.
pub(crate) mod millis {
    use chrono::Duration;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(value.num_milliseconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let ms = i64::deserialize(d)?;
        Duration::try_milliseconds(ms)
            .ok_or_else(|| D::Error::custom(format!("{ms} ms is out of range")))
    }
}
