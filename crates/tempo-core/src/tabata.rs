//! Interval-training ("Tabata") phase calculation.
//!
//! Phase is never stored or advanced. It is derived from the remaining time
//! and the configuration on every evaluation, so it always agrees with the
//! displayed remaining time no matter how irregular the refresh cadence is.
//!
//! ## Layout
//!
//! ```text
//! |<------------------ round 1 ------------------>|<-- round 2 ...
//! | ex 1: work E | rest R | ex 2: work E | rest R | ...
//! ```
//!
//! All arithmetic is on integer milliseconds with ceiling division, so a
//! label holds for the whole second it names rather than flipping at `.000`.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Validated interval-training configuration.
///
/// Construction rejects any zero field, so the divisors used by [`phase`]
/// are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTabataConfig", into = "RawTabataConfig")]
pub struct TabataConfig {
    exercises_per_round: u32,
    number_of_rounds: u32,
    seconds_per_exercise: u32,
    seconds_of_rest: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawTabataConfig {
    exercises_per_round: u32,
    number_of_rounds: u32,
    seconds_per_exercise: u32,
    seconds_of_rest: u32,
}

impl TryFrom<RawTabataConfig> for TabataConfig {
    type Error = ConfigError;

    fn try_from(raw: RawTabataConfig) -> Result<Self, Self::Error> {
        TabataConfig::new(
            raw.exercises_per_round,
            raw.number_of_rounds,
            raw.seconds_per_exercise,
            raw.seconds_of_rest,
        )
    }
}

impl From<TabataConfig> for RawTabataConfig {
    fn from(c: TabataConfig) -> Self {
        RawTabataConfig {
            exercises_per_round: c.exercises_per_round,
            number_of_rounds: c.number_of_rounds,
            seconds_per_exercise: c.seconds_per_exercise,
            seconds_of_rest: c.seconds_of_rest,
        }
    }
}

impl TabataConfig {
    pub fn new(
        exercises_per_round: u32,
        number_of_rounds: u32,
        seconds_per_exercise: u32,
        seconds_of_rest: u32,
    ) -> Result<Self, ConfigError> {
        for (key, value) in [
            ("exercises_per_round", exercises_per_round),
            ("number_of_rounds", number_of_rounds),
            ("seconds_per_exercise", seconds_per_exercise),
            ("seconds_of_rest", seconds_of_rest),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(key, "must be at least 1"));
            }
        }

        let total_ms = u64::from(number_of_rounds)
            .checked_mul(u64::from(exercises_per_round))
            .and_then(|n| {
                n.checked_mul(u64::from(seconds_per_exercise) + u64::from(seconds_of_rest))
            })
            .and_then(|secs| secs.checked_mul(1000))
            .filter(|&ms| ms <= i64::MAX as u64);
        if total_ms.is_none() {
            return Err(ConfigError::invalid(
                "number_of_rounds",
                "total interval duration is too large",
            ));
        }

        Ok(Self {
            exercises_per_round,
            number_of_rounds,
            seconds_per_exercise,
            seconds_of_rest,
        })
    }

    /// The classic 8 rounds of 8 exercises, 20 s work / 10 s rest.
    pub fn classic() -> Self {
        Self {
            exercises_per_round: 8,
            number_of_rounds: 8,
            seconds_per_exercise: 20,
            seconds_of_rest: 10,
        }
    }

    pub fn exercises_per_round(&self) -> u32 {
        self.exercises_per_round
    }

    pub fn number_of_rounds(&self) -> u32 {
        self.number_of_rounds
    }

    pub fn seconds_per_exercise(&self) -> u32 {
        self.seconds_per_exercise
    }

    pub fn seconds_of_rest(&self) -> u32 {
        self.seconds_of_rest
    }

    /// One exercise slot: work followed by rest.
    pub fn cycle_secs(&self) -> u64 {
        u64::from(self.seconds_per_exercise) + u64::from(self.seconds_of_rest)
    }

    fn round_ms(&self) -> u64 {
        self.cycle_secs() * 1000 * u64::from(self.exercises_per_round)
    }

    fn total_ms(&self) -> u64 {
        self.round_ms() * u64::from(self.number_of_rounds)
    }

    /// Full countdown length: rounds x exercises x (work + rest).
    pub fn total_duration(&self) -> Duration {
        Duration::milliseconds(self.total_ms() as i64)
    }
}

impl Default for TabataConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// Where in the interval program a given remaining time falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Ascending, `1..=number_of_rounds`.
    pub round: u32,
    /// Ascending within the round, `1..=exercises_per_round`.
    pub exercise: u32,
    pub is_work: bool,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        if self.is_work {
            "Work"
        } else {
            "Rest"
        }
    }
}

/// Derive round, exercise and work/rest from remaining time.
///
/// Remaining time outside `[0, total]` is clamped into it. At exactly zero
/// the program is over: the final round's final exercise is reported, in its
/// rest phase.
pub fn phase(remaining: Duration, config: &TabataConfig) -> Phase {
    let total_ms = config.total_ms();
    let remaining_ms = remaining.num_milliseconds().max(0).unsigned_abs().min(total_ms);

    let cycle_ms = config.cycle_secs() * 1000;
    let round_ms = config.round_ms();
    let exercises = u64::from(config.exercises_per_round);
    let rounds = u64::from(config.number_of_rounds);

    // Rounds and exercises left, counting the current one.
    let rounds_left = remaining_ms.div_ceil(round_ms).max(1);
    let remaining_this_round_ms = remaining_ms - (rounds_left - 1) * round_ms;
    let slots_left = remaining_this_round_ms.div_ceil(cycle_ms).max(1);

    // Seconds into the current slot, from the whole seconds still to go.
    // Slot boundaries sit on multiples of the cycle, so the offset is zero
    // exactly when a slot (and its work interval) begins.
    let cycle = config.cycle_secs();
    let whole_secs = remaining_ms.div_ceil(1000);
    let into_slot = (cycle - whole_secs % cycle) % cycle;
    let is_work = whole_secs > 0 && into_slot < u64::from(config.seconds_per_exercise);

    Phase {
        round: (1 + rounds - rounds_left) as u32,
        exercise: (1 + exercises - slots_left) as u32,
        is_work,
    }
}
