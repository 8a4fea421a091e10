//! Timer instances and the evaluation pass.
//!
//! A [`Timer`] pairs a mode with the per-instance notification state (the
//! completion latch and the previous work/rest phase). Switching modes means
//! building a new `Timer`; pausing and resuming keep the same one.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = Timer::new(TimerMode::Tabata(TabataConfig::classic()));
//! // In the host's refresh loop:
//! let frame = timer.evaluate(&state, &clock); // pure computation, queues only
//! timer.flush(state.running, &mut hooks);     // delivery, after the pass
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::countdown::{project, Projection};
use crate::dispatch::{CompletionDispatcher, Notification, TimerHooks};
use crate::format::format_hms_millis;
use crate::tabata::{phase, Phase, TabataConfig};
use crate::tracking::TimeTrackingState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Stopwatch,
    Countdown,
    Tabata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Counts up forever.
    Stopwatch,
    /// Counts down from a fixed duration.
    Countdown { target: Duration },
    /// Counts down through rounds of work/rest intervals.
    Tabata(TabataConfig),
}

impl TimerMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            TimerMode::Stopwatch => ModeKind::Stopwatch,
            TimerMode::Countdown { .. } => ModeKind::Countdown,
            TimerMode::Tabata(_) => ModeKind::Tabata,
        }
    }

    /// Countdown length. Recomputed from the config every time it is asked.
    pub fn target(&self) -> Option<Duration> {
        match self {
            TimerMode::Stopwatch => None,
            TimerMode::Countdown { target } => Some(*target),
            TimerMode::Tabata(config) => Some(config.total_duration()),
        }
    }
}

/// What one evaluation pass computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub elapsed: Duration,
    /// Present for countdown modes.
    pub projection: Option<Projection>,
    /// Present for the interval mode.
    pub phase: Option<Phase>,
}

impl Frame {
    /// The duration the timer shows: elapsed for the stopwatch, clamped
    /// remaining time otherwise.
    pub fn display(&self) -> Duration {
        match self.projection {
            Some(p) => p.remaining(),
            None => self.elapsed,
        }
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.projection.map(|p| p.remaining())
    }

    pub fn display_string(&self) -> String {
        format_hms_millis(self.display())
    }
}

/// One timer instance.
#[derive(Debug, Clone)]
pub struct Timer {
    mode: TimerMode,
    dispatcher: CompletionDispatcher,
}

impl Timer {
    pub fn new(mode: TimerMode) -> Self {
        Self {
            mode,
            dispatcher: CompletionDispatcher::new(),
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Replace the interval configuration in place.
    ///
    /// The latch and phase history are kept; the next evaluation uses the new
    /// configuration. Returns false when this is not an interval timer.
    pub fn set_tabata_config(&mut self, config: TabataConfig) -> bool {
        match &mut self.mode {
            TimerMode::Tabata(current) => {
                *current = config;
                true
            }
            _ => false,
        }
    }

    /// Replace the countdown length in place. Returns false for other modes.
    pub fn set_countdown_target(&mut self, new_target: Duration) -> bool {
        match &mut self.mode {
            TimerMode::Countdown { target } => {
                *target = new_target;
                true
            }
            _ => false,
        }
    }

    /// Run one evaluation pass.
    ///
    /// Reads the clock once. Notifications are queued, never delivered here;
    /// call [`flush`](Self::flush) once the pass has returned.
    pub fn evaluate<C: Clock + ?Sized>(&mut self, state: &TimeTrackingState, clock: &C) -> Frame {
        let frame = self.compute(state, clock);
        if let Some(phase) = frame.phase {
            self.dispatcher.observe_phase(phase.is_work, state.running);
        }
        if let Some(p) = frame.projection {
            self.dispatcher.on_evaluation(p.is_past_zero(), state.running);
        }
        frame
    }

    /// Compute a frame without touching the notification state.
    pub fn compute<C: Clock + ?Sized>(&self, state: &TimeTrackingState, clock: &C) -> Frame {
        let now = At(clock.now());
        let elapsed = state.elapsed(&now);

        let projection = self.mode.target().map(|target| {
            project(&now, target, state.started_at, state.accumulated, state.running)
        });

        let phase = match (self.mode, projection) {
            (TimerMode::Tabata(config), Some(p)) => Some(phase(p.remaining(), &config)),
            _ => None,
        };

        Frame {
            elapsed,
            projection,
            phase,
        }
    }

    /// Deliver queued notifications. `running` must reflect the state at the
    /// time of delivery, not at the time of evaluation.
    pub fn flush<H: TimerHooks + ?Sized>(
        &mut self,
        running: bool,
        hooks: &mut H,
    ) -> Vec<Notification> {
        self.dispatcher.flush(running, hooks)
    }

    pub fn has_completed(&self) -> bool {
        self.dispatcher.has_fired()
    }

    /// Re-arm for a fresh run of the same mode.
    pub fn rearm(&mut self) {
        self.dispatcher.reset();
    }
}

/// A single clock reading, so one pass sees one instant.
struct At(DateTime<Utc>);

impl Clock for At {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
