//! Host-side session: tracking state plus the current timer instance.
//!
//! `Session` plays the part of the widget that owns the state. Its commands
//! mutate [`TimeTrackingState`]; [`Session::tick`] runs one refresh pass.
//! Like the timer itself it never sleeps or spawns; the caller is
//! responsible for calling `tick()` periodically while it returns
//! [`Refresh::Continue`].

use chrono::Utc;

use crate::clock::Clock;
use crate::config::Config;
use crate::dispatch::{Notification, TimerHooks};
use crate::error::Result;
use crate::events::Event;
use crate::scheduler::Refresh;
use crate::timer::{Frame, ModeKind, Timer, TimerMode};
use crate::tracking::TimeTrackingState;

/// Outcome of one refresh pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub refresh: Refresh,
    /// Absent when the pass did no work.
    pub frame: Option<Frame>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone)]
pub struct Session {
    state: TimeTrackingState,
    timer: Timer,
    stop_on_complete: bool,
}

impl Session {
    pub fn new(mode: TimerMode) -> Self {
        Self {
            state: TimeTrackingState::new(),
            timer: Timer::new(mode),
            stop_on_complete: true,
        }
    }

    /// Build a session for `kind` from configured defaults.
    ///
    /// Fails before any timer exists if the relevant settings are invalid.
    pub fn from_config(kind: ModeKind, config: &Config) -> Result<Self> {
        let mode = match kind {
            ModeKind::Stopwatch => TimerMode::Stopwatch,
            ModeKind::Countdown => TimerMode::Countdown {
                target: config.countdown_target()?,
            },
            ModeKind::Tabata => TimerMode::Tabata(config.tabata_config()?),
        };
        Ok(Self::new(mode).with_stop_on_complete(config.behavior.stop_on_complete))
    }

    /// Whether completion stops the timer.
    pub fn with_stop_on_complete(mut self, stop: bool) -> Self {
        self.stop_on_complete = stop;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimeTrackingState {
        &self.state
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut Timer {
        &mut self.timer
    }

    pub fn mode(&self) -> TimerMode {
        self.timer.mode()
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Compute the current frame without queueing or delivering anything;
    /// for redrawing a stopped timer.
    pub fn frame<C: Clock + ?Sized>(&self, clock: &C) -> Frame {
        self.timer.compute(&self.state, clock)
    }

    /// Build a full state snapshot event.
    pub fn snapshot<C: Clock + ?Sized>(&self, clock: &C) -> Event {
        let frame = self.frame(clock);
        Event::StateSnapshot {
            mode: self.mode().kind(),
            running: self.state.running,
            display: frame.display_string(),
            elapsed_ms: frame.elapsed.num_milliseconds(),
            remaining_ms: frame.remaining().map(|d| d.num_milliseconds()),
            phase: frame.phase,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start<C: Clock + ?Sized>(&mut self, clock: &C) -> Option<Event> {
        if !self.state.start(clock.now()) {
            return None;
        }
        tracing::info!(mode = ?self.mode().kind(), "timer started");
        Some(Event::TimerStarted {
            mode: self.mode().kind(),
            at: Utc::now(),
        })
    }

    pub fn stop<C: Clock + ?Sized>(&mut self, clock: &C) -> Option<Event> {
        if !self.state.stop(clock.now()) {
            return None;
        }
        let elapsed_ms = self.state.elapsed(clock).num_milliseconds();
        tracing::info!(elapsed_ms, "timer stopped");
        Some(Event::TimerStopped {
            elapsed_ms,
            at: Utc::now(),
        })
    }

    /// Back to zero, with the completion latch re-armed.
    pub fn reset(&mut self) -> Event {
        self.state.reset();
        self.timer.rearm();
        tracing::info!("timer reset");
        Event::TimerReset { at: Utc::now() }
    }

    /// Replace the timer instance. Tracking state, latch and phase history
    /// are all discarded, including anything not yet delivered.
    pub fn switch_mode(&mut self, mode: TimerMode) -> Event {
        self.state.reset();
        self.timer = Timer::new(mode);
        tracing::info!(mode = ?mode.kind(), "mode switched");
        Event::ModeSwitched {
            mode: mode.kind(),
            at: Utc::now(),
        }
    }

    /// Run one refresh pass: evaluate, then deliver.
    ///
    /// Does nothing and returns [`Refresh::Cease`] while stopped. Delivery
    /// re-reads the running flag after the evaluation has returned, so a
    /// completion never reaches the hooks of a stopped timer.
    pub fn tick<C, H>(&mut self, clock: &C, hooks: &mut H) -> Tick
    where
        C: Clock + ?Sized,
        H: TimerHooks + ?Sized,
    {
        if !self.state.running {
            return Tick {
                refresh: Refresh::Cease,
                frame: None,
                events: Vec::new(),
            };
        }

        let frame = self.timer.evaluate(&self.state, clock);

        let delivered = self.timer.flush(self.state.running, hooks);
        let mut events = Vec::with_capacity(delivered.len());
        let mut completed = false;
        for notification in delivered {
            match notification {
                Notification::CountdownComplete => {
                    completed = true;
                    events.push(Event::CountdownCompleted { at: Utc::now() });
                }
                Notification::WorkRestTransition { is_work } => {
                    events.push(Event::WorkRestTransition {
                        is_work,
                        at: Utc::now(),
                    });
                }
            }
        }

        if completed && self.stop_on_complete {
            events.extend(self.stop(clock));
        }

        Tick {
            refresh: Refresh::from_running(self.state.running),
            frame: Some(frame),
            events,
        }
    }
}
