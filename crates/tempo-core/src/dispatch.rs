//! Exactly-once delivery of completion and work/rest notifications.
//!
//! Evaluation and delivery are two separate phases. [`CompletionDispatcher::on_evaluation`]
//! and [`CompletionDispatcher::observe_phase`] only queue; nothing reaches the
//! hooks until [`CompletionDispatcher::flush`], which the host calls after the
//! evaluation pass has returned. A hook is therefore free to stop or reset the
//! timer without touching state that an in-progress pass is still reading.
//! Nothing reaches the hooks of a timer that was stopped in between.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Receives notifications from a timer instance.
pub trait TimerHooks {
    fn on_countdown_complete(&mut self) {}
    fn on_work_rest_transition(&mut self, _is_work: bool) {}
}

impl TimerHooks for () {}

/// Records notifications in delivery order.
impl TimerHooks for Vec<Notification> {
    fn on_countdown_complete(&mut self) {
        self.push(Notification::CountdownComplete);
    }

    fn on_work_rest_transition(&mut self, is_work: bool) {
        self.push(Notification::WorkRestTransition { is_work });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    CountdownComplete,
    WorkRestTransition { is_work: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Latch {
    Armed,
    /// Queued but not yet delivered.
    Pending,
    Fired,
}

/// Per-instance latch and edge detector.
///
/// The completion latch is re-armed only by [`reset`](Self::reset) (or by
/// building a new dispatcher), never by observing positive remaining time
/// again.
#[derive(Debug, Clone)]
pub struct CompletionDispatcher {
    latch: Latch,
    /// Phase seen by the last running evaluation.
    previous_is_work: Option<bool>,
    /// Phase last delivered to the hooks.
    announced_is_work: Option<bool>,
    queue: VecDeque<Notification>,
}

impl Default for CompletionDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionDispatcher {
    pub fn new() -> Self {
        Self {
            latch: Latch::Armed,
            previous_is_work: None,
            announced_is_work: None,
            queue: VecDeque::new(),
        }
    }

    /// Queue completion if the countdown has crossed zero while running and
    /// has not completed before.
    pub fn on_evaluation(&mut self, past_zero: bool, running: bool) {
        if past_zero && running && self.latch == Latch::Armed {
            tracing::debug!("countdown crossed zero; completion queued");
            self.latch = Latch::Pending;
            self.queue.push_back(Notification::CountdownComplete);
        }
    }

    /// Queue a transition if `is_work` differs from the previous evaluation.
    ///
    /// The first running evaluation of an instance announces its phase once.
    pub fn observe_phase(&mut self, is_work: bool, running: bool) {
        match self.previous_is_work {
            None if !running => return,
            Some(prev) if prev == is_work => return,
            _ => {}
        }
        tracing::debug!(is_work, "work/rest transition queued");
        self.previous_is_work = Some(is_work);
        self.queue.push_back(Notification::WorkRestTransition { is_work });
    }

    /// Deliver everything queued since the last flush.
    ///
    /// `running` must be read after the evaluation pass returned. Anything
    /// that finds the timer stopped is dropped. A dropped completion re-arms
    /// the latch, and a dropped transition rolls the edge detector back to the
    /// last delivered phase, so the next running evaluation can still report
    /// either one.
    pub fn flush<H: TimerHooks + ?Sized>(
        &mut self,
        running: bool,
        hooks: &mut H,
    ) -> Vec<Notification> {
        let mut delivered = Vec::with_capacity(self.queue.len());
        while let Some(notification) = self.queue.pop_front() {
            match notification {
                Notification::CountdownComplete => {
                    if !running {
                        tracing::debug!("timer stopped before completion was delivered; dropped");
                        self.latch = Latch::Armed;
                        continue;
                    }
                    self.latch = Latch::Fired;
                    hooks.on_countdown_complete();
                }
                Notification::WorkRestTransition { is_work } => {
                    if !running {
                        tracing::debug!(is_work, "timer stopped; transition dropped");
                        self.previous_is_work = self.announced_is_work;
                        continue;
                    }
                    self.announced_is_work = Some(is_work);
                    hooks.on_work_rest_transition(is_work);
                }
            }
            delivered.push(notification);
        }
        delivered
    }

    pub fn has_fired(&self) -> bool {
        self.latch == Latch::Fired
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Re-arm for a fresh run: clears the latch, the previous phase and
    /// anything still queued.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_is_deferred_until_flush() {
        let mut d = CompletionDispatcher::new();
        let mut seen: Vec<Notification> = Vec::new();

        d.on_evaluation(true, true);
        assert!(d.has_pending());
        assert!(seen.is_empty());

        d.flush(true, &mut seen);
        assert_eq!(seen, vec![Notification::CountdownComplete]);
        assert!(d.has_fired());
    }

    #[test]
    fn completion_fires_once() {
        let mut d = CompletionDispatcher::new();
        let mut seen: Vec<Notification> = Vec::new();
        for _ in 0..100 {
            d.on_evaluation(true, true);
            d.flush(true, &mut seen);
        }
        assert_eq!(seen, vec![Notification::CountdownComplete]);
    }

    #[test]
    fn positive_remaining_does_not_rearm() {
        let mut d = CompletionDispatcher::new();
        let mut seen: Vec<Notification> = Vec::new();
        d.on_evaluation(true, true);
        d.flush(true, &mut seen);
        d.on_evaluation(false, true);
        d.on_evaluation(true, true);
        d.flush(true, &mut seen);
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn stopped_before_flush_suppresses_and_rearms() {
        let mut d = CompletionDispatcher::new();
        let mut seen: Vec<Notification> = Vec::new();

        d.on_evaluation(true, true);
        assert!(d.flush(false, &mut seen).is_empty());
        assert!(seen.is_empty());
        assert!(!d.has_fired());

        d.on_evaluation(true, true);
        d.flush(true, &mut seen);
        assert_eq!(seen, vec![Notification::CountdownComplete]);
    }

    #[test]
    fn not_running_never_queues_completion() {
        let mut d = CompletionDispatcher::new();
        d.on_evaluation(true, false);
        assert!(!d.has_pending());
    }

    #[test]
    fn transitions_are_edge_triggered() {
        let mut d = CompletionDispatcher::new();
        let mut seen: Vec<Notification> = Vec::new();

        for is_work in [true, true, true, false, false, true, true] {
            d.observe_phase(is_work, true);
            d.flush(true, &mut seen);
        }
        assert_eq!(
            seen,
            vec![
                Notification::WorkRestTransition { is_work: true },
                Notification::WorkRestTransition { is_work: false },
                Notification::WorkRestTransition { is_work: true },
            ]
        );
    }

    #[test]
    fn initial_announcement_waits_for_running() {
        let mut d = CompletionDispatcher::new();
        let mut seen: Vec<Notification> = Vec::new();
        d.observe_phase(true, false);
        d.flush(false, &mut seen);
        assert!(seen.is_empty());

        d.observe_phase(true, true);
        d.flush(true, &mut seen);
        assert_eq!(seen, vec![Notification::WorkRestTransition { is_work: true }]);
    }

    #[test]
    fn stopped_before_flush_drops_transition_and_reports_it_later() {
        let mut d = CompletionDispatcher::new();
        let mut seen: Vec<Notification> = Vec::new();

        d.observe_phase(true, true);
        assert!(d.flush(false, &mut seen).is_empty());
        assert!(seen.is_empty());

        d.observe_phase(true, true);
        d.flush(true, &mut seen);
        assert_eq!(seen, vec![Notification::WorkRestTransition { is_work: true }]);

        // A dropped edge does not cause the delivered phase to repeat.
        d.observe_phase(false, true);
        d.flush(false, &mut seen);
        d.observe_phase(true, true);
        d.flush(true, &mut seen);
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn reset_rearms() {
        let mut d = CompletionDispatcher::new();
        let mut seen: Vec<Notification> = Vec::new();
        d.on_evaluation(true, true);
        d.flush(true, &mut seen);
        d.reset();
        assert!(!d.has_fired());
        d.on_evaluation(true, true);
        d.flush(true, &mut seen);
        assert_eq!(seen.len(), 2);
    }
}
