//! Integration tests for the interval timer: phases and transitions over a
//! full program.

use chrono::Duration;
use tempo_core::{
    phase, Clock, Event, ManualClock, Notification, Session, TabataConfig, TimeTrackingState, Timer,
    TimerMode,
};

fn classic_session(clock: &ManualClock) -> Session {
    let mut session = Session::new(TimerMode::Tabata(TabataConfig::classic()));
    session.start(clock);
    session
}

#[test]
fn test_reference_points() {
    let config = TabataConfig::classic();
    let total = config.total_duration();
    assert_eq!(total, Duration::seconds(1920));

    let start = phase(total, &config);
    assert_eq!((start.round, start.exercise, start.is_work), (1, 1, true));

    let rest = phase(total - Duration::seconds(25), &config);
    assert!(!rest.is_work);

    let second = phase(total - Duration::seconds(30), &config);
    assert_eq!((second.exercise, second.is_work), (2, true));
}

#[test]
fn test_transitions_once_per_boundary() {
    let clock = ManualClock::at_epoch();
    let mut session = classic_session(&clock);
    let mut seen: Vec<Notification> = Vec::new();

    // Most of two exercises at roughly 60 passes per second.
    session.tick(&clock, &mut seen);
    for _ in 0..(60 * 60) {
        clock.advance_ms(1000 / 60);
        session.tick(&clock, &mut seen);
    }

    let is_work: Vec<bool> = seen
        .iter()
        .map(|n| match n {
            Notification::WorkRestTransition { is_work } => *is_work,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    // Announcement, rest, work, rest.
    assert_eq!(is_work, vec![true, false, true, false]);
}

#[test]
fn test_full_program_notifications() {
    let clock = ManualClock::at_epoch();
    let config = TabataConfig::new(2, 2, 3, 2).unwrap();
    let mut session = Session::new(TimerMode::Tabata(config));
    session.start(&clock);

    let mut seen: Vec<Notification> = Vec::new();
    let mut events = Vec::new();
    let mut phases = Vec::new();
    while session.is_running() {
        let tick = session.tick(&clock, &mut seen);
        if let Some(p) = tick.frame.and_then(|f| f.phase) {
            phases.push(p);
        }
        events.extend(tick.events);
        clock.advance_ms(100);
    }

    // 4 exercises: announcement + (rest, work) x 3 + final rest.
    let transitions = seen
        .iter()
        .filter(|n| matches!(n, Notification::WorkRestTransition { .. }))
        .count();
    assert_eq!(transitions, 8);
    assert_eq!(
        seen.iter()
            .filter(|n| **n == Notification::CountdownComplete)
            .count(),
        1
    );
    assert!(matches!(events.last(), Some(Event::TimerStopped { .. })));

    // Bounded and monotonic.
    for pair in phases.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!((1..=2).contains(&b.round));
        assert!((1..=2).contains(&b.exercise));
        assert!((b.round, b.exercise) >= (a.round, a.exercise));
    }
}

#[test]
fn test_stop_and_resume_does_not_repeat_announcement() {
    let clock = ManualClock::at_epoch();
    let mut session = classic_session(&clock);
    let mut seen: Vec<Notification> = Vec::new();

    session.tick(&clock, &mut seen);
    clock.advance_ms(5_000);
    session.stop(&clock);
    clock.advance_ms(30_000);
    session.start(&clock);
    session.tick(&clock, &mut seen);

    assert_eq!(seen, vec![Notification::WorkRestTransition { is_work: true }]);
}

#[test]
fn test_stop_before_delivery_holds_back_transition() {
    let clock = ManualClock::at_epoch();
    let mut state = TimeTrackingState::new();
    state.start(clock.now());
    let mut timer = Timer::new(TimerMode::Tabata(TabataConfig::classic()));
    let mut seen: Vec<Notification> = Vec::new();

    timer.evaluate(&state, &clock);
    state.stop(clock.now());
    assert!(timer.flush(state.running, &mut seen).is_empty());
    assert!(seen.is_empty());

    // Resuming announces the phase that never reached the hooks.
    state.start(clock.now());
    timer.evaluate(&state, &clock);
    timer.flush(state.running, &mut seen);
    assert_eq!(seen, vec![Notification::WorkRestTransition { is_work: true }]);
}

#[test]
fn test_mode_switch_starts_fresh_history() {
    let clock = ManualClock::at_epoch();
    let mut session = classic_session(&clock);
    let mut seen: Vec<Notification> = Vec::new();
    session.tick(&clock, &mut seen);

    session.switch_mode(TimerMode::Tabata(TabataConfig::classic()));
    session.start(&clock);
    session.tick(&clock, &mut seen);

    assert_eq!(
        seen,
        vec![
            Notification::WorkRestTransition { is_work: true },
            Notification::WorkRestTransition { is_work: true },
        ]
    );
}

#[test]
fn test_config_change_mid_run_does_not_refire_completion() {
    let clock = ManualClock::at_epoch();
    let mut session = Session::new(TimerMode::Tabata(TabataConfig::new(1, 1, 1, 1).unwrap()))
        .with_stop_on_complete(false);
    session.start(&clock);
    let mut seen: Vec<Notification> = Vec::new();

    clock.advance_ms(2_100);
    session.tick(&clock, &mut seen);
    assert!(session.timer().has_completed());

    // A longer program puts remaining time back above zero.
    session
        .timer_mut()
        .set_tabata_config(TabataConfig::new(1, 1, 20, 10).unwrap());
    session.tick(&clock, &mut seen);
    clock.advance_ms(30_000);
    session.tick(&clock, &mut seen);

    let completions = seen
        .iter()
        .filter(|n| **n == Notification::CountdownComplete)
        .count();
    assert_eq!(completions, 1);
}
