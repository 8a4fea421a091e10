//! Live timer display.
//!
//! This is the refresh host: a `tokio` interval re-runs the evaluation pass at
//! the configured cadence while the timer runs, and stops calling it once the
//! pass reports `Refresh::Cease` or Ctrl-C tears the timer down.

use std::io::Write;
use std::path::Path;

use chrono::Duration;
use clap::Args;
use tempo_core::{
    Clock, Config, Event, Frame, ModeKind, Refresh, RefreshHost, ScaledClock, Session, SystemClock,
    TimerHooks, TimerMode,
};
use tokio::time::MissedTickBehavior;

use super::{load_config, TabataArgs};

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Print events as JSON lines instead of a live display
    #[arg(long)]
    pub json: bool,
    /// Time acceleration factor (default from config)
    #[arg(long)]
    pub speed: Option<f64>,
}

pub fn stopwatch(
    config_path: Option<&Path>,
    args: RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    run(ModeKind::Stopwatch, config, args)
}

pub fn countdown(
    config_path: Option<&Path>,
    seconds: Option<u64>,
    args: RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;
    if let Some(seconds) = seconds {
        config.countdown.seconds = seconds;
    }
    run(ModeKind::Countdown, config, args)
}

pub fn tabata(
    config_path: Option<&Path>,
    tabata: TabataArgs,
    args: RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;
    tabata.apply(&mut config);
    run(ModeKind::Tabata, config, args)
}

fn run(
    kind: ModeKind,
    mut config: Config,
    args: RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::from_config(kind, &config)?;
    let policy = config.refresh_policy()?;
    if let Some(speed) = args.speed {
        config.behavior.speed = speed;
    }
    let speed = config.speed()?;

    let clock = ScaledClock::new(SystemClock, speed);
    let display = Display::new(args.json, session.mode());
    let mut host = LiveHost {
        session,
        clock,
        display,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let mut interval = tokio::time::interval(policy.cadence());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        host.start();
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if !host.pass().should_continue() {
                        break;
                    }
                }
                _ = &mut ctrl_c => {
                    tracing::info!("interrupted");
                    host.stop();
                    break;
                }
            }
        }
    });

    host.finish()
}

/// Session, clock and output, bundled so one refresh pass is one call.
struct LiveHost<C> {
    session: Session,
    clock: C,
    display: Display,
}

impl<C: Clock> LiveHost<C> {
    fn start(&mut self) {
        if let Some(event) = self.session.start(&self.clock) {
            self.display.event(&event);
        }
    }

    fn stop(&mut self) {
        if let Some(event) = self.session.stop(&self.clock) {
            self.display.event(&event);
        }
    }

    fn finish(self) -> Result<(), Box<dyn std::error::Error>> {
        let snapshot = self.session.snapshot(&self.clock);
        self.display.finish(&snapshot)
    }
}

impl<C: Clock> RefreshHost for LiveHost<C> {
    fn pass(&mut self) -> Refresh {
        let tick = self.session.tick(&self.clock, &mut self.display);
        for event in &tick.events {
            self.display.event(event);
        }
        if let Some(frame) = tick.frame {
            self.display.frame(&frame);
        }
        tick.refresh
    }
}

struct Display {
    json: bool,
    rounds: Option<u32>,
}

impl Display {
    fn new(json: bool, mode: TimerMode) -> Self {
        let rounds = match mode {
            TimerMode::Tabata(config) => Some(config.number_of_rounds()),
            _ => None,
        };
        Self { json, rounds }
    }

    fn frame(&self, frame: &Frame) {
        if self.json {
            return;
        }
        let mut line = frame.display_string();
        if let (Some(phase), Some(rounds)) = (frame.phase, self.rounds) {
            line.push_str(&format!(
                "  Exercise {}  Round {} of {}  {:<4}",
                phase.exercise,
                phase.round,
                rounds,
                phase.label().to_uppercase()
            ));
        }
        let title = tempo_core::format_hms(frame.display());
        let mut out = std::io::stdout().lock();
        // OSC 0 sets the terminal window title.
        let _ = write!(out, "\x1b]0;{title}\x07\r{line}");
        let _ = out.flush();
    }

    fn event(&self, event: &Event) {
        if !self.json {
            return;
        }
        match event.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!("failed to serialize event: {e}"),
        }
    }

    fn finish(&self, snapshot: &Event) -> Result<(), Box<dyn std::error::Error>> {
        if self.json {
            println!("{}", snapshot.to_json()?);
        } else if let Event::StateSnapshot { display, elapsed_ms, .. } = snapshot {
            println!("\r{display}");
            println!(
                "elapsed {}",
                tempo_core::format_hms_millis(Duration::milliseconds(*elapsed_ms))
            );
        }
        Ok(())
    }
}

impl TimerHooks for Display {
    fn on_countdown_complete(&mut self) {
        if !self.json {
            // Terminal bell, then keep the final frame on its own line.
            println!("\x07");
            println!("Done!");
        }
    }

    fn on_work_rest_transition(&mut self, is_work: bool) {
        if !self.json {
            println!();
            println!("\x07{}", if is_work { "WORK" } else { "REST" });
        }
    }
}
