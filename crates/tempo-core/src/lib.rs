//! # Tempo Core Library
//!
//! Time-tracking and phase-computation core for a stopwatch, a fixed-length
//! countdown and an interval-training ("Tabata") timer.
//!
//! ## Architecture
//!
//! - **Evaluation is recomputation**: elapsed time, remaining time and the
//!   interval phase are derived from a start instant and banked duration on
//!   every pass; nothing is advanced tick by tick, so missed or jittery
//!   refreshes cannot make the display drift.
//! - **Delivery is deferred**: completion and work/rest notifications are
//!   queued during a pass and delivered afterwards, exactly once each.
//! - **No threads, no timers**: the host re-invokes [`Session::tick`] (or
//!   [`Timer::evaluate`] + [`Timer::flush`]) while the timer runs, following
//!   the [`scheduler`] contract.
//!
//! ## Key Components
//!
//! - [`elapsed()`], [`countdown::remaining`], [`tabata::phase`]: pure
//!   computations over a [`Clock`]
//! - [`CompletionDispatcher`]: completion latch and work/rest edge detector
//! - [`Timer`]: one timer instance in one [`TimerMode`]
//! - [`Session`]: tracking state plus timer, with start/stop/reset commands
//! - [`Config`]: TOML configuration

pub mod clock;
pub mod config;
pub mod countdown;
pub mod dispatch;
pub mod elapsed;
pub mod error;
pub mod events;
pub mod format;
pub mod scheduler;
pub mod session;
pub mod tabata;
pub mod timer;
pub mod tracking;

pub use clock::{Clock, ManualClock, ScaledClock, SystemClock, MAX_SPEED};
pub use config::Config;
pub use countdown::{project, remaining, Projection};
pub use dispatch::{CompletionDispatcher, Notification, TimerHooks};
pub use elapsed::elapsed;
pub use error::{ConfigError, CoreError, Result};
pub use events::Event;
pub use format::{format_hms, format_hms_millis};
pub use scheduler::{Refresh, RefreshHost, RefreshPolicy};
pub use session::{Session, Tick};
pub use tabata::{phase, Phase, TabataConfig};
pub use timer::{Frame, ModeKind, Timer, TimerMode};
pub use tracking::TimeTrackingState;
