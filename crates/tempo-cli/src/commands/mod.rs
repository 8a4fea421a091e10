use std::path::Path;

use clap::Args;
use tempo_core::{Config, ConfigError};

pub mod config;
pub mod format;
pub mod phase;
pub mod run;

/// Interval program flags; anything omitted comes from the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct TabataArgs {
    /// Exercises per round
    #[arg(long)]
    pub exercises: Option<u32>,
    /// Number of rounds
    #[arg(long)]
    pub rounds: Option<u32>,
    /// Seconds of work per exercise
    #[arg(long)]
    pub work: Option<u32>,
    /// Seconds of rest after each exercise
    #[arg(long)]
    pub rest: Option<u32>,
}

impl TabataArgs {
    /// Override the configured defaults. Validation happens when the
    /// merged settings are turned into a `TabataConfig`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(v) = self.exercises {
            config.tabata.exercises_per_round = v;
        }
        if let Some(v) = self.rounds {
            config.tabata.number_of_rounds = v;
        }
        if let Some(v) = self.work {
            config.tabata.seconds_per_exercise = v;
        }
        if let Some(v) = self.rest {
            config.tabata.seconds_of_rest = v;
        }
    }
}

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
