use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tempo", version, about = "Stopwatch, countdown and interval-training timer")]
struct Cli {
    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Use this config file instead of ~/.config/tempo/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a stopwatch until Ctrl-C
    Stopwatch {
        #[command(flatten)]
        run: commands::run::RunArgs,
    },
    /// Count down from a fixed duration
    Countdown {
        /// Countdown length in seconds (default from config)
        #[arg(long)]
        seconds: Option<u64>,
        #[command(flatten)]
        run: commands::run::RunArgs,
    },
    /// Run an interval-training program
    Tabata {
        #[command(flatten)]
        tabata: commands::TabataArgs,
        #[command(flatten)]
        run: commands::run::RunArgs,
    },
    /// Print the interval phase for a remaining time
    Phase {
        /// Remaining time in seconds (fractions allowed)
        #[arg(long)]
        remaining: f64,
        #[command(flatten)]
        tabata: commands::TabataArgs,
    },
    /// Format milliseconds as HH:MM:SS.mmm
    Format {
        millis: i64,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Stopwatch { run } => commands::run::stopwatch(config_path, run),
        Commands::Countdown { seconds, run } => commands::run::countdown(config_path, seconds, run),
        Commands::Tabata { tabata, run } => commands::run::tabata(config_path, tabata, run),
        Commands::Phase { remaining, tabata } => {
            commands::phase::run(config_path, remaining, tabata)
        }
        Commands::Format { millis } => commands::format::run(millis),
        Commands::Config { action } => commands::config::run(config_path, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
