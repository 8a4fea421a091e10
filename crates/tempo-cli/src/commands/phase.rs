use std::path::Path;

use chrono::Duration;
use tempo_core::phase;

use super::{load_config, TabataArgs};

pub fn run(
    config_path: Option<&Path>,
    remaining_secs: f64,
    tabata: TabataArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if !remaining_secs.is_finite() || remaining_secs < 0.0 {
        return Err(format!(
            "remaining must be a non-negative number of seconds, got {remaining_secs}"
        )
        .into());
    }
    let mut config = load_config(config_path)?;
    tabata.apply(&mut config);
    let tabata = config.tabata_config()?;

    let remaining = Duration::milliseconds((remaining_secs * 1000.0).round() as i64);
    let p = phase(remaining, &tabata);
    println!("{}", serde_json::to_string(&p)?);
    Ok(())
}
