use chrono::Duration;
use tempo_core::format_hms_millis;

pub fn run(millis: i64) -> Result<(), Box<dyn std::error::Error>> {
    let d = Duration::try_milliseconds(millis).ok_or("duration out of range")?;
    println!("{}", format_hms_millis(d));
    Ok(())
}
