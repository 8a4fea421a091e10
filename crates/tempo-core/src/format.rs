//! Clock-style display strings for durations.

use chrono::Duration;

/// Format a duration as "HH:MM:SS.mmm".
///
/// Negative durations render as zero. Hours are not wrapped at 24.
pub fn format_hms_millis(d: Duration) -> String {
    let ms = d.num_milliseconds().max(0);
    format!("{}.{:03}", format_hms_ms(ms), ms % 1000)
}

/// Format a duration as "HH:MM:SS" (window/tab titles).
pub fn format_hms(d: Duration) -> String {
    format_hms_ms(d.num_milliseconds().max(0))
}

fn format_hms_ms(ms: i64) -> String {
    let total_secs = ms / 1000;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}
