//! Countdown display formatting

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Format remaining milliseconds as `HH:MM:SS`, or `MM:SS` when under an hour
pub fn format_countdown(remaining_ms: u64) -> String {
    let hours = remaining_ms / MS_PER_HOUR;
    let minutes = (remaining_ms / MS_PER_MINUTE) % 60;
    let seconds = (remaining_ms / MS_PER_SECOND) % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Format an optional remaining time; unset renders as zero
pub fn format_remaining(remaining_ms: Option<u64>) -> String {
    format_countdown(remaining_ms.unwrap_or(0))
}
