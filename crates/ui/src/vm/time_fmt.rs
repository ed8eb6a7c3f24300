use chrono::{DateTime, Utc};

/// Short clock time shown next to chat bubbles.
#[must_use]
pub fn format_clock_time(at: DateTime<Utc>) -> String {
    at.format("%H:%M").to_string()
}
