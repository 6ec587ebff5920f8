//! Human-readable duration formatting
//!
//! Consistent clock-style display for progress bars, module tables, and
//! the probe tool. Course content ranges from a few seconds (one caption)
//! to a few hours (a full course), so two formats cover everything.

/// Durations at or above one hour switch to H:MM:SS
const LONG_FORMAT_MIN: u64 = 3600;

/// Format seconds as `M:SS` (under an hour) or `H:MM:SS`
///
/// Fractional seconds are truncated; negative inputs clamp to zero (the
/// timeline has no negative positions to display).
///
/// # Examples
///
/// ```
/// use dcp_common::human_time::format_clock;
///
/// assert_eq!(format_clock(0.0), "0:00");
/// assert_eq!(format_clock(65.0), "1:05");
/// assert_eq!(format_clock(3599.9), "59:59");
/// assert_eq!(format_clock(3661.0), "1:01:01");
/// ```
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };

    if total < LONG_FORMAT_MIN {
        format!("{}:{:02}", total / 60, total % 60)
    } else {
        format!(
            "{}:{:02}:{:02}",
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}

/// Format an optional duration, rendering `None` as a placeholder
pub fn format_clock_opt(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) => format_clock(s),
        None => "--:--".to_string(),
    }
}
