//! Date Formatting
//!
//! Absolute and relative ("3 hours ago") timestamp rendering for posts,
//! sessions, and profiles.

use chrono::{DateTime, Utc};

/// Format a timestamp as a full absolute date, e.g.
/// "January 5, 2024, 1:30:05 PM".
pub fn date_format(time: DateTime<Utc>) -> String {
    time.format("%B %-d, %Y, %-I:%M:%S %p").to_string()
}

/// Format a timestamp relative to now, e.g. "just now" or "3 weeks ago".
pub fn date_format_ago(time: DateTime<Utc>) -> String {
    date_format_ago_at(time, Utc::now())
}

/// Relative formatting against an explicit reference instant.
///
/// Buckets, from smallest to largest: "just now" under a minute,
/// "1 minute ago", minutes, "1 hour ago", hours, "Yesterday", days,
/// weeks, months, years. Timestamps in the future clamp to "just now".
pub fn date_format_ago_at(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - time).num_seconds().max(0);
    let day_diff = diff / 86_400;

    if day_diff == 0 {
        if diff < 60 {
            "just now".to_string()
        } else if diff < 120 {
            "1 minute ago".to_string()
        } else if diff < 3_600 {
            format!("{} minutes ago", diff / 60)
        } else if diff < 7_200 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", diff / 3_600)
        }
    } else if day_diff == 1 {
        "Yesterday".to_string()
    } else if day_diff < 7 {
        format!("{} days ago", day_diff)
    } else if day_diff < 31 {
        format!("{} weeks ago", (day_diff as u64).div_ceil(7))
    } else if day_diff < 365 {
        format!("{} months ago", (day_diff as u64).div_ceil(30))
    } else {
        format!("{} years ago", (day_diff as u64).div_ceil(365))
    }
}
