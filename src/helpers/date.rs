//! Date helper functions
//!
//! Content dates are loose strings written by hand in front-matter
//! (`2024-01-01`, `2024-01`, `2025-10 ~ 2025-11`, `2025-10 ~ `). These
//! helpers parse them for ordering and format them for display without
//! ever failing: anything unparsable is passed through as text.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Separator between the start and the end of a project period
const PERIOD_SEPARATOR: char = '~';

/// Parse a date string in various formats
///
/// Returns `None` for anything that is not a recognizable date, including
/// period strings; use [`parse_period_start`] for those.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
        // Try parsing date only
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // Try RFC 3339 / ISO 8601
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    // Partial dates: year-month and bare year
    for (sep, fmt) in [('-', "%Y-%m-%d"), ('/', "%Y/%m/%d")] {
        if s.matches(sep).count() == 1 {
            if let Ok(d) = NaiveDate::parse_from_str(&format!("{}{}01", s, sep), fmt) {
                return d.and_hms_opt(0, 0, 0);
            }
        }
    }
    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        let year: i32 = s.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0);
    }

    None
}

/// Parse the start of a date or a period (`"2025-10 ~ 2025-11"` starts at 2025-10)
pub fn parse_period_start(s: &str) -> Option<NaiveDateTime> {
    match s.split_once(PERIOD_SEPARATOR) {
        Some((start, _)) => parse_date(start),
        None => parse_date(s),
    }
}

/// Display form of a project date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectPeriod {
    pub text: String,
    pub is_ongoing: bool,
}

impl ProjectPeriod {
    /// Format a project date string
    ///
    /// * `"2025-10 ~ "` is ongoing and displays as `"2025-10 ~"`
    /// * `"2025-10 ~ 2025-11"` is a closed period
    /// * anything else is a single date, shown trimmed
    pub fn parse(date: &str) -> Self {
        let trimmed = date.trim();

        if let Some(start) = trimmed.strip_suffix(PERIOD_SEPARATOR) {
            return Self {
                text: format!("{} ~", start.trim()).trim_start().to_string(),
                is_ongoing: true,
            };
        }

        if let Some((start, end)) = trimmed.split_once(PERIOD_SEPARATOR) {
            return Self {
                text: format!("{} ~ {}", start.trim(), end.trim()),
                is_ongoing: false,
            };
        }

        Self {
            text: trimmed.to_string(),
            is_ongoing: false,
        }
    }
}

/// Format a date string using a Moment.js-compatible format string
///
/// Unparsable input is returned trimmed but otherwise unchanged, and so is
/// every date when `format` holds a specifier chrono cannot render.
///
/// # Examples
/// ```ignore
/// format_date("2024-01-15 10:30:00", "YYYY-MM-DD") // -> "2024-01-15"
/// ```
pub fn format_date(date: &str, format: &str) -> String {
    let Some(dt) = parse_date(date) else {
        return date.trim().to_string();
    };

    let chrono_format = moment_to_chrono_format(format);
    let items: Vec<Item> = StrftimeItems::new(&chrono_format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        tracing::warn!("Invalid date format {:?}, showing dates as written", format);
        return date.trim().to_string();
    }

    dt.format_with_items(items.into_iter()).to_string()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each group so "MM" does not eat "MMMM"
    let replacements = [
        // Year
        ("YYYY", "%Y"),
        ("YY", "%y"),
        // Month
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        // Day of month
        ("DDDD", "%j"),
        ("DD", "%d"),
        // Hour
        ("HH", "%H"),
        ("hh", "%I"),
        // Minute, second
        ("mm", "%M"),
        ("ss", "%S"),
        // Day of week
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
