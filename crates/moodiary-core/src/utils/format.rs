use chrono::NaiveDate;

use crate::models::DIARY_DATE_FORMAT;

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a `YYYY-MM-DD` or RFC 3339 date for display
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if let Ok(day) = NaiveDate::parse_from_str(date, DIARY_DATE_FORMAT) {
        day.format("%a, %b %d %Y").to_string()
    } else {
        date.to_string()
    }
}

/// First non-empty line of an entry, shortened for list rows
pub fn preview(content: &str, max_len: usize) -> String {
    let line = content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    truncate_string(line, max_len)
}
