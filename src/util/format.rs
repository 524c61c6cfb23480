//! Display formatting for timestamps and long text.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// `2024-03-05T10:00:00Z` → `March 5, 2024`. Unparseable input is returned
/// unchanged.
#[must_use]
pub fn format_date(raw: &str) -> String {
    let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) else {
        return raw.to_owned();
    };
    parsed
        .format(format_description!("[month repr:long] [day padding:none], [year]"))
        .unwrap_or_else(|_| raw.to_owned())
}

/// Like [`format_date`] with the time of day, `March 5, 2024 10:00`.
#[must_use]
pub fn format_date_time(raw: &str) -> String {
    let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) else {
        return raw.to_owned();
    };
    parsed
        .format(format_description!("[month repr:long] [day padding:none], [year] [hour]:[minute]"))
        .unwrap_or_else(|_| raw.to_owned())
}

/// Cut `text` to at most `max_chars` characters, ending in `...` when cut.
/// Limits too small to fit the ellipsis cut without one.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    if max_chars < 3 {
        return text.chars().take(max_chars).collect();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}
