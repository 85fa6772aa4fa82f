//! Free-text sanitization.

use crate::error::ValidationError;

/// Default length cap applied to free-text fields.
pub const DEFAULT_MAX_LEN: usize = 100;

/// Entity-escapes `< > " ' &` without trimming or truncating.
///
/// Safe for both element content and double- or single-quoted attribute
/// values; the returned string contains none of the five raw characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Trims, truncates to `max_len` characters, and entity-escapes `< > " ' &`.
///
/// Truncation happens before escaping, so the character budget applies to
/// what the user typed rather than to the expanded entities.
pub fn sanitize_text(input: &str, max_len: usize) -> String {
    let truncated: String = input.trim().chars().take(max_len).collect();
    escape_html(&truncated)
}

/// Sanitizes a required field, rejecting input that is empty afterwards.
pub fn sanitize_required(
    input: &str,
    max_len: usize,
    field: &'static str,
) -> Result<String, ValidationError> {
    let sanitized = sanitize_text(input, max_len);
    if sanitized.is_empty() {
        Err(ValidationError::EmptyField { field })
    } else {
        Ok(sanitized)
    }
}
