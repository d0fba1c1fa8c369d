//! # Text Processing Utilities
//!
//! Character-aware length/truncation helpers used by the suggestion widgets
//! (which must count Unicode scalars, not bytes, for inputs such as
//! `"Pristatymas į Vilnių"`) and secret redaction for log output.

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of Unicode scalar values in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Return at most `max_chars` leading characters of `text`, never splitting a
/// UTF-8 sequence.
///
/// # Example
/// ```rust
/// use fieldhint_util::truncate_chars;
///
/// assert_eq!(truncate_chars("Vilnių", 5), "Vilni");
/// assert_eq!(truncate_chars("abc", 10), "abc");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Truncate for single-line log summaries, appending `...` when shortened.
pub fn truncate_for_summary(text: &str, max_len: usize) -> String {
    let trimmed = text.trim();
    if char_len(trimmed) <= max_len {
        return trimmed.to_string();
    }
    // Reserve space for the trailing ellipsis.
    let head = truncate_chars(trimmed, max_len.saturating_sub(3)).trim_end();
    format!("{head}...")
}

/// Redacts values that look like secrets in a string.
///
/// Authorization headers, `*_TOKEN=`/`*_KEY=` assignments and `token=` query
/// parameters are replaced with `[REDACTED]` while the key names are kept.
///
/// # Example
/// ```rust
/// use fieldhint_util::redact_sensitive;
///
/// assert_eq!(
///     redact_sensitive("Authorization: Bearer abc.def"),
///     "Authorization: [REDACTED]"
/// );
/// assert_eq!(redact_sensitive("FIELDHINT_API_TOKEN=xyz"), "FIELDHINT_API_TOKEN=[REDACTED]");
/// ```
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in redact_patterns().iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}[REDACTED]")
            })
            .to_string();
    }
    redacted
}

fn redact_patterns() -> &'static Vec<Regex> {
    static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            r"(?i)(authorization:\s*)(?:bearer\s+)?[\w\-\.=:/+]+",
            r"(?i)([A-Z0-9_]*(?:KEY|TOKEN|SECRET|PASSWORD)=)[^\s&]+",
            r"(?i)([?&](?:token|api_key|access_token)=)[^\s&]+",
        ]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
    });
    &PATTERNS
}
