//! Trailing-phrase helpers for free-text (multi-line) inputs.
//!
//! Long descriptions are not queried as a whole; only the last few words the
//! user is typing are sent to the store, and a chosen candidate replaces those
//! words in place.

/// Number of whitespace-separated tokens forming the trailing phrase.
pub const PHRASE_TOKENS: usize = 3;

/// Last [`PHRASE_TOKENS`] whitespace-separated tokens of `text`, joined by
/// single spaces. Empty when `text` holds no tokens.
///
/// # Example
/// ```rust
/// use fieldhint_engine::trailing_phrase;
///
/// assert_eq!(trailing_phrase("Pristatymas  į Vilnių\nrytoj"), "į Vilnių rytoj");
/// assert_eq!(trailing_phrase("  "), "");
/// ```
pub fn trailing_phrase(text: &str) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let start = tokens.len().saturating_sub(PHRASE_TOKENS);
    tokens[start..].join(" ")
}

/// Replace the trailing phrase of `text` with `candidate`.
///
/// When the phrase occurs verbatim, everything from its last occurrence to the
/// end is replaced by the candidate followed by exactly one space. Otherwise
/// (for example when the user separated the last words by a newline) the
/// candidate is appended, separated by a space when needed.
pub fn replace_trailing_phrase(text: &str, candidate: &str) -> String {
    let phrase = trailing_phrase(text);
    if !phrase.is_empty()
        && let Some(position) = text.rfind(&phrase)
    {
        return format!("{}{} ", &text[..position], candidate.trim_end());
    }

    if text.is_empty() || text.ends_with(char::is_whitespace) {
        format!("{text}{candidate}")
    } else {
        format!("{text} {candidate}")
    }
}
