//! Input variants: the strategies that distinguish a single-line field from a
//! free-text (multi-line) field.
//!
//! The [`SuggestionEngine`](crate::SuggestionEngine) owns every state
//! transition; a variant only answers "what do we query for this value",
//! "what does the value look like once a candidate is chosen" and "what is
//! committed on blur".

use std::time::Duration;

use fieldhint_util::{WidgetSettings, char_len, truncate_chars};

use crate::phrase::{replace_trailing_phrase, trailing_phrase};

/// Strategy hooks plugged into the suggestion engine.
pub trait InputVariant: Send + 'static {
    /// Quiet period after the last keystroke before a query fires.
    fn debounce(&self) -> Duration;

    /// Minimum trimmed length (in characters) for querying and committing.
    fn min_length(&self) -> usize;

    /// Query text derived from `value`, or `None` when the guard suppresses
    /// the query.
    fn query_text(&self, value: &str) -> Option<String>;

    /// The new value after the user picks `candidate`.
    fn apply_candidate(&self, value: &str, candidate: &str) -> String;

    /// Text committed when the input is blurred without a selection, or
    /// `None` when nothing should be stored.
    fn commit_text(&self, value: &str) -> Option<String>;

    /// Whether Enter inserts a line break instead of being ignored.
    fn accepts_newlines(&self) -> bool {
        false
    }
}

/// Single-line field: the whole value is the query and the chosen candidate
/// becomes the whole value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleLine {
    pub min_length: usize,
    pub debounce: Duration,
}

impl SingleLine {
    pub const DEFAULT_MIN_LENGTH: usize = 2;
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

    pub fn new(min_length: usize) -> Self {
        Self {
            min_length,
            debounce: Self::DEFAULT_DEBOUNCE,
        }
    }

    pub fn from_settings(settings: &WidgetSettings) -> Self {
        Self {
            min_length: settings.single_line_min_length,
            debounce: Duration::from_millis(settings.single_line_debounce_ms),
        }
    }
}

impl Default for SingleLine {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_LENGTH)
    }
}

impl InputVariant for SingleLine {
    fn debounce(&self) -> Duration {
        self.debounce
    }

    fn min_length(&self) -> usize {
        self.min_length
    }

    fn query_text(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        (char_len(trimmed) >= self.min_length()).then(|| trimmed.to_string())
    }

    fn apply_candidate(&self, _value: &str, candidate: &str) -> String {
        candidate.to_string()
    }

    fn commit_text(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        (!trimmed.is_empty() && char_len(trimmed) >= self.min_length()).then(|| trimmed.to_string())
    }
}

/// Free-text field: only the trailing phrase is queried and replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiLine {
    pub debounce: Duration,
}

impl MultiLine {
    /// Minimum trailing-phrase length in characters.
    pub const MIN_PHRASE_LENGTH: usize = 3;
    /// Values longer than this are never queried.
    pub const MAX_QUERY_SOURCE_LENGTH: usize = 200;
    /// Committed values are capped to this many characters.
    pub const MAX_COMMIT_LENGTH: usize = 500;
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

    pub fn from_settings(settings: &WidgetSettings) -> Self {
        Self {
            debounce: Duration::from_millis(settings.multi_line_debounce_ms),
        }
    }
}

impl Default for MultiLine {
    fn default() -> Self {
        Self {
            debounce: Self::DEFAULT_DEBOUNCE,
        }
    }
}

impl InputVariant for MultiLine {
    fn debounce(&self) -> Duration {
        self.debounce
    }

    fn min_length(&self) -> usize {
        Self::MIN_PHRASE_LENGTH
    }

    fn query_text(&self, value: &str) -> Option<String> {
        if char_len(value) > Self::MAX_QUERY_SOURCE_LENGTH {
            return None;
        }
        let phrase = trailing_phrase(value);
        (char_len(&phrase) >= self.min_length()).then_some(phrase)
    }

    fn apply_candidate(&self, value: &str, candidate: &str) -> String {
        replace_trailing_phrase(value, candidate)
    }

    fn commit_text(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if char_len(trimmed) < self.min_length() {
            return None;
        }
        Some(truncate_chars(trimmed, Self::MAX_COMMIT_LENGTH).to_string())
    }

    fn accepts_newlines(&self) -> bool {
        true
    }
}
