//! Shared type definitions for the fieldhint workspace.
//!
//! The wire records exchanged with the suggestion store live here together
//! with the message/effect vocabulary spoken between the suggestion engine
//! (pure state) and the runtimes that drive it (timers, HTTP, terminal).

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the suggestion store.
///
/// Backends disagree on whether identifiers are numeric or textual, so both
/// shapes are accepted when decoding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuggestionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for SuggestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

fn default_usage_count() -> u32 {
    1
}

/// A previously committed value for one field category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Store-assigned identifier.
    pub id: SuggestionId,
    /// The stored text.
    pub value: String,
    /// How many times the same trimmed value was committed (always >= 1).
    #[serde(default = "default_usage_count")]
    pub usage_count: u32,
}

impl Suggestion {
    pub fn new(id: SuggestionId, value: impl Into<String>, usage_count: u32) -> Self {
        Self {
            id,
            value: value.into(),
            usage_count: usage_count.max(1),
        }
    }

    /// Label suffix shown next to a dropdown row; only repeated values carry one.
    pub fn usage_badge(&self) -> Option<String> {
        (self.usage_count > 1).then(|| format!("×{}", self.usage_count))
    }
}

/// Tag partitioning the suggestion namespace, e.g. `client_notes`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldType(String);

impl FieldType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Body of the save (commit) call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSuggestion {
    pub field_type: FieldType,
    pub value: String,
}

/// Visible state of a widget's dropdown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DropdownState {
    #[default]
    Closed,
    /// A query is in flight; the dropdown shows a loading indicator.
    Loading,
    /// Results arrived; zero rows is a valid open state.
    Open,
}

impl DropdownState {
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Timers owned by a single widget instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Quiet period after the last keystroke before querying.
    Debounce,
    /// Window after a blur during which focus may still move into the dropdown.
    BlurGrace,
}

/// Which part of a widget a pointer-down landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    Input,
    /// Dropdown area, with the row index when a row was hit.
    Dropdown(Option<usize>),
    Outside,
}

/// Keys the engine reacts to; editing keys arrive as `Msg::TextChanged`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetKey {
    Escape,
    ArrowDown,
    ArrowUp,
    Enter,
}

/// Result of a suggestion query as seen by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Vec<Suggestion>),
    /// The store failed; the message is only ever logged.
    Failed(String),
}

/// Messages delivered to a suggestion engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Msg {
    /// The user edited the text; carries the complete new value.
    TextChanged(String),
    /// The input element received focus.
    FocusGained,
    /// The input element lost focus.
    FocusLost,
    /// A key was pressed while the input or a dropdown row had focus.
    Key(WidgetKey),
    /// A pointer-down event, already classified against the widget's regions.
    PointerDown(PointerTarget),
    /// A dropdown row was activated (click or Enter on a focused row).
    CandidateSelected(usize),
    /// A previously started timer fired.
    TimerElapsed { timer: TimerKind, token: u64 },
    /// A search dispatched with `request_id` finished.
    SearchCompleted { request_id: u64, outcome: SearchOutcome },
    /// The widget is being torn down.
    Teardown,
}

/// Side effects requested by a suggestion engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Start (or restart) a timer; an elapsed message must echo `token`.
    StartTimer { timer: TimerKind, delay: Duration, token: u64 },
    /// Cancel a timer if it is still pending.
    CancelTimer(TimerKind),
    /// Query the store.
    Search {
        request_id: u64,
        field_type: FieldType,
        query: String,
    },
    /// Fire-and-forget ingestion of a finalised value.
    Commit { field_type: FieldType, value: String },
    /// Controlled-input notifier: the value owned by the widget changed.
    ValueChanged(String),
    /// Blur notifier for the host form.
    Blurred,
    /// Programmatically release focus from the input.
    ReleaseFocus,
    /// Move focus to the dropdown row at the index.
    FocusCandidate(usize),
    /// Start routing outside pointer events to this widget.
    WatchOutside,
    /// Stop routing outside pointer events to this widget.
    UnwatchOutside,
}

/// Terminal cell coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in terminal cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && u32::from(point.x) < u32::from(self.x) + u32::from(self.width)
            && u32::from(point.y) < u32::from(self.y) + u32::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_accepts_numeric_and_textual_ids() {
        let json = r#"[
            {"id": 7, "value": "UAB Vilniaus krovos", "usage_count": 3},
            {"id": "b8f1", "value": "Kaunas"}
        ]"#;
        let suggestions: Vec<Suggestion> = serde_json::from_str(json).expect("deserialize suggestions");
        assert_eq!(suggestions[0].id, SuggestionId::Number(7));
        assert_eq!(suggestions[0].usage_count, 3);
        assert_eq!(suggestions[1].id, SuggestionId::Text("b8f1".into()));
        assert_eq!(suggestions[1].usage_count, 1, "missing usage_count defaults to 1");
    }

    #[test]
    fn usage_badge_only_for_repeated_values() {
        let once = Suggestion::new(SuggestionId::Number(1), "a", 1);
        let thrice = Suggestion::new(SuggestionId::Number(2), "b", 3);
        assert_eq!(once.usage_badge(), None);
        assert_eq!(thrice.usage_badge().as_deref(), Some("×3"));
    }

    #[test]
    fn save_body_serializes_flat_field_type() {
        let body = SaveSuggestion {
            field_type: FieldType::from("client_notes"),
            value: "Fragile".into(),
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json, serde_json::json!({"field_type": "client_notes", "value": "Fragile"}));
    }

    #[test]
    fn region_contains_is_half_open() {
        let region = Region::new(2, 3, 4, 2);
        assert!(region.contains(Point::new(2, 3)));
        assert!(region.contains(Point::new(5, 4)));
        assert!(!region.contains(Point::new(6, 4)));
        assert!(!region.contains(Point::new(2, 5)));
        assert!(!Region::default().contains(Point::new(0, 0)));
    }
}
