//! Store-side suggestion policy shared by the local stores.
//!
//! Values are trimmed and compared case-sensitively within a field category.
//! Re-recording a known value bumps its usage counter instead of adding a
//! duplicate. Searches match case-insensitive substrings and rank by usage,
//! then recency.

use chrono::serde::ts_seconds;
use chrono::{DateTime, Utc};
use fieldhint_types::{FieldType, Suggestion, SuggestionId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredSuggestion {
    pub id: i64,
    pub value: String,
    pub usage_count: u32,
    #[serde(with = "ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

impl StoredSuggestion {
    fn to_suggestion(&self) -> Suggestion {
        Suggestion::new(SuggestionId::Number(self.id), self.value.clone(), self.usage_count)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct SuggestionCatalog {
    #[serde(default)]
    next_id: i64,
    #[serde(default)]
    fields: IndexMap<FieldType, Vec<StoredSuggestion>>,
}

impl SuggestionCatalog {
    /// Record `value` for `field_type`; returns `None` when the trimmed value is empty.
    pub fn record(&mut self, field_type: &FieldType, value: &str, max_entries: usize) -> Option<Suggestion> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        let now = Utc::now();
        let entries = self.fields.entry(field_type.clone()).or_default();
        if let Some(existing) = entries.iter_mut().find(|entry| entry.value == trimmed) {
            existing.usage_count = existing.usage_count.saturating_add(1);
            existing.updated_at = now;
            return Some(existing.to_suggestion());
        }

        self.next_id += 1;
        let stored = StoredSuggestion {
            id: self.next_id,
            value: trimmed.to_string(),
            usage_count: 1,
            updated_at: now,
        };
        let suggestion = stored.to_suggestion();
        entries.push(stored);
        evict_least_used(entries, max_entries);
        Some(suggestion)
    }

    pub fn search(&self, field_type: &FieldType, query: &str, max_results: usize) -> Vec<Suggestion> {
        let Some(entries) = self.fields.get(field_type) else {
            return Vec::new();
        };
        let needle = query.trim().to_lowercase();
        let mut matches: Vec<&StoredSuggestion> = entries
            .iter()
            .filter(|entry| entry.value.to_lowercase().contains(&needle))
            .collect();
        matches.sort_by(|left, right| rank(right).cmp(&rank(left)));
        matches.into_iter().take(max_results).map(StoredSuggestion::to_suggestion).collect()
    }

    #[cfg(test)]
    pub fn len(&self, field_type: &FieldType) -> usize {
        self.fields.get(field_type).map_or(0, Vec::len)
    }
}

fn rank(entry: &StoredSuggestion) -> (u32, DateTime<Utc>, i64) {
    (entry.usage_count, entry.updated_at, entry.id)
}

fn evict_least_used(entries: &mut Vec<StoredSuggestion>, max_entries: usize) {
    while entries.len() > max_entries.max(1) {
        let Some((position, _)) = entries.iter().enumerate().min_by_key(|(_, entry)| rank(entry)) else {
            break;
        };
        entries.remove(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> FieldType {
        FieldType::from("client_notes")
    }

    #[test]
    fn recording_same_trimmed_value_increments_usage() {
        let mut catalog = SuggestionCatalog::default();
        let first = catalog.record(&field(), "  Fragile cargo ", 10).expect("recorded");
        let second = catalog.record(&field(), "Fragile cargo", 10).expect("recorded");

        assert_eq!(first.id, second.id);
        assert_eq!(second.usage_count, 2);
        assert_eq!(catalog.len(&field()), 1);
    }

    #[test]
    fn values_are_case_sensitive() {
        let mut catalog = SuggestionCatalog::default();
        catalog.record(&field(), "Kaunas", 10);
        catalog.record(&field(), "kaunas", 10);
        assert_eq!(catalog.len(&field()), 2);
    }

    #[test]
    fn blank_values_are_ignored() {
        let mut catalog = SuggestionCatalog::default();
        assert!(catalog.record(&field(), "   ", 10).is_none());
        assert_eq!(catalog.len(&field()), 0);
    }

    #[test]
    fn categories_do_not_leak() {
        let mut catalog = SuggestionCatalog::default();
        catalog.record(&field(), "Vilnius", 10);
        assert!(catalog.search(&FieldType::from("client_name"), "Vil", 10).is_empty());
    }

    #[test]
    fn search_ranks_by_usage_and_matches_case_insensitively() {
        let mut catalog = SuggestionCatalog::default();
        catalog.record(&field(), "į Vilnių rytoj", 10);
        catalog.record(&field(), "į Vilnių vakare", 10);
        catalog.record(&field(), "į Vilnių vakare", 10);
        catalog.record(&field(), "Kaunas", 10);

        let rows = catalog.search(&field(), "VILNIŲ", 10);
        let values: Vec<_> = rows.iter().map(|row| row.value.as_str()).collect();
        assert_eq!(values, vec!["į Vilnių vakare", "į Vilnių rytoj"]);
        assert_eq!(rows[0].usage_count, 2);
    }

    #[test]
    fn search_respects_max_results() {
        let mut catalog = SuggestionCatalog::default();
        for index in 0..5 {
            catalog.record(&field(), &format!("route {index}"), 10);
        }
        assert_eq!(catalog.search(&field(), "route", 3).len(), 3);
    }

    #[test]
    fn eviction_drops_least_used_entry() {
        let mut catalog = SuggestionCatalog::default();
        catalog.record(&field(), "keep", 2);
        catalog.record(&field(), "keep", 2);
        catalog.record(&field(), "drop", 2);
        catalog.record(&field(), "new", 2);

        let values: Vec<_> = catalog.search(&field(), "", 10).into_iter().map(|row| row.value).collect();
        assert_eq!(catalog.len(&field()), 2);
        assert!(values.contains(&"keep".to_string()));
        assert!(values.contains(&"new".to_string()), "{values:?}");
    }
}
