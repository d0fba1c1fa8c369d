use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use fieldhint_types::{FieldType, Suggestion};

use super::SuggestionStore;
use super::catalog::SuggestionCatalog;

/// In-process store applying the same policy as the backend.
#[derive(Debug)]
pub struct MemorySuggestionStore {
    catalog: Mutex<SuggestionCatalog>,
    max_results: usize,
    max_entries_per_field: usize,
}

impl Default for MemorySuggestionStore {
    fn default() -> Self {
        Self::new(10, 500)
    }
}

impl MemorySuggestionStore {
    pub fn new(max_results: usize, max_entries_per_field: usize) -> Self {
        Self {
            catalog: Mutex::new(SuggestionCatalog::default()),
            max_results,
            max_entries_per_field,
        }
    }

    /// Seed values, e.g. for demos. Repeated values count as repeated commits.
    pub fn with_values<'a>(self, field_type: &FieldType, values: impl IntoIterator<Item = &'a str>) -> Self {
        if let Ok(mut catalog) = self.catalog.lock() {
            for value in values {
                catalog.record(field_type, value, self.max_entries_per_field);
            }
        }
        self
    }
}

#[async_trait]
impl SuggestionStore for MemorySuggestionStore {
    async fn search(&self, field_type: &FieldType, query: &str) -> Result<Vec<Suggestion>> {
        let catalog = self.catalog.lock().map_err(|error| anyhow!(error.to_string()))?;
        Ok(catalog.search(field_type, query, self.max_results))
    }

    async fn save(&self, field_type: &FieldType, value: &str) -> Result<()> {
        let mut catalog = self.catalog.lock().map_err(|error| anyhow!(error.to_string()))?;
        catalog.record(field_type, value, self.max_entries_per_field);
        Ok(())
    }
}
