use anyhow::Result;
use async_trait::async_trait;
use fieldhint_types::{FieldType, Suggestion};

use super::SuggestionStore;

#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

#[async_trait]
impl SuggestionStore for NullStore {
    async fn search(&self, _field_type: &FieldType, _query: &str) -> Result<Vec<Suggestion>> {
        Ok(Vec::new())
    }

    async fn save(&self, _field_type: &FieldType, _value: &str) -> Result<()> {
        Ok(())
    }
}
