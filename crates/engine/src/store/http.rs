use anyhow::Result;
use async_trait::async_trait;
use fieldhint_api::SuggestionClient;
use fieldhint_types::{FieldType, Suggestion};
use fieldhint_util::ApiSettings;

use super::SuggestionStore;

/// Store backed by the back-office REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpSuggestionStore {
    client: SuggestionClient,
}

impl HttpSuggestionStore {
    pub fn new(client: SuggestionClient) -> Self {
        Self { client }
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self> {
        Ok(Self::new(SuggestionClient::new(settings)?))
    }
}

#[async_trait]
impl SuggestionStore for HttpSuggestionStore {
    async fn search(&self, field_type: &FieldType, query: &str) -> Result<Vec<Suggestion>> {
        self.client.search(field_type, query).await
    }

    async fn save(&self, field_type: &FieldType, value: &str) -> Result<()> {
        self.client.save(field_type, value).await
    }
}
