//! Suggestion store facade.
//!
//! Modules:
//! - `catalog`: Store-side policy (trim, dedup, usage counting, ranking)
//! - `http`: Backend store reached through `fieldhint_api::SuggestionClient`
//! - `json`: Offline store persisted to a JSON file
//! - `memory`: In-process store for tests and demos
//! - `null`: No-op store for disabled scenarios

mod catalog;
mod http;
mod json;
mod memory;
mod null;

use anyhow::Result;
use async_trait::async_trait;
use fieldhint_types::{FieldType, Suggestion};

pub use http::HttpSuggestionStore;
pub use json::{JsonStoreError, JsonSuggestionStore, STORE_FILE_NAME, STORE_PATH_ENV};
pub use memory::MemorySuggestionStore;
pub use null::NullStore;

/// Trait defining the interface to a suggestion store.
///
/// Implementations own the dedup/increment policy; callers only send trimmed
/// text tagged with its field category.
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// Values of `field_type` matching `query`, best candidates first.
    async fn search(&self, field_type: &FieldType, query: &str) -> Result<Vec<Suggestion>>;

    /// Record a finalised value, incrementing its usage when already known.
    async fn save(&self, field_type: &FieldType, value: &str) -> Result<()>;
}
