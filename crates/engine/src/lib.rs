//! # Fieldhint Engine
//!
//! Debounced suggestion querying and value ingestion for form inputs.
//!
//! A suggestion-backed input asks a store for previously entered values while
//! the user types, shows them in a dropdown and reports the finalised value
//! back to the store. Single-line and free-text inputs share one state machine
//! and differ only in their [`InputVariant`].
//!
//! ## Architecture
//!
//! - **`engine`**: the pure [`SuggestionEngine`] reducer (`Msg` in, `Effect` out)
//! - **`variant`**: [`SingleLine`] and [`MultiLine`] strategies
//! - **`phrase`**: trailing-phrase extraction and replacement for free text
//! - **`watcher`**: [`OutsideWatcher`] classifying pointer-downs by region
//! - **`driver`**: [`WidgetDriver`], the tokio shell executing timers and store calls
//! - **`store`**: the [`SuggestionStore`] trait and its HTTP, JSON, memory and null backends
//!
//! ## Usage
//!
//! ```rust
//! use fieldhint_engine::{SingleLine, SuggestionEngine, WidgetProps};
//! use fieldhint_types::{Effect, Msg};
//!
//! let mut engine = SuggestionEngine::new(SingleLine::default(), WidgetProps::new("client_name"));
//! engine.update(Msg::FocusGained);
//! let effects = engine.update(Msg::TextChanged("Vil".into()));
//! assert!(effects.iter().any(|effect| matches!(effect, Effect::StartTimer { .. })));
//! ```

mod driver;
mod engine;
mod phrase;
pub mod store;
mod variant;
mod watcher;

use std::sync::Arc;

use anyhow::Result;
use fieldhint_util::FieldhintConfig;
use tracing::info;

pub use driver::{DriverMessage, WidgetDriver, WidgetId};
pub use engine::{DEFAULT_BLUR_GRACE, SuggestionEngine, WidgetProps};
pub use phrase::{PHRASE_TOKENS, replace_trailing_phrase, trailing_phrase};
pub use store::{HttpSuggestionStore, JsonSuggestionStore, MemorySuggestionStore, NullStore, SuggestionStore};
pub use variant::{InputVariant, MultiLine, SingleLine};
pub use watcher::OutsideWatcher;

/// Build the store selected by `config`: the local JSON file when offline,
/// nothing when the backend URL is blank, the HTTP backend otherwise.
pub fn store_from_config(config: &FieldhintConfig) -> Result<Arc<dyn SuggestionStore>> {
    if config.store.offline {
        let store = JsonSuggestionStore::from_settings(&config.store)?;
        info!(path = %store.path().display(), "using offline suggestion store");
        Ok(Arc::new(store))
    } else if config.api.is_disabled() {
        info!("no suggestion backend configured; suggestions disabled");
        Ok(Arc::new(NullStore))
    } else {
        let store = HttpSuggestionStore::from_settings(&config.api)?;
        info!(base_url = %config.api.base_url, "using HTTP suggestion store");
        Ok(Arc::new(store))
    }
}
