//! # Fieldhint TUI
//!
//! A terminal shipment form whose inputs suggest previously entered values.
//!
//! ## Key Features
//!
//! - Single-line client field and multi-line cargo description field
//! - Debounced suggestion dropdown with keyboard and mouse selection
//! - Values are reported back to the store when a field is left
//! - Summary panel echoing the form state
//!
//! ## Architecture
//!
//! Each field wraps a `WidgetDriver` from `fieldhint-engine`. The runtime
//! forwards terminal events to the focused field and routes timer and store
//! completions back to the field that scheduled them.

mod app;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use fieldhint_engine::SuggestionStore;
use fieldhint_util::WidgetSettings;

/// Runs the form until the user quits with Ctrl+C.
///
/// `store_label` is shown in the summary panel so the user can tell which
/// backend receives the values.
///
/// # Errors
///
/// Terminal setup failures (raw mode, alternate screen) and draw errors.
pub async fn run(settings: WidgetSettings, store: Arc<dyn SuggestionStore>, store_label: impl Into<String>) -> Result<()> {
    ui::runtime::run_app(settings, store, store_label.into()).await
}
