//! Configuration and text helpers shared by the fieldhint crates.

pub mod config;
pub mod path_processing;
pub mod text_processing;

pub use config::{ApiSettings, ConfigError, FieldhintConfig, StoreSettings, WidgetSettings};
pub use path_processing::{config_file_path, expand_tilde};
pub use text_processing::{char_len, redact_sensitive, truncate_chars, truncate_for_summary};
