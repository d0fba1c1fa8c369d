//! UI components: suggestion fields, summary panel, hint bar.

pub mod common;
pub mod component;
pub mod hint_bar;
pub mod suggest_field;
pub mod summary;

pub use component::{FieldHint, FormField};
pub use suggest_field::SuggestField;
