//! UI rendering for the fieldhint form: components, theme and the runtime
//! event loop.

pub mod components;
pub mod runtime;
pub mod theme;
