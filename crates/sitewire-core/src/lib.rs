//! # sitewire-core
//!
//! Core types, settings, and error types for the sitewire page runtime.
//! This crate has no dependency on the document model and provides the
//! foundation for all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Selector, timing, and storage configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{SiteError, SiteResult};
pub use settings::Settings;
