//! # sitewire-test
//!
//! Testing utilities for sitewire behaviours. Provides ready-made page
//! fixtures, assertion helpers over the document model, an outbox that
//! captures submitted payloads, and a builder for settings overrides.

pub mod assertions;
pub mod fixtures;
pub mod outbox;
pub mod override_settings;

pub use assertions::*;
pub use fixtures::{contact_page, navigation_page, ContactPage, NavigationPage};
pub use outbox::PayloadOutbox;
pub use override_settings::SettingsOverride;
