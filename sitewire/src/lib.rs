//! # sitewire
//!
//! Client-side behaviour layer for marketing sites.
//!
//! This is the meta-crate that re-exports all sub-crates and provides
//! [`Page`], which binds every behaviour to a document exactly once. Depend on
//! the individual crates for finer-grained control.
//!
//! ```no_run
//! use sitewire::core::Settings;
//! use sitewire::dom::Document;
//! use sitewire::{Page, PageOptions};
//!
//! # fn main() -> sitewire::core::SiteResult<()> {
//! let settings = Settings::default();
//! sitewire::core::logging::setup_logging(&settings);
//! let document = Document::with_location("https://example.de/kontakt.html")?;
//! let page = Page::bootstrap(&document, &settings, PageOptions::default())?;
//! assert_eq!(page.forms().len(), 0);
//! # Ok(())
//! # }
//! ```

/// Settings, error types, and logging.
pub use sitewire_core as core;

/// The in-memory document model, events, and timers.
pub use sitewire_dom as dom;

/// Form validation, error presentation, toasts, and submission.
#[cfg(feature = "forms")]
pub use sitewire_forms as forms;

/// Navigation, scroll, image, and consent behaviours.
#[cfg(feature = "widgets")]
pub use sitewire_widgets as widgets;

/// Page fixtures and DOM assertions.
#[cfg(feature = "testing")]
pub use sitewire_test as test;

#[cfg(all(feature = "forms", feature = "widgets"))]
pub mod page;

#[cfg(all(feature = "forms", feature = "widgets"))]
pub use page::{Page, PageOptions};
