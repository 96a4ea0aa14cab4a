//! # sitewire-widgets
//!
//! Page behaviours outside forms. Each `bind`/`show` call installs listeners
//! on a [`Document`](sitewire_dom::Document) and returns a handle that removes
//! them when dropped. Missing markup yields `Ok(None)` rather than an error.
//!
//! ## Modules
//!
//! - [`navigation`] - [`BurgerMenu`] and the secondary [`HeaderNavToggle`]
//! - [`scroll_spy`] - [`ScrollSpy`] highlighting and [`SmoothScroll`] for fragment links
//! - [`active_menu`] - Marking the link for the current path
//! - [`images`] - Fluid, lazy images with a placeholder on error
//! - [`scroll`] - [`ScrollToTop`] and [`HeaderScroll`]
//! - [`consent`] - [`ConsentBanner`] and the [`AnalyticsConsent`] seam

pub mod active_menu;
pub mod consent;
pub mod images;
pub mod navigation;
pub mod scroll;
pub mod scroll_spy;

pub use active_menu::{is_current_page, mark_active_links};
pub use consent::{
    AnalyticsConsent, ConsentBanner, ConsentDecision, ConsentStatus, ConsentUpdate,
};
pub use images::{enhance_images, ImageEnhancements, PLACEHOLDER_URI};
pub use navigation::{BurgerMenu, HeaderNavToggle};
pub use scroll::{HeaderScroll, ScrollToTop};
pub use scroll_spy::{ScrollSpy, SmoothScroll};
