//! Settings for sitewire.
//!
//! [`Settings`] holds the page contract (selectors and class names the markup
//! must follow), the timing constants of every delayed behaviour, and the
//! consent storage key. Defaults reproduce the site's markup conventions, so
//! `Settings::default()` is a complete configuration.
//!
//! Settings are passed explicitly to each feature when it is bound; there is
//! no process-wide settings instance.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Form engine configuration: the DOM contract and submission timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSettings {
    /// Selector for forms the engine binds to.
    pub form_selector: String,
    /// Selector for the fields validated within each form.
    pub field_selector: String,
    /// Class of the container wrapping a field and its error slot.
    pub group_class: String,
    /// Class of the error-message slot inside a group.
    pub error_class: String,
    /// Marker class added to a group while its field is invalid.
    pub invalid_class: String,
    /// Selector for the submit control within a form.
    pub submit_selector: String,
    /// Latency of the simulated submission, in milliseconds.
    pub submit_delay_ms: u64,
    /// Delay between the success notification and the redirect, in milliseconds.
    pub redirect_delay_ms: u64,
    /// Path of the static confirmation page.
    pub redirect_target: String,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            form_selector: ".c-form".to_string(),
            field_selector:
                ".c-form__input, .c-form__textarea, .c-form__select, .c-form__checkbox".to_string(),
            group_class: "c-form__group".to_string(),
            error_class: "c-form__error".to_string(),
            invalid_class: "is-invalid".to_string(),
            submit_selector: r#"button[type="submit"]"#.to_string(),
            submit_delay_ms: 1000,
            redirect_delay_ms: 1500,
            redirect_target: "/thank_you.html".to_string(),
        }
    }
}

/// Toast notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Element id of the shared toast container.
    pub container_id: String,
    /// Inline style applied to a newly created container.
    pub container_style: String,
    /// How long a toast stays visible before auto-dismissal, in milliseconds.
    pub lifetime_ms: u64,
    /// Fade-out duration before a dismissed toast is removed, in milliseconds.
    pub fade_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            container_id: "toast-container".to_string(),
            container_style: "position:fixed;top:20px;right:20px;z-index:9999;max-width:350px;"
                .to_string(),
            lifetime_ms: 5000,
            fade_ms: 150,
        }
    }
}

/// Navigation widgets configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationSettings {
    /// Selector for the burger toggle button.
    pub toggle_selector: String,
    /// Selector for the collapsible menu.
    pub menu_selector: String,
    /// Selector for the navigation container (clicks outside it close the menu).
    pub nav_selector: String,
    /// Selector for navigation links.
    pub link_selector: String,
    /// Class marking the open menu.
    pub open_class: String,
    /// Class added to `<body>` while the menu is open.
    pub no_scroll_class: String,
    /// Viewport width at which an open menu is closed.
    pub desktop_breakpoint: u32,
    /// Debounce interval for resize handling, in milliseconds.
    pub resize_debounce_ms: u64,
    /// Selector for the fixed page header.
    pub header_selector: String,
    /// Header offset used when no header is present, in pixels.
    pub fallback_header_offset: f64,
    /// Visible fraction of a section that activates its link.
    pub scroll_spy_threshold: f64,
    /// Pixels trimmed from the top and bottom of the viewport for scroll spy.
    pub scroll_spy_margin: f64,
    /// Selector for the secondary header.
    pub secondary_header_selector: String,
    /// Selector for the secondary header's toggle.
    pub secondary_toggle_selector: String,
    /// Selector for the secondary header's navigation panel.
    pub secondary_panel_selector: String,
    /// Class marking the secondary header as open.
    pub secondary_open_class: String,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            toggle_selector: ".c-nav__toggle".to_string(),
            menu_selector: ".c-nav__menu".to_string(),
            nav_selector: ".c-nav".to_string(),
            link_selector: ".c-nav__link".to_string(),
            open_class: "is-open".to_string(),
            no_scroll_class: "u-no-scroll".to_string(),
            desktop_breakpoint: 1024,
            resize_debounce_ms: 250,
            header_selector: ".l-header".to_string(),
            fallback_header_offset: 80.0,
            scroll_spy_threshold: 0.3,
            scroll_spy_margin: 80.0,
            secondary_header_selector: ".dr-header".to_string(),
            secondary_toggle_selector: ".dr-nav-toggle".to_string(),
            secondary_panel_selector: ".dr-nav-panel".to_string(),
            secondary_open_class: "dr-header-nav-open".to_string(),
        }
    }
}

/// Scroll-driven UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollSettings {
    /// Scroll offset past which the scroll-to-top button shows, in pixels.
    pub scroll_top_threshold: f64,
    /// Scroll offset past which the header is marked scrolled, in pixels.
    pub header_shrink_threshold: f64,
    /// Throttle interval for scroll handlers, in milliseconds.
    pub throttle_ms: u64,
    /// Class of the scroll-to-top button.
    pub scroll_top_class: String,
    /// Class added to the header once scrolled.
    pub scrolled_class: String,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            scroll_top_threshold: 300.0,
            header_shrink_threshold: 50.0,
            throttle_ms: 100,
            scroll_top_class: "scroll-to-top".to_string(),
            scrolled_class: "is-scrolled".to_string(),
        }
    }
}

/// Cookie consent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentSettings {
    /// Local storage key holding the decision.
    pub storage_key: String,
    /// Stylesheet injected for the banner.
    pub stylesheet_href: String,
    /// Element id of the injected stylesheet link.
    pub stylesheet_id: String,
}

impl Default for ConsentSettings {
    fn default() -> Self {
        Self {
            storage_key: "cookie_consent_v1".to_string(),
            stylesheet_href: "./consent.css".to_string(),
            stylesheet_id: "consent-css".to_string(),
        }
    }
}

/// The complete set of sitewire settings.
///
/// # Examples
///
/// ```
/// use sitewire_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.forms.redirect_target, "/thank_you.html");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,

    // ── Features ─────────────────────────────────────────────────────

    /// Form engine configuration.
    pub forms: FormSettings,
    /// Toast notification configuration.
    pub notifications: NotificationSettings,
    /// Navigation widgets configuration.
    pub navigation: NavigationSettings,
    /// Scroll-driven UI configuration.
    pub scroll: ScrollSettings,
    /// Cookie consent configuration.
    pub consent: ConsentSettings,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            forms: FormSettings::default(),
            notifications: NotificationSettings::default(),
            navigation: NavigationSettings::default(),
            scroll: ScrollSettings::default(),
            consent: ConsentSettings::default(),
            extra: HashMap::new(),
        }
    }
}
