//! Builder for test settings.
//!
//! ```
//! use sitewire_test::SettingsOverride;
//!
//! let settings = SettingsOverride::new()
//!     .set_submit_delay_ms(10)
//!     .set_redirect_target("/danke.html")
//!     .build();
//! assert_eq!(settings.forms.redirect_target, "/danke.html");
//! ```

use sitewire_core::Settings;

/// Starts from [`Settings::default()`] and changes selected values.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverride {
    settings: Settings,
}

impl SettingsOverride {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing settings.
    pub const fn from_settings(settings: Settings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn set_submit_delay_ms(mut self, ms: u64) -> Self {
        self.settings.forms.submit_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn set_redirect_delay_ms(mut self, ms: u64) -> Self {
        self.settings.forms.redirect_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn set_redirect_target(mut self, target: &str) -> Self {
        self.settings.forms.redirect_target = target.to_string();
        self
    }

    #[must_use]
    pub fn set_toast_lifetime_ms(mut self, ms: u64) -> Self {
        self.settings.notifications.lifetime_ms = ms;
        self
    }

    #[must_use]
    pub fn set_consent_key(mut self, key: &str) -> Self {
        self.settings.consent.storage_key = key.to_string();
        self
    }

    #[must_use]
    pub fn set_desktop_breakpoint(mut self, px: u32) -> Self {
        self.settings.navigation.desktop_breakpoint = px;
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}
