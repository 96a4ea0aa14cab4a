//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults, nested tables merge).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `SITEWIRE_DEBUG` | `debug` |
//! | `SITEWIRE_LOG_LEVEL` | `log_level` |
//! | `SITEWIRE_REDIRECT_TARGET` | `forms.redirect_target` |
//! | `SITEWIRE_SUBMIT_DELAY_MS` | `forms.submit_delay_ms` |
//! | `SITEWIRE_REDIRECT_DELAY_MS` | `forms.redirect_delay_ms` |
//! | `SITEWIRE_TOAST_LIFETIME_MS` | `notifications.lifetime_ms` |
//! | `SITEWIRE_CONSENT_KEY` | `consent.storage_key` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use sitewire_core::settings_loader::{self, ConfigFormat};
//!
//! let settings = settings_loader::from_file("config/site.toml", ConfigFormat::Toml).unwrap();
//! let settings = settings_loader::from_file_with_env("config/site.json").unwrap();
//! ```

use std::path::Path;

use crate::error::SiteError;
use crate::settings::Settings;

/// The syntax of a configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Picks the format from a file extension; only `.json` selects JSON.
    pub fn of_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    fn parse(self, content: &str) -> Result<serde_json::Value, String> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Loads settings from configuration text.
///
/// Keys missing from `content` keep their default values, including
/// individual keys inside nested tables such as `[forms]`.
///
/// # Errors
///
/// Returns an error if the text is malformed or cannot be deserialized.
pub fn from_str(content: &str, format: ConfigFormat) -> Result<Settings, SiteError> {
    let value = format.parse(content).map_err(|e| {
        SiteError::ConfigurationError(format!("Failed to parse {}: {e}", format.name()))
    })?;
    let mut merged = serde_json::to_value(Settings::default()).map_err(|e| {
        SiteError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;
    merge_into(&mut merged, value);
    serde_json::from_value(merged).map_err(|e| {
        SiteError::ConfigurationError(format!(
            "Failed to deserialize settings from {}: {e}",
            format.name()
        ))
    })
}

/// Loads settings from a TOML string.
///
/// # Errors
///
/// See [`from_str`].
pub fn from_toml_str(toml_str: &str) -> Result<Settings, SiteError> {
    from_str(toml_str, ConfigFormat::Toml)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// See [`from_str`].
pub fn from_json_str(json_str: &str) -> Result<Settings, SiteError> {
    from_str(json_str, ConfigFormat::Json)
}

/// Loads settings from a configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its content is malformed.
pub fn from_file(path: impl AsRef<Path>, format: ConfigFormat) -> Result<Settings, SiteError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        SiteError::ConfigurationError(format!(
            "Failed to read {} file '{}': {e}",
            format.name(),
            path.display()
        ))
    })?;
    from_str(&content, format)
}

/// Loads a configuration file, picking the format from its extension, and
/// then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its content is malformed.
pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<Settings, SiteError> {
    let path = path.as_ref();
    let mut settings = from_file(path, ConfigFormat::of_path(path))?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// Numeric variables that fail to parse are ignored and logged.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides_from(settings, |key| std::env::var(key).ok());
}

/// Applies overrides using an arbitrary variable lookup.
fn apply_overrides_from(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("SITEWIRE_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = lookup("SITEWIRE_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("SITEWIRE_REDIRECT_TARGET") {
        settings.forms.redirect_target = val;
    }

    if let Some(ms) = lookup_millis(&lookup, "SITEWIRE_SUBMIT_DELAY_MS") {
        settings.forms.submit_delay_ms = ms;
    }

    if let Some(ms) = lookup_millis(&lookup, "SITEWIRE_REDIRECT_DELAY_MS") {
        settings.forms.redirect_delay_ms = ms;
    }

    if let Some(ms) = lookup_millis(&lookup, "SITEWIRE_TOAST_LIFETIME_MS") {
        settings.notifications.lifetime_ms = ms;
    }

    if let Some(val) = lookup("SITEWIRE_CONSENT_KEY") {
        settings.consent.storage_key = val;
    }
}

fn lookup_millis(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(ms),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring non-numeric override");
            None
        }
    }
}

/// Deep-merges `overlay` into `base`; nested objects merge key by key and
/// everything else is replaced.
fn merge_into(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge_into(base.entry(key).or_insert(serde_json::Value::Null), value);
            }
        }
        (slot, overlay) => *slot = overlay,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            log_level = "debug"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "debug");
        // Defaults preserved
        assert_eq!(settings.forms.form_selector, ".c-form");
    }

    #[test]
    fn test_from_toml_str_nested_table_keeps_other_defaults() {
        let toml = r#"
            [forms]
            redirect_target = "/danke.html"
            submit_delay_ms = 250
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.forms.redirect_target, "/danke.html");
        assert_eq!(settings.forms.submit_delay_ms, 250);
        assert_eq!(settings.forms.redirect_delay_ms, 1500);
        assert_eq!(settings.forms.group_class, "c-form__group");
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert_eq!(settings.notifications.lifetime_ms, 5000);
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(matches!(result, Err(SiteError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("[forms]\nsubmit_delay_ms = \"soon\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_toml_str_extra() {
        let toml = r#"
            [extra]
            campaign = "spring"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(
            settings.extra.get("campaign"),
            Some(&serde_json::json!("spring"))
        );
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{
            "debug": false,
            "consent": { "storage_key": "consent_v2" }
        }"#;

        let settings = from_json_str(json).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.consent.storage_key, "consent_v2");
        assert_eq!(settings.consent.stylesheet_href, "./consent.css");
    }

    #[test]
    fn test_from_json_str_empty_object() {
        let settings = from_json_str("{}").unwrap();
        assert!(settings.debug);
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{not json").is_err());
    }

    // ── Files ───────────────────────────────────────────────────────

    #[test]
    fn test_from_file_missing() {
        let result = from_file("/definitely/not/here/site.toml", ConfigFormat::Toml);
        let Err(SiteError::ConfigurationError(message)) = result else {
            panic!("expected configuration error");
        };
        assert!(message.starts_with("Failed to read TOML file"));
    }

    #[test]
    fn test_format_of_path() {
        assert_eq!(ConfigFormat::of_path(Path::new("site.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::of_path(Path::new("SITE.JSON")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::of_path(Path::new("site.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::of_path(Path::new("site")), ConfigFormat::Toml);
    }

    #[test]
    fn test_from_file_reads_both_formats() {
        let dir = std::env::temp_dir().join(format!("sitewire-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let toml_path = dir.join("site.toml");
        let json_path = dir.join("site.json");
        std::fs::write(&toml_path, "[forms]\nredirect_delay_ms = 300\n").unwrap();
        std::fs::write(&json_path, r#"{"notifications": {"lifetime_ms": 800}}"#).unwrap();

        let from_toml = from_file(&toml_path, ConfigFormat::of_path(&toml_path)).unwrap();
        assert_eq!(from_toml.forms.redirect_delay_ms, 300);
        assert_eq!(from_toml.forms.submit_delay_ms, 1000);

        let from_json = from_file(&json_path, ConfigFormat::of_path(&json_path)).unwrap();
        assert_eq!(from_json.notifications.lifetime_ms, 800);

        let wrong = from_file(&json_path, ConfigFormat::Toml);
        assert!(matches!(wrong, Err(SiteError::ConfigurationError(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    // ── Environment overrides ───────────────────────────────────────

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("SITEWIRE_DEBUG", "no"),
            ("SITEWIRE_LOG_LEVEL", "warn"),
            ("SITEWIRE_REDIRECT_TARGET", "/merci.html"),
            ("SITEWIRE_SUBMIT_DELAY_MS", "20"),
            ("SITEWIRE_CONSENT_KEY", "consent_test"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        apply_overrides_from(&mut settings, |k| vars.get(k).map(|v| (*v).to_string()));

        assert!(!settings.debug);
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.forms.redirect_target, "/merci.html");
        assert_eq!(settings.forms.submit_delay_ms, 20);
        assert_eq!(settings.consent.storage_key, "consent_test");
    }

    #[test]
    fn test_non_numeric_override_ignored() {
        let mut settings = Settings::default();
        apply_overrides_from(&mut settings, |k| {
            (k == "SITEWIRE_TOAST_LIFETIME_MS").then(|| "forever".to_string())
        });
        assert_eq!(settings.notifications.lifetime_ms, 5000);
    }

    // ── Helpers ─────────────────────────────────────────────────────

    #[test]
    fn test_merge_into_nested() {
        let mut base = serde_json::json!({"a": {"b": 1, "c": 2}, "d": [1, 2]});
        merge_into(&mut base, serde_json::json!({"a": {"c": 3, "e": 4}, "d": [5]}));
        assert_eq!(base, serde_json::json!({"a": {"b": 1, "c": 3, "e": 4}, "d": [5]}));
    }
}
