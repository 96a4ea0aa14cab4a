//! Window state: scroll position, viewport, location, and local storage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sitewire_core::{SiteError, SiteResult};
use url::Url;

use crate::document::Document;
use crate::events::{Event, EventKind, EventTarget};

const DEFAULT_LOCATION: &str = "http://localhost/";

/// How a programmatic scroll should animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    /// Jump immediately.
    #[default]
    Auto,
    /// Animate smoothly.
    Smooth,
}

/// A programmatic scroll, as recorded by [`Document::scroll_to`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    /// Target vertical offset after clamping.
    pub top: f64,
    /// Requested animation.
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone)]
pub(crate) struct WindowState {
    pub(crate) scroll_y: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) location: Url,
    pub(crate) history: Vec<Url>,
    pub(crate) storage: BTreeMap<String, String>,
    pub(crate) scroll_log: Vec<ScrollRequest>,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            width: 1280.0,
            height: 800.0,
            location: Url::parse(DEFAULT_LOCATION).expect("default location is a valid URL"),
            history: Vec::new(),
            storage: BTreeMap::new(),
            scroll_log: Vec::new(),
        }
    }
}

impl WindowState {
    pub(crate) fn at(location: &str) -> SiteResult<Self> {
        let location = Url::parse(location).map_err(|e| SiteError::InvalidUrl {
            url: location.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            location,
            ..Self::default()
        })
    }
}

impl Document {
    // ── Scrolling ────────────────────────────────────────────────────

    /// Current vertical scroll offset.
    pub fn scroll_y(&self) -> f64 {
        self.read().window.scroll_y
    }

    /// Scrolls the window and dispatches a scroll event.
    ///
    /// Negative offsets clamp to zero.
    pub fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        {
            let mut tree = self.write();
            let top = top.max(0.0);
            tree.window.scroll_y = top;
            tree.window.scroll_log.push(ScrollRequest { top, behavior });
        }
        self.dispatch(Event::new(EventKind::Scroll, EventTarget::Window));
    }

    /// Every programmatic scroll so far, oldest first.
    pub fn scroll_history(&self) -> Vec<ScrollRequest> {
        self.read().window.scroll_log.clone()
    }

    /// The most recent programmatic scroll.
    pub fn last_scroll(&self) -> Option<ScrollRequest> {
        self.read().window.scroll_log.last().copied()
    }

    // ── Viewport ─────────────────────────────────────────────────────

    /// Viewport width in CSS pixels.
    pub fn viewport_width(&self) -> f64 {
        self.read().window.width
    }

    /// Viewport height in CSS pixels.
    pub fn viewport_height(&self) -> f64 {
        self.read().window.height
    }

    /// Resizes the viewport and dispatches a resize event.
    pub fn resize(&self, width: f64, height: f64) {
        {
            let mut tree = self.write();
            tree.window.width = width;
            tree.window.height = height;
        }
        self.dispatch(Event::new(EventKind::Resize, EventTarget::Window));
    }

    // ── Location ─────────────────────────────────────────────────────

    /// The current location.
    pub fn location(&self) -> Url {
        self.read().window.location.clone()
    }

    /// Path component of the current location.
    pub fn pathname(&self) -> String {
        self.read().window.location.path().to_string()
    }

    /// Navigates to `href`, resolved against the current location.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidUrl`] when `href` cannot be resolved.
    pub fn navigate(&self, href: &str) -> SiteResult<Url> {
        let mut tree = self.write();
        let target = tree
            .window
            .location
            .join(href)
            .map_err(|e| SiteError::InvalidUrl {
                url: href.to_string(),
                reason: e.to_string(),
            })?;
        let previous = std::mem::replace(&mut tree.window.location, target.clone());
        tree.window.history.push(previous);
        drop(tree);
        tracing::info!(location = %target, "navigated");
        Ok(target)
    }

    /// Locations left by [`navigate`](Self::navigate), oldest first.
    pub fn history(&self) -> Vec<Url> {
        self.read().window.history.clone()
    }

    // ── Local storage ────────────────────────────────────────────────

    /// Reads a local storage entry.
    pub fn storage_get(&self, key: &str) -> Option<String> {
        self.read().window.storage.get(key).cloned()
    }

    /// Writes a local storage entry.
    pub fn storage_set(&self, key: &str, value: &str) {
        self.write()
            .window
            .storage
            .insert(key.to_string(), value.to_string());
    }

    /// Removes a local storage entry; returns the old value.
    pub fn storage_remove(&self, key: &str) -> Option<String> {
        self.write().window.storage.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_default_window() {
        let doc = Document::new();
        assert_eq!(doc.location().as_str(), "http://localhost/");
        assert_eq!(doc.pathname(), "/");
        assert!(doc.scroll_y().abs() < f64::EPSILON);
        assert!(doc.viewport_width() > 0.0);
    }

    #[test]
    fn test_with_location_rejects_relative() {
        let err = Document::with_location("kontakt.html").unwrap_err();
        assert!(matches!(err, SiteError::InvalidUrl { .. }));
    }

    #[test]
    fn test_scroll_to_clamps_and_fires() {
        let doc = Document::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        doc.add_event_listener(EventTarget::Window, EventKind::Scroll, move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        doc.scroll_to(-20.0, ScrollBehavior::Smooth);
        assert!(doc.scroll_y().abs() < f64::EPSILON);
        assert_eq!(
            doc.last_scroll(),
            Some(ScrollRequest {
                top: 0.0,
                behavior: ScrollBehavior::Smooth
            })
        );
        doc.scroll_to(400.0, ScrollBehavior::Auto);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(doc.scroll_history().len(), 2);
    }

    #[test]
    fn test_resize_fires() {
        let doc = Document::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        doc.add_event_listener(EventTarget::Window, EventKind::Resize, move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        doc.resize(375.0, 667.0);
        assert!((doc.viewport_width() - 375.0).abs() < f64::EPSILON);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_navigate_resolves_relative() {
        let doc = Document::with_location("https://example.de/leistungen/kontakt.html").unwrap();
        let target = doc.navigate("/thank_you.html").unwrap();
        assert_eq!(target.as_str(), "https://example.de/thank_you.html");
        assert_eq!(doc.pathname(), "/thank_you.html");
        assert_eq!(doc.history().len(), 1);

        doc.navigate("impressum.html").unwrap();
        assert_eq!(doc.pathname(), "/impressum.html");
    }

    #[test]
    fn test_local_storage() {
        let doc = Document::new();
        assert_eq!(doc.storage_get("cookie_consent_v1"), None);
        doc.storage_set("cookie_consent_v1", "accept");
        assert_eq!(doc.storage_get("cookie_consent_v1").as_deref(), Some("accept"));
        assert_eq!(doc.storage_remove("cookie_consent_v1").as_deref(), Some("accept"));
        assert_eq!(doc.storage_get("cookie_consent_v1"), None);
    }

    #[test]
    fn test_scroll_behavior_serde() {
        let json = serde_json::to_string(&ScrollBehavior::Smooth).unwrap();
        assert_eq!(json, "\"smooth\"");
    }
}
