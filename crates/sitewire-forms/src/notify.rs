//! Toast notifications.
//!
//! All toasts of a page share one fixed-position container, created the first
//! time a toast is shown and found by id afterwards. Each toast dismisses
//! itself after its lifetime; the close button triggers the same fade-out.
//! Removal is idempotent, so a manual close racing the auto-dismiss is
//! harmless.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sitewire_core::settings::NotificationSettings;
use sitewire_dom::{set_timeout, Document, EventKind, NodeId};

/// Class removed to start the fade-out.
const SHOW_CLASS: &str = "show";

/// Toast category; controls styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    /// The name used in the `alert-<severity>` class.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shows toasts in a page's shared container.
#[derive(Debug, Clone)]
pub struct Notifier {
    container_id: String,
    container_style: String,
    lifetime: Duration,
    fade: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(&NotificationSettings::default())
    }
}

impl Notifier {
    /// Creates a notifier from settings.
    pub fn new(settings: &NotificationSettings) -> Self {
        Self {
            container_id: settings.container_id.clone(),
            container_style: settings.container_style.clone(),
            lifetime: Duration::from_millis(settings.lifetime_ms),
            fade: Duration::from_millis(settings.fade_ms),
        }
    }

    /// Returns the toast container, creating it on first use.
    pub fn container(&self, document: &Document) -> NodeId {
        if let Some(existing) = document.get_element_by_id(&self.container_id) {
            return existing;
        }
        document
            .element("div")
            .id(&self.container_id)
            .style(&self.container_style)
            .append_to(document.body())
    }

    /// Appends a toast and schedules its dismissal. Returns the toast card.
    pub fn show(&self, document: &Document, message: &str, severity: Severity) -> NodeId {
        let container = self.container(document);
        let card = document
            .element("div")
            .class(&format!("alert alert-{severity} alert-dismissible fade {SHOW_CLASS}"))
            .attr("role", "alert")
            .text(message)
            .append_to(container);
        let close = document
            .element("button")
            .attr("type", "button")
            .class("btn-close")
            .attr("aria-label", "Close")
            .append_to(card);

        let fade = self.fade;
        document.add_event_listener(close, EventKind::Click, move |doc, _| {
            dismiss_after(doc, card, fade);
        });

        let handle = document.clone();
        set_timeout(self.lifetime, move || dismiss_after(&handle, card, fade));

        tracing::debug!(severity = %severity, text = message, "toast shown");
        card
    }

    /// Starts the fade-out of `card` and removes it once the fade ends.
    pub fn dismiss(&self, document: &Document, card: NodeId) {
        dismiss_after(document, card, self.fade);
    }
}

fn dismiss_after(document: &Document, card: NodeId, fade: Duration) {
    document.remove_class(card, SHOW_CLASS);
    let handle = document.clone();
    set_timeout(fade, move || {
        handle.remove(card);
    });
}
