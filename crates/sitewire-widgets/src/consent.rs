//! Cookie consent banner and the analytics consent hand-off.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sitewire_core::settings::ConsentSettings;
use sitewire_core::SiteResult;
use sitewire_dom::{Document, EventKind, ListenerSet, NodeId, Selector};

const BANNER_INTRO: &str = "We use cookies to ensure basic functionality and to analyze traffic.";
const DEMO_NOTE: &str = "Demo mode: analytics not detected.";

/// The visitor's choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentDecision {
    Accept,
    Reject,
}

impl ConsentDecision {
    /// The value stored under the consent key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }
}

impl FromStr for ConsentDecision {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ConsentDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consent state of one storage category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentStatus {
    Granted,
    Denied,
}

/// A consent-mode update as analytics tags expect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentUpdate {
    pub analytics_storage: ConsentStatus,
    pub ad_storage: ConsentStatus,
    pub ad_user_data: ConsentStatus,
    pub ad_personalization: ConsentStatus,
}

impl From<ConsentDecision> for ConsentUpdate {
    /// Only analytics storage follows the decision; advertising is always denied.
    fn from(decision: ConsentDecision) -> Self {
        Self {
            analytics_storage: match decision {
                ConsentDecision::Accept => ConsentStatus::Granted,
                ConsentDecision::Reject => ConsentStatus::Denied,
            },
            ad_storage: ConsentStatus::Denied,
            ad_user_data: ConsentStatus::Denied,
            ad_personalization: ConsentStatus::Denied,
        }
    }
}

/// Receives consent updates, typically forwarding them to an analytics tag.
pub trait AnalyticsConsent: Send + Sync {
    fn update(&self, update: &ConsentUpdate);
}

/// The decision already stored for this visitor, if any.
pub fn stored_decision(document: &Document, settings: &ConsentSettings) -> Option<ConsentDecision> {
    document
        .storage_get(&settings.storage_key)
        .and_then(|value| value.parse().ok())
}

/// Records `decision` and forwards it to `sink`.
pub fn record_decision(
    document: &Document,
    settings: &ConsentSettings,
    decision: ConsentDecision,
    sink: Option<&dyn AnalyticsConsent>,
) {
    document.storage_set(&settings.storage_key, decision.as_str());
    if let Some(sink) = sink {
        sink.update(&ConsentUpdate::from(decision));
    }
    tracing::info!(decision = %decision, forwarded = sink.is_some(), "consent recorded");
}

fn inject_stylesheet(document: &Document, settings: &ConsentSettings) {
    if document.get_element_by_id(&settings.stylesheet_id).is_some() {
        return;
    }
    document
        .element("link")
        .id(&settings.stylesheet_id)
        .attr("rel", "stylesheet")
        .attr("href", &settings.stylesheet_href)
        .append_to(document.head());
}

fn build_banner(document: &Document, demo: bool) -> NodeId {
    let wrapper = document
        .element("div")
        .class("consent-wrapper")
        .append_to(document.body());
    let card = document
        .element("div")
        .class("consent-card")
        .append_to(wrapper);
    let header = document
        .element("div")
        .class("consent-header")
        .append_to(card);
    document
        .element("strong")
        .text("Privacy & Cookies")
        .append_to(header);
    let body = document.element("div").class("consent-body").append_to(card);
    let intro = document.element("p").text(BANNER_INTRO).append_to(body);
    if demo {
        document.element("br").append_to(intro);
        document.element("em").text(DEMO_NOTE).append_to(intro);
    }
    let actions = document
        .element("div")
        .class("consent-actions")
        .append_to(card);
    for (decision, label) in [
        (ConsentDecision::Accept, "Accept"),
        (ConsentDecision::Reject, "Reject"),
    ] {
        document
            .element("button")
            .class(&format!("consent-btn consent-{decision}"))
            .attr("data-value", decision.as_str())
            .text(label)
            .append_to(actions);
    }
    wrapper
}

/// The consent banner shown to visitors without a stored decision.
#[derive(Debug)]
pub struct ConsentBanner {
    wrapper: NodeId,
    document: Document,
    _listeners: ListenerSet,
}

impl ConsentBanner {
    /// Shows the banner unless a non-empty decision is already stored.
    ///
    /// Without a `sink` the banner carries a demo note and decisions are only
    /// stored.
    pub fn show(
        document: &Document,
        settings: &ConsentSettings,
        sink: Option<Arc<dyn AnalyticsConsent>>,
    ) -> SiteResult<Option<Self>> {
        if document
            .storage_get(&settings.storage_key)
            .is_some_and(|stored| !stored.is_empty())
        {
            tracing::debug!("consent already given");
            return Ok(None);
        }
        let choice = Selector::parse("[data-value]")?;

        inject_stylesheet(document, settings);
        let wrapper = build_banner(document, sink.is_none());

        let settings = settings.clone();
        let mut listeners = ListenerSet::new(document);
        listeners.push(document.add_event_listener(wrapper, EventKind::Click, move |doc, event| {
            let Some(button) = event.target_node().and_then(|n| doc.closest(n, &choice)) else {
                return;
            };
            let value = doc.get_attribute(button, "data-value").unwrap_or_default();
            let Ok(decision) = value.parse::<ConsentDecision>() else {
                tracing::debug!(value = %value, "unknown consent value");
                return;
            };
            record_decision(doc, &settings, decision, sink.as_deref());
            doc.remove(wrapper);
        }));

        Ok(Some(Self {
            wrapper,
            document: document.clone(),
            _listeners: listeners,
        }))
    }

    pub const fn wrapper(&self) -> NodeId {
        self.wrapper
    }

    /// Whether the banner is still on the page.
    pub fn is_open(&self) -> bool {
        self.document.is_connected(self.wrapper)
    }
}
