//! Scroll-driven widgets: the back-to-top button and the shrinking header.

use std::time::Duration;

use sitewire_core::settings::{NavigationSettings, ScrollSettings};
use sitewire_core::SiteResult;
use sitewire_dom::{
    Document, EventKind, EventTarget, ListenerSet, NodeId, ScrollBehavior, Selector, Throttle,
};

const SCROLL_TOP_LABEL: &str = "Nach oben scrollen";
const SCROLL_TOP_STYLE: &str = "position:fixed;bottom:20px;right:20px;width:48px;height:48px;\
border-radius:50%;background:var(--color-accent);color:white;border:none;cursor:pointer;\
opacity:0;visibility:hidden;transition:all 0.3s;z-index:999;font-size:24px;";

/// The floating back-to-top button.
#[derive(Debug)]
pub struct ScrollToTop {
    button: NodeId,
    document: Document,
    _listeners: ListenerSet,
}

impl ScrollToTop {
    /// Reuses the page's button or creates one at the end of the body.
    pub fn bind(document: &Document, settings: &ScrollSettings) -> SiteResult<Self> {
        let selector = Selector::parse(&format!(".{}", settings.scroll_top_class))?;
        let button = match document.query_selector(&selector) {
            Some(button) => button,
            None => document
                .element("button")
                .class(&settings.scroll_top_class)
                .attr("aria-label", SCROLL_TOP_LABEL)
                .text("↑")
                .style(SCROLL_TOP_STYLE)
                .append_to(document.body()),
        };

        let mut listeners = ListenerSet::new(document);
        let throttle = Throttle::new(Duration::from_millis(settings.throttle_ms));
        let threshold = settings.scroll_top_threshold;
        listeners.push(document.add_event_listener(
            EventTarget::Window,
            EventKind::Scroll,
            move |doc, _| {
                if !throttle.ready() {
                    return;
                }
                let (opacity, visibility) = if doc.scroll_y() > threshold {
                    ("1", "visible")
                } else {
                    ("0", "hidden")
                };
                doc.set_style(button, "opacity", opacity);
                doc.set_style(button, "visibility", visibility);
            },
        ));
        listeners.push(document.add_event_listener(button, EventKind::Click, |doc, _| {
            doc.scroll_to(0.0, ScrollBehavior::Smooth);
        }));

        Ok(Self {
            button,
            document: document.clone(),
            _listeners: listeners,
        })
    }

    pub const fn button(&self) -> NodeId {
        self.button
    }

    /// Whether the button is currently shown.
    pub fn is_visible(&self) -> bool {
        self.document.style(self.button, "visibility").as_deref() == Some("visible")
    }
}

/// Adds the scrolled class to the page header once the page leaves the top.
#[derive(Debug)]
pub struct HeaderScroll {
    _listeners: ListenerSet,
}

impl HeaderScroll {
    /// Returns `None` when the page has no header.
    pub fn bind(
        document: &Document,
        navigation: &NavigationSettings,
        settings: &ScrollSettings,
    ) -> SiteResult<Option<Self>> {
        let Some(header) = document.query_selector(&Selector::parse(&navigation.header_selector)?)
        else {
            tracing::debug!("no page header to shrink");
            return Ok(None);
        };
        let throttle = Throttle::new(Duration::from_millis(settings.throttle_ms));
        let threshold = settings.header_shrink_threshold;
        let class = settings.scrolled_class.clone();

        let mut listeners = ListenerSet::new(document);
        listeners.push(document.add_event_listener(
            EventTarget::Window,
            EventKind::Scroll,
            move |doc, _| {
                if !throttle.ready() {
                    return;
                }
                if doc.scroll_y() > threshold {
                    doc.add_class(header, &class);
                } else {
                    doc.remove_class(header, &class);
                }
            },
        ));
        Ok(Some(Self {
            _listeners: listeners,
        }))
    }
}
