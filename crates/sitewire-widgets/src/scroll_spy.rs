//! Scroll spy and in-page smooth scrolling.

use std::sync::Arc;

use sitewire_core::settings::NavigationSettings;
use sitewire_core::SiteResult;
use sitewire_dom::{Document, EventKind, EventTarget, ListenerSet, NodeId, ScrollBehavior, Selector};

const ACTIVE_CLASS: &str = "active";

/// Fraction of `[top, top + height)` inside `[view_top, view_bottom]`.
fn visible_ratio(top: f64, height: f64, view_top: f64, view_bottom: f64) -> f64 {
    if height <= 0.0 {
        return 0.0;
    }
    let overlap = (top + height).min(view_bottom) - top.max(view_top);
    overlap.max(0.0) / height
}

#[derive(Debug)]
struct SpyTargets {
    /// Nav links paired with the sections their fragments point at.
    pairs: Vec<(NodeId, NodeId)>,
    threshold: f64,
    margin: f64,
}

impl SpyTargets {
    /// The section that should be active at the current scroll offset.
    ///
    /// The highest visible ratio at or above the threshold wins; ties go to the
    /// later section.
    fn current(&self, doc: &Document) -> Option<NodeId> {
        let view_top = doc.scroll_y() + self.margin;
        let view_bottom = doc.scroll_y() + doc.viewport_height() - self.margin;
        let mut best: Option<(NodeId, f64)> = None;
        for &(_, section) in &self.pairs {
            let rect = doc.layout(section);
            let ratio = visible_ratio(rect.top, rect.height, view_top, view_bottom);
            if ratio < self.threshold {
                continue;
            }
            if best.map_or(true, |(_, r)| ratio >= r) {
                best = Some((section, ratio));
            }
        }
        best.map(|(section, _)| section)
    }

    fn refresh(&self, doc: &Document) {
        let Some(section) = self.current(doc) else {
            return;
        };
        for &(link, target) in &self.pairs {
            if target == section {
                doc.add_class(link, ACTIVE_CLASS);
                doc.set_attribute(link, "aria-current", "page");
            } else {
                doc.remove_class(link, ACTIVE_CLASS);
                doc.remove_attribute(link, "aria-current");
            }
        }
    }
}

/// Highlights the nav link of the section currently in view.
#[derive(Debug)]
pub struct ScrollSpy {
    targets: Arc<SpyTargets>,
    document: Document,
    _listeners: ListenerSet,
}

impl ScrollSpy {
    /// Binds to every nav link with a `#fragment` href whose target exists.
    ///
    /// Returns `None` when there are no such links. The current section is
    /// highlighted immediately.
    pub fn bind(document: &Document, settings: &NavigationSettings) -> SiteResult<Option<Self>> {
        let links = document.query_selector_all(&Selector::parse(&settings.link_selector)?);
        let pairs: Vec<(NodeId, NodeId)> = links
            .into_iter()
            .filter_map(|link| {
                let href = document.get_attribute(link, "href")?;
                let id = href.strip_prefix('#').filter(|id| !id.is_empty())?;
                document.get_element_by_id(id).map(|section| (link, section))
            })
            .collect();
        if pairs.is_empty() {
            tracing::debug!("no in-page nav links for scroll spy");
            return Ok(None);
        }

        let targets = Arc::new(SpyTargets {
            pairs,
            threshold: settings.scroll_spy_threshold,
            margin: settings.scroll_spy_margin,
        });
        targets.refresh(document);

        let mut listeners = ListenerSet::new(document);
        let t = Arc::clone(&targets);
        listeners.push(document.add_event_listener(
            EventTarget::Window,
            EventKind::Scroll,
            move |doc, _| t.refresh(doc),
        ));

        Ok(Some(Self {
            targets,
            document: document.clone(),
            _listeners: listeners,
        }))
    }

    /// The currently highlighted link, if any.
    pub fn active_link(&self) -> Option<NodeId> {
        self.targets
            .pairs
            .iter()
            .map(|&(link, _)| link)
            .find(|&link| self.document.has_class(link, ACTIVE_CLASS))
    }

    /// Number of tracked link/section pairs.
    pub fn len(&self) -> usize {
        self.targets.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.pairs.is_empty()
    }
}

/// Delegated smooth scrolling for `#fragment` anchors.
#[derive(Debug)]
pub struct SmoothScroll {
    _listeners: ListenerSet,
}

impl SmoothScroll {
    pub fn bind(document: &Document, settings: &NavigationSettings) -> SiteResult<Self> {
        let anchor = Selector::parse("a")?;
        let header = Selector::parse(&settings.header_selector)?;
        let fallback = settings.fallback_header_offset;

        let mut listeners = ListenerSet::new(document);
        listeners.push(document.add_event_listener(
            EventTarget::Document,
            EventKind::Click,
            move |doc, event| {
                let Some(link) = event.target_node().and_then(|n| doc.closest(n, &anchor)) else {
                    return;
                };
                let Some(href) = doc.get_attribute(link, "href") else {
                    return;
                };
                if href.is_empty() || href == "#" || href == "#!" || !href.starts_with('#') {
                    return;
                }
                event.prevent_default();
                let target = match Selector::parse(&href) {
                    Ok(selector) => doc.query_selector(&selector),
                    Err(e) => {
                        tracing::debug!(href = %href, error = %e, "unusable fragment");
                        None
                    }
                };
                let Some(target) = target else {
                    return;
                };
                let offset = doc
                    .query_selector(&header)
                    .map_or(fallback, |h| doc.offset_height(h));
                let top = doc.bounding_client_top(target) + doc.scroll_y() - offset;
                doc.scroll_to(top, ScrollBehavior::Smooth);
            },
        ));
        Ok(Self {
            _listeners: listeners,
        })
    }
}
