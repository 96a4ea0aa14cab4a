//! Navigation toggles: the burger menu and the secondary header panel.

use std::time::Duration;

use sitewire_core::settings::NavigationSettings;
use sitewire_core::SiteResult;
use sitewire_dom::{Debounce, Document, EventKind, EventTarget, ListenerSet, NodeId, Selector};

/// The burger menu's elements and classes.
#[derive(Debug, Clone)]
struct MenuParts {
    toggle: NodeId,
    menu: NodeId,
    nav: Option<NodeId>,
    open_class: String,
    no_scroll_class: String,
}

impl MenuParts {
    fn is_open(&self, doc: &Document) -> bool {
        doc.has_class(self.menu, &self.open_class)
    }

    fn open(&self, doc: &Document) {
        doc.add_class(self.menu, &self.open_class);
        doc.set_attribute(self.toggle, "aria-expanded", "true");
        doc.add_class(doc.body(), &self.no_scroll_class);
    }

    fn close(&self, doc: &Document) {
        doc.remove_class(self.menu, &self.open_class);
        doc.set_attribute(self.toggle, "aria-expanded", "false");
        doc.remove_class(doc.body(), &self.no_scroll_class);
    }
}

/// The mobile burger menu.
///
/// Opens and closes from its toggle; closes on Escape, on a click outside the
/// nav, on a nav link click, and when the viewport grows to desktop width.
#[derive(Debug)]
pub struct BurgerMenu {
    parts: MenuParts,
    document: Document,
    _listeners: ListenerSet,
}

impl BurgerMenu {
    /// Binds the menu. Returns `None` when the toggle or menu is missing.
    pub fn bind(document: &Document, settings: &NavigationSettings) -> SiteResult<Option<Self>> {
        let toggle = document.query_selector(&Selector::parse(&settings.toggle_selector)?);
        let menu = document.query_selector(&Selector::parse(&settings.menu_selector)?);
        let (Some(toggle), Some(menu)) = (toggle, menu) else {
            tracing::debug!("no burger menu on page");
            return Ok(None);
        };
        let parts = MenuParts {
            toggle,
            menu,
            nav: document.closest(toggle, &Selector::parse(&settings.nav_selector)?),
            open_class: settings.open_class.clone(),
            no_scroll_class: settings.no_scroll_class.clone(),
        };

        let mut listeners = ListenerSet::new(document);

        let p = parts.clone();
        listeners.push(document.add_event_listener(toggle, EventKind::Click, move |doc, event| {
            event.prevent_default();
            if p.is_open(doc) {
                p.close(doc);
            } else {
                p.open(doc);
            }
        }));

        let p = parts.clone();
        listeners.push(document.add_event_listener(
            EventTarget::Document,
            EventKind::KeyDown,
            move |doc, event| {
                if event.key() == Some("Escape") && p.is_open(doc) {
                    p.close(doc);
                }
            },
        ));

        let p = parts.clone();
        listeners.push(document.add_event_listener(
            EventTarget::Document,
            EventKind::Click,
            move |doc, event| {
                let (Some(nav), Some(target)) = (p.nav, event.target_node()) else {
                    return;
                };
                if p.is_open(doc) && !doc.contains(nav, target) {
                    p.close(doc);
                }
            },
        ));

        for link in document.query_selector_all(&Selector::parse(&settings.link_selector)?) {
            let p = parts.clone();
            listeners.push(document.add_event_listener(link, EventKind::Click, move |doc, _| {
                if p.is_open(doc) {
                    p.close(doc);
                }
            }));
        }

        let debounce = Debounce::new(Duration::from_millis(settings.resize_debounce_ms));
        let breakpoint = f64::from(settings.desktop_breakpoint);
        let p = parts.clone();
        listeners.push(document.add_event_listener(
            EventTarget::Window,
            EventKind::Resize,
            move |doc, _| {
                let doc = doc.clone();
                let p = p.clone();
                debounce.call(move || {
                    if doc.viewport_width() >= breakpoint && p.is_open(&doc) {
                        p.close(&doc);
                    }
                });
            },
        ));

        Ok(Some(Self {
            parts,
            document: document.clone(),
            _listeners: listeners,
        }))
    }

    pub fn is_open(&self) -> bool {
        self.parts.is_open(&self.document)
    }

    pub fn open(&self) {
        self.parts.open(&self.document);
    }

    pub fn close(&self) {
        self.parts.close(&self.document);
    }
}

/// The secondary header's navigation panel toggle.
#[derive(Debug)]
pub struct HeaderNavToggle {
    header: NodeId,
    open_class: String,
    document: Document,
    _listeners: ListenerSet,
}

impl HeaderNavToggle {
    /// Binds the toggle. Returns `None` when the header, toggle, or panel is
    /// missing.
    pub fn bind(document: &Document, settings: &NavigationSettings) -> SiteResult<Option<Self>> {
        let Some(header) =
            document.query_selector(&Selector::parse(&settings.secondary_header_selector)?)
        else {
            return Ok(None);
        };
        let toggle = document
            .query_selector_in(header, &Selector::parse(&settings.secondary_toggle_selector)?);
        let panel = document
            .query_selector_in(header, &Selector::parse(&settings.secondary_panel_selector)?);
        let (Some(toggle), Some(panel)) = (toggle, panel) else {
            tracing::debug!("secondary header without toggle or panel");
            return Ok(None);
        };

        let open_class = settings.secondary_open_class.clone();
        let class = open_class.clone();
        let mut listeners = ListenerSet::new(document);
        listeners.push(document.add_event_listener(toggle, EventKind::Click, move |doc, _| {
            let open = doc.toggle_class(header, &class);
            doc.set_attribute(toggle, "aria-expanded", if open { "true" } else { "false" });
            doc.set_attribute(panel, "aria-hidden", if open { "false" } else { "true" });
        }));

        Ok(Some(Self {
            header,
            open_class,
            document: document.clone(),
            _listeners: listeners,
        }))
    }

    pub fn is_open(&self) -> bool {
        self.document.has_class(self.header, &self.open_class)
    }
}

#[cfg(test)]
mod tests {
    use sitewire_test::{assert_has_class, assert_not_has_class, navigation_page};

    use super::*;

    fn menu() -> (sitewire_test::NavigationPage, BurgerMenu) {
        let page = navigation_page();
        let menu = BurgerMenu::bind(&page.doc, &NavigationSettings::default())
            .unwrap()
            .unwrap();
        (page, menu)
    }

    #[test]
    fn test_toggle_opens_and_closes() {
        let (page, menu) = menu();
        let event = page.doc.click(page.toggle);
        assert!(event.default_prevented());
        assert!(menu.is_open());
        assert_has_class(&page.doc, page.menu, "is-open");
        assert_has_class(&page.doc, page.doc.body(), "u-no-scroll");
        assert_eq!(page.doc.get_attribute(page.toggle, "aria-expanded").as_deref(), Some("true"));

        page.doc.click(page.toggle);
        assert!(!menu.is_open());
        assert_not_has_class(&page.doc, page.doc.body(), "u-no-scroll");
        assert_eq!(page.doc.get_attribute(page.toggle, "aria-expanded").as_deref(), Some("false"));
    }

    #[test]
    fn test_escape_closes() {
        let (page, menu) = menu();
        menu.open();
        page.doc.key_down("Enter");
        assert!(menu.is_open());
        page.doc.key_down("Escape");
        assert!(!menu.is_open());
    }

    #[test]
    fn test_click_outside_closes() {
        let (page, menu) = menu();
        menu.open();
        page.doc.click(page.menu);
        assert!(menu.is_open());
        page.doc.click(page.sections[0]);
        assert!(!menu.is_open());
    }

    #[test]
    fn test_link_click_closes() {
        let (page, menu) = menu();
        menu.open();
        page.doc.click(page.links[2]);
        assert!(!menu.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_to_desktop_closes_after_debounce() {
        let (page, menu) = menu();
        page.doc.resize(375.0, 667.0);
        menu.open();
        page.doc.resize(800.0, 667.0);
        page.doc.resize(1280.0, 800.0);
        assert!(menu.is_open());
        tokio::time::sleep(Duration::from_millis(260)).await;
        assert!(!menu.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_below_breakpoint_keeps_open() {
        let (page, menu) = menu();
        menu.open();
        page.doc.resize(1023.0, 800.0);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(menu.is_open());
    }

    #[test]
    fn test_missing_markup() {
        let doc = Document::new();
        assert!(BurgerMenu::bind(&doc, &NavigationSettings::default()).unwrap().is_none());
        assert!(HeaderNavToggle::bind(&doc, &NavigationSettings::default()).unwrap().is_none());
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_header_nav_toggle() {
        let page = navigation_page();
        let toggle = HeaderNavToggle::bind(&page.doc, &NavigationSettings::default())
            .unwrap()
            .unwrap();
        page.doc.click(page.dr_toggle);
        assert!(toggle.is_open());
        assert_has_class(&page.doc, page.dr_header, "dr-header-nav-open");
        assert_eq!(page.doc.get_attribute(page.dr_toggle, "aria-expanded").as_deref(), Some("true"));
        assert_eq!(page.doc.get_attribute(page.dr_panel, "aria-hidden").as_deref(), Some("false"));
        page.doc.click(page.dr_toggle);
        assert!(!toggle.is_open());
        assert_eq!(page.doc.get_attribute(page.dr_panel, "aria-hidden").as_deref(), Some("true"));
    }
}
