//! Ready-made pages mirroring the site's markup.
//!
//! Both fixtures use the default class contract from
//! [`Settings::default`](sitewire_core::Settings), so behaviours built from
//! default settings bind to them without further setup.

use sitewire_dom::{Document, NodeId};

/// The contact page: one `.c-form` with six fields.
#[derive(Debug, Clone)]
pub struct ContactPage {
    pub doc: Document,
    pub form: NodeId,
    /// Required `#name` text input.
    pub name: NodeId,
    /// Required `#email` input of type `email`.
    pub email: NodeId,
    /// Optional `#phone` input of type `tel`.
    pub phone: NodeId,
    /// Required `#topic` select whose first option is an empty placeholder.
    pub topic: NodeId,
    /// Required `#message` textarea.
    pub message: NodeId,
    /// Required `#privacy` checkbox.
    pub privacy: NodeId,
    pub submit: NodeId,
}

impl ContactPage {
    /// Fills every field with a valid value.
    pub fn fill_valid(&self) {
        self.doc.set_value(self.name, "Anna Müller");
        self.doc.set_value(self.email, "anna@example.de");
        self.doc.set_value(self.phone, "+49 30 1234567");
        self.doc.set_value(self.topic, "support");
        self.doc
            .set_value(self.message, "Ich interessiere mich für ein Angebot.");
        self.doc.set_checked(self.privacy, true);
    }

    /// The group wrapping `field`.
    pub fn group_of(&self, field: NodeId) -> NodeId {
        self.doc
            .parent(field)
            .unwrap_or_else(|| panic!("field {field} has no group"))
    }
}

/// Builds the contact page at `https://example.de/kontakt.html`.
pub fn contact_page() -> ContactPage {
    let doc = Document::with_location("https://example.de/kontakt.html")
        .unwrap_or_else(|e| panic!("fixture location: {e}"));
    let form = doc
        .element("form")
        .class("c-form")
        .attr("novalidate", "")
        .append_to(doc.body());

    let name = field(&doc, form, "input", "name", &[("type", "text"), ("required", "")]);
    let email = field(&doc, form, "input", "email", &[("type", "email"), ("required", "")]);
    let phone = field(&doc, form, "input", "phone", &[("type", "tel")]);
    let topic = field(&doc, form, "select", "topic", &[("required", "")]);
    for (value, label) in [("", "Bitte wählen"), ("sales", "Angebot"), ("support", "Support")] {
        doc.element("option")
            .attr("value", value)
            .text(label)
            .append_to(topic);
    }
    let message = field(&doc, form, "textarea", "message", &[("required", "")]);
    let privacy = field(&doc, form, "input", "privacy", &[("type", "checkbox"), ("required", "")]);

    let submit = doc
        .element("button")
        .class("c-button")
        .attr("type", "submit")
        .text("Nachricht senden")
        .append_to(form);

    ContactPage {
        doc,
        form,
        name,
        email,
        phone,
        topic,
        message,
        privacy,
        submit,
    }
}

fn field(
    doc: &Document,
    form: NodeId,
    tag: &str,
    id: &str,
    attributes: &[(&str, &str)],
) -> NodeId {
    let group = doc.element("div").class("c-form__group").append_to(form);
    doc.element("label")
        .attr("for", id)
        .text(id)
        .append_to(group);
    let class = match (tag, attributes.iter().find(|(k, _)| *k == "type")) {
        ("textarea", _) => "c-form__textarea",
        ("select", _) => "c-form__select",
        (_, Some((_, "checkbox"))) => "c-form__checkbox",
        _ => "c-form__input",
    };
    let mut builder = doc.element(tag).id(id).attr("name", id).class(class);
    for (name, value) in attributes {
        builder = builder.attr(name, value);
    }
    let node = builder.append_to(group);
    doc.element("div")
        .class("c-form__error")
        .style("display:none")
        .append_to(group);
    node
}

/// The landing page: header with navigation, two sections, images, and the
/// secondary `.dr-header`.
#[derive(Debug, Clone)]
pub struct NavigationPage {
    pub doc: Document,
    /// `.l-header`, 80 px tall.
    pub header: NodeId,
    pub nav: NodeId,
    pub toggle: NodeId,
    pub menu: NodeId,
    /// `/index.html`, `#leistungen`, `#kontakt`, `/impressum.html`.
    pub links: Vec<NodeId>,
    /// `#leistungen` at 800..1400, `#kontakt` at 1400..2000.
    pub sections: Vec<NodeId>,
    pub dr_header: NodeId,
    pub dr_toggle: NodeId,
    pub dr_panel: NodeId,
    /// Logo (critical), team photo, hero (`data-critical`), map (`loading="eager"`).
    pub images: Vec<NodeId>,
    pub footer_link: NodeId,
}

/// Builds the landing page at `https://example.de/`.
pub fn navigation_page() -> NavigationPage {
    let doc = Document::with_location("https://example.de/")
        .unwrap_or_else(|e| panic!("fixture location: {e}"));
    let body = doc.body();

    let header = doc
        .element("header")
        .class("l-header")
        .layout(0.0, 80.0)
        .append_to(body);
    let logo = doc
        .element("img")
        .class("c-logo__img")
        .attr("src", "/img/logo.svg")
        .append_to(header);
    let nav = doc.element("nav").class("c-nav").append_to(header);
    let toggle = doc
        .element("button")
        .class("c-nav__toggle")
        .attr("aria-expanded", "false")
        .append_to(nav);
    let menu = doc.element("ul").class("c-nav__menu").append_to(nav);
    let links = ["/index.html", "#leistungen", "#kontakt", "/impressum.html"]
        .into_iter()
        .map(|href| {
            let item = doc.element("li").class("c-nav__item").append_to(menu);
            doc.element("a")
                .class("c-nav__link")
                .attr("href", href)
                .text(href)
                .append_to(item)
        })
        .collect();

    let dr_header = doc.element("div").class("dr-header").append_to(body);
    let dr_toggle = doc
        .element("button")
        .class("dr-nav-toggle")
        .attr("aria-expanded", "false")
        .append_to(dr_header);
    let dr_panel = doc
        .element("div")
        .class("dr-nav-panel")
        .attr("aria-hidden", "true")
        .append_to(dr_header);

    let main = doc.element("main").append_to(body);
    let hero = doc
        .element("img")
        .attr("src", "/img/hero.jpg")
        .attr("data-critical", "")
        .append_to(main);
    let leistungen = doc
        .element("section")
        .id("leistungen")
        .layout(800.0, 600.0)
        .append_to(main);
    let team = doc
        .element("img")
        .attr("src", "/img/team.jpg")
        .append_to(leistungen);
    let kontakt = doc
        .element("section")
        .id("kontakt")
        .layout(1400.0, 600.0)
        .append_to(main);
    let map = doc
        .element("img")
        .class("img-fluid")
        .attr("src", "/img/map.png")
        .attr("loading", "eager")
        .append_to(kontakt);

    let footer = doc.element("footer").class("l-footer").append_to(body);
    let footer_link = doc
        .element("a")
        .attr("href", "#kontakt")
        .text("Kontakt")
        .append_to(footer);

    NavigationPage {
        doc,
        header,
        nav,
        toggle,
        menu,
        links,
        sections: vec![leistungen, kontakt],
        dr_header,
        dr_toggle,
        dr_panel,
        images: vec![logo, team, hero, map],
        footer_link,
    }
}
