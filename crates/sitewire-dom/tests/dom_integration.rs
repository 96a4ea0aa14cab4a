//! Integration tests for the document model.
//!
//! Covers the pieces page behaviours lean on together:
//! 1. Selector queries over a realistic page
//! 2. Event delegation and listener lifetimes
//! 3. Timers interacting with the document

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sitewire_dom::{
    set_timeout, Document, EventKind, EventTarget, FormPayload, ListenerSet, NodeId, Selector,
};

// ============================================================================
// Shared helpers
// ============================================================================

fn sel(s: &str) -> Selector {
    Selector::parse(s).unwrap()
}

/// A header with a nav, and a contact form below it.
fn page() -> (Document, NodeId) {
    let doc = Document::new();
    let header = doc.element("header").class("l-header").append_to(doc.body());
    let nav = doc.element("nav").class("c-nav").append_to(header);
    let menu = doc.element("ul").class("c-nav__menu").append_to(nav);
    for href in ["#leistungen", "#kontakt", "/impressum.html"] {
        let li = doc.element("li").append_to(menu);
        doc.element("a")
            .class("c-nav__link")
            .attr("href", href)
            .append_to(li);
    }
    let form = doc.element("form").class("c-form").append_to(doc.body());
    let group = doc.element("div").class("c-form__group").append_to(form);
    doc.element("input")
        .id("email")
        .attr("name", "email")
        .class("c-form__input")
        .append_to(group);
    doc.element("span").class("c-form__error").append_to(group);
    doc.element("button")
        .attr("type", "submit")
        .text("Senden")
        .append_to(form);
    (doc, form)
}

// ============================================================================
// 1. Queries
// ============================================================================

#[test]
fn test_attribute_prefix_query() {
    let (doc, _) = page();
    let anchors = doc.query_selector_all(&sel(r##".c-nav__link[href^="#"]"##));
    assert_eq!(anchors.len(), 2);
}

#[test]
fn test_child_combinator_and_lists() {
    let (doc, form) = page();
    let fields = doc.query_selector_all_in(
        form,
        &sel(".c-form__input, .c-form__textarea, .c-form__select, .c-form__checkbox"),
    );
    assert_eq!(fields.len(), 1);
    assert!(doc
        .query_selector(&sel(r#"form > button[type="submit"]"#))
        .is_some());
    assert!(doc.query_selector(&sel("body > button")).is_none());
}

#[test]
fn test_closest_group_from_field() {
    let (doc, _) = page();
    let input = doc.get_element_by_id("email").unwrap();
    let group = doc.closest(input, &sel(".c-form__group")).unwrap();
    let slot = doc.query_selector_in(group, &sel(".c-form__error"));
    assert!(slot.is_some());
}

#[test]
fn test_invalid_selector_is_error() {
    assert!(Selector::parse(".c-form[").is_err());
    assert!(Selector::parse("").is_err());
}

// ============================================================================
// 2. Events
// ============================================================================

#[test]
fn test_delegated_click_reaches_document() {
    let (doc, _) = page();
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    doc.add_event_listener(EventTarget::Document, EventKind::Click, move |doc, event| {
        let Some(node) = event.target_node() else {
            return;
        };
        if doc.closest(node, &sel("a[href]")).is_some() {
            counter.fetch_add(1, Ordering::SeqCst);
            event.prevent_default();
        }
    });
    let link = doc.query_selector(&sel(".c-nav__link")).unwrap();
    assert!(doc.click(link).default_prevented());
    assert!(!doc.click(doc.body()).default_prevented());
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_detached_node_does_not_reach_window() {
    let doc = Document::new();
    let orphan = doc.element("button").build();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    doc.add_event_listener(EventTarget::Window, EventKind::Click, move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    doc.click(orphan);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_listener_set_removes_on_drop() {
    let (doc, form) = page();
    {
        let mut set = ListenerSet::new(&doc);
        set.push(doc.add_event_listener(form, EventKind::Submit, |_, e| e.prevent_default()));
        set.push(doc.add_event_listener(EventTarget::Window, EventKind::Scroll, |_, _| {}));
        assert_eq!(set.len(), 2);
        assert_eq!(doc.listener_count(), 2);
        assert!(doc.submit(form).default_prevented());
    }
    assert_eq!(doc.listener_count(), 0);
    assert!(!doc.submit(form).default_prevented());
}

#[test]
fn test_payload_snapshot_after_typing() {
    let (doc, form) = page();
    let input = doc.get_element_by_id("email").unwrap();
    doc.type_text(input, "anna@example.de");
    let payload = FormPayload::from_form(&doc, form);
    assert_eq!(payload.to_urlencoded(), "email=anna%40example.de");
}

// ============================================================================
// 3. Timers
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_timer_removes_node_later() {
    let (doc, form) = page();
    let handle = doc.clone();
    set_timeout(Duration::from_millis(150), move || {
        handle.remove(form);
    })
    .unwrap();
    assert!(doc.is_connected(form));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!doc.is_connected(form));
}
