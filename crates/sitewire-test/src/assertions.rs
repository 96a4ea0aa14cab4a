//! Assertion helpers over the document model.
//!
//! - [`assert_field_error`] - The field's group is marked and shows a message
//! - [`assert_field_clear`] - The field's group is unmarked with an empty, hidden slot
//! - [`assert_toast`] - A toast of a severity with a message is present
//! - [`assert_no_toast`] - No toast of a severity is present
//! - [`assert_navigated_to`] - The document's path matches
//! - [`assert_has_class`] / [`assert_not_has_class`]

use sitewire_dom::{Document, NodeId, Selector};

const GROUP: &str = ".c-form__group";
const SLOT: &str = ".c-form__error";
const INVALID: &str = "is-invalid";

fn selector(s: &str) -> Selector {
    Selector::parse(s).unwrap_or_else(|e| panic!("assertion selector: {e}"))
}

fn group_and_slot(doc: &Document, field: NodeId) -> (NodeId, Option<NodeId>) {
    let group = doc
        .closest(field, &selector(GROUP))
        .unwrap_or_else(|| panic!("field {field} has no {GROUP} ancestor"));
    let slot = doc.query_selector_in(group, &selector(SLOT));
    (group, slot)
}

/// Asserts that `field`'s group is marked invalid and its slot shows `message`.
///
/// # Panics
///
/// Panics if the group is unmarked or the slot text differs.
pub fn assert_field_error(doc: &Document, field: NodeId, message: &str) {
    let (group, slot) = group_and_slot(doc, field);
    assert!(
        doc.has_class(group, INVALID),
        "Expected group of {field} to be marked '{INVALID}', classes: {:?}",
        doc.class_list(group)
    );
    if let Some(slot) = slot {
        let text = doc.text_content(slot);
        assert_eq!(text, message, "Expected error '{message}' on {field}, got '{text}'");
        assert!(doc.is_displayed(slot), "Error slot of {field} is hidden");
    }
}

/// Asserts that `field`'s group is unmarked and its slot is empty and hidden.
///
/// # Panics
///
/// Panics if the group still shows an error.
pub fn assert_field_clear(doc: &Document, field: NodeId) {
    let (group, slot) = group_and_slot(doc, field);
    assert!(
        !doc.has_class(group, INVALID),
        "Expected group of {field} not to be marked '{INVALID}'"
    );
    if let Some(slot) = slot {
        let text = doc.text_content(slot);
        assert!(text.is_empty(), "Expected empty error slot on {field}, got '{text}'");
        assert!(!doc.is_displayed(slot), "Error slot of {field} is visible");
    }
}

/// All toasts of `severity` currently in the document.
pub fn toasts(doc: &Document, severity: &str) -> Vec<NodeId> {
    doc.query_selector_all(&selector(&format!(".alert.alert-{severity}")))
}

/// Asserts that a toast of `severity` with `message` is present.
///
/// # Panics
///
/// Panics if no such toast exists.
pub fn assert_toast(doc: &Document, severity: &str, message: &str) {
    let found = toasts(doc, severity);
    let texts: Vec<String> = found.iter().map(|t| doc.text_content(*t)).collect();
    assert!(
        texts.iter().any(|t| t == message),
        "Expected a '{severity}' toast '{message}', found: {texts:?}"
    );
}

/// Asserts that no toast of `severity` is present.
///
/// # Panics
///
/// Panics if one is found.
pub fn assert_no_toast(doc: &Document, severity: &str) {
    let found = toasts(doc, severity);
    assert!(
        found.is_empty(),
        "Expected no '{severity}' toast, found {} ({:?})",
        found.len(),
        found.iter().map(|t| doc.text_content(*t)).collect::<Vec<_>>()
    );
}

/// Asserts that the document's location path equals `path`.
///
/// # Panics
///
/// Panics if the path differs.
pub fn assert_navigated_to(doc: &Document, path: &str) {
    let actual = doc.pathname();
    assert_eq!(actual, path, "Expected navigation to '{path}', at '{actual}'");
}

/// Asserts that `node` carries `class`.
///
/// # Panics
///
/// Panics if the class is missing.
pub fn assert_has_class(doc: &Document, node: NodeId, class: &str) {
    assert!(
        doc.has_class(node, class),
        "Expected {node} to have class '{class}', classes: {:?}",
        doc.class_list(node)
    );
}

/// Asserts that `node` does not carry `class`.
///
/// # Panics
///
/// Panics if the class is present.
pub fn assert_not_has_class(doc: &Document, node: NodeId, class: &str) {
    assert!(
        !doc.has_class(node, class),
        "Expected {node} NOT to have class '{class}'"
    );
}
