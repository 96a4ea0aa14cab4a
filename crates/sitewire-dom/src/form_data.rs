//! Form payload snapshots.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::node::NodeId;

/// Bytes escaped by `application/x-www-form-urlencoded`; space is handled
/// separately.
const FORM_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b' ');

/// Ordered name/value pairs collected from a form's controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormPayload {
    entries: Vec<(String, String)>,
}

impl FormPayload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the successful controls of `form`.
    ///
    /// Named, enabled `input`, `textarea` and `select` descendants contribute
    /// their value; checkboxes and radios only when checked. Buttons never
    /// contribute.
    pub fn from_form(document: &Document, form: NodeId) -> Self {
        let mut payload = Self::new();
        for control in document.children_recursive(form) {
            let tag = document.tag_name(control);
            if !matches!(tag.as_str(), "input" | "textarea" | "select") {
                continue;
            }
            let Some(name) = document.get_attribute(control, "name") else {
                continue;
            };
            if name.is_empty() || document.is_disabled(control) {
                continue;
            }
            match document.input_type(control).as_str() {
                "submit" | "button" | "reset" | "image" => continue,
                "checkbox" | "radio" if !document.checked(control) => continue,
                _ => {}
            }
            payload.append(name, document.value(control));
        }
        payload
    }

    /// Appends a pair.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `name`, in order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// All pairs in order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no control contributed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encodes the pairs as `application/x-www-form-urlencoded`.
    pub fn to_urlencoded(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!("{}={}", encode(name), encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, FORM_ENCODE)
        .to_string()
        .replace(' ', "+")
}

impl Document {
    /// Every descendant of `node` in document order.
    pub fn children_recursive(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }
}
