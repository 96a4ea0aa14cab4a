//! Element storage for the document tree.
//!
//! Nodes live in an arena owned by the document and are addressed by
//! [`NodeId`]. Only elements are modelled; text is kept as the element's
//! content string.

use std::collections::BTreeMap;
use std::fmt;

/// Handle to an element inside a [`Document`](crate::Document).
///
/// Ids are never reused within one document, so a handle to a removed
/// element stays unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the arena index of this node.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Layout box of an element in page coordinates.
///
/// The model has no layout engine; hosts and tests assign boxes explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Distance from the top of the page to the element's top edge.
    pub top: f64,
    /// Rendered height of the element.
    pub height: f64,
}

impl Rect {
    /// Creates a layout box.
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Bottom edge in page coordinates.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// A single element and its state.
#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag: String,
    pub(crate) attributes: BTreeMap<String, String>,
    pub(crate) classes: Vec<String>,
    pub(crate) style: BTreeMap<String, String>,
    pub(crate) content: String,
    pub(crate) value: Option<String>,
    pub(crate) checked: bool,
    pub(crate) layout: Rect,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Element {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            style: BTreeMap::new(),
            content: String::new(),
            value: None,
            checked: false,
            layout: Rect::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Reads an attribute, treating `class` as the live class list.
    pub(crate) fn attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            if self.classes.is_empty() {
                return None;
            }
            return Some(self.classes.join(" "));
        }
        self.attributes.get(name).cloned()
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) {
        match name {
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
            }
            "style" => {
                self.style = parse_style(value);
            }
            "checked" => {
                self.checked = true;
                self.attributes.insert(name.to_string(), value.to_string());
            }
            _ => {
                self.attributes.insert(name.to_string(), value.to_string());
            }
        }
    }

    pub(crate) fn remove_attribute(&mut self, name: &str) -> bool {
        match name {
            "class" => {
                let had = !self.classes.is_empty();
                self.classes.clear();
                had
            }
            "style" => {
                let had = !self.style.is_empty();
                self.style.clear();
                had
            }
            _ => self.attributes.remove(name).is_some(),
        }
    }

    pub(crate) fn has_attribute(&self, name: &str) -> bool {
        match name {
            "class" => !self.classes.is_empty(),
            "style" => !self.style.is_empty(),
            _ => self.attributes.contains_key(name),
        }
    }

    pub(crate) fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Adds a class; returns `false` if it was already present.
    pub(crate) fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        self.classes.push(class.to_string());
        true
    }

    /// Removes a class; returns `false` if it was absent.
    pub(crate) fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        self.classes.len() < before
    }

    /// The `value` property: explicit value, then the `value` attribute,
    /// then `"on"` for checkboxes and radios.
    pub(crate) fn value(&self) -> String {
        if let Some(v) = &self.value {
            return v.clone();
        }
        if let Some(v) = self.attributes.get("value") {
            return v.clone();
        }
        if self.tag == "input" && self.is_checkable() {
            return "on".to_string();
        }
        if self.tag == "textarea" {
            return self.content.clone();
        }
        String::new()
    }

    pub(crate) fn is_checkable(&self) -> bool {
        matches!(
            self.attributes.get("type").map(String::as_str),
            Some("checkbox" | "radio")
        )
    }

    /// Input type as the host reports it (`text` when absent).
    pub(crate) fn input_type(&self) -> String {
        match self.tag.as_str() {
            "input" => self
                .attributes
                .get("type")
                .map_or_else(|| "text".to_string(), |t| t.to_ascii_lowercase()),
            "textarea" => "textarea".to_string(),
            "select" => "select-one".to_string(),
            "button" => self
                .attributes
                .get("type")
                .map_or_else(|| "submit".to_string(), |t| t.to_ascii_lowercase()),
            _ => String::new(),
        }
    }
}

/// Parses an inline style declaration list (`a:b;c:d`).
pub(crate) fn parse_style(css: &str) -> BTreeMap<String, String> {
    css.split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            if prop.is_empty() {
                return None;
            }
            Some((prop.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}
