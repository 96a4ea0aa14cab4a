//! Fluent element construction.

use crate::document::Document;
use crate::node::{NodeId, Rect};

/// Builder returned by [`Document::element`].
///
/// Each method applies immediately; finish with [`append_to`](Self::append_to)
/// or [`build`](Self::build) to get the node handle.
#[must_use]
pub struct ElementBuilder<'a> {
    document: &'a Document,
    node: NodeId,
}

impl<'a> ElementBuilder<'a> {
    pub(crate) const fn new(document: &'a Document, node: NodeId) -> Self {
        Self { document, node }
    }

    /// Sets the `id` attribute.
    pub fn id(self, id: &str) -> Self {
        self.document.set_attribute(self.node, "id", id);
        self
    }

    /// Adds one or more whitespace-separated classes.
    pub fn class(self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            self.document.add_class(self.node, class);
        }
        self
    }

    /// Sets an attribute.
    pub fn attr(self, name: &str, value: &str) -> Self {
        self.document.set_attribute(self.node, name, value);
        self
    }

    /// Sets the text content.
    pub fn text(self, text: &str) -> Self {
        self.document.set_text_content(self.node, text);
        self
    }

    /// Sets the markup content.
    pub fn html(self, html: &str) -> Self {
        self.document.set_inner_html(self.node, html);
        self
    }

    /// Sets the control value.
    pub fn value(self, value: &str) -> Self {
        self.document.set_value(self.node, value);
        self
    }

    /// Sets checkedness.
    pub fn checked(self, checked: bool) -> Self {
        self.document.set_checked(self.node, checked);
        self
    }

    /// Replaces the inline style.
    pub fn style(self, css: &str) -> Self {
        self.document.set_style_text(self.node, css);
        self
    }

    /// Assigns the layout box.
    pub fn layout(self, top: f64, height: f64) -> Self {
        self.document.set_layout(self.node, Rect::new(top, height));
        self
    }

    /// Appends the element to `parent` and returns its handle.
    pub fn append_to(self, parent: NodeId) -> NodeId {
        self.document.append_child(parent, self.node);
        self.node
    }

    /// Returns the handle of the (still detached) element.
    pub fn build(self) -> NodeId {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_applies_state() {
        let doc = Document::new();
        let input = doc
            .element("input")
            .id("email")
            .class("c-form__input  wide")
            .attr("type", "email")
            .attr("required", "")
            .value("a@b.com")
            .layout(120.0, 40.0)
            .append_to(doc.body());

        assert_eq!(doc.id(input), "email");
        assert_eq!(doc.class_list(input), vec!["c-form__input", "wide"]);
        assert_eq!(doc.input_type(input), "email");
        assert!(doc.has_attribute(input, "required"));
        assert_eq!(doc.value(input), "a@b.com");
        assert!((doc.layout(input).bottom() - 160.0).abs() < f64::EPSILON);
        assert_eq!(doc.parent(input), Some(doc.body()));
    }

    #[test]
    fn test_build_leaves_detached() {
        let doc = Document::new();
        let node = doc.element("div").style("display:none").build();
        assert!(!doc.is_connected(node));
        assert!(!doc.is_displayed(node));
    }
}
