//! Inline error presentation on a field's group.
//!
//! A group is marked invalid exactly when its error slot (if it has one)
//! shows non-empty text.

use sitewire_core::settings::FormSettings;
use sitewire_core::SiteResult;
use sitewire_dom::{Document, NodeId, Selector};

/// Shows and clears field errors according to the group/slot class contract.
#[derive(Debug, Clone)]
pub struct ErrorPresenter {
    group: Selector,
    slot: Selector,
    invalid_class: String,
}

impl ErrorPresenter {
    /// Builds a presenter from the form settings.
    pub fn new(settings: &FormSettings) -> SiteResult<Self> {
        Ok(Self {
            group: Selector::parse(&format!(".{}", settings.group_class))?,
            slot: Selector::parse(&format!(".{}", settings.error_class))?,
            invalid_class: settings.invalid_class.clone(),
        })
    }

    /// The group enclosing `field`, if any.
    pub fn group_of(&self, document: &Document, field: NodeId) -> Option<NodeId> {
        document.closest(field, &self.group)
    }

    fn slot_of(&self, document: &Document, group: NodeId) -> Option<NodeId> {
        document.query_selector_in(group, &self.slot)
    }

    /// Marks the field's group invalid and shows `message` in its slot.
    pub fn show(&self, document: &Document, field: NodeId, message: &str) {
        let Some(group) = self.group_of(document, field) else {
            tracing::debug!(field = %field, "no group around field, error not shown");
            return;
        };
        document.add_class(group, &self.invalid_class);
        if let Some(slot) = self.slot_of(document, group) {
            document.set_text_content(slot, message);
            document.set_style(slot, "display", "block");
        }
    }

    /// Removes the marker and empties and hides the slot.
    pub fn clear(&self, document: &Document, field: NodeId) {
        let Some(group) = self.group_of(document, field) else {
            return;
        };
        document.remove_class(group, &self.invalid_class);
        if let Some(slot) = self.slot_of(document, group) {
            document.set_text_content(slot, "");
            document.set_style(slot, "display", "none");
        }
    }

    /// Whether the field's group currently carries the marker.
    pub fn is_marked_invalid(&self, document: &Document, field: NodeId) -> bool {
        self.group_of(document, field)
            .is_some_and(|group| document.has_class(group, &self.invalid_class))
    }
}
