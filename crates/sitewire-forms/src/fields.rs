//! Field kinds and field state snapshots.
//!
//! A [`FieldKind`] is resolved once when a form is bound. The optional
//! `data-field-kind` attribute wins; otherwise the control's type, id and name
//! are inspected in a fixed order (email, then phone, then name), and the
//! first match decides. Kinds are exclusive, so a field never receives more
//! than one pattern check.
//!
//! [`FieldState`] is what validation rules look at: a plain value snapshot
//! with no reference back to the document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sitewire_dom::{Document, NodeId};

/// Attribute carrying an explicit field kind.
pub const FIELD_KIND_ATTRIBUTE: &str = "data-field-kind";

/// Which pattern check a field receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// No pattern check.
    #[default]
    Plain,
    /// An email address.
    Email,
    /// A phone number.
    Phone,
    /// A person's name.
    Name,
}

impl FieldKind {
    /// Resolves the kind of the control at `node`.
    pub fn resolve(document: &Document, node: NodeId) -> Self {
        if let Some(declared) = document.get_attribute(node, FIELD_KIND_ATTRIBUTE) {
            match declared.parse() {
                Ok(kind) => return kind,
                Err(()) => tracing::debug!(
                    node = %node,
                    declared = %declared,
                    "unknown field kind, falling back to heuristics"
                ),
            }
        }
        Self::infer(
            &document.input_type(node),
            &document.id(node),
            &document.get_attribute(node, "name").unwrap_or_default(),
        )
    }

    /// Infers a kind from a control's type, id, and name.
    pub fn infer(input_type: &str, id: &str, name: &str) -> Self {
        if input_type == "email" || id.contains("email") || name.contains("email") {
            Self::Email
        } else if input_type == "tel" || id.contains("phone") || name.contains("phone") {
            Self::Phone
        } else if id.contains("name") || id.contains("Name") || name.contains("name") {
            Self::Name
        } else {
            Self::Plain
        }
    }

    /// Lowercase name as used in `data-field-kind`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Name => "name",
        }
    }
}

impl FromStr for FieldKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" | "none" => Ok(Self::Plain),
            "email" => Ok(Self::Email),
            "phone" | "tel" => Ok(Self::Phone),
            "name" => Ok(Self::Name),
            _ => Err(()),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The shape of a control, as far as validation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlType {
    /// A single-line input.
    #[default]
    Text,
    /// A `<textarea>`.
    MultiLine,
    /// A `<select>`.
    Select,
    /// A checkbox.
    Checkbox,
}

impl ControlType {
    /// Classifies the control at `node`.
    pub fn of(document: &Document, node: NodeId) -> Self {
        match document.tag_name(node).as_str() {
            "textarea" => Self::MultiLine,
            "select" => Self::Select,
            "input" if document.input_type(node) == "checkbox" => Self::Checkbox,
            _ => Self::Text,
        }
    }
}

/// A snapshot of one field, ready for validation.
///
/// ```
/// use sitewire_forms::fields::{FieldKind, FieldState};
///
/// let state = FieldState::text("a@b.com").kind(FieldKind::Email).required();
/// assert_eq!(state.trimmed(), "a@b.com");
/// assert!(state.required);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState {
    /// Resolved kind.
    pub kind: FieldKind,
    /// Control shape.
    pub control: ControlType,
    /// Raw value.
    pub value: String,
    /// Whether the `required` attribute is present.
    pub required: bool,
    /// Checkedness (checkboxes only).
    pub checked: bool,
}

impl FieldState {
    /// Reads the live state of the control at `node`.
    pub fn read(document: &Document, node: NodeId, kind: FieldKind) -> Self {
        Self {
            kind,
            control: ControlType::of(document, node),
            value: document.value(node),
            required: document.has_attribute(node, "required"),
            checked: document.checked(node),
        }
    }

    /// A single-line text field holding `value`.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// A multi-line field holding `value`.
    pub fn multiline(value: impl Into<String>) -> Self {
        Self {
            control: ControlType::MultiLine,
            value: value.into(),
            ..Self::default()
        }
    }

    /// A checkbox with the given checkedness.
    pub fn checkbox(checked: bool) -> Self {
        Self {
            control: ControlType::Checkbox,
            value: "on".to_string(),
            checked,
            ..Self::default()
        }
    }

    /// Sets the kind.
    #[must_use]
    pub const fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Marks the field required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The value with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }
}

/// A field bound to a form, with its kind fixed at bind time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundField {
    /// The control element.
    pub node: NodeId,
    /// Kind resolved when the form was bound.
    pub kind: FieldKind,
}

impl BoundField {
    /// Binds the control at `node`, resolving its kind now.
    pub fn bind(document: &Document, node: NodeId) -> Self {
        Self {
            node,
            kind: FieldKind::resolve(document, node),
        }
    }

    /// Snapshots the control's current state.
    pub fn state(&self, document: &Document) -> FieldState {
        FieldState::read(document, self.node, self.kind)
    }
}
