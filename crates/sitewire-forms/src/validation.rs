//! Field validation rules.
//!
//! Validation is a table of pure rules evaluated in priority order; the
//! first rule that fails decides the error:
//! 1. required and empty
//! 2. the pattern check for the field's kind (non-empty values only)
//! 3. minimum length for multi-line fields
//! 4. acceptance for required checkboxes

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::fields::{ControlType, FieldKind, FieldState};
use crate::messages;

/// Minimum length, in characters, of a non-empty multi-line value.
pub const MIN_MESSAGE_LENGTH: usize = 10;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+0-9\s\-()]{7,20}$").expect("valid phone regex"));

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\s\-']{2,50}$").expect("valid name regex"));

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    #[error("{}", messages::REQUIRED)]
    Required,
    #[error("{}", messages::INVALID_EMAIL)]
    InvalidEmail,
    #[error("{}", messages::INVALID_PHONE)]
    InvalidPhone,
    #[error("{}", messages::INVALID_NAME)]
    InvalidName,
    #[error("{}", messages::TOO_SHORT)]
    TooShort,
    #[error("{}", messages::MUST_ACCEPT)]
    MustAccept,
}

impl FieldError {
    /// The message shown next to the field.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Required => messages::REQUIRED,
            Self::InvalidEmail => messages::INVALID_EMAIL,
            Self::InvalidPhone => messages::INVALID_PHONE,
            Self::InvalidName => messages::INVALID_NAME,
            Self::TooShort => messages::TOO_SHORT,
            Self::MustAccept => messages::MUST_ACCEPT,
        }
    }
}

type Rule = fn(&FieldState) -> Option<FieldError>;

const RULES: &[Rule] = &[required, kind_pattern, min_length, acceptance];

/// Validates one field snapshot.
///
/// Returns the first failing rule's error, or `None` when the field is valid.
///
/// ```
/// use sitewire_forms::fields::{FieldKind, FieldState};
/// use sitewire_forms::validation::{validate, FieldError};
///
/// let email = FieldState::text("a@b").kind(FieldKind::Email);
/// assert_eq!(validate(&email), Some(FieldError::InvalidEmail));
/// assert_eq!(validate(&FieldState::text("a@b.com").kind(FieldKind::Email)), None);
/// ```
pub fn validate(field: &FieldState) -> Option<FieldError> {
    RULES.iter().find_map(|rule| rule(field))
}

fn required(field: &FieldState) -> Option<FieldError> {
    (field.required && field.trimmed().is_empty()).then_some(FieldError::Required)
}

fn kind_pattern(field: &FieldState) -> Option<FieldError> {
    let value = field.trimmed();
    if value.is_empty() {
        return None;
    }
    let (pattern, error) = match field.kind {
        FieldKind::Plain => return None,
        FieldKind::Email => (&*EMAIL_RE, FieldError::InvalidEmail),
        FieldKind::Phone => (&*PHONE_RE, FieldError::InvalidPhone),
        FieldKind::Name => (&*NAME_RE, FieldError::InvalidName),
    };
    (!pattern.is_match(value)).then_some(error)
}

fn min_length(field: &FieldState) -> Option<FieldError> {
    if field.control != ControlType::MultiLine {
        return None;
    }
    let value = field.trimmed();
    (!value.is_empty() && value.chars().count() < MIN_MESSAGE_LENGTH)
        .then_some(FieldError::TooShort)
}

fn acceptance(field: &FieldState) -> Option<FieldError> {
    (field.control == ControlType::Checkbox && field.required && !field.checked)
        .then_some(FieldError::MustAccept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(value: &str) -> Option<FieldError> {
        validate(&FieldState::text(value).kind(FieldKind::Email))
    }

    fn phone(value: &str) -> Option<FieldError> {
        validate(&FieldState::text(value).kind(FieldKind::Phone))
    }

    fn name(value: &str) -> Option<FieldError> {
        validate(&FieldState::text(value).kind(FieldKind::Name))
    }

    // ── Required ─────────────────────────────────────────────────────

    #[test]
    fn test_required_empty_any_kind() {
        for kind in [FieldKind::Plain, FieldKind::Email, FieldKind::Phone, FieldKind::Name] {
            for value in ["", "   ", "\t\n"] {
                let state = FieldState::text(value).kind(kind).required();
                assert_eq!(validate(&state), Some(FieldError::Required), "{kind} {value:?}");
            }
        }
        let textarea = FieldState::multiline("  ").required();
        assert_eq!(validate(&textarea), Some(FieldError::Required));
    }

    #[test]
    fn test_optional_empty_is_valid() {
        assert_eq!(email(""), None);
        assert_eq!(phone("  "), None);
        assert_eq!(validate(&FieldState::multiline("")), None);
    }

    // ── Email ────────────────────────────────────────────────────────

    #[test]
    fn test_email_accepts() {
        for value in ["a@b.com", "anna.mueller@example.de", "x+y@sub.domain.org", " a@b.co "] {
            assert_eq!(email(value), None, "{value}");
        }
    }

    #[test]
    fn test_email_rejects() {
        for value in ["a@b", "ab.com", "a b@c.de", "a@b c.de", "@b.com", "a@.", "a@@b.com"] {
            assert_eq!(email(value), Some(FieldError::InvalidEmail), "{value}");
        }
    }

    // ── Phone ────────────────────────────────────────────────────────

    #[test]
    fn test_phone_accepts() {
        for value in ["0301234567", "+49 30 1234567", "(030) 123-45", "1234567", "+49 (0) 30 123 456 7"]
        {
            assert_eq!(phone(value), None, "{value}");
        }
    }

    #[test]
    fn test_phone_rejects() {
        for value in ["123456", "030/123456", "phone me", "+49 30 1234567 ext 5", "0301234567890123456789"] {
            assert_eq!(phone(value), Some(FieldError::InvalidPhone), "{value}");
        }
    }

    // ── Name ─────────────────────────────────────────────────────────

    #[test]
    fn test_name_accepts_unicode_letters() {
        for value in ["Jo", "Anna-Lena", "Jürgen Groß", "O'Neill", "Zoë"] {
            assert_eq!(name(value), None, "{value}");
        }
    }

    #[test]
    fn test_name_rejects() {
        assert_eq!(name("A"), Some(FieldError::InvalidName));
        assert_eq!(name("R2D2"), Some(FieldError::InvalidName));
        assert_eq!(name(&"a".repeat(51)), Some(FieldError::InvalidName));
        assert_eq!(name(&"ä".repeat(50)), None);
    }

    // ── Multi-line and checkbox ──────────────────────────────────────

    #[test]
    fn test_textarea_length() {
        assert_eq!(validate(&FieldState::multiline("hi")), Some(FieldError::TooShort));
        assert_eq!(validate(&FieldState::multiline("  hallo    ")), Some(FieldError::TooShort));
        assert_eq!(validate(&FieldState::multiline("Guten Tag!")), None);
        // counted in characters, not bytes
        assert_eq!(validate(&FieldState::multiline("äöüäöüäöü")), Some(FieldError::TooShort));
        assert_eq!(validate(&FieldState::multiline("äöüäöüäöüß")), None);
    }

    #[test]
    fn test_single_line_has_no_min_length() {
        assert_eq!(validate(&FieldState::text("hi")), None);
    }

    #[test]
    fn test_required_checkbox() {
        assert_eq!(
            validate(&FieldState::checkbox(false).required()),
            Some(FieldError::MustAccept)
        );
        assert_eq!(validate(&FieldState::checkbox(true).required()), None);
        assert_eq!(validate(&FieldState::checkbox(false)), None);
    }

    // ── Ordering ─────────────────────────────────────────────────────

    #[test]
    fn test_pattern_before_length() {
        let state = FieldState::multiline("a@b").kind(FieldKind::Email);
        assert_eq!(validate(&state), Some(FieldError::InvalidEmail));
        let state = FieldState::multiline("a@b.de").kind(FieldKind::Email);
        assert_eq!(validate(&state), Some(FieldError::TooShort));
    }

    #[test]
    fn test_messages() {
        assert_eq!(FieldError::Required.to_string(), "Dieses Feld ist erforderlich");
        assert_eq!(FieldError::TooShort.message(), "Bitte geben Sie mindestens 10 Zeichen ein");
        assert_eq!(FieldError::MustAccept.to_string(), FieldError::MustAccept.message());
    }
}
