//! # sitewire-forms
//!
//! Client-side form handling: field validation, inline error presentation,
//! toast notifications, and the submission lifecycle.
//!
//! ## Modules
//!
//! - [`fields`] - Field kinds, resolved once at bind time, and field snapshots
//! - [`validation`] - The ordered rule table and [`FieldError`]
//! - [`presentation`] - Showing and clearing errors on a field's group
//! - [`notify`] - Toasts in a shared container
//! - [`submission`] - The [`Submitter`] seam and lifecycle state
//! - [`form`] - [`FormEngine`] and per-form bindings
//! - [`messages`] - User-facing strings

pub mod fields;
pub mod form;
pub mod messages;
pub mod notify;
pub mod presentation;
pub mod submission;
pub mod validation;

pub use fields::{BoundField, ControlType, FieldKind, FieldState};
pub use form::{FormBinding, FormBindings, FormEngine};
pub use notify::{Notifier, Severity};
pub use presentation::ErrorPresenter;
pub use submission::{
    SimulatedSubmitter, SubmissionState, SubmitError, SubmitOutcome, Submitter,
};
pub use validation::{validate, FieldError};
