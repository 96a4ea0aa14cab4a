//! Form binding and the submission lifecycle.
//!
//! [`FormEngine`] binds every form matching the configured selector. Each
//! bound form gets:
//! - a blur listener per field that validates and shows or clears the error,
//! - an input listener per field that only re-validates an already-invalid
//!   field, and clears the error once it passes,
//! - a submit listener that validates everything and, when the form is
//!   valid, runs the submission on the ambient tokio runtime.
//!
//! The returned [`FormBinding`]s own those listeners.

use std::sync::Arc;
use std::time::Duration;

use sitewire_core::{SiteResult, Settings};
use sitewire_dom::{
    Document, EventKind, FormPayload, ListenerSet, NodeId, Selector,
};
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::fields::BoundField;
use crate::messages;
use crate::notify::{Notifier, Severity};
use crate::presentation::ErrorPresenter;
use crate::submission::{
    SimulatedSubmitter, SubmissionState, SubmitOutcome, Submitter,
};
use crate::validation::{validate, FieldError};

struct EngineInner {
    form_selector: Selector,
    field_selector: Selector,
    submit_selector: Selector,
    presenter: ErrorPresenter,
    notifier: Notifier,
    submitter: Arc<dyn Submitter>,
    redirect_delay: Duration,
    redirect_target: String,
}

/// Binds forms and drives their validation and submission.
#[derive(Clone)]
pub struct FormEngine {
    inner: Arc<EngineInner>,
}

impl std::fmt::Debug for FormEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormEngine")
            .field("form_selector", &self.inner.form_selector.as_str())
            .field("field_selector", &self.inner.field_selector.as_str())
            .field("redirect_target", &self.inner.redirect_target)
            .finish_non_exhaustive()
    }
}

impl FormEngine {
    /// Creates an engine that hands payloads to `submitter`.
    ///
    /// Fails when a configured selector does not parse.
    pub fn new(settings: &Settings, submitter: Arc<dyn Submitter>) -> SiteResult<Self> {
        let forms = &settings.forms;
        Ok(Self {
            inner: Arc::new(EngineInner {
                form_selector: Selector::parse(&forms.form_selector)?,
                field_selector: Selector::parse(&forms.field_selector)?,
                submit_selector: Selector::parse(&forms.submit_selector)?,
                presenter: ErrorPresenter::new(forms)?,
                notifier: Notifier::new(&settings.notifications),
                submitter,
                redirect_delay: Duration::from_millis(forms.redirect_delay_ms),
                redirect_target: forms.redirect_target.clone(),
            }),
        })
    }

    /// Creates an engine with a [`SimulatedSubmitter`] using the configured
    /// latency.
    pub fn simulated(settings: &Settings) -> SiteResult<Self> {
        let latency = Duration::from_millis(settings.forms.submit_delay_ms);
        Self::new(settings, Arc::new(SimulatedSubmitter::new(latency)))
    }

    pub fn presenter(&self) -> &ErrorPresenter {
        &self.inner.presenter
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Binds every matching form in `document`.
    pub fn bind(&self, document: &Document) -> FormBindings {
        let forms: Vec<FormBinding> = document
            .query_selector_all(&self.inner.form_selector)
            .into_iter()
            .map(|form| self.bind_form(document, form))
            .collect();
        tracing::info!(forms = forms.len(), "forms bound");
        FormBindings { forms }
    }

    /// Binds a single form element.
    pub fn bind_form(&self, document: &Document, form: NodeId) -> FormBinding {
        let fields: Vec<BoundField> = document
            .query_selector_all_in(form, &self.inner.field_selector)
            .into_iter()
            .map(|node| BoundField::bind(document, node))
            .collect();

        let controller = Arc::new(FormController {
            engine: Arc::clone(&self.inner),
            form,
            fields,
            state: watch::channel(SubmissionState::Idle).0,
        });

        let mut listeners = ListenerSet::new(document);
        for field in controller.fields.iter().copied() {
            let on_blur = Arc::clone(&controller);
            listeners.push(document.add_event_listener(
                field.node,
                EventKind::Blur,
                move |doc, _| {
                    on_blur.check_field(doc, field);
                },
            ));
            let on_input = Arc::clone(&controller);
            listeners.push(document.add_event_listener(
                field.node,
                EventKind::Input,
                move |doc, _| on_input.recheck_field(doc, field),
            ));
        }

        let on_submit = Arc::clone(&controller);
        listeners.push(document.add_event_listener(
            form,
            EventKind::Submit,
            move |doc, event| {
                event.prevent_default();
                event.stop_propagation();
                if let Begin::Valid(pending) = on_submit.begin(doc) {
                    on_submit.spawn_submission(doc, pending);
                }
            },
        ));

        tracing::debug!(form = %form, fields = controller.fields.len(), "form bound");
        FormBinding {
            controller,
            document: document.clone(),
            _listeners: listeners,
        }
    }
}

enum Begin {
    Ignored,
    Invalid(Vec<(NodeId, FieldError)>),
    Valid(Pending),
}

/// A validated submission whose submit button already shows the spinner.
struct Pending {
    payload: FormPayload,
    /// The disabled button and its original markup.
    button: Option<(NodeId, String)>,
}

impl Pending {
    fn release(&self, doc: &Document) {
        if let Some((button, content)) = &self.button {
            doc.set_disabled(*button, false);
            doc.set_inner_html(*button, content);
        }
    }
}

struct FormController {
    engine: Arc<EngineInner>,
    form: NodeId,
    fields: Vec<BoundField>,
    state: watch::Sender<SubmissionState>,
}

impl FormController {
    fn set_state(&self, state: SubmissionState) {
        self.state.send_replace(state);
        tracing::debug!(form = %self.form, state = %state, "submission state");
    }

    /// Validates one field and updates its presentation.
    fn check_field(&self, doc: &Document, field: BoundField) -> Option<FieldError> {
        let error = validate(&field.state(doc));
        match error {
            Some(error) => self.engine.presenter.show(doc, field.node, error.message()),
            None => self.engine.presenter.clear(doc, field.node),
        }
        error
    }

    /// Re-validates a field that is already marked invalid; never shows a
    /// new error.
    fn recheck_field(&self, doc: &Document, field: BoundField) {
        let presenter = &self.engine.presenter;
        if presenter.is_marked_invalid(doc, field.node) && validate(&field.state(doc)).is_none() {
            presenter.clear(doc, field.node);
        }
    }

    fn check_all(&self, doc: &Document) -> Vec<(NodeId, FieldError)> {
        self.fields
            .iter()
            .filter_map(|field| {
                self.check_field(doc, *field)
                    .map(|error| (field.node, error))
            })
            .collect()
    }

    /// Synchronous half of a submit: guard, snapshot, validate, and put the
    /// submit button into its pending state.
    fn begin(&self, doc: &Document) -> Begin {
        let accepted = self.state.send_if_modified(|state| {
            if state.is_busy() {
                false
            } else {
                *state = SubmissionState::Validating;
                true
            }
        });
        if !accepted {
            tracing::debug!(form = %self.form, "submission in flight, submit ignored");
            return Begin::Ignored;
        }

        let payload = FormPayload::from_form(doc, self.form);
        let errors = self.check_all(doc);
        if !errors.is_empty() {
            self.set_state(SubmissionState::Invalid);
            self.engine
                .notifier
                .show(doc, messages::FORM_INVALID, Severity::Danger);
            tracing::info!(form = %self.form, invalid = errors.len(), "submission blocked");
            self.set_state(SubmissionState::Idle);
            return Begin::Invalid(errors);
        }

        self.set_state(SubmissionState::Submitting);
        let button = doc
            .query_selector_in(self.form, &self.engine.submit_selector)
            .map(|button| {
                let content = doc.inner_html(button);
                doc.set_disabled(button, true);
                doc.set_inner_html(button, messages::SUBMIT_PENDING_HTML);
                (button, content)
            });
        Begin::Valid(Pending { payload, button })
    }

    fn spawn_submission(self: &Arc<Self>, doc: &Document, pending: Pending) {
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!(form = %self.form, "no tokio runtime, submission skipped");
            pending.release(doc);
            self.set_state(SubmissionState::Idle);
            return;
        };
        let controller = Arc::clone(self);
        let doc = doc.clone();
        handle.spawn(async move {
            controller.run(doc, pending).await;
        });
    }

    /// Asynchronous half of a submit: submitter, button restore, feedback,
    /// redirect.
    async fn run(&self, doc: Document, pending: Pending) -> SubmitOutcome {
        let engine = &self.engine;
        let result = engine.submitter.submit(&pending.payload).await;
        pending.release(&doc);

        if let Err(err) = result {
            self.set_state(SubmissionState::Failed);
            tracing::warn!(form = %self.form, error = %err, "submission failed");
            engine
                .notifier
                .show(&doc, messages::SUBMIT_FAILED, Severity::Danger);
            self.set_state(SubmissionState::Idle);
            return SubmitOutcome::Failed {
                reason: err.to_string(),
            };
        }

        self.set_state(SubmissionState::Submitted);
        engine
            .notifier
            .show(&doc, messages::SUBMIT_SUCCESS, Severity::Success);
        tokio::time::sleep(engine.redirect_delay).await;

        self.set_state(SubmissionState::Redirecting);
        match doc.navigate(&engine.redirect_target) {
            Ok(location) => SubmitOutcome::Redirected {
                location: location.to_string(),
            },
            Err(err) => {
                tracing::error!(redirect = %engine.redirect_target, error = %err, "redirect failed");
                self.set_state(SubmissionState::Idle);
                SubmitOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// A bound form. Dropping it removes the form's listeners.
pub struct FormBinding {
    controller: Arc<FormController>,
    document: Document,
    _listeners: ListenerSet,
}

impl std::fmt::Debug for FormBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormBinding")
            .field("form", &self.controller.form)
            .field("fields", &self.controller.fields)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl FormBinding {
    /// The form element.
    pub fn form(&self) -> NodeId {
        self.controller.form
    }

    /// The bound fields, in document order.
    pub fn fields(&self) -> &[BoundField] {
        &self.controller.fields
    }

    /// Current submission state.
    pub fn state(&self) -> SubmissionState {
        *self.controller.state.borrow()
    }

    /// Watches submission state changes.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.controller.state.subscribe()
    }

    /// Validates one bound field as a blur would. Unbound nodes are ignored.
    pub fn check_field(&self, node: NodeId) -> Option<FieldError> {
        let field = self.fields().iter().find(|f| f.node == node).copied()?;
        self.controller.check_field(&self.document, field)
    }

    /// Validates every field and updates presentation; no toast.
    pub fn check_all(&self) -> Vec<(NodeId, FieldError)> {
        self.controller.check_all(&self.document)
    }

    /// Runs a full submit and waits for it to settle.
    ///
    /// Behaves like the submit listener but returns the outcome instead of
    /// spawning the lifecycle.
    pub async fn submit(&self) -> SubmitOutcome {
        match self.controller.begin(&self.document) {
            Begin::Ignored => SubmitOutcome::Ignored,
            Begin::Invalid(errors) => SubmitOutcome::Invalid { errors },
            Begin::Valid(pending) => self.controller.run(self.document.clone(), pending).await,
        }
    }
}

/// All forms bound on a page.
#[derive(Debug, Default)]
pub struct FormBindings {
    forms: Vec<FormBinding>,
}

impl FormBindings {
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FormBinding> {
        self.forms.iter()
    }

    /// The binding for `form`, if it was bound.
    pub fn get(&self, form: NodeId) -> Option<&FormBinding> {
        self.forms.iter().find(|binding| binding.form() == form)
    }
}

impl<'a> IntoIterator for &'a FormBindings {
    type Item = &'a FormBinding;
    type IntoIter = std::slice::Iter<'a, FormBinding>;

    fn into_iter(self) -> Self::IntoIter {
        self.forms.iter()
    }
}
