//! Integration tests for the contact form pipeline.
//!
//! These tests drive the engine through the document, the way a browser
//! would, covering:
//! 1. Field validation through blur and input events
//! 2. Blocked submissions
//! 3. Successful submissions and the redirect
//! 4. Submitter failures and re-submits

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use sitewire_core::Settings;
use sitewire_dom::FormPayload;
use sitewire_forms::messages;
use sitewire_forms::{
    FormBindings, FormEngine, SubmissionState, SubmitError, SubmitOutcome, Submitter,
};
use sitewire_test::{
    assert_field_clear, assert_field_error, assert_navigated_to, assert_no_toast, assert_toast,
    contact_page, ContactPage, PayloadOutbox, SettingsOverride,
};

// ============================================================================
// Shared helpers
// ============================================================================

/// Records payloads and succeeds after a latency.
struct RecordingSubmitter {
    outbox: PayloadOutbox,
    latency: Duration,
}

#[async_trait]
impl Submitter for RecordingSubmitter {
    async fn submit(&self, payload: &FormPayload) -> Result<(), SubmitError> {
        self.outbox.push(payload.clone());
        tokio::time::sleep(self.latency).await;
        Ok(())
    }
}

/// Fails after a latency.
struct FailingSubmitter;

#[async_trait]
impl Submitter for FailingSubmitter {
    async fn submit(&self, _payload: &FormPayload) -> Result<(), SubmitError> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Err(SubmitError::Transport("connection reset".into()))
    }
}

fn bound_page() -> (ContactPage, FormBindings) {
    let page = contact_page();
    let engine = FormEngine::simulated(&Settings::default()).unwrap();
    let bindings = engine.bind(&page.doc);
    (page, bindings)
}

fn recording_page(latency_ms: u64) -> (ContactPage, FormBindings, PayloadOutbox) {
    let page = contact_page();
    let outbox = PayloadOutbox::new();
    let submitter = RecordingSubmitter {
        outbox: outbox.clone(),
        latency: Duration::from_millis(latency_ms),
    };
    let engine = FormEngine::new(&Settings::default(), Arc::new(submitter)).unwrap();
    let bindings = engine.bind(&page.doc);
    (page, bindings, outbox)
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// ============================================================================
// 1. Field validation
// ============================================================================

#[test]
fn test_blur_required_empty_any_type() {
    let (page, _bindings) = bound_page();
    for field in [page.name, page.email, page.message] {
        page.doc.set_value(field, "   ");
        page.doc.blur(field);
        assert_field_error(&page.doc, field, messages::REQUIRED);
    }
}

#[test]
fn test_blur_optional_empty_is_clear() {
    let (page, _bindings) = bound_page();
    page.doc.blur(page.phone);
    assert_field_clear(&page.doc, page.phone);
}

#[test]
fn test_email_scenarios() {
    let (page, _bindings) = bound_page();
    page.doc.set_value(page.email, "a@b");
    page.doc.blur(page.email);
    assert_field_error(&page.doc, page.email, messages::INVALID_EMAIL);

    page.doc.set_value(page.email, "a@b.com");
    page.doc.blur(page.email);
    assert_field_clear(&page.doc, page.email);

    for bad in ["ab.com", "a b@c.de", "anna@example"] {
        page.doc.set_value(page.email, bad);
        page.doc.blur(page.email);
        assert_field_error(&page.doc, page.email, messages::INVALID_EMAIL);
    }
}

#[test]
fn test_phone_scenarios() {
    let (page, _bindings) = bound_page();
    for good in ["1234567", "+49 (30) 123-456", "0049 30 12345678901"] {
        page.doc.set_value(page.phone, good);
        page.doc.blur(page.phone);
        assert_field_clear(&page.doc, page.phone);
    }
    for bad in ["123456", "030/1234567", "0800-ANRUFEN"] {
        page.doc.set_value(page.phone, bad);
        page.doc.blur(page.phone);
        assert_field_error(&page.doc, page.phone, messages::INVALID_PHONE);
    }
}

#[test]
fn test_name_and_message_scenarios() {
    let (page, _bindings) = bound_page();
    page.doc.set_value(page.name, "A");
    page.doc.blur(page.name);
    assert_field_error(&page.doc, page.name, messages::INVALID_NAME);
    page.doc.set_value(page.name, "Jürgen O'Neill-Groß");
    page.doc.blur(page.name);
    assert_field_clear(&page.doc, page.name);

    page.doc.set_value(page.message, "hi");
    page.doc.blur(page.message);
    assert_field_error(&page.doc, page.message, messages::TOO_SHORT);
    page.doc.set_value(page.message, "Hallo zusammen");
    page.doc.blur(page.message);
    assert_field_clear(&page.doc, page.message);
}

#[test]
fn test_input_only_clears_after_error() {
    let (page, _bindings) = bound_page();
    page.doc.type_text(page.email, "a");
    assert_field_clear(&page.doc, page.email);

    page.doc.blur(page.email);
    assert_field_error(&page.doc, page.email, messages::INVALID_EMAIL);

    page.doc.type_text(page.email, "a@");
    assert_field_error(&page.doc, page.email, messages::INVALID_EMAIL);

    page.doc.type_text(page.email, "a@b.de");
    assert_field_clear(&page.doc, page.email);
}

#[test]
fn test_declared_kind_overrides_heuristics() {
    let page = contact_page();
    page.doc.set_attribute(page.message, "data-field-kind", "email");
    let engine = FormEngine::simulated(&Settings::default()).unwrap();
    let _bindings = engine.bind(&page.doc);
    page.doc.set_value(page.message, "kein Mailformat hier");
    page.doc.blur(page.message);
    assert_field_error(&page.doc, page.message, messages::INVALID_EMAIL);
}

#[test]
fn test_kind_fixed_at_bind_time() {
    let (page, _bindings) = bound_page();
    page.doc.set_attribute(page.phone, "type", "email");
    page.doc.set_value(page.phone, "1234567");
    page.doc.blur(page.phone);
    assert_field_clear(&page.doc, page.phone);
}

// ============================================================================
// 2. Blocked submissions
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_invalid_submit_shows_danger_and_leaves_button() {
    let (page, bindings, outbox) = recording_page(1000);
    page.fill_valid();
    page.doc.set_value(page.email, "a@b");

    let event = page.doc.submit(page.form);
    assert!(event.default_prevented());
    assert!(event.propagation_stopped());

    assert_toast(&page.doc, "danger", messages::FORM_INVALID);
    assert_field_error(&page.doc, page.email, messages::INVALID_EMAIL);
    assert!(!page.doc.is_disabled(page.submit));
    assert_eq!(page.doc.inner_html(page.submit), "Nachricht senden");

    advance(3000).await;
    assert!(!page.doc.is_disabled(page.submit));
    assert_no_toast(&page.doc, "success");
    assert_navigated_to(&page.doc, "/kontakt.html");
    assert!(outbox.is_empty());
    assert_eq!(bindings.get(page.form).unwrap().state(), SubmissionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_unchecked_privacy_blocks_submit() {
    let (page, _bindings, outbox) = recording_page(1000);
    page.fill_valid();
    page.doc.set_checked(page.privacy, false);

    page.doc.submit(page.form);

    assert_field_error(&page.doc, page.privacy, messages::MUST_ACCEPT);
    for field in [page.name, page.email, page.phone, page.topic, page.message] {
        assert_field_clear(&page.doc, field);
    }
    assert_toast(&page.doc, "danger", messages::FORM_INVALID);
    advance(3000).await;
    assert!(outbox.is_empty());
    assert_navigated_to(&page.doc, "/kontakt.html");
}

#[tokio::test(start_paused = true)]
async fn test_direct_submit_reports_errors_in_form_order() {
    let (page, bindings) = bound_page();
    let outcome = bindings.get(page.form).unwrap().submit().await;
    let SubmitOutcome::Invalid { errors } = outcome else {
        panic!("expected invalid outcome, got {outcome:?}");
    };
    let nodes: Vec<_> = errors.iter().map(|(node, _)| *node).collect();
    assert_eq!(
        nodes,
        vec![page.name, page.email, page.topic, page.message, page.privacy]
    );
}

#[tokio::test(start_paused = true)]
async fn test_danger_toasts_stack_without_dedup() {
    let (page, _bindings) = bound_page();
    page.doc.submit(page.form);
    page.doc.submit(page.form);
    assert_eq!(sitewire_test::toasts(&page.doc, "danger").len(), 2);

    advance(5200).await;
    assert_no_toast(&page.doc, "danger");
}

// ============================================================================
// 3. Successful submissions
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_valid_submit_lifecycle() {
    let (page, bindings) = bound_page();
    let binding = bindings.get(page.form).unwrap();
    page.fill_valid();

    page.doc.submit(page.form);
    assert_eq!(binding.state(), SubmissionState::Submitting);
    assert!(page.doc.is_disabled(page.submit));
    assert_eq!(page.doc.inner_html(page.submit), messages::SUBMIT_PENDING_HTML);

    advance(10).await;
    assert!(page.doc.is_disabled(page.submit));
    assert_no_toast(&page.doc, "danger");

    advance(1000).await;
    assert!(!page.doc.is_disabled(page.submit));
    assert_eq!(page.doc.inner_html(page.submit), "Nachricht senden");
    assert_toast(&page.doc, "success", messages::SUBMIT_SUCCESS);
    assert_eq!(binding.state(), SubmissionState::Submitted);
    assert_navigated_to(&page.doc, "/kontakt.html");

    advance(1500).await;
    assert_navigated_to(&page.doc, "/thank_you.html");
    assert_eq!(binding.state(), SubmissionState::Redirecting);
    assert_no_toast(&page.doc, "danger");
}

#[tokio::test(start_paused = true)]
async fn test_payload_reaches_submitter() {
    let (page, _bindings, outbox) = recording_page(100);
    page.fill_valid();
    page.doc.submit(page.form);
    advance(10).await;

    let payload = outbox.last().unwrap();
    assert_eq!(payload.get("name"), Some("Anna Müller"));
    assert_eq!(payload.get("email"), Some("anna@example.de"));
    assert_eq!(payload.get("topic"), Some("support"));
    assert_eq!(payload.get("privacy"), Some("on"));
    assert_eq!(payload.len(), 6);
}

#[tokio::test(start_paused = true)]
async fn test_direct_submit_holds_button_until_settled() {
    let (page, bindings, _outbox) = recording_page(500);
    let binding = bindings.get(page.form).unwrap();
    page.fill_valid();

    let submission = binding.submit();
    tokio::pin!(submission);
    tokio::select! {
        outcome = &mut submission => panic!("settled early: {outcome:?}"),
        () = advance(100) => {}
    }
    assert!(page.doc.is_disabled(page.submit));
    assert_eq!(page.doc.inner_html(page.submit), messages::SUBMIT_PENDING_HTML);

    assert!(submission.await.is_redirected());
    assert!(!page.doc.is_disabled(page.submit));
    assert_eq!(page.doc.inner_html(page.submit), "Nachricht senden");
}

#[tokio::test(start_paused = true)]
async fn test_select_submits_selected_option() {
    let (page, _bindings, outbox) = recording_page(100);
    page.fill_valid();
    page.doc.set_value(page.topic, "sales");
    page.doc.submit(page.form);
    advance(10).await;
    assert_eq!(outbox.last().unwrap().get("topic"), Some("sales"));
}

#[tokio::test(start_paused = true)]
async fn test_select_placeholder_is_required() {
    let (page, _bindings, outbox) = recording_page(100);
    page.fill_valid();
    page.doc.set_value(page.topic, "");

    page.doc.submit(page.form);
    assert_field_error(&page.doc, page.topic, messages::REQUIRED);
    assert_toast(&page.doc, "danger", messages::FORM_INVALID);
    assert!(!page.doc.is_disabled(page.submit));

    page.doc.set_value(page.topic, "support");
    page.doc.blur(page.topic);
    assert_field_clear(&page.doc, page.topic);
    advance(200).await;
    assert!(outbox.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_resubmit_while_in_flight_is_ignored() {
    let (page, bindings, outbox) = recording_page(1000);
    let binding = bindings.get(page.form).unwrap();
    page.fill_valid();

    page.doc.submit(page.form);
    advance(10).await;
    page.doc.submit(page.form);
    assert_eq!(binding.submit().await, SubmitOutcome::Ignored);

    advance(3000).await;
    assert_eq!(outbox.len(), 1);
    assert_eq!(sitewire_test::toasts(&page.doc, "success").len(), 1);
    assert_navigated_to(&page.doc, "/thank_you.html");
}

#[tokio::test(start_paused = true)]
async fn test_direct_submit_redirects() {
    let settings = SettingsOverride::new()
        .set_submit_delay_ms(50)
        .set_redirect_delay_ms(100)
        .set_redirect_target("/danke.html")
        .build();
    let page = contact_page();
    let bindings = FormEngine::simulated(&settings).unwrap().bind(&page.doc);
    page.fill_valid();

    let mut states = bindings.get(page.form).unwrap().subscribe();
    let outcome = bindings.get(page.form).unwrap().submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Redirected {
            location: "https://example.de/danke.html".to_string()
        }
    );
    assert!(outcome.is_redirected());
    assert_eq!(*states.borrow_and_update(), SubmissionState::Redirecting);
}

// ============================================================================
// 4. Failures
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_submitter_failure_restores_form() {
    let page = contact_page();
    let engine = FormEngine::new(&Settings::default(), Arc::new(FailingSubmitter)).unwrap();
    let bindings = engine.bind(&page.doc);
    let binding = bindings.get(page.form).unwrap();
    page.fill_valid();

    page.doc.submit(page.form);
    assert!(page.doc.is_disabled(page.submit));

    advance(210).await;
    assert!(!page.doc.is_disabled(page.submit));
    assert_eq!(page.doc.inner_html(page.submit), "Nachricht senden");
    assert_toast(&page.doc, "danger", messages::SUBMIT_FAILED);
    assert_no_toast(&page.doc, "success");
    assert_eq!(binding.state(), SubmissionState::Idle);

    advance(3000).await;
    assert_navigated_to(&page.doc, "/kontakt.html");

    let outcome = binding.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Failed {
            reason: "transport error: connection reset".to_string()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_dropping_bindings_detaches_form() {
    let (page, bindings) = bound_page();
    drop(bindings);
    let event = page.doc.submit(page.form);
    assert!(!event.default_prevented());
    page.doc.blur(page.email);
    assert_field_clear(&page.doc, page.email);
    assert_no_toast(&page.doc, "danger");
}
