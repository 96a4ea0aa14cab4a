//! User-facing strings. The site is German-only.

pub const REQUIRED: &str = "Dieses Feld ist erforderlich";
pub const INVALID_EMAIL: &str = "Bitte geben Sie eine gültige E-Mail-Adresse ein";
pub const INVALID_PHONE: &str = "Bitte geben Sie eine gültige Telefonnummer ein";
pub const INVALID_NAME: &str = "Bitte geben Sie einen gültigen Namen ein";
pub const TOO_SHORT: &str = "Bitte geben Sie mindestens 10 Zeichen ein";
pub const MUST_ACCEPT: &str = "Bitte akzeptieren Sie die Datenschutzbestimmungen";

pub const FORM_INVALID: &str = "Bitte korrigieren Sie die Fehler im Formular";
pub const SUBMIT_SUCCESS: &str = "Vielen Dank! Ihre Nachricht wurde erfolgreich gesendet.";
pub const SUBMIT_FAILED: &str =
    "Ihre Nachricht konnte nicht gesendet werden. Bitte versuchen Sie es später erneut.";

/// Submit button content while a submission is in flight.
pub const SUBMIT_PENDING_HTML: &str = "<span class=\"spinner-border spinner-border-sm me-2\" \
     role=\"status\" aria-hidden=\"true\"></span>Wird gesendet...";
