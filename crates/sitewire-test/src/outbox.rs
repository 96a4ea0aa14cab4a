//! Captures submitted payloads for later inspection.

use std::sync::{Arc, Mutex};

use sitewire_dom::FormPayload;

/// An in-memory outbox of form payloads.
///
/// Clones share the same store, so a test can hand one clone to a fake
/// submitter and inspect another.
#[derive(Debug, Clone, Default)]
pub struct PayloadOutbox {
    payloads: Arc<Mutex<Vec<FormPayload>>>,
}

impl PayloadOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures a payload.
    pub fn push(&self, payload: FormPayload) {
        self.payloads
            .lock()
            .expect("PayloadOutbox lock poisoned")
            .push(payload);
    }

    /// All captured payloads, oldest first.
    pub fn payloads(&self) -> Vec<FormPayload> {
        self.payloads
            .lock()
            .expect("PayloadOutbox lock poisoned")
            .clone()
    }

    pub fn len(&self) -> usize {
        self.payloads
            .lock()
            .expect("PayloadOutbox lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The most recent payload, if any.
    pub fn last(&self) -> Option<FormPayload> {
        self.payloads
            .lock()
            .expect("PayloadOutbox lock poisoned")
            .last()
            .cloned()
    }
}
