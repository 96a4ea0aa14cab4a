//! Submission boundary and lifecycle state.
//!
//! The engine hands a [`FormPayload`] to a [`Submitter`] and reacts to the
//! result. [`SimulatedSubmitter`] stands in for a backend by waiting a fixed
//! latency and succeeding.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use sitewire_dom::{FormPayload, NodeId};
use thiserror::Error;

use crate::validation::FieldError;

/// Lifecycle of one form's submission.
///
/// ```text
/// Idle -> Validating -> Invalid -> Idle
///                    -> Submitting -> Submitted -> Redirecting
///                                  -> Failed -> Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Invalid,
    Submitting,
    Submitted,
    Failed,
    Redirecting,
}

impl SubmissionState {
    /// Whether a submission is in flight or the page is about to leave.
    ///
    /// A submit arriving in one of these states is ignored.
    pub const fn is_busy(self) -> bool {
        matches!(
            self,
            Self::Validating | Self::Submitting | Self::Submitted | Self::Redirecting
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Invalid => "invalid",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
            Self::Failed => "failed",
            Self::Redirecting => "redirecting",
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitter's failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The backend could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
    /// The backend refused the submission.
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Delivers a form payload to wherever submissions go.
#[async_trait]
pub trait Submitter: Send + Sync {
    /// Submits `payload`. The form stays in `Submitting` until this resolves.
    async fn submit(&self, payload: &FormPayload) -> Result<(), SubmitError>;
}

/// Waits a fixed latency and reports success. Nothing is transmitted.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedSubmitter {
    latency: Duration,
}

impl SimulatedSubmitter {
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub const fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[async_trait]
impl Submitter for SimulatedSubmitter {
    async fn submit(&self, payload: &FormPayload) -> Result<(), SubmitError> {
        tracing::debug!(fields = payload.len(), "simulated submission");
        tokio::time::sleep(self.latency).await;
        Ok(())
    }
}

/// How a submit attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Validation failed; nothing was submitted.
    Invalid {
        /// Failing fields with their first error, in form order.
        #[serde(skip)]
        errors: Vec<(NodeId, FieldError)>,
    },
    /// Submitted and navigated to the confirmation page.
    Redirected {
        /// The resolved confirmation URL.
        location: String,
    },
    /// The submitter failed; the form is usable again.
    Failed {
        /// The submitter's error text.
        reason: String,
    },
    /// A submission was already in flight.
    Ignored,
}

impl SubmitOutcome {
    pub const fn is_redirected(&self) -> bool {
        matches!(self, Self::Redirected { .. })
    }
}
