//! Core error types for sitewire.
//!
//! [`SiteError`] covers the infrastructure failures that can surface while a
//! page is being wired up: malformed selectors, bad configuration, unusable
//! locations, storage problems, and submission transport failures. Field
//! validation failures are not errors in this sense; they are reported inline
//! on the page and never escape to the caller.

use thiserror::Error;

/// The primary error type for sitewire.
///
/// Each variant carries a human-readable description. Errors are produced at
/// bind/bootstrap time or by the submission boundary; event listeners swallow
/// and log them rather than propagating.
#[derive(Error, Debug)]
pub enum SiteError {
    // ── Document ─────────────────────────────────────────────────────

    /// A CSS selector could not be parsed.
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// The selector text as given.
        selector: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A node handle does not belong to the document it was used with.
    #[error("Unknown node: {0}")]
    UnknownNode(usize),

    /// A location or link target could not be parsed as a URL.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL text as given.
        url: String,
        /// Why parsing failed.
        reason: String,
    },

    // ── Lifecycle ────────────────────────────────────────────────────

    /// The document already has a live page runtime bound to it.
    #[error("Page behaviours are already initialized for this document")]
    AlreadyInitialized,

    /// An asynchronous step required a runtime that is not available.
    #[error("No async runtime available: {0}")]
    NoRuntime(String),

    // ── Submission ───────────────────────────────────────────────────

    /// A form submission could not be delivered.
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SiteError {
    /// Builds an [`SiteError::InvalidSelector`] from a selector and reason.
    pub fn invalid_selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors caused by page markup or configuration
    /// rather than by the environment.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidSelector { .. } | Self::InvalidUrl { .. } | Self::ConfigurationError(_)
        )
    }
}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, SiteError>`.
pub type SiteResult<T> = Result<T, SiteError>;
