use serde::{Deserialize, Serialize};
use std::fmt;

/// Malformed record construction (bad enum value, inverted timestamps).
pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
/// Caller role may not apply status transitions.
pub const TRANSITION_UNAUTHORIZED: &str = "TRANSITION_UNAUTHORIZED";
/// Target status is not reachable from the current status under the policy.
pub const TRANSITION_INVALID: &str = "TRANSITION_INVALID";
/// Target status equals the current status. Benign: callers skip persistence.
pub const TRANSITION_NOOP: &str = "TRANSITION_NOOP";
/// Raw backend payload is not decodable at all (per-row problems are warnings).
pub const INGEST_DECODE_FAILED: &str = "INGEST_DECODE_FAILED";
/// A computed timestamp could not be formatted as RFC3339.
pub const TIME_FORMAT_FAILED: &str = "TIME_FORMAT_FAILED";

/// Single structured error shape used across the core and exposed to the
/// embedding shell unchanged. Callers dispatch on `code`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoreError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl CoreError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// True for the benign same-status transition outcome; everything else is
    /// a hard error from the caller's point of view.
    pub fn is_no_op(&self) -> bool {
        self.code == TRANSITION_NOOP
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for CoreError {}
