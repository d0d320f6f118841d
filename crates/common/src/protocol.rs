//! Record types exchanged by batch tooling.
//!
//! Batches are newline-delimited JSON: one [`FieldRecord`] per input line, one
//! [`RekeyOutcome`] per output line. Record ids are opaque to this crate; they
//! are typically the primary key of the row the token was read from.

use serde::{Deserialize, Serialize};

use crate::error::FieldCryptError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A stored field value addressed by the id of its owning row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Opaque row identifier, echoed back in the outcome.
    pub id: String,
    /// The ciphertext token currently stored for this row.
    pub value: String,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Result of re-keying a single [`FieldRecord`].
///
/// Exactly one of `value` and `error` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RekeyOutcome {
    /// Row identifier copied from the input record.
    pub id: String,
    /// The replacement token, on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Why the record could not be re-keyed, on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl RekeyOutcome {
    /// Successful outcome carrying the new token.
    pub fn ok(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: Some(value.into()),
            error: None,
        }
    }

    /// Failed outcome carrying the error code and message.
    pub fn failed(id: impl Into<String>, err: &FieldCryptError) -> Self {
        Self {
            id: id.into(),
            value: None,
            error: Some(ErrorResponse::from(err)),
        }
    }

    /// Returns `true` if this record was re-keyed.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Standard error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"malformed_token"`).
    pub code: String,
    /// Human-readable description. Never contains field contents.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&FieldCryptError> for ErrorResponse {
    fn from(err: &FieldCryptError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}
