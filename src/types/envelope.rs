//! The `{code, data, msg}` wrapper around every Bitunix response.

use serde::Deserialize;

/// Response envelope returned by all Bitunix endpoints.
///
/// `code == 0` means success; anything else is an application-level error.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Result code, zero on success
    pub code: i64,
    /// Payload, absent or null for some endpoints
    pub data: Option<T>,
    /// Human-readable message
    #[serde(default, alias = "message")]
    pub msg: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Check the result code.
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Envelope header read before the payload type is known.
#[derive(Debug, Deserialize)]
pub(crate) struct EnvelopeStatus {
    pub code: i64,
    #[serde(default, alias = "message")]
    pub msg: Option<String>,
}
