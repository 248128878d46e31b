//! Nonce and timestamp generation for Bitunix API authentication.
//!
//! Every private request carries a fresh random nonce and the current time in
//! milliseconds. Both are mixed into the signature, so a request can't be
//! replayed with a different body.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng as _;

/// Trait for providing nonces for authenticated requests.
pub trait NonceProvider: Send + Sync {
    /// Generate the nonce for the next request.
    ///
    /// Must not repeat across requests.
    fn next_nonce(&self) -> String;
}

/// A nonce provider drawing 128 random bits per call, encoded as 32 lowercase
/// hex characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNonce;

impl RandomNonce {
    /// Create a new random nonce provider.
    pub fn new() -> Self {
        Self
    }
}

impl NonceProvider for RandomNonce {
    fn next_nonce(&self) -> String {
        let mut bytes = [0u8; 16];
        rand::rng().fill(&mut bytes);
        hex::encode(bytes)
    }
}

/// Trait for providing request timestamps.
pub trait TimestampProvider: Send + Sync {
    /// Milliseconds since the UNIX epoch.
    fn timestamp_millis(&self) -> u64;
}

/// Wall-clock timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimestampProvider for SystemClock {
    fn timestamp_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}
