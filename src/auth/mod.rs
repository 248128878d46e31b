//! Authentication module for the Bitunix API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - Random nonce and millisecond timestamp generation
//! - The two-pass SHA-256 signature attached to every private request

mod credentials;
mod nonce;
mod signature;

pub use credentials::{
    API_KEY_VAR, API_SECRET_VAR, Credentials, CredentialsProvider, EnvCredentials,
    StaticCredentials,
};
pub use nonce::{NonceProvider, RandomNonce, SystemClock, TimestampProvider};
pub use signature::{QueryParams, sign_request, sorted_query_string};
