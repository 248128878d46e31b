//! SHA-256 signature generation for Bitunix API authentication.
//!
//! Bitunix private endpoints require a two-pass digest:
//! ```text
//! digest = hex(SHA256(nonce + timestamp + api_key + sorted_query + body))
//! sign   = hex(SHA256(digest + api_secret))
//! ```
//!
//! `sorted_query` is every query parameter as `key` followed by `value`, keys
//! in lexicographic order, no separators. `body` is the compact JSON exactly as
//! sent, or the empty string. The result goes in the `sign` header.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::auth::Credentials;

/// Query parameters of a request, kept sorted by key.
pub type QueryParams = BTreeMap<String, String>;

/// Concatenate query parameters as `key` + `value` pairs in key order.
pub fn sorted_query_string(params: &QueryParams) -> String {
    params.iter().fold(String::new(), |mut acc, (key, value)| {
        acc.push_str(key);
        acc.push_str(value);
        acc
    })
}

/// Sign a request for Bitunix's private API.
///
/// # Arguments
///
/// * `credentials` - API credentials containing the key and secret
/// * `nonce` - The nonce sent in the `nonce` header
/// * `timestamp` - The millisecond timestamp sent in the `timestamp` header
/// * `query` - Query parameters of the request
/// * `body` - The compact JSON body, or `""` for requests without one
///
/// # Returns
///
/// Lowercase hex SHA-256 signature.
///
/// # Example
///
/// ```rust
/// use bitunix_api_client::auth::{Credentials, QueryParams, sign_request};
///
/// let credentials = Credentials::new("api_key", "api_secret");
/// let mut query = QueryParams::new();
/// query.insert("marginCoin".into(), "USDT".into());
/// let signature = sign_request(
///     &credentials,
///     "0123456789abcdef0123456789abcdef",
///     "1700000000000",
///     &query,
///     "",
/// );
/// assert_eq!(signature.len(), 64);
/// ```
pub fn sign_request(
    credentials: &Credentials,
    nonce: &str,
    timestamp: &str,
    query: &QueryParams,
    body: &str,
) -> String {
    let mut first = Sha256::new();
    first.update(nonce.as_bytes());
    first.update(timestamp.as_bytes());
    first.update(credentials.api_key.as_bytes());
    first.update(sorted_query_string(query).as_bytes());
    first.update(body.as_bytes());
    let digest = hex::encode(first.finalize());

    let mut second = Sha256::new();
    second.update(digest.as_bytes());
    second.update(credentials.expose_secret().as_bytes());
    hex::encode(second.finalize())
}
