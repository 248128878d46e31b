//! API key and secret, and where the client gets them from.

use secrecy::{ExposeSecret, SecretString};

use crate::error::ValidationError;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "BITUNIX_API_KEY";
/// Environment variable holding the API secret.
pub const API_SECRET_VAR: &str = "BITUNIX_API_SECRET";

/// A Bitunix API key pair.
///
/// The key travels in the `api-key` header. The secret never leaves the
/// process; it only feeds the second hashing pass of each signature.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    api_secret: SecretString,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// The secret in clear text, for signing.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }

    /// Both halves must be non-empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        crate::validate::validate_credentials(&self.api_key, self.expose_secret())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Source of the credentials a client signs with.
///
/// The client reads them once at build time for the `api-key` header and
/// again on every signed request.
pub trait CredentialsProvider: Send + Sync {
    fn get_credentials(&self) -> &Credentials;
}

/// Credentials fixed at construction.
#[derive(Clone, Debug)]
pub struct StaticCredentials(Credentials);

impl StaticCredentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self(Credentials::new(api_key, api_secret))
    }
}

impl CredentialsProvider for StaticCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.0
    }
}

/// Credentials read from [`API_KEY_VAR`] and [`API_SECRET_VAR`].
#[derive(Clone, Debug)]
pub struct EnvCredentials(Credentials);

impl EnvCredentials {
    /// `None` unless both variables are set.
    pub fn try_from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_key = lookup(API_KEY_VAR)?;
        let api_secret = lookup(API_SECRET_VAR)?;
        Some(Self(Credentials::new(api_key, api_secret)))
    }
}

impl CredentialsProvider for EnvCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", StaticCredentials::new("my_key", "super_secret"));
        assert!(debug.contains("my_key"));
        assert!(!debug.contains("super_secret"));
    }

    #[test]
    fn test_static_credentials_behind_trait_object() {
        let provider: Arc<dyn CredentialsProvider> =
            Arc::new(StaticCredentials::new("key", "secret"));
        let creds = provider.get_credentials();
        assert_eq!(creds.api_key, "key");
        assert_eq!(creds.expose_secret(), "secret");
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(Credentials::new("", "secret").validate().is_err());
        assert!(Credentials::new("key", "").validate().is_err());
        assert!(Credentials::new("key", "secret").validate().is_ok());
    }

    #[test]
    fn test_env_lookup_needs_both_vars() {
        let only_key = EnvCredentials::from_lookup(|name| {
            (name == API_KEY_VAR).then(|| "key".to_string())
        });
        assert!(only_key.is_none());

        let both = EnvCredentials::from_lookup(|name| Some(format!("{name}-value"))).unwrap();
        assert_eq!(both.get_credentials().api_key, "BITUNIX_API_KEY-value");
        assert_eq!(both.get_credentials().expose_secret(), "BITUNIX_API_SECRET-value");
    }
}
