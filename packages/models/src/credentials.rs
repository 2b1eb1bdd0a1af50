//! Provider credentials.
//!
//! Two mutually exclusive shapes are supported: a plain API key, or a
//! premium client id plus a signing key used to sign every request URL.
//! Which one applies is decided by configuration, never by the address
//! being rendered.

use serde::Deserialize;

/// URL-safe base64 signing secret for premium (signed) requests.
///
/// Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SigningKey(String);

impl SigningKey {
    /// Wraps a URL-safe base64 encoded key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the encoded key material.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the key is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Credentials for the map-image provider, tagged by `type` in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderCredentials {
    /// Plain API key sent as the `key` parameter.
    ApiKey {
        /// The API key.
        api_key: String,
    },
    /// Premium plan: `client` parameter plus a request `signature`.
    Premium {
        /// Client id sent as the `client` parameter (e.g. `gme-example`).
        client_id: String,
        /// Secret used to compute the request signature.
        signing_key: SigningKey,
    },
}

/// Error returned when a required credential field is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCredentialsError {
    /// Name of the blank field.
    pub field: &'static str,
}

impl std::fmt::Display for InvalidCredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "credential field '{}' is empty", self.field)
    }
}

impl std::error::Error for InvalidCredentialsError {}

impl ProviderCredentials {
    /// Whether requests must be signed.
    #[must_use]
    pub const fn is_premium(&self) -> bool {
        matches!(self, Self::Premium { .. })
    }

    /// Checks that every field of the selected shape is non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCredentialsError`] naming the first blank field.
    pub fn validate(&self) -> Result<(), InvalidCredentialsError> {
        match self {
            Self::ApiKey { api_key } if api_key.trim().is_empty() => {
                Err(InvalidCredentialsError { field: "api_key" })
            }
            Self::Premium { client_id, .. } if client_id.trim().is_empty() => {
                Err(InvalidCredentialsError { field: "client_id" })
            }
            Self::Premium { signing_key, .. } if signing_key.is_empty() => {
                Err(InvalidCredentialsError {
                    field: "signing_key",
                })
            }
            _ => Ok(()),
        }
    }
}
