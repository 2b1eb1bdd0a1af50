#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request signing for premium static map URLs.
//!
//! Premium requests carry a `client` parameter and a `signature` computed
//! over the path and query of the URL:
//!
//! 1. Decode the signing key from URL-safe base64 (`-`/`_` in place of
//!    `+`/`/`) to raw bytes.
//! 2. HMAC-SHA1 the path+query (everything after the host) with those
//!    bytes.
//! 3. Encode the digest as URL-safe base64 and append it as
//!    `&signature=<value>`.
//!
//! See <https://developers.google.com/maps/documentation/maps-static/digital-signature>

use address_static_map_models::SigningKey;
use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

/// URL-safe decoder that tolerates missing or extra padding.
const KEY_DECODER: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors from signing operations.
///
/// Messages never include key material.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The signing key is blank.
    #[error("Signing key is empty")]
    EmptyKey,

    /// The signing key is not valid URL-safe base64.
    #[error("Signing key is not valid URL-safe base64")]
    InvalidKey,

    /// The URL has no path to sign.
    #[error("Cannot sign URL: {message}")]
    InvalidUrl {
        /// Description of the problem.
        message: String,
    },
}

/// Signs request paths with a decoded premium signing key.
#[derive(Clone)]
pub struct UrlSigner {
    mac: HmacSha1,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner").finish_non_exhaustive()
    }
}

impl UrlSigner {
    /// Creates a signer from a URL-safe base64 signing key.
    ///
    /// Whitespace is ignored, and standard-alphabet `+`/`/` are accepted
    /// alongside `-`/`_`.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::EmptyKey`] for a blank key and
    /// [`SigningError::InvalidKey`] when the key does not decode.
    pub fn from_base64url(key: &SigningKey) -> Result<Self, SigningError> {
        let cleaned: String = key
            .expose()
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                other => other,
            })
            .collect();

        if cleaned.is_empty() {
            return Err(SigningError::EmptyKey);
        }

        let bytes = KEY_DECODER
            .decode(cleaned.as_bytes())
            .map_err(|_| SigningError::InvalidKey)?;

        if bytes.is_empty() {
            return Err(SigningError::EmptyKey);
        }

        let mac = HmacSha1::new_from_slice(&bytes).map_err(|_| SigningError::InvalidKey)?;

        Ok(Self { mac })
    }

    /// Returns the URL-safe base64 HMAC-SHA1 signature of `path_and_query`.
    #[must_use]
    pub fn sign(&self, path_and_query: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(path_and_query.as_bytes());
        URL_SAFE.encode(mac.finalize().into_bytes())
    }

    /// Signs a full URL and returns it with `signature` appended.
    ///
    /// Accepts absolute (`https://host/path?query`) and scheme-relative
    /// (`//host/path?query`) URLs. Only the path and query are signed.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::InvalidUrl`] if the URL has no host or path.
    pub fn sign_url(&self, url: &str) -> Result<String, SigningError> {
        let path_and_query = path_and_query(url)?;
        let signature = self.sign(path_and_query);

        let separator = if url.contains('?') { '&' } else { '?' };
        log::trace!("Signed request path ({} bytes)", path_and_query.len());

        Ok(format!("{url}{separator}signature={signature}"))
    }
}

/// Returns the part of `url` after the scheme and host, starting at `/`.
///
/// The host ends at the first `/`, `?` or `#`; a `/` inside the query is
/// never taken for the path.
///
/// # Errors
///
/// Returns [`SigningError::InvalidUrl`] if the URL has no host or path.
pub fn path_and_query(url: &str) -> Result<&str, SigningError> {
    let without_scheme = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .or_else(|| url.strip_prefix("//"))
        .ok_or_else(|| SigningError::InvalidUrl {
            message: "missing scheme or host".to_string(),
        })?;

    let path_start = without_scheme
        .find(['/', '?', '#'])
        .filter(|&i| without_scheme[i..].starts_with('/'))
        .ok_or_else(|| SigningError::InvalidUrl {
            message: "missing path".to_string(),
        })?;

    if path_start == 0 {
        return Err(SigningError::InvalidUrl {
            message: "missing host".to_string(),
        });
    }

    Ok(&without_scheme[path_start..])
}
