#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static map rendering for structured postal addresses.
//!
//! Turns an [`AddressRecord`] plus [`MapDisplaySettings`] into a static map
//! image URL:
//!
//! 1. **Normalize** the address (skip records holding only a country code).
//! 2. **Resolve** the advanced-settings block that carries the provider
//!    credentials and link behavior.
//! 3. **Build** the provider query (`center`, `zoom`, `size`, `scale`,
//!    `maptype`, `markers`, `client`/`key`), omitting `zoom` when it is
//!    `auto`.
//! 4. **Sign** the path and query with HMAC-SHA1 when premium credentials
//!    are configured.
//!
//! Providers are pluggable through [`provider::StaticMapProvider`]; only
//! Google Static Maps is implemented. Everything here is pure computation:
//! no network calls, no shared mutable state.

pub mod builder;
pub mod config;
pub mod links;
pub mod provider;
pub mod render;

pub use address_static_map_address::{NormalizedAddress, normalize, normalize_lines};
pub use address_static_map_models::{
    AddressField, AddressRecord, AdvancedSettings, LinkKind, MapDisplaySettings, MapLink,
    MapStyle, ProviderCredentials, RenderResult, Scale, SigningKey, ZoomLevel,
};
pub use address_static_map_signing::{SigningError, UrlSigner};
pub use builder::{StaticMapRequest, StaticMapUrlBuilder};
pub use config::StaticMapConfig;
pub use provider::{GoogleStaticMap, ProviderConfig, StaticMapProvider, create_provider};
pub use render::{RenderOutcome, Renderer};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// URL scheme for generated image and link URLs.
///
/// Passed explicitly rather than read from the ambient request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Scheme {
    /// `https://`
    #[default]
    Https,
    /// `http://`
    Http,
}

/// Errors from static map operations.
///
/// Signing keys never appear in any message.
#[derive(Debug, Error)]
pub enum StaticMapError {
    /// Invalid or missing settings or credentials.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },

    /// Malformed signing key material.
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// Reading a config file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StaticMapError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
