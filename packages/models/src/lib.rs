#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for static map rendering.
//!
//! This crate contains only data types, configuration structs, and simple
//! conversions. It has no heavyweight dependencies (no crypto, no URL
//! handling). The pipeline itself lives in `address_static_map`.

pub mod address;
pub mod credentials;
pub mod render;
pub mod settings;

pub use address::{AddressField, AddressRecord};
pub use credentials::{InvalidCredentialsError, ProviderCredentials, SigningKey};
pub use render::{LinkKind, MapLink, RenderResult};
pub use settings::{
    AdvancedSettings, InvalidScaleError, InvalidZoomLevelError, MapDisplaySettings, MapStyle,
    Scale, ZoomLevel,
};
