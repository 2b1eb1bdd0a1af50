//! Configuration loading and validation.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. The embedded default (`config/default.toml`, baked in at compile
//!    time via [`include_str!`]). It never contains credentials.
//! 2. An optional TOML file, passed explicitly or named by
//!    `STATIC_MAP_CONFIG`. Its tables are merged key by key over the
//!    embedded default; `[[advanced_settings]]` entries merge by position.
//! 3. Credential overrides from `STATIC_MAP_API_KEY`,
//!    `STATIC_MAP_CLIENT_ID` and `STATIC_MAP_SIGNING_KEY`, applied to the
//!    selected advanced-settings block.

use std::path::Path;

use address_static_map_models::{
    AdvancedSettings, MapDisplaySettings, ProviderCredentials, SigningKey, ZoomLevel,
};
use serde::Deserialize;

use crate::StaticMapError;
use crate::provider::{ProviderConfig, StaticMapProvider};

/// Environment variable naming a config file.
pub const CONFIG_PATH_ENV: &str = "STATIC_MAP_CONFIG";
/// Environment variable holding a plain API key.
pub const API_KEY_ENV: &str = "STATIC_MAP_API_KEY";
/// Environment variable holding a premium client id.
pub const CLIENT_ID_ENV: &str = "STATIC_MAP_CLIENT_ID";
/// Environment variable holding a premium signing key.
pub const SIGNING_KEY_ENV: &str = "STATIC_MAP_SIGNING_KEY";

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Complete renderer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StaticMapConfig {
    /// Which provider renders the map.
    pub provider: ProviderConfig,
    /// Display settings.
    pub display: MapDisplaySettings,
    /// Credential and link-behavior blocks, indexed by
    /// [`MapDisplaySettings::advanced_settings_index`].
    pub advanced_settings: Vec<AdvancedSettings>,
}

impl StaticMapConfig {
    /// Returns the embedded default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (this is a compile-time
    /// guarantee since the config is embedded).
    #[must_use]
    pub fn embedded_default() -> Self {
        Self::from_toml_str(DEFAULT_CONFIG_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded static map config: {e}"))
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`StaticMapError::Configuration`] if the TOML is malformed
    /// or holds out-of-range values (e.g. `scale = 3`).
    pub fn from_toml_str(text: &str) -> Result<Self, StaticMapError> {
        toml::from_str(text).map_err(invalid_toml)
    }

    /// Parses TOML text layered over the embedded default.
    ///
    /// Keys missing from `text` keep their default values, so a file that
    /// only sets `[display]` still has both default blocks.
    ///
    /// # Errors
    ///
    /// Returns [`StaticMapError::Configuration`] if the TOML is malformed
    /// or the merged result holds out-of-range values.
    pub fn from_toml_overlay(text: &str) -> Result<Self, StaticMapError> {
        let mut merged: toml::Table = toml::from_str(DEFAULT_CONFIG_TOML).map_err(invalid_toml)?;
        let overlay: toml::Table = toml::from_str(text).map_err(invalid_toml)?;
        merge_tables(&mut merged, overlay);
        toml::Value::Table(merged).try_into().map_err(invalid_toml)
    }

    /// Reads a TOML config file and layers it over the embedded default.
    ///
    /// # Errors
    ///
    /// Returns [`StaticMapError::Io`] if the file cannot be read, or
    /// [`StaticMapError::Configuration`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, StaticMapError> {
        log::debug!("Loading static map config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_overlay(&text)
    }

    /// Loads the config from `path`, or from `STATIC_MAP_CONFIG`, or falls
    /// back to the embedded default, then applies environment credential
    /// overrides to the selected block.
    ///
    /// # Errors
    ///
    /// Returns [`StaticMapError`] if a config file cannot be loaded or the
    /// selected block does not exist.
    pub fn resolve(path: Option<&Path>) -> Result<Self, StaticMapError> {
        let env_path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|p| !p.is_empty());

        let mut config = match (path, env_path) {
            (Some(path), _) => Self::load(path)?,
            (None, Some(env_path)) => Self::load(Path::new(&env_path))?,
            (None, None) => Self::embedded_default(),
        };

        if let Some(credentials) = credentials_from_env() {
            let index = config.display.advanced_settings_index;
            config.set_credentials(index, credentials)?;
        }

        Ok(config)
    }

    /// Returns the advanced-settings block at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StaticMapError::Configuration`] if no such block exists.
    pub fn block(&self, index: usize) -> Result<&AdvancedSettings, StaticMapError> {
        resolve_block(&self.advanced_settings, index)
    }

    /// Replaces the credentials of the block at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StaticMapError::Configuration`] if no such block exists.
    pub fn set_credentials(
        &mut self,
        index: usize,
        credentials: ProviderCredentials,
    ) -> Result<(), StaticMapError> {
        let count = self.advanced_settings.len();
        let block = self.advanced_settings.get_mut(index).ok_or_else(|| {
            StaticMapError::configuration(format!(
                "Advanced settings block {index} does not exist ({count} configured)"
            ))
        })?;
        log::debug!(
            "Using {} credentials for advanced settings block {index}",
            if credentials.is_premium() {
                "premium"
            } else {
                "API key"
            }
        );
        block.credentials = Some(credentials);
        Ok(())
    }
}

// Only the message is kept: the full error quotes the offending line,
// which may hold a signing key.
fn invalid_toml(e: toml::de::Error) -> StaticMapError {
    StaticMapError::configuration(format!("Invalid config: {}", e.message()))
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

fn merge_value(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => merge_tables(base, overlay),
        (toml::Value::Array(base), toml::Value::Array(overlay))
            if is_table_array(base.as_slice()) && is_table_array(overlay.as_slice()) =>
        {
            for (index, item) in overlay.into_iter().enumerate() {
                match base.get_mut(index) {
                    Some(existing) => merge_value(existing, item),
                    None => base.push(item),
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn is_table_array(values: &[toml::Value]) -> bool {
    values.iter().all(toml::Value::is_table)
}

/// Returns the block at `index`.
///
/// # Errors
///
/// Returns [`StaticMapError::Configuration`] if no such block exists.
pub fn resolve_block(
    blocks: &[AdvancedSettings],
    index: usize,
) -> Result<&AdvancedSettings, StaticMapError> {
    blocks.get(index).ok_or_else(|| {
        StaticMapError::configuration(format!(
            "Advanced settings block {index} does not exist ({} configured)",
            blocks.len()
        ))
    })
}

/// Returns the credentials configured on `block`.
///
/// # Errors
///
/// Returns [`StaticMapError::Configuration`] if the block has none or a
/// required field is blank.
pub fn resolve_credentials(
    block: &AdvancedSettings,
) -> Result<&ProviderCredentials, StaticMapError> {
    let credentials = block.credentials.as_ref().ok_or_else(|| {
        StaticMapError::configuration(
            "No provider credentials configured: set an API key or a client id and signing key",
        )
    })?;
    credentials
        .validate()
        .map_err(|e| StaticMapError::configuration(e.to_string()))?;
    Ok(credentials)
}

/// Checks display settings against the provider.
///
/// # Errors
///
/// Returns [`StaticMapError::Configuration`] if the map size is blank or
/// the zoom level is outside the provider's bounds.
pub fn validate_display(
    settings: &MapDisplaySettings,
    provider: &dyn StaticMapProvider,
) -> Result<(), StaticMapError> {
    if settings.map_size.trim().is_empty() {
        return Err(StaticMapError::configuration("Map size is required"));
    }

    match settings.zoom_level {
        ZoomLevel::Level(zoom) if !provider.supports_zoom(zoom) => {
            Err(StaticMapError::configuration(format!(
                "Zoom level {zoom} is outside {} bounds ({}-{})",
                provider.name(),
                provider.min_zoom(),
                provider.max_zoom()
            )))
        }
        _ => Ok(()),
    }
}

/// Builds credentials from raw values.
///
/// A client id selects premium mode; the signing key is then required
/// even if blank, so that a missing key fails loudly instead of producing
/// an unsigned or mis-signed URL. An API key alone selects API-key mode.
#[must_use]
pub fn credentials_from_values(
    api_key: Option<String>,
    client_id: Option<String>,
    signing_key: Option<String>,
) -> Option<ProviderCredentials> {
    let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    let client_id = non_blank(client_id);

    if client_id.is_none() && signing_key.as_deref().is_some_and(|k| !k.trim().is_empty()) {
        log::warn!("{SIGNING_KEY_ENV} is set without {CLIENT_ID_ENV}; ignoring the signing key");
    }

    match (client_id, non_blank(api_key)) {
        (Some(client_id), _) => Some(ProviderCredentials::Premium {
            client_id,
            signing_key: SigningKey::new(signing_key.unwrap_or_default()),
        }),
        (None, Some(api_key)) => Some(ProviderCredentials::ApiKey { api_key }),
        (None, None) => None,
    }
}

/// Reads credential overrides from `STATIC_MAP_*` environment variables.
#[must_use]
pub fn credentials_from_env() -> Option<ProviderCredentials> {
    credentials_from_values(
        std::env::var(API_KEY_ENV).ok(),
        std::env::var(CLIENT_ID_ENV).ok(),
        std::env::var(SIGNING_KEY_ENV).ok(),
    )
}
