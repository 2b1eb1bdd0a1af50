//! Display settings for a rendered static map and the advanced-settings
//! blocks that carry credentials and link behavior.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::credentials::ProviderCredentials;

/// Zoom level for the rendered map.
///
/// [`ZoomLevel::Auto`] leaves the zoom to the provider, which fits the map
/// around the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawZoomLevel", into = "RawZoomLevel")]
pub enum ZoomLevel {
    /// Let the provider pick.
    #[default]
    Auto,
    /// Explicit zoom level. Bounds are provider-specific.
    Level(u8),
}

/// Wire form of [`ZoomLevel`]: the string `"auto"`, an integer, or an
/// integer rendered as a string (as form submissions deliver it).
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawZoomLevel {
    Level(u8),
    Keyword(String),
}

/// Error returned when a zoom level is neither `"auto"` nor an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidZoomLevelError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidZoomLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid zoom level '{}': expected \"auto\" or an integer",
            self.value
        )
    }
}

impl std::error::Error for InvalidZoomLevelError {}

impl std::str::FromStr for ZoomLevel {
    type Err = InvalidZoomLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        trimmed
            .parse::<u8>()
            .map(Self::Level)
            .map_err(|_| InvalidZoomLevelError {
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Level(level) => write!(f, "{level}"),
        }
    }
}

impl TryFrom<RawZoomLevel> for ZoomLevel {
    type Error = InvalidZoomLevelError;

    fn try_from(raw: RawZoomLevel) -> Result<Self, Self::Error> {
        match raw {
            RawZoomLevel::Level(level) => Ok(Self::Level(level)),
            RawZoomLevel::Keyword(keyword) => keyword.parse(),
        }
    }
}

impl From<ZoomLevel> for RawZoomLevel {
    fn from(zoom: ZoomLevel) -> Self {
        match zoom {
            ZoomLevel::Auto => Self::Keyword("auto".to_string()),
            ZoomLevel::Level(level) => Self::Level(level),
        }
    }
}

/// Image scale (pixel density) multiplier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Scale {
    /// Standard density.
    #[default]
    X1 = 1,
    /// Retina density.
    X2 = 2,
    /// Premium-only 4x density.
    X4 = 4,
}

impl Scale {
    /// Returns the numeric multiplier.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a scale from its numeric multiplier.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not 1, 2 or 4.
    pub const fn from_value(value: u8) -> Result<Self, InvalidScaleError> {
        match value {
            1 => Ok(Self::X1),
            2 => Ok(Self::X2),
            4 => Ok(Self::X4),
            _ => Err(InvalidScaleError { value }),
        }
    }
}

/// Error returned when attempting to create a [`Scale`] from an invalid
/// numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidScaleError {
    /// The invalid scale value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid scale {}: expected 1, 2 or 4", self.value)
    }
}

impl std::error::Error for InvalidScaleError {}

impl TryFrom<u8> for Scale {
    type Error = InvalidScaleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<Scale> for u8 {
    fn from(scale: Scale) -> Self {
        scale.value()
    }
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Base map imagery.
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
pub enum MapStyle {
    /// Standard street map.
    #[default]
    Roadmap,
    /// Aerial imagery.
    Satellite,
    /// Physical relief.
    Terrain,
    /// Satellite imagery with road and label overlays.
    Hybrid,
}

impl MapStyle {
    /// Human-readable name shown in settings summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Roadmap => "Roadmap",
            Self::Satellite => "Satellite",
            Self::Terrain => "Terrain",
            Self::Hybrid => "Hybrid",
        }
    }
}

/// Per-display configuration for a static map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapDisplaySettings {
    /// Zoom level, or `auto`.
    pub zoom_level: ZoomLevel,
    /// Provider size spec, e.g. `"400x400"`. Required.
    pub map_size: String,
    /// Image scale multiplier.
    pub scale: Scale,
    /// Base map imagery.
    pub map_style: MapStyle,
    /// Prevent scrolling and zooming the map.
    pub scroll_lock: bool,
    /// Show the address in an info window.
    pub show_info_window: bool,
    /// Show the address as text next to the map.
    pub show_text_address: bool,
    /// Raw query parameters appended verbatim to the image URL.
    pub additional_query_string: String,
    /// Which [`AdvancedSettings`] block supplies credentials and link
    /// behavior.
    pub advanced_settings_index: usize,
    /// Marker icon reference placed before the address in `markers`.
    pub marker_style: String,
}

/// Marker style used when none is configured.
pub const DEFAULT_MARKER_STYLE: &str = "color:green";

impl Default for MapDisplaySettings {
    fn default() -> Self {
        Self {
            zoom_level: ZoomLevel::Auto,
            map_size: String::new(),
            scale: Scale::X1,
            map_style: MapStyle::Roadmap,
            scroll_lock: false,
            show_info_window: false,
            show_text_address: false,
            additional_query_string: String::new(),
            advanced_settings_index: 0,
            marker_style: DEFAULT_MARKER_STYLE.to_string(),
        }
    }
}

impl MapDisplaySettings {
    /// Returns one human-readable line per configured option, for showing
    /// to an administrator next to the display configuration.
    #[must_use]
    pub fn summary(&self) -> Vec<String> {
        let mut summary = vec![
            format!("Zoom level: {}", self.zoom_level),
            format!("Map size: {}", self.map_size),
        ];
        if self.scroll_lock {
            summary.push("Prevent map zoom and scroll".to_string());
        }
        if !self.additional_query_string.is_empty() {
            summary.push(format!(
                "Additional parameters: {}",
                self.additional_query_string
            ));
        }
        if self.show_text_address {
            summary.push("Show the address in text format".to_string());
        }
        if self.show_info_window {
            summary.push("Show the address in an info window".to_string());
        }
        summary.push(format!("Scale: {}", self.scale));
        summary.push(format!("Map style: {}", self.map_style.label()));
        summary
    }
}

/// A credential and link-behavior bundle, selected by
/// [`MapDisplaySettings::advanced_settings_index`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdvancedSettings {
    /// Provider credentials. Rendering fails when absent.
    #[serde(default)]
    pub credentials: Option<ProviderCredentials>,
    /// Emit a link to the interactive map.
    #[serde(default)]
    pub map_link: bool,
    /// Emit a "get directions" link.
    #[serde(default)]
    pub directions_link: bool,
    /// Text and title of the directions link.
    #[serde(default = "default_directions_text")]
    pub directions_text: String,
    /// `target` attribute for generated links (e.g. `_blank`).
    #[serde(default)]
    pub link_target: String,
    /// Add `rel="noopener"` to links that open a new window.
    #[serde(default)]
    pub noopener: bool,
}

fn default_directions_text() -> String {
    "Get directions".to_string()
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            credentials: None,
            map_link: false,
            directions_link: false,
            directions_text: default_directions_text(),
            link_target: String::new(),
            noopener: false,
        }
    }
}
