//! Output of a single address render.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Kind of secondary link emitted next to the map image.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LinkKind {
    /// "Get directions" to the address.
    Directions,
    /// Open the address in the interactive map.
    OpenMap,
}

/// A plain (unsigned) link to the interactive map product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLink {
    /// What the link does.
    pub kind: LinkKind,
    /// Absolute link URL.
    pub url: String,
    /// Link text.
    pub text: String,
    /// `title` attribute.
    pub title: Option<String>,
    /// `target` attribute.
    pub target: Option<String>,
    /// `rel` attribute.
    pub rel: Option<String>,
}

/// The rendered map for one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    /// Static map image URL, signed when premium credentials are used.
    pub image_url: String,
    /// Alt text for the image.
    pub alt_text: String,
    /// The one-line address, when text output is enabled.
    pub address_text: Option<String>,
    /// Info window content, when enabled.
    pub info_window: Option<String>,
    /// Whether the host should prevent scrolling and zooming.
    pub scroll_lock: bool,
    /// Secondary links, in emission order.
    pub links: Vec<MapLink>,
}

impl RenderResult {
    /// Returns the first link of the given kind.
    #[must_use]
    pub fn link(&self, kind: LinkKind) -> Option<&MapLink> {
        self.links.iter().find(|link| link.kind == kind)
    }
}
