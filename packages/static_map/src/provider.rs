//! Map-image providers.
//!
//! A provider knows its endpoints, its zoom bounds, and how to spell a
//! [`MapQuery`] as query parameters. The shared pipeline in
//! [`crate::builder`] handles encoding, the raw additional parameters, and
//! signing.
//!
//! Providers are selected by [`ProviderConfig`], tagged by `type` in TOML.
//! Adding a provider means adding a variant and an implementation, never a
//! flag.

use address_static_map_models::{LinkKind, MapStyle, Scale};
use serde::Deserialize;

use crate::Scheme;

/// How a request authenticates with the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryAuth<'a> {
    /// Plain API key.
    ApiKey(&'a str),
    /// Premium client id. The request is signed afterwards.
    Client(&'a str),
}

/// Provider-agnostic description of one image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapQuery<'a> {
    /// One-line address used for both the map center and the marker.
    pub address: &'a str,
    /// Explicit zoom, or `None` to let the provider fit the map.
    pub zoom: Option<u8>,
    /// Provider size spec (e.g. `"400x400"`).
    pub size: &'a str,
    /// Pixel density multiplier.
    pub scale: Scale,
    /// Base map imagery.
    pub style: MapStyle,
    /// Marker icon reference.
    pub marker_style: &'a str,
    /// Authentication parameter.
    pub auth: QueryAuth<'a>,
}

/// A static map image provider.
pub trait StaticMapProvider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Smallest accepted zoom level.
    fn min_zoom(&self) -> u8;

    /// Largest accepted zoom level.
    fn max_zoom(&self) -> u8;

    /// Whether `zoom` is within this provider's bounds.
    fn supports_zoom(&self, zoom: u8) -> bool {
        (self.min_zoom()..=self.max_zoom()).contains(&zoom)
    }

    /// Image endpoint, without query string.
    fn image_endpoint(&self, scheme: Scheme) -> String;

    /// Whether premium requests to this provider carry a `signature`.
    fn supports_signing(&self) -> bool;

    /// Interactive map endpoint used for secondary links.
    fn link_endpoint(&self, scheme: Scheme) -> String;

    /// Ordered, unencoded query parameters for an image request.
    fn image_params(&self, query: &MapQuery<'_>) -> Vec<(&'static str, String)>;

    /// Ordered, unencoded query parameters for a secondary link.
    fn link_params(&self, kind: LinkKind, address: &str) -> Vec<(&'static str, String)>;
}

/// Provider-specific configuration, tagged by `type` in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Google Maps Static API.
    GoogleStaticMap {
        /// Host serving `/maps/api/staticmap`.
        #[serde(default = "default_google_image_host")]
        image_host: String,
        /// Host serving the interactive `/maps` product.
        #[serde(default = "default_google_link_host")]
        link_host: String,
    },
}

fn default_google_image_host() -> String {
    GOOGLE_IMAGE_HOST.to_string()
}

fn default_google_link_host() -> String {
    GOOGLE_LINK_HOST.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::GoogleStaticMap {
            image_host: default_google_image_host(),
            link_host: default_google_link_host(),
        }
    }
}

/// Creates the provider described by `config`.
#[must_use]
pub fn create_provider(config: &ProviderConfig) -> Box<dyn StaticMapProvider> {
    match config {
        ProviderConfig::GoogleStaticMap {
            image_host,
            link_host,
        } => Box::new(GoogleStaticMap::with_hosts(
            image_host.clone(),
            link_host.clone(),
        )),
    }
}

/// Default Google Static Maps host.
pub const GOOGLE_IMAGE_HOST: &str = "maps.googleapis.com";
/// Default Google Maps host for links.
pub const GOOGLE_LINK_HOST: &str = "maps.google.com";

const GOOGLE_IMAGE_PATH: &str = "/maps/api/staticmap";
const GOOGLE_LINK_PATH: &str = "/maps";

/// Google Maps Static API.
///
/// # API Endpoint
///
/// - Image: `https://maps.googleapis.com/maps/api/staticmap?center=…&size=…&key=…`
/// - Link: `https://maps.google.com/maps?q=…` / `?daddr=…`
///
/// Zoom levels run from 0 (whole world) to 21 (individual buildings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleStaticMap {
    image_host: String,
    link_host: String,
}

impl Default for GoogleStaticMap {
    fn default() -> Self {
        Self::with_hosts(GOOGLE_IMAGE_HOST.to_string(), GOOGLE_LINK_HOST.to_string())
    }
}

impl GoogleStaticMap {
    /// Creates a provider against non-default hosts (e.g. a proxy).
    #[must_use]
    pub const fn with_hosts(image_host: String, link_host: String) -> Self {
        Self {
            image_host,
            link_host,
        }
    }
}

impl StaticMapProvider for GoogleStaticMap {
    fn name(&self) -> &str {
        "Google Static Maps"
    }

    fn min_zoom(&self) -> u8 {
        0
    }

    fn max_zoom(&self) -> u8 {
        21
    }

    fn image_endpoint(&self, scheme: Scheme) -> String {
        format!("{scheme}://{}{GOOGLE_IMAGE_PATH}", self.image_host)
    }

    fn supports_signing(&self) -> bool {
        true
    }

    fn link_endpoint(&self, scheme: Scheme) -> String {
        format!("{scheme}://{}{GOOGLE_LINK_PATH}", self.link_host)
    }

    fn image_params(&self, query: &MapQuery<'_>) -> Vec<(&'static str, String)> {
        let mut params = vec![("center", query.address.to_string())];

        if let Some(zoom) = query.zoom {
            params.push(("zoom", zoom.to_string()));
        }

        params.push(("size", query.size.to_string()));
        params.push(("scale", query.scale.to_string()));
        params.push(("maptype", query.style.to_string()));
        params.push((
            "markers",
            [query.marker_style, query.address].join("|"),
        ));

        match query.auth {
            QueryAuth::Client(client_id) => params.push(("client", client_id.to_string())),
            QueryAuth::ApiKey(api_key) => params.push(("key", api_key.to_string())),
        }

        params
    }

    fn link_params(&self, kind: LinkKind, address: &str) -> Vec<(&'static str, String)> {
        match kind {
            LinkKind::Directions => vec![("daddr", address.to_string())],
            LinkKind::OpenMap => vec![("q", address.to_string())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(zoom: Option<u8>, auth: QueryAuth<'static>) -> MapQuery<'static> {
        MapQuery {
            address: "221B Baker St, London, GB",
            zoom,
            size: "400x400",
            scale: Scale::X1,
            style: MapStyle::Roadmap,
            marker_style: "color:green",
            auth,
        }
    }

    fn names(params: &[(&'static str, String)]) -> Vec<&'static str> {
        params.iter().map(|(name, _)| *name).collect()
    }

    #[test]
    fn google_params_follow_stable_order() {
        let params = GoogleStaticMap::default().image_params(&query(
            Some(5),
            QueryAuth::ApiKey("ABC123"),
        ));
        assert_eq!(
            names(&params),
            vec!["center", "zoom", "size", "scale", "maptype", "markers", "key"]
        );
    }

    #[test]
    fn google_params_omit_zoom_when_auto() {
        let params =
            GoogleStaticMap::default().image_params(&query(None, QueryAuth::Client("gme-test")));
        assert_eq!(
            names(&params),
            vec!["center", "size", "scale", "maptype", "markers", "client"]
        );
    }

    #[test]
    fn google_marker_joins_style_and_address() {
        let params = GoogleStaticMap::default().image_params(&query(None, QueryAuth::ApiKey("k")));
        let markers = params
            .iter()
            .find(|(name, _)| *name == "markers")
            .map(|(_, value)| value.as_str());
        assert_eq!(markers, Some("color:green|221B Baker St, London, GB"));
    }

    #[test]
    fn google_endpoints_respect_scheme() {
        let google = GoogleStaticMap::default();
        assert_eq!(
            google.image_endpoint(Scheme::Https),
            "https://maps.googleapis.com/maps/api/staticmap"
        );
        assert_eq!(
            google.image_endpoint(Scheme::Http),
            "http://maps.googleapis.com/maps/api/staticmap"
        );
        assert_eq!(
            google.link_endpoint(Scheme::Https),
            "https://maps.google.com/maps"
        );
    }

    #[test]
    fn google_zoom_bounds() {
        let google = GoogleStaticMap::default();
        assert!(google.supports_zoom(0));
        assert!(google.supports_zoom(21));
        assert!(!google.supports_zoom(22));
        assert!(google.supports_signing());
    }

    #[test]
    fn create_provider_uses_configured_hosts() {
        let provider = create_provider(&ProviderConfig::GoogleStaticMap {
            image_host: "maps.example.test".to_string(),
            link_host: "links.example.test".to_string(),
        });
        assert_eq!(
            provider.image_endpoint(Scheme::Https),
            "https://maps.example.test/maps/api/staticmap"
        );
        assert_eq!(
            provider.link_endpoint(Scheme::Http),
            "http://links.example.test/maps"
        );
        assert_eq!(provider.name(), "Google Static Maps");
    }
}
