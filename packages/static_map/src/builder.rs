//! Static map URL assembly and signing.
//!
//! Builds the image URL for one normalized address:
//!
//! ```text
//! https://maps.googleapis.com/maps/api/staticmap
//!     ?center=…&zoom=…&size=…&scale=…&maptype=…&markers=…
//!     &client=…|&key=…
//!     &<additional>
//!     &signature=…
//! ```
//!
//! `zoom` is omitted for [`ZoomLevel::Auto`], the additional query string
//! is appended verbatim, and `signature` is only present with premium
//! credentials.

use address_static_map_models::{MapDisplaySettings, ProviderCredentials, ZoomLevel};
use address_static_map_signing::{SigningError, UrlSigner};
use url::form_urlencoded;

use crate::provider::{MapQuery, QueryAuth, StaticMapProvider};
use crate::{Scheme, StaticMapError, config};

/// A resolved, not yet signed, image request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMapRequest {
    /// The one-line address being mapped.
    pub address: String,
    /// Image endpoint, without query string.
    pub endpoint: String,
    /// Ordered, unencoded query parameters.
    pub params: Vec<(&'static str, String)>,
    /// Raw parameters appended verbatim after the encoded query.
    pub additional: String,
    /// Whether the URL must be signed.
    pub premium: bool,
}

impl StaticMapRequest {
    /// Returns the value of the first parameter called `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The URL before signing: endpoint, encoded query, then the raw
    /// additional parameters.
    #[must_use]
    pub fn unsigned_url(&self) -> String {
        let mut url = format!("{}?{}", self.endpoint, encode_query(&self.params));
        if !self.additional.is_empty() {
            url.push('&');
            url.push_str(&self.additional);
        }
        url
    }
}

/// Form-urlencodes `params` in order (space as `+`, reserved characters
/// percent-encoded).
pub(crate) fn encode_query(params: &[(&'static str, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in params {
        serializer.append_pair(name, value);
    }
    serializer.finish()
}

/// Builds image URLs against one provider.
#[derive(Clone, Copy)]
pub struct StaticMapUrlBuilder<'a> {
    provider: &'a dyn StaticMapProvider,
    scheme: Scheme,
}

impl<'a> StaticMapUrlBuilder<'a> {
    /// Creates a builder for `provider` emitting `scheme` URLs.
    #[must_use]
    pub const fn new(provider: &'a dyn StaticMapProvider, scheme: Scheme) -> Self {
        Self { provider, scheme }
    }

    /// Validates the inputs and resolves the query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`StaticMapError::Configuration`] if the map size is blank,
    /// the zoom is out of bounds, or a credential field is blank.
    pub fn prepare(
        &self,
        address: &str,
        settings: &MapDisplaySettings,
        credentials: &ProviderCredentials,
    ) -> Result<StaticMapRequest, StaticMapError> {
        config::validate_display(settings, self.provider)?;
        credentials
            .validate()
            .map_err(|e| StaticMapError::configuration(e.to_string()))?;

        let zoom = match settings.zoom_level {
            ZoomLevel::Auto => None,
            ZoomLevel::Level(level) => Some(level),
        };

        let auth = match credentials {
            ProviderCredentials::ApiKey { api_key } => QueryAuth::ApiKey(api_key),
            ProviderCredentials::Premium { client_id, .. } => QueryAuth::Client(client_id),
        };

        let query = MapQuery {
            address,
            zoom,
            size: settings.map_size.trim(),
            scale: settings.scale,
            style: settings.map_style,
            marker_style: &settings.marker_style,
            auth,
        };

        Ok(StaticMapRequest {
            address: address.to_string(),
            endpoint: self.provider.image_endpoint(self.scheme),
            params: self.provider.image_params(&query),
            additional: settings.additional_query_string.clone(),
            premium: credentials.is_premium(),
        })
    }

    /// Builds the final image URL, signed when `credentials` are premium.
    ///
    /// # Errors
    ///
    /// Returns [`StaticMapError::Configuration`] for invalid settings or
    /// credentials (including a blank signing key, or premium credentials
    /// on a provider without signing), and
    /// [`StaticMapError::Signing`] if the signing key does not decode.
    pub fn build(
        &self,
        address: &str,
        settings: &MapDisplaySettings,
        credentials: &ProviderCredentials,
    ) -> Result<String, StaticMapError> {
        let request = self.prepare(address, settings, credentials)?;
        let url = request.unsigned_url();

        match credentials {
            ProviderCredentials::ApiKey { .. } => Ok(url),
            ProviderCredentials::Premium { .. } if !self.provider.supports_signing() => {
                Err(StaticMapError::configuration(format!(
                    "{} does not support premium credentials",
                    self.provider.name()
                )))
            }
            ProviderCredentials::Premium { signing_key, .. } => {
                let signer = UrlSigner::from_base64url(signing_key).map_err(|e| match e {
                    SigningError::EmptyKey => {
                        StaticMapError::configuration("Premium signing key is empty")
                    }
                    other => StaticMapError::Signing(other),
                })?;
                Ok(signer.sign_url(&url)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use address_static_map_models::{MapStyle, Scale, SigningKey};

    use super::*;
    use crate::provider::GoogleStaticMap;

    const ADDRESS: &str = "221B Baker St, London, GB";
    const DOC_KEY: &str = "vNIXE0xscrmjlyV-12Nj_BvUPaw=";

    fn settings() -> MapDisplaySettings {
        MapDisplaySettings {
            map_size: "400x400".to_string(),
            ..MapDisplaySettings::default()
        }
    }

    fn api_key() -> ProviderCredentials {
        ProviderCredentials::ApiKey {
            api_key: "ABC123".to_string(),
        }
    }

    fn premium(key: &str) -> ProviderCredentials {
        ProviderCredentials::Premium {
            client_id: "gme-test".to_string(),
            signing_key: SigningKey::new(key),
        }
    }

    fn build(
        settings: &MapDisplaySettings,
        credentials: &ProviderCredentials,
    ) -> Result<String, StaticMapError> {
        let google = GoogleStaticMap::default();
        StaticMapUrlBuilder::new(&google, Scheme::Https).build(ADDRESS, settings, credentials)
    }

    fn query_names(url: &str) -> Vec<String> {
        let (_, query) = url.split_once('?').unwrap();
        query
            .split('&')
            .filter_map(|pair| pair.split_once('=').map(|(name, _)| name.to_string()))
            .collect()
    }

    #[test]
    fn api_key_scenario() {
        let url = build(&settings(), &api_key()).unwrap();
        assert_eq!(
            url,
            "https://maps.googleapis.com/maps/api/staticmap\
             ?center=221B+Baker+St%2C+London%2C+GB\
             &size=400x400&scale=1&maptype=roadmap\
             &markers=color%3Agreen%7C221B+Baker+St%2C+London%2C+GB\
             &key=ABC123"
        );
        assert!(!query_names(&url).contains(&"zoom".to_string()));
    }

    #[test]
    fn premium_scenario_matches_fixture() {
        let url = build(&settings(), &premium(DOC_KEY)).unwrap();
        assert_eq!(
            url,
            "https://maps.googleapis.com/maps/api/staticmap\
             ?center=221B+Baker+St%2C+London%2C+GB\
             &size=400x400&scale=1&maptype=roadmap\
             &markers=color%3Agreen%7C221B+Baker+St%2C+London%2C+GB\
             &client=gme-test\
             &signature=iy07KMO3aW7ckrw-02POMXXdImE="
        );
    }

    #[test]
    fn premium_signature_covers_zoom_and_additional() {
        let settings = MapDisplaySettings {
            zoom_level: ZoomLevel::Level(15),
            map_size: "640x320".to_string(),
            scale: Scale::X2,
            map_style: MapStyle::Hybrid,
            additional_query_string: "style=feature:poi|visibility:off".to_string(),
            ..MapDisplaySettings::default()
        };
        let url = build(&settings, &premium(DOC_KEY)).unwrap();
        assert!(url.contains("&zoom=15&size=640x320&scale=2&maptype=hybrid&"));
        assert!(url.ends_with(
            "&client=gme-test&style=feature:poi|visibility:off\
             &signature=JCwdoh8DG36B3XNg-lJb4I4iAH4="
        ));
    }

    #[test]
    fn auto_zoom_omits_zoom_param() {
        let google = GoogleStaticMap::default();
        let request = StaticMapUrlBuilder::new(&google, Scheme::Https)
            .prepare(ADDRESS, &settings(), &api_key())
            .unwrap();
        assert_eq!(request.param("zoom"), None);
        assert_eq!(request.param("center"), Some(ADDRESS));
    }

    #[test]
    fn explicit_zoom_is_decimal() {
        let settings = MapDisplaySettings {
            zoom_level: ZoomLevel::Level(5),
            ..settings()
        };
        let url = build(&settings, &api_key()).unwrap();
        assert!(url.contains("&zoom=5&"));
    }

    #[test]
    fn premium_never_emits_key() {
        let url = build(&settings(), &premium(DOC_KEY)).unwrap();
        let names = query_names(&url);
        assert!(names.contains(&"client".to_string()));
        assert!(names.contains(&"signature".to_string()));
        assert!(!names.contains(&"key".to_string()));
    }

    #[test]
    fn api_key_never_emits_client_or_signature() {
        let url = build(&settings(), &api_key()).unwrap();
        let names = query_names(&url);
        assert!(names.contains(&"key".to_string()));
        assert!(!names.contains(&"client".to_string()));
        assert!(!names.contains(&"signature".to_string()));
    }

    #[test]
    fn additional_query_string_is_appended_verbatim() {
        let settings = MapDisplaySettings {
            additional_query_string: "foo=bar".to_string(),
            ..settings()
        };
        let url = build(&settings, &api_key()).unwrap();
        assert!(url.ends_with("&key=ABC123&foo=bar"));

        let styled = MapDisplaySettings {
            additional_query_string: "style=feature:road|color:0xff0000".to_string(),
            ..settings
        };
        assert!(
            build(&styled, &api_key())
                .unwrap()
                .ends_with("&style=feature:road|color:0xff0000")
        );
    }

    #[test]
    fn http_scheme_is_threaded_through() {
        let google = GoogleStaticMap::default();
        let url = StaticMapUrlBuilder::new(&google, Scheme::Http)
            .build(ADDRESS, &settings(), &api_key())
            .unwrap();
        assert!(url.starts_with("http://maps.googleapis.com/maps/api/staticmap?"));
    }

    #[test]
    fn empty_map_size_is_configuration_error() {
        let err = build(&MapDisplaySettings::default(), &api_key()).unwrap_err();
        assert!(matches!(err, StaticMapError::Configuration { .. }));
    }

    #[test]
    fn out_of_bounds_zoom_is_configuration_error() {
        let settings = MapDisplaySettings {
            zoom_level: ZoomLevel::Level(30),
            ..settings()
        };
        assert!(matches!(
            build(&settings, &api_key()),
            Err(StaticMapError::Configuration { .. })
        ));
    }

    #[test]
    fn empty_signing_key_is_configuration_error() {
        assert!(matches!(
            build(&settings(), &premium("")),
            Err(StaticMapError::Configuration { .. })
        ));
        assert!(matches!(
            build(&settings(), &premium("   ")),
            Err(StaticMapError::Configuration { .. })
        ));
    }

    #[test]
    fn malformed_signing_key_is_signing_error() {
        let err = build(&settings(), &premium("not*base64!")).unwrap_err();
        assert!(matches!(err, StaticMapError::Signing(_)));
        assert!(!err.to_string().contains("not*base64!"));
    }

    struct Unsigned(GoogleStaticMap);

    impl StaticMapProvider for Unsigned {
        fn name(&self) -> &str {
            "Unsigned"
        }
        fn min_zoom(&self) -> u8 {
            self.0.min_zoom()
        }
        fn max_zoom(&self) -> u8 {
            self.0.max_zoom()
        }
        fn image_endpoint(&self, scheme: Scheme) -> String {
            self.0.image_endpoint(scheme)
        }
        fn supports_signing(&self) -> bool {
            false
        }
        fn link_endpoint(&self, scheme: Scheme) -> String {
            self.0.link_endpoint(scheme)
        }
        fn image_params(&self, query: &MapQuery<'_>) -> Vec<(&'static str, String)> {
            self.0.image_params(query)
        }
        fn link_params(
            &self,
            kind: address_static_map_models::LinkKind,
            address: &str,
        ) -> Vec<(&'static str, String)> {
            self.0.link_params(kind, address)
        }
    }

    #[test]
    fn premium_on_unsigned_provider_is_configuration_error() {
        let provider = Unsigned(GoogleStaticMap::default());
        let builder = StaticMapUrlBuilder::new(&provider, Scheme::Https);
        assert!(matches!(
            builder.build(ADDRESS, &settings(), &premium(DOC_KEY)),
            Err(StaticMapError::Configuration { .. })
        ));
        assert!(builder.build(ADDRESS, &settings(), &api_key()).is_ok());
    }

    #[test]
    fn unusual_address_content_is_encoded() {
        let google = GoogleStaticMap::default();
        let url = StaticMapUrlBuilder::new(&google, Scheme::Https)
            .build("1 Rue de l'Église & Fils #4, Paris", &settings(), &api_key())
            .unwrap();
        assert!(url.contains("center=1+Rue+de+l%27%C3%89glise+%26+Fils+%234%2C+Paris&"));
    }
}
