//! Secondary links to the interactive map.
//!
//! Both links are plain, unsigned URLs carrying the address as a query
//! parameter. Which ones appear, and their `target` / `rel` attributes, is
//! controlled by the selected [`AdvancedSettings`] block.

use address_static_map_models::{AdvancedSettings, LinkKind, MapLink};

use crate::Scheme;
use crate::builder::encode_query;
use crate::provider::StaticMapProvider;

const NOOPENER: &str = "noopener";
const BLANK_TARGET: &str = "_blank";

/// Builds the URL of a secondary link for `address`.
#[must_use]
pub fn link_url(
    provider: &dyn StaticMapProvider,
    scheme: Scheme,
    kind: LinkKind,
    address: &str,
) -> String {
    format!(
        "{}?{}",
        provider.link_endpoint(scheme),
        encode_query(&provider.link_params(kind, address))
    )
}

/// Builds the links enabled by `block`: directions first, then the
/// open-map link.
#[must_use]
pub fn build_links(
    provider: &dyn StaticMapProvider,
    scheme: Scheme,
    block: &AdvancedSettings,
    address: &str,
) -> Vec<MapLink> {
    let target = Some(block.link_target.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let mut links = Vec::new();

    if block.directions_link {
        let rel = target
            .as_ref()
            .filter(|_| block.noopener)
            .map(|_| NOOPENER.to_string());
        links.push(MapLink {
            kind: LinkKind::Directions,
            url: link_url(provider, scheme, LinkKind::Directions, address),
            text: block.directions_text.clone(),
            title: Some(block.directions_text.clone()),
            target: target.clone(),
            rel,
        });
    }

    if block.map_link {
        // rel only matters when the link opens a new window.
        let rel = target
            .as_deref()
            .filter(|t| *t == BLANK_TARGET && block.noopener)
            .map(|_| NOOPENER.to_string());
        links.push(MapLink {
            kind: LinkKind::OpenMap,
            url: link_url(provider, scheme, LinkKind::OpenMap, address),
            text: address.to_string(),
            title: None,
            target,
            rel,
        });
    }

    links
}
