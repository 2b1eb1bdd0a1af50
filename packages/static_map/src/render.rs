//! Per-address render pipeline.
//!
//! [`Renderer::render`] runs one address through normalization, block
//! resolution, URL building and link generation. [`Renderer::render_items`]
//! does the same for every address of a field, isolating failures so that
//! one bad item never takes down its siblings.

use address_static_map_address::{NormalizedAddress, normalize};
use address_static_map_models::{
    AddressRecord, AdvancedSettings, MapDisplaySettings, RenderResult,
};

use crate::builder::StaticMapUrlBuilder;
use crate::config::{self, StaticMapConfig};
use crate::links::build_links;
use crate::provider::{StaticMapProvider, create_provider};
use crate::{Scheme, StaticMapError};

/// Outcome of rendering one item in [`Renderer::render_items`].
#[derive(Debug)]
pub enum RenderOutcome {
    /// Not enough address data to place a pin.
    Skipped,
    /// The map was rendered.
    Rendered(Box<RenderResult>),
    /// Rendering this item failed; the map should be omitted.
    Failed(StaticMapError),
}

/// Renders static maps for addresses against one provider.
pub struct Renderer {
    provider: Box<dyn StaticMapProvider>,
    scheme: Scheme,
    blocks: Vec<AdvancedSettings>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("provider", &self.provider.name())
            .field("scheme", &self.scheme)
            .field("blocks", &self.blocks.len())
            .finish()
    }
}

impl Renderer {
    /// Creates a renderer from its parts.
    #[must_use]
    pub const fn new(
        provider: Box<dyn StaticMapProvider>,
        scheme: Scheme,
        blocks: Vec<AdvancedSettings>,
    ) -> Self {
        Self {
            provider,
            scheme,
            blocks,
        }
    }

    /// Creates a renderer for the provider and blocks in `config`.
    #[must_use]
    pub fn from_config(config: &StaticMapConfig, scheme: Scheme) -> Self {
        Self::new(
            create_provider(&config.provider),
            scheme,
            config.advanced_settings.clone(),
        )
    }

    /// The provider maps are rendered with.
    #[must_use]
    pub fn provider(&self) -> &dyn StaticMapProvider {
        self.provider.as_ref()
    }

    /// Renders the map for one address record.
    ///
    /// Returns `Ok(None)` when the record does not hold enough data to
    /// place a pin.
    ///
    /// # Errors
    ///
    /// Returns [`StaticMapError`] if the settings, block, or credentials
    /// are invalid, or signing fails.
    pub fn render(
        &self,
        record: &AddressRecord,
        settings: &MapDisplaySettings,
    ) -> Result<Option<RenderResult>, StaticMapError> {
        match normalize(record) {
            NormalizedAddress::Skip => Ok(None),
            NormalizedAddress::Address(address) => {
                self.render_address(&address, settings).map(Some)
            }
        }
    }

    /// Renders the map for an already-normalized one-line address.
    ///
    /// # Errors
    ///
    /// Returns [`StaticMapError`] if the settings, block, or credentials
    /// are invalid, or signing fails.
    pub fn render_address(
        &self,
        address: &str,
        settings: &MapDisplaySettings,
    ) -> Result<RenderResult, StaticMapError> {
        let block = config::resolve_block(&self.blocks, settings.advanced_settings_index)?;
        let credentials = config::resolve_credentials(block)?;

        let image_url = StaticMapUrlBuilder::new(self.provider.as_ref(), self.scheme)
            .build(address, settings, credentials)?;

        log::debug!(
            "Rendered {} map ({} mode)",
            self.provider.name(),
            if credentials.is_premium() {
                "premium"
            } else {
                "API key"
            }
        );

        Ok(RenderResult {
            image_url,
            alt_text: address.to_string(),
            address_text: settings.show_text_address.then(|| address.to_string()),
            info_window: settings.show_info_window.then(|| address.to_string()),
            scroll_lock: settings.scroll_lock,
            links: build_links(self.provider.as_ref(), self.scheme, block, address),
        })
    }

    /// Renders every record, in order.
    ///
    /// Failures are logged and reported per item as
    /// [`RenderOutcome::Failed`]; they never stop the remaining items.
    #[must_use]
    pub fn render_items(
        &self,
        records: &[AddressRecord],
        settings: &MapDisplaySettings,
    ) -> Vec<RenderOutcome> {
        records
            .iter()
            .enumerate()
            .map(|(delta, record)| match self.render(record, settings) {
                Ok(Some(result)) => RenderOutcome::Rendered(Box::new(result)),
                Ok(None) => {
                    log::debug!("Skipping item {delta}: address has no mappable components");
                    RenderOutcome::Skipped
                }
                Err(e) => {
                    log::warn!("Omitting map for item {delta}: {e}");
                    RenderOutcome::Failed(e)
                }
            })
            .collect()
    }
}
