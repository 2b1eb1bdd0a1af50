#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for static map rendering.
//!
//! Provides subcommands for rendering the static map URL (plus optional
//! directions / open-map links) for an address, printing the display
//! settings summary, and signing arbitrary premium request URLs.
//!
//! Configuration is layered: built-in defaults, then `--config` /
//! `STATIC_MAP_CONFIG`, then `STATIC_MAP_*` credential variables, then the
//! display flags given on the command line.

use std::path::{Path, PathBuf};

use address_static_map::config::StaticMapConfig;
use address_static_map::{
    AddressField, AddressRecord, MapDisplaySettings, MapStyle, NormalizedAddress,
    ProviderCredentials, RenderResult, Renderer, Scale, Scheme, UrlSigner, ZoomLevel,
    normalize_lines,
};
use clap::{Args, Parser, Subcommand};

// ---------------------------------------------------------------------------
// CLI definitions
// ---------------------------------------------------------------------------

/// Render signed static map URLs for postal addresses.
#[derive(Parser)]
#[command(name = "address_static_map")]
#[command(about = "Render signed static map URLs for postal addresses")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true, env = "STATIC_MAP_CONFIG")]
    config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Build the static map URL and links for one address.
    Render {
        #[command(flatten)]
        address: AddressArgs,

        #[command(flatten)]
        display: DisplayArgs,

        /// Print the full render result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the display settings summary.
    Summary {
        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Sign a premium request URL with the configured signing key.
    Sign {
        /// Absolute or scheme-relative URL to sign.
        #[arg(long)]
        url: String,

        /// Advanced settings block holding the premium credentials.
        #[arg(long)]
        block: Option<usize>,
    },
}

/// Ids of the per-component address flags.
const COMPONENT_ARGS: [&str; 9] = [
    "organization",
    "address_line1",
    "address_line2",
    "dependent_locality",
    "locality",
    "administrative_area",
    "postal_code",
    "sorting_code",
    "country_code",
];

/// Address components. Blank components are ignored.
#[derive(Args)]
struct AddressArgs {
    /// Organization or company.
    #[arg(long)]
    organization: Option<String>,

    /// Street line.
    #[arg(long)]
    address_line1: Option<String>,

    /// Secondary street line.
    #[arg(long)]
    address_line2: Option<String>,

    /// Neighborhood or suburb.
    #[arg(long)]
    dependent_locality: Option<String>,

    /// City.
    #[arg(long)]
    locality: Option<String>,

    /// State, province or region.
    #[arg(long)]
    administrative_area: Option<String>,

    /// Postal code.
    #[arg(long)]
    postal_code: Option<String>,

    /// Sorting code.
    #[arg(long)]
    sorting_code: Option<String>,

    /// Two-letter country code.
    #[arg(long)]
    country_code: Option<String>,

    /// Pre-rendered multi-line address, used instead of the component flags.
    #[arg(long, conflicts_with_all = COMPONENT_ARGS)]
    lines: Option<String>,
}

impl AddressArgs {
    fn record(&self) -> AddressRecord {
        [
            (AddressField::Organization, &self.organization),
            (AddressField::AddressLine1, &self.address_line1),
            (AddressField::AddressLine2, &self.address_line2),
            (AddressField::DependentLocality, &self.dependent_locality),
            (AddressField::Locality, &self.locality),
            (AddressField::AdministrativeArea, &self.administrative_area),
            (AddressField::PostalCode, &self.postal_code),
            (AddressField::SortingCode, &self.sorting_code),
            (AddressField::CountryCode, &self.country_code),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.clone().map(|v| (field, v)))
        .collect()
    }
}

/// Display setting overrides applied on top of the loaded config.
#[derive(Args)]
struct DisplayArgs {
    /// Zoom level (0-21) or "auto".
    #[arg(long)]
    zoom: Option<ZoomLevel>,

    /// Map size, e.g. "400x400".
    #[arg(long)]
    size: Option<String>,

    /// Image scale: 1, 2 or 4.
    #[arg(long, value_parser = parse_scale)]
    scale: Option<Scale>,

    /// Map style: roadmap, satellite, terrain or hybrid.
    #[arg(long, value_parser = parse_style)]
    style: Option<MapStyle>,

    /// Raw parameters appended verbatim to the image URL.
    #[arg(long)]
    additional: Option<String>,

    /// Advanced settings block index.
    #[arg(long)]
    block: Option<usize>,

    /// Marker icon reference, e.g. "color:red".
    #[arg(long)]
    marker: Option<String>,

    /// Show the address as text.
    #[arg(long)]
    text_address: bool,

    /// Show the address in an info window.
    #[arg(long)]
    info_window: bool,

    /// Prevent scrolling and zooming the map.
    #[arg(long)]
    scroll_lock: bool,

    /// Emit `http://` URLs instead of `https://`.
    #[arg(long)]
    http: bool,
}

fn parse_scale(value: &str) -> Result<Scale, String> {
    let raw: u8 = value
        .parse()
        .map_err(|_| format!("invalid scale '{value}': expected 1, 2 or 4"))?;
    Scale::from_value(raw).map_err(|e| e.to_string())
}

fn parse_style(value: &str) -> Result<MapStyle, String> {
    value.trim().to_ascii_lowercase().parse().map_err(|_| {
        format!("invalid map style '{value}': expected roadmap, satellite, terrain or hybrid")
    })
}

impl DisplayArgs {
    fn apply(&self, settings: &mut MapDisplaySettings) {
        if let Some(zoom) = self.zoom {
            settings.zoom_level = zoom;
        }
        if let Some(size) = &self.size {
            settings.map_size.clone_from(size);
        }
        if let Some(scale) = self.scale {
            settings.scale = scale;
        }
        if let Some(style) = self.style {
            settings.map_style = style;
        }
        if let Some(additional) = &self.additional {
            settings.additional_query_string.clone_from(additional);
        }
        if let Some(block) = self.block {
            settings.advanced_settings_index = block;
        }
        if let Some(marker) = &self.marker {
            settings.marker_style.clone_from(marker);
        }
        settings.show_text_address |= self.text_address;
        settings.show_info_window |= self.info_window;
        settings.scroll_lock |= self.scroll_lock;
    }

    const fn scheme(&self) -> Scheme {
        if self.http { Scheme::Http } else { Scheme::Https }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            address,
            display,
            json,
        } => {
            let mut config = load_config(cli.config.as_deref(), display.block)?;
            display.apply(&mut config.display);
            render(&config, &address, display.scheme(), json)?;
        }
        Commands::Summary { display } => {
            let mut config = load_config(cli.config.as_deref(), display.block)?;
            display.apply(&mut config.display);
            for line in config.display.summary() {
                println!("{line}");
            }
        }
        Commands::Sign { url, block } => {
            let config = load_config(cli.config.as_deref(), block)?;
            let index = block.unwrap_or(config.display.advanced_settings_index);
            let credentials = config
                .block(index)?
                .credentials
                .as_ref()
                .ok_or("No credentials configured for this block")?;
            let ProviderCredentials::Premium { signing_key, .. } = credentials else {
                return Err("Signing requires premium credentials".into());
            };
            println!("{}", UrlSigner::from_base64url(signing_key)?.sign_url(&url)?);
        }
    }

    Ok(())
}

/// Loads the layered config. `block` redirects environment credentials to
/// a block other than the configured default.
fn load_config(
    path: Option<&Path>,
    block: Option<usize>,
) -> Result<StaticMapConfig, Box<dyn std::error::Error>> {
    let mut config = StaticMapConfig::resolve(path)?;
    if let Some(block) = block {
        config.display.advanced_settings_index = block;
        if let Some(credentials) = address_static_map::config::credentials_from_env() {
            config.set_credentials(block, credentials)?;
        }
    }
    Ok(config)
}

fn render(
    config: &StaticMapConfig,
    address: &AddressArgs,
    scheme: Scheme,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let renderer = Renderer::from_config(config, scheme);

    let result = if let Some(lines) = &address.lines {
        match normalize_lines(lines) {
            NormalizedAddress::Address(one_line) => {
                Some(renderer.render_address(&one_line, &config.display)?)
            }
            NormalizedAddress::Skip => None,
        }
    } else {
        renderer.render(&address.record(), &config.display)?
    };

    let Some(result) = result else {
        log::info!("Address has no mappable components; no map rendered");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    Ok(())
}

fn print_result(result: &RenderResult) {
    println!("{}", result.image_url);
    println!("  alt: {}", result.alt_text);
    if let Some(text) = &result.address_text {
        println!("  address: {text}");
    }
    if let Some(info) = &result.info_window {
        println!("  info window: {info}");
    }
    for link in &result.links {
        println!("  {}: {}", link.kind, link.url);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("address_static_map").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn style_flag_parses_map_style() {
        let cli = parse(&["render", "--locality", "London", "--style", "Hybrid"]).unwrap();
        let Commands::Render { display, .. } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(display.style, Some(MapStyle::Hybrid));
        assert!(parse(&["summary", "--style", "watercolor"]).is_err());
    }

    #[test]
    fn display_flags_override_settings() {
        let cli = parse(&[
            "summary", "--zoom", "12", "--size", "640x320", "--scale", "2", "--block", "1",
        ])
        .unwrap();
        let Commands::Summary { display } = cli.command else {
            panic!("expected summary");
        };
        let mut settings = MapDisplaySettings::default();
        display.apply(&mut settings);
        assert_eq!(settings.zoom_level, ZoomLevel::Level(12));
        assert_eq!(settings.map_size, "640x320");
        assert_eq!(settings.scale, Scale::X2);
        assert_eq!(settings.advanced_settings_index, 1);
        assert!(parse(&["summary", "--scale", "3"]).is_err());
    }

    #[test]
    fn lines_conflicts_with_every_component_flag() {
        for id in COMPONENT_ARGS {
            let flag = format!("--{}", id.replace('_', "-"));
            assert!(
                parse(&["render", "--lines", "1 Main St", &flag, "x"]).is_err(),
                "{flag} should conflict with --lines"
            );
        }
        assert!(parse(&["render", "--lines", "1 Main St\nSpringfield"]).is_ok());
    }

    #[test]
    fn component_flags_build_record() {
        let cli = parse(&[
            "render",
            "--address-line1",
            "221B Baker St",
            "--locality",
            "London",
            "--country-code",
            "GB",
        ])
        .unwrap();
        let Commands::Render { address, .. } = cli.command else {
            panic!("expected render");
        };
        let record = address.record();
        assert_eq!(record.get(AddressField::Locality), Some("London"));
        assert_eq!(record.get(AddressField::CountryCode), Some("GB"));
        assert_eq!(record.get(AddressField::Organization), None);
    }
}
