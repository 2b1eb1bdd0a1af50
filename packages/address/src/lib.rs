#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address filtering and normalization for static map requests.
//!
//! Address fields arrive in many shapes:
//! - Fully populated: street, city, region, postal code, country
//! - Partially populated: only a city and country
//! - Blank entries where the widget still pre-filled the country code
//! - Pre-rendered multi-line blocks
//!
//! This module decides whether an address can be placed on a map and
//! produces a single-line string suitable for both the `center` and
//! `markers` parameters.

use std::sync::LazyLock;

use address_static_map_models::{AddressField, AddressRecord};
use regex::Regex;

/// Any run of whitespace, including `\r\n` / `\r` / `\n` line breaks.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Line breaks in any platform convention.
static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("valid regex"));

/// Separator between joined address components.
pub const COMPONENT_SEPARATOR: &str = ", ";

/// Result of normalizing an address record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedAddress {
    /// A one-line address suitable for geocoding by the map provider.
    Address(String),
    /// Not enough data to place a pin (empty, or only a country code).
    Skip,
}

impl NormalizedAddress {
    /// Returns the address string, or `None` for [`NormalizedAddress::Skip`].
    #[must_use]
    pub fn as_address(&self) -> Option<&str> {
        match self {
            Self::Address(address) => Some(address),
            Self::Skip => None,
        }
    }
}

/// Normalizes an address record into a single line.
///
/// Returns [`NormalizedAddress::Skip`] when no component other than the
/// country code holds a value. Otherwise joins the populated components in
/// canonical order with `", "`, collapsing line breaks and runs of
/// whitespace inside each component to a single space.
#[must_use]
pub fn normalize(record: &AddressRecord) -> NormalizedAddress {
    if !record.is_renderable() {
        log::debug!(
            "Skipping address with no component besides {}",
            AddressField::CountryCode
        );
        return NormalizedAddress::Skip;
    }

    let address = record
        .populated()
        .map(|(_, value)| collapse_whitespace(value))
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(COMPONENT_SEPARATOR);

    NormalizedAddress::Address(address)
}

/// Collapses a pre-rendered multi-line address block into one line.
///
/// Each non-blank line becomes one component, joined with `", "`, so that
/// the result never carries raw newlines into URL encoding (`%0A`).
#[must_use]
pub fn normalize_lines(block: &str) -> NormalizedAddress {
    let address = LINE_BREAK_RE
        .split(block)
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(COMPONENT_SEPARATOR);

    if address.is_empty() {
        NormalizedAddress::Skip
    } else {
        NormalizedAddress::Address(address)
    }
}

/// Trims and collapses every whitespace run (line breaks included) to a
/// single space.
fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RE.replace_all(value.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baker_street() -> AddressRecord {
        AddressRecord::new()
            .with(AddressField::AddressLine1, "221B Baker St")
            .with(AddressField::Locality, "London")
            .with(AddressField::CountryCode, "GB")
    }

    #[test]
    fn joins_components_in_canonical_order() {
        assert_eq!(
            normalize(&baker_street()),
            NormalizedAddress::Address("221B Baker St, London, GB".to_string())
        );
    }

    #[test]
    fn skips_country_only() {
        let record = AddressRecord::new().with(AddressField::CountryCode, "US");
        assert_eq!(normalize(&record), NormalizedAddress::Skip);
    }

    #[test]
    fn skips_country_with_blank_fields() {
        let record = AddressRecord::new()
            .with(AddressField::CountryCode, "US")
            .with(AddressField::AddressLine1, "")
            .with(AddressField::Locality, "  ")
            .with(AddressField::PostalCode, "\n");
        assert_eq!(normalize(&record), NormalizedAddress::Skip);
    }

    #[test]
    fn skips_empty_record() {
        assert_eq!(normalize(&AddressRecord::new()), NormalizedAddress::Skip);
    }

    #[test]
    fn keeps_single_non_country_field() {
        let record = AddressRecord::new().with(AddressField::Locality, "Chicago");
        assert_eq!(
            normalize(&record),
            NormalizedAddress::Address("Chicago".to_string())
        );
    }

    #[test]
    fn collapses_line_breaks_inside_components() {
        let record = AddressRecord::new()
            .with(AddressField::AddressLine1, "100 N State St\r\nSuite 4")
            .with(AddressField::Locality, "Chicago\n")
            .with(AddressField::AdministrativeArea, "IL")
            .with(AddressField::CountryCode, "US");

        let NormalizedAddress::Address(address) = normalize(&record) else {
            panic!("expected an address");
        };
        assert_eq!(address, "100 N State St Suite 4, Chicago, IL, US");
        assert!(!address.contains('\n'));
        assert!(!address.contains('\r'));
    }

    #[test]
    fn contains_every_populated_value() {
        let record = AddressRecord::new()
            .with(AddressField::Organization, "Acme")
            .with(AddressField::AddressLine1, "1 Main St")
            .with(AddressField::AddressLine2, "Floor 2")
            .with(AddressField::Locality, "Springfield")
            .with(AddressField::AdministrativeArea, "OR")
            .with(AddressField::PostalCode, "97477")
            .with(AddressField::CountryCode, "US");

        let address = normalize(&record).as_address().unwrap().to_string();
        for (_, value) in record.populated() {
            assert!(address.contains(value), "{value} missing from {address}");
        }
        assert_eq!(
            address,
            "Acme, 1 Main St, Floor 2, Springfield, OR, 97477, US"
        );
    }

    #[test]
    fn normalizes_every_field_kind() {
        let record: AddressRecord = AddressField::all()
            .iter()
            .map(|field| (*field, format!("  {field}  value ")))
            .collect();

        let address = normalize(&record).as_address().unwrap().to_string();
        assert_eq!(
            address.split(COMPONENT_SEPARATOR).count(),
            AddressField::all().len()
        );
        assert!(address.starts_with("given_name value"));
        assert!(address.ends_with("country_code value"));
    }

    #[test]
    fn normalizes_pre_rendered_block() {
        assert_eq!(
            normalize_lines("221B Baker St\nLondon NW1 6XE\r\n\nUnited Kingdom\n"),
            NormalizedAddress::Address(
                "221B Baker St, London NW1 6XE, United Kingdom".to_string()
            )
        );
    }

    #[test]
    fn blank_block_is_skipped() {
        assert_eq!(normalize_lines(" \n\r\n "), NormalizedAddress::Skip);
    }
}
