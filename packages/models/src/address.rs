//! Structured postal address records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A single component of a postal address.
///
/// Declaration order is the canonical order used when the components are
/// joined into a one-line address.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AddressField {
    /// Recipient first name.
    GivenName,
    /// Recipient middle name.
    AdditionalName,
    /// Recipient last name.
    FamilyName,
    /// Company or organization.
    Organization,
    /// Street line (e.g., "221B Baker St").
    AddressLine1,
    /// Secondary street line (apartment, suite, floor).
    AddressLine2,
    /// Neighborhood or suburb.
    DependentLocality,
    /// City.
    Locality,
    /// State, province or region.
    AdministrativeArea,
    /// Postal or ZIP code.
    PostalCode,
    /// CEDEX-style sorting code.
    SortingCode,
    /// Two-letter ISO country code.
    CountryCode,
}

impl AddressField {
    /// Returns all variants in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::GivenName,
            Self::AdditionalName,
            Self::FamilyName,
            Self::Organization,
            Self::AddressLine1,
            Self::AddressLine2,
            Self::DependentLocality,
            Self::Locality,
            Self::AdministrativeArea,
            Self::PostalCode,
            Self::SortingCode,
            Self::CountryCode,
        ]
    }
}

/// A loosely-structured address: any subset of [`AddressField`]s, any of
/// which may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressRecord {
    fields: BTreeMap<AddressField, String>,
}

impl AddressRecord {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Returns the record with `field` set to `value`.
    #[must_use]
    pub fn with(mut self, field: AddressField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Sets `field` to `value`, replacing any previous value.
    pub fn set(&mut self, field: AddressField, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    /// Returns the raw value stored for `field`, empty or not.
    #[must_use]
    pub fn get(&self, field: AddressField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Iterates over components that hold a non-blank value, in canonical
    /// order.
    pub fn populated(&self) -> impl Iterator<Item = (AddressField, &str)> {
        self.fields
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(field, value)| (*field, value.as_str()))
    }

    /// Whether at least one component other than the country code holds a
    /// value.
    ///
    /// Some address widgets pre-fill the country even on blank entries, so
    /// a bare country code is not enough to place a pin.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        self.populated()
            .any(|(field, _)| field != AddressField::CountryCode)
    }
}

impl FromIterator<(AddressField, String)> for AddressRecord {
    fn from_iter<T: IntoIterator<Item = (AddressField, String)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_are_snake_case() {
        assert_eq!(AddressField::AddressLine1.as_ref(), "address_line1");
        assert_eq!(
            "administrative_area".parse::<AddressField>().unwrap(),
            AddressField::AdministrativeArea
        );
        assert_eq!(AddressField::CountryCode.to_string(), "country_code");
    }

    #[test]
    fn populated_skips_blank_values() {
        let record = AddressRecord::new()
            .with(AddressField::Locality, "London")
            .with(AddressField::AddressLine2, "   ")
            .with(AddressField::PostalCode, "");

        let populated: Vec<_> = record.populated().collect();
        assert_eq!(populated, vec![(AddressField::Locality, "London")]);
    }

    #[test]
    fn populated_follows_canonical_order() {
        let record = AddressRecord::new()
            .with(AddressField::CountryCode, "GB")
            .with(AddressField::Locality, "London")
            .with(AddressField::AddressLine1, "221B Baker St");

        let fields: Vec<_> = record.populated().map(|(f, _)| f).collect();
        assert_eq!(
            fields,
            vec![
                AddressField::AddressLine1,
                AddressField::Locality,
                AddressField::CountryCode,
            ]
        );
    }

    #[test]
    fn country_only_is_not_renderable() {
        let record = AddressRecord::new()
            .with(AddressField::CountryCode, "US")
            .with(AddressField::Locality, "");
        assert!(!record.is_renderable());
        assert!(!AddressRecord::new().is_renderable());
    }

    #[test]
    fn country_plus_locality_is_renderable() {
        let record = AddressRecord::new()
            .with(AddressField::CountryCode, "US")
            .with(AddressField::Locality, "Chicago");
        assert!(record.is_renderable());
    }
}
