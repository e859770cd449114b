//! Postal addresses attached to carts.

use serde::{Deserialize, Serialize};

/// A shipping or billing address. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub street_name: Option<String>,
    pub street_number: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    pub country: Option<String>,
}

impl Address {
    /// Single-line rendering used in table cells.
    ///
    /// The punctuation is fixed and not localized: absent fields collapse to
    /// empty strings while the separators around them stay in place, so an
    /// address with only a city renders as `",  , Berlin, "`.
    #[must_use]
    pub fn one_line(&self) -> String {
        let field = |value: &Option<String>| value.as_deref().unwrap_or_default().to_owned();

        [
            field(&self.first_name),
            field(&self.last_name),
            ", ".to_owned(),
            field(&self.street_name),
            " ".to_owned(),
            field(&self.street_number),
            field(&self.postal_code),
            ", ".to_owned(),
            field(&self.city),
            ", ".to_owned(),
            field(&self.country),
        ]
        .concat()
    }
}

/// Render an optional address; a missing address renders as an empty string.
#[must_use]
pub fn format_address(address: Option<&Address>) -> String {
    address.map(Address::one_line).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_address_is_empty() {
        assert_eq!(format_address(None), "");
    }

    #[test]
    fn test_city_only_keeps_punctuation() {
        let address = Address {
            city: Some("Berlin".to_string()),
            ..Address::default()
        };
        assert_eq!(format_address(Some(&address)), ",  , Berlin, ");
    }

    #[test]
    fn test_full_address() {
        let address = Address {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            street_name: Some("Hauptstrasse".to_string()),
            street_number: Some("5".to_string()),
            postal_code: Some("10115".to_string()),
            city: Some("Berlin".to_string()),
            country: Some("DE".to_string()),
        };
        // Name parts and number/postal code are concatenated without separators.
        assert_eq!(
            address.one_line(),
            "AdaLovelace, Hauptstrasse 510115, Berlin, DE"
        );
    }

    #[test]
    fn test_empty_address_still_has_separators() {
        assert_eq!(Address::default().one_line(), ",  , , ");
    }
}
