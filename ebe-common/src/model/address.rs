//! Postal addresses and the forms they are entered on

use serde::{Deserialize, Serialize};
use std::fmt;

/// A US postal address as entered on one of the addresses forms
///
/// Immutable once submitted for validation; superseded by a corrected
/// copy if the user accepts a recommended address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_line2: Option<String>,
    pub city: String,
    /// Two-letter state abbreviation
    pub state: String,
    /// Five-digit ZIP code
    pub zip: String,
}

impl Address {
    /// Street line 2, treating an empty string as absent
    pub fn street_line2(&self) -> Option<&str> {
        self.street_line2.as_deref().filter(|line| !line.is_empty())
    }

    /// Lines submitted to the address validation API
    ///
    /// `[streetLine1, streetLine2?, city, state, zip]`
    pub fn address_lines(&self) -> Vec<String> {
        let mut lines = vec![self.street_line1.clone()];
        if let Some(line2) = self.street_line2() {
            lines.push(line2.to_string());
        }
        lines.push(self.city.clone());
        lines.push(self.state.clone());
        lines.push(self.zip.clone());
        lines
    }

    /// Check the address against the request-body schema
    ///
    /// Field presence is enforced by deserialization; this checks formats.
    pub fn validate_schema(&self) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();

        if !is_state_abbreviation_format(&self.state) {
            violations.push(SchemaViolation {
                field: AddressField::State,
                message: "state must be a 2-letter state abbreviation.",
            });
        }

        if !is_five_digit_zip(&self.zip) {
            violations.push(SchemaViolation {
                field: AddressField::Zip,
                message: "zip must be a 5-digit zip code.",
            });
        }

        violations
    }
}

/// `^[A-Z]{2}$`
fn is_state_abbreviation_format(value: &str) -> bool {
    value.len() == 2 && value.chars().all(|c| c.is_ascii_uppercase())
}

/// `^\d{5}$`
pub fn is_five_digit_zip(value: &str) -> bool {
    value.len() == 5 && value.chars().all(|c| c.is_ascii_digit())
}

/// A single schema failure on a submitted address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub field: AddressField,
    pub message: &'static str,
}

/// Which of the three address forms an address came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddressFormName {
    HomeAddress,
    MailingAddress,
    PreviousAddress,
}

impl AddressFormName {
    pub const ALL: [AddressFormName; 3] = [
        AddressFormName::HomeAddress,
        AddressFormName::MailingAddress,
        AddressFormName::PreviousAddress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressFormName::HomeAddress => "homeAddress",
            AddressFormName::MailingAddress => "mailingAddress",
            AddressFormName::PreviousAddress => "previousAddress",
        }
    }
}

impl fmt::Display for AddressFormName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields of an address form, in the order they appear on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddressField {
    StreetLine1,
    StreetLine2,
    City,
    Zip,
    State,
}

impl AddressField {
    pub const ALL: [AddressField; 5] = [
        AddressField::StreetLine1,
        AddressField::StreetLine2,
        AddressField::City,
        AddressField::Zip,
        AddressField::State,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressField::StreetLine1 => "streetLine1",
            AddressField::StreetLine2 => "streetLine2",
            AddressField::City => "city",
            AddressField::Zip => "zip",
            AddressField::State => "state",
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(line2: Option<&str>) -> Address {
        Address {
            street_line1: "1600 Amphitheatre Pkwy".to_string(),
            street_line2: line2.map(str::to_string),
            city: "Mountain View".to_string(),
            state: "CA".to_string(),
            zip: "94043".to_string(),
        }
    }

    #[test]
    fn test_address_lines_without_line2() {
        assert_eq!(
            address(None).address_lines(),
            vec!["1600 Amphitheatre Pkwy", "Mountain View", "CA", "94043"]
        );
    }

    #[test]
    fn test_address_lines_skip_empty_line2() {
        assert_eq!(address(Some("")).address_lines().len(), 4);
        assert_eq!(address(Some("Unit 5")).address_lines()[1], "Unit 5");
    }

    #[test]
    fn test_schema_rejects_bad_state_and_zip() {
        let mut bad = address(None);
        bad.state = "California".to_string();
        bad.zip = "9404".to_string();

        let violations = bad.validate_schema();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, AddressField::State);
        assert_eq!(violations[1].message, "zip must be a 5-digit zip code.");
    }

    #[test]
    fn test_schema_rejects_lowercase_state() {
        let mut bad = address(None);
        bad.state = "ca".to_string();
        assert_eq!(bad.validate_schema().len(), 1);
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_value(address(Some("Apt 2"))).unwrap();
        assert_eq!(json["streetLine1"], "1600 Amphitheatre Pkwy");
        assert_eq!(json["streetLine2"], "Apt 2");

        let json = serde_json::to_value(address(None)).unwrap();
        assert!(json.get("streetLine2").is_none());
    }

    #[test]
    fn test_form_name_ordering() {
        assert!(AddressFormName::HomeAddress < AddressFormName::MailingAddress);
        assert!(AddressFormName::MailingAddress < AddressFormName::PreviousAddress);
        assert_eq!(
            serde_json::to_value(AddressFormName::PreviousAddress).unwrap(),
            "previousAddress"
        );
    }
}
