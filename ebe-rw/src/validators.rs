//! Field validators for the addresses form

use ebe_common::model::address::is_five_digit_zip;

/// US states and the District of Columbia
pub const US_STATE_ABBREVIATIONS: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM",
    "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

/// Validity of a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    Valid,
    /// Acceptable, but flagged by address validation for the user's attention
    Caution,
    Invalid(String),
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }

    pub fn is_valid_or_caution(&self) -> bool {
        !matches!(self, Validity::Invalid(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Validity::Invalid(message) => Some(message),
            _ => None,
        }
    }
}

pub trait Validator {
    fn validate(&self, value: &str) -> Validity;
}

/// Rejects empty (after trimming) values
pub struct RequiredValidator {
    invalid_message: &'static str,
}

impl RequiredValidator {
    pub const fn new(invalid_message: &'static str) -> Self {
        Self { invalid_message }
    }
}

impl Validator for RequiredValidator {
    fn validate(&self, value: &str) -> Validity {
        if value.trim().is_empty() {
            Validity::Invalid(self.invalid_message.to_string())
        } else {
            Validity::Valid
        }
    }
}

pub const STREET_LINE1_REQUIRED: RequiredValidator =
    RequiredValidator::new("Please enter your street address.");
pub const CITY_REQUIRED: RequiredValidator = RequiredValidator::new("Please enter your city.");

/// Five-digit ZIP code
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipCodeValidator {
    pub trim_before_validation: bool,
}

impl ZipCodeValidator {
    pub fn new(trim_before_validation: bool) -> Self {
        Self {
            trim_before_validation,
        }
    }
}

impl Validator for ZipCodeValidator {
    fn validate(&self, value: &str) -> Validity {
        let value = if self.trim_before_validation {
            value.trim()
        } else {
            value
        };

        if value.is_empty() {
            return Validity::Invalid("Please enter your ZIP code.".to_string());
        }

        if !is_five_digit_zip(value) {
            return Validity::Invalid("Please enter a 5-digit ZIP code.".to_string());
        }

        Validity::Valid
    }
}

/// One of [`US_STATE_ABBREVIATIONS`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StateValidator;

impl Validator for StateValidator {
    fn validate(&self, value: &str) -> Validity {
        if US_STATE_ABBREVIATIONS.contains(&value.trim()) {
            Validity::Valid
        } else {
            Validity::Invalid("Please select a state.".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_code_messages() {
        let validator = ZipCodeValidator::default();
        assert_eq!(
            validator.validate("").message(),
            Some("Please enter your ZIP code.")
        );
        assert_eq!(
            validator.validate("1234").message(),
            Some("Please enter a 5-digit ZIP code.")
        );
        assert_eq!(
            validator.validate("12345-6789").message(),
            Some("Please enter a 5-digit ZIP code.")
        );
        assert!(validator.validate("12345").is_valid());
    }

    #[test]
    fn test_zip_code_trimming() {
        assert!(!ZipCodeValidator::new(false).validate(" 12345 ").is_valid());
        assert!(ZipCodeValidator::new(true).validate(" 12345 ").is_valid());
        assert_eq!(
            ZipCodeValidator::new(true).validate("   ").message(),
            Some("Please enter your ZIP code.")
        );
    }

    #[test]
    fn test_required_validator() {
        assert_eq!(
            STREET_LINE1_REQUIRED.validate("  ").message(),
            Some("Please enter your street address.")
        );
        assert!(CITY_REQUIRED.validate("Springfield").is_valid());
    }

    #[test]
    fn test_state_validator() {
        assert!(StateValidator.validate("IL").is_valid());
        assert!(StateValidator.validate("DC").is_valid());
        assert!(!StateValidator.validate("XX").is_valid());
        assert!(!StateValidator.validate("il").is_valid());
    }

    #[test]
    fn test_caution_is_valid_or_caution() {
        assert!(Validity::Caution.is_valid_or_caution());
        assert!(!Validity::Caution.is_valid());
        assert!(!Validity::Invalid("x".into()).is_valid_or_caution());
    }
}
