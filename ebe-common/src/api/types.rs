//! Request/response envelopes for `POST /api/validate-addresses`

use serde::{Deserialize, Serialize};

use crate::model::{Address, AddressError, AddressFormName, SchemaViolation};

/// Route path served by ebe-av and called by ebe-rw
pub const VALIDATE_ADDRESSES_PATH: &str = "/api/validate-addresses";

/// Addresses submitted together from the addresses page
///
/// # Examples
///
/// ```
/// use ebe_common::api::ValidateAddressesRequest;
///
/// let body = r#"{
///     "homeAddress": {
///         "streetLine1": "1 Main St",
///         "city": "Springfield",
///         "state": "IL",
///         "zip": "62701"
///     }
/// }"#;
/// let request: ValidateAddressesRequest = serde_json::from_str(body).unwrap();
/// assert!(request.validate_schema().is_empty());
/// assert_eq!(request.submitted().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateAddressesRequest {
    pub home_address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mailing_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_address: Option<Address>,
}

impl ValidateAddressesRequest {
    pub fn new(home_address: Address) -> Self {
        Self {
            home_address,
            mailing_address: None,
            previous_address: None,
        }
    }

    /// Submitted addresses in home, mailing, previous order
    pub fn submitted(&self) -> Vec<(AddressFormName, &Address)> {
        let mut submitted = vec![(AddressFormName::HomeAddress, &self.home_address)];
        if let Some(mailing) = &self.mailing_address {
            submitted.push((AddressFormName::MailingAddress, mailing));
        }
        if let Some(previous) = &self.previous_address {
            submitted.push((AddressFormName::PreviousAddress, previous));
        }
        submitted
    }

    /// Schema failures across every submitted address
    pub fn validate_schema(&self) -> Vec<(AddressFormName, SchemaViolation)> {
        self.submitted()
            .into_iter()
            .flat_map(|(form, address)| {
                address
                    .validate_schema()
                    .into_iter()
                    .map(move |violation| (form, violation))
            })
            .collect()
    }
}

/// `200 { result: { errors } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateAddressesResponse {
    pub result: ValidateAddressesResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateAddressesResult {
    pub errors: Vec<AddressError>,
}

impl ValidateAddressesResponse {
    pub fn new(errors: Vec<AddressError>) -> Self {
        Self {
            result: ValidateAddressesResult { errors },
        }
    }
}

/// Error envelope returned with every non-200 status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AddressField;
    use serde_json::json;

    fn body() -> serde_json::Value {
        json!({
            "homeAddress": {
                "streetLine1": "1 Main St",
                "city": "Springfield",
                "state": "IL",
                "zip": "62701"
            },
            "previousAddress": {
                "streetLine1": "2 Elm St",
                "streetLine2": "Apt 4",
                "city": "Chicago",
                "state": "il",
                "zip": "60601-1234"
            }
        })
    }

    #[test]
    fn test_submitted_skips_absent_forms() {
        let request: ValidateAddressesRequest = serde_json::from_value(body()).unwrap();
        let forms: Vec<_> = request.submitted().into_iter().map(|(form, _)| form).collect();
        assert_eq!(
            forms,
            vec![AddressFormName::HomeAddress, AddressFormName::PreviousAddress]
        );
    }

    #[test]
    fn test_schema_violations_carry_form() {
        let request: ValidateAddressesRequest = serde_json::from_value(body()).unwrap();
        let violations = request.validate_schema();
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|(form, _)| *form == AddressFormName::PreviousAddress));
        assert_eq!(violations[0].1.field, AddressField::State);
    }

    #[test]
    fn test_missing_required_field_fails_to_parse() {
        let body = json!({ "homeAddress": { "streetLine1": "1 Main St", "state": "IL", "zip": "62701" } });
        assert!(serde_json::from_value::<ValidateAddressesRequest>(body).is_err());
    }

    #[test]
    fn test_response_envelope_shape() {
        let response = ValidateAddressesResponse::new(vec![AddressError::ValidationFailed]);
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({ "result": { "errors": [{ "type": "ValidationFailed" }] } })
        );
    }
}
