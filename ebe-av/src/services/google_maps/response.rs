//! Address Validation API response
//!
//! Only the subset of the response the classifier reads is modelled. A body
//! that lacks any of these fields is not processable.

use serde::Deserialize;
use serde_json::Value;

/// Confirmation level the API reports for fully confirmed components
pub const CONFIRMED: &str = "CONFIRMED";

/// Component type reported in `missingComponentTypes` for a missing unit
pub const SUBPREMISE: &str = "subpremise";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProcessableResponse {
    pub result: ValidationResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidationResult {
    pub verdict: Verdict,
    pub address: ValidatedAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    #[serde(default)]
    pub has_unconfirmed_components: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedAddress {
    pub postal_address: PostalAddress,
    pub address_components: Vec<ResponseAddressComponent>,
    /// Absent means nothing is missing; `null` is not processable
    #[serde(default)]
    pub missing_component_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    pub postal_code: String,
    pub administrative_area: String,
    pub locality: String,
    pub address_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseAddressComponent {
    pub component_name: ComponentName,
    pub component_type: String,
    pub confirmation_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComponentName {
    pub text: String,
}

impl ResponseAddressComponent {
    pub fn is_confirmed(&self) -> bool {
        self.confirmation_level == CONFIRMED
    }
}

impl ProcessableResponse {
    /// Interpret a raw response body; `None` if it is not processable
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    pub fn has_unconfirmed_components(&self) -> bool {
        self.result.verdict.has_unconfirmed_components.unwrap_or(false)
    }

    pub fn postal_address(&self) -> &PostalAddress {
        &self.result.address.postal_address
    }

    pub fn components(&self) -> &[ResponseAddressComponent] {
        &self.result.address.address_components
    }

    /// First component of the given type
    pub fn component(&self, component_type: &str) -> Option<&ResponseAddressComponent> {
        self.components()
            .iter()
            .find(|component| component.component_type == component_type)
    }

    pub fn is_missing(&self, component_type: &str) -> bool {
        self.result
            .address
            .missing_component_types
            .iter()
            .any(|t| t == component_type)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_confirmed_body_is_processable() {
        let response = ProcessableResponse::from_value(confirmed_body()).unwrap();
        assert!(!response.has_unconfirmed_components());
        assert_eq!(response.postal_address().locality, "Springfield");
        assert!(response.component("route").unwrap().is_confirmed());
        assert!(!response.is_missing(SUBPREMISE));
    }

    #[test]
    fn test_missing_result_is_not_processable() {
        assert!(ProcessableResponse::from_value(json!({})).is_none());
        assert!(ProcessableResponse::from_value(json!({ "result": null })).is_none());
    }

    #[test]
    fn test_missing_verdict_is_not_processable() {
        let mut body = confirmed_body();
        body["result"].as_object_mut().unwrap().remove("verdict");
        assert!(ProcessableResponse::from_value(body).is_none());
    }

    #[test]
    fn test_non_string_postal_code_is_not_processable() {
        let mut body = confirmed_body();
        body["result"]["address"]["postalAddress"]["postalCode"] = json!(62701);
        assert!(ProcessableResponse::from_value(body).is_none());
    }

    #[test]
    fn test_non_string_address_line_is_not_processable() {
        let mut body = confirmed_body();
        body["result"]["address"]["postalAddress"]["addressLines"] = json!(["1 Main St", 7]);
        assert!(ProcessableResponse::from_value(body).is_none());
    }

    #[test]
    fn test_component_without_confirmation_level_is_not_processable() {
        let mut body = confirmed_body();
        body["result"]["address"]["addressComponents"][0]
            .as_object_mut()
            .unwrap()
            .remove("confirmationLevel");
        assert!(ProcessableResponse::from_value(body).is_none());
    }

    #[test]
    fn test_missing_component_types_must_be_strings() {
        let mut body = confirmed_body();
        body["result"]["address"]["missingComponentTypes"] = json!([1, 2]);
        assert!(ProcessableResponse::from_value(body).is_none());

        let mut body = confirmed_body();
        body["result"]["address"]["missingComponentTypes"] = json!(["subpremise"]);
        let response = ProcessableResponse::from_value(body).unwrap();
        assert!(response.is_missing(SUBPREMISE));
    }

    #[test]
    fn test_null_missing_component_types_is_unprocessable() {
        let mut body = confirmed_body();
        body["result"]["address"]["missingComponentTypes"] = Value::Null;
        assert!(ProcessableResponse::from_value(body).is_none());

        // Absent is fine
        let response = ProcessableResponse::from_value(confirmed_body()).unwrap();
        assert!(!response.is_missing(SUBPREMISE));
    }

    #[test]
    fn test_verdict_flag_is_read() {
        let mut body = confirmed_body();
        body["result"]["verdict"]["hasUnconfirmedComponents"] = json!(true);
        let response = ProcessableResponse::from_value(body).unwrap();
        assert!(response.has_unconfirmed_components());
    }

    #[test]
    fn test_set_level_fixture() {
        let mut body = confirmed_body();
        set_level(&mut body, "locality", "UNCONFIRMED_BUT_PLAUSIBLE");
        let response = ProcessableResponse::from_value(body).unwrap();
        assert!(!response.component("locality").unwrap().is_confirmed());
    }
}
