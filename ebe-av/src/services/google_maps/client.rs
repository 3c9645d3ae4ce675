//! Google Maps Address Validation API client
//!
//! One POST per address, no retries and no backoff. Any failure is reported
//! as a [`ServerError`] so the route can surface it with a status code.

use ebe_common::config::ServiceConfig;
use ebe_common::Address;
use serde::Serialize;
use std::time::Duration;

use super::response::ProcessableResponse;
use crate::error::ServerError;

const USER_AGENT: &str = concat!("ebe-av/", env!("CARGO_PKG_VERSION"));

/// Addresses are always validated as US addresses
const REGION_CODE: &str = "US";

#[derive(Debug, Serialize)]
struct ValidateAddressRequest<'a> {
    address: RequestAddress<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestAddress<'a> {
    region_code: &'a str,
    address_lines: Vec<String>,
}

/// Address Validation API client
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleMapsClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ServerError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ServerError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, ServerError> {
        Self::new(
            config.address_validation_endpoint.clone(),
            config.google_maps_api_key.clone(),
            config.request_timeout,
        )
    }

    /// Validate a single address
    pub async fn validate_address(
        &self,
        address: &Address,
    ) -> Result<ProcessableResponse, ServerError> {
        let body = ValidateAddressRequest {
            address: RequestAddress {
                region_code: REGION_CODE,
                address_lines: address.address_lines(),
            },
        };

        tracing::debug!(endpoint = %self.endpoint, "Querying Address Validation API");

        let response = self
            .http_client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Address Validation API request failed");
                ServerError::with_status("Failed to validate address.", 502)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Address Validation API returned an error");
            return Err(ServerError::with_status(
                "Failed to validate address.",
                status.as_u16(),
            ));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "Address Validation API body was not JSON");
            ServerError::with_status("Unprocessable response.", 400)
        })?;

        ProcessableResponse::from_value(body)
            .ok_or_else(|| ServerError::with_status("Unprocessable response.", 400))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GoogleMapsClient::new("http://localhost", "key", Duration::from_secs(1));
        assert!(client.is_ok());
    }

    #[test]
    fn test_request_body_shape() {
        let address = Address {
            street_line1: "1 Main St".to_string(),
            street_line2: Some("Apt 2".to_string()),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "62701".to_string(),
        };
        let body = ValidateAddressRequest {
            address: RequestAddress {
                region_code: REGION_CODE,
                address_lines: address.address_lines(),
            },
        };

        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({
                "address": {
                    "regionCode": "US",
                    "addressLines": ["1 Main St", "Apt 2", "Springfield", "IL", "62701"]
                }
            })
        );
    }
}
