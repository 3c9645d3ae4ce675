//! HTTP client for the address validation route

use ebe_common::api::{ValidateAddressesRequest, ValidateAddressesResponse, VALIDATE_ADDRESSES_PATH};
use ebe_common::AddressError;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Posts the addresses form to ebe-av
///
/// Every failure collapses to a single `ValidationFailed` error, so the
/// wizard always has something to show the user.
#[derive(Debug, Clone)]
pub struct AddressValidationClient {
    http_client: reqwest::Client,
    url: String,
}

impl AddressValidationClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            url: format!("{}{}", base_url.trim_end_matches('/'), VALIDATE_ADDRESSES_PATH),
        })
    }

    pub async fn validate_addresses(&self, request: &ValidateAddressesRequest) -> Vec<AddressError> {
        match self.fetch_errors(request).await {
            Ok(errors) => {
                debug!(count = errors.len(), "Address validation returned");
                errors
            }
            Err(reason) => {
                warn!(url = %self.url, "Address validation failed: {}", reason);
                vec![AddressError::ValidationFailed]
            }
        }
    }

    async fn fetch_errors(&self, request: &ValidateAddressesRequest) -> Result<Vec<AddressError>, String> {
        let response = self
            .http_client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| format!("request error: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("status {}", status));
        }

        let body = response
            .json::<ValidateAddressesResponse>()
            .await
            .map_err(|e| format!("invalid response body: {}", e))?;

        Ok(body.result.errors)
    }
}
