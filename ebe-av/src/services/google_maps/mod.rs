//! Address validation backed by the Google Maps Address Validation API

pub mod classifier;
pub mod client;
pub mod response;

use async_trait::async_trait;
use ebe_common::api::ValidateAddressesRequest;
use ebe_common::AddressError;
use futures::future::try_join_all;

use super::AddressValidator;
use crate::error::ServerError;

pub use client::GoogleMapsClient;
pub use response::ProcessableResponse;

/// Validates every submitted address concurrently and classifies the results
#[derive(Debug, Clone)]
pub struct GoogleMapsValidator {
    client: GoogleMapsClient,
}

impl GoogleMapsValidator {
    pub fn new(client: GoogleMapsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AddressValidator for GoogleMapsValidator {
    async fn validate_addresses(
        &self,
        request: &ValidateAddressesRequest,
    ) -> Result<Vec<AddressError>, ServerError> {
        let lookups = request
            .submitted()
            .into_iter()
            .map(|(form, address)| async move {
                let response = self.client.validate_address(address).await?;
                let error = classifier::classify(address, &response, form);
                tracing::debug!(
                    form = %form,
                    error = ?error.as_ref().map(|e| e.error_type()),
                    "Classified address"
                );
                Ok::<_, ServerError>(error)
            });

        // One failed lookup fails the batch
        let errors = try_join_all(lookups).await?;

        Ok(errors.into_iter().flatten().collect())
    }
}
