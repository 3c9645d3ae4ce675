//! Backend services for ebe-av

pub mod google_maps;

use async_trait::async_trait;
use ebe_common::api::ValidateAddressesRequest;
use ebe_common::AddressError;

use crate::error::ServerError;

pub use google_maps::{GoogleMapsClient, GoogleMapsValidator};

/// Validates a batch of submitted addresses
///
/// Returns one error per form that could not be confirmed, in home, mailing,
/// previous order. A failure validating any address fails the whole batch.
#[async_trait]
pub trait AddressValidator: Send + Sync {
    async fn validate_addresses(
        &self,
        request: &ValidateAddressesRequest,
    ) -> Result<Vec<AddressError>, ServerError>;
}
