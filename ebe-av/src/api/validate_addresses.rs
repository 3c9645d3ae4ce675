//! POST /api/validate-addresses
//!
//! Body: `{ homeAddress, mailingAddress?, previousAddress? }`
//! Success: `200 { result: { errors: AddressError[] } }`

use axum::{body::Bytes, extract::State, Json};
use ebe_common::api::{ValidateAddressesRequest, ValidateAddressesResponse};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub async fn validate_addresses(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<ValidateAddressesResponse>> {
    let request_id = Uuid::new_v4();

    async move {
        let request = parse_request(&body)?;

        let errors = state
            .validator
            .validate_addresses(&request)
            .await
            .map_err(|e| {
                warn!(status = e.status_code, message = %e.message, "Address validation failed");
                ApiError::Server(e)
            })?;

        info!(
            submitted = request.submitted().len(),
            errors = errors.len(),
            "Validated addresses"
        );

        Ok(Json(ValidateAddressesResponse::new(errors)))
    }
    .instrument(info_span!("validate_addresses", %request_id))
    .await
}

/// Deserialize and schema-check the body
fn parse_request(body: &[u8]) -> ApiResult<ValidateAddressesRequest> {
    let request: ValidateAddressesRequest = serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "Request body did not parse");
        ApiError::BadRequest(e.to_string())
    })?;

    let violations = request.validate_schema();
    if let Some((form, violation)) = violations.first() {
        debug!(
            form = %form,
            field = %violation.field,
            count = violations.len(),
            "Request body failed schema validation"
        );
        return Err(ApiError::BadRequest(violation.message.to_string()));
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_body() {
        let body = br#"{"homeAddress":{"streetLine1":"1 Main St","city":"Springfield","state":"IL","zip":"62701"}}"#;
        let request = parse_request(body).unwrap();
        assert_eq!(request.home_address.city, "Springfield");
    }

    #[test]
    fn test_parse_rejects_bad_zip() {
        let body = br#"{"homeAddress":{"streetLine1":"1 Main St","city":"Springfield","state":"IL","zip":"627"}}"#;
        assert!(matches!(parse_request(body), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(parse_request(b"not json"), Err(ApiError::BadRequest(_))));
    }
}
