//! Shared HTTP API types
//!
//! Contains only framework-independent request/response envelopes. The
//! server wraps them with axum extractors; the registration wizard sends
//! them with reqwest.

pub mod types;

pub use types::{
    ErrorResponse, ValidateAddressesRequest, ValidateAddressesResponse, ValidateAddressesResult,
    VALIDATE_ADDRESSES_PATH,
};
