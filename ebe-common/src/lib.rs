//! # 8by8 Common Library
//!
//! Shared code for the 8by8 address validation components:
//! - Address model and address error types
//! - API request/response envelopes
//! - Request-body schema validation
//! - Bootstrap configuration loading

pub mod api;
pub mod config;
pub mod error;
pub mod model;

pub use error::{Error, Result};
pub use model::{
    Address, AddressComponent, AddressComponents, AddressError, AddressErrorType, AddressField,
    AddressFormName,
};
