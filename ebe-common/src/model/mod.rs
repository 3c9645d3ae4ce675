//! Address model shared by the validation service and the registration wizard

pub mod address;
pub mod address_error;

pub use address::{Address, AddressField, AddressFormName, SchemaViolation};
pub use address_error::{AddressComponent, AddressComponents, AddressError, AddressErrorType};
