//! ebe-rw library - Registration Wizard addresses step
//!
//! Holds the addresses form, submits it to the address validation route and
//! walks the user through any address errors one dialog at a time before
//! the wizard moves on to the other-details page.

pub mod addresses_step;
pub mod client;
pub mod correction_dialog;
pub mod form;
pub mod validators;
pub mod zip_state;

pub use addresses_step::{submit_addresses, SubmitOutcome};
pub use client::{AddressValidationClient, ClientError};
pub use correction_dialog::{CorrectionDialog, DialogError, DialogPhase, DialogStep};
pub use form::{AddressFields, AddressesForm};
pub use validators::Validity;
