//! Submission of the addresses page

use tracing::{debug, info};

use crate::client::AddressValidationClient;
use crate::correction_dialog::CorrectionDialog;
use crate::form::AddressesForm;

/// What the wizard does after the user submits the addresses page
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Field validation failed; focus this field (e.g. `homeAddress.zip`)
    Invalid { first_invalid_field: String },
    /// No address errors; move on
    Confirmed { next_page: String },
    /// Walk the user through the address errors
    NeedsReview(CorrectionDialog),
}

/// Validate the form locally, then against the address validation route
///
/// Fields named by the returned address errors are marked with caution on
/// the form before the dialog is handed back.
pub async fn submit_addresses(
    form: &mut AddressesForm,
    client: &AddressValidationClient,
) -> SubmitOutcome {
    if !form.is_valid_or_caution() {
        let first_invalid_field = form.first_invalid_field().unwrap_or_default();
        debug!(field = %first_invalid_field, "Addresses form has invalid fields");
        return SubmitOutcome::Invalid {
            first_invalid_field,
        };
    }

    let request = form.to_request();
    let errors = client.validate_addresses(&request).await;

    if errors.is_empty() {
        let next_page = form.other_details_path();
        info!(next_page = %next_page, "Addresses confirmed");
        return SubmitOutcome::Confirmed { next_page };
    }

    info!(count = errors.len(), "Addresses need review");
    form.apply_cautions(&errors);
    SubmitOutcome::NeedsReview(CorrectionDialog::new(errors))
}
