//! Correction dialog sequencer
//!
//! Presents address errors one at a time. Each error either advances to
//! the next one or, on the last error, finishes the addresses step. The
//! user may leave at any point to edit the form, after which a new
//! submission starts a new dialog.

use ebe_common::{AddressError, AddressField, AddressFormName};
use thiserror::Error;

use crate::form::AddressesForm;

pub const NEXT_LABEL: &str = "Next";
pub const CONTINUE_LABEL: &str = "Continue";
pub const CONTINUE_ANYWAY_LABEL: &str = "Continue Anyway";
pub const EDIT_ADDRESS_LABEL: &str = "Edit Address";
pub const EDIT_ADDRESSES_LABEL: &str = "Edit Addresses";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    #[error("No address error is being shown")]
    NotShowing,

    #[error("Current address error has no recommended address")]
    NotReviewRecommended,

    #[error("Current address error is not a missing subpremise")]
    NotMissingSubpremise,

    #[error("Address form {0} is not included")]
    FormNotPresent(AddressFormName),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    /// Showing the error at this index
    Showing(usize),
    /// User went back to the form
    Editing,
    /// Every error was acknowledged
    Done,
}

/// Result of acknowledging the current error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogStep {
    Advanced(usize),
    Done,
}

#[derive(Debug, Clone)]
pub struct CorrectionDialog {
    errors: Vec<AddressError>,
    phase: DialogPhase,
}

impl CorrectionDialog {
    pub fn new(errors: Vec<AddressError>) -> Self {
        let phase = if errors.is_empty() {
            DialogPhase::Done
        } else {
            DialogPhase::Showing(0)
        };
        Self { errors, phase }
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    pub fn errors(&self) -> &[AddressError] {
        &self.errors
    }

    pub fn is_done(&self) -> bool {
        self.phase == DialogPhase::Done
    }

    /// The wizard may leave the addresses page
    pub fn can_proceed(&self) -> bool {
        self.is_done()
    }

    fn index(&self) -> Option<usize> {
        match self.phase {
            DialogPhase::Showing(index) => Some(index),
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&AddressError> {
        self.index().and_then(|index| self.errors.get(index))
    }

    /// `(error number, error count)`, 1-based
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.index().map(|index| (index + 1, self.errors.len()))
    }

    fn is_last(&self) -> bool {
        self.index()
            .map(|index| index + 1 >= self.errors.len())
            .unwrap_or(false)
    }

    pub fn primary_label(&self) -> Option<&'static str> {
        let error = self.current()?;

        if matches!(error, AddressError::ValidationFailed) {
            return Some(CONTINUE_LABEL);
        }

        if !self.is_last() {
            return Some(NEXT_LABEL);
        }

        Some(match error {
            AddressError::MissingSubpremise { .. } | AddressError::ValidationFailed => CONTINUE_LABEL,
            AddressError::UnconfirmedComponents { .. }
            | AddressError::ReviewRecommendedAddress { .. } => CONTINUE_ANYWAY_LABEL,
        })
    }

    pub fn secondary_action(&self) -> Option<&'static str> {
        match self.current()? {
            AddressError::UnconfirmedComponents { .. } => Some(EDIT_ADDRESS_LABEL),
            AddressError::ValidationFailed => Some(EDIT_ADDRESSES_LABEL),
            _ => None,
        }
    }

    /// Acknowledge the current error
    pub fn next_or_continue(&mut self) -> Result<DialogStep, DialogError> {
        let index = self.index().ok_or(DialogError::NotShowing)?;

        let finished = matches!(self.errors.get(index), Some(AddressError::ValidationFailed))
            || index + 1 >= self.errors.len();

        if finished {
            self.phase = DialogPhase::Done;
            Ok(DialogStep::Done)
        } else {
            self.phase = DialogPhase::Showing(index + 1);
            Ok(DialogStep::Advanced(index + 1))
        }
    }

    /// Close the dialog and go back to the form
    pub fn return_to_editing(&mut self) -> Result<(), DialogError> {
        if self.index().is_none() {
            return Err(DialogError::NotShowing);
        }
        self.phase = DialogPhase::Editing;
        Ok(())
    }

    /// Copy the recommended address into its form, then move on
    pub fn accept_recommended(&mut self, form: &mut AddressesForm) -> Result<DialogStep, DialogError> {
        let Some(AddressError::ReviewRecommendedAddress {
            form: form_name,
            recommended_address,
            ..
        }) = self.current()
        else {
            return match self.current() {
                Some(_) => Err(DialogError::NotReviewRecommended),
                None => Err(DialogError::NotShowing),
            };
        };

        if !form.apply_recommended_address(*form_name, recommended_address) {
            return Err(DialogError::FormNotPresent(*form_name));
        }

        self.next_or_continue()
    }

    /// Fill in street line 2 for a missing subpremise, then move on
    pub fn enter_subpremise(
        &mut self,
        form: &mut AddressesForm,
        street_line2: &str,
    ) -> Result<DialogStep, DialogError> {
        let form_name = match self.current() {
            Some(AddressError::MissingSubpremise { form }) => *form,
            Some(_) => return Err(DialogError::NotMissingSubpremise),
            None => return Err(DialogError::NotShowing),
        };

        if !form.set_field(form_name, AddressField::StreetLine2, street_line2) {
            return Err(DialogError::FormNotPresent(form_name));
        }

        self.next_or_continue()
    }
}
