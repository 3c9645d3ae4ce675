//! Addresses form state
//!
//! The home address is always present. Mailing and previous addresses are
//! optional sub-forms the user opts into. Fields flagged by address
//! validation are marked with caution until the user edits them.

use ebe_common::api::ValidateAddressesRequest;
use ebe_common::{Address, AddressComponents, AddressError, AddressField, AddressFormName};
use std::collections::BTreeSet;

use crate::validators::{
    StateValidator, Validator, Validity, ZipCodeValidator, CITY_REQUIRED, STREET_LINE1_REQUIRED,
    US_STATE_ABBREVIATIONS,
};
use crate::zip_state::state_for_zip;

/// Page the wizard moves to once addresses are accepted
pub const OTHER_DETAILS_PATH: &str = "/register/other-details";

/// State selected before a ZIP code picks one
pub const DEFAULT_STATE: &str = "AL";

/// Raw field values of one address sub-form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFields {
    pub street_line1: String,
    pub street_line2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl AddressFields {
    /// Empty sub-form with the default state selected
    pub fn new() -> Self {
        Self {
            state: DEFAULT_STATE.to_string(),
            ..Default::default()
        }
    }

    /// Sub-form pre-filled with a ZIP code carried over from an earlier
    /// page; the state follows the ZIP code when it can be looked up
    pub fn with_zip(zip: &str) -> Self {
        let mut fields = Self::new();
        fields.zip = zip.to_string();
        if let Some(state) = fields.state_from_zip() {
            fields.state = state.to_string();
        }
        fields
    }

    /// State implied by a valid ZIP code, if it is one the form offers
    fn state_from_zip(&self) -> Option<&'static str> {
        if !self.validate_field(AddressField::Zip).is_valid() {
            return None;
        }
        state_for_zip(&self.zip).filter(|state| US_STATE_ABBREVIATIONS.contains(state))
    }

    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::StreetLine1 => &self.street_line1,
            AddressField::StreetLine2 => &self.street_line2,
            AddressField::City => &self.city,
            AddressField::State => &self.state,
            AddressField::Zip => &self.zip,
        }
    }

    fn get_mut(&mut self, field: AddressField) -> &mut String {
        match field {
            AddressField::StreetLine1 => &mut self.street_line1,
            AddressField::StreetLine2 => &mut self.street_line2,
            AddressField::City => &mut self.city,
            AddressField::State => &mut self.state,
            AddressField::Zip => &mut self.zip,
        }
    }

    /// Validity ignoring caution marks
    pub fn validate_field(&self, field: AddressField) -> Validity {
        let value = self.get(field);
        match field {
            AddressField::StreetLine1 => STREET_LINE1_REQUIRED.validate(value),
            AddressField::StreetLine2 => Validity::Valid,
            AddressField::City => CITY_REQUIRED.validate(value),
            AddressField::Zip => ZipCodeValidator::new(true).validate(value),
            AddressField::State => StateValidator.validate(value),
        }
    }

    /// Trimmed address; an empty street line 2 becomes absent
    pub fn to_address(&self) -> Address {
        let street_line2 = self.street_line2.trim();
        Address {
            street_line1: self.street_line1.trim().to_string(),
            street_line2: (!street_line2.is_empty()).then(|| street_line2.to_string()),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip: self.zip.trim().to_string(),
        }
    }
}

/// The addresses page of the registration wizard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressesForm {
    pub home_address: AddressFields,
    /// `None` when the user gets mail at the home address
    pub mailing_address: Option<AddressFields>,
    /// `None` when the user has not moved since last registering
    pub previous_address: Option<AddressFields>,
    cautions: BTreeSet<(AddressFormName, AddressField)>,
}

impl AddressesForm {
    pub fn new(home_address: AddressFields) -> Self {
        Self {
            home_address,
            ..Default::default()
        }
    }

    pub fn fields(&self, form: AddressFormName) -> Option<&AddressFields> {
        match form {
            AddressFormName::HomeAddress => Some(&self.home_address),
            AddressFormName::MailingAddress => self.mailing_address.as_ref(),
            AddressFormName::PreviousAddress => self.previous_address.as_ref(),
        }
    }

    /// Direct access to a sub-form; caution marks are left untouched
    pub fn field_mut(&mut self, form: AddressFormName) -> Option<&mut AddressFields> {
        match form {
            AddressFormName::HomeAddress => Some(&mut self.home_address),
            AddressFormName::MailingAddress => self.mailing_address.as_mut(),
            AddressFormName::PreviousAddress => self.previous_address.as_mut(),
        }
    }

    /// Home address pre-filled with the ZIP code entered on the eligibility
    /// page
    pub fn with_zip(zip: &str) -> Self {
        Self::new(AddressFields::with_zip(zip))
    }

    /// Opt in or out of the mailing or previous address. Opting in starts
    /// from an empty sub-form; opting out drops its values and cautions.
    /// The home address is always included.
    pub fn set_included(&mut self, form: AddressFormName, included: bool) {
        let slot = match form {
            AddressFormName::HomeAddress => return,
            AddressFormName::MailingAddress => &mut self.mailing_address,
            AddressFormName::PreviousAddress => &mut self.previous_address,
        };

        match (included, slot.is_some()) {
            (true, false) => *slot = Some(AddressFields::new()),
            (false, true) => {
                *slot = None;
                self.cautions.retain(|(caution_form, _)| *caution_form != form);
            }
            _ => {}
        }
    }

    /// Included sub-forms in page order
    pub fn included_forms(&self) -> Vec<AddressFormName> {
        AddressFormName::ALL
            .into_iter()
            .filter(|form| self.fields(*form).is_some())
            .collect()
    }

    /// Set a field value; editing clears any caution on the field.
    /// Setting a ZIP code that maps to a state also selects that state.
    /// Returns `false` if the sub-form is not included.
    pub fn set_field(&mut self, form: AddressFormName, field: AddressField, value: &str) -> bool {
        let Some(fields) = self.field_mut(form) else {
            return false;
        };
        let changed = fields.get(field).trim() != value.trim();
        *fields.get_mut(field) = value.to_string();

        // A new valid ZIP code selects its state
        let zip_state = match field {
            AddressField::Zip if changed => fields.state_from_zip(),
            _ => None,
        };
        if let Some(state) = zip_state {
            fields.state = state.to_string();
            self.cautions.remove(&(form, AddressField::State));
        }

        self.cautions.remove(&(form, field));
        true
    }

    /// Copy a recommended address into a sub-form
    ///
    /// An absent recommended street line 2 clears the field.
    pub fn apply_recommended_address(
        &mut self,
        form: AddressFormName,
        recommended: &AddressComponents,
    ) -> bool {
        if self.fields(form).is_none() {
            return false;
        }

        let line2 = recommended
            .street_line2
            .as_ref()
            .map(|component| component.value())
            .unwrap_or("");

        self.set_field(form, AddressField::StreetLine1, recommended.street_line1.value());
        self.set_field(form, AddressField::StreetLine2, line2);
        self.set_field(form, AddressField::City, recommended.city.value());
        self.set_field(form, AddressField::Zip, recommended.zip.value());
        self.set_field(form, AddressField::State, recommended.state.value());
        true
    }

    /// Mark the fields named by address errors with caution
    pub fn apply_cautions(&mut self, errors: &[AddressError]) {
        for (form, field) in caution_fields(errors) {
            if self.fields(form).is_some() {
                self.cautions.insert((form, field));
            }
        }
    }

    pub fn has_caution(&self, form: AddressFormName, field: AddressField) -> bool {
        self.cautions.contains(&(form, field))
    }

    /// Field validity including caution marks; `None` if the sub-form is
    /// not included
    pub fn validity(&self, form: AddressFormName, field: AddressField) -> Option<Validity> {
        let validity = self.fields(form)?.validate_field(field);
        if validity.is_valid() && self.has_caution(form, field) {
            return Some(Validity::Caution);
        }
        Some(validity)
    }

    pub fn is_valid_or_caution(&self) -> bool {
        self.validate()
            .iter()
            .all(|(_, _, validity)| validity.is_valid_or_caution())
    }

    /// Id of the first field that is not plainly valid, e.g. `homeAddress.zip`
    pub fn first_invalid_field(&self) -> Option<String> {
        self.validate()
            .into_iter()
            .find(|(_, _, validity)| !validity.is_valid())
            .map(|(form, field, _)| field_id(form, field))
    }

    /// Validity of every field of the included sub-forms, in page order
    pub fn validate(&self) -> Vec<(AddressFormName, AddressField, Validity)> {
        let mut validities = Vec::new();
        for form in self.included_forms() {
            for field in AddressField::ALL {
                if let Some(validity) = self.validity(form, field) {
                    validities.push((form, field, validity));
                }
            }
        }
        validities
    }

    /// Request body for the validation route
    pub fn to_request(&self) -> ValidateAddressesRequest {
        ValidateAddressesRequest {
            home_address: self.home_address.to_address(),
            mailing_address: self.mailing_address.as_ref().map(AddressFields::to_address),
            previous_address: self.previous_address.as_ref().map(AddressFields::to_address),
        }
    }

    /// Other-details page, pre-selected with the home state and ZIP code
    pub fn other_details_path(&self) -> String {
        format!(
            "{}?state={}&zip={}",
            OTHER_DETAILS_PATH,
            self.home_address.state.trim(),
            self.home_address.zip.trim()
        )
    }
}

/// `<form>.<field>`
pub fn field_id(form: AddressFormName, field: AddressField) -> String {
    format!("{}.{}", form, field)
}

/// Fields to mark with caution for a list of address errors
///
/// Street line 2 for a missing subpremise; every flagged component of the
/// entered address for unconfirmed components and recommended addresses.
pub fn caution_fields(errors: &[AddressError]) -> Vec<(AddressFormName, AddressField)> {
    let mut fields = Vec::new();

    for error in errors {
        match error {
            AddressError::MissingSubpremise { form } => {
                fields.push((*form, AddressField::StreetLine2));
            }
            AddressError::ReviewRecommendedAddress {
                form,
                entered_address,
                ..
            } => {
                fields.extend(entered_address.flagged_fields().into_iter().map(|f| (*form, f)));
            }
            AddressError::UnconfirmedComponents {
                form,
                unconfirmed_address_components,
            } => {
                fields.extend(
                    unconfirmed_address_components
                        .flagged_fields()
                        .into_iter()
                        .map(|f| (*form, f)),
                );
            }
            AddressError::ValidationFailed => {}
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebe_common::AddressComponent;

    fn fields() -> AddressFields {
        AddressFields {
            street_line1: " 1 Main St ".to_string(),
            street_line2: "  ".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "62701".to_string(),
        }
    }

    #[test]
    fn test_to_request_trims_and_drops_empty_line2() {
        let mut form = AddressesForm::new(fields());
        form.previous_address = Some(fields());

        let request = form.to_request();
        assert_eq!(request.home_address.street_line1, "1 Main St");
        assert_eq!(request.home_address.street_line2, None);
        assert!(request.mailing_address.is_none());
        assert!(request.previous_address.is_some());
    }

    #[test]
    fn test_first_invalid_field_order() {
        let mut form = AddressesForm::new(fields());
        assert_eq!(form.first_invalid_field(), None);

        let mut mailing = fields();
        mailing.city.clear();
        mailing.zip = "123".to_string();
        form.mailing_address = Some(mailing);
        assert_eq!(form.first_invalid_field().as_deref(), Some("mailingAddress.city"));

        form.home_address.state = "ZZ".to_string();
        assert_eq!(form.first_invalid_field().as_deref(), Some("homeAddress.state"));
        assert!(!form.is_valid_or_caution());
    }

    #[test]
    fn test_caution_marks_and_clears() {
        let mut form = AddressesForm::new(fields());
        form.apply_cautions(&[AddressError::MissingSubpremise {
            form: AddressFormName::HomeAddress,
        }]);

        assert_eq!(
            form.validity(AddressFormName::HomeAddress, AddressField::StreetLine2),
            Some(Validity::Caution)
        );
        assert!(form.is_valid_or_caution());
        assert_eq!(
            form.first_invalid_field().as_deref(),
            Some("homeAddress.streetLine2")
        );

        form.set_field(AddressFormName::HomeAddress, AddressField::StreetLine2, "Apt 1");
        assert_eq!(form.first_invalid_field(), None);
    }

    #[test]
    fn test_cautions_ignore_excluded_forms() {
        let mut form = AddressesForm::new(fields());
        form.apply_cautions(&[AddressError::MissingSubpremise {
            form: AddressFormName::PreviousAddress,
        }]);
        assert!(!form.has_caution(AddressFormName::PreviousAddress, AddressField::StreetLine2));
    }

    #[test]
    fn test_caution_fields_for_each_kind() {
        let flagged = AddressComponents {
            street_line1: AddressComponent::new("1 Main St", true),
            street_line2: None,
            city: AddressComponent::new("Springfield", false),
            state: AddressComponent::new("IL", false),
            zip: AddressComponent::new("62701", true),
        };
        let errors = vec![
            AddressError::UnconfirmedComponents {
                form: AddressFormName::HomeAddress,
                unconfirmed_address_components: flagged.clone(),
            },
            AddressError::ReviewRecommendedAddress {
                form: AddressFormName::MailingAddress,
                entered_address: flagged.clone(),
                recommended_address: flagged,
            },
            AddressError::ValidationFailed,
        ];

        assert_eq!(
            caution_fields(&errors),
            vec![
                (AddressFormName::HomeAddress, AddressField::StreetLine1),
                (AddressFormName::HomeAddress, AddressField::Zip),
                (AddressFormName::MailingAddress, AddressField::StreetLine1),
                (AddressFormName::MailingAddress, AddressField::Zip),
            ]
        );
    }

    #[test]
    fn test_apply_recommended_address() {
        let mut form = AddressesForm::new(fields());
        form.home_address.street_line2 = "Unit 3".to_string();
        let recommended = AddressComponents {
            street_line1: AddressComponent::new("1 Main Street", true),
            street_line2: None,
            city: AddressComponent::Plain("Springfield".to_string()),
            state: AddressComponent::Plain("IL".to_string()),
            zip: AddressComponent::new("62702", true),
        };

        assert!(form.apply_recommended_address(AddressFormName::HomeAddress, &recommended));
        assert_eq!(form.home_address.street_line1, "1 Main Street");
        assert_eq!(form.home_address.street_line2, "");
        assert_eq!(form.home_address.zip, "62702");

        assert!(!form.apply_recommended_address(AddressFormName::MailingAddress, &recommended));
    }

    #[test]
    fn test_other_details_path() {
        let form = AddressesForm::new(fields());
        assert_eq!(
            form.other_details_path(),
            "/register/other-details?state=IL&zip=62701"
        );
    }

    #[test]
    fn test_zip_selects_state() {
        let mut form = AddressesForm::new(fields());
        form.home_address.state = "CA".to_string();
        form.apply_cautions(&[AddressError::UnconfirmedComponents {
            form: AddressFormName::HomeAddress,
            unconfirmed_address_components: AddressComponents {
                street_line1: AddressComponent::new("1 Main St", false),
                street_line2: None,
                city: AddressComponent::new("Springfield", false),
                state: AddressComponent::new("CA", true),
                zip: AddressComponent::new("62701", false),
            },
        }]);

        form.set_field(AddressFormName::HomeAddress, AddressField::Zip, "10001");
        assert_eq!(form.home_address.state, "NY");
        assert!(!form.has_caution(AddressFormName::HomeAddress, AddressField::State));
    }

    #[test]
    fn test_zip_without_known_state_keeps_state() {
        let mut form = AddressesForm::new(fields());

        // Unassigned prefix
        form.set_field(AddressFormName::HomeAddress, AddressField::Zip, "88700");
        assert_eq!(form.home_address.state, "IL");

        // Territories are not offered
        form.set_field(AddressFormName::HomeAddress, AddressField::Zip, "00901");
        assert_eq!(form.home_address.state, "IL");

        // Incomplete ZIP code
        form.set_field(AddressFormName::HomeAddress, AddressField::Zip, "9404");
        assert_eq!(form.home_address.state, "IL");
    }

    #[test]
    fn test_unchanged_zip_keeps_chosen_state() {
        let mut form = AddressesForm::new(fields());
        form.set_field(AddressFormName::HomeAddress, AddressField::State, "MO");
        form.set_field(AddressFormName::HomeAddress, AddressField::Zip, " 62701 ");
        assert_eq!(form.home_address.state, "MO");
    }

    #[test]
    fn test_initial_state() {
        assert_eq!(AddressFields::new().state, DEFAULT_STATE);
        assert_eq!(AddressFields::with_zip("62701").state, "IL");
        assert_eq!(AddressFields::with_zip("00901").state, DEFAULT_STATE);
        assert_eq!(AddressFields::with_zip("").state, DEFAULT_STATE);
    }

    #[test]
    fn test_set_included() {
        let mut form = AddressesForm::with_zip("62701");
        assert_eq!(form.home_address.state, "IL");

        form.set_included(AddressFormName::MailingAddress, true);
        let mailing = form.mailing_address.clone().unwrap();
        assert_eq!(mailing.state, DEFAULT_STATE);
        assert_eq!(
            form.first_invalid_field().as_deref(),
            Some("homeAddress.streetLine1")
        );

        form.apply_cautions(&[AddressError::MissingSubpremise {
            form: AddressFormName::MailingAddress,
        }]);
        form.set_included(AddressFormName::MailingAddress, false);
        assert!(form.mailing_address.is_none());
        assert!(!form.has_caution(AddressFormName::MailingAddress, AddressField::StreetLine2));

        form.set_included(AddressFormName::HomeAddress, false);
        assert_eq!(form.included_forms(), vec![AddressFormName::HomeAddress]);
    }
}
