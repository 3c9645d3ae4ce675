//! Address errors produced by address validation
//!
//! An empty error list for a form means the address was confirmed. At most
//! one error exists per submitted form; `ValidationFailed` stands in for the
//! whole batch when the validation call itself did not succeed.

use serde::{Deserialize, Serialize};

use super::address::{AddressField, AddressFormName};

/// One field of an address, optionally annotated with whether the
/// validator flagged it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddressComponent {
    Annotated {
        value: String,
        #[serde(rename = "hasIssue")]
        has_issue: bool,
    },
    Plain(String),
}

impl AddressComponent {
    pub fn new(value: impl Into<String>, has_issue: bool) -> Self {
        AddressComponent::Annotated {
            value: value.into(),
            has_issue,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            AddressComponent::Annotated { value, .. } => value,
            AddressComponent::Plain(value) => value,
        }
    }

    pub fn has_issue(&self) -> bool {
        matches!(self, AddressComponent::Annotated { has_issue: true, .. })
    }
}

/// Per-field view of an address used to emphasise flagged fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressComponents {
    pub street_line1: AddressComponent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_line2: Option<AddressComponent>,
    pub city: AddressComponent,
    pub state: AddressComponent,
    pub zip: AddressComponent,
}

impl AddressComponents {
    /// Components in page order, paired with the field they belong to
    pub fn fields(&self) -> Vec<(AddressField, &AddressComponent)> {
        let mut fields = vec![(AddressField::StreetLine1, &self.street_line1)];
        if let Some(line2) = &self.street_line2 {
            fields.push((AddressField::StreetLine2, line2));
        }
        fields.push((AddressField::City, &self.city));
        fields.push((AddressField::Zip, &self.zip));
        fields.push((AddressField::State, &self.state));
        fields
    }

    /// Fields the validator flagged
    pub fn flagged_fields(&self) -> Vec<AddressField> {
        self.fields()
            .into_iter()
            .filter(|(_, component)| component.has_issue())
            .map(|(field, _)| field)
            .collect()
    }

}

/// Discriminant of [`AddressError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressErrorType {
    UnconfirmedComponents,
    MissingSubpremise,
    ReviewRecommendedAddress,
    ValidationFailed,
}

/// Reason an address could not be confirmed as entered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AddressError {
    /// Some components could not be confirmed by the validator
    #[serde(rename_all = "camelCase")]
    UnconfirmedComponents {
        form: AddressFormName,
        unconfirmed_address_components: AddressComponents,
    },

    /// The building has units but no apartment/suite was entered
    MissingSubpremise { form: AddressFormName },

    /// The validator recommends a different address
    #[serde(rename_all = "camelCase")]
    ReviewRecommendedAddress {
        form: AddressFormName,
        entered_address: AddressComponents,
        recommended_address: AddressComponents,
    },

    /// The validation call itself did not succeed
    ValidationFailed,
}

impl AddressError {
    pub fn error_type(&self) -> AddressErrorType {
        match self {
            AddressError::UnconfirmedComponents { .. } => AddressErrorType::UnconfirmedComponents,
            AddressError::MissingSubpremise { .. } => AddressErrorType::MissingSubpremise,
            AddressError::ReviewRecommendedAddress { .. } => {
                AddressErrorType::ReviewRecommendedAddress
            }
            AddressError::ValidationFailed => AddressErrorType::ValidationFailed,
        }
    }

    /// Form the error belongs to; `None` for `ValidationFailed`
    pub fn form(&self) -> Option<AddressFormName> {
        match self {
            AddressError::UnconfirmedComponents { form, .. }
            | AddressError::MissingSubpremise { form }
            | AddressError::ReviewRecommendedAddress { form, .. } => Some(*form),
            AddressError::ValidationFailed => None,
        }
    }
}
