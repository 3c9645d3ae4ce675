//! Classify an Address Validation API response into an [`AddressError`]
//!
//! At most one error is produced per form. Precedence, first match wins:
//! 1. the verdict reports unconfirmed components
//! 2. a subpremise (unit/apartment) is missing
//! 3. the recommended address differs from the entered one
//!
//! All functions here are pure.

use ebe_common::{Address, AddressComponent, AddressComponents, AddressError, AddressFormName};

use super::response::{ProcessableResponse, SUBPREMISE};

/// Component types that never flag a street line on their own
const STREET_LINE_IGNORED_COMPONENTS: [&str; 8] = [
    "street_number",
    "route",
    "locality",
    "administrative_area_level_1",
    "postal_code",
    "postal_code_prefix",
    "postal_code_suffix",
    "country",
];

/// Error for one submitted form, or `None` if the address was confirmed
pub fn classify(
    address: &Address,
    response: &ProcessableResponse,
    form: AddressFormName,
) -> Option<AddressError> {
    if response.has_unconfirmed_components() {
        return Some(unconfirmed_components_error(address, response, form));
    }

    if is_missing_subpremise(address, response) {
        return Some(AddressError::MissingSubpremise { form });
    }

    if differs_from_recommended(address, response) {
        return Some(review_recommended_address_error(address, response, form));
    }

    None
}

// ---------------------------------------------------------------------------
// Unconfirmed components
// ---------------------------------------------------------------------------

pub fn unconfirmed_components_error(
    address: &Address,
    response: &ProcessableResponse,
    form: AddressFormName,
) -> AddressError {
    let unconfirmed_address_components = AddressComponents {
        street_line1: AddressComponent::new(
            &address.street_line1,
            is_address_line_unconfirmed(&address.street_line1, response),
        ),
        street_line2: address.street_line2().map(|line| {
            AddressComponent::new(line, is_address_line_unconfirmed(line, response))
        }),
        city: AddressComponent::new(
            &address.city,
            is_component_unconfirmed("locality", response),
        ),
        state: AddressComponent::new(
            &address.state,
            is_component_unconfirmed("administrative_area_level_1", response),
        ),
        zip: AddressComponent::new(
            &address.zip,
            is_component_unconfirmed("postal_code", response),
        ),
    };

    AddressError::UnconfirmedComponents {
        form,
        unconfirmed_address_components,
    }
}

fn is_address_line_unconfirmed(line: &str, response: &ProcessableResponse) -> bool {
    if line_matches_unconfirmed_street_address(line, response) {
        return true;
    }

    response.components().iter().any(|component| {
        !component.is_confirmed()
            && !STREET_LINE_IGNORED_COMPONENTS.contains(&component.component_type.as_str())
            && component.component_name.text == line
    })
}

fn line_matches_unconfirmed_street_address(line: &str, response: &ProcessableResponse) -> bool {
    let Some(street_address) = street_address(response) else {
        return false;
    };

    is_street_address_unconfirmed(response)
        && collapse_whitespace(line) == collapse_whitespace(&street_address)
}

/// A missing street number or route counts as unconfirmed
fn is_street_address_unconfirmed(response: &ProcessableResponse) -> bool {
    let confirmed = |component_type: &str| {
        response
            .component(component_type)
            .is_some_and(|component| component.is_confirmed())
    };

    !confirmed("street_number") || !confirmed("route")
}

/// `"<street number> <route>"`, or whichever of the two is present
fn street_address(response: &ProcessableResponse) -> Option<String> {
    let street_number = response
        .component("street_number")
        .map(|c| c.component_name.text.as_str())
        .filter(|text| !text.is_empty());
    let route = response
        .component("route")
        .map(|c| c.component_name.text.as_str())
        .filter(|text| !text.is_empty());

    match (street_number, route) {
        (Some(number), Some(route)) => Some(format!("{} {}", number, route)),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    }
}

fn is_component_unconfirmed(component_type: &str, response: &ProcessableResponse) -> bool {
    response
        .component(component_type)
        .map_or(true, |component| !component.is_confirmed())
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Missing subpremise
// ---------------------------------------------------------------------------

/// The API reports a missing subpremise, or the entered street line 2 did
/// not survive into the recommended address lines
pub fn is_missing_subpremise(address: &Address, response: &ProcessableResponse) -> bool {
    if response.is_missing(SUBPREMISE) {
        return true;
    }

    let recommended_line2 = response
        .postal_address()
        .address_lines
        .get(1)
        .filter(|line| !line.is_empty());

    address.street_line2().is_some() && recommended_line2.is_none()
}

// ---------------------------------------------------------------------------
// Recommended address
// ---------------------------------------------------------------------------

/// Address the API recommends, built from its postal address
pub fn recommended_address(response: &ProcessableResponse) -> Address {
    let postal = response.postal_address();

    Address {
        street_line1: postal.address_lines.first().cloned().unwrap_or_default(),
        street_line2: postal
            .address_lines
            .get(1)
            .filter(|line| !line.is_empty())
            .cloned(),
        city: postal.locality.clone(),
        state: postal.administrative_area.clone(),
        zip: postal.postal_code.chars().take(5).collect(),
    }
}

pub fn differs_from_recommended(address: &Address, response: &ProcessableResponse) -> bool {
    let recommended = recommended_address(response);

    address.street_line1 != recommended.street_line1
        || address.street_line2().unwrap_or("") != recommended.street_line2().unwrap_or("")
        || address.city != recommended.city
        || address.state != recommended.state
        || address.zip != recommended.zip
}

pub fn review_recommended_address_error(
    address: &Address,
    response: &ProcessableResponse,
    form: AddressFormName,
) -> AddressError {
    let recommended = recommended_address(response);

    AddressError::ReviewRecommendedAddress {
        form,
        entered_address: compare_addresses(address, &recommended),
        recommended_address: compare_addresses(&recommended, address),
    }
}

/// Components of `a`, flagged where they differ from `b`
fn compare_addresses(a: &Address, b: &Address) -> AddressComponents {
    AddressComponents {
        street_line1: AddressComponent::new(&a.street_line1, a.street_line1 != b.street_line1),
        street_line2: a
            .street_line2()
            .map(|line| AddressComponent::new(line, Some(line) != b.street_line2())),
        city: AddressComponent::new(&a.city, a.city != b.city),
        state: AddressComponent::new(&a.state, a.state != b.state),
        zip: AddressComponent::new(&a.zip, a.zip != b.zip),
    }
}
