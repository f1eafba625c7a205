use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

use crate::models::form::FormState;
use crate::services::normalize::{normalize_date, normalize_time};

pub const MIN_GUESTS: i32 = 1;

/// Message shown above the form when submission is refused.
pub const AGGREGATE_ERROR_MESSAGE: &str = "Please fill in all required fields correctly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Airline,
    ArrivalDate,
    ArrivalTime,
    FlightNumber,
    NumOfGuests,
    Comments,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Airline,
        FormField::ArrivalDate,
        FormField::ArrivalTime,
        FormField::FlightNumber,
        FormField::NumOfGuests,
        FormField::Comments,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("This field is required.")]
    Required,
    #[error("Please enter a valid date.")]
    InvalidDate,
    #[error("Please enter a valid time.")]
    InvalidTime,
    #[error("Must be at least {min}.")]
    Min { min: i32 },
}

/// Per-field failures of a form that did not pass validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, FieldError>,
}

impl ValidationErrors {
    pub fn get(&self, field: FormField) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, FieldError)> + '_ {
        self.errors.iter().map(|(field, error)| (*field, *error))
    }

    /// Field errors rendered as user-facing messages
    pub fn messages(&self) -> BTreeMap<FormField, String> {
        self.iter().map(|(field, error)| (field, error.to_string())).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(AGGREGATE_ERROR_MESSAGE)
    }
}

impl std::error::Error for ValidationErrors {}

/// Check a single field against its rule.
pub fn validate_field(form: &FormState, field: FormField) -> Option<FieldError> {
    match field {
        FormField::Airline => required(&form.airline),
        FormField::FlightNumber => required(&form.flight_number),
        FormField::NumOfGuests => {
            (form.num_of_guests < MIN_GUESTS).then_some(FieldError::Min { min: MIN_GUESTS })
        }
        FormField::ArrivalDate => match form.arrival_date.as_deref() {
            None | Some("") => Some(FieldError::Required),
            Some(date) if normalize_date(Some(date.into())).is_none() => {
                Some(FieldError::InvalidDate)
            }
            Some(_) => None,
        },
        FormField::ArrivalTime => required(&form.arrival_time).or_else(|| {
            normalize_time(&form.arrival_time)
                .is_none()
                .then_some(FieldError::InvalidTime)
        }),
        FormField::Comments => None,
    }
}

/// Validate every field; the form is valid iff no field fails.
pub fn validate(form: &FormState) -> Result<(), ValidationErrors> {
    let errors: BTreeMap<_, _> = FormField::ALL
        .iter()
        .filter_map(|field| validate_field(form, *field).map(|error| (*field, error)))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

fn required(value: &str) -> Option<FieldError> {
    value.is_empty().then_some(FieldError::Required)
}

/// Fields the user has interacted with; errors are only shown for these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TouchedFields(BTreeSet<FormField>);

impl TouchedFields {
    pub fn mark(&mut self, field: FormField) {
        self.0.insert(field);
    }

    pub fn mark_all(&mut self) {
        self.0.extend(FormField::ALL);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_touched(&self, field: FormField) -> bool {
        self.0.contains(&field)
    }
}
