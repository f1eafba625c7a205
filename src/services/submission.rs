use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

use crate::client::{ClientError, FlightInfoSubmitter};
use crate::models::form::{FlightInfoPayload, FormState};
use crate::models::session::AuthUser;
use crate::services::normalize::{normalize_date, normalize_time};
use crate::services::validation::{
    validate, validate_field, FormField, TouchedFields, ValidationErrors,
};

pub const SUCCESS_MESSAGE: &str = "Flight info submitted successfully!";
pub const INVALID_DATE_TIME_MESSAGE: &str = "Invalid arrival date or time.";
pub const UNKNOWN_SUBMIT_ERROR: &str = "Unknown error while submitting.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Invalid arrival date or time.")]
    InvalidDateTime,

    #[error("{0}")]
    Remote(String),
}

/// State of the flight form page for one session.
#[derive(Debug, Clone, Default)]
pub struct FlightFormPage {
    pub form: FormState,
    pub touched: TouchedFields,
    pub loading: bool,
    pub api_error: Option<String>,
    pub success_message: Option<String>,
    pub dropdown_open: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub initials: String,
    pub display_name: String,
    pub email: String,
}

/// Renderable snapshot of the page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightFormView {
    pub form: FormState,
    pub form_valid: bool,
    pub field_errors: BTreeMap<FormField, String>,
    pub loading: bool,
    pub api_error: Option<String>,
    pub success_message: Option<String>,
    pub dropdown_open: bool,
    pub user: Option<UserProfile>,
}

impl FlightFormPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the form values with new user input, marking edited fields as touched.
    pub fn update_form(&mut self, input: FormState) {
        let before = std::mem::replace(&mut self.form, input);
        let edited = [
            (FormField::Airline, before.airline != self.form.airline),
            (FormField::ArrivalDate, before.arrival_date != self.form.arrival_date),
            (FormField::ArrivalTime, before.arrival_time != self.form.arrival_time),
            (FormField::FlightNumber, before.flight_number != self.form.flight_number),
            (FormField::NumOfGuests, before.num_of_guests != self.form.num_of_guests),
            (FormField::Comments, before.comments != self.form.comments),
        ];
        for (field, changed) in edited {
            if changed {
                self.touched.mark(field);
            }
        }
    }

    pub fn increase_guests(&mut self) {
        self.form.increase_guests();
    }

    pub fn decrease_guests(&mut self) {
        self.form.decrease_guests();
    }

    /// Apply a value from the time picker. Unparseable values are ignored.
    pub fn on_time_selected(&mut self, time: &str) {
        if let Some(formatted) = normalize_time(time) {
            self.form.arrival_time = formatted;
            self.touched.mark(FormField::ArrivalTime);
        }
    }

    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
    }

    /// Validate and normalize the form, producing the payload to send.
    ///
    /// On success `loading` is set and the caller must issue exactly one
    /// request and hand its result to [`FlightFormPage::finish_submission`].
    /// On failure no request may be made.
    pub fn begin_submission(&mut self) -> Result<FlightInfoPayload, SubmitError> {
        self.api_error = None;
        self.success_message = None;

        if let Err(errors) = validate(&self.form) {
            warn!("Refusing to submit invalid form ({} field errors)", errors.len());
            self.touched.mark_all();
            return Err(SubmitError::Validation(errors));
        }

        let arrival_date = normalize_date(self.form.arrival_date.as_deref().map(Into::into));
        let arrival_time = normalize_time(&self.form.arrival_time);
        let (Some(arrival_date), Some(arrival_time)) = (arrival_date, arrival_time) else {
            warn!("Arrival date or time failed to normalize after validation");
            self.api_error = Some(INVALID_DATE_TIME_MESSAGE.to_string());
            return Err(SubmitError::InvalidDateTime);
        };

        let payload = FlightInfoPayload::from_form(&self.form, arrival_date, arrival_time);
        self.loading = true;
        Ok(payload)
    }

    /// Apply the result of the request started by [`FlightFormPage::begin_submission`].
    pub fn finish_submission(&mut self, result: Result<(), ClientError>) -> Result<(), SubmitError> {
        self.loading = false;

        match result {
            Ok(()) => {
                info!("Flight info submitted successfully");
                self.form = FormState::default();
                self.touched.clear();
                self.api_error = None;
                self.success_message = Some(SUCCESS_MESSAGE.to_string());
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                let message = if message.trim().is_empty() {
                    UNKNOWN_SUBMIT_ERROR.to_string()
                } else {
                    message
                };
                warn!("Flight info submission failed: {}", message);
                self.api_error = Some(message.clone());
                Err(SubmitError::Remote(message))
            }
        }
    }

    /// Run the whole pipeline: validate, normalize, send one request, apply the outcome.
    pub async fn submit(&mut self, submitter: &dyn FlightInfoSubmitter) -> Result<(), SubmitError> {
        let payload = self.begin_submission()?;
        let result = submitter.submit_flight_info(&payload).await;
        self.finish_submission(result)
    }

    /// Error messages for the fields the user has touched
    pub fn visible_errors(&self) -> BTreeMap<FormField, String> {
        FormField::ALL
            .iter()
            .filter(|field| self.touched.is_touched(**field))
            .filter_map(|field| {
                validate_field(&self.form, *field).map(|error| (*field, error.to_string()))
            })
            .collect()
    }

    pub fn view(&self, user: Option<&AuthUser>) -> FlightFormView {
        FlightFormView {
            form: self.form.clone(),
            form_valid: validate(&self.form).is_ok(),
            field_errors: self.visible_errors(),
            loading: self.loading,
            api_error: self.api_error.clone(),
            success_message: self.success_message.clone(),
            dropdown_open: self.dropdown_open,
            user: user.map(|user| UserProfile {
                initials: user.initials(),
                display_name: user.display_name_or_empty().to_string(),
                email: user.email_or_empty().to_string(),
            }),
        }
    }
}
