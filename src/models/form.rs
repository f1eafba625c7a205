use serde::{Deserialize, Serialize};

/// Values of the flight info form as the user entered them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    pub airline: String,
    pub arrival_date: Option<String>,
    pub arrival_time: String,
    pub flight_number: String,
    pub num_of_guests: i32,
    pub comments: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            airline: String::new(),
            arrival_date: None,
            arrival_time: String::new(),
            flight_number: String::new(),
            num_of_guests: 1,
            comments: None,
        }
    }
}

impl FormState {
    /// Decrease the guest count, never going below one
    pub fn decrease_guests(&mut self) {
        let current = self.num_of_guests.max(1);
        self.num_of_guests = (current - 1).max(1);
    }

    /// Increase the guest count; there is no upper bound
    pub fn increase_guests(&mut self) {
        self.num_of_guests = self.num_of_guests.max(1).saturating_add(1);
    }
}

// Body sent to the flight info endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightInfoPayload {
    pub airline: String,
    pub arrival_date: String, // ISO-8601 timestamp
    pub arrival_time: String, // HH:mm
    pub flight_number: String,
    pub num_of_guests: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl FlightInfoPayload {
    /// Project a validated form onto the wire payload using already-normalized date and time.
    pub fn from_form(form: &FormState, arrival_date: String, arrival_time: String) -> Self {
        Self {
            airline: form.airline.clone(),
            arrival_date,
            arrival_time,
            flight_number: form.flight_number.clone(),
            num_of_guests: form.num_of_guests,
            comments: form.comments.clone().filter(|c| !c.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled_form() -> FormState {
        FormState {
            airline: "Qantas".to_string(),
            arrival_date: Some("2035-03-30".to_string()),
            arrival_time: "1:05 PM".to_string(),
            flight_number: "QF1".to_string(),
            num_of_guests: 3,
            comments: None,
        }
    }

    #[test]
    fn test_default_form_has_one_guest() {
        let form = FormState::default();
        assert_eq!(form.num_of_guests, 1);
        assert!(form.airline.is_empty());
        assert!(form.arrival_date.is_none());
        assert!(form.comments.is_none());
    }

    #[test]
    fn test_guest_counter_floor() {
        let mut form = FormState::default();
        form.decrease_guests();
        assert_eq!(form.num_of_guests, 1);

        form.num_of_guests = 5;
        form.decrease_guests();
        form.increase_guests();
        assert_eq!(form.num_of_guests, 5);

        form.num_of_guests = 0;
        form.decrease_guests();
        assert_eq!(form.num_of_guests, 1);
    }

    #[test]
    fn test_payload_omits_empty_comments() {
        let mut form = filled_form();
        form.comments = Some(String::new());

        let payload = FlightInfoPayload::from_form(
            &form,
            "2035-03-30T00:00:00.000Z".to_string(),
            "13:05".to_string(),
        );
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "airline": "Qantas",
                "arrivalDate": "2035-03-30T00:00:00.000Z",
                "arrivalTime": "13:05",
                "flightNumber": "QF1",
                "numOfGuests": 3
            })
        );
        assert!(value.get("comments").is_none());
    }

    #[test]
    fn test_payload_keeps_comments() {
        let mut form = filled_form();
        form.comments = Some("Wheelchair needed".to_string());

        let payload = FlightInfoPayload::from_form(&form, "d".to_string(), "t".to_string());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["comments"], "Wheelchair needed");
    }

    #[test]
    fn test_form_state_accepts_partial_input() {
        let form: FormState = serde_json::from_str(r#"{"airline":"KLM"}"#).unwrap();
        assert_eq!(form.airline, "KLM");
        assert_eq!(form.num_of_guests, 1);
    }
}
