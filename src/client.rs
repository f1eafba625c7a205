use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::form::FlightInfoPayload;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

/// Remote endpoint accepting flight info submissions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlightInfoSubmitter: Send + Sync {
    /// Send one submission. Never retried.
    async fn submit_flight_info(&self, payload: &FlightInfoPayload) -> Result<(), ClientError>;
}

/// Client for the flight info endpoint
pub struct FlightInfoClient {
    client: Client,
    endpoint: String,
    token: String,
    candidate: String,
}

impl FlightInfoClient {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        candidate: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            token: token.into(),
            candidate: candidate.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.flight_api_url.clone(),
            config.flight_api_token.clone(),
            config.candidate_name.clone(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FlightInfoSubmitter for FlightInfoClient {
    async fn submit_flight_info(&self, payload: &FlightInfoPayload) -> Result<(), ClientError> {
        info!(
            "Submitting flight info for flight {} ({} guests)",
            payload.flight_number, payload.num_of_guests
        );
        debug!("API URL: {}", self.endpoint);

        let res = self
            .client
            .post(&self.endpoint)
            .header("token", &self.token)
            .header("candidate", &self.candidate)
            .json(payload)
            .send()
            .await?;

        let status = res.status();
        info!("Response received with status: {}", status);

        if status.is_success() {
            return Ok(());
        }

        let body = res.text().await.unwrap_or_default();
        let message = remote_error_message(&body)
            .unwrap_or_else(|| format!("Http failure response for {}: {}", self.endpoint, status));
        warn!("Flight info submission rejected: {}", message);

        Err(ClientError::Rejected { status, message })
    }
}

// Best-effort extraction of a server-provided error message
fn remote_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = value
        .get("message")
        .or_else(|| value.get("error").and_then(|e| e.get("message")))
        .or_else(|| value.get("error"))?
        .as_str()?
        .trim();

    (!message.is_empty()).then(|| message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_message_shapes() {
        assert_eq!(
            remote_error_message(r#"{"message":"Invalid token"}"#).as_deref(),
            Some("Invalid token")
        );
        assert_eq!(
            remote_error_message(r#"{"error":{"message":"Flight not found"}}"#).as_deref(),
            Some("Flight not found")
        );
        assert_eq!(
            remote_error_message(r#"{"error":"Bad candidate"}"#).as_deref(),
            Some("Bad candidate")
        );
        assert_eq!(remote_error_message(r#"{"message":""}"#), None);
        assert_eq!(remote_error_message("<html>502</html>"), None);
    }
}
