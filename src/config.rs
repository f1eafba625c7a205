//! Service configuration loaded from the environment (and `.env` when present).

use dotenv::dotenv;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_FIREBASE_AUTH_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint receiving flight info submissions
    pub flight_api_url: String,
    /// Static value sent in the `token` header
    pub flight_api_token: String,
    /// Static value sent in the `candidate` header
    pub candidate_name: String,
    pub firebase_api_key: String,
    pub firebase_auth_endpoint: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let firebase_auth_endpoint = lookup("FIREBASE_AUTH_ENDPOINT").unwrap_or_else(|| {
            info!("FIREBASE_AUTH_ENDPOINT not set, using default: {DEFAULT_FIREBASE_AUTH_ENDPOINT}");
            DEFAULT_FIREBASE_AUTH_ENDPOINT.to_string()
        });

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        Ok(Self {
            flight_api_url: required("FLIGHT_API_URL")?,
            flight_api_token: required("FLIGHT_API_TOKEN")?,
            candidate_name: required("FLIGHT_CANDIDATE_NAME")?,
            firebase_api_key: required("FIREBASE_API_KEY")?,
            firebase_auth_endpoint,
            bind_addr,
        })
    }
}
