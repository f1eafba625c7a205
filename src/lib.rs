//! Flight Info Form Service
//!
//! This library backs an authentication-gated flight arrival form. It keeps
//! the login and flight form page state, guards both pages on the identity
//! provider's session, and forwards validated submissions to the remote
//! flight info endpoint.
//!
//! # Modules
//!
//! - `auth`: identity provider contract and the shared session context
//! - `identity`: Firebase Identity Toolkit REST provider
//! - `client`: FlightInfoClient for the remote submission endpoint
//! - `services`: route guards, normalization, validation and page logic
//! - `handlers` / `routes`: the HTTP surface over the page session

pub mod auth;
pub mod client;
pub mod config;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod router;
pub mod routes;
pub mod services;

#[cfg(test)]
pub mod client_mock;

#[cfg(test)]
mod tests;

// Re-export the main types for ease of use
pub use auth::{AuthError, IdentityProvider, SessionContext};
pub use client::{ClientError, FlightInfoClient, FlightInfoSubmitter};
pub use config::{Config, ConfigError};
pub use handlers::api::AppState;
pub use identity::FirebaseIdentityProvider;
pub use router::PageRouter;
pub use routes::create_router;
