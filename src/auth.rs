use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::models::session::{AuthState, AuthUser, Route};
use crate::router::Navigator;

/// Shown for any provider error code without a dedicated message.
pub const GENERIC_AUTH_ERROR: &str = "An unexpected error occurred. Please try again.";

/// Provider error code used when the provider could not be reached.
pub const NETWORK_REQUEST_FAILED: &str = "auth/network-request-failed";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("identity provider rejected the request: {code}")]
    Provider { code: String },

    #[error("identity provider unreachable: {0}")]
    Network(String),
}

impl AuthError {
    pub fn provider(code: impl Into<String>) -> Self {
        AuthError::Provider { code: code.into() }
    }

    /// Provider error code, e.g. `auth/wrong-password`
    pub fn code(&self) -> &str {
        match self {
            AuthError::Provider { code } => code,
            AuthError::Network(_) => NETWORK_REQUEST_FAILED,
        }
    }

    pub fn friendly_message(&self) -> &'static str {
        friendly_message(self.code())
    }
}

/// Map a provider error code to a message suitable for the login screen.
pub fn friendly_message(code: &str) -> &'static str {
    match code {
        "auth/invalid-email" => "Invalid email address format.",
        "auth/user-disabled" => "This account has been disabled. Contact support.",
        "auth/user-not-found" => "No account found with this email.",
        "auth/wrong-password" => "Incorrect password. Please try again.",
        "auth/invalid-credential" => "Invalid email or password.",
        "auth/email-already-in-use" => "This email is already registered.",
        "auth/weak-password" => "Password should be at least 6 characters.",
        "auth/popup-closed-by-user" => "Google sign-in popup was closed.",
        NETWORK_REQUEST_FAILED => "Network error. Please check your connection.",
        _ => GENERIC_AUTH_ERROR,
    }
}

/// Third-party identity provider.
///
/// The provider owns the authentication state; everything else only reads it
/// through [`IdentityProvider::subscribe`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Receiver of auth-state changes. The current value is the latest state.
    fn subscribe(&self) -> watch::Receiver<AuthState>;

    fn current_user(&self) -> Option<AuthUser>;

    async fn sign_in_with_email(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    async fn register_with_email(&self, email: &str, password: &str)
        -> Result<AuthUser, AuthError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// Exchange a Google ID token obtained from the sign-in popup for a session
    async fn sign_in_with_google(&self, id_token: &str) -> Result<AuthUser, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Session handle passed explicitly to guards and pages.
#[derive(Clone)]
pub struct SessionContext {
    provider: Arc<dyn IdentityProvider>,
}

impl SessionContext {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &dyn IdentityProvider {
        self.provider.as_ref()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.provider.current_user()
    }

    /// Wait for the first resolved auth-state notification.
    ///
    /// Suspends while the provider is still `Pending`. There is no timeout. A
    /// provider that goes away before resolving counts as unauthenticated.
    pub async fn first_resolved_state(&self) -> AuthState {
        let mut receiver = self.provider.subscribe();
        let resolved = match receiver.wait_for(|state| !state.is_pending()).await {
            Ok(state) => (*state).clone(),
            Err(_) => {
                warn!("Auth state channel closed before the session was resolved");
                AuthState::Unauthenticated
            }
        };
        resolved
    }

    /// Sign out and return to the login page.
    pub async fn logout(&self, navigator: &dyn Navigator) -> Result<(), AuthError> {
        debug!("Signing out current user");
        self.provider.sign_out().await?;
        info!("User signed out");
        navigator.navigate(Route::Login);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::MockNavigator;
    use mockall::predicate::eq;

    #[test]
    fn test_friendly_messages() {
        assert_eq!(
            friendly_message("auth/wrong-password"),
            "Incorrect password. Please try again."
        );
        assert_eq!(
            friendly_message("auth/email-already-in-use"),
            "This email is already registered."
        );
        assert_eq!(friendly_message("auth/quota-exceeded"), GENERIC_AUTH_ERROR);
        assert_eq!(friendly_message(""), GENERIC_AUTH_ERROR);
    }

    #[test]
    fn test_network_error_code() {
        let err = AuthError::Network("connection refused".to_string());
        assert_eq!(err.code(), NETWORK_REQUEST_FAILED);
        assert_eq!(
            err.friendly_message(),
            "Network error. Please check your connection."
        );
    }

    #[tokio::test]
    async fn test_first_resolved_state_skips_pending() {
        let (sender, receiver) = watch::channel(AuthState::Pending);
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_subscribe()
            .returning(move || receiver.clone());
        let session = SessionContext::new(Arc::new(provider));

        let waiter = tokio::spawn(async move { session.first_resolved_state().await });
        tokio::task::yield_now().await;
        sender.send_replace(AuthState::Unauthenticated);

        assert_eq!(waiter.await.unwrap(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_closed_channel_counts_as_unauthenticated() {
        let (sender, receiver) = watch::channel(AuthState::Pending);
        drop(sender);
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_subscribe()
            .returning(move || receiver.clone());
        let session = SessionContext::new(Arc::new(provider));

        assert_eq!(session.first_resolved_state().await, AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_logout_signs_out_then_navigates() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_sign_out().times(1).returning(|| Ok(()));
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .with(eq(Route::Login))
            .times(1)
            .return_const(());

        let session = SessionContext::new(Arc::new(provider));
        assert!(session.logout(&navigator).await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_logout_stays_put() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_sign_out()
            .returning(|| Err(AuthError::Network("offline".to_string())));
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().times(0);

        let session = SessionContext::new(Arc::new(provider));
        assert!(session.logout(&navigator).await.is_err());
    }
}
