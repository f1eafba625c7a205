use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::watch;

use crate::auth::{AuthError, IdentityProvider};
use crate::client::{ClientError, MockFlightInfoSubmitter};
use crate::models::form::FlightInfoPayload;
use crate::models::session::{AuthState, AuthUser};

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_CANDIDATE: &str = "Test Candidate";

pub fn test_user(email: &str) -> AuthUser {
    AuthUser {
        uid: format!("uid-{}", email),
        email: Some(email.to_string()),
        display_name: None,
        id_token: "id-token".to_string(),
        refresh_token: "refresh-token".to_string(),
    }
}

// In-memory identity provider with a small account table
pub struct FakeIdentityProvider {
    state: watch::Sender<AuthState>,
    accounts: Mutex<HashMap<String, String>>, // email -> password
    reset_requests: Mutex<Vec<String>>,
}

impl FakeIdentityProvider {
    pub fn new() -> Self {
        Self::with_state(AuthState::Unauthenticated)
    }

    pub fn with_state(state: AuthState) -> Self {
        let (state, _) = watch::channel(state);
        Self {
            state,
            accounts: Mutex::new(HashMap::new()),
            reset_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
        self
    }

    pub fn set_state(&self, state: AuthState) {
        self.state.send_replace(state);
    }

    pub fn reset_requests(&self) -> Vec<String> {
        self.reset_requests.lock().unwrap().clone()
    }

    fn establish(&self, email: &str) -> AuthUser {
        let user = test_user(email);
        self.set_state(AuthState::Authenticated(user.clone()));
        user
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.state.borrow().user().cloned()
    }

    async fn sign_in_with_email(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let known = self.accounts.lock().unwrap().get(email).cloned();
        match known {
            None => Err(AuthError::provider("auth/user-not-found")),
            Some(expected) if expected != password => {
                Err(AuthError::provider("auth/wrong-password"))
            }
            Some(_) => Ok(self.establish(email)),
        }
    }

    async fn register_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AuthError> {
        if !email.contains('@') {
            return Err(AuthError::provider("auth/invalid-email"));
        }
        if password.len() < 6 {
            return Err(AuthError::provider("auth/weak-password"));
        }
        {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(AuthError::provider("auth/email-already-in-use"));
            }
            accounts.insert(email.to_string(), password.to_string());
        }
        Ok(self.establish(email))
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        if !email.contains('@') {
            return Err(AuthError::provider("auth/invalid-email"));
        }
        self.reset_requests.lock().unwrap().push(email.to_string());
        Ok(())
    }

    async fn sign_in_with_google(&self, id_token: &str) -> Result<AuthUser, AuthError> {
        if id_token.is_empty() {
            return Err(AuthError::provider("auth/popup-closed-by-user"));
        }
        Ok(self.establish("google-user@example.com"))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.set_state(AuthState::Unauthenticated);
        Ok(())
    }
}

// Submitter expecting exactly one successful call
pub fn accepting_submitter() -> MockFlightInfoSubmitter {
    let mut submitter = MockFlightInfoSubmitter::new();
    submitter
        .expect_submit_flight_info()
        .times(1)
        .returning(|_: &FlightInfoPayload| Ok(()));
    submitter
}

// Submitter expecting exactly one call that the remote side rejects
pub fn rejecting_submitter(message: &'static str) -> MockFlightInfoSubmitter {
    let mut submitter = MockFlightInfoSubmitter::new();
    submitter
        .expect_submit_flight_info()
        .times(1)
        .returning(move |_| {
            Err(ClientError::Rejected {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                message: message.to_string(),
            })
        });
    submitter
}

// Submitter that must never be called
pub fn unused_submitter() -> MockFlightInfoSubmitter {
    let mut submitter = MockFlightInfoSubmitter::new();
    submitter.expect_submit_flight_info().times(0);
    submitter
}
