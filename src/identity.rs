//! Identity provider backed by the Firebase Identity Toolkit REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::auth::{AuthError, IdentityProvider};
use crate::config::Config;
use crate::models::session::{AuthState, AuthUser};

// Returned by signInWithPassword, signUp and signInWithIdp
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    #[serde(default)]
    refresh_token: String,
}

impl From<SignInResponse> for AuthUser {
    fn from(res: SignInResponse) -> Self {
        AuthUser {
            uid: res.local_id,
            email: res.email.filter(|e| !e.is_empty()),
            display_name: res.display_name.filter(|n| !n.is_empty()),
            id_token: res.id_token,
            refresh_token: res.refresh_token,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Map a Firebase REST error message onto the `auth/...` code space.
///
/// Messages can carry a detail suffix (`WEAK_PASSWORD : Password should be ...`);
/// only the leading constant is significant.
pub fn error_code_from_message(message: &str) -> String {
    let constant = message.split(" : ").next().unwrap_or("").trim();
    let code = match constant {
        "EMAIL_NOT_FOUND" => "auth/user-not-found",
        "INVALID_PASSWORD" => "auth/wrong-password",
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_IDP_RESPONSE" => "auth/invalid-credential",
        "USER_DISABLED" => "auth/user-disabled",
        "INVALID_EMAIL" | "MISSING_EMAIL" => "auth/invalid-email",
        "EMAIL_EXISTS" => "auth/email-already-in-use",
        "WEAK_PASSWORD" => "auth/weak-password",
        other => return format!("auth/{}", other.to_ascii_lowercase().replace('_', "-")),
    };
    code.to_string()
}

/// Firebase Authentication client.
///
/// Sessions live in memory only, so the provider resolves to
/// `Unauthenticated` as soon as it is created.
pub struct FirebaseIdentityProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    state: watch::Sender<AuthState>,
}

impl FirebaseIdentityProvider {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        let (state, _) = watch::channel(AuthState::Unauthenticated);
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            state,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        info!(
            "Using identity provider endpoint {}",
            config.firebase_auth_endpoint
        );
        Self::new(
            config.firebase_auth_endpoint.clone(),
            config.firebase_api_key.clone(),
        )
    }

    fn url(&self, method: &str) -> String {
        format!(
            "{}/accounts:{}?key={}",
            self.endpoint.trim_end_matches('/'),
            method,
            self.api_key
        )
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, AuthError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        debug!("Calling identity provider method accounts:{}", method);

        let res = self
            .client
            .post(self.url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Identity provider request failed: {}", e);
                AuthError::Network(e.to_string())
            })?;

        let status = res.status();
        if !status.is_success() {
            let code = match res.json::<ErrorEnvelope>().await {
                Ok(envelope) => error_code_from_message(&envelope.error.message),
                Err(_) => "auth/internal-error".to_string(),
            };
            warn!(
                "Identity provider rejected accounts:{} with status {}: {}",
                method, status, code
            );
            return Err(AuthError::Provider { code });
        }

        res.json::<R>().await.map_err(|e| {
            error!("Unexpected identity provider response: {}", e);
            AuthError::provider("auth/internal-error")
        })
    }

    fn publish(&self, state: AuthState) {
        self.state.send_replace(state);
    }

    fn establish(&self, res: SignInResponse) -> AuthUser {
        let user = AuthUser::from(res);
        info!("Signed in user {}", user.uid);
        self.publish(AuthState::Authenticated(user.clone()));
        user
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.state.borrow().user().cloned()
    }

    async fn sign_in_with_email(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let body = PasswordCredentials {
            email,
            password,
            return_secure_token: true,
        };
        let res: SignInResponse = self.call("signInWithPassword", &body).await?;
        Ok(self.establish(res))
    }

    async fn register_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AuthError> {
        let body = PasswordCredentials {
            email,
            password,
            return_secure_token: true,
        };
        let res: SignInResponse = self.call("signUp", &body).await?;
        Ok(self.establish(res))
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let body = json!({
            "requestType": "PASSWORD_RESET",
            "email": email,
        });
        let _: Value = self.call("sendOobCode", &body).await?;
        info!("Password reset email requested");
        Ok(())
    }

    async fn sign_in_with_google(&self, id_token: &str) -> Result<AuthUser, AuthError> {
        // No token means the popup never completed
        if id_token.trim().is_empty() {
            return Err(AuthError::provider("auth/popup-closed-by-user"));
        }

        let body = json!({
            "postBody": format!("id_token={}&providerId=google.com", id_token),
            "requestUri": "http://localhost",
            "returnIdpCredential": true,
            "returnSecureToken": true,
        });
        let res: SignInResponse = self.call("signInWithIdp", &body).await?;
        Ok(self.establish(res))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.publish(AuthState::Unauthenticated);
        Ok(())
    }
}
