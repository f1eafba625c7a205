use serde::{Deserialize, Serialize};

// Email/password body for login and registration
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    #[serde(default)]
    pub email: String,
}

// Token obtained by the browser from the Google sign-in popup
#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    #[serde(default)]
    pub id_token: String,
}

// Value picked in the time picker
#[derive(Debug, Deserialize)]
pub struct TimeSelection {
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
