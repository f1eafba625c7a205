use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

use crate::auth::SessionContext;
use crate::models::session::Route;

/// Pause between a successful sign-in and moving to the flight form.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

pub const LOGIN_SUCCESS: &str = "Login successful! Redirecting...";
pub const REGISTER_SUCCESS: &str = "Registration successful! Please log in.";
pub const RESET_EMAIL_SENT: &str = "If this email is registered, a password reset link has been sent.";
pub const GOOGLE_LOGIN_SUCCESS: &str = "Google login successful! Redirecting...";
pub const EMAIL_REQUIRED: &str = "Please enter your email first.";

/// State of the login screen.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPage {
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub show_password: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
    pub is_register_mode: bool,
    pub is_forgot_password_mode: bool,
}

impl LoginPage {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_messages(&mut self) {
        self.error_message = None;
        self.success_message = None;
    }

    /// Sign in with email and password.
    ///
    /// Returns the route to move to after [`REDIRECT_DELAY`] on success.
    pub async fn on_login(&mut self, session: &SessionContext) -> Option<Route> {
        self.clear_messages();
        match session
            .provider()
            .sign_in_with_email(&self.email, &self.password)
            .await
        {
            Ok(user) => {
                info!("Login success for user {}", user.uid);
                self.success_message = Some(LOGIN_SUCCESS.to_string());
                Some(Route::FlightForm)
            }
            Err(err) => {
                error!("Login failed: {}", err);
                self.error_message = Some(err.friendly_message().to_string());
                None
            }
        }
    }

    pub async fn on_register(&mut self, session: &SessionContext) {
        self.clear_messages();
        match session
            .provider()
            .register_with_email(&self.email, &self.password)
            .await
        {
            Ok(user) => {
                info!("Registration success for user {}", user.uid);
                self.success_message = Some(REGISTER_SUCCESS.to_string());
                self.is_register_mode = false;
            }
            Err(err) => {
                error!("Registration failed: {}", err);
                self.error_message = Some(err.friendly_message().to_string());
            }
        }
    }

    pub async fn on_forgot_password(&mut self, session: &SessionContext) {
        if self.email.is_empty() {
            self.error_message = Some(EMAIL_REQUIRED.to_string());
            return;
        }

        match session.provider().send_password_reset(&self.email).await {
            Ok(()) => {
                self.success_message = Some(RESET_EMAIL_SENT.to_string());
                self.error_message = None;
                self.is_forgot_password_mode = false;
            }
            Err(err) => {
                error!("Forgot password error: {}", err);
                self.error_message = Some(err.friendly_message().to_string());
            }
        }
    }

    /// Complete a Google sign-in with the ID token from the popup.
    pub async fn on_google_login(&mut self, session: &SessionContext, id_token: &str) -> Option<Route> {
        self.clear_messages();
        match session.provider().sign_in_with_google(id_token).await {
            Ok(user) => {
                info!("Google login success for user {}", user.uid);
                self.success_message = Some(GOOGLE_LOGIN_SUCCESS.to_string());
                Some(Route::FlightForm)
            }
            Err(err) => {
                error!("Google login failed: {}", err);
                self.error_message = Some(err.friendly_message().to_string());
                None
            }
        }
    }

    pub fn toggle_password(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn toggle_register_mode(&mut self) {
        self.is_register_mode = !self.is_register_mode;
        self.is_forgot_password_mode = false;
        self.clear_messages();
    }

    pub fn toggle_forgot_password_mode(&mut self) {
        self.is_forgot_password_mode = !self.is_forgot_password_mode;
        self.is_register_mode = false;
        self.clear_messages();
    }
}
