use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::api::{
    decrease_guests, forgot_password, get_flight_form, get_login, google_login, increase_guests,
    login, logout, register, root_redirect, select_time, submit_flight_form, toggle_dropdown,
    toggle_forgot_password_mode, toggle_password, toggle_register_mode, update_flight_form,
    AppState,
};
use crate::handlers::health::health_check;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Login page and identity provider actions
    let login_routes = Router::new()
        .route("/login", get(get_login).post(login))
        .route("/login/google", post(google_login))
        .route("/login/toggle/password", post(toggle_password))
        .route("/login/toggle/register", post(toggle_register_mode))
        .route("/login/toggle/forgot-password", post(toggle_forgot_password_mode))
        .route("/register", post(register))
        .route("/forgot-password", post(forgot_password));

    // Flight form page, every route behind the protected guard
    let flight_form_routes = Router::new()
        .route("/flight-form", get(get_flight_form).put(update_flight_form))
        .route("/flight-form/submit", post(submit_flight_form))
        .route("/flight-form/guests/increase", post(increase_guests))
        .route("/flight-form/guests/decrease", post(decrease_guests))
        .route("/flight-form/time", post(select_time))
        .route("/flight-form/dropdown", post(toggle_dropdown))
        .route("/logout", post(logout));

    info!("Login and flight form routes registered");

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root_redirect))
        .merge(login_routes)
        .merge(flight_form_routes)
        .with_state(app_state)
}
