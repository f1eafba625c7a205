use axum::{
    extract::{Json as ExtractJson, State},
    http::StatusCode,
    response::{Json, Redirect},
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

use crate::auth::SessionContext;
use crate::client::FlightInfoSubmitter;
use crate::handlers::error::ApiError;
use crate::models::common::{
    CredentialsRequest, GoogleLoginRequest, PasswordResetRequest, TimeSelection,
};
use crate::models::form::FormState;
use crate::models::session::Route;
use crate::router::{navigate_after, Navigator};
use crate::services::guard::{GuardDecision, RouteGuard};
use crate::services::login::{LoginPage, REDIRECT_DELAY};
use crate::services::submission::{FlightFormPage, FlightFormView};

// AppState struct containing the page session and its collaborators
pub struct AppState {
    pub session: SessionContext,
    pub submitter: Arc<dyn FlightInfoSubmitter>,
    pub router: Arc<dyn Navigator>,
    pub login_page: tokio::sync::Mutex<LoginPage>,
    // Never held across an await so `loading` stays observable mid-request
    pub flight_form: Mutex<FlightFormPage>,
}

impl AppState {
    pub fn new(
        session: SessionContext,
        submitter: Arc<dyn FlightInfoSubmitter>,
        router: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            session,
            submitter,
            router,
            login_page: tokio::sync::Mutex::new(LoginPage::new()),
            flight_form: Mutex::new(FlightFormPage::new()),
        }
    }

    fn flight_form(&self) -> MutexGuard<'_, FlightFormPage> {
        self.flight_form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn render_flight_form(&self) -> FlightFormView {
        let user = self.session.current_user();
        self.flight_form().view(user.as_ref())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    #[serde(flatten)]
    pub page: LoginPage,
    pub redirect_to: Option<&'static str>,
    pub redirect_after_ms: Option<u64>,
}

// Run the route's guard and record the navigation when it is allowed
async fn enter(state: &AppState, route: Route) -> Result<(), ApiError> {
    match RouteGuard::for_route(route)
        .can_activate(&state.session, state.router.as_ref())
        .await
    {
        GuardDecision::Allow => {
            state.router.navigate(route);
            Ok(())
        }
        GuardDecision::Redirect(target) => Err(ApiError::Redirect(target)),
    }
}

fn login_response(
    state: &AppState,
    page: &LoginPage,
    redirect: Option<Route>,
) -> (StatusCode, Json<LoginView>) {
    if let Some(route) = redirect {
        navigate_after(Arc::clone(&state.router), route, REDIRECT_DELAY);
    }

    let status = if page.error_message.is_some() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };

    (
        status,
        Json(LoginView {
            page: page.clone(),
            redirect_to: redirect.map(|route| route.path()),
            redirect_after_ms: redirect.map(|_| REDIRECT_DELAY.as_millis() as u64),
        }),
    )
}

// The empty path lands on the login page
pub async fn root_redirect() -> Redirect {
    Redirect::to(Route::Login.path())
}

// Login page endpoint
pub async fn get_login(State(state): State<Arc<AppState>>) -> Result<Json<LoginView>, ApiError> {
    enter(&state, Route::Login).await?;
    let page = state.login_page.lock().await;
    Ok(login_response(&state, &page, None).1)
}

// Email/password login endpoint
pub async fn login(
    State(state): State<Arc<AppState>>,
    ExtractJson(credentials): ExtractJson<CredentialsRequest>,
) -> (StatusCode, Json<LoginView>) {
    info!("Received login request");
    let mut page = state.login_page.lock().await;
    page.email = credentials.email;
    page.password = credentials.password;

    let redirect = page.on_login(&state.session).await;
    login_response(&state, &page, redirect)
}

// Registration endpoint
pub async fn register(
    State(state): State<Arc<AppState>>,
    ExtractJson(credentials): ExtractJson<CredentialsRequest>,
) -> (StatusCode, Json<LoginView>) {
    info!("Received registration request");
    let mut page = state.login_page.lock().await;
    page.email = credentials.email;
    page.password = credentials.password;

    page.on_register(&state.session).await;
    login_response(&state, &page, None)
}

// Password reset endpoint
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<PasswordResetRequest>,
) -> (StatusCode, Json<LoginView>) {
    info!("Received password reset request");
    let mut page = state.login_page.lock().await;
    page.email = request.email;

    page.on_forgot_password(&state.session).await;
    login_response(&state, &page, None)
}

// Google sign-in endpoint
pub async fn google_login(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<GoogleLoginRequest>,
) -> (StatusCode, Json<LoginView>) {
    info!("Received Google login request");
    let mut page = state.login_page.lock().await;

    let redirect = page.on_google_login(&state.session, &request.id_token).await;
    login_response(&state, &page, redirect)
}

pub async fn toggle_password(State(state): State<Arc<AppState>>) -> Json<LoginView> {
    let mut page = state.login_page.lock().await;
    page.toggle_password();
    login_response(&state, &page, None).1
}

pub async fn toggle_register_mode(State(state): State<Arc<AppState>>) -> Json<LoginView> {
    let mut page = state.login_page.lock().await;
    page.toggle_register_mode();
    login_response(&state, &page, None).1
}

pub async fn toggle_forgot_password_mode(State(state): State<Arc<AppState>>) -> Json<LoginView> {
    let mut page = state.login_page.lock().await;
    page.toggle_forgot_password_mode();
    login_response(&state, &page, None).1
}

// Flight form page endpoint
pub async fn get_flight_form(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FlightFormView>, ApiError> {
    enter(&state, Route::FlightForm).await?;
    Ok(Json(state.render_flight_form()))
}

// Replace the form's field values with the user's input
pub async fn update_flight_form(
    State(state): State<Arc<AppState>>,
    ExtractJson(input): ExtractJson<FormState>,
) -> Result<Json<FlightFormView>, ApiError> {
    enter(&state, Route::FlightForm).await?;
    state.flight_form().update_form(input);
    Ok(Json(state.render_flight_form()))
}

// Form submission endpoint
pub async fn submit_flight_form(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FlightFormView>, ApiError> {
    enter(&state, Route::FlightForm).await?;

    let payload = {
        let mut page = state.flight_form();
        if page.loading {
            warn!("Submit requested while a submission is in flight");
            return Err(ApiError::SubmissionInFlight);
        }
        page.begin_submission()?
    };

    let result = state.submitter.submit_flight_info(&payload).await;
    state.flight_form().finish_submission(result)?;

    Ok(Json(state.render_flight_form()))
}

pub async fn increase_guests(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FlightFormView>, ApiError> {
    enter(&state, Route::FlightForm).await?;
    state.flight_form().increase_guests();
    Ok(Json(state.render_flight_form()))
}

pub async fn decrease_guests(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FlightFormView>, ApiError> {
    enter(&state, Route::FlightForm).await?;
    state.flight_form().decrease_guests();
    Ok(Json(state.render_flight_form()))
}

// Time picker selection endpoint
pub async fn select_time(
    State(state): State<Arc<AppState>>,
    ExtractJson(selection): ExtractJson<TimeSelection>,
) -> Result<Json<FlightFormView>, ApiError> {
    enter(&state, Route::FlightForm).await?;
    state.flight_form().on_time_selected(&selection.time);
    Ok(Json(state.render_flight_form()))
}

pub async fn toggle_dropdown(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FlightFormView>, ApiError> {
    enter(&state, Route::FlightForm).await?;
    state.flight_form().toggle_dropdown();
    Ok(Json(state.render_flight_form()))
}

// Sign out and return to the login page
pub async fn logout(State(state): State<Arc<AppState>>) -> Result<Redirect, ApiError> {
    enter(&state, Route::FlightForm).await?;
    state.session.logout(state.router.as_ref()).await?;
    Ok(Redirect::to(Route::Login.path()))
}
