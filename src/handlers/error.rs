use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::models::common::MessageResponse;
use crate::models::session::Route;
use crate::services::submission::SubmitError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("redirecting to {0}")]
    Redirect(Route),

    #[error("A submission is already in progress.")]
    SubmissionInFlight,

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Redirect(route) => Redirect::to(route.path()).into_response(),
            ApiError::SubmissionInFlight => (
                StatusCode::CONFLICT,
                Json(MessageResponse {
                    message: ApiError::SubmissionInFlight.to_string(),
                }),
            )
                .into_response(),
            ApiError::Submit(SubmitError::Validation(errors)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "message": errors.to_string(),
                    "fieldErrors": errors.messages(),
                })),
            )
                .into_response(),
            ApiError::Submit(err @ SubmitError::InvalidDateTime) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(MessageResponse {
                    message: err.to_string(),
                }),
            )
                .into_response(),
            ApiError::Submit(SubmitError::Remote(message)) => {
                (StatusCode::BAD_GATEWAY, Json(MessageResponse { message })).into_response()
            }
            ApiError::Auth(err) => (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "code": err.code(),
                    "message": err.friendly_message(),
                })),
            )
                .into_response(),
        }
    }
}
