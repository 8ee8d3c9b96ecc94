use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Error returned by every handler and extractor in the app.
///
/// Internal causes are logged and replaced by a generic body; nothing from
/// an `anyhow::Error` chain is ever written to the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Anonymous caller on an `/api/` path.
    #[error("unauthorized")]
    Unauthorized,
    /// Anonymous caller on a page; sent back to the login form.
    #[error("login required")]
    LoginRequired,
    #[error("forbidden")]
    Forbidden,
    #[error("invalid name or password")]
    InvalidCredentials,
    #[error("name already taken")]
    NameTaken,
    /// Form input rejected on an HTML route.
    #[error("bad form: {0}")]
    BadForm(&'static str),
    /// JSON API failure with a fixed, client-safe message.
    #[error("{1}")]
    Api(StatusCode, &'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            AppError::LoginRequired => Redirect::to("/login.html").into_response(),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Html("Invalid name or password. <a href='/login.html'>Back</a>"),
            )
                .into_response(),
            AppError::NameTaken => (
                StatusCode::CONFLICT,
                Html("That name is already taken. <a href='/signup.html'>Back</a>"),
            )
                .into_response(),
            AppError::BadForm(msg) => (
                StatusCode::BAD_REQUEST,
                Html(format!("{msg} <a href='javascript:history.back()'>Back</a>")),
            )
                .into_response(),
            AppError::Api(status, msg) => (status, Json(json!({ "error": msg }))).into_response(),
            AppError::Internal(e) => {
                error!(error = ?e, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        }
    }
}
