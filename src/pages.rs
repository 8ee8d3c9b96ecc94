use anyhow::Context;
use axum::{extract::State, response::Html, routing::get, Router};

use crate::{auth::extractors::SessionUser, error::AppError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(login_page))
        .route("/trainers.html", get(trainers_page))
        .route("/booking.html", get(booking_page))
        .route("/me.html", get(me_page))
}

async fn page(state: &AppState, file: &str) -> Result<Html<String>, AppError> {
    let path = state.config.public_dir.join(file);
    let body = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("read page {}", path.display()))?;
    Ok(Html(body))
}

async fn login_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    page(&state, "login.html").await
}

async fn trainers_page(
    State(state): State<AppState>,
    _user: SessionUser,
) -> Result<Html<String>, AppError> {
    page(&state, "trainers.html").await
}

async fn booking_page(
    State(state): State<AppState>,
    _user: SessionUser,
) -> Result<Html<String>, AppError> {
    page(&state, "booking.html").await
}

async fn me_page(
    State(state): State<AppState>,
    _user: SessionUser,
) -> Result<Html<String>, AppError> {
    page(&state, "me.html").await
}
