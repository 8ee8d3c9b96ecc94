use anyhow::Context;
use axum::{extract::State, response::Html, routing::get, Router};
use tracing::{instrument, warn};

use super::render::bookings_report;
use crate::{auth::extractors::AdminUser, error::AppError, state::AppState};

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin", get(admin_report))
}

#[instrument(skip(state, admin), fields(user_id = %admin.0.id))]
pub async fn admin_report(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Html<String>, AppError> {
    let link = match state.catalog.dashboard_link().await {
        Ok(Some(link)) => Some(link),
        Ok(None) => state.config.dashboard_url.clone(),
        Err(e) => {
            warn!(error = %e, "dashboard link lookup failed");
            state.config.dashboard_url.clone()
        }
    };
    let bookings = state.bookings.list_bookings().await?;
    let page = bookings_report(&bookings, link.as_deref()).context("render admin bookings")?;
    Ok(Html(page))
}
