use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::repo::Trainer;
use crate::{error::AppError, state::AppState};

pub fn trainer_routes() -> Router<AppState> {
    Router::new().route("/api/trainers", get(list_trainers))
}

#[instrument(skip(state))]
pub async fn list_trainers(State(state): State<AppState>) -> Result<Json<Vec<Trainer>>, AppError> {
    let trainers = state.catalog.list_trainers().await?;
    Ok(Json(trainers))
}
