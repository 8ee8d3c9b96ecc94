mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod slot;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::book_routes())
        .merge(handlers::api_routes())
}
