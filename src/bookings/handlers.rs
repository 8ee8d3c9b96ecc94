use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{delete, get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{debug, error, info, instrument, warn};

use super::{
    dto::{BookForm, BookQuery, MessageResponse},
    repo_types::{Booking, NewBooking},
    slot::booked_time,
};
use crate::{
    auth::extractors::SessionUser, body::JsonOrForm, error::AppError, state::AppState,
};

pub fn book_routes() -> Router<AppState> {
    Router::new().route("/book", post(create_booking))
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", get(list_bookings))
        .route("/api/bookings/me", get(list_my_bookings))
        .route("/api/bookings/:id", delete(cancel_booking))
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

#[instrument(skip(state, form, query), fields(user_id = %user.id))]
pub async fn create_booking(
    State(state): State<AppState>,
    user: SessionUser,
    Query(query): Query<BookQuery>,
    JsonOrForm(form): JsonOrForm<BookForm>,
) -> Result<Redirect, AppError> {
    let trainer_id = form.trainer_id.trim();
    let class_id = form.class_id.trim();
    let trainer_name = form.trainer.trim();
    let class_name = form.class_name.trim();
    let price = form.price.trim().parse::<i32>().unwrap_or(0);

    let date = non_empty(form.date).or(non_empty(query.date)).unwrap_or_default();
    let time_slot = non_empty(form.time_slot)
        .or(non_empty(query.time_slot))
        .unwrap_or_default();

    let now = OffsetDateTime::now_utc();
    let booked = booked_time(&date, &time_slot, state.config.booking_offset, now);

    let trainer = if trainer_id.is_empty() { trainer_name } else { trainer_id };
    let class = if class_id.is_empty() { class_name } else { class_id };

    let record = NewBooking {
        user_id: Some(user.id),
        name: user.name.clone(),
        trainer: trainer.to_owned(),
        class: class.to_owned(),
        price,
        created_at: Some(now),
        booked_time: Some(booked),
    };
    let id = state.bookings.add_booking(record).await?;
    info!(booking_id = id, %trainer_id, %class_id, price, "booking created");

    let target = format!(
        "/success.html?id={}&name={}&trainer={}&class={}&price={}",
        id,
        urlencoding::encode(&user.name),
        urlencoding::encode(trainer_name),
        urlencoding::encode(class_name),
        price,
    );
    Ok(Redirect::to(&target))
}

#[instrument(skip(state, _user))]
pub async fn list_bookings(
    State(state): State<AppState>,
    _user: SessionUser,
) -> Result<Json<Vec<Booking>>, AppError> {
    let rows = state.bookings.list_bookings().await?;
    Ok(Json(rows))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn list_my_bookings(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<Vec<Booking>>, AppError> {
    let rows = state.bookings.list_user_bookings(user.id).await?;
    Ok(Json(rows))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn cancel_booking(
    State(state): State<AppState>,
    user: SessionUser,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let Ok(id) = raw_id.trim().parse::<i32>() else {
        warn!(%raw_id, "cancel without a usable booking id");
        return Err(AppError::Api(StatusCode::BAD_REQUEST, "Booking ID is required"));
    };

    match state.bookings.delete_booking(id, user.id).await {
        Ok(0) => debug!(booking_id = id, "nothing deleted; not owned or missing"),
        Ok(_) => info!(booking_id = id, "booking cancelled"),
        Err(e) => {
            error!(error = ?e, booking_id = id, "delete_booking failed");
            return Err(AppError::Api(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to cancel booking",
            ));
        }
    }

    Ok(Json(MessageResponse {
        message: "Booking cancelled",
    }))
}
