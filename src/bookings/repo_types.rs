use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Booking row. Serialized with the camelCase keys the pages read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i32,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub trainer: String,
    pub class: String,
    pub price: i32, // smallest currency unit
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub booked_time: OffsetDateTime,
}

/// Insert payload. Missing timestamps default to the time of insertion.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Option<Uuid>,
    pub name: String,
    pub trainer: String,
    pub class: String,
    pub price: i32,
    pub created_at: Option<OffsetDateTime>,
    pub booked_time: Option<OffsetDateTime>,
}
