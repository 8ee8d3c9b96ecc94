use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Booking, NewBooking};

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Inserts a booking and returns its id.
    async fn add_booking(&self, booking: NewBooking) -> anyhow::Result<i32>;
    /// All bookings, newest first.
    async fn list_bookings(&self) -> anyhow::Result<Vec<Booking>>;
    /// Bookings owned by `user_id`, newest first.
    async fn list_user_bookings(&self, user_id: Uuid) -> anyhow::Result<Vec<Booking>>;
    /// Deletes the booking only if `user_id` owns it. Returns rows removed.
    async fn delete_booking(&self, id: i32, user_id: Uuid) -> anyhow::Result<u64>;
}

#[derive(Clone)]
pub struct PgBookingStore {
    db: PgPool,
}

impl PgBookingStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn add_booking(&self, b: NewBooking) -> anyhow::Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO bookings (user_id, name, trainer, "class", price, created_at, booked_time)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()), COALESCE($7, NOW()))
            RETURNING id
            "#,
        )
        .bind(b.user_id)
        .bind(&b.name)
        .bind(&b.trainer)
        .bind(&b.class)
        .bind(b.price)
        .bind(b.created_at)
        .bind(b.booked_time)
        .fetch_one(&self.db)
        .await
        .context("insert booking")?;
        Ok(id)
    }

    async fn list_bookings(&self) -> anyhow::Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, user_id, name, trainer, "class", price, created_at, booked_time
            FROM bookings
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list bookings")?;
        Ok(rows)
    }

    async fn list_user_bookings(&self, user_id: Uuid) -> anyhow::Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, user_id, name, trainer, "class", price, created_at, booked_time
            FROM bookings
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list user bookings")?;
        Ok(rows)
    }

    async fn delete_booking(&self, id: i32, user_id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query(r#"DELETE FROM bookings WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete booking")?;
        Ok(res.rows_affected())
    }
}
