use std::path::PathBuf;

use anyhow::Context;
use time::{macros::format_description, UtcOffset};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub cookie_name: String,
    pub ttl_days: i64,
    pub secure: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub public_dir: PathBuf,
    pub dashboard_url: Option<String>,
    /// Offset used to interpret the wall-clock date/time a user books.
    pub booking_offset: UtcOffset,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET").context("SESSION_SECRET is not set")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "trainerbook".into()),
            audience: std::env::var("SESSION_AUDIENCE")
                .unwrap_or_else(|_| "trainerbook-web".into()),
            cookie_name: std::env::var("SESSION_COOKIE").unwrap_or_else(|_| "sess".into()),
            ttl_days: std::env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
            secure: std::env::var("SESSION_COOKIE_SECURE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        };
        let public_dir = std::env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));
        let dashboard_url = std::env::var("DASHBOARD_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let booking_offset = match std::env::var("BOOKING_UTC_OFFSET") {
            Ok(raw) => parse_offset(&raw)?,
            Err(_) => UtcOffset::UTC,
        };

        Ok(Self {
            database_url,
            session,
            public_dir,
            dashboard_url,
            booking_offset,
        })
    }
}

/// Parses offsets written as `+07:00` / `-03:30`.
pub fn parse_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    UtcOffset::parse(
        raw.trim(),
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .with_context(|| format!("invalid BOOKING_UTC_OFFSET {raw:?}"))
}
