use axum::extract::FromRef;
use cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{config::SessionConfig, state::AppState};

/// Identity carried inside the session cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,    // user ID
    pub name: String, // display name, used for bookings
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

/// Signing material and cookie settings for sessions.
#[derive(Clone)]
pub struct SessionKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub cookie_name: String,
    pub ttl: Duration,
    pub secure: bool,
}

impl From<&SessionConfig> for SessionKeys {
    fn from(cfg: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            cookie_name: cfg.cookie_name.clone(),
            ttl: Duration::days(cfg.ttl_days),
            secure: cfg.secure,
        }
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from(&state.config.session)
    }
}

impl SessionKeys {
    pub fn sign(&self, user_id: Uuid, name: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + self.ttl;
        let claims = Claims {
            sub: user_id,
            name: name.to_owned(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "session signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }

    /// `Set-Cookie` value that starts a session.
    pub fn session_cookie(&self, token: String) -> String {
        Cookie::build((self.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(CookieDuration::seconds(self.ttl.whole_seconds()))
            .build()
            .to_string()
    }

    /// `Set-Cookie` value that ends a session.
    pub fn cleared_cookie(&self) -> String {
        Cookie::build((self.cookie_name.clone(), ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(CookieDuration::ZERO)
            .build()
            .to_string()
    }

    /// Pulls this app's session token out of a `Cookie` request header.
    pub fn token_from_header(&self, header: &str) -> Option<String> {
        Cookie::split_parse(header)
            .filter_map(Result::ok)
            .find(|c| c.name() == self.cookie_name && !c.value().is_empty())
            .map(|c| c.value().to_owned())
    }
}
