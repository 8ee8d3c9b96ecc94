use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::COOKIE, request::Parts},
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{repo_types::User, services, session::SessionKeys};
use crate::{error::AppError, state::AppState};

/// The logged-in user, decoded from the session cookie.
///
/// Anonymous requests are rejected with 401 on `/api/` paths and with a
/// redirect to the login page everywhere else.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        let token = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|h| keys.token_from_header(h));

        let Some(token) = token else {
            debug!(path = parts.uri.path(), "no session cookie");
            return Err(anonymous(parts));
        };

        match keys.verify(&token) {
            Ok(claims) => Ok(SessionUser {
                id: claims.sub,
                name: claims.name,
            }),
            Err(e) => {
                warn!(error = %e, "invalid or expired session");
                Err(anonymous(parts))
            }
        }
    }
}

fn anonymous(parts: &Parts) -> AppError {
    if parts.uri.path().starts_with("/api/") {
        AppError::Unauthorized
    } else {
        AppError::LoginRequired
    }
}

/// A session user whose stored role is admin. Other users get 403.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = SessionUser::from_request_parts(parts, state).await?;
        let user = services::get_user_by_id(state.users.as_ref(), session.id).await?;
        match user {
            Some(user) if user.is_admin() => Ok(AdminUser(user)),
            _ => {
                warn!(user_id = %session.id, "admin access denied");
                Err(AppError::Forbidden)
            }
        }
    }
}
