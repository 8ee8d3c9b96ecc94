use axum::{
    extract::{FromRef, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, PublicUser, SignupForm},
        extractors::SessionUser,
        repo::AddUserError,
        services::{add_user, find_user, get_user_by_id},
        session::SessionKeys,
    },
    body::JsonOrForm,
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/api/me", get(get_me))
}

fn start_session(
    state: &AppState,
    user_id: uuid::Uuid,
    name: &str,
) -> Result<impl IntoResponse, AppError> {
    let keys = SessionKeys::from_ref(state);
    let token = keys.sign(user_id, name)?;
    Ok((
        [(SET_COOKIE, keys.session_cookie(token))],
        Redirect::to("/trainers.html"),
    ))
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    JsonOrForm(form): JsonOrForm<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    let name = form.name.trim();
    let password = form.password.trim();

    let user = match find_user(state.users.as_ref(), name, password).await? {
        Some(u) => u,
        None => {
            warn!(%name, "login rejected");
            return Err(AppError::InvalidCredentials);
        }
    };

    info!(user_id = %user.id, name = %user.name, "user logged in");
    start_session(&state, user.id, &user.name)
}

#[instrument(skip(state, form))]
pub async fn signup(
    State(state): State<AppState>,
    JsonOrForm(form): JsonOrForm<SignupForm>,
) -> Result<impl IntoResponse, AppError> {
    let name = form.name.trim();
    let password = form.password.trim();
    let phone = form
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    if name.is_empty() || password.is_empty() {
        warn!("signup missing name or password");
        return Err(AppError::BadForm("Name and password are required."));
    }

    let user_id = match add_user(state.users.as_ref(), name, password, phone).await {
        Ok(id) => id,
        Err(AddUserError::NameTaken) => {
            warn!(%name, "signup name taken");
            return Err(AppError::NameTaken);
        }
        Err(AddUserError::Other(e)) => {
            error!(error = %e, "add_user failed");
            return Err(AppError::Internal(e));
        }
    };

    info!(user_id = %user_id, %name, "user registered");
    start_session(&state, user_id, name)
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let keys = SessionKeys::from_ref(&state);
    (
        [(SET_COOKIE, keys.cleared_cookie())],
        Redirect::to("/login.html"),
    )
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<PublicUser>, AppError> {
    match get_user_by_id(state.users.as_ref(), session.id).await? {
        Some(user) => Ok(Json(user.into())),
        None => {
            warn!(user_id = %session.id, "session refers to missing user");
            Err(AppError::Unauthorized)
        }
    }
}
