use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest, UserSummary, UserView},
        services::{authenticate, create_user, find_by_id, validate_registration},
        session::SessionContext,
    },
    error::{AppError, AppResult, AuthError},
    extractors::JsonBody,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", delete(logout))
        .route("/check_session", get(check_session))
}

#[instrument(skip(state, session, payload))]
pub async fn signup(
    State(state): State<AppState>,
    session: SessionContext,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> AppResult<(StatusCode, CookieJar, Json<UserView>)> {
    let reg = validate_registration(
        payload.username,
        payload.password,
        payload.image_url,
        payload.bio,
    )
    .map_err(|e| {
        warn!(error = %e, "signup rejected");
        AppError::from(e)
    })?;

    let user = create_user(state.users.as_ref(), reg).await?;
    let jar = session.establish(user.id).await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, jar, Json(user.into())))
}

#[instrument(skip(state, session, payload))]
pub async fn login(
    State(state): State<AppState>,
    session: SessionContext,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<(CookieJar, Json<UserView>)> {
    let user = authenticate(
        state.users.as_ref(),
        payload.username.as_deref(),
        payload.password.as_deref(),
    )
    .await?;
    let jar = session.establish(user.id).await?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok((jar, Json(user.into())))
}

/// 401 when no user is bound, so a repeated logout is rejected.
#[instrument(skip(session))]
pub async fn logout(session: SessionContext) -> AppResult<(StatusCode, CookieJar)> {
    if session.current_user_id().is_none() {
        return Err(AuthError::NoSession.into());
    }
    let jar = session.clear().await?;
    Ok((StatusCode::NO_CONTENT, jar))
}

#[instrument(skip(state, session))]
pub async fn check_session(
    State(state): State<AppState>,
    session: SessionContext,
) -> AppResult<Json<UserSummary>> {
    let user_id = session.require_user()?;
    match find_by_id(state.users.as_ref(), user_id).await? {
        Some(user) => Ok(Json(user.into())),
        None => {
            warn!(%user_id, "session bound to a missing user");
            Err(AuthError::NoSession.into())
        }
    }
}
