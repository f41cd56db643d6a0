use anyhow::anyhow;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use uuid::Uuid;

use gallery_types::api::{LoginRequest, RegisterRequest, Session};

use crate::AppState;
use crate::error::ApiError;
use crate::session::SESSION_COOKIE;

fn active_session(state: &AppState, jar: &CookieJar) -> Option<Session> {
    let token = jar.get(SESSION_COOKIE)?.value().to_string();
    state.sessions.get(&token)
}

fn session_cookie(session: &Session) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session.token.clone()))
        .path("/")
        .http_only(true)
        .build()
}

/// Create an account and bind a session. Empty fields and a taken username
/// both surface as 401 "invalid credentials"; the store's UNIQUE constraint
/// is the source of truth for duplicates.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    if active_session(&state, &jar).is_some() {
        return Ok((
            StatusCode::OK,
            "Cannot create an account when you're already logged in!",
        )
            .into_response());
    }

    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::unauthorized("Invalid credentials."));
    }

    let id = Uuid::new_v4().to_string();
    if state
        .db
        .create_account(&id, &req.username, &req.password)
        .is_err()
    {
        // Almost always the username UNIQUE constraint.
        return Err(ApiError::unauthorized("Invalid credentials."));
    }

    let session = state
        .sessions
        .bind(id.clone(), req.username.clone(), false);

    Ok((
        jar.add(session_cookie(&session)),
        (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": id, "username": req.username })),
        ),
    )
        .into_response())
}

/// Exact-match credential lookup; on success the session caches id,
/// username and role flag until the next login.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    if active_session(&state, &jar).is_some() {
        return Ok((StatusCode::OK, "Already logged in.").into_response());
    }

    let account = state
        .db
        .find_login(&req.username, &req.password)?
        .ok_or_else(|| ApiError::validation("No user matches the sign-in credentials"))?;

    let session = state
        .sessions
        .bind(account.id, account.username, account.is_artist);

    Ok((
        jar.add(session_cookie(&session)),
        (StatusCode::OK, "Successful login!"),
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        return (StatusCode::OK, "Cannot logout while not logged in.").into_response();
    };

    if state.sessions.remove(&token).is_none() {
        return (StatusCode::OK, "Cannot logout while not logged in.").into_response();
    }

    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/").build()),
        Redirect::to("/"),
    )
        .into_response()
}

/// The caller's own account record. The session-bound id not resolving is
/// an internal inconsistency, not a 404.
pub async fn profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .db
        .get_account_by_id(&session.account_id)?
        .ok_or_else(|| anyhow!("unknown account id {}", session.account_id))?;

    Ok(Json(account.into_api()))
}
