use anyhow::anyhow;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Extension, Json};

use gallery_types::api::{Session, SetArtistRequest};

use crate::AppState;
use crate::error::ApiError;

/// Every notification whose receiver list contains the caller.
pub async fn notifications(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.get_notifications_for(&session.account_id)?;
    Ok(Json(
        rows.into_iter().map(|n| n.into_api()).collect::<Vec<_>>(),
    ))
}

/// Resolve the caller's following id list into full account records.
pub async fn following(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = state
        .db
        .get_account_by_id(&session.account_id)?
        .ok_or_else(|| anyhow!("unknown account id {}", session.account_id))?;

    let accounts = state.db.get_accounts_by_ids(&caller.following)?;
    Ok(Json(
        accounts
            .into_iter()
            .map(|a| a.into_api())
            .collect::<Vec<_>>(),
    ))
}

/// Overwrite the role flag, no questions asked — an artist with published
/// artwork can demote themselves. The cached session flag is updated so the
/// role gates see the change immediately.
pub async fn set_artist(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<SetArtistRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.set_is_artist(&session.account_id, req.is_artist)?;
    state.sessions.set_is_artist(&session.token, req.is_artist);

    Ok("Successfully updated the artist property of the account!")
}
