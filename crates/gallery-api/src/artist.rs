use anyhow::anyhow;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use uuid::Uuid;

use gallery_db::models::AccountList;
use gallery_types::api::{ArtistProfile, CreateWorkshopRequest, EnrollRequest, FollowRequest, Session};

use crate::AppState;
use crate::error::ApiError;

pub async fn profile(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let artist = state
        .db
        .get_account_by_id(&artist_id)?
        .ok_or_else(|| ApiError::not_found("No artist matches the requested id."))?;

    let artwork = state.db.get_artworks_by_artist(&artist.username)?;
    let workshops = state.db.get_workshops_by_host(&artist.username)?;

    let user = state
        .db
        .get_account_by_id(&session.account_id)?
        .ok_or_else(|| anyhow!("unknown account id {}", session.account_id))?;

    Ok(Json(ArtistProfile {
        artist: artist.into_api(),
        artwork: artwork.into_iter().map(|a| a.into_api()).collect(),
        workshop: workshops.into_iter().map(|w| w.into_api()).collect(),
        user: user.into_api(),
    }))
}

/// Follow an artist: a confirmation notification to the caller, then the
/// artist id appended to the caller's following list. No existence check —
/// following twice duplicates the entry.
pub async fn follow(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<FollowRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let artist = state
        .db
        .get_account_by_id(&req.artist.id)?
        .ok_or_else(|| ApiError::not_found("No artist matches the requested id."))?;

    let notification_id = Uuid::new_v4().to_string();
    state.db.insert_notification(
        &notification_id,
        &[session.account_id.clone()],
        &req.artist.username,
        &format!("You are now following {}.", artist.username),
    )?;
    state.db.push_list(
        &session.username,
        AccountList::Notifications,
        &notification_id,
    )?;

    state
        .db
        .push_list(&session.username, AccountList::Following, &artist.id)?;

    Ok((
        StatusCode::CREATED,
        format!("Follow request for {} is successful!", artist.username),
    ))
}

/// Unfollow removes every matching entry, so it is safe against the
/// duplicates follow can create.
pub async fn unfollow(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<FollowRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let artist = state
        .db
        .get_account_by_id(&req.artist.id)?
        .ok_or_else(|| ApiError::not_found("No artist matches the requested id."))?;

    let notification_id = Uuid::new_v4().to_string();
    state.db.insert_notification(
        &notification_id,
        &[session.account_id.clone()],
        &req.artist.username,
        &format!("You are no longer following {}.", artist.username),
    )?;
    state.db.push_list(
        &session.username,
        AccountList::Notifications,
        &notification_id,
    )?;

    state
        .db
        .pull_all(&session.username, AccountList::Following, &artist.id)?;

    Ok((
        StatusCode::CREATED,
        format!("Removal of follow status for {} is successful!", artist.username),
    ))
}

/// Enroll in a workshop. The workshop itself keeps no roster; enrollment
/// lives only on the caller's account. The notification sender is the
/// client-supplied artist username, trusted as-is.
pub async fn enroll(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<EnrollRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let workshop = state
        .db
        .get_workshop(&req.workshop_id)?
        .ok_or_else(|| ApiError::not_found("No workshop matches the requested id."))?;

    let notification_id = Uuid::new_v4().to_string();
    state.db.insert_notification(
        &notification_id,
        &[session.account_id.clone()],
        &req.artist.username,
        &format!(
            "You have successfully enrolled in {}, hosted by {}",
            workshop.title, workshop.host
        ),
    )?;
    state.db.push_list(
        &session.username,
        AccountList::Notifications,
        &notification_id,
    )?;

    state
        .db
        .push_list(&session.username, AccountList::Workshops, &workshop.id)?;

    Ok((StatusCode::CREATED, "Enrolling in workshop was successful!"))
}

pub async fn unenroll(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<EnrollRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let workshop = state
        .db
        .get_workshop(&req.workshop_id)?
        .ok_or_else(|| ApiError::not_found("No workshop matches the requested id."))?;

    let notification_id = Uuid::new_v4().to_string();
    state.db.insert_notification(
        &notification_id,
        &[session.account_id.clone()],
        &req.artist.username,
        &format!(
            "You have successfully unenrolled in {}, hosted by {}",
            workshop.title, workshop.host
        ),
    )?;
    state.db.push_list(
        &session.username,
        AccountList::Notifications,
        &notification_id,
    )?;

    state
        .db
        .pull_all(&session.username, AccountList::Workshops, &workshop.id)?;

    Ok(StatusCode::NO_CONTENT)
}

fn require_artist(session: &Session) -> Result<(), ApiError> {
    if !session.is_artist {
        return Err(ApiError::unauthorized(
            "Not authorized. You need to be an artist to add workshops!",
        ));
    }
    Ok(())
}

/// Gate for the add-workshop page route.
pub async fn new_workshop_page(
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    require_artist(&session)?;
    Ok("Host a new workshop.")
}

/// Publish a workshop and fan a notification out to the host's followers
/// (exact-list follower match, see gallery-db). Sequential writes, no
/// rollback.
pub async fn create_workshop(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<CreateWorkshopRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_artist(&session)?;

    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::validation("Invalid title"));
    }
    // Character bound, matching the store's length() check.
    if title.chars().count() > 50 {
        return Err(ApiError::validation("Workshop title is too long."));
    }

    let workshop_id = Uuid::new_v4().to_string();
    state
        .db
        .insert_workshop(&workshop_id, &session.username, title)?;

    state
        .db
        .push_list_by_id(&session.account_id, AccountList::Workshops, &workshop_id)?;

    let followers = state.db.find_followers_of(&session.account_id)?;
    let follower_ids: Vec<String> = followers.into_iter().map(|a| a.id).collect();

    let notification_id = Uuid::new_v4().to_string();
    state.db.insert_notification(
        &notification_id,
        &follower_ids,
        &session.username,
        &format!(
            "{} has released a new workshop, called {}!",
            session.username, title
        ),
    )?;
    for follower_id in &follower_ids {
        state
            .db
            .push_list_by_id(follower_id, AccountList::Notifications, &notification_id)?;
    }

    let workshop = state
        .db
        .get_workshop(&workshop_id)?
        .ok_or_else(|| anyhow!("workshop {} vanished after insert", workshop_id))?;

    Ok((StatusCode::CREATED, Json(workshop.into_api())))
}
