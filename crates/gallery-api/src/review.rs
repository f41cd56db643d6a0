use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use uuid::Uuid;

use gallery_db::models::AccountList;
use gallery_types::api::{CreateReviewRequest, DeleteReviewRequest, ReviewDetail, Session};

use crate::AppState;
use crate::error::ApiError;

pub async fn list_mine(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state.db.get_reviews_by_reviewer(&session.username)?;
    Ok(Json(
        reviews
            .into_iter()
            .map(|r| r.into_api())
            .collect::<Vec<_>>(),
    ))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    Extension(_session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .db
        .get_review(&review_id)?
        .ok_or_else(|| ApiError::not_found("No review matches the requested id."))?;

    // The artwork reference is a plain id string; it can dangle.
    let artwork = state
        .db
        .get_artwork(&review.artwork_id)?
        .ok_or_else(|| ApiError::not_found("The artwork for this review is gone."))?;

    Ok(Json(ReviewDetail {
        review: review.into_api(),
        artwork: artwork.into_api(),
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = req.contents.trim();
    if content.is_empty() || req.artwork_id.trim().is_empty() {
        return Err(ApiError::validation("Invalid review properties."));
    }
    // Character bound, matching the store's length() check.
    if content.chars().count() > 1000 {
        return Err(ApiError::validation(
            "The content for a review cannot exceed 1000 characters.",
        ));
    }

    let review_id = Uuid::new_v4().to_string();
    state
        .db
        .insert_review(&review_id, &session.username, content, &req.artwork_id)?;

    state
        .db
        .push_list(&session.username, AccountList::Reviews, &review_id)?;

    let review = state
        .db
        .get_review(&review_id)?
        .ok_or_else(|| anyhow::anyhow!("review {} vanished after insert", review_id))?;

    Ok((StatusCode::CREATED, Json(review.into_api())))
}

/// Delete a review by id — whoever owns it — then pull the id from the
/// CALLER's own review list only. Deleting someone else's review therefore
/// leaves that account holding a dangling id.
pub async fn remove(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<DeleteReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.delete_review(&req.review_id)?;

    state
        .db
        .pull_all(&session.username, AccountList::Reviews, &req.review_id)?;

    Ok((StatusCode::OK, "The review removal operation was successful!"))
}
