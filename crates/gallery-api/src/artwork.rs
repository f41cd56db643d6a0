use anyhow::anyhow;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use gallery_db::models::{AccountList, AccountRow};
use gallery_db::queries::ArtworkFilter;
use gallery_types::api::{
    ArtworkDetail, ArtworkPage, CreateArtworkRequest, Session, UpdateLikesRequest,
};

use crate::AppState;
use crate::error::ApiError;

/// The most artworks one result page may carry.
const MAX_ARTWORK_PER_PAGE: u32 = 25;
const DEFAULT_LIMIT: u32 = 10;

/// Raw search query. `page` and `limit` arrive as strings so that a
/// non-numeric value falls back to its default instead of rejecting the
/// request.
#[derive(Debug, Default, Deserialize)]
pub struct ArtworkQuery {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub category: Option<String>,
    pub medium: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Clamp page/limit: limit defaults to 10 and is capped at 25, page
/// defaults to 1 and is floored at 1.
fn page_params(query: &ArtworkQuery) -> (u32, u32) {
    let limit = query
        .limit
        .as_deref()
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(DEFAULT_LIMIT)
        .min(MAX_ARTWORK_PER_PAGE);
    let page = query
        .page
        .as_deref()
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(1)
        .max(1);
    (page, limit)
}

/// Rebuild the querystring for pagination links: every param the client
/// sent except `page`, raw values as given.
fn build_qstring(query: &ArtworkQuery) -> String {
    let mut params = Vec::new();
    for (key, value) in [
        ("name", &query.name),
        ("artist", &query.artist),
        ("category", &query.category),
        ("medium", &query.medium),
        ("limit", &query.limit),
    ] {
        if let Some(value) = value {
            params.push(format!("{}={}", key, value));
        }
    }
    params.join("&")
}

/// Gate for the search page route.
pub async fn search_page() -> &'static str {
    "Search for artwork by name, artist, category or medium."
}

pub async fn search(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
    Query(query): Query<ArtworkQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, limit) = page_params(&query);
    let qstring = build_qstring(&query);
    // page is client-supplied and may be any u32; saturate instead of
    // overflowing the multiply. An absurd offset just yields an empty page.
    let offset = (page - 1).saturating_mul(limit);

    let filter = ArtworkFilter {
        name: query.name,
        artist: query.artist,
        category: query.category,
        medium: query.medium,
    };

    // Run the blocking store scan off the async runtime.
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.search_artworks(&filter, limit, offset))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))??;

    debug!("found {} matching artworks", rows.len());

    Ok(Json(ArtworkPage {
        artworks: rows.into_iter().map(|r| r.into_api()).collect(),
        qstring,
        page,
    }))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(artwork_id): Path<String>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let artwork = state
        .db
        .get_artwork(&artwork_id)?
        .ok_or_else(|| ApiError::not_found("No artwork matches the requested id."))?;

    // The artist reference is a denormalized username; it can dangle.
    let artist = state
        .db
        .get_account_by_username(&artwork.artist)?
        .ok_or_else(|| ApiError::not_found("The artist account for this artwork is gone."))?;

    let user = state
        .db
        .get_account_by_username(&session.username)?
        .ok_or_else(|| anyhow!("session username {} not in store", session.username))?;

    let reviews = state.db.get_reviews_for_artwork(&artwork_id)?;

    // An artist cannot review their own work.
    let review_privilege = artist.id != user.id;

    Ok(Json(ArtworkDetail {
        artwork: artwork.into_api(),
        artist: artist.into_api(),
        user: user.into_api(),
        reviews: reviews.into_iter().map(|r| r.into_api()).collect(),
        review_privilege,
    }))
}

/// A patron may publish while their artwork list holds at most one entry;
/// past that, the explicit switch to the artist role is required to keep
/// publishing.
fn check_publish_limit(session: &Session, caller: &AccountRow) -> Result<(), ApiError> {
    if !session.is_artist && caller.artwork.len() > 1 {
        return Err(ApiError::unauthorized(
            "You should not be able to add artwork as a patron. Change to an artist to continue adding artwork!",
        ));
    }
    Ok(())
}

/// Gate for the add-artwork page route.
pub async fn new_artwork_page(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = state
        .db
        .get_account_by_id(&session.account_id)?
        .ok_or_else(|| anyhow!("unknown account id {}", session.account_id))?;
    check_publish_limit(&session, &caller)?;
    Ok("Add a new artwork.")
}

fn validate_artwork(req: &CreateArtworkRequest) -> Result<(), ApiError> {
    let fields = [
        &req.name,
        &req.year,
        &req.category,
        &req.medium,
        &req.description,
        &req.image,
    ];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(ApiError::validation(
            "One of the fields for the artwork is empty. Try again!",
        ));
    }
    if req.year.trim().parse::<f64>().is_err() {
        return Err(ApiError::validation(
            "The year of the artwork has to be a number.",
        ));
    }
    Ok(())
}

/// Publish an artwork: insert it, append it to the caller's artwork list,
/// then fan a notification out to the caller's followers. Sequential writes
/// with no rollback — a failure partway leaves the earlier writes in place.
/// Publishing does NOT flip the caller's role flag; that is the client's
/// separate `PUT /user/artist` call.
pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<CreateArtworkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = state
        .db
        .get_account_by_id(&session.account_id)?
        .ok_or_else(|| anyhow!("unknown account id {}", session.account_id))?;
    check_publish_limit(&session, &caller)?;

    validate_artwork(&req)?;

    if state.db.get_artwork_by_name(&req.name)?.is_some() {
        return Err(ApiError::validation(
            "An artwork already exists with this name. Give your artwork a different name.",
        ));
    }

    let artwork_id = Uuid::new_v4().to_string();
    state.db.insert_artwork(
        &artwork_id,
        &req.name,
        &session.username,
        &req.year,
        &req.category,
        &req.medium,
        &req.description,
        &req.image,
    )?;

    state
        .db
        .push_list(&session.username, AccountList::Artwork, &artwork_id)?;

    // Fan-out to followers (exact-list match, see gallery-db).
    let followers = state.db.find_followers_of(&session.account_id)?;
    let follower_ids: Vec<String> = followers.into_iter().map(|a| a.id).collect();

    let notification_id = Uuid::new_v4().to_string();
    state.db.insert_notification(
        &notification_id,
        &follower_ids,
        &session.username,
        &format!(
            "{} has released a new artwork, called {}!",
            session.username, req.name
        ),
    )?;
    for follower_id in &follower_ids {
        state
            .db
            .push_list_by_id(follower_id, AccountList::Notifications, &notification_id)?;
    }

    let artwork = state
        .db
        .get_artwork(&artwork_id)?
        .ok_or_else(|| anyhow!("artwork {} vanished after insert", artwork_id))?;

    Ok((StatusCode::CREATED, Json(artwork.into_api())))
}

/// Overwrite the artwork's like counter with the client-supplied value and
/// update the caller's liked list: append on like (no dedup check), remove
/// all matching entries on unlike.
pub async fn update_likes(
    State(state): State<AppState>,
    Path(artwork_id): Path<String>,
    Extension(session): Extension<Session>,
    Json(req): Json<UpdateLikesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .get_artwork(&artwork_id)?
        .ok_or_else(|| ApiError::not_found("No artwork matches the requested id."))?;

    state.db.set_likes(&artwork_id, req.change)?;

    if req.like {
        state
            .db
            .push_list(&session.username, AccountList::Liked, &artwork_id)?;
    } else {
        state
            .db
            .pull_all(&session.username, AccountList::Liked, &artwork_id)?;
    }

    Ok(Json(serde_json::json!({ "likes": req.change, "liked": req.like })))
}

pub async fn liked(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = state
        .db
        .get_account_by_id(&session.account_id)?
        .ok_or_else(|| anyhow!("unknown account id {}", session.account_id))?;

    let artworks = state.db.get_artworks_by_ids(&caller.liked)?;
    Ok(Json(
        artworks
            .into_iter()
            .map(|a| a.into_api())
            .collect::<Vec<_>>(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> ArtworkQuery {
        ArtworkQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(page_params(&query(None, None)), (1, 10));
        assert_eq!(page_params(&query(None, Some("100"))), (1, 25));
        assert_eq!(page_params(&query(None, Some("25"))), (1, 25));
        assert_eq!(page_params(&query(None, Some("3"))), (1, 3));
        assert_eq!(page_params(&query(None, Some("junk"))), (1, 10));
    }

    #[test]
    fn page_defaults_and_floors() {
        assert_eq!(page_params(&query(Some("4"), None)).0, 4);
        assert_eq!(page_params(&query(Some("0"), None)).0, 1);
        assert_eq!(page_params(&query(Some("-2"), None)).0, 1);
        assert_eq!(page_params(&query(Some("junk"), None)).0, 1);
    }

    #[test]
    fn qstring_keeps_everything_but_page() {
        let q = ArtworkQuery {
            name: Some("Sunset".into()),
            medium: Some("Oil".into()),
            page: Some("3".into()),
            limit: Some("5".into()),
            ..Default::default()
        };
        assert_eq!(build_qstring(&q), "name=Sunset&medium=Oil&limit=5");
        assert_eq!(build_qstring(&ArtworkQuery::default()), "");
    }

    #[test]
    fn artwork_validation_checks_presence_and_year() {
        let ok = CreateArtworkRequest {
            name: "Sky".into(),
            year: "2020".into(),
            category: "Painting".into(),
            medium: "Oil".into(),
            description: "d".into(),
            image: "url".into(),
        };
        assert!(validate_artwork(&ok).is_ok());

        let blank = CreateArtworkRequest {
            category: "   ".into(),
            ..clone_req(&ok)
        };
        assert!(matches!(
            validate_artwork(&blank),
            Err(ApiError::Validation(_))
        ));

        let bad_year = CreateArtworkRequest {
            year: "twenty-twenty".into(),
            ..clone_req(&ok)
        };
        assert!(matches!(
            validate_artwork(&bad_year),
            Err(ApiError::Validation(_))
        ));
    }

    fn clone_req(req: &CreateArtworkRequest) -> CreateArtworkRequest {
        CreateArtworkRequest {
            name: req.name.clone(),
            year: req.year.clone(),
            category: req.category.clone(),
            medium: req.medium.clone(),
            description: req.description.clone(),
            image: req.image.clone(),
        }
    }
}
