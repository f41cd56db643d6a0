use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// -- Sessions --

/// Per-client session state, cached at login/registration time. Canonical
/// definition lives here in gallery-types because both gallery-api (the
/// session middleware) and the integration tests need it.
///
/// `is_artist` and `username` are snapshots: they are NOT re-read from the
/// store on every request, so store-side edits go stale until the next login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub account_id: String,
    pub username: String,
    pub is_artist: bool,
}

// -- Accounts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Full account record as returned to its owner. The password column is
/// never serialized out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub is_artist: bool,
    pub artwork: Vec<String>,
    pub liked: Vec<String>,
    pub reviews: Vec<String>,
    pub workshops: Vec<String>,
    pub notifications: Vec<String>,
    pub following: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// -- Artwork --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateArtworkRequest {
    pub name: String,
    pub year: String,
    pub category: String,
    pub medium: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateLikesRequest {
    /// Replacement value for the artwork's like counter, supplied by the
    /// client and trusted as-is.
    pub change: i64,
    /// true to add the artwork to the caller's liked list, false to remove
    /// every matching entry.
    pub like: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtworkResponse {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub year: String,
    pub category: String,
    pub medium: String,
    pub description: String,
    pub image: String,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

/// One page of search results plus the querystring to rebuild pagination
/// links (all original query params except `page`).
#[derive(Debug, Serialize, Deserialize)]
pub struct ArtworkPage {
    pub artworks: Vec<ArtworkResponse>,
    pub qstring: String,
    pub page: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArtworkDetail {
    pub artwork: ArtworkResponse,
    pub artist: AccountResponse,
    pub user: AccountResponse,
    pub reviews: Vec<ReviewResponse>,
    /// False when the caller is the artwork's own artist.
    pub review_privilege: bool,
}

// -- Artists --

/// Reference to an artist account as sent by clients in follow/enroll
/// bodies. Clients post the whole artist document; only these two fields are
/// read, the rest is ignored.
#[derive(Debug, Deserialize)]
pub struct ArtistRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub artist: ArtistRef,
}

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub workshop_id: String,
    pub artist: ArtistRef,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArtistProfile {
    pub artist: AccountResponse,
    pub artwork: Vec<ArtworkResponse>,
    pub workshop: Vec<WorkshopResponse>,
    pub user: AccountResponse,
}

// -- Workshops --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateWorkshopRequest {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkshopResponse {
    pub id: String,
    pub host: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

// -- Reviews --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateReviewRequest {
    pub contents: String,
    pub artwork_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteReviewRequest {
    pub review_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: String,
    pub reviewer: String,
    pub content: String,
    pub artwork_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewDetail {
    pub review: ReviewResponse,
    pub artwork: ArtworkResponse,
}

// -- Notifications --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: String,
    pub receiver: Vec<String>,
    pub sender: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// -- Role flag --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetArtistRequest {
    pub is_artist: bool,
}
