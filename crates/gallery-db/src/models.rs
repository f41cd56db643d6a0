//! Database row types — these map directly to SQLite rows.
//! Distinct from the gallery-types API models to keep the DB layer
//! independent; `into_api` bridges the two at the read edge.

use gallery_types::api::{
    AccountResponse, ArtworkResponse, NotificationResponse, ReviewResponse, WorkshopResponse,
};
use gallery_types::time::parse_store_timestamp;
use tracing::warn;

/// Decode a JSON id-list column. A corrupt column degrades to an empty list
/// with a warning rather than failing the whole read.
pub(crate) fn id_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("corrupt id list '{}': {}", raw, e);
        Vec::new()
    })
}

/// The id-list columns on an account record. Every cross-entity operation
/// mutates one of these; pushes append without dedup, pulls remove all
/// matching entries.
#[derive(Clone, Copy, Debug)]
pub enum AccountList {
    Artwork,
    Liked,
    Reviews,
    Workshops,
    Notifications,
    Following,
}

impl AccountList {
    pub(crate) fn column(self) -> &'static str {
        match self {
            AccountList::Artwork => "artwork",
            AccountList::Liked => "liked",
            AccountList::Reviews => "reviews",
            AccountList::Workshops => "workshops",
            AccountList::Notifications => "notifications",
            AccountList::Following => "following",
        }
    }
}

pub struct AccountRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub is_artist: bool,
    pub artwork: Vec<String>,
    pub liked: Vec<String>,
    pub reviews: Vec<String>,
    pub workshops: Vec<String>,
    pub notifications: Vec<String>,
    pub following: Vec<String>,
    pub created_at: String,
}

impl AccountRow {
    /// Convert to the API shape. The password never leaves the DB layer.
    pub fn into_api(self) -> AccountResponse {
        AccountResponse {
            id: self.id,
            username: self.username,
            is_artist: self.is_artist,
            artwork: self.artwork,
            liked: self.liked,
            reviews: self.reviews,
            workshops: self.workshops,
            notifications: self.notifications,
            following: self.following,
            created_at: parse_store_timestamp(&self.created_at),
        }
    }
}

pub struct ArtworkRow {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub year: String,
    pub category: String,
    pub medium: String,
    pub description: String,
    pub image: String,
    pub likes: i64,
    pub created_at: String,
}

impl ArtworkRow {
    pub fn into_api(self) -> ArtworkResponse {
        ArtworkResponse {
            id: self.id,
            name: self.name,
            artist: self.artist,
            year: self.year,
            category: self.category,
            medium: self.medium,
            description: self.description,
            image: self.image,
            likes: self.likes,
            created_at: parse_store_timestamp(&self.created_at),
        }
    }
}

pub struct ReviewRow {
    pub id: String,
    pub reviewer: String,
    pub content: String,
    pub artwork_id: String,
    pub created_at: String,
}

impl ReviewRow {
    pub fn into_api(self) -> ReviewResponse {
        ReviewResponse {
            id: self.id,
            reviewer: self.reviewer,
            content: self.content,
            artwork_id: self.artwork_id,
            created_at: parse_store_timestamp(&self.created_at),
        }
    }
}

pub struct WorkshopRow {
    pub id: String,
    pub host: String,
    pub title: String,
    pub created_at: String,
}

impl WorkshopRow {
    pub fn into_api(self) -> WorkshopResponse {
        WorkshopResponse {
            id: self.id,
            host: self.host,
            title: self.title,
            created_at: parse_store_timestamp(&self.created_at),
        }
    }
}

pub struct NotificationRow {
    pub id: String,
    pub receiver: Vec<String>,
    pub sender: String,
    pub content: String,
    pub created_at: String,
}

impl NotificationRow {
    pub fn into_api(self) -> NotificationResponse {
        NotificationResponse {
            id: self.id,
            receiver: self.receiver,
            sender: self.sender,
            content: self.content,
            created_at: parse_store_timestamp(&self.created_at),
        }
    }
}
