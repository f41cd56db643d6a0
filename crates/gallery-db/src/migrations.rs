use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Collection schemas. No foreign keys on purpose: cross-references are
/// plain id strings (or JSON arrays of them) maintained by the routers, and
/// a dangling id is representable state.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS accounts (
            id              TEXT PRIMARY KEY,
            username        TEXT NOT NULL UNIQUE CHECK (length(username) >= 1),
            password        TEXT NOT NULL CHECK (length(password) >= 1),
            is_artist       INTEGER NOT NULL DEFAULT 0,
            artwork         TEXT NOT NULL DEFAULT '[]',
            liked           TEXT NOT NULL DEFAULT '[]',
            reviews         TEXT NOT NULL DEFAULT '[]',
            workshops       TEXT NOT NULL DEFAULT '[]',
            notifications   TEXT NOT NULL DEFAULT '[]',
            following       TEXT NOT NULL DEFAULT '[]',
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS artworks (
            id              TEXT PRIMARY KEY,
            name            TEXT NOT NULL UNIQUE CHECK (length(name) >= 1),
            artist          TEXT NOT NULL CHECK (length(artist) >= 1),
            year            TEXT NOT NULL CHECK (length(year) >= 1),
            category        TEXT NOT NULL CHECK (length(category) >= 1),
            medium          TEXT NOT NULL CHECK (length(medium) >= 1),
            description     TEXT NOT NULL CHECK (length(description) >= 1),
            image           TEXT NOT NULL CHECK (length(image) >= 1),
            likes           INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_artworks_artist
            ON artworks(artist);

        CREATE TABLE IF NOT EXISTS reviews (
            id              TEXT PRIMARY KEY,
            reviewer        TEXT NOT NULL CHECK (length(reviewer) >= 1),
            content         TEXT NOT NULL CHECK (length(content) BETWEEN 1 AND 1000),
            artwork_id      TEXT NOT NULL CHECK (length(artwork_id) >= 1),
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_reviews_artwork
            ON reviews(artwork_id);

        CREATE TABLE IF NOT EXISTS workshops (
            id              TEXT PRIMARY KEY,
            host            TEXT NOT NULL CHECK (length(host) >= 1),
            title           TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 50),
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_workshops_host
            ON workshops(host);

        CREATE TABLE IF NOT EXISTS notifications (
            id              TEXT PRIMARY KEY,
            receiver        TEXT NOT NULL DEFAULT '[]',
            sender          TEXT NOT NULL CHECK (length(sender) >= 1),
            content         TEXT NOT NULL CHECK (length(content) BETWEEN 1 AND 500),
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
