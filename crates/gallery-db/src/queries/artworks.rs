use anyhow::Result;
use rusqlite::Row;

use crate::Database;
use crate::models::ArtworkRow;
use crate::queries::{OptionalExt, placeholders, str_params};

const ARTWORK_COLUMNS: &str =
    "id, name, artist, year, category, medium, description, image, likes, created_at";

/// Per-field substring filters for the search page. An absent field matches
/// everything.
#[derive(Debug, Default)]
pub struct ArtworkFilter {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub category: Option<String>,
    pub medium: Option<String>,
}

fn artwork_from_row(row: &Row<'_>) -> rusqlite::Result<ArtworkRow> {
    Ok(ArtworkRow {
        id: row.get(0)?,
        name: row.get(1)?,
        artist: row.get(2)?,
        year: row.get(3)?,
        category: row.get(4)?,
        medium: row.get(5)?,
        description: row.get(6)?,
        image: row.get(7)?,
        likes: row.get(8)?,
        created_at: row.get(9)?,
    })
}

impl Database {
    #[allow(clippy::too_many_arguments)]
    pub fn insert_artwork(
        &self,
        id: &str,
        name: &str,
        artist: &str,
        year: &str,
        category: &str,
        medium: &str,
        description: &str,
        image: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO artworks (id, name, artist, year, category, medium, description, image)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![id, name, artist, year, category, medium, description, image],
            )?;
            Ok(())
        })
    }

    pub fn get_artwork(&self, id: &str) -> Result<Option<ArtworkRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM artworks WHERE id = ?1", ARTWORK_COLUMNS);
            conn.prepare(&sql)?.query_row([id], artwork_from_row).optional()
        })
    }

    pub fn get_artwork_by_name(&self, name: &str) -> Result<Option<ArtworkRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM artworks WHERE name = ?1", ARTWORK_COLUMNS);
            conn.prepare(&sql)?
                .query_row([name], artwork_from_row)
                .optional()
        })
    }

    /// Case-insensitive substring match per filter field, ANDed together.
    /// LIKE folds ASCII case only, which is what the store-level search has
    /// always offered.
    pub fn search_artworks(
        &self,
        filter: &ArtworkFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ArtworkRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM artworks
                 WHERE name LIKE '%' || ?1 || '%'
                   AND artist LIKE '%' || ?2 || '%'
                   AND category LIKE '%' || ?3 || '%'
                   AND medium LIKE '%' || ?4 || '%'
                 ORDER BY rowid
                 LIMIT ?5 OFFSET ?6",
                ARTWORK_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(
                    rusqlite::params![
                        filter.name.as_deref().unwrap_or(""),
                        filter.artist.as_deref().unwrap_or(""),
                        filter.category.as_deref().unwrap_or(""),
                        filter.medium.as_deref().unwrap_or(""),
                        limit,
                        offset,
                    ],
                    artwork_from_row,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Overwrite the like counter with a caller-supplied value. The counter
    /// is not derived from the liked-edge set and can drift from it.
    pub fn set_likes(&self, id: &str, likes: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE artworks SET likes = ?1 WHERE id = ?2",
                rusqlite::params![likes, id],
            )?;
            Ok(())
        })
    }

    pub fn get_artworks_by_ids(&self, ids: &[String]) -> Result<Vec<ArtworkRow>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM artworks WHERE id IN ({})",
                ARTWORK_COLUMNS,
                placeholders(ids.len())
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(str_params(ids).as_slice(), artwork_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_artworks_by_artist(&self, artist: &str) -> Result<Vec<ArtworkRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM artworks WHERE artist = ?1 ORDER BY rowid",
                ARTWORK_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([artist], artwork_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ArtworkFilter;
    use crate::Database;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn seed(db: &Database, id: &str, name: &str, artist: &str, category: &str, medium: &str) {
        db.insert_artwork(id, name, artist, "2020", category, medium, "d", "img")
            .unwrap();
    }

    #[test]
    fn name_is_unique() {
        let db = db();
        seed(&db, "w1", "Sky", "alice", "Painting", "Oil");
        assert!(
            db.insert_artwork("w2", "Sky", "bob", "2021", "Painting", "Oil", "d", "img")
                .is_err()
        );
        assert_eq!(db.get_artwork_by_name("Sky").unwrap().unwrap().artist, "alice");
    }

    #[test]
    fn search_matches_substring_case_insensitively() {
        let db = db();
        seed(&db, "w1", "Sunset Boulevard", "alice", "Painting", "Oil");
        seed(&db, "w2", "Starry Night", "bob", "Painting", "Oil");
        seed(&db, "w3", "SUNSET over water", "carol", "Photo", "Digital");

        let filter = ArtworkFilter {
            name: Some("sunset".into()),
            ..Default::default()
        };
        let rows = db.search_artworks(&filter, 10, 0).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Sunset Boulevard", "SUNSET over water"]);
    }

    #[test]
    fn search_filters_combine_with_and() {
        let db = db();
        seed(&db, "w1", "Sunset Boulevard", "alice", "Painting", "Oil");
        seed(&db, "w2", "SUNSET over water", "carol", "Photo", "Digital");

        let filter = ArtworkFilter {
            name: Some("sunset".into()),
            category: Some("photo".into()),
            ..Default::default()
        };
        let rows = db.search_artworks(&filter, 10, 0).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].artist, "carol");
    }

    #[test]
    fn search_pages_with_limit_and_offset() {
        let db = db();
        for i in 0..7 {
            seed(&db, &format!("w{i}"), &format!("Piece {i}"), "alice", "Painting", "Oil");
        }

        let all = ArtworkFilter::default();
        let first = db.search_artworks(&all, 3, 0).unwrap();
        let second = db.search_artworks(&all, 3, 3).unwrap();
        let third = db.search_artworks(&all, 3, 6).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 3);
        assert_eq!(third.len(), 1);
        assert_eq!(first[0].name, "Piece 0");
        assert_eq!(second[0].name, "Piece 3");
    }

    #[test]
    fn like_counter_is_overwritten_not_incremented() {
        let db = db();
        seed(&db, "w1", "Sky", "alice", "Painting", "Oil");
        db.set_likes("w1", 41).unwrap();
        db.set_likes("w1", 7).unwrap();
        assert_eq!(db.get_artwork("w1").unwrap().unwrap().likes, 7);
    }

    #[test]
    fn by_ids_resolves_liked_list() {
        let db = db();
        seed(&db, "w1", "Sky", "alice", "Painting", "Oil");
        seed(&db, "w2", "Sea", "alice", "Painting", "Oil");
        let rows = db.get_artworks_by_ids(&["w2".into()]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Sea");
        assert!(db.get_artworks_by_ids(&[]).unwrap().is_empty());
    }
}
