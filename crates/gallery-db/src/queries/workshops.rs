use anyhow::Result;
use rusqlite::Row;

use crate::Database;
use crate::models::WorkshopRow;
use crate::queries::OptionalExt;

const WORKSHOP_COLUMNS: &str = "id, host, title, created_at";

fn workshop_from_row(row: &Row<'_>) -> rusqlite::Result<WorkshopRow> {
    Ok(WorkshopRow {
        id: row.get(0)?,
        host: row.get(1)?,
        title: row.get(2)?,
        created_at: row.get(3)?,
    })
}

impl Database {
    pub fn insert_workshop(&self, id: &str, host: &str, title: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO workshops (id, host, title) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, host, title],
            )?;
            Ok(())
        })
    }

    pub fn get_workshop(&self, id: &str) -> Result<Option<WorkshopRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM workshops WHERE id = ?1", WORKSHOP_COLUMNS);
            conn.prepare(&sql)?
                .query_row([id], workshop_from_row)
                .optional()
        })
    }

    pub fn get_workshops_by_host(&self, host: &str) -> Result<Vec<WorkshopRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM workshops WHERE host = ?1 ORDER BY rowid",
                WORKSHOP_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([host], workshop_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn workshops_filter_by_host() {
        let db = db();
        db.insert_workshop("s1", "hana", "Intro to Oils").unwrap();
        db.insert_workshop("s2", "hana", "Advanced Oils").unwrap();
        db.insert_workshop("s3", "rei", "Charcoal Basics").unwrap();

        let hosted = db.get_workshops_by_host("hana").unwrap();
        let titles: Vec<_> = hosted.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro to Oils", "Advanced Oils"]);
    }

    #[test]
    fn title_length_is_bounded() {
        let db = db();
        assert!(db.insert_workshop("s1", "hana", "").is_err());
        assert!(db.insert_workshop("s2", "hana", &"x".repeat(51)).is_err());
        assert!(db.insert_workshop("s3", "hana", &"x".repeat(50)).is_ok());
    }
}
