use anyhow::Result;
use rusqlite::Row;

use crate::Database;
use crate::models::ReviewRow;
use crate::queries::OptionalExt;

const REVIEW_COLUMNS: &str = "id, reviewer, content, artwork_id, created_at";

fn review_from_row(row: &Row<'_>) -> rusqlite::Result<ReviewRow> {
    Ok(ReviewRow {
        id: row.get(0)?,
        reviewer: row.get(1)?,
        content: row.get(2)?,
        artwork_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl Database {
    pub fn insert_review(
        &self,
        id: &str,
        reviewer: &str,
        content: &str,
        artwork_id: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO reviews (id, reviewer, content, artwork_id) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, reviewer, content, artwork_id],
            )?;
            Ok(())
        })
    }

    pub fn get_review(&self, id: &str) -> Result<Option<ReviewRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM reviews WHERE id = ?1", REVIEW_COLUMNS);
            conn.prepare(&sql)?.query_row([id], review_from_row).optional()
        })
    }

    pub fn get_reviews_by_reviewer(&self, reviewer: &str) -> Result<Vec<ReviewRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM reviews WHERE reviewer = ?1 ORDER BY rowid",
                REVIEW_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([reviewer], review_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_reviews_for_artwork(&self, artwork_id: &str) -> Result<Vec<ReviewRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM reviews WHERE artwork_id = ?1 ORDER BY rowid",
                REVIEW_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([artwork_id], review_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Delete by id, whoever owns it. Deleting an absent id is a no-op.
    pub fn delete_review(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM reviews WHERE id = ?1", [id])?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;
    use crate::models::AccountList;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn reviews_filter_by_reviewer_and_artwork() {
        let db = db();
        db.insert_review("r1", "alice", "lovely", "w1").unwrap();
        db.insert_review("r2", "alice", "bold", "w2").unwrap();
        db.insert_review("r3", "bob", "meh", "w1").unwrap();

        let mine = db.get_reviews_by_reviewer("alice").unwrap();
        assert_eq!(mine.len(), 2);

        let on_w1 = db.get_reviews_for_artwork("w1").unwrap();
        let reviewers: Vec<_> = on_w1.iter().map(|r| r.reviewer.as_str()).collect();
        assert_eq!(reviewers, vec!["alice", "bob"]);
    }

    #[test]
    fn content_length_is_bounded() {
        let db = db();
        assert!(db.insert_review("r1", "alice", "", "w1").is_err());
        assert!(db.insert_review("r2", "alice", &"x".repeat(1001), "w1").is_err());
        assert!(db.insert_review("r3", "alice", &"x".repeat(1000), "w1").is_ok());
    }

    #[test]
    fn delete_is_unconditional_and_leaves_foreign_reference_dangling() {
        // alice writes a review; bob deletes it. The row goes away and bob's
        // (empty) list is pulled, but alice's reviews list still holds the
        // dead id — the orphan the routers can produce without an ownership
        // check.
        let db = db();
        db.create_account("a1", "alice", "pw").unwrap();
        db.create_account("b1", "bob", "pw").unwrap();
        db.insert_review("r1", "alice", "lovely", "w1").unwrap();
        db.push_list("alice", AccountList::Reviews, "r1").unwrap();

        db.delete_review("r1").unwrap();
        db.pull_all("bob", AccountList::Reviews, "r1").unwrap();

        assert!(db.get_review("r1").unwrap().is_none());
        let alice = db.get_account_by_username("alice").unwrap().unwrap();
        assert_eq!(alice.reviews, vec!["r1"]);
    }

    #[test]
    fn delete_missing_review_is_noop() {
        let db = db();
        db.delete_review("ghost").unwrap();
    }
}
