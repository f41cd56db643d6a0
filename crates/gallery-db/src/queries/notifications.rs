use anyhow::Result;
use rusqlite::Row;

use crate::Database;
use crate::models::{NotificationRow, id_list};

const NOTIFICATION_COLUMNS: &str = "id, receiver, sender, content, created_at";

fn notification_from_row(row: &Row<'_>) -> rusqlite::Result<NotificationRow> {
    Ok(NotificationRow {
        id: row.get(0)?,
        receiver: id_list(&row.get::<_, String>(1)?),
        sender: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl Database {
    /// One notification row fans out to every id in `receiver_ids`; the
    /// matching per-account `notifications` list pushes happen separately in
    /// the routers.
    pub fn insert_notification(
        &self,
        id: &str,
        receiver_ids: &[String],
        sender: &str,
        content: &str,
    ) -> Result<()> {
        let receiver = serde_json::to_string(receiver_ids)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notifications (id, receiver, sender, content) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, receiver, sender, content],
            )?;
            Ok(())
        })
    }

    /// Notifications whose receiver list contains `account_id` (containment,
    /// unlike the follower query).
    pub fn get_notifications_for(&self, account_id: &str) -> Result<Vec<NotificationRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM notifications n
                 WHERE EXISTS (SELECT 1 FROM json_each(n.receiver) WHERE json_each.value = ?1)
                 ORDER BY rowid",
                NOTIFICATION_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([account_id], notification_from_row)?
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
    fn receiver_lookup_is_containment() {
        let db = db();
        db.insert_notification("n1", &["a1".into(), "b1".into()], "hana", "new artwork!")
            .unwrap();
        db.insert_notification("n2", &["b1".into()], "hana", "new workshop!")
            .unwrap();

        let for_a = db.get_notifications_for("a1").unwrap();
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].id, "n1");

        let for_b = db.get_notifications_for("b1").unwrap();
        assert_eq!(for_b.len(), 2);

        assert!(db.get_notifications_for("c1").unwrap().is_empty());
    }

    #[test]
    fn empty_receiver_list_reaches_nobody() {
        let db = db();
        db.insert_notification("n1", &[], "hana", "into the void")
            .unwrap();
        assert!(db.get_notifications_for("a1").unwrap().is_empty());
    }

    #[test]
    fn content_length_is_bounded() {
        let db = db();
        assert!(db.insert_notification("n1", &[], "hana", "").is_err());
        assert!(
            db.insert_notification("n2", &[], "hana", &"x".repeat(501))
                .is_err()
        );
    }
}
