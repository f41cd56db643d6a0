use anyhow::Result;
use rusqlite::{Connection, Row};

use crate::Database;
use crate::models::{AccountList, AccountRow, id_list};
use crate::queries::{OptionalExt, placeholders, str_params};

const ACCOUNT_COLUMNS: &str = "id, username, password, is_artist, artwork, liked, reviews, \
     workshops, notifications, following, created_at";

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok(AccountRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        is_artist: row.get(3)?,
        artwork: id_list(&row.get::<_, String>(4)?),
        liked: id_list(&row.get::<_, String>(5)?),
        reviews: id_list(&row.get::<_, String>(6)?),
        workshops: id_list(&row.get::<_, String>(7)?),
        notifications: id_list(&row.get::<_, String>(8)?),
        following: id_list(&row.get::<_, String>(9)?),
        created_at: row.get(10)?,
    })
}

impl Database {
    /// Insert a fresh account. The username UNIQUE constraint surfaces as an
    /// error here; callers decide how to report it.
    pub fn create_account(&self, id: &str, username: &str, password: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO accounts (id, username, password) VALUES (?1, ?2, ?3)",
                (id, username, password),
            )?;
            Ok(())
        })
    }

    pub fn get_account_by_id(&self, id: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM accounts WHERE id = ?1", ACCOUNT_COLUMNS);
            conn.prepare(&sql)?.query_row([id], account_from_row).optional()
        })
    }

    pub fn get_account_by_username(&self, username: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM accounts WHERE username = ?1",
                ACCOUNT_COLUMNS
            );
            conn.prepare(&sql)?
                .query_row([username], account_from_row)
                .optional()
        })
    }

    /// Exact-match credential lookup. Passwords are stored as given; there is
    /// no hashing in this design (see DESIGN.md).
    pub fn find_login(&self, username: &str, password: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM accounts WHERE username = ?1 AND password = ?2",
                ACCOUNT_COLUMNS
            );
            conn.prepare(&sql)?
                .query_row([username, password], account_from_row)
                .optional()
        })
    }

    pub fn get_accounts_by_ids(&self, ids: &[String]) -> Result<Vec<AccountRow>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM accounts WHERE id IN ({})",
                ACCOUNT_COLUMNS,
                placeholders(ids.len())
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(str_params(ids).as_slice(), account_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Accounts whose `following` column equals the one-element list
    /// `[host_id]` exactly. A list holding the host plus anyone else does
    /// NOT match. This mirrors the original follower query verbatim; see
    /// DESIGN.md for the exact-match-vs-containment decision.
    pub fn find_followers_of(&self, host_id: &str) -> Result<Vec<AccountRow>> {
        let literal = serde_json::to_string(&vec![host_id])?;
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM accounts WHERE following = ?1",
                ACCOUNT_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([&literal], account_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn set_is_artist(&self, id: &str, is_artist: bool) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE accounts SET is_artist = ?1 WHERE id = ?2",
                rusqlite::params![is_artist, id],
            )?;
            Ok(())
        })
    }

    /// Append `value` to one of the account's id lists. No dedup: pushing
    /// the same id twice stores it twice.
    pub fn push_list(&self, username: &str, list: AccountList, value: &str) -> Result<()> {
        self.with_conn(|conn| update_list(conn, "username", username, list, |ids| {
            ids.push(value.to_string());
        }))
    }

    pub fn push_list_by_id(&self, id: &str, list: AccountList, value: &str) -> Result<()> {
        self.with_conn(|conn| update_list(conn, "id", id, list, |ids| {
            ids.push(value.to_string());
        }))
    }

    /// Remove every entry equal to `value` from one of the account's id
    /// lists (pull-all semantics: duplicates go in one shot).
    pub fn pull_all(&self, username: &str, list: AccountList, value: &str) -> Result<()> {
        self.with_conn(|conn| update_list(conn, "username", username, list, |ids| {
            ids.retain(|id| id != value);
        }))
    }
}

/// Read-modify-write on a JSON id-list column. Two statements, no
/// transaction: the store offers no multi-document atomicity and the routers
/// accept partial updates.
fn update_list(
    conn: &Connection,
    key_column: &str,
    key: &str,
    list: AccountList,
    mutate: impl FnOnce(&mut Vec<String>),
) -> Result<()> {
    let select = format!(
        "SELECT {} FROM accounts WHERE {} = ?1",
        list.column(),
        key_column
    );
    let raw = conn
        .prepare(&select)?
        .query_row([key], |row| row.get::<_, String>(0))
        .optional()?;

    // A miss is a no-op, matching findOneAndUpdate on an absent document.
    let Some(raw) = raw else {
        return Ok(());
    };

    let mut ids = id_list(&raw);
    mutate(&mut ids);

    let update = format!(
        "UPDATE accounts SET {} = ?1 WHERE {} = ?2",
        list.column(),
        key_column
    );
    conn.execute(&update, [&serde_json::to_string(&ids)?, key])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Database;
    use crate::models::AccountList;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn duplicate_username_rejected_first_account_intact() {
        let db = db();
        db.create_account("a1", "alice", "pw1").unwrap();
        assert!(db.create_account("a2", "alice", "pw2").is_err());

        let alice = db.get_account_by_username("alice").unwrap().unwrap();
        assert_eq!(alice.id, "a1");
        assert_eq!(alice.password, "pw1");
    }

    #[test]
    fn login_is_exact_match() {
        let db = db();
        db.create_account("a1", "alice", "pw1").unwrap();

        assert!(db.find_login("alice", "pw1").unwrap().is_some());
        assert!(db.find_login("alice", "PW1").unwrap().is_none());
        assert!(db.find_login("alice", "pw2").unwrap().is_none());
        assert!(db.find_login("bob", "pw1").unwrap().is_none());
    }

    #[test]
    fn push_has_no_dedup_and_pull_removes_all() {
        let db = db();
        db.create_account("a1", "alice", "pw").unwrap();

        db.push_list("alice", AccountList::Liked, "art1").unwrap();
        db.push_list("alice", AccountList::Liked, "art1").unwrap();
        let alice = db.get_account_by_username("alice").unwrap().unwrap();
        assert_eq!(alice.liked, vec!["art1", "art1"]);

        db.pull_all("alice", AccountList::Liked, "art1").unwrap();
        let alice = db.get_account_by_username("alice").unwrap().unwrap();
        assert!(alice.liked.is_empty());
    }

    #[test]
    fn like_unlike_round_trip_restores_list() {
        let db = db();
        db.create_account("a1", "alice", "pw").unwrap();
        db.push_list("alice", AccountList::Liked, "art1").unwrap();
        db.pull_all("alice", AccountList::Liked, "art1").unwrap();

        let alice = db.get_account_by_username("alice").unwrap().unwrap();
        assert!(alice.liked.is_empty());
    }

    #[test]
    fn list_update_on_missing_account_is_noop() {
        let db = db();
        db.push_list("ghost", AccountList::Liked, "art1").unwrap();
        db.pull_all("ghost", AccountList::Liked, "art1").unwrap();
    }

    #[test]
    fn follower_query_matches_only_exact_single_entry_list() {
        let db = db();
        db.create_account("host", "hana", "pw").unwrap();
        db.create_account("f1", "solo", "pw").unwrap();
        db.create_account("f2", "multi", "pw").unwrap();
        db.create_account("f3", "none", "pw").unwrap();

        // solo follows exactly the host
        db.push_list("solo", AccountList::Following, "host").unwrap();
        // multi follows the host plus someone else
        db.push_list("multi", AccountList::Following, "host").unwrap();
        db.push_list("multi", AccountList::Following, "other").unwrap();

        let followers = db.find_followers_of("host").unwrap();
        let names: Vec<_> = followers.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(names, vec!["solo"]);
    }

    #[test]
    fn follow_twice_then_unfollow_once_clears_list() {
        let db = db();
        db.create_account("a1", "alice", "pw").unwrap();
        db.push_list("alice", AccountList::Following, "host").unwrap();
        db.push_list("alice", AccountList::Following, "host").unwrap();
        db.pull_all("alice", AccountList::Following, "host").unwrap();

        let alice = db.get_account_by_username("alice").unwrap().unwrap();
        assert!(alice.following.is_empty());
    }

    #[test]
    fn accounts_by_ids_resolves_following_list() {
        let db = db();
        db.create_account("a1", "alice", "pw").unwrap();
        db.create_account("b1", "bob", "pw").unwrap();
        db.create_account("c1", "carol", "pw").unwrap();

        let rows = db
            .get_accounts_by_ids(&["a1".into(), "c1".into()])
            .unwrap();
        let mut names: Vec<_> = rows.iter().map(|a| a.username.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["alice", "carol"]);

        assert!(db.get_accounts_by_ids(&[]).unwrap().is_empty());
    }

    #[test]
    fn role_flag_overwrites_unconditionally() {
        let db = db();
        db.create_account("a1", "alice", "pw").unwrap();
        db.set_is_artist("a1", true).unwrap();
        assert!(db.get_account_by_id("a1").unwrap().unwrap().is_artist);
        db.set_is_artist("a1", false).unwrap();
        assert!(!db.get_account_by_id("a1").unwrap().unwrap().is_artist);
    }
}
