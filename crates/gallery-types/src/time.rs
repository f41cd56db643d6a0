use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

/// Parse a timestamp column into UTC.
///
/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone, so a
/// plain RFC 3339 parse is tried first and the naive form second. A corrupt
/// value degrades to the epoch with a warning rather than failing the read.
pub fn parse_store_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}
