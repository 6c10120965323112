//! Database schema for the SQLite page cache

use rusqlite::Connection;

/// SQL schema for the cache database
pub const SCHEMA_SQL: &str = r#"
-- Raw upstream pages keyed by cache key
CREATE TABLE IF NOT EXISTS page_cache (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL,
    stored_at INTEGER NOT NULL,
    expires_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_page_cache_expires ON page_cache(expires_at);
"#;

/// Creates the cache table if it does not exist
pub fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
