//! Shard table schema

use rusqlite::Connection;

use crate::error::StoreResult;

/// Create the shard table (idempotent)
pub fn ensure_table(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Opaque record blobs, addressed by the implicit 1-based rowid
CREATE TABLE IF NOT EXISTS records (
    data BLOB NOT NULL
);
"#;
