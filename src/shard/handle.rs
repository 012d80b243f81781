//! Single-shard connection handling

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::schema;
use crate::config::StoreConfig;
use crate::error::{StorageError, StoreResult};

const INSERT_SQL: &str = "INSERT INTO records (data) VALUES (?1)";
const SELECT_SQL: &str = "SELECT data FROM records WHERE rowid = ?1";
const COUNT_SQL: &str = "SELECT COALESCE(MAX(rowid), 0) FROM records";

/// One shard: a single SQLite connection holding the append-only blob table.
///
/// Writes run inside implicit transactions: the first write after open or
/// commit issues a deferred BEGIN, and nothing is durable until an explicit
/// commit. Closing with a transaction open discards it.
#[derive(Debug)]
pub(crate) struct Shard {
    /// Taken on close; every operation afterwards fails with `Closed`
    conn: Option<Connection>,
    id: usize,
}

impl Shard {
    /// Open the shard database and ensure its table exists
    pub fn open(id: usize, path: &Path, config: &StoreConfig) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(|e| StorageError::OpenFailed {
            path: path.display().to_string(),
            source: e,
        })?;
        configure_connection(&conn, config)?;
        schema::ensure_table(&conn)?;
        Ok(Self {
            conn: Some(conn),
            id,
        })
    }

    fn conn(&self) -> Result<&Connection, StorageError> {
        self.conn.as_ref().ok_or(StorageError::Closed(self.id))
    }

    /// Open a deferred transaction if none is active
    fn ensure_txn(conn: &Connection) -> StoreResult<()> {
        if conn.is_autocommit() {
            conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }

    /// Append one blob
    pub fn append(&self, blob: &[u8]) -> StoreResult<()> {
        let conn = self.conn()?;
        Self::ensure_txn(conn)?;
        conn.execute(INSERT_SQL, params![blob])?;
        Ok(())
    }

    /// Append many blobs through one prepared statement
    pub fn append_batch(&self, blobs: &[Vec<u8>]) -> StoreResult<()> {
        let conn = self.conn()?;
        Self::ensure_txn(conn)?;
        let mut stmt = conn.prepare_cached(INSERT_SQL)?;
        for blob in blobs {
            stmt.execute(params![blob.as_slice()])?;
        }
        Ok(())
    }

    /// Fetch the blob at a 1-based rowid
    pub fn fetch(&self, row: u64) -> StoreResult<Vec<u8>> {
        let conn = self.conn()?;
        conn.query_row(SELECT_SQL, params![row as i64], |r| r.get::<_, Vec<u8>>(0))
            .optional()?
            .ok_or_else(|| StorageError::RowNotFound { shard: self.id, row }.into())
    }

    /// Current row count: MAX(rowid), 0 when empty
    pub fn row_count(&self) -> StoreResult<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(COUNT_SQL, [], |r| r.get(0))?;
        Ok(count as u64)
    }

    /// Commit the open transaction, if any
    pub fn commit(&self) -> StoreResult<()> {
        let conn = self.conn()?;
        if !conn.is_autocommit() {
            conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    /// Close the connection; idempotent
    pub fn close(&mut self) -> StoreResult<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| StorageError::Sqlite(e))?;
        }
        Ok(())
    }
}

/// Configure SQLite connection pragmas
fn configure_connection(conn: &Connection, config: &StoreConfig) -> StoreResult<()> {
    if config.wal_mode {
        conn.pragma_update(None, "journal_mode", "WAL")?;
    }
    conn.pragma_update(None, "busy_timeout", config.busy_timeout_ms)?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(())
}
