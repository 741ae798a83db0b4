//! SQLite backend: r2d2-pooled rusqlite connections behind the driver
//! traits.
//!
//! SQLite has no callable statements, so the `Call` preparation strategy is
//! rejected here; everything else, including generated-key retrieval via
//! `last_insert_rowid`, is supported. SQLite hands keys back without any
//! prepare-time opt-in, so `Plain` and `WithKeys` prepare identically.

mod params;
mod query;

pub use params::value_to_sqlite;
pub use query::build_result_set;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;

use crate::driver::{Connection, ConnectionSource, Prepare, PreparedSql, Produced, StatementGuard};
use crate::error::SqlSessionError;
use crate::value::{SqlType, SqlValue};

const VENDOR: &str = "SQLite";
const DEFAULT_POOL_SIZE: u32 = 10;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// r2d2-backed SQLite connection pool; one per database.
///
/// Cloning is cheap and clones share the pool.
#[derive(Clone)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
}

impl SqlitePool {
    /// Open (or create) a file-backed database.
    ///
    /// # Errors
    ///
    /// Returns [`SqlSessionError::Pool`] when the pool cannot establish its
    /// connections.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, SqlSessionError> {
        Self::build(SqliteConnectionManager::file(path))
    }

    /// Open a shared-cache in-memory database.
    ///
    /// The database is named uniquely per pool, so pooled connections all
    /// see the same data and separate pools stay isolated. It lives as long
    /// as the pool keeps a connection open.
    ///
    /// # Errors
    ///
    /// Returns [`SqlSessionError::Pool`] when the pool cannot establish its
    /// connections.
    pub fn memory() -> Result<Self, SqlSessionError> {
        static SEQ: AtomicUsize = AtomicUsize::new(0);
        let uri = format!(
            "file:sql-session-{}-{}?mode=memory&cache=shared",
            std::process::id(),
            SEQ.fetch_add(1, Ordering::Relaxed),
        );
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Self::build(SqliteConnectionManager::file(uri).with_flags(flags))
    }

    fn build(manager: SqliteConnectionManager) -> Result<Self, SqlSessionError> {
        let manager = manager.with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
        let pool = Pool::builder()
            .max_size(DEFAULT_POOL_SIZE)
            .build(manager)?;
        Ok(Self { pool })
    }
}

impl ConnectionSource for SqlitePool {
    type Conn = SqliteConnection;

    fn connection(&self) -> Result<SqliteConnection, SqlSessionError> {
        let inner = self.pool.get()?;
        Ok(SqliteConnection { inner })
    }
}

/// A pooled SQLite connection; dropping it returns it to the pool.
///
/// Autocommit maps onto SQLite's transaction state: disabling it opens a
/// deferred transaction, enabling it mid-transaction commits, matching the
/// session layer's expectations. `commit` and `rollback` outside a
/// transaction are no-ops.
pub struct SqliteConnection {
    inner: PooledConnection<SqliteConnectionManager>,
}

impl Connection for SqliteConnection {
    fn vendor(&self) -> &str {
        VENDOR
    }

    fn autocommit(&self) -> Result<bool, SqlSessionError> {
        Ok(self.inner.is_autocommit())
    }

    fn set_autocommit(&mut self, enabled: bool) -> Result<(), SqlSessionError> {
        if enabled && !self.inner.is_autocommit() {
            self.inner.execute_batch("COMMIT")?;
        } else if !enabled && self.inner.is_autocommit() {
            self.inner.execute_batch("BEGIN DEFERRED")?;
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<(), SqlSessionError> {
        if !self.inner.is_autocommit() {
            self.inner.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SqlSessionError> {
        if !self.inner.is_autocommit() {
            self.inner.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }

    fn prepare(
        &mut self,
        sql: &str,
        strategy: Prepare,
    ) -> Result<StatementGuard<'_>, SqlSessionError> {
        if strategy == Prepare::Call {
            return Err(SqlSessionError::Unsupported(
                "SQLite has no callable statements".into(),
            ));
        }
        let conn: &rusqlite::Connection = &self.inner;
        let stmt = conn.prepare(sql)?;
        Ok(StatementGuard::new(Box::new(SqlitePrepared { stmt, conn })))
    }
}

/// Prepared statement over rusqlite's raw positional binding API.
struct SqlitePrepared<'c> {
    stmt: rusqlite::Statement<'c>,
    conn: &'c rusqlite::Connection,
}

impl PreparedSql for SqlitePrepared<'_> {
    fn set_null(&mut self, pos: usize) -> Result<(), SqlSessionError> {
        self.stmt.raw_bind_parameter(pos, rusqlite::types::Null)?;
        Ok(())
    }

    fn set_long(&mut self, pos: usize, value: i64) -> Result<(), SqlSessionError> {
        self.stmt.raw_bind_parameter(pos, value)?;
        Ok(())
    }

    fn set_bool(&mut self, pos: usize, value: bool) -> Result<(), SqlSessionError> {
        self.stmt.raw_bind_parameter(pos, value)?;
        Ok(())
    }

    fn set_date(&mut self, pos: usize, value: NaiveDate) -> Result<(), SqlSessionError> {
        self.stmt
            .raw_bind_parameter(pos, params::format_date(value))?;
        Ok(())
    }

    fn set_int(&mut self, pos: usize, value: i32) -> Result<(), SqlSessionError> {
        self.stmt.raw_bind_parameter(pos, i64::from(value))?;
        Ok(())
    }

    fn set_timestamp_utc(
        &mut self,
        pos: usize,
        value: NaiveDateTime,
    ) -> Result<(), SqlSessionError> {
        self.stmt
            .raw_bind_parameter(pos, params::format_timestamp(value))?;
        Ok(())
    }

    fn set_float(&mut self, pos: usize, value: f32) -> Result<(), SqlSessionError> {
        self.stmt.raw_bind_parameter(pos, f64::from(value))?;
        Ok(())
    }

    fn set_bytes(&mut self, pos: usize, value: &[u8]) -> Result<(), SqlSessionError> {
        self.stmt.raw_bind_parameter(pos, value)?;
        Ok(())
    }

    fn set_object(&mut self, pos: usize, value: &SqlValue) -> Result<(), SqlSessionError> {
        self.stmt
            .raw_bind_parameter(pos, params::value_to_sqlite(value))?;
        Ok(())
    }

    fn register_out(&mut self, _pos: usize, _kind: SqlType) -> Result<(), SqlSessionError> {
        Err(SqlSessionError::Unsupported(
            "SQLite has no OUT parameters".into(),
        ))
    }

    fn execute(&mut self) -> Result<Produced, SqlSessionError> {
        query::build_result_set(&mut self.stmt).map(Produced::Rows)
    }

    fn execute_update(&mut self) -> Result<u64, SqlSessionError> {
        let count = self.stmt.raw_execute()?;
        Ok(count as u64)
    }

    fn generated_key(&mut self) -> Result<Option<i64>, SqlSessionError> {
        // Rowids start at 1; 0 means nothing was ever inserted.
        let id = self.conn.last_insert_rowid();
        Ok((id != 0).then_some(id))
    }

    fn out_value(&mut self, _pos: usize) -> Result<SqlValue, SqlSessionError> {
        Err(SqlSessionError::Unsupported(
            "SQLite has no OUT parameters".into(),
        ))
    }

    fn close(&mut self) -> Result<(), SqlSessionError> {
        // rusqlite finalizes the statement when it is dropped.
        Ok(())
    }
}
