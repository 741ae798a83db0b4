//! Contracts at the driver and pool boundary.
//!
//! The session layer never talks to a concrete database library directly;
//! it runs against these traits. A backend (see [`crate::sqlite`]) supplies
//! a [`ConnectionSource`] whose connections hand out prepared statements,
//! and the [`StatementGuard`] scope guarantees every prepared statement is
//! closed exactly once, whatever exit path execution takes.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::error::SqlSessionError;
use crate::results::ResultSet;
use crate::value::{SqlType, SqlValue};

/// The one vendor that must opt in to generated-key retrieval at prepare
/// time. Every other product hands keys back without the flag.
const KEY_OPTIN_VENDOR: &str = "MySQL";

/// How a statement is prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prepare {
    /// Standard prepared statement, no special options.
    Plain,
    /// Prepared statement with auto-generated keys retrievable afterwards.
    WithKeys,
    /// Callable statement for stored-procedure or function invocation.
    Call,
}

impl Prepare {
    /// Strategy for an insert-like statement against the given vendor.
    ///
    /// The match is case-insensitive on the product name. The detection is
    /// deliberately a plain function, not an extension seam.
    #[must_use]
    pub fn for_vendor(vendor: &str) -> Prepare {
        if vendor.eq_ignore_ascii_case(KEY_OPTIN_VENDOR) {
            Prepare::WithKeys
        } else {
            Prepare::Plain
        }
    }
}

/// Raw result of running a prepared statement, handed to an outcome.
#[derive(Debug)]
pub enum Produced {
    /// Materialized rows from the query path (possibly empty).
    Rows(ResultSet),
    /// Affected-row count from the update path.
    Count(u64),
}

impl Produced {
    /// Unwrap the query-path rows.
    ///
    /// # Errors
    ///
    /// Returns [`SqlSessionError::Extraction`] when the statement ran on the
    /// update path and produced a count instead.
    pub fn into_rows(self) -> Result<ResultSet, SqlSessionError> {
        match self {
            Produced::Rows(rows) => Ok(rows),
            Produced::Count(_) => Err(SqlSessionError::Extraction(
                "result carries an update count, not rows".into(),
            )),
        }
    }

    /// Unwrap the update-path count.
    ///
    /// # Errors
    ///
    /// Returns [`SqlSessionError::Extraction`] when the statement ran on the
    /// query path and produced rows instead.
    pub fn count(&self) -> Result<u64, SqlSessionError> {
        match self {
            Produced::Count(count) => Ok(*count),
            Produced::Rows(_) => Err(SqlSessionError::Extraction(
                "result carries rows, not an update count".into(),
            )),
        }
    }
}

/// Whether a statement runs through the query or the update path.
///
/// The choice is fixed per statement variant: `Exec` and `Select` run under
/// [`Request::Execute`]; `Insert`, `Update`, and `ProcCall` run under
/// [`Request::ExecuteUpdate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Execute,
    ExecuteUpdate,
}

impl Request {
    /// Run the statement and wrap whatever it produced.
    ///
    /// # Errors
    ///
    /// Propagates the driver's execution failure unchanged.
    pub fn fetch(&self, stmt: &mut dyn PreparedSql) -> Result<Produced, SqlSessionError> {
        match self {
            Request::Execute => stmt.execute(),
            Request::ExecuteUpdate => stmt.execute_update().map(Produced::Count),
        }
    }
}

/// A driver-owned prepared or callable statement.
///
/// Created per execution by [`Connection::prepare`] and closed exactly once
/// by the [`StatementGuard`] that owns it. Ordinals are 1-based throughout.
pub trait PreparedSql {
    /// # Errors
    /// Propagates the driver's binding failure.
    fn set_null(&mut self, pos: usize) -> Result<(), SqlSessionError>;

    /// # Errors
    /// Propagates the driver's binding failure.
    fn set_long(&mut self, pos: usize, value: i64) -> Result<(), SqlSessionError>;

    /// # Errors
    /// Propagates the driver's binding failure.
    fn set_bool(&mut self, pos: usize, value: bool) -> Result<(), SqlSessionError>;

    /// # Errors
    /// Propagates the driver's binding failure.
    fn set_date(&mut self, pos: usize, value: NaiveDate) -> Result<(), SqlSessionError>;

    /// # Errors
    /// Propagates the driver's binding failure.
    fn set_int(&mut self, pos: usize, value: i32) -> Result<(), SqlSessionError>;

    /// Bind a timestamp already normalized to UTC.
    ///
    /// # Errors
    /// Propagates the driver's binding failure.
    fn set_timestamp_utc(&mut self, pos: usize, value: NaiveDateTime)
    -> Result<(), SqlSessionError>;

    /// # Errors
    /// Propagates the driver's binding failure.
    fn set_float(&mut self, pos: usize, value: f32) -> Result<(), SqlSessionError>;

    /// # Errors
    /// Propagates the driver's binding failure.
    fn set_bytes(&mut self, pos: usize, value: &[u8]) -> Result<(), SqlSessionError>;

    /// Generic binding; the driver infers the SQL type.
    ///
    /// # Errors
    /// Propagates the driver's binding failure.
    fn set_object(&mut self, pos: usize, value: &SqlValue) -> Result<(), SqlSessionError>;

    /// Register an OUT parameter on a callable statement.
    ///
    /// # Errors
    /// Returns [`SqlSessionError::Unsupported`] on drivers without callable
    /// statements.
    fn register_out(&mut self, pos: usize, kind: SqlType) -> Result<(), SqlSessionError>;

    /// Run on the query path, materializing any produced rows.
    ///
    /// # Errors
    /// Propagates the driver's execution failure.
    fn execute(&mut self) -> Result<Produced, SqlSessionError>;

    /// Run on the update path, returning the affected-row count.
    ///
    /// # Errors
    /// Propagates the driver's execution failure.
    fn execute_update(&mut self) -> Result<u64, SqlSessionError>;

    /// First auto-generated key of the preceding execution, if any.
    ///
    /// # Errors
    /// Propagates the driver's failure.
    fn generated_key(&mut self) -> Result<Option<i64>, SqlSessionError>;

    /// Read a registered OUT parameter after execution.
    ///
    /// # Errors
    /// Returns [`SqlSessionError::Unsupported`] on drivers without callable
    /// statements, or [`SqlSessionError::Extraction`] for an unregistered
    /// position.
    fn out_value(&mut self, pos: usize) -> Result<SqlValue, SqlSessionError>;

    /// Release the driver-side handle.
    ///
    /// # Errors
    /// Propagates the driver's failure; the guard logs and swallows it.
    fn close(&mut self) -> Result<(), SqlSessionError>;
}

/// Scoped owner of a prepared statement.
///
/// The guard closes the statement when dropped, so the close runs on every
/// exit path: normal return, binding failure, execution failure, row-mapper
/// failure, extraction failure, and unwinding. Close failures are logged
/// and swallowed; they never mask the error already in flight.
pub struct StatementGuard<'c> {
    inner: Box<dyn PreparedSql + 'c>,
}

impl<'c> StatementGuard<'c> {
    #[must_use]
    pub fn new(stmt: Box<dyn PreparedSql + 'c>) -> Self {
        Self { inner: stmt }
    }
}

impl<'c> std::ops::Deref for StatementGuard<'c> {
    type Target = dyn PreparedSql + 'c;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl std::ops::DerefMut for StatementGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.inner
    }
}

impl Drop for StatementGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.inner.close() {
            warn!(error = %err, "failed to close prepared statement");
        }
    }
}

/// A live database connection borrowed from a pool.
///
/// The session layer toggles autocommit and settles transactions through
/// this trait; it never closes the connection itself. Returning the
/// connection to the pool is the owner's drop behavior.
pub trait Connection {
    /// Database product name, used for vendor-sensitive preparation.
    fn vendor(&self) -> &str;

    /// # Errors
    /// Propagates the driver's failure.
    fn autocommit(&self) -> Result<bool, SqlSessionError>;

    /// # Errors
    /// Propagates the driver's failure.
    fn set_autocommit(&mut self, enabled: bool) -> Result<(), SqlSessionError>;

    /// # Errors
    /// Propagates the driver's failure.
    fn commit(&mut self) -> Result<(), SqlSessionError>;

    /// # Errors
    /// Propagates the driver's failure.
    fn rollback(&mut self) -> Result<(), SqlSessionError>;

    /// Prepare a statement under the given strategy.
    ///
    /// The guard borrows the connection, so the connection cannot be
    /// released while a statement prepared from it is still open.
    ///
    /// # Errors
    /// Propagates the driver's preparation failure unchanged; no retry.
    fn prepare(
        &mut self,
        sql: &str,
        strategy: Prepare,
    ) -> Result<StatementGuard<'_>, SqlSessionError>;
}

/// The pool boundary: borrow a connection, release it by dropping it.
///
/// A session calls [`ConnectionSource::connection`] exactly once per
/// invocation, and the connection's drop must release it back to the pool
/// exactly once, regardless of outcome.
pub trait ConnectionSource {
    type Conn: Connection;

    /// Borrow a connection; may block or fail when the pool is exhausted.
    ///
    /// # Errors
    /// Returns [`SqlSessionError::Pool`] when no connection can be had.
    fn connection(&self) -> Result<Self::Conn, SqlSessionError>;
}
