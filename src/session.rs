//! Session wrappers: borrow a pooled connection, run a statement, settle,
//! release.
//!
//! Release is unconditional: the borrowed connection goes back to the pool
//! by being dropped, on every exit path. The transactional wrapper
//! additionally brackets the statement between an autocommit toggle and a
//! commit-or-rollback settle step.

use tracing::{debug, warn};

use crate::driver::{Connection, ConnectionSource};
use crate::error::SqlSessionError;
use crate::statements::Statement;

/// Runs a statement on a borrowed connection under the vendor's ambient
/// commit-per-statement behavior.
///
/// ```rust
/// use sql_session::prelude::*;
/// use sql_session::sqlite::SqlitePool;
///
/// # fn main() -> Result<(), SqlSessionError> {
/// let pool = SqlitePool::memory()?;
/// Session::new(Exec::new("CREATE TABLE user (name TEXT)")).using(&pool)?;
/// # Ok(())
/// # }
/// ```
pub struct Session<St> {
    stmt: St,
}

impl<St> Session<St> {
    pub fn new(stmt: St) -> Self {
        Self { stmt }
    }

    /// Borrow a connection, run the statement, release.
    ///
    /// # Errors
    ///
    /// Returns the pool's failure when no connection can be borrowed, or the
    /// statement's failure unchanged. The connection is released either way.
    pub fn using<S>(&self, source: &S) -> Result<St::Output, SqlSessionError>
    where
        S: ConnectionSource,
        St: Statement<S::Conn>,
    {
        let mut conn = source.connection()?;
        self.stmt.run(&mut conn)
    }
}

/// Runs a statement inside a single transaction: autocommit off after
/// borrowing, commit on normal return, rollback on any failure, autocommit
/// restored before release.
///
/// The statement is usually a closure body composing several statement
/// variants, which then commit or roll back as one unit.
pub struct Transaction<St> {
    stmt: St,
}

impl<St> Transaction<St> {
    pub fn new(stmt: St) -> Self {
        Self { stmt }
    }

    /// Borrow a connection, run the statement transactionally, release.
    ///
    /// Any failure of the body rolls back everything the body did, whatever
    /// the failure kind. If the rollback itself fails, both errors surface
    /// together as [`SqlSessionError::Rollback`]. A failed autocommit
    /// restore is logged and swallowed; the settled result stands.
    ///
    /// # Errors
    ///
    /// Returns the pool's, the body's, or the settle step's failure. The
    /// connection is released on every path.
    pub fn using<S>(&self, source: &S) -> Result<St::Output, SqlSessionError>
    where
        S: ConnectionSource,
        St: Statement<S::Conn>,
    {
        let mut conn = source.connection()?;
        conn.set_autocommit(false)?;
        let settled = match self.stmt.run(&mut conn) {
            Ok(value) => conn.commit().map(|()| value),
            Err(original) => {
                debug!(error = %original, "transaction body failed, rolling back");
                Err(match conn.rollback() {
                    Ok(()) => original,
                    Err(rollback) => SqlSessionError::Rollback {
                        original: Box::new(original),
                        rollback: Box::new(rollback),
                    },
                })
            }
        };
        if let Err(err) = conn.set_autocommit(true) {
            warn!(error = %err, "failed to restore autocommit before release");
        }
        settled
    }
}
