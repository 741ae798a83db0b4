//! Outcome strategies: turn a raw execution result into a typed value.
//!
//! Every outcome consumes the [`StatementGuard`] alongside the result, so
//! the prepared statement is closed exactly once on every path, including
//! when extraction itself fails. That post-condition belongs to the guard,
//! not to any individual outcome.
//!
//! Besides the types here, any `Fn(&ResultSet) -> Result<T, SqlSessionError>`
//! closure acts as an outcome over the query path.

mod list;
mod single;
mod stored_proc;

pub use list::{ColumnOutcome, ListOutcome};
pub use single::SingleOutcome;
pub use stored_proc::StoredProcOutcome;

use crate::driver::{PreparedSql, Produced, StatementGuard};
use crate::error::SqlSessionError;
use crate::results::ResultSet;

/// Converts a raw execution result and the statement scope into a typed
/// value.
pub trait Outcome {
    type Output;

    /// Extract the value. Dropping `stmt` (on return or on failure) is what
    /// closes the statement.
    ///
    /// # Errors
    ///
    /// Returns [`SqlSessionError::Extraction`] when the produced result does
    /// not hold what this outcome expects.
    fn handle(
        &self,
        produced: Produced,
        stmt: StatementGuard<'_>,
    ) -> Result<Self::Output, SqlSessionError>;
}

/// Outcome for statements run purely for effect.
pub struct Void;

impl Outcome for Void {
    type Output = ();

    fn handle(
        &self,
        produced: Produced,
        stmt: StatementGuard<'_>,
    ) -> Result<(), SqlSessionError> {
        drop(produced);
        drop(stmt);
        Ok(())
    }
}

/// Number of rows affected on the update path.
pub struct UpdateCount;

impl Outcome for UpdateCount {
    type Output = u64;

    fn handle(
        &self,
        produced: Produced,
        _stmt: StatementGuard<'_>,
    ) -> Result<u64, SqlSessionError> {
        produced.count()
    }
}

/// First auto-generated key of an insert, as a 64-bit integer.
pub struct LastInsertId;

impl Outcome for LastInsertId {
    type Output = i64;

    fn handle(
        &self,
        produced: Produced,
        mut stmt: StatementGuard<'_>,
    ) -> Result<i64, SqlSessionError> {
        drop(produced);
        stmt.generated_key()?.ok_or_else(|| {
            SqlSessionError::Extraction("insert generated no key".into())
        })
    }
}

/// Whether the query produced zero rows.
pub struct Empty;

impl Outcome for Empty {
    type Output = bool;

    fn handle(
        &self,
        produced: Produced,
        _stmt: StatementGuard<'_>,
    ) -> Result<bool, SqlSessionError> {
        Ok(produced.into_rows()?.is_empty())
    }
}

impl<T, F> Outcome for F
where
    F: Fn(&ResultSet) -> Result<T, SqlSessionError>,
{
    type Output = T;

    fn handle(
        &self,
        produced: Produced,
        stmt: StatementGuard<'_>,
    ) -> Result<T, SqlSessionError> {
        let rows = produced.into_rows()?;
        let out = self(&rows);
        drop(stmt);
        out
    }
}
