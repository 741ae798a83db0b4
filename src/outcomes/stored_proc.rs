use crate::driver::{PreparedSql, Produced, StatementGuard};
use crate::error::SqlSessionError;
use crate::value::SqlValue;

use super::Outcome;

/// Reads registered OUT-parameter positions from a callable statement after
/// execution, in the order given.
pub struct StoredProcOutcome {
    positions: Vec<usize>,
}

impl StoredProcOutcome {
    /// Build an outcome over the given 1-based OUT positions.
    ///
    /// # Errors
    ///
    /// Returns [`SqlSessionError::Construction`] for an empty position list
    /// or a zero ordinal, before any statement runs.
    pub fn new(positions: impl Into<Vec<usize>>) -> Result<Self, SqlSessionError> {
        let positions = positions.into();
        if positions.is_empty() {
            return Err(SqlSessionError::Construction(
                "stored-procedure outcome needs at least one OUT position".into(),
            ));
        }
        if positions.contains(&0) {
            return Err(SqlSessionError::Construction(
                "OUT positions are 1-based; 0 is not a valid ordinal".into(),
            ));
        }
        Ok(Self { positions })
    }
}

impl Outcome for StoredProcOutcome {
    type Output = Vec<SqlValue>;

    fn handle(
        &self,
        produced: Produced,
        mut stmt: StatementGuard<'_>,
    ) -> Result<Vec<SqlValue>, SqlSessionError> {
        drop(produced);
        let mut out = Vec::with_capacity(self.positions.len());
        for &pos in &self.positions {
            out.push(stmt.out_value(pos)?);
        }
        Ok(out)
    }
}
