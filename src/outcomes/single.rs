use std::marker::PhantomData;

use crate::driver::{Produced, StatementGuard};
use crate::error::SqlSessionError;
use crate::value::Scalar;

use super::Outcome;

/// The sole row's first column, converted to one scalar kind.
///
/// Extraction fails fast when the result holds more than one row, and fails
/// when it holds none. The supported target set is the sealed [`Scalar`]
/// trait, so an unsupported target type is rejected before any statement
/// runs.
pub struct SingleOutcome<T: Scalar> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: Scalar> SingleOutcome<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Scalar> Default for SingleOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> Outcome for SingleOutcome<T> {
    type Output = T;

    fn handle(
        &self,
        produced: Produced,
        _stmt: StatementGuard<'_>,
    ) -> Result<T, SqlSessionError> {
        let rows = produced.into_rows()?;
        if rows.len() > 1 {
            return Err(SqlSessionError::Extraction(format!(
                "expected a single row, result has {}",
                rows.len()
            )));
        }
        let row = rows
            .first()
            .ok_or_else(|| SqlSessionError::Extraction("result has no rows".into()))?;
        let cell = row
            .get_by_index(0)
            .ok_or_else(|| SqlSessionError::Extraction("row has no first column".into()))?;
        T::from_value(cell)
    }
}
