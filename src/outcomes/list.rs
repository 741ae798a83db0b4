use std::marker::PhantomData;

use crate::driver::{Produced, StatementGuard};
use crate::error::SqlSessionError;
use crate::results::Row;
use crate::value::Scalar;

use super::Outcome;

/// Maps every row through a caller-supplied function.
///
/// A mapper failure stops iteration and propagates; the statement is closed
/// before the failure surfaces.
pub struct ListOutcome<T, F>
where
    F: Fn(&Row) -> Result<T, SqlSessionError>,
{
    mapper: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> ListOutcome<T, F>
where
    F: Fn(&Row) -> Result<T, SqlSessionError>,
{
    pub fn new(mapper: F) -> Self {
        Self {
            mapper,
            _marker: PhantomData,
        }
    }
}

impl<T, F> Outcome for ListOutcome<T, F>
where
    F: Fn(&Row) -> Result<T, SqlSessionError>,
{
    type Output = Vec<T>;

    fn handle(
        &self,
        produced: Produced,
        _stmt: StatementGuard<'_>,
    ) -> Result<Vec<T>, SqlSessionError> {
        let rows = produced.into_rows()?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push((self.mapper)(row)?);
        }
        Ok(out)
    }
}

/// First column of every row, converted to one scalar kind.
pub struct ColumnOutcome<T: Scalar> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: Scalar> ColumnOutcome<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Scalar> Default for ColumnOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> Outcome for ColumnOutcome<T> {
    type Output = Vec<T>;

    fn handle(
        &self,
        produced: Produced,
        _stmt: StatementGuard<'_>,
    ) -> Result<Vec<T>, SqlSessionError> {
        let rows = produced.into_rows()?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let cell = row.get_by_index(0).ok_or_else(|| {
                SqlSessionError::Extraction("row has no first column".into())
            })?;
            out.push(T::from_value(cell)?);
        }
        Ok(out)
    }
}
