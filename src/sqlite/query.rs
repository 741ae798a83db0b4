use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::SqlSessionError;
use crate::results::ResultSet;
use crate::value::SqlValue;

/// Extract one cell from a SQLite row.
///
/// # Errors
///
/// Returns the driver's failure when the cell cannot be read.
pub(crate) fn extract_value(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> Result<SqlValue, SqlSessionError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Long(i),
        Value::Real(f) => SqlValue::Double(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Bytes(b),
    })
}

/// Run an already-bound statement on the query path and materialize every
/// row. Statements that produce no rows (DDL and the like) still run and
/// yield an empty set.
///
/// # Errors
///
/// Propagates the driver's execution failure unchanged.
pub fn build_result_set(stmt: &mut Statement<'_>) -> Result<ResultSet, SqlSessionError> {
    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = columns.len();
    let mut result_set = ResultSet::with_capacity(columns, 8);

    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            values.push(extract_value(row, idx)?);
        }
        result_set.push_row(values);
    }

    Ok(result_set)
}
