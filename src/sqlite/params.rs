use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;

use crate::value::SqlValue;

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%F %T%.f").to_string()
}

/// Convert a [`SqlValue`] into a SQLite value.
///
/// Dates, timestamps, decimals, and JSON are stored as text; booleans as
/// 0/1 integers.
#[must_use]
pub fn value_to_sqlite(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Long(i) => Value::Integer(*i),
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        SqlValue::Date(d) => Value::Text(format_date(*d)),
        SqlValue::Int(i) => Value::Integer(i64::from(*i)),
        SqlValue::Utc(u) => Value::Text(format_timestamp(u.naive())),
        SqlValue::Float(f) => Value::Real(f64::from(*f)),
        SqlValue::Bytes(b) => Value::Blob(b.clone()),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Double(f) => Value::Real(*f),
        SqlValue::Decimal(d) => Value::Text(d.to_string()),
        SqlValue::Json(j) => Value::Text(j.to_string()),
    }
}
