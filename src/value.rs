use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use crate::error::SqlSessionError;
use crate::utc::UtcTime;

/// A database value, used both for statement arguments and for result cells.
///
/// One enum across backends so statements and outcomes never branch on
/// driver types:
/// ```rust
/// use sql_session::SqlValue;
///
/// let args = vec![
///     SqlValue::Long(1),
///     SqlValue::Text("alice".into()),
///     SqlValue::Bool(true),
/// ];
/// # let _ = args;
/// ```
///
/// Variant order matches the binder's dispatch precedence; see
/// [`Args::bind`](crate::args::Args::bind).
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value
    Null,
    /// Integer value (64-bit)
    Long(i64),
    /// Boolean value
    Bool(bool),
    /// Date-only value
    Date(NaiveDate),
    /// Integer value (32-bit)
    Int(i32),
    /// Instant normalized to UTC; binds itself as a timestamp
    Utc(UtcTime),
    /// Floating point value (single precision)
    Float(f32),
    /// Binary data
    Bytes(Vec<u8>),
    /// Text/string value; bound through the generic object path
    Text(String),
    /// Floating point value (64-bit); bound through the generic object path
    Double(f64),
    /// Arbitrary-precision decimal; bound through the generic object path
    Decimal(Decimal),
    /// JSON value; bound through the generic object path
    Json(JsonValue),
}

impl SqlValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            SqlValue::Long(value) => Some(*value),
            SqlValue::Int(value) => Some(i64::from(*value)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            SqlValue::Int(value) => Some(*value),
            SqlValue::Long(value) => i32::try_from(*value).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(value) => Some(*value),
            SqlValue::Long(0) | SqlValue::Int(0) => Some(false),
            SqlValue::Long(1) | SqlValue::Int(1) => Some(true),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            SqlValue::Double(value) => Some(*value),
            SqlValue::Float(value) => Some(f64::from(*value)),
            SqlValue::Long(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            SqlValue::Float(value) => Some(*value),
            SqlValue::Double(value) => Some(*value as f32),
            _ => None,
        }
    }

    /// Date-only view; text cells are parsed as `YYYY-MM-DD`.
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            SqlValue::Date(value) => Some(*value),
            SqlValue::Text(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
            _ => None,
        }
    }

    /// UTC-instant view; text cells are parsed in the storage format.
    #[must_use]
    pub fn as_utc(&self) -> Option<UtcTime> {
        match self {
            SqlValue::Utc(value) => Some(*value),
            SqlValue::Text(s) => UtcTime::parse(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        if let SqlValue::Bytes(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            SqlValue::Decimal(value) => Some(*value),
            SqlValue::Long(value) => Some(Decimal::from(*value)),
            SqlValue::Int(value) => Some(Decimal::from(*value)),
            SqlValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        if let SqlValue::Json(value) = self {
            Some(value)
        } else {
            None
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Long(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self {
        SqlValue::Float(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Double(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_owned())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Bytes(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

impl From<UtcTime> for SqlValue {
    fn from(value: UtcTime) -> Self {
        SqlValue::Utc(value)
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        SqlValue::Decimal(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// SQL type tags for OUT-parameter registration on callable statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Long,
    Int,
    Float,
    Double,
    Bool,
    Date,
    Timestamp,
    Bytes,
    Text,
    Decimal,
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for i64 {}
    impl Sealed for i32 {}
    impl Sealed for f64 {}
    impl Sealed for f32 {}
    impl Sealed for bool {}
    impl Sealed for String {}
    impl Sealed for Vec<u8> {}
    impl Sealed for chrono::NaiveDate {}
    impl Sealed for crate::utc::UtcTime {}
    impl Sealed for rust_decimal::Decimal {}
}

/// The closed set of scalar targets a single-value or column outcome may
/// extract into: numeric, boolean, temporal, byte-sequence, string,
/// UTC-timestamp, and decimal kinds. The trait is sealed, so a request for
/// any other target is rejected before any statement runs.
pub trait Scalar: sealed::Sealed + Sized {
    /// Target name used in extraction error messages.
    const TARGET: &'static str;

    /// Convert a result cell into this scalar.
    ///
    /// # Errors
    ///
    /// Returns [`SqlSessionError::Extraction`] when the cell does not hold a
    /// value representable as this scalar.
    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError>;
}

fn mismatch(value: &SqlValue, target: &str) -> SqlSessionError {
    SqlSessionError::Extraction(format!("cannot read {value:?} as {target}"))
}

impl Scalar for i64 {
    const TARGET: &'static str = "i64";

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        value.as_long().ok_or_else(|| mismatch(value, Self::TARGET))
    }
}

impl Scalar for i32 {
    const TARGET: &'static str = "i32";

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        value.as_int().ok_or_else(|| mismatch(value, Self::TARGET))
    }
}

impl Scalar for f64 {
    const TARGET: &'static str = "f64";

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        value
            .as_double()
            .ok_or_else(|| mismatch(value, Self::TARGET))
    }
}

impl Scalar for f32 {
    const TARGET: &'static str = "f32";

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        value.as_float().ok_or_else(|| mismatch(value, Self::TARGET))
    }
}

impl Scalar for bool {
    const TARGET: &'static str = "bool";

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        value.as_bool().ok_or_else(|| mismatch(value, Self::TARGET))
    }
}

impl Scalar for String {
    const TARGET: &'static str = "String";

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        match value {
            SqlValue::Text(s) => Ok(s.clone()),
            SqlValue::Long(v) => Ok(v.to_string()),
            SqlValue::Int(v) => Ok(v.to_string()),
            SqlValue::Double(v) => Ok(v.to_string()),
            SqlValue::Float(v) => Ok(v.to_string()),
            SqlValue::Bool(v) => Ok(v.to_string()),
            SqlValue::Decimal(v) => Ok(v.to_string()),
            SqlValue::Date(v) => Ok(v.format("%Y-%m-%d").to_string()),
            SqlValue::Utc(v) => Ok(v.to_string()),
            SqlValue::Json(v) => Ok(v.to_string()),
            _ => Err(mismatch(value, Self::TARGET)),
        }
    }
}

impl Scalar for Vec<u8> {
    const TARGET: &'static str = "Vec<u8>";

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        value
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| mismatch(value, Self::TARGET))
    }
}

impl Scalar for NaiveDate {
    const TARGET: &'static str = "NaiveDate";

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        value.as_date().ok_or_else(|| mismatch(value, Self::TARGET))
    }
}

impl Scalar for UtcTime {
    const TARGET: &'static str = "UtcTime";

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        value.as_utc().ok_or_else(|| mismatch(value, Self::TARGET))
    }
}

impl Scalar for Decimal {
    const TARGET: &'static str = "Decimal";

    fn from_value(value: &SqlValue) -> Result<Self, SqlSessionError> {
        value
            .as_decimal()
            .ok_or_else(|| mismatch(value, Self::TARGET))
    }
}
