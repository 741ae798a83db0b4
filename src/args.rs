use crate::driver::PreparedSql;
use crate::error::SqlSessionError;
use crate::value::SqlValue;

/// Ordered arguments for a statement's positional placeholders.
///
/// The value at list position `n` is bound at placeholder ordinal `n + 1`
/// (ordinals are 1-based). Binding fewer or more values than the command
/// expects is a caller error surfaced by the driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<SqlValue>,
}

impl Args {
    #[must_use]
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    /// An empty argument list.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Bind every argument at its 1-based ordinal, in order.
    ///
    /// Dispatch is a fixed precedence over the value kind: null, 64-bit
    /// integer, boolean, date, 32-bit integer, UTC instant (which binds
    /// itself), single-precision float, byte sequence; everything else goes
    /// through the driver's generic object binding. No coercion happens
    /// here; unsupported combinations are the driver's to reject.
    ///
    /// # Errors
    ///
    /// Propagates the driver's binding failure unchanged.
    pub fn bind(&self, stmt: &mut dyn PreparedSql) -> Result<(), SqlSessionError> {
        for (idx, value) in self.values.iter().enumerate() {
            let pos = idx + 1;
            match value {
                SqlValue::Null => stmt.set_null(pos)?,
                SqlValue::Long(v) => stmt.set_long(pos, *v)?,
                SqlValue::Bool(v) => stmt.set_bool(pos, *v)?,
                SqlValue::Date(v) => stmt.set_date(pos, *v)?,
                SqlValue::Int(v) => stmt.set_int(pos, *v)?,
                SqlValue::Utc(v) => v.bind(stmt, pos)?,
                SqlValue::Float(v) => stmt.set_float(pos, *v)?,
                SqlValue::Bytes(v) => stmt.set_bytes(pos, v)?,
                other => stmt.set_object(pos, other)?,
            }
        }
        Ok(())
    }
}

impl From<Vec<SqlValue>> for Args {
    fn from(values: Vec<SqlValue>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<SqlValue> for Args {
    fn from_iter<I: IntoIterator<Item = SqlValue>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
