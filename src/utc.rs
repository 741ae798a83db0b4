use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::driver::PreparedSql;
use crate::error::SqlSessionError;

/// Storage format for timestamps, fractional seconds included when present.
const FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// An instant normalized to UTC.
///
/// Unlike the other argument kinds, an instant knows how to place itself
/// onto a prepared statement: [`UtcTime::bind`] hands the driver a naive
/// UTC timestamp, so the stored value is wall-clock-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcTime(DateTime<Utc>);

impl UtcTime {
    #[must_use]
    pub fn new(moment: DateTime<Utc>) -> Self {
        Self(moment)
    }

    /// The current instant.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    #[must_use]
    pub fn datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// The instant as a naive timestamp in UTC.
    #[must_use]
    pub fn naive(&self) -> NaiveDateTime {
        self.0.naive_utc()
    }

    /// Bind this instant at the given 1-based position.
    ///
    /// # Errors
    ///
    /// Propagates the driver's binding failure unchanged.
    pub fn bind(&self, stmt: &mut dyn PreparedSql, pos: usize) -> Result<(), SqlSessionError> {
        stmt.set_timestamp_utc(pos, self.naive())
    }

    /// Parse a timestamp in the storage format, with or without fractional
    /// seconds.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(text, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }
}

impl From<DateTime<Utc>> for UtcTime {
    fn from(moment: DateTime<Utc>) -> Self {
        Self(moment)
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.naive().format(FORMAT))
    }
}
