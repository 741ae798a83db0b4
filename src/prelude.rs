//! Convenient imports for common functionality.

pub use crate::args::Args;
pub use crate::command::Sql;
pub use crate::driver::{
    Connection, ConnectionSource, Prepare, PreparedSql, Produced, Request, StatementGuard,
};
pub use crate::error::SqlSessionError;
pub use crate::outcomes::{
    ColumnOutcome, Empty, LastInsertId, ListOutcome, Outcome, SingleOutcome, StoredProcOutcome,
    UpdateCount, Void,
};
pub use crate::results::{ResultSet, Row};
pub use crate::session::{Session, Transaction};
pub use crate::statements::{Exec, Insert, ProcCall, Select, Statement, Update};
pub use crate::utc::UtcTime;
pub use crate::value::{Scalar, SqlType, SqlValue};
