use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;

/// Errors surfaced by sessions, statements, and outcomes.
///
/// The crate recovers nothing locally except resource release; every failure
/// is surfaced to the caller as-is, wrapped in the variant matching the stage
/// it came from.
#[derive(Debug, Error)]
pub enum SqlSessionError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("invalid outcome construction: {0}")]
    Construction(String),

    #[error("parameter binding error: {0}")]
    Parameter(String),

    #[error("statement execution error: {0}")]
    Execution(String),

    #[error("outcome extraction error: {0}")]
    Extraction(String),

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// A transactional body failed and the rollback that followed failed too.
    #[error("rollback failed: {rollback}; original error: {original}")]
    Rollback {
        original: Box<SqlSessionError>,
        rollback: Box<SqlSessionError>,
    },
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for SqlSessionError {
    fn from(err: r2d2::Error) -> Self {
        SqlSessionError::Pool(err.to_string())
    }
}
