//! Object-style access layer over relational database clients.
//!
//! Compose a [`Sql`] command, bind typed [`Args`], run it through a
//! [`Session`] (or a [`Transaction`](session::Transaction)) against a
//! pooled connection, and extract a typed value with an
//! [`Outcome`](outcomes::Outcome). The crate's contribution to correctness
//! is resource discipline: a borrowed connection always goes back to its
//! pool, and a prepared statement is always closed, whatever exit path
//! execution takes.
//!
//! ```rust
//! use sql_session::prelude::*;
//! use sql_session::sqlite::SqlitePool;
//!
//! # fn main() -> Result<(), SqlSessionError> {
//! let pool = SqlitePool::memory()?;
//!
//! Session::new(Exec::new("CREATE TABLE user (id INTEGER PRIMARY KEY, name TEXT)"))
//!     .using(&pool)?;
//!
//! let id = Session::new(Insert::new(
//!     "INSERT INTO user (name) VALUES (?)",
//!     Args::new(vec![SqlValue::Text("Jeff".into())]),
//!     LastInsertId,
//! ))
//! .using(&pool)?;
//!
//! let name = Session::new(Select::with_args(
//!     "SELECT name FROM user WHERE id = ?",
//!     Args::new(vec![SqlValue::Long(id)]),
//!     SingleOutcome::<String>::new(),
//! ))
//! .using(&pool)?;
//!
//! assert_eq!(name, "Jeff");
//! # Ok(())
//! # }
//! ```
//!
//! Drivers plug in underneath through the traits in [`driver`]; the
//! [`sqlite`] module ships an r2d2-pooled rusqlite backend.

pub mod args;
pub mod command;
pub mod driver;
pub mod error;
pub mod outcomes;
pub mod prelude;
pub mod results;
pub mod session;
pub mod statements;
pub mod utc;
pub mod value;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use args::Args;
pub use command::Sql;
pub use error::SqlSessionError;
pub use session::{Session, Transaction};
pub use utc::UtcTime;
pub use value::{Scalar, SqlType, SqlValue};
