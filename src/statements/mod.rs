//! Runnable statement variants.
//!
//! Each variant is a pure composition over the driver boundary: pick a
//! preparation strategy for its kind and vendor, bind arguments, run under
//! its fixed request mode, and hand the result plus the statement scope to
//! an outcome. Closures over a connection also implement [`Statement`],
//! which is how multi-statement session bodies are written.

mod exec;
mod insert;
mod proc_call;
mod select;
mod update;

pub use exec::Exec;
pub use insert::Insert;
pub use proc_call::{OutParams, ProcCall};
pub use select::Select;
pub use update::Update;

use crate::driver::Connection;
use crate::error::SqlSessionError;

/// A runnable unit: SQL, arguments, and outcome extraction bound to a live
/// connection.
pub trait Statement<C: Connection> {
    type Output;

    /// Run against the connection and extract the outcome.
    ///
    /// # Errors
    ///
    /// Propagates preparation, binding, execution, and extraction failures
    /// unchanged. The prepared statement is closed on every path.
    fn run(&self, conn: &mut C) -> Result<Self::Output, SqlSessionError>;
}

impl<C, T, F> Statement<C> for F
where
    C: Connection,
    F: Fn(&mut C) -> Result<T, SqlSessionError>,
{
    type Output = T;

    fn run(&self, conn: &mut C) -> Result<T, SqlSessionError> {
        self(conn)
    }
}
