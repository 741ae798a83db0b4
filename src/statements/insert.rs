use crate::args::Args;
use crate::command::Sql;
use crate::driver::{Connection, Prepare, Request};
use crate::error::SqlSessionError;
use crate::outcomes::{Outcome, Void};

use super::Statement;

/// An INSERT with a chosen outcome.
///
/// On the one vendor that requires it, the statement is prepared with
/// generated-key retrieval enabled; everywhere else a plain preparation
/// already hands keys back, so [`crate::outcomes::LastInsertId`] works
/// either way.
pub struct Insert<O> {
    sql: Sql,
    args: Args,
    outcome: O,
}

impl<O> Insert<O> {
    pub fn new(sql: impl Into<Sql>, args: Args, outcome: O) -> Self {
        Self {
            sql: sql.into(),
            args,
            outcome,
        }
    }
}

impl Insert<Void> {
    /// An insert run only for effect.
    pub fn plain(sql: impl Into<Sql>, args: Args) -> Self {
        Self::new(sql, args, Void)
    }
}

impl<C: Connection, O: Outcome> Statement<C> for Insert<O> {
    type Output = O::Output;

    fn run(&self, conn: &mut C) -> Result<O::Output, SqlSessionError> {
        let strategy = Prepare::for_vendor(conn.vendor());
        let mut stmt = conn.prepare(self.sql.as_str(), strategy)?;
        self.args.bind(&mut *stmt)?;
        let produced = Request::ExecuteUpdate.fetch(&mut *stmt)?;
        self.outcome.handle(produced, stmt)
    }
}
