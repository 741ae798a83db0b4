use crate::args::Args;
use crate::command::Sql;
use crate::driver::{Connection, Prepare, Request};
use crate::error::SqlSessionError;
use crate::outcomes::{Outcome, Void};

use super::Statement;

/// An UPDATE (or DELETE) with a chosen outcome, typically
/// [`crate::outcomes::UpdateCount`].
pub struct Update<O> {
    sql: Sql,
    args: Args,
    outcome: O,
}

impl<O> Update<O> {
    pub fn new(sql: impl Into<Sql>, args: Args, outcome: O) -> Self {
        Self {
            sql: sql.into(),
            args,
            outcome,
        }
    }
}

impl Update<Void> {
    /// An update run only for effect.
    pub fn plain(sql: impl Into<Sql>, args: Args) -> Self {
        Self::new(sql, args, Void)
    }
}

impl<C: Connection, O: Outcome> Statement<C> for Update<O> {
    type Output = O::Output;

    fn run(&self, conn: &mut C) -> Result<O::Output, SqlSessionError> {
        let mut stmt = conn.prepare(self.sql.as_str(), Prepare::Plain)?;
        self.args.bind(&mut *stmt)?;
        let produced = Request::ExecuteUpdate.fetch(&mut *stmt)?;
        self.outcome.handle(produced, stmt)
    }
}
