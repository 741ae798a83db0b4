use crate::args::Args;
use crate::command::Sql;
use crate::driver::{Connection, Prepare, Request};
use crate::error::SqlSessionError;
use crate::outcomes::Outcome;

use super::Statement;

/// A query whose rows are handed to an outcome.
///
/// The outcome may be one of the extractors in [`crate::outcomes`] or any
/// `Fn(&ResultSet) -> Result<T, _>` closure.
pub struct Select<O> {
    sql: Sql,
    args: Args,
    outcome: O,
}

impl<O> Select<O> {
    pub fn new(sql: impl Into<Sql>, outcome: O) -> Self {
        Self::with_args(sql, Args::none(), outcome)
    }

    pub fn with_args(sql: impl Into<Sql>, args: Args, outcome: O) -> Self {
        Self {
            sql: sql.into(),
            args,
            outcome,
        }
    }
}

impl<C: Connection, O: Outcome> Statement<C> for Select<O> {
    type Output = O::Output;

    fn run(&self, conn: &mut C) -> Result<O::Output, SqlSessionError> {
        let mut stmt = conn.prepare(self.sql.as_str(), Prepare::Plain)?;
        self.args.bind(&mut *stmt)?;
        let produced = Request::Execute.fetch(&mut *stmt)?;
        self.outcome.handle(produced, stmt)
    }
}
