use crate::args::Args;
use crate::command::Sql;
use crate::driver::{Connection, Prepare, PreparedSql, Request};
use crate::error::SqlSessionError;
use crate::outcomes::Outcome;

use super::Statement;

/// Caller-supplied hook that registers OUT parameters on a callable
/// statement before execution.
pub type OutParams = dyn Fn(&mut dyn PreparedSql) -> Result<(), SqlSessionError>;

/// A stored-procedure or function invocation.
///
/// Input arguments bind positionally like any other statement; OUT
/// parameters are registered by the caller's hook and read back by a
/// [`crate::outcomes::StoredProcOutcome`].
pub struct ProcCall<O> {
    sql: Sql,
    args: Args,
    out_params: Option<Box<OutParams>>,
    outcome: O,
}

impl<O> ProcCall<O> {
    pub fn new(sql: impl Into<Sql>, args: Args, outcome: O) -> Self {
        Self {
            sql: sql.into(),
            args,
            out_params: None,
            outcome,
        }
    }

    pub fn with_out(
        sql: impl Into<Sql>,
        out_params: impl Fn(&mut dyn PreparedSql) -> Result<(), SqlSessionError> + 'static,
        outcome: O,
    ) -> Self {
        Self::full(sql, Args::none(), out_params, outcome)
    }

    pub fn full(
        sql: impl Into<Sql>,
        args: Args,
        out_params: impl Fn(&mut dyn PreparedSql) -> Result<(), SqlSessionError> + 'static,
        outcome: O,
    ) -> Self {
        Self {
            sql: sql.into(),
            args,
            out_params: Some(Box::new(out_params)),
            outcome,
        }
    }
}

impl<C: Connection, O: Outcome> Statement<C> for ProcCall<O> {
    type Output = O::Output;

    fn run(&self, conn: &mut C) -> Result<O::Output, SqlSessionError> {
        let mut stmt = conn.prepare(self.sql.as_str(), Prepare::Call)?;
        self.args.bind(&mut *stmt)?;
        if let Some(out_params) = &self.out_params {
            out_params(&mut *stmt)?;
        }
        let produced = Request::ExecuteUpdate.fetch(&mut *stmt)?;
        self.outcome.handle(produced, stmt)
    }
}
