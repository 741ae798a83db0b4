use crate::args::Args;
use crate::command::Sql;
use crate::driver::{Connection, Prepare, Request};
use crate::error::SqlSessionError;
use crate::outcomes::{Outcome, Void};

use super::Statement;

/// Runs a statement purely for effect: DDL, maintenance commands, and the
/// like. No outcome beyond success or failure.
pub struct Exec {
    sql: Sql,
    args: Args,
}

impl Exec {
    pub fn new(sql: impl Into<Sql>) -> Self {
        Self {
            sql: sql.into(),
            args: Args::none(),
        }
    }

    pub fn with_args(sql: impl Into<Sql>, args: Args) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

impl<C: Connection> Statement<C> for Exec {
    type Output = ();

    fn run(&self, conn: &mut C) -> Result<(), SqlSessionError> {
        let strategy = Prepare::for_vendor(conn.vendor());
        let mut stmt = conn.prepare(self.sql.as_str(), strategy)?;
        self.args.bind(&mut *stmt)?;
        let produced = Request::Execute.fetch(&mut *stmt)?;
        Void.handle(produced, stmt)
    }
}
