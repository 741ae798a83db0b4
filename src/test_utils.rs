//! Instrumented in-memory driver for exercising session, binding, and
//! outcome mechanics without a database.
//!
//! Enabled with the `test-utils` feature. The fake records every borrow,
//! release, preparation, bind, settle, and close in a shared [`Ledger`]
//! that tests inspect afterwards, and runs statements against a scripted
//! [`Script`] instead of a real engine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, NaiveDateTime};

use crate::driver::{Connection, ConnectionSource, Prepare, PreparedSql, Produced, StatementGuard};
use crate::error::SqlSessionError;
use crate::results::ResultSet;
use crate::value::{SqlType, SqlValue};

/// Which driver setter a value went through, with the value it carried.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Null,
    Long(i64),
    Bool(bool),
    Date(NaiveDate),
    Int(i32),
    TimestampUtc(NaiveDateTime),
    Float(f32),
    Bytes(Vec<u8>),
    Object(SqlValue),
}

/// Everything the fake driver observed.
#[derive(Debug, Default)]
pub struct Ledger {
    pub borrows: usize,
    pub releases: usize,
    pub commits: usize,
    pub rollbacks: usize,
    /// Autocommit values in the order they were set.
    pub autocommit_changes: Vec<bool>,
    /// SQL text and strategy of every preparation.
    pub prepared: Vec<(String, Prepare)>,
    /// Ordinal and setter of every bind, in bind order.
    pub binds: Vec<(usize, Bound)>,
    pub registered_out: Vec<(usize, SqlType)>,
    pub closes: usize,
}

/// Scripted behavior for fake statements.
#[derive(Debug, Clone, Default)]
pub struct Script {
    rows: Option<ResultSet>,
    update_count: u64,
    generated_key: Option<i64>,
    out_values: Vec<(usize, SqlValue)>,
    fail_execute: Option<String>,
    fail_close: bool,
}

impl Script {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows the query path will produce.
    #[must_use]
    pub fn rows(mut self, rows: ResultSet) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Count the update path will produce.
    #[must_use]
    pub fn update_count(mut self, count: u64) -> Self {
        self.update_count = count;
        self
    }

    #[must_use]
    pub fn generated_key(mut self, key: i64) -> Self {
        self.generated_key = Some(key);
        self
    }

    /// Value readable at an OUT position after execution.
    #[must_use]
    pub fn out_value(mut self, pos: usize, value: SqlValue) -> Self {
        self.out_values.push((pos, value));
        self
    }

    /// Make both execution paths fail with the given message.
    #[must_use]
    pub fn fail_execute(mut self, message: impl Into<String>) -> Self {
        self.fail_execute = Some(message.into());
        self
    }

    /// Make the statement's close fail (the guard swallows and logs it).
    #[must_use]
    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }
}

/// Build a result set from literal columns and rows.
#[must_use]
pub fn result_set(columns: &[&str], rows: Vec<Vec<SqlValue>>) -> ResultSet {
    let mut set = ResultSet::with_capacity(
        columns.iter().map(|c| (*c).to_owned()).collect(),
        rows.len(),
    );
    for row in rows {
        set.push_row(row);
    }
    set
}

fn lock(ledger: &Mutex<Ledger>) -> MutexGuard<'_, Ledger> {
    ledger.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fake connection source with scripted statements and observable counters.
#[derive(Clone, Default)]
pub struct FakeSource {
    ledger: Arc<Mutex<Ledger>>,
    vendor: String,
    script: Script,
    fail_borrow: bool,
    fail_commit: bool,
    fail_rollback: bool,
}

impl FakeSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            vendor: "FakeDB".into(),
            ..Self::default()
        }
    }

    /// Product name reported by borrowed connections.
    #[must_use]
    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    /// Script applied to every statement prepared on this source.
    #[must_use]
    pub fn script(mut self, script: Script) -> Self {
        self.script = script;
        self
    }

    /// Make borrowing fail, as an exhausted pool would.
    #[must_use]
    pub fn fail_borrow(mut self) -> Self {
        self.fail_borrow = true;
        self
    }

    #[must_use]
    pub fn fail_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    #[must_use]
    pub fn fail_rollback(mut self) -> Self {
        self.fail_rollback = true;
        self
    }

    /// Inspect everything the driver observed so far.
    pub fn ledger(&self) -> MutexGuard<'_, Ledger> {
        lock(&self.ledger)
    }
}

impl ConnectionSource for FakeSource {
    type Conn = FakeConnection;

    fn connection(&self) -> Result<FakeConnection, SqlSessionError> {
        if self.fail_borrow {
            return Err(SqlSessionError::Pool("scripted borrow failure".into()));
        }
        lock(&self.ledger).borrows += 1;
        Ok(FakeConnection {
            ledger: Arc::clone(&self.ledger),
            vendor: self.vendor.clone(),
            script: self.script.clone(),
            autocommit: true,
            fail_commit: self.fail_commit,
            fail_rollback: self.fail_rollback,
        })
    }
}

/// Fake connection; dropping it counts as the pool release.
pub struct FakeConnection {
    ledger: Arc<Mutex<Ledger>>,
    vendor: String,
    script: Script,
    autocommit: bool,
    fail_commit: bool,
    fail_rollback: bool,
}

impl Connection for FakeConnection {
    fn vendor(&self) -> &str {
        &self.vendor
    }

    fn autocommit(&self) -> Result<bool, SqlSessionError> {
        Ok(self.autocommit)
    }

    fn set_autocommit(&mut self, enabled: bool) -> Result<(), SqlSessionError> {
        self.autocommit = enabled;
        lock(&self.ledger).autocommit_changes.push(enabled);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), SqlSessionError> {
        if self.fail_commit {
            return Err(SqlSessionError::Execution("scripted commit failure".into()));
        }
        lock(&self.ledger).commits += 1;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SqlSessionError> {
        if self.fail_rollback {
            return Err(SqlSessionError::Execution(
                "scripted rollback failure".into(),
            ));
        }
        lock(&self.ledger).rollbacks += 1;
        Ok(())
    }

    fn prepare(
        &mut self,
        sql: &str,
        strategy: Prepare,
    ) -> Result<StatementGuard<'_>, SqlSessionError> {
        lock(&self.ledger).prepared.push((sql.to_owned(), strategy));
        let stmt = FakeStatement {
            ledger: Arc::clone(&self.ledger),
            script: self.script.clone(),
            closes: Arc::new(AtomicUsize::new(0)),
        };
        Ok(StatementGuard::new(Box::new(stmt)))
    }
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        lock(&self.ledger).releases += 1;
    }
}

/// Fake prepared statement, usable standalone for direct outcome tests.
pub struct FakeStatement {
    ledger: Arc<Mutex<Ledger>>,
    script: Script,
    closes: Arc<AtomicUsize>,
}

impl FakeStatement {
    #[must_use]
    pub fn new(script: Script) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(Ledger::default())),
            script,
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle to this statement's close counter, valid after the statement
    /// has been boxed into a guard.
    #[must_use]
    pub fn closes(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }

    /// Wrap into the scope guard an outcome expects.
    #[must_use]
    pub fn into_guard(self) -> StatementGuard<'static> {
        StatementGuard::new(Box::new(self))
    }
}

impl PreparedSql for FakeStatement {
    fn set_null(&mut self, pos: usize) -> Result<(), SqlSessionError> {
        lock(&self.ledger).binds.push((pos, Bound::Null));
        Ok(())
    }

    fn set_long(&mut self, pos: usize, value: i64) -> Result<(), SqlSessionError> {
        lock(&self.ledger).binds.push((pos, Bound::Long(value)));
        Ok(())
    }

    fn set_bool(&mut self, pos: usize, value: bool) -> Result<(), SqlSessionError> {
        lock(&self.ledger).binds.push((pos, Bound::Bool(value)));
        Ok(())
    }

    fn set_date(&mut self, pos: usize, value: NaiveDate) -> Result<(), SqlSessionError> {
        lock(&self.ledger).binds.push((pos, Bound::Date(value)));
        Ok(())
    }

    fn set_int(&mut self, pos: usize, value: i32) -> Result<(), SqlSessionError> {
        lock(&self.ledger).binds.push((pos, Bound::Int(value)));
        Ok(())
    }

    fn set_timestamp_utc(
        &mut self,
        pos: usize,
        value: NaiveDateTime,
    ) -> Result<(), SqlSessionError> {
        lock(&self.ledger)
            .binds
            .push((pos, Bound::TimestampUtc(value)));
        Ok(())
    }

    fn set_float(&mut self, pos: usize, value: f32) -> Result<(), SqlSessionError> {
        lock(&self.ledger).binds.push((pos, Bound::Float(value)));
        Ok(())
    }

    fn set_bytes(&mut self, pos: usize, value: &[u8]) -> Result<(), SqlSessionError> {
        lock(&self.ledger)
            .binds
            .push((pos, Bound::Bytes(value.to_vec())));
        Ok(())
    }

    fn set_object(&mut self, pos: usize, value: &SqlValue) -> Result<(), SqlSessionError> {
        lock(&self.ledger)
            .binds
            .push((pos, Bound::Object(value.clone())));
        Ok(())
    }

    fn register_out(&mut self, pos: usize, kind: SqlType) -> Result<(), SqlSessionError> {
        lock(&self.ledger).registered_out.push((pos, kind));
        Ok(())
    }

    fn execute(&mut self) -> Result<Produced, SqlSessionError> {
        if let Some(message) = &self.script.fail_execute {
            return Err(SqlSessionError::Execution(message.clone()));
        }
        Ok(Produced::Rows(
            self.script.rows.clone().unwrap_or_default(),
        ))
    }

    fn execute_update(&mut self) -> Result<u64, SqlSessionError> {
        if let Some(message) = &self.script.fail_execute {
            return Err(SqlSessionError::Execution(message.clone()));
        }
        Ok(self.script.update_count)
    }

    fn generated_key(&mut self) -> Result<Option<i64>, SqlSessionError> {
        Ok(self.script.generated_key)
    }

    fn out_value(&mut self, pos: usize) -> Result<SqlValue, SqlSessionError> {
        self.script
            .out_values
            .iter()
            .find(|(p, _)| *p == pos)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| {
                SqlSessionError::Extraction(format!("no OUT value at position {pos}"))
            })
    }

    fn close(&mut self) -> Result<(), SqlSessionError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        lock(&self.ledger).closes += 1;
        if self.script.fail_close {
            return Err(SqlSessionError::Execution("scripted close failure".into()));
        }
        Ok(())
    }
}
