#![cfg(feature = "test-utils")]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;

use sql_session::prelude::*;
use sql_session::test_utils::{Bound, FakeSource, FakeStatement, Script, result_set};

fn moment() -> UtcTime {
    UtcTime::new(
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .expect("valid date")
            .and_hms_opt(10, 30, 0)
            .expect("valid time")
            .and_utc(),
    )
}

#[test]
fn binds_every_argument_at_its_ordinal() -> Result<(), SqlSessionError> {
    let date = NaiveDate::from_ymd_opt(2024, 5, 17).expect("valid date");
    let price: Decimal = "19.99".parse().expect("valid decimal");
    let source = FakeSource::new();

    Session::new(Exec::with_args(
        "INSERT INTO kinds VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        Args::new(vec![
            SqlValue::Null,
            SqlValue::Long(42),
            SqlValue::Bool(true),
            SqlValue::Date(date),
            SqlValue::Int(7),
            SqlValue::Utc(moment()),
            SqlValue::Float(1.5),
            SqlValue::Bytes(vec![1, 2, 3]),
            SqlValue::Text("generic".into()),
            SqlValue::Double(2.5),
            SqlValue::Decimal(price),
            SqlValue::Json(json!({"k": 1})),
        ]),
    ))
    .using(&source)?;

    let ledger = source.ledger();
    assert_eq!(
        ledger.binds,
        vec![
            (1, Bound::Null),
            (2, Bound::Long(42)),
            (3, Bound::Bool(true)),
            (4, Bound::Date(date)),
            (5, Bound::Int(7)),
            (6, Bound::TimestampUtc(moment().naive())),
            (7, Bound::Float(1.5)),
            (8, Bound::Bytes(vec![1, 2, 3])),
            (9, Bound::Object(SqlValue::Text("generic".into()))),
            (10, Bound::Object(SqlValue::Double(2.5))),
            (11, Bound::Object(SqlValue::Decimal(price))),
            (12, Bound::Object(SqlValue::Json(json!({"k": 1})))),
        ]
    );
    Ok(())
}

#[test]
fn statement_closes_once_on_success() -> Result<(), SqlSessionError> {
    let stmt = FakeStatement::new(Script::new());
    let closes = stmt.closes();
    let produced = Produced::Rows(result_set(
        &["name"],
        vec![vec![SqlValue::Text("one".into())]],
    ));
    let name: String = SingleOutcome::new().handle(produced, stmt.into_guard())?;
    assert_eq!(name, "one");
    assert_eq!(closes.load(std::sync::atomic::Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn statement_closes_once_when_extraction_fails() {
    let stmt = FakeStatement::new(Script::new());
    let closes = stmt.closes();
    // No generated key scripted, so extraction fails.
    let result = LastInsertId.handle(Produced::Count(1), stmt.into_guard());
    assert!(matches!(result, Err(SqlSessionError::Extraction(_))));
    assert_eq!(closes.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[test]
fn statement_closes_once_when_the_row_mapper_fails() {
    let stmt = FakeStatement::new(Script::new());
    let closes = stmt.closes();
    let produced = Produced::Rows(result_set(
        &["name"],
        vec![vec![SqlValue::Text("one".into())]],
    ));
    let outcome = ListOutcome::new(|_row| {
        Err::<(), _>(SqlSessionError::Extraction("mapper failure".into()))
    });
    let result = outcome.handle(produced, stmt.into_guard());
    assert!(result.is_err());
    assert_eq!(closes.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[test]
fn close_failures_never_mask_the_outcome() -> Result<(), SqlSessionError> {
    let stmt = FakeStatement::new(Script::new().fail_close());
    let closes = stmt.closes();
    let produced = Produced::Rows(result_set(&["n"], vec![vec![SqlValue::Long(9)]]));
    let n: i64 = SingleOutcome::new().handle(produced, stmt.into_guard())?;
    assert_eq!(n, 9);
    assert_eq!(closes.load(std::sync::atomic::Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn only_the_keyed_vendor_prepares_with_keys() -> Result<(), SqlSessionError> {
    let mysql = FakeSource::new().vendor("MySQL").script(Script::new().generated_key(1));
    Session::new(Insert::plain("INSERT INTO k (n) VALUES (?)", Args::none())).using(&mysql)?;
    assert_eq!(mysql.ledger().prepared[0].1, Prepare::WithKeys);

    let postgres = FakeSource::new().vendor("PostgreSQL");
    Session::new(Insert::plain("INSERT INTO k (n) VALUES (?)", Args::none()))
        .using(&postgres)?;
    assert_eq!(postgres.ledger().prepared[0].1, Prepare::Plain);

    let select = FakeSource::new().vendor("MySQL");
    Session::new(Select::new("SELECT 1", Empty)).using(&select)?;
    assert_eq!(select.ledger().prepared[0].1, Prepare::Plain);
    Ok(())
}

#[test]
fn missing_generated_key_surfaces_and_still_releases() {
    let source = FakeSource::new();
    let result = Session::new(Insert::new(
        "INSERT INTO k (n) VALUES (?)",
        Args::new(vec![SqlValue::Long(1)]),
        LastInsertId,
    ))
    .using(&source);
    assert!(matches!(result, Err(SqlSessionError::Extraction(_))));

    let ledger = source.ledger();
    assert_eq!(ledger.borrows, 1);
    assert_eq!(ledger.releases, 1);
    assert_eq!(ledger.closes, 1);
}

#[test]
fn stored_proc_outcome_validates_positions_at_construction() {
    assert!(matches!(
        StoredProcOutcome::new(Vec::new()),
        Err(SqlSessionError::Construction(_))
    ));
    assert!(matches!(
        StoredProcOutcome::new(vec![0]),
        Err(SqlSessionError::Construction(_))
    ));
    assert!(StoredProcOutcome::new(vec![1, 2]).is_ok());
}

#[test]
fn proc_call_registers_and_reads_out_parameters() -> Result<(), SqlSessionError> {
    let date = NaiveDate::from_ymd_opt(1997, 8, 29).expect("valid date");
    let source = FakeSource::new().script(
        Script::new()
            .out_value(1, SqlValue::Text("Charles".into()))
            .out_value(2, SqlValue::Date(date)),
    );

    let result = Session::new(ProcCall::full(
        "{call fetchUser(?, ?)}",
        Args::new(vec![SqlValue::Long(5)]),
        |stmt| {
            stmt.register_out(1, SqlType::Text)?;
            stmt.register_out(2, SqlType::Date)
        },
        StoredProcOutcome::new(vec![1, 2])?,
    ))
    .using(&source)?;

    assert_eq!(
        result,
        vec![SqlValue::Text("Charles".into()), SqlValue::Date(date)]
    );
    let ledger = source.ledger();
    assert_eq!(ledger.prepared[0].1, Prepare::Call);
    assert_eq!(
        ledger.registered_out,
        vec![(1, SqlType::Text), (2, SqlType::Date)]
    );
    assert_eq!(ledger.binds, vec![(1, Bound::Long(5))]);
    Ok(())
}

#[test]
fn plain_session_leaves_autocommit_alone() -> Result<(), SqlSessionError> {
    let source = FakeSource::new();
    Session::new(Exec::new("CREATE TABLE a (n INTEGER)")).using(&source)?;
    let ledger = source.ledger();
    assert!(ledger.autocommit_changes.is_empty());
    assert_eq!(ledger.commits, 0);
    assert_eq!((ledger.borrows, ledger.releases), (1, 1));
    Ok(())
}

#[test]
fn transaction_commits_then_restores_autocommit() -> Result<(), SqlSessionError> {
    let source = FakeSource::new();
    Transaction::new(Exec::new("CREATE TABLE a (n INTEGER)")).using(&source)?;
    let ledger = source.ledger();
    assert_eq!(ledger.autocommit_changes, vec![false, true]);
    assert_eq!(ledger.commits, 1);
    assert_eq!(ledger.rollbacks, 0);
    assert_eq!((ledger.borrows, ledger.releases), (1, 1));
    Ok(())
}

#[test]
fn transaction_rolls_back_on_any_failure() {
    let source = FakeSource::new().script(Script::new().fail_execute("constraint violation"));
    let result =
        Transaction::new(Exec::new("INSERT INTO a VALUES (1)")).using(&source);
    assert!(matches!(result, Err(SqlSessionError::Execution(_))));

    let ledger = source.ledger();
    assert_eq!(ledger.commits, 0);
    assert_eq!(ledger.rollbacks, 1);
    assert_eq!(ledger.autocommit_changes, vec![false, true]);
    assert_eq!((ledger.borrows, ledger.releases), (1, 1));
    assert_eq!(ledger.closes, 1);
}

#[test]
fn failed_rollback_wraps_both_errors() {
    let source = FakeSource::new()
        .script(Script::new().fail_execute("constraint violation"))
        .fail_rollback();
    let result =
        Transaction::new(Exec::new("INSERT INTO a VALUES (1)")).using(&source);
    match result {
        Err(SqlSessionError::Rollback { original, rollback }) => {
            assert!(matches!(*original, SqlSessionError::Execution(_)));
            assert!(matches!(*rollback, SqlSessionError::Execution(_)));
        }
        other => panic!("expected a rollback failure, got {other:?}"),
    }
    let ledger = source.ledger();
    assert_eq!((ledger.borrows, ledger.releases), (1, 1));
}

#[test]
fn failed_commit_surfaces_and_still_releases() {
    let source = FakeSource::new().fail_commit();
    let result = Transaction::new(Exec::new("CREATE TABLE a (n INTEGER)")).using(&source);
    assert!(matches!(result, Err(SqlSessionError::Execution(_))));
    let ledger = source.ledger();
    assert_eq!((ledger.borrows, ledger.releases), (1, 1));
}

#[test]
fn exhausted_pool_surfaces_before_any_borrow() {
    let source = FakeSource::new().fail_borrow();
    let result = Session::new(Exec::new("SELECT 1")).using(&source);
    assert!(matches!(result, Err(SqlSessionError::Pool(_))));
    let ledger = source.ledger();
    assert_eq!((ledger.borrows, ledger.releases), (0, 0));
}

#[test]
fn closure_bodies_compose_statements() -> Result<(), SqlSessionError> {
    use sql_session::test_utils::FakeConnection;

    let source = FakeSource::new().script(Script::new().update_count(1));
    let count = Transaction::new(|conn: &mut FakeConnection| {
        Exec::new("CREATE TABLE c (n INTEGER)").run(conn)?;
        Update::new(
            "UPDATE c SET n = ? WHERE n = ?",
            Args::new(vec![SqlValue::Long(2), SqlValue::Long(1)]),
            UpdateCount,
        )
        .run(conn)
    })
    .using(&source)?;
    assert_eq!(count, 1);

    let ledger = source.ledger();
    assert_eq!(ledger.prepared.len(), 2);
    assert_eq!(ledger.closes, 2);
    assert_eq!(ledger.commits, 1);
    Ok(())
}
