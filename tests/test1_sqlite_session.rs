#![cfg(feature = "sqlite")]

use sql_session::prelude::*;
use sql_session::sqlite::SqlitePool;

#[test]
fn inserts_and_selects_back() -> Result<(), SqlSessionError> {
    let pool = SqlitePool::memory()?;
    Session::new(Exec::new("CREATE TABLE foo (name TEXT)")).using(&pool)?;
    Session::new(Insert::plain(
        "INSERT INTO foo (name) VALUES (?)",
        Args::new(vec![SqlValue::Text("Jeff Lebowski".into())]),
    ))
    .using(&pool)?;
    let name = Session::new(Select::with_args(
        "SELECT name FROM foo WHERE name = ?",
        Args::new(vec![SqlValue::Text("Jeff Lebowski".into())]),
        SingleOutcome::<String>::new(),
    ))
    .using(&pool)?;
    assert_eq!(name, "Jeff Lebowski");
    Ok(())
}

#[test]
fn nontransactional_sessions_commit_per_statement() -> Result<(), SqlSessionError> {
    let pool = SqlitePool::memory()?;
    Session::new(Exec::new("CREATE TABLE names (name TEXT)")).using(&pool)?;
    for name in ["Walter", "Donny"] {
        Session::new(Insert::plain(
            "INSERT INTO names (name) VALUES (?)",
            Args::new(vec![SqlValue::Text(name.into())]),
        ))
        .using(&pool)?;
    }
    let names = Session::new(Select::new(
        "SELECT name FROM names ORDER BY name",
        ColumnOutcome::<String>::new(),
    ))
    .using(&pool)?;
    assert_eq!(names, vec!["Donny".to_string(), "Walter".to_string()]);
    Ok(())
}

#[test]
fn update_count_reports_affected_rows() -> Result<(), SqlSessionError> {
    let pool = SqlitePool::memory()?;
    Session::new(Exec::new(
        "CREATE TABLE boo (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT)",
    ))
    .using(&pool)?;
    for name in ["Jeff Brown", "Mark Smith"] {
        Session::new(Insert::plain(
            "INSERT INTO boo (name) VALUES (?)",
            Args::new(vec![SqlValue::Text(name.into())]),
        ))
        .using(&pool)?;
    }
    let count = Session::new(Update::new(
        "UPDATE boo SET name = ? WHERE id = 1",
        Args::new(vec![SqlValue::Text("Jeff Green".into())]),
        UpdateCount,
    ))
    .using(&pool)?;
    assert_eq!(count, 1);
    Ok(())
}

#[test]
fn fetches_last_insert_id() -> Result<(), SqlSessionError> {
    let pool = SqlitePool::memory()?;
    Session::new(Exec::new(
        "CREATE TABLE keyed (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT)",
    ))
    .using(&pool)?;
    let first = Session::new(Insert::new(
        "INSERT INTO keyed (name) VALUES (?)",
        Args::new(vec![SqlValue::Text("Jeff Lebowski".into())]),
        LastInsertId,
    ))
    .using(&pool)?;
    let second = Session::new(Insert::new(
        "INSERT INTO keyed (name) VALUES (?)",
        Args::new(vec![SqlValue::Text("Walter Sobchak".into())]),
        LastInsertId,
    ))
    .using(&pool)?;
    assert_eq!(first, 1);
    assert_eq!(second, 2);
    Ok(())
}

#[test]
fn empty_outcome_reports_zero_rows() -> Result<(), SqlSessionError> {
    let pool = SqlitePool::memory()?;
    Session::new(Exec::new("CREATE TABLE maybe (name TEXT)")).using(&pool)?;
    let empty = Session::new(Select::new("SELECT name FROM maybe", Empty)).using(&pool)?;
    assert!(empty);
    Session::new(Insert::plain(
        "INSERT INTO maybe (name) VALUES (?)",
        Args::new(vec![SqlValue::Text("something".into())]),
    ))
    .using(&pool)?;
    let empty = Session::new(Select::new("SELECT name FROM maybe", Empty)).using(&pool)?;
    assert!(!empty);
    Ok(())
}

#[test]
fn list_outcome_maps_rows() -> Result<(), SqlSessionError> {
    let pool = SqlitePool::memory()?;
    Session::new(Exec::new(
        "CREATE TABLE pair (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT)",
    ))
    .using(&pool)?;
    for name in ["a", "b"] {
        Session::new(Insert::plain(
            "INSERT INTO pair (name) VALUES (?)",
            Args::new(vec![SqlValue::Text(name.into())]),
        ))
        .using(&pool)?;
    }
    let pairs = Session::new(Select::new(
        "SELECT id, name FROM pair ORDER BY id",
        ListOutcome::new(|row| {
            let id = row
                .get("id")
                .and_then(SqlValue::as_long)
                .ok_or_else(|| SqlSessionError::Extraction("missing id".into()))?;
            let name = row
                .get("name")
                .and_then(SqlValue::as_text)
                .ok_or_else(|| SqlSessionError::Extraction("missing name".into()))?
                .to_owned();
            Ok((id, name))
        }),
    ))
    .using(&pool)?;
    assert_eq!(pairs, vec![(1, "a".to_string()), (2, "b".to_string())]);
    Ok(())
}

#[test]
fn closure_outcome_sees_the_result_set() -> Result<(), SqlSessionError> {
    let pool = SqlitePool::memory()?;
    Session::new(Exec::new("CREATE TABLE c (n INTEGER)")).using(&pool)?;
    for n in 0..3 {
        Session::new(Insert::plain(
            "INSERT INTO c (n) VALUES (?)",
            Args::new(vec![SqlValue::Long(n)]),
        ))
        .using(&pool)?;
    }
    let count = Session::new(Select::new("SELECT n FROM c", |rows: &ResultSet| {
        Ok(rows.len())
    }))
    .using(&pool)?;
    assert_eq!(count, 3);
    Ok(())
}

#[test]
fn single_outcome_fails_fast_on_many_rows() -> Result<(), SqlSessionError> {
    let pool = SqlitePool::memory()?;
    Session::new(Exec::new("CREATE TABLE dup (name TEXT)")).using(&pool)?;
    for name in ["Jeff Lebowski", "Walter Sobchak"] {
        Session::new(Insert::plain(
            "INSERT INTO dup (name) VALUES (?)",
            Args::new(vec![SqlValue::Text(name.into())]),
        ))
        .using(&pool)?;
    }
    let result = Session::new(Select::new(
        "SELECT name FROM dup",
        SingleOutcome::<String>::new(),
    ))
    .using(&pool);
    assert!(matches!(result, Err(SqlSessionError::Extraction(_))));
    Ok(())
}

#[test]
fn typed_values_round_trip() -> Result<(), SqlSessionError> {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde_json::json;

    let pool = SqlitePool::memory()?;
    Session::new(Exec::new(
        "CREATE TABLE t (a INTEGER, b REAL, c BOOLEAN, d BLOB, e TEXT, \
         f DATE, g DATETIME, h TEXT, j TEXT, k TEXT)",
    ))
    .using(&pool)?;

    let date = NaiveDate::from_ymd_opt(2024, 5, 17).expect("valid date");
    let moment = UtcTime::new(
        date.and_hms_micro_opt(10, 30, 0, 123_456)
            .expect("valid time")
            .and_utc(),
    );
    let price: Decimal = "19.99".parse().expect("valid decimal");

    Session::new(Insert::plain(
        "INSERT INTO t (a, b, c, d, e, f, g, h, j, k) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        Args::new(vec![
            SqlValue::Long(42),
            SqlValue::Double(1.5),
            SqlValue::Bool(true),
            SqlValue::Bytes(vec![0xde, 0xad]),
            SqlValue::Null,
            SqlValue::Date(date),
            SqlValue::Utc(moment),
            SqlValue::Text("plain".into()),
            SqlValue::Decimal(price),
            SqlValue::Json(json!({"k": 1})),
        ]),
    ))
    .using(&pool)?;

    Session::new(Select::new("SELECT * FROM t", move |rows: &ResultSet| {
        let row = rows
            .first()
            .ok_or_else(|| SqlSessionError::Extraction("no row".into()))?;
        assert_eq!(row.get("a").and_then(SqlValue::as_long), Some(42));
        assert_eq!(row.get("b").and_then(SqlValue::as_double), Some(1.5));
        assert_eq!(row.get("c").and_then(SqlValue::as_bool), Some(true));
        assert_eq!(
            row.get("d").and_then(SqlValue::as_bytes),
            Some(&[0xde, 0xad][..])
        );
        assert!(row.get("e").is_some_and(SqlValue::is_null));
        assert_eq!(row.get("f").and_then(SqlValue::as_date), Some(date));
        assert_eq!(row.get("g").and_then(SqlValue::as_utc), Some(moment));
        assert_eq!(row.get("h").and_then(SqlValue::as_text), Some("plain"));
        assert_eq!(row.get("j").and_then(SqlValue::as_decimal), Some(price));
        assert_eq!(
            row.get("k").and_then(SqlValue::as_text),
            Some(r#"{"k":1}"#)
        );
        Ok(())
    }))
    .using(&pool)?;
    Ok(())
}

#[test]
fn parallel_sessions_borrow_independent_connections() -> Result<(), SqlSessionError> {
    let dir = tempfile::tempdir().map_err(|e| SqlSessionError::Pool(e.to_string()))?;
    let pool = SqlitePool::open(dir.path().join("parallel.db"))?;
    Session::new(Exec::new("CREATE TABLE par (n INTEGER)")).using(&pool)?;

    std::thread::scope(|scope| {
        for n in 0..4 {
            let pool = &pool;
            scope.spawn(move || {
                Session::new(Insert::plain(
                    "INSERT INTO par (n) VALUES (?)",
                    Args::new(vec![SqlValue::Long(n)]),
                ))
                .using(pool)
                .expect("parallel insert");
            });
        }
    });

    let total = Session::new(Select::new(
        "SELECT n FROM par",
        |rows: &ResultSet| Ok(rows.len()),
    ))
    .using(&pool)?;
    assert_eq!(total, 4);
    Ok(())
}

#[test]
fn call_strategy_is_rejected() -> Result<(), SqlSessionError> {
    let pool = SqlitePool::memory()?;
    let outcome = StoredProcOutcome::new(vec![1])?;
    let result =
        Session::new(ProcCall::new("{call nope(?)}", Args::none(), outcome)).using(&pool);
    assert!(matches!(result, Err(SqlSessionError::Unsupported(_))));
    Ok(())
}
