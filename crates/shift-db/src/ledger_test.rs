use super::*;
use crate::ShiftDb;

fn db_name(name: &str) -> DatabaseName {
    DatabaseName::new(name)
}

fn record(db: &ShiftDb, version: &str, name: &DatabaseName) {
    db.transaction(|tx| record_applied(tx, version, name))
        .unwrap();
}

#[test]
fn ensure_tracking_table_is_idempotent() {
    let db = ShiftDb::open_memory().unwrap();
    ensure_tracking_table(db.conn()).unwrap();
    ensure_tracking_table(db.conn()).unwrap();
    assert!(crate::executor::relation_exists(db.conn(), LEDGER_TABLE).unwrap());
}

#[test]
fn applied_versions_in_application_order() {
    let db = ShiftDb::open_memory().unwrap();
    let app = db_name("app");
    record(&db, "002_second", &app);
    record(&db, "001_first", &app);
    record(&db, "003_third", &app);

    assert_eq!(
        applied_versions(db.conn(), &app).unwrap(),
        vec!["002_second", "001_first", "003_third"]
    );
}

#[test]
fn applied_versions_filtered_by_database() {
    let db = ShiftDb::open_memory().unwrap();
    let app = db_name("app");
    let other = db_name("other");
    record(&db, "001_initial", &app);
    record(&db, "001_initial", &other);
    record(&db, "002_more", &other);

    assert_eq!(applied_versions(db.conn(), &app).unwrap(), vec!["001_initial"]);
    assert_eq!(
        applied_versions(db.conn(), &other).unwrap(),
        vec!["001_initial", "002_more"]
    );
}

#[test]
fn duplicate_record_is_rejected() {
    let db = ShiftDb::open_memory().unwrap();
    let app = db_name("app");
    record(&db, "001_initial", &app);

    let err = db
        .transaction(|tx| record_applied(tx, "001_initial", &app))
        .unwrap_err();
    assert!(matches!(err, DbError::Ledger(_)));
    assert_eq!(applied_versions(db.conn(), &app).unwrap().len(), 1);
}

#[test]
fn remove_applied_deletes_only_matching_row() {
    let db = ShiftDb::open_memory().unwrap();
    let app = db_name("app");
    let other = db_name("other");
    record(&db, "001_initial", &app);
    record(&db, "001_initial", &other);

    db.transaction(|tx| remove_applied(tx, "001_initial", &app))
        .unwrap();

    assert!(applied_versions(db.conn(), &app).unwrap().is_empty());
    assert_eq!(applied_versions(db.conn(), &other).unwrap(), vec!["001_initial"]);
}

#[test]
fn remove_missing_row_is_an_error() {
    let db = ShiftDb::open_memory().unwrap();
    let err = db
        .transaction(|tx| remove_applied(tx, "001_initial", &db_name("app")))
        .unwrap_err();
    assert!(matches!(err, DbError::Ledger(_)));
}

#[test]
fn applied_records_carry_sequence_and_timestamp() {
    let db = ShiftDb::open_memory().unwrap();
    let app = db_name("app");
    record(&db, "001_initial", &app);
    record(&db, "002_next", &app);

    let records = applied_records(db.conn(), &app).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].version, "001_initial");
    assert_eq!(records[1].version, "002_next");
    assert!(records[0].sequence_id < records[1].sequence_id);
    assert_eq!(records[0].db_name, "app");
    assert!((Utc::now() - records[0].applied_at).num_hours().abs() <= 24);
}

#[test]
fn rolled_back_record_does_not_persist() {
    let db = ShiftDb::open_memory().unwrap();
    let app = db_name("app");
    let result: DbResult<()> = db.transaction(|tx| {
        record_applied(tx, "001_initial", &app)?;
        Err(DbError::ExecutionError("boom".to_string()))
    });
    assert!(result.is_err());
    assert!(applied_versions(db.conn(), &app).unwrap().is_empty());
}
