//! Integration tests for the migration manager against on-disk projects.
//!
//! Each test lays out a `shift.yml`, a `schema_migrations` directory of unit
//! files and a DuckDB file in a temp directory, then drives the public API
//! the same way the `shift` binary does.

use shift_core::{Config, CoreError, DatabaseTarget, DEFAULT_CONFIG_FILE};
use shift_db::executor::column_names;
use shift_migrate::{
    plan_migration, write_migration, MigrateError, MigrationRunner, RevertOutcome,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ── Helpers ────────────────────────────────────────────────────────────

const INITIAL: &str = r#"
db_name: app
previous_migration: None
description: Create users
upgrade: |
  CREATE TABLE users (id INTEGER, username VARCHAR NOT NULL, email VARCHAR NOT NULL);
downgrade: |
  DROP TABLE users;
"#;

const ADD_AGE: &str = r#"
db_name: app
previous_migration: 001_initial
upgrade: |
  -- nullable so existing rows stay valid
  ALTER TABLE users ADD COLUMN age INTEGER;
downgrade: |
  ALTER TABLE users DROP COLUMN age;
"#;

fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("db/schema_migrations")).unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    duckdb::Connection::open(dir.path().join("data/app.duckdb")).unwrap();
    fs::write(
        dir.path().join(DEFAULT_CONFIG_FILE),
        r#"
databases:
  app:
    db_path: data/app.duckdb
    migrations_path: db/schema_migrations
"#,
    )
    .unwrap();
    dir
}

fn add_unit(root: &Path, file: &str, content: &str) {
    fs::write(root.join("db/schema_migrations").join(file), content).unwrap();
}

fn target(root: &Path) -> DatabaseTarget {
    Config::load(&root.join(DEFAULT_CONFIG_FILE))
        .unwrap()
        .target("app", root)
        .unwrap()
}

fn open(root: &Path) -> MigrationRunner {
    MigrationRunner::from_target(&target(root)).unwrap()
}

// ── Tests ──────────────────────────────────────────────────────────────

#[test]
fn test_apply_and_revert_across_sessions() {
    let dir = project();
    add_unit(dir.path(), "001_initial.yml", INITIAL);
    add_unit(dir.path(), "002_add_age.yml", ADD_AGE);

    {
        let mut runner = open(dir.path());
        let report = runner.apply_all().unwrap();
        assert_eq!(report.count(), 2);
    }

    let mut runner = open(dir.path());
    assert_eq!(
        runner.applied_versions().unwrap(),
        vec!["001_initial", "002_add_age"]
    );
    assert!(column_names(runner.db().conn(), "users")
        .unwrap()
        .contains(&"age".to_string()));
    assert_eq!(runner.apply_all().unwrap().count(), 0);

    assert!(matches!(
        runner.revert_last().unwrap(),
        RevertOutcome::Reverted(ref v) if v.as_str() == "002_add_age"
    ));
    drop(runner);

    let runner = open(dir.path());
    assert_eq!(runner.applied_versions().unwrap(), vec!["001_initial"]);
    assert!(!column_names(runner.db().conn(), "users")
        .unwrap()
        .contains(&"age".to_string()));
}

#[test]
fn test_deleted_unit_file_is_reported() {
    let dir = project();
    add_unit(dir.path(), "001_initial.yml", INITIAL);
    add_unit(dir.path(), "002_add_age.yml", ADD_AGE);
    open(dir.path()).apply_all().unwrap();

    fs::remove_file(dir.path().join("db/schema_migrations/002_add_age.yml")).unwrap();

    let err = open(dir.path()).apply_all().unwrap_err();
    assert!(matches!(err, MigrateError::MissingMigrationFiles { ref versions } if versions == &["002_add_age"]));
}

#[test]
fn test_unit_with_commit_is_rejected_at_load() {
    let dir = project();
    add_unit(
        dir.path(),
        "001_initial.yml",
        "db_name: app\nprevious_migration: None\nupgrade: \"CREATE TABLE t (id INTEGER); COMMIT;\"\ndowngrade: DROP TABLE t;\n",
    );

    let err = MigrationRunner::from_target(&target(dir.path())).err().unwrap();
    assert!(matches!(err, MigrateError::MalformedUnit { ref unit, .. } if unit == "001_initial"));
}

#[test]
fn test_non_unit_files_are_ignored() {
    let dir = project();
    add_unit(dir.path(), "001_initial.yml", INITIAL);
    add_unit(dir.path(), "README.md", "# migrations\n");
    fs::create_dir_all(dir.path().join("db/schema_migrations/archive")).unwrap();

    let runner = open(dir.path());
    assert_eq!(runner.registry().len(), 1);
}

#[test]
fn test_scaffolded_units_chain_and_apply() {
    let dir = project();
    let migrations = dir.path().join("db/schema_migrations");

    let first = plan_migration(&open(dir.path()), "initial").unwrap();
    write_migration(&migrations, &first).unwrap();
    let second = plan_migration(&open(dir.path()), "add_age").unwrap();
    let path = write_migration(&migrations, &second).unwrap();

    assert_eq!(path, migrations.join("002_add_age.yml"));
    assert_eq!(second.previous, Some(first.version.clone()));

    let mut runner = open(dir.path());
    let report = runner.apply_all().unwrap();
    assert_eq!(report.count(), 2);

    let status = runner.status().unwrap();
    assert!(status.iter().all(|s| s.applied_at.is_some()));
}

#[test]
fn test_relative_paths_resolve_against_config_dir() {
    let dir = project();
    let target = target(dir.path());
    assert_eq!(target.db_path, dir.path().join("data/app.duckdb"));
    assert_eq!(
        target.migrations_path,
        dir.path().join("db/schema_migrations")
    );
}

#[test]
fn test_missing_database_file_is_rejected_before_opening() {
    let dir = project();
    add_unit(dir.path(), "001_initial.yml", INITIAL);
    fs::remove_file(dir.path().join("data/app.duckdb")).unwrap();

    let err = Config::load(&dir.path().join(DEFAULT_CONFIG_FILE))
        .unwrap()
        .target("app", dir.path())
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::PathNotFound {
            what: "database file",
            ..
        }
    ));
    assert!(!dir.path().join("data/app.duckdb").exists());
}
