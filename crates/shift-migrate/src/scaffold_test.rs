use super::*;
use crate::registry::MigrationRegistry;
use crate::unit::{MigrationUnit, SqlMigration};
use shift_db::ShiftDb;

fn app() -> DatabaseName {
    DatabaseName::new("app")
}

fn unit(version: &str, previous: Option<&str>) -> SqlMigration {
    SqlMigration::new(
        MigrationVersion::parse(version).unwrap(),
        previous.map(|p| MigrationVersion::parse(p).unwrap()),
        app(),
        "SELECT 1;",
        "SELECT 1;",
    )
    .unwrap()
}

fn runner(units: Vec<SqlMigration>) -> MigrationRunner {
    let mut registry = MigrationRegistry::new();
    for u in units {
        registry.register(u).unwrap();
    }
    MigrationRunner::new(ShiftDb::open_memory().unwrap(), registry, app())
}

#[test]
fn test_validate_migration_name() {
    assert!(validate_migration_name("add_age").is_ok());
    assert!(validate_migration_name("initial").is_ok());
    for bad in ["", "AddAge", "add-age", "add age", "v2", "ägé"] {
        let err = validate_migration_name(bad).unwrap_err();
        assert!(matches!(err, MigrateError::InvalidMigrationName { .. }), "{bad}");
    }
}

#[test]
fn test_plan_first_migration() {
    let plan = plan_migration(&runner(vec![]), "initial").unwrap();
    assert_eq!(plan.version.as_str(), "001_initial");
    assert_eq!(plan.previous, None);
    assert_eq!(plan.file_name, "001_initial.yml");
    assert!(plan.contents.contains("db_name: \"app\""));
    assert!(plan.contents.contains("previous_migration: \"None\""));
}

#[test]
fn test_plan_appends_to_tail() {
    let runner = runner(vec![
        unit("002_add_age", Some("001_initial")),
        unit("001_initial", None),
    ]);
    let plan = plan_migration(&runner, "add_posts").unwrap();
    assert_eq!(plan.version.as_str(), "003_add_posts");
    assert_eq!(plan.previous.as_ref().map(|v| v.as_str()), Some("002_add_age"));
    assert!(plan.contents.contains("previous_migration: \"002_add_age\""));
}

#[test]
fn test_plan_rejects_broken_chain() {
    let runner = runner(vec![unit("001_initial", None), unit("002_add_age", None)]);
    let err = plan_migration(&runner, "add_posts").unwrap_err();
    assert!(matches!(err, MigrateError::ChainMismatch { .. }));
}

#[test]
fn test_plan_rejects_invalid_name_first() {
    let err = plan_migration(&runner(vec![]), "Bad").unwrap_err();
    assert!(matches!(err, MigrateError::InvalidMigrationName { .. }));
}

#[test]
fn test_rendered_unit_loads_back() {
    let runner = runner(vec![unit("001_initial", None)]);
    let plan = plan_migration(&runner, "add_age").unwrap();

    let loaded = SqlMigration::from_yaml(plan.version.clone(), &plan.contents).unwrap();
    assert_eq!(loaded.database(), &app());
    assert_eq!(
        loaded.previous_version().map(|v| v.as_str()),
        Some("001_initial")
    );
    assert_eq!(loaded.description(), None);
}

#[test]
fn test_write_migration_never_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let plan = plan_migration(&runner(vec![]), "initial").unwrap();

    let path = write_migration(dir.path(), &plan).unwrap();
    assert_eq!(path, dir.path().join("001_initial.yml"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), plan.contents);

    let err = write_migration(dir.path(), &plan).unwrap_err();
    assert!(matches!(err, MigrateError::IoWithPath { .. }));
}
