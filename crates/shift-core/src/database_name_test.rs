use super::*;

#[test]
fn test_database_name_creation() {
    let name = DatabaseName::new("test_db");
    assert_eq!(name.as_str(), "test_db");
    assert_eq!(format!("{}", name), "test_db");
}

#[test]
fn test_database_name_rejects_empty_and_whitespace() {
    assert!(DatabaseName::try_new("").is_none());
    assert!(DatabaseName::try_new("two words").is_none());
    assert!(DatabaseName::try_from("app").is_ok());
}

#[test]
fn test_database_name_equality() {
    let name = DatabaseName::new("app");
    assert_eq!(name, "app");
    assert!(name.starts_with("ap"));
}
