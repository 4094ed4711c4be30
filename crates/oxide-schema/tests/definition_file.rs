//! Integration tests for loading definition files from disk.

use std::io::Write;

use oxide_schema::{DriverError, SchemaDefinition};
use oxide_schema_core::SchemaContext;

const EXAMPLE: &str = include_str!("../schema.example.json");

fn write_definition(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_example_definition() {
    let file = write_definition(EXAMPLE);
    let definition = SchemaDefinition::load(file.path()).unwrap();
    assert_eq!(definition.tables.len(), 2);
    assert_eq!(
        definition.tables[1].previous_name.as_deref(),
        Some("user_sessions")
    );

    let context = SchemaContext::new(definition.schema.clone().unwrap()).unwrap();
    let tables = definition.to_specs().unwrap();
    assert_eq!(
        tables[0].render(&context).unwrap(),
        "CREATE TABLE `app`.`users` (`id` INTEGER AUTO_INCREMENT, `name` VARCHAR(100) NOT NULL, \
         `email` VARCHAR(190) NOT NULL, `role` ENUM('admin','user') DEFAULT 'user', \
         `active` BOOLEAN DEFAULT true, `created_on` DATE DEFAULT '2024-01-01', \
         PRIMARY KEY (`id`), UNIQUE INDEX `email_UNIQUE` (`email` ASC));"
    );
    assert_eq!(
        tables[1].render(&context).unwrap(),
        "CREATE TABLE `app`.`sessions` (`id` BIGINT AUTO_INCREMENT UNSIGNED, \
         `user_id` INTEGER NOT NULL, `expires_at` DATETIME DEFAULT '2030-01-01 00:00:00', \
         `scopes` SET('read','write') DEFAULT 'read', PRIMARY KEY (`id`));"
    );
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = SchemaDefinition::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, DriverError::Io(_)));
}

#[test]
fn test_load_malformed_file() {
    let file = write_definition("{ \"tables\": [ { \"name\": \"t\" } ] }");
    let err = SchemaDefinition::load(file.path()).unwrap_err();
    assert!(matches!(err, DriverError::Serialization(_)));
}
