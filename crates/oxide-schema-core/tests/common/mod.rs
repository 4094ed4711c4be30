#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io;

use oxide_schema_core::types::{BOOLEAN, INTEGER, VARCHAR};
use oxide_schema_core::{ColumnSpec, Connection, Row, TableSpec};

/// In-memory connection that answers the metadata queries the reconciler
/// issues and records every statement it receives.
#[derive(Debug, Default)]
pub struct ScriptedConnection {
    pub schema: Option<String>,
    pub tables: BTreeMap<String, Vec<Row>>,
    pub queries: Vec<String>,
    pub executed: Vec<String>,
    pub fail_on: Option<String>,
}

impl ScriptedConnection {
    pub fn new(schema: &str) -> Self {
        Self {
            schema: Some(schema.to_string()),
            ..Self::default()
        }
    }

    pub fn with_table(mut self, name: &str, columns: Vec<Row>) -> Self {
        self.tables.insert(name.to_string(), columns);
        self
    }

    pub fn failing_on(mut self, fragment: &str) -> Self {
        self.fail_on = Some(fragment.to_string());
        self
    }

    pub fn creates(&self) -> usize {
        self.executed
            .iter()
            .filter(|sql| sql.starts_with("CREATE TABLE"))
            .count()
    }

    fn check(&self, sql: &str) -> Result<(), io::Error> {
        match &self.fail_on {
            Some(fragment) if sql.contains(fragment.as_str()) => {
                Err(io::Error::other(format!("scripted failure on: {sql}")))
            }
            _ => Ok(()),
        }
    }
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

impl Connection for ScriptedConnection {
    type Error = io::Error;

    fn query(&mut self, sql: &str) -> Result<Vec<Row>, Self::Error> {
        self.check(sql)?;
        self.queries.push(sql.to_string());

        if sql == "SELECT DATABASE()" {
            return Ok(vec![Row::new(vec![self.schema.clone()])]);
        }
        if sql.starts_with("SHOW TABLES FROM") {
            let name = sql
                .split_once("LIKE '")
                .map(|(_, rest)| rest.trim_end_matches('\''))
                .unwrap_or_default();
            return Ok(self
                .tables
                .keys()
                .filter(|t| t.eq_ignore_ascii_case(name))
                .map(|t| Row::new(vec![text(t)]))
                .collect());
        }
        if sql.starts_with("SHOW COLUMNS FROM") {
            let name = sql.rsplit('`').nth(1).unwrap_or_default();
            return self
                .tables
                .iter()
                .find(|(t, _)| t.eq_ignore_ascii_case(name))
                .map(|(_, columns)| columns.clone())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()));
        }
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("unscripted query: {sql}"),
        ))
    }

    fn execute(&mut self, sql: &str) -> Result<u64, Self::Error> {
        self.check(sql)?;
        self.executed.push(sql.to_string());

        if sql.starts_with("CREATE TABLE") {
            if let Some(name) = sql.split('`').nth(3) {
                self.tables.insert(name.to_string(), Vec::new());
            }
        } else if sql.contains(" RENAME TO ") {
            let parts: Vec<&str> = sql.split('`').collect();
            if let (Some(from), Some(to)) = (parts.get(3), parts.get(7)) {
                if let Some(columns) = self.tables.remove(*from) {
                    self.tables.insert((*to).to_string(), columns);
                }
            }
        }
        Ok(0)
    }

    fn ping(&mut self) -> Result<(), Self::Error> {
        self.check("PING")
    }

    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A `SHOW COLUMNS` row: Field, Type, Null, Key, Default, Extra.
pub fn column_row(field: &str, column_type: &str, nullable: bool, key: &str, extra: &str) -> Row {
    Row::new(vec![
        text(field),
        text(column_type),
        text(if nullable { "YES" } else { "NO" }),
        text(key),
        None,
        text(extra),
    ])
}

/// `users (id INTEGER AUTO_INCREMENT PK, name VARCHAR(100) NOT NULL, active BOOLEAN DEFAULT true)`.
pub fn users_table() -> TableSpec {
    TableSpec::new(
        "users",
        vec![
            ColumnSpec::new("id", INTEGER)
                .unwrap()
                .primary_key(true)
                .auto_increment(true)
                .unwrap(),
            ColumnSpec::new("name", VARCHAR)
                .unwrap()
                .length(100)
                .not_null(true),
            ColumnSpec::new("active", BOOLEAN).unwrap().default(true),
        ],
    )
}

/// Live columns matching [`users_table`].
pub fn users_columns() -> Vec<Row> {
    vec![
        column_row("id", "int(11)", false, "PRI", "auto_increment"),
        column_row("name", "varchar(100)", false, "", ""),
        column_row("active", "tinyint(1)", true, "", ""),
    ]
}
