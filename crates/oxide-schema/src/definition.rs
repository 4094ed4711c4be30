//! JSON schema definition files.
//!
//! A definition lists the desired tables and their columns:
//!
//! ```json
//! {
//!   "schema": "app",
//!   "tables": [
//!     {
//!       "name": "users",
//!       "columns": [
//!         { "name": "id", "type": "INTEGER", "primary_key": true, "auto_increment": true },
//!         { "name": "name", "type": "VARCHAR", "length": 100, "not_null": true },
//!         { "name": "active", "type": "BOOLEAN", "default": true }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Defaults are plain JSON values and are converted according to the
//! column's type. Temporal defaults are strings (`"2024-01-31"`,
//! `"2024-01-31 08:00:00"`, `"08:00:00"`), SET defaults are arrays.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use oxide_schema_core::{
    ColumnSpec, DataType, DefaultValue, SchemaError, StorageCategory, TableSpec,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DriverError, Result};

/// A whole definition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDefinition {
    /// Schema to render into; the connection's current schema when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Desired tables in creation order.
    pub tables: Vec<TableDefinition>,
}

/// One table of a definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDefinition {
    pub name: String,
    /// Live name of the table when it is being renamed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_name: Option<String>,
    pub columns: Vec<ColumnDefinition>,
}

/// One column of a table definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDefinition {
    pub name: String,
    /// Catalog type name, matched case-insensitively.
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default, alias = "unique")]
    pub unique_index: bool,
    #[serde(default)]
    pub unsigned: bool,
    #[serde(default, alias = "zerofill")]
    pub zero_fill: bool,
    #[serde(default)]
    pub auto_increment: bool,
    /// Length, display width or precision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    /// ENUM or SET values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl SchemaDefinition {
    /// Parses a definition from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a definition file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Builds the table specifications, stopping at the first invalid column.
    pub fn to_specs(&self) -> Result<Vec<TableSpec>> {
        self.tables.iter().map(TableDefinition::to_spec).collect()
    }
}

impl TableDefinition {
    /// Builds the table specification.
    pub fn to_spec(&self) -> Result<TableSpec> {
        let columns = self
            .columns
            .iter()
            .map(ColumnDefinition::to_spec)
            .collect::<Result<Vec<_>>>()?;
        Ok(TableSpec::new(&self.name, columns))
    }
}

impl ColumnDefinition {
    /// Builds the column specification.
    pub fn to_spec(&self) -> Result<ColumnSpec> {
        let data_type = DataType::lookup(&self.data_type)
            .ok_or_else(|| SchemaError::UnknownType(self.data_type.clone()))?;

        let mut column = ColumnSpec::new(&self.name, data_type)?
            .primary_key(self.primary_key)
            .not_null(self.not_null)
            .unique_index(self.unique_index)
            .unsigned(self.unsigned)?
            .zero_fill(self.zero_fill)?
            .auto_increment(self.auto_increment)?;

        match (self.length, &self.values) {
            (Some(_), Some(_)) => {
                return Err(self.invalid("`length` and `values` cannot both be set"));
            }
            (Some(length), None) => column = column.length(length),
            (None, Some(values)) => column = column.values(values.iter().cloned()),
            (None, None) => {}
        }

        if let Some(value) = self.default.as_ref().filter(|v| !v.is_null()) {
            column = column.default(self.default_value(data_type, value)?);
        }
        Ok(column)
    }

    /// Converts a JSON default to the representation the column's type
    /// expects. Values of the wrong JSON kind are converted as-is so that
    /// rendering reports the mismatch.
    fn default_value(&self, data_type: DataType, value: &Value) -> Result<DefaultValue> {
        match (data_type.category(), value) {
            (StorageCategory::TemporalDate, Value::String(s)) => {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map(DefaultValue::Date)
                    .map_err(|e| self.invalid(format!("invalid date '{s}': {e}")))
            }
            (StorageCategory::TemporalDateTime, Value::String(s)) => parse_datetime(s)
                .map(DefaultValue::DateTime)
                .ok_or_else(|| self.invalid(format!("invalid date and time '{s}'"))),
            (StorageCategory::TemporalTime, Value::String(s)) => {
                NaiveTime::parse_from_str(s, "%H:%M:%S")
                    .map(DefaultValue::Time)
                    .map_err(|e| self.invalid(format!("invalid time '{s}': {e}")))
            }
            (StorageCategory::Bit, Value::Number(n)) => match n.as_u64() {
                Some(bits) => Ok(DefaultValue::Unsigned(bits)),
                None => self.plain_value(value),
            },
            (StorageCategory::Set, Value::String(s)) => Ok(DefaultValue::List(
                s.split(',').map(|v| v.trim().to_string()).collect(),
            )),
            _ => self.plain_value(value),
        }
    }

    fn plain_value(&self, value: &Value) -> Result<DefaultValue> {
        match value {
            Value::Bool(b) => Ok(DefaultValue::Bool(*b)),
            Value::Number(n) => {
                let prefer_unsigned = self.unsigned;
                match (n.as_i64(), n.as_u64(), n.as_f64()) {
                    (_, Some(u), _) if prefer_unsigned => Ok(DefaultValue::Unsigned(u)),
                    (Some(i), _, _) => Ok(DefaultValue::Signed(i)),
                    (_, Some(u), _) => Ok(DefaultValue::Unsigned(u)),
                    (_, _, Some(f)) => Ok(DefaultValue::Float(f)),
                    _ => Err(self.invalid(format!("unsupported number {n}"))),
                }
            }
            Value::String(s) => Ok(DefaultValue::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(self.invalid(format!("list defaults hold strings, found {other}"))),
                })
                .collect::<Result<Vec<_>>>()
                .map(DefaultValue::List),
            Value::Object(_) | Value::Null => {
                Err(self.invalid("default must be a scalar or a list of strings"))
            }
        }
    }

    fn invalid(&self, reason: impl Into<String>) -> DriverError {
        DriverError::InvalidDefinition {
            column: self.name.clone(),
            reason: reason.into(),
        }
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
}
