//! Dialect-specific DDL rendering.
//!
//! [`Dialect`] carries the whole rendering algorithm as provided methods.
//! An implementation only has to name itself; everything else (identifier
//! quoting, literal formatting, column and table clauses, the metadata
//! queries used during reconciliation) can be overridden piecemeal.

mod mysql;

pub use mysql::{Engine, MySqlDialect};

use crate::column::ColumnSpec;
use crate::context::SchemaContext;
use crate::diff::{ColumnChange, ColumnPosition};
use crate::error::{Result, SchemaError};
use crate::table::TableSpec;
use crate::types::{signed_range, unsigned_max, StorageCategory};
use crate::value::{DefaultValue, Parameter};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Trait for dialect-specific DDL generation.
pub trait Dialect {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn quote_char(&self) -> char {
        '`'
    }

    /// Quotes an identifier, doubling any embedded quote character.
    fn quote_identifier(&self, name: &str) -> String {
        let q = self.quote_char();
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(q);
        for c in name.chars() {
            if c == q {
                quoted.push(q);
            }
            quoted.push(c);
        }
        quoted.push(q);
        quoted
    }

    /// Returns `schema.table` with both parts quoted.
    fn qualified_name(&self, schema: &str, table: &str) -> String {
        format!(
            "{}.{}",
            self.quote_identifier(schema),
            self.quote_identifier(table)
        )
    }

    /// Formats a single-quoted string literal.
    fn string_literal(&self, value: &str) -> String {
        let mut literal = String::with_capacity(value.len() + 2);
        literal.push('\'');
        for c in value.chars() {
            match c {
                '\'' => literal.push_str("''"),
                '\\' => literal.push_str("\\\\"),
                _ => literal.push(c),
            }
        }
        literal.push('\'');
        literal
    }

    /// Renders the type clause of a column, including its parameter.
    fn type_clause(&self, column: &ColumnSpec) -> Result<String> {
        let data_type = column.data_type();
        let category = data_type.category();

        if category.is_list() {
            return match column.parameter_value() {
                Some(Parameter::Values(values)) if !values.is_empty() => {
                    let list: Vec<String> = values.iter().map(|v| self.string_literal(v)).collect();
                    Ok(format!("{}({})", data_type.name(), list.join(",")))
                }
                Some(Parameter::Length(_)) => Err(parameter_mismatch(
                    column,
                    "expected a value list, found a length".to_string(),
                )),
                _ => Err(SchemaError::PropertyRequired {
                    column: column.name().to_string(),
                    data_type: data_type.name(),
                }),
            };
        }

        let length = match column.parameter_value() {
            Some(Parameter::Values(_)) => {
                return Err(parameter_mismatch(
                    column,
                    "value lists are only accepted by ENUM and SET".to_string(),
                ));
            }
            Some(Parameter::Length(length)) => Some(*length),
            None => data_type.default_parameter(),
        };

        let Some(length) = length else {
            return Ok(data_type.name().to_string());
        };
        if !data_type.accepts_length() {
            return Err(parameter_mismatch(
                column,
                format!("{data_type} does not take a length"),
            ));
        }
        if let Some(max) = data_type.max_length() {
            if length > max {
                return Err(parameter_mismatch(
                    column,
                    format!("length {length} exceeds the maximum of {max}"),
                ));
            }
        }
        Ok(format!("{}({length})", data_type.name()))
    }

    /// Formats a default value as a literal for the given column.
    fn default_literal(&self, column: &ColumnSpec, value: &DefaultValue) -> Result<String> {
        let data_type = column.data_type();
        match (data_type.category(), value) {
            (StorageCategory::Integer { bits }, DefaultValue::Signed(v)) if !column.is_unsigned() => {
                let (min, max) = signed_range(bits);
                if (min..=max).contains(v) {
                    Ok(v.to_string())
                } else {
                    Err(default_mismatch(
                        column,
                        value,
                        format!("a signed integer between {min} and {max}"),
                    ))
                }
            }
            (StorageCategory::Integer { bits }, DefaultValue::Unsigned(v)) if column.is_unsigned() => {
                let max = unsigned_max(bits);
                if *v <= max {
                    Ok(v.to_string())
                } else {
                    Err(default_mismatch(
                        column,
                        value,
                        format!("an unsigned integer no greater than {max}"),
                    ))
                }
            }
            (StorageCategory::Integer { .. }, _) => Err(default_mismatch(
                column,
                value,
                signedness(column, "integer"),
            )),
            (StorageCategory::FloatingPoint, DefaultValue::Float(v))
                if v.is_finite() && !(column.is_unsigned() && *v < 0.0) =>
            {
                Ok(v.to_string())
            }
            (StorageCategory::FloatingPoint, DefaultValue::Signed(v)) if !column.is_unsigned() => {
                Ok(v.to_string())
            }
            (StorageCategory::FloatingPoint, DefaultValue::Unsigned(v)) if column.is_unsigned() => {
                Ok(v.to_string())
            }
            (StorageCategory::FloatingPoint, _) => Err(default_mismatch(
                column,
                value,
                signedness(column, "finite number"),
            )),
            (StorageCategory::Boolean, DefaultValue::Bool(v)) => Ok(v.to_string()),
            (StorageCategory::Bit, DefaultValue::Bool(v)) => {
                Ok(format!("b'{}'", u8::from(*v)))
            }
            (StorageCategory::Bit, DefaultValue::Unsigned(_) | DefaultValue::Signed(_)) => {
                let width = match column.parameter_value() {
                    Some(Parameter::Length(length)) => *length,
                    _ => 1,
                };
                let bits = match value {
                    DefaultValue::Unsigned(v) => Some(*v),
                    DefaultValue::Signed(v) => u64::try_from(*v).ok(),
                    _ => None,
                };
                match bits {
                    Some(v) if width >= 64 || v >> width == 0 => Ok(format!("b'{v:b}'")),
                    _ => Err(default_mismatch(
                        column,
                        value,
                        format!("a non-negative integer that fits in {width} bits"),
                    )),
                }
            }
            (StorageCategory::TemporalDate, DefaultValue::Date(v)) => {
                Ok(self.string_literal(&v.format(DATE_FORMAT).to_string()))
            }
            (StorageCategory::TemporalDateTime, DefaultValue::DateTime(v)) => {
                Ok(self.string_literal(&v.format(DATETIME_FORMAT).to_string()))
            }
            (StorageCategory::TemporalTime, DefaultValue::Time(v)) => {
                Ok(self.string_literal(&v.format(TIME_FORMAT).to_string()))
            }
            (StorageCategory::VariableString, DefaultValue::Text(v)) => Ok(self.string_literal(v)),
            (StorageCategory::Enum, DefaultValue::Text(v)) => {
                let allowed = allowed_values(column);
                if allowed.iter().any(|a| a == v) {
                    Ok(self.string_literal(v))
                } else {
                    Err(default_mismatch(column, value, one_of(&allowed)))
                }
            }
            (StorageCategory::Set, DefaultValue::List(items)) => {
                let allowed = allowed_values(column);
                if items.iter().all(|item| allowed.contains(item)) {
                    Ok(self.string_literal(&items.join(",")))
                } else {
                    Err(default_mismatch(
                        column,
                        value,
                        format!("a list drawn from {}", one_of(&allowed)),
                    ))
                }
            }
            (category, _) => Err(default_mismatch(
                column,
                value,
                category.expected_default().to_string(),
            )),
        }
    }

    /// Renders a full column definition.
    ///
    /// Tokens follow the type clause in a fixed order: `NOT NULL`,
    /// `AUTO_INCREMENT`, `ZEROFILL`, `UNSIGNED`, then `DEFAULT`. A default is
    /// never rendered for an auto-increment column.
    fn column_definition(&self, column: &ColumnSpec) -> Result<String> {
        let data_type = column.data_type();
        let mut sql = format!(
            "{} {}",
            self.quote_identifier(column.name()),
            self.type_clause(column)?
        );

        if column.is_not_null() {
            sql.push_str(" NOT NULL");
        }
        if column.is_auto_increment() && data_type.supports_auto_increment() {
            sql.push_str(" AUTO_INCREMENT");
        }
        if column.has_zero_fill() && data_type.supports_zero_fill() {
            sql.push_str(" ZEROFILL");
        }
        if column.is_unsigned() && data_type.supports_unsigned() {
            sql.push_str(" UNSIGNED");
        }
        if !column.is_auto_increment() {
            if let Some(value) = column.default_value() {
                sql.push_str(" DEFAULT ");
                sql.push_str(&self.default_literal(column, value)?);
            }
        }

        Ok(sql)
    }

    /// Returns the name of the unique index created for a column.
    fn unique_index_name(&self, column: &str) -> String {
        format!("{column}_UNIQUE")
    }

    /// Renders the unique index clause for a column.
    fn unique_index_clause(&self, column: &str) -> String {
        format!(
            "UNIQUE INDEX {} ({} ASC)",
            self.quote_identifier(&self.unique_index_name(column)),
            self.quote_identifier(column)
        )
    }

    /// Renders the composite primary key clause.
    fn primary_key_clause(&self, columns: &[&str]) -> String {
        let cols: Vec<String> = columns.iter().map(|c| self.quote_identifier(c)).collect();
        format!("PRIMARY KEY ({})", cols.join(", "))
    }

    /// Renders the CREATE TABLE statement for a table.
    fn create_table(&self, context: &SchemaContext, table: &TableSpec) -> Result<String> {
        if table.name().trim().is_empty() {
            return Err(SchemaError::EmptyName("Table"));
        }
        if table.columns().is_empty() {
            return Err(SchemaError::EmptyTable(table.name().to_string()));
        }

        let mut clauses = Vec::with_capacity(table.columns().len() + 1);
        let mut auto_increment: Option<&str> = None;
        let mut primary_key = Vec::new();
        let mut unique = Vec::new();

        for column in table.columns() {
            if column.is_auto_increment() {
                if let Some(first) = auto_increment {
                    return Err(SchemaError::MultipleAutoIncrement {
                        table: table.name().to_string(),
                        first: first.to_string(),
                        second: column.name().to_string(),
                    });
                }
                auto_increment = Some(column.name());
            }
            clauses.push(self.column_definition(column)?);
            if column.is_primary_key() {
                primary_key.push(column.name());
            }
            if column.has_unique_index() {
                unique.push(column.name());
            }
        }

        if !primary_key.is_empty() {
            clauses.push(self.primary_key_clause(&primary_key));
        }
        clauses.extend(unique.into_iter().map(|c| self.unique_index_clause(c)));

        Ok(format!(
            "CREATE TABLE {} ({});",
            self.qualified_name(context.schema(), table.name()),
            clauses.join(", ")
        ))
    }

    /// Renders one specification of an ALTER TABLE statement.
    fn alter_specification(&self, change: &ColumnChange) -> Result<String> {
        Ok(match change {
            ColumnChange::Add { column, position } => {
                let mut sql = format!("ADD COLUMN {}", self.column_definition(column)?);
                match position {
                    ColumnPosition::First => sql.push_str(" FIRST"),
                    ColumnPosition::After(previous) => {
                        sql.push_str(" AFTER ");
                        sql.push_str(&self.quote_identifier(previous));
                    }
                }
                sql
            }
            ColumnChange::Drop { name } => format!("DROP COLUMN {}", self.quote_identifier(name)),
            ColumnChange::Modify { column, .. } => {
                format!("MODIFY COLUMN {}", self.column_definition(column)?)
            }
            ColumnChange::AddPrimaryKey { columns } => {
                let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
                format!("ADD {}", self.primary_key_clause(&columns))
            }
            ColumnChange::AddUniqueIndex { column } => {
                format!("ADD {}", self.unique_index_clause(column))
            }
        })
    }

    /// Renders an ALTER TABLE statement from already rendered specifications.
    fn alter_table(&self, context: &SchemaContext, table: &str, specifications: &[String]) -> String {
        format!(
            "ALTER TABLE {} {};",
            self.qualified_name(context.schema(), table),
            specifications.join(", ")
        )
    }

    /// Renders a table rename within the context schema.
    fn rename_table(&self, context: &SchemaContext, from: &str, to: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME TO {};",
            self.qualified_name(context.schema(), from),
            self.qualified_name(context.schema(), to)
        )
    }

    /// Query listing tables whose name matches `table`.
    ///
    /// `LIKE` wildcards are not escaped, so callers compare the returned
    /// names, ignoring ASCII case.
    fn table_exists_query(&self, context: &SchemaContext, table: &str) -> String {
        format!(
            "SHOW TABLES FROM {} LIKE {}",
            self.quote_identifier(context.schema()),
            self.string_literal(table)
        )
    }

    /// Query describing the live columns of a table.
    fn show_columns_query(&self, context: &SchemaContext, table: &str) -> String {
        format!(
            "SHOW COLUMNS FROM {}",
            self.qualified_name(context.schema(), table)
        )
    }

    /// Query returning the currently selected schema.
    fn current_schema_query(&self) -> &'static str {
        "SELECT DATABASE()"
    }
}

fn parameter_mismatch(column: &ColumnSpec, reason: String) -> SchemaError {
    SchemaError::ParameterMismatch {
        column: column.name().to_string(),
        data_type: column.data_type().name(),
        reason,
    }
}

fn default_mismatch(column: &ColumnSpec, value: &DefaultValue, expected: String) -> SchemaError {
    SchemaError::DefaultTypeMismatch {
        column: column.name().to_string(),
        data_type: column.data_type().name(),
        expected,
        found: value.kind(),
    }
}

fn signedness(column: &ColumnSpec, noun: &str) -> String {
    if column.is_unsigned() {
        format!("an unsigned {noun}")
    } else {
        format!("a signed {noun}")
    }
}

fn allowed_values(column: &ColumnSpec) -> Vec<String> {
    match column.parameter_value() {
        Some(Parameter::Values(values)) => values.clone(),
        _ => Vec::new(),
    }
}

fn one_of(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("'{v}'")).collect();
    format!("one of {}", quoted.join(", "))
}
