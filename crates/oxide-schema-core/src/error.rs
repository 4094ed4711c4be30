//! Error types for schema rendering and reconciliation.

use crate::column::Modifier;

/// Boxed error reported by a [`Connection`](crate::connection::Connection).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while rendering or reconciling a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The requested SQL engine is not supported.
    #[error("Unsupported SQL engine: {0}")]
    UnsupportedDialect(String),

    /// No schema name could be established for rendering or reconciliation.
    #[error("No schema is selected; create a SchemaContext before rendering or reconciling")]
    SchemaUninitialized,

    /// A column or table was given an empty name.
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    /// A table was declared without any columns.
    #[error("Table '{0}' has no columns")]
    EmptyTable(String),

    /// An ENUM or SET column was rendered without its value list.
    #[error("Column '{column}' of type {data_type} requires a value list")]
    PropertyRequired {
        /// Column name.
        column: String,
        /// Canonical type name.
        data_type: &'static str,
    },

    /// A modifier was requested on a type that does not support it.
    #[error("Column '{column}' of type {data_type} does not support {modifier}")]
    UnsupportedModifier {
        /// Column name.
        column: String,
        /// Canonical type name.
        data_type: &'static str,
        /// The rejected modifier.
        modifier: Modifier,
    },

    /// A length or value-list parameter does not fit the column's type.
    #[error("Invalid parameter for column '{column}' of type {data_type}: {reason}")]
    ParameterMismatch {
        /// Column name.
        column: String,
        /// Canonical type name.
        data_type: &'static str,
        /// What was wrong with the parameter.
        reason: String,
    },

    /// A default value does not match the column's storage category.
    #[error(
        "Default value of column '{column}' ({found}) does not fit {data_type}: expected {expected}"
    )]
    DefaultTypeMismatch {
        /// Column name.
        column: String,
        /// Canonical type name.
        data_type: &'static str,
        /// The representation the column accepts.
        expected: String,
        /// The representation that was supplied.
        found: &'static str,
    },

    /// More than one column of a table is marked AUTO_INCREMENT.
    #[error("Table '{table}' declares more than one AUTO_INCREMENT column ('{first}', '{second}')")]
    MultipleAutoIncrement {
        /// Table name.
        table: String,
        /// The first auto-increment column.
        first: String,
        /// The offending second auto-increment column.
        second: String,
    },

    /// An ALTER would add an AUTO_INCREMENT column that is not part of any key.
    #[error("Column '{column}' of table '{table}' cannot be added as AUTO_INCREMENT without a key")]
    UnkeyedAutoIncrement {
        /// Table name.
        table: String,
        /// The added auto-increment column.
        column: String,
    },

    /// An update workflow referenced a table that does not exist.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// A type name could not be resolved against the catalog.
    #[error("Unknown data type: {0}")]
    UnknownType(String),

    /// The connection reported an error while running a statement.
    #[error("Query failed: {sql}")]
    QueryFailure {
        /// The statement that failed.
        sql: String,
        /// The underlying connection error.
        #[source]
        source: BoxError,
    },
}

impl SchemaError {
    /// Wraps a connection error for the given statement.
    pub fn query_failure(sql: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::QueryFailure {
            sql: sql.into(),
            source: source.into(),
        }
    }
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
