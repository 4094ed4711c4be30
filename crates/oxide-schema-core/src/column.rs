//! Column specifications.
//!
//! A [`ColumnSpec`] is built with a consuming, fluent API. Flags that every
//! type accepts (`primary_key`, `not_null`, `unique_index`) are infallible;
//! modifiers gated by a [`DataType`] capability return a [`Result`] and fail
//! with [`SchemaError::UnsupportedModifier`] when the type cannot carry them.
//!
//! ```
//! use oxide_schema_core::column::ColumnSpec;
//! use oxide_schema_core::types::{INTEGER, VARCHAR};
//!
//! let id = ColumnSpec::new("id", INTEGER)?
//!     .primary_key(true)
//!     .auto_increment(true)?;
//! assert_eq!(id.render()?, "`id` INTEGER AUTO_INCREMENT");
//!
//! let name = ColumnSpec::new("name", VARCHAR)?.length(100).not_null(true);
//! assert_eq!(name.render()?, "`name` VARCHAR(100) NOT NULL");
//! # Ok::<(), oxide_schema_core::SchemaError>(())
//! ```

use std::fmt;

use crate::dialect::{Dialect, MySqlDialect};
use crate::error::{Result, SchemaError};
use crate::types::DataType;
use crate::value::{DefaultValue, Parameter};

/// A capability-gated column modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// `UNSIGNED`.
    Unsigned,
    /// `ZEROFILL`.
    ZeroFill,
    /// `AUTO_INCREMENT`.
    AutoIncrement,
}

impl Modifier {
    /// Returns the SQL keyword for this modifier.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Unsigned => "UNSIGNED",
            Self::ZeroFill => "ZEROFILL",
            Self::AutoIncrement => "AUTO_INCREMENT",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Definition of a single table column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    name: String,
    data_type: DataType,
    primary_key: bool,
    not_null: bool,
    unique_index: bool,
    unsigned: bool,
    zero_fill: bool,
    auto_increment: bool,
    default: Option<DefaultValue>,
    parameter: Option<Parameter>,
}

impl ColumnSpec {
    /// Creates a nullable column with no modifiers.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SchemaError::EmptyName("Column"));
        }
        Ok(Self {
            name,
            data_type,
            primary_key: false,
            not_null: false,
            unique_index: false,
            unsigned: false,
            zero_fill: false,
            auto_increment: false,
            default: None,
            parameter: None,
        })
    }

    /// Includes the column in the table's primary key.
    #[must_use]
    pub fn primary_key(mut self, enabled: bool) -> Self {
        self.primary_key = enabled;
        self
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self, enabled: bool) -> Self {
        self.not_null = enabled;
        self
    }

    /// Gives the column its own unique index.
    #[must_use]
    pub fn unique_index(mut self, enabled: bool) -> Self {
        self.unique_index = enabled;
        self
    }

    /// Marks the column as UNSIGNED.
    pub fn unsigned(mut self, enabled: bool) -> Result<Self> {
        self.check_capability(Modifier::Unsigned, enabled)?;
        self.unsigned = enabled;
        Ok(self)
    }

    /// Marks the column as ZEROFILL.
    pub fn zero_fill(mut self, enabled: bool) -> Result<Self> {
        self.check_capability(Modifier::ZeroFill, enabled)?;
        self.zero_fill = enabled;
        Ok(self)
    }

    /// Marks the column as AUTO_INCREMENT.
    pub fn auto_increment(mut self, enabled: bool) -> Result<Self> {
        self.check_capability(Modifier::AutoIncrement, enabled)?;
        self.auto_increment = enabled;
        Ok(self)
    }

    /// Sets the default value. It is checked against the type when rendered.
    #[must_use]
    pub fn default(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the type parameter. It is checked against the type when rendered.
    #[must_use]
    pub fn parameter(mut self, value: impl Into<Parameter>) -> Self {
        self.parameter = Some(value.into());
        self
    }

    /// Shorthand for a [`Parameter::Length`].
    #[must_use]
    pub fn length(self, length: u64) -> Self {
        self.parameter(Parameter::Length(length))
    }

    /// Shorthand for a [`Parameter::Values`] list.
    #[must_use]
    pub fn values<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameter(Parameter::Values(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    fn check_capability(&self, modifier: Modifier, enabled: bool) -> Result<()> {
        let supported = match modifier {
            Modifier::Unsigned => self.data_type.supports_unsigned(),
            Modifier::ZeroFill => self.data_type.supports_zero_fill(),
            Modifier::AutoIncrement => self.data_type.supports_auto_increment(),
        };
        if enabled && !supported {
            return Err(SchemaError::UnsupportedModifier {
                column: self.name.clone(),
                data_type: self.data_type.name(),
                modifier,
            });
        }
        Ok(())
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column's data type.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns whether the column is part of the primary key.
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Returns whether the column is declared `NOT NULL`.
    #[must_use]
    pub fn is_not_null(&self) -> bool {
        self.not_null
    }

    /// Returns whether the column accepts NULL.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        !self.not_null
    }

    /// Returns whether the column gets its own unique index.
    #[must_use]
    pub fn has_unique_index(&self) -> bool {
        self.unique_index
    }

    /// Returns whether the column is `UNSIGNED`.
    #[must_use]
    pub fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    /// Returns whether the column is `ZEROFILL`.
    #[must_use]
    pub fn has_zero_fill(&self) -> bool {
        self.zero_fill
    }

    /// Returns whether the column is `AUTO_INCREMENT`.
    #[must_use]
    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    /// Returns the default value, if one was set.
    #[must_use]
    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// Returns the type parameter, if one was set.
    #[must_use]
    pub fn parameter_value(&self) -> Option<&Parameter> {
        self.parameter.as_ref()
    }

    /// Renders the column definition with the MySQL dialect.
    pub fn render(&self) -> Result<String> {
        self.render_with(&MySqlDialect)
    }

    /// Renders the column definition with the given dialect.
    pub fn render_with<D: Dialect + ?Sized>(&self, dialect: &D) -> Result<String> {
        dialect.column_definition(self)
    }
}
