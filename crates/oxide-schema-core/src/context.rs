//! The active schema that rendering and reconciliation run against.

use crate::connection::{self, Connection};
use crate::dialect::Dialect;
use crate::error::{Result, SchemaError};

/// Names the schema every rendered table is qualified with.
///
/// A context is built once, either from a known schema name or from the
/// schema currently selected on a connection, and then passed by reference
/// to every render and reconcile call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaContext {
    schema: String,
}

impl SchemaContext {
    /// Creates a context for the given schema name.
    pub fn new(schema: impl Into<String>) -> Result<Self> {
        let schema = schema.into();
        if schema.trim().is_empty() {
            return Err(SchemaError::SchemaUninitialized);
        }
        Ok(Self { schema })
    }

    /// Creates a context from the schema selected on `connection`.
    ///
    /// Fails with [`SchemaError::SchemaUninitialized`] when the connection has
    /// no default schema.
    pub fn from_connection<C, D>(connection: &mut C, dialect: &D) -> Result<Self>
    where
        C: Connection + ?Sized,
        D: Dialect + ?Sized,
    {
        let rows = connection::fetch(connection, dialect.current_schema_query())?;
        let schema = rows
            .first()
            .and_then(|row| row.get(0))
            .ok_or(SchemaError::SchemaUninitialized)?;
        Self::new(schema)
    }

    /// Returns the schema name.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_schema_is_uninitialized() {
        assert!(matches!(
            SchemaContext::new(""),
            Err(SchemaError::SchemaUninitialized)
        ));
        assert_eq!(SchemaContext::new("app").unwrap().schema(), "app");
    }
}
