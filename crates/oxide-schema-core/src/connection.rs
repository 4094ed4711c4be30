//! The database collaborator contract.
//!
//! The reconciler never talks to a driver directly. It issues plain SQL text
//! through a [`Connection`] and reads the answers back as [`Row`]s of
//! optional text cells, which is all the existence checks and column
//! introspection need.

use tracing::debug;

use crate::error::{Result, SchemaError};

/// A result row with every cell decoded as optional text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: Vec<Option<String>>,
}

impl Row {
    /// Creates a row from its cells.
    #[must_use]
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    /// Returns the text of the cell at `index`, or `None` for SQL NULL or a
    /// missing cell.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(Option::as_deref)
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the row has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Option<String>>> for Row {
    fn from(values: Vec<Option<String>>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<Option<String>> for Row {
    fn from_iter<I: IntoIterator<Item = Option<String>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A synchronous connection able to run SQL text.
pub trait Connection {
    /// Error reported by the underlying driver.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs a statement that returns rows.
    fn query(&mut self, sql: &str) -> std::result::Result<Vec<Row>, Self::Error>;

    /// Runs a statement and returns the number of affected rows.
    fn execute(&mut self, sql: &str) -> std::result::Result<u64, Self::Error>;

    /// Checks that the connection is alive.
    fn ping(&mut self) -> std::result::Result<(), Self::Error>;

    /// Closes the connection.
    fn close(self) -> std::result::Result<(), Self::Error>
    where
        Self: Sized;
}

pub(crate) fn fetch<C: Connection + ?Sized>(connection: &mut C, sql: &str) -> Result<Vec<Row>> {
    debug!(sql = %sql, "Running query");
    connection
        .query(sql)
        .map_err(|e| SchemaError::query_failure(sql, e))
}

pub(crate) fn execute<C: Connection + ?Sized>(connection: &mut C, sql: &str) -> Result<u64> {
    debug!(sql = %sql, "Executing statement");
    connection
        .execute(sql)
        .map_err(|e| SchemaError::query_failure(sql, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_access() {
        let row: Row = vec![Some("users".to_string()), None].into();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get(0), Some("users"));
        assert_eq!(row.get(1), None);
        assert_eq!(row.get(5), None);
        assert!(!row.is_empty());
        assert!(Row::default().is_empty());
    }

    #[test]
    fn test_row_from_iterator() {
        let row: Row = ["a", "b"].iter().map(|s| Some((*s).to_string())).collect();
        assert_eq!(row.get(1), Some("b"));
    }
}
