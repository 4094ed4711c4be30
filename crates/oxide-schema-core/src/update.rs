//! Rename-aware table updates.

use tracing::debug;

use crate::connection::Connection;
use crate::context::SchemaContext;
use crate::diff::{diff_table, TableDiff};
use crate::dialect::Dialect;
use crate::error::{Result, SchemaError};
use crate::introspect::{Introspect, Introspector};
use crate::table::TableSpec;

/// An update of the live table `previous_name` towards a desired [`TableSpec`].
///
/// Created with [`TableSpec::to_update`]. When the names differ the update
/// renames the table before altering its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSpec {
    table: TableSpec,
    previous_name: String,
}

impl UpdateSpec {
    /// Creates an update of `previous_name` towards `table`.
    pub fn new(table: TableSpec, previous_name: impl Into<String>) -> Self {
        Self {
            table,
            previous_name: previous_name.into(),
        }
    }

    /// Returns the desired table.
    #[must_use]
    pub fn table(&self) -> &TableSpec {
        &self.table
    }

    /// Returns the live name the update starts from.
    #[must_use]
    pub fn previous_name(&self) -> &str {
        &self.previous_name
    }

    /// Returns `true` if the table is renamed.
    #[must_use]
    pub fn is_rename(&self) -> bool {
        self.previous_name != self.table.name()
    }

    /// Computes the diff against the live table without executing anything.
    ///
    /// Fails with [`SchemaError::TableNotFound`] if `previous_name` does not
    /// exist.
    pub fn plan<C, D>(
        &self,
        connection: &mut C,
        context: &SchemaContext,
        dialect: &D,
    ) -> Result<TableDiff>
    where
        C: Connection + ?Sized,
        D: Dialect + ?Sized,
    {
        let mut introspector = Introspector::new(connection, dialect);
        if !introspector.table_exists(context, &self.previous_name)? {
            return Err(SchemaError::TableNotFound(self.previous_name.clone()));
        }
        let live = introspector.columns(context, &self.previous_name)?;
        debug!(
            table = %self.table.name(),
            previous = %self.previous_name,
            live_columns = live.len(),
            "Comparing live table"
        );
        Ok(diff_table(&self.table, &live, Some(&self.previous_name)))
    }
}
