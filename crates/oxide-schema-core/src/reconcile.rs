//! Reconciliation of table specifications against a live database.
//!
//! Every call renders the desired DDL first, so an invalid specification
//! fails before any statement reaches the database. The live state then
//! decides the action:
//!
//! | Live table | `add_or_pass` | `add_or_update` |
//! |---|---|---|
//! | absent | CREATE, [`Added`](ReconcileOutcome::Added) | CREATE, `Added` |
//! | present | nothing, [`Unchanged`](ReconcileOutcome::Unchanged) | ALTER if it differs, [`Updated`](ReconcileOutcome::Updated) |

use std::fmt;

use tracing::{debug, info, warn};

use crate::connection::{self, Connection};
use crate::context::SchemaContext;
use crate::diff::{diff_table, TableDiff};
use crate::dialect::{Dialect, MySqlDialect};
use crate::error::Result;
use crate::introspect::{Introspect, Introspector};
use crate::table::TableSpec;
use crate::update::UpdateSpec;

/// The result of one reconciliation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconcileOutcome {
    /// The table was created.
    Added,
    /// The live table already matched; nothing was executed.
    Unchanged,
    /// The live table was altered.
    Updated,
    /// The call returned an error.
    Failed,
}

impl ReconcileOutcome {
    /// Collapses a reconciliation result into its outcome.
    #[must_use]
    pub fn of<E>(result: &std::result::Result<Self, E>) -> Self {
        match result {
            Ok(outcome) => *outcome,
            Err(_) => Self::Failed,
        }
    }

    /// Returns the lowercase outcome name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Unchanged => "unchanged",
            Self::Updated => "updated",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creates and updates tables through a [`Connection`].
pub struct Reconciler<C, D = MySqlDialect> {
    connection: C,
    context: SchemaContext,
    dialect: D,
}

impl<C: Connection> Reconciler<C> {
    /// Creates a reconciler using the MySQL dialect.
    pub fn new(connection: C, context: SchemaContext) -> Self {
        Self::with_dialect(connection, context, MySqlDialect)
    }

    /// Creates a reconciler for the schema currently selected on `connection`.
    pub fn from_connection(mut connection: C) -> Result<Self> {
        let context = SchemaContext::from_connection(&mut connection, &MySqlDialect)?;
        Ok(Self::new(connection, context))
    }
}

impl<C: Connection, D: Dialect> Reconciler<C, D> {
    /// Creates a reconciler with an explicit dialect.
    pub fn with_dialect(connection: C, context: SchemaContext, dialect: D) -> Self {
        Self {
            connection,
            context,
            dialect,
        }
    }

    /// Returns the schema context.
    #[must_use]
    pub fn context(&self) -> &SchemaContext {
        &self.context
    }

    /// Returns the dialect used for rendering.
    #[must_use]
    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Returns the underlying connection.
    #[must_use]
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Returns the underlying connection mutably.
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Consumes the reconciler and returns its connection.
    pub fn into_inner(self) -> C {
        self.connection
    }

    fn introspector(&mut self) -> Introspector<'_, C, D> {
        Introspector::new(&mut self.connection, &self.dialect)
    }

    /// Returns whether `table` exists in the context schema.
    pub fn table_exists(&mut self, table: &str) -> Result<bool> {
        let context = self.context.clone();
        self.introspector().table_exists(&context, table)
    }

    /// Creates `table` unless a table of that name already exists.
    pub fn add_or_pass(&mut self, table: &TableSpec) -> Result<ReconcileOutcome> {
        let sql = table.render_with(&self.context, &self.dialect)?;
        let outcome = if self.table_exists(table.name())? {
            ReconcileOutcome::Unchanged
        } else {
            self.create(&sql)?
        };
        info!(table = %table.name(), outcome = %outcome, "Table reconciled");
        Ok(outcome)
    }

    /// Creates `table` if it is absent, otherwise alters the live table to
    /// match it.
    pub fn add_or_update(&mut self, table: &TableSpec) -> Result<ReconcileOutcome> {
        let sql = table.render_with(&self.context, &self.dialect)?;
        let outcome = match self.plan(table, None)? {
            None => self.create(&sql)?,
            Some(diff) => self.apply(&diff)?,
        };
        info!(table = %table.name(), outcome = %outcome, "Table reconciled");
        Ok(outcome)
    }

    /// Applies a rename-aware update.
    ///
    /// Fails with [`TableNotFound`](crate::SchemaError::TableNotFound) when
    /// the previous table does not exist.
    pub fn update(&mut self, update: &UpdateSpec) -> Result<ReconcileOutcome> {
        update
            .table()
            .render_with(&self.context, &self.dialect)?;
        let diff = update.plan(&mut self.connection, &self.context, &self.dialect)?;
        let outcome = self.apply(&diff)?;
        info!(
            table = %update.table().name(),
            previous = %update.previous_name(),
            outcome = %outcome,
            "Table reconciled"
        );
        Ok(outcome)
    }

    /// Computes the diff for `table` without executing anything.
    ///
    /// `previous` names the live table when it is being renamed. Returns
    /// `None` when the live table does not exist and would be created.
    pub fn plan(&mut self, table: &TableSpec, previous: Option<&str>) -> Result<Option<TableDiff>> {
        let context = self.context.clone();
        let live_name = previous.unwrap_or_else(|| table.name());
        let mut introspector = self.introspector();
        if !introspector.table_exists(&context, live_name)? {
            return Ok(None);
        }
        let live = introspector.columns(&context, live_name)?;
        Ok(Some(diff_table(table, &live, previous)))
    }

    fn create(&mut self, sql: &str) -> Result<ReconcileOutcome> {
        connection::execute(&mut self.connection, sql)?;
        Ok(ReconcileOutcome::Added)
    }

    fn apply(&mut self, diff: &TableDiff) -> Result<ReconcileOutcome> {
        for warning in &diff.warnings {
            warn!(table = %diff.table, warning = ?warning, "Schema difference not applied");
        }
        if diff.is_empty() {
            return Ok(ReconcileOutcome::Unchanged);
        }
        let statements = diff.statements(&self.context, &self.dialect)?;
        debug!(
            table = %diff.table,
            changes = diff.changes.len(),
            "Altering table"
        );
        for sql in &statements {
            connection::execute(&mut self.connection, sql)?;
        }
        Ok(ReconcileOutcome::Updated)
    }
}
