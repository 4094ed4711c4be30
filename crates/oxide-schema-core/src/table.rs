//! Table specifications.

use crate::column::ColumnSpec;
use crate::context::SchemaContext;
use crate::dialect::{Dialect, MySqlDialect};
use crate::error::Result;
use crate::update::UpdateSpec;

/// Definition of a table: a name and its columns in declaration order.
///
/// The owning schema is not part of the specification. It comes from the
/// [`SchemaContext`] passed when the table is rendered or reconciled.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    name: String,
    columns: Vec<ColumnSpec>,
}

impl TableSpec {
    /// Creates a table specification.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Looks up a column by name, ignoring ASCII case.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }

    /// Returns the primary key columns in declaration order.
    #[must_use]
    pub fn primary_key(&self) -> Vec<&ColumnSpec> {
        self.columns.iter().filter(|c| c.is_primary_key()).collect()
    }

    /// Returns the first auto-increment column, if any.
    #[must_use]
    pub fn auto_increment_column(&self) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.is_auto_increment())
    }

    /// Renders the CREATE TABLE statement with the MySQL dialect.
    pub fn render(&self, context: &SchemaContext) -> Result<String> {
        self.render_with(context, &MySqlDialect)
    }

    /// Renders the CREATE TABLE statement with the given dialect.
    pub fn render_with<D: Dialect + ?Sized>(
        &self,
        context: &SchemaContext,
        dialect: &D,
    ) -> Result<String> {
        dialect.create_table(context, self)
    }

    /// Starts an update of the live table currently named `previous_name`
    /// towards this specification.
    #[must_use]
    pub fn to_update(&self, previous_name: impl Into<String>) -> UpdateSpec {
        UpdateSpec::new(self.clone(), previous_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::types::{BOOLEAN, INTEGER, VARCHAR};

    fn users() -> TableSpec {
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
            ],
        )
        .column(ColumnSpec::new("active", BOOLEAN).unwrap().default(true))
    }

    #[test]
    fn test_render_users() {
        let ctx = SchemaContext::new("app").unwrap();
        assert_eq!(
            users().render(&ctx).unwrap(),
            "CREATE TABLE `app`.`users` (`id` INTEGER AUTO_INCREMENT, \
             `name` VARCHAR(100) NOT NULL, `active` BOOLEAN DEFAULT true, PRIMARY KEY (`id`));"
        );
    }

    #[test]
    fn test_render_fails_on_bad_column() {
        let ctx = SchemaContext::new("app").unwrap();
        let table = users().column(ColumnSpec::new("flag", BOOLEAN).unwrap().default(1_i64));
        assert!(matches!(
            table.render(&ctx),
            Err(SchemaError::DefaultTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_accessors() {
        let table = users();
        assert_eq!(table.name(), "users");
        assert_eq!(table.columns().len(), 3);
        assert_eq!(table.get_column("NAME").unwrap().name(), "name");
        assert_eq!(table.primary_key().len(), 1);
        assert_eq!(table.auto_increment_column().unwrap().name(), "id");
    }

    #[test]
    fn test_to_update() {
        let update = users().to_update("people");
        assert_eq!(update.table().name(), "users");
        assert_eq!(update.previous_name(), "people");
        assert!(update.is_rename());
    }
}
