//! Live schema introspection.
//!
//! [`Introspect`] answers the two questions the reconciler asks of a live
//! database: does a table exist, and what columns does it have. The
//! [`Introspector`] implements it for any [`Connection`] by issuing the
//! dialect's metadata queries.

use std::sync::LazyLock;

use regex::Regex;

use crate::connection::{self, Connection, Row};
use crate::context::SchemaContext;
use crate::dialect::Dialect;
use crate::error::Result;

static DISPLAY_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(tinyint|smallint|mediumint|int|bigint)\(\d+\)")
        .expect("display width pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// A column as reported by `SHOW COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveColumn {
    /// Column name.
    pub name: String,
    /// Full column type, e.g. `int(10) unsigned`.
    pub column_type: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Key membership: `PRI`, `UNI`, `MUL` or empty.
    pub key: String,
    /// Default value as text.
    pub default: Option<String>,
    /// Extra attributes such as `auto_increment`.
    pub extra: String,
}

impl LiveColumn {
    /// Builds a column from a `SHOW COLUMNS` row
    /// (`Field`, `Type`, `Null`, `Key`, `Default`, `Extra`).
    ///
    /// Returns `None` for rows without a field name.
    #[must_use]
    pub fn from_row(row: &Row) -> Option<Self> {
        let name = row.get(0)?.to_string();
        Some(Self {
            name,
            column_type: row.get(1).unwrap_or_default().to_string(),
            nullable: row.get(2).is_some_and(|n| n.eq_ignore_ascii_case("YES")),
            key: row.get(3).unwrap_or_default().to_string(),
            default: row.get(4).map(String::from),
            extra: row.get(5).unwrap_or_default().to_string(),
        })
    }

    /// Returns whether `Extra` marks the column `auto_increment`.
    #[must_use]
    pub fn is_auto_increment(&self) -> bool {
        self.extra.to_ascii_lowercase().contains("auto_increment")
    }

    /// Returns whether the column belongs to the primary key.
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.key.eq_ignore_ascii_case("PRI")
    }

    /// Returns whether the column carries a single-column unique index.
    #[must_use]
    pub fn has_unique_index(&self) -> bool {
        self.key.eq_ignore_ascii_case("UNI")
    }

    /// Returns the column type in normalized form.
    #[must_use]
    pub fn normalized_type(&self) -> String {
        normalize_type(&self.column_type)
    }
}

/// Normalizes a column type for comparison.
///
/// The type is lowercased, whitespace is collapsed and integer display
/// widths are dropped (`int(11) unsigned` becomes `int unsigned`).
/// `tinyint(1)` keeps its width because it is how booleans are stored.
#[must_use]
pub fn normalize_type(column_type: &str) -> String {
    let lowered = column_type.trim().to_ascii_lowercase();
    let collapsed = WHITESPACE.replace_all(&lowered, " ");
    if collapsed == "tinyint(1)" || collapsed.starts_with("tinyint(1) ") {
        return collapsed.into_owned();
    }
    DISPLAY_WIDTH.replace(&collapsed, "$1").into_owned()
}

/// Reads table and column metadata from a live database.
pub trait Introspect {
    /// Returns whether `table` exists in the context schema.
    fn table_exists(&mut self, context: &SchemaContext, table: &str) -> Result<bool>;

    /// Returns the live columns of `table` in ordinal order.
    fn columns(&mut self, context: &SchemaContext, table: &str) -> Result<Vec<LiveColumn>>;

    /// Returns whether `table` has a column named `column`.
    fn column_exists(&mut self, context: &SchemaContext, table: &str, column: &str) -> Result<bool> {
        Ok(self
            .columns(context, table)?
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(column)))
    }
}

/// [`Introspect`] implementation over a [`Connection`].
pub struct Introspector<'c, C: ?Sized, D: ?Sized> {
    connection: &'c mut C,
    dialect: &'c D,
}

impl<'c, C, D> Introspector<'c, C, D>
where
    C: Connection + ?Sized,
    D: Dialect + ?Sized,
{
    /// Creates an introspector borrowing the connection and dialect.
    pub fn new(connection: &'c mut C, dialect: &'c D) -> Self {
        Self {
            connection,
            dialect,
        }
    }
}

impl<C, D> Introspect for Introspector<'_, C, D>
where
    C: Connection + ?Sized,
    D: Dialect + ?Sized,
{
    fn table_exists(&mut self, context: &SchemaContext, table: &str) -> Result<bool> {
        let sql = self.dialect.table_exists_query(context, table);
        let rows = connection::fetch(&mut *self.connection, &sql)?;
        Ok(rows
            .iter()
            .any(|row| row.get(0).is_some_and(|name| name.eq_ignore_ascii_case(table))))
    }

    fn columns(&mut self, context: &SchemaContext, table: &str) -> Result<Vec<LiveColumn>> {
        let sql = self.dialect.show_columns_query(context, table);
        let rows = connection::fetch(&mut *self.connection, &sql)?;
        Ok(rows.iter().filter_map(LiveColumn::from_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[Option<&str>]) -> Row {
        cells.iter().map(|c| c.map(String::from)).collect()
    }

    #[test]
    fn test_normalize_type() {
        assert_eq!(normalize_type("INT(11)"), "int");
        assert_eq!(normalize_type("int(10) unsigned zerofill"), "int unsigned zerofill");
        assert_eq!(normalize_type("bigint(20)  UNSIGNED"), "bigint unsigned");
        assert_eq!(normalize_type("tinyint(1)"), "tinyint(1)");
        assert_eq!(normalize_type("tinyint(4)"), "tinyint");
        assert_eq!(normalize_type("varchar(100)"), "varchar(100)");
        assert_eq!(normalize_type("enum('a','b')"), "enum('a','b')");
    }

    #[test]
    fn test_live_column_from_row() {
        let column = LiveColumn::from_row(&row(&[
            Some("id"),
            Some("int(11)"),
            Some("NO"),
            Some("PRI"),
            None,
            Some("auto_increment"),
        ]))
        .unwrap();
        assert_eq!(column.name, "id");
        assert!(!column.nullable);
        assert!(column.is_primary_key());
        assert!(!column.has_unique_index());
        assert!(column.is_auto_increment());
        assert_eq!(column.default, None);
        assert_eq!(column.normalized_type(), "int");
    }

    #[test]
    fn test_live_column_requires_name() {
        assert!(LiveColumn::from_row(&row(&[None, Some("int")])).is_none());
    }
}
