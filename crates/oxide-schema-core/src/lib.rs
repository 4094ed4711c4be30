//! Declarative table definitions for MySQL-family databases.
//!
//! `oxide-schema-core` turns table and column specifications into DDL and
//! reconciles them with a live database:
//! - Column modifiers are checked against the capabilities of their data type
//! - Default values are typed and checked against the column when rendered
//! - A table renders to a single `CREATE TABLE` statement, or to the
//!   `ALTER TABLE` statements that bring a live table in line with it
//!
//! # Architecture
//!
//! - **Types** - The catalog of data types and what each one supports
//! - **Column / Table** - Fluent specifications of the desired schema
//! - **Dialect** - DDL rendering (MySQL and MariaDB)
//! - **Reconciler** - Creates, skips or alters tables through a [`Connection`]
//!
//! The database itself is reached through the [`Connection`] trait; the
//! `oxide-schema` crate provides an implementation backed by sqlx.
//!
//! # Example
//!
//! ```
//! use oxide_schema_core::prelude::*;
//!
//! let users = TableSpec::new(
//!     "users",
//!     vec![
//!         ColumnSpec::new("id", INTEGER)?
//!             .primary_key(true)
//!             .auto_increment(true)?,
//!         ColumnSpec::new("name", VARCHAR)?.length(100).not_null(true),
//!         ColumnSpec::new("active", BOOLEAN)?.default(true),
//!     ],
//! );
//!
//! let context = SchemaContext::new("app")?;
//! assert_eq!(
//!     users.render(&context)?,
//!     "CREATE TABLE `app`.`users` (`id` INTEGER AUTO_INCREMENT, \
//!      `name` VARCHAR(100) NOT NULL, `active` BOOLEAN DEFAULT true, PRIMARY KEY (`id`));"
//! );
//! # Ok::<(), SchemaError>(())
//! ```

pub mod column;
pub mod connection;
pub mod context;
pub mod dialect;
pub mod diff;
pub mod error;
pub mod introspect;
pub mod reconcile;
pub mod table;
pub mod types;
pub mod update;
pub mod value;

pub use column::{ColumnSpec, Modifier};
pub use connection::{Connection, Row};
pub use context::SchemaContext;
pub use dialect::{Dialect, Engine, MySqlDialect};
pub use error::{Result, SchemaError};
pub use reconcile::{ReconcileOutcome, Reconciler};
pub use table::TableSpec;
pub use types::{DataType, StorageCategory};
pub use update::UpdateSpec;
pub use value::{DefaultValue, Parameter};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::column::{ColumnSpec, Modifier};
    pub use crate::connection::{Connection, Row};
    pub use crate::context::SchemaContext;
    pub use crate::dialect::{Dialect, Engine, MySqlDialect};
    pub use crate::diff::{ColumnChange, ColumnPosition, DiffWarning, TableDiff};
    pub use crate::error::{Result, SchemaError};
    pub use crate::introspect::{Introspect, Introspector, LiveColumn};
    pub use crate::reconcile::{ReconcileOutcome, Reconciler};
    pub use crate::table::TableSpec;
    pub use crate::types::*;
    pub use crate::update::UpdateSpec;
    pub use crate::value::{DefaultValue, Parameter};
}
