//! MySQL driver, definition files and CLI support for `oxide-schema-core`.
//!
//! - [`MySqlConnection`] implements the core [`Connection`](oxide_schema_core::Connection)
//!   trait on top of sqlx
//! - [`SchemaDefinition`] reads the desired tables from a JSON file
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the CREATE TABLE statements without touching a database
//! oxide-schema -f schema.json render --schema app
//!
//! # Create missing tables
//! oxide-schema -d mysql://root@localhost/app -f schema.json sync
//!
//! # Create missing tables and alter drifted ones
//! oxide-schema -d mysql://root@localhost/app -f schema.json sync --update
//!
//! # Show the ALTER statements sync --update would run
//! oxide-schema -d mysql://root@localhost/app -f schema.json diff
//! ```

pub mod definition;
pub mod error;
pub mod mysql;

pub use definition::{ColumnDefinition, SchemaDefinition, TableDefinition};
pub use error::{DriverError, Result};
pub use mysql::MySqlConnection;
