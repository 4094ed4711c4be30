//! Blocking MySQL connection backed by sqlx.
//!
//! The schema layer works with a synchronous [`Connection`]. This adapter
//! owns a single sqlx connection together with a current-thread tokio
//! runtime and blocks on each call. Statements are sent through the text
//! protocol, so every cell comes back as text.

use std::str::FromStr;
use std::time::Duration;

use oxide_schema_core::{Connection, Engine, Row};
use sqlx::mysql::{MySqlConnectOptions, MySqlRow};
use sqlx::Connection as _;
use sqlx::Row as _;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

use crate::error::{DriverError, Result};

/// How long to wait for the server to accept a connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// A MySQL or MariaDB connection.
pub struct MySqlConnection {
    runtime: Runtime,
    inner: sqlx::mysql::MySqlConnection,
    engine: Engine,
}

impl MySqlConnection {
    /// Connects to a `mysql://` or `mariadb://` URL.
    pub fn connect(url: &str) -> Result<Self> {
        let engine = Engine::from_url(url)?;
        let url = match engine {
            Engine::MariaDb => url.replacen("mariadb://", "mysql://", 1),
            Engine::MySql => url.to_string(),
        };
        let options = MySqlConnectOptions::from_str(&url)?;

        let runtime = Builder::new_current_thread().enable_all().build()?;
        let inner = runtime
            .block_on(async {
                tokio::time::timeout(
                    CONNECT_TIMEOUT,
                    sqlx::mysql::MySqlConnection::connect_with(&options),
                )
                .await
            })
            .map_err(|_| DriverError::ConnectTimeout(CONNECT_TIMEOUT))??;

        info!(engine = %engine, "Connected to database");
        Ok(Self {
            runtime,
            inner,
            engine,
        })
    }

    /// Returns the engine named by the connection URL.
    #[must_use]
    pub fn engine(&self) -> Engine {
        self.engine
    }
}

impl Connection for MySqlConnection {
    type Error = sqlx::Error;

    fn query(&mut self, sql: &str) -> std::result::Result<Vec<Row>, Self::Error> {
        let rows = self
            .runtime
            .block_on(sqlx::raw_sql(sql).fetch_all(&mut self.inner))?;
        debug!(rows = rows.len(), "Query returned");
        Ok(rows.iter().map(to_row).collect())
    }

    fn execute(&mut self, sql: &str) -> std::result::Result<u64, Self::Error> {
        let result = self
            .runtime
            .block_on(sqlx::raw_sql(sql).execute(&mut self.inner))?;
        Ok(result.rows_affected())
    }

    fn ping(&mut self) -> std::result::Result<(), Self::Error> {
        self.runtime.block_on(self.inner.ping())
    }

    fn close(self) -> std::result::Result<(), Self::Error> {
        let Self { runtime, inner, .. } = self;
        runtime.block_on(inner.close())
    }
}

fn to_row(row: &MySqlRow) -> Row {
    (0..row.len()).map(|index| cell(row, index)).collect()
}

fn cell(row: &MySqlRow, index: usize) -> Option<String> {
    match row.try_get_unchecked::<Option<String>, _>(index) {
        Ok(value) => value,
        Err(_) => row
            .try_get_unchecked::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
    }
}
