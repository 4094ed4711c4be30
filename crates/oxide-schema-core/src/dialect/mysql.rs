//! MySQL and MariaDB dialect.

use std::fmt;
use std::str::FromStr;

use super::Dialect;
use crate::error::SchemaError;

/// MySQL dialect. MariaDB shares it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }
}

/// A supported SQL engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    MySql,
    MariaDb,
}

impl Engine {
    /// Determines the engine from a connection URL scheme such as `mysql://`.
    pub fn from_url(url: &str) -> Result<Self, SchemaError> {
        let scheme = url
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .ok_or_else(|| SchemaError::UnsupportedDialect(url.to_string()))?;
        scheme.parse()
    }

    /// Returns the dialect used to render DDL for this engine.
    #[must_use]
    pub const fn dialect(self) -> MySqlDialect {
        MySqlDialect
    }

    /// Returns the URL scheme naming the engine.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::MariaDb => "mariadb",
        }
    }
}

impl FromStr for Engine {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "mariadb" => Ok(Self::MariaDb),
            _ => Err(SchemaError::UnsupportedDialect(s.to_string())),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
