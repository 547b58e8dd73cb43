use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::AnyPool;

use tablegen_core::{Result, TableDescriptor};

use crate::fallback::FallbackAdapter;
use crate::mysql::MysqlAdapter;
use crate::postgres::PostgresAdapter;
use crate::sqlite::SqliteAdapter;

/// Database family identifier used to select an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Mysql,
    Postgres,
    Sqlite,
    Mssql,
    Unknown,
}

impl FromStr for Engine {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match raw.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Engine::Mysql,
            "postgres" | "postgresql" | "pgx" => Engine::Postgres,
            "sqlite" | "sqlite3" => Engine::Sqlite,
            "mssql" | "sqlserver" => Engine::Mssql,
            _ => Engine::Unknown,
        })
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Engine::Mysql => "mysql",
            Engine::Postgres => "postgres",
            Engine::Sqlite => "sqlite",
            Engine::Mssql => "mssql",
            Engine::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Trait implemented by dialect adapters that can describe tables.
#[async_trait]
pub trait DialectAdapter: Send + Sync {
    /// The engine family this adapter understands.
    fn engine(&self) -> Engine;

    /// Describe one table as a normalized descriptor.
    ///
    /// Adapters never partially populate a descriptor: a failed
    /// metadata query returns the error and nothing else.
    async fn describe_table(
        &self,
        pool: &AnyPool,
        database: &str,
        table: &str,
    ) -> Result<TableDescriptor>;
}

/// Select the adapter for an engine family.
///
/// SQL Server and unrecognized engines share the fallback adapter; its
/// primary-key determination is a positional guess, not authoritative.
pub fn adapter_for(engine: Engine) -> Box<dyn DialectAdapter> {
    match engine {
        Engine::Mysql => Box::new(MysqlAdapter),
        Engine::Postgres => Box::new(PostgresAdapter),
        Engine::Sqlite => Box::new(SqliteAdapter),
        Engine::Mssql | Engine::Unknown => Box::new(FallbackAdapter { engine }),
    }
}
