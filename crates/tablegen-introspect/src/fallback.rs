use async_trait::async_trait;
use sqlx::AnyPool;
use tracing::warn;

use tablegen_core::{Result, TableDescriptor, quote_ident};

use crate::adapter::{DialectAdapter, Engine};
use crate::base::base_columns;

/// Adapter for SQL Server and unrecognized engines.
///
/// No authoritative DDL source exists here, so the descriptor carries
/// only the driver floor. Auto-increment is never set and the first
/// column is assumed to be the primary key; callers must treat that
/// key determination as a best-effort guess.
pub struct FallbackAdapter {
    pub engine: Engine,
}

#[async_trait]
impl DialectAdapter for FallbackAdapter {
    fn engine(&self) -> Engine {
        self.engine
    }

    async fn describe_table(
        &self,
        pool: &AnyPool,
        _database: &str,
        table: &str,
    ) -> Result<TableDescriptor> {
        let mut descriptor = TableDescriptor::new(table);
        let probe = format!("SELECT * FROM {} WHERE 1 = 0", quote_ident(table));
        descriptor.columns = base_columns(pool, table, &probe).await?;

        if let Some(first) = descriptor.columns.first_mut() {
            first.is_primary_key = true;
            warn!(
                table,
                engine = %self.engine,
                key = %first.name,
                "no key metadata available, guessing first column as primary key"
            );
        }
        Ok(descriptor)
    }
}
