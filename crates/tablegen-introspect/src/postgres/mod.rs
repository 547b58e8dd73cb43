use async_trait::async_trait;
use sqlx::AnyPool;
use tracing::{debug, warn};

use tablegen_core::{Result, TableDescriptor, quote_ident};

use crate::adapter::{DialectAdapter, Engine};
use crate::base::base_columns;

mod mapper;
mod queries;

/// Adapter for PostgreSQL.
///
/// Merges `information_schema.columns` metadata and the constraint
/// catalog into the driver floor by column name.
pub struct PostgresAdapter;

#[async_trait]
impl DialectAdapter for PostgresAdapter {
    fn engine(&self) -> Engine {
        Engine::Postgres
    }

    async fn describe_table(
        &self,
        pool: &AnyPool,
        database: &str,
        table: &str,
    ) -> Result<TableDescriptor> {
        let mut descriptor = TableDescriptor::new(table);
        let probe = format!("SELECT * FROM {} LIMIT 0", quote_ident(table));
        descriptor.columns = base_columns(pool, table, &probe).await?;

        let raw_columns = queries::list_columns(pool, database, table).await?;
        if raw_columns.is_empty() && !descriptor.columns.is_empty() {
            warn!(
                table,
                database,
                "catalog returned no column metadata, keeping driver-level flags only"
            );
        }
        let key_columns = queries::list_primary_key_columns(pool, table).await?;
        debug!(
            table,
            columns = raw_columns.len(),
            key_columns = key_columns.len(),
            "merged postgres catalog metadata"
        );

        mapper::merge_columns(&mut descriptor, raw_columns);
        mapper::mark_primary_keys(&mut descriptor, &key_columns);
        Ok(descriptor)
    }
}
