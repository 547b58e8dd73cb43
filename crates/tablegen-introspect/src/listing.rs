use sqlx::AnyPool;
use sqlx::Row;

use tablegen_core::{Error, Result};

use crate::adapter::Engine;

/// Enumerate the user tables of the target database.
///
/// Used by drivers when the caller supplies no explicit table list.
pub async fn list_tables(pool: &AnyPool, engine: Engine) -> Result<Vec<String>> {
    let sql = match engine {
        Engine::Mysql => "SHOW TABLES",
        Engine::Postgres => {
            "select table_name::text from information_schema.tables \
             where table_schema = 'public' and table_type = 'BASE TABLE' \
             order by table_name"
        }
        Engine::Sqlite => {
            "select name from sqlite_master \
             where type = 'table' and name not like 'sqlite_%' \
             order by name"
        }
        Engine::Mssql | Engine::Unknown => {
            return Err(Error::Unsupported(format!(
                "table enumeration is not available for engine '{engine}', pass tables explicitly"
            )));
        }
    };

    let rows = sqlx::query(sql)
        .fetch_all(pool)
        .await
        .map_err(|err| Error::Metadata {
            table: "*".to_string(),
            detail: format!("table listing query failed: {err}"),
        })?;

    let mut names = Vec::with_capacity(rows.len());
    for row in rows {
        let name: String = row.try_get(0).map_err(|err| Error::Metadata {
            table: "*".to_string(),
            detail: format!("table listing decode failed: {err}"),
        })?;
        names.push(name);
    }
    Ok(names)
}
