use sqlx::AnyPool;
use sqlx::Row;

use tablegen_core::{Error, Result};

pub struct RawPgColumn {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub is_identity: bool,
    pub character_max_length: Option<i32>,
    pub column_default: Option<String>,
}

pub async fn list_columns(
    pool: &AnyPool,
    database: &str,
    table: &str,
) -> Result<Vec<RawPgColumn>> {
    let rows = sqlx::query(
        r#"
        select
          column_name::text,
          data_type::text,
          (is_nullable = 'YES') as is_nullable,
          (is_identity = 'YES') as is_identity,
          character_maximum_length::int4 as character_max_length,
          column_default::text
        from information_schema.columns
        where ($1 = '' or table_catalog = $1)
          and table_schema = 'public'
          and table_name = $2
        order by ordinal_position
        "#,
    )
    .bind(database)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(|err| Error::Metadata {
        table: table.to_string(),
        detail: format!("information_schema.columns query failed: {err}"),
    })?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        columns.push(RawPgColumn {
            name: get(&row, table, 0)?,
            data_type: get(&row, table, 1)?,
            is_nullable: get(&row, table, 2)?,
            is_identity: get(&row, table, 3)?,
            character_max_length: get(&row, table, 4)?,
            column_default: get(&row, table, 5)?,
        });
    }
    Ok(columns)
}

pub async fn list_primary_key_columns(pool: &AnyPool, table: &str) -> Result<Vec<String>> {
    let rows = sqlx::query(
        r#"
        select kcu.column_name::text
        from information_schema.table_constraints tc
        join information_schema.key_column_usage kcu
          on kcu.constraint_name = tc.constraint_name
         and kcu.table_schema = tc.table_schema
         and kcu.table_name = tc.table_name
        where tc.constraint_type = 'PRIMARY KEY'
          and tc.table_schema = 'public'
          and tc.table_name = $1
        order by kcu.ordinal_position
        "#,
    )
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(|err| Error::Metadata {
        table: table.to_string(),
        detail: format!("primary key constraint query failed: {err}"),
    })?;

    rows.iter().map(|row| get(row, table, 0)).collect()
}

fn get<'r, T>(row: &'r sqlx::any::AnyRow, table: &str, idx: usize) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Any> + sqlx::Type<sqlx::Any>,
{
    row.try_get(idx).map_err(|err| Error::Metadata {
        table: table.to_string(),
        detail: format!("column {idx} decode failed: {err}"),
    })
}
