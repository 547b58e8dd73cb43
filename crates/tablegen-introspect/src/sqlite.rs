use async_trait::async_trait;
use sqlx::AnyPool;
use sqlx::Row;
use tracing::debug;

use tablegen_core::{Error, Result, TableDescriptor, quote_ident};

use crate::adapter::{DialectAdapter, Engine};
use crate::base::{base_columns, normalize_declared_type};
use crate::defaults::clean_default_value;

/// Adapter for SQLite.
///
/// SQLite stores one verbatim `CREATE TABLE` text per table; the
/// adapter mines it for per-column fragments and then lets
/// `PRAGMA table_info` flags override the text-derived ones.
pub struct SqliteAdapter;

#[async_trait]
impl DialectAdapter for SqliteAdapter {
    fn engine(&self) -> Engine {
        Engine::Sqlite
    }

    async fn describe_table(
        &self,
        pool: &AnyPool,
        _database: &str,
        table: &str,
    ) -> Result<TableDescriptor> {
        let probe = format!("SELECT * FROM {} LIMIT 0", quote_ident(table));
        let floor = base_columns(pool, table, &probe).await?;

        let row = sqlx::query("SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1")
            .bind(table)
            .fetch_one(pool)
            .await
            .map_err(|err| Error::Metadata {
                table: table.to_string(),
                detail: format!("sqlite_master query failed: {err}"),
            })?;
        let ddl: String = row.try_get(0).map_err(|err| Error::Metadata {
            table: table.to_string(),
            detail: format!("sqlite_master returned no ddl: {err}"),
        })?;

        let mut descriptor = descriptor_from_ddl(table, &ddl);
        // floor columns the text pass missed (quoting oddities) still
        // appear, in driver order
        for col in floor {
            if descriptor.column(&col.name).is_none() {
                descriptor.columns.push(col);
            }
        }
        reindex(&mut descriptor);

        let pragma = sqlx::query(&format!("PRAGMA table_info({})", quote_ident(table)))
            .fetch_all(pool)
            .await
            .map_err(|err| Error::Metadata {
                table: table.to_string(),
                detail: format!("table_info pragma failed: {err}"),
            })?;
        debug!(table, pragma_rows = pragma.len(), "applying sqlite pragma flags");

        for row in pragma {
            let info = PragmaColumn {
                name: row.try_get(1).unwrap_or_default(),
                declared_type: row.try_get(2).unwrap_or_default(),
                not_null: row.try_get::<i64, _>(3).unwrap_or(0) != 0,
                default_value: row.try_get(4).unwrap_or(None),
                pk_ordinal: row.try_get::<i64, _>(5).unwrap_or(0),
            };
            apply_pragma_column(&mut descriptor, &info);
        }

        mark_rowid_alias(&mut descriptor);
        force_key_columns_non_nullable(&mut descriptor);
        Ok(descriptor)
    }
}

/// One row of `PRAGMA table_info` output.
pub(crate) struct PragmaColumn {
    pub name: String,
    pub declared_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    /// 1-based position within the primary key, 0 when not a key column.
    pub pk_ordinal: i64,
}

/// Build a descriptor from the stored `CREATE TABLE` text alone.
pub(crate) fn descriptor_from_ddl(table: &str, ddl: &str) -> TableDescriptor {
    let mut descriptor = TableDescriptor::new(table);
    descriptor.raw_ddl = ddl.to_string();

    let body = table_body(ddl);
    let mut table_level_keys = Vec::new();

    for fragment in split_top_level(body) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }
        let upper = fragment.to_uppercase();
        if upper.starts_with("FOREIGN KEY") || upper.starts_with("CONSTRAINT") {
            continue;
        }
        if upper.starts_with("PRIMARY KEY") {
            table_level_keys.extend(key_names(fragment));
            continue;
        }
        if upper.starts_with("UNIQUE") || upper.starts_with("CHECK") {
            continue;
        }

        let name = leading_identifier(fragment);
        if name.is_empty() {
            continue;
        }
        let rest = fragment[name_span(fragment)..].trim();
        let declared = rest.split_whitespace().next().unwrap_or("");
        let (normalized, length) = normalize_declared_type(declared);

        let mut col = tablegen_core::ColumnDescriptor::new(name, descriptor.columns.len(), normalized);
        col.declared_length = length;
        col.nullable = !upper.contains("NOT NULL");
        col.is_primary_key = upper.contains("PRIMARY KEY");
        col.is_auto_increment = upper.contains("AUTOINCREMENT");
        col.raw_ddl_fragment = fragment.to_string();
        descriptor.columns.push(col);
    }

    for name in table_level_keys {
        if let Some(col) = descriptor.column_mut(&name) {
            col.is_primary_key = true;
        }
    }
    mark_rowid_alias(&mut descriptor);
    force_key_columns_non_nullable(&mut descriptor);
    descriptor
}

/// Pragma flags take precedence over anything mined from text.
pub(crate) fn apply_pragma_column(descriptor: &mut TableDescriptor, info: &PragmaColumn) {
    let Some(col) = descriptor.column_mut(&info.name) else {
        return;
    };
    col.nullable = !info.not_null;
    col.is_primary_key = info.pk_ordinal > 0;
    if !info.declared_type.is_empty() {
        let (normalized, length) = normalize_declared_type(&info.declared_type);
        col.normalized_type = normalized;
        col.declared_length = length;
    }
    if let Some(raw) = &info.default_value {
        let cleaned = clean_default_value(raw);
        col.default_value = (!cleaned.is_empty()).then_some(cleaned);
    }
}

/// An `INTEGER PRIMARY KEY` column aliases the rowid and auto-assigns.
fn mark_rowid_alias(descriptor: &mut TableDescriptor) {
    let keys: Vec<usize> = descriptor
        .columns
        .iter()
        .enumerate()
        .filter(|(_, col)| col.is_primary_key)
        .map(|(idx, _)| idx)
        .collect();
    if let [only] = keys.as_slice() {
        let col = &mut descriptor.columns[*only];
        if col.normalized_type == "integer" {
            col.is_auto_increment = true;
        }
    }
}

fn force_key_columns_non_nullable(descriptor: &mut TableDescriptor) {
    for col in &mut descriptor.columns {
        if col.is_primary_key {
            col.nullable = false;
        }
    }
}

fn reindex(descriptor: &mut TableDescriptor) {
    for (idx, col) in descriptor.columns.iter_mut().enumerate() {
        col.ordinal_index = idx;
    }
}

/// Everything between the outermost parenthesis pair.
fn table_body(ddl: &str) -> &str {
    let Some(open) = ddl.find('(') else {
        return "";
    };
    let Some(close) = ddl.rfind(')') else {
        return "";
    };
    if close <= open {
        return "";
    }
    &ddl[open + 1..close]
}

/// Split on commas that sit outside parentheses and quotes.
fn split_top_level(body: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0_i32;
    let mut quote: Option<char> = None;

    for ch in body.chars() {
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' | '`' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                '(' => {
                    depth += 1;
                    current.push(ch);
                }
                ')' => {
                    depth -= 1;
                    current.push(ch);
                }
                ',' if depth == 0 => {
                    parts.push(std::mem::take(&mut current));
                }
                _ => current.push(ch),
            },
        }
    }
    if !current.trim().is_empty() {
        parts.push(current);
    }
    parts
}

fn leading_identifier(fragment: &str) -> String {
    let fragment = fragment.trim_start();
    match fragment.chars().next() {
        Some(q @ ('"' | '`' | '\'' | '[')) => {
            let close = if q == '[' { ']' } else { q };
            fragment[1..]
                .find(close)
                .map(|end| fragment[1..1 + end].to_string())
                .unwrap_or_default()
        }
        Some(_) => fragment
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_string(),
        None => String::new(),
    }
}

/// Byte length of the (possibly quoted) leading identifier.
fn name_span(fragment: &str) -> usize {
    let trimmed = fragment.trim_start();
    let offset = fragment.len() - trimmed.len();
    let span = match trimmed.chars().next() {
        Some(q @ ('"' | '`' | '\'' | '[')) => {
            let close = if q == '[' { ']' } else { q };
            trimmed[1..].find(close).map(|end| end + 2).unwrap_or(trimmed.len())
        }
        _ => trimmed
            .find(char::is_whitespace)
            .unwrap_or(trimmed.len()),
    };
    offset + span
}

fn key_names(fragment: &str) -> Vec<String> {
    let Some(open) = fragment.find('(') else {
        return Vec::new();
    };
    let Some(close) = fragment.rfind(')') else {
        return Vec::new();
    };
    fragment[open + 1..close]
        .split(',')
        .map(|part| part.trim().trim_matches(|c| c == '"' || c == '`' || c == '\'').to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
