use sqlx::AnyPool;
use sqlx::{Column, Executor, TypeInfo};

use tablegen_core::{ColumnDescriptor, Error, Result};

/// Driver-level introspection floor shared by every adapter.
///
/// Prepares a probe statement against the table and reads column name,
/// reported type, and nullability from the driver's description of the
/// result set. Nullability defaults to false when the driver cannot
/// report it.
pub(crate) async fn base_columns(
    pool: &AnyPool,
    table: &str,
    probe_sql: &str,
) -> Result<Vec<ColumnDescriptor>> {
    let description = pool.describe(probe_sql).await.map_err(|err| Error::Metadata {
        table: table.to_string(),
        detail: format!("driver introspection failed: {err}"),
    })?;

    let mut columns = Vec::with_capacity(description.columns().len());
    for (idx, col) in description.columns().iter().enumerate() {
        let (normalized, length) = normalize_declared_type(col.type_info().name());
        let mut descriptor = ColumnDescriptor::new(col.name(), idx, normalized);
        descriptor.declared_length = length;
        descriptor.nullable = description.nullable(idx).unwrap_or(false);
        columns.push(descriptor);
    }
    if columns.is_empty() {
        tracing::warn!(table, "driver reported no columns");
    }
    Ok(columns)
}

/// Lower-case a declared type and strip its parenthesized length.
///
/// Returns the normalized name and the declared length (-1 when the
/// type carries none or the length is not numeric).
pub(crate) fn normalize_declared_type(declared: &str) -> (String, i32) {
    let declared = declared.trim().to_lowercase();
    let Some(open) = declared.find('(') else {
        return (declared, -1);
    };
    let name = declared[..open].trim_end().to_string();
    let length = declared[open + 1..]
        .split(|c: char| c == ',' || c == ')')
        .next()
        .and_then(|digits| digits.trim().parse::<i32>().ok())
        .unwrap_or(-1);
    (name, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_length_suffix() {
        assert_eq!(normalize_declared_type("VARCHAR(255)"), ("varchar".to_string(), 255));
        assert_eq!(normalize_declared_type("numeric(10,2)"), ("numeric".to_string(), 10));
        assert_eq!(normalize_declared_type("TEXT"), ("text".to_string(), -1));
        assert_eq!(normalize_declared_type("enum('a','b')"), ("enum".to_string(), -1));
    }
}
