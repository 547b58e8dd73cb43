//! Parameterized CRUD statement generation.
//!
//! All generators are pure functions over a [`TableDescriptor`] and use
//! a single placeholder syntax: `$n`, 1-based, strictly increasing.
//! Column order in the descriptor drives placeholder order.

use crate::descriptor::TableDescriptor;
use crate::error::{Error, Result};

/// Quote an identifier, doubling any embedded quote characters.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn require_primary_key(table: &TableDescriptor) -> Result<()> {
    if table.has_primary_key() {
        Ok(())
    } else {
        Err(Error::NoPrimaryKey {
            table: table.name.clone(),
        })
    }
}

/// `DELETE FROM t WHERE pk1 = $1 [AND pk2 = $2 ...]`
pub fn delete_statement(table: &TableDescriptor) -> Result<String> {
    require_primary_key(table)?;
    let predicate = key_predicate(table, 1);
    Ok(format!(
        "DELETE FROM {} WHERE {}",
        quote_ident(&table.name),
        predicate
    ))
}

/// `UPDATE t SET c1 = $1, ... WHERE pk1 = $k [AND ...]`
///
/// Non-key columns fill the SET clause first; key columns follow in the
/// WHERE clause with continuous placeholder numbering. A table whose
/// columns all belong to the key has nothing to assign and is rejected.
pub fn update_statement(table: &TableDescriptor) -> Result<String> {
    require_primary_key(table)?;
    let assignments: Vec<String> = table
        .non_primary_key_columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| format!("{} = ${}", quote_ident(&col.name), idx + 1))
        .collect();
    if assignments.is_empty() {
        return Err(Error::NoUpdatableColumns {
            table: table.name.clone(),
        });
    }
    let predicate = key_predicate(table, assignments.len() + 1);
    Ok(format!(
        "UPDATE {} SET {} WHERE {}",
        quote_ident(&table.name),
        assignments.join(", "),
        predicate
    ))
}

/// `INSERT INTO t (c1, ...) VALUES ($1, ...)`, auto-increment columns excluded.
pub fn insert_statement(table: &TableDescriptor) -> Result<String> {
    require_primary_key(table)?;
    let insertable: Vec<_> = table
        .columns
        .iter()
        .filter(|col| !col.is_auto_increment)
        .collect();
    let names: Vec<String> = insertable.iter().map(|col| quote_ident(&col.name)).collect();
    let placeholders: Vec<String> = (1..=insertable.len()).map(|n| format!("${n}")).collect();
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(&table.name),
        names.join(", "),
        placeholders.join(", ")
    ))
}

/// `SELECT * FROM t WHERE pk1 = $1 [AND ...]`
pub fn select_one_statement(table: &TableDescriptor) -> Result<String> {
    require_primary_key(table)?;
    let predicate = key_predicate(table, 1);
    Ok(format!(
        "SELECT * FROM {} WHERE {}",
        quote_ident(&table.name),
        predicate
    ))
}

/// `SELECT * FROM t`, unfiltered.
pub fn select_many_statement(table: &TableDescriptor) -> Result<String> {
    require_primary_key(table)?;
    Ok(format!("SELECT * FROM {}", quote_ident(&table.name)))
}

fn key_predicate(table: &TableDescriptor, first_placeholder: usize) -> String {
    table
        .primary_key_columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| format!("{} = ${}", quote_ident(&col.name), first_placeholder + idx))
        .collect::<Vec<_>>()
        .join(" AND ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ColumnDescriptor;

    fn orders_table() -> TableDescriptor {
        let mut table = TableDescriptor::new("orders");
        let mut id = ColumnDescriptor::new("id", 0, "integer");
        id.is_primary_key = true;
        id.is_auto_increment = true;
        table.columns.push(id);
        table.columns.push(ColumnDescriptor::new("customer", 1, "varchar"));
        table.columns.push(ColumnDescriptor::new("total", 2, "numeric"));
        table
    }

    #[test]
    fn delete_targets_primary_key() {
        let sql = delete_statement(&orders_table()).expect("statement");
        assert_eq!(sql, r#"DELETE FROM "orders" WHERE "id" = $1"#);
    }

    #[test]
    fn update_numbers_set_then_where_continuously() {
        let sql = update_statement(&orders_table()).expect("statement");
        assert_eq!(
            sql,
            r#"UPDATE "orders" SET "customer" = $1, "total" = $2 WHERE "id" = $3"#
        );
    }

    #[test]
    fn insert_excludes_auto_increment_columns() {
        let sql = insert_statement(&orders_table()).expect("statement");
        assert_eq!(
            sql,
            r#"INSERT INTO "orders" ("customer", "total") VALUES ($1, $2)"#
        );
    }

    #[test]
    fn select_one_filters_on_all_key_columns() {
        let mut table = orders_table();
        table.column_mut("customer").expect("column").is_primary_key = true;
        let sql = select_one_statement(&table).expect("statement");
        assert_eq!(sql, r#"SELECT * FROM "orders" WHERE "id" = $1 AND "customer" = $2"#);
    }

    #[test]
    fn update_requires_a_non_key_column() {
        let mut table = orders_table();
        for col in &mut table.columns {
            col.is_primary_key = true;
        }
        match update_statement(&table) {
            Err(Error::NoUpdatableColumns { table }) => assert_eq!(table, "orders"),
            other => panic!("expected NoUpdatableColumns, got {other:?}"),
        }
        // the other generators still handle all-key tables
        assert!(insert_statement(&table).is_ok());
        assert!(delete_statement(&table).is_ok());
        assert!(select_one_statement(&table).is_ok());
    }

    #[test]
    fn quoting_doubles_embedded_quotes() {
        assert_eq!(quote_ident(r#"we"ird"#), r#""we""ird""#);
    }
}
