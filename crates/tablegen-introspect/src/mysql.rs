use async_trait::async_trait;
use sqlx::AnyPool;
use sqlx::Row;
use tracing::debug;

use tablegen_core::{Error, Result, TableDescriptor};

use crate::adapter::{DialectAdapter, Engine};
use crate::base::base_columns;

/// Adapter for MySQL and MariaDB.
///
/// Layers `SHOW CREATE TABLE` mining on top of the driver floor:
/// per-column DDL fragments supply auto-increment markers and the
/// `PRIMARY KEY` line supplies key membership.
pub struct MysqlAdapter;

#[async_trait]
impl DialectAdapter for MysqlAdapter {
    fn engine(&self) -> Engine {
        Engine::Mysql
    }

    async fn describe_table(
        &self,
        pool: &AnyPool,
        _database: &str,
        table: &str,
    ) -> Result<TableDescriptor> {
        let quoted = quote_backtick(table);
        let mut descriptor = TableDescriptor::new(table);
        descriptor.columns =
            base_columns(pool, table, &format!("SELECT * FROM {quoted} LIMIT 0")).await?;

        let row = sqlx::query(&format!("SHOW CREATE TABLE {quoted}"))
            .fetch_one(pool)
            .await
            .map_err(|err| Error::Metadata {
                table: table.to_string(),
                detail: format!("show create table failed: {err}"),
            })?;
        let ddl: String = row.try_get(1).map_err(|err| Error::Metadata {
            table: table.to_string(),
            detail: format!("show create table returned no DDL column: {err}"),
        })?;

        let mined = mine_create_table(&ddl);
        debug!(table, fragments = mined.fragments.len(), "mined mysql ddl");

        for (name, fragment) in &mined.fragments {
            if let Some(col) = descriptor.column_mut(name) {
                col.raw_ddl_fragment = fragment.clone();
                col.is_auto_increment = fragment.to_uppercase().contains("AUTO_INCREMENT");
            }
        }
        for name in &mined.primary_keys {
            if let Some(col) = descriptor.column_mut(name) {
                col.is_primary_key = true;
            }
        }
        descriptor.raw_ddl = ddl;
        Ok(descriptor)
    }
}

fn quote_backtick(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

pub(crate) struct MinedDdl {
    /// Column name paired with its literal definition fragment.
    pub fragments: Vec<(String, String)>,
    pub primary_keys: Vec<String>,
}

/// Split `SHOW CREATE TABLE` output into per-column fragments.
///
/// Column definition lines start with a backtick-delimited name; the
/// `PRIMARY KEY (...)` line names the key columns. This is targeted
/// extraction over a known engine-rendered layout, not SQL parsing.
pub(crate) fn mine_create_table(ddl: &str) -> MinedDdl {
    let mut fragments = Vec::new();
    let mut primary_keys = Vec::new();

    for line in ddl.lines() {
        let line = line.trim().trim_end_matches(',');
        if let Some(rest) = line.strip_prefix('`') {
            if let Some(end) = rest.find('`') {
                let name = rest[..end].to_string();
                fragments.push((name, line.to_string()));
            }
        } else if let Some(prefix) = line.get(.."PRIMARY KEY".len()) {
            // ASCII prefix match, so slicing past it stays on a char boundary
            if prefix.eq_ignore_ascii_case("PRIMARY KEY") {
                primary_keys.extend(extract_key_names(&line["PRIMARY KEY".len()..]));
            }
        }
    }

    MinedDdl {
        fragments,
        primary_keys,
    }
}

fn extract_key_names(rest: &str) -> Vec<String> {
    let Some(open) = rest.find('(') else {
        return Vec::new();
    };
    let Some(close) = rest.rfind(')') else {
        return Vec::new();
    };
    rest[open + 1..close]
        .split(',')
        .map(|part| strip_prefix_length(part.trim()).trim_matches('`').to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Drop a trailing `(<n>)` prefix-length qualifier from a key part.
fn strip_prefix_length(part: &str) -> &str {
    if !part.ends_with(')') {
        return part;
    }
    let Some(open) = part.rfind('(') else {
        return part;
    };
    let inner = &part[open + 1..part.len() - 1];
    if !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()) {
        part[..open].trim_end()
    } else {
        part
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DDL: &str = "CREATE TABLE `orders` (\n\
        `id` int(11) NOT NULL AUTO_INCREMENT,\n\
        `customer` varchar(64) DEFAULT NULL,\n\
        `total` decimal(10,2) NOT NULL,\n\
        PRIMARY KEY (`id`),\n\
        KEY `idx_customer` (`customer`)\n\
        ) ENGINE=InnoDB";

    #[test]
    fn mines_fragments_by_backtick_names() {
        let mined = mine_create_table(DDL);
        let names: Vec<&str> = mined.fragments.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["id", "customer", "total"]);
        assert!(mined.fragments[0].1.contains("AUTO_INCREMENT"));
    }

    #[test]
    fn primary_key_line_names_key_columns() {
        let mined = mine_create_table(DDL);
        assert_eq!(mined.primary_keys, vec!["id"]);
    }

    #[test]
    fn composite_primary_key_keeps_order() {
        let ddl = "CREATE TABLE `t` (\n`a` int NOT NULL,\n`b` int NOT NULL,\nPRIMARY KEY (`a`,`b`)\n)";
        let mined = mine_create_table(ddl);
        assert_eq!(mined.primary_keys, vec!["a", "b"]);
    }

    #[test]
    fn prefix_length_key_parts_are_unqualified() {
        let ddl = "CREATE TABLE `t` (\n`name` varchar(200) NOT NULL,\n`id` int NOT NULL,\nPRIMARY KEY (`name`(10),`id`)\n)";
        let mined = mine_create_table(ddl);
        assert_eq!(mined.primary_keys, vec!["name", "id"]);
    }

    #[test]
    fn non_ascii_key_names_are_extracted() {
        // "ß" grows under uppercasing; the key line must still parse
        let ddl = "CREATE TABLE `t` (\n`straße` varchar(64) NOT NULL,\nprimary key (`straße`)\n)";
        let mined = mine_create_table(ddl);
        assert_eq!(mined.primary_keys, vec!["straße"]);
    }
}
