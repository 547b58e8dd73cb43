use serde::{Deserialize, Serialize};

/// Normalized metadata for one physical column.
///
/// Every dialect adapter produces these regardless of which metadata
/// surface it mined, so downstream components never see engine detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name, unique within its table.
    pub name: String,
    /// Zero-based position matching result-set column order.
    pub ordinal_index: usize,
    /// Lower-cased type name with any parenthesized length stripped.
    pub normalized_type: String,
    /// Declared length; -1 when unknown or not applicable.
    pub declared_length: i32,
    pub nullable: bool,
    pub is_primary_key: bool,
    pub is_auto_increment: bool,
    /// Raw default expression when the engine reports one.
    pub default_value: Option<String>,
    /// Literal column-definition text when recoverable, else empty.
    pub raw_ddl_fragment: String,
}

impl ColumnDescriptor {
    /// A descriptor populated with the driver-level floor of information.
    pub fn new(name: impl Into<String>, ordinal_index: usize, normalized_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ordinal_index,
            normalized_type: normalized_type.into(),
            declared_length: -1,
            nullable: false,
            is_primary_key: false,
            is_auto_increment: false,
            default_value: None,
            raw_ddl_fragment: String::new(),
        }
    }
}

/// Normalized metadata for one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    /// Columns in source order; order drives positional statement generation.
    pub columns: Vec<ColumnDescriptor>,
    /// Best-effort create-table text, for documentation only.
    pub raw_ddl: String,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            raw_ddl: String::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|col| col.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut ColumnDescriptor> {
        self.columns.iter_mut().find(|col| col.name == name)
    }

    /// Primary-key columns in column order.
    pub fn primary_key_columns(&self) -> Vec<&ColumnDescriptor> {
        self.columns.iter().filter(|col| col.is_primary_key).collect()
    }

    /// Non-primary-key columns in column order.
    pub fn non_primary_key_columns(&self) -> Vec<&ColumnDescriptor> {
        self.columns.iter().filter(|col| !col.is_primary_key).collect()
    }

    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|col| col.is_primary_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_pk() -> TableDescriptor {
        let mut table = TableDescriptor::new("users");
        let mut id = ColumnDescriptor::new("id", 0, "integer");
        id.is_primary_key = true;
        table.columns.push(id);
        table.columns.push(ColumnDescriptor::new("email", 1, "varchar"));
        table
    }

    #[test]
    fn partitions_columns_by_key_membership() {
        let table = table_with_pk();
        assert_eq!(
            table.primary_key_columns().iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["id"]
        );
        assert_eq!(
            table.non_primary_key_columns().iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["email"]
        );
        assert!(table.has_primary_key());
    }

    #[test]
    fn floor_descriptor_defaults() {
        let col = ColumnDescriptor::new("name", 3, "text");
        assert_eq!(col.declared_length, -1);
        assert!(!col.nullable);
        assert!(!col.is_primary_key);
        assert!(col.raw_ddl_fragment.is_empty());
    }
}
