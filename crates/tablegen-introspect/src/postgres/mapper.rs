use tablegen_core::TableDescriptor;

use crate::defaults::clean_default_value;

use super::queries::RawPgColumn;

/// Fold catalog metadata into floor columns, matching by name.
pub fn merge_columns(descriptor: &mut TableDescriptor, raw: Vec<RawPgColumn>) {
    for col in raw {
        let Some(target) = descriptor.column_mut(&col.name) else {
            continue;
        };
        target.nullable = col.is_nullable;
        if !col.data_type.is_empty() {
            // catalog names ("character varying") beat driver names ("varchar")
            target.normalized_type = col.data_type.to_lowercase();
        }
        if let Some(length) = col.character_max_length {
            target.declared_length = length;
        }

        let default = col.column_default.as_deref().unwrap_or("");
        let is_serial = default.starts_with("nextval(");
        target.is_auto_increment = col.is_identity || is_serial;

        let cleaned = clean_default_value(default);
        target.default_value = (!cleaned.is_empty()).then_some(cleaned);
    }
}

pub fn mark_primary_keys(descriptor: &mut TableDescriptor, key_columns: &[String]) {
    for name in key_columns {
        if let Some(col) = descriptor.column_mut(name) {
            col.is_primary_key = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use tablegen_core::ColumnDescriptor;

    use super::*;

    fn floor() -> TableDescriptor {
        let mut table = TableDescriptor::new("accounts");
        table.columns.push(ColumnDescriptor::new("id", 0, "int8"));
        table.columns.push(ColumnDescriptor::new("status", 1, "varchar"));
        table
    }

    #[test]
    fn serial_default_marks_auto_increment_without_default_value() {
        let mut table = floor();
        merge_columns(
            &mut table,
            vec![RawPgColumn {
                name: "id".to_string(),
                data_type: "bigint".to_string(),
                is_nullable: false,
                is_identity: false,
                character_max_length: None,
                column_default: Some("nextval('accounts_id_seq'::regclass)".to_string()),
            }],
        );
        let id = table.column("id").expect("column");
        assert!(id.is_auto_increment);
        assert_eq!(id.normalized_type, "bigint");
        assert_eq!(id.default_value, None);
    }

    #[test]
    fn defaults_are_cleaned_and_lengths_applied() {
        let mut table = floor();
        merge_columns(
            &mut table,
            vec![RawPgColumn {
                name: "status".to_string(),
                data_type: "character varying".to_string(),
                is_nullable: true,
                is_identity: false,
                character_max_length: Some(32),
                column_default: Some("('active'::character varying)".to_string()),
            }],
        );
        let status = table.column("status").expect("column");
        assert!(status.nullable);
        assert_eq!(status.declared_length, 32);
        assert_eq!(status.default_value.as_deref(), Some("active"));
    }

    #[test]
    fn empty_catalog_merge_keeps_floor_columns_untouched() {
        let mut table = floor();
        merge_columns(&mut table, Vec::new());
        let id = table.column("id").expect("column");
        assert_eq!(id.normalized_type, "int8");
        assert!(!id.nullable);
        assert!(!id.is_auto_increment);
    }

    #[test]
    fn unknown_catalog_columns_are_ignored() {
        let mut table = floor();
        mark_primary_keys(&mut table, &["id".to_string(), "ghost".to_string()]);
        assert!(table.column("id").expect("column").is_primary_key);
        assert_eq!(table.primary_key_columns().len(), 1);
    }
}
