use inflector::Inflector;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use tablegen_core::{
    Error, GenConfig, NameCase, Result, TableDescriptor, TypeMap, delete_statement,
    insert_statement, select_many_statement, select_one_statement, update_statement,
};

/// The five pre-rendered statements carried by a keyed table.
#[derive(Debug, Clone, Serialize)]
pub struct Statements {
    #[serde(rename = "sqlInsert")]
    pub insert: String,
    #[serde(rename = "sqlUpdate")]
    pub update: String,
    #[serde(rename = "sqlDelete")]
    pub delete: String,
    #[serde(rename = "sqlSelectOne")]
    pub select_one: String,
    #[serde(rename = "sqlSelectMany")]
    pub select_many: String,
}

/// Render-ready projection of one table.
///
/// Built once per table from its descriptor and never mutated; each
/// render call that needs it constructs its own context around it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub table_name: String,
    pub struct_name: String,
    /// Receiver alias: first rune of the lower-cased struct name.
    pub short_name: String,
    /// Rendered field declaration lines, unmappable columns skipped.
    pub fields: Vec<String>,
    pub primary_keys: Vec<String>,
    pub non_primary_keys: Vec<String>,
    #[serde(flatten)]
    pub statements: Option<Statements>,
}

impl ModelInfo {
    /// Project a descriptor into its render-ready form.
    ///
    /// Statements are populated only when the table has a primary key
    /// and at least one non-key column to assign; statement-bearing
    /// templates refuse such tables at render time instead of failing
    /// here, so record definitions can still be generated for them.
    pub fn build(table: &TableDescriptor, config: &GenConfig, typemap: &TypeMap) -> Result<Self> {
        let struct_name = table.name.to_pascal_case();
        let short_name = struct_name
            .to_lowercase()
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_default();

        let statements = if table.has_primary_key() && !table.non_primary_key_columns().is_empty()
        {
            Some(Statements {
                insert: insert_statement(table)?,
                update: update_statement(table)?,
                delete: delete_statement(table)?,
                select_one: select_one_statement(table)?,
                select_many: select_many_statement(table)?,
            })
        } else {
            None
        };

        Ok(Self {
            table_name: table.name.clone(),
            struct_name,
            short_name,
            fields: field_declarations(table, config, typemap),
            primary_keys: table
                .primary_key_columns()
                .iter()
                .map(|col| col.name.clone())
                .collect(),
            non_primary_keys: table
                .non_primary_key_columns()
                .iter()
                .map(|col| col.name.clone())
                .collect(),
            statements,
        })
    }
}

/// Render one declaration line per mappable column.
fn field_declarations(table: &TableDescriptor, config: &GenConfig, typemap: &TypeMap) -> Vec<String> {
    let mut fields = Vec::new();
    for col in &table.columns {
        let Some(target) =
            typemap.map(&col.normalized_type, col.nullable, config.alternate_null)
        else {
            if config.verbose {
                let reason = Error::UnknownType {
                    column: col.name.clone(),
                    ty: col.normalized_type.clone(),
                };
                warn!(table = %table.name, %reason, "skipping column");
            }
            continue;
        };

        let mut line = format!("{} {}", col.name.to_pascal_case(), target);
        if config.json_tags {
            let tag_name = match config.json_name_case {
                NameCase::Snake => col.name.to_snake_case(),
                NameCase::LowerCamel => col.name.to_camel_case(),
                NameCase::Original => col.name.clone(),
            };
            line.push_str(&format!(" `json:\"{tag_name}\"`"));
        }
        fields.push(line);
    }
    fields
}

/// Assemble the binding set for one render call.
///
/// Later sources win: configuration bindings, then the model
/// projection, then caller-supplied extras.
pub fn render_context(
    config: &GenConfig,
    model: Option<&ModelInfo>,
    extras: &Map<String, Value>,
) -> Map<String, Value> {
    let mut bindings = config.bindings();

    if let Some(model) = model {
        if let Ok(Value::Object(fields)) = serde_json::to_value(model) {
            bindings.extend(fields);
        }
    }
    bindings.extend(extras.clone());
    bindings
}

#[cfg(test)]
mod tests {
    use tablegen_core::ColumnDescriptor;

    use super::*;

    fn table() -> TableDescriptor {
        let mut table = TableDescriptor::new("user_accounts");
        let mut id = ColumnDescriptor::new("id", 0, "integer");
        id.is_primary_key = true;
        id.is_auto_increment = true;
        table.columns.push(id);
        let mut email = ColumnDescriptor::new("email", 1, "varchar");
        email.nullable = true;
        table.columns.push(email);
        table.columns.push(ColumnDescriptor::new("geom", 2, "geometry"));
        table
    }

    #[test]
    fn builds_names_and_skips_unmapped_columns() {
        let model = ModelInfo::build(&table(), &GenConfig::default(), &TypeMap::default())
            .expect("model");
        assert_eq!(model.struct_name, "UserAccounts");
        assert_eq!(model.short_name, "u");
        // geometry has no mapping and is skipped
        assert_eq!(model.fields.len(), 2);
        assert_eq!(model.fields[0], "Id int32 `json:\"id\"`");
        assert_eq!(model.fields[1], "Email sql.NullString `json:\"email\"`");
        assert_eq!(model.primary_keys, vec!["id"]);
        assert_eq!(model.non_primary_keys, vec!["email", "geom"]);
    }

    #[test]
    fn alternate_null_switches_wrapper_family() {
        let config = GenConfig {
            alternate_null: true,
            ..GenConfig::default()
        };
        let model = ModelInfo::build(&table(), &config, &TypeMap::default()).expect("model");
        assert_eq!(model.fields[1], "Email null.String `json:\"email\"`");
    }

    #[test]
    fn all_key_table_builds_without_statements() {
        let mut membership = table();
        for col in &mut membership.columns {
            col.is_primary_key = true;
        }
        let model = ModelInfo::build(&membership, &GenConfig::default(), &TypeMap::default())
            .expect("model");
        assert!(model.statements.is_none());
        // the record projection itself is unaffected
        assert_eq!(model.fields.len(), 2);
    }

    #[test]
    fn verbose_config_still_skips_unmapped_columns() {
        let config = GenConfig {
            verbose: true,
            ..GenConfig::default()
        };
        let model = ModelInfo::build(&table(), &config, &TypeMap::default()).expect("model");
        assert_eq!(model.fields.len(), 2);
    }

    #[test]
    fn keyless_table_builds_without_statements() {
        let mut keyless = table();
        for col in &mut keyless.columns {
            col.is_primary_key = false;
        }
        let model = ModelInfo::build(&keyless, &GenConfig::default(), &TypeMap::default())
            .expect("model");
        assert!(model.statements.is_none());
    }

    #[test]
    fn context_layers_config_model_extras() {
        let model = ModelInfo::build(&table(), &GenConfig::default(), &TypeMap::default())
            .expect("model");
        let mut extras = Map::new();
        extras.insert("package".to_string(), Value::String("override".to_string()));

        let ctx = render_context(&GenConfig::default(), Some(&model), &extras);
        assert_eq!(ctx["package"], Value::String("override".to_string()));
        assert_eq!(ctx["structName"], Value::String("UserAccounts".to_string()));
        assert!(ctx.contains_key("sqlInsert"));
    }
}
