use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Target-type association table.
///
/// Three parallel tables cover the non-null, engine-null-wrapper, and
/// boxed-null renderings of each normalized SQL type. Lookup is by
/// exact type name first, then by known family prefix for
/// parameterized variants the normalizer could not reduce.
#[derive(Debug, Clone)]
pub struct TypeMap {
    not_null: BTreeMap<String, String>,
    nullable: BTreeMap<String, String>,
    nullable_alternate: BTreeMap<String, String>,
    prefixes: Vec<(&'static str, &'static str)>,
}

/// One override entry from the customization payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MappingOverride {
    #[serde(rename = "notnull")]
    not_null: Option<String>,
    nullable: Option<String>,
    nullable_alternate: Option<String>,
}

impl Default for TypeMap {
    fn default() -> Self {
        let mut map = Self {
            not_null: BTreeMap::new(),
            nullable: BTreeMap::new(),
            nullable_alternate: BTreeMap::new(),
            prefixes: vec![
                ("character varying", "varchar"),
                ("varchar", "varchar"),
                ("nvarchar", "varchar"),
                ("character", "char"),
                ("char", "char"),
                ("numeric", "numeric"),
                ("decimal", "decimal"),
                ("enum", "enum"),
                ("set", "set"),
                ("blob", "blob"),
                ("binary", "binary"),
                ("timestamp", "timestamp"),
                ("datetime", "datetime"),
                ("time", "time"),
                ("bigint", "bigint"),
                ("int", "int"),
            ],
        };

        for ty in ["tinyint", "smallint", "mediumint", "int", "integer", "int2", "int4", "serial", "year"] {
            map.insert(ty, "int32", "sql.NullInt64", "null.Int");
        }
        for ty in ["bigint", "int8", "bigserial"] {
            map.insert(ty, "int64", "sql.NullInt64", "null.Int");
        }
        for ty in [
            "float", "float4", "float8", "real", "double", "double precision", "numeric",
            "decimal", "money",
        ] {
            map.insert(ty, "float64", "sql.NullFloat64", "null.Float");
        }
        for ty in [
            "char", "varchar", "character", "character varying", "nvarchar", "text", "tinytext",
            "mediumtext", "longtext", "uuid", "json", "jsonb", "enum", "set",
        ] {
            map.insert(ty, "string", "sql.NullString", "null.String");
        }
        for ty in [
            "date", "time", "datetime", "timestamp", "timestamptz",
            "timestamp with time zone", "timestamp without time zone",
        ] {
            map.insert(ty, "time.Time", "time.Time", "null.Time");
        }
        for ty in ["blob", "tinyblob", "mediumblob", "longblob", "binary", "varbinary", "bytea"] {
            map.insert(ty, "[]byte", "[]byte", "[]byte");
        }
        for ty in ["bool", "boolean", "bit"] {
            map.insert(ty, "bool", "sql.NullBool", "null.Bool");
        }

        map
    }
}

impl TypeMap {
    fn insert(&mut self, ty: &str, not_null: &str, nullable: &str, alternate: &str) {
        self.not_null.insert(ty.to_string(), not_null.to_string());
        self.nullable.insert(ty.to_string(), nullable.to_string());
        self.nullable_alternate.insert(ty.to_string(), alternate.to_string());
    }

    fn table(&self, nullable: bool, alternate: bool) -> &BTreeMap<String, String> {
        match (nullable, alternate) {
            (false, _) => &self.not_null,
            (true, false) => &self.nullable,
            (true, true) => &self.nullable_alternate,
        }
    }

    /// Map a normalized type to its target type name.
    ///
    /// Returns `None` when the type has no association; callers skip
    /// such columns rather than emit invalid output.
    pub fn map(&self, normalized_type: &str, nullable: bool, alternate: bool) -> Option<&str> {
        let table = self.table(nullable, alternate);
        if let Some(target) = table.get(normalized_type) {
            return Some(target.as_str());
        }
        self.prefixes
            .iter()
            .find(|(prefix, _)| normalized_type.starts_with(prefix))
            .and_then(|(_, family)| table.get(*family))
            .map(String::as_str)
    }

    /// Apply a JSON customization payload on top of the defaults.
    ///
    /// The payload maps normalized type names to replacement target
    /// types per nullability table. A malformed payload fails the
    /// whole load; nothing is applied partially.
    pub fn apply_overrides(&mut self, payload: &str) -> Result<()> {
        let overrides: BTreeMap<String, MappingOverride> =
            serde_json::from_str(payload).map_err(|err| Error::Mapping(err.to_string()))?;

        for (ty, entry) in overrides {
            if let Some(target) = entry.not_null {
                self.not_null.insert(ty.clone(), target);
            }
            if let Some(target) = entry.nullable {
                self.nullable.insert(ty.clone(), target);
            }
            if let Some(target) = entry.nullable_alternate {
                self.nullable_alternate.insert(ty.clone(), target);
            }
        }
        Ok(())
    }

    /// Every normalized type name the default tables know about.
    pub fn known_types(&self) -> impl Iterator<Item = &str> {
        self.not_null.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_exact_types_per_table() {
        let map = TypeMap::default();
        assert_eq!(map.map("int", false, false), Some("int32"));
        assert_eq!(map.map("int", true, false), Some("sql.NullInt64"));
        assert_eq!(map.map("int", true, true), Some("null.Int"));
        assert_eq!(map.map("text", true, false), Some("sql.NullString"));
        assert_eq!(map.map("datetime", true, true), Some("null.Time"));
    }

    #[test]
    fn falls_back_to_family_prefix() {
        let map = TypeMap::default();
        assert_eq!(map.map("varchar2", false, false), Some("string"));
        assert_eq!(map.map("numeric(10,2)", false, false), Some("float64"));
        assert_eq!(map.map("enum('a','b')", true, false), Some("sql.NullString"));
    }

    #[test]
    fn unknown_type_yields_sentinel() {
        let map = TypeMap::default();
        assert_eq!(map.map("geometry", false, false), None);
        assert_eq!(map.map("geometry", true, true), None);
    }

    #[test]
    fn overrides_replace_selected_entries() {
        let mut map = TypeMap::default();
        map.apply_overrides(r#"{"datetime": {"notnull": "string", "nullable": "sql.NullString"}}"#)
            .expect("payload applies");
        assert_eq!(map.map("datetime", false, false), Some("string"));
        assert_eq!(map.map("datetime", true, false), Some("sql.NullString"));
        // untouched table keeps its default
        assert_eq!(map.map("datetime", true, true), Some("null.Time"));
    }

    #[test]
    fn malformed_payload_fails_whole_load() {
        let mut map = TypeMap::default();
        let err = map.apply_overrides(r#"{"datetime": {"bogus": 1}}"#).unwrap_err();
        assert!(matches!(err, Error::Mapping(_)));
        assert_eq!(map.map("datetime", false, false), Some("time.Time"));
    }
}
