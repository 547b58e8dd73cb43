use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Case applied to serialized field names in generated annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameCase {
    #[default]
    Snake,
    LowerCamel,
    Original,
}

/// Generation options threaded through every render call.
///
/// Read-only during rendering; the driver builds one instance up front
/// and passes it by reference instead of keeping ambient globals.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Root directory for written artifacts.
    pub out_dir: PathBuf,
    /// Package/module name stamped into generated sources.
    pub package: String,
    /// Overwrite existing output files instead of skipping them.
    pub overwrite: bool,
    /// Emit per-column diagnostics for skipped fields.
    pub verbose: bool,
    /// Run the source formatter over rendered output before writing.
    pub format: bool,
    /// Emit structured-data tags on generated record fields.
    pub json_tags: bool,
    /// Map nullable columns to the boxed-null wrapper family.
    pub alternate_null: bool,
    /// Case for serialized field names.
    pub json_name_case: NameCase,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            package: "model".to_string(),
            overwrite: false,
            verbose: false,
            format: false,
            json_tags: true,
            alternate_null: false,
            json_name_case: NameCase::Snake,
        }
    }
}

impl GenConfig {
    /// Project the configuration into the base template bindings.
    pub fn bindings(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("package".to_string(), json!(self.package));
        map.insert("outDir".to_string(), json!(self.out_dir.display().to_string()));
        map.insert("jsonTags".to_string(), json!(self.json_tags));
        map.insert("alternateNull".to_string(), json!(self.alternate_null));
        map.insert("overwrite".to_string(), json!(self.overwrite));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_carry_package_and_toggles() {
        let cfg = GenConfig {
            package: "store".to_string(),
            json_tags: false,
            ..GenConfig::default()
        };
        let bindings = cfg.bindings();
        assert_eq!(bindings["package"], json!("store"));
        assert_eq!(bindings["jsonTags"], json!(false));
    }

    #[test]
    fn deserializes_partial_toml() {
        let cfg: GenConfig = toml_like(r#"{"package":"api","overwrite":true}"#);
        assert_eq!(cfg.package, "api");
        assert!(cfg.overwrite);
        assert_eq!(cfg.json_name_case, NameCase::Snake);
    }

    fn toml_like(raw: &str) -> GenConfig {
        serde_json::from_str(raw).expect("config parses")
    }
}
