use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use inflector::Inflector;
use serde_json::{Map, json};
use sqlx::any::AnyPoolOptions;
use tracing::{info, warn};

use tablegen_core::{Error as CoreError, GenConfig, TypeMap};
use tablegen_introspect::{Engine, adapter_for, list_tables};
use tablegen_render::{RenderEngine, TemplateLoader, default_loader};

use crate::{CliError, GenerateArgs};

/// Outcome of one generation run.
pub struct RunSummary {
    pub generated_tables: Vec<String>,
    pub failed_tables: Vec<String>,
}

pub async fn run(args: GenerateArgs) -> Result<RunSummary, CliError> {
    let conn = args
        .conn
        .clone()
        .or_else(|| args.conn_pos.clone())
        .ok_or_else(|| CliError::InvalidConfig("missing connection string".to_string()))?;
    // parsing is infallible; unrecognized names select the fallback
    let engine: Engine = args.engine.parse().unwrap_or(Engine::Unknown);

    let config = build_config(&args)?;
    let typemap = build_typemap(args.mapping.as_deref())?;
    let loader = build_loader(args.templates.clone());

    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect(&conn)
        .await
        .map_err(|err| CoreError::Connection(err.to_string()))?;

    let tables = if args.tables.is_empty() {
        list_tables(&pool, engine).await?
    } else {
        args.tables.clone()
    };
    info!(%engine, tables = tables.len(), out = %config.out_dir.display(), "starting generation");

    // describe every table up front so recursive template helpers can
    // reach any of them during project rendering
    let adapter = adapter_for(engine);
    let mut descriptors = Vec::new();
    let mut failed_tables = Vec::new();
    for table in &tables {
        match adapter.describe_table(&pool, &args.database, table).await {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(err) => {
                warn!(table, %err, "skipping table, metadata query failed");
                failed_tables.push(table.clone());
            }
        }
    }

    let renderer = RenderEngine::new(config, typemap, loader, descriptors);

    let mut generated_tables = Vec::new();
    for table in renderer.table_names() {
        match render_table_artifacts(&renderer, &table) {
            Ok(()) => {
                info!(table, "generated table artifacts");
                generated_tables.push(table);
            }
            Err(err) => {
                warn!(table, %err, "table generation failed");
                failed_tables.push(table);
            }
        }
    }

    let mut extras = Map::new();
    let struct_names: Vec<String> =
        generated_tables.iter().map(|t| t.to_pascal_case()).collect();
    extras.insert("tables".to_string(), json!(struct_names));
    if let Err(err) = renderer.render_project("router", Path::new("router.go"), &extras) {
        warn!(%err, "router generation failed");
    }

    info!(
        generated = generated_tables.len(),
        failed = failed_tables.len(),
        "generation finished"
    );
    Ok(RunSummary {
        generated_tables,
        failed_tables,
    })
}

/// Render the three per-table artifacts.
///
/// Each artifact is attempted independently so a statement-generation
/// failure (keyless table) still leaves the record definition behind;
/// the first error is reported with its table name by the caller.
fn render_table_artifacts(renderer: &RenderEngine, table: &str) -> Result<(), CoreError> {
    let snake = table.to_snake_case();
    let artifacts = [
        ("model", format!("model/{snake}.go")),
        ("dao", format!("dao/{snake}.go")),
        ("api", format!("api/{snake}.go")),
    ];

    let mut first_error = None;
    for (template, target) in artifacts {
        if let Err(err) = renderer.render_table(table, template, &PathBuf::from(target)) {
            warn!(table, template, %err, "artifact render failed");
            first_error.get_or_insert(err);
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn build_config(args: &GenerateArgs) -> Result<GenConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            toml::from_str(&raw)
                .map_err(|err| CliError::InvalidConfig(format!("{}: {err}", path.display())))?
        }
        None => GenConfig::default(),
    };

    config.out_dir = args.out.clone();
    config.package = args.package.clone();
    config.overwrite |= args.overwrite;
    config.format |= args.format;
    config.verbose |= args.verbose;
    config.alternate_null |= args.alternate_null;
    if args.no_json_tags {
        config.json_tags = false;
    }
    Ok(config)
}

fn build_typemap(mapping: Option<&Path>) -> Result<TypeMap, CliError> {
    let mut typemap = TypeMap::default();
    if let Some(path) = mapping {
        let payload = fs::read_to_string(path)?;
        typemap.apply_overrides(&payload)?;
    }
    Ok(typemap)
}

/// Template loader: an optional directory of `<name>.tmpl` files
/// shadowing the embedded defaults.
fn build_loader(dir: Option<PathBuf>) -> TemplateLoader {
    let defaults = default_loader();
    match dir {
        Some(dir) => Arc::new(move |name: &str| {
            let candidate = dir.join(format!("{name}.tmpl"));
            match fs::read_to_string(&candidate) {
                Ok(body) => Some(body),
                Err(_) => defaults(name),
            }
        }),
        None => defaults,
    }
}
