use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
    RenderError, RenderErrorReason,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use tablegen_core::{Error, GenConfig, Result, TableDescriptor, TypeMap};

use crate::context::{ModelInfo, render_context};
use crate::format::{DEFAULT_FORMATTER, format_source};
use crate::helpers;
use crate::writer::{WriteOutcome, write_artifact};

/// Callback resolving a template name to its body.
pub type TemplateLoader = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Base templates that require the per-operation sub-template set.
const COMPOSITE_BASES: [&str; 4] = ["api", "dao", "api_doc", "dao_doc"];
/// Sub-template suffixes, in the order they are appended.
const SUB_OPERATIONS: [&str; 5] = ["add", "delete", "get", "getall", "update"];

struct EngineState {
    config: GenConfig,
    typemap: TypeMap,
    loader: TemplateLoader,
    tables: BTreeMap<String, TableDescriptor>,
}

/// The template composition engine.
///
/// Holds the read-only configuration, type map, template loader, and
/// the descriptors of every table in the run; each render call builds
/// its own context and registry, so no mutable state is shared across
/// renders.
#[derive(Clone)]
pub struct RenderEngine {
    state: Arc<EngineState>,
}

impl RenderEngine {
    pub fn new(
        config: GenConfig,
        typemap: TypeMap,
        loader: TemplateLoader,
        tables: Vec<TableDescriptor>,
    ) -> Self {
        let tables = tables
            .into_iter()
            .map(|table| (table.name.clone(), table))
            .collect();
        Self {
            state: Arc::new(EngineState {
                config,
                typemap,
                loader,
                tables,
            }),
        }
    }

    pub fn config(&self) -> &GenConfig {
        &self.state.config
    }

    /// Fresh registry with strict lookup and the shared helper set.
    fn registry(&self) -> Handlebars<'static> {
        let mut hb = Handlebars::new();
        hb.register_escape_fn(handlebars::no_escape);
        // unresolved bindings are render failures, not empty output
        hb.set_strict_mode(true);
        helpers::register(&mut hb);
        hb.register_helper(
            "renderTable",
            Box::new(RenderTableHelper {
                state: Arc::clone(&self.state),
            }),
        );
        hb.register_helper(
            "renderFile",
            Box::new(RenderFileHelper {
                state: Arc::clone(&self.state),
            }),
        );
        hb
    }

    /// Load a template body, appending sub-templates for composite bases.
    fn resolve_template(&self, name: &str) -> Result<String> {
        let mut body =
            (self.state.loader)(name).ok_or_else(|| Error::TemplateLoad(name.to_string()))?;

        if COMPOSITE_BASES.contains(&name) {
            for op in SUB_OPERATIONS {
                let sub = format!("{name}_{op}");
                let sub_body = (self.state.loader)(&sub).ok_or(Error::MissingSubTemplate {
                    base: name.to_string(),
                    sub: sub.clone(),
                })?;
                body.push('\n');
                body.push_str(&sub_body);
            }
        }
        Ok(body)
    }

    /// Execute a named template against an assembled binding set.
    pub fn render_to_string(&self, template: &str, bindings: &Map<String, Value>) -> Result<String> {
        let body = self.resolve_template(template)?;
        self.registry()
            .render_template(&body, &Value::Object(bindings.clone()))
            .map_err(|err| Error::Render(format!("template '{template}': {err}")))
    }

    /// Render one table through a named template into the output tree.
    ///
    /// `target` is resolved under the configured output directory.
    pub fn render_table(
        &self,
        table: &str,
        template: &str,
        target: &Path,
    ) -> Result<WriteOutcome> {
        let descriptor = self
            .state
            .tables
            .get(table)
            .ok_or_else(|| Error::Render(format!("unknown table '{table}'")))?;
        let model = ModelInfo::build(descriptor, &self.state.config, &self.state.typemap)?;
        if model.statements.is_none() && COMPOSITE_BASES.contains(&template) {
            return Err(if descriptor.has_primary_key() {
                Error::NoUpdatableColumns {
                    table: table.to_string(),
                }
            } else {
                Error::NoPrimaryKey {
                    table: table.to_string(),
                }
            });
        }

        let bindings = render_context(&self.state.config, Some(&model), &Map::new());
        let rendered = self.render_to_string(template, &bindings)?;
        debug!(table, template, "rendered table artifact");
        self.persist(template, target, rendered)
    }

    /// Render a project-level artifact; no table is in scope.
    pub fn render_project(
        &self,
        template: &str,
        target: &Path,
        extras: &Map<String, Value>,
    ) -> Result<WriteOutcome> {
        let bindings = render_context(&self.state.config, None, extras);
        let rendered = self.render_to_string(template, &bindings)?;
        debug!(template, "rendered project artifact");
        self.persist(template, target, rendered)
    }

    /// Names of every table known to this engine, sorted.
    pub fn table_names(&self) -> Vec<String> {
        self.state.tables.keys().cloned().collect()
    }

    fn persist(&self, template: &str, target: &Path, rendered: String) -> Result<WriteOutcome> {
        let rendered = if self.state.config.format {
            match format_source(DEFAULT_FORMATTER, &rendered) {
                Ok(formatted) => formatted,
                Err(err) => {
                    warn!(template, %err, "formatter failed, writing unformatted output");
                    rendered
                }
            }
        } else {
            rendered
        };
        let path = self.state.config.out_dir.join(target);
        write_artifact(&path, &rendered, self.state.config.overwrite)
    }
}

fn param_str<'a>(h: &'a Helper<'_>, name: &str, idx: usize) -> std::result::Result<&'a str, RenderError> {
    h.param(idx)
        .and_then(|p| p.value().as_str())
        .ok_or_else(|| {
            RenderErrorReason::Other(format!("{name}: missing string parameter {idx}")).into()
        })
}

/// `{{renderTable <table> <template> <target>}}` — recursive entry
/// point letting a template render another table's artifact.
struct RenderTableHelper {
    state: Arc<EngineState>,
}

impl HelperDef for RenderTableHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        _out: &mut dyn Output,
    ) -> HelperResult {
        let table = param_str(h, "renderTable", 0)?;
        let template = param_str(h, "renderTable", 1)?;
        let target = param_str(h, "renderTable", 2)?;

        let engine = RenderEngine {
            state: Arc::clone(&self.state),
        };
        engine
            .render_table(table, template, Path::new(target))
            .map_err(|err| RenderErrorReason::Other(err.to_string()))?;
        Ok(())
    }
}

/// `{{renderFile <template> <target>}}` — recursive entry point for a
/// non-table artifact.
struct RenderFileHelper {
    state: Arc<EngineState>,
}

impl HelperDef for RenderFileHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        _out: &mut dyn Output,
    ) -> HelperResult {
        let template = param_str(h, "renderFile", 0)?;
        let target = param_str(h, "renderFile", 1)?;

        let engine = RenderEngine {
            state: Arc::clone(&self.state),
        };
        engine
            .render_project(template, Path::new(target), &Map::new())
            .map_err(|err| RenderErrorReason::Other(err.to_string()))?;
        Ok(())
    }
}
