//! Template composition engine and output writing.
//!
//! Renders per-table and per-project artifacts from named handlebars
//! templates in strict-lookup mode, composing composite bases from
//! their per-operation sub-templates before parsing.

pub mod assets;
pub mod context;
pub mod engine;
pub mod format;
mod helpers;
pub mod writer;

pub use assets::default_loader;
pub use context::{ModelInfo, render_context};
pub use engine::{RenderEngine, TemplateLoader};
pub use writer::{WriteOutcome, write_artifact};
