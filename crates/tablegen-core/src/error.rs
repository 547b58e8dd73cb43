use thiserror::Error;

/// Error type shared across the tablegen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The database could not be opened or pinged. Aborts the whole run.
    #[error("connection error: {0}")]
    Connection(String),
    /// A metadata query failed while describing a table.
    #[error("metadata query failed for table '{table}': {detail}")]
    Metadata { table: String, detail: String },
    /// Statement generation requires at least one primary-key column.
    #[error("table '{table}' has no primary key column")]
    NoPrimaryKey { table: String },
    /// UPDATE generation requires at least one non-key column.
    #[error("table '{table}' has no updatable column")]
    NoUpdatableColumns { table: String },
    /// A column's normalized type has no target-type mapping.
    #[error("no type mapping for column '{column}' of type '{ty}'")]
    UnknownType { column: String, ty: String },
    /// The type-mapping customization payload could not be applied.
    #[error("invalid type mapping payload: {0}")]
    Mapping(String),
    /// A named template could not be loaded.
    #[error("template '{0}' could not be loaded")]
    TemplateLoad(String),
    /// A composite template is missing one of its required sub-templates.
    #[error("composite template '{base}' is missing sub-template '{sub}'")]
    MissingSubTemplate { base: String, sub: String },
    /// Template execution failed (including strict-lookup misses).
    #[error("render failed: {0}")]
    Render(String),
    /// A capability the selected engine does not provide.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Filesystem failure while writing an artifact.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by tablegen crates.
pub type Result<T> = std::result::Result<T, Error>;
