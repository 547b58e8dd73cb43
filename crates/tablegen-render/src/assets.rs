//! Embedded default template bodies.
//!
//! These are opaque handlebars bodies as far as the engine is
//! concerned; drivers may shadow any of them through their own loader.

use std::sync::Arc;

use crate::engine::TemplateLoader;

pub const MODEL: &str = r#"package {{package}}

// {{structName}} maps one row of {{tableName}}.
type {{structName}} struct {
{{#each fields}}
	{{this}}
{{/each}}
}

// TableName returns the source table for {{structName}}.
func ({{shortName}} *{{structName}}) TableName() string {
	return "{{tableName}}"
}
"#;

pub const DAO: &str = r#"package {{package}}

import (
	"context"
	"database/sql"
)

// Data access statements for {{tableName}}.
"#;

pub const DAO_ADD: &str = r#"
// Add{{structName}} executes:
//   {{sqlInsert}}
func Add{{structName}}(ctx context.Context, db *sql.DB, {{shortName}} *{{structName}}) error {
	_, err := db.ExecContext(ctx, `{{sqlInsert}}`)
	return err
}
"#;

pub const DAO_DELETE: &str = r#"
// Delete{{structName}} executes:
//   {{sqlDelete}}
func Delete{{structName}}(ctx context.Context, db *sql.DB) error {
	_, err := db.ExecContext(ctx, `{{sqlDelete}}`)
	return err
}
"#;

pub const DAO_GET: &str = r#"
// Get{{structName}} executes:
//   {{sqlSelectOne}}
func Get{{structName}}(ctx context.Context, db *sql.DB) (*{{structName}}, error) {
	row := db.QueryRowContext(ctx, `{{sqlSelectOne}}`)
	_ = row
	return nil, nil
}
"#;

pub const DAO_GETALL: &str = r#"
// GetAll{{pluralize structName}} executes:
//   {{sqlSelectMany}}
func GetAll{{pluralize structName}}(ctx context.Context, db *sql.DB) ([]{{structName}}, error) {
	rows, err := db.QueryContext(ctx, `{{sqlSelectMany}}`)
	if err != nil {
		return nil, err
	}
	defer rows.Close()
	return nil, nil
}
"#;

pub const DAO_UPDATE: &str = r#"
// Update{{structName}} executes:
//   {{sqlUpdate}}
func Update{{structName}}(ctx context.Context, db *sql.DB, {{shortName}} *{{structName}}) error {
	_, err := db.ExecContext(ctx, `{{sqlUpdate}}`)
	return err
}
"#;

pub const API: &str = r#"package {{package}}

import (
	"net/http"
)

// HTTP handlers for {{tableName}}.
"#;

pub const API_ADD: &str = r#"
// Add{{structName}}Handler handles POST /{{pluralize (lower structName)}}
func Add{{structName}}Handler(w http.ResponseWriter, r *http.Request) {
	w.WriteHeader(http.StatusCreated)
}
"#;

pub const API_DELETE: &str = r#"
// Delete{{structName}}Handler handles DELETE /{{pluralize (lower structName)}}/{id}
func Delete{{structName}}Handler(w http.ResponseWriter, r *http.Request) {
	w.WriteHeader(http.StatusNoContent)
}
"#;

pub const API_GET: &str = r#"
// Get{{structName}}Handler handles GET /{{pluralize (lower structName)}}/{id}
func Get{{structName}}Handler(w http.ResponseWriter, r *http.Request) {
	w.WriteHeader(http.StatusOK)
}
"#;

pub const API_GETALL: &str = r#"
// GetAll{{pluralize structName}}Handler handles GET /{{pluralize (lower structName)}}
func GetAll{{pluralize structName}}Handler(w http.ResponseWriter, r *http.Request) {
	w.WriteHeader(http.StatusOK)
}
"#;

pub const API_UPDATE: &str = r#"
// Update{{structName}}Handler handles PUT /{{pluralize (lower structName)}}/{id}
func Update{{structName}}Handler(w http.ResponseWriter, r *http.Request) {
	w.WriteHeader(http.StatusOK)
}
"#;

pub const ROUTER: &str = r#"package {{package}}

// ConfigureRouter registers one handler set per generated table.
func ConfigureRouter() {
{{#each tables}}
	register{{this}}Routes()
{{/each}}
}
"#;

/// Loader serving the embedded defaults.
pub fn default_loader() -> TemplateLoader {
    Arc::new(|name: &str| {
        let body = match name {
            "model" => MODEL,
            "dao" => DAO,
            "dao_add" => DAO_ADD,
            "dao_delete" => DAO_DELETE,
            "dao_get" => DAO_GET,
            "dao_getall" => DAO_GETALL,
            "dao_update" => DAO_UPDATE,
            "api" => API,
            "api_add" => API_ADD,
            "api_delete" => API_DELETE,
            "api_get" => API_GET,
            "api_getall" => API_GETALL,
            "api_update" => API_UPDATE,
            "router" => ROUTER,
            _ => return None,
        };
        Some(body.to_string())
    })
}
