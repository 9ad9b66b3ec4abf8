//! HTML pages and static asset serving
//!
//! This module routes the browser-facing pages: the table list, a paginated
//! table view and the row edit form. Rendering lives in [`crate::html`].

use axum::{
    body::Body,
    extract::{Form, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use include_dir::{include_dir, Dir};
use std::collections::HashMap;
use tracing::{error, info, warn};

use crate::database::traits::{DatabaseError, DatabaseProvider};
use crate::html::{render_edit_form, render_index, render_table, table_url, NULL_FIELD};
use crate::layer::EditorState;
use crate::schema::PageQuery;

// Embed the assets directory at compile time
static ASSETS: Dir = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Create a router for the HTML pages and their assets
///
/// This returns a Router that serves:
/// - GET / -> table list
/// - GET /table/{table_name}?page=n -> one page of rows
/// - GET /table/{table_name}/edit/{row_id} -> edit form
/// - POST /table/{table_name}/edit/{row_id} -> apply the edit, redirect back
/// - GET /assets/* -> embedded static assets
///
/// All paths are prefixed with the state's base path.
pub fn create_frontend_router<DB: DatabaseProvider>(state: EditorState<DB>) -> Router {
    let base_path = state.base_path.to_string();

    let mut router = Router::new()
        .route(&format!("{}/", base_path), get(index_page_handler::<DB>))
        .route(
            &format!("{}/table/{{table_name}}", base_path),
            get(table_page_handler::<DB>),
        )
        .route(
            &format!("{}/table/{{table_name}}/edit/{{row_id}}", base_path),
            get(edit_page_handler::<DB>).post(submit_edit_handler::<DB>),
        )
        .route(
            &format!("{}/assets/{{*path}}", base_path),
            get(serve_static_asset),
        );

    // Also answer the bare mount point ("/editor" as well as "/editor/")
    if !base_path.is_empty() {
        router = router.route(&base_path, get(index_page_handler::<DB>));
    }

    router.with_state(state)
}

/// Handler for GET /
///
/// Lists every table in the database with its columns.
async fn index_page_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
) -> Response {
    match state.database.list_tables_and_columns().await {
        Ok(catalog) => Html(render_index(&state.base_path, &catalog)).into_response(),
        Err(error) => error_page("list tables", &error),
    }
}

/// Handler for GET /table/{table_name}
///
/// Query parameters:
/// - page: 1-based page number (default: 1)
async fn table_page_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
    Path(table_name): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    match state
        .database
        .read_page(&table_name, query.page, state.per_page)
        .await
    {
        Ok(page) => Html(render_table(&state.base_path, &page)).into_response(),
        Err(error) => error_page(&format!("read table '{}'", table_name), &error),
    }
}

/// Handler for GET /table/{table_name}/edit/{row_id}
///
/// Shows the row in a form with one input per column.
async fn edit_page_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
    Path((table_name, row_id)): Path<(String, i64)>,
    Query(query): Query<PageQuery>,
) -> Response {
    let catalog = match state.database.list_tables_and_columns().await {
        Ok(catalog) => catalog,
        Err(error) => return error_page("list tables", &error),
    };
    let Some(schema) = catalog.table(&table_name) else {
        return error_page(
            "edit row",
            &DatabaseError::TableNotFound(table_name.clone()),
        );
    };

    match state.database.read_row(&table_name, row_id).await {
        Ok(row) => Html(render_edit_form(&state.base_path, schema, &row, query.page)).into_response(),
        Err(error) => error_page(&format!("read row {} of '{}'", row_id, table_name), &error),
    }
}

/// Handler for POST /table/{table_name}/edit/{row_id}
///
/// Form body: one field per column, plus a `__null__` field naming each
/// column to store as NULL. On success redirects (303) to the table page the
/// edit was started from.
async fn submit_edit_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
    Path((table_name, row_id)): Path<(String, i64)>,
    Query(query): Query<PageQuery>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let values = form_values(fields);
    match state.database.update_row(&table_name, row_id, &values).await {
        Ok(new_row_id) => {
            info!(table = %table_name, row_id, new_row_id, "row updated");
            Redirect::to(&table_url(&state.base_path, &table_name, query.page)).into_response()
        }
        Err(error) => error_page(&format!("update row {} of '{}'", row_id, table_name), &error),
    }
}

/// Column values from a submitted edit form
///
/// A column named by a `__null__` field maps to `None` whatever its text
/// input held.
fn form_values(fields: Vec<(String, String)>) -> HashMap<String, Option<String>> {
    let (null_fields, value_fields): (Vec<_>, Vec<_>) = fields
        .into_iter()
        .partition(|(name, _)| name == NULL_FIELD);

    let mut values: HashMap<String, Option<String>> = value_fields
        .into_iter()
        .map(|(name, value)| (name, Some(value)))
        .collect();
    for (_, column) in null_fields {
        values.insert(column, None);
    }
    values
}

/// Plain-text error response with the status the error maps to
fn error_page(action: &str, error: &DatabaseError) -> Response {
    let status = error.status_code();
    if status.is_server_error() {
        error!("Failed to {}: {}", action, error);
    } else {
        warn!("Failed to {}: {}", action, error);
    }

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(error.to_string()))
        .unwrap_or_else(|_| status.into_response())
}

/// Serve static assets with proper MIME types
///
/// Caching: max-age=86400 (1 day), asset names are not content-hashed
async fn serve_static_asset(Path(path): Path<String>) -> Response {
    match ASSETS.get_file(&path) {
        Some(file) => {
            let mime_type = mime_guess::from_path(&path)
                .first_or_octet_stream()
                .to_string();

            (
                [
                    (header::CONTENT_TYPE, mime_type),
                    (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
                ],
                file.contents(),
            )
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Asset not found: {}", path),
        )
            .into_response(),
    }
}
