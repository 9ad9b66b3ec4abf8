//! Row endpoints: paginated reads, single-row reads and updates

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::collections::HashMap;
use tracing::info;

use super::error_response;
use crate::database::traits::DatabaseProvider;
use crate::layer::EditorState;
use crate::schema::PageQuery;

/// Handler for GET /api/tables/{table_name}/rows
///
/// Query parameters:
/// - page: 1-based page number (default: 1); the page size is fixed by the layer
///
/// Response contains `rows`, `columns`, `page`, `perPage`, `totalRows` and
/// `totalPages`. A page past the end has an empty `rows` array.
pub async fn get_page_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
    Path(table_name): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    match state
        .database
        .read_page(&table_name, query.page, state.per_page)
        .await
    {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(error) => error_response(&format!("read table '{}'", table_name), &error),
    }
}

/// Handler for GET /api/tables/{table_name}/rows/{row_id}
pub async fn get_row_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
    Path((table_name, row_id)): Path<(String, i64)>,
) -> Response {
    match state.database.read_row(&table_name, row_id).await {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(error) => error_response(
            &format!("read row {} of '{}'", row_id, table_name),
            &error,
        ),
    }
}

/// Handler for PUT /api/tables/{table_name}/rows/{row_id}
///
/// Request body: a JSON object mapping every column to its new text value,
/// or `null` to store NULL. Declared key columns may be left out.
///
/// ```json
/// { "Title": "New Title", "ArtistId": "5", "Note": null }
/// ```
///
/// Responds with the row as stored after the update, looked up by its new
/// row id when the update changed it.
pub async fn update_row_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
    Path((table_name, row_id)): Path<(String, i64)>,
    Json(values): Json<HashMap<String, Option<String>>>,
) -> Response {
    let new_row_id = match state.database.update_row(&table_name, row_id, &values).await {
        Ok(new_row_id) => new_row_id,
        Err(error) => {
            return error_response(
                &format!("update row {} of '{}'", row_id, table_name),
                &error,
            )
        }
    };
    info!(table = %table_name, row_id, new_row_id, "row updated");

    match state.database.read_row(&table_name, new_row_id).await {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(error) => error_response(
            &format!("read row {} of '{}'", new_row_id, table_name),
            &error,
        ),
    }
}
