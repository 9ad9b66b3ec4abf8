//! Table listing endpoint

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use super::error_response;
use crate::database::traits::DatabaseProvider;
use crate::layer::EditorState;

/// Handler for GET /api/tables
///
/// Returns every table in the database with its columns, read fresh from the
/// catalog on each call.
///
/// Response:
/// ```json
/// {
///   "tables": {
///     "albums": {
///       "name": "albums",
///       "columns": [{ "name": "AlbumId", "dataType": "INTEGER", "nullable": true, "isPrimaryKey": true }],
///       "hasRowIdentifier": true
///     }
///   }
/// }
/// ```
pub async fn list_tables_handler<DB: DatabaseProvider>(
    State(state): State<EditorState<DB>>,
) -> Response {
    match state.database.list_tables_and_columns().await {
        Ok(catalog) => (StatusCode::OK, Json(catalog)).into_response(),
        Err(error) => error_response("list tables", &error),
    }
}
