//! REST API endpoints
//!
//! JSON counterparts of the HTML pages, for scripts and tooling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, warn};

use crate::database::traits::DatabaseError;

pub mod rows;
pub mod tables;

// Re-export handlers for convenience
pub use rows::{get_page_handler, get_row_handler, update_row_handler};
pub use tables::list_tables_handler;

/// JSON error body with the status the error maps to
///
/// Response body:
/// ```json
/// { "error": "Table nope does not exist." }
/// ```
pub(crate) fn error_response(action: &str, error: &DatabaseError) -> Response {
    let status = error.status_code();
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Failed to {}: {}", action, error);
    } else {
        warn!("Failed to {}: {}", action, error);
    }

    (
        status,
        Json(serde_json::json!({
            "error": error.to_string()
        })),
    )
        .into_response()
}
