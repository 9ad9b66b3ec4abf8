//! TableEditorLayer - Main Axum integration layer
//!
//! This module provides the main entry point for integrating axum-table-editor
//! into an Axum application.

use crate::database::traits::DatabaseProvider;
use crate::schema::DEFAULT_PER_PAGE;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[cfg(feature = "sqlite")]
use crate::database::sqlite::SqliteProvider;

use crate::api::{get_page_handler, get_row_handler, list_tables_handler, update_row_handler};
use crate::frontend::create_frontend_router;

/// State shared by every handler
pub struct EditorState<DB: DatabaseProvider> {
    /// Database provider, passed down explicitly
    pub database: Arc<DB>,

    /// Mount point without a trailing slash ("" when mounted at the root)
    pub base_path: Arc<str>,

    /// Rows per page
    pub per_page: u64,
}

impl<DB: DatabaseProvider> Clone for EditorState<DB> {
    fn clone(&self) -> Self {
        Self {
            database: self.database.clone(),
            base_path: self.base_path.clone(),
            per_page: self.per_page,
        }
    }
}

/// Main layer for integrating the table editor into an Axum application
///
/// # Example
///
/// ```rust,no_run
/// use axum::Router;
/// use axum_table_editor::TableEditorLayer;
/// use sqlx::SqlitePool;
///
/// # async fn example() {
/// let pool = SqlitePool::connect("sqlite:chinook.db").await.unwrap();
/// let editor = TableEditorLayer::sqlite("/editor", pool).per_page(50);
/// let app = Router::new().merge(editor.into_router());
/// # }
/// ```
pub struct TableEditorLayer<DB: DatabaseProvider> {
    base_path: String,
    database: Arc<DB>,
    per_page: u64,
}

impl<DB: DatabaseProvider> TableEditorLayer<DB> {
    /// Create a new table editor at the given base path
    ///
    /// # Arguments
    ///
    /// * `base_path` - The URL path where the editor will be mounted (e.g., "/editor", or "" for the root)
    /// * `database` - The database provider implementation
    pub fn new(base_path: impl Into<String>, database: DB) -> Self {
        Self {
            base_path: normalize_base_path(&base_path.into()),
            database: Arc::new(database),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Set the number of rows per page (0 falls back to the default)
    pub fn per_page(mut self, per_page: u64) -> Self {
        self.per_page = if per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            per_page
        };
        self
    }

    /// Convert into an Axum Router that can be merged
    ///
    /// The returned router includes:
    /// - HTML pages at `{base_path}/` and `{base_path}/table/*`
    /// - Static assets at `{base_path}/assets/*`
    /// - JSON endpoints at `{base_path}/api/*`
    /// - Permissive CORS middleware for development
    pub fn into_router(self) -> Router {
        let state = EditorState {
            database: self.database,
            base_path: Arc::from(self.base_path.as_str()),
            per_page: self.per_page,
        };
        let base_path = self.base_path;

        // Axum 0.8 uses {param} syntax instead of :param
        let api_router = Router::new()
            .route(
                &format!("{}/api/tables", base_path),
                get(list_tables_handler::<DB>),
            )
            .route(
                &format!("{}/api/tables/{{table_name}}/rows", base_path),
                get(get_page_handler::<DB>),
            )
            .route(
                &format!("{}/api/tables/{{table_name}}/rows/{{row_id}}", base_path),
                get(get_row_handler::<DB>).put(update_row_handler::<DB>),
            )
            .with_state(state.clone());

        Router::new()
            .merge(api_router)
            .merge(create_frontend_router(state))
            .layer(CorsLayer::permissive())
    }
}

#[cfg(feature = "sqlite")]
impl TableEditorLayer<SqliteProvider> {
    /// Create a new table editor for SQLite
    ///
    /// # Arguments
    ///
    /// * `base_path` - The URL path where the editor will be mounted
    /// * `pool` - The SQLite connection pool
    pub fn sqlite(base_path: impl Into<String>, pool: sqlx::SqlitePool) -> Self {
        Self::new(base_path, SqliteProvider::new(pool))
    }
}

/// Strip trailing slashes and make sure a non-empty path starts with one
fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
