//! # axum-table-editor
//!
//! A development tool for browsing and editing SQLite tables in web browsers,
//! easily integrable as an Axum layer.
//!
//! ## Features
//!
//! - Schema discovery on every request, for any set of tables and columns
//! - Paginated table browsing
//! - Single-row edit form backed by one parameterized `UPDATE` per save
//! - JSON API mirroring the HTML pages
//!
//! ## Security Warning
//!
//! **This is a development tool only!**
//!
//! - No authentication/authorization built-in
//! - Exposes full database schema and data
//! - Any visitor can overwrite any row
//! - Should never be exposed in production or public networks
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use axum_table_editor::TableEditorLayer;
//! use sqlx::SqlitePool;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = SqlitePool::connect("sqlite:chinook.db")
//!         .await
//!         .unwrap();
//!
//!     let app = Router::new()
//!         .route("/health", get(|| async { "ok" }))
//!         .merge(TableEditorLayer::sqlite("/editor", pool).into_router());
//!
//!     // Serve the application...
//! }
//! ```

// Public modules
pub mod api;
pub mod database;
pub mod frontend;
pub mod html;
pub mod layer;
pub mod schema;

// Public exports
pub use layer::{EditorState, TableEditorLayer};
pub use schema::{Catalog, ColumnInfo, Page, Row, TableSchema, DEFAULT_PER_PAGE};

// Re-export database providers
pub use database::traits::{DatabaseError, DatabaseProvider};

#[cfg(feature = "sqlite")]
pub use database::sqlite::SqliteProvider;
