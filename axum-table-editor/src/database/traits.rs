//! Database provider trait
//!
//! This trait defines the interface that all database implementations must provide.

use crate::schema::{Catalog, Page, Row};
use async_trait::async_trait;
use axum::http::StatusCode;
use std::collections::HashMap;
use thiserror::Error;

/// Database provider trait for schema discovery, row access and row updates
///
/// Every call opens its own connection or transaction scope and releases it
/// before returning, whether it succeeds or fails.
#[async_trait]
pub trait DatabaseProvider: Send + Sync + 'static {
    /// List every table in the database with its columns
    ///
    /// Always reads the live catalog so schema changes made elsewhere are
    /// visible on the next call.
    async fn list_tables_and_columns(&self) -> Result<Catalog, DatabaseError>;

    /// Fetch one page of rows plus the table's total row count
    ///
    /// # Arguments
    ///
    /// * `table` - Name of the table, must be part of the catalog
    /// * `page_number` - 1-based page number
    /// * `per_page` - Maximum rows on a page
    ///
    /// # Returns
    ///
    /// The page, which is empty when `page_number` lies past the last page
    async fn read_page(
        &self,
        table: &str,
        page_number: u64,
        per_page: u64,
    ) -> Result<Page, DatabaseError>;

    /// Fetch a single row by its row identifier
    async fn read_row(&self, table: &str, row_id: i64) -> Result<Row, DatabaseError>;

    /// Overwrite the columns of exactly one row
    ///
    /// # Arguments
    ///
    /// * `table` - Name of the table, must be part of the catalog
    /// * `row_id` - Row identifier within that table
    /// * `values` - Text value per column, handed to the engine for coercion;
    ///   `None` stores NULL
    ///
    /// The change is committed before returning. On any failure nothing is
    /// applied.
    ///
    /// # Returns
    ///
    /// The row identifier after the update, which differs from `row_id` when
    /// the update assigned a new value to the column aliasing it
    async fn update_row(
        &self,
        table: &str,
        row_id: i64,
        values: &HashMap<String, Option<String>>,
    ) -> Result<i64, DatabaseError>;
}

/// Database error type
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The database could not be reached or queried
    #[error("Database connectivity error: {0}")]
    Connectivity(String),

    /// The engine rejected a statement (constraint, type or lock failure)
    #[error("Database error: {0}")]
    Query(String),

    /// Table not found
    #[error("Table {0} does not exist.")]
    TableNotFound(String),

    /// No row with the given identifier
    #[error("Row {row_id} does not exist in table {table}.")]
    RowNotFound { table: String, row_id: i64 },

    /// Page numbers start at 1
    #[error("Invalid page: {0}")]
    InvalidPage(u64),

    /// A column was left without a value on update
    #[error("Missing value for column: {0}")]
    MissingColumn(String),

    /// A value was supplied for a column the table does not have
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// The table has no usable row identifier (e.g. `WITHOUT ROWID`)
    #[error("Table {0} has no row identifier")]
    NoRowIdentifier(String),
}

impl DatabaseError {
    /// HTTP status the presentation layer answers with for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DatabaseError::TableNotFound(_) | DatabaseError::RowNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            DatabaseError::InvalidPage(_)
            | DatabaseError::MissingColumn(_)
            | DatabaseError::UnknownColumn(_)
            | DatabaseError::NoRowIdentifier(_) => StatusCode::BAD_REQUEST,
            DatabaseError::Connectivity(_) | DatabaseError::Query(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Database(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::Decode(_)
            | sqlx::Error::TypeNotFound { .. } => DatabaseError::Query(error.to_string()),
            _ => DatabaseError::Connectivity(error.to_string()),
        }
    }
}
