//! SQLite database provider implementation

use crate::database::traits::{DatabaseError, DatabaseProvider};
use crate::schema::{Catalog, ColumnInfo, Page, Row, TableSchema};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row as _, SqliteConnection, SqlitePool, TypeInfo, ValueRef};
use std::collections::HashMap;
use tracing::debug;

/// Every user table with its columns, in table name then column order
///
/// `pragma_table_list` reports `WITHOUT ROWID` tables through `wr`.
const CATALOG_QUERY: &str = r#"
    SELECT
        t.name AS table_name,
        t.wr AS without_rowid,
        c.name AS column_name,
        c.type AS data_type,
        c."notnull" AS not_null,
        c.pk AS primary_key
    FROM pragma_table_list AS t
    JOIN pragma_table_info(t.name, t.schema) AS c
    WHERE t.schema = 'main'
      AND t.type = 'table'
      AND t.name NOT LIKE 'sqlite_%'
    ORDER BY t.name, c.cid
"#;

/// SQLite database provider
pub struct SqliteProvider {
    pool: SqlitePool,
}

impl SqliteProvider {
    /// Create a new SQLite provider
    ///
    /// # Arguments
    ///
    /// * `pool` - SQLite connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Quote an identifier (table or column name) to prevent SQL injection
    ///
    /// SQLite uses double quotes for identifiers. This function escapes any
    /// double quotes in the identifier by doubling them.
    fn quote_identifier(identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }

    /// Read the catalog through an already acquired connection
    async fn inspect_catalog(connection: &mut SqliteConnection) -> Result<Catalog, DatabaseError> {
        let rows = sqlx::query(CATALOG_QUERY).fetch_all(&mut *connection).await?;

        let mut catalog = Catalog::default();
        for row in rows {
            let table_name: String = row.try_get("table_name")?;
            let without_rowid: i64 = row.try_get("without_rowid")?;
            let not_null: i64 = row.try_get("not_null")?;
            let primary_key: i64 = row.try_get("primary_key")?;

            let column = ColumnInfo {
                name: row.try_get("column_name")?,
                data_type: row.try_get("data_type")?,
                nullable: not_null == 0,
                is_primary_key: primary_key > 0,
            };

            catalog
                .tables
                .entry(table_name.clone())
                .or_insert_with(|| TableSchema {
                    name: table_name,
                    columns: Vec::new(),
                    has_row_identifier: without_rowid == 0,
                })
                .columns
                .push(column);
        }

        Ok(catalog)
    }

    /// Confirm the table is in the catalog and find its row identifier alias
    ///
    /// Identifiers only reach statement text after passing through here.
    fn resolve_table<'a>(
        catalog: &'a Catalog,
        table: &str,
    ) -> Result<(&'a TableSchema, &'static str), DatabaseError> {
        let schema = catalog
            .table(table)
            .ok_or_else(|| DatabaseError::TableNotFound(table.to_string()))?;
        let alias = schema
            .row_identifier_alias()
            .ok_or_else(|| DatabaseError::NoRowIdentifier(table.to_string()))?;
        Ok((schema, alias))
    }

    /// Row identifier followed by every column, in table order
    fn select_list(schema: &TableSchema, alias: &str) -> String {
        let mut parts = Vec::with_capacity(schema.columns.len() + 1);
        parts.push(alias.to_string());
        parts.extend(
            schema
                .columns
                .iter()
                .map(|column| Self::quote_identifier(&column.name)),
        );
        parts.join(", ")
    }

    /// Offset of the first row on a page
    fn page_offset(page_number: u64, per_page: u64) -> Result<i64, DatabaseError> {
        if page_number < 1 {
            return Err(DatabaseError::InvalidPage(page_number));
        }
        (page_number - 1)
            .checked_mul(per_page)
            .and_then(|offset| i64::try_from(offset).ok())
            .ok_or(DatabaseError::InvalidPage(page_number))
    }

    /// Convert a result row laid out by `select_list` into a `Row`
    fn decode_row(row: &SqliteRow, schema: &TableSchema) -> Result<Row, DatabaseError> {
        let row_id: i64 = row.try_get(0)?;

        let mut values = Map::new();
        for (index, column) in schema.columns.iter().enumerate() {
            let value = Self::extract_column_value(row, index + 1)?;
            values.insert(column.name.clone(), value);
        }

        Ok(Row { row_id, values })
    }

    /// Extract a column value from a SQLite row and convert to JSON
    ///
    /// SQLite types values, not columns, so the storage class of the value
    /// itself decides the conversion.
    fn extract_column_value(row: &SqliteRow, index: usize) -> Result<Value, DatabaseError> {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        let storage_class = raw.type_info().name().to_string();

        match storage_class.as_str() {
            "INTEGER" => {
                if let Ok(value) = row.try_get::<i64, _>(index) {
                    return Ok(Value::Number(value.into()));
                }
            }
            "REAL" => {
                if let Ok(value) = row.try_get::<f64, _>(index) {
                    if let Some(number) = serde_json::Number::from_f64(value) {
                        return Ok(Value::Number(number));
                    }
                }
            }
            "BLOB" => {
                if let Ok(value) = row.try_get::<Vec<u8>, _>(index) {
                    return Ok(Value::String(String::from_utf8_lossy(&value).into_owned()));
                }
            }
            _ => {
                if let Ok(value) = row.try_get::<String, _>(index) {
                    return Ok(Value::String(value));
                }
            }
        }

        // Fallback: try common types in order
        if let Ok(value) = row.try_get::<String, _>(index) {
            return Ok(Value::String(value));
        }
        if let Ok(value) = row.try_get::<i64, _>(index) {
            return Ok(Value::Number(value.into()));
        }
        if let Ok(value) = row.try_get::<f64, _>(index) {
            if let Some(number) = serde_json::Number::from_f64(value) {
                return Ok(Value::Number(number));
            }
        }

        Ok(Value::Null)
    }
}

#[async_trait]
impl DatabaseProvider for SqliteProvider {
    async fn list_tables_and_columns(&self) -> Result<Catalog, DatabaseError> {
        let mut connection = self.pool.acquire().await?;
        Self::inspect_catalog(&mut connection).await
    }

    async fn read_page(
        &self,
        table: &str,
        page_number: u64,
        per_page: u64,
    ) -> Result<Page, DatabaseError> {
        let offset = Self::page_offset(page_number, per_page)?;
        let limit = i64::try_from(per_page).unwrap_or(i64::MAX);

        // Count and page come from the same snapshot
        let mut transaction = self.pool.begin().await?;
        let catalog = Self::inspect_catalog(&mut transaction).await?;
        let (schema, alias) = Self::resolve_table(&catalog, table)?;
        let quoted_table = Self::quote_identifier(&schema.name);

        let count_query = format!("SELECT COUNT(*) FROM {}", quoted_table);
        let total: i64 = sqlx::query_scalar(&count_query)
            .fetch_one(&mut *transaction)
            .await?;

        // No ORDER BY: rows come back in the engine's storage order
        let select_query = format!(
            "SELECT {} FROM {} LIMIT ? OFFSET ?",
            Self::select_list(schema, alias),
            quoted_table
        );
        debug!(table, page_number, per_page, sql = %select_query, "reading page");

        let rows = sqlx::query(&select_query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *transaction)
            .await?;
        transaction.commit().await?;

        let mut page_rows = Vec::with_capacity(rows.len());
        for row in &rows {
            page_rows.push(Self::decode_row(row, schema)?);
        }

        Ok(Page::new(
            schema.name.clone(),
            schema.column_names().into_iter().map(String::from).collect(),
            page_rows,
            page_number,
            per_page,
            total.max(0) as u64,
        ))
    }

    async fn read_row(&self, table: &str, row_id: i64) -> Result<Row, DatabaseError> {
        let mut connection = self.pool.acquire().await?;
        let catalog = Self::inspect_catalog(&mut connection).await?;
        let (schema, alias) = Self::resolve_table(&catalog, table)?;

        let select_query = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            Self::select_list(schema, alias),
            Self::quote_identifier(&schema.name),
            alias
        );
        debug!(table, row_id, sql = %select_query, "reading row");

        let row = sqlx::query(&select_query)
            .bind(row_id)
            .fetch_optional(&mut *connection)
            .await?
            .ok_or_else(|| DatabaseError::RowNotFound {
                table: table.to_string(),
                row_id,
            })?;

        Self::decode_row(&row, schema)
    }

    async fn update_row(
        &self,
        table: &str,
        row_id: i64,
        values: &HashMap<String, Option<String>>,
    ) -> Result<i64, DatabaseError> {
        // Dropping the transaction on any early return rolls it back
        let mut transaction = self.pool.begin().await?;
        let catalog = Self::inspect_catalog(&mut transaction).await?;
        let (schema, alias) = Self::resolve_table(&catalog, table)?;

        if let Some(unknown) = values
            .keys()
            .filter(|name| schema.column(name).is_none())
            .min()
        {
            return Err(DatabaseError::UnknownColumn(unknown.clone()));
        }

        // Declared key columns may be left out and keep their value
        let mut assignments = Vec::with_capacity(schema.columns.len());
        let mut bound_values = Vec::with_capacity(schema.columns.len());
        for column in &schema.columns {
            match values.get(&column.name) {
                Some(value) => {
                    assignments.push(format!("{} = ?", Self::quote_identifier(&column.name)));
                    bound_values.push(value.as_deref());
                }
                None if column.is_primary_key => {}
                None => return Err(DatabaseError::MissingColumn(column.name.clone())),
            }
        }

        let quoted_table = Self::quote_identifier(&schema.name);
        let statement = if assignments.is_empty() {
            format!("SELECT {} FROM {} WHERE {} = ?", alias, quoted_table, alias)
        } else {
            // RETURNING reports the identifier as it is after the assignments
            format!(
                "UPDATE {} SET {} WHERE {} = ? RETURNING {}",
                quoted_table,
                assignments.join(", "),
                alias,
                alias
            )
        };
        debug!(table, row_id, sql = %statement, "updating row");

        let mut query = sqlx::query_scalar::<_, i64>(&statement);
        for value in &bound_values {
            query = query.bind(*value);
        }
        let updated_ids = query.bind(row_id).fetch_all(&mut *transaction).await?;

        let Some(&new_row_id) = updated_ids.first() else {
            transaction.rollback().await?;
            return Err(DatabaseError::RowNotFound {
                table: table.to_string(),
                row_id,
            });
        };

        transaction.commit().await?;
        Ok(new_row_id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    /// In-memory pool with `artists` (10 rows) and `albums` (350 rows)
    pub(crate) async fn sample_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_sample_tables(&pool).await;
        pool
    }

    async fn create_sample_tables(pool: &SqlitePool) {
        sqlx::query("CREATE TABLE artists (ArtistId INTEGER PRIMARY KEY, Name TEXT)")
            .execute(pool)
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE albums (
                AlbumId INTEGER PRIMARY KEY AUTOINCREMENT,
                Title TEXT NOT NULL CHECK (length(Title) <= 40),
                ArtistId INTEGER NOT NULL
            )",
        )
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < 10)
             INSERT INTO artists (ArtistId, Name) SELECT n, 'Artist ' || n FROM seq",
        )
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < 350)
             INSERT INTO albums (Title, ArtistId) SELECT 'Album ' || n, (n % 10) + 1 FROM seq",
        )
        .execute(pool)
        .await
        .unwrap();
    }

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(column, value)| (column.to_string(), Some(value.to_string())))
            .collect()
    }

    async fn album_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM albums")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(SqliteProvider::quote_identifier("users"), "\"users\"");
        assert_eq!(
            SqliteProvider::quote_identifier("table\"name"),
            "\"table\"\"name\""
        );
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(SqliteProvider::page_offset(1, 100).unwrap(), 0);
        assert_eq!(SqliteProvider::page_offset(4, 100).unwrap(), 300);
        assert!(matches!(
            SqliteProvider::page_offset(0, 100),
            Err(DatabaseError::InvalidPage(0))
        ));
        assert!(matches!(
            SqliteProvider::page_offset(u64::MAX, 100),
            Err(DatabaseError::InvalidPage(_))
        ));
    }

    #[tokio::test]
    async fn test_catalog_lists_tables_and_columns_in_order() {
        let provider = SqliteProvider::new(sample_pool().await);
        let catalog = provider.list_tables_and_columns().await.unwrap();

        let names: Vec<&str> = catalog.table_names().collect();
        assert_eq!(names, vec!["albums", "artists"]);
        assert_eq!(
            catalog.column_names("albums"),
            Some(vec!["AlbumId", "Title", "ArtistId"])
        );

        let albums = catalog.table("albums").unwrap();
        assert!(albums.has_row_identifier);
        assert!(albums.columns[0].is_primary_key);
        assert!(!albums.columns[1].nullable);
        assert_eq!(albums.columns[2].data_type, "INTEGER");
    }

    #[tokio::test]
    async fn test_catalog_sees_schema_changes_immediately() {
        let pool = sample_pool().await;
        let provider = SqliteProvider::new(pool.clone());
        assert!(!provider.list_tables_and_columns().await.unwrap().contains("genres"));

        sqlx::query("CREATE TABLE genres (GenreId INTEGER PRIMARY KEY, Name TEXT)")
            .execute(&pool)
            .await
            .unwrap();

        let catalog = provider.list_tables_and_columns().await.unwrap();
        assert_eq!(catalog.column_names("genres"), Some(vec!["GenreId", "Name"]));
    }

    #[tokio::test]
    async fn test_read_last_partial_page() {
        let provider = SqliteProvider::new(sample_pool().await);
        let page = provider.read_page("albums", 4, 100).await.unwrap();

        assert_eq!(page.rows.len(), 50);
        assert_eq!(page.total_rows, 350);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.columns, vec!["AlbumId", "Title", "ArtistId"]);
        assert_eq!(page.rows[0].row_id, 301);
        assert_eq!(page.rows[49].row_id, 350);
    }

    #[tokio::test]
    async fn test_pages_do_not_overlap() {
        let provider = SqliteProvider::new(sample_pool().await);

        let mut seen = std::collections::HashSet::new();
        for page_number in 1..=4 {
            let page = provider.read_page("albums", page_number, 100).await.unwrap();
            assert!(page.rows.len() <= 100);
            for row in page.rows {
                assert!(seen.insert(row.row_id), "row {} delivered twice", row.row_id);
            }
        }
        assert_eq!(seen.len(), 350);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let provider = SqliteProvider::new(sample_pool().await);
        let page = provider.read_page("albums", 5, 100).await.unwrap();

        assert!(page.rows.is_empty());
        assert_eq!(page.total_pages, 4);
    }

    #[tokio::test]
    async fn test_page_zero_is_rejected() {
        let provider = SqliteProvider::new(sample_pool().await);
        let result = provider.read_page("albums", 0, 100).await;
        assert!(matches!(result, Err(DatabaseError::InvalidPage(0))));
    }

    #[tokio::test]
    async fn test_unknown_table_is_not_found() {
        let provider = SqliteProvider::new(sample_pool().await);

        assert!(matches!(
            provider.read_page("nope", 1, 100).await,
            Err(DatabaseError::TableNotFound(_))
        ));
        assert!(matches!(
            provider.read_row("nope", 1).await,
            Err(DatabaseError::TableNotFound(_))
        ));
        assert!(matches!(
            provider.update_row("nope", 1, &values(&[("a", "b")])).await,
            Err(DatabaseError::TableNotFound(_))
        ));
        // Internal tables are not part of the catalog
        assert!(matches!(
            provider.read_page("sqlite_sequence", 1, 100).await,
            Err(DatabaseError::TableNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_read_row_values_in_column_order() {
        let provider = SqliteProvider::new(sample_pool().await);
        let row = provider.read_row("albums", 7).await.unwrap();

        assert_eq!(row.row_id, 7);
        let keys: Vec<&String> = row.values.keys().collect();
        assert_eq!(keys, vec!["AlbumId", "Title", "ArtistId"]);
        assert_eq!(row.values["AlbumId"], serde_json::json!(7));
        assert_eq!(row.values["Title"], serde_json::json!("Album 7"));

        assert!(matches!(
            provider.read_row("albums", 9999).await,
            Err(DatabaseError::RowNotFound { row_id: 9999, .. })
        ));
    }

    #[tokio::test]
    async fn test_update_then_read_round_trip() {
        let provider = SqliteProvider::new(sample_pool().await);
        provider
            .update_row(
                "albums",
                7,
                &values(&[("Title", "New Title"), ("ArtistId", "5")]),
            )
            .await
            .unwrap();

        let row = provider.read_row("albums", 7).await.unwrap();
        assert_eq!(row.text("Title").as_deref(), Some("New Title"));
        assert_eq!(row.text("ArtistId").as_deref(), Some("5"));
        assert_eq!(row.text("AlbumId").as_deref(), Some("7"));
        // The engine applied INTEGER affinity to the text value
        assert_eq!(row.values["ArtistId"], serde_json::json!(5));
    }

    #[tokio::test]
    async fn test_update_missing_row_changes_nothing() {
        let pool = sample_pool().await;
        let provider = SqliteProvider::new(pool.clone());
        let before = provider.read_page("albums", 1, 100).await.unwrap();

        let result = provider
            .update_row(
                "albums",
                9999,
                &values(&[("AlbumId", "9999"), ("Title", "Ghost"), ("ArtistId", "1")]),
            )
            .await;

        assert!(matches!(
            result,
            Err(DatabaseError::RowNotFound { row_id: 9999, .. })
        ));
        assert_eq!(album_count(&pool).await, 350);
        let after = provider.read_page("albums", 1, 100).await.unwrap();
        assert_eq!(before.rows, after.rows);
    }

    #[tokio::test]
    async fn test_update_requires_every_non_key_column() {
        let provider = SqliteProvider::new(sample_pool().await);
        let result = provider
            .update_row("albums", 7, &values(&[("Title", "Only Title")]))
            .await;

        assert!(matches!(result, Err(DatabaseError::MissingColumn(column)) if column == "ArtistId"));
        let row = provider.read_row("albums", 7).await.unwrap();
        assert_eq!(row.text("Title").as_deref(), Some("Album 7"));
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_columns() {
        let provider = SqliteProvider::new(sample_pool().await);
        let result = provider
            .update_row(
                "albums",
                7,
                &values(&[("Title", "T"), ("ArtistId", "1"), ("Bogus", "x")]),
            )
            .await;

        assert!(matches!(result, Err(DatabaseError::UnknownColumn(column)) if column == "Bogus"));
    }

    #[tokio::test]
    async fn test_rejected_update_rolls_back() {
        let provider = SqliteProvider::new(sample_pool().await);
        let result = provider
            .update_row(
                "albums",
                7,
                &values(&[
                    ("Title", "A title that is far too long for the check constraint"),
                    ("ArtistId", "5"),
                ]),
            )
            .await;

        assert!(matches!(result, Err(DatabaseError::Query(_))));
        let row = provider.read_row("albums", 7).await.unwrap();
        assert_eq!(row.text("Title").as_deref(), Some("Album 7"));
        assert_eq!(row.text("ArtistId").as_deref(), Some("8"));

        // The connection is usable again after the rollback
        provider
            .update_row("albums", 7, &values(&[("Title", "Fine"), ("ArtistId", "5")]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_values_are_bound_not_interpolated() {
        let pool = sample_pool().await;
        let provider = SqliteProvider::new(pool.clone());
        let hostile = "x'; DROP TABLE albums; --";

        provider
            .update_row("albums", 3, &values(&[("Title", hostile), ("ArtistId", "1")]))
            .await
            .unwrap();

        let row = provider.read_row("albums", 3).await.unwrap();
        assert_eq!(row.text("Title").as_deref(), Some(hostile));
        assert_eq!(album_count(&pool).await, 350);
    }

    #[tokio::test]
    async fn test_identifiers_with_quotes() {
        let pool = sample_pool().await;
        sqlx::query(r#"CREATE TABLE "odd ""table" ("odd ""column" TEXT)"#)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(r#"INSERT INTO "odd ""table" VALUES ('before')"#)
            .execute(&pool)
            .await
            .unwrap();
        let provider = SqliteProvider::new(pool);

        provider
            .update_row("odd \"table", 1, &values(&[("odd \"column", "after")]))
            .await
            .unwrap();
        let row = provider.read_row("odd \"table", 1).await.unwrap();
        assert_eq!(row.text("odd \"column").as_deref(), Some("after"));
    }

    #[tokio::test]
    async fn test_without_rowid_table_has_no_identifier() {
        let pool = sample_pool().await;
        sqlx::query("CREATE TABLE settings (key TEXT PRIMARY KEY, value TEXT) WITHOUT ROWID")
            .execute(&pool)
            .await
            .unwrap();
        let provider = SqliteProvider::new(pool);

        let catalog = provider.list_tables_and_columns().await.unwrap();
        assert!(!catalog.table("settings").unwrap().has_row_identifier);
        assert!(matches!(
            provider.read_page("settings", 1, 100).await,
            Err(DatabaseError::NoRowIdentifier(_))
        ));
        assert!(matches!(
            provider.read_row("settings", 1).await,
            Err(DatabaseError::NoRowIdentifier(_))
        ));
        assert!(matches!(
            provider
                .update_row("settings", 1, &values(&[("key", "a"), ("value", "b")]))
                .await,
            Err(DatabaseError::NoRowIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_column_named_rowid_uses_alias() {
        let pool = sample_pool().await;
        sqlx::query("CREATE TABLE legacy (rowid TEXT, label TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO legacy (rowid, label) VALUES ('abc', 'first')")
            .execute(&pool)
            .await
            .unwrap();
        let provider = SqliteProvider::new(pool);

        let page = provider.read_page("legacy", 1, 100).await.unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].row_id, 1);
        assert_eq!(page.rows[0].text("rowid").as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_null_and_real_values() {
        let pool = sample_pool().await;
        sqlx::query("CREATE TABLE prices (label TEXT, amount REAL, note)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO prices VALUES ('a', 2.5, NULL)")
            .execute(&pool)
            .await
            .unwrap();
        let provider = SqliteProvider::new(pool);

        let row = provider.read_row("prices", 1).await.unwrap();
        assert_eq!(row.values["amount"], serde_json::json!(2.5));
        assert_eq!(row.values["note"], Value::Null);
        assert_eq!(row.text("note").as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_update_stores_null_for_none() {
        let pool = sample_pool().await;
        sqlx::query(
            "CREATE TABLE employees (
                EmployeeId INTEGER PRIMARY KEY,
                Name TEXT,
                ReportsTo INTEGER REFERENCES employees (EmployeeId)
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO employees VALUES (1, 'Boss', NULL), (2, 'Clerk', 1)")
            .execute(&pool)
            .await
            .unwrap();
        let provider = SqliteProvider::new(pool);

        let mut changes = values(&[("Name", "Chief")]);
        changes.insert("ReportsTo".to_string(), None);
        assert_eq!(provider.update_row("employees", 1, &changes).await.unwrap(), 1);

        let row = provider.read_row("employees", 1).await.unwrap();
        assert_eq!(row.text("Name").as_deref(), Some("Chief"));
        assert_eq!(row.values["ReportsTo"], Value::Null);

        changes.insert("Name".to_string(), Some("Clerk".to_string()));
        provider.update_row("employees", 2, &changes).await.unwrap();
        let row = provider.read_row("employees", 2).await.unwrap();
        assert_eq!(row.values["ReportsTo"], Value::Null);
    }

    #[tokio::test]
    async fn test_update_reports_new_row_id() {
        let provider = SqliteProvider::new(sample_pool().await);
        let new_row_id = provider
            .update_row(
                "albums",
                7,
                &values(&[("AlbumId", "9000"), ("Title", "Moved"), ("ArtistId", "3")]),
            )
            .await
            .unwrap();

        assert_eq!(new_row_id, 9000);
        assert!(matches!(
            provider.read_row("albums", 7).await,
            Err(DatabaseError::RowNotFound { row_id: 7, .. })
        ));
        let row = provider.read_row("albums", 9000).await.unwrap();
        assert_eq!(row.text("Title").as_deref(), Some("Moved"));

        let unchanged = provider
            .update_row("albums", 8, &values(&[("Title", "Kept"), ("ArtistId", "3")]))
            .await
            .unwrap();
        assert_eq!(unchanged, 8);
    }

    #[tokio::test]
    async fn test_update_is_durable() {
        let directory = tempfile::tempdir().unwrap();
        let options = SqliteConnectOptions::new()
            .filename(directory.path().join("editor.db"))
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options.clone()).await.unwrap();
        create_sample_tables(&pool).await;
        SqliteProvider::new(pool.clone())
            .update_row("albums", 7, &values(&[("Title", "Saved"), ("ArtistId", "2")]))
            .await
            .unwrap();
        pool.close().await;

        let pool = SqlitePool::connect_with(options).await.unwrap();
        let row = SqliteProvider::new(pool).read_row("albums", 7).await.unwrap();
        assert_eq!(row.text("Title").as_deref(), Some("Saved"));
    }

    #[tokio::test]
    async fn test_closed_pool_is_a_connectivity_error() {
        let pool = sample_pool().await;
        pool.close().await;
        let provider = SqliteProvider::new(pool);

        assert!(matches!(
            provider.list_tables_and_columns().await,
            Err(DatabaseError::Connectivity(_))
        ));
    }
}
