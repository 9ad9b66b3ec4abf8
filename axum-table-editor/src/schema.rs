//! Schema and data types for dynamic database introspection
//!
//! These types represent the catalog, rows and pages discovered at request time.
//! Nothing here is cached; every value is built from a fresh catalog read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Default number of rows shown per page
pub const DEFAULT_PER_PAGE: u64 = 100;

/// Names SQLite accepts for the row identifier, in order of preference
const ROW_IDENTIFIER_ALIASES: [&str; 3] = ["rowid", "_rowid_", "oid"];

/// Snapshot of every user table in the database, keyed by table name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Tables ordered by name
    pub tables: BTreeMap<String, TableSchema>,
}

impl Catalog {
    /// Look up a table by exact name
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Whether the table name is a member of the catalog
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Ordered column names of a table, as reported by the catalog
    pub fn column_names(&self, name: &str) -> Option<Vec<&str>> {
        self.table(name).map(TableSchema::column_names)
    }

    /// Table names in catalog order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

/// Schema information for a single table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    /// Name of the table
    pub name: String,

    /// Columns in catalog order
    pub columns: Vec<ColumnInfo>,

    /// False for `WITHOUT ROWID` tables
    pub has_row_identifier: bool,
}

impl TableSchema {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Pick the name under which the row identifier can be selected
    ///
    /// A user column called `rowid` shadows the built-in identifier, so the
    /// first alias not taken by a column wins. Returns `None` when the table
    /// has no row identifier or every alias is shadowed.
    pub fn row_identifier_alias(&self) -> Option<&'static str> {
        if !self.has_row_identifier {
            return None;
        }

        ROW_IDENTIFIER_ALIASES.into_iter().find(|alias| {
            !self
                .columns
                .iter()
                .any(|column| column.name.eq_ignore_ascii_case(alias))
        })
    }
}

/// Information about a single column
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    /// Column name
    pub name: String,

    /// Declared SQL type (may be empty in SQLite)
    pub data_type: String,

    /// Whether the column allows NULL values
    pub nullable: bool,

    /// Whether this column is part of the declared primary key
    pub is_primary_key: bool,
}

/// A single row read from a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Engine-provided row identifier, only meaningful within its table
    pub row_id: i64,

    /// Column values keyed by column name, in table column order
    pub values: Map<String, Value>,
}

impl Row {
    /// Value of a column rendered as text, the way the edit form shows it
    pub fn text(&self, column: &str) -> Option<String> {
        self.values.get(column).map(value_to_text)
    }
}

/// A bounded, offset-based slice of a table's rows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Table the rows were read from
    pub table: String,

    /// Column names in table order
    pub columns: Vec<String>,

    /// Rows on this page, at most `per_page`
    pub rows: Vec<Row>,

    /// 1-based page number
    pub page: u64,

    /// Page size used for this read
    pub per_page: u64,

    /// Total number of rows in the table
    pub total_rows: u64,

    /// `ceil(total_rows / per_page)`
    pub total_pages: u64,
}

impl Page {
    pub fn new(
        table: String,
        columns: Vec<String>,
        rows: Vec<Row>,
        page: u64,
        per_page: u64,
        total_rows: u64,
    ) -> Self {
        Self {
            table,
            columns,
            rows,
            page,
            per_page,
            total_rows,
            total_pages: total_pages(total_rows, per_page),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Number of pages needed to show `total_rows` rows
pub fn total_pages(total_rows: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        return 0;
    }
    total_rows.div_ceil(per_page)
}

/// Render a stored value as the text used on the edit path
///
/// NULL becomes the empty string; numbers and strings are shown as-is.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Query parameters carrying a page number
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    /// 1-based page number, defaults to the first page
    #[serde(default = "default_page")]
    pub page: u64,
}

fn default_page() -> u64 {
    1
}
