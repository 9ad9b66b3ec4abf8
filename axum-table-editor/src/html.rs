//! Server-side HTML rendering
//!
//! Pages are assembled as plain strings. Every piece of text that comes from
//! the database or the request goes through [`escape`] first.

use crate::schema::{value_to_text, Catalog, Page, Row, TableSchema};
use serde_json::Value;
use std::fmt::Write;

/// Form field naming a column whose submitted value is NULL
///
/// The edit form sends one such field per ticked "NULL" checkbox, with the
/// column name as its value.
pub const NULL_FIELD: &str = "__null__";

/// Escape text for use in HTML element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Percent-encode a value so it can be used as one URL path segment
pub fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            other => {
                let _ = write!(encoded, "%{:02X}", other);
            }
        }
    }
    encoded
}

/// URL of a table page
pub fn table_url(base_path: &str, table: &str, page: u64) -> String {
    format!(
        "{}/table/{}?page={}",
        base_path,
        encode_path_segment(table),
        page
    )
}

/// URL of a row's edit form
pub fn edit_url(base_path: &str, table: &str, row_id: i64, page: u64) -> String {
    format!(
        "{}/table/{}/edit/{}?page={}",
        base_path,
        encode_path_segment(table),
        row_id,
        page
    )
}

fn layout(base_path: &str, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="{base}/assets/style.css">
</head>
<body>
    <header><a href="{base}/">Tables</a></header>
    <main>
{body}
    </main>
</body>
</html>
"#,
        title = escape(title),
        base = escape(base_path),
        body = body
    )
}

/// Table list with each table's columns
pub fn render_index(base_path: &str, catalog: &Catalog) -> String {
    let mut body = String::from("<h1>Tables</h1>\n");

    if catalog.tables.is_empty() {
        body.push_str("<p class=\"empty\">The database has no tables.</p>\n");
        return layout(base_path, "Tables", &body);
    }

    body.push_str("<ul class=\"tables\">\n");
    for table in catalog.tables.values() {
        let _ = writeln!(
            body,
            "<li><a href=\"{}\">{}</a> <span class=\"columns\">{}</span></li>",
            escape(&table_url(base_path, &table.name, 1)),
            escape(&table.name),
            escape(&table.column_names().join(", "))
        );
    }
    body.push_str("</ul>\n");

    layout(base_path, "Tables", &body)
}

/// One page of rows with navigation links
pub fn render_table(base_path: &str, page: &Page) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape(&page.table));
    let _ = writeln!(
        body,
        "<p class=\"summary\">{} rows, page {} of {}</p>",
        page.total_rows, page.page, page.total_pages
    );

    body.push_str("<table>\n<thead><tr><th></th>");
    for column in &page.columns {
        let _ = write!(body, "<th>{}</th>", escape(column));
    }
    body.push_str("</tr></thead>\n<tbody>\n");

    for row in &page.rows {
        let _ = write!(
            body,
            "<tr><td><a href=\"{}\">Edit</a></td>",
            escape(&edit_url(base_path, &page.table, row.row_id, page.page))
        );
        for column in &page.columns {
            let text = row.text(column).unwrap_or_default();
            let _ = write!(body, "<td>{}</td>", escape(&text));
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</tbody>\n</table>\n");

    if page.rows.is_empty() {
        body.push_str("<p class=\"empty\">No rows on this page.</p>\n");
    }

    body.push_str("<nav class=\"pagination\">");
    if page.has_previous() {
        let _ = write!(
            body,
            "<a href=\"{}\">Previous</a> ",
            escape(&table_url(base_path, &page.table, page.page - 1))
        );
    }
    let _ = write!(body, "<span>Page {} of {}</span>", page.page, page.total_pages);
    if page.has_next() {
        let _ = write!(
            body,
            " <a href=\"{}\">Next</a>",
            escape(&table_url(base_path, &page.table, page.page + 1))
        );
    }
    body.push_str("</nav>\n");

    layout(base_path, &page.table, &body)
}

/// Edit form with one text input per column
///
/// Declared key columns are shown read-only; they are still submitted.
/// Nullable columns get a "NULL" checkbox, ticked when the stored value is
/// NULL, so an untouched NULL is saved back as NULL rather than as `''`.
pub fn render_edit_form(base_path: &str, schema: &TableSchema, row: &Row, page: u64) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<h1>{} <span class=\"row-id\">row {}</span></h1>",
        escape(&schema.name),
        row.row_id
    );
    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"{}\">",
        escape(&edit_url(base_path, &schema.name, row.row_id, page))
    );

    for column in &schema.columns {
        let stored = row.values.get(&column.name);
        let value = stored.map(value_to_text).unwrap_or_default();
        let readonly = if column.is_primary_key { " readonly" } else { "" };
        let null_toggle = if column.nullable && !column.is_primary_key {
            let checked = if matches!(stored, None | Some(Value::Null)) {
                " checked"
            } else {
                ""
            };
            format!(
                " <label class=\"null\"><input type=\"checkbox\" name=\"{}\" value=\"{}\"{}> NULL</label>",
                NULL_FIELD,
                escape(&column.name),
                checked
            )
        } else {
            String::new()
        };
        let _ = writeln!(
            body,
            "<label>{name} <small>{data_type}</small><input type=\"text\" name=\"{name}\" value=\"{value}\"{readonly}>{null_toggle}</label>",
            name = escape(&column.name),
            data_type = escape(&column.data_type),
            value = escape(&value),
            readonly = readonly,
            null_toggle = null_toggle
        );
    }

    let _ = writeln!(
        body,
        "<button type=\"submit\">Save</button> <a href=\"{}\">Cancel</a>\n</form>",
        escape(&table_url(base_path, &schema.name, page))
    );

    layout(base_path, &format!("Edit {}", schema.name), &body)
}
