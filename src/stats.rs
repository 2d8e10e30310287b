//! Diagnostic queries over the destination table.

use rusqlite::Connection;
use serde::Serialize;

use crate::context::ImportContext;
use crate::schema::SchemaColumns;
use crate::sql::quote_ident;

/// A one-shot diagnostic snapshot of the destination table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableStats {
    /// The table the snapshot describes.
    pub table: String,
    /// Current number of rows.
    pub row_count: u64,
    /// Number of columns in the live schema.
    pub column_count: usize,
    /// Column names in schema order.
    pub columns: Vec<String>,
}

/// Count the rows of `table`.
pub(crate) fn count_rows(conn: &Connection, table: &str) -> Result<u64, rusqlite::Error> {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
        [],
        |row| row.get::<_, i64>(0).map(|n| n as u64),
    )
}

/// Fetch row and column counts for the context's table.
///
/// # Errors
///
/// Returns the underlying storage error, including "no such table"
/// when the destination does not exist.
pub fn table_stats(conn: &Connection, ctx: &ImportContext) -> Result<TableStats, rusqlite::Error> {
    let schema = SchemaColumns::fetch(conn, ctx.table())?;
    let row_count = count_rows(conn, ctx.table())?;
    Ok(TableStats {
        table: ctx.table().to_owned(),
        row_count,
        column_count: schema.len(),
        columns: schema.iter().cloned().collect(),
    })
}
