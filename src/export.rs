//! Companion export path: serialize live rows into dump text.
//!
//! The emitted shape is exactly what the importer consumes — a comment
//! header, a benign `SET` preamble, and one
//! `INSERT INTO <table> (<columns>) VALUES (<values>);` per row — which
//! is what makes export/re-import round-trips testable.

use std::fmt::Write;

use chrono::Utc;
use rusqlite::Connection;
use tracing::info;

use crate::context::ImportContext;
use crate::sql::{Literal, dump_preamble, format_insert, quote_ident};

/// Serialize every row of the context's table into dump text.
///
/// Values are read back typed from storage, so quoting in the output is
/// decided by the stored type: integers and floats are emitted bare,
/// text is quoted with single quotes doubled. Re-importing the result
/// therefore reproduces the same typed values.
///
/// # Errors
///
/// Returns the underlying storage error, including "no such table"
/// when the destination does not exist.
pub fn dump_table(conn: &Connection, ctx: &ImportContext) -> Result<String, rusqlite::Error> {
    let table = ctx.table();
    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_ident(table)))?;
    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|name| (*name).to_owned())
        .collect();

    let generated_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let mut out = dump_preamble(table, &generated_at);

    let mut row_count = 0u64;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let values = (0..columns.len())
            .map(|i| row.get_ref(i).map(Literal::from_value_ref))
            .collect::<Result<Vec<_>, _>>()?;
        writeln!(out, "{};", format_insert(table, &columns, &values))
            .expect("writing to a String cannot fail");
        row_count += 1;
    }

    info!(table, tenant = ctx.tenant(), rows = row_count, "table exported");
    Ok(out)
}
