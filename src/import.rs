//! Backup-gated transactional import of dump text.

use std::path::PathBuf;

use rusqlite::{Connection, params_from_iter};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backup::Backup;
use crate::context::ImportContext;
use crate::errors::ImportError;
use crate::schema::SchemaColumns;
use crate::sql::{Disposition, ParsedInsert, classify, parse_insert, quote_ident, split_statements};
use crate::stats::count_rows;

/// Characters of a row-level error message kept in the outcome.
const ERROR_EXCERPT_CHARS: usize = 200;

/// Counters and diagnostics accumulated over one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Rows successfully inserted.
    pub inserted: u64,
    /// Rows skipped because they already exist (uniqueness violation).
    pub skipped_duplicate: u64,
    /// Non-fatal problems, in encounter order: blocked statements,
    /// parse failures, schema mismatches, row execution errors.
    pub errors: Vec<String>,
    /// Destination row count before the transaction opened.
    pub before_count: u64,
    /// Destination row count after commit.
    pub after_count: u64,
}

/// The structured result returned to the caller after a committed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// True when the run committed. Aborted and rolled-back runs
    /// surface as errors instead of a report.
    pub success: bool,
    /// Destination row count before the import.
    pub before_count: u64,
    /// Destination row count after the import.
    pub after_count: u64,
    /// Net rows added by the run.
    pub added_count: u64,
    /// Rows inserted.
    pub inserted: u64,
    /// Rows skipped as duplicates.
    pub skipped: u64,
    /// The verified pre-import backup artifact.
    pub backup_file: PathBuf,
    /// Accumulated non-fatal errors; empty means the dump applied in
    /// full.
    pub errors: Vec<String>,
}

impl ImportReport {
    fn from_outcome(outcome: ImportOutcome, backup_file: PathBuf) -> Self {
        Self {
            success: true,
            added_count: outcome.after_count.saturating_sub(outcome.before_count),
            before_count: outcome.before_count,
            after_count: outcome.after_count,
            inserted: outcome.inserted,
            skipped: outcome.skipped_duplicate,
            backup_file,
            errors: outcome.errors,
        }
    }
}

/// Lifecycle of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    BackingUp,
    Importing,
    Committed,
    RolledBack,
    Aborted,
}

/// Orchestrates one import run: backup, snapshot, single transaction,
/// per-row apply, unconditional commit.
///
/// Row-level failures are deliberately non-fatal: a partially
/// successful import still commits, reporting what applied and what
/// did not. Only a backup failure (before any mutation) or a top-level
/// storage failure (rolling back the whole transaction) voids the run.
pub struct Importer<'a, B: Backup> {
    conn: &'a mut Connection,
    ctx: &'a ImportContext,
    backup: &'a B,
    phase: Phase,
}

impl<'a, B: Backup> Importer<'a, B> {
    /// Build an importer over a live connection.
    pub fn new(conn: &'a mut Connection, ctx: &'a ImportContext, backup: &'a B) -> Self {
        Self {
            conn,
            ctx,
            backup,
            phase: Phase::Idle,
        }
    }

    /// Run the full import pipeline over `dump`.
    ///
    /// # Errors
    ///
    /// - [`ImportError::Backup`]: the mandatory backup failed; no
    ///   transaction was opened and the destination is untouched.
    /// - [`ImportError::UnknownTable`]: the destination table is absent
    ///   from the live schema; the destination is untouched.
    /// - [`ImportError::Storage`]: a top-level storage failure; any open
    ///   transaction was rolled back in full.
    pub fn run(&mut self, dump: &str) -> Result<ImportReport, ImportError> {
        self.phase = Phase::Idle;
        let result = self.execute(dump);
        let terminal = match &result {
            Ok(_) => Phase::Committed,
            Err(ImportError::Backup(_) | ImportError::UnknownTable { .. }) => Phase::Aborted,
            Err(ImportError::Storage(_)) => Phase::RolledBack,
        };
        self.transition(terminal);
        result
    }

    fn execute(&mut self, dump: &str) -> Result<ImportReport, ImportError> {
        self.transition(Phase::BackingUp);
        let backup_file = self.backup.create()?.into_path();

        let table = self.ctx.table();
        let schema = SchemaColumns::fetch(self.conn, table)?;
        if schema.is_empty() {
            return Err(ImportError::UnknownTable {
                table: table.to_owned(),
            });
        }

        let mut outcome = ImportOutcome::default();
        let rows = plan(dump, self.ctx, &schema, &mut outcome);
        outcome.before_count = count_rows(self.conn, table)?;

        self.transition(Phase::Importing);
        let tx = self.conn.transaction()?;
        for row in &rows {
            let sql = insert_sql(table, &row.columns);
            let result = tx
                .prepare_cached(&sql)
                .and_then(|mut stmt| stmt.execute(params_from_iter(row.values.iter())));
            match result {
                Ok(_) => outcome.inserted += 1,
                Err(e) if is_unique_violation(&e) => {
                    debug!(table, "duplicate row skipped");
                    outcome.skipped_duplicate += 1;
                }
                Err(e) => {
                    warn!(table, error = %e, "row execution failed");
                    outcome.errors.push(truncated(&format!("row failed: {e}")));
                }
            }
        }
        tx.commit()?;

        outcome.after_count = count_rows(self.conn, table)?;
        info!(
            table,
            tenant = self.ctx.tenant(),
            inserted = outcome.inserted,
            skipped = outcome.skipped_duplicate,
            errors = outcome.errors.len(),
            "import committed"
        );
        Ok(ImportReport::from_outcome(outcome, backup_file))
    }

    fn transition(&mut self, next: Phase) {
        debug!(from = ?self.phase, to = ?next, "import phase");
        self.phase = next;
    }
}

/// Split, classify, parse, and schema-validate the dump, accumulating
/// every non-fatal rejection into the outcome. Only fully validated
/// inserts are returned for execution.
fn plan(
    dump: &str,
    ctx: &ImportContext,
    schema: &SchemaColumns,
    outcome: &mut ImportOutcome,
) -> Vec<ParsedInsert> {
    let mut rows = Vec::new();
    for statement in split_statements(dump) {
        match classify(&statement, ctx.table()) {
            Disposition::Skip => {}
            Disposition::Blocked(excerpt) => {
                debug!(%excerpt, "statement blocked");
                outcome
                    .errors
                    .push(format!("blocked statement: {excerpt}"));
            }
            Disposition::Insert => match parse_insert(&statement) {
                Err(e) => {
                    debug!(error = %e, "insert rejected by parser");
                    outcome.errors.push(truncated(&format!("parse failure: {e}")));
                }
                Ok(row) => match schema.validate(&row.columns) {
                    Err(mismatch) => {
                        debug!(error = %mismatch, "insert rejected by schema");
                        outcome
                            .errors
                            .push(truncated(&format!("schema mismatch: {mismatch}")));
                    }
                    Ok(()) => rows.push(row),
                },
            },
        }
    }
    rows
}

/// Build the parameterized insert for one validated statement. Values
/// are always bound, never interpolated.
fn insert_sql(table: &str, columns: &[String]) -> String {
    use std::fmt::Write;

    let mut sql = String::from("INSERT INTO ");
    sql.push_str(&quote_ident(table));
    sql.push_str(" (");
    for (i, col) in columns.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&quote_ident(col));
    }
    sql.push_str(") VALUES (");
    for i in 1..=columns.len() {
        if i > 1 {
            sql.push_str(", ");
        }
        write!(sql, "?{i}").expect("writing to a String cannot fail");
    }
    sql.push(')');
    sql
}

/// Whether a row error is a uniqueness-constraint violation, the
/// expected outcome of re-importing rows that already exist.
fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn truncated(message: &str) -> String {
    message.chars().take(ERROR_EXCERPT_CHARS).collect()
}
