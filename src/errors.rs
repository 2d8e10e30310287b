//! Submodule defining the errors used across the crate.

use std::path::PathBuf;

/// Errors raised while producing the pre-import backup.
///
/// Any of these aborts the run before a single statement is executed.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    /// Filesystem failure while preparing or verifying the artifact.
    #[error("backup I/O failure: {0}")]
    Io(#[from] std::io::Error),
    /// The backup engine itself failed.
    #[error("backup storage failure: {0}")]
    Storage(#[from] rusqlite::Error),
    /// The backup reported success but the artifact is missing or empty.
    #[error("backup artifact missing or empty at {path}")]
    MissingArtifact {
        /// Where the artifact was expected.
        path: PathBuf,
    },
}

/// Fatal errors of an import run.
///
/// Everything else (blocked statements, parse failures, schema
/// mismatches, row-level execution errors) is non-fatal and accumulates
/// in the outcome's error list instead.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The mandatory pre-import backup failed; nothing was mutated and
    /// no transaction was opened.
    #[error(transparent)]
    Backup(#[from] BackupError),
    /// The destination table does not exist in the live schema.
    #[error("destination table '{table}' does not exist")]
    UnknownTable {
        /// The requested table name.
        table: String,
    },
    /// A top-level storage failure; if a transaction was open it was
    /// rolled back in full.
    #[error("import transaction failed: {0}")]
    Storage(#[from] rusqlite::Error),
}
