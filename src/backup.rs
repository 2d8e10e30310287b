//! Backup capability gating every import run.
//!
//! A backup must verifiably succeed before the importer opens a
//! transaction; the [`Backup`] trait is the seam that makes the gate
//! testable without a real database file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{Connection, OpenFlags};
use tracing::info;

use crate::context::ImportContext;
use crate::errors::BackupError;

/// Pages copied per backup step.
const PAGES_PER_STEP: std::os::raw::c_int = 64;

/// A capability that snapshots the destination database before an
/// import mutates it.
pub trait Backup {
    /// Produce a verified snapshot.
    ///
    /// Implementations must only return `Ok` once the artifact
    /// demonstrably exists; the importer trusts the handle and proceeds
    /// to mutate the destination.
    ///
    /// # Errors
    ///
    /// Returns a [`BackupError`] when the snapshot could not be
    /// produced or verified. The importer aborts with zero side
    /// effects.
    fn create(&self) -> Result<BackupHandle, BackupError>;
}

/// Proof of a completed backup: the path of the written artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupHandle {
    path: PathBuf,
}

impl BackupHandle {
    /// Wrap an artifact path. Exposed so alternative [`Backup`]
    /// implementations (including test doubles) can produce handles.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The artifact's location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the handle, returning the artifact's location.
    #[must_use]
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Production backup: copies the source database into a timestamped
/// artifact under a backup directory using SQLite's online backup.
#[derive(Debug, Clone)]
pub struct SqliteBackup {
    source: PathBuf,
    backup_dir: PathBuf,
    label: String,
}

impl SqliteBackup {
    /// Configure a backup of the database file at `source`, writing
    /// artifacts named after the context into `backup_dir`.
    #[must_use]
    pub fn new(
        source: impl Into<PathBuf>,
        backup_dir: impl Into<PathBuf>,
        ctx: &ImportContext,
    ) -> Self {
        Self {
            source: source.into(),
            backup_dir: backup_dir.into(),
            label: format!("{}-{}", ctx.tenant(), ctx.table()),
        }
    }
}

impl Backup for SqliteBackup {
    fn create(&self) -> Result<BackupHandle, BackupError> {
        fs::create_dir_all(&self.backup_dir)?;
        let stamp = Utc::now().format("%Y%m%d-%H%M%S%.3f");
        let path = self.backup_dir.join(format!("{}-{stamp}.sqlite3", self.label));

        let src = Connection::open_with_flags(&self.source, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let mut dst = Connection::open(&path)?;
        let backup = rusqlite::backup::Backup::new(&src, &mut dst)?;
        backup.run_to_completion(PAGES_PER_STEP, Duration::from_millis(25), None)?;
        drop(backup);
        dst.close().map_err(|(_, e)| e)?;

        // The handle is only handed out once the artifact is confirmed
        // on disk; the importer's gate depends on this.
        let verified = fs::metadata(&path).map(|meta| meta.len() > 0).unwrap_or(false);
        if !verified {
            return Err(BackupError::MissingArtifact { path });
        }

        info!(artifact = %path.display(), "backup artifact written");
        Ok(BackupHandle::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_copies_database() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("live.sqlite3");

        let conn = Connection::open(&source).unwrap();
        conn.execute("CREATE TABLE jokes (id INTEGER PRIMARY KEY, title TEXT)", [])
            .unwrap();
        conn.execute("INSERT INTO jokes (id, title) VALUES (1, 'first')", [])
            .unwrap();
        drop(conn);

        let ctx = ImportContext::new("acme", "jokes");
        let backup = SqliteBackup::new(&source, dir.path().join("backups"), &ctx);
        let handle = backup.create().unwrap();

        assert!(handle.path().exists());
        let name = handle.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("acme-jokes-"));

        let restored = Connection::open(handle.path()).unwrap();
        let count: i64 = restored
            .query_row("SELECT COUNT(*) FROM jokes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_backup_of_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ImportContext::new("acme", "jokes");
        let backup = SqliteBackup::new(
            dir.path().join("does-not-exist.sqlite3"),
            dir.path().join("backups"),
            &ctx,
        );
        assert!(backup.create().is_err());
    }
}
