#![doc = include_str!("../README.md")]
#![deny(clippy::mod_module_files)]

pub mod backup;
pub mod context;
pub mod errors;
pub mod export;
pub mod import;
pub mod schema;
pub mod sql;
pub mod stats;

// Re-export main types
pub use backup::{Backup, BackupHandle, SqliteBackup};
pub use context::ImportContext;
pub use errors::{BackupError, ImportError};
pub use export::dump_table;
pub use import::{ImportOutcome, ImportReport, Importer};
pub use schema::{SchemaColumns, SchemaMismatch};
pub use sql::{Disposition, Literal, ParseError, ParsedInsert};
pub use stats::{TableStats, table_stats};
