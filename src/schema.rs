//! Live schema snapshot and column validation.

use indexmap::IndexSet;
use rusqlite::Connection;

/// The destination table's column names, fetched once per run.
///
/// The importer has no compile-time knowledge of the schema; this
/// snapshot is read-only reference data for the run that fetched it.
/// Lookups are case-insensitive, matching how SQLite resolves
/// identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumns {
    columns: IndexSet<String>,
}

/// Rejection of a statement whose column list names columns absent
/// from the live schema. Non-fatal: the statement is excluded whole and
/// the run proceeds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown columns: {}", .invalid.join(", "))]
pub struct SchemaMismatch {
    /// The column names not present in the live schema.
    pub invalid: Vec<String>,
}

impl SchemaColumns {
    /// Fetch the current column names of `table` via live
    /// introspection.
    ///
    /// An unknown table yields an empty snapshot, which the importer
    /// treats as fatal before opening any transaction.
    ///
    /// # Errors
    ///
    /// Returns the underlying storage error if introspection fails.
    pub fn fetch(conn: &Connection, table: &str) -> Result<Self, rusqlite::Error> {
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
        let mut columns = IndexSet::new();
        let names = stmt.query_map([table], |row| row.get::<_, String>(0))?;
        for name in names {
            columns.insert(name?);
        }
        Ok(Self { columns })
    }

    /// Whether `name` is a column of the destination table.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|col| col.eq_ignore_ascii_case(name))
    }

    /// Check a parsed column list against the snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaMismatch`] naming every invalid column; the
    /// statement must then be rejected whole, never partially applied.
    pub fn validate(&self, columns: &[String]) -> Result<(), SchemaMismatch> {
        let invalid: Vec<String> = columns
            .iter()
            .filter(|col| !self.contains(col))
            .cloned()
            .collect();
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(SchemaMismatch { invalid })
        }
    }

    /// Number of columns in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the snapshot has no columns (the table does not exist).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate the column names in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.columns.iter()
    }
}

impl FromIterator<String> for SchemaColumns {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(names: &[&str]) -> SchemaColumns {
        names.iter().map(|n| (*n).to_owned()).collect()
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let schema = snapshot(&["id", "Title"]);
        assert!(schema.contains("id"));
        assert!(schema.contains("ID"));
        assert!(schema.contains("title"));
        assert!(!schema.contains("body"));
    }

    #[test]
    fn test_validate_names_every_invalid_column() {
        let schema = snapshot(&["id", "title"]);
        let err = schema
            .validate(&["id".into(), "body".into(), "rating".into()])
            .unwrap_err();
        assert_eq!(err.invalid, vec!["body".to_owned(), "rating".to_owned()]);
        assert_eq!(err.to_string(), "unknown columns: body, rating");
    }

    #[test]
    fn test_validate_accepts_subset() {
        let schema = snapshot(&["id", "title", "body"]);
        assert!(schema.validate(&["title".into()]).is_ok());
    }

    #[test]
    fn test_fetch_from_live_schema() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE jokes (id INTEGER PRIMARY KEY, title TEXT)", [])
            .unwrap();
        let schema = SchemaColumns::fetch(&conn, "jokes").unwrap();
        assert_eq!(schema.len(), 2);
        assert!(schema.contains("id"));
        assert!(schema.contains("title"));
    }

    #[test]
    fn test_fetch_unknown_table_is_empty() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = SchemaColumns::fetch(&conn, "missing").unwrap();
        assert!(schema.is_empty());
    }
}
