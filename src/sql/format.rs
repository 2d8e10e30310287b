//! Dump-text output formatting.

use core::fmt::{self, Display, Write};

use super::value::Literal;

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Integer(v) => write!(f, "{v}"),
            Literal::Float(v) => {
                if v.is_nan() {
                    write!(f, "NULL")
                } else if v.is_infinite() {
                    if v.is_sign_positive() {
                        write!(f, "9e999")
                    } else {
                        write!(f, "-9e999")
                    }
                } else {
                    // Keep a decimal point so the value re-imports as a float.
                    let s = format!("{v}");
                    if s.contains(['.', 'e', 'E']) {
                        write!(f, "{s}")
                    } else {
                        write!(f, "{s}.0")
                    }
                }
            }
            Literal::Text(s) => {
                // Single quotes are doubled; backslashes are doubled so
                // the importer's escape passthrough restores them.
                write!(f, "'")?;
                for c in s.chars() {
                    match c {
                        '\'' => write!(f, "''")?,
                        '\\' => write!(f, "\\\\")?,
                        _ => write!(f, "{c}")?,
                    }
                }
                write!(f, "'")
            }
        }
    }
}

/// Quote an identifier for interpolation into SQL text.
///
/// Embedded double quotes are doubled. Every identifier this crate
/// interpolates into a statement goes through here; values never do,
/// they are always bound as parameters.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        if c == '"' {
            quoted.push('"');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Render one row as the INSERT statement shape the importer consumes,
/// without the trailing semicolon.
#[must_use]
pub fn format_insert(table: &str, columns: &[String], values: &[Literal]) -> String {
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
    for (i, val) in values.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        write!(sql, "{val}").expect("writing to a String cannot fail");
    }
    sql.push(')');
    sql
}

/// Render the comment-and-no-op preamble of a dump.
///
/// Everything in it is either a `--` line comment or an allow-listed
/// benign `SET` statement, so re-importing a dump skips straight to the
/// INSERT statements.
#[must_use]
pub fn dump_preamble(table: &str, generated_at: &str) -> String {
    format!(
        "-- Dump of table {table}\n-- Generated at {generated_at}\n\nSET FOREIGN_KEY_CHECKS=0;\nSET NAMES 'utf8';\n\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_literals() {
        assert_eq!(Literal::Null.to_string(), "NULL");
        assert_eq!(Literal::Integer(42).to_string(), "42");
        assert_eq!(Literal::Integer(-100).to_string(), "-100");
        assert_eq!(Literal::Float(3.5).to_string(), "3.5");
        assert_eq!(Literal::Float(2.0).to_string(), "2.0");
        assert_eq!(Literal::Text("hello".into()).to_string(), "'hello'");
        assert_eq!(Literal::Text("it's".into()).to_string(), "'it''s'");
    }

    #[test]
    fn test_display_backslash_doubled() {
        assert_eq!(Literal::Text(r"a\b".into()).to_string(), r"'a\\b'");
    }

    #[test]
    fn test_display_nonfinite_floats() {
        assert_eq!(Literal::Float(f64::NAN).to_string(), "NULL");
        assert_eq!(Literal::Float(f64::INFINITY).to_string(), "9e999");
        assert_eq!(Literal::Float(f64::NEG_INFINITY).to_string(), "-9e999");
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("jokes"), "\"jokes\"");
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn test_format_insert() {
        let sql = format_insert(
            "jokes",
            &["id".to_owned(), "title".to_owned()],
            &[Literal::Integer(1), Literal::Text("knock knock".into())],
        );
        assert_eq!(
            sql,
            "INSERT INTO \"jokes\" (\"id\", \"title\") VALUES (1, 'knock knock')"
        );
    }

    #[test]
    fn test_preamble_is_all_skippable() {
        let preamble = dump_preamble("jokes", "2026-01-01 00:00:00");
        for line in preamble.lines().filter(|l| !l.trim().is_empty()) {
            assert!(
                line.starts_with("--") || line.to_uppercase().starts_with("SET "),
                "unexpected preamble line: {line}"
            );
        }
    }
}
