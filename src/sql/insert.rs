//! Anchored parser for the single INSERT statement shape the importer
//! accepts.

use super::lexer::lex_values;
use super::value::{Literal, coerce};

/// A parsed `INSERT INTO <table> (<columns>) VALUES (<values>)`
/// statement.
///
/// Construction guarantees `columns.len() == values.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInsert {
    /// Column names in statement order, identifier quotes stripped.
    pub columns: Vec<String>,
    /// Coerced values in statement order.
    pub values: Vec<Literal>,
}

/// Errors produced while parsing an INSERT statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The statement does not begin with `INSERT INTO`.
    #[error("statement is not an INSERT")]
    NotAnInsert,
    /// No table name follows `INSERT INTO`.
    #[error("missing table name after INSERT INTO")]
    MissingTable,
    /// A structural delimiter was not found.
    #[error("missing '{expected}' delimiter")]
    MissingDelimiter {
        /// The delimiter that was expected.
        expected: char,
    },
    /// No `VALUES` keyword after the column list.
    #[error("missing VALUES clause")]
    MissingValues,
    /// The column list is empty.
    #[error("empty column list")]
    EmptyColumnList,
    /// Column and value counts disagree; the row is dropped whole.
    #[error("column/value arity mismatch: {columns} columns, {values} values")]
    ArityMismatch {
        /// Number of parsed columns.
        columns: usize,
        /// Number of lexed values.
        values: usize,
    },
}

/// Parse a statement already classified as a target-table INSERT.
///
/// The match is anchored and case-insensitive: `INSERT INTO <table>
/// (<columns>) VALUES (<values>)`. The values capture extends to the
/// statement's last closing parenthesis rather than the first one, since
/// literal text may itself contain parentheses. A column/value arity
/// mismatch fails the whole statement; no partial row is ever produced.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first structural problem
/// encountered. These are recorded by the importer as non-fatal row
/// errors.
pub fn parse_insert(statement: &str) -> Result<ParsedInsert, ParseError> {
    let mut cur = Cursor::new(statement);

    if !(cur.eat_keyword("INSERT") && cur.eat_keyword("INTO")) {
        return Err(ParseError::NotAnInsert);
    }
    cur.read_identifier().ok_or(ParseError::MissingTable)?;

    if !cur.eat_char('(') {
        return Err(ParseError::MissingDelimiter { expected: '(' });
    }
    let columns_raw = cur
        .take_until(')')
        .ok_or(ParseError::MissingDelimiter { expected: ')' })?;

    if !cur.eat_keyword("VALUES") {
        return Err(ParseError::MissingValues);
    }
    if !cur.eat_char('(') {
        return Err(ParseError::MissingDelimiter { expected: '(' });
    }

    let rest = cur.rest();
    let close = rest
        .rfind(')')
        .ok_or(ParseError::MissingDelimiter { expected: ')' })?;
    let values_raw = &rest[..close];

    let columns = split_columns(columns_raw);
    if columns.is_empty() {
        return Err(ParseError::EmptyColumnList);
    }

    let tokens = lex_values(values_raw);
    if columns.len() != tokens.len() {
        return Err(ParseError::ArityMismatch {
            columns: columns.len(),
            values: tokens.len(),
        });
    }

    let values = tokens.iter().map(coerce).collect();
    Ok(ParsedInsert { columns, values })
}

/// Extract the target table of an `INSERT INTO <table> (` prefix, if
/// the statement has that shape. Used by the classifier.
pub(crate) fn insert_target(statement: &str) -> Option<String> {
    let mut cur = Cursor::new(statement);
    if cur.eat_keyword("INSERT") && cur.eat_keyword("INTO") {
        let table = cur.read_identifier()?;
        if cur.eat_char('(') {
            return Some(table);
        }
    }
    None
}

/// Split a raw column list on commas, trimming whitespace and stripping
/// surrounding identifier quotes.
fn split_columns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|col| {
            col.trim()
                .trim_matches(|c| matches!(c, '`' | '"' | '\''))
                .to_owned()
        })
        .filter(|col| !col.is_empty())
        .collect()
}

/// Byte cursor over a statement, tolerant of whitespace and `--` line
/// comments between tokens.
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn skip_trivia(&mut self) {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'-' && bytes.get(self.pos + 1) == Some(&b'-') {
                while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    /// Consume a bare word matching `keyword` case-insensitively.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_trivia();
        let bytes = self.input.as_bytes();
        let start = self.pos;
        let mut end = start;
        while end < bytes.len() && is_ident_byte(bytes[end]) {
            end += 1;
        }
        if self.input[start..end].eq_ignore_ascii_case(keyword) && end > start {
            self.pos = end;
            true
        } else {
            false
        }
    }

    fn eat_char(&mut self, c: char) -> bool {
        self.skip_trivia();
        if self.input[self.pos..].starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Read a bare or quoted identifier.
    fn read_identifier(&mut self) -> Option<String> {
        self.skip_trivia();
        let bytes = self.input.as_bytes();
        let open = *bytes.get(self.pos)?;
        if matches!(open, b'`' | b'"' | b'\'') {
            let start = self.pos + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end] != open {
                end += 1;
            }
            if end >= bytes.len() {
                return None;
            }
            self.pos = end + 1;
            return Some(self.input[start..end].to_owned());
        }

        let start = self.pos;
        let mut end = start;
        while end < bytes.len() && is_ident_byte(bytes[end]) {
            end += 1;
        }
        if end == start {
            return None;
        }
        self.pos = end;
        Some(self.input[start..end].to_owned())
    }

    /// Consume up to and including the next `delimiter`, returning the
    /// text before it.
    fn take_until(&mut self, delimiter: char) -> Option<&'a str> {
        let rest = &self.input[self.pos..];
        let idx = rest.find(delimiter)?;
        self.pos += idx + delimiter.len_utf8();
        Some(&rest[..idx])
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_insert() {
        let parsed =
            parse_insert("INSERT INTO jokes (id, title) VALUES (1, 'knock knock')").unwrap();
        assert_eq!(parsed.columns, vec!["id", "title"]);
        assert_eq!(
            parsed.values,
            vec![Literal::Integer(1), Literal::Text("knock knock".into())]
        );
    }

    #[test]
    fn test_case_and_whitespace_tolerant() {
        let parsed =
            parse_insert("insert   into\n jokes\n  (id)\n values\n  (7)").unwrap();
        assert_eq!(parsed.columns, vec!["id"]);
        assert_eq!(parsed.values, vec![Literal::Integer(7)]);
    }

    #[test]
    fn test_quoted_identifiers_stripped() {
        let parsed =
            parse_insert("INSERT INTO `jokes` (`id`, \"title\") VALUES (1, 'x')").unwrap();
        assert_eq!(parsed.columns, vec!["id", "title"]);
    }

    #[test]
    fn test_values_extend_to_last_paren() {
        let parsed =
            parse_insert("INSERT INTO jokes (id, title) VALUES (1, 'has (parens) inside')")
                .unwrap();
        assert_eq!(
            parsed.values[1],
            Literal::Text("has (parens) inside".into())
        );
    }

    #[test]
    fn test_arity_mismatch_rejected() {
        let err = parse_insert("INSERT INTO jokes (id, title) VALUES (1)").unwrap_err();
        assert_eq!(
            err,
            ParseError::ArityMismatch {
                columns: 2,
                values: 1
            }
        );
    }

    #[test]
    fn test_not_an_insert() {
        assert_eq!(
            parse_insert("DELETE FROM jokes").unwrap_err(),
            ParseError::NotAnInsert
        );
    }

    #[test]
    fn test_missing_values_clause() {
        assert_eq!(
            parse_insert("INSERT INTO jokes (id) SELECT 1").unwrap_err(),
            ParseError::MissingValues
        );
    }

    #[test]
    fn test_missing_closing_paren() {
        assert_eq!(
            parse_insert("INSERT INTO jokes (id) VALUES (1").unwrap_err(),
            ParseError::MissingDelimiter { expected: ')' }
        );
    }

    #[test]
    fn test_empty_column_list_rejected() {
        assert_eq!(
            parse_insert("INSERT INTO jokes () VALUES ()").unwrap_err(),
            ParseError::EmptyColumnList
        );
    }

    #[test]
    fn test_insert_target() {
        assert_eq!(
            insert_target("INSERT INTO jokes (id) VALUES (1)").as_deref(),
            Some("jokes")
        );
        assert_eq!(
            insert_target("INSERT INTO `jokes` (id) VALUES (1)").as_deref(),
            Some("jokes")
        );
        assert_eq!(insert_target("INSERT INTO jokes VALUES (1)"), None);
        assert_eq!(insert_target("UPDATE jokes SET x = 1"), None);
    }

    #[test]
    fn test_leading_comment_lines_tolerated() {
        let parsed =
            parse_insert("-- exported row\nINSERT INTO jokes (id) VALUES (1)").unwrap();
        assert_eq!(parsed.columns, vec!["id"]);
    }
}
