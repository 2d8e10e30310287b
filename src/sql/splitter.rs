//! Statement splitter for raw dump text.

/// Split raw dump text into top-level `;`-delimited statements.
///
/// The scan is a single pass that tracks whether the cursor is inside a
/// string literal and which quote character opened it. Semicolons inside
/// string literals never terminate a statement. Two escape conventions
/// are passed through verbatim so the value lexer can resolve them
/// later:
///
/// - a doubled quote character (`''` or `""`) inside a string,
/// - a backslash followed by any character.
///
/// Statements are returned trimmed; empty segments between consecutive
/// semicolons are dropped. Any non-whitespace remainder at end of input
/// is returned as a final statement, even when a string literal was
/// left unterminated.
#[must_use]
pub fn split_statements(input: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut buf = String::new();
    let mut in_string: Option<char> = None;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match in_string {
            Some(quote) => {
                if c == quote {
                    if chars.peek() == Some(&quote) {
                        // Doubled-quote escape stays inside the string.
                        buf.push(c);
                        buf.push(chars.next().unwrap_or(quote));
                    } else {
                        in_string = None;
                        buf.push(c);
                    }
                } else if c == '\\' {
                    // Escape passthrough; a trailing backslash at end of
                    // input has nothing to consume.
                    buf.push(c);
                    if let Some(escaped) = chars.next() {
                        buf.push(escaped);
                    }
                } else {
                    buf.push(c);
                }
            }
            None => match c {
                '\'' | '"' => {
                    in_string = Some(c);
                    buf.push(c);
                }
                ';' => {
                    let statement = buf.trim();
                    if !statement.is_empty() {
                        statements.push(statement.to_owned());
                    }
                    buf.clear();
                }
                _ => buf.push(c),
            },
        }
    }

    let remainder = buf.trim();
    if !remainder.is_empty() {
        statements.push(remainder.to_owned());
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        let stmts = split_statements("SELECT 1; SELECT 2;");
        assert_eq!(stmts, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn test_semicolon_inside_string() {
        let stmts = split_statements("INSERT INTO t (a) VALUES ('x; y');");
        assert_eq!(stmts, vec!["INSERT INTO t (a) VALUES ('x; y')"]);
    }

    #[test]
    fn test_doubled_quote_escape() {
        let stmts = split_statements("INSERT INTO t (a) VALUES ('it''s; fine');");
        assert_eq!(stmts, vec!["INSERT INTO t (a) VALUES ('it''s; fine')"]);
    }

    #[test]
    fn test_backslash_escape() {
        let stmts = split_statements(r"INSERT INTO t (a) VALUES ('it\'s; fine');");
        assert_eq!(stmts, vec![r"INSERT INTO t (a) VALUES ('it\'s; fine')"]);
    }

    #[test]
    fn test_double_quoted_string() {
        let stmts = split_statements(r#"INSERT INTO t (a) VALUES ("x;y'z");"#);
        assert_eq!(stmts, vec![r#"INSERT INTO t (a) VALUES ("x;y'z")"#]);
    }

    #[test]
    fn test_remainder_without_semicolon() {
        let stmts = split_statements("SELECT 1; SELECT 2");
        assert_eq!(stmts, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn test_unterminated_string_at_eof() {
        let stmts = split_statements("INSERT INTO t (a) VALUES ('open");
        assert_eq!(stmts, vec!["INSERT INTO t (a) VALUES ('open"]);
    }

    #[test]
    fn test_trailing_backslash_does_not_panic() {
        let stmts = split_statements("INSERT INTO t (a) VALUES ('x\\");
        assert_eq!(stmts, vec!["INSERT INTO t (a) VALUES ('x\\"]);
    }

    #[test]
    fn test_empty_segments_dropped() {
        let stmts = split_statements(";;  ;\nSELECT 1;;");
        assert_eq!(stmts, vec!["SELECT 1"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_statements("").is_empty());
        assert!(split_statements("  \n\t ").is_empty());
    }
}
