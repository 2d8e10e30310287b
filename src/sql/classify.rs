//! Allow-list classification of dump statements.

use super::insert;

/// Number of characters of a blocked statement kept for diagnostics.
const EXCERPT_CHARS: usize = 50;

/// Benign `SET` prefixes that dumps carry as session no-ops.
const BENIGN_SET_PREFIXES: &[&str] = &["SET FOREIGN_KEY_CHECKS", "SET NAMES", "SET CHARACTER_SET"];

/// The classifier's verdict for one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// An INSERT aimed at the target table; hand it to the parser.
    Insert,
    /// A harmless statement (comment, benign no-op); ignore it.
    Skip,
    /// Anything not explicitly recognized; never executed. Carries a
    /// truncated excerpt for the outcome's error list.
    Blocked(String),
}

/// Classify one trimmed statement against the allow-list.
///
/// The rules are default-deny and checked in order: empty or
/// comment-only statements are skipped, benign `SET` no-ops are
/// skipped, an `INSERT INTO <target> (` shape is accepted, any other
/// `SET` or a block-comment-opening statement is skipped, and
/// everything else is blocked. Only explicitly recognized shapes are
/// ever executed, which is what keeps a crafted "export" file from
/// running arbitrary SQL.
#[must_use]
pub fn classify(statement: &str, target_table: &str) -> Disposition {
    let body = strip_leading_comments(statement);
    if body.is_empty() {
        return Disposition::Skip;
    }
    if body.starts_with("/*") {
        return Disposition::Skip;
    }

    let prefix = normalized_prefix(body);
    if BENIGN_SET_PREFIXES
        .iter()
        .any(|benign| prefix.starts_with(benign))
    {
        return Disposition::Skip;
    }

    if let Some(table) = insert::insert_target(body) {
        if table.eq_ignore_ascii_case(target_table) {
            return Disposition::Insert;
        }
        // An INSERT aimed at any other table is not a no-op; block it.
        return Disposition::Blocked(excerpt(body));
    }

    if prefix == "SET" || prefix.starts_with("SET ") {
        return Disposition::Skip;
    }

    Disposition::Blocked(excerpt(body))
}

/// Drop leading whitespace and full `--` comment lines, returning the
/// first real statement text (dumps put comment lines directly above
/// the statements they describe, inside the same `;`-delimited chunk).
fn strip_leading_comments(statement: &str) -> &str {
    let mut rest = statement.trim_start();
    while let Some(comment) = rest.strip_prefix("--") {
        rest = match comment.find('\n') {
            Some(idx) => comment[idx + 1..].trim_start(),
            None => "",
        };
    }
    rest.trim_end()
}

/// Uppercase the first few words with whitespace collapsed, for prefix
/// matching.
fn normalized_prefix(body: &str) -> String {
    body.split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

fn excerpt(body: &str) -> String {
    body.chars().take(EXCERPT_CHARS).collect()
}
