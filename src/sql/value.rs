//! Typed literals and coercion from lexed value tokens.

use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};

use super::lexer::ValueToken;

/// A typed value inside a VALUES clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// NULL value.
    Null,
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl ToSql for Literal {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Literal::Null => ToSqlOutput::Owned(Value::Null),
            Literal::Integer(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            Literal::Float(v) => ToSqlOutput::Owned(Value::Real(*v)),
            Literal::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl Literal {
    /// Build a literal from a value read back out of storage.
    ///
    /// Blob columns have no literal form in the dump shape this crate
    /// exchanges; their bytes are carried over lossily as text.
    #[must_use]
    pub fn from_value_ref(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Literal::Null,
            ValueRef::Integer(v) => Literal::Integer(v),
            ValueRef::Real(v) => Literal::Float(v),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Literal::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

/// Check whether a bare token matches the numeric literal grammar:
/// an optional leading minus, digits, an optional fractional part, and
/// an optional exponent.
///
/// This single predicate is what keeps export and re-import type-stable:
/// every integer or float the formatter emits must round-trip through
/// it, and nothing the formatter quotes may match it.
#[must_use]
pub fn is_numeric(token: &str) -> bool {
    let bytes = token.as_bytes();
    let mut pos = usize::from(bytes.first() == Some(&b'-'));

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos == int_start {
        return false;
    }

    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        let frac_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == frac_start {
            return false;
        }
    }

    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        pos += 1;
        if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
            pos += 1;
        }
        let exp_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == exp_start {
            return false;
        }
    }

    pos == bytes.len()
}

/// Coerce a lexed token into a typed [`Literal`].
///
/// Quoted tokens are always text, regardless of content. Bare tokens
/// coerce case-insensitively to NULL, then through the numeric grammar
/// (a decimal point or exponent makes a float, an integer too large for
/// `i64` falls back to float), and otherwise to text with any remaining
/// doubled single-quotes collapsed as a second unescaping pass.
#[must_use]
pub fn coerce(token: &ValueToken) -> Literal {
    if token.quoted {
        return Literal::Text(token.text.clone());
    }

    let text = token.text.as_str();
    if text.eq_ignore_ascii_case("NULL") {
        return Literal::Null;
    }

    if is_numeric(text) {
        let is_float = text.contains(['.', 'e', 'E']);
        if !is_float {
            if let Ok(v) = text.parse::<i64>() {
                return Literal::Integer(v);
            }
        }
        if let Ok(v) = text.parse::<f64>() {
            return Literal::Float(v);
        }
    }

    Literal::Text(text.replace("''", "'"))
}
