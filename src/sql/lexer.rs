//! Value-list lexer for the clause between the VALUES parentheses.

/// A single literal token produced by [`lex_values`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueToken {
    /// Token content with quote delimiters stripped and escapes
    /// resolved to literal characters.
    pub text: String,
    /// Whether the token was enclosed in quotes in the source text.
    ///
    /// Quoting decides typing downstream: a quoted `'42'` stays text
    /// while a bare `42` coerces to an integer.
    pub quoted: bool,
}

impl ValueToken {
    fn take(&mut self) -> Self {
        let token = Self {
            text: core::mem::take(&mut self.text),
            quoted: self.quoted,
        };
        self.quoted = false;
        token
    }
}

/// Split the text between the VALUES parentheses into literal tokens.
///
/// Mirrors the statement splitter's quote tracking, but splits on
/// top-level commas and resolves escapes instead of passing them
/// through: quote delimiters are not copied into the token, a doubled
/// quote becomes one literal quote, and a backslash-escaped character
/// becomes that character.
///
/// A trailing empty token after a final comma is suppressed unless it
/// was written as an explicit empty quoted literal (`''`), so "nothing
/// after a trailing comma" and "an empty string value" stay distinct.
#[must_use]
pub fn lex_values(input: &str) -> Vec<ValueToken> {
    let mut tokens = Vec::new();
    let mut current = ValueToken {
        text: String::new(),
        quoted: false,
    };
    let mut in_string: Option<char> = None;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match in_string {
            Some(quote) => {
                if c == quote {
                    if chars.peek() == Some(&quote) {
                        chars.next();
                        current.text.push(quote);
                    } else {
                        in_string = None;
                    }
                } else if c == '\\' {
                    // Unescape to the literal following character; a
                    // trailing backslash is kept as-is.
                    match chars.next() {
                        Some(escaped) => current.text.push(escaped),
                        None => current.text.push('\\'),
                    }
                } else {
                    current.text.push(c);
                }
            }
            None => match c {
                '\'' | '"' => {
                    in_string = Some(c);
                    current.quoted = true;
                }
                ',' => tokens.push(current.take()),
                _ if c.is_whitespace() => {}
                _ => current.text.push(c),
            },
        }
    }

    if !current.text.is_empty() || current.quoted {
        tokens.push(current.take());
    }

    tokens
}
