//! Dump-text handling: splitting, classification, parsing, and literal
//! coercion.
//!
//! This module implements the textual side of the import pipeline:
//! - [`split_statements`] cuts raw dump text into top-level
//!   `;`-delimited statements without misfiring inside string literals,
//! - [`classify()`] allow-lists each statement (target-table INSERT,
//!   benign no-ops, everything else blocked),
//! - [`parse_insert`] extracts the column list and value clause from an
//!   allow-listed INSERT,
//! - [`lex_values`] splits a value clause into quote-stripped tokens,
//! - [`coerce()`] turns tokens into typed [`Literal`]s, which render
//!   back into SQL literal text for the companion export path.
//!
//! This is intentionally not a SQL grammar: only the narrow statement
//! shape exchanged by the export/import pair is understood, and
//! everything else is rejected by construction.

pub mod classify;
mod format;
pub mod insert;
pub mod lexer;
pub mod splitter;
pub mod value;

pub use classify::{Disposition, classify};
pub use format::{dump_preamble, format_insert, quote_ident};
pub use insert::{ParseError, ParsedInsert, parse_insert};
pub use lexer::{ValueToken, lex_values};
pub use splitter::split_statements;
pub use value::{Literal, coerce};
