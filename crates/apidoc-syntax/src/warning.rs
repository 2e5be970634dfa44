//! Parse warnings and errors.
//!
//! Nothing in this crate aborts a whole document: problems with one tag
//! or one name become a [`DocWarning`] attached to the record they concern.

use serde::Serialize;
use thiserror::Error;

/// Non-fatal problem found while building a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocWarning {
    /// `@param` / `@return` without the mandatory type and name.
    #[error("malformed @{tag} tag (expected `@{tag} <type> <name> ...`): {}", .tokens.join(" "))]
    MalformedTag { tag: String, tokens: Vec<String> },

    /// Qualified class name too short to infer a URL from.
    #[error("cannot infer url from `{name}`: expected at least 4 name segments, found {segments}")]
    MalformedQualifiedName { name: String, segments: usize },

    /// `@url` value outside the accepted expression shapes.
    #[error("rejected @url expression `{expression}`: {reason}")]
    UnsafeRawExpression { expression: String, reason: String },
}

/// Errors raised by the `@url` expression grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("empty expression")]
    Empty,

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("`{function}` expects {expected} argument(s), found {found}")]
    Arity {
        function: String,
        expected: &'static str,
        found: usize,
    },

    #[error("argument {0} is not a quoted string literal")]
    NotALiteral(usize),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),

    #[error("`{0}` is not a path or URL")]
    NotAPath(String),
}
