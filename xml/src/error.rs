//! Errors raised while reading XML documents.

use pest::error::LineColLocation;
use thiserror::Error;

use crate::grammar::Rule;

/// An error raised by [`parse`](crate::parse).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum XmlError {
    /// The input does not match the XML grammar.
    #[error("XML syntax error at {line}:{column}: {message}")]
    Syntax {
        /// 1-based line of the offending position.
        line: usize,
        /// 1-based column of the offending position.
        column: usize,
        /// Parser diagnostic.
        message: String,
    },
    /// An end tag does not close the element that is currently open.
    #[error("mismatched end tag: expected `</{expected}>`, found `</{found}>`")]
    MismatchedTag {
        /// Qualified name of the open element.
        expected: String,
        /// Qualified name found in the end tag.
        found: String,
    },
    /// An entity reference that is neither predefined nor a character reference.
    #[error("unknown entity reference `&{0};`")]
    UnknownEntity(String),
    /// A qualified name uses a prefix with no `xmlns:` declaration in scope.
    #[error("namespace prefix `{0}` is not bound")]
    UnboundPrefix(String),
    /// The input bytes are not UTF-8.
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    /// The parse tree is missing a node the grammar guarantees.
    #[error("malformed parse tree: {0}")]
    Internal(&'static str),
}

impl From<pest::error::Error<Rule>> for XmlError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let (line, column) = match err.line_col {
            LineColLocation::Pos(pos) | LineColLocation::Span(pos, _) => pos,
        };
        XmlError::Syntax {
            line,
            column,
            message: err.variant.message().into_owned(),
        }
    }
}
