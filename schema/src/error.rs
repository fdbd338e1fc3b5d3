//! Schema errors.

use cimrdf_xml::XmlError;
use thiserror::Error;

/// Failure to parse or compile a schema. No partial schema is produced.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document is not well-formed XML.
    #[error("schema syntax error: {0}")]
    Xml(#[from] XmlError),
    /// A resource lacks a required label, identifier or type annotation.
    #[error("schema syntax error: {0}")]
    Syntax(String),
    /// Unresolvable superclass, cyclic inheritance, malformed multiplicity,
    /// unknown type reference or dangling inverse role.
    #[error("schema compile error: {0}")]
    Compile(String),
    /// Compiler options could not be decoded.
    #[error("invalid compiler options: {0}")]
    Options(#[from] toml::de::Error),
}

impl SchemaError {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        SchemaError::Syntax(message.into())
    }

    pub(crate) fn compile(message: impl Into<String>) -> Self {
        SchemaError::Compile(message.into())
    }

    /// Returns `true` for malformed-document errors.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, SchemaError::Xml(_) | SchemaError::Syntax(_))
    }

    /// Returns `true` for errors raised while compiling well-formed facts.
    #[must_use]
    pub fn is_compile(&self) -> bool {
        matches!(self, SchemaError::Compile(_))
    }
}
