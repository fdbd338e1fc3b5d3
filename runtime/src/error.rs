//! Runtime, validation and codec errors.

use cimrdf_schema::Multiplicity;
use cimrdf_xml::XmlError;
use thiserror::Error;

use crate::instance::InstanceId;

/// Failure of a construction, read or write call. The instance is left in
/// its prior state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// No class of this name in the schema.
    #[error("unknown class `{0}`")]
    UnknownClass(String),
    /// The class has no effective property of this name.
    #[error("class `{class}` has no property `{property}`")]
    UnknownProperty {
        /// Class of the addressed instance.
        class: String,
        /// Requested property name.
        property: String,
    },
    /// The handle does not address an instance of this session.
    #[error("no instance {0} in this session")]
    UnknownInstance(InstanceId),
    /// An instance with this URI already exists.
    #[error("identity `{0}` is already in use")]
    DuplicateIdentity(String),
    /// The value cannot be coerced to the property's kind, or is not a
    /// literal of its enumeration.
    #[error("invalid value `{value}` for `{property}`: {reason}")]
    InvalidValue {
        /// Property id.
        property: String,
        /// The rejected value, rendered as text.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A single-value write addressed a list-valued property.
    #[error("`{0}` is list-valued; use add or replace_all")]
    NotScalar(String),
    /// A list write addressed a scalar property.
    #[error("`{0}` is scalar; use set or clear")]
    NotList(String),
}

/// A schema constraint that an instance does not satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A scalar with lower bound 1 has no value.
    #[error("{uri}: required property `{property}` of {class} is not set")]
    MissingRequiredProperty {
        /// Instance URI.
        uri: String,
        /// Instance class.
        class: String,
        /// Property id.
        property: String,
    },
    /// A value does not match the property's kind, enumeration or range
    /// class.
    #[error("{uri}: `{property}` expects {expected}, found {found}")]
    TypeMismatch {
        /// Instance URI.
        uri: String,
        /// Instance class.
        class: String,
        /// Property id.
        property: String,
        /// Expected kind or class.
        expected: String,
        /// What is stored.
        found: String,
    },
    /// A list holds fewer or more elements than its multiplicity allows.
    #[error("{uri}: `{property}` holds {count} values, expected {multiplicity}")]
    Multiplicity {
        /// Instance URI.
        uri: String,
        /// Instance class.
        class: String,
        /// Property id.
        property: String,
        /// Number of elements.
        count: usize,
        /// Declared bounds.
        multiplicity: Multiplicity,
    },
}

impl ValidationError {
    /// URI of the offending instance.
    #[must_use]
    pub fn uri(&self) -> &str {
        match self {
            ValidationError::MissingRequiredProperty { uri, .. }
            | ValidationError::TypeMismatch { uri, .. }
            | ValidationError::Multiplicity { uri, .. } => uri,
        }
    }

    /// Id of the offending property.
    #[must_use]
    pub fn property(&self) -> &str {
        match self {
            ValidationError::MissingRequiredProperty { property, .. }
            | ValidationError::TypeMismatch { property, .. }
            | ValidationError::Multiplicity { property, .. } => property,
        }
    }
}

/// Failure to write or read an instance document.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The document is not well-formed XML.
    #[error(transparent)]
    Xml(#[from] XmlError),
    /// The document is XML but not an instance document.
    #[error("malformed instance document: {0}")]
    Malformed(String),
    /// A reference names no top-level element of the document.
    #[error("{owner}: `{property}` references `{target}`, which is not in the document")]
    UnresolvedReference {
        /// URI of the referencing instance.
        owner: String,
        /// Property id.
        property: String,
        /// Unresolved target URI.
        target: String,
    },
    /// Construction or a property write failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// A document member failed validation before writing.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The byte stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
