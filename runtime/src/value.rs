//! Closed value representation stored in instance slots.

use std::fmt;

use bigdecimal::BigDecimal;

use crate::instance::InstanceId;

/// A property value. Primitive and enumeration values are inlined on the
/// wire; references point at other instances of the same session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Text, including CIM date and time primitives.
    String(String),
    /// 64-bit signed integer.
    Integer(i64),
    /// Arbitrary-precision decimal; equality is numeric.
    Float(BigDecimal),
    /// Boolean.
    Boolean(bool),
    /// Enumeration literal, without the enumeration prefix.
    Enum(String),
    /// Reference to another instance.
    Reference(InstanceId),
}

impl Value {
    /// Returns the referenced instance, if this is a reference.
    #[must_use]
    pub fn as_reference(&self) -> Option<InstanceId> {
        match self {
            Value::Reference(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the text of string and enumeration values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Wire text of an inlined value; `None` for references.
    #[must_use]
    pub fn literal(&self) -> Option<String> {
        match self {
            Value::String(s) | Value::Enum(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(d) => Some(d.to_string()),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Reference(_) => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Enum(_) => "enumeration literal",
            Value::Reference(_) => "reference",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Reference(id) => write!(f, "{id}"),
            other => f.write_str(&other.literal().unwrap_or_default()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Value::Float(value)
    }
}

impl From<InstanceId> for Value {
    fn from(value: InstanceId) -> Self {
        Value::Reference(value)
    }
}
