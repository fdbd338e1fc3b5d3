//! Value coercion applied by every write.
//!
//! A value is coerced to the property's kind before anything is stored, so
//! a rejected write never touches the instance.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use cimrdf_schema::{PrimitiveKind, PropertyDescriptor, Schema, ValueKind};

use crate::error::RuntimeError;
use crate::value::Value;

/// Coerces `value` to the native representation of `property`.
///
/// # Errors
///
/// Returns [`RuntimeError::InvalidValue`] if the value has no
/// representation in the property's kind, or is not a literal of its
/// enumeration.
pub fn coerce(
    schema: &Schema,
    property: &PropertyDescriptor,
    value: Value,
) -> Result<Value, RuntimeError> {
    let invalid = |value: &Value, reason: String| RuntimeError::InvalidValue {
        property: property.id.clone(),
        value: value.to_string(),
        reason,
    };
    match property.kind {
        ValueKind::Primitive(kind) => {
            coerce_primitive(kind, &value).map_err(|reason| invalid(&value, reason))
        }
        ValueKind::Enumeration => {
            let literal = match &value {
                Value::Enum(text) | Value::String(text) => enum_literal(&property.range, text),
                other => {
                    return Err(invalid(
                        other,
                        format!("{} is not a literal of {}", other.kind_name(), property.range),
                    ))
                }
            };
            let member = schema
                .enumeration(&property.range)
                .is_some_and(|enumeration| enumeration.contains(literal));
            if member {
                Ok(Value::Enum(literal.to_owned()))
            } else {
                Err(invalid(&value, format!("not a literal of {}", property.range)))
            }
        }
        ValueKind::Complex => Ok(value),
    }
}

/// Strips an IRI prefix and the `Enumeration.` qualifier from a literal:
/// `"…#PhaseCode.ABC"`, `"PhaseCode.ABC"` and `"ABC"` all give `"ABC"`.
#[must_use]
pub fn enum_literal<'a>(enumeration: &str, text: &'a str) -> &'a str {
    let text = text.trim();
    let local = text.rsplit('#').next().unwrap_or(text);
    local
        .strip_prefix(enumeration)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(local)
}

fn coerce_primitive(kind: PrimitiveKind, value: &Value) -> Result<Value, String> {
    match (kind, value) {
        (_, Value::Reference(_)) => Err(format!("a reference is not a {kind}")),
        (PrimitiveKind::String, other) => Ok(Value::String(other.literal().unwrap_or_default())),
        (PrimitiveKind::Integer, Value::Integer(i)) => Ok(Value::Integer(*i)),
        (PrimitiveKind::Integer, Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|err| err.to_string()),
        (PrimitiveKind::Float, Value::Float(d)) => Ok(Value::Float(d.clone())),
        (PrimitiveKind::Float, Value::Integer(i)) => Ok(Value::Float(BigDecimal::from(*i))),
        (PrimitiveKind::Float, Value::String(text)) => BigDecimal::from_str(text.trim())
            .map(Value::Float)
            .map_err(|err| err.to_string()),
        (PrimitiveKind::Boolean, Value::Boolean(b)) => Ok(Value::Boolean(*b)),
        (PrimitiveKind::Boolean, Value::String(text)) => {
            match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Boolean(true)),
                "false" | "0" => Ok(Value::Boolean(false)),
                _ => Err("expected true, false, 1 or 0".to_owned()),
            }
        }
        (kind, other) => Err(format!("cannot represent {} as {kind}", other.kind_name())),
    }
}
