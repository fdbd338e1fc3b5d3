//! Schema constraint checks over a single instance.

use cimrdf_schema::{PrimitiveKind, PropertyDescriptor, ValueKind};

use crate::error::ValidationError;
use crate::instance::{Instance, Slot};
use crate::session::Session;
use crate::value::Value;

/// Every violation of `instance`, in declaration order of its effective
/// properties.
pub(crate) fn violations(session: &Session, instance: &Instance) -> Vec<ValidationError> {
    let mut found = Vec::new();
    for (property, slot) in instance.slots() {
        match slot {
            Slot::Scalar(None) => {
                if property.is_required() {
                    found.push(ValidationError::MissingRequiredProperty {
                        uri: instance.uri.clone(),
                        class: instance.class.name.clone(),
                        property: property.id.clone(),
                    });
                }
            }
            Slot::Scalar(Some(value)) => found.extend(mismatch(session, instance, property, value)),
            Slot::List(values) => {
                if !property.multiplicity.admits(values.len()) {
                    found.push(ValidationError::Multiplicity {
                        uri: instance.uri.clone(),
                        class: instance.class.name.clone(),
                        property: property.id.clone(),
                        count: values.len(),
                        multiplicity: property.multiplicity,
                    });
                }
                found.extend(
                    values
                        .iter()
                        .filter_map(|value| mismatch(session, instance, property, value)),
                );
            }
        }
    }
    found
}

fn mismatch(
    session: &Session,
    instance: &Instance,
    property: &PropertyDescriptor,
    value: &Value,
) -> Option<ValidationError> {
    let found = match (property.kind, value) {
        (ValueKind::Primitive(PrimitiveKind::String), Value::String(_))
        | (ValueKind::Primitive(PrimitiveKind::Integer), Value::Integer(_))
        | (ValueKind::Primitive(PrimitiveKind::Float), Value::Float(_))
        | (ValueKind::Primitive(PrimitiveKind::Boolean), Value::Boolean(_)) => return None,
        (ValueKind::Enumeration, Value::Enum(literal)) => {
            let member = session
                .schema()
                .enumeration(&property.range)
                .is_some_and(|enumeration| enumeration.contains(literal));
            if member {
                return None;
            }
            format!("literal `{literal}`")
        }
        (ValueKind::Complex, Value::Reference(target)) => match session.instance(*target) {
            Some(target) if target.class.is_a(&property.range) => return None,
            Some(target) => format!("{} {}", target.class.name, target.uri),
            None => format!("unknown instance {target}"),
        },
        (_, other) => other.kind_name().to_owned(),
    };
    let expected = match property.kind {
        ValueKind::Primitive(kind) => kind.to_string(),
        ValueKind::Enumeration | ValueKind::Complex => property.range.clone(),
    };
    Some(ValidationError::TypeMismatch {
        uri: instance.uri.clone(),
        class: instance.class.name.clone(),
        property: property.id.clone(),
        expected,
        found,
    })
}
