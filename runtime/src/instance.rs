//! Instances and their property slots.

use std::fmt;
use std::sync::Arc;

use cimrdf_schema::{ClassDescriptor, PropertyDescriptor};

use crate::value::Value;

/// Handle to an instance owned by a [`Session`](crate::Session).
///
/// Handles are only meaningful for the session that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) usize);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Storage for one effective property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// A property with upper bound 1; `None` is the absent value.
    Scalar(Option<Value>),
    /// A list-valued property; order is insertion order, without duplicates.
    List(Vec<Value>),
}

impl Slot {
    fn empty_for(property: &PropertyDescriptor) -> Self {
        if property.is_list() {
            Slot::List(Vec::new())
        } else {
            Slot::Scalar(None)
        }
    }

    /// Stored values: zero or one for a scalar, all elements for a list.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        match self {
            Slot::Scalar(Some(value)) => std::slice::from_ref(value),
            Slot::Scalar(None) => &[],
            Slot::List(values) => values,
        }
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

/// A typed record bound to its most-derived class.
///
/// Slots are aligned with the class's effective properties, so every legal
/// property has exactly one slot and no other property can be stored.
#[derive(Debug, Clone)]
pub struct Instance {
    pub(crate) uri: String,
    pub(crate) class: Arc<ClassDescriptor>,
    pub(crate) slots: Vec<Slot>,
}

impl Instance {
    pub(crate) fn new(class: Arc<ClassDescriptor>, uri: String) -> Self {
        let slots = class
            .effective_properties()
            .values()
            .map(|property| Slot::empty_for(property))
            .collect();
        Self { uri, class, slots }
    }

    /// Identity URI, e.g. `"#_4a1c…"`.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Most-derived class.
    #[must_use]
    pub fn class(&self) -> &Arc<ClassDescriptor> {
        &self.class
    }

    /// Name of the most-derived class.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class.name
    }

    /// Slot of a property addressed by id or unique label.
    #[must_use]
    pub fn slot(&self, property: &str) -> Option<&Slot> {
        let (index, _) = self.class.resolve_property(property)?;
        self.slots.get(index)
    }

    /// Stored values of a property; empty if unset or unknown.
    #[must_use]
    pub fn values(&self, property: &str) -> &[Value] {
        self.slot(property).map(Slot::values).unwrap_or_default()
    }

    /// Every effective property with its slot, in declaration order.
    pub fn slots(&self) -> impl Iterator<Item = (&Arc<PropertyDescriptor>, &Slot)> {
        self.class.effective_properties().values().zip(&self.slots)
    }

    /// Instances referenced from any slot, in declaration order.
    pub fn references(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.slots
            .iter()
            .flat_map(Slot::values)
            .filter_map(Value::as_reference)
    }
}
