//! Compiled descriptor model.
//!
//! Descriptors are created once by the compiler and are immutable
//! thereafter. Class descriptors are shared behind [`Arc`] so that runtime
//! instances can hold on to their most-derived type cheaply. The top-level
//! entry point is [`Schema::compile`](crate::Schema::compile).

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::multiplicity::Multiplicity;

/// Native representation of a primitive-valued property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Text, including CIM date and time primitives.
    String,
    /// 64-bit signed integer.
    Integer,
    /// Arbitrary-precision decimal.
    Float,
    /// `true` / `false`.
    Boolean,
}

impl PrimitiveKind {
    /// Returns the lower-case name used in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a property's values are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A primitive scalar, inlined as literal text on the wire.
    Primitive(PrimitiveKind),
    /// A member of an enumeration, inlined as its literal.
    Enumeration,
    /// A reference to an instance of a schema class.
    Complex,
}

/// A compiled property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Property identifier, e.g. `"Terminal.ConnectivityNode"`.
    pub id: String,
    /// Human-readable label, e.g. `"ConnectivityNode"`.
    pub label: String,
    /// Name of the declaring class.
    pub domain: String,
    /// Value kind.
    pub kind: ValueKind,
    /// Referenced type: class, enumeration, or primitive datatype name.
    pub range: String,
    /// Cardinality bounds.
    pub multiplicity: Multiplicity,
    /// Identifier of the partner property on the range class.
    pub inverse: Option<String>,
    /// Documentation.
    pub comment: String,
}

impl PropertyDescriptor {
    /// Returns `true` if the property holds a list of values.
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.multiplicity.is_list()
    }

    /// Returns `true` if at least one value is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.multiplicity.lower >= 1
    }
}

/// A compiled class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    /// Class name (its label), unique within the schema.
    pub name: String,
    /// Superclass name, or `None` for roots.
    pub superclass: Option<String>,
    /// Properties whose domain is this class, in source order.
    pub properties: Vec<Arc<PropertyDescriptor>>,
    /// Documentation.
    pub comment: String,
    /// Stereotype recorded on the class (e.g. `"CIMDatatype"`).
    pub stereotype: Option<String>,
    pub(crate) effective: IndexMap<String, Arc<PropertyDescriptor>>,
    pub(crate) lineage: Vec<String>,
}

impl ClassDescriptor {
    /// Every legal property of the class keyed by id: own and inherited,
    /// root ancestor first, nearest declaration winning on id collision.
    #[must_use]
    pub fn effective_properties(&self) -> &IndexMap<String, Arc<PropertyDescriptor>> {
        &self.effective
    }

    /// Looks up an effective property by exact id.
    #[must_use]
    pub fn property(&self, id: &str) -> Option<&Arc<PropertyDescriptor>> {
        self.effective.get(id)
    }

    /// Resolves a property name to its slot index and descriptor.
    ///
    /// Accepts the exact id (`"Terminal.ConnectivityNode"`) or a label
    /// (`"ConnectivityNode"`, also taken from the part after the last `.`)
    /// that matches exactly one effective property.
    #[must_use]
    pub fn resolve_property(&self, name: &str) -> Option<(usize, &Arc<PropertyDescriptor>)> {
        if let Some((index, _, descriptor)) = self.effective.get_full(name) {
            return Some((index, descriptor));
        }
        let label = name.rsplit('.').next().unwrap_or(name);
        let mut matches = self
            .effective
            .values()
            .enumerate()
            .filter(|(_, p)| p.label == label);
        match (matches.next(), matches.next()) {
            (Some(found), None) => Some(found),
            _ => None,
        }
    }

    /// The class name followed by its ancestors, nearest first.
    #[must_use]
    pub fn lineage(&self) -> &[String] {
        &self.lineage
    }

    /// Returns `true` if this class is `name` or inherits from it.
    #[must_use]
    pub fn is_a(&self, name: &str) -> bool {
        self.lineage.iter().any(|ancestor| ancestor == name)
    }
}

/// A literal of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumLiteral {
    /// Literal value.
    pub value: String,
    /// Documentation.
    pub comment: String,
}

/// A compiled enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationDescriptor {
    /// Enumeration name.
    pub name: String,
    /// Documentation.
    pub comment: String,
    /// Literals in source order, unique by value.
    pub literals: Vec<EnumLiteral>,
}

impl EnumerationDescriptor {
    /// Returns `true` if `value` is a literal of this enumeration.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.literals.iter().any(|l| l.value == value)
    }
}

/// A compiled schema: the class registry and the enumerations.
///
/// Classes iterate in superclass-before-subclass order.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) namespace: String,
    pub(crate) classes: IndexMap<String, Arc<ClassDescriptor>>,
    pub(crate) enumerations: IndexMap<String, EnumerationDescriptor>,
}

impl Schema {
    /// Namespace that qualifies class and property names in instance
    /// documents, ending with `#`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&Arc<ClassDescriptor>> {
        self.classes.get(name)
    }

    /// Looks up an enumeration by name.
    #[must_use]
    pub fn enumeration(&self, name: &str) -> Option<&EnumerationDescriptor> {
        self.enumerations.get(name)
    }

    /// Iterates over classes, superclasses first.
    pub fn classes(&self) -> impl Iterator<Item = &Arc<ClassDescriptor>> {
        self.classes.values()
    }

    /// Iterates over enumerations in source order.
    pub fn enumerations(&self) -> impl Iterator<Item = &EnumerationDescriptor> {
        self.enumerations.values()
    }

    /// Returns the effective property set of a class.
    #[must_use]
    pub fn effective_properties(
        &self,
        class: &str,
    ) -> Option<&IndexMap<String, Arc<PropertyDescriptor>>> {
        self.class(class).map(|c| c.effective_properties())
    }

    /// Returns `true` if `class` is `ancestor` or one of its subclasses.
    #[must_use]
    pub fn is_subclass_of(&self, class: &str, ancestor: &str) -> bool {
        self.class(class).is_some_and(|c| c.is_a(ancestor))
    }
}
