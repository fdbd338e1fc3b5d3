//! Typed facts extracted from a schema document, before any interpretation
//! of multiplicities, type references or inheritance order.

/// What a top-level schema resource declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    /// An `rdfs:Class`.
    Class,
    /// An `rdfs:Class` carrying the enumeration stereotype.
    Enumeration,
    /// An `rdf:Property`.
    Property,
    /// Any other typed resource, e.g. an enumeration member.
    Resource {
        /// Local name of the resource's type.
        type_name: String,
    },
}

/// One top-level resource of the schema document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFact {
    /// `rdf:ID`, or the fragment of `rdf:about`; empty when absent.
    pub id: String,
    /// Declared kind.
    pub kind: ResourceKind,
    /// `rdfs:label`.
    pub label: Option<String>,
    /// `rdfs:comment` text.
    pub comment: String,
    /// Local name of `rdfs:subClassOf`.
    pub superclass: Option<String>,
    /// Local name of `rdfs:domain`.
    pub domain: Option<String>,
    /// Local name of `rdfs:range`.
    pub range: Option<String>,
    /// Local name of `cims:dataType`.
    pub datatype: Option<String>,
    /// Raw multiplicity expression from `cims:multiplicity`.
    pub multiplicity: Option<String>,
    /// Local name of `cims:inverseRoleName`.
    pub inverse_role: Option<String>,
    /// Local names of `cims:stereotype` markers.
    pub stereotypes: Vec<String>,
}

impl ResourceFact {
    /// Creates a fact with no annotations.
    #[must_use]
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: None,
            comment: String::new(),
            superclass: None,
            domain: None,
            range: None,
            datatype: None,
            multiplicity: None,
            inverse_role: None,
            stereotypes: Vec::new(),
        }
    }

    /// The label, falling back to the identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Returns `true` if a stereotype with this local name is present,
    /// compared case-insensitively.
    #[must_use]
    pub fn has_stereotype(&self, stereotype: &str) -> bool {
        self.stereotypes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(stereotype))
    }

    /// Classes stereotyped `Primitive` alias a primitive datatype.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.kind == ResourceKind::Class && self.has_stereotype("Primitive")
    }

    /// Returns `true` for classes and enumerations.
    #[must_use]
    pub fn is_class_like(&self) -> bool {
        matches!(self.kind, ResourceKind::Class | ResourceKind::Enumeration)
    }
}

/// Everything the parser extracted from one schema document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaFacts {
    /// The root's `xml:base`, if declared.
    pub base: Option<String>,
    /// Top-level resources in source order.
    pub resources: Vec<ResourceFact>,
}

impl SchemaFacts {
    /// Iterates over resources of the given kind.
    pub fn of_kind<'a>(
        &'a self,
        kind: &'a ResourceKind,
    ) -> impl Iterator<Item = &'a ResourceFact> + 'a {
        self.resources
            .iter()
            .filter(move |r| &r.kind == kind)
    }
}
