//! Schema compiler: facts → descriptors.
//!
//! Compilation runs in fixed stages: type table (class, enumeration and
//! primitive names with their `rdf:about` aliases), enumerations,
//! inheritance linearization, property descriptors, inverse-role checks,
//! and finally the class descriptors with their effective property sets.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::facts::{ResourceFact, ResourceKind, SchemaFacts};
use crate::mapping::{builtin_primitive, normalize_namespace};
use crate::model::{
    ClassDescriptor, EnumLiteral, EnumerationDescriptor, PrimitiveKind, PropertyDescriptor,
    Schema, ValueKind,
};
use crate::multiplicity::{parse_multiplicity, Multiplicity};
use crate::options::{CompilerOptions, DanglingInverse};
use crate::SchemaError;

/// Compiles parsed facts into a [`Schema`].
///
/// # Errors
///
/// Returns [`SchemaError::Compile`] for duplicate class names, orphan or
/// cyclic superclass references, properties with a missing or unknown type,
/// malformed multiplicities, duplicate enumeration literals and (unless
/// `options` drops them) dangling inverse roles. Returns
/// [`SchemaError::Syntax`] for enumeration members with neither label nor
/// identifier.
pub fn compile(facts: &SchemaFacts, options: &CompilerOptions) -> Result<Schema, SchemaError> {
    let namespace = normalize_namespace(
        facts
            .base
            .as_deref()
            .unwrap_or(&options.default_namespace),
    );
    let types = TypeTable::build(facts)?;
    let enumerations = compile_enumerations(facts, &types)?;
    let classes = class_facts(facts);
    let hierarchy = linearize(&classes, &types)?;
    let mut own = collect_properties(facts, &classes, &types)?;
    check_inverse_roles(&classes, &hierarchy, &mut own, options)?;

    let mut compiled: IndexMap<String, Arc<ClassDescriptor>> = IndexMap::with_capacity(classes.len());
    for &index in &hierarchy.order {
        let fact = classes[index];
        let name = fact.name();
        let superclass = hierarchy.parent[index].map(|p| classes[p].name().to_owned());
        let properties: Vec<Arc<PropertyDescriptor>> = own
            .shift_remove(name)
            .unwrap_or_default()
            .into_iter()
            .map(Arc::new)
            .collect();

        let (mut effective, mut lineage) = match superclass.as_deref().and_then(|s| compiled.get(s)) {
            Some(parent) => (parent.effective.clone(), parent.lineage.clone()),
            None => (IndexMap::new(), Vec::new()),
        };
        for property in &properties {
            effective.insert(property.id.clone(), Arc::clone(property));
        }
        lineage.insert(0, name.to_owned());

        debug!(
            class = name,
            own = properties.len(),
            effective = effective.len(),
            "compiled class"
        );
        compiled.insert(
            name.to_owned(),
            Arc::new(ClassDescriptor {
                name: name.to_owned(),
                superclass,
                properties,
                comment: fact.comment.clone(),
                stereotype: fact.stereotypes.first().cloned(),
                effective,
                lineage,
            }),
        );
    }

    info!(
        classes = compiled.len(),
        enumerations = enumerations.len(),
        namespace = %namespace,
        "schema compiled"
    );
    Ok(Schema {
        namespace,
        classes: compiled,
        enumerations,
    })
}

/// Orders class names so that every class follows its superclass. Classes
/// are taken in source order over repeated passes: each pass places every
/// class whose superclass is already placed.
///
/// # Errors
///
/// Returns [`SchemaError::Compile`] if a superclass is not a class of the
/// schema or the superclass graph has a cycle.
pub fn resolve_inheritance(facts: &SchemaFacts) -> Result<Vec<String>, SchemaError> {
    let types = TypeTable::build(facts)?;
    let classes = class_facts(facts);
    let hierarchy = linearize(&classes, &types)?;
    Ok(hierarchy
        .order
        .into_iter()
        .map(|index| classes[index].name().to_owned())
        .collect())
}

#[derive(Clone, Copy)]
enum TypeTarget {
    Class,
    Enumeration,
    Primitive(PrimitiveKind),
}

/// Every name a type reference may resolve to.
#[derive(Default)]
struct TypeTable<'a> {
    aliases: HashMap<&'a str, &'a str>,
    targets: HashMap<&'a str, TypeTarget>,
}

impl<'a> TypeTable<'a> {
    fn build(facts: &'a SchemaFacts) -> Result<Self, SchemaError> {
        let mut table = Self::default();
        for resource in facts.resources.iter().filter(|r| r.is_class_like()) {
            let name = resource.name();
            let target = if resource.kind == ResourceKind::Enumeration {
                TypeTarget::Enumeration
            } else if resource.is_primitive() {
                TypeTarget::Primitive(builtin_primitive(name).unwrap_or_else(|| {
                    debug!(primitive = name, "unrecognized primitive carried as string");
                    PrimitiveKind::String
                }))
            } else {
                TypeTarget::Class
            };
            if table.targets.insert(name, target).is_some() {
                return Err(SchemaError::compile(format!(
                    "class name `{name}` is declared more than once"
                )));
            }
            if !resource.id.is_empty() && resource.id != name {
                table.aliases.insert(resource.id.as_str(), name);
            }
        }
        Ok(table)
    }

    /// Maps an `rdf:about` fragment to the label it identifies.
    fn canonical<'s>(&'s self, reference: &'s str) -> &'s str {
        self.aliases.get(reference).copied().unwrap_or(reference)
    }

    /// Schema-declared names take precedence over built-in datatypes.
    fn resolve<'s>(&'s self, reference: &'s str) -> Option<(TypeTarget, &'s str)> {
        let name = self.canonical(reference);
        match self.targets.get(name) {
            Some(target) => Some((*target, name)),
            None => builtin_primitive(name).map(|kind| (TypeTarget::Primitive(kind), name)),
        }
    }
}

fn class_facts(facts: &SchemaFacts) -> Vec<&ResourceFact> {
    facts
        .of_kind(&ResourceKind::Class)
        .filter(|r| !r.is_primitive())
        .collect()
}

fn compile_enumerations(
    facts: &SchemaFacts,
    types: &TypeTable<'_>,
) -> Result<IndexMap<String, EnumerationDescriptor>, SchemaError> {
    let mut enumerations = IndexMap::new();
    for enumeration in facts.of_kind(&ResourceKind::Enumeration) {
        let name = enumeration.name();
        let mut literals: Vec<EnumLiteral> = Vec::new();
        for member in &facts.resources {
            let ResourceKind::Resource { type_name } = &member.kind else {
                continue;
            };
            if types.canonical(type_name) != name {
                continue;
            }
            let value = member
                .label
                .clone()
                .filter(|label| !label.is_empty())
                .or_else(|| {
                    member
                        .id
                        .strip_prefix(name)
                        .and_then(|rest| rest.strip_prefix('.'))
                        .map(str::to_owned)
                })
                .unwrap_or_else(|| member.id.clone());
            if value.is_empty() {
                return Err(SchemaError::syntax(format!(
                    "member of enumeration `{name}` has neither rdfs:label nor identifier"
                )));
            }
            if literals.iter().any(|l| l.value == value) {
                return Err(SchemaError::compile(format!(
                    "enumeration `{name}` declares literal `{value}` more than once"
                )));
            }
            literals.push(EnumLiteral {
                value,
                comment: member.comment.clone(),
            });
        }
        debug!(enumeration = name, literals = literals.len(), "compiled enumeration");
        enumerations.insert(
            name.to_owned(),
            EnumerationDescriptor {
                name: name.to_owned(),
                comment: enumeration.comment.clone(),
                literals,
            },
        );
    }
    Ok(enumerations)
}

/// Superclass-first order plus each class's parent, as indices into the
/// class list.
struct Hierarchy {
    order: Vec<usize>,
    parent: Vec<Option<usize>>,
}

fn linearize(classes: &[&ResourceFact], types: &TypeTable<'_>) -> Result<Hierarchy, SchemaError> {
    let index: HashMap<&str, usize> = classes
        .iter()
        .enumerate()
        .map(|(i, class)| (class.name(), i))
        .collect();
    let mut parent = vec![None; classes.len()];
    for (i, class) in classes.iter().enumerate() {
        let Some(reference) = class.superclass.as_deref() else {
            continue;
        };
        let Some(&p) = index.get(types.canonical(reference)) else {
            return Err(SchemaError::compile(format!(
                "class `{}` extends `{reference}`, which is not a class of the schema",
                class.name()
            )));
        };
        parent[i] = Some(p);
    }

    // Repeated passes in source order; a class is placed once its parent is,
    // including a parent placed earlier in the same pass.
    let mut placed = vec![false; classes.len()];
    let mut order = Vec::with_capacity(classes.len());
    while order.len() < classes.len() {
        let before = order.len();
        for i in 0..classes.len() {
            if !placed[i] && parent[i].is_none_or(|p| placed[p]) {
                placed[i] = true;
                order.push(i);
            }
        }
        if order.len() == before {
            let cyclic: Vec<&str> = (0..classes.len())
                .filter(|&i| !placed[i])
                .map(|i| classes[i].name())
                .collect();
            return Err(SchemaError::compile(format!(
                "cyclic inheritance among {}",
                cyclic.join(", ")
            )));
        }
    }
    Ok(Hierarchy { order, parent })
}

fn collect_properties<'a>(
    facts: &'a SchemaFacts,
    classes: &[&'a ResourceFact],
    types: &TypeTable<'a>,
) -> Result<IndexMap<&'a str, Vec<PropertyDescriptor>>, SchemaError> {
    let mut own: IndexMap<&str, Vec<PropertyDescriptor>> =
        classes.iter().map(|c| (c.name(), Vec::new())).collect();
    for property in facts.of_kind(&ResourceKind::Property) {
        let Some(reference) = property.domain.as_deref() else {
            warn!(property = %property.id, "property has no rdfs:domain, skipped");
            continue;
        };
        let domain = types.canonical(reference);
        let Some(declared) = own.get_mut(domain) else {
            warn!(property = %property.id, domain, "property domain is not a class, skipped");
            continue;
        };
        let descriptor = compile_property(property, domain, types)?;
        if declared.iter().any(|d| d.id == descriptor.id) {
            return Err(SchemaError::compile(format!(
                "property `{}` is declared more than once on `{domain}`",
                descriptor.id
            )));
        }
        declared.push(descriptor);
    }
    Ok(own)
}

fn compile_property(
    property: &ResourceFact,
    domain: &str,
    types: &TypeTable<'_>,
) -> Result<PropertyDescriptor, SchemaError> {
    let reference = property
        .range
        .as_deref()
        .or(property.datatype.as_deref())
        .ok_or_else(|| {
            SchemaError::compile(format!(
                "property `{}` has neither rdfs:range nor cims:dataType",
                property.id
            ))
        })?;
    let (target, range) = types.resolve(reference).ok_or_else(|| {
        SchemaError::compile(format!(
            "property `{}` references unknown type `{reference}`",
            property.id
        ))
    })?;
    let kind = match target {
        TypeTarget::Class => ValueKind::Complex,
        TypeTarget::Enumeration => ValueKind::Enumeration,
        TypeTarget::Primitive(primitive) => ValueKind::Primitive(primitive),
    };
    let multiplicity = match property.multiplicity.as_deref() {
        Some(text) => parse_multiplicity(text).map_err(|err| {
            SchemaError::compile(format!("property `{}`: {err}", property.id))
        })?,
        None => Multiplicity::OPTIONAL,
    };
    Ok(PropertyDescriptor {
        id: property.id.clone(),
        label: property.name().to_owned(),
        domain: domain.to_owned(),
        kind,
        range: range.to_owned(),
        multiplicity,
        inverse: property.inverse_role.clone(),
        comment: property.comment.clone(),
    })
}

/// An inverse role must name a property in the effective set of the range
/// class.
fn check_inverse_roles(
    classes: &[&ResourceFact],
    hierarchy: &Hierarchy,
    own: &mut IndexMap<&str, Vec<PropertyDescriptor>>,
    options: &CompilerOptions,
) -> Result<(), SchemaError> {
    let mut effective_ids: HashMap<&str, HashSet<String>> = HashMap::new();
    for &index in &hierarchy.order {
        let mut ids = hierarchy.parent[index]
            .and_then(|p| effective_ids.get(classes[p].name()))
            .cloned()
            .unwrap_or_default();
        let name = classes[index].name();
        if let Some(properties) = own.get(name) {
            ids.extend(properties.iter().map(|p| p.id.clone()));
        }
        effective_ids.insert(name, ids);
    }

    for property in own.values_mut().flatten() {
        let Some(inverse) = property.inverse.as_deref() else {
            continue;
        };
        let declared = property.kind == ValueKind::Complex
            && effective_ids
                .get(property.range.as_str())
                .is_some_and(|ids| ids.contains(inverse));
        if declared {
            continue;
        }
        match options.dangling_inverse {
            DanglingInverse::Reject => {
                return Err(SchemaError::compile(format!(
                    "inverse role `{inverse}` of `{}` is not a property of `{}`",
                    property.id, property.range
                )));
            }
            DanglingInverse::Drop => {
                warn!(
                    property = %property.id,
                    inverse,
                    "inverse role is not a property of the range class, dropped"
                );
                property.inverse = None;
            }
        }
    }
    Ok(())
}
