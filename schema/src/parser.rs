//! Meta-schema parser: RDF/XML schema document → [`SchemaFacts`].
//!
//! Pure extraction. Type references keep their local names, multiplicities
//! stay textual, and inheritance is left unresolved.

use cimrdf_xml::{Element, XML_NAMESPACE};

use crate::facts::{ResourceFact, ResourceKind, SchemaFacts};
use crate::iris::{NS_CIMS, NS_RDF, NS_RDFS, RDFS_CLASS, RDF_PROPERTY};
use crate::mapping::{local_name, multiplicity_expression};
use crate::SchemaError;

/// Parses a schema document into facts.
///
/// # Errors
///
/// Returns [`SchemaError::Xml`] for malformed XML and
/// [`SchemaError::Syntax`] when the root is not `rdf:RDF`, a class or
/// property lacks a label, a property lacks an identifier, or an
/// `rdf:Description` lacks an `rdf:type`.
pub fn parse_schema(source: &str) -> Result<SchemaFacts, SchemaError> {
    facts_from_root(&cimrdf_xml::parse(source)?)
}

/// Parses a UTF-8 schema document into facts.
///
/// # Errors
///
/// As [`parse_schema`], plus [`SchemaError::Xml`] for non-UTF-8 input.
pub fn parse_schema_bytes(source: &[u8]) -> Result<SchemaFacts, SchemaError> {
    facts_from_root(&cimrdf_xml::parse_bytes(source)?)
}

fn facts_from_root(root: &Element) -> Result<SchemaFacts, SchemaError> {
    if !root.is(NS_RDF, "RDF") {
        return Err(SchemaError::syntax(format!(
            "expected rdf:RDF root element, found `{}`",
            root.name.qualified()
        )));
    }
    let resources = root
        .elements()
        .map(read_resource)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SchemaFacts {
        base: root
            .attribute(Some(XML_NAMESPACE), "base")
            .map(str::to_owned),
        resources,
    })
}

fn read_resource(element: &Element) -> Result<ResourceFact, SchemaError> {
    let id = resource_id(element);
    let mut fact = ResourceFact::new(resource_kind(element, &id)?, id);

    for child in element.elements() {
        let Some(namespace) = child.name.namespace.as_deref() else {
            continue;
        };
        match (namespace, child.name.local.as_str()) {
            (NS_RDFS, "label") if fact.label.is_none() => {
                fact.label = Some(child.text_content().trim().to_owned());
            }
            (NS_RDFS, "comment") if fact.comment.is_empty() => {
                fact.comment = child.text_content().trim().to_owned();
            }
            (NS_RDFS, "subClassOf") => fact.superclass = reference(child),
            (NS_RDFS, "domain") => fact.domain = reference(child),
            (NS_RDFS, "range") => fact.range = reference(child),
            (NS_CIMS, "dataType") => fact.datatype = reference(child),
            (NS_CIMS, "inverseRoleName") => fact.inverse_role = reference(child),
            (NS_CIMS, "multiplicity") => {
                fact.multiplicity = child
                    .attribute(Some(NS_RDF), "resource")
                    .map(|r| multiplicity_expression(r).to_owned())
                    .or_else(|| non_empty(child.text()));
            }
            (NS_CIMS, "stereotype") => {
                if let Some(stereotype) = reference(child).or_else(|| non_empty(child.text())) {
                    fact.stereotypes.push(stereotype);
                }
            }
            _ => {}
        }
    }

    if fact.kind == ResourceKind::Class && fact.has_stereotype("enumeration") {
        fact.kind = ResourceKind::Enumeration;
    }
    let needs_label = fact.is_class_like() || fact.kind == ResourceKind::Property;
    if needs_label && fact.label.as_deref().map_or(true, str::is_empty) {
        return Err(SchemaError::syntax(format!(
            "resource `{}` ({}) has no rdfs:label",
            fact.id,
            element.name.qualified()
        )));
    }
    if fact.kind == ResourceKind::Property && fact.id.is_empty() {
        return Err(SchemaError::syntax(format!(
            "property `{}` has neither rdf:ID nor rdf:about",
            fact.name()
        )));
    }
    Ok(fact)
}

fn resource_id(element: &Element) -> String {
    if let Some(id) = element.attribute(Some(NS_RDF), "ID") {
        return id.to_owned();
    }
    element
        .attribute(Some(NS_RDF), "about")
        .map(|about| match about.split_once('#') {
            Some((_, fragment)) => fragment.to_owned(),
            None => local_name(about).to_owned(),
        })
        .unwrap_or_default()
}

fn resource_kind(element: &Element, id: &str) -> Result<ResourceKind, SchemaError> {
    if element.is(NS_RDFS, "Class") {
        return Ok(ResourceKind::Class);
    }
    if element.is(NS_RDF, "Property") {
        return Ok(ResourceKind::Property);
    }
    if !element.is(NS_RDF, "Description") {
        return Ok(ResourceKind::Resource {
            type_name: element.name.local.clone(),
        });
    }
    let types: Vec<&str> = element
        .elements()
        .filter(|child| child.is(NS_RDF, "type"))
        .filter_map(|child| child.attribute(Some(NS_RDF), "resource"))
        .collect();
    if types.contains(&RDFS_CLASS) {
        Ok(ResourceKind::Class)
    } else if types.contains(&RDF_PROPERTY) {
        Ok(ResourceKind::Property)
    } else if let Some(first) = types.first() {
        Ok(ResourceKind::Resource {
            type_name: local_name(first).to_owned(),
        })
    } else {
        Err(SchemaError::syntax(format!(
            "rdf:Description `{id}` has no rdf:type"
        )))
    }
}

fn reference(element: &Element) -> Option<String> {
    element
        .attribute(Some(NS_RDF), "resource")
        .map(|r| local_name(r).to_owned())
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn wrap(body: &str) -> String {
        format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:cims="http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#"
         xml:base="http://iec.ch/TC57/2013/CIM-schema-cim16">
{body}
</rdf:RDF>"##
        )
    }

    #[test]
    fn reads_class_and_property_annotations() {
        let facts = parse_schema(&wrap(
            r##"
  <rdf:Description rdf:about="#Terminal">
    <rdfs:label xml:lang="en">Terminal</rdfs:label>
    <rdfs:comment><![CDATA[An AC electrical connection point.]]></rdfs:comment>
    <rdfs:subClassOf rdf:resource="#ACDCTerminal"/>
    <rdf:type rdf:resource="http://www.w3.org/2000/01/rdf-schema#Class"/>
  </rdf:Description>
  <rdf:Property rdf:ID="Terminal.ConnectivityNode">
    <rdfs:label>ConnectivityNode</rdfs:label>
    <rdfs:domain rdf:resource="#Terminal"/>
    <rdfs:range rdf:resource="#ConnectivityNode"/>
    <cims:multiplicity rdf:resource="http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#M:0..1"/>
    <cims:inverseRoleName rdf:resource="#ConnectivityNode.Terminals"/>
  </rdf:Property>"##,
        ))
        .unwrap();

        assert_eq!(
            facts.base.as_deref(),
            Some("http://iec.ch/TC57/2013/CIM-schema-cim16")
        );
        let terminal = &facts.resources[0];
        assert_eq!(terminal.kind, ResourceKind::Class);
        assert_eq!(terminal.id, "Terminal");
        assert_eq!(terminal.name(), "Terminal");
        assert_eq!(terminal.comment, "An AC electrical connection point.");
        assert_eq!(terminal.superclass.as_deref(), Some("ACDCTerminal"));

        let property = &facts.resources[1];
        assert_eq!(property.kind, ResourceKind::Property);
        assert_eq!(property.id, "Terminal.ConnectivityNode");
        assert_eq!(property.domain.as_deref(), Some("Terminal"));
        assert_eq!(property.range.as_deref(), Some("ConnectivityNode"));
        assert_eq!(property.multiplicity.as_deref(), Some("0..1"));
        assert_eq!(
            property.inverse_role.as_deref(),
            Some("ConnectivityNode.Terminals")
        );
    }

    #[test]
    fn stereotypes_mark_enumerations_and_primitives() {
        let facts = parse_schema(&wrap(
            r##"
  <rdfs:Class rdf:about="#UnitSymbol">
    <rdfs:label>UnitSymbol</rdfs:label>
    <cims:stereotype rdf:resource="http://langdale.com.au/2005/UML#enumeration"/>
  </rdfs:Class>
  <rdfs:Class rdf:about="#Float">
    <rdfs:label>Float</rdfs:label>
    <cims:stereotype>Primitive</cims:stereotype>
  </rdfs:Class>
  <rdf:Description rdf:about="#UnitSymbol.V">
    <rdfs:label>V</rdfs:label>
    <rdf:type rdf:resource="#UnitSymbol"/>
  </rdf:Description>
  <cims:ClassCategory rdf:about="#Package_Core">
    <rdfs:label>Core</rdfs:label>
  </cims:ClassCategory>"##,
        ))
        .unwrap();

        assert_eq!(facts.resources[0].kind, ResourceKind::Enumeration);
        assert!(facts.resources[1].is_primitive());
        assert_eq!(
            facts.resources[2].kind,
            ResourceKind::Resource {
                type_name: "UnitSymbol".to_owned()
            }
        );
        assert_eq!(
            facts.resources[3].kind,
            ResourceKind::Resource {
                type_name: "ClassCategory".to_owned()
            }
        );
    }

    #[test]
    fn class_without_label_is_a_syntax_error() {
        let err = parse_schema(&wrap(r##"<rdfs:Class rdf:about="#Terminal"/>"##)).unwrap_err();
        assert!(err.is_syntax(), "{err}");
    }

    #[test]
    fn description_without_type_is_a_syntax_error() {
        let err = parse_schema(&wrap(
            r##"<rdf:Description rdf:about="#Terminal"><rdfs:label>Terminal</rdfs:label></rdf:Description>"##,
        ))
        .unwrap_err();
        assert!(matches!(err, SchemaError::Syntax(ref m) if m.contains("rdf:type")));
    }

    #[test]
    fn malformed_xml_is_a_syntax_error() {
        assert!(parse_schema("<rdf:RDF").unwrap_err().is_syntax());
        assert!(parse_schema("<root/>").unwrap_err().is_syntax());
    }
}
