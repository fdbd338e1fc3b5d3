//! Test-only fixtures for the cimrdf crates.
//!
//! Not published. The schema and runtime integration tests use these as a
//! `[dev-dependencies]` path-dep so every suite compiles the same profile.

#![deny(missing_docs)]

use std::sync::Arc;

use cimrdf_schema::Schema;

/// RDF/XML excerpt of the CIM16 equipment profile: 14 classes (one
/// CIMDatatype), 3 enumerations and 4 primitives, with inverse-role pairs
/// between terminals, connectivity nodes, conducting equipment, base
/// voltages and transformer ends.
pub const CIM16_EQUIPMENT: &str = include_str!("../data/cim16_equipment.rdf");

/// Namespace declared by [`CIM16_EQUIPMENT`].
pub const CIM16_NAMESPACE: &str = "http://iec.ch/TC57/2013/CIM-schema-cim16#";

/// Compiles [`CIM16_EQUIPMENT`].
///
/// # Panics
///
/// Panics if the fixture no longer compiles.
#[must_use]
pub fn cim16_schema() -> Arc<Schema> {
    match Schema::compile(CIM16_EQUIPMENT) {
        Ok(schema) => Arc::new(schema),
        Err(err) => panic!("CIM16 fixture does not compile: {err}"),
    }
}

/// Wraps resource declarations in an `rdf:RDF` root that binds the `rdf`,
/// `rdfs` and `cims` prefixes.
#[must_use]
pub fn schema_document(body: &str) -> String {
    format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:cims="http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#"
         xml:base="http://iec.ch/TC57/2013/CIM-schema-cim16">
{body}
</rdf:RDF>
"##
    )
}
