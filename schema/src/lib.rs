//! CIM RDF-Schema compiler.
//!
//! The `cimrdf-schema` crate reads an RDF/XML meta-schema (the format IEC
//! CIM profiles are published in) and compiles it into immutable class,
//! property and enumeration descriptors: inheritance is linearized,
//! multiplicities are parsed into bounds, and every class gets its
//! effective property set.
//!
//! # Entry Point
//!
//! ```
//! let schema = cimrdf_schema::Schema::compile(r##"
//! <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
//!          xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
//!          xmlns:cims="http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#">
//!   <rdfs:Class rdf:ID="IdentifiedObject"><rdfs:label>IdentifiedObject</rdfs:label></rdfs:Class>
//!   <rdfs:Class rdf:ID="Terminal">
//!     <rdfs:label>Terminal</rdfs:label>
//!     <rdfs:subClassOf rdf:resource="#IdentifiedObject"/>
//!   </rdfs:Class>
//!   <rdf:Property rdf:ID="IdentifiedObject.name">
//!     <rdfs:label>name</rdfs:label>
//!     <rdfs:domain rdf:resource="#IdentifiedObject"/>
//!     <cims:dataType rdf:resource="http://www.w3.org/2001/XMLSchema#string"/>
//!   </rdf:Property>
//! </rdf:RDF>"##)?;
//! let terminal = schema.class("Terminal").ok_or("missing class")?;
//! assert!(terminal.property("IdentifiedObject.name").is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod compiler;
pub mod error;
pub mod facts;
pub mod iris;
pub mod mapping;
pub mod model;
pub mod multiplicity;
pub mod options;
pub mod parser;

pub use error::SchemaError;
pub use facts::{ResourceFact, ResourceKind, SchemaFacts};
pub use model::{
    ClassDescriptor, EnumLiteral, EnumerationDescriptor, PrimitiveKind, PropertyDescriptor,
    Schema, ValueKind,
};
pub use multiplicity::{parse_multiplicity, Multiplicity, UpperBound};
pub use options::{CompilerOptions, DanglingInverse};

impl Schema {
    /// Parses and compiles a schema document with default options.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the document is malformed or does not
    /// compile; no partial schema is produced.
    pub fn compile(source: &str) -> Result<Schema, SchemaError> {
        Self::compile_with(source, &CompilerOptions::default())
    }

    /// Parses and compiles a schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the document is malformed or does not
    /// compile under `options`.
    pub fn compile_with(source: &str, options: &CompilerOptions) -> Result<Schema, SchemaError> {
        compiler::compile(&parser::parse_schema(source)?, options)
    }

    /// Parses and compiles a UTF-8 schema document read as bytes.
    ///
    /// # Errors
    ///
    /// As [`Schema::compile_with`], plus non-UTF-8 input.
    pub fn compile_bytes(source: &[u8], options: &CompilerOptions) -> Result<Schema, SchemaError> {
        compiler::compile(&parser::parse_schema_bytes(source)?, options)
    }
}
