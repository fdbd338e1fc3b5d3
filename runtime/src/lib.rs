//! Typed CIM instances and their RDF/XML documents.
//!
//! A [`Session`] owns instances created against a compiled
//! [`Schema`](cimrdf_schema::Schema). Every write is coerced to the
//! property's kind, and a reference written through a property with an
//! inverse role is mirrored on the target, so both ends of an association
//! stay consistent. Instances are validated against their class on demand
//! and before they are written.
//!
//! # Entry Point
//!
//! ```
//! use cimrdf_runtime::{codec, Document, Session, Value};
//!
//! let schema = std::sync::Arc::new(cimrdf_schema::Schema::compile(r##"
//! <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
//!          xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
//!          xmlns:cims="http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#">
//!   <rdfs:Class rdf:ID="Substation"><rdfs:label>Substation</rdfs:label></rdfs:Class>
//!   <rdf:Property rdf:ID="Substation.name">
//!     <rdfs:label>name</rdfs:label>
//!     <rdfs:domain rdf:resource="#Substation"/>
//!     <cims:dataType rdf:resource="http://www.w3.org/2001/XMLSchema#string"/>
//!   </rdf:Property>
//! </rdf:RDF>"##)?);
//!
//! let mut session = Session::new(schema);
//! let station = session.create("Substation")?;
//! session.set(station, "name", "North")?;
//! let document: Document = [station].into_iter().collect();
//! let text = codec::to_string(&session, &document)?;
//!
//! let mut copy = Session::new(session.schema().clone());
//! let read = codec::from_str(&mut copy, &text)?;
//! let first = read.iter().next().copied().ok_or("empty document")?;
//! assert_eq!(copy.value(first, "name")?, Some(&Value::from("North")));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod codec;
pub mod coerce;
pub mod config;
pub mod document;
pub mod error;
pub mod instance;
pub mod link;
pub mod report;
pub mod session;
mod validate;
pub mod value;

pub use config::RuntimeConfig;
pub use document::Document;
pub use error::{CodecError, RuntimeError, ValidationError};
pub use instance::{Instance, InstanceId, Slot};
pub use report::{Finding, Severity, ValidationReport};
pub use session::Session;
pub use value::Value;
