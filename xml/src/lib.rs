//! XML subset reader for CIM RDF documents.
//!
//! `cimrdf-xml` parses the XML dialect used by RDF/XML schema files and
//! instance documents into a small element tree whose names are already
//! resolved against their namespace declarations. It also provides the
//! escaping helpers the instance writer needs.
//!
//! # Entry Point
//!
//! ```
//! let root = cimrdf_xml::parse(
//!     r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"/>"#,
//! )?;
//! assert!(root.is("http://www.w3.org/1999/02/22-rdf-syntax-ns#", "RDF"));
//! # Ok::<(), cimrdf_xml::XmlError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

mod error;
mod escape;
mod grammar;
mod reader;
mod tree;

pub use error::XmlError;
pub use escape::{escape_attribute, escape_text};
pub use reader::{parse, parse_bytes};
pub use tree::{Attribute, Element, Node, QName};

/// Namespace permanently bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
