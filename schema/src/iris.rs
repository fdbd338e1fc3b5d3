//! Namespace and term IRIs of the RDF-Schema vocabulary used by CIM
//! profiles.

/// RDF syntax namespace.
pub const NS_RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// RDF Schema namespace.
pub const NS_RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// IEC TC57 RDF-Schema extensions (`cims:`).
pub const NS_CIMS: &str = "http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#";

/// `rdfs:Class`.
pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
/// `rdf:Property`.
pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";

/// Namespace used to qualify instance tags when the schema declares no
/// `xml:base`.
pub const DEFAULT_CIM_NAMESPACE: &str = "http://iec.ch/TC57/CIM100#";
