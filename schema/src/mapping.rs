//! Name and datatype mapping tables.
//!
//! Deterministic mappings from schema resource references to local names
//! and from datatype names to primitive kinds.

use crate::model::PrimitiveKind;

/// Extracts the local name from a full IRI (after the last `/` or `#`).
#[must_use]
pub fn local_name(iri: &str) -> &str {
    let after_slash = iri.rsplit('/').next().unwrap_or(iri);
    after_slash.rsplit('#').next().unwrap_or(after_slash)
}

/// Extracts the multiplicity expression from a `cims:multiplicity`
/// resource such as `http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#M:0..n`.
#[must_use]
pub fn multiplicity_expression(resource: &str) -> &str {
    match resource.split_once("#M:") {
        Some((_, expression)) => expression,
        None => {
            let local = local_name(resource);
            local.strip_prefix("M:").unwrap_or(local)
        }
    }
}

/// Maps a datatype name to its primitive kind, case-insensitively.
///
/// CIM date and time primitives are carried as strings.
#[must_use]
pub fn builtin_primitive(name: &str) -> Option<PrimitiveKind> {
    match name.to_ascii_lowercase().as_str() {
        "string" | "date" | "datetime" | "time" | "monthday" | "duration" | "uri" | "anyuri"
        | "iri" | "stringiri" | "uuid" => Some(PrimitiveKind::String),
        "integer" | "int" | "long" | "short" => Some(PrimitiveKind::Integer),
        "float" | "double" | "decimal" => Some(PrimitiveKind::Float),
        "boolean" | "bool" => Some(PrimitiveKind::Boolean),
        _ => None,
    }
}

/// Normalizes an `xml:base` value into a namespace ending with `#`.
#[must_use]
pub fn normalize_namespace(base: &str) -> String {
    format!("{}#", base.trim().trim_end_matches('#'))
}
