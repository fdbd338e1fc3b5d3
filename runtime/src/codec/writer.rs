use std::io::Write;

use cimrdf_schema::iris::NS_RDF;
use cimrdf_xml::{escape_attribute, escape_text};
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::{CodecError, RuntimeError};
use crate::instance::InstanceId;
use crate::session::Session;
use crate::value::Value;

/// Serializes `document` to an RDF/XML string.
///
/// Every member is validated before anything is produced. References to
/// instances outside the document are written and logged as warnings.
///
/// # Errors
///
/// Returns [`CodecError::Validation`] for the first member that fails
/// validation and [`CodecError::Runtime`] for handles foreign to
/// `session`.
pub fn to_string(session: &Session, document: &Document) -> Result<String, CodecError> {
    for id in document {
        if session.instance(*id).is_none() {
            return Err(RuntimeError::UnknownInstance(*id).into());
        }
        session.validate(*id)?;
    }

    let prefix = session.config().namespace_prefix.as_str();
    let mut out = String::with_capacity(256 * (document.len() + 1));
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<rdf:RDF xmlns:rdf=\"{NS_RDF}\" xmlns:{prefix}=\"{}\"",
        escape_attribute(session.schema().namespace())
    ));
    let base = document
        .base()
        .or(session.config().document_base.as_deref());
    if let Some(base) = base {
        out.push_str(&format!(" xml:base=\"{}\"", escape_attribute(base)));
    }
    out.push_str(">\n");
    for id in document {
        write_instance(&mut out, session, document, *id, prefix);
    }
    out.push_str("</rdf:RDF>\n");
    debug!(members = document.len(), bytes = out.len(), "serialized document");
    Ok(out)
}

/// Serializes `document` into `writer`. Nothing is written unless the whole
/// document serializes.
///
/// # Errors
///
/// As [`to_string`], plus [`CodecError::Io`].
pub fn write_document<W: Write>(
    session: &Session,
    document: &Document,
    mut writer: W,
) -> Result<(), CodecError> {
    let text = to_string(session, document)?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn write_instance(
    out: &mut String,
    session: &Session,
    document: &Document,
    id: InstanceId,
    prefix: &str,
) {
    let Some(instance) = session.instance(id) else {
        return;
    };
    let class = instance.class_name();
    out.push_str(&format!(
        "  <{prefix}:{class} rdf:about=\"{}\">\n",
        escape_attribute(instance.uri())
    ));
    for (property, slot) in instance.slots() {
        let tag = format!("{prefix}:{}", property.id);
        for value in slot.values() {
            match value {
                Value::Reference(target) => {
                    let Some(referenced) = session.instance(*target) else {
                        continue;
                    };
                    if !document.contains(*target) {
                        warn!(
                            owner = instance.uri(),
                            property = %property.id,
                            target = referenced.uri(),
                            "reference leaves the document"
                        );
                    }
                    out.push_str(&format!(
                        "    <{tag} rdf:resource=\"{}\"/>\n",
                        escape_attribute(referenced.uri())
                    ));
                }
                literal => {
                    let text = literal.literal().unwrap_or_default();
                    out.push_str(&format!("    <{tag}>{}</{tag}>\n", escape_text(&text)));
                }
            }
        }
    }
    out.push_str(&format!("  </{prefix}:{class}>\n"));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::RuntimeConfig;
    use cimrdf_test_helpers::{cim16_schema, CIM16_NAMESPACE};

    #[test]
    fn members_are_written_with_their_properties() {
        let mut session = Session::new(cim16_schema());
        let breaker = session.create_with_uri("Breaker", "#cb1").unwrap();
        session.set(breaker, "normalOpen", false).unwrap();
        session.set(breaker, "name", "Feeder <1> & co").unwrap();
        let document: Document = [breaker].into_iter().collect();

        let text = to_string(&session, &document).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(text.contains(&format!("xmlns:cim=\"{CIM16_NAMESPACE}\"")));
        assert!(!text.contains("xml:base"));
        assert!(text.contains("<cim:Breaker rdf:about=\"#cb1\">"));
        assert!(text.contains("<cim:Switch.normalOpen>false</cim:Switch.normalOpen>"));
        assert!(text.contains(
            "<cim:IdentifiedObject.name>Feeder &lt;1&gt; &amp; co</cim:IdentifiedObject.name>"
        ));
        assert!(!text.contains("mRID"));
    }

    #[test]
    fn invalid_members_abort_without_output() {
        let mut session = Session::new(cim16_schema());
        let breaker = session.create("Breaker").unwrap();
        let document: Document = [breaker].into_iter().collect();
        let mut sink = Vec::new();
        assert!(matches!(
            write_document(&session, &document, &mut sink),
            Err(CodecError::Validation(_))
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn configured_prefix_and_base_are_used() {
        let config = RuntimeConfig {
            namespace_prefix: "cim16".into(),
            document_base: Some("http://example.com/grid".into()),
            ..RuntimeConfig::default()
        };
        let mut session = Session::with_config(cim16_schema(), config);
        let node = session.create_with_uri("ConnectivityNode", "#n1").unwrap();
        let text = to_string(&session, &[node].into_iter().collect()).unwrap();
        assert!(text.contains("xmlns:cim16="));
        assert!(text.contains(" xml:base=\"http://example.com/grid\">"));
        assert!(text.contains("<cim16:ConnectivityNode rdf:about=\"#n1\">"));
    }
}
