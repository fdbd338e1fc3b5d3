use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use cimrdf_schema::iris::NS_RDF;
use cimrdf_schema::mapping::local_name;
use cimrdf_schema::{PrimitiveKind, ValueKind};
use cimrdf_xml::{Element, XML_NAMESPACE};
use tracing::{debug, info, warn};

use super::normalize_uri;
use crate::document::Document;
use crate::error::{CodecError, RuntimeError};
use crate::instance::InstanceId;
use crate::session::Session;
use crate::value::Value;

/// Reads an instance document from `reader` into `session`.
///
/// # Errors
///
/// As [`from_slice`], plus [`CodecError::Io`].
pub fn read_document<R: Read>(
    session: &mut Session,
    mut reader: R,
) -> Result<Document, CodecError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    from_slice(session, &bytes)
}

/// Reads a UTF-8 instance document into `session`.
///
/// # Errors
///
/// As [`from_str`], plus [`CodecError::Xml`] for invalid UTF-8.
pub fn from_slice(session: &mut Session, bytes: &[u8]) -> Result<Document, CodecError> {
    let root = cimrdf_xml::parse_bytes(bytes)?;
    import(session, &root)
}

/// Reads an instance document into `session` and returns its members in
/// document order.
///
/// The import is all-or-nothing: on any error every instance it created is
/// dropped again and the session is as before the call.
///
/// # Errors
///
/// Returns [`CodecError::Xml`] for ill-formed XML, [`CodecError::Malformed`]
/// for a document that is not `rdf:RDF` or describes one identity with two
/// classes, [`CodecError::UnresolvedReference`] for a reference to an
/// identity the document does not contain, and [`CodecError::Runtime`] for
/// unknown classes, unknown properties, identities already in the session,
/// and values that do not coerce. Class and property tags must lie in the
/// schema namespace, and property tags must carry the qualified id
/// (`Terminal.ConnectivityNode`).
pub fn from_str(session: &mut Session, text: &str) -> Result<Document, CodecError> {
    let root = cimrdf_xml::parse(text)?;
    import(session, &root)
}

fn import(session: &mut Session, root: &Element) -> Result<Document, CodecError> {
    let checkpoint = session.checkpoint();
    match Import::new(root).run(session) {
        Ok(document) => {
            info!(instances = document.len(), "imported instance document");
            Ok(document)
        }
        Err(err) => {
            warn!(error = %err, "import failed; discarding {} instances", session.len() - checkpoint);
            session.rollback(checkpoint);
            Err(err)
        }
    }
}

/// State of one import: the document base and the identities constructed in
/// the first pass.
struct Import<'a> {
    root: &'a Element,
    base: Option<&'a str>,
    identities: HashMap<String, InstanceId>,
}

impl<'a> Import<'a> {
    fn new(root: &'a Element) -> Self {
        Self {
            root,
            base: root.attribute(Some(XML_NAMESPACE), "base"),
            identities: HashMap::new(),
        }
    }

    fn run(mut self, session: &mut Session) -> Result<Document, CodecError> {
        let root = self.root;
        if !root.is(NS_RDF, "RDF") {
            return Err(CodecError::Malformed(format!(
                "root element is {}, expected rdf:RDF",
                root.name.qualified()
            )));
        }
        let mut document = Document::new();
        document.set_base(self.base.map(str::to_owned));

        let mut described = Vec::new();
        for element in root.elements() {
            let id = self.construct(session, element)?;
            document.add(id);
            described.push((id, element));
        }
        debug!(instances = document.len(), "constructed instances");

        for (id, element) in described {
            for child in element.elements().filter(|child| !child.is(NS_RDF, "type")) {
                self.assign(session, id, child)?;
            }
        }
        Ok(document)
    }

    /// First pass: creates the instance an element describes, or returns the
    /// one an earlier element with the same identity created.
    fn construct(
        &mut self,
        session: &mut Session,
        element: &Element,
    ) -> Result<InstanceId, CodecError> {
        let class = class_of(element, session.schema().namespace())?;
        let uri = match element.attribute(Some(NS_RDF), "ID") {
            Some(id) => format!("#{id}"),
            None => match element.attribute(Some(NS_RDF), "about") {
                Some(about) => normalize_uri(about, self.base),
                None => session.fresh_uri(),
            },
        };
        if let Some(&existing) = self.identities.get(&uri) {
            let known = session
                .instance(existing)
                .map(|instance| instance.class_name())
                .unwrap_or_default();
            if known != class {
                return Err(CodecError::Malformed(format!(
                    "`{uri}` is described as both {known} and {class}"
                )));
            }
            return Ok(existing);
        }
        let id = session.create_with_uri(class, uri.clone())?;
        self.identities.insert(uri, id);
        Ok(id)
    }

    /// Second pass: writes one property element through the session.
    fn assign(
        &self,
        session: &mut Session,
        id: InstanceId,
        child: &Element,
    ) -> Result<(), CodecError> {
        let Some(instance) = session.instance(id) else {
            return Err(RuntimeError::UnknownInstance(id).into());
        };
        let class = Arc::clone(instance.class());
        let owner = instance.uri().to_owned();
        let unknown = || RuntimeError::UnknownProperty {
            class: class.name.clone(),
            property: child.name.qualified(),
        };
        if child.name.namespace.as_deref() != Some(session.schema().namespace()) {
            return Err(unknown().into());
        }
        let property = class.property(&child.name.local).ok_or_else(unknown)?;
        let resource = child.attribute(Some(NS_RDF), "resource");
        let value = match (property.kind, resource) {
            (ValueKind::Complex, Some(resource)) => {
                let target = normalize_uri(resource, self.base);
                match self.identities.get(&target) {
                    Some(&target) => Value::Reference(target),
                    None => {
                        return Err(CodecError::UnresolvedReference {
                            owner,
                            property: property.id.clone(),
                            target,
                        })
                    }
                }
            }
            (ValueKind::Enumeration, Some(resource)) => Value::Enum(local_name(resource).to_owned()),
            (ValueKind::Primitive(_), Some(resource)) => Value::String(resource.to_owned()),
            (ValueKind::Primitive(PrimitiveKind::String), None) => Value::String(child.text()),
            // Literal text in a complex slot is kept; validation reports it.
            (_, None) => Value::String(child.text().trim().to_owned()),
        };
        session.apply(id, &property.id, value)?;
        Ok(())
    }
}

/// Class name of a top-level element: its tag, or the `rdf:type` of an
/// `rdf:Description`. Either must lie in the schema namespace.
fn class_of<'e>(element: &'e Element, namespace: &str) -> Result<&'e str, CodecError> {
    if !element.is(NS_RDF, "Description") {
        if element.name.namespace.as_deref() != Some(namespace) {
            return Err(RuntimeError::UnknownClass(element.name.qualified()).into());
        }
        return Ok(&element.name.local);
    }
    let ty = element
        .child(NS_RDF, "type")
        .and_then(|ty| ty.attribute(Some(NS_RDF), "resource"))
        .ok_or_else(|| CodecError::Malformed("rdf:Description without rdf:type".to_owned()))?;
    ty.strip_prefix(namespace)
        .ok_or_else(|| RuntimeError::UnknownClass(ty.to_owned()).into())
}
