//! Parse-tree walk: builds [`Element`]s and resolves namespace prefixes.

use pest::iterators::Pair;
use pest::Parser;

use crate::escape::unescape;
use crate::grammar::{Rule, XmlGrammar};
use crate::tree::{Attribute, Element, Node, QName};
use crate::{XmlError, XML_NAMESPACE};

/// Parses an XML document and returns its root element.
///
/// # Errors
///
/// Returns [`XmlError`] on grammar violations, mismatched end tags, unknown
/// entities or unbound namespace prefixes.
pub fn parse(input: &str) -> Result<Element, XmlError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let document = XmlGrammar::parse(Rule::document, input)?
        .next()
        .ok_or(XmlError::Internal("empty parse"))?;
    let root = document
        .into_inner()
        .find(|pair| pair.as_rule() == Rule::element)
        .ok_or(XmlError::Internal("document without root element"))?;
    let mut scope = Scope::default();
    build_element(root, &mut scope)
}

/// Parses an XML document from raw bytes, which must be UTF-8.
///
/// # Errors
///
/// Returns [`XmlError::Encoding`] for non-UTF-8 input and otherwise the
/// errors of [`parse`].
pub fn parse_bytes(input: &[u8]) -> Result<Element, XmlError> {
    parse(std::str::from_utf8(input)?)
}

/// Namespace bindings in scope, innermost last.
#[derive(Default)]
struct Scope {
    bindings: Vec<(Option<String>, String)>,
}

impl Scope {
    fn lookup(&self, prefix: Option<&str>) -> Option<&str> {
        if prefix == Some("xml") {
            return Some(XML_NAMESPACE);
        }
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound.as_deref() == prefix)
            .map(|(_, uri)| uri.as_str())
            .filter(|uri| !uri.is_empty())
    }

    fn resolve(&self, raw: &str, is_attribute: bool) -> Result<QName, XmlError> {
        match raw.split_once(':') {
            Some((prefix, local)) => {
                let namespace = self
                    .lookup(Some(prefix))
                    .ok_or_else(|| XmlError::UnboundPrefix(prefix.to_owned()))?;
                Ok(QName {
                    namespace: Some(namespace.to_owned()),
                    prefix: Some(prefix.to_owned()),
                    local: local.to_owned(),
                })
            }
            None => Ok(QName {
                namespace: if is_attribute {
                    None
                } else {
                    self.lookup(None).map(str::to_owned)
                },
                prefix: None,
                local: raw.to_owned(),
            }),
        }
    }
}

fn build_element(pair: Pair<'_, Rule>, scope: &mut Scope) -> Result<Element, XmlError> {
    let mut inner = pair.into_inner();
    let tag = inner.next().ok_or(XmlError::Internal("element without tag"))?;
    let mut tag_parts = tag.into_inner();
    let raw_name = tag_parts
        .next()
        .ok_or(XmlError::Internal("tag without name"))?
        .as_str();

    let mark = scope.bindings.len();
    let mut raw_attributes = Vec::new();
    for attribute in tag_parts {
        let mut parts = attribute.into_inner();
        let name = parts
            .next()
            .ok_or(XmlError::Internal("attribute without name"))?
            .as_str();
        let value = unescape(parts.next().map_or("", |v| v.as_str()))?.into_owned();
        if name == "xmlns" {
            scope.bindings.push((None, value));
        } else if let Some(prefix) = name.strip_prefix("xmlns:") {
            scope.bindings.push((Some(prefix.to_owned()), value));
        } else {
            raw_attributes.push((name, value));
        }
    }

    let name = scope.resolve(raw_name, false)?;
    let attributes = raw_attributes
        .into_iter()
        .map(|(raw, value)| {
            Ok(Attribute {
                name: scope.resolve(raw, true)?,
                value,
            })
        })
        .collect::<Result<Vec<_>, XmlError>>()?;

    let mut children = Vec::new();
    if let Some(content) = inner.next() {
        for node in content.into_inner() {
            match node.as_rule() {
                Rule::element => children.push(Node::Element(build_element(node, scope)?)),
                Rule::text => children.push(Node::Text(unescape(node.as_str())?.into_owned())),
                Rule::cdata => children.push(Node::Text(
                    node.into_inner()
                        .next()
                        .map_or_else(String::new, |text| text.as_str().to_owned()),
                )),
                _ => {}
            }
        }
        let end = inner
            .next()
            .and_then(|end| end.into_inner().next())
            .ok_or(XmlError::Internal("element without end tag"))?
            .as_str();
        if end != raw_name {
            return Err(XmlError::MismatchedTag {
                expected: raw_name.to_owned(),
                found: end.to_owned(),
            });
        }
    }
    scope.bindings.truncate(mark);

    Ok(Element {
        name,
        attributes,
        children,
    })
}
