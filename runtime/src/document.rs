//! Documents: the set of instances written to or read from one file.

use indexmap::IndexSet;

use crate::instance::InstanceId;
use crate::session::Session;

/// An ordered, duplicate-free set of instances forming one RDF/XML
/// document. Members keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    base: Option<String>,
    members: IndexSet<InstanceId>,
}

impl Document {
    /// Creates an empty document without a base.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document that writes `base` as its `xml:base`.
    #[must_use]
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
            members: IndexSet::new(),
        }
    }

    /// Base URI, if any.
    #[must_use]
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Replaces the base URI.
    pub fn set_base(&mut self, base: Option<String>) {
        self.base = base;
    }

    /// Adds an instance; returns `false` if it was already a member.
    pub fn add(&mut self, id: InstanceId) -> bool {
        self.members.insert(id)
    }

    /// Adds every root and every instance reachable from them through
    /// reference values. Returns the number of new members.
    pub fn add_recursively(
        &mut self,
        session: &Session,
        roots: impl IntoIterator<Item = InstanceId>,
    ) -> usize {
        let before = self.members.len();
        self.members.extend(session.closure(roots));
        self.members.len() - before
    }

    /// Returns `true` if `id` is a member.
    #[must_use]
    pub fn contains(&self, id: InstanceId) -> bool {
        self.members.contains(&id)
    }

    /// Members in insertion order.
    pub fn iter(&self) -> indexmap::set::Iter<'_, InstanceId> {
        self.members.iter()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the document has no member.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Extend<InstanceId> for Document {
    fn extend<T: IntoIterator<Item = InstanceId>>(&mut self, iter: T) {
        self.members.extend(iter);
    }
}

impl FromIterator<InstanceId> for Document {
    fn from_iter<T: IntoIterator<Item = InstanceId>>(iter: T) -> Self {
        Self {
            base: None,
            members: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a InstanceId;
    type IntoIter = indexmap::set::Iter<'a, InstanceId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cimrdf_test_helpers::cim16_schema;

    #[test]
    fn members_are_unique_and_ordered() {
        let mut session = Session::new(cim16_schema());
        let a = session.create("Breaker").unwrap();
        let b = session.create("Breaker").unwrap();
        let mut document = Document::new();
        assert!(document.add(b));
        assert!(document.add(a));
        assert!(!document.add(b));
        assert_eq!(document.iter().copied().collect::<Vec<_>>(), vec![b, a]);
    }

    #[test]
    fn recursive_add_pulls_in_the_reachable_graph() {
        let mut session = Session::new(cim16_schema());
        let node = session.create("ConnectivityNode").unwrap();
        let terminals: Vec<_> = (0..2).map(|_| session.create("Terminal").unwrap()).collect();
        for terminal in &terminals {
            session.set(*terminal, "ConnectivityNode", node).unwrap();
        }
        let unrelated = session.create("ConnectivityNode").unwrap();

        let mut document = Document::with_base("http://example.com/grid");
        assert_eq!(document.add_recursively(&session, [terminals[1]]), 3);
        assert_eq!(document.add_recursively(&session, [node]), 0);
        assert!(document.contains(terminals[0]));
        assert!(!document.contains(unrelated));
        assert_eq!(document.base(), Some("http://example.com/grid"));
    }
}
