//! Inverse-role mirroring.
//!
//! Writing a reference through a property that declares a partner also
//! records the reverse link on the target. The mirror is written straight
//! into the partner slot and never triggers a further mirror, which is what
//! keeps the two directions from recursing into each other.

use crate::instance::{Instance, InstanceId, Slot};
use crate::value::Value;

/// What a mirror write did to the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mirror {
    /// The reverse link was recorded.
    Linked,
    /// The partner already referenced the source; nothing changed.
    AlreadyLinked,
    /// A scalar partner referenced another instance and now references
    /// the source. The displaced value is returned; it is not unlinked.
    Replaced(Value),
    /// The target's class has no property with the partner id.
    MissingPartner,
}

/// Records `source` in the `partner` property of `target`.
///
/// Scalar partners take the source (last write wins); list partners gain it
/// unless already present.
pub fn mirror(target: &mut Instance, partner: &str, source: InstanceId) -> Mirror {
    let Some(index) = target.class.effective_properties().get_index_of(partner) else {
        return Mirror::MissingPartner;
    };
    let Some(slot) = target.slots.get_mut(index) else {
        return Mirror::MissingPartner;
    };
    let link = Value::Reference(source);
    match slot {
        Slot::Scalar(current) => match current.replace(link.clone()) {
            None => Mirror::Linked,
            Some(previous) if previous == link => Mirror::AlreadyLinked,
            Some(previous) => Mirror::Replaced(previous),
        },
        Slot::List(values) => {
            if values.contains(&link) {
                Mirror::AlreadyLinked
            } else {
                values.push(link);
                Mirror::Linked
            }
        }
    }
}
