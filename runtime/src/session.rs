//! The instance arena and its write contract.

use std::collections::HashMap;
use std::sync::Arc;

use cimrdf_schema::{PropertyDescriptor, Schema};
use indexmap::IndexSet;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::coerce::coerce;
use crate::config::RuntimeConfig;
use crate::error::{RuntimeError, ValidationError};
use crate::instance::{Instance, InstanceId, Slot};
use crate::link::{mirror, Mirror};
use crate::validate;
use crate::value::Value;

/// Owns every instance created against one compiled schema.
///
/// Instances reference each other through [`InstanceId`] handles, so
/// cyclic object graphs need no shared ownership. Identities are unique
/// within a session.
#[derive(Debug, Clone)]
pub struct Session {
    schema: Arc<Schema>,
    config: RuntimeConfig,
    instances: Vec<Instance>,
    by_uri: HashMap<String, InstanceId>,
}

impl Session {
    /// Creates an empty session with default settings.
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_config(schema, RuntimeConfig::default())
    }

    /// Creates an empty session.
    #[must_use]
    pub fn with_config(schema: Arc<Schema>, config: RuntimeConfig) -> Self {
        Self {
            schema,
            config,
            instances: Vec::new(),
            by_uri: HashMap::new(),
        }
    }

    /// The schema instances are typed against.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Session settings.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` if no instance exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Every instance in creation order.
    pub fn instances(&self) -> impl Iterator<Item = (InstanceId, &Instance)> {
        self.instances
            .iter()
            .enumerate()
            .map(|(index, instance)| (InstanceId(index), instance))
    }

    /// Generates an identity of the form `#<id_prefix><uuid>`.
    #[must_use]
    pub fn fresh_uri(&self) -> String {
        format!("#{}{}", self.config.id_prefix, Uuid::new_v4())
    }

    /// Creates an instance of `class` with a fresh identity and every
    /// property absent or empty.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::UnknownClass`] if the schema has no such
    /// class.
    pub fn create(&mut self, class: &str) -> Result<InstanceId, RuntimeError> {
        let uri = self.fresh_uri();
        self.create_with_uri(class, uri)
    }

    /// Creates an instance of `class` with the given identity.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::UnknownClass`] for a class outside the schema
    /// and [`RuntimeError::DuplicateIdentity`] if `uri` is taken.
    pub fn create_with_uri(
        &mut self,
        class: &str,
        uri: impl Into<String>,
    ) -> Result<InstanceId, RuntimeError> {
        let uri = uri.into();
        let descriptor = self
            .schema
            .class(class)
            .ok_or_else(|| RuntimeError::UnknownClass(class.to_owned()))?;
        if self.by_uri.contains_key(&uri) {
            return Err(RuntimeError::DuplicateIdentity(uri));
        }
        let id = InstanceId(self.instances.len());
        trace!(%id, class, uri = %uri, "created instance");
        self.instances
            .push(Instance::new(Arc::clone(descriptor), uri.clone()));
        self.by_uri.insert(uri, id);
        Ok(id)
    }

    /// Looks an instance up by identity.
    #[must_use]
    pub fn find(&self, uri: &str) -> Option<InstanceId> {
        self.by_uri.get(uri).copied()
    }

    /// Returns the instance behind a handle.
    #[must_use]
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(id.0)
    }

    /// Returns the slot of a property addressed by id or unique label.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::UnknownInstance`] or
    /// [`RuntimeError::UnknownProperty`].
    pub fn get(&self, id: InstanceId, property: &str) -> Result<&Slot, RuntimeError> {
        let (index, _) = self.locate(id, property)?;
        self.instances
            .get(id.0)
            .and_then(|instance| instance.slots.get(index))
            .ok_or(RuntimeError::UnknownInstance(id))
    }

    /// Returns the value of a scalar property, `None` when absent.
    ///
    /// # Errors
    ///
    /// As [`Session::get`], plus [`RuntimeError::NotScalar`] for list
    /// properties.
    pub fn value(&self, id: InstanceId, property: &str) -> Result<Option<&Value>, RuntimeError> {
        match self.get(id, property)? {
            Slot::Scalar(value) => Ok(value.as_ref()),
            Slot::List(_) => Err(RuntimeError::NotScalar(property.to_owned())),
        }
    }

    /// Returns every stored value of a property.
    ///
    /// # Errors
    ///
    /// As [`Session::get`].
    pub fn values(&self, id: InstanceId, property: &str) -> Result<&[Value], RuntimeError> {
        self.get(id, property).map(Slot::values)
    }

    /// Sets a scalar property.
    ///
    /// The value is coerced to the property's kind first. Writing the value
    /// already stored changes nothing; otherwise a reference through a
    /// property with a partner is mirrored on the target.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::NotScalar`] for list properties and
    /// [`RuntimeError::InvalidValue`] if coercion fails; the instance is
    /// unchanged in both cases.
    pub fn set(
        &mut self,
        id: InstanceId,
        property: &str,
        value: impl Into<Value>,
    ) -> Result<(), RuntimeError> {
        let (index, descriptor) = self.locate(id, property)?;
        if descriptor.is_list() {
            return Err(RuntimeError::NotScalar(descriptor.id.clone()));
        }
        let value = coerce(&self.schema, &descriptor, value.into())?;
        self.store_scalar(id, index, &descriptor, value);
        Ok(())
    }

    /// Makes a scalar property absent or a list property empty. Partners
    /// keep any link that was mirrored earlier.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::UnknownInstance`] or
    /// [`RuntimeError::UnknownProperty`].
    pub fn clear(&mut self, id: InstanceId, property: &str) -> Result<(), RuntimeError> {
        let (index, _) = self.locate(id, property)?;
        if let Some(slot) = self.slot_mut(id, index) {
            match slot {
                Slot::Scalar(value) => *value = None,
                Slot::List(values) => values.clear(),
            }
        }
        Ok(())
    }

    /// Appends to a list property unless the value is already present.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::NotList`] for scalar properties and
    /// [`RuntimeError::InvalidValue`] if coercion fails.
    pub fn add(
        &mut self,
        id: InstanceId,
        property: &str,
        value: impl Into<Value>,
    ) -> Result<(), RuntimeError> {
        let (index, descriptor) = self.locate(id, property)?;
        if !descriptor.is_list() {
            return Err(RuntimeError::NotList(descriptor.id.clone()));
        }
        let value = coerce(&self.schema, &descriptor, value.into())?;
        self.store_element(id, index, &descriptor, value);
        Ok(())
    }

    /// Replaces the contents of a list property, adding each value in turn.
    ///
    /// # Errors
    ///
    /// As [`Session::add`]. Every value is coerced before the list is
    /// touched, so a rejected element leaves the old contents in place.
    pub fn replace_all<I, V>(
        &mut self,
        id: InstanceId,
        property: &str,
        values: I,
    ) -> Result<(), RuntimeError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let (index, descriptor) = self.locate(id, property)?;
        if !descriptor.is_list() {
            return Err(RuntimeError::NotList(descriptor.id.clone()));
        }
        let values = values
            .into_iter()
            .map(|value| coerce(&self.schema, &descriptor, value.into()))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(Slot::List(current)) = self.slot_mut(id, index) {
            current.clear();
        }
        for value in values {
            self.store_element(id, index, &descriptor, value);
        }
        Ok(())
    }

    /// Writes one value through whichever operation the property's
    /// multiplicity calls for: [`Session::add`] for lists, [`Session::set`]
    /// otherwise.
    ///
    /// # Errors
    ///
    /// As [`Session::set`] and [`Session::add`].
    pub fn apply(&mut self, id: InstanceId, property: &str, value: Value) -> Result<(), RuntimeError> {
        let (_, descriptor) = self.locate(id, property)?;
        if descriptor.is_list() {
            self.add(id, &descriptor.id, value)
        } else {
            self.set(id, &descriptor.id, value)
        }
    }

    /// Checks an instance against its class and returns the first
    /// violation. Never mutates.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] in declaration order.
    pub fn validate(&self, id: InstanceId) -> Result<(), ValidationError> {
        match self.violations(id).into_iter().next() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }

    /// Every violation of an instance, in declaration order. Empty for
    /// unknown handles.
    #[must_use]
    pub fn violations(&self, id: InstanceId) -> Vec<ValidationError> {
        self.instance(id)
            .map(|instance| validate::violations(self, instance))
            .unwrap_or_default()
    }

    /// The roots plus every instance transitively reachable from them
    /// through reference values, each once, in depth-first preorder.
    /// Terminates on cycles.
    #[must_use]
    pub fn closure(&self, roots: impl IntoIterator<Item = InstanceId>) -> IndexSet<InstanceId> {
        let mut reached = IndexSet::new();
        let mut pending: Vec<InstanceId> = roots.into_iter().collect();
        pending.reverse();
        while let Some(id) = pending.pop() {
            let Some(instance) = self.instance(id) else {
                continue;
            };
            if !reached.insert(id) {
                continue;
            }
            let children: Vec<InstanceId> = instance.references().collect();
            pending.extend(children.into_iter().rev());
        }
        reached
    }

    /// Number of instances, for rolling an import back.
    pub(crate) fn checkpoint(&self) -> usize {
        self.instances.len()
    }

    /// Drops every instance created since `checkpoint`.
    pub(crate) fn rollback(&mut self, checkpoint: usize) {
        for instance in self.instances.drain(checkpoint..) {
            self.by_uri.remove(&instance.uri);
        }
    }

    fn locate(
        &self,
        id: InstanceId,
        property: &str,
    ) -> Result<(usize, Arc<PropertyDescriptor>), RuntimeError> {
        let instance = self.instance(id).ok_or(RuntimeError::UnknownInstance(id))?;
        let (index, descriptor) = instance.class.resolve_property(property).ok_or_else(|| {
            RuntimeError::UnknownProperty {
                class: instance.class.name.clone(),
                property: property.to_owned(),
            }
        })?;
        Ok((index, Arc::clone(descriptor)))
    }

    fn slot_mut(&mut self, id: InstanceId, index: usize) -> Option<&mut Slot> {
        self.instances
            .get_mut(id.0)
            .and_then(|instance| instance.slots.get_mut(index))
    }

    fn store_scalar(
        &mut self,
        id: InstanceId,
        index: usize,
        descriptor: &PropertyDescriptor,
        value: Value,
    ) {
        let Some(Slot::Scalar(current)) = self.slot_mut(id, index) else {
            return;
        };
        if current.as_ref() == Some(&value) {
            return;
        }
        *current = Some(value.clone());
        self.reflect(id, descriptor, &value);
    }

    fn store_element(
        &mut self,
        id: InstanceId,
        index: usize,
        descriptor: &PropertyDescriptor,
        value: Value,
    ) {
        let Some(Slot::List(current)) = self.slot_mut(id, index) else {
            return;
        };
        if current.contains(&value) {
            return;
        }
        current.push(value.clone());
        self.reflect(id, descriptor, &value);
    }

    fn reflect(&mut self, source: InstanceId, descriptor: &PropertyDescriptor, value: &Value) {
        let (Some(partner), Some(target_id)) = (&descriptor.inverse, value.as_reference()) else {
            return;
        };
        let Some(target) = self.instances.get_mut(target_id.0) else {
            warn!(%source, target = %target_id, property = %descriptor.id, "reference to unknown instance; link not mirrored");
            return;
        };
        match mirror(target, partner, source) {
            Mirror::Linked | Mirror::AlreadyLinked => {}
            Mirror::Replaced(previous) => debug!(
                target = %target.uri,
                partner = %partner,
                %previous,
                "partner reassigned; previous link left in place"
            ),
            Mirror::MissingPartner => warn!(
                target = %target.uri,
                class = %target.class.name,
                partner = %partner,
                "target class has no partner property; link not mirrored"
            ),
        }
    }
}
