//! The component registry.
//!
//! An arena owning every component of a diagram, indexed by
//! [`ComponentId`] and looked up by flattened name. Edges elsewhere in
//! the crate store id pairs, never references, so the registry is the
//! single owner even though the wiring graph is cyclic.

use std::collections::HashMap;

use super::types::ComponentId;
use crate::components::Component;
use crate::error::{CircuitError, Result};

/// Owns all simulation components of one diagram.
#[derive(Debug, Default)]
pub struct Registry {
    components: Vec<Component>,
    names: HashMap<String, ComponentId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component. Names must be unique post-flattening;
    /// a duplicate is a construction-time fault.
    pub fn insert(&mut self, component: Component) -> Result<ComponentId> {
        let name = component.name().to_string();
        if self.names.contains_key(&name) {
            return Err(CircuitError::duplicate(name));
        }
        let id = ComponentId(self.components.len());
        self.names.insert(name, id);
        self.components.push(component);
        Ok(id)
    }

    /// Look up a component id by flattened name.
    pub fn id(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }

    /// Look up a component id by name, failing with
    /// [`CircuitError::UnknownComponent`] on a miss.
    pub fn resolve(&self, name: &str) -> Result<ComponentId> {
        self.id(name).ok_or_else(|| CircuitError::unknown(name))
    }

    pub fn get(&self, id: ComponentId) -> &Component {
        &self.components[id.0]
    }

    pub fn get_mut(&mut self, id: ComponentId) -> &mut Component {
        &mut self.components[id.0]
    }

    /// Iterate components in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, c)| (ComponentId(i), c))
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Component, Switch};

    #[test]
    fn test_insert_and_resolve() {
        let mut reg = Registry::new();
        let id = reg
            .insert(Component::Switch(Switch::new("sw".to_string(), false)))
            .unwrap();
        assert_eq!(reg.resolve("sw").unwrap(), id);
        assert_eq!(reg.get(id).name(), "sw");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut reg = Registry::new();
        reg.insert(Component::Switch(Switch::new("sw".to_string(), false)))
            .unwrap();
        let err = reg
            .insert(Component::Switch(Switch::new("sw".to_string(), true)))
            .unwrap_err();
        assert!(matches!(err, CircuitError::DuplicateComponent { .. }));
    }

    #[test]
    fn test_unknown_name() {
        let reg = Registry::new();
        assert!(matches!(
            reg.resolve("nope"),
            Err(CircuitError::UnknownComponent { .. })
        ));
    }
}
