//! Script instance registry: which entity is driven by which instance.
//!
//! The registry is written only by the runtime, when scripts are created
//! and destroyed. Scripts read it through casting, where a miss is normal.

use std::collections::BTreeMap;

use engine_component::EntityId;
use engine_script::ScriptInstance;

/// At most one script instance per entity.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: BTreeMap<EntityId, ScriptInstance>,
}

impl InstanceRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance under its entity id, returning any instance it
    /// displaced.
    pub fn insert(&mut self, instance: ScriptInstance) -> Option<ScriptInstance> {
        self.instances.insert(instance.id(), instance)
    }

    /// Remove the instance for an entity.
    pub fn remove(&mut self, id: EntityId) -> Option<ScriptInstance> {
        self.instances.remove(&id)
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.instances.contains_key(&id)
    }

    /// Returns a shared reference to the instance for an entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<ScriptInstance> {
        self.instances.get(&id).cloned()
    }

    /// Returns an iterator over all registered instances.
    pub fn iter(&self) -> impl Iterator<Item = &ScriptInstance> {
        self.instances.values()
    }

    /// Remove and return every instance.
    pub fn drain(&mut self) -> Vec<ScriptInstance> {
        std::mem::take(&mut self.instances).into_values().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use engine_script::{Behavior, EntityHandle};

    use super::*;
    use crate::host::SceneHost;

    struct Noop;

    impl Behavior for Noop {}

    fn instance(host: &Rc<SceneHost>, id: u64) -> ScriptInstance {
        ScriptInstance::new(
            "Noop",
            EntityHandle::new(EntityId(id), host.clone()),
            Box::new(Noop),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let host = SceneHost::new();
        let mut registry = InstanceRegistry::new();
        let a = instance(&host, 1);
        assert!(registry.insert(a.clone()).is_none());
        assert!(registry.contains(EntityId(1)));
        assert!(registry.get(EntityId(1)).unwrap().ptr_eq(&a));
        assert!(registry.get(EntityId(2)).is_none());
    }

    #[test]
    fn test_one_instance_per_entity() {
        let host = SceneHost::new();
        let mut registry = InstanceRegistry::new();
        let first = instance(&host, 1);
        registry.insert(first.clone());
        let displaced = registry.insert(instance(&host, 1)).unwrap();
        assert!(displaced.ptr_eq(&first));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_and_drain() {
        let host = SceneHost::new();
        let mut registry = InstanceRegistry::new();
        registry.insert(instance(&host, 1));
        registry.insert(instance(&host, 2));
        assert!(registry.remove(EntityId(1)).is_some());
        assert!(registry.remove(EntityId(1)).is_none());
        assert_eq!(registry.drain().len(), 1);
        assert!(registry.is_empty());
    }
}
