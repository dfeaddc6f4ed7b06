//! Name lookup.

use std::rc::Rc;

use crate::cast::{self, ScriptRef};
use crate::handle::EntityHandle;
use crate::host::{EngineHost, Severity};

/// Resolves entities by display name through the host.
#[derive(Clone)]
pub struct EntityResolver {
    host: Rc<dyn EngineHost>,
}

impl EntityResolver {
    #[must_use]
    pub fn new(host: Rc<dyn EngineHost>) -> Self {
        Self { host }
    }

    /// Find an entity by exact, case-sensitive display name.
    ///
    /// When several entities share the name the host decides which one is
    /// returned. Logs an error diagnostic and returns `None` if nothing
    /// matches.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<EntityHandle> {
        let id = self.host.resolve_entity_by_name(name);
        if id.is_null() {
            self.host.log_diagnostic(
                Severity::Error,
                &format!("FindEntityByName: no entity named '{name}'"),
            );
            return None;
        }
        Some(EntityHandle::new(id, Rc::clone(&self.host)))
    }

    /// [`EntityResolver::find_by_name`] followed by a cast to the entity's
    /// script instance. A failed lookup logs once, from the name lookup.
    #[must_use]
    pub fn find_by_name_as_script_instance(&self, name: &str) -> Option<ScriptRef> {
        self.find_by_name(name)
            .map(|handle| cast::as_script_instance(&handle))
    }
}

impl std::fmt::Debug for EntityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use engine_component::EntityId;

    use super::*;
    use crate::instance::{Behavior, ScriptInstance};
    use crate::testing::FakeHost;

    struct Player;

    impl Behavior for Player {}

    #[test]
    fn test_find_by_name() {
        let fake = FakeHost::new();
        fake.spawn(EntityId(1), "Camera");
        fake.spawn(EntityId(2), "Player");
        let resolver = EntityResolver::new(fake.clone());

        let found = resolver.find_by_name("Player").unwrap();
        assert_eq!(found.id(), EntityId(2));
        assert!(fake.diagnostics().is_empty());
    }

    #[test]
    fn test_find_by_name_is_case_sensitive() {
        let fake = FakeHost::new();
        fake.spawn(EntityId(2), "Player");
        let resolver = EntityResolver::new(fake.clone());
        assert!(resolver.find_by_name("player").is_none());
        assert_eq!(fake.error_count(), 1);
    }

    #[test]
    fn test_missing_name_logs_one_error() {
        let fake = FakeHost::new();
        let resolver = EntityResolver::new(fake.clone());
        assert!(resolver.find_by_name("Nobody").is_none());

        let entries = fake.diagnostics();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, Severity::Error);
        assert!(entries[0].1.contains("Nobody"));
    }

    #[test]
    fn test_find_as_script_instance() {
        let fake = FakeHost::new();
        fake.spawn(EntityId(5), "Player");
        let handle = EntityHandle::new(EntityId(5), fake.clone());
        let instance = ScriptInstance::new("Player", handle, Box::new(Player));
        fake.register_instance(instance.clone());

        let found = EntityResolver::new(fake.clone())
            .find_by_name_as_script_instance("Player")
            .unwrap();
        assert!(found.instance().unwrap().ptr_eq(&instance));
    }

    #[test]
    fn test_find_as_script_instance_without_script() {
        let fake = FakeHost::new();
        fake.spawn(EntityId(6), "Wall");
        let found = EntityResolver::new(fake.clone())
            .find_by_name_as_script_instance("Wall")
            .unwrap();
        assert!(!found.is_instance());
        assert_eq!(found.id(), EntityId(6));
    }

    #[test]
    fn test_find_as_script_instance_missing_logs_once() {
        let fake = FakeHost::new();
        let resolver = EntityResolver::new(fake.clone());
        assert!(resolver.find_by_name_as_script_instance("Ghost").is_none());
        assert_eq!(fake.error_count(), 1);
    }
}
