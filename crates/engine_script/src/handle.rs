//! Entity handles.
//!
//! An [`EntityHandle`] is the script-side reference to a native entity: an
//! [`EntityId`] plus the host it lives in. Handles are plain values; any
//! number may point at the same entity and they compare equal exactly when
//! their ids do.

use std::hash::{Hash, Hasher};
use std::rc::Rc;

use engine_component::{AccessError, ComponentKind, EntityId};

use crate::accessor::{ComponentAccessor, ComponentView, TransformAccessor};
use crate::cast::{self, ScriptRef};
use crate::host::{EngineHost, ScriptLog, Severity};
use crate::resolver::EntityResolver;

/// A reference to one native entity.
#[derive(Clone)]
pub struct EntityHandle {
    id: EntityId,
    host: Rc<dyn EngineHost>,
}

impl EntityHandle {
    /// Wrap an identifier.
    #[must_use]
    pub fn new(id: EntityId, host: Rc<dyn EngineHost>) -> Self {
        Self { id, host }
    }

    /// A handle wrapping [`EntityId::NULL`].
    #[must_use]
    pub fn null(host: Rc<dyn EngineHost>) -> Self {
        Self::new(EntityId::NULL, host)
    }

    /// The wrapped identifier.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.id.is_null()
    }

    /// The host this handle delegates to.
    #[must_use]
    pub fn host(&self) -> &Rc<dyn EngineHost> {
        &self.host
    }

    /// Whether the entity is still alive.
    #[must_use]
    pub fn exists(&self) -> bool {
        !self.id.is_null() && self.host.entity_exists(self.id)
    }

    /// Whether the entity currently has a component of `kind`.
    ///
    /// Always asks the host; `false` for the null handle and for entities
    /// that have been destroyed.
    #[must_use]
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.exists() && self.host.component_exists(self.id, kind)
    }

    /// An accessor for the component of `kind`, or `None` after logging a
    /// not-found diagnostic if the entity lacks it.
    #[must_use]
    pub fn get_component(&self, kind: ComponentKind) -> Option<ComponentAccessor> {
        if !self.has_component(kind) {
            let err = if self.exists() {
                AccessError::ComponentNotFound {
                    entity: self.id,
                    kind,
                }
            } else {
                AccessError::EntityNotFound(self.id)
            };
            self.host
                .log_diagnostic(Severity::Error, &format!("GetComponent: {err}"));
            return None;
        }
        Some(ComponentAccessor::bind(kind, self.clone()))
    }

    /// Typed form of [`EntityHandle::has_component`].
    #[must_use]
    pub fn has<V: ComponentView>(&self) -> bool {
        self.has_component(V::KIND)
    }

    /// Typed form of [`EntityHandle::get_component`].
    #[must_use]
    pub fn get<V: ComponentView>(&self) -> Option<V> {
        self.get_component(V::KIND).and_then(V::from_accessor)
    }

    /// Shorthand for `get::<TransformAccessor>()`.
    #[must_use]
    pub fn transform(&self) -> Option<TransformAccessor> {
        self.get()
    }

    /// A resolver sharing this handle's host.
    #[must_use]
    pub fn resolver(&self) -> EntityResolver {
        EntityResolver::new(Rc::clone(&self.host))
    }

    /// Find another entity by display name.
    #[must_use]
    pub fn find_entity_by_name(&self, name: &str) -> Option<EntityHandle> {
        self.resolver().find_by_name(name)
    }

    /// Find another entity by display name and cast it to its script
    /// instance where one exists.
    #[must_use]
    pub fn find_script_by_name(&self, name: &str) -> Option<ScriptRef> {
        self.resolver().find_by_name_as_script_instance(name)
    }

    /// This entity's registered script instance, or this handle unchanged.
    #[must_use]
    pub fn as_script_instance(&self) -> ScriptRef {
        cast::as_script_instance(self)
    }

    /// Logging facade sharing this handle's host.
    #[must_use]
    pub fn log(&self) -> ScriptLog {
        ScriptLog::new(Rc::clone(&self.host))
    }
}

impl PartialEq for EntityHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityHandle {}

impl Hash for EntityHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EntityHandle").field(&self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use engine_math::{Rigidbody2D, Transform, Vec3};

    use super::*;
    use crate::accessor::Rigidbody2DAccessor;
    use crate::testing::FakeHost;

    #[test]
    fn test_equality_is_by_id() {
        let fake = FakeHost::new();
        let other = FakeHost::new();
        let a = EntityHandle::new(EntityId(5), fake.clone());
        let b = EntityHandle::new(EntityId(5), other);
        let c = EntityHandle::new(EntityId(6), fake);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<EntityHandle> = [a.clone(), b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_has_component_iff_get_component() {
        let fake = FakeHost::new();
        fake.spawn(EntityId(1), "Player");
        fake.insert(EntityId(1), Transform::default());

        let handle = EntityHandle::new(EntityId(1), fake.clone());
        for kind in ComponentKind::ALL {
            let has = handle.has_component(kind);
            let accessor = handle.get_component(kind);
            assert_eq!(has, accessor.is_some(), "{kind}");
            if let Some(accessor) = accessor {
                assert_eq!(accessor.kind(), kind);
                assert_eq!(accessor.entity_id(), EntityId(1));
            }
        }
    }

    #[test]
    fn test_missing_component_logs_exactly_once() {
        let fake = FakeHost::new();
        fake.spawn(EntityId(1), "Player");

        let handle = EntityHandle::new(EntityId(1), fake.clone());
        assert!(handle.get_component(ComponentKind::Rigidbody2D).is_none());

        let entries = fake.diagnostics();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, Severity::Error);
        assert!(entries[0].1.contains("Rigidbody2DComponent"));
    }

    #[test]
    fn test_has_component_does_not_log() {
        let fake = FakeHost::new();
        fake.spawn(EntityId(1), "Player");
        let handle = EntityHandle::new(EntityId(1), fake.clone());
        assert!(!handle.has_component(ComponentKind::Camera));
        assert!(fake.diagnostics().is_empty());
    }

    #[test]
    fn test_null_handle_never_resolves_components() {
        let fake = FakeHost::new();
        let handle = EntityHandle::null(fake.clone());
        assert!(handle.is_null());
        assert!(!handle.exists());
        for kind in ComponentKind::ALL {
            assert!(!handle.has_component(kind));
        }
        assert!(handle.get::<Rigidbody2DAccessor>().is_none());
        assert_eq!(fake.error_count(), 1);
    }

    #[test]
    fn test_typed_get_reads_live_data() {
        let fake = FakeHost::new();
        fake.spawn(EntityId(3), "Cubic");
        fake.insert(EntityId(3), Transform::from_translation(Vec3::X));
        fake.insert(EntityId(3), Rigidbody2D::dynamic());

        let handle = EntityHandle::new(EntityId(3), fake.clone());
        assert!(handle.has::<Rigidbody2DAccessor>());
        let transform = handle.transform().unwrap();
        assert_eq!(transform.translation().unwrap(), Vec3::X);

        // Writes made behind the accessor's back are visible immediately.
        fake.with_component_mut::<Transform, _>(EntityId(3), |t| t.translation = Vec3::Y);
        assert_eq!(transform.translation().unwrap(), Vec3::Y);
    }

    #[test]
    fn test_destroyed_entity_reports_absent() {
        let fake = FakeHost::new();
        fake.spawn(EntityId(9), "Doomed");
        fake.insert(EntityId(9), Transform::default());
        let stale = EntityHandle::new(EntityId(9), fake.clone());
        assert!(stale.has_component(ComponentKind::Transform));

        fake.despawn(EntityId(9));
        for kind in ComponentKind::ALL {
            assert!(!stale.has_component(kind));
        }
        assert!(stale.get_component(ComponentKind::Transform).is_none());
        assert!(fake.diagnostics()[0].1.contains("does not exist"));
    }
}
