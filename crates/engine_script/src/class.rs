//! Script classes.
//!
//! A script class is a named factory for one [`Behavior`] type. The host
//! attaches scripts to entities by class name; [`ScriptClassRegistry`] maps
//! that name to the constructor and applies the entity's stored field
//! overrides to every new instance.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::ScriptError;
use crate::fields::ScriptFieldMap;
use crate::handle::EntityHandle;
use crate::instance::{Behavior, ScriptInstance};

type Factory = Box<dyn Fn(EntityHandle) -> Box<dyn Behavior>>;

/// Registered script classes, by name.
#[derive(Default)]
pub struct ScriptClassRegistry {
    classes: BTreeMap<String, Factory>,
}

impl ScriptClassRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. Registering an existing name replaces it, which is
    /// how a script is reloaded.
    pub fn register<T, F>(&mut self, name: impl Into<String>, factory: F)
    where
        T: Behavior,
        F: Fn(EntityHandle) -> T + 'static,
    {
        let name = name.into();
        debug!(class = name, "script class registered");
        self.classes.insert(
            name,
            Box::new(move |entity| Box::new(factory(entity)) as Box<dyn Behavior>),
        );
    }

    /// Remove a class. Returns `false` if it was not registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        let removed = self.classes.remove(name).is_some();
        if removed {
            debug!(class = name, "script class unregistered");
        }
        removed
    }

    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Registered class names, sorted.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The public fields of class `name` as a fresh instance reports them.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownScriptClass`] if `name` is not registered.
    pub fn default_fields(
        &self,
        name: &str,
        entity: EntityHandle,
    ) -> Result<ScriptFieldMap, ScriptError> {
        let factory = self.factory(name)?;
        Ok(factory(entity).fields())
    }

    /// Construct an instance of class `name` bound to `entity`.
    ///
    /// `overrides` is first synced against the class's current fields, then
    /// every override is applied to the new behavior. The instance is
    /// returned uninitialized; the caller registers it and runs `on_create`.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownScriptClass`] if `name` is not registered.
    pub fn instantiate(
        &self,
        name: &str,
        entity: EntityHandle,
        overrides: &mut ScriptFieldMap,
    ) -> Result<ScriptInstance, ScriptError> {
        let factory = self.factory(name)?;
        let mut behavior = factory(entity.clone());

        if overrides.sync_with(&behavior.fields()) {
            debug!(entity = %entity.id(), class = name, "script fields synced");
        }
        for (field, value) in overrides.iter() {
            if let Err(err) = behavior.set_field(field, value.clone()) {
                warn!(entity = %entity.id(), class = name, field, %err, "field override rejected");
            }
        }

        Ok(ScriptInstance::new(name, entity, behavior))
    }

    fn factory(&self, name: &str) -> Result<&Factory, ScriptError> {
        self.classes
            .get(name)
            .ok_or_else(|| ScriptError::UnknownScriptClass(name.to_string()))
    }
}

impl std::fmt::Debug for ScriptClassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptClassRegistry")
            .field("classes", &self.classes.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use engine_component::{EntityId, FieldValue};

    use super::*;
    use crate::instance::LifecycleState;
    use crate::testing::FakeHost;

    struct Player {
        entity: EntityHandle,
        speed: f32,
    }

    impl Player {
        fn new(entity: EntityHandle) -> Self {
            Self { entity, speed: 5.0 }
        }
    }

    impl Behavior for Player {
        fn fields(&self) -> ScriptFieldMap {
            let mut fields = ScriptFieldMap::new();
            fields.insert("speed", self.speed);
            fields
        }

        fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), ScriptError> {
            match name {
                "speed" => self.speed = value.extract(name)?,
                _ => return Err(ScriptError::UnknownField(name.to_string())),
            }
            Ok(())
        }
    }

    fn registry() -> ScriptClassRegistry {
        let mut registry = ScriptClassRegistry::new();
        registry.register("Player", Player::new);
        registry
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = registry();
        assert!(registry.exists("Player"));
        assert!(!registry.exists("Camera"));
        assert_eq!(registry.class_names().collect::<Vec<_>>(), vec!["Player"]);

        assert!(registry.unregister("Player"));
        assert!(!registry.unregister("Player"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_instantiate_applies_overrides() {
        let fake = FakeHost::new();
        let entity = EntityHandle::new(EntityId(4), fake);

        let mut overrides = ScriptFieldMap::new();
        overrides.insert("speed", 12.0f32);
        overrides.insert("stale", true);

        let instance = registry()
            .instantiate("Player", entity, &mut overrides)
            .unwrap();
        assert_eq!(instance.state(), LifecycleState::Uninitialized);
        assert_eq!(instance.class_name(), "Player");
        assert_eq!(instance.with(|p: &Player| p.speed).unwrap(), 12.0);
        assert_eq!(instance.with(|p: &Player| p.entity.id()).unwrap(), EntityId(4));
        assert!(!overrides.contains("stale"));
    }

    #[test]
    fn test_instantiate_fills_missing_overrides() {
        let fake = FakeHost::new();
        let mut overrides = ScriptFieldMap::new();
        registry()
            .instantiate("Player", EntityHandle::new(EntityId(4), fake), &mut overrides)
            .unwrap();
        assert_eq!(overrides.get("speed"), Some(&FieldValue::Float(5.0)));
    }

    #[test]
    fn test_unknown_class() {
        let fake = FakeHost::new();
        let err = registry()
            .instantiate(
                "Enemy",
                EntityHandle::new(EntityId(1), fake),
                &mut ScriptFieldMap::new(),
            )
            .unwrap_err();
        assert!(matches!(err, ScriptError::UnknownScriptClass(name) if name == "Enemy"));
    }

    #[test]
    fn test_default_fields() {
        let fake = FakeHost::new();
        let fields = registry()
            .default_fields("Player", EntityHandle::null(fake))
            .unwrap();
        assert_eq!(fields.len(), 1);
    }
}
