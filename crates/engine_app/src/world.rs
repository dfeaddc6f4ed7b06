//! World state storage for the reference host.
//!
//! The [`World`] holds every entity, its display name and its components.
//! It is the single owner of component data; scripts only reach it through
//! [`SceneHost`](crate::host::SceneHost).

use std::any::Any;
use std::collections::BTreeMap;

use engine_component::{
    AccessError, Component, ComponentData, ComponentKind, EntityId, FieldValue,
};
use engine_math::Transform;
use uuid::Uuid;

/// Errors from direct world manipulation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// The entity does not exist.
    #[error("{0} does not exist")]
    EntityNotFound(EntityId),

    /// An entity with this id already exists.
    #[error("{0} already exists")]
    DuplicateId(EntityId),

    /// The null id cannot name an entity.
    #[error("the null entity id cannot be used")]
    NullId,
}

/// Marks an entity as driven by a script class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptComponent {
    pub class_name: String,
}

impl ScriptComponent {
    pub const CLASS_NAME: &'static str = "class_name";

    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }
}

impl ComponentData for ScriptComponent {
    fn kind(&self) -> ComponentKind {
        Self::KIND
    }

    fn field(&self, name: &str) -> Result<FieldValue, AccessError> {
        match name {
            Self::CLASS_NAME => Ok(FieldValue::Text(self.class_name.clone())),
            _ => Err(AccessError::UnknownField {
                kind: Self::KIND,
                field: name.to_string(),
            }),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), AccessError> {
        match name {
            Self::CLASS_NAME => self.class_name = value.extract(name)?,
            _ => {
                return Err(AccessError::UnknownField {
                    kind: Self::KIND,
                    field: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Component for ScriptComponent {
    const KIND: ComponentKind = ComponentKind::Script;
}

#[derive(Debug)]
struct EntityRecord {
    name: String,
    /// Creation sequence number; lower is older.
    sequence: u64,
    components: BTreeMap<ComponentKind, Box<dyn ComponentData>>,
}

/// The canonical world state.
#[derive(Debug, Default)]
pub struct World {
    entities: BTreeMap<EntityId, EntityRecord>,
    next_sequence: u64,
}

impl World {
    /// Create a new empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a named entity with a default [`Transform`] and a fresh random
    /// id.
    pub fn create_entity(&mut self, name: impl Into<String>) -> EntityId {
        let id = loop {
            let id = EntityId(Uuid::new_v4().as_u64_pair().0);
            if !id.is_null() && !self.entities.contains_key(&id) {
                break id;
            }
        };
        self.insert_record(id, name.into());
        id
    }

    /// Create a named entity with a caller-chosen id, e.g. when loading a
    /// saved scene.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NullId`] for the null id and
    /// [`WorldError::DuplicateId`] if the id is taken.
    pub fn create_entity_with_id(
        &mut self,
        id: EntityId,
        name: impl Into<String>,
    ) -> Result<EntityId, WorldError> {
        if id.is_null() {
            return Err(WorldError::NullId);
        }
        if self.entities.contains_key(&id) {
            return Err(WorldError::DuplicateId(id));
        }
        self.insert_record(id, name.into());
        Ok(id)
    }

    fn insert_record(&mut self, id: EntityId, name: String) {
        let mut components: BTreeMap<ComponentKind, Box<dyn ComponentData>> = BTreeMap::new();
        components.insert(Transform::KIND, Box::new(Transform::default()));
        self.entities.insert(
            id,
            EntityRecord {
                name,
                sequence: self.next_sequence,
                components,
            },
        );
        self.next_sequence += 1;
    }

    /// Destroy an entity and all its components.
    ///
    /// Returns `true` if the entity existed and was removed.
    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        self.entities.remove(&id).is_some()
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    #[must_use]
    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.entities.get(&id).map(|record| record.name.as_str())
    }

    /// Returns the creation sequence number of an entity.
    #[must_use]
    pub fn sequence(&self, id: EntityId) -> Option<u64> {
        self.entities.get(&id).map(|record| record.sequence)
    }

    /// Returns the total number of entities in the world.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// All entity ids, oldest first.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        let mut ids: Vec<(u64, EntityId)> = self
            .entities
            .iter()
            .map(|(id, record)| (record.sequence, *id))
            .collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Entities carrying a component of `kind`, oldest first.
    #[must_use]
    pub fn entities_with(&self, kind: ComponentKind) -> Vec<EntityId> {
        self.entities()
            .into_iter()
            .filter(|id| self.has_component(*id, kind))
            .collect()
    }

    /// Find an entity by exact display name. When several share the name,
    /// the earliest created wins.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities
            .iter()
            .filter(|(_, record)| record.name == name)
            .min_by_key(|(_, record)| record.sequence)
            .map(|(id, _)| *id)
    }

    /// Attach a component, replacing any existing one of the same kind.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] if the entity does not exist.
    pub fn add_component<C: Component>(
        &mut self,
        id: EntityId,
        component: C,
    ) -> Result<(), WorldError> {
        let record = self
            .entities
            .get_mut(&id)
            .ok_or(WorldError::EntityNotFound(id))?;
        record.components.insert(C::KIND, Box::new(component));
        Ok(())
    }

    /// Detach a component. Returns `true` if one was removed.
    pub fn remove_component(&mut self, id: EntityId, kind: ComponentKind) -> bool {
        self.entities
            .get_mut(&id)
            .is_some_and(|record| record.components.remove(&kind).is_some())
    }

    #[must_use]
    pub fn has_component(&self, id: EntityId, kind: ComponentKind) -> bool {
        self.entities
            .get(&id)
            .is_some_and(|record| record.components.contains_key(&kind))
    }

    /// Typed read access to a component.
    #[must_use]
    pub fn component<C: Component>(&self, id: EntityId) -> Option<&C> {
        let data: &dyn ComponentData = &**self.entities.get(&id)?.components.get(&C::KIND)?;
        let any: &dyn Any = data;
        any.downcast_ref()
    }

    /// Typed write access to a component.
    #[must_use]
    pub fn component_mut<C: Component>(&mut self, id: EntityId) -> Option<&mut C> {
        let data: &mut dyn ComponentData =
            &mut **self.entities.get_mut(&id)?.components.get_mut(&C::KIND)?;
        let any: &mut dyn Any = data;
        any.downcast_mut()
    }

    /// Untyped access to one component, for serving script reads and writes.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::EntityNotFound`] or
    /// [`AccessError::ComponentNotFound`].
    pub fn component_data_mut(
        &mut self,
        id: EntityId,
        kind: ComponentKind,
    ) -> Result<&mut dyn ComponentData, AccessError> {
        let record = self
            .entities
            .get_mut(&id)
            .ok_or(AccessError::EntityNotFound(id))?;
        let data = record
            .components
            .get_mut(&kind)
            .ok_or(AccessError::ComponentNotFound { entity: id, kind })?;
        Ok(&mut **data)
    }
}

#[cfg(test)]
mod tests {
    use engine_math::{Rigidbody2D, Vec3};

    use super::*;

    #[test]
    fn test_create_entity_has_transform() {
        let mut world = World::new();
        let e = world.create_entity("Player");
        assert!(!e.is_null());
        assert_eq!(world.entity_count(), 1);
        assert_eq!(world.name(e), Some("Player"));
        assert!(world.has_component(e, ComponentKind::Transform));
        assert!(!world.has_component(e, ComponentKind::Rigidbody2D));
    }

    #[test]
    fn test_create_with_id() {
        let mut world = World::new();
        assert_eq!(
            world.create_entity_with_id(EntityId(42), "YellowCubic"),
            Ok(EntityId(42))
        );
        assert_eq!(
            world.create_entity_with_id(EntityId(42), "Other"),
            Err(WorldError::DuplicateId(EntityId(42)))
        );
        assert_eq!(
            world.create_entity_with_id(EntityId::NULL, "Null"),
            Err(WorldError::NullId)
        );
    }

    #[test]
    fn test_destroy_entity() {
        let mut world = World::new();
        let e = world.create_entity("Doomed");
        assert!(world.destroy_entity(e));
        assert!(!world.destroy_entity(e));
        assert!(!world.contains(e));
        assert!(!world.has_component(e, ComponentKind::Transform));
    }

    #[test]
    fn test_find_by_name_prefers_oldest() {
        let mut world = World::new();
        world.create_entity_with_id(EntityId(900), "Enemy").unwrap();
        world.create_entity_with_id(EntityId(5), "Enemy").unwrap();
        assert_eq!(world.find_by_name("Enemy"), Some(EntityId(900)));
        assert_eq!(world.find_by_name("enemy"), None);
    }

    #[test]
    fn test_typed_component_access() {
        let mut world = World::new();
        let e = world.create_entity("Cubic");
        world.add_component(e, Rigidbody2D::dynamic()).unwrap();

        world.component_mut::<Transform>(e).unwrap().translation = Vec3::X;
        assert_eq!(world.component::<Transform>(e).unwrap().translation, Vec3::X);
        assert!(world.component::<Rigidbody2D>(e).is_some());

        assert!(world.remove_component(e, ComponentKind::Rigidbody2D));
        assert!(world.component::<Rigidbody2D>(e).is_none());
    }

    #[test]
    fn test_add_component_to_missing_entity() {
        let mut world = World::new();
        assert_eq!(
            world.add_component(EntityId(1), ScriptComponent::new("Player")),
            Err(WorldError::EntityNotFound(EntityId(1)))
        );
    }

    #[test]
    fn test_entities_with_in_creation_order() {
        let mut world = World::new();
        let a = world.create_entity_with_id(EntityId(30), "A").unwrap();
        let _b = world.create_entity_with_id(EntityId(20), "B").unwrap();
        let c = world.create_entity_with_id(EntityId(10), "C").unwrap();
        world.add_component(a, ScriptComponent::new("X")).unwrap();
        world.add_component(c, ScriptComponent::new("Y")).unwrap();
        assert_eq!(world.entities_with(ComponentKind::Script), vec![a, c]);
    }

    #[test]
    fn test_component_data_errors() {
        let mut world = World::new();
        let e = world.create_entity("Lonely");
        assert!(matches!(
            world.component_data_mut(e, ComponentKind::Camera),
            Err(AccessError::ComponentNotFound { .. })
        ));
        assert!(matches!(
            world.component_data_mut(EntityId(7), ComponentKind::Transform),
            Err(AccessError::EntityNotFound(EntityId(7)))
        ));
    }

    #[test]
    fn test_script_component_fields() {
        let mut script = ScriptComponent::new("Player");
        assert_eq!(
            script.field(ScriptComponent::CLASS_NAME).unwrap(),
            FieldValue::Text("Player".into())
        );
        script
            .set_field(ScriptComponent::CLASS_NAME, "Camera".into())
            .unwrap();
        assert_eq!(script.class_name, "Camera");
        assert!(script.set_field("speed", 1.0f32.into()).is_err());
    }
}
