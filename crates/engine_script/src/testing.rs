//! In-memory [`EngineHost`] for unit tests.

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use engine_component::{AccessError, Component, ComponentData, ComponentKind, EntityId, FieldValue};

use crate::host::{EngineHost, Severity};
use crate::instance::ScriptInstance;

#[derive(Default)]
struct FakeEntity {
    name: String,
    components: BTreeMap<ComponentKind, Box<dyn ComponentData>>,
}

#[derive(Default)]
pub(crate) struct FakeHost {
    entities: RefCell<BTreeMap<EntityId, FakeEntity>>,
    instances: RefCell<BTreeMap<EntityId, ScriptInstance>>,
    diagnostics: RefCell<Vec<(Severity, String)>>,
}

impl FakeHost {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn spawn(&self, id: EntityId, name: &str) {
        self.entities.borrow_mut().insert(
            id,
            FakeEntity {
                name: name.to_string(),
                ..FakeEntity::default()
            },
        );
    }

    pub(crate) fn despawn(&self, id: EntityId) {
        self.entities.borrow_mut().remove(&id);
        if let Some(instance) = self.instances.borrow_mut().remove(&id) {
            instance.mark_destroyed();
        }
    }

    pub(crate) fn insert<T: Component>(&self, id: EntityId, component: T) {
        if let Some(entity) = self.entities.borrow_mut().get_mut(&id) {
            entity.components.insert(T::KIND, Box::new(component));
        }
    }

    pub(crate) fn remove(&self, id: EntityId, kind: ComponentKind) {
        if let Some(entity) = self.entities.borrow_mut().get_mut(&id) {
            entity.components.remove(&kind);
        }
    }

    pub(crate) fn with_component_mut<T: Component, R>(
        &self,
        id: EntityId,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let mut entities = self.entities.borrow_mut();
        let data = entities.get_mut(&id)?.components.get_mut(&T::KIND)?;
        let data: &mut dyn ComponentData = &mut **data;
        let any: &mut dyn Any = data;
        any.downcast_mut::<T>().map(f)
    }

    pub(crate) fn register_instance(&self, instance: ScriptInstance) {
        self.instances.borrow_mut().insert(instance.id(), instance);
    }

    pub(crate) fn diagnostics(&self) -> Vec<(Severity, String)> {
        self.diagnostics.borrow().clone()
    }

    pub(crate) fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|(severity, _)| *severity >= Severity::Error)
            .count()
    }

    fn with_data<R>(
        &self,
        id: EntityId,
        kind: ComponentKind,
        f: impl FnOnce(&mut dyn ComponentData) -> Result<R, AccessError>,
    ) -> Result<R, AccessError> {
        let mut entities = self.entities.borrow_mut();
        let entity = entities
            .get_mut(&id)
            .ok_or(AccessError::EntityNotFound(id))?;
        let data = entity
            .components
            .get_mut(&kind)
            .ok_or(AccessError::ComponentNotFound { entity: id, kind })?;
        f(&mut **data)
    }
}

impl EngineHost for FakeHost {
    fn entity_exists(&self, id: EntityId) -> bool {
        self.entities.borrow().contains_key(&id)
    }

    fn component_exists(&self, id: EntityId, kind: ComponentKind) -> bool {
        self.entities
            .borrow()
            .get(&id)
            .is_some_and(|entity| entity.components.contains_key(&kind))
    }

    fn read_field(
        &self,
        id: EntityId,
        kind: ComponentKind,
        field: &str,
    ) -> Result<FieldValue, AccessError> {
        self.with_data(id, kind, |data| data.field(field))
    }

    fn write_field(
        &self,
        id: EntityId,
        kind: ComponentKind,
        field: &str,
        value: FieldValue,
    ) -> Result<(), AccessError> {
        self.with_data(id, kind, |data| data.set_field(field, value))
    }

    fn invoke_method(
        &self,
        id: EntityId,
        kind: ComponentKind,
        method: &str,
        args: &[FieldValue],
    ) -> Result<Option<FieldValue>, AccessError> {
        self.with_data(id, kind, |data| data.invoke(method, args))
    }

    fn resolve_entity_by_name(&self, name: &str) -> EntityId {
        self.entities
            .borrow()
            .iter()
            .find(|(_, entity)| entity.name == name)
            .map_or(EntityId::NULL, |(id, _)| *id)
    }

    fn has_registered_instance(&self, id: EntityId) -> bool {
        self.instances.borrow().contains_key(&id)
    }

    fn registered_instance(&self, id: EntityId) -> Option<ScriptInstance> {
        self.instances.borrow().get(&id).cloned()
    }

    fn log_diagnostic(&self, severity: Severity, message: &str) {
        self.diagnostics
            .borrow_mut()
            .push((severity, message.to_string()));
    }
}
