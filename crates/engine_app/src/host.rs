//! [`EngineHost`] over an in-process [`World`].

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use engine_component::{AccessError, ComponentKind, EntityId, FieldValue};
use engine_script::{EngineHost, ScriptInstance, Severity};
use tracing::{debug, error, info, trace, warn};

use crate::registry::InstanceRegistry;
use crate::world::World;

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Records script diagnostics and forwards them to `tracing`.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    entries: RefCell<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Trace => trace!(target: "engine_script", "{message}"),
            Severity::Info => info!(target: "engine_script", "{message}"),
            Severity::Warn => warn!(target: "engine_script", "{message}"),
            Severity::Error => error!(target: "engine_script", "{message}"),
            Severity::Fatal => error!(target: "engine_script", fatal = true, "{message}"),
        }
        self.entries.borrow_mut().push(Diagnostic {
            severity,
            message: message.to_string(),
        });
    }

    /// Every entry recorded so far, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    /// Number of entries at `severity` or above.
    #[must_use]
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.severity >= severity)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// The engine side of the script boundary.
///
/// Every [`EngineHost`] call borrows the world or the registry only for the
/// duration of that call, so script hooks may call back freely.
#[derive(Debug, Default)]
pub struct SceneHost {
    world: RefCell<World>,
    instances: RefCell<InstanceRegistry>,
    diagnostics: DiagnosticSink,
}

impl SceneHost {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Wrap an already populated world.
    #[must_use]
    pub fn with_world(world: World) -> Rc<Self> {
        Rc::new(Self {
            world: RefCell::new(world),
            ..Self::default()
        })
    }

    /// Borrow the world. Must not be held across a script hook.
    #[must_use]
    pub fn world(&self) -> Ref<'_, World> {
        self.world.borrow()
    }

    /// Mutably borrow the world. Must not be held across a script hook.
    #[must_use]
    pub fn world_mut(&self) -> RefMut<'_, World> {
        self.world.borrow_mut()
    }

    #[must_use]
    pub fn instances(&self) -> Ref<'_, InstanceRegistry> {
        self.instances.borrow()
    }

    #[must_use]
    pub fn instances_mut(&self) -> RefMut<'_, InstanceRegistry> {
        self.instances.borrow_mut()
    }

    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }

    fn with_component<R>(
        &self,
        id: EntityId,
        kind: ComponentKind,
        f: impl FnOnce(&mut dyn engine_component::ComponentData) -> Result<R, AccessError>,
    ) -> Result<R, AccessError> {
        let mut world = self.world.borrow_mut();
        f(world.component_data_mut(id, kind)?)
    }
}

impl EngineHost for SceneHost {
    fn entity_exists(&self, id: EntityId) -> bool {
        self.world.borrow().contains(id)
    }

    fn component_exists(&self, id: EntityId, kind: ComponentKind) -> bool {
        self.world.borrow().has_component(id, kind)
    }

    fn read_field(
        &self,
        id: EntityId,
        kind: ComponentKind,
        field: &str,
    ) -> Result<FieldValue, AccessError> {
        self.with_component(id, kind, |data| data.field(field))
    }

    fn write_field(
        &self,
        id: EntityId,
        kind: ComponentKind,
        field: &str,
        value: FieldValue,
    ) -> Result<(), AccessError> {
        self.with_component(id, kind, |data| data.set_field(field, value))
    }

    fn invoke_method(
        &self,
        id: EntityId,
        kind: ComponentKind,
        method: &str,
        args: &[FieldValue],
    ) -> Result<Option<FieldValue>, AccessError> {
        debug!(entity = %id, %kind, method, "component method");
        self.with_component(id, kind, |data| data.invoke(method, args))
    }

    fn resolve_entity_by_name(&self, name: &str) -> EntityId {
        self.world
            .borrow()
            .find_by_name(name)
            .unwrap_or(EntityId::NULL)
    }

    fn has_registered_instance(&self, id: EntityId) -> bool {
        self.instances.borrow().contains(id)
    }

    fn registered_instance(&self, id: EntityId) -> Option<ScriptInstance> {
        self.instances.borrow().get(id)
    }

    fn log_diagnostic(&self, severity: Severity, message: &str) {
        self.diagnostics.record(severity, message);
    }
}
