//! Script runtime: the native frame loop that drives behaviors.
//!
//! Implements the script lifecycle on top of a [`SceneHost`]:
//!
//! 1. [`ScriptRuntime::start`] instantiates every entity that carries a
//!    [`ScriptComponent`], registers the instances, then runs `on_create` on
//!    each in creation order. All instances exist before the first
//!    `on_create`, so scripts may cast to each other from there.
//! 2. [`ScriptRuntime::update`] runs `on_update` on every live instance.
//! 3. [`ScriptRuntime::destroy_entity`] marks the instance destroyed,
//!    unregisters it and despawns the entity; stale handles held by other
//!    scripts now see an absent entity.
//! 4. [`ScriptRuntime::detach_script`] does the same for the script alone
//!    and keeps the entity.
//! 5. [`ScriptRuntime::stop`] destroys every instance.
//!
//! Instances whose entity was despawned directly through the world are
//! destroyed at the start of the next update or dispatch.
//!
//! Hook failures are reported through the host's diagnostic sink and never
//! stop the loop.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Instant;

use engine_component::{ComponentKind, EntityId, FieldValue};
use engine_script::{
    EngineHost, EntityHandle, FrameTime, ScriptClassRegistry, ScriptError, ScriptEvent,
    ScriptFieldMap, ScriptInstance, Severity, codec,
};
use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;
use crate::host::SceneHost;
use crate::world::{ScriptComponent, WorldError};

/// The frame loop and everything it owns besides the world.
#[derive(Debug)]
pub struct ScriptRuntime {
    host: Rc<SceneHost>,
    classes: ScriptClassRegistry,
    /// Per-entity public field overrides, applied on instantiation.
    overrides: BTreeMap<EntityId, ScriptFieldMap>,
    config: RuntimeConfig,
    frame: u64,
    running: bool,
}

impl ScriptRuntime {
    /// Create a runtime over an empty scene.
    #[must_use]
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_host(SceneHost::new(), config)
    }

    /// Create a runtime over an existing scene.
    #[must_use]
    pub fn with_host(host: Rc<SceneHost>, config: RuntimeConfig) -> Self {
        Self {
            host,
            classes: ScriptClassRegistry::new(),
            overrides: BTreeMap::new(),
            config,
            frame: 0,
            running: false,
        }
    }

    #[must_use]
    pub fn host(&self) -> &Rc<SceneHost> {
        &self.host
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    #[must_use]
    pub fn classes(&self) -> &ScriptClassRegistry {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut ScriptClassRegistry {
        &mut self.classes
    }

    /// Number of frames run since the last start.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// A handle to `id` bound to this runtime's host.
    #[must_use]
    pub fn handle(&self, id: EntityId) -> EntityHandle {
        EntityHandle::new(id, self.host.clone())
    }

    /// Create a named entity and return a handle to it.
    pub fn create_entity(&self, name: &str) -> EntityHandle {
        let id = self.host.world_mut().create_entity(name);
        self.handle(id)
    }

    /// The stored field overrides for an entity.
    #[must_use]
    pub fn field_overrides(&self, id: EntityId) -> Option<&ScriptFieldMap> {
        self.overrides.get(&id)
    }

    /// Store a field override, applied the next time the entity's script is
    /// instantiated.
    pub fn set_field_override(
        &mut self,
        id: EntityId,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) {
        self.overrides.entry(id).or_default().insert(name, value);
    }

    /// Encode every entity's field overrides to MessagePack.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Encode`] if serialisation fails.
    pub fn export_fields(&self) -> Result<Vec<u8>, ScriptError> {
        codec::encode(&self.overrides)
    }

    /// Replace the stored field overrides with a previously exported set.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Decode`] if the bytes are not an export.
    pub fn import_fields(&mut self, bytes: &[u8]) -> Result<(), ScriptError> {
        self.overrides = codec::decode(bytes)?;
        Ok(())
    }

    /// Instantiate every scripted entity, then run `on_create` on each.
    ///
    /// Returns the number of instances created. Does nothing if already
    /// running.
    pub fn start(&mut self) -> usize {
        if self.running {
            return 0;
        }
        self.running = true;
        self.frame = 0;

        let scripted = self.host.world().entities_with(ComponentKind::Script);
        let instances: Vec<ScriptInstance> = scripted
            .into_iter()
            .filter_map(|id| self.instantiate(id))
            .collect();

        info!(
            instances = instances.len(),
            classes = self.classes.len(),
            "script runtime started"
        );

        for instance in &instances {
            self.create(instance);
        }
        instances.len()
    }

    /// Attach a script class to an entity. While running, the script is
    /// instantiated and created immediately.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] if the entity does not exist.
    pub fn attach_script(&mut self, id: EntityId, class_name: &str) -> Result<(), WorldError> {
        self.host
            .world_mut()
            .add_component(id, ScriptComponent::new(class_name))?;

        if self.running {
            if let Some(old) = self.host.instances_mut().remove(id) {
                old.mark_destroyed();
            }
            if let Some(instance) = self.instantiate(id) {
                self.create(&instance);
            }
        }
        Ok(())
    }

    /// Run `on_update` on every live instance, oldest entity first.
    pub fn update(&mut self, frame_time: FrameTime) {
        self.frame += 1;
        self.reap_orphans();
        for instance in self.live_instances() {
            if let Err(err) = instance.invoke_on_update(frame_time) {
                self.report("on_update", &instance, &err);
            }
        }
    }

    /// Deliver an event to one entity's script, or to every script when
    /// `target` is `None`. Returns the number of scripts that received it.
    pub fn dispatch_event(&mut self, target: Option<EntityId>, event: &ScriptEvent) -> usize {
        self.reap_orphans();
        let targets: Vec<ScriptInstance> = match target {
            Some(id) => self
                .live_instances()
                .into_iter()
                .filter(|instance| instance.id() == id)
                .collect(),
            None => self.live_instances(),
        };

        let mut delivered = 0;
        for instance in targets {
            match instance.invoke_on_event(event) {
                Ok(()) => delivered += 1,
                Err(err) => self.report("on_event", &instance, &err),
            }
        }
        debug!(event = event.name(), delivered, "event dispatched");
        delivered
    }

    /// Destroy an entity together with its script instance.
    ///
    /// Returns `true` if the entity existed.
    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        let instance = self.host.instances_mut().remove(id);
        if let Some(instance) = &instance {
            instance.mark_destroyed();
        }
        self.overrides.remove(&id);
        let existed = self.host.world_mut().destroy_entity(id);
        debug!(entity = %id, scripted = instance.is_some(), existed, "entity destroyed");
        existed
    }

    /// Remove an entity's script together with its instance and field
    /// overrides. The entity itself stays alive.
    ///
    /// Returns `true` if the entity had a script attached.
    pub fn detach_script(&mut self, id: EntityId) -> bool {
        let instance = self.host.instances_mut().remove(id);
        if let Some(instance) = &instance {
            instance.mark_destroyed();
        }
        self.overrides.remove(&id);
        let removed = self
            .host
            .world_mut()
            .remove_component(id, ComponentKind::Script);
        debug!(entity = %id, instantiated = instance.is_some(), removed, "script detached");
        removed
    }

    /// Destroy every script instance and leave the running state. Entities
    /// stay in the world.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        let instances = self.host.instances_mut().drain();
        for instance in &instances {
            instance.mark_destroyed();
        }
        self.running = false;
        info!(
            instances = instances.len(),
            frames = self.frame,
            "script runtime stopped"
        );
    }

    /// Start, then run frames at the configured rate until `max_frames` is
    /// reached (or forever when it is 0), then stop.
    pub fn run(&mut self) {
        let frame_duration = self.config.frame_duration();
        let frame_time = FrameTime::from_duration(frame_duration);

        self.start();
        info!(
            frame_rate = self.config.frame_rate,
            max_frames = self.config.max_frames,
            "starting frame loop"
        );

        loop {
            let start = Instant::now();
            self.update(frame_time);

            if self.config.max_frames > 0 && self.frame >= self.config.max_frames {
                info!(frames = self.frame, "frame loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            } else {
                warn!(
                    frame = self.frame,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = frame_duration.as_millis() as u64,
                    "frame exceeded time budget"
                );
            }
        }

        self.stop();
    }

    /// Build and register the instance for one scripted entity. Failures are
    /// reported to the sink.
    fn instantiate(&mut self, id: EntityId) -> Option<ScriptInstance> {
        let class_name = self
            .host
            .world()
            .component::<ScriptComponent>(id)
            .map(|script| script.class_name.clone())?;

        let handle = self.handle(id);
        let overrides = self.overrides.entry(id).or_default();
        match self.classes.instantiate(&class_name, handle, overrides) {
            Ok(instance) => {
                self.host.instances_mut().insert(instance.clone());
                Some(instance)
            }
            Err(err) => {
                self.host.log_diagnostic(
                    Severity::Error,
                    &format!("cannot instantiate script for {id}: {err}"),
                );
                None
            }
        }
    }

    fn create(&self, instance: &ScriptInstance) {
        if let Err(err) = instance.invoke_on_create() {
            self.report("on_create", instance, &err);
        }
    }

    /// Destroy registered instances whose entity no longer exists.
    fn reap_orphans(&mut self) {
        let orphans: Vec<EntityId> = {
            let world = self.host.world();
            self.host
                .instances()
                .iter()
                .map(ScriptInstance::id)
                .filter(|id| !world.contains(*id))
                .collect()
        };
        for id in orphans {
            if let Some(instance) = self.host.instances_mut().remove(id) {
                instance.mark_destroyed();
            }
            self.overrides.remove(&id);
            debug!(entity = %id, "orphaned script instance destroyed");
        }
    }

    /// Registered instances whose entity is still alive, oldest first.
    fn live_instances(&self) -> Vec<ScriptInstance> {
        let world = self.host.world();
        let instances = self.host.instances();
        let mut live: Vec<(u64, ScriptInstance)> = instances
            .iter()
            .filter_map(|instance| {
                world
                    .sequence(instance.id())
                    .map(|sequence| (sequence, instance.clone()))
            })
            .collect();
        live.sort_by_key(|(sequence, _)| *sequence);
        live.into_iter().map(|(_, instance)| instance).collect()
    }

    fn report(&self, hook: &str, instance: &ScriptInstance, err: &ScriptError) {
        self.host.log_diagnostic(
            Severity::Error,
            &format!(
                "{hook} failed for '{}' on {}: {err}",
                instance.class_name(),
                instance.id()
            ),
        );
    }
}

impl Default for ScriptRuntime {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

/// Frame time for a fixed rate, e.g. for tests that step manually.
#[must_use]
pub fn fixed_frame_time(frame_rate: f64) -> FrameTime {
    FrameTime::from_duration(RuntimeConfig::new().with_frame_rate(frame_rate).frame_duration())
}
