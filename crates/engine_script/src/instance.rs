//! Behaviors and the script instances that wrap them.
//!
//! A [`Behavior`] is user code: a type that owns an [`EntityHandle`] and
//! overrides whichever lifecycle hooks it needs. The host wraps each one in a
//! [`ScriptInstance`], which is what the instance registry stores and what
//! casting hands out. Cloning a `ScriptInstance` clones a reference, so two
//! lookups of the same entity yield the very same object.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --on_create--> Created --on_update--> Active --(destroy)--> Destroyed
//! ```
//!
//! `on_create` runs exactly once and before any `on_update`. `on_event` is
//! accepted in `Created` and `Active`. Nothing runs after `Destroyed`.

use std::any::{Any, type_name};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use engine_component::{EntityId, FieldValue};
use tracing::trace;

use crate::error::ScriptError;
use crate::event::ScriptEvent;
use crate::fields::ScriptFieldMap;
use crate::handle::EntityHandle;
use crate::time::FrameTime;

/// User-defined logic bound to one entity.
///
/// Every hook has an empty default, so a behavior only implements the ones
/// it cares about.
///
/// # Examples
///
/// ```rust,ignore
/// struct Spinner {
///     entity: EntityHandle,
///     speed: f32,
/// }
///
/// impl Behavior for Spinner {
///     fn on_update(&mut self, frame_time: FrameTime) -> Result<(), ScriptError> {
///         if let Some(transform) = self.entity.transform() {
///             let angle = self.speed * frame_time.as_seconds();
///             transform.set_rotation(transform.rotation()? * Quat::from_rotation_z(angle))?;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Behavior: Any {
    /// Called once, after construction and before the first update.
    fn on_create(&mut self) -> Result<(), ScriptError> {
        Ok(())
    }

    /// Called once per frame.
    fn on_update(&mut self, _frame_time: FrameTime) -> Result<(), ScriptError> {
        Ok(())
    }

    /// Called for engine events between creation and destruction.
    fn on_event(&mut self, _event: &ScriptEvent) -> Result<(), ScriptError> {
        Ok(())
    }

    /// The public, editor-visible fields and their current values.
    fn fields(&self) -> ScriptFieldMap {
        ScriptFieldMap::new()
    }

    /// Overwrite one public field.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownField`] unless overridden.
    fn set_field(&mut self, name: &str, _value: FieldValue) -> Result<(), ScriptError> {
        Err(ScriptError::UnknownField(name.to_string()))
    }
}

/// Where a script instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Created,
    Active,
    Destroyed,
}

struct Inner {
    class_name: String,
    entity: EntityHandle,
    state: Cell<LifecycleState>,
    behavior: RefCell<Box<dyn Behavior>>,
}

/// A shared, lifecycle-tracked reference to one behavior.
#[derive(Clone)]
pub struct ScriptInstance {
    inner: Rc<Inner>,
}

impl ScriptInstance {
    /// Wrap a freshly constructed behavior. The instance starts
    /// [`LifecycleState::Uninitialized`].
    #[must_use]
    pub fn new(
        class_name: impl Into<String>,
        entity: EntityHandle,
        behavior: Box<dyn Behavior>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                class_name: class_name.into(),
                entity,
                state: Cell::new(LifecycleState::Uninitialized),
                behavior: RefCell::new(behavior),
            }),
        }
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.inner.class_name
    }

    #[must_use]
    pub fn entity(&self) -> &EntityHandle {
        &self.inner.entity
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.inner.entity.id()
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.inner.state.get()
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.state() == LifecycleState::Destroyed
    }

    /// Whether both references point at the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &ScriptInstance) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Run `on_create`.
    ///
    /// # Errors
    ///
    /// Fails with [`ScriptError::Lifecycle`] unless the instance is
    /// uninitialized, otherwise returns whatever the hook returns.
    pub fn invoke_on_create(&self) -> Result<(), ScriptError> {
        match self.state() {
            LifecycleState::Uninitialized => {
                self.inner.state.set(LifecycleState::Created);
                trace!(entity = %self.id(), class = self.class_name(), "on_create");
                self.run(|behavior| behavior.on_create())
            }
            state => Err(self.rejected("on_create", state)),
        }
    }

    /// Run `on_update`, moving a created instance to active.
    ///
    /// # Errors
    ///
    /// Fails with [`ScriptError::Lifecycle`] before `on_create` or after
    /// destruction, otherwise returns whatever the hook returns.
    pub fn invoke_on_update(&self, frame_time: FrameTime) -> Result<(), ScriptError> {
        match self.state() {
            LifecycleState::Created | LifecycleState::Active => {
                self.inner.state.set(LifecycleState::Active);
                self.run(|behavior| behavior.on_update(frame_time))
            }
            state => Err(self.rejected("on_update", state)),
        }
    }

    /// Run `on_event`. Does not change state.
    ///
    /// # Errors
    ///
    /// Fails with [`ScriptError::Lifecycle`] before `on_create` or after
    /// destruction, otherwise returns whatever the hook returns.
    pub fn invoke_on_event(&self, event: &ScriptEvent) -> Result<(), ScriptError> {
        match self.state() {
            LifecycleState::Created | LifecycleState::Active => {
                self.run(|behavior| behavior.on_event(event))
            }
            state => Err(self.rejected("on_event", state)),
        }
    }

    /// Move to the terminal state. Called by the host when the entity dies.
    pub fn mark_destroyed(&self) {
        self.inner.state.set(LifecycleState::Destroyed);
    }

    /// The behavior's public fields.
    ///
    /// # Errors
    ///
    /// Fails with [`ScriptError::InstanceBusy`] from inside the instance's
    /// own hook.
    pub fn fields(&self) -> Result<ScriptFieldMap, ScriptError> {
        let behavior = self
            .inner
            .behavior
            .try_borrow()
            .map_err(|_| ScriptError::InstanceBusy(self.id()))?;
        Ok(behavior.fields())
    }

    /// Overwrite one of the behavior's public fields.
    ///
    /// # Errors
    ///
    /// Fails with [`ScriptError::InstanceBusy`] from inside the instance's
    /// own hook, or with whatever the behavior reports.
    pub fn set_field(&self, name: &str, value: FieldValue) -> Result<(), ScriptError> {
        self.ensure_alive("set_field")?;
        self.run(|behavior| behavior.set_field(name, value))
    }

    /// Whether the behavior is a `T`.
    #[must_use]
    pub fn is<T: Behavior>(&self) -> bool {
        self.inner.behavior.try_borrow().is_ok_and(|behavior| {
            let behavior: &dyn Behavior = &**behavior;
            let any: &dyn Any = behavior;
            any.is::<T>()
        })
    }

    /// Borrow the behavior as a `T`.
    ///
    /// # Errors
    ///
    /// Fails with [`ScriptError::WrongScriptType`] if the behavior is not a
    /// `T`, [`ScriptError::InstanceBusy`] if it is mutably borrowed, or
    /// [`ScriptError::Lifecycle`] once the instance is destroyed.
    pub fn with<T: Behavior, R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, ScriptError> {
        self.ensure_alive("with")?;
        let behavior = self
            .inner
            .behavior
            .try_borrow()
            .map_err(|_| ScriptError::InstanceBusy(self.id()))?;
        let behavior: &dyn Behavior = &**behavior;
        let any: &dyn Any = behavior;
        any.downcast_ref::<T>()
            .map(f)
            .ok_or_else(|| self.wrong_type::<T>())
    }

    /// Mutably borrow the behavior as a `T`.
    ///
    /// # Errors
    ///
    /// Fails with [`ScriptError::WrongScriptType`] if the behavior is not a
    /// `T`, [`ScriptError::InstanceBusy`] if it is already borrowed, or
    /// [`ScriptError::Lifecycle`] once the instance is destroyed.
    pub fn with_mut<T: Behavior, R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, ScriptError> {
        self.ensure_alive("with_mut")?;
        let mut behavior = self
            .inner
            .behavior
            .try_borrow_mut()
            .map_err(|_| ScriptError::InstanceBusy(self.id()))?;
        let behavior: &mut dyn Behavior = &mut **behavior;
        let any: &mut dyn Any = behavior;
        match any.downcast_mut::<T>() {
            Some(typed) => Ok(f(typed)),
            None => Err(self.wrong_type::<T>()),
        }
    }

    fn run(
        &self,
        hook: impl FnOnce(&mut dyn Behavior) -> Result<(), ScriptError>,
    ) -> Result<(), ScriptError> {
        let mut behavior = self
            .inner
            .behavior
            .try_borrow_mut()
            .map_err(|_| ScriptError::InstanceBusy(self.id()))?;
        hook(&mut **behavior)
    }

    /// Destroyed behaviors are unreachable, even through retained references.
    fn ensure_alive(&self, hook: &'static str) -> Result<(), ScriptError> {
        if self.is_destroyed() {
            return Err(self.rejected(hook, LifecycleState::Destroyed));
        }
        Ok(())
    }

    fn rejected(&self, hook: &'static str, state: LifecycleState) -> ScriptError {
        ScriptError::Lifecycle {
            entity: self.id(),
            hook,
            state,
        }
    }

    fn wrong_type<T>(&self) -> ScriptError {
        ScriptError::WrongScriptType {
            entity: self.id(),
            class_name: self.class_name().to_string(),
            expected: type_name::<T>(),
        }
    }
}

impl std::fmt::Debug for ScriptInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptInstance")
            .field("class_name", &self.inner.class_name)
            .field("entity", &self.inner.entity.id())
            .field("state", &self.inner.state.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        speed: f32,
    }

    impl Behavior for Recorder {
        fn on_create(&mut self) -> Result<(), ScriptError> {
            self.calls.push("create".into());
            Ok(())
        }

        fn on_update(&mut self, frame_time: FrameTime) -> Result<(), ScriptError> {
            self.calls.push(format!("update {}", frame_time.as_millis()));
            Ok(())
        }

        fn on_event(&mut self, event: &ScriptEvent) -> Result<(), ScriptError> {
            self.calls.push(format!("event {}", event.name()));
            Ok(())
        }

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

    struct Other;

    impl Behavior for Other {}

    fn instance() -> ScriptInstance {
        let fake = FakeHost::new();
        ScriptInstance::new(
            "Recorder",
            EntityHandle::new(EntityId(1), fake),
            Box::new(Recorder::default()),
        )
    }

    fn calls(instance: &ScriptInstance) -> Vec<String> {
        instance.with(|r: &Recorder| r.calls.clone()).unwrap()
    }

    #[test]
    fn test_full_lifecycle() {
        let instance = instance();
        assert_eq!(instance.state(), LifecycleState::Uninitialized);

        instance.invoke_on_create().unwrap();
        assert_eq!(instance.state(), LifecycleState::Created);

        instance.invoke_on_event(&ScriptEvent::custom("Hit")).unwrap();
        assert_eq!(instance.state(), LifecycleState::Created);

        instance
            .invoke_on_update(FrameTime::from_millis(16.0))
            .unwrap();
        assert_eq!(instance.state(), LifecycleState::Active);
        instance.invoke_on_update(FrameTime::ZERO).unwrap();
        assert_eq!(calls(&instance), vec!["create", "event Hit", "update 16", "update 0"]);

        instance.mark_destroyed();
        assert_eq!(instance.state(), LifecycleState::Destroyed);
    }

    #[test]
    fn test_update_before_create_is_rejected() {
        let instance = instance();
        let err = instance.invoke_on_update(FrameTime::ZERO).unwrap_err();
        assert!(matches!(
            err,
            ScriptError::Lifecycle {
                hook: "on_update",
                state: LifecycleState::Uninitialized,
                ..
            }
        ));
        assert!(calls(&instance).is_empty());
    }

    #[test]
    fn test_create_runs_once() {
        let instance = instance();
        instance.invoke_on_create().unwrap();
        assert!(instance.invoke_on_create().is_err());
        assert_eq!(calls(&instance), vec!["create"]);
    }

    #[test]
    fn test_no_hooks_after_destroy() {
        let instance = instance();
        instance.invoke_on_create().unwrap();
        let retained = instance.clone();
        instance.mark_destroyed();
        assert!(instance.invoke_on_update(FrameTime::ZERO).is_err());
        assert!(instance.invoke_on_event(&ScriptEvent::custom("x")).is_err());
        assert_eq!(retained.state(), LifecycleState::Destroyed);
    }

    #[test]
    fn test_destroyed_behavior_is_unreachable() {
        let instance = instance();
        instance.invoke_on_create().unwrap();
        let retained = instance.clone();
        instance.mark_destroyed();

        assert!(matches!(
            retained.with_mut(|r: &mut Recorder| r.speed = 100.0),
            Err(ScriptError::Lifecycle {
                hook: "with_mut",
                state: LifecycleState::Destroyed,
                ..
            })
        ));
        assert!(matches!(
            retained.with(|r: &Recorder| r.speed),
            Err(ScriptError::Lifecycle { hook: "with", .. })
        ));
        assert!(retained.set_field("speed", FieldValue::Float(1.0)).is_err());
    }

    #[test]
    fn test_clone_shares_identity() {
        let a = instance();
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&instance()));
    }

    #[test]
    fn test_downcast() {
        let instance = instance();
        assert!(instance.is::<Recorder>());
        assert!(!instance.is::<Other>());
        assert!(matches!(
            instance.with(|_: &Other| ()),
            Err(ScriptError::WrongScriptType { .. })
        ));
        instance.with_mut(|r: &mut Recorder| r.speed = 3.0).unwrap();
        assert_eq!(instance.with(|r: &Recorder| r.speed).unwrap(), 3.0);
    }

    #[test]
    fn test_fields_roundtrip_through_behavior() {
        let instance = instance();
        instance.set_field("speed", FieldValue::Float(5.0)).unwrap();
        assert_eq!(
            instance.fields().unwrap().get("speed"),
            Some(&FieldValue::Float(5.0))
        );
        assert!(matches!(
            instance.set_field("missing", FieldValue::Bool(true)),
            Err(ScriptError::UnknownField(_))
        ));
    }

    #[test]
    fn test_reentrant_borrow_is_busy() {
        let instance = instance();
        let result = instance.with_mut(|_: &mut Recorder| instance.invoke_on_create());
        assert!(matches!(result, Ok(Err(ScriptError::InstanceBusy(_)))));
    }
}
