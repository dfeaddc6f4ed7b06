//! Casting handles to script instances.
//!
//! [`as_script_instance`] turns an [`EntityHandle`] into the user-defined
//! script object registered for that entity, so that one script can reach
//! another script's fields and methods. Entities without a script fall back
//! to the handle itself; the result is a [`ScriptRef`] either way and can be
//! used as a plain handle through `Deref`.

use std::ops::Deref;

use engine_component::EntityId;
use tracing::trace;

use crate::error::ScriptError;
use crate::handle::EntityHandle;
use crate::instance::{Behavior, ScriptInstance};

/// The result of casting a handle: the registered script instance, or the
/// original handle when none is registered.
#[derive(Clone)]
pub enum ScriptRef {
    Instance(ScriptInstance),
    Entity(EntityHandle),
}

impl ScriptRef {
    /// The entity behind this reference.
    #[must_use]
    pub fn entity(&self) -> &EntityHandle {
        match self {
            ScriptRef::Instance(instance) => instance.entity(),
            ScriptRef::Entity(handle) => handle,
        }
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.entity().id()
    }

    #[must_use]
    pub fn instance(&self) -> Option<&ScriptInstance> {
        match self {
            ScriptRef::Instance(instance) => Some(instance),
            ScriptRef::Entity(_) => None,
        }
    }

    /// Consume into the script instance.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::NotAScriptInstance`] if the cast fell back to
    /// the bare handle.
    pub fn into_instance(self) -> Result<ScriptInstance, ScriptError> {
        match self {
            ScriptRef::Instance(instance) => Ok(instance),
            ScriptRef::Entity(handle) => Err(ScriptError::NotAScriptInstance(handle.id())),
        }
    }

    #[must_use]
    pub fn is_instance(&self) -> bool {
        matches!(self, ScriptRef::Instance(_))
    }

    /// Identity comparison: two instances are the same only if they are the
    /// same object, two fallbacks are the same if they name the same entity.
    #[must_use]
    pub fn same_as(&self, other: &ScriptRef) -> bool {
        match (self, other) {
            (ScriptRef::Instance(a), ScriptRef::Instance(b)) => a.ptr_eq(b),
            (ScriptRef::Entity(a), ScriptRef::Entity(b)) => a == b,
            _ => false,
        }
    }

    /// Borrow the script as a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::NotAScriptInstance`] for a fallback handle and
    /// [`ScriptError::WrongScriptType`] if the script is not a `T`.
    pub fn with<T: Behavior, R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, ScriptError> {
        match self {
            ScriptRef::Instance(instance) => instance.with(f),
            ScriptRef::Entity(handle) => Err(ScriptError::NotAScriptInstance(handle.id())),
        }
    }

    /// Mutably borrow the script as a `T`.
    ///
    /// # Errors
    ///
    /// As for [`ScriptRef::with`], plus [`ScriptError::InstanceBusy`] when
    /// the script's own hook is running.
    pub fn with_mut<T: Behavior, R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, ScriptError> {
        match self {
            ScriptRef::Instance(instance) => instance.with_mut(f),
            ScriptRef::Entity(handle) => Err(ScriptError::NotAScriptInstance(handle.id())),
        }
    }
}

impl Deref for ScriptRef {
    type Target = EntityHandle;

    fn deref(&self) -> &EntityHandle {
        self.entity()
    }
}

impl From<ScriptInstance> for ScriptRef {
    fn from(instance: ScriptInstance) -> Self {
        ScriptRef::Instance(instance)
    }
}

impl From<EntityHandle> for ScriptRef {
    fn from(handle: EntityHandle) -> Self {
        ScriptRef::Entity(handle)
    }
}

impl std::fmt::Debug for ScriptRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptRef::Instance(instance) => f.debug_tuple("Instance").field(instance).finish(),
            ScriptRef::Entity(handle) => f.debug_tuple("Entity").field(handle).finish(),
        }
    }
}

/// Return the script instance registered for `handle`'s entity, or the
/// handle itself if there is none. Never fails and never logs.
#[must_use]
pub fn as_script_instance(handle: &EntityHandle) -> ScriptRef {
    let host = handle.host();
    if !handle.is_null()
        && host.has_registered_instance(handle.id())
        && let Some(instance) = host.registered_instance(handle.id())
    {
        trace!(entity = %handle.id(), class = instance.class_name(), "cast to script instance");
        return ScriptRef::Instance(instance);
    }
    ScriptRef::Entity(handle.clone())
}
