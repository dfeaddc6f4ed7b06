//! Script-layer error types.

use engine_component::{AccessError, EntityId};

use crate::instance::LifecycleState;

/// Errors surfaced to script code and to the host that drives it.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// A component field or method access failed on the native side.
    #[error("component access failed: {0}")]
    Access(#[from] AccessError),

    /// No entity carries the requested name.
    #[error("no entity named '{0}'")]
    EntityNotFound(String),

    /// No script class is registered under this name.
    #[error("unknown script class '{0}'")]
    UnknownScriptClass(String),

    /// A script has no public field with this name.
    #[error("script has no field '{0}'")]
    UnknownField(String),

    /// The entity has no script instance; only a bare handle was found.
    #[error("{0} has no script instance")]
    NotAScriptInstance(EntityId),

    /// The script instance is not of the requested type.
    #[error("script instance on {entity} is a '{class_name}', not a {expected}")]
    WrongScriptType {
        entity: EntityId,
        class_name: String,
        expected: &'static str,
    },

    /// A hook was invoked in a state that does not allow it.
    #[error("cannot invoke {hook} on {entity} in state {state:?}")]
    Lifecycle {
        entity: EntityId,
        hook: &'static str,
        state: LifecycleState,
    },

    /// The script instance is already borrowed, i.e. one of its own hooks is
    /// running further up the stack.
    #[error("script instance on {0} is busy")]
    InstanceBusy(EntityId),

    /// Failed to encode script data to MessagePack.
    #[error("failed to encode script data: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode script data from MessagePack.
    #[error("failed to decode script data: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// A failure raised by script code itself.
    #[error("{0}")]
    Failed(String),
}

impl ScriptError {
    /// Build a [`ScriptError::Failed`] from any message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        ScriptError::Failed(message.into())
    }

    /// Returns `true` if this error means "the thing asked for is absent".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            ScriptError::Access(err) => err.is_not_found(),
            ScriptError::EntityNotFound(_) => true,
            _ => false,
        }
    }
}
