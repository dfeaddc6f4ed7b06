//! Component access error types.

use crate::component::ComponentKind;
use crate::entity::EntityId;
use crate::field::FieldType;

/// Errors a native host reports when a component field or method is accessed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccessError {
    /// The entity does not exist (never did, or was destroyed).
    #[error("{0} does not exist")]
    EntityNotFound(EntityId),

    /// The entity exists but has no component of this kind.
    #[error("{entity} has no {kind} component")]
    ComponentNotFound {
        entity: EntityId,
        kind: ComponentKind,
    },

    /// The component has no field with this name.
    #[error("{kind} has no field '{field}'")]
    UnknownField { kind: ComponentKind, field: String },

    /// The component has no method with this name.
    #[error("{kind} has no method '{method}'")]
    UnknownMethod { kind: ComponentKind, method: String },

    /// A value had the wrong type for the field or argument.
    #[error("type mismatch on '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        found: FieldType,
    },

    /// A method was called with the wrong number of arguments.
    #[error("invalid arguments for '{method}': {message}")]
    InvalidArguments { method: String, message: String },
}

impl AccessError {
    /// Returns `true` for the two "absent" cases: missing entity or missing
    /// component.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AccessError::EntityNotFound(_) | AccessError::ComponentNotFound { .. }
        )
    }
}
