//! Component kinds and the traits component data implements.
//!
//! A [`ComponentKind`] is only ever used as a lookup key: scripts name the
//! kind they want and the native store resolves it against an entity. The
//! data itself implements [`ComponentData`], which exposes fields and methods
//! by name so a host can serve them through a uniform, type-checked protocol.
//!
//! ## Type Identity
//!
//! [`ComponentTypeId`] is derived from the kind's **string name** using the
//! FNV-1a 64-bit hash algorithm, so any language binding can compute the
//! same id for a given name.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::error::AccessError;
use crate::field::FieldValue;

/// A stable identifier for a component kind, the FNV-1a 64-bit hash of its
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Compute the id for a component name.
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }
}

/// The closed set of component kinds scripts can ask for.
///
/// Adding a kind means adding a variant here and a data type that implements
/// [`Component`] with that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Transform,
    Rigidbody2D,
    Camera,
    Script,
}

impl ComponentKind {
    /// Every kind, in declaration order.
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Transform,
        ComponentKind::Rigidbody2D,
        ComponentKind::Camera,
        ComponentKind::Script,
    ];

    /// The script-facing name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ComponentKind::Transform => "TransformComponent",
            ComponentKind::Rigidbody2D => "Rigidbody2DComponent",
            ComponentKind::Camera => "CameraComponent",
            ComponentKind::Script => "ScriptComponent",
        }
    }

    /// The language-neutral type id of this kind.
    #[must_use]
    pub const fn component_type_id(self) -> ComponentTypeId {
        ComponentTypeId::from_name(self.name())
    }

    /// Look a kind up by its script-facing name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Look a kind up by its type id.
    #[must_use]
    pub fn from_type_id(id: ComponentTypeId) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.component_type_id() == id)
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Object-safe access to one component instance.
///
/// Hosts store components behind this trait and serve script reads, writes
/// and method calls through it.
pub trait ComponentData: Any + std::fmt::Debug {
    /// The kind of this component.
    fn kind(&self) -> ComponentKind;

    /// Read a field by name.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnknownField`] if the component has no such field.
    fn field(&self, name: &str) -> Result<FieldValue, AccessError>;

    /// Write a field by name.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnknownField`] or [`AccessError::TypeMismatch`].
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), AccessError>;

    /// Invoke a named method. Components without methods keep the default.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnknownMethod`] by default.
    fn invoke(
        &mut self,
        method: &str,
        _args: &[FieldValue],
    ) -> Result<Option<FieldValue>, AccessError> {
        Err(AccessError::UnknownMethod {
            kind: self.kind(),
            method: method.to_string(),
        })
    }
}

/// A concrete component type with a statically known kind.
///
/// # Examples
///
/// ```rust
/// use engine_component::{AccessError, Component, ComponentData, ComponentKind, FieldValue};
///
/// #[derive(Debug, Default)]
/// struct Camera {
///     primary: bool,
/// }
///
/// impl ComponentData for Camera {
///     fn kind(&self) -> ComponentKind { Self::KIND }
///
///     fn field(&self, name: &str) -> Result<FieldValue, AccessError> {
///         match name {
///             "primary" => Ok(self.primary.into()),
///             _ => Err(AccessError::UnknownField { kind: Self::KIND, field: name.into() }),
///         }
///     }
///
///     fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), AccessError> {
///         match name {
///             "primary" => self.primary = value.extract(name)?,
///             _ => return Err(AccessError::UnknownField { kind: Self::KIND, field: name.into() }),
///         }
///         Ok(())
///     }
/// }
///
/// impl Component for Camera {
///     const KIND: ComponentKind = ComponentKind::Camera;
/// }
/// ```
pub trait Component: ComponentData + Sized {
    /// The kind this type is stored under.
    const KIND: ComponentKind;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_is_stable() {
        assert_eq!(
            ComponentKind::Transform.component_type_id(),
            ComponentKind::Transform.component_type_id()
        );
    }

    #[test]
    fn test_type_id_matches_from_name() {
        assert_eq!(
            ComponentKind::Rigidbody2D.component_type_id(),
            ComponentTypeId::from_name("Rigidbody2DComponent")
        );
    }

    #[test]
    fn test_type_ids_differ_between_kinds() {
        for a in ComponentKind::ALL {
            for b in ComponentKind::ALL {
                if a != b {
                    assert_ne!(a.component_type_id(), b.component_type_id());
                }
            }
        }
    }

    #[test]
    fn test_fnv1a_known_vector() {
        // FNV-1a 64-bit of the empty string is the offset basis itself.
        assert_eq!(
            ComponentTypeId::from_name(""),
            ComponentTypeId(0xcbf2_9ce4_8422_2325)
        );
    }

    #[test]
    fn test_kind_name_lookup() {
        for kind in ComponentKind::ALL {
            assert_eq!(ComponentKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ComponentKind::from_name("SpriteComponent"), None);
    }

    #[test]
    fn test_kind_type_id_lookup() {
        for kind in ComponentKind::ALL {
            assert_eq!(
                ComponentKind::from_type_id(kind.component_type_id()),
                Some(kind)
            );
        }
        assert_eq!(
            ComponentKind::from_type_id(ComponentTypeId::from_name("SpriteComponent")),
            None
        );
    }
}
