//! Transform component.
//!
//! [`Transform`] represents translation, rotation and scale in 3D space.
//! Every entity the host creates carries one.

use engine_component::{AccessError, Component, ComponentData, ComponentKind, FieldValue};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Translation, rotation and per-axis scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// World-space translation.
    pub translation: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform {
    /// Field name of [`Transform::translation`].
    pub const TRANSLATION: &'static str = "translation";
    /// Field name of [`Transform::rotation`].
    pub const ROTATION: &'static str = "rotation";
    /// Field name of [`Transform::scale`].
    pub const SCALE: &'static str = "scale";

    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform at the given translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Compute the 4×4 model matrix for this transform.
    #[must_use]
    pub fn to_matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Translate the transform by the given offset.
    #[must_use]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.translation += offset;
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ComponentData for Transform {
    fn kind(&self) -> ComponentKind {
        Self::KIND
    }

    fn field(&self, name: &str) -> Result<FieldValue, AccessError> {
        match name {
            Self::TRANSLATION => Ok(self.translation.into()),
            Self::ROTATION => Ok(self.rotation.into()),
            Self::SCALE => Ok(self.scale.into()),
            _ => Err(crate::unknown_field(Self::KIND, name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), AccessError> {
        match name {
            Self::TRANSLATION => self.translation = value.extract(name)?,
            Self::ROTATION => self.rotation = value.extract(name)?,
            Self::SCALE => self.scale = value.extract(name)?,
            _ => return Err(crate::unknown_field(Self::KIND, name)),
        }
        Ok(())
    }
}

impl Component for Transform {
    const KIND: ComponentKind = ComponentKind::Transform;
}
