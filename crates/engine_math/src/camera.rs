//! Camera component.

use engine_component::{AccessError, Component, ComponentData, ComponentKind, FieldValue};
use serde::{Deserialize, Serialize};

/// Script-visible camera settings. Projection itself is the renderer's job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Camera {
    /// Whether this camera drives the main viewport.
    pub primary: bool,
    /// Half-height of the orthographic view volume.
    pub orthographic_size: f32,
    pub fixed_aspect_ratio: bool,
}

impl Camera {
    pub const PRIMARY: &'static str = "primary";
    pub const ORTHOGRAPHIC_SIZE: &'static str = "orthographic_size";
    pub const FIXED_ASPECT_RATIO: &'static str = "fixed_aspect_ratio";
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            primary: true,
            orthographic_size: 10.0,
            fixed_aspect_ratio: false,
        }
    }
}

impl ComponentData for Camera {
    fn kind(&self) -> ComponentKind {
        Self::KIND
    }

    fn field(&self, name: &str) -> Result<FieldValue, AccessError> {
        match name {
            Self::PRIMARY => Ok(self.primary.into()),
            Self::ORTHOGRAPHIC_SIZE => Ok(self.orthographic_size.into()),
            Self::FIXED_ASPECT_RATIO => Ok(self.fixed_aspect_ratio.into()),
            _ => Err(crate::unknown_field(Self::KIND, name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), AccessError> {
        match name {
            Self::PRIMARY => self.primary = value.extract(name)?,
            Self::ORTHOGRAPHIC_SIZE => self.orthographic_size = value.extract(name)?,
            Self::FIXED_ASPECT_RATIO => self.fixed_aspect_ratio = value.extract(name)?,
            _ => return Err(crate::unknown_field(Self::KIND, name)),
        }
        Ok(())
    }
}

impl Component for Camera {
    const KIND: ComponentKind = ComponentKind::Camera;
}
