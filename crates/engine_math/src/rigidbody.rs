//! 2D rigid body component.
//!
//! The host owns the physics simulation; this type only carries the body's
//! script-visible state and accumulates impulses applied from scripts.

use engine_component::{
    AccessError, Component, ComponentData, ComponentKind, FieldValue, argument,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How the physics world moves a body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    #[default]
    Static,
    Dynamic,
    Kinematic,
}

/// Script-visible state of a 2D rigid body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rigidbody2D {
    pub body_type: BodyType,
    /// Linear velocity in world units per second.
    pub linear_velocity: Vec2,
    /// Angular velocity in radians per second.
    pub angular_velocity: f32,
    /// Body mass; impulses are divided by it. Never zero.
    pub mass: f32,
    pub fixed_rotation: bool,
    /// Whether the body is awake.
    pub awake: bool,
}

impl Rigidbody2D {
    pub const LINEAR_VELOCITY: &'static str = "linear_velocity";
    pub const ANGULAR_VELOCITY: &'static str = "angular_velocity";
    pub const MASS: &'static str = "mass";
    pub const FIXED_ROTATION: &'static str = "fixed_rotation";
    pub const AWAKE: &'static str = "awake";

    pub const APPLY_LINEAR_IMPULSE: &'static str = "ApplyLinearImpulse";
    pub const APPLY_LINEAR_IMPULSE_TO_CENTER: &'static str = "ApplyLinearImpulseToCenter";

    /// A dynamic body of unit mass at rest.
    #[must_use]
    pub fn dynamic() -> Self {
        Self {
            body_type: BodyType::Dynamic,
            ..Self::default()
        }
    }

    /// Apply an impulse at the body's centre of mass.
    pub fn apply_linear_impulse_to_center(&mut self, impulse: Vec2, wake: bool) {
        self.apply_linear_impulse(impulse, Vec2::ZERO, wake);
    }

    /// Apply an impulse at `point`, given relative to the centre of mass.
    ///
    /// Static bodies ignore impulses. A sleeping body only reacts when `wake`
    /// is set.
    pub fn apply_linear_impulse(&mut self, impulse: Vec2, point: Vec2, wake: bool) {
        if self.body_type != BodyType::Dynamic {
            return;
        }
        if !self.awake {
            if !wake {
                return;
            }
            self.awake = true;
        }

        let inv_mass = self.mass.recip();
        self.linear_velocity += impulse * inv_mass;
        if !self.fixed_rotation {
            self.angular_velocity += point.perp_dot(impulse) * inv_mass;
        }
    }
}

impl Default for Rigidbody2D {
    fn default() -> Self {
        Self {
            body_type: BodyType::Static,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            mass: 1.0,
            fixed_rotation: false,
            awake: true,
        }
    }
}

impl ComponentData for Rigidbody2D {
    fn kind(&self) -> ComponentKind {
        Self::KIND
    }

    fn field(&self, name: &str) -> Result<FieldValue, AccessError> {
        match name {
            Self::LINEAR_VELOCITY => Ok(self.linear_velocity.into()),
            Self::ANGULAR_VELOCITY => Ok(self.angular_velocity.into()),
            Self::MASS => Ok(self.mass.into()),
            Self::FIXED_ROTATION => Ok(self.fixed_rotation.into()),
            Self::AWAKE => Ok(self.awake.into()),
            _ => Err(crate::unknown_field(Self::KIND, name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), AccessError> {
        match name {
            Self::LINEAR_VELOCITY => self.linear_velocity = value.extract(name)?,
            Self::ANGULAR_VELOCITY => self.angular_velocity = value.extract(name)?,
            Self::MASS => {
                let mass: f32 = value.extract(name)?;
                if !(mass.is_finite() && mass > 0.0) {
                    return Err(AccessError::InvalidArguments {
                        method: name.to_string(),
                        message: format!("mass must be positive and finite, got {mass}"),
                    });
                }
                self.mass = mass;
            }
            Self::FIXED_ROTATION => self.fixed_rotation = value.extract(name)?,
            Self::AWAKE => self.awake = value.extract(name)?,
            _ => return Err(crate::unknown_field(Self::KIND, name)),
        }
        Ok(())
    }

    fn invoke(
        &mut self,
        method: &str,
        args: &[FieldValue],
    ) -> Result<Option<FieldValue>, AccessError> {
        match method {
            Self::APPLY_LINEAR_IMPULSE => {
                let impulse = argument(method, args, 0)?;
                let point = argument(method, args, 1)?;
                let wake = argument(method, args, 2)?;
                self.apply_linear_impulse(impulse, point, wake);
                Ok(None)
            }
            Self::APPLY_LINEAR_IMPULSE_TO_CENTER => {
                let impulse = argument(method, args, 0)?;
                let wake = argument(method, args, 1)?;
                self.apply_linear_impulse_to_center(impulse, wake);
                Ok(None)
            }
            _ => Err(AccessError::UnknownMethod {
                kind: Self::KIND,
                method: method.to_string(),
            }),
        }
    }
}

impl Component for Rigidbody2D {
    const KIND: ComponentKind = ComponentKind::Rigidbody2D;
}
