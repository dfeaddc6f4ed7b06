//! # engine_math
//!
//! Math and spatial component types. Re-exports [`glam`] for linear algebra
//! and defines the component data scripts reach through the native store,
//! each implementing [`Component`](engine_component::Component).

pub mod camera;
pub mod rigidbody;
pub mod transform;

use engine_component::{AccessError, ComponentKind};

// Re-export glam types for convenience.
pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

pub use camera::Camera;
pub use rigidbody::{BodyType, Rigidbody2D};
pub use transform::Transform;

fn unknown_field(kind: ComponentKind, field: &str) -> AccessError {
    AccessError::UnknownField {
        kind,
        field: field.to_string(),
    }
}
