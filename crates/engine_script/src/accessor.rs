//! Component accessors.
//!
//! A [`ComponentAccessor`] is bound to one (kind, entity) pair and forwards
//! every read, write and method call to the host as it happens; it never
//! holds component data itself. Accessors can only be obtained through
//! [`EntityHandle::get_component`], which checks existence first.
//!
//! Typed views ([`TransformAccessor`], [`Rigidbody2DAccessor`],
//! [`CameraAccessor`]) wrap an accessor and name the fields for you.

use engine_component::{AccessError, ComponentKind, EntityId, FieldValue, FromFieldValue};
use engine_math::{Camera, Quat, Rigidbody2D, Transform, Vec2, Vec3};

use crate::error::ScriptError;
use crate::handle::EntityHandle;
use crate::host::Severity;

/// A live view onto one component of one entity.
#[derive(Clone, Debug)]
pub struct ComponentAccessor {
    kind: ComponentKind,
    entity: EntityHandle,
}

impl ComponentAccessor {
    /// Only [`EntityHandle::get_component`] binds accessors, after checking
    /// that the component exists.
    pub(crate) fn bind(kind: ComponentKind, entity: EntityHandle) -> Self {
        Self { kind, entity }
    }

    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    #[must_use]
    pub fn entity_id(&self) -> EntityId {
        self.entity.id()
    }

    #[must_use]
    pub fn entity(&self) -> &EntityHandle {
        &self.entity
    }

    /// Whether the component is still attached. Accessors outlive neither
    /// the entity nor the component; after removal every call fails with a
    /// not-found error.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.entity.has_component(self.kind)
    }

    /// Read a field as a raw [`FieldValue`].
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Access`] if the host cannot serve the read.
    pub fn get_value(&self, field: &str) -> Result<FieldValue, ScriptError> {
        self.entity
            .host()
            .read_field(self.entity.id(), self.kind, field)
            .map_err(|err| self.report(field, err))
    }

    /// Read a typed field.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Access`] if the read fails or the stored value
    /// has a different type.
    pub fn get<T: FromFieldValue>(&self, field: &str) -> Result<T, ScriptError> {
        self.get_value(field)?
            .extract(field)
            .map_err(|err| self.report(field, err))
    }

    /// Write a field.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Access`] if the host rejects the write.
    pub fn set(&self, field: &str, value: impl Into<FieldValue>) -> Result<(), ScriptError> {
        self.entity
            .host()
            .write_field(self.entity.id(), self.kind, field, value.into())
            .map_err(|err| self.report(field, err))
    }

    /// Call a component method.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Access`] if the host rejects the call.
    pub fn call(
        &self,
        method: &str,
        args: &[FieldValue],
    ) -> Result<Option<FieldValue>, ScriptError> {
        self.entity
            .host()
            .invoke_method(self.entity.id(), self.kind, method, args)
            .map_err(|err| self.report(method, err))
    }

    fn report(&self, member: &str, err: AccessError) -> ScriptError {
        self.entity.host().log_diagnostic(
            Severity::Error,
            &format!("{}.{member} on {}: {err}", self.kind, self.entity.id()),
        );
        ScriptError::Access(err)
    }
}

/// A typed wrapper around a [`ComponentAccessor`] for one kind.
pub trait ComponentView: Sized {
    /// The kind this view reads.
    const KIND: ComponentKind;

    /// Wrap an accessor. Returns `None` unless it is bound to
    /// [`ComponentView::KIND`].
    fn from_accessor(accessor: ComponentAccessor) -> Option<Self>;

    /// The underlying accessor.
    fn accessor(&self) -> &ComponentAccessor;
}

macro_rules! component_view {
    ($view:ident, $kind:expr) => {
        impl ComponentView for $view {
            const KIND: ComponentKind = $kind;

            fn from_accessor(accessor: ComponentAccessor) -> Option<Self> {
                (accessor.kind() == Self::KIND).then(|| Self(accessor))
            }

            fn accessor(&self) -> &ComponentAccessor {
                &self.0
            }
        }
    };
}

/// Typed access to a [`Transform`].
#[derive(Clone, Debug)]
pub struct TransformAccessor(ComponentAccessor);

component_view!(TransformAccessor, ComponentKind::Transform);

impl TransformAccessor {
    pub fn translation(&self) -> Result<Vec3, ScriptError> {
        self.0.get(Transform::TRANSLATION)
    }

    pub fn set_translation(&self, translation: Vec3) -> Result<(), ScriptError> {
        self.0.set(Transform::TRANSLATION, translation)
    }

    pub fn rotation(&self) -> Result<Quat, ScriptError> {
        self.0.get(Transform::ROTATION)
    }

    pub fn set_rotation(&self, rotation: Quat) -> Result<(), ScriptError> {
        self.0.set(Transform::ROTATION, rotation)
    }

    pub fn scale(&self) -> Result<Vec3, ScriptError> {
        self.0.get(Transform::SCALE)
    }

    pub fn set_scale(&self, scale: Vec3) -> Result<(), ScriptError> {
        self.0.set(Transform::SCALE, scale)
    }
}

/// Typed access to a [`Rigidbody2D`].
#[derive(Clone, Debug)]
pub struct Rigidbody2DAccessor(ComponentAccessor);

component_view!(Rigidbody2DAccessor, ComponentKind::Rigidbody2D);

impl Rigidbody2DAccessor {
    pub fn linear_velocity(&self) -> Result<Vec2, ScriptError> {
        self.0.get(Rigidbody2D::LINEAR_VELOCITY)
    }

    pub fn set_linear_velocity(&self, velocity: Vec2) -> Result<(), ScriptError> {
        self.0.set(Rigidbody2D::LINEAR_VELOCITY, velocity)
    }

    pub fn angular_velocity(&self) -> Result<f32, ScriptError> {
        self.0.get(Rigidbody2D::ANGULAR_VELOCITY)
    }

    /// Apply `impulse` at `point` (relative to the centre of mass).
    pub fn apply_linear_impulse(
        &self,
        impulse: Vec2,
        point: Vec2,
        wake: bool,
    ) -> Result<(), ScriptError> {
        self.0
            .call(
                Rigidbody2D::APPLY_LINEAR_IMPULSE,
                &[impulse.into(), point.into(), wake.into()],
            )
            .map(|_| ())
    }

    pub fn apply_linear_impulse_to_center(
        &self,
        impulse: Vec2,
        wake: bool,
    ) -> Result<(), ScriptError> {
        self.0
            .call(
                Rigidbody2D::APPLY_LINEAR_IMPULSE_TO_CENTER,
                &[impulse.into(), wake.into()],
            )
            .map(|_| ())
    }
}

/// Typed access to a [`Camera`].
#[derive(Clone, Debug)]
pub struct CameraAccessor(ComponentAccessor);

component_view!(CameraAccessor, ComponentKind::Camera);

impl CameraAccessor {
    pub fn primary(&self) -> Result<bool, ScriptError> {
        self.0.get(Camera::PRIMARY)
    }

    pub fn set_primary(&self, primary: bool) -> Result<(), ScriptError> {
        self.0.set(Camera::PRIMARY, primary)
    }

    pub fn orthographic_size(&self) -> Result<f32, ScriptError> {
        self.0.get(Camera::ORTHOGRAPHIC_SIZE)
    }

    pub fn set_orthographic_size(&self, size: f32) -> Result<(), ScriptError> {
        self.0.set(Camera::ORTHOGRAPHIC_SIZE, size)
    }
}
