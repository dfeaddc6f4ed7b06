//! Typed values exchanged across the script/engine boundary.
//!
//! Component fields and script fields are both read and written as
//! [`FieldValue`]s. The variant set is deliberately small: it covers every
//! type a script can hold in a public field or pass to a component method.

use glam::{Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::AccessError;

/// The type tag of a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Quat,
    Text,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Vec2 => "Vector2",
            FieldType::Vec3 => "Vector3",
            FieldType::Vec4 => "Vector4",
            FieldType::Quat => "Quaternion",
            FieldType::Text => "str",
        };
        f.write_str(name)
    }
}

/// A single typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Quat(Quat),
    Text(String),
}

impl FieldValue {
    /// Returns the type tag of this value.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Vec2(_) => FieldType::Vec2,
            FieldValue::Vec3(_) => FieldType::Vec3,
            FieldValue::Vec4(_) => FieldType::Vec4,
            FieldValue::Quat(_) => FieldType::Quat,
            FieldValue::Text(_) => FieldType::Text,
        }
    }

    /// Extract a typed value, reporting a mismatch against `field`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::TypeMismatch`] if the variant does not match `T`.
    pub fn extract<T: FromFieldValue>(self, field: &str) -> Result<T, AccessError> {
        let found = self.field_type();
        T::from_field_value(self).ok_or_else(|| AccessError::TypeMismatch {
            field: field.to_string(),
            expected: T::FIELD_TYPE,
            found,
        })
    }
}

/// Conversion out of a [`FieldValue`].
pub trait FromFieldValue: Sized {
    /// The variant this type is stored as.
    const FIELD_TYPE: FieldType;

    /// Returns `None` if `value` holds a different variant.
    fn from_field_value(value: FieldValue) -> Option<Self>;
}

macro_rules! field_value_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(value)
                }
            }

            impl FromFieldValue for $ty {
                const FIELD_TYPE: FieldType = FieldType::$variant;

                fn from_field_value(value: FieldValue) -> Option<Self> {
                    match value {
                        FieldValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

field_value_conversions! {
    bool => Bool,
    i32 => Int,
    f32 => Float,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    Quat => Quat,
    String => Text,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Pull the argument at `index` out of a method argument list.
///
/// # Errors
///
/// Returns [`AccessError::InvalidArguments`] if the argument is missing and
/// [`AccessError::TypeMismatch`] if it has the wrong type.
pub fn argument<T: FromFieldValue>(
    method: &str,
    args: &[FieldValue],
    index: usize,
) -> Result<T, AccessError> {
    let value = args
        .get(index)
        .cloned()
        .ok_or_else(|| AccessError::InvalidArguments {
            method: method.to_string(),
            message: format!("expected at least {} argument(s), got {}", index + 1, args.len()),
        })?;
    value.extract(&format!("{method}[{index}]"))
}
