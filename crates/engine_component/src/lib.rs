//! # engine_component
//!
//! The vocabulary shared by scripts and the native engine: who an entity is,
//! which kinds of component exist, and how component data is read and
//! written across the boundary.
//!
//! This crate provides:
//!
//! - [`EntityId`] — `u64` entity identifiers with a null sentinel.
//! - [`ComponentKind`] — the closed set of component kinds, each with a
//!   stable [`ComponentTypeId`].
//! - [`ComponentData`] / [`Component`] — the traits component data implements.
//! - [`FieldValue`] — typed values exchanged with the native store.
//! - [`AccessError`] — failures of a field or method access.

pub mod component;
pub mod entity;
pub mod error;
pub mod field;

pub use component::{Component, ComponentData, ComponentKind, ComponentTypeId};
pub use entity::EntityId;
pub use error::AccessError;
pub use field::{FieldType, FieldValue, FromFieldValue, argument};

// Re-exported so downstream crates name the same vector types.
pub use glam;
