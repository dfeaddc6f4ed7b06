//! # engine_script
//!
//! The binding layer between gameplay scripts and the native engine.
//!
//! Scripts never touch engine storage directly. Everything they do goes
//! through an [`EngineHost`], which the engine implements:
//!
//! - [`EntityHandle`] — a script's reference to an entity; checks for and
//!   hands out components.
//! - [`ComponentAccessor`] — a live view onto one component; every read,
//!   write and method call is forwarded to the host as it happens.
//! - [`EntityResolver`] — finds entities by display name.
//! - [`as_script_instance`] — turns a handle into the user-defined script
//!   registered for that entity, falling back to the handle itself.
//! - [`Behavior`] / [`ScriptInstance`] — user logic and its lifecycle
//!   (`on_create` once, then `on_update` every frame, `on_event` on demand).
//! - [`ScriptClassRegistry`] — named script constructors plus field
//!   overrides.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use engine_script::{Behavior, EntityHandle, FrameTime, Rigidbody2DAccessor, ScriptError};
//! use engine_math::Vec2;
//!
//! struct Player {
//!     entity: EntityHandle,
//!     body: Option<Rigidbody2DAccessor>,
//! }
//!
//! impl Behavior for Player {
//!     fn on_create(&mut self) -> Result<(), ScriptError> {
//!         self.body = self.entity.get::<Rigidbody2DAccessor>();
//!         Ok(())
//!     }
//!
//!     fn on_update(&mut self, frame_time: FrameTime) -> Result<(), ScriptError> {
//!         if let Some(body) = &self.body {
//!             body.apply_linear_impulse_to_center(Vec2::Y * frame_time.as_seconds(), true)?;
//!         }
//!         Ok(())
//!     }
//! }
//! ```

pub mod accessor;
pub mod cast;
pub mod class;
pub mod codec;
pub mod error;
pub mod event;
pub mod fields;
pub mod handle;
pub mod host;
pub mod instance;
pub mod resolver;
pub mod time;

#[cfg(test)]
mod testing;

pub use accessor::{
    CameraAccessor, ComponentAccessor, ComponentView, Rigidbody2DAccessor, TransformAccessor,
};
pub use cast::{ScriptRef, as_script_instance};
pub use class::ScriptClassRegistry;
pub use error::ScriptError;
pub use event::ScriptEvent;
pub use fields::ScriptFieldMap;
pub use handle::EntityHandle;
pub use host::{EngineHost, ScriptLog, Severity};
pub use instance::{Behavior, LifecycleState, ScriptInstance};
pub use resolver::EntityResolver;
pub use time::FrameTime;
