//! # engine_app
//!
//! Reference native host for the script layer. Owns the world, the script
//! instance registry and the frame loop that drives behaviors.
//!
//! - [`World`] — entity and component storage.
//! - [`InstanceRegistry`] — entity id to script instance.
//! - [`SceneHost`] — the [`engine_script::EngineHost`] implementation.
//! - [`ScriptRuntime`] — lifecycle dispatch and the fixed-rate loop.
//! - [`scripts`] — sample behaviors for the demo scene.

pub mod config;
pub mod host;
pub mod registry;
pub mod runtime;
pub mod scripts;
pub mod world;

pub use config::RuntimeConfig;
pub use host::{Diagnostic, DiagnosticSink, SceneHost};
pub use registry::InstanceRegistry;
pub use runtime::ScriptRuntime;
pub use world::{ScriptComponent, World, WorldError};
