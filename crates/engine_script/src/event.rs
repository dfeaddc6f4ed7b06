//! Events delivered to scripts through the on-event hook.

use engine_component::FieldValue;
use serde::{Deserialize, Serialize};

/// An engine event forwarded to a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptEvent {
    KeyPressed { key: u16, repeat: bool },
    KeyReleased { key: u16 },
    MouseButtonPressed { button: u16 },
    MouseMoved { x: f32, y: f32 },
    WindowResized { width: u32, height: u32 },
    /// Game-defined event with an optional payload.
    Custom {
        name: String,
        payload: Option<FieldValue>,
    },
}

impl ScriptEvent {
    /// A custom event without payload.
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        ScriptEvent::Custom {
            name: name.into(),
            payload: None,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            ScriptEvent::KeyPressed { .. } => "KeyPressed",
            ScriptEvent::KeyReleased { .. } => "KeyReleased",
            ScriptEvent::MouseButtonPressed { .. } => "MouseButtonPressed",
            ScriptEvent::MouseMoved { .. } => "MouseMoved",
            ScriptEvent::WindowResized { .. } => "WindowResized",
            ScriptEvent::Custom { name, .. } => name,
        }
    }
}
