//! MessagePack persistence for script data.
//!
//! Field overrides are saved with the scene and restored before scripts are
//! instantiated; both directions go through `rmp-serde`.

use serde::{Deserialize, Serialize};

use crate::error::ScriptError;

/// Encode a value to MessagePack bytes.
///
/// Structs are written as maps so that a saved scene survives fields being
/// reordered.
///
/// # Errors
///
/// Returns [`ScriptError::Encode`] if serialisation fails.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ScriptError> {
    rmp_serde::to_vec_named(value).map_err(ScriptError::Encode)
}

/// Decode a value from MessagePack bytes.
///
/// # Errors
///
/// Returns [`ScriptError::Decode`] if deserialisation fails.
pub fn decode<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, ScriptError> {
    rmp_serde::from_slice(bytes).map_err(ScriptError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ScriptEvent;

    #[test]
    fn test_event_survives_encoding() {
        let event = ScriptEvent::WindowResized {
            width: 1280,
            height: 720,
        };
        let bytes = encode(&event).unwrap();
        let restored: ScriptEvent = decode(&bytes).unwrap();
        assert_eq!(event, restored);
    }

    #[test]
    fn test_decode_invalid_bytes() {
        let result: Result<ScriptEvent, _> = decode(&[0xC1]);
        assert!(matches!(result, Err(ScriptError::Decode(_))));
    }
}
