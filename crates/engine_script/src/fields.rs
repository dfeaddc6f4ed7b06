//! Public script fields.
//!
//! Every behavior exposes its editor-visible fields as a [`ScriptFieldMap`].
//! The scene keeps one map of overrides per entity; when a script class is
//! (re)loaded the stored overrides are synced against the class's current
//! field set with [`ScriptFieldMap::sync_with`].

use std::collections::BTreeMap;

use engine_component::{FieldType, FieldValue};
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::ScriptError;

/// Field name to value, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptFieldMap(BTreeMap<String, FieldValue>);

impl ScriptFieldMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.0.insert(name.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.0.remove(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// The type of a field, if present.
    #[must_use]
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.0.get(name).map(FieldValue::field_type)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Bring stored overrides in line with a class's current fields.
    ///
    /// Fields the class gained are added with their defaults, fields it no
    /// longer has are dropped, and fields whose type changed are reset to
    /// the default. Returns `true` if anything changed.
    pub fn sync_with(&mut self, defaults: &ScriptFieldMap) -> bool {
        let before = self.0.len();
        self.0.retain(|name, value| {
            defaults
                .get(name)
                .is_some_and(|default| default.field_type() == value.field_type())
        });
        let mut changed = self.0.len() != before;

        for (name, default) in defaults.iter() {
            if !self.0.contains_key(name) {
                self.0.insert(name.to_string(), default.clone());
                changed = true;
            }
        }
        changed
    }

    /// Encode to MessagePack.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Encode`] if serialisation fails.
    pub fn encode(&self) -> Result<Vec<u8>, ScriptError> {
        codec::encode(self)
    }

    /// Decode from MessagePack.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Decode`] if the bytes are not a field map.
    pub fn decode(bytes: &[u8]) -> Result<Self, ScriptError> {
        codec::decode(bytes)
    }
}

impl<'a> IntoIterator for &'a ScriptFieldMap {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for ScriptFieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}
