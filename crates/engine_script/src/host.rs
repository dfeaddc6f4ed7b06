//! The native engine boundary.
//!
//! [`EngineHost`] is every call the script layer makes into the engine. The
//! engine owns entity storage, component data and the script instance
//! registry; scripts only reach them through this trait, which keeps the
//! whole layer testable against a fake.

use std::rc::Rc;

use engine_component::{AccessError, ComponentKind, EntityId, FieldValue};

use crate::instance::ScriptInstance;

/// Diagnostic severity, forwarded verbatim to the host's log sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace,
    Info,
    Warn,
    Error,
    Fatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Trace => "trace",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// Operations the native engine provides to the script layer.
///
/// All calls are synchronous and made from the engine's frame-loop thread.
/// Implementations must not hold internal borrows across calls, since a
/// script hook can call back into the host at any time.
pub trait EngineHost {
    /// Whether `id` names a live entity.
    fn entity_exists(&self, id: EntityId) -> bool;

    /// Whether the entity currently has a component of `kind`.
    fn component_exists(&self, id: EntityId, kind: ComponentKind) -> bool;

    /// Read one field of a component. Callers check existence first.
    ///
    /// # Errors
    ///
    /// Returns an [`AccessError`] if the entity, component or field is gone.
    fn read_field(
        &self,
        id: EntityId,
        kind: ComponentKind,
        field: &str,
    ) -> Result<FieldValue, AccessError>;

    /// Write one field of a component. Callers check existence first.
    ///
    /// # Errors
    ///
    /// Returns an [`AccessError`] if the entity, component or field is gone,
    /// or the value has the wrong type.
    fn write_field(
        &self,
        id: EntityId,
        kind: ComponentKind,
        field: &str,
        value: FieldValue,
    ) -> Result<(), AccessError>;

    /// Invoke a component method. Callers check existence first.
    ///
    /// # Errors
    ///
    /// Returns an [`AccessError`] if the target is gone or the call is invalid.
    fn invoke_method(
        &self,
        id: EntityId,
        kind: ComponentKind,
        method: &str,
        args: &[FieldValue],
    ) -> Result<Option<FieldValue>, AccessError>;

    /// Resolve an entity by display name; [`EntityId::NULL`] if none matches.
    fn resolve_entity_by_name(&self, name: &str) -> EntityId;

    /// Whether a script instance is registered for `id`.
    fn has_registered_instance(&self, id: EntityId) -> bool;

    /// The script instance registered for `id`, if any.
    fn registered_instance(&self, id: EntityId) -> Option<ScriptInstance>;

    /// Fire-and-forget diagnostic.
    fn log_diagnostic(&self, severity: Severity, message: &str);
}

/// Logging facade handed to scripts.
#[derive(Clone)]
pub struct ScriptLog {
    host: Rc<dyn EngineHost>,
}

impl ScriptLog {
    #[must_use]
    pub fn new(host: Rc<dyn EngineHost>) -> Self {
        Self { host }
    }

    pub fn trace(&self, message: impl AsRef<str>) {
        self.host.log_diagnostic(Severity::Trace, message.as_ref());
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.host.log_diagnostic(Severity::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.host.log_diagnostic(Severity::Warn, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.host.log_diagnostic(Severity::Error, message.as_ref());
    }

    pub fn fatal(&self, message: impl AsRef<str>) {
        self.host.log_diagnostic(Severity::Fatal, message.as_ref());
    }
}

impl std::fmt::Debug for ScriptLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptLog").finish_non_exhaustive()
    }
}
