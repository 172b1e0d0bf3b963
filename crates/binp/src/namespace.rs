//! Identifier → value mapping, with the shallow-copy-at-call-boundary discipline
//! that keeps function calls from observing or leaking mutations across scopes.

use ahash::AHashMap;

use crate::value::Value;

/// One identifier → value mapping.
///
/// Exactly one `Namespace` is "global" per program run; every function call
/// works against a fresh copy produced by [`Namespace::snapshot_for_call`],
/// never against the caller's namespace directly.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    bindings: AHashMap<String, Value>,
}

impl Namespace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Shallow-copies this namespace for use as a fresh callee namespace.
    ///
    /// Functions captured inside are `Rc`-shared, so this is cheap relative to
    /// the size of the namespace and never mutates the caller's bindings.
    #[must_use]
    pub fn snapshot_for_call(&self) -> Self {
        self.clone()
    }
}
