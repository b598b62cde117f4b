//! Logger-level default fields
//!
//! Defaults fill in context keys a caller leaves out. A default may be a
//! literal or a [`Producer`](super::context::Producer); producers are kept
//! as-is here and only run when the merged context is flattened.

use super::context::{Context, ContextValue};

/// Default fields owned by one logger
///
/// # Example
///
/// ```
/// use radis_logger::core::{Context, DefaultStore};
///
/// let mut defaults = DefaultStore::new();
/// defaults.set("service", "api-gateway");
/// defaults.set("version", "1.2.3");
///
/// let merged = defaults.apply(&Context::new().with_field("version", "2.0.0"));
/// assert_eq!(merged.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultStore {
    entries: Context,
}

impl DefaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a default, overwriting any earlier entry for `key`
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge the defaults under `context`
    ///
    /// Every key present in `context` wins, even when its value is
    /// [`ContextValue::Null`]: passing a null is how a caller suppresses a
    /// default for one call.
    pub fn apply(&self, context: &Context) -> Context {
        let mut merged = self.entries.clone();
        for (key, value) in context.iter() {
            merged.insert(key, value.clone());
        }
        merged
    }
}
