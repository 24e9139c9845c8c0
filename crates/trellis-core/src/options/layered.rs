use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A string-keyed map whose reads fall back to a shared parent layer.
///
/// Writes always land in the local layer; the fallback is never mutated
/// through a child. Entries live behind a `RefCell` so a layer shared through
/// an `Rc` can still be amended in place, which is how late modifications and
/// global registrations keep the layer's identity.
pub struct Layered<V> {
    local: RefCell<BTreeMap<String, V>>,
    fallback: Option<Rc<Layered<V>>>,
}

impl<V: Clone> Layered<V> {
    /// Create an empty layer with no fallback.
    pub fn new() -> Self {
        Self {
            local: RefCell::new(BTreeMap::new()),
            fallback: None,
        }
    }

    /// Create an empty layer that delegates missing keys to `fallback`.
    pub fn with_fallback(fallback: Rc<Layered<V>>) -> Self {
        Self {
            local: RefCell::new(BTreeMap::new()),
            fallback: Some(fallback),
        }
    }

    /// The layer reads fall back to, if any.
    pub fn fallback(&self) -> Option<&Rc<Layered<V>>> {
        self.fallback.as_ref()
    }

    /// Look up `key` locally, then along the fallback chain.
    pub fn get(&self, key: &str) -> Option<V> {
        if let Some(value) = self.local.borrow().get(key) {
            return Some(value.clone());
        }
        self.fallback.as_ref().and_then(|fallback| fallback.get(key))
    }

    /// Look up `key` in the local layer only.
    pub fn get_own(&self, key: &str) -> Option<V> {
        self.local.borrow().get(key).cloned()
    }

    pub fn has(&self, key: &str) -> bool {
        self.has_own(key) || self.fallback.as_ref().is_some_and(|fallback| fallback.has(key))
    }

    pub fn has_own(&self, key: &str) -> bool {
        self.local.borrow().contains_key(key)
    }

    /// Set a local entry, shadowing any fallback value. Returns the previous local value.
    pub fn set(&self, key: impl Into<String>, value: V) -> Option<V> {
        self.local.borrow_mut().insert(key.into(), value)
    }

    /// Remove a local entry. Fallback entries become visible again.
    pub fn remove(&self, key: &str) -> Option<V> {
        self.local.borrow_mut().remove(key)
    }

    /// Keys of the local layer, sorted.
    pub fn own_keys(&self) -> Vec<String> {
        self.local.borrow().keys().cloned().collect()
    }

    /// Every visible key: local keys first, then inherited keys not shadowed locally.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = self.own_keys();
        if let Some(fallback) = &self.fallback {
            for key in fallback.keys() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    /// Shallow copy of the local entries.
    pub fn snapshot(&self) -> BTreeMap<String, V> {
        self.local.borrow().clone()
    }

    /// Number of layers in the fallback chain, counting this one.
    pub fn depth(&self) -> usize {
        1 + self.fallback.as_ref().map_or(0, |fallback| fallback.depth())
    }

    pub fn is_empty(&self) -> bool {
        self.local.borrow().is_empty() && self.fallback.as_ref().is_none_or(|fallback| fallback.is_empty())
    }
}

impl<V: Clone> Default for Layered<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Layered<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.local.borrow().keys().cloned().collect();
        f.debug_struct("Layered")
            .field("own_keys", &keys)
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}
