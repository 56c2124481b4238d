//! Generic name-keyed handle cache.
//!
//! One [`KeyedCache`] per resource kind backs the
//! [`ResourceCatalog`](super::catalog::ResourceCatalog). Inserts never
//! overwrite and lookups never fall back to a placeholder.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::resources::error::ResourceError;
use crate::resources::kind::ResourceKind;

/// Map of unique names to handles of one kind.
pub struct KeyedCache<H> {
    kind: ResourceKind,
    entries: FxHashMap<String, H>,
}

impl<H> KeyedCache<H> {
    /// Create an empty cache for `kind`.
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            entries: FxHashMap::default(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Add a handle under a name that is not in use yet.
    ///
    /// On a duplicate the cache keeps the first handle and gives the rejected
    /// one back with the error, so the caller can release it.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handle: H,
    ) -> Result<(), (ResourceError, H)> {
        match self.entries.entry(name.into()) {
            Entry::Occupied(slot) => Err((
                ResourceError::DuplicateName {
                    kind: self.kind,
                    name: slot.key().clone(),
                },
                handle,
            )),
            Entry::Vacant(slot) => {
                slot.insert(handle);
                Ok(())
            }
        }
    }

    /// Get the handle registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<&H, ResourceError> {
        self.entries
            .get(name)
            .ok_or_else(|| ResourceError::UnknownResource {
                kind: self.kind,
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Remove and return every entry.
    pub fn drain(&mut self) -> impl Iterator<Item = (String, H)> + '_ {
        self.entries.drain()
    }
}
