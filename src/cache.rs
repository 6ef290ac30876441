//! Version-tagged storage for derived graph state.
//!
//! Every graph carries a version counter that is bumped on each mutation. A [`Cache`]
//! remembers the version its value was computed against and refuses to hand it out once
//! the graph has moved on.

/// Derived value tagged with the graph version it was computed for.
#[derive(Debug, Clone)]
struct Entry<T> {
    version: u64,
    value: T,
}

/// Lazily computed value that is only valid for one graph version.
#[derive(Debug, Clone)]
pub(crate) struct Cache<T> {
    slot: Option<Entry<T>>,
}

impl<T> Cache<T> {
    pub(crate) fn new() -> Self {
        Self { slot: None }
    }

    /// Value for `version`, if one was computed for exactly that version.
    pub(crate) fn get(&self, version: u64) -> Option<&T> {
        self.slot
            .as_ref()
            .filter(|entry| entry.version == version)
            .map(|entry| &entry.value)
    }

    /// Drop the stored value regardless of its version.
    pub(crate) fn clear(&mut self) {
        self.slot = None;
    }

    /// Return the value for `version`, computing and storing it on a miss.
    pub(crate) fn get_or_insert_with<F>(&mut self, version: u64, compute: F) -> &T
    where
        F: FnOnce() -> T,
    {
        let entry = match self.slot.take() {
            Some(entry) if entry.version == version => entry,
            _ => Entry {
                version,
                value: compute(),
            },
        };
        &self.slot.insert(entry).value
    }

    /// Fallible variant of [`Cache::get_or_insert_with`]. Nothing is stored on error.
    pub(crate) fn get_or_try_insert_with<F, E>(&mut self, version: u64, compute: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let entry = match self.slot.take() {
            Some(entry) if entry.version == version => entry,
            _ => Entry {
                version,
                value: compute()?,
            },
        };
        Ok(&self.slot.insert(entry).value)
    }
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self::new()
    }
}
