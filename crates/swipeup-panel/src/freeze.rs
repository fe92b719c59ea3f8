#![forbid(unsafe_code)]

//! Freeze gate: keep rendered content until its key changes.
//!
//! The expanded content of a panel can be expensive to build and does not
//! depend on the drag position, only on whether the panel is committed open.
//! [`Frozen`] holds the last rendered value and rebuilds it only when the key
//! changes or after [`Frozen::invalidate`].

/// Why a freeze gate rebuilt its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreezeMiss {
    /// Nothing rendered yet.
    Empty,
    /// Explicitly invalidated.
    Dirty,
    /// The key differs from the one the content was built with.
    KeyChanged,
}

impl FreezeMiss {
    const fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Dirty => "dirty",
            Self::KeyChanged => "key_changed",
        }
    }
}

/// Cached content keyed by `K`.
#[derive(Debug, Clone)]
pub struct Frozen<K, T> {
    slot: Option<(K, T)>,
    dirty: bool,
    hits: u64,
    misses: u64,
}

impl<K, T> Default for Frozen<K, T> {
    fn default() -> Self {
        Self {
            slot: None,
            dirty: false,
            hits: 0,
            misses: 0,
        }
    }
}

impl<K: PartialEq + Clone, T> Frozen<K, T> {
    /// Create an empty gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the content for `key`, rebuilding it with `render` on a miss.
    pub fn get_or_render(&mut self, key: &K, render: impl FnOnce() -> T) -> &T {
        if let Some(reason) = self.miss_reason(key) {
            tracing::trace!(message = "swipeup.freeze.miss", reason = reason.label());
            self.misses += 1;
            self.dirty = false;
            self.slot = None;
        } else {
            self.hits += 1;
        }
        &self.slot.get_or_insert_with(|| (key.clone(), render())).1
    }

    /// Why the next `get_or_render(key, ..)` would rebuild, if it would.
    pub fn miss_reason(&self, key: &K) -> Option<FreezeMiss> {
        match &self.slot {
            None => Some(FreezeMiss::Empty),
            Some(_) if self.dirty => Some(FreezeMiss::Dirty),
            Some((frozen, _)) if frozen != key => Some(FreezeMiss::KeyChanged),
            Some(_) => None,
        }
    }

    /// Force a rebuild on next access.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Number of accesses served from the cache.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of rebuilds.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
