//! String interner for operator names.
//!
//! Provides O(1) interning and equality with thread-safe access, so that
//! graph builders running on different threads can share one name table.
//! A single `RwLock` is enough here: interning happens while a module is
//! built, and the transformation passes only resolve.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

#[derive(Default)]
struct Inner {
    /// Map from string content to interned name.
    map: FxHashMap<Box<str>, Name>,
    /// Storage for string contents, indexed by `Name::index()`.
    strings: Vec<Box<str>>,
}

/// Thread-safe string interner.
///
/// The empty string is pre-interned as [`Name::EMPTY`].
pub struct StringInterner {
    inner: RwLock<Inner>,
}

/// Shared handle to a [`StringInterner`].
///
/// Cloned into every [`Module`](crate::Module) so that modules built from
/// the same front end agree on name identity.
pub type SharedInterner = Arc<StringInterner>;

impl StringInterner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        let mut inner = Inner::default();
        inner.strings.push(Box::from(""));
        inner.map.insert(Box::from(""), Name::EMPTY);
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Create a shared handle to a fresh interner.
    pub fn shared() -> SharedInterner {
        Arc::new(Self::new())
    }

    /// Intern a string, returning its stable [`Name`].
    ///
    /// Interning the same content twice returns the same name.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "interner capacity is bounded by u32"
    )]
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&name) = self.inner.read().map.get(s) {
            return name;
        }
        let mut inner = self.inner.write();
        // Re-check under the write lock: another thread may have interned
        // the string between the read above and acquiring the write lock.
        if let Some(&name) = inner.map.get(s) {
            return name;
        }
        let name = Name::from_raw(inner.strings.len() as u32);
        inner.strings.push(Box::from(s));
        inner.map.insert(Box::from(s), name);
        name
    }

    /// Resolve a name back to its string content.
    ///
    /// Names from a different interner resolve to the empty string.
    pub fn resolve(&self, name: Name) -> String {
        let inner = self.inner.read();
        inner
            .strings
            .get(name.index())
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Returns `true` if only the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}
