//! String interning for identifier text.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;

/// An interned identifier.
///
/// `Ident` is a lightweight handle (just a u32) that represents the text of
/// one identifier token. The actual string is stored in an [`Interner`].
///
/// Identifier interning is what makes the usage scanner's cheap rejection
/// possible: comparing a token against the target's identifier is a single
/// u32 comparison, never a string comparison.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Ident(u32);

impl Ident {
    /// Create an Ident from a raw index (used internally).
    #[inline]
    pub(crate) const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ident({})", self.0)
    }
}

/// String interner for deduplicating identifier text.
///
/// One interner is shared by every document in a snapshot (via `Arc`), so
/// `Ident` equality holds across files. Thread-safe via internal locking.
#[derive(Default)]
pub struct Interner {
    inner: RwLock<InternerInner>,
}

#[derive(Default)]
struct InternerInner {
    /// Map from string to index
    map: FxHashMap<SmolStr, u32>,
    /// Storage of all interned strings
    strings: Vec<SmolStr>,
}

impl Interner {
    /// Create a new empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning an `Ident` handle.
    ///
    /// If the string has been interned before, returns the existing `Ident`.
    pub fn intern(&self, s: &str) -> Ident {
        // Fast path: check if already interned (read lock)
        {
            let inner = self.inner.read();
            if let Some(&index) = inner.map.get(s) {
                return Ident::from_raw(index);
            }
        }

        // Slow path: need to insert (write lock)
        let mut inner = self.inner.write();

        // Double-check after acquiring write lock
        if let Some(&index) = inner.map.get(s) {
            return Ident::from_raw(index);
        }

        let smol = SmolStr::new(s);
        let index = inner.strings.len() as u32;
        inner.strings.push(smol.clone());
        inner.map.insert(smol, index);

        Ident::from_raw(index)
    }

    /// Look up an already interned string without inserting it.
    pub fn find(&self, s: &str) -> Option<Ident> {
        let inner = self.inner.read();
        inner.map.get(s).map(|&index| Ident::from_raw(index))
    }

    /// Look up the string for an `Ident`.
    ///
    /// Returns `None` if the `Ident` was created by a different interner.
    pub fn lookup(&self, ident: Ident) -> Option<SmolStr> {
        let inner = self.inner.read();
        inner.strings.get(ident.0 as usize).cloned()
    }

    /// Look up the string for an `Ident`, panicking on foreign handles.
    ///
    /// # Panics
    /// Panics if the `Ident` was not created by this interner.
    pub fn get(&self, ident: Ident) -> SmolStr {
        self.lookup(ident).expect("Ident not found in interner")
    }

    /// Get the number of interned strings.
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Check if the interner is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Interner")
            .field("count", &inner.strings.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_same_string() {
        let interner = Interner::new();

        let a = interner.intern("size");
        let b = interner.intern("size");

        assert_eq!(a, b);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_intern_different_strings() {
        let interner = Interner::new();

        let a = interner.intern("begin");
        let b = interner.intern("end");

        assert_ne!(a, b);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_find_does_not_insert() {
        let interner = Interner::new();

        assert!(interner.find("missing").is_none());
        assert_eq!(interner.len(), 0);

        let a = interner.intern("present");
        assert_eq!(interner.find("present"), Some(a));
    }

    #[test]
    fn test_lookup() {
        let interner = Interner::new();

        let ident = interner.intern("operator");
        let s = interner.get(ident);

        assert_eq!(s.as_str(), "operator");
    }

    #[test]
    fn test_ident_size() {
        assert_eq!(std::mem::size_of::<Ident>(), 4);
    }
}
