//! `Key<K>`: a table key that may be the null sentinel.

use core::borrow::Borrow;

/// A key stored in a [`HashTable`](crate::HashTable).
///
/// `Null` is the single sentinel "no key". It equals only itself, is
/// never passed to the table's hasher, and always lives in bucket 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key<K> {
    Null,
    Value(K),
}

impl<K> Key<K> {
    pub fn from_option(key: Option<K>) -> Self {
        match key {
            Some(k) => Key::Value(k),
            None => Key::Null,
        }
    }

    pub fn into_option(self) -> Option<K> {
        match self {
            Key::Null => None,
            Key::Value(k) => Some(k),
        }
    }

    pub fn as_ref(&self) -> Key<&K> {
        match self {
            Key::Null => Key::Null,
            Key::Value(k) => Key::Value(k),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Key::Null)
    }

    /// The wrapped key, or `None` for the sentinel.
    pub fn value(&self) -> Option<&K> {
        match self {
            Key::Null => None,
            Key::Value(k) => Some(k),
        }
    }

    /// Equality against a borrowed probe. `Null` only matches `Null`.
    #[inline]
    pub(crate) fn matches<Q>(&self, probe: Key<&Q>) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        match (self, probe) {
            (Key::Null, Key::Null) => true,
            (Key::Value(k), Key::Value(q)) => k.borrow() == q,
            _ => false,
        }
    }
}

impl<K> From<K> for Key<K> {
    fn from(key: K) -> Self {
        Key::Value(key)
    }
}
