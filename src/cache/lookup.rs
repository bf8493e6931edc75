//! Lookup outcome
//!
//! Every lookup that doesn't hit reads as absent through [`TtlCache::get`];
//! [`Lookup`] keeps the reason around for callers that want to log or count it.
//!
//! [`TtlCache::get`]: crate::cache::TtlCache::get

/// Result of reading one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// Fresh payload
    Hit(T),
    /// Nothing stored under the key
    Miss,
    /// A record was stored but its lifetime has passed; it has been evicted
    Expired,
    /// A record was stored but does not decode as the requested type
    Corrupt,
    /// The store could not be read
    Unavailable,
}

impl<T> Lookup<T> {
    /// Returns true for [`Lookup::Hit`].
    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }

    /// Collapses every non-hit outcome into `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Miss | Lookup::Expired | Lookup::Corrupt | Lookup::Unavailable => None,
        }
    }
}

impl<T> From<Lookup<T>> for Option<T> {
    fn from(lookup: Lookup<T>) -> Self {
        lookup.into_option()
    }
}
