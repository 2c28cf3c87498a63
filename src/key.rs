//! Key projections: how a stored value yields the key it is ordered by.

/// Maps a stored value to its ordering key.
///
/// The projection is chosen per container type, so it is a type parameter of the tree rather than
/// a runtime value.
pub trait KeyOf<T> {
    /// The key type.
    type Key;

    /// Returns the key of the given value.
    fn key(value: &T) -> &Self::Key;
}

/// The projection used by sets: a value is its own key.
#[allow(unused)]
pub enum Identity {}

impl<T> KeyOf<T> for Identity {
    type Key = T;
    fn key(value: &T) -> &T { value }
}

/// The projection used by maps: an entry is keyed by its first component.
#[allow(unused)]
pub enum First {}

impl<K, V> KeyOf<(K, V)> for First {
    type Key = K;
    fn key(entry: &(K, V)) -> &K { &entry.0 }
}
