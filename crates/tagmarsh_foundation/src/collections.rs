//! Persistent collections with structural sharing.
//!
//! These are thin wrappers around the `im` crate's persistent data structures.
//! Cloning is O(1) and modifications return a new collection sharing
//! structure with the original.
//!
//! [`TmSet`] and [`TmMap`] remember insertion order: the envelope format
//! writes members and entries in the order the collection iterates them,
//! and reconstruction must reproduce that order.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::sync::Arc;

/// Combines element hashes so the result does not depend on iteration order.
fn unordered_hash<'a, T, I>(items: I) -> u64
where
    T: Hash + 'a,
    I: Iterator<Item = &'a T>,
{
    items.fold(0u64, |acc, item| {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        acc.wrapping_add(hasher.finish())
    })
}

// =============================================================================
// TmVec
// =============================================================================

/// Persistent vector with structural sharing.
///
/// Backs both bare arrays and tagged `List` values.
#[derive(Clone, Default)]
pub struct TmVec<T>(im::Vector<T>)
where
    T: Clone;

impl<T: Clone> TmVec<T> {
    /// Creates an empty vector.
    #[must_use]
    pub fn new() -> Self {
        Self(im::Vector::new())
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the vector is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets an element by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.0.get(index)
    }

    /// Returns a new vector with the element appended.
    #[must_use]
    pub fn push_back(&self, value: T) -> Self {
        let mut new = self.0.clone();
        new.push_back(value);
        Self(new)
    }

    /// Returns a new vector with the element at `index` replaced.
    ///
    /// Returns `None` if `index` is out of bounds.
    #[must_use]
    pub fn update(&self, index: usize, value: T) -> Option<Self> {
        if index >= self.len() {
            return None;
        }
        let mut new = self.0.clone();
        new.set(index, value);
        Some(Self(new))
    }

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.0.iter()
    }

    /// Returns the first element.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.0.front()
    }

    /// Returns the last element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.0.back()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for TmVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone + PartialEq> PartialEq for TmVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: Clone + Eq> Eq for TmVec<T> {}

impl<T: Clone + Hash> Hash for TmVec<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl<T: Clone> FromIterator<T> for TmVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(im::Vector::from_iter(iter))
    }
}

impl<T: Clone> IntoIterator for TmVec<T> {
    type Item = T;
    type IntoIter = im::vector::ConsumingIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T: Clone> IntoIterator for &'a TmVec<T> {
    type Item = &'a T;
    type IntoIter = im::vector::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// TmCollection
// =============================================================================

/// Persistent unordered collection (a bag: duplicates allowed).
///
/// Members are stored in insertion order so encoding is deterministic, but
/// equality ignores order.
#[derive(Clone, Default)]
pub struct TmCollection<T>(im::Vector<T>)
where
    T: Clone + Eq + Hash;

impl<T: Clone + Eq + Hash> TmCollection<T> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self(im::Vector::new())
    }

    /// Returns the number of members, counting duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the collection contains the value at least once.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.0.contains(value)
    }

    /// Returns how many times the value occurs.
    #[must_use]
    pub fn count(&self, value: &T) -> usize {
        self.0.iter().filter(|item| *item == value).count()
    }

    /// Returns a new collection with the value added.
    #[must_use]
    pub fn add(&self, value: T) -> Self {
        let mut new = self.0.clone();
        new.push_back(value);
        Self(new)
    }

    /// Returns an iterator over the members in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.0.iter()
    }

    fn counts(&self) -> HashMap<&T, usize> {
        let mut counts = HashMap::new();
        for item in self.iter() {
            *counts.entry(item).or_insert(0) += 1;
        }
        counts
    }
}

impl<T: Clone + Eq + Hash + fmt::Debug> fmt::Debug for TmCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone + Eq + Hash> PartialEq for TmCollection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.counts() == other.counts()
    }
}

impl<T: Clone + Eq + Hash> Eq for TmCollection<T> {}

impl<T: Clone + Eq + Hash> Hash for TmCollection<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        unordered_hash(self.iter()).hash(state);
    }
}

impl<T: Clone + Eq + Hash> FromIterator<T> for TmCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(im::Vector::from_iter(iter))
    }
}

// =============================================================================
// TmSet
// =============================================================================

/// Persistent set of unique members, iterated in insertion order.
#[derive(Clone, Default)]
pub struct TmSet<T>
where
    T: Clone + Eq + Hash,
{
    order: im::Vector<T>,
    members: im::HashSet<T>,
}

impl<T: Clone + Eq + Hash> TmSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: im::Vector::new(),
            members: im::HashSet::new(),
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns true if the set contains the value.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.members.contains(value)
    }

    /// Returns a new set with the value inserted.
    ///
    /// Inserting a value already present keeps its original position.
    #[must_use]
    pub fn insert(&self, value: T) -> Self {
        if self.contains(&value) {
            return self.clone();
        }
        let mut new = self.clone();
        new.members.insert(value.clone());
        new.order.push_back(value);
        new
    }

    /// Returns an iterator over the elements in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.order.iter()
    }
}

impl<T: Clone + Eq + Hash + fmt::Debug> fmt::Debug for TmSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Clone + Eq + Hash> PartialEq for TmSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl<T: Clone + Eq + Hash> Eq for TmSet<T> {}

impl<T: Clone + Eq + Hash> Hash for TmSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        unordered_hash(self.iter()).hash(state);
    }
}

impl<T: Clone + Eq + Hash> FromIterator<T> for TmSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |set, value| set.insert(value))
    }
}

// =============================================================================
// TmMap
// =============================================================================

/// Persistent map whose keys may be any hashable value, iterated in
/// insertion order.
#[derive(Clone, Default)]
pub struct TmMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    entries: im::Vector<(K, V)>,
    index: im::HashMap<K, usize>,
}

impl<K: Clone + Eq + Hash, V: Clone> TmMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: im::Vector::new(),
            index: im::HashMap::new(),
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let position = *self.index.get(key)?;
        self.entries.get(position).map(|(_, v)| v)
    }

    /// Returns true if the map contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns a new map with the key-value pair inserted.
    ///
    /// Replacing the value of an existing key keeps the key's position.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let mut new = self.clone();
        if let Some(&position) = self.index.get(&key) {
            new.entries.set(position, (key, value));
        } else {
            new.index.insert(key.clone(), new.entries.len());
            new.entries.push_back((key, value));
        }
        new
    }

    /// Returns an iterator over key-value pairs in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Returns an iterator over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Returns an iterator over values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K: Clone + Eq + Hash + fmt::Debug, V: Clone + fmt::Debug> fmt::Debug for TmMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Clone + Eq + Hash, V: Clone + PartialEq> PartialEq for TmMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Clone + Eq + Hash, V: Clone + Eq> Eq for TmMap<K, V> {}

impl<K: Clone + Eq + Hash, V: Clone + Hash> Hash for TmMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        let entries: Vec<(&K, &V)> = self.iter().collect();
        unordered_hash(entries.iter()).hash(state);
    }
}

impl<K: Clone + Eq + Hash, V: Clone> FromIterator<(K, V)> for TmMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (key, value)| map.insert(key, value))
    }
}

// =============================================================================
// TmRecord
// =============================================================================

/// Persistent string-keyed record.
///
/// Record keys carry no order semantics; iteration is by key so that
/// encoding is deterministic.
#[derive(Clone, Default)]
pub struct TmRecord<V>(im::OrdMap<Arc<str>, V>)
where
    V: Clone;

impl<V: Clone> TmRecord<V> {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self(im::OrdMap::new())
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets a field by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.get(key)
    }

    /// Returns true if the record has the field.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns a new record with the field set.
    #[must_use]
    pub fn insert(&self, key: impl Into<Arc<str>>, value: V) -> Self {
        Self(self.0.update(key.into(), value))
    }

    /// Returns an iterator over fields ordered by name.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&Arc<str>, &V)> {
        self.0.iter().map(|(k, v)| (k, v))
    }

    /// Returns an iterator over field names.
    pub fn keys(&self) -> impl Iterator<Item = &Arc<str>> {
        self.0.keys()
    }
}

impl<V: Clone + fmt::Debug> fmt::Debug for TmRecord<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: Clone + PartialEq> PartialEq for TmRecord<V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<V: Clone + Eq> Eq for TmRecord<V> {}

impl<V: Clone + Hash> Hash for TmRecord<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self.iter() {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: Into<Arc<str>>, V: Clone> FromIterator<(K, V)> for TmRecord<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
