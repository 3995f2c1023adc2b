use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use core::ops::Index;

use serde_core::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_core::ser::{Serialize, SerializeMap, Serializer};

use crate::hash::{FixedHashState, HashTable};

// -----------------------------------------------------------------------------
// OrderedMap

/// A hash map that iterates in insertion order.
///
/// Entries live in a `Vec`, and a [`HashTable`] of indices provides
/// lookup. Replacing the value of an existing key keeps its position;
/// removal shifts later entries down.
///
/// # Examples
///
/// ```
/// use vc_utils::collections::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.insert("One", "1st");
/// map.insert("Two", "2nd");
/// map.insert("Three", "3rd");
///
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, ["One", "Two", "Three"]);
/// assert_eq!(map["Two"], "2nd");
/// ```
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    indices: HashTable<usize>,
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            indices: HashTable::new(),
        }
    }

    /// Creates an empty map with room for `capacity` entries.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            indices: HashTable::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.indices.clear();
    }

    /// Returns the entry at insertion position `index`.
    #[inline]
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.entries.get(index).map(|(k, v)| (k, v))
    }

    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + ExactSizeIterator {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    #[inline]
    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = (&K, &mut V)> + ExactSizeIterator {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    #[inline]
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.entries.iter().map(|(k, _)| k)
    }

    #[inline]
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.entries.iter().map(|(_, v)| v)
    }

    #[inline]
    pub fn values_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut V> + ExactSizeIterator {
        self.entries.iter_mut().map(|(_, v)| v)
    }
}

impl<K: Hash + Eq, V> OrderedMap<K, V> {
    #[inline(always)]
    fn hash_of<Q: Hash + ?Sized>(key: &Q) -> u64 {
        FixedHashState.hash_one(key)
    }

    fn find_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entries = &self.entries;
        self.indices
            .find(Self::hash_of(key), |&i| <K as Borrow<Q>>::borrow(&entries[i].0) == key)
            .copied()
    }

    /// Inserts `value` under `key`.
    ///
    /// An existing key keeps its position and the old value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(index) = self.find_index(&key) {
            return Some(core::mem::replace(&mut self.entries[index].1, value));
        }

        let index = self.entries.len();
        let entries = &self.entries;
        self.indices
            .insert_unique(Self::hash_of(&key), index, |&i| Self::hash_of(&entries[i].0));
        self.entries.push((key, value));
        None
    }

    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_index(key).map(|i| &self.entries[i].1)
    }

    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_index(key).map(|i| &mut self.entries[i].1)
    }

    /// Returns the insertion position of `key`.
    #[inline]
    pub fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_index(key)
    }

    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_index(key).is_some()
    }

    /// Returns the value for `key`, inserting `f()` at the end if absent.
    pub fn get_or_insert_with(&mut self, key: K, f: impl FnOnce() -> V) -> &mut V {
        let index = match self.find_index(&key) {
            Some(index) => index,
            None => {
                self.insert(key, f());
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    /// Removes `key`, shifting every later entry one position down.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entries = &self.entries;
        let entry = self
            .indices
            .find_entry(Self::hash_of(key), |&i| <K as Borrow<Q>>::borrow(&entries[i].0) == key)
            .ok()?;
        let (index, _) = entry.remove();

        for slot in self.indices.iter_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
        Some(self.entries.remove(index).1)
    }

    /// Keeps the entries for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        self.entries.retain_mut(|(k, v)| f(k, v));
        self.rebuild_indices();
    }

    fn rebuild_indices(&mut self) {
        self.indices.clear();
        let entries = &self.entries;
        for (index, (key, _)) in entries.iter().enumerate() {
            self.indices
                .insert_unique(Self::hash_of(key), index, |&i| Self::hash_of(&entries[i].0));
        }
    }
}

// -----------------------------------------------------------------------------
// Traits

impl<K, V> Default for OrderedMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for OrderedMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            indices: self.indices.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Order-sensitive: two maps with the same entries in a different order differ.
impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K, V, Q> Index<&Q> for OrderedMap<K, V>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found in OrderedMap"),
        }
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = alloc::vec::IntoIter<(K, V)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = core::iter::Map<core::slice::Iter<'a, (K, V)>, fn(&'a (K, V)) -> (&'a K, &'a V)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        fn split<K, V>((k, v): &(K, V)) -> (&K, &V) {
            (k, v)
        }
        self.entries.iter().map(split as fn(_) -> _)
    }
}

// -----------------------------------------------------------------------------
// Serde

impl<K: Serialize, V: Serialize> Serialize for OrderedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<K, V>(PhantomData<(K, V)>);

impl<'de, K, V> Visitor<'de> for OrderedMapVisitor<K, V>
where
    K: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
{
    type Value = OrderedMap<K, V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, K, V> Deserialize<'de> for OrderedMap<K, V>
where
    K: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::OrderedMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    #[test]
    fn replace_keeps_position() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.insert("a", 3), Some(1));

        let entries: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(entries, [("a", 3), ("b", 2)]);
    }

    #[test]
    fn remove_shifts_indices() {
        let mut map: OrderedMap<String, i32> = OrderedMap::new();
        for (i, key) in ["x", "y", "z"].into_iter().enumerate() {
            map.insert(key.into(), i as i32);
        }
        assert_eq!(map.remove("x"), Some(0));
        assert_eq!(map.get("z"), Some(&2));
        assert_eq!(map.index_of("z"), Some(1));
        assert_eq!(map.get_index(0), Some((&String::from("y"), &1)));
    }

    #[test]
    fn retain_rebuilds_lookup() {
        let mut map: OrderedMap<i32, i32> = (0..6).map(|i| (i, i * 10)).collect();
        map.retain(|k, _| k % 2 == 1);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&5), Some(&50));
        assert!(!map.contains_key(&4));
    }

    #[test]
    fn serde_preserves_order() {
        let mut map = OrderedMap::new();
        map.insert(String::from("zeta"), 1);
        map.insert(String::from("alpha"), 2);

        let text = serde_json::to_string(&map).unwrap();
        assert_eq!(text, r#"{"zeta":1,"alpha":2}"#);

        let back: OrderedMap<String, i32> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, map);
    }
}
