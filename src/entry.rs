use core::mem;

use crate::{InsertAs, NodeId, OrderedMap};

/// A view into a single entry in an [`OrderedMap`], which may be either vacant or occupied.
///
/// Constructed by [`OrderedMap::entry`].
pub enum Entry<'map, K, V> {
    Vacant(VacantEntry<'map, K, V>),
    Occupied(OccupiedEntry<'map, K, V>),
}

impl<'map, K: Ord, V> Entry<'map, K, V> {
    pub(crate) fn vacant(map: &'map mut OrderedMap<K, V>, key: K, insert_as: InsertAs) -> Self {
        Entry::Vacant(VacantEntry {
            map,
            key,
            insert_as,
        })
    }

    pub(crate) fn occupied(map: &'map mut OrderedMap<K, V>, node: NodeId) -> Self {
        Entry::Occupied(OccupiedEntry { map, node })
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Vacant(entry) => entry.key(),
            Entry::Occupied(entry) => entry.key(),
        }
    }

    /// Inserts `default` if the entry is vacant, and returns a mutable reference to the value.
    pub fn or_insert(self, default: V) -> &'map mut V {
        match self {
            Entry::Vacant(entry) => entry.insert(default),
            Entry::Occupied(entry) => entry.into_mut(),
        }
    }

    /// Inserts the result of `default` if the entry is vacant, and returns a mutable reference to
    /// the value.
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'map mut V {
        match self {
            Entry::Vacant(entry) => entry.insert(default()),
            Entry::Occupied(entry) => entry.into_mut(),
        }
    }

    /// Inserts `V::default()` if the entry is vacant, and returns a mutable reference to the value.
    pub fn or_default(self) -> &'map mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }

    /// Calls `f` on the value if the entry is occupied.
    pub fn and_modify<F: FnOnce(&mut V)>(mut self, f: F) -> Self {
        if let Entry::Occupied(entry) = &mut self {
            f(entry.get_mut());
        }

        self
    }
}

pub struct VacantEntry<'map, K, V> {
    pub(crate) map: &'map mut OrderedMap<K, V>,
    pub(crate) key: K,
    pub(crate) insert_as: InsertAs,
}

impl<'map, K: Ord, V> VacantEntry<'map, K, V> {
    /// Returns a reference to the key that would be used on insertion.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts `value` at the slot found when this entry was created.
    pub fn insert(self, value: V) -> &'map mut V {
        let VacantEntry {
            map,
            key,
            insert_as,
        } = self;

        let node = map.insert_at(insert_as, key, value);
        &mut map.nodes[node].value
    }
}

pub struct OccupiedEntry<'map, K, V> {
    pub(crate) map: &'map mut OrderedMap<K, V>,
    pub(crate) node: NodeId,
}

impl<'map, K: Ord, V> OccupiedEntry<'map, K, V> {
    /// Returns a reference to the stored key.
    pub fn key(&self) -> &K {
        &self.map.nodes[self.node].key
    }

    /// Returns a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.map.nodes[self.node].value
    }

    /// Returns a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.map.nodes[self.node].value
    }

    /// Converts the entry into a mutable reference to its value, bound to the map's lifetime.
    pub fn into_mut(self) -> &'map mut V {
        &mut self.map.nodes[self.node].value
    }

    /// Replaces the value in the entry, returning the previous value.
    ///
    /// The stored key is not changed.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the map and returns its value.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Removes the entry from the map and returns its key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.map.remove_at(self.node)
    }
}
