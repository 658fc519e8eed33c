use alloc::boxed::Box;
use core::fmt::Debug;

use crate::hash::HashFn;
use crate::hash::fold_bytes;
use crate::hash_table::HashTable;
use crate::hash_table::Insert;
use crate::hash_table::InvalidHash;

/// A map from byte-string keys to owned values, backed by the
/// fixed-stride [`HashTable`].
///
/// Key bytes are copied into the map on insertion and dropped when the
/// entry is removed or the map is cleared or dropped. The hash function
/// is replaceable per instance via [`set_hash_function`] and defaults to
/// [`fold_bytes`].
///
/// Entry identity is the 32-bit hash of the key, nothing more: key bytes
/// are never re-compared after hashing. Two distinct keys that hash
/// equal are one logical entry — the second [`insert`] reports
/// [`Insert::AlreadyPresent`] and [`get`] returns the first key's value.
/// With the default mixer this also means keys are compared only up to
/// their first `NUL` byte.
///
/// Unlike `std::collections::HashMap`, inserting a present key does
/// **not** overwrite the stored value.
///
/// [`set_hash_function`]: HashMap::set_hash_function
/// [`insert`]: HashMap::insert
/// [`get`]: HashMap::get
///
/// # Examples
///
/// ```rust
/// use stride_hash::HashMap;
/// use stride_hash::Insert;
///
/// let mut map = HashMap::new();
/// assert_eq!(map.insert(b"alice", 1), Ok(Insert::Inserted));
/// assert_eq!(map.insert(b"alice", 9), Ok(Insert::AlreadyPresent(9)));
/// assert_eq!(map.get(b"alice"), Some(&1));
/// ```
#[derive(Clone)]
pub struct HashMap<V> {
    table: HashTable<(Box<[u8]>, V)>,
    hash_fn: HashFn,
}

impl<V> Default for HashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Debug> Debug for HashMap<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.iter() {
            map.entry(&key, value);
        }
        map.finish()
    }
}

impl<V> HashMap<V> {
    /// Creates an empty map with the default hash function and the
    /// initial capacity of 8 slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashMap;
    ///
    /// let map: HashMap<u64> = HashMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
            hash_fn: fold_bytes,
        }
    }

    /// Replaces the hash function used for all subsequent operations.
    ///
    /// The replacement applies to the whole key, not per entry: keys
    /// inserted under the previous function generally become
    /// unreachable, so this is meant to be called on an empty map. The
    /// function must not return the reserved values `0` or `1` for real
    /// keys, or [`insert`](HashMap::insert) will reject them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashMap;
    ///
    /// fn first_byte(key: &[u8]) -> u32 {
    ///     key.first().map_or(2, |&b| b as u32 + 2)
    /// }
    ///
    /// let mut map = HashMap::new();
    /// map.set_hash_function(first_byte);
    /// map.insert(b"apple", 1).unwrap();
    /// // Same first byte, same hash, same entry.
    /// assert_eq!(map.get(b"avocado"), Some(&1));
    /// ```
    pub fn set_hash_function(&mut self, hash_fn: HashFn) {
        self.hash_fn = hash_fn;
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(b"one", 1).unwrap();
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of allocated slots.
    ///
    /// Growth triggers before the slots fill: the map doubles once
    /// entries plus deletion tombstones reach 85% of this value.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    #[inline]
    fn hash(&self, key: &[u8]) -> u32 {
        (self.hash_fn)(key)
    }

    /// Inserts a key-value pair.
    ///
    /// On success returns [`Insert::Inserted`]. If an entry with the same
    /// key hash already exists the map is unchanged and the value comes
    /// back in [`Insert::AlreadyPresent`]; to replace it, [`remove`] the
    /// key first. Fails with [`InvalidHash`] if the hash function maps
    /// the key to a reserved value (`0` or `1`) — with the default mixer
    /// this includes the empty key.
    ///
    /// [`remove`]: HashMap::remove
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashMap;
    /// use stride_hash::Insert;
    /// use stride_hash::InvalidHash;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert(b"bob", 2), Ok(Insert::Inserted));
    /// assert_eq!(map.insert(b"bob", 3), Ok(Insert::AlreadyPresent(3)));
    /// assert_eq!(map.insert(b"", 4), Err(InvalidHash));
    /// assert_eq!(map.get(b"bob"), Some(&2));
    /// ```
    pub fn insert(&mut self, key: &[u8], value: V) -> Result<Insert<V>, InvalidHash> {
        let hash = self.hash(key);
        match self.table.insert(hash, (key.into(), value))? {
            Insert::Inserted => Ok(Insert::Inserted),
            Insert::AlreadyPresent((_, value)) => Ok(Insert::AlreadyPresent(value)),
        }
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(b"carol", 3).unwrap();
    /// assert_eq!(map.get(b"carol"), Some(&3));
    /// assert_eq!(map.get(b"dave"), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        self.table.find(self.hash(key)).map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(b"count", 1).unwrap();
    /// if let Some(count) = map.get_mut(b"count") {
    ///     *count += 1;
    /// }
    /// assert_eq!(map.get(b"count"), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        let hash = self.hash(key);
        self.table.find_mut(hash).map(|(_, value)| value)
    }

    /// Returns `true` if an entry is stored for `key`.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.table.contains(self.hash(key))
    }

    /// Removes the entry for `key`, returning its value if present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(b"alice", 1).unwrap();
    /// assert_eq!(map.remove(b"alice"), Some(1));
    /// assert_eq!(map.remove(b"alice"), None);
    /// ```
    pub fn remove(&mut self, key: &[u8]) -> Option<V> {
        let hash = self.hash(key);
        self.table.remove(hash).map(|(_, value)| value)
    }

    /// Drops every entry, keeping the current allocation and hash
    /// function.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(b"alice", 1).unwrap();
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert!(!map.contains_key(b"alice"));
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over `(key bytes, value)` pairs in
    /// unspecified order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(b"a", 1).unwrap();
    /// map.insert(b"b", 2).unwrap();
    ///
    /// let mut sum = 0;
    /// for (_key, value) in map.iter() {
    ///     sum += value;
    /// }
    /// assert_eq!(sum, 3);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the key byte strings in unspecified
    /// order.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in unspecified order.
    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }

    /// Returns a mutable iterator over the values in unspecified order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, V> {
        ValuesMut {
            inner: self.table.iter_mut(),
        }
    }
}

impl<'a, V> Extend<(&'a [u8], V)> for HashMap<V> {
    /// Inserts each pair, silently skipping keys that are already
    /// present or hash to a reserved value.
    fn extend<I: IntoIterator<Item = (&'a [u8], V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            let _ = self.insert(key, value);
        }
    }
}

/// Iterator over the `(key bytes, value)` pairs of a [`HashMap`].
pub struct Iter<'a, V> {
    inner: crate::hash_table::Iter<'a, (Box<[u8]>, V)>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a [u8], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (&key[..], value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// Iterator over the keys of a [`HashMap`].
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over the values of a [`HashMap`].
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Mutable iterator over the values of a [`HashMap`].
pub struct ValuesMut<'a, V> {
    inner: crate::hash_table::IterMut<'a, (Box<[u8]>, V)>,
}

impl<'a, V> Iterator for ValuesMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
