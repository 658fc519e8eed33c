use alloc::boxed::Box;
use core::fmt::Debug;

use crate::hash::HashFn;
use crate::hash::fold_bytes;
use crate::hash_table::HashTable;
use crate::hash_table::Insert;
use crate::hash_table::InvalidHash;

/// A set of byte-string keys, backed by the fixed-stride
/// [`HashTable`].
///
/// Key bytes are copied into the set on insertion and dropped when the
/// entry is removed or the set is cleared or dropped. The hash function
/// is replaceable per instance via [`set_hash_function`] and defaults to
/// [`fold_bytes`].
///
/// Membership is decided by the 32-bit hash of the key alone; key bytes
/// are never re-compared after hashing. Two distinct keys that hash
/// equal are one member, and with the default mixer keys are compared
/// only up to their first `NUL` byte.
///
/// [`set_hash_function`]: HashSet::set_hash_function
///
/// # Examples
///
/// ```rust
/// use stride_hash::HashSet;
///
/// let mut set = HashSet::new();
/// assert_eq!(set.insert(b"alice"), Ok(true));
/// assert_eq!(set.insert(b"alice"), Ok(false));
/// assert!(set.contains(b"alice"));
/// assert!(set.remove(b"alice"));
/// assert!(!set.contains(b"alice"));
/// ```
#[derive(Clone)]
pub struct HashSet {
    table: HashTable<Box<[u8]>>,
    hash_fn: HashFn,
}

impl Default for HashSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for HashSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl HashSet {
    /// Creates an empty set with the default hash function and the
    /// initial capacity of 8 slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashSet;
    ///
    /// let set = HashSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
            hash_fn: fold_bytes,
        }
    }

    /// Replaces the hash function used for all subsequent operations.
    ///
    /// Members inserted under the previous function generally become
    /// unreachable, so this is meant to be called on an empty set. The
    /// function must not return the reserved values `0` or `1` for real
    /// keys, or [`insert`](HashSet::insert) will reject them.
    pub fn set_hash_function(&mut self, hash_fn: HashFn) {
        self.hash_fn = hash_fn;
    }

    /// Returns the number of members in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no members.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of allocated slots.
    ///
    /// Growth triggers before the slots fill: the set doubles once
    /// members plus deletion tombstones reach 85% of this value.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    #[inline]
    fn hash(&self, key: &[u8]) -> u32 {
        (self.hash_fn)(key)
    }

    /// Adds a key to the set.
    ///
    /// Returns `Ok(true)` if the key was newly inserted and `Ok(false)`
    /// if a member with the same hash was already present (the set is
    /// unchanged). Fails with [`InvalidHash`] if the hash function maps
    /// the key to a reserved value (`0` or `1`) — with the default mixer
    /// this includes the empty key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashSet;
    /// use stride_hash::InvalidHash;
    ///
    /// let mut set = HashSet::new();
    /// assert_eq!(set.insert(b"bob"), Ok(true));
    /// assert_eq!(set.insert(b"bob"), Ok(false));
    /// assert_eq!(set.insert(b""), Err(InvalidHash));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: &[u8]) -> Result<bool, InvalidHash> {
        let hash = self.hash(key);
        match self.table.insert(hash, key.into())? {
            Insert::Inserted => Ok(true),
            Insert::AlreadyPresent(_) => Ok(false),
        }
    }

    /// Returns `true` if the key is a member of the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.insert(b"carol").unwrap();
    /// assert!(set.contains(b"carol"));
    /// assert!(!set.contains(b"dave"));
    /// ```
    pub fn contains(&self, key: &[u8]) -> bool {
        self.table.contains(self.hash(key))
    }

    /// Removes a key from the set, returning whether it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.insert(b"alice").unwrap();
    /// assert!(set.remove(b"alice"));
    /// assert!(!set.remove(b"alice"));
    /// ```
    pub fn remove(&mut self, key: &[u8]) -> bool {
        let hash = self.hash(key);
        self.table.remove(hash).is_some()
    }

    /// Drops every member, keeping the current allocation and hash
    /// function.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the member byte strings in unspecified
    /// order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.insert(b"a").unwrap();
    /// set.insert(b"b").unwrap();
    /// assert_eq!(set.iter().count(), 2);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.table.iter(),
        }
    }
}

impl<'a> Extend<&'a [u8]> for HashSet {
    /// Inserts each key, silently skipping keys that are already present
    /// or hash to a reserved value.
    fn extend<I: IntoIterator<Item = &'a [u8]>>(&mut self, iter: I) {
        for key in iter {
            let _ = self.insert(key);
        }
    }
}

/// Iterator over the member byte strings of a [`HashSet`].
pub struct Iter<'a> {
    inner: crate::hash_table::Iter<'a, Box<[u8]>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|key| &key[..])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
