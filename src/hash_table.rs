//! The generic fixed-stride probing core shared by the map and set.
//!
//! `HashTable<V>` stores opaque payloads addressed purely by a 32-bit
//! hash value. It implements the slot layout, probe sequence, tombstone
//! deletion, and doubling growth policy; computing hashes from keys is
//! the wrapper layer's job ([`HashMap`](crate::HashMap) and
//! [`HashSet`](crate::HashSet)).

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::iter::FusedIterator;

/// Multiplier applied to the hash to pick the starting slot.
const PROBE_START: u32 = 73;

/// Fixed probe stride. Odd, so the probe sequence cycles through every
/// slot of a power-of-two table before repeating.
const PROBE_STRIDE: u32 = 5009;

/// Initial table size is `1 << INITIAL_NBITS`.
const INITIAL_NBITS: u32 = 3;

/// Hashes below this value collide with the reserved slot-state range of
/// the original storage format and are rejected on insert.
const MIN_HASH: u32 = 2;

#[derive(Clone)]
enum Slot<V> {
    Empty,
    Tombstone,
    Occupied { hash: u32, value: V },
}

/// Error returned when the hash function produced a reserved value.
///
/// Hash values `0` and `1` are carved out of the hash space (they encode
/// empty and deleted slots in the storage format this table is
/// compatible with). A key hashing to either value cannot be inserted;
/// the table is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidHash;

impl fmt::Display for InvalidHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("hash function produced a reserved value (0 or 1)")
    }
}

impl core::error::Error for InvalidHash {}

/// Outcome of a successful [`HashTable::insert`] call.
#[derive(Debug, PartialEq, Eq)]
pub enum Insert<V> {
    /// The payload was stored in a fresh or reclaimed slot.
    Inserted,
    /// A live slot with the same hash already exists. The table is
    /// unchanged and the rejected payload is handed back.
    AlreadyPresent(V),
}

/// An open-addressing table of payloads addressed by 32-bit hash.
///
/// Capacity is always a power of two (at least 8). Probing starts at
/// `73 * hash` masked to the table size and steps by a fixed stride of
/// `5009` slots. Deletion leaves tombstones that keep probe chains
/// intact; tombstones are reclaimed by the next insert that lands on one
/// and swept out wholesale by the next growth rehash. The table grows by
/// doubling once live entries plus tombstones reach 85% of capacity, so
/// probe loops always terminate at an empty slot.
///
/// A hash value is the entire identity of an entry: the table never
/// compares anything else, and two payloads can only coexist under
/// distinct hashes.
///
/// # Examples
///
/// ```rust
/// use stride_hash::HashTable;
/// use stride_hash::Insert;
///
/// let mut table: HashTable<&str> = HashTable::new();
/// assert_eq!(table.insert(0xDEAD, "payload"), Ok(Insert::Inserted));
/// assert_eq!(table.find(0xDEAD), Some(&"payload"));
/// assert_eq!(table.remove(0xDEAD), Some("payload"));
/// assert_eq!(table.find(0xDEAD), None);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    slots: Box<[Slot<V>]>,
    nbits: u32,
    mask: u32,
    live: usize,
    tombstones: usize,
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("live", &self.live)
            .field("tombstones", &self.tombstones)
            .field("capacity", &self.slots.len())
            .finish_non_exhaustive()
    }
}

fn empty_slots<V>(capacity: usize) -> Box<[Slot<V>]> {
    let mut slots = Vec::new();
    slots.resize_with(capacity, || Slot::Empty);
    slots.into_boxed_slice()
}

impl<V> HashTable<V> {
    /// Creates an empty table with the initial capacity of 8 slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashTable;
    ///
    /// let table: HashTable<u64> = HashTable::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 8);
    /// ```
    pub fn new() -> Self {
        let capacity = 1usize << INITIAL_NBITS;
        Self {
            slots: empty_slots(capacity),
            nbits: INITIAL_NBITS,
            mask: capacity as u32 - 1,
            live: 0,
            tombstones: 0,
        }
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if the table contains no live entries.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns the current number of slots.
    ///
    /// This is the allocated size, not the number of entries the table
    /// will hold before growing (growth triggers at 85% load).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn start(&self, hash: u32) -> usize {
        (self.mask & PROBE_START.wrapping_mul(hash)) as usize
    }

    #[inline]
    fn step(&self, index: usize) -> usize {
        (self.mask & (index as u32).wrapping_add(PROBE_STRIDE)) as usize
    }

    /// Probes for a live slot holding `hash`. Walks past tombstones and
    /// mismatched entries; an empty slot terminates the chain.
    fn find_index(&self, hash: u32) -> Option<usize> {
        let mut index = self.start(hash);
        loop {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied { hash: held, .. } if *held == hash => return Some(index),
                _ => index = self.step(index),
            }
        }
    }

    /// Inserts a payload under the given hash.
    ///
    /// Returns [`Insert::Inserted`] on success. If a live entry with the
    /// same hash is encountered first, nothing is mutated and the payload
    /// comes back in [`Insert::AlreadyPresent`]. Hashes `0` and `1` are
    /// reserved and rejected with [`InvalidHash`].
    ///
    /// A successful insert may grow the table: once live entries plus
    /// tombstones reach 85% of capacity, the slot array is doubled and
    /// every live entry is reinserted (tombstones are dropped).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashTable;
    /// use stride_hash::Insert;
    /// use stride_hash::InvalidHash;
    ///
    /// let mut table = HashTable::new();
    /// assert_eq!(table.insert(7, 'a'), Ok(Insert::Inserted));
    /// assert_eq!(table.insert(7, 'b'), Ok(Insert::AlreadyPresent('b')));
    /// assert_eq!(table.insert(1, 'c'), Err(InvalidHash));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert(&mut self, hash: u32, value: V) -> Result<Insert<V>, InvalidHash> {
        if hash < MIN_HASH {
            return Err(InvalidHash);
        }

        let mut index = self.start(hash);
        loop {
            match &self.slots[index] {
                Slot::Occupied { hash: held, .. } if *held == hash => {
                    return Ok(Insert::AlreadyPresent(value));
                }
                Slot::Occupied { .. } => index = self.step(index),
                // First empty or tombstone slot in the chain is claimed,
                // even if the same hash is live further along it.
                _ => break,
            }
        }

        if matches!(self.slots[index], Slot::Tombstone) {
            self.tombstones -= 1;
        }
        self.slots[index] = Slot::Occupied { hash, value };
        self.live += 1;

        if self.above_load_limit() {
            self.grow();
        }
        Ok(Insert::Inserted)
    }

    /// Returns a reference to the payload stored under `hash`.
    pub fn find(&self, hash: u32) -> Option<&V> {
        let index = self.find_index(hash)?;
        match &self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => unreachable!("find_index returned a non-occupied slot"),
        }
    }

    /// Returns a mutable reference to the payload stored under `hash`.
    pub fn find_mut(&mut self, hash: u32) -> Option<&mut V> {
        let index = self.find_index(hash)?;
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => unreachable!("find_index returned a non-occupied slot"),
        }
    }

    /// Returns `true` if a live entry is stored under `hash`.
    pub fn contains(&self, hash: u32) -> bool {
        self.find_index(hash).is_some()
    }

    /// Removes and returns the payload stored under `hash`.
    ///
    /// The vacated slot becomes a tombstone so that longer probe chains
    /// passing through it keep working. The table never shrinks;
    /// tombstones are reclaimed by later inserts or the next growth
    /// rehash.
    pub fn remove(&mut self, hash: u32) -> Option<V> {
        let index = self.find_index(hash)?;
        match core::mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied { value, .. } => {
                self.live -= 1;
                self.tombstones += 1;
                Some(value)
            }
            _ => unreachable!("find_index returned a non-occupied slot"),
        }
    }

    /// Drops every entry in place, keeping the current allocation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert(3, ()).unwrap();
    /// let capacity = table.capacity();
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.live = 0;
        self.tombstones = 0;
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
    }

    /// Returns an iterator over the payloads of live entries, in
    /// unspecified order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.live,
        }
    }

    /// Returns a mutable iterator over the payloads of live entries, in
    /// unspecified order.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.live,
        }
    }

    fn above_load_limit(&self) -> bool {
        (self.live + self.tombstones) * 100 >= self.slots.len() * 85
    }

    /// Doubles the slot array and reinserts every live entry. The old
    /// array is kept alive until the new one is fully populated.
    fn grow(&mut self) {
        let nbits = self.nbits + 1;
        let capacity = 1usize << nbits;
        let old = core::mem::replace(&mut self.slots, empty_slots(capacity));
        self.nbits = nbits;
        self.mask = capacity as u32 - 1;
        self.live = 0;
        self.tombstones = 0;

        for slot in old {
            if let Slot::Occupied { hash, value } = slot {
                self.reinsert(hash, value);
            }
        }
    }

    /// Insert during rehash: every incoming hash is valid, the fresh
    /// array has no tombstones, and the load limit cannot be reached, so
    /// no growth check is needed. Duplicate live hashes (possible when an
    /// insert reclaimed a tombstone ahead of its twin) collapse to a
    /// single entry here, dropping the later payload.
    fn reinsert(&mut self, hash: u32, value: V) {
        let mut index = self.start(hash);
        loop {
            match &self.slots[index] {
                Slot::Occupied { hash: held, .. } if *held == hash => return,
                Slot::Occupied { .. } => index = self.step(index),
                _ => break,
            }
        }
        self.slots[index] = Slot::Occupied { hash, value };
        self.live += 1;
    }
}

/// Iterator over the live payloads of a [`HashTable`].
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

/// Mutable iterator over the live payloads of a [`HashTable`].
pub struct IterMut<'a, V> {
    slots: core::slice::IterMut<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}
impl<V> FusedIterator for IterMut<'_, V> {}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    // Hashes below 2 are reserved, so test hashes start there.
    fn hashes(n: usize) -> impl Iterator<Item = u32> {
        (2..).take(n)
    }

    #[test]
    fn insert_and_find() {
        let mut table: HashTable<u32> = HashTable::new();
        for h in hashes(5) {
            assert_eq!(table.insert(h, h * 10), Ok(Insert::Inserted));
        }
        assert_eq!(table.len(), 5);
        for h in hashes(5) {
            assert_eq!(table.find(h), Some(&(h * 10)));
            assert!(table.contains(h));
        }
        assert_eq!(table.find(999), None);
        assert!(!table.contains(999));
    }

    #[test]
    fn duplicate_hash_is_no_op() {
        let mut table = HashTable::new();
        assert_eq!(table.insert(42, "first"), Ok(Insert::Inserted));
        assert_eq!(table.insert(42, "second"), Ok(Insert::AlreadyPresent("second")));
        assert_eq!(table.len(), 1);
        assert_eq!(table.find(42), Some(&"first"));
    }

    #[test]
    fn reserved_hashes_rejected() {
        let mut table = HashTable::new();
        assert_eq!(table.insert(0, 'x'), Err(InvalidHash));
        assert_eq!(table.insert(1, 'x'), Err(InvalidHash));
        assert_eq!(table.len(), 0);
        assert_eq!(table.capacity(), 8);
    }

    #[test]
    fn remove_leaves_tombstone_for_chain() {
        let mut table = HashTable::new();
        // Mask 7: hashes 8 apart share a probe chain at capacity 8.
        let (a, b) = (16, 24);
        assert_eq!(table.start(a), table.start(b));

        table.insert(a, "a").unwrap();
        table.insert(b, "b").unwrap();
        // Removing the chain head must not cut off the second entry.
        assert_eq!(table.remove(a), Some("a"));
        assert_eq!(table.find(b), Some(&"b"));
        assert_eq!(table.remove(a), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn tombstone_ahead_of_duplicate_is_claimed() {
        // Inherited storage-format behavior: insert claims the first
        // tombstone on its chain without scanning ahead for a duplicate,
        // so a hash can briefly occupy two live slots.
        let mut table = HashTable::new();
        table.insert(16, "g").unwrap();
        table.insert(24, "old").unwrap();
        table.remove(16).unwrap();

        assert_eq!(table.insert(24, "new"), Ok(Insert::Inserted));
        assert_eq!(table.len(), 2);
        assert_eq!(table.find(24), Some(&"new"));
        assert_eq!(table.remove(24), Some("new"));
        assert_eq!(table.find(24), Some(&"old"));
    }

    #[test]
    fn insert_reclaims_tombstone() {
        let mut table = HashTable::new();
        table.insert(5, 1u8).unwrap();
        table.remove(5).unwrap();
        assert_eq!(table.tombstones, 1);

        table.insert(5, 2u8).unwrap();
        assert_eq!(table.tombstones, 0);
        assert_eq!(table.live, 1);
        assert_eq!(table.find(5), Some(&2));
    }

    #[test]
    fn growth_triggers_at_85_percent() {
        let mut table: HashTable<u32> = HashTable::new();
        // Capacity 8 grows once live + tombstones reaches 7.
        for h in hashes(6) {
            table.insert(h, h).unwrap();
        }
        assert_eq!(table.capacity(), 8);
        table.insert(100, 100).unwrap();
        assert_eq!(table.capacity(), 16);

        assert_eq!(table.len(), 7);
        for h in hashes(6).chain([100]) {
            assert_eq!(table.find(h), Some(&h));
        }
    }

    #[test]
    fn tombstones_count_toward_load() {
        let mut table: HashTable<u32> = HashTable::new();
        for h in hashes(6) {
            table.insert(h, h).unwrap();
        }
        for h in hashes(6) {
            table.remove(h).unwrap();
        }
        assert_eq!(table.capacity(), 8);

        // Hash 16 starts at slot 0, which is empty (the tombstones sit in
        // slots 2..=7), so the insert puts live + tombstones at 7 and
        // forces growth, which sweeps the tombstones out.
        table.insert(16, 16).unwrap();
        assert_eq!(table.capacity(), 16);
        assert_eq!(table.tombstones, 0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn growth_preserves_membership() {
        let mut table: HashTable<u32> = HashTable::new();
        for h in hashes(200) {
            table.insert(h, h + 1).unwrap();
        }
        assert_eq!(table.len(), 200);
        assert!(table.capacity() >= 256);
        for h in hashes(200) {
            assert_eq!(table.find(h), Some(&(h + 1)));
        }
    }

    #[test]
    fn find_mut_updates_in_place() {
        let mut table = HashTable::new();
        table.insert(9, 1i32).unwrap();
        if let Some(v) = table.find_mut(9) {
            *v += 41;
        }
        assert_eq!(table.find(9), Some(&42));
        assert_eq!(table.find_mut(10), None);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut table: HashTable<u32> = HashTable::new();
        for h in hashes(20) {
            table.insert(h, h).unwrap();
        }
        let capacity = table.capacity();
        table.clear();

        assert_eq!(table.len(), 0);
        assert_eq!(table.capacity(), capacity);
        for h in hashes(20) {
            assert!(!table.contains(h));
        }
        assert_eq!(table.insert(2, 2), Ok(Insert::Inserted));
        assert_eq!(table.capacity(), capacity);
    }

    #[test]
    fn iter_yields_live_entries() {
        let mut table: HashTable<u32> = HashTable::new();
        for h in hashes(10) {
            table.insert(h, h).unwrap();
        }
        table.remove(4).unwrap();

        let mut seen: Vec<u32> = table.iter().copied().collect();
        seen.sort_unstable();
        let expected: Vec<u32> = hashes(10).filter(|&h| h != 4).collect();
        assert_eq!(seen, expected);
        assert_eq!(table.iter().len(), 9);
    }

    #[test]
    fn iter_mut_mutates_all() {
        let mut table: HashTable<u32> = HashTable::new();
        for h in hashes(5) {
            table.insert(h, 0).unwrap();
        }
        for v in table.iter_mut() {
            *v = 7;
        }
        assert!(table.iter().all(|&v| v == 7));
    }

    #[test]
    fn clone_is_independent() {
        let mut table = HashTable::new();
        table.insert(3, 30u32).unwrap();
        let mut copy = table.clone();
        copy.insert(4, 40).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(copy.len(), 2);
        assert_eq!(copy.find(3), Some(&30));
    }
}
