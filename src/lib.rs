#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// The default byte mixer and the pluggable hash-function type.
pub mod hash;

pub mod hash_table;

/// A byte-keyed hash map built on the fixed-stride table.
///
/// This module provides a `HashMap` that wraps the `HashTable`, copying
/// key bytes into the table and owning its values, with a per-instance
/// replaceable hash function.
pub mod hash_map;

/// A byte-string membership set built on the fixed-stride table.
///
/// This module provides a `HashSet` that wraps the `HashTable`, copying
/// key bytes into the table, with a per-instance replaceable hash
/// function.
pub mod hash_set;

pub use hash::HashFn;
pub use hash::fold_bytes;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use hash_table::Insert;
pub use hash_table::InvalidHash;
