/// A replaceable hash function from key bytes to a 32-bit hash.
///
/// Containers call this once per operation on the full key slice. The
/// values `0` and `1` are reserved by the table contract: a function that
/// returns them for a real key causes [`insert`](crate::HashMap::insert)
/// to fail with [`InvalidHash`](crate::InvalidHash) for that key.
pub type HashFn = fn(&[u8]) -> u32;

/// The default hash function: a golden-ratio XOR/shift byte mixer.
///
/// Each byte is folded into the accumulator as
/// `acc ^= byte + 0x9e3779b9 + (acc << 6) + (acc >> 2)`, starting from
/// zero. Scanning stops at the first zero byte rather than the end of the
/// slice, so hashes are identical to those of a null-terminated scan over
/// the same bytes; keys that differ only past an embedded `NUL` collide.
///
/// Deterministic and allocation-free. Note that the empty key (and any
/// key starting with a zero byte) hashes to `0`, which the table rejects
/// as reserved.
///
/// # Examples
///
/// ```rust
/// use stride_hash::fold_bytes;
///
/// assert_eq!(fold_bytes(b"alice"), 0x7e85_eeb9);
/// assert_eq!(fold_bytes(b"ab\0cd"), fold_bytes(b"ab"));
/// assert_eq!(fold_bytes(b""), 0);
/// ```
pub fn fold_bytes(key: &[u8]) -> u32 {
    let mut acc: u32 = 0;
    for &byte in key {
        if byte == 0 {
            break;
        }
        acc ^= (byte as u32)
            .wrapping_add(0x9e37_79b9)
            .wrapping_add(acc << 6)
            .wrapping_add(acc >> 2);
    }
    acc
}
