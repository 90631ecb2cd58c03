//! Conversions between `u64` and big-endian byte sequences.

/// Encodes a `u64` into an 8-byte big-endian array, most significant byte first.
pub const fn to_bytes(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Decodes the eight bytes starting at `offset` as a big-endian `u64`.
///
/// # Panics
///
/// Panics if `bytes` holds fewer than eight bytes from `offset`.
pub fn from_bytes(bytes: &[u8], offset: usize) -> u64 {
    assert!(
        bytes.len() >= offset && bytes.len() - offset >= 8,
        "`bytes` must hold at least 8 bytes from `offset`"
    );
    bytes[offset..offset + 8]
        .iter()
        .fold(0, |acc, &b| (acc << 8) | b as u64)
}

/// Adds one to `bytes` read as a big-endian unsigned integer.
///
/// The carry moves from the last byte toward the first. When every byte was `0xff`, the result is
/// one byte longer than the input: a leading zero followed by the original bytes reset to zero.
///
/// # Examples
///
/// ```rust
/// use monoulid::bytes::increment_with_carry;
///
/// assert_eq!(increment_with_carry(vec![0x00, 0xff]), [0x01, 0x00]);
/// assert_eq!(increment_with_carry(vec![0xff, 0xff]), [0x00, 0x00, 0x00]);
/// ```
pub fn increment_with_carry(mut bytes: Vec<u8>) -> Vec<u8> {
    for e in bytes.iter_mut().rev() {
        let (sum, carry) = e.overflowing_add(1);
        *e = sum;
        if !carry {
            return bytes;
        }
    }
    bytes.insert(0, 0);
    bytes
}
