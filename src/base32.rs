//! Crockford-style base32 codec for fixed-width integer fields.
//!
//! Each symbol carries five bits, most significant group first. Decoding is case-insensitive and
//! folds the visually ambiguous letters `O` into `0` and `I`/`L` into `1`.

use std::fmt;

/// The 32 symbols in order of their values. `I`, `L`, `O`, and `U` are omitted.
pub const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

const BITS_PER_CHAR: usize = 5;
const NO_VALUE: u8 = 0xff;

/// Maps every byte to its symbol value, or `NO_VALUE` if the byte is not a symbol.
const DECODE_MAP: [u8; 256] = {
    let mut map = [NO_VALUE; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        let c = ALPHABET[i];
        map[c as usize] = i as u8;
        map[c.to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    map[b'O' as usize] = 0;
    map[b'o' as usize] = 0;
    map[b'I' as usize] = 1;
    map[b'i' as usize] = 1;
    map[b'L' as usize] = 1;
    map[b'l' as usize] = 1;
    map
};

/// Writes `dst.len()` symbols representing the low `5 * dst.len()` bits of `value`.
///
/// Bits of `value` above that width are ignored, and widths beyond 64 bits are padded with zeros.
///
/// # Examples
///
/// ```rust
/// let mut buffer = [0u8; 4];
/// monoulid::base32::encode_into(1234, &mut buffer);
/// assert_eq!(&buffer, b"016J");
/// ```
pub fn encode_into(value: u64, dst: &mut [u8]) {
    let len = dst.len();
    for (i, e) in dst.iter_mut().enumerate() {
        let shift = (len - 1 - i) * BITS_PER_CHAR;
        let index = value.checked_shr(shift as u32).unwrap_or(0) & 0x1f;
        *e = ALPHABET[index as usize];
    }
}

/// Decodes `text` into an integer holding `5 * text.len()` bits.
///
/// # Errors
///
/// Returns an error if `text` contains a byte outside of the alphabet and its aliases, or if the
/// decoded value does not fit in a `u64`.
pub fn decode(text: &str) -> Result<u64, DecodeError> {
    decode_bytes(text.as_bytes())
}

/// Decodes an ASCII byte sequence; see [`decode`].
pub fn decode_bytes(src: &[u8]) -> Result<u64, DecodeError> {
    let mut acc = 0u64;
    for (index, &byte) in src.iter().enumerate() {
        let n = DECODE_MAP[byte as usize];
        if n == NO_VALUE {
            return Err(DecodeError::InvalidChar { byte, index });
        }
        if acc >> (64 - BITS_PER_CHAR) != 0 {
            return Err(DecodeError::Overflow);
        }
        acc = (acc << BITS_PER_CHAR) | n as u64;
    }
    Ok(acc)
}

/// Error decoding a base32 symbol sequence.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum DecodeError {
    /// A byte outside of the alphabet was found at `index`.
    InvalidChar { byte: u8, index: usize },

    /// The decoded value does not fit in 64 bits.
    Overflow,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChar { byte, index } => {
                write!(f, "invalid base32 byte {byte:#04x} at index {index}")
            }
            Self::Overflow => write!(f, "base32 value exceeds 64 bits"),
        }
    }
}

impl std::error::Error for DecodeError {}

#[cfg(test)]
mod tests {
    use super::{decode, encode_into, DecodeError};

    fn encode<const N: usize>(value: u64) -> String {
        let mut buffer = [0u8; N];
        encode_into(value, &mut buffer);
        String::from_utf8(buffer.to_vec()).unwrap()
    }

    /// Encodes prepared cases correctly
    #[test]
    fn encodes_prepared_cases_correctly() {
        assert_eq!(encode::<10>(0), "0000000000");
        assert_eq!(encode::<10>(0x17f_22e2_79b0), "01FWHE4YDG");
        assert_eq!(encode::<10>((1 << 48) - 1), "7ZZZZZZZZZ");
        assert_eq!(encode::<8>(0xff_ffff_ffff), "ZZZZZZZZ");
        assert_eq!(encode::<2>(31), "0Z");
        assert_eq!(encode::<7>(1_234_567_890), "14SC0PJ");
        assert_eq!(encode::<13>(u64::MAX), "FZZZZZZZZZZZZ");
    }

    /// Drops bits above the block width
    #[test]
    fn drops_bits_above_the_block_width() {
        assert_eq!(encode::<8>(u64::MAX), "ZZZZZZZZ");
        assert_eq!(encode::<1>(33), "1");
        assert_eq!(encode::<0>(u64::MAX), "");
    }

    /// Pads widths beyond 64 bits with zeros
    #[test]
    fn pads_widths_beyond_64_bits_with_zeros() {
        assert_eq!(encode::<15>(u64::MAX), "00FZZZZZZZZZZZZ");
    }

    /// Decodes prepared cases correctly
    #[test]
    fn decodes_prepared_cases_correctly() {
        assert_eq!(decode(""), Ok(0));
        assert_eq!(decode("0000000000"), Ok(0));
        assert_eq!(decode("01FWHE4YDG"), Ok(0x17f_22e2_79b0));
        assert_eq!(decode("7ZZZZZZZZZ"), Ok((1 << 48) - 1));
        assert_eq!(decode("14SC0PJ"), Ok(1_234_567_890));
        assert_eq!(decode("FZZZZZZZZZZZZ"), Ok(u64::MAX));
    }

    /// Decodes case-insensitively and folds ambiguous letters
    #[test]
    fn decodes_case_insensitively_and_folds_ambiguous_letters() {
        assert_eq!(decode("01fwhe4ydg"), Ok(0x17f_22e2_79b0));
        assert_eq!(decode("oIFWHE4YDG"), Ok(0x17f_22e2_79b0));
        assert_eq!(decode("OLFWHE4YDG"), Ok(0x17f_22e2_79b0));
        assert_eq!(decode("0lfwhe4ydg"), Ok(0x17f_22e2_79b0));
        assert_eq!(decode("o"), decode("0"));
        assert_eq!(decode("i"), decode("1"));
    }

    /// Rejects bytes outside of the alphabet
    #[test]
    fn rejects_bytes_outside_of_the_alphabet() {
        let cases = [
            ("U", b'U', 0),
            ("0u", b'u', 1),
            ("01FWHE4YD-", b'-', 9),
            (" 1", b' ', 0),
            ("7ZZZZZZZZ\0", 0, 9),
        ];
        for (text, byte, index) in cases {
            assert_eq!(decode(text), Err(DecodeError::InvalidChar { byte, index }));
        }
        assert!(matches!(
            decode("0é"),
            Err(DecodeError::InvalidChar { index: 1, .. })
        ));
    }

    /// Rejects values wider than 64 bits
    #[test]
    fn rejects_values_wider_than_64_bits() {
        assert_eq!(decode("G000000000000"), Err(DecodeError::Overflow));
        assert_eq!(decode("10000000000000"), Err(DecodeError::Overflow));
        assert_eq!(decode("00000000000000"), Ok(0));
    }

    /// Restores encoded values
    #[test]
    fn restores_encoded_values() {
        for _ in 0..1_000 {
            let value = rand::random::<u64>();
            assert_eq!(decode(&encode::<13>(value)), Ok(value));
            assert_eq!(decode(&encode::<8>(value)), Ok(value & 0xff_ffff_ffff));
        }
    }
}
