use std::{borrow::Cow, fmt, ops, str, time};

use fstr::FStr;

use crate::{base32, bytes, Error};

/// Represents a Universally Unique Lexicographically Sortable Identifier.
///
/// The identifier is held as two 64-bit halves. The upper 48 bits of `high` carry the timestamp
/// and the remaining 80 bits carry the random payload, so the derived ordering (`high` first, then
/// `low`) agrees with both the 16-byte big-endian form and the 26-character text form.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Ulid {
    high: u64,
    low: u64,
}

/// Mask of the random payload bits held in `high`.
const RANDOM_HIGH_MASK: u64 = 0xffff;

impl Ulid {
    /// The largest timestamp a ULID can hold (2^48 - 1 milliseconds).
    pub const MAX_TIMESTAMP: u64 = 0xffff_ffff_ffff;

    /// Nil ULID (00000000000000000000000000)
    pub const NIL: Self = Self::from_fields(0, 0);

    /// Max ULID (7ZZZZZZZZZZZZZZZZZZZZZZZZZ)
    pub const MAX: Self = Self::from_fields(u64::MAX, u64::MAX);

    /// Creates a ULID from a millisecond timestamp and two random values.
    ///
    /// Only the low 16 bits of `random_hi` are used; all 64 bits of `random_lo` are.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOverflow`] if `timestamp` exceeds [`Ulid::MAX_TIMESTAMP`] and
    /// [`Error::TimestampUnderflow`] if it is negative.
    pub const fn from_parts(
        timestamp: i64,
        random_hi: u64,
        random_lo: u64,
    ) -> Result<Self, Error> {
        if timestamp < 0 {
            Err(Error::TimestampUnderflow)
        } else if timestamp as u64 > Self::MAX_TIMESTAMP {
            Err(Error::TimestampOverflow)
        } else {
            Ok(Self::from_fields(
                ((timestamp as u64) << 16) | (random_hi & RANDOM_HIGH_MASK),
                random_lo,
            ))
        }
    }

    /// Creates a ULID from its upper and lower 64-bit halves.
    pub const fn from_fields(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    /// Returns the upper 64 bits: the timestamp followed by the top 16 random bits.
    pub const fn high(&self) -> u64 {
        self.high
    }

    /// Returns the lower 64 bits of the random payload.
    pub const fn low(&self) -> u64 {
        self.low
    }

    /// Returns the embedded Unix timestamp in milliseconds.
    pub const fn timestamp(&self) -> u64 {
        self.high >> 16
    }

    /// Returns the 80-bit random payload.
    pub const fn random(&self) -> u128 {
        (((self.high & RANDOM_HIGH_MASK) as u128) << 64) | self.low as u128
    }

    /// Returns the embedded timestamp as a [`SystemTime`](time::SystemTime).
    pub fn datetime(&self) -> time::SystemTime {
        time::UNIX_EPOCH + time::Duration::from_millis(self.timestamp())
    }

    /// Returns the smallest ULID for `timestamp`, with every random bit cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if `timestamp` is out of the 48-bit range.
    pub const fn min_for(timestamp: i64) -> Result<Self, Error> {
        Self::from_parts(timestamp, 0, 0)
    }

    /// Returns the largest ULID for `timestamp`, with every random bit set.
    ///
    /// # Errors
    ///
    /// Returns an error if `timestamp` is out of the 48-bit range.
    pub const fn max_for(timestamp: i64) -> Result<Self, Error> {
        Self::from_parts(timestamp, u64::MAX, u64::MAX)
    }

    /// Returns the smallest ULID for the millisecond containing `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if `time` precedes the Unix epoch or is beyond the 48-bit range.
    pub fn min_for_system_time(time: time::SystemTime) -> Result<Self, Error> {
        Self::min_for(crate::generator::to_unix_ts_ms(time))
    }

    /// Returns the largest ULID for the millisecond containing `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if `time` precedes the Unix epoch or is beyond the 48-bit range.
    pub fn max_for_system_time(time: time::SystemTime) -> Result<Self, Error> {
        Self::max_for(crate::generator::to_unix_ts_ms(time))
    }

    /// Returns the ULID that follows `self` within the same millisecond, treating the random
    /// payload as an 80-bit unsigned integer and adding one. The timestamp is never touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RandomOverflow`] if every random bit is already set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monoulid::{Error, Ulid};
    ///
    /// let x = Ulid::min_for(1_469_918_176_385)?;
    /// assert_eq!(x.next()?.random(), 1);
    /// assert_eq!(Ulid::max_for(1_469_918_176_385)?.next(), Err(Error::RandomOverflow));
    /// # Ok::<(), Error>(())
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub const fn next(&self) -> Result<Self, Error> {
        let (low, carry) = self.low.overflowing_add(1);
        if !carry {
            Ok(Self::from_fields(self.high, low))
        } else if self.high & RANDOM_HIGH_MASK == RANDOM_HIGH_MASK {
            Err(Error::RandomOverflow)
        } else {
            Ok(Self::from_fields(self.high + 1, low))
        }
    }

    /// Returns the 16-byte big-endian representation.
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut dst = [0u8; 16];
        dst[..8].copy_from_slice(&bytes::to_bytes(self.high));
        dst[8..].copy_from_slice(&bytes::to_bytes(self.low));
        dst
    }

    /// Creates a ULID from its 16-byte big-endian representation.
    pub fn from_bytes(src: &[u8; 16]) -> Self {
        Self::from_fields(bytes::from_bytes(src, 0), bytes::from_bytes(src, 8))
    }

    /// Returns the 26-character canonical string representation stored in a stack-allocated
    /// string type that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monoulid::Ulid;
    ///
    /// let x = "01arYz6s41vtpg28t5cy4tqkff".parse::<Ulid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "01ARYZ6S41VTPG28T5CY4TQKFF");
    /// assert_eq!(format!("{y}"), "01ARYZ6S41VTPG28T5CY4TQKFF");
    /// # Ok::<(), monoulid::ParseError>(())
    /// ```
    pub fn encode(&self) -> FStr<26> {
        let mut buffer = [0u8; 26];
        base32::encode_into(self.timestamp(), &mut buffer[..10]);
        base32::encode_into(
            ((self.high & RANDOM_HIGH_MASK) << 24) | (self.low >> 40),
            &mut buffer[10..18],
        );
        base32::encode_into(self.low, &mut buffer[18..]);
        debug_assert!(buffer.is_ascii());
        // SAFETY: the buffer consists of ASCII symbols only
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }
}

impl fmt::Display for Ulid {
    /// Returns the 26-character canonical string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Ulid {
    type Err = ParseError;

    /// Creates an object from the 26-character string representation, accepting lowercase
    /// letters and the `I`, `L`, and `O` aliases.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let src = src.as_bytes();
        if src.len() != 26 {
            return Err(ParseError::InvalidLength { len: src.len() });
        }

        let timestamp = decode_slice(src, 0..10)?;
        let random_hi = decode_slice(src, 10..18)?;
        let random_lo = decode_slice(src, 18..26)?;
        if timestamp > Self::MAX_TIMESTAMP {
            return Err(ParseError::Overflow);
        }

        Ok(Self::from_fields(
            (timestamp << 16) | (random_hi >> 24),
            (random_hi << 40) | random_lo,
        ))
    }
}

/// Decodes `src[range]`, reporting invalid bytes by their position in the whole `src`.
fn decode_slice(src: &[u8], range: ops::Range<usize>) -> Result<u64, ParseError> {
    let start = range.start;
    base32::decode_bytes(&src[range]).map_err(|err| match err {
        base32::DecodeError::InvalidChar { byte, index } => ParseError::InvalidChar {
            byte,
            index: start + index,
        },
        base32::DecodeError::Overflow => ParseError::Overflow,
    })
}

/// Validates a ULID string and returns its canonical form: uppercase, with the `I`, `L`, and `O`
/// aliases replaced by the digits they stand for.
///
/// The input is borrowed as is if it is canonical already.
///
/// # Errors
///
/// Returns an error if `src` is not a valid ULID string.
///
/// # Examples
///
/// ```rust
/// use std::borrow::Cow;
///
/// let x = monoulid::canonicalize("olarYz6s41vtpg28t5cy4tqkff")?;
/// assert_eq!(x, "01ARYZ6S41VTPG28T5CY4TQKFF");
/// assert!(matches!(monoulid::canonicalize(&x)?, Cow::Borrowed(_)));
/// # Ok::<(), monoulid::ParseError>(())
/// ```
pub fn canonicalize(src: &str) -> Result<Cow<'_, str>, ParseError> {
    let canonical = src.parse::<Ulid>()?.encode();
    if *canonical == *src {
        Ok(Cow::Borrowed(src))
    } else {
        Ok(Cow::Owned(canonical.to_string()))
    }
}

impl From<Ulid> for [u8; 16] {
    fn from(src: Ulid) -> Self {
        src.to_bytes()
    }
}

impl From<[u8; 16]> for Ulid {
    fn from(src: [u8; 16]) -> Self {
        Self::from_bytes(&src)
    }
}

impl From<Ulid> for u128 {
    fn from(src: Ulid) -> Self {
        ((src.high as u128) << 64) | src.low as u128
    }
}

impl From<u128> for Ulid {
    fn from(src: u128) -> Self {
        Self::from_fields((src >> 64) as u64, src as u64)
    }
}

impl From<Ulid> for String {
    fn from(src: Ulid) -> Self {
        src.to_string()
    }
}

impl TryFrom<&str> for Ulid {
    type Error = ParseError;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl TryFrom<String> for Ulid {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

/// Error parsing an invalid string representation of ULID.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum ParseError {
    /// The input is not 26 bytes long.
    InvalidLength { len: usize },

    /// A byte outside of the base32 alphabet was found at `index`.
    InvalidChar { byte: u8, index: usize },

    /// The first character exceeds `7`, so the timestamp does not fit in 48 bits.
    Overflow,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid string representation: ")?;
        match self {
            Self::InvalidLength { len } => write!(f, "expected 26 bytes, found {len}"),
            Self::InvalidChar { byte, index } => {
                write!(f, "unexpected byte {byte:#04x} at index {index}")
            }
            Self::Overflow => write!(f, "timestamp exceeds 48 bits"),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Ulid;

    impl From<Ulid> for uuid::Uuid {
        fn from(src: Ulid) -> Self {
            uuid::Uuid::from_bytes(src.to_bytes())
        }
    }

    impl From<uuid::Uuid> for Ulid {
        fn from(src: uuid::Uuid) -> Self {
            Self::from_bytes(src.as_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Ulid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Ulid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(&self.to_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Ulid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Ulid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a ULID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::Ulid;
        use serde_test::{assert_de_tokens_error, assert_tokens, Configure, Token};

        /// Serializes and deserializes prepared cases correctly
        #[test]
        fn serializes_and_deserializes_prepared_cases_correctly() {
            let cases = [
                ("00000000000000000000000000", &[0u8; 16]),
                (
                    "01FWHE4YDGNF6HHH6W1G60EECF",
                    &[
                        1, 127, 34, 226, 121, 176, 171, 205, 24, 196, 220, 12, 12, 7, 57, 143,
                    ],
                ),
                (
                    "01ARYZ6S41VTPG28T5CY4TQKFF",
                    &[
                        1, 86, 61, 243, 100, 129, 222, 173, 1, 35, 69, 103, 137, 171, 205, 239,
                    ],
                ),
                ("7ZZZZZZZZZZZZZZZZZZZZZZZZZ", &[0xffu8; 16]),
            ];

            for (text, bytes) in cases {
                let e = text.parse::<Ulid>().unwrap();
                assert_tokens(&e.readable(), &[Token::String(text)]);
                assert_tokens(&e.compact(), &[Token::Bytes(bytes)]);
            }
        }

        /// Rejects malformed representations
        #[test]
        fn rejects_malformed_representations() {
            assert_de_tokens_error::<serde_test::Readable<Ulid>>(
                &[Token::Str("01ARYZ6S41VTPG28T5CY4TQKF")],
                "invalid string representation: expected 26 bytes, found 25",
            );
        }
    }
}
