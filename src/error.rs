use std::fmt;

use crate::Ulid;

/// Error constructing or generating a ULID.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Error {
    /// The timestamp exceeds [`Ulid::MAX_TIMESTAMP`].
    TimestampOverflow,

    /// The timestamp is negative.
    TimestampUnderflow,

    /// The 80-bit random payload cannot be incremented within the same millisecond.
    RandomOverflow,

    /// The time source reported a negative Unix time.
    NegativeTime(i64),
}

impl Error {
    /// Returns `true` if the error is caused by a value exceeding its field width, either the
    /// timestamp or the random payload.
    pub const fn is_overflow(&self) -> bool {
        matches!(self, Self::TimestampOverflow | Self::RandomOverflow)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimestampOverflow => write!(
                f,
                "timestamp exceeds maximum value of {}",
                Ulid::MAX_TIMESTAMP
            ),
            Self::TimestampUnderflow => write!(f, "timestamp precedes minimum value of 0"),
            Self::RandomOverflow => write!(f, "unable to increment random portion"),
            Self::NegativeTime(t) => write!(f, "negative time value {t} is not supported"),
        }
    }
}

impl std::error::Error for Error {}
