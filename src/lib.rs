//! ULID generation and parsing with monotonic ordering within a millisecond
//!
//! ```rust
//! let ulid = monoulid::ulid()?;
//! println!("{}", ulid); // e.g. "01ARYZ6S41VTPG28T5CY4TQKFF"
//! println!("{:?}", ulid.to_bytes()); // as 16-byte big-endian array
//!
//! let parsed = "01ARYZ6S41VTPG28T5CY4TQKFF".parse::<monoulid::Ulid>()?;
//! assert_eq!(parsed.timestamp(), 1_469_918_176_385);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! See the [ULID specification](https://github.com/ulid/spec).
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |             random            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             random                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             random                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in
//!   milliseconds.
//! - The 80-bit `random` field is filled with a random number whenever the
//!   `unix_ts_ms` changes, and incremented by one for each new ID generated
//!   within the same timestamp.
//!
//! The 26-character text form encodes the 128 bits in Crockford's base32,
//! ten characters for the timestamp and sixteen for the random field. The
//! first character never exceeds `7`. The text form, the 16-byte big-endian
//! form, and the [`Ulid`] type itself all sort in the same order.
//!
//! If the `random` field cannot be incremented any further within the same
//! millisecond, generation fails with [`Error::RandomOverflow`] rather than
//! borrowing from the next millisecond. A clock that moves backward is treated
//! as a new millisecond and breaks the monotonic order across the rollback.
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen`: enables the primary [`ulid()`] function backed by a
//!   process-wide generator.
//!
//! Optional features:
//!
//! - `serde`: enables serialization/deserialization of [`Ulid`] via serde.
//! - `uuid`: enables conversion from/to [`uuid::Uuid`].
//! - `tracing`: emits generator events via tracing.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod base32;
pub mod bytes;

mod error;
pub use error::Error;

mod id;
pub use id::{canonicalize, ParseError, Ulid};

pub mod generator;
pub use generator::Generator;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::ulid;
