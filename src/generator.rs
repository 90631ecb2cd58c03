//! ULID generator and related types.

use std::time;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, Ulid};

pub mod with_rand08;

#[cfg(test)]
mod tests;

/// A trait that defines the minimum random number generator interface for [`Generator`].
///
/// Closures of type `FnMut() -> u64` implement this trait, so a seeded or constant source can be
/// passed directly.
pub trait RandSource {
    /// Returns the next random `u64`.
    fn next_u64(&mut self) -> u64;
}

/// A trait that defines the minimum system clock interface for [`Generator`].
///
/// Closures of type `FnMut() -> i64` implement this trait.
pub trait TimeSource {
    /// Returns the current Unix time in milliseconds. Negative values denote instants before the
    /// Unix epoch.
    fn unix_ts_ms(&mut self) -> i64;
}

impl<F: FnMut() -> u64> RandSource for F {
    fn next_u64(&mut self) -> u64 {
        self()
    }
}

impl<F: FnMut() -> i64> TimeSource for F {
    fn unix_ts_ms(&mut self) -> i64 {
        self()
    }
}

/// The default [`TimeSource`] that reads [`SystemTime::now()`](time::SystemTime::now).
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn unix_ts_ms(&mut self) -> i64 {
        to_unix_ts_ms(time::SystemTime::now())
    }
}

/// Converts `time` to Unix milliseconds, rounding toward negative infinity and saturating at the
/// bounds of `i64`.
pub(crate) fn to_unix_ts_ms(time: time::SystemTime) -> i64 {
    match time.duration_since(time::UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
        Err(err) => {
            let before = err.duration();
            let ms = before.as_millis() + u128::from(before.subsec_nanos() % 1_000_000 != 0);
            i64::try_from(ms).map_or(i64::MIN, |ms| -ms)
        }
    }
}

/// Represents a ULID generator that remembers the last timestamp and ULID it produced and
/// guarantees the monotonic order of ULIDs generated within the same millisecond.
///
/// When the clock reports the same millisecond as the previous call, the generator returns the
/// previous ULID with its 80-bit random payload incremented by one. Otherwise it draws a fresh
/// payload from the random source. A clock that moves backward is treated as a new millisecond as
/// well, so the order of ULIDs across such a rollback follows the clock, not the call sequence.
///
/// A generator is the monotonic authority only for the callers that share it. It takes `&mut self`,
/// so sharing one across threads requires external synchronization. The following example
/// guarantees the process-wide (cross-thread) monotonicity using Rust's standard synchronization
/// mechanism.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use std::{sync, thread};
/// use monoulid::Generator;
///
/// let g = sync::Arc::new(sync::Mutex::new(Generator::with_rand08(OsRng)));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.lock().unwrap().generate().unwrap(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
///
/// Fixed clocks and seeded random sources can be injected for reproducible sequences:
///
/// ```rust
/// use monoulid::Generator;
///
/// let mut seed = 0u64;
/// let mut g = Generator::with_rand_and_time_sources(
///     move || {
///         seed += 1;
///         seed
///     },
///     || 1_469_918_176_385i64,
/// );
/// let first = g.generate()?;
/// let second = g.generate()?;
/// assert_eq!(first.timestamp(), second.timestamp());
/// assert_eq!(first.random() + 1, second.random());
/// # Ok::<(), monoulid::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Generator<R, T = StdSystemTime> {
    last_call_time: i64,
    value: Option<Ulid>,

    /// The random number generator used by the generator.
    rng: R,

    /// The clock used by the generator.
    time_source: T,
}

impl<R, T> Generator<R, T> {
    /// Creates a generator instance with a random number generator and a clock.
    pub const fn with_rand_and_time_sources(rng: R, time_source: T) -> Self {
        Self {
            last_call_time: i64::MIN,
            value: None,
            rng,
            time_source,
        }
    }

    /// Returns the most recently generated ULID, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monoulid::Generator;
    ///
    /// let mut g = Generator::with_rand_and_time_sources(|| 0u64, || 42i64);
    /// assert_eq!(g.last_value(), None);
    /// let first = g.generate()?;
    /// assert_eq!(g.last_value(), Some(first));
    /// # Ok::<(), monoulid::Error>(())
    /// ```
    pub const fn last_value(&self) -> Option<Ulid> {
        self.value
    }
}

impl<R: RandSource> Generator<R> {
    /// Creates a generator instance that reads the system clock.
    pub const fn new(rng: R) -> Self {
        Self::with_rand_and_time_sources(rng, StdSystemTime)
    }
}

impl<R: Default, T: Default> Default for Generator<R, T> {
    fn default() -> Self {
        Self::with_rand_and_time_sources(R::default(), T::default())
    }
}

impl<R: RandSource, T: TimeSource> Generator<R, T> {
    /// Generates a new ULID from the current time reported by the time source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NegativeTime`] if the time source reports a negative time,
    /// [`Error::TimestampOverflow`] if the time exceeds the 48-bit range, and
    /// [`Error::RandomOverflow`] if the random payload cannot be incremented any further within
    /// the current millisecond.
    pub fn generate(&mut self) -> Result<Ulid, Error> {
        let unix_ts_ms = self.time_source.unix_ts_ms();
        self.generate_core(unix_ts_ms)
    }

    /// Generates a new ULID from the `unix_ts_ms` passed.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_core(&mut self, unix_ts_ms: i64) -> Result<Ulid, Error> {
        if unix_ts_ms < 0 {
            return Err(Error::NegativeTime(unix_ts_ms));
        }

        if unix_ts_ms == self.last_call_time {
            if let Some(prev) = self.value {
                let value = match prev.next() {
                    Ok(value) => value,
                    Err(err) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(unix_ts_ms, "random payload exhausted within millisecond");
                        return Err(err);
                    }
                };
                self.value = Some(value);
                return Ok(value);
            }
        }

        #[cfg(feature = "tracing")]
        if unix_ts_ms < self.last_call_time {
            tracing::debug!(
                unix_ts_ms,
                last_call_time = self.last_call_time,
                "clock moved backwards"
            );
        }

        let value = Ulid::from_parts(unix_ts_ms, self.rng.next_u64(), self.rng.next_u64())?;
        self.last_call_time = unix_ts_ms;
        self.value = Some(value);
        Ok(value)
    }
}

/// Supports operations as an infinite iterator that produces a new ULID for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use monoulid::Generator;
///
/// Generator::with_rand08(rand::thread_rng())
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e.unwrap()));
/// ```
impl<R: RandSource, T: TimeSource> Iterator for Generator<R, T> {
    type Item = Result<Ulid, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource, T: TimeSource> std::iter::FusedIterator for Generator<R, T> {}
