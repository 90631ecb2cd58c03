//! Random and time sources shared by the generator tests.

use super::{RandSource, TimeSource};

/// Returns a random source backed by `rand::random`.
pub(crate) fn thread_rand() -> impl RandSource {
    rand::random::<u64>
}

/// Returns a random source that yields 1, 2, 3, and so on.
pub(crate) fn counting_rand() -> impl RandSource {
    let mut n = 0u64;
    move || {
        n += 1;
        n
    }
}

/// Returns a clock that never advances.
pub(crate) fn fixed_clock(unix_ts_ms: i64) -> impl TimeSource {
    move || unix_ts_ms
}

/// Returns a clock that reports `readings` in order and then repeats the last one.
pub(crate) fn stepping_clock(readings: &[i64]) -> impl FnMut() -> i64 {
    let readings = readings.to_vec();
    let mut i = 0;
    move || {
        let t = readings[i.min(readings.len() - 1)];
        i += 1;
        t
    }
}
