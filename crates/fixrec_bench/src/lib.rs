//! Benchmark utilities.

/// Deterministic filler for a record of `size` bytes.
#[must_use]
pub fn record(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}
