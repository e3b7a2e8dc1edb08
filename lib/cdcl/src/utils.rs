use std::time::{Duration, Instant};

/// Finite subsequences of the Luby sequence:
///
/// 0: 1
/// 1: 1 1 2
/// 2: 1 1 2 1 1 2 4
/// 3: 1 1 2 1 1 2 4 1 1 2 1 1 2 4 8
/// ...
///
/// Returns `y` raised to the `x`-th element (0-based) of the sequence.
pub fn luby(y: f64, mut x: u32) -> f64 {
    // Find the finite subsequence that contains index 'x',
    // and the size of that subsequence:
    let mut size: u64 = 1;
    let mut seq = 0;

    while size < x as u64 + 1 {
        seq += 1;
        size = 2 * size + 1;
    }

    while size - 1 != x as u64 {
        size = (size - 1) >> 1;
        seq -= 1;
        x = (x as u64 % size) as u32;
    }

    y.powi(seq)
}

pub fn measure_time<T, F>(f: F) -> (Duration, T)
where
    F: FnOnce() -> T,
{
    let time_start = Instant::now();
    let result = f();
    (time_start.elapsed(), result)
}
