//! Randomness helpers.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Returns a pseudorandom alphanumeric string with the given length.
///
/// Used for SQL placeholder suffixes where collisions across repeated
/// resolutions within the same query must be avoided.
pub fn pseudorandom_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
