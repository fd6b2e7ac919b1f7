//! Core entropy trait for jumpsim runs.

use crate::types::RunId;
use rand_chacha::ChaCha8Rng;

/// Hands out one independent random stream per simulation run.
///
/// # Implementations
///
/// - **Seeded**: `SeededEntropy` - reproducible, derived from a master seed
/// - **Production**: `OsEntropy` - fresh OS entropy for every stream
pub trait EntropySource: Send + Sync {
    /// Returns the generator for `run`.
    ///
    /// Seeded implementations return the same stream for the same run every
    /// time; streams of different runs are independent.
    fn stream(&self, run: RunId) -> ChaCha8Rng;

    /// Returns the master seed (for logging/debugging).
    ///
    /// Unseeded sources return 0.
    fn seed(&self) -> u64;
}
