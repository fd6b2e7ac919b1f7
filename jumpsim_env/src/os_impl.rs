//! Production entropy backed by the operating system.

use crate::entropy::EntropySource;
use crate::types::RunId;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Entropy source that seeds every stream from OS entropy.
///
/// Runs are independent but not reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl OsEntropy {
    /// Creates a new OsEntropy.
    pub fn new() -> Self {
        Self
    }
}

impl EntropySource for OsEntropy {
    fn stream(&self, _run: RunId) -> ChaCha8Rng {
        ChaCha8Rng::from_entropy()
    }

    fn seed(&self) -> u64 {
        // Not seeded
        0
    }
}
