//! Deterministic entropy for reproducible runs.

use crate::entropy::EntropySource;
use crate::types::RunId;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Provides deterministic ChaCha8 streams derived from a master seed.
///
/// Streams are:
/// - Deterministic: same master seed and run always give the same stream
/// - Unique: every run gets a different stream
/// - Isolated: running more paths doesn't change earlier paths' streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededEntropy {
    master_seed: u64,
}

impl SeededEntropy {
    /// Creates a new entropy source with the given master seed.
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Derives the per-run seed.
    ///
    /// `master_seed * φ + run * prime`, so neighbouring master seeds do not
    /// share streams with shifted run numbers.
    pub fn run_seed(&self, run: RunId) -> u64 {
        self.master_seed
            .wrapping_mul(0x9e3779b97f4a7c15) // Golden ratio prime
            .wrapping_add(run.0.wrapping_mul(0x517cc1b727220a95))
    }
}

impl EntropySource for SeededEntropy {
    fn stream(&self, run: RunId) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.run_seed(run))
    }

    fn seed(&self) -> u64 {
        self.master_seed
    }
}
