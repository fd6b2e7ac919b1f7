//! jumpsim Entropy Abstraction Layer
//!
//! Every simulation run draws from its own generator, handed out by an
//! [`EntropySource`]. Nothing in the engine touches a global RNG, so runs
//! never correlate through hidden state.
//!
//! - **Seeded**: `SeededEntropy` - ChaCha8 streams derived from one master seed
//! - **Production**: `OsEntropy` - ChaCha8 streams seeded from OS entropy
//!
//! By deriving every stream from a single 64-bit seed, any run is
//! reproducible from its seed and run number.
//!
//! # Example
//!
//! ```
//! use jumpsim_env::{EntropySource, RunId, SeededEntropy};
//! use rand::Rng;
//!
//! let entropy = SeededEntropy::new(42);
//! let mut a = entropy.stream(RunId(0));
//! let mut b = entropy.stream(RunId(0));
//! assert_eq!(a.gen::<u64>(), b.gen::<u64>());
//! ```

mod entropy;
mod os_impl;
mod seeded;
mod types;

pub use entropy::EntropySource;
pub use os_impl::OsEntropy;
pub use seeded::SeededEntropy;
pub use types::RunId;
