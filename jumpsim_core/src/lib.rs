//! jumpsim Core - Hidden-State Markov Jump Processes
//!
//! Forward simulation of continuous-time processes whose hidden state is
//! moved by competing Poisson shocks and reported through (possibly noisy)
//! observations, queried at arbitrary, caller-chosen times.
//!
//! 1. **Clock**: racing exponential clocks with one wait draw and one winner draw
//! 2. **Transition**: asking the model for its shocks and picking the winner
//! 3. **Snapshot**: immutable [`HiddenState`] values that resume exactly
//! 4. **Advance**: catching up on every shock between two query points
//!
//! All randomness comes from the generator passed to each call; two runs
//! never share hidden state.
//!
//! # Example
//!
//! ```
//! use jumpsim_core::{HiddenState, JumpModel, Shock};
//! use rand::{Rng, SeedableRng};
//! use std::sync::Arc;
//!
//! struct OnOff;
//!
//! impl JumpModel for OnOff {
//!     type State = bool;
//!     type Observation = bool;
//!
//!     fn shocks(&self, on: &bool) -> Vec<Shock<bool>> {
//!         vec![Shock::to(if *on { 0.5 } else { 2.0 }, !on)]
//!     }
//!
//!     fn observe<R: Rng + ?Sized>(&self, on: &bool, _rng: &mut R) -> bool {
//!         *on
//!     }
//! }
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let hs = HiddenState::new(Arc::new(OnOff), false, &mut rng).unwrap();
//! let (observations, _hs) = hs.next_observations(&[0.5, 1.0, 2.5], &mut rng).unwrap();
//! assert_eq!(observations.len(), 3);
//! ```

pub mod advance;
pub mod clock;
pub mod error;
pub mod state;
pub mod transition;

// Re-export key types for convenience
pub use advance::{Advance, MAX_ZERO_WAIT_STREAK};
pub use clock::{competing_poisson, total_rate, ClockDraw};
pub use error::{Result, SimError};
pub use state::HiddenState;
pub use transition::{resolve_transition, JumpModel, NextState, PendingShock, Shock, StateGenerator};
