//! The "CLOCK" engine - racing independent exponential clocks.
//!
//! The minimum of independent `Exp(r_i)` clocks is `Exp(Σr_i)`, and the clock
//! that rings first is `i` with probability `r_i / Σr_i`, independently of when
//! it rings. A race is therefore sampled with two draws instead of `n`:
//!
//! ```text
//!   wait   ~ Exp(Σr)                 (rand_distr::Exp)
//!   winner ~ Categorical(r / Σr)     (rand::distributions::WeightedIndex)
//! ```

use crate::error::{Result, SimError};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_distr::Exp;

/// Outcome of one race between competing Poisson clocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockDraw {
    /// Time until the first clock rings.
    pub wait: f64,

    /// Index of the clock that rang.
    pub winner: usize,
}

/// Validates a rate vector and returns its sum.
///
/// Individual rates may be zero, but every rate must be finite and
/// non-negative and the total must be strictly positive.
pub fn total_rate(rates: &[f64]) -> Result<f64> {
    if rates.is_empty() {
        return Err(SimError::EmptyTransitionSet);
    }

    let mut total = 0.0;
    for (index, &rate) in rates.iter().enumerate() {
        if !rate.is_finite() || rate < 0.0 {
            return Err(SimError::InvalidRate { index, rate });
        }
        total += rate;
    }

    if !(total > 0.0 && total.is_finite()) {
        return Err(SimError::DegenerateRates { total });
    }
    Ok(total)
}

/// Races the clocks described by `rates` and reports the first arrival.
///
/// The waiting time is drawn before the winner; both come from `rng` and
/// nothing else.
pub fn competing_poisson<R: Rng + ?Sized>(rates: &[f64], rng: &mut R) -> Result<ClockDraw> {
    let total = total_rate(rates)?;

    let clock = Exp::new(total).map_err(|_| SimError::DegenerateRates { total })?;
    let wait = clock.sample(rng);

    let weights = WeightedIndex::new(rates).map_err(|_| SimError::DegenerateRates { total })?;
    let winner = weights.sample(rng);

    Ok(ClockDraw { wait, winner })
}
