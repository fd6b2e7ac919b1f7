//! The advancement loop.
//!
//! Moving a snapshot forward by `t` fires every shock scheduled at or before
//! the query horizon, re-racing the clocks after each one, then observes the
//! final state:
//!
//! ```text
//!   t ──────────────────────────────────────────►|
//!   |── T₀ ──|── T₁ ──────|── T₂ ───|── T₃ ─────────┤
//!          fire       fire      fire        residual = T₃ - (t - T₀ - T₁ - T₂)
//! ```
//!
//! The residual time of the last resolved shock is carried into the returned
//! snapshot rather than redrawn, so splitting a query into smaller deltas
//! consumes the random stream in exactly the same order.

use crate::error::{Result, SimError};
use crate::state::HiddenState;
use crate::transition::{resolve_transition, JumpModel};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, trace};

/// Consecutive zero-length waits tolerated before the clock is declared stalled.
pub const MAX_ZERO_WAIT_STREAK: usize = 10_000;

/// Counts consecutive zero-length waits while catching up.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ZeroWaitGuard {
    streak: usize,
}

impl ZeroWaitGuard {
    /// Records one resolved wait. Errors once the streak exceeds
    /// [`MAX_ZERO_WAIT_STREAK`].
    pub(crate) fn record(&mut self, wait: f64) -> Result<()> {
        if wait > 0.0 {
            self.streak = 0;
            return Ok(());
        }

        self.streak += 1;
        if self.streak > MAX_ZERO_WAIT_STREAK {
            return Err(SimError::Stalled(self.streak));
        }
        Ok(())
    }
}

/// Result of advancing a snapshot once.
pub struct Advance<M: JumpModel> {
    /// Observation of the state at the query horizon.
    pub observation: M::Observation,

    /// Snapshot at the query horizon.
    pub snapshot: HiddenState<M>,

    /// Number of shocks fired while catching up.
    pub events: usize,
}

impl<M: JumpModel> HiddenState<M> {
    /// Advances by `elapsed` time units, firing every shock that falls due.
    ///
    /// `self` is left untouched. The observation is drawn fresh on every
    /// call, even when no shock fired.
    pub fn advance<R: Rng>(&self, elapsed: f64, rng: &mut R) -> Result<Advance<M>> {
        if !(elapsed >= 0.0 && elapsed.is_finite()) {
            return Err(SimError::InvalidElapsed(elapsed));
        }

        let mut t = elapsed;
        let mut state = self.state.clone();
        let mut remaining = self.remaining;
        let mut pending = self.pending.clone();

        let mut events = 0;
        let mut guard = ZeroWaitGuard::default();

        while t >= remaining {
            t -= remaining;
            guard.record(remaining)?;

            state = pending.resolve(rng);
            let next = resolve_transition(self.model.as_ref(), &state, rng)?;
            remaining = next.wait;
            pending = next.next;
            events += 1;

            trace!(fired = events, horizon_left = t, "shock fired");
        }

        let observation = self.model.observe(&state, rng);
        let residual = remaining - t;

        debug!(elapsed, events, residual, "advanced hidden state");

        Ok(Advance {
            observation,
            snapshot: HiddenState {
                model: Arc::clone(&self.model),
                state,
                remaining: residual,
                pending,
            },
            events,
        })
    }

    /// Advances by `elapsed` and returns the observation with the new snapshot.
    pub fn next_observation<R: Rng>(
        &self,
        elapsed: f64,
        rng: &mut R,
    ) -> Result<(M::Observation, HiddenState<M>)> {
        let step = self.advance(elapsed, rng)?;
        Ok((step.observation, step.snapshot))
    }

    /// Folds [`next_observation`](Self::next_observation) over `deltas`.
    ///
    /// Each delta is measured from the previous query point. The output has
    /// one observation per delta, in order.
    pub fn next_observations<R: Rng>(
        &self,
        deltas: &[f64],
        rng: &mut R,
    ) -> Result<(Vec<M::Observation>, HiddenState<M>)> {
        let mut observations = Vec::with_capacity(deltas.len());
        let mut current = self.clone();

        for &dt in deltas {
            let (observation, next) = current.next_observation(dt, rng)?;
            observations.push(observation);
            current = next;
        }

        Ok((observations, current))
    }

    /// Like [`next_observations`](Self::next_observations) but keeps every
    /// intermediate snapshot and event count.
    pub fn trajectory<R: Rng>(&self, deltas: &[f64], rng: &mut R) -> Result<Vec<Advance<M>>> {
        let mut steps: Vec<Advance<M>> = Vec::with_capacity(deltas.len());

        for &dt in deltas {
            let step = match steps.last() {
                Some(prev) => prev.snapshot.advance(dt, rng)?,
                None => self.advance(dt, rng)?,
            };
            steps.push(step);
        }

        Ok(steps)
    }
}
