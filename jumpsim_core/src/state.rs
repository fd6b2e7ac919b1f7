//! Immutable hidden-state snapshots.
//!
//! A [`HiddenState`] captures everything needed to resume a simulation: the
//! shared model, the current state, the time left until the next shock and the
//! producer that shock will invoke. Snapshots are never edited in place; the
//! advancement loop in [`crate::advance`] always builds a new one.

use crate::error::{Result, SimError};
use crate::transition::{resolve_transition, JumpModel, NextState};
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// Snapshot of a hidden-state jump process at one instant.
pub struct HiddenState<M: JumpModel> {
    pub(crate) model: Arc<M>,
    pub(crate) state: M::State,
    pub(crate) remaining: f64,
    pub(crate) pending: NextState<M::State>,
}

impl<M: JumpModel> HiddenState<M> {
    /// Builds a snapshot from all of its parts.
    ///
    /// Used to resume a simulation at an arbitrary point. `remaining` is the
    /// time until `pending` fires and must be `>= 0` (infinity means the shock
    /// never fires).
    pub fn with_pending(
        model: Arc<M>,
        state: M::State,
        remaining: f64,
        pending: NextState<M::State>,
    ) -> Result<Self> {
        if !(remaining >= 0.0) {
            return Err(SimError::NegativeRemaining(remaining));
        }

        Ok(Self {
            model,
            state,
            remaining,
            pending,
        })
    }

    /// Builds a snapshot from a model and a state, scheduling the first shock.
    pub fn new<R: Rng>(model: Arc<M>, state: M::State, rng: &mut R) -> Result<Self> {
        let first = resolve_transition(model.as_ref(), &state, rng)?;
        Self::with_pending(model, state, first.wait, first.next)
    }

    /// The shared model.
    pub fn model(&self) -> &Arc<M> {
        &self.model
    }

    /// The hidden state at this instant.
    pub fn state(&self) -> &M::State {
        &self.state
    }

    /// Time until the pending shock fires.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Producer the pending shock will invoke.
    pub fn pending(&self) -> &NextState<M::State> {
        &self.pending
    }
}

impl<M: JumpModel> Clone for HiddenState<M> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            state: self.state.clone(),
            remaining: self.remaining,
            pending: self.pending.clone(),
        }
    }
}

impl<M> fmt::Debug for HiddenState<M>
where
    M: JumpModel,
    M::State: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HiddenState")
            .field("state", &self.state)
            .field("remaining", &self.remaining)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
