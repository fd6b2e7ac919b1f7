//! Shocks, transition sets and the transition resolver.
//!
//! A model describes, for every hidden state, the shocks that compete to move
//! it. Each shock pairs a rate with a [`NextState`] producer that yields the
//! state the process lands in when that shock wins the race.

use crate::clock::competing_poisson;
use crate::error::{Result, SimError};
use rand::{Rng, RngCore};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Shared, stochastic next-state generator.
///
/// Receives the run's random source so that random transitions draw from the
/// same stream as the clocks.
pub type StateGenerator<S> = Arc<dyn Fn(&mut dyn RngCore) -> S + Send + Sync>;

/// Producer of the state reached when a shock fires.
pub enum NextState<S> {
    /// Always lands in the given state.
    Constant(S),

    /// Draws the landing state at the moment the shock fires.
    Generator(StateGenerator<S>),
}

impl<S> NextState<S> {
    /// Creates a deterministic producer.
    pub fn constant(state: S) -> Self {
        Self::Constant(state)
    }

    /// Creates a stochastic producer from a closure.
    pub fn generator<F>(f: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> S + Send + Sync + 'static,
    {
        Self::Generator(Arc::new(f))
    }

    /// Returns true if resolving this producer consumes randomness.
    pub fn is_stochastic(&self) -> bool {
        matches!(self, Self::Generator(_))
    }
}

impl<S: Clone> NextState<S> {
    /// Materializes the next state.
    ///
    /// Constants are cloned; generators are invoked afresh on every call.
    pub fn resolve<R: RngCore>(&self, rng: &mut R) -> S {
        match self {
            Self::Constant(state) => state.clone(),
            Self::Generator(f) => f(rng),
        }
    }
}

impl<S: Clone> Clone for NextState<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Constant(state) => Self::Constant(state.clone()),
            Self::Generator(f) => Self::Generator(Arc::clone(f)),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for NextState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(state) => f.debug_tuple("Constant").field(state).finish(),
            Self::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// One candidate transition: an exponential clock and where it leads.
#[derive(Debug, Clone)]
pub struct Shock<S> {
    /// Poisson intensity of the shock (must be >= 0).
    pub rate: f64,

    /// Producer of the post-shock state.
    pub next: NextState<S>,
}

impl<S> Shock<S> {
    /// Creates a shock from a rate and a producer.
    pub fn new(rate: f64, next: NextState<S>) -> Self {
        Self { rate, next }
    }

    /// Creates a shock that always lands in `state`.
    pub fn to(rate: f64, state: S) -> Self {
        Self::new(rate, NextState::Constant(state))
    }

    /// Creates a shock whose landing state is drawn by `f` when it fires.
    pub fn random<F>(rate: f64, f: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> S + Send + Sync + 'static,
    {
        Self::new(rate, NextState::generator(f))
    }
}

/// The user-supplied description of a hidden-state jump process.
///
/// Implementations are treated as immutable parameters; every snapshot
/// derived from a model shares it read-only.
pub trait JumpModel {
    /// Hidden state of the process.
    type State: Clone;

    /// Value reported to the caller in place of the state.
    type Observation;

    /// Returns the transition set for `state`.
    ///
    /// Must be non-empty with a positive total rate whenever it is called.
    fn shocks(&self, state: &Self::State) -> Vec<Shock<Self::State>>;

    /// Observes `state`. May be random; called once per advancement.
    fn observe<R: Rng + ?Sized>(&self, state: &Self::State, rng: &mut R) -> Self::Observation;
}

/// The next scheduled shock of a state: how long until it fires and what it
/// produces.
#[derive(Debug, Clone)]
pub struct PendingShock<S> {
    /// Time until the shock fires.
    pub wait: f64,

    /// Producer invoked when it fires.
    pub next: NextState<S>,
}

/// Asks the model for the transition set of `state` and races it.
pub fn resolve_transition<M, R>(
    model: &M,
    state: &M::State,
    rng: &mut R,
) -> Result<PendingShock<M::State>>
where
    M: JumpModel + ?Sized,
    R: Rng,
{
    let mut shocks = model.shocks(state);
    if shocks.is_empty() {
        return Err(SimError::EmptyTransitionSet);
    }

    let rates: Vec<f64> = shocks.iter().map(|shock| shock.rate).collect();
    let draw = competing_poisson(&rates, rng)?;

    trace!(
        candidates = shocks.len(),
        winner = draw.winner,
        wait = draw.wait,
        "resolved transition"
    );

    let winner = shocks.swap_remove(draw.winner);
    Ok(PendingShock {
        wait: draw.wait,
        next: winner.next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Three-state ring: 0 -> 1 -> 2 -> 0, plus a random reset from anywhere.
    struct Ring {
        reset_rate: f64,
    }

    impl JumpModel for Ring {
        type State = u8;
        type Observation = u8;

        fn shocks(&self, state: &u8) -> Vec<Shock<u8>> {
            vec![
                Shock::to(1.0, (state + 1) % 3),
                Shock::random(self.reset_rate, |rng| rng.gen_range(0..3)),
            ]
        }

        fn observe<R: Rng + ?Sized>(&self, state: &u8, _rng: &mut R) -> u8 {
            *state
        }
    }

    struct Absorbing;

    impl JumpModel for Absorbing {
        type State = ();
        type Observation = ();

        fn shocks(&self, _state: &()) -> Vec<Shock<()>> {
            Vec::new()
        }

        fn observe<R: Rng + ?Sized>(&self, _state: &(), _rng: &mut R) {}
    }

    #[test]
    fn test_constant_producer_resolves_to_value() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let next = NextState::constant(7u32);

        assert!(!next.is_stochastic());
        assert_eq!(next.resolve(&mut rng), 7);
        assert_eq!(next.resolve(&mut rng), 7);
    }

    #[test]
    fn test_generator_producer_is_called_each_time() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let next = NextState::generator(|rng| rng.gen_range(0..1_000_000u32));

        assert!(next.is_stochastic());
        let draws: Vec<u32> = (0..5).map(|_| next.resolve(&mut rng)).collect();
        assert!(draws.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_resolve_picks_only_positive_rate_shocks() {
        let model = Ring { reset_rate: 0.0 };
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..200 {
            let pending = resolve_transition(&model, &2, &mut rng).unwrap();
            assert!(pending.wait >= 0.0);
            assert!(!pending.next.is_stochastic());
            assert_eq!(pending.next.resolve(&mut rng), 0);
        }
    }

    #[test]
    fn test_resolve_can_pick_stochastic_shock() {
        let model = Ring { reset_rate: 1.0 };
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let stochastic = (0..200)
            .filter(|_| {
                resolve_transition(&model, &0, &mut rng)
                    .unwrap()
                    .next
                    .is_stochastic()
            })
            .count();

        assert!(stochastic > 50 && stochastic < 150);
    }

    #[test]
    fn test_empty_transition_set_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = resolve_transition(&Absorbing, &(), &mut rng).unwrap_err();
        assert_eq!(err, SimError::EmptyTransitionSet);
    }

    #[test]
    fn test_debug_hides_generator() {
        let next: NextState<u8> = NextState::generator(|_| 0);
        assert_eq!(format!("{:?}", next), "Generator(..)");
        assert_eq!(format!("{:?}", NextState::constant(3u8)), "Constant(3)");
    }
}
