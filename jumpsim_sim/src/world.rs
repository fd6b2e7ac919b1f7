//! SimWorld - configuration and per-path entropy for scenario runs.

use crate::error::RunError;
use crate::models::{BirthDeathQueue, EmploymentModel, NoisyEmployment};

use jumpsim_env::{EntropySource, RunId, SeededEntropy};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for a scenario run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Simulated time per path (after burn-in)
    pub duration: f64,

    /// Simulated time discarded at the start of each path
    pub burn_in: f64,

    /// Query spacing: fixed step, or mean of the random steps
    pub step: f64,

    /// Deltas per `next_observations` call in batched scenarios
    pub batch_size: usize,

    /// Independent sample paths per scenario
    pub paths: usize,

    /// Maximum relative error against the closed form
    pub tolerance: f64,

    /// Job-finding rate λ of the employment model
    pub job_finding: f64,

    /// Separation rate σ of the employment model
    pub separation: f64,

    /// Misreporting probability of the noisy survey
    pub misreport: f64,

    /// Queue arrival rate
    pub arrival: f64,

    /// Queue service rate
    pub service: f64,

    /// Queue capacity
    pub capacity: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            duration: 5_000.0,
            burn_in: 50.0,
            step: 0.1,
            batch_size: 100,
            paths: 4,
            tolerance: 0.03,
            job_finding: 0.5,
            separation: 0.1,
            misreport: 0.1,
            arrival: 5.0,
            service: 20.0,
            capacity: 6,
        }
    }
}

impl SimConfig {
    /// Sets the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the simulated time per path.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the query step.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Sets the number of paths per scenario.
    pub fn with_paths(mut self, paths: usize) -> Self {
        self.paths = paths;
        self
    }

    /// Sets the pass/fail tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Checks the harness parameters (model parameters are checked by the
    /// model constructors).
    pub fn validate(&self) -> Result<(), RunError> {
        if !(self.duration > 0.0 && self.duration.is_finite()) {
            return Err(RunError::config(format!(
                "duration must be positive, got {}",
                self.duration
            )));
        }
        if !(self.burn_in >= 0.0 && self.burn_in.is_finite()) {
            return Err(RunError::config(format!(
                "burn_in must be >= 0, got {}",
                self.burn_in
            )));
        }
        if !(self.step > 0.0 && self.step.is_finite()) {
            return Err(RunError::config(format!(
                "step must be positive, got {}",
                self.step
            )));
        }
        if self.batch_size == 0 {
            return Err(RunError::config("batch_size must be at least 1"));
        }
        if self.paths == 0 {
            return Err(RunError::config("paths must be at least 1"));
        }
        if !(self.tolerance > 0.0) {
            return Err(RunError::config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// The SimWorld - configuration plus the entropy that feeds every path.
#[derive(Clone)]
pub struct SimWorld {
    /// Configuration
    pub config: SimConfig,

    /// Source of one random stream per path
    entropy: Arc<dyn EntropySource>,
}

impl SimWorld {
    /// Creates a world whose paths are seeded from `config.seed`.
    pub fn new(config: SimConfig) -> Self {
        let entropy = Arc::new(SeededEntropy::new(config.seed));
        Self { config, entropy }
    }

    /// Creates a world with an explicit entropy source.
    pub fn with_entropy(config: SimConfig, entropy: Arc<dyn EntropySource>) -> Self {
        Self { config, entropy }
    }

    /// Returns the master seed (0 when unseeded).
    pub fn seed(&self) -> u64 {
        self.entropy.seed()
    }

    /// Returns the random stream of one path.
    pub fn path_rng(&self, path: RunId) -> ChaCha8Rng {
        self.entropy.stream(path)
    }

    /// Returns the ids of all configured paths.
    pub fn paths(&self) -> impl Iterator<Item = RunId> {
        std::iter::successors(Some(RunId(0)), |id| Some(id.next())).take(self.config.paths)
    }

    /// The employment model described by the configuration.
    pub fn employment_model(&self) -> Result<EmploymentModel, RunError> {
        Ok(EmploymentModel::new(
            self.config.job_finding,
            self.config.separation,
        )?)
    }

    /// The noisy-survey model described by the configuration.
    pub fn noisy_model(&self) -> Result<NoisyEmployment, RunError> {
        Ok(NoisyEmployment::new(
            self.employment_model()?,
            self.config.misreport,
        )?)
    }

    /// The queue model described by the configuration.
    pub fn queue_model(&self) -> Result<BirthDeathQueue, RunError> {
        Ok(BirthDeathQueue::new(
            self.config.arrival,
            self.config.service,
            self.config.capacity,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jumpsim_env::OsEntropy;
    use rand::Rng;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimConfig::default().with_step(0.0);
        assert!(matches!(config.validate(), Err(RunError::InvalidConfig(_))));

        let config = SimConfig::default().with_paths(0);
        assert!(config.validate().is_err());

        let config = SimConfig::default().with_duration(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_paths_are_numbered() {
        let world = SimWorld::new(SimConfig::default().with_paths(3));
        let ids: Vec<RunId> = world.paths().collect();
        assert_eq!(ids, vec![RunId(0), RunId(1), RunId(2)]);
    }

    #[test]
    fn test_sim_world_determinism() {
        let world1 = SimWorld::new(SimConfig::default().with_seed(7));
        let world2 = SimWorld::new(SimConfig::default().with_seed(7));

        // Same seed = same path streams
        let a: u64 = world1.path_rng(RunId(1)).gen();
        let b: u64 = world2.path_rng(RunId(1)).gen();
        assert_eq!(a, b);
        assert_eq!(world1.seed(), 7);
    }

    #[test]
    fn test_unseeded_world() {
        let world = SimWorld::with_entropy(SimConfig::default(), Arc::new(OsEntropy::new()));
        assert_eq!(world.seed(), 0);
    }

    #[test]
    fn test_models_follow_config() {
        let world = SimWorld::new(SimConfig {
            separation: -1.0,
            ..Default::default()
        });
        assert!(matches!(world.employment_model(), Err(RunError::Model(_))));
        assert!(world.queue_model().is_ok());
    }
}
