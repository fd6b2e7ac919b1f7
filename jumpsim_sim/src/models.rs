//! Reference models with known long-run behaviour.
//!
//! Each model has a closed-form stationary quantity, so the scenario runner
//! can check simulated averages against theory.

use crate::error::ModelError;
use jumpsim_core::{JumpModel, Shock};
use rand::Rng;
use serde::{Deserialize, Serialize};

fn positive_rate(name: &'static str, value: f64) -> Result<f64, ModelError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::InvalidRate { name, value })
    }
}

fn probability(name: &'static str, value: f64) -> Result<f64, ModelError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ModelError::InvalidProbability { name, value })
    }
}

/// Labour-market status of a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Employment {
    Employed,
    Unemployed,
}

impl Employment {
    /// Returns true for [`Employment::Employed`].
    pub fn is_employed(self) -> bool {
        self == Employment::Employed
    }
}

/// Two-state worker: unemployed workers find jobs at rate `job_finding`,
/// employed workers lose them at rate `separation`.
///
/// Observed without noise as "is employed".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmploymentModel {
    job_finding: f64,
    separation: f64,
}

impl EmploymentModel {
    /// Creates the model; both rates must be positive.
    pub fn new(job_finding: f64, separation: f64) -> Result<Self, ModelError> {
        Ok(Self {
            job_finding: positive_rate("job_finding", job_finding)?,
            separation: positive_rate("separation", separation)?,
        })
    }

    /// Job-finding rate λ.
    pub fn job_finding(&self) -> f64 {
        self.job_finding
    }

    /// Separation rate σ.
    pub fn separation(&self) -> f64 {
        self.separation
    }

    /// Long-run share of time spent employed: λ / (λ + σ).
    pub fn stationary_employment(&self) -> f64 {
        self.job_finding / (self.job_finding + self.separation)
    }
}

impl JumpModel for EmploymentModel {
    type State = Employment;
    type Observation = bool;

    fn shocks(&self, state: &Employment) -> Vec<Shock<Employment>> {
        match state {
            Employment::Employed => vec![Shock::to(self.separation, Employment::Unemployed)],
            Employment::Unemployed => vec![Shock::to(self.job_finding, Employment::Employed)],
        }
    }

    fn observe<R: Rng + ?Sized>(&self, state: &Employment, _rng: &mut R) -> bool {
        state.is_employed()
    }
}

/// [`EmploymentModel`] seen through a survey that misreports the status
/// with probability `misreport`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoisyEmployment {
    base: EmploymentModel,
    misreport: f64,
}

impl NoisyEmployment {
    pub fn new(base: EmploymentModel, misreport: f64) -> Result<Self, ModelError> {
        Ok(Self {
            base,
            misreport: probability("misreport", misreport)?,
        })
    }

    /// Long-run share of "employed" reports: p(1 - e) + (1 - p)e.
    pub fn expected_reported_employment(&self) -> f64 {
        let p = self.base.stationary_employment();
        p * (1.0 - self.misreport) + (1.0 - p) * self.misreport
    }
}

impl JumpModel for NoisyEmployment {
    type State = Employment;
    type Observation = bool;

    fn shocks(&self, state: &Employment) -> Vec<Shock<Employment>> {
        self.base.shocks(state)
    }

    fn observe<R: Rng + ?Sized>(&self, state: &Employment, rng: &mut R) -> bool {
        let truth = state.is_employed();
        if rng.gen_bool(self.misreport) {
            !truth
        } else {
            truth
        }
    }
}

/// M/M/1/K queue: arrivals at rate `arrival` while below `capacity`,
/// departures at rate `service` while non-empty. Observed as the occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirthDeathQueue {
    arrival: f64,
    service: f64,
    capacity: u32,
    max_batch: u32,
}

impl BirthDeathQueue {
    pub fn new(arrival: f64, service: f64, capacity: u32) -> Result<Self, ModelError> {
        if capacity == 0 {
            return Err(ModelError::ZeroCapacity);
        }

        Ok(Self {
            arrival: positive_rate("arrival", arrival)?,
            service: positive_rate("service", service)?,
            capacity,
            max_batch: 1,
        })
    }

    /// Arrivals bring a uniform batch of `1..=max_batch` customers, capped at
    /// the capacity.
    ///
    /// The closed forms below only hold for `max_batch == 1`.
    pub fn with_batches(mut self, max_batch: u32) -> Result<Self, ModelError> {
        if max_batch == 0 {
            return Err(ModelError::ZeroBatch);
        }
        self.max_batch = max_batch;
        Ok(self)
    }

    /// Load ρ = arrival / service.
    pub fn load(&self) -> f64 {
        self.arrival / self.service
    }

    /// Stationary distribution π_n ∝ ρⁿ over 0..=capacity.
    pub fn stationary_distribution(&self) -> Vec<f64> {
        let rho = self.load();
        let weights: Vec<f64> = (0..=self.capacity).map(|n| rho.powi(n as i32)).collect();
        let total: f64 = weights.iter().sum();
        weights.into_iter().map(|w| w / total).collect()
    }

    /// Long-run probability of an empty queue.
    pub fn stationary_idle(&self) -> f64 {
        self.stationary_distribution()[0]
    }

    /// Long-run mean occupancy.
    pub fn stationary_mean(&self) -> f64 {
        self.stationary_distribution()
            .iter()
            .enumerate()
            .map(|(n, p)| n as f64 * p)
            .sum()
    }
}

impl JumpModel for BirthDeathQueue {
    type State = u32;
    type Observation = u32;

    fn shocks(&self, occupancy: &u32) -> Vec<Shock<u32>> {
        let n = *occupancy;
        let mut shocks = Vec::with_capacity(2);

        if n < self.capacity {
            if self.max_batch == 1 {
                shocks.push(Shock::to(self.arrival, n + 1));
            } else {
                let (capacity, max_batch) = (self.capacity, self.max_batch);
                shocks.push(Shock::random(self.arrival, move |rng| {
                    (n + rng.gen_range(1..=max_batch)).min(capacity)
                }));
            }
        }
        if n > 0 {
            shocks.push(Shock::to(self.service, n - 1));
        }

        shocks
    }

    fn observe<R: Rng + ?Sized>(&self, occupancy: &u32, _rng: &mut R) -> u32 {
        *occupancy
    }
}
