//! Scenario runner - checks simulated long-run averages against theory.

use crate::error::RunError;
use crate::exporter::{TrajectoryExport, TrajectoryFrame};
use crate::models::Employment;
use crate::scenarios::ScenarioId;
use crate::world::{SimConfig, SimWorld};

use jumpsim_core::{HiddenState, JumpModel};
use jumpsim_env::RunId;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether the empirical average matched theory
    pub passed: bool,

    /// Observations taken across all paths
    pub observations: u64,

    /// Shocks fired across all paths (not tracked by batched queries)
    pub events: Option<u64>,

    /// Simulated time across all paths, excluding burn-in
    pub simulated_time: f64,

    /// Empirical long-run average
    pub empirical: f64,

    /// Closed-form long-run average
    pub expected: f64,

    /// |empirical - expected| / |expected|
    pub relative_error: f64,

    /// Failure message if any
    pub failure_reason: Option<String>,
}

impl ScenarioResult {
    fn judged(scenario: ScenarioId, seed: u64, tally: &Tally, expected: f64, tolerance: f64) -> Self {
        let empirical = tally.mean();
        let relative_error = (empirical - expected).abs() / expected.abs();
        let passed = relative_error <= tolerance;

        Self {
            scenario,
            seed,
            passed,
            observations: tally.observations,
            events: tally.events,
            simulated_time: tally.simulated_time,
            empirical,
            expected,
            relative_error,
            failure_reason: if passed {
                None
            } else {
                Some(format!(
                    "relative error {:.2}% exceeds tolerance {:.2}% (empirical {:.4}, expected {:.4})",
                    relative_error * 100.0,
                    tolerance * 100.0,
                    empirical,
                    expected
                ))
            },
        }
    }

    fn aborted(scenario: ScenarioId, seed: u64, err: &RunError) -> Self {
        Self {
            scenario,
            seed,
            passed: false,
            observations: 0,
            events: None,
            simulated_time: 0.0,
            empirical: f64::NAN,
            expected: f64::NAN,
            relative_error: f64::NAN,
            failure_reason: Some(err.to_string()),
        }
    }
}

/// Weighted running average of observation values.
#[derive(Debug, Clone, Default)]
struct Tally {
    observations: u64,
    weighted_sum: f64,
    total_weight: f64,
    events: Option<u64>,
    simulated_time: f64,
}

impl Tally {
    fn record(&mut self, value: f64, weight: f64) {
        self.observations += 1;
        self.weighted_sum += value * weight;
        self.total_weight += weight;
    }

    fn add_events(&mut self, events: usize) {
        *self.events.get_or_insert(0) += events as u64;
    }

    fn mean(&self) -> f64 {
        self.weighted_sum / self.total_weight
    }
}

fn employed(observation: &bool) -> f64 {
    if *observation {
        1.0
    } else {
        0.0
    }
}

fn occupancy(n: &u32) -> f64 {
    *n as f64
}

fn idle(occupancy: &u32) -> f64 {
    if *occupancy == 0 {
        1.0
    } else {
        0.0
    }
}

/// Runs validation scenarios.
pub struct ScenarioRunner {
    world: SimWorld,
}

impl ScenarioRunner {
    /// Creates a runner with seeded entropy.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: SimWorld::new(config),
        }
    }

    /// Creates a runner over an existing world.
    pub fn from_world(world: SimWorld) -> Self {
        Self { world }
    }

    /// Returns the world this runner samples from.
    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        let seed = self.world.seed();
        info!("Starting scenario: {} (seed={})", scenario.name(), seed);

        match self.evaluate(scenario) {
            Ok((tally, expected)) => {
                let result = ScenarioResult::judged(
                    scenario,
                    seed,
                    &tally,
                    expected,
                    self.world.config.tolerance,
                );
                info!(
                    "{} complete: empirical={:.4} expected={:.4} error={:.2}% over {} observations",
                    scenario.name(),
                    result.empirical,
                    result.expected,
                    result.relative_error * 100.0,
                    result.observations
                );
                result
            }
            Err(e) => {
                error!("{} aborted: {}", scenario.name(), e);
                ScenarioResult::aborted(scenario, seed, &e)
            }
        }
    }

    fn evaluate(&self, scenario: ScenarioId) -> Result<(Tally, f64), RunError> {
        self.world.config.validate()?;

        match scenario {
            ScenarioId::FixedStep => {
                let model = self.world.employment_model()?;
                let tally = self.fixed_steps(model, Employment::Unemployed, employed)?;
                Ok((tally, model.stationary_employment()))
            }
            ScenarioId::RandomBatches => {
                let model = self.world.employment_model()?;
                let tally = self.random_batches(model, Employment::Unemployed, employed)?;
                Ok((tally, model.stationary_employment()))
            }
            ScenarioId::TimeWeighted => {
                let model = self.world.employment_model()?;
                let tally = self.time_weighted(model, Employment::Unemployed, employed)?;
                Ok((tally, model.stationary_employment()))
            }
            ScenarioId::NoisyReporting => {
                let model = self.world.noisy_model()?;
                let tally = self.fixed_steps(model, Employment::Unemployed, employed)?;
                Ok((tally, model.expected_reported_employment()))
            }
            ScenarioId::QueueOccupancy => {
                let model = self.world.queue_model()?;
                let tally = self.fixed_steps(model, 0, occupancy)?;
                Ok((tally, model.stationary_mean()))
            }
            ScenarioId::QueueIdle => {
                let model = self.world.queue_model()?;
                let tally = self.fixed_steps(model, 0, idle)?;
                Ok((tally, model.stationary_idle()))
            }
        }
    }

    /// Starts a path at `initial` and discards the burn-in period.
    fn start_path<M: JumpModel>(
        &self,
        model: &Arc<M>,
        initial: M::State,
        rng: &mut ChaCha8Rng,
    ) -> Result<HiddenState<M>, RunError> {
        let hs = HiddenState::new(Arc::clone(model), initial, rng)?;
        let warm = hs.advance(self.world.config.burn_in, rng)?;
        Ok(warm.snapshot)
    }

    fn gaps(&self) -> Result<Exp<f64>, RunError> {
        Exp::new(1.0 / self.world.config.step)
            .map_err(|e| RunError::config(format!("step {}: {}", self.world.config.step, e)))
    }

    /// One `next_observation`-style advance per fixed step.
    fn fixed_steps<M, F>(&self, model: M, initial: M::State, value: F) -> Result<Tally, RunError>
    where
        M: JumpModel,
        F: Fn(&M::Observation) -> f64,
    {
        let config = &self.world.config;
        let model = Arc::new(model);
        let steps = (config.duration / config.step).ceil() as u64;
        let mut tally = Tally::default();

        for path in self.world.paths() {
            let mut rng = self.world.path_rng(path);
            let mut hs = self.start_path(&model, initial.clone(), &mut rng)?;

            for _ in 0..steps {
                let step = hs.advance(config.step, &mut rng)?;
                tally.record(value(&step.observation), 1.0);
                tally.add_events(step.events);
                hs = step.snapshot;
            }

            tally.simulated_time += steps as f64 * config.step;
            debug!("  {} done: {} observations", path, steps);
        }

        Ok(tally)
    }

    /// Batched `next_observations` calls with exponential gaps.
    fn random_batches<M, F>(&self, model: M, initial: M::State, value: F) -> Result<Tally, RunError>
    where
        M: JumpModel,
        F: Fn(&M::Observation) -> f64,
    {
        let config = &self.world.config;
        let model = Arc::new(model);
        let gaps = self.gaps()?;
        let mut tally = Tally::default();

        for path in self.world.paths() {
            let mut rng = self.world.path_rng(path);
            let mut hs = self.start_path(&model, initial.clone(), &mut rng)?;
            let mut elapsed = 0.0;

            while elapsed < config.duration {
                let deltas: Vec<f64> = (0..config.batch_size)
                    .map(|_| gaps.sample(&mut rng))
                    .collect();

                let (observations, next) = hs.next_observations(&deltas, &mut rng)?;
                for observation in &observations {
                    tally.record(value(observation), 1.0);
                }

                elapsed += deltas.iter().sum::<f64>();
                hs = next;
            }

            tally.simulated_time += elapsed;
            debug!("  {} done: {:.1} time units", path, elapsed);
        }

        Ok(tally)
    }

    /// Batched trajectories with each observation weighted by its delta.
    fn time_weighted<M, F>(&self, model: M, initial: M::State, value: F) -> Result<Tally, RunError>
    where
        M: JumpModel,
        F: Fn(&M::Observation) -> f64,
    {
        let config = &self.world.config;
        let model = Arc::new(model);
        let gaps = self.gaps()?;
        let mut tally = Tally::default();

        for path in self.world.paths() {
            let mut rng = self.world.path_rng(path);
            let mut hs = self.start_path(&model, initial.clone(), &mut rng)?;
            let mut elapsed = 0.0;

            while elapsed < config.duration {
                let deltas: Vec<f64> = (0..config.batch_size)
                    .map(|_| gaps.sample(&mut rng))
                    .collect();

                let mut steps = hs.trajectory(&deltas, &mut rng)?;
                for (step, dt) in steps.iter().zip(&deltas) {
                    tally.record(value(&step.observation), *dt);
                    tally.add_events(step.events);
                }

                elapsed += deltas.iter().sum::<f64>();
                match steps.pop() {
                    Some(last) => hs = last.snapshot,
                    None => break,
                }
            }

            tally.simulated_time += elapsed;
            debug!("  {} done: {:.1} time units", path, elapsed);
        }

        Ok(tally)
    }

    /// Samples the first path of `scenario` for export.
    ///
    /// Queries follow the scenario's pattern: exponential gaps for the
    /// batched scenarios, the fixed step otherwise. Sampling stops once
    /// `duration` is covered or `max_frames` frames are taken.
    pub fn export_trajectory(
        &self,
        scenario: ScenarioId,
        max_frames: usize,
    ) -> Result<TrajectoryExport, RunError> {
        self.world.config.validate()?;

        let random_gaps = matches!(scenario, ScenarioId::RandomBatches | ScenarioId::TimeWeighted);
        let frames = match scenario {
            ScenarioId::FixedStep | ScenarioId::RandomBatches | ScenarioId::TimeWeighted => self
                .sample_frames(
                    self.world.employment_model()?,
                    Employment::Unemployed,
                    employed,
                    max_frames,
                    random_gaps,
                )?,
            ScenarioId::NoisyReporting => self.sample_frames(
                self.world.noisy_model()?,
                Employment::Unemployed,
                employed,
                max_frames,
                false,
            )?,
            ScenarioId::QueueOccupancy | ScenarioId::QueueIdle => {
                self.sample_frames(self.world.queue_model()?, 0, occupancy, max_frames, false)?
            }
        };

        let mut export = TrajectoryExport::new(scenario.name(), self.world.seed(), RunId(0));
        for frame in frames {
            export.add_frame(frame);
        }
        Ok(export)
    }

    /// Query offsets covering `duration`, at most `max_frames` of them.
    fn export_deltas(
        &self,
        max_frames: usize,
        random_gaps: bool,
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec<f64>, RunError> {
        let config = &self.world.config;

        if !random_gaps {
            let count = ((config.duration / config.step).ceil() as usize).min(max_frames);
            return Ok(vec![config.step; count]);
        }

        let gaps = self.gaps()?;
        let mut deltas = Vec::new();
        let mut covered = 0.0;
        while covered < config.duration && deltas.len() < max_frames {
            let dt = gaps.sample(rng);
            covered += dt;
            deltas.push(dt);
        }
        Ok(deltas)
    }

    fn sample_frames<M, F>(
        &self,
        model: M,
        initial: M::State,
        value: F,
        max_frames: usize,
        random_gaps: bool,
    ) -> Result<Vec<TrajectoryFrame>, RunError>
    where
        M: JumpModel,
        F: Fn(&M::Observation) -> f64,
    {
        let model = Arc::new(model);
        let mut rng = self.world.path_rng(RunId(0));
        let hs = self.start_path(&model, initial, &mut rng)?;

        let deltas = self.export_deltas(max_frames, random_gaps, &mut rng)?;
        let steps = hs.trajectory(&deltas, &mut rng)?;

        let mut time = 0.0_f64;
        Ok(steps
            .iter()
            .zip(&deltas)
            .map(|(step, dt)| {
                time += *dt;
                TrajectoryFrame {
                    time,
                    observation: value(&step.observation),
                    events: step.events,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_scenarios_pass_for_fixed_seed() {
        let runner = ScenarioRunner::new(SimConfig::default());

        for scenario in ScenarioId::all() {
            let result = runner.run(scenario);
            assert!(
                result.passed,
                "{} failed: {:?}",
                scenario,
                result.failure_reason
            );
            assert!(result.observations > 0);
            assert!(result.simulated_time >= runner.world().config.duration);
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = SimConfig::default().with_duration(200.0).with_paths(2);
        let a = ScenarioRunner::new(config.clone()).run(ScenarioId::RandomBatches);
        let b = ScenarioRunner::new(config).run(ScenarioId::RandomBatches);

        assert_eq!(a.empirical, b.empirical);
        assert_eq!(a.observations, b.observations);
    }

    #[test]
    fn test_event_counts_reported_where_tracked() {
        let config = SimConfig::default().with_duration(100.0).with_paths(1);
        let runner = ScenarioRunner::new(config);

        assert!(runner.run(ScenarioId::FixedStep).events.unwrap() > 0);
        assert!(runner.run(ScenarioId::TimeWeighted).events.unwrap() > 0);
        assert!(runner.run(ScenarioId::RandomBatches).events.is_none());
    }

    #[test]
    fn test_tight_tolerance_fails_with_reason() {
        let config = SimConfig::default()
            .with_duration(20.0)
            .with_paths(1)
            .with_tolerance(1e-12);
        let result = ScenarioRunner::new(config).run(ScenarioId::FixedStep);

        assert!(!result.passed);
        assert!(result.failure_reason.unwrap().contains("exceeds tolerance"));
    }

    #[test]
    fn test_invalid_config_aborts() {
        let config = SimConfig {
            job_finding: 0.0,
            ..Default::default()
        };
        let result = ScenarioRunner::new(config).run(ScenarioId::FixedStep);

        assert!(!result.passed);
        assert!(result.failure_reason.unwrap().starts_with("Model error"));
    }

    #[test]
    fn test_export_trajectory() {
        let config = SimConfig::default().with_duration(10.0).with_step(0.5);
        let runner = ScenarioRunner::new(config);

        let export = runner.export_trajectory(ScenarioId::QueueOccupancy, 1_000).unwrap();
        assert_eq!(export.frames.len(), 20);
        assert_eq!(export.scenario, "queue_occupancy");
        assert!((export.duration - 10.0).abs() < 1e-9);
        let capacity = runner.world().config.capacity as f64;
        assert!(export.frames.iter().all(|f| f.observation >= 0.0 && f.observation <= capacity));

        let capped = runner.export_trajectory(ScenarioId::FixedStep, 5).unwrap();
        assert_eq!(capped.frames.len(), 5);
    }

    #[test]
    fn test_batched_scenarios_export_exponential_gaps() {
        let config = SimConfig::default().with_duration(50.0).with_step(0.5);
        let runner = ScenarioRunner::new(config);

        for scenario in [ScenarioId::RandomBatches, ScenarioId::TimeWeighted] {
            let export = runner.export_trajectory(scenario, 10_000).unwrap();
            let times: Vec<f64> = export.frames.iter().map(|f| f.time).collect();
            let gaps: Vec<f64> = times.windows(2).map(|w| w[1] - w[0]).collect();

            assert!(times[0] > 0.0);
            assert!(gaps.iter().all(|&g| g > 0.0));
            assert!(gaps.iter().any(|&g| (g - 0.5).abs() > 1e-6));
            assert!(export.duration >= 50.0);
            assert!(export.duration - gaps.last().unwrap() < 50.0);
        }

        let capped = runner.export_trajectory(ScenarioId::RandomBatches, 3).unwrap();
        assert_eq!(capped.frames.len(), 3);
    }

    #[test]
    fn test_queue_occupancy_matches_stationary_mean() {
        let runner = ScenarioRunner::new(SimConfig::default().with_seed(7));
        let result = runner.run(ScenarioId::QueueOccupancy);
        let expected = runner.world().queue_model().unwrap().stationary_mean();

        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.expected, expected);
        assert!(result.events.unwrap() > 0);
    }
}
