//! jumpsim Scenario Harness
//!
//! Runs reference jump models long enough for their empirical averages to be
//! compared against closed-form stationary values. Every path draws from its
//! own seeded stream, so any failing run is reproducible from its seed.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     ScenarioRunner                       │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │ SimWorld (SimConfig + EntropySource)               │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │        │ path_rng(RunId)            │ models             │
//! │   ┌────▼──────┐               ┌─────▼───────────┐        │
//! │   │ ChaCha8   │──────────────►│ HiddenState<M>  │ ...    │
//! │   │ stream    │   advance     │ (jumpsim_core)  │        │
//! │   └───────────┘               └─────────────────┘        │
//! │                                     │ observations       │
//! │                               ┌─────▼───────────┐        │
//! │                               │ Tally vs theory │        │
//! │                               └─────────────────┘        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use jumpsim_sim::{ScenarioId, ScenarioRunner, SimConfig};
//!
//! let runner = ScenarioRunner::new(SimConfig::default().with_seed(7));
//! let result = runner.run(ScenarioId::FixedStep);
//! assert!(result.passed);
//! ```

mod error;
mod exporter;
pub mod models;
mod runner;
pub mod scenarios;
mod world;

pub use error::{ModelError, RunError};
pub use exporter::{TrajectoryExport, TrajectoryFrame};
pub use models::{BirthDeathQueue, Employment, EmploymentModel, NoisyEmployment};
pub use runner::{ScenarioResult, ScenarioRunner};
pub use scenarios::ScenarioId;
pub use world::{SimConfig, SimWorld};
