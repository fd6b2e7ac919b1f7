//! Error types for the scenario harness.

use jumpsim_core::SimError;
use thiserror::Error;

/// Invalid parameters for one of the reference models.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A rate was zero, negative, NaN or infinite.
    #[error("Rate '{name}' must be positive and finite, got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    /// A probability fell outside [0, 1].
    #[error("Probability '{name}' must lie in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    /// A queue was configured without room for a single customer.
    #[error("Queue capacity must be at least 1")]
    ZeroCapacity,

    /// Arrival batches must bring at least one customer.
    #[error("Arrival batch size must be at least 1")]
    ZeroBatch,
}

/// Errors that abort a scenario run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The harness configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A reference model rejected its parameters.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// The engine reported a contract violation.
    #[error("Engine error: {0}")]
    Engine(#[from] SimError),

    /// Writing an export file failed.
    #[error("Export error: {0}")]
    Export(String),
}

impl RunError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
