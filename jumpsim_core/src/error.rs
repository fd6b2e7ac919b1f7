//! Error types for the jumpsim engine.
//!
//! Every variant is a contract violation by the caller or by the model
//! definition. Nothing here is retried or recovered inside the engine.

use thiserror::Error;

/// Errors raised while resolving transitions or advancing a snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// The model returned no shocks for the current state.
    #[error("Transition set is empty")]
    EmptyTransitionSet,

    /// A shock carried a negative, NaN or infinite rate.
    #[error("Invalid rate {rate} for shock #{index}")]
    InvalidRate { index: usize, rate: f64 },

    /// The rates of a transition set do not sum to a positive finite value.
    #[error("Degenerate transition set: total rate {total} must be positive")]
    DegenerateRates { total: f64 },

    /// A snapshot was built with a negative (or NaN) time to the next shock.
    #[error("Time to next shock must be >= 0, got {0}")]
    NegativeRemaining(f64),

    /// An advancement was requested for a negative, NaN or infinite elapsed time.
    #[error("Elapsed time must be finite and >= 0, got {0}")]
    InvalidElapsed(f64),

    /// Too many consecutive shocks fired without any time passing.
    #[error("Clock stalled: {0} consecutive shocks fired with zero wait")]
    Stalled(usize),
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimError::InvalidRate { index: 2, rate: -1.0 };
        assert_eq!(err.to_string(), "Invalid rate -1 for shock #2");

        let err = SimError::InvalidElapsed(-0.5);
        assert_eq!(err.to_string(), "Elapsed time must be finite and >= 0, got -0.5");
    }
}
