//! Error types for simulation runs.

use thiserror::Error;

use crate::evaluator::EvaluatorError;

/// Errors from grid-search and Monte Carlo runs.
///
/// Each variant is fatal to the run that raised it and surfaces to the host
/// as a single terminal error notification. Recoverable conditions (the
/// evaluator's sentinel result, a per-iteration Monte Carlo failure) are not
/// errors and are handled inside the loops.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Fewer historical bars than the run requires.
    #[error("insufficient data: {message}")]
    InsufficientData {
        /// What was missing.
        message: String,
    },

    /// Strategy tag not recognized by this engine.
    #[error("unsupported strategy: {strategy}")]
    UnsupportedStrategy {
        /// The unrecognized strategy tag.
        strategy: String,
    },

    /// The evaluator failed outright (distinct from its sentinel result).
    #[error("evaluator failure: {message}")]
    Evaluator {
        /// Error details from the evaluator.
        message: String,
    },
}

impl From<EvaluatorError> for SimulationError {
    fn from(err: EvaluatorError) -> Self {
        Self::Evaluator {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimulationError::InsufficientData {
            message: "need at least 2 bars".to_string(),
        };
        assert_eq!(err.to_string(), "insufficient data: need at least 2 bars");

        let err = SimulationError::UnsupportedStrategy {
            strategy: "macd".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported strategy: macd");
    }

    #[test]
    fn test_from_evaluator_error() {
        let source = EvaluatorError::EvaluationFailed {
            message: "out of memory".to_string(),
        };
        let err = SimulationError::from(source);
        assert!(matches!(err, SimulationError::Evaluator { .. }));
        assert!(err.to_string().contains("out of memory"));
    }
}
