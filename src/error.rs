//! Error type shared across the crate.

use thiserror::Error;

/// Errors raised when a configuration or a problem implementation breaks
/// the contract expected by the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvolutionError {
    #[error("mutation rate must be a finite number in [0, 1], got {0}")]
    InvalidMutationRate(f64),

    #[error("fitness degradation factor must be in (0, 1], got {0}")]
    InvalidDegradation(f64),

    #[error("sharing radius must be a finite positive number, got {0}")]
    InvalidSharingRadius(f64),

    #[error("{operation} needs at least {required} individuals, got {actual}")]
    PopulationTooSmall {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("selected {elite} elite individuals but the population only holds {population}")]
    EliteOverflow { elite: usize, population: usize },

    #[error("no parent qualified after {draws} tournament draws")]
    SelectionExhausted { draws: usize },

    #[error("objective vectors must all have {expected} values, found one with {actual}")]
    ObjectiveMismatch { expected: usize, actual: usize },
}
