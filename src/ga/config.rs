//! Engine configuration.
//!
//! [`EvolutionConfig`] holds the parameters that control the generational
//! loop. Everything else (population size, elite share, operators) belongs
//! to the problem.

use crate::error::EvolutionError;

/// Configuration for the [`EvolutionRunner`](super::EvolutionRunner).
///
/// # Defaults
///
/// ```
/// use evoframe::ga::EvolutionConfig;
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.max_generations, 100);
/// assert!(config.seed.is_none());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use evoframe::ga::EvolutionConfig;
///
/// let config = EvolutionConfig::default()
///     .with_max_generations(20)
///     .with_mutation_rate(0.05)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionConfig {
    /// Termination bound. The run stops once the generation counter
    /// exceeds this value, so `max_generations + 1` generations are bred.
    pub max_generations: usize,

    /// Passed unchanged to [`GeneticProblem::mutate`](super::GeneticProblem::mutate).
    ///
    /// Must lie in `[0, 1]`; its exact meaning is up to the problem.
    pub mutation_rate: f64,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            max_generations: 100,
            mutation_rate: 0.1,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Sets the termination bound.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the mutation rate. Out-of-range values are reported by
    /// [`validate`](Self::validate), not clamped.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), EvolutionError> {
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(EvolutionError::InvalidMutationRate(self.mutation_rate));
        }
        Ok(())
    }
}
