//! Generic evolutionary computation framework.
//!
//! The library drives a generational loop (seed, evaluate, select, breed,
//! mutate, re-evaluate) over any problem that implements
//! [`ga::GeneticProblem`], and ships the reusable pieces such problems
//! tend to need:
//!
//! - **Engine**: [`ga::EvolutionRunner`] with an optional per-generation
//!   observer callback.
//! - **Selection**: k-duel tournament with a configurable "better"
//!   direction, uniform pair selection, and elite splitting.
//! - **Multi-objective**: Pareto dominance, non-dominated front
//!   decomposition, and fitness sharing that collapses a vector of
//!   objectives into one scalar score.
//! - **Operators**: crossover and mutation for permutations,
//!   variable-length sequences, and real vectors.
//!
//! The crate holds no domain concepts. Routes, instruction lists, and
//! worker profiles are all defined by consumers.

pub mod error;
pub mod ga;
pub mod random;

pub use error::EvolutionError;
