//! Generational evolution framework.
//!
//! A generic, domain-agnostic engine built on a single problem trait.
//! Users describe their problem by implementing [`GeneticProblem`], which
//! decides how to seed, evaluate, select, recombine, and mutate candidate
//! solutions. The engine only drives the loop.
//!
//! # Core Traits
//!
//! - [`Fitness`]: An ordered score with a configurable "better" direction
//! - [`GeneticProblem`]: Problem definition (initialization, evaluation, operators)
//!
//! # Key Types
//!
//! - [`EvolutionConfig`]: Loop parameters (generation bound, mutation rate, seed)
//! - [`EvolutionRunner`]: Executes the generational loop
//! - [`EvolutionResult`]: Final population with per-generation history
//! - [`Selection`]: Duel tournament and uniform parent selection
//!
//! # Submodules
//!
//! - [`operators`]: Segment, splice, and blend crossover plus swap mutation
//! - [`multi_objective`]: Pareto dominance, non-dominated fronts, fitness sharing
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Goldberg & Richardson (1987), "Genetic Algorithms with Sharing for Multimodal Function Optimization"

mod config;
pub mod multi_objective;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::EvolutionConfig;
pub use multi_objective::{ParetoSharing, SharedFitness};
pub use runner::{EvolutionResult, EvolutionRunner};
pub use selection::{split_elite, Selection};
pub use types::{sort_best_first, Evaluated, EvaluatedOf, Fitness, GeneticProblem, NextGeneration};
