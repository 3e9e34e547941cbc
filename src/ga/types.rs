//! Core trait definitions for the evolutionary engine.
//!
//! [`GeneticProblem`] is the contract between the generic generational loop
//! and a domain-specific problem. The engine never looks inside a solution;
//! everything it needs goes through this trait.

use crate::error::EvolutionError;
use rand::Rng;
use std::cmp::Ordering;

/// Marker trait for fitness values.
///
/// Fitness must support comparison and be cheaply copyable. By default
/// lower fitness is better (minimization); a wrapper type can flip the
/// direction by overriding [`better_than`](Fitness::better_than), as
/// [`SharedFitness`](super::multi_objective::SharedFitness) does.
///
/// Built-in implementations exist for `f64` and `f32`.
pub trait Fitness: PartialOrd + Copy + std::fmt::Debug + 'static {
    /// Returns `true` if `self` is strictly better than `other`.
    fn better_than(&self, other: &Self) -> bool {
        self < other
    }

    /// Converts the fitness to `f64` for logging and statistics.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

impl Fitness for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// A solution paired with the fitness computed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluated<S, F> {
    pub solution: S,
    pub fitness: F,
}

impl<S, F: Fitness> Evaluated<S, F> {
    pub fn new(solution: S, fitness: F) -> Self {
        Self { solution, fitness }
    }

    /// Returns `true` if this individual's fitness is strictly better.
    pub fn better_than(&self, other: &Self) -> bool {
        self.fitness.better_than(&other.fitness)
    }
}

/// Sorts an evaluated population best-first according to
/// [`Fitness::better_than`]. The sort is stable; NaN fitness goes last.
pub fn sort_best_first<S, F: Fitness>(population: &mut [Evaluated<S, F>]) {
    population.sort_by(|a, b| {
        match (a.fitness.to_f64().is_nan(), b.fitness.to_f64().is_nan()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }
        if a.better_than(b) {
            Ordering::Less
        } else if b.better_than(a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });
}

/// Output of [`GeneticProblem::select_next_gen`].
///
/// `elite` is copied unchanged into the next generation; parents are drawn
/// from `mating_pool`. The two may overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct NextGeneration<S> {
    pub elite: Vec<S>,
    pub mating_pool: Vec<S>,
}

/// Shorthand for the evaluated individual type of a problem.
pub type EvaluatedOf<P> =
    Evaluated<<P as GeneticProblem>::Solution, <P as GeneticProblem>::Fitness>;

/// Defines an optimization problem that the
/// [`EvolutionRunner`](super::EvolutionRunner) can drive.
///
/// The runner owns the random number generator and passes it into every
/// stochastic operation, so implementations hold no RNG of their own.
/// No operation may modify any individual other than the one it is handed
/// by `&mut`.
///
/// # Implementing
///
/// ```ignore
/// impl GeneticProblem for Routes {
///     type Solution = Vec<usize>;
///     type Fitness = f64;
///
///     fn init_population<R: Rng>(&self, rng: &mut R) -> Vec<Vec<usize>> { ... }
///     fn evaluate(&self, pop: &[Vec<usize>]) -> Vec<Evaluated<Vec<usize>, f64>> { ... }
///     fn select_next_gen<R: Rng>(&self, pop: &[Evaluated<Vec<usize>, f64>], _rng: &mut R)
///         -> NextGeneration<Vec<usize>> { split_elite(pop, pop.len() / 4, true) }
///     fn select_parents<R: Rng>(&self, pool: &[Evaluated<Vec<usize>, f64>], rng: &mut R)
///         -> Result<[Vec<usize>; 2], EvolutionError> { Selection::Tournament(8).select_parents(pool, rng) }
///     fn crossover<R: Rng>(&self, p: &[Vec<usize>; 2], rng: &mut R) -> Vec<usize> {
///         segment_crossover(&p[0], &p[1], rng)
///     }
/// }
/// ```
pub trait GeneticProblem: Sized {
    /// The solution representation. Opaque to the engine.
    type Solution: Clone;

    /// The fitness type produced by [`evaluate`](Self::evaluate).
    type Fitness: Fitness;

    /// Produces the starting population. Its size is kept for the whole run.
    fn init_population<R: Rng>(&self, rng: &mut R) -> Vec<Self::Solution>;

    /// Computes the fitness of every individual.
    ///
    /// The ordering of the result is up to the problem; single-objective
    /// problems conventionally return it best-first.
    fn evaluate(&self, population: &[Self::Solution]) -> Vec<EvaluatedOf<Self>>;

    /// Splits an evaluated population into the elite, which survives
    /// unchanged, and the mating pool parents are drawn from.
    ///
    /// A problem may top up a small mating pool with fresh individuals.
    fn select_next_gen<R: Rng>(
        &self,
        population: &[EvaluatedOf<Self>],
        rng: &mut R,
    ) -> NextGeneration<Self::Solution>;

    /// Picks two parents from the evaluated mating pool.
    ///
    /// Must return [`EvolutionError::PopulationTooSmall`] rather than
    /// proceed when the pool holds fewer than two individuals.
    fn select_parents<R: Rng>(
        &self,
        mating_pool: &[EvaluatedOf<Self>],
        rng: &mut R,
    ) -> Result<[Self::Solution; 2], EvolutionError>;

    /// Combines two parents into one offspring.
    fn crossover<R: Rng>(&self, parents: &[Self::Solution; 2], rng: &mut R) -> Self::Solution;

    /// Perturbs a solution in place. `rate` is interpreted by the problem.
    ///
    /// The default implementation is a no-op.
    fn mutate<R: Rng>(&self, _solution: &mut Self::Solution, _rate: f64, _rng: &mut R) {}

    /// Re-evaluates `population` and returns its best individual, for
    /// reporting. Returns `None` for an empty population.
    ///
    /// The default implementation takes the first entry of
    /// [`evaluate`](Self::evaluate), which is correct for problems that
    /// return it best-first.
    fn find_best_in(&self, population: &[Self::Solution]) -> Option<Self::Solution> {
        self.evaluate(population)
            .into_iter()
            .next()
            .map(|e| e.solution)
    }
}
