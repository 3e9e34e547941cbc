//! Generational loop execution.
//!
//! [`EvolutionRunner`] drives any [`GeneticProblem`]:
//! initialization → evaluation → elite/mating split → parent selection →
//! crossover → mutation → repeat.

use super::config::EvolutionConfig;
use super::types::{Evaluated, Fitness, GeneticProblem, NextGeneration};
use crate::error::EvolutionError;
use crate::random::rng_from_option;
use log::{debug, info};

/// Result of an evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionResult<S> {
    /// The population after the last generation.
    pub population: Vec<S>,

    /// Number of generations bred (`max_generations + 1`).
    pub generations: usize,

    /// Best fitness of the initial population and of each generation,
    /// as `f64`. Empty when the population is empty.
    pub fitness_history: Vec<f64>,
}

/// Executes the generational loop.
///
/// The runner owns the random number generator of a run and hands it to
/// every stochastic problem operation. It never looks inside a solution
/// and never calls a selector itself; selection is the problem's job.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = EvolutionConfig::default().with_seed(42);
/// let result = EvolutionRunner::run_with_logger(&problem, &config, |generation, best| {
///     println!("generation {generation}: {best:?}");
/// })?;
/// ```
pub struct EvolutionRunner;

impl EvolutionRunner {
    /// Runs the evolution and returns the final population.
    ///
    /// # Errors
    /// Returns the error of an invalid configuration, an elite larger than
    /// the population, or any error raised by
    /// [`GeneticProblem::select_parents`].
    pub fn run<P: GeneticProblem>(
        problem: &P,
        config: &EvolutionConfig,
    ) -> Result<EvolutionResult<P::Solution>, EvolutionError> {
        Self::evolve(problem, config, None)
    }

    /// Runs the evolution, calling `logger(generation, best)` after every
    /// generation. `generation` starts at 1; `best` comes from
    /// [`GeneticProblem::find_best_in`].
    pub fn run_with_logger<P, L>(
        problem: &P,
        config: &EvolutionConfig,
        mut logger: L,
    ) -> Result<EvolutionResult<P::Solution>, EvolutionError>
    where
        P: GeneticProblem,
        L: FnMut(usize, &P::Solution),
    {
        let logger: &mut dyn FnMut(usize, &P::Solution) = &mut logger;
        Self::evolve(problem, config, Some(logger))
    }

    /// Runs the evolution and returns only the best individual of the final
    /// population, or `None` if the population is empty.
    pub fn run_best<P: GeneticProblem>(
        problem: &P,
        config: &EvolutionConfig,
    ) -> Result<Option<P::Solution>, EvolutionError> {
        let result = Self::run(problem, config)?;
        Ok(problem.find_best_in(&result.population))
    }

    fn evolve<P: GeneticProblem>(
        problem: &P,
        config: &EvolutionConfig,
        mut logger: Option<&mut dyn FnMut(usize, &P::Solution)>,
    ) -> Result<EvolutionResult<P::Solution>, EvolutionError> {
        config.validate()?;
        let mut rng = rng_from_option(config.seed);

        // 1. Initialize and evaluate
        let mut population = problem.init_population(&mut rng);
        let population_size = population.len();
        let mut evaluated = problem.evaluate(&population);

        info!(
            "starting evolution: population {population_size}, max_generations {}, mutation_rate {}",
            config.max_generations, config.mutation_rate
        );

        let mut fitness_history = Vec::new();
        if let Some(best) = best_fitness(&evaluated) {
            fitness_history.push(best);
        }

        // 2. Generational loop; stops once the counter exceeds the bound.
        let mut generation = 0usize;
        while generation <= config.max_generations {
            let NextGeneration { elite, mating_pool } =
                problem.select_next_gen(&evaluated, &mut rng);
            if elite.len() > population_size {
                return Err(EvolutionError::EliteOverflow {
                    elite: elite.len(),
                    population: population_size,
                });
            }

            let elite_count = elite.len();
            let mating = problem.evaluate(&mating_pool);

            let mut next_gen = elite;
            next_gen.reserve(population_size - elite_count);
            while next_gen.len() < population_size {
                let parents = problem.select_parents(&mating, &mut rng)?;
                let mut child = problem.crossover(&parents, &mut rng);
                problem.mutate(&mut child, config.mutation_rate, &mut rng);
                next_gen.push(child);
            }

            population = next_gen;
            evaluated = problem.evaluate(&population);
            generation += 1;

            let best = best_fitness(&evaluated);
            if let Some(best) = best {
                fitness_history.push(best);
            }
            debug!(
                "generation {generation}: best fitness {best:?}, {elite_count} elite, mating pool {}",
                mating.len()
            );

            if let Some(log) = logger.as_deref_mut() {
                if let Some(best) = problem.find_best_in(&population) {
                    log(generation, &best);
                }
            }
        }

        info!("evolution finished after {generation} generations");

        Ok(EvolutionResult {
            population,
            generations: generation,
            fitness_history,
        })
    }
}

/// Best fitness in an evaluated population, whatever its order.
fn best_fitness<S, F: Fitness>(population: &[Evaluated<S, F>]) -> Option<f64> {
    population
        .iter()
        .reduce(|best, e| if e.better_than(best) { e } else { best })
        .map(|e| e.fitness.to_f64())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::types::{sort_best_first, EvaluatedOf};
    use crate::ga::{split_elite, Selection};
    use rand::Rng;
    use std::cell::RefCell;

    // ---- OneMax problem: maximize set bits (minimize negative count) ----

    struct OneMax {
        n: usize,
        size: usize,
    }

    impl GeneticProblem for OneMax {
        type Solution = Vec<bool>;
        type Fitness = f64;

        fn init_population<R: Rng>(&self, rng: &mut R) -> Vec<Vec<bool>> {
            (0..self.size)
                .map(|_| (0..self.n).map(|_| rng.random_bool(0.5)).collect())
                .collect()
        }

        fn evaluate(&self, population: &[Vec<bool>]) -> Vec<Evaluated<Vec<bool>, f64>> {
            let mut evaluated: Vec<_> = population
                .iter()
                .map(|bits| {
                    let ones = bits.iter().filter(|&&b| b).count();
                    Evaluated::new(bits.clone(), -(ones as f64))
                })
                .collect();
            sort_best_first(&mut evaluated);
            evaluated
        }

        fn select_next_gen<R: Rng>(
            &self,
            population: &[EvaluatedOf<Self>],
            _rng: &mut R,
        ) -> NextGeneration<Vec<bool>> {
            split_elite(population, population.len() / 4, true)
        }

        fn select_parents<R: Rng>(
            &self,
            mating_pool: &[EvaluatedOf<Self>],
            rng: &mut R,
        ) -> Result<[Vec<bool>; 2], EvolutionError> {
            Selection::Tournament(2).select_parents(mating_pool, rng)
        }

        fn crossover<R: Rng>(&self, parents: &[Vec<bool>; 2], rng: &mut R) -> Vec<bool> {
            let point = rng.random_range(0..self.n);
            let mut child = parents[0][..point].to_vec();
            child.extend_from_slice(&parents[1][point..]);
            child
        }

        fn mutate<R: Rng>(&self, bits: &mut Vec<bool>, rate: f64, rng: &mut R) {
            for bit in bits.iter_mut() {
                if rng.random_bool(rate) {
                    *bit = !*bit;
                }
            }
        }
    }

    fn onemax() -> OneMax {
        OneMax { n: 24, size: 40 }
    }

    #[test]
    fn test_onemax_convergence() {
        let config = EvolutionConfig::default()
            .with_max_generations(60)
            .with_mutation_rate(0.04)
            .with_seed(42);

        let best = EvolutionRunner::run_best(&onemax(), &config)
            .unwrap()
            .unwrap();
        let ones = best.iter().filter(|&&b| b).count();
        assert!(ones >= 20, "expected at least 20 of 24 bits set, got {ones}");
    }

    #[test]
    fn test_runs_one_extra_generation() {
        let config = EvolutionConfig::default()
            .with_max_generations(5)
            .with_seed(1);

        let mut seen = Vec::new();
        let result = EvolutionRunner::run_with_logger(&onemax(), &config, |g, _| seen.push(g))
            .unwrap();

        assert_eq!(result.generations, 6);
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_zero_generations_still_breeds_once() {
        let config = EvolutionConfig::default()
            .with_max_generations(0)
            .with_seed(1);
        let result = EvolutionRunner::run(&onemax(), &config).unwrap();
        assert_eq!(result.generations, 1);
        assert_eq!(result.fitness_history.len(), 2);
    }

    #[test]
    fn test_same_seed_same_population() {
        let config = EvolutionConfig::default()
            .with_max_generations(10)
            .with_seed(99);

        let a = EvolutionRunner::run(&onemax(), &config).unwrap();
        let b = EvolutionRunner::run(&onemax(), &config).unwrap();
        assert_eq!(a.population, b.population);
        assert_eq!(a.fitness_history, b.fitness_history);
    }

    #[test]
    fn test_elitism_keeps_best_fitness() {
        let config = EvolutionConfig::default()
            .with_max_generations(30)
            .with_mutation_rate(0.1)
            .with_seed(5);
        let result = EvolutionRunner::run(&onemax(), &config).unwrap();

        for window in result.fitness_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best fitness regressed with elitism: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_logger_receives_best() {
        let config = EvolutionConfig::default()
            .with_max_generations(3)
            .with_seed(8);

        let mut logged = Vec::new();
        let result = EvolutionRunner::run_with_logger(&onemax(), &config, |_, best: &Vec<bool>| {
            logged.push(-(best.iter().filter(|&&b| b).count() as f64));
        })
        .unwrap();

        assert_eq!(logged, result.fitness_history[1..].to_vec());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EvolutionConfig::default().with_mutation_rate(2.0);
        let err = EvolutionRunner::run(&onemax(), &config).unwrap_err();
        assert_eq!(err, EvolutionError::InvalidMutationRate(2.0));
    }

    // ---- Instrumented problem: integer solutions, records what it sees ----

    /// Solutions are integers; lower is better. Records the size of every
    /// population handed to `select_next_gen` and the elite it returned.
    struct Recorder {
        size: usize,
        elite: usize,
        pool_limit: Option<usize>,
        sizes: RefCell<Vec<usize>>,
        elites: RefCell<Vec<Vec<i64>>>,
        populations: RefCell<Vec<Vec<i64>>>,
    }

    impl Recorder {
        fn new(size: usize, elite: usize) -> Self {
            Self {
                size,
                elite,
                pool_limit: None,
                sizes: RefCell::new(Vec::new()),
                elites: RefCell::new(Vec::new()),
                populations: RefCell::new(Vec::new()),
            }
        }
    }

    impl GeneticProblem for Recorder {
        type Solution = i64;
        type Fitness = f64;

        fn init_population<R: Rng>(&self, rng: &mut R) -> Vec<i64> {
            (0..self.size).map(|_| rng.random_range(-1000..1000)).collect()
        }

        fn evaluate(&self, population: &[i64]) -> Vec<Evaluated<i64, f64>> {
            let mut evaluated: Vec<_> = population
                .iter()
                .map(|&x| Evaluated::new(x, x.abs() as f64))
                .collect();
            sort_best_first(&mut evaluated);
            evaluated
        }

        fn select_next_gen<R: Rng>(
            &self,
            population: &[EvaluatedOf<Self>],
            _rng: &mut R,
        ) -> NextGeneration<i64> {
            self.sizes.borrow_mut().push(population.len());
            self.populations
                .borrow_mut()
                .push(population.iter().map(|e| e.solution).collect());

            let mut next = split_elite(population, self.elite, false);
            if let Some(limit) = self.pool_limit {
                next.mating_pool.truncate(limit);
            }
            self.elites.borrow_mut().push(next.elite.clone());
            next
        }

        fn select_parents<R: Rng>(
            &self,
            mating_pool: &[EvaluatedOf<Self>],
            rng: &mut R,
        ) -> Result<[i64; 2], EvolutionError> {
            Selection::Uniform.select_parents(mating_pool, rng)
        }

        fn crossover<R: Rng>(&self, parents: &[i64; 2], _rng: &mut R) -> i64 {
            (parents[0] + parents[1]) / 2
        }

        fn mutate<R: Rng>(&self, x: &mut i64, rate: f64, rng: &mut R) {
            if rng.random_bool(rate) {
                *x += rng.random_range(-5..=5);
            }
        }
    }

    #[test]
    fn test_population_size_is_invariant() {
        let problem = Recorder::new(17, 3);
        let config = EvolutionConfig::default()
            .with_max_generations(12)
            .with_seed(4);
        let result = EvolutionRunner::run(&problem, &config).unwrap();

        assert_eq!(result.population.len(), 17);
        let sizes = problem.sizes.borrow();
        assert_eq!(sizes.len(), 13);
        assert!(sizes.iter().all(|&s| s == 17), "sizes changed: {sizes:?}");
    }

    #[test]
    fn test_elite_is_carried_over_unchanged() {
        let problem = Recorder::new(20, 5);
        let config = EvolutionConfig::default()
            .with_max_generations(8)
            .with_mutation_rate(1.0)
            .with_seed(21);
        let result = EvolutionRunner::run(&problem, &config).unwrap();

        let elites = problem.elites.borrow();
        let populations = problem.populations.borrow();
        // populations[g + 1] is the population bred from elites[g].
        for (g, elite) in elites.iter().enumerate() {
            let next = populations.get(g + 1).unwrap_or(&result.population);
            for x in elite {
                assert!(next.contains(x), "elite {x} from generation {g} was lost");
            }
        }
    }

    #[test]
    fn test_parent_selection_error_propagates() {
        let mut problem = Recorder::new(10, 2);
        problem.pool_limit = Some(1);
        let config = EvolutionConfig::default().with_seed(3);

        let err = EvolutionRunner::run(&problem, &config).unwrap_err();
        assert_eq!(
            err,
            EvolutionError::PopulationTooSmall {
                operation: "parent selection",
                required: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_full_elite_needs_no_parents() {
        // Everyone survives, so the tiny mating pool is never used.
        let mut problem = Recorder::new(6, 6);
        problem.pool_limit = Some(0);
        let config = EvolutionConfig::default()
            .with_max_generations(3)
            .with_seed(3);

        let result = EvolutionRunner::run(&problem, &config).unwrap();
        let mut initial = problem.populations.borrow()[0].clone();
        let mut last = result.population.clone();
        initial.sort();
        last.sort();
        assert_eq!(initial, last);
    }

    struct Overflow;

    impl GeneticProblem for Overflow {
        type Solution = u8;
        type Fitness = f64;

        fn init_population<R: Rng>(&self, _rng: &mut R) -> Vec<u8> {
            vec![1, 2, 3]
        }

        fn evaluate(&self, population: &[u8]) -> Vec<Evaluated<u8, f64>> {
            population
                .iter()
                .map(|&x| Evaluated::new(x, x as f64))
                .collect()
        }

        fn select_next_gen<R: Rng>(
            &self,
            population: &[EvaluatedOf<Self>],
            _rng: &mut R,
        ) -> NextGeneration<u8> {
            let all: Vec<u8> = population.iter().map(|e| e.solution).collect();
            NextGeneration {
                elite: [all.clone(), all.clone()].concat(),
                mating_pool: all,
            }
        }

        fn select_parents<R: Rng>(
            &self,
            mating_pool: &[EvaluatedOf<Self>],
            rng: &mut R,
        ) -> Result<[u8; 2], EvolutionError> {
            Selection::Uniform.select_parents(mating_pool, rng)
        }

        fn crossover<R: Rng>(&self, parents: &[u8; 2], _rng: &mut R) -> u8 {
            parents[0]
        }
    }

    #[test]
    fn test_oversized_elite_is_rejected() {
        let config = EvolutionConfig::default().with_seed(1);
        let err = EvolutionRunner::run(&Overflow, &config).unwrap_err();
        assert_eq!(
            err,
            EvolutionError::EliteOverflow {
                elite: 6,
                population: 3
            }
        );
    }

    #[test]
    fn test_empty_population_runs_without_logging() {
        let problem = Recorder::new(0, 0);
        let config = EvolutionConfig::default()
            .with_max_generations(4)
            .with_seed(1);

        let mut calls = 0;
        let result =
            EvolutionRunner::run_with_logger(&problem, &config, |_, _| calls += 1).unwrap();

        assert_eq!(calls, 0);
        assert_eq!(result.generations, 5);
        assert!(result.population.is_empty());
        assert!(result.fitness_history.is_empty());
        assert_eq!(EvolutionRunner::run_best(&problem, &config).unwrap(), None);
    }

    #[test]
    fn test_best_fitness_ignores_order() {
        let pop = vec![
            Evaluated::new((), 3.0),
            Evaluated::new((), -1.0),
            Evaluated::new((), 2.0),
        ];
        assert_eq!(best_fitness(&pop), Some(-1.0));
        let empty: Vec<Evaluated<(), f64>> = vec![];
        assert_eq!(best_fitness(&empty), None);
    }
}
