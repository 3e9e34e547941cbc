//! Parent selection and elite splitting.
//!
//! These are building blocks for [`GeneticProblem`](super::GeneticProblem)
//! implementations; the runner itself never calls them.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Miller & Goldberg (1995), "Genetic Algorithms, Tournament Selection,
//!   and the Effects of Noise"

use super::types::{Evaluated, Fitness, NextGeneration};
use crate::error::EvolutionError;
use log::trace;
use rand::Rng;

/// Strategy for picking a mating pair from an evaluated pool.
///
/// Works for any [`Fitness`]: "better" is whatever
/// [`Fitness::better_than`] says, so the same selector serves minimizing
/// scalar fitness and the higher-is-better
/// [`SharedFitness`](super::multi_objective::SharedFitness).
///
/// # Examples
///
/// ```
/// use evoframe::ga::{Evaluated, Selection};
/// use evoframe::random::create_rng;
///
/// let pool = vec![Evaluated::new("a", 1.0), Evaluated::new("b", 5.0)];
/// let mut rng = create_rng(42);
///
/// // With one duel, only the fitter individual can ever qualify.
/// let pair = Selection::Tournament(1).select_pair(&pool, &mut rng).unwrap();
/// assert_eq!(pair, [0, 0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// k-duel tournament: a random subject becomes a parent only if it is
    /// strictly better than each of `k` random contenders.
    ///
    /// Higher `k` = stronger selection pressure. Typical values are 8, 16
    /// or 32, tuned to the pool size.
    ///
    /// Keep `k` well below the pool size. With `k >= N`, or when most of
    /// the pool shares the same fitness, a subject may practically never
    /// win every duel and [`select_pair`](Selection::select_pair) keeps
    /// drawing forever. Use [`select_pair_within`](Selection::select_pair_within)
    /// to bound the search.
    Tournament(usize),

    /// Two distinct individuals drawn uniformly at random, fitness ignored.
    Uniform,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(8)
    }
}

impl Selection {
    /// Selects the pool indices of two parents.
    ///
    /// The two draws are independent, so both may point at the same
    /// individual.
    ///
    /// # Errors
    /// [`EvolutionError::PopulationTooSmall`] if `pool` has fewer than two
    /// individuals.
    pub fn select_pair<S, F: Fitness, R: Rng>(
        &self,
        pool: &[Evaluated<S, F>],
        rng: &mut R,
    ) -> Result<[usize; 2], EvolutionError> {
        self.draw_pair(pool, None, rng)
    }

    /// Like [`select_pair`](Self::select_pair), but gives up after
    /// `max_draws` tournament subjects.
    ///
    /// # Errors
    /// [`EvolutionError::SelectionExhausted`] if two parents did not
    /// qualify within `max_draws` draws.
    pub fn select_pair_within<S, F: Fitness, R: Rng>(
        &self,
        pool: &[Evaluated<S, F>],
        max_draws: usize,
        rng: &mut R,
    ) -> Result<[usize; 2], EvolutionError> {
        self.draw_pair(pool, Some(max_draws), rng)
    }

    /// Selects two parents and returns copies of their solutions.
    pub fn select_parents<S: Clone, F: Fitness, R: Rng>(
        &self,
        pool: &[Evaluated<S, F>],
        rng: &mut R,
    ) -> Result<[S; 2], EvolutionError> {
        let [a, b] = self.select_pair(pool, rng)?;
        Ok([pool[a].solution.clone(), pool[b].solution.clone()])
    }

    fn draw_pair<S, F: Fitness, R: Rng>(
        &self,
        pool: &[Evaluated<S, F>],
        max_draws: Option<usize>,
        rng: &mut R,
    ) -> Result<[usize; 2], EvolutionError> {
        if pool.len() < 2 {
            return Err(EvolutionError::PopulationTooSmall {
                operation: "parent selection",
                required: 2,
                actual: pool.len(),
            });
        }

        match self {
            Selection::Tournament(k) => duel_tournament(pool, *k, max_draws, rng),
            Selection::Uniform => {
                let first = rng.random_range(0..pool.len());
                Ok([first, random_other(pool.len(), first, rng)])
            }
        }
    }
}

/// Draws subjects until two of them have won all `duels` duels.
fn duel_tournament<S, F: Fitness, R: Rng>(
    pool: &[Evaluated<S, F>],
    duels: usize,
    max_draws: Option<usize>,
    rng: &mut R,
) -> Result<[usize; 2], EvolutionError> {
    let n = pool.len();
    let mut parents = [0usize; 2];
    let mut found = 0;
    let mut draws = 0usize;

    while found < 2 {
        if max_draws.is_some_and(|limit| draws >= limit) {
            return Err(EvolutionError::SelectionExhausted { draws });
        }
        draws += 1;

        let subject = rng.random_range(0..n);
        if duels_won(pool, subject, duels, rng) == duels {
            parents[found] = subject;
            found += 1;
        }
    }

    trace!("tournament(k={duels}) picked {parents:?} after {draws} draws");
    Ok(parents)
}

/// Plays exactly `duels` duels for `subject` and returns how many it won.
///
/// A duel is won only on strictly better fitness; ties lose.
fn duels_won<S, F: Fitness, R: Rng>(
    pool: &[Evaluated<S, F>],
    subject: usize,
    duels: usize,
    rng: &mut R,
) -> usize {
    let mut won = 0;
    for _ in 0..duels {
        let contender = random_other(pool.len(), subject, rng);
        if pool[subject].better_than(&pool[contender]) {
            won += 1;
        }
    }
    won
}

/// Uniform index in `0..n` other than `exclude`. Requires `n >= 2`.
fn random_other<R: Rng>(n: usize, exclude: usize, rng: &mut R) -> usize {
    let idx = rng.random_range(0..n - 1);
    if idx >= exclude {
        idx + 1
    } else {
        idx
    }
}

/// Splits a best-first evaluated population into the leading
/// `elite_count` individuals and a mating pool of the rest.
///
/// With `elites_mate`, the elite also joins the mating pool. An
/// `elite_count` larger than the population takes everyone.
///
/// # Examples
///
/// ```
/// use evoframe::ga::{split_elite, Evaluated};
///
/// let pop = vec![
///     Evaluated::new('a', 1.0),
///     Evaluated::new('b', 2.0),
///     Evaluated::new('c', 3.0),
/// ];
/// let next = split_elite(&pop, 1, false);
/// assert_eq!(next.elite, vec!['a']);
/// assert_eq!(next.mating_pool, vec!['b', 'c']);
/// ```
pub fn split_elite<S: Clone, F: Fitness>(
    population: &[Evaluated<S, F>],
    elite_count: usize,
    elites_mate: bool,
) -> NextGeneration<S> {
    let cut = elite_count.min(population.len());
    let elite: Vec<S> = population[..cut]
        .iter()
        .map(|e| e.solution.clone())
        .collect();

    let mating_start = if elites_mate { 0 } else { cut };
    let mating_pool = population[mating_start..]
        .iter()
        .map(|e| e.solution.clone())
        .collect();

    NextGeneration { elite, mating_pool }
}
