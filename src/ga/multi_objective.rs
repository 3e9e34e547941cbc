//! Multi-objective selection: Pareto fronts with fitness sharing.
//!
//! [`ParetoSharing`] turns objective vectors into one scalar
//! [`SharedFitness`] per individual. Fronts are peeled off by dominance;
//! inside a front, individuals that crowd the same region of objective
//! space split their fitness between them. Each front's fitness ceiling is
//! the previous front's worst value times a degradation factor, so sharing
//! never lets a dominated individual overtake a better front.
//!
//! # Algorithms
//!
//! - [`non_dominated_fronts`]: front peeling (fast non-dominated sort)
//! - [`ParetoSharing::assign`]: shared fitness per front
//!
//! # References
//!
//! - Goldberg & Richardson (1987), "Genetic Algorithms with Sharing for
//!   Multimodal Function Optimization"
//! - Srinivas & Deb (1994), "Multiobjective Optimization Using
//!   Nondominated Sorting in Genetic Algorithms" (NSGA)
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"

use super::types::{sort_best_first, Evaluated, Fitness};
use crate::error::EvolutionError;
use log::{debug, warn};

/// Selection fitness assigned by [`ParetoSharing`]. **Higher is better.**
///
/// Values are only comparable within the result of one
/// [`ParetoSharing::assign`] call.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SharedFitness(pub f64);

impl Fitness for SharedFitness {
    fn better_than(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    fn to_f64(self) -> f64 {
        self.0
    }
}

/// Which way an objective improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Minimize,
    Maximize,
}

/// Pareto dominance with every objective **minimized**.
///
/// `a` dominates `b` if it is no worse on every objective and strictly
/// better on at least one. Irreflexive: `dominates(a, a)` is `false`.
///
/// # Example
///
/// ```
/// use evoframe::ga::multi_objective::dominates;
///
/// assert!(dominates(&[1.0, 2.0], &[1.0, 3.0]));
/// assert!(!dominates(&[1.0, 5.0], &[3.0, 2.0]));
/// assert!(!dominates(&[1.0, 2.0], &[1.0, 2.0]));
/// ```
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    let mut strictly_better = false;
    for (&va, &vb) in a.iter().zip(b) {
        if va > vb {
            return false;
        }
        if va < vb {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Pareto dominance with a per-objective [`Direction`].
///
/// Objectives beyond `directions.len()` are ignored.
pub fn dominates_with(a: &[f64], b: &[f64], directions: &[Direction]) -> bool {
    let mut strictly_better = false;
    for ((&va, &vb), dir) in a.iter().zip(b).zip(directions) {
        let (better, worse) = match dir {
            Direction::Minimize => (va < vb, va > vb),
            Direction::Maximize => (va > vb, va < vb),
        };
        if worse {
            return false;
        }
        strictly_better |= better;
    }
    strictly_better
}

/// Partitions a population into Pareto fronts.
///
/// `fronts[0]` holds every individual not dominated by any other;
/// `fronts[1]` holds those not dominated once `fronts[0]` is removed, and
/// so on. Indices inside a front are ascending. Fronts are disjoint and
/// together cover every index exactly once.
///
/// `dominates` decides dominance and may encode any per-objective
/// direction. If it is not a strict partial order (a dominance cycle),
/// the individuals caught in the cycle form one final front.
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions
///
/// # Errors
///
/// [`EvolutionError::ObjectiveMismatch`] if the objective vectors differ
/// in length.
///
/// # Example
///
/// ```
/// use evoframe::ga::multi_objective::{dominates, non_dominated_fronts};
///
/// let objectives = vec![
///     vec![1.0, 5.0], // A
///     vec![3.0, 2.0], // B: dominated by C
///     vec![2.0, 2.0], // C
/// ];
/// let fronts = non_dominated_fronts(&objectives, dominates).unwrap();
/// assert_eq!(fronts, vec![vec![0, 2], vec![1]]);
/// ```
pub fn non_dominated_fronts<D>(
    objectives: &[Vec<f64>],
    dominates: D,
) -> Result<Vec<Vec<usize>>, EvolutionError>
where
    D: Fn(&[f64], &[f64]) -> bool,
{
    let n = objectives.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let m = objectives[0].len();
    if let Some(bad) = objectives.iter().find(|o| o.len() != m) {
        return Err(EvolutionError::ObjectiveMismatch {
            expected: m,
            actual: bad.len(),
        });
    }

    // dominated_by_count[j]: how many unassigned individuals dominate j
    let mut dominated_by_count = vec![0usize; n];
    let mut dominated: Vec<Vec<usize>> = vec![Vec::new(); n];

    for i in 0..n {
        for j in (i + 1)..n {
            if dominates(&objectives[i], &objectives[j]) {
                dominated[i].push(j);
                dominated_by_count[j] += 1;
            }
            if dominates(&objectives[j], &objectives[i]) {
                dominated[j].push(i);
                dominated_by_count[i] += 1;
            }
        }
    }

    let mut assigned = vec![false; n];
    let mut current: Vec<usize> = (0..n).filter(|&i| dominated_by_count[i] == 0).collect();
    let mut fronts = Vec::new();
    let mut remaining = n;

    while !current.is_empty() {
        let mut next = Vec::new();
        for &i in &current {
            assigned[i] = true;
            for &j in &dominated[i] {
                dominated_by_count[j] -= 1;
                if dominated_by_count[j] == 0 {
                    next.push(j);
                }
            }
        }
        remaining -= current.len();
        current.sort_unstable();
        fronts.push(current);
        current = next;
    }

    if remaining > 0 {
        warn!("dominance relation has a cycle; {remaining} individuals placed in a final front");
        fronts.push((0..n).filter(|&i| !assigned[i]).collect());
    }

    Ok(fronts)
}

/// Output of [`ParetoSharing::assign`]. Per-individual vectors are indexed
/// like the input population.
#[derive(Debug, Clone, PartialEq)]
pub struct SharingResult {
    /// Population indices grouped by front, best front first.
    pub fronts: Vec<Vec<usize>>,

    /// Shared fitness of each individual (higher is better).
    pub fitness: Vec<f64>,

    /// Niche count of each individual within its own front.
    pub niche_counts: Vec<f64>,
}

/// Pareto-front ranking with fitness sharing.
///
/// For every front `F`, in order:
///
/// 1. `niche(p) = Σ_{q∈F} sh(d(p, q))` with Euclidean distance `d` in
///    objective space and `sh(x) = max(0, 1 − (x/σ)²)`
/// 2. `fitness(p) = base · (1 − niche(p) / Σ_{q∈F} niche(q))`
/// 3. `base ← min_{p∈F} fitness(p) · degradation`
///
/// `base` starts at 1. An individual alone in its front has a niche count
/// equal to the front total and therefore gets fitness `0.0`; every later
/// front then gets `0.0` as well.
///
/// # Example
///
/// ```
/// use evoframe::ga::multi_objective::{dominates, ParetoSharing};
///
/// let sharing = ParetoSharing::new(0.9, 100.0).unwrap();
/// let objectives = vec![vec![0.0, 300.0], vec![300.0, 0.0], vec![400.0, 400.0]];
/// let result = sharing.assign(&objectives, dominates).unwrap();
///
/// // The two front members are too far apart to share a niche.
/// assert_eq!(result.fitness[0], 0.5);
/// assert_eq!(result.fitness[1], 0.5);
/// assert_eq!(result.fitness[2], 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParetoSharing {
    degradation: f64,
    sigma: f64,
}

impl Default for ParetoSharing {
    fn default() -> Self {
        Self {
            degradation: 0.9,
            sigma: 100.0,
        }
    }
}

impl ParetoSharing {
    /// Creates a selector with degradation factor `degradation ∈ (0, 1]` and
    /// sharing radius `sigma > 0`.
    pub fn new(degradation: f64, sigma: f64) -> Result<Self, EvolutionError> {
        if !(degradation > 0.0 && degradation <= 1.0) {
            return Err(EvolutionError::InvalidDegradation(degradation));
        }
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(EvolutionError::InvalidSharingRadius(sigma));
        }
        Ok(Self { degradation, sigma })
    }

    /// Factor applied to a front's worst shared fitness to get the next
    /// front's ceiling.
    pub fn degradation(&self) -> f64 {
        self.degradation
    }

    /// Sharing radius in objective space. Individuals at least this far
    /// apart do not share a niche.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Sharing kernel: 1 at distance 0, falling to 0 at `sigma` and beyond.
    pub fn sharing(&self, distance: f64) -> f64 {
        let r = distance / self.sigma;
        (1.0 - r * r).max(0.0)
    }

    /// Ranks the population into fronts and assigns shared fitness.
    ///
    /// A front whose niche total is not positive gives every member the
    /// front's base fitness. The kernel maps a NaN distance to 0, so an
    /// individual with a NaN objective shares no niche; in a mixed front it
    /// therefore receives the top shared fitness.
    ///
    /// # Errors
    ///
    /// [`EvolutionError::ObjectiveMismatch`] if the objective vectors differ
    /// in length.
    pub fn assign<D>(
        &self,
        objectives: &[Vec<f64>],
        dominates: D,
    ) -> Result<SharingResult, EvolutionError>
    where
        D: Fn(&[f64], &[f64]) -> bool,
    {
        let n = objectives.len();
        let fronts = non_dominated_fronts(objectives, dominates)?;
        let mut fitness = vec![0.0f64; n];
        let mut niche_counts = vec![0.0f64; n];
        let mut base = 1.0f64;

        for (rank, front) in fronts.iter().enumerate() {
            for &p in front {
                niche_counts[p] = front
                    .iter()
                    .map(|&q| self.sharing(euclidean(&objectives[p], &objectives[q])))
                    .sum();
            }

            let total: f64 = front.iter().map(|&p| niche_counts[p]).sum();
            for &p in front {
                // Zero only when every distance in the front is NaN.
                fitness[p] = if total > 0.0 {
                    base * (1.0 - niche_counts[p] / total)
                } else {
                    base
                };
            }

            let floor = front
                .iter()
                .map(|&p| fitness[p])
                .fold(f64::INFINITY, f64::min);
            debug!(
                "front {rank}: {} individuals, niche total {total:.3}, base {base:.4}, floor {floor:.4}",
                front.len()
            );
            base = floor * self.degradation;
        }

        Ok(SharingResult {
            fronts,
            fitness,
            niche_counts,
        })
    }

    /// Evaluates a population with [`assign`](Self::assign) and returns it
    /// best-first by shared fitness.
    ///
    /// Every front scores at or below the previous front's worst member, so
    /// fronts stay grouped in rank order.
    ///
    /// `objectives_of` maps a solution to its objective vector.
    pub fn evaluate_population<S, O, D>(
        &self,
        population: &[S],
        objectives_of: O,
        dominates: D,
    ) -> Result<Vec<Evaluated<S, SharedFitness>>, EvolutionError>
    where
        S: Clone,
        O: Fn(&S) -> Vec<f64>,
        D: Fn(&[f64], &[f64]) -> bool,
    {
        let objectives: Vec<Vec<f64>> = population.iter().map(objectives_of).collect();
        let result = self.assign(&objectives, dominates)?;

        let mut evaluated: Vec<_> = result
            .fronts
            .iter()
            .flatten()
            .map(|&i| Evaluated::new(population[i].clone(), SharedFitness(result.fitness[i])))
            .collect();
        sort_best_first(&mut evaluated);
        Ok(evaluated)
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

// ============================================================================
// Tests
// ============================================================================
