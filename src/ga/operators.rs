//! Generic variation operators.
//!
//! Building blocks for [`GeneticProblem::crossover`](super::GeneticProblem::crossover)
//! and [`GeneticProblem::mutate`](super::GeneticProblem::mutate). Each one
//! works on a different representation:
//!
//! - [`segment_crossover`]: permutations of `0..n` (routes, orderings)
//! - [`splice_crossover`]: variable-length sequences (instruction lists)
//! - [`blend_crossover`]: real-valued vectors (coefficients, profiles)
//! - [`swap_mutation`]: any sequence, exchange two positions
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Koza (1992), *Genetic Programming*
//! - Michalewicz (1996), *Genetic Algorithms + Data Structures = Evolution Programs*

use rand::Rng;

// ============================================================================
// Crossover operators
// ============================================================================

/// Segment-preserving crossover for permutations of `0..n`.
///
/// # Algorithm
///
/// 1. Select a random segment `[start, end]`
/// 2. Copy `parent1[start..=end]` to the child at the same positions
/// 3. Fill the remaining positions left to right with the values of
///    `parent2`, in `parent2` order, skipping values already placed
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if the parents have different lengths, are empty, or are not
/// permutations of `0..n`.
pub fn segment_crossover<R: Rng>(parent1: &[usize], parent2: &[usize], rng: &mut R) -> Vec<usize> {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(n > 0, "parents must not be empty");

    let (start, end) = random_segment(n, rng);
    segment_child(parent1, parent2, start, end)
}

fn segment_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut used = vec![false; n];
    for &v in &template[start..=end] {
        used[v] = true;
    }

    let mut fill = donor.iter().copied().filter(|&v| !used[v]);
    let mut child = Vec::with_capacity(n);
    for i in 0..n {
        if (start..=end).contains(&i) {
            child.push(template[i]);
        } else {
            child.extend(fill.next());
        }
    }
    child
}

/// One-point crossover for sequences of any length.
///
/// The child is `parent1[..cut1]` followed by `parent2[cut2..]`, with each
/// cut drawn uniformly from the valid indices of its parent. The child
/// length may differ from both parents.
///
/// Empty parents contribute nothing.
pub fn splice_crossover<T: Clone, R: Rng>(parent1: &[T], parent2: &[T], rng: &mut R) -> Vec<T> {
    let cut1 = if parent1.is_empty() {
        0
    } else {
        rng.random_range(0..parent1.len())
    };
    let cut2 = if parent2.is_empty() {
        0
    } else {
        rng.random_range(0..parent2.len())
    };

    let mut child = Vec::with_capacity(cut1 + parent2.len() - cut2);
    child.extend_from_slice(&parent1[..cut1]);
    child.extend_from_slice(&parent2[cut2..]);
    child
}

/// Arithmetic blend of two real vectors.
///
/// Draws one `c ∈ [0, 1)` and returns `parent1 + c · (parent2 − parent1)`,
/// so the child lies on the segment between the parents.
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn blend_crossover<R: Rng>(parent1: &[f64], parent2: &[f64], rng: &mut R) -> Vec<f64> {
    assert_eq!(
        parent1.len(),
        parent2.len(),
        "parents must have equal length"
    );
    let c: f64 = rng.random_range(0.0..1.0);
    parent1
        .iter()
        .zip(parent2)
        .map(|(&a, &b)| a + c * (b - a))
        .collect()
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Swap mutation: exchange two random positions.
///
/// The two positions may coincide, leaving the sequence unchanged.
///
/// # Complexity
/// O(1)
pub fn swap_mutation<T, R: Rng>(seq: &mut [T], rng: &mut R) {
    let n = seq.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let j = rng.random_range(0..n);
    seq.swap(i, j);
}

// ============================================================================
// Helpers
// ============================================================================

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let start = rng.random_range(0..n);
    let end = rng.random_range(start..n);
    (start, end)
}

// ============================================================================
// Tests
// ============================================================================
