//! Fitness-based pruning under a memory budget
//!
//! Fitness is the number of still-free vertices in a node's sealed bitmap.
//! It ignores reachability and dead ends, but it is a good enough proxy for
//! "room left to grow" to rank a frontier that no longer fits in memory.
//! [`FitnessMode`] switches to the shape-aware measures when needed.

use crate::cube::SearchNode;
use crate::search::fitness::FitnessMode;
use serde::{Deserialize, Serialize};

/// Anything the pruner can rank
pub trait Scored {
    /// Higher fitness = more promising (kept first under pressure)
    fn fitness(&self) -> usize;

    /// Ranking score under `mode`; plain fitness unless overridden
    fn score(&self, _mode: &FitnessMode) -> f64 {
        self.fitness() as f64
    }
}

impl Scored for SearchNode {
    fn fitness(&self) -> usize {
        SearchNode::fitness(self)
    }

    fn score(&self, mode: &FitnessMode) -> f64 {
        mode.score(self)
    }
}

/// Calibrated estimate of one resident node's memory cost
///
/// `bytes = bitmap_words * word_bytes + length * per_transition_bytes + per_node_overhead`
///
/// The constants are tunable; they only need to track real usage closely
/// enough to keep a frontier inside its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootprintModel {
    /// Bytes per 64-bit bitmap word
    pub word_bytes: u64,

    /// Bytes per stored transition
    pub per_transition_bytes: u64,

    /// Fixed cost per node (struct, vec headers, allocator slack)
    pub per_node_overhead: u64,
}

impl Default for FootprintModel {
    fn default() -> Self {
        Self {
            word_bytes: 8,
            per_transition_bytes: 1,
            per_node_overhead: 96,
        }
    }
}

impl FootprintModel {
    /// Estimated bytes for a node of `length` transitions in `Q_dimension`
    pub fn node_bytes(&self, dimension: usize, length: usize) -> u64 {
        let num_vertices = 1u64 << dimension;
        let num_words = (num_vertices + 63) / 64;
        num_words * self.word_bytes + length as u64 * self.per_transition_bytes + self.per_node_overhead
    }
}

/// How many nodes of `per_node_bytes` fit in `budget_bytes`
pub fn capacity(budget_bytes: u64, per_node_bytes: u64) -> usize {
    if per_node_bytes == 0 {
        return usize::MAX;
    }
    usize::try_from(budget_bytes / per_node_bytes).unwrap_or(usize::MAX)
}

/// Keep the fittest candidates that fit in the budget
///
/// Returns the input unchanged when it already fits. Otherwise keeps the
/// `floor(budget / per_node)` highest-fitness candidates; equal fitness is
/// decided by position in `candidates`. Survivors keep their original
/// relative order.
pub fn prune<T: Scored>(candidates: Vec<T>, budget_bytes: u64, per_node_bytes: u64) -> Vec<T> {
    prune_by(candidates, budget_bytes, per_node_bytes, |c| c.fitness() as f64)
}

/// [`prune`] with an explicit scoring function
///
/// Each candidate is scored once.
pub fn prune_by<T, F>(candidates: Vec<T>, budget_bytes: u64, per_node_bytes: u64, score: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    let keep = capacity(budget_bytes, per_node_bytes);
    if candidates.len() <= keep {
        return candidates;
    }
    if keep == 0 {
        return Vec::new();
    }

    let scores: Vec<f64> = candidates.iter().map(score).collect();

    // (score desc, index asc) is a total order, so the selection is deterministic
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    let rank = |a: &usize, b: &usize| scores[*b].total_cmp(&scores[*a]).then(a.cmp(b));
    order.select_nth_unstable_by(keep - 1, rank);

    let mut survivors = vec![false; candidates.len()];
    for &index in &order[..keep] {
        survivors[index] = true;
    }

    candidates
        .into_iter()
        .zip(survivors)
        .filter_map(|(candidate, kept)| kept.then_some(candidate))
        .collect()
}

/// Pruner bound to one memory budget and ranking mode
#[derive(Debug, Clone, Copy)]
pub struct FitnessPruner {
    budget_bytes: u64,
    mode: FitnessMode,
}

impl FitnessPruner {
    pub fn new(budget_bytes: u64) -> Self {
        Self {
            budget_bytes,
            mode: FitnessMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: FitnessMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn budget_bytes(&self) -> u64 {
        self.budget_bytes
    }

    pub fn mode(&self) -> FitnessMode {
        self.mode
    }

    /// Whether `count` nodes of `per_node_bytes` exceed the budget
    pub fn exceeds(&self, count: usize, per_node_bytes: u64) -> bool {
        (count as u64).saturating_mul(per_node_bytes) > self.budget_bytes
    }

    pub fn prune<T: Scored>(&self, candidates: Vec<T>, per_node_bytes: u64) -> Vec<T> {
        prune_by(candidates, self.budget_bytes, per_node_bytes, |c| c.score(&self.mode))
    }
}
