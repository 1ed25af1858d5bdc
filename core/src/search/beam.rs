//! Beam search implementation
//!
//! Level-by-level expansion of canonical snakes. Each level is expanded in
//! full, then pruned by fitness if its estimated footprint exceeds the
//! memory budget. The search ends when a level produces no children.
//!
//! Only two levels are ever resident: the frontier being expanded and the
//! children it produces. The best node so far is an explicit accumulator.

use crate::cube::{check_dimension, transitions_to_vertices, validate_transitions, SearchNode};
use crate::error::{SearchError, SearchResultOf};
use crate::rules::{rule_for, MoveRule};
use crate::search::fitness::FitnessMode;
use crate::search::parallel::ParallelCoordinator;
use crate::search::scoring::{FitnessPruner, FootprintModel};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Beam search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    /// Memory budget for one resident frontier
    pub memory_budget_bytes: u64,

    /// Number of expansion workers (1 = single-threaded)
    pub workers: usize,

    /// Maximum number of levels per run (None = until exhausted)
    pub max_levels: Option<usize>,

    /// Per-node memory estimate
    pub footprint: FootprintModel,

    /// Ranking used when a level has to be pruned
    pub fitness: FitnessMode,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            memory_budget_bytes: 1 << 30,
            workers: 1,
            max_levels: None,
            footprint: FootprintModel::default(),
            fitness: FitnessMode::default(),
        }
    }
}

impl BeamConfig {
    /// Set the budget in (binary) gigabytes
    pub fn with_budget_gb(mut self, gigabytes: f64) -> Self {
        self.memory_budget_bytes = (gigabytes.max(0.0) * BYTES_PER_GB) as u64;
        self
    }

    pub fn with_budget_bytes(mut self, bytes: u64) -> Self {
        self.memory_budget_bytes = bytes;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = Some(max_levels);
        self
    }

    pub fn with_fitness(mut self, fitness: FitnessMode) -> Self {
        self.fitness = fitness;
        self
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// A level produced no children
    Exhausted,

    /// `max_levels` was reached
    LevelLimit,
}

/// Counters collected during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Levels expanded
    pub levels: usize,

    /// Children created across all levels
    pub nodes_generated: u64,

    /// Nodes discarded by fitness pruning
    pub nodes_pruned: u64,

    /// Levels that needed pruning
    pub prune_events: usize,

    /// Widest frontier kept after pruning
    pub peak_frontier: usize,

    /// Wall-clock time of the run
    pub elapsed_ms: u128,

    pub termination: Termination,
}

impl Default for SearchStats {
    fn default() -> Self {
        Self {
            levels: 0,
            nodes_generated: 0,
            nodes_pruned: 0,
            prune_events: 0,
            peak_frontier: 0,
            elapsed_ms: 0,
            termination: Termination::Exhausted,
        }
    }
}

impl SearchStats {
    /// Fold another run's counters into this one
    pub fn absorb(&mut self, other: &SearchStats) {
        self.levels += other.levels;
        self.nodes_generated += other.nodes_generated;
        self.nodes_pruned += other.nodes_pruned;
        self.prune_events += other.prune_events;
        self.peak_frontier = self.peak_frontier.max(other.peak_frontier);
        self.elapsed_ms += other.elapsed_ms;
        self.termination = other.termination;
    }
}

/// Search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Transitions of the best snake found
    pub transitions: Vec<u8>,

    /// Hypercube dimension searched
    pub dimension: usize,

    /// Number of edges (= transitions.len())
    pub length: usize,

    /// Fitness of the best node
    pub final_fitness: usize,

    /// Run counters
    pub stats: SearchStats,
}

impl SearchResult {
    pub fn from_node(node: SearchNode, stats: SearchStats) -> Self {
        let dimension = node.dimension();
        let length = node.length();
        let final_fitness = node.fitness();
        Self {
            transitions: node.into_transitions(),
            dimension,
            length,
            final_fitness,
            stats,
        }
    }

    /// Vertex sequence of the snake (XOR-fold of the transitions)
    pub fn vertices(&self) -> Vec<usize> {
        transitions_to_vertices(&self.transitions)
    }

    /// Write the result as pretty JSON
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> SearchResultOf<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a result written by [`SearchResult::to_json_file`]
    ///
    /// The snake is re-validated against its dimension, so a loaded result
    /// is always safe to turn into vertices.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> SearchResultOf<Self> {
        let contents = fs::read_to_string(path)?;
        let result: Self = serde_json::from_str(&contents)?;
        check_dimension(result.dimension)?;
        if result.length != result.transitions.len() {
            return Err(SearchError::InvalidSeed(format!(
                "length {} does not match {} transitions",
                result.length,
                result.transitions.len()
            )));
        }
        validate_transitions(&result.transitions, result.dimension)?;
        Ok(result)
    }
}

/// Beam search engine
///
/// The worker pool is built on first use and reused by every later run.
pub struct BeamSearchEngine {
    config: BeamConfig,
    coordinator: OnceLock<ParallelCoordinator>,
}

impl BeamSearchEngine {
    /// Create a new engine
    pub fn new(config: BeamConfig) -> Self {
        Self {
            config,
            coordinator: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &BeamConfig {
        &self.config
    }

    fn coordinator(&self) -> SearchResultOf<&ParallelCoordinator> {
        if let Some(coordinator) = self.coordinator.get() {
            return Ok(coordinator);
        }
        let built = ParallelCoordinator::new(self.config.workers)?;
        Ok(self.coordinator.get_or_init(|| built))
    }

    /// Fresh search in `Q_dimension`, starting from the empty snake
    pub fn search(&self, dimension: usize) -> SearchResultOf<SearchResult> {
        check_dimension(dimension)?;
        let root = SearchNode::root(dimension)?;
        let (best, stats) = self.run(root, rule_for(None).as_ref())?;
        Ok(SearchResult::from_node(best, stats))
    }

    /// Search in `Q_dimension` continuing from a known snake
    pub fn search_seeded(&self, seed: &[u8], dimension: usize) -> SearchResultOf<SearchResult> {
        check_dimension(dimension)?;
        let start = SearchNode::from_transitions(seed, dimension)?;
        let (best, stats) = self.run(start, rule_for(None).as_ref())?;
        Ok(SearchResult::from_node(best, stats))
    }

    /// Run the level loop from `start` under `rule`
    ///
    /// Returns the best node seen (possibly `start` itself) and the run
    /// counters. Fails before any expansion if the budget cannot hold
    /// `start`.
    pub fn run(
        &self,
        start: SearchNode,
        rule: &dyn MoveRule,
    ) -> SearchResultOf<(SearchNode, SearchStats)> {
        let dimension = start.dimension();
        let footprint = self.config.footprint;
        let budget = self.config.memory_budget_bytes;

        let start_bytes = footprint.node_bytes(dimension, start.length());
        if budget < start_bytes {
            return Err(SearchError::BudgetTooSmall {
                budget_bytes: budget,
                node_bytes: start_bytes,
            });
        }

        let coordinator = self.coordinator()?;
        let pruner = FitnessPruner::new(budget).with_mode(self.config.fitness);
        let timer = Instant::now();

        info!(
            "Starting search: dimension={}, seed_length={}, budget={} bytes, workers={}, rule={}",
            dimension,
            start.length(),
            budget,
            coordinator.workers(),
            rule.id()
        );

        let mut stats = SearchStats::default();
        let mut best = start.clone();
        let mut frontier = vec![start];

        loop {
            if let Some(limit) = self.config.max_levels {
                if stats.levels >= limit {
                    stats.termination = Termination::LevelLimit;
                    break;
                }
            }

            let outcome = coordinator.expand_level(&frontier, rule)?;
            if outcome.children.is_empty() {
                stats.termination = Termination::Exhausted;
                break;
            }

            stats.levels += 1;
            stats.nodes_generated += outcome.children.len() as u64;

            if let Some(candidate) = outcome.best_node() {
                if candidate.length() > best.length() {
                    best = candidate.clone();
                    info!("Level {}: new best length {}", stats.levels, best.length());
                }
            }

            let mut next = outcome.children;
            let level_length = next.iter().map(SearchNode::length).max().unwrap_or(0);
            let per_node = footprint.node_bytes(dimension, level_length);

            if pruner.exceeds(next.len(), per_node) {
                let before = next.len();
                next = pruner.prune(next, per_node);
                let dropped = before - next.len();
                stats.nodes_pruned += dropped as u64;
                stats.prune_events += 1;
                warn!(
                    "Level {}: pruned {} of {} nodes to fit {} bytes",
                    stats.levels,
                    dropped,
                    before,
                    pruner.budget_bytes()
                );
            }

            stats.peak_frontier = stats.peak_frontier.max(next.len());
            debug!(
                "Level {}: {} nodes, best length {}",
                stats.levels,
                next.len(),
                best.length()
            );

            // the expanded level is dropped here
            frontier = next;
        }

        stats.elapsed_ms = timer.elapsed().as_millis();
        info!(
            "Search finished ({:?}): length {}, {} levels, {} nodes generated, {} ms",
            stats.termination,
            best.length(),
            stats.levels,
            stats.nodes_generated,
            stats.elapsed_ms
        );

        Ok((best, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_creation() {
        let engine = BeamSearchEngine::new(BeamConfig::default());
        assert_eq!(engine.config().workers, 1);
    }

    #[test]
    fn test_dimension_one() {
        let engine = BeamSearchEngine::new(BeamConfig::default());
        let result = engine.search(1).unwrap();
        assert_eq!(result.transitions, vec![0]);
        assert_eq!(result.length, 1);
    }

    #[test]
    fn test_dimension_two() {
        let engine = BeamSearchEngine::new(BeamConfig::default());
        let result = engine.search(2).unwrap();
        assert_eq!(result.transitions, vec![0, 1]);
        assert_eq!(result.final_fitness, 0);
    }

    #[test]
    fn test_dimension_three() {
        let engine = BeamSearchEngine::new(BeamConfig::default());
        let result = engine.search(3).unwrap();
        assert_eq!(result.length, 4);
        assert_eq!(result.transitions, vec![0, 1, 2, 0]);
        assert_eq!(result.vertices(), vec![0, 1, 3, 7, 6]);
        assert_eq!(result.stats.termination, Termination::Exhausted);
    }

    #[test]
    fn test_invalid_dimension() {
        let engine = BeamSearchEngine::new(BeamConfig::default());
        assert!(matches!(
            engine.search(0),
            Err(SearchError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_budget_too_small() {
        let config = BeamConfig::default().with_budget_bytes(10);
        let engine = BeamSearchEngine::new(config);
        assert!(matches!(
            engine.search(5),
            Err(SearchError::BudgetTooSmall { budget_bytes: 10, .. })
        ));
    }

    #[test]
    fn test_respects_max_levels() {
        let config = BeamConfig::default().with_max_levels(3);
        let engine = BeamSearchEngine::new(config);
        let result = engine.search(6).unwrap();
        assert_eq!(result.length, 3);
        assert_eq!(result.stats.levels, 3);
        assert_eq!(result.stats.termination, Termination::LevelLimit);
    }

    #[test]
    fn test_pruning_keeps_frontier_in_budget() {
        let footprint = FootprintModel::default();
        let per_node = footprint.node_bytes(6, 64);
        let config = BeamConfig::default().with_budget_bytes(per_node * 8);
        let engine = BeamSearchEngine::new(config);
        let result = engine.search(6).unwrap();

        assert!(result.stats.peak_frontier <= 8 * 2);
        assert!(result.stats.prune_events > 0);
        assert!(validate_transitions(&result.transitions, 6).is_ok());
    }

    #[test]
    fn test_seeded_search_never_shrinks() {
        let engine = BeamSearchEngine::new(BeamConfig::default());
        let result = engine.search_seeded(&[0, 1, 2, 0], 4).unwrap();
        assert!(result.length >= 4);
        assert_eq!(&result.transitions[..4], &[0, 1, 2, 0]);
        assert!(validate_transitions(&result.transitions, 4).is_ok());
    }

    #[test]
    fn test_seeded_search_rejects_bad_seed() {
        let engine = BeamSearchEngine::new(BeamConfig::default());
        assert!(matches!(
            engine.search_seeded(&[0, 1, 0], 3),
            Err(SearchError::InvalidSeed(_))
        ));
    }

    #[test]
    fn test_with_budget_gb() {
        let config = BeamConfig::default().with_budget_gb(0.5);
        assert_eq!(config.memory_budget_bytes, 1 << 29);
    }

    #[test]
    fn test_result_json_roundtrip() {
        let engine = BeamSearchEngine::new(BeamConfig::default());
        let result = engine.search(4).unwrap();

        let path = std::env::temp_dir().join("snakebox_beam_roundtrip.json");
        result.to_json_file(&path).unwrap();
        let reloaded = SearchResult::from_json_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(result, reloaded);
    }

    #[test]
    fn test_from_json_file_rejects_out_of_range_axis() {
        let path = std::env::temp_dir().join("snakebox_beam_bad_axis.json");
        let mut result = BeamSearchEngine::new(BeamConfig::default()).search(3).unwrap();
        result.transitions[2] = 70;
        result.to_json_file(&path).unwrap();

        let loaded = SearchResult::from_json_file(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(loaded, Err(SearchError::InvalidSeed(_))));
    }

    #[test]
    fn test_from_json_file_rejects_length_mismatch() {
        let path = std::env::temp_dir().join("snakebox_beam_bad_length.json");
        let mut result = BeamSearchEngine::new(BeamConfig::default()).search(3).unwrap();
        result.length = 9;
        result.to_json_file(&path).unwrap();

        let loaded = SearchResult::from_json_file(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(loaded, Err(SearchError::InvalidSeed(_))));
    }

    #[test]
    fn test_worker_pool_built_once() {
        let engine = BeamSearchEngine::new(BeamConfig::default().with_workers(3));
        engine.search(4).unwrap();
        let first = engine.coordinator().unwrap() as *const ParallelCoordinator;
        engine.search(5).unwrap();
        let second = engine.coordinator().unwrap() as *const ParallelCoordinator;
        assert_eq!(first, second);
        assert_eq!(engine.coordinator().unwrap().workers(), 3);
    }

    #[test]
    fn test_zero_workers_fails_before_search() {
        let engine = BeamSearchEngine::new(BeamConfig::default().with_workers(0));
        assert!(matches!(engine.search(4), Err(SearchError::WorkerPool(_))));
    }

    #[test]
    fn test_combined_fitness_search() {
        use crate::search::fitness::FitnessWeights;

        let footprint = FootprintModel::default();
        let config = BeamConfig::default()
            .with_budget_bytes(footprint.node_bytes(6, 64) * 8)
            .with_fitness(FitnessMode::Combined(FitnessWeights::default()));
        let result = BeamSearchEngine::new(config).search(6).unwrap();

        assert!(result.stats.prune_events > 0);
        assert!(result.length > 0);
        assert!(validate_transitions(&result.transitions, 6).is_ok());
    }
}
