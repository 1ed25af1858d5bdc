//! Dimension extension ("priming")
//!
//! A good snake from `Q_s` is replayed inside `Q_{s+1}` and the beam search
//! continues from its head, with the new axis `s` always open. Repeating
//! this one dimension at a time reaches dimensions where a search from the
//! empty snake would be hopeless.
//!
//! When the full seed cannot be extended, shorter prefixes are tried; the
//! first prefix whose search beats the seed's length wins.

use crate::cube::{check_dimension, validate_transitions, SearchNode};
use crate::error::{SearchError, SearchResultOf};
use crate::rules::rule_for;
use crate::search::beam::{BeamConfig, BeamSearchEngine, SearchResult, SearchStats};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Priming configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimingConfig {
    /// Engine settings for every dimension step
    pub beam: BeamConfig,

    /// Prefix lengths to retry from, as fractions of the seed, tried in order
    pub fallback_ratios: Vec<f64>,

    /// Maximum engine runs across the whole extension (None = unbounded)
    pub max_iterations: Option<usize>,
}

impl Default for PrimingConfig {
    fn default() -> Self {
        Self {
            beam: BeamConfig::default(),
            fallback_ratios: vec![0.95, 0.90, 0.85, 0.80, 0.75],
            max_iterations: None,
        }
    }
}

/// One completed dimension step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimingStep {
    pub from_dimension: usize,
    pub to_dimension: usize,

    /// Length of the snake handed into this step
    pub seed_length: usize,

    /// Length of the node the successful run started from
    pub start_length: usize,

    pub result_length: usize,

    /// Prefix ratio used, if the full seed could not be extended
    pub fallback_ratio: Option<f64>,
}

/// Final snake plus the per-dimension history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimingOutcome {
    pub result: SearchResult,
    pub steps: Vec<PrimingStep>,
}

/// Drives the beam search across successive dimensions
pub struct PrimingSeeder {
    config: PrimingConfig,
    engine: BeamSearchEngine,
}

impl PrimingSeeder {
    pub fn new(config: PrimingConfig) -> Self {
        let engine = BeamSearchEngine::new(config.beam.clone());
        Self { config, engine }
    }

    pub fn config(&self) -> &PrimingConfig {
        &self.config
    }

    /// Extend `seed` (a snake in `Q_source_dim`) up to `Q_target_dim`
    ///
    /// Every step must beat the length of the snake it was given, so the
    /// result is never shorter than `seed`.
    pub fn extend(
        &self,
        seed: &[u8],
        source_dim: usize,
        target_dim: usize,
    ) -> SearchResultOf<PrimingOutcome> {
        check_dimension(source_dim)?;
        check_dimension(target_dim)?;
        if target_dim <= source_dim {
            return Err(SearchError::InvalidDimension {
                dimension: target_dim,
                reason: format!("target must exceed source dimension {}", source_dim),
            });
        }
        validate_transitions(seed, source_dim)?;

        // the last step starts from at least the seed, inside Q_target
        let footprint = self.config.beam.footprint;
        let largest_start = footprint.node_bytes(target_dim, seed.len());
        if self.config.beam.memory_budget_bytes < largest_start {
            return Err(SearchError::BudgetTooSmall {
                budget_bytes: self.config.beam.memory_budget_bytes,
                node_bytes: largest_start,
            });
        }

        info!(
            "Priming from dimension {} (length {}) to {}",
            source_dim,
            seed.len(),
            target_dim
        );

        let mut runs = 0usize;
        let mut stats = SearchStats::default();
        let mut steps = Vec::with_capacity(target_dim - source_dim);
        let mut current = seed.to_vec();
        let mut best: Option<SearchNode> = None;

        for dimension in source_dim + 1..=target_dim {
            let (node, step) = self.extend_one(&current, dimension, &mut runs, &mut stats)?;
            info!(
                "Extended to dimension {}: length {} -> {}",
                dimension, step.seed_length, step.result_length
            );
            current = node.transitions().to_vec();
            steps.push(step);
            best = Some(node);
        }

        let node = match best {
            Some(node) => node,
            None => SearchNode::from_transitions(&current, target_dim)?,
        };
        Ok(PrimingOutcome {
            result: SearchResult::from_node(node, stats),
            steps,
        })
    }

    /// Push `seed` one dimension up, falling back to prefixes if needed
    fn extend_one(
        &self,
        seed: &[u8],
        dimension: usize,
        runs: &mut usize,
        stats: &mut SearchStats,
    ) -> SearchResultOf<(SearchNode, PrimingStep)> {
        let rule = rule_for(Some((dimension - 1) as u8));
        let mut attempts = 0usize;

        let mut tried: Vec<usize> = Vec::new();
        let starts = std::iter::once((seed.len(), None)).chain(
            self.config
                .fallback_ratios
                .iter()
                .map(|&ratio| (prefix_length(seed.len(), ratio), Some(ratio))),
        );

        for (length, ratio) in starts {
            if ratio.is_some() && (length == 0 || length >= seed.len()) {
                continue;
            }
            if tried.contains(&length) {
                continue;
            }
            tried.push(length);

            if let Some(limit) = self.config.max_iterations {
                if *runs >= limit {
                    return Err(SearchError::IterationLimit {
                        limit,
                        target_dim: dimension,
                    });
                }
            }
            *runs += 1;
            attempts += 1;

            if let Some(ratio) = ratio {
                warn!(
                    "No extension of length-{} seed in dimension {}, retrying from {:.0}% prefix (length {})",
                    seed.len(),
                    dimension,
                    ratio * 100.0,
                    length
                );
            }

            let start = SearchNode::from_transitions(&seed[..length], dimension)?;
            let (node, run_stats) = self.engine.run(start, rule.as_ref())?;
            stats.absorb(&run_stats);

            if node.length() > seed.len() {
                let step = PrimingStep {
                    from_dimension: dimension - 1,
                    to_dimension: dimension,
                    seed_length: seed.len(),
                    start_length: length,
                    result_length: node.length(),
                    fallback_ratio: ratio,
                };
                return Ok((node, step));
            }
        }

        Err(SearchError::NoExtensionFound {
            source_dim: dimension - 1,
            target_dim: dimension,
            attempts,
        })
    }
}

/// `floor(length * ratio)`
fn prefix_length(length: usize, ratio: f64) -> usize {
    (length as f64 * ratio).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn best_snake(dimension: usize) -> Vec<u8> {
        BeamSearchEngine::new(BeamConfig::default())
            .search(dimension)
            .unwrap()
            .transitions
    }

    #[test]
    fn test_prefix_length() {
        assert_eq!(prefix_length(188, 0.95), 178);
        assert_eq!(prefix_length(10, 0.75), 7);
        assert_eq!(prefix_length(1, 0.5), 0);
    }

    #[test]
    fn test_extend_one_dimension() {
        let seed = best_snake(4);
        let seeder = PrimingSeeder::new(PrimingConfig::default());
        let outcome = seeder.extend(&seed, 4, 5).unwrap();

        assert!(outcome.result.length > seed.len());
        assert_eq!(outcome.result.dimension, 5);
        assert_eq!(&outcome.result.transitions[..seed.len()], &seed[..]);
        assert!(validate_transitions(&outcome.result.transitions, 5).is_ok());
        assert_eq!(outcome.steps.len(), 1);
        assert_eq!(outcome.steps[0].fallback_ratio, None);
    }

    #[test]
    fn test_extend_several_dimensions() {
        let seed = best_snake(3);
        let config = PrimingConfig {
            beam: BeamConfig::default().with_budget_bytes(256 * 1024),
            ..PrimingConfig::default()
        };
        let outcome = PrimingSeeder::new(config).extend(&seed, 3, 6).unwrap();

        assert_eq!(outcome.steps.len(), 3);
        assert!(outcome.result.length > seed.len());
        assert!(validate_transitions(&outcome.result.transitions, 6).is_ok());
        for pair in outcome.steps.windows(2) {
            assert_eq!(pair[1].seed_length, pair[0].result_length);
        }
    }

    #[test]
    fn test_extend_from_empty_seed() {
        let seeder = PrimingSeeder::new(PrimingConfig::default());
        let outcome = seeder.extend(&[], 2, 3).unwrap();
        assert_eq!(outcome.result.length, 4);
    }

    #[test]
    fn test_rejects_target_not_above_source() {
        let seeder = PrimingSeeder::new(PrimingConfig::default());
        assert!(matches!(
            seeder.extend(&[0, 1], 3, 3),
            Err(SearchError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_budget_checked_against_target_dimension() {
        let seed = best_snake(5);
        assert_eq!(seed.len(), 13);
        let footprint = BeamConfig::default().footprint;
        // enough for Q6 nodes of this length, not for Q7
        let budget = footprint.node_bytes(6, 13) + 3;
        let config = PrimingConfig {
            beam: BeamConfig::default().with_budget_bytes(budget),
            ..PrimingConfig::default()
        };
        let seeder = PrimingSeeder::new(config);

        match seeder.extend(&seed, 5, 7) {
            Err(SearchError::BudgetTooSmall { budget_bytes, node_bytes }) => {
                assert_eq!(budget_bytes, budget);
                assert_eq!(node_bytes, footprint.node_bytes(7, 13));
            }
            other => panic!("expected BudgetTooSmall, got {:?}", other),
        }

        // the same budget is fine for a single step into Q6
        let outcome = seeder.extend(&seed, 5, 6).unwrap();
        assert!(outcome.result.length > 13);
    }

    #[test]
    fn test_rejects_invalid_seed() {
        let seeder = PrimingSeeder::new(PrimingConfig::default());
        // 0,1,3,2 closes a square
        assert!(matches!(
            seeder.extend(&[0, 1, 0], 3, 4),
            Err(SearchError::InvalidSeed(_))
        ));
        // axis 3 does not exist in Q3
        assert!(matches!(
            seeder.extend(&[0, 1, 3], 3, 4),
            Err(SearchError::InvalidSeed(_))
        ));
    }

    #[test]
    fn test_iteration_limit() {
        let config = PrimingConfig {
            max_iterations: Some(1),
            ..PrimingConfig::default()
        };
        let seeder = PrimingSeeder::new(config);
        let seed = best_snake(3);
        assert!(matches!(
            seeder.extend(&seed, 3, 5),
            Err(SearchError::IterationLimit { limit: 1, target_dim: 5 })
        ));
    }

    #[test]
    fn test_fallback_exhaustion_reports_attempts() {
        // zero levels per run: the full seed and the one prefix both fail
        let config = PrimingConfig {
            beam: BeamConfig::default().with_max_levels(0),
            fallback_ratios: vec![0.5],
            max_iterations: None,
        };
        let seeder = PrimingSeeder::new(config);
        let seed = best_snake(4);
        match seeder.extend(&seed, 4, 5) {
            Err(SearchError::NoExtensionFound { source_dim, target_dim, attempts }) => {
                assert_eq!((source_dim, target_dim), (4, 5));
                assert_eq!(attempts, 2);
            }
            other => panic!("expected NoExtensionFound, got {:?}", other),
        }
    }
}
