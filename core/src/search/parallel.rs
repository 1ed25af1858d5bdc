//! Data-parallel level expansion
//!
//! A level is split into contiguous shards. Each worker expands its shard on
//! its own (shard in, children + local best out) and never touches shared
//! mutable state. After the barrier the shards are merged in shard order,
//! so the merged frontier and the chosen best are identical to a
//! single-threaded expansion of the same level.

use crate::cube::SearchNode;
use crate::error::{SearchError, SearchResultOf};
use crate::rules::MoveRule;
use rayon::prelude::*;

/// Children produced from one slice of a frontier
#[derive(Debug, Default)]
pub struct ShardOutcome {
    /// Children in traversal order (parent index asc, then axis asc)
    pub children: Vec<SearchNode>,

    /// Index into `children` of the first longest child
    pub best: Option<usize>,
}

impl ShardOutcome {
    pub fn best_node(&self) -> Option<&SearchNode> {
        self.best.map(|i| &self.children[i])
    }
}

/// Expand every node of `shard` under `rule`
///
/// Pure: reads the shard, returns fresh children. The local best is the
/// earliest child of maximal length.
pub fn expand_shard(shard: &[SearchNode], rule: &dyn MoveRule) -> SearchResultOf<ShardOutcome> {
    let mut children: Vec<SearchNode> = Vec::new();
    let mut best: Option<usize> = None;

    for node in shard {
        let moves = rule.legal_moves(node);
        children
            .try_reserve(moves.len())
            .map_err(|_| SearchError::AllocationFailed {
                stage: "expand_shard",
                structure: "children",
            })?;

        for axis in moves.iter() {
            let child = node.try_create_child(axis as usize)?;
            let improves = match best {
                Some(b) => child.length() > children[b].length(),
                None => true,
            };
            if improves {
                best = Some(children.len());
            }
            children.push(child);
        }
    }

    Ok(ShardOutcome { children, best })
}

/// Concatenate shard outcomes in shard order and reduce their bests
///
/// A later shard only replaces the running best with a strictly longer
/// child, which reproduces the sequential tie-break across shard borders.
pub fn merge_shards(shards: Vec<ShardOutcome>) -> SearchResultOf<ShardOutcome> {
    let total: usize = shards.iter().map(|s| s.children.len()).sum();
    let mut children: Vec<SearchNode> = Vec::new();
    children
        .try_reserve_exact(total)
        .map_err(|_| SearchError::AllocationFailed {
            stage: "merge_shards",
            structure: "next frontier",
        })?;

    let mut best: Option<usize> = None;
    for shard in shards {
        let offset = children.len();
        if let Some(local) = shard.best {
            let candidate_len = shard.children[local].length();
            let improves = match best {
                Some(b) => candidate_len > children[b].length(),
                None => true,
            };
            if improves {
                best = Some(offset + local);
            }
        }
        children.extend(shard.children);
    }

    Ok(ShardOutcome { children, best })
}

/// Splits each level across a fixed pool of workers
pub struct ParallelCoordinator {
    workers: usize,
    pool: Option<rayon::ThreadPool>,
}

impl ParallelCoordinator {
    /// Create a coordinator with `workers` threads
    ///
    /// One worker runs inline on the calling thread, with no pool.
    pub fn new(workers: usize) -> SearchResultOf<Self> {
        if workers == 0 {
            return Err(SearchError::WorkerPool(
                "worker count must be >= 1".to_string(),
            ));
        }

        let pool = if workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("snakebox-worker-{}", i))
                .build()
                .map_err(|e| SearchError::WorkerPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        Ok(Self { workers, pool })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Shard size giving each worker one contiguous slice
    pub fn shard_size(&self, frontier_len: usize) -> usize {
        ((frontier_len + self.workers - 1) / self.workers).max(1)
    }

    /// Expand a whole level and merge the shards
    ///
    /// Any worker error aborts the level; nothing is merged.
    pub fn expand_level(
        &self,
        frontier: &[SearchNode],
        rule: &dyn MoveRule,
    ) -> SearchResultOf<ShardOutcome> {
        let Some(pool) = &self.pool else {
            return expand_shard(frontier, rule);
        };
        if frontier.len() < 2 {
            return expand_shard(frontier, rule);
        }

        let shard_size = self.shard_size(frontier.len());
        let shards: Vec<ShardOutcome> = pool.install(|| {
            frontier
                .par_chunks(shard_size)
                .map(|shard| expand_shard(shard, rule))
                .collect::<SearchResultOf<Vec<_>>>()
        })?;

        merge_shards(shards)
    }
}
