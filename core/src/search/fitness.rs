//! Alternative fitness measures
//!
//! The default ranking is the free-vertex count cached on each node. The
//! measures here look at the shape of the free region instead:
//! - **unreachable**: free vertices the head can no longer reach
//! - **dead ends**: free vertices with exactly one free neighbour
//!
//! Both walk the whole bitmap, so they cost `O(2^n * n)` per node and are
//! only computed when selected through [`FitnessMode`].

use crate::cube::{BitState, SearchNode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Weights for [`FitnessEvaluator::combined_fitness`]
///
/// Negative weights penalise a measure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    pub unmarked: f64,
    pub dead_ends: f64,
    pub unreachable: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            unmarked: 1.0,
            dead_ends: -0.5,
            unreachable: 0.0,
        }
    }
}

/// How the pruner ranks a frontier
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FitnessMode {
    /// Free vertices once the head is sealed
    #[default]
    Unmarked,

    /// Weighted sum of unmarked count, dead ends and unreachable vertices
    Combined(FitnessWeights),
}

impl FitnessMode {
    /// Score `node` under this mode (higher is better)
    pub fn score(&self, node: &SearchNode) -> f64 {
        match self {
            FitnessMode::Unmarked => node.fitness() as f64,
            FitnessMode::Combined(weights) => FitnessEvaluator::new(node).combined_fitness(weights),
        }
    }
}

/// Shape measures for one node
pub struct FitnessEvaluator<'a> {
    node: &'a SearchNode,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(node: &'a SearchNode) -> Self {
        Self { node }
    }

    /// Same as [`SearchNode::fitness`]
    pub fn count_unmarked_vertices(&self) -> usize {
        self.node.fitness()
    }

    /// Free vertices not connected to the head through free vertices
    pub fn count_unreachable_vertices(&self) -> usize {
        let state = self.node.state();
        state.count_unmarked() - reachable_from(state, self.node.current_vertex())
    }

    pub fn count_dead_ends(&self) -> usize {
        dead_ends(self.node.state())
    }

    pub fn combined_fitness(&self, weights: &FitnessWeights) -> f64 {
        let mut score = weights.unmarked * self.count_unmarked_vertices() as f64;
        if weights.dead_ends != 0.0 {
            score += weights.dead_ends * self.count_dead_ends() as f64;
        }
        if weights.unreachable != 0.0 {
            score += weights.unreachable * self.count_unreachable_vertices() as f64;
        }
        score
    }
}

/// Flood fill over free vertices, starting from the free neighbours of `head`
fn reachable_from(state: &BitState, head: usize) -> usize {
    let dimension = state.dimension();
    // visited vertices get marked in a scratch copy
    let mut seen = state.clone();
    let mut queue = VecDeque::new();
    let mut reached = 0;

    seen.mark(head);
    queue.push_back(head);
    while let Some(vertex) = queue.pop_front() {
        for axis in 0..dimension {
            let next = vertex ^ (1usize << axis);
            if !seen.is_marked(next) {
                seen.mark(next);
                reached += 1;
                queue.push_back(next);
            }
        }
    }
    reached
}

fn dead_ends(state: &BitState) -> usize {
    (0..state.num_vertices())
        .filter(|&v| !state.is_marked(v) && state.count_unmarked_neighbors(v) == 1)
        .count()
}
