//! Search module - beam search over canonical snakes
//!
//! - **beam**: level-by-level engine with a memory budget
//! - **scoring**: fitness ranking and footprint-driven pruning
//! - **fitness**: shape-aware fitness measures (dead ends, unreachable vertices)
//! - **parallel**: sharded expansion of one level
//! - **priming**: extending a known snake into higher dimensions

pub mod beam;
pub mod fitness;
pub mod parallel;
pub mod priming;
pub mod scoring;

pub use beam::*;
pub use fitness::{FitnessEvaluator, FitnessMode, FitnessWeights};
pub use parallel::ParallelCoordinator;
pub use priming::*;
pub use scoring::*;
