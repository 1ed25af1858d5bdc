//! Snakebox Core
//!
//! Memory-bounded beam search for long snakes (induced paths) in the
//! n-dimensional hypercube, with dimension priming and parallel expansion

pub mod error;
pub mod cube;    // Hypercube bitmap, search nodes, transition utilities
pub mod rules;   // Move generation (canonical form)
pub mod search;  // Beam search, pruning, priming, parallel expansion
pub mod loader;  // Seed and config loaders

pub use error::{SearchError, SearchResultOf};
pub use cube::{BitState, SearchNode, SnakeViolation};
pub use rules::{Canonical, MoveRule, PrimedCanonical};
pub use search::{
    BeamConfig, BeamSearchEngine, FitnessMode, FitnessPruner, FitnessWeights, FootprintModel,
    ParallelCoordinator, PrimingConfig, PrimingOutcome, PrimingSeeder, SearchResult, SearchStats,
    Termination,
};
pub use loader::{load_config, load_seed, SeedFile};
