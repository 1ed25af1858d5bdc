//! Error types shared by every search entry point

use thiserror::Error;

/// Errors that can occur while building or running a snake search
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid dimension {dimension}: {reason}")]
    InvalidDimension { dimension: usize, reason: String },

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Memory budget of {budget_bytes} bytes cannot hold a single node ({node_bytes} bytes)")]
    BudgetTooSmall { budget_bytes: u64, node_bytes: u64 },

    #[error("Vertex {vertex} out of range [0, {num_vertices})")]
    IndexOutOfRange { vertex: usize, num_vertices: usize },

    #[error("Cannot extend snake along axis {axis}: next vertex {vertex} is already marked")]
    IllegalExtension { axis: usize, vertex: usize },

    #[error("No extension found from dimension {source_dim} to {target_dim} after {attempts} attempts")]
    NoExtensionFound {
        source_dim: usize,
        target_dim: usize,
        attempts: usize,
    },

    #[error("Priming stopped after {limit} engine runs without reaching dimension {target_dim}")]
    IterationLimit { limit: usize, target_dim: usize },

    #[error("Allocation failed at {stage} while growing {structure}")]
    AllocationFailed {
        stage: &'static str,
        structure: &'static str,
    },

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for search operations
pub type SearchResultOf<T> = Result<T, SearchError>;
