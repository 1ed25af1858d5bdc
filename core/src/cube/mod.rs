//! Hypercube representation for snake search
//!
//! This module provides the core data structures the search operates on:
//! - **bitstate**: packed bitmap over the `2^n` vertices of `Q_n`
//! - **axis_set**: compact set of axes (bit positions) used by a snake
//! - **node**: immutable search node (transitions + derived bitmap + fitness)
//! - **transitions**: vertex/transition conversion and snake validation
//!
//! # Example
//!
//! ```rust
//! use snakebox_core::cube::*;
//!
//! let root = SearchNode::root(3).unwrap();
//! assert_eq!(root.fitness(), 8 - 1 - 3);
//!
//! let child = root.create_child(0);
//! assert_eq!(child.current_vertex(), 1);
//! assert_eq!(child.length(), 1);
//!
//! let vertices = transitions_to_vertices(&[0, 1, 2, 0]);
//! assert_eq!(vertices, vec![0, 1, 3, 7, 6]);
//! assert!(validate_snake(&vertices).is_ok());
//! ```

mod axis_set;
mod bitstate;
mod node;
mod transitions;

/// Largest hypercube dimension the bitmap representation accepts
pub const MAX_DIMENSION: usize = 30;

pub use axis_set::AxisSet;
pub use bitstate::BitState;
pub use node::SearchNode;
pub use transitions::{
    current_vertex, detect_dimension, format_hex_transitions, hamming_distance,
    parse_hex_transitions, transitions_to_vertices, validate_snake, validate_transitions,
    vertices_to_transitions, SnakeViolation,
};

use crate::error::{SearchError, SearchResultOf};

/// Check that `dimension` is usable for a hypercube bitmap
pub fn check_dimension(dimension: usize) -> SearchResultOf<()> {
    if dimension < 1 {
        return Err(SearchError::InvalidDimension {
            dimension,
            reason: "dimension must be >= 1".to_string(),
        });
    }
    if dimension > MAX_DIMENSION {
        return Err(SearchError::InvalidDimension {
            dimension,
            reason: format!("dimension must be <= {}", MAX_DIMENSION),
        });
    }
    Ok(())
}
