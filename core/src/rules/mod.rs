//! Move-generation rules for snake expansion
//!
//! A rule proposes candidate axes for extending a node. The engine then
//! keeps only the axes the node's bitmap actually allows.

pub mod canonical;

pub use canonical::*;

use crate::cube::{AxisSet, SearchNode};

/// Rule trait - every move generator implements this
pub trait MoveRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Axes this rule allows as the next transition of `node`
    ///
    /// Returned axes may still be blocked by occupancy.
    fn candidates(&self, node: &SearchNode) -> AxisSet;

    /// Candidates the node can actually take, ascending
    fn legal_moves(&self, node: &SearchNode) -> AxisSet {
        let mut legal = AxisSet::empty();
        for axis in self.candidates(node).iter() {
            if node.can_extend(axis as usize) {
                legal.insert(axis);
            }
        }
        legal
    }
}

/// Pick the move rule for a search
///
/// Fresh searches use plain canonical form. A primed search also opens the
/// axis added on top of the seed's hypercube.
pub fn rule_for(open_axis: Option<u8>) -> Box<dyn MoveRule> {
    match open_axis {
        Some(axis) => Box::new(PrimedCanonical::new(axis)),
        None => Box::new(Canonical),
    }
}
