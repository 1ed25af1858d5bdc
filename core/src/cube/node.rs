//! Immutable search node: one candidate snake
//!
//! A node owns its transition sequence, the bitmap derived from it and a
//! cached fitness. The bitmap marks:
//! - every vertex on the snake
//! - every neighbour of every snake vertex except the head
//!
//! The head's neighbourhood is sealed when the snake moves on, so a free bit
//! next to the head is exactly a legal next step. [`SearchNode::sealed_state`]
//! returns the fully closed set (path plus all neighbours of the path), and
//! fitness is the number of free vertices in that closed set.

use super::{check_dimension, AxisSet, BitState};
use crate::error::{SearchError, SearchResultOf};

/// A snake candidate in the search frontier
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Hypercube dimension
    dimension: usize,

    /// Axis flipped at each step, in traversal order
    transitions: Vec<u8>,

    /// Occupied/forbidden vertices (head neighbourhood still open)
    state: BitState,

    /// Vertex at the end of the snake
    head: usize,

    /// Distinct axes used by `transitions`
    used_axes: AxisSet,

    /// Free vertices once the head's neighbourhood is sealed
    fitness: usize,
}

impl SearchNode {
    /// The empty snake sitting at vertex 0
    pub fn root(dimension: usize) -> SearchResultOf<Self> {
        let mut state = BitState::new(dimension)?;
        state.mark(0);
        let fitness = sealed_fitness(&state, 0);
        Ok(Self {
            dimension,
            transitions: Vec::new(),
            state,
            head: 0,
            used_axes: AxisSet::empty(),
            fitness,
        })
    }

    /// Build a node for `dimension` by replaying an existing transition sequence
    ///
    /// The sequence may come from a smaller hypercube (priming); it is
    /// replayed into a bitmap sized for `dimension`. Replay doubles as
    /// validation: any step onto a marked vertex breaks the snake rules and
    /// is reported as [`SearchError::InvalidSeed`].
    pub fn from_transitions(transitions: &[u8], dimension: usize) -> SearchResultOf<Self> {
        check_dimension(dimension)?;
        let mut node = Self::root(dimension)?;
        node.transitions.reserve_exact(transitions.len());

        for (index, &axis) in transitions.iter().enumerate() {
            if axis as usize >= dimension {
                return Err(SearchError::InvalidSeed(format!(
                    "transition {} has value {}, must be in range [0, {})",
                    index, axis, dimension
                )));
            }
            if !node.can_extend(axis as usize) {
                return Err(SearchError::InvalidSeed(format!(
                    "step {} along axis {} revisits or touches the snake at vertex {}",
                    index,
                    axis,
                    node.head ^ (1usize << axis)
                )));
            }
            node.advance(axis);
        }

        node.fitness = sealed_fitness(&node.state, node.head);
        Ok(node)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn transitions(&self) -> &[u8] {
        &self.transitions
    }

    pub fn into_transitions(self) -> Vec<u8> {
        self.transitions
    }

    pub fn state(&self) -> &BitState {
        &self.state
    }

    /// Cached fitness: free vertices left after sealing the head
    pub fn fitness(&self) -> usize {
        self.fitness
    }

    /// Distinct axes used so far
    pub fn used_axes(&self) -> AxisSet {
        self.used_axes
    }

    /// Vertex at the end of the snake (XOR-fold of all transitions)
    pub fn current_vertex(&self) -> usize {
        self.head
    }

    /// Number of edges in the snake
    pub fn length(&self) -> usize {
        self.transitions.len()
    }

    /// Check whether the snake can step along `axis`
    ///
    /// Axes outside `[0, n)` are never extendable.
    pub fn can_extend(&self, axis: usize) -> bool {
        if axis >= self.dimension {
            return false;
        }
        !self.state.is_marked(self.head ^ (1usize << axis))
    }

    /// Create the child that extends this snake along `axis`.
    ///
    /// # Panics
    ///
    /// Panics if [`SearchNode::can_extend`] is false for `axis`; the caller
    /// must check first. Use [`SearchNode::try_create_child`] otherwise.
    pub fn create_child(&self, axis: usize) -> SearchNode {
        match self.try_create_child(axis) {
            Ok(child) => child,
            Err(err) => panic!("{}", err),
        }
    }

    /// Checked variant of [`SearchNode::create_child`]
    pub fn try_create_child(&self, axis: usize) -> SearchResultOf<SearchNode> {
        if !self.can_extend(axis) {
            return Err(SearchError::IllegalExtension {
                axis,
                vertex: self.head ^ (1usize << axis.min(usize::BITS as usize - 1)),
            });
        }

        let mut transitions = Vec::with_capacity(self.transitions.len() + 1);
        transitions.extend_from_slice(&self.transitions);

        let mut child = SearchNode {
            dimension: self.dimension,
            transitions,
            state: self.state.clone(),
            head: self.head,
            used_axes: self.used_axes,
            fitness: 0,
        };
        child.advance(axis as u8);
        child.fitness = sealed_fitness(&child.state, child.head);
        Ok(child)
    }

    /// Bitmap with the head's neighbourhood sealed as well
    ///
    /// Marks exactly the path vertices plus every vertex adjacent to one.
    pub fn sealed_state(&self) -> BitState {
        let mut sealed = self.state.clone();
        sealed.mark_neighbors(self.head);
        sealed
    }

    /// Move the head along `axis`, sealing the old head's neighbourhood
    fn advance(&mut self, axis: u8) {
        let next = self.head ^ (1usize << axis);
        self.state.mark_neighbors(self.head);
        self.state.mark(next);
        self.head = next;
        self.transitions.push(axis);
        self.used_axes.insert(axis);
    }
}

fn sealed_fitness(state: &BitState, head: usize) -> usize {
    state.count_unmarked() - state.count_unmarked_neighbors(head)
}
