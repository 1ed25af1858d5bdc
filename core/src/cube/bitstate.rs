//! Packed vertex bitmap for an n-dimensional hypercube
//!
//! Each bit stands for one vertex of `Q_n`:
//! - `0` = free
//! - `1` = occupied by the snake or forbidden next to it
//!
//! Bits are only ever set. A child node clones its parent's bitmap and
//! extends the copy, so a bitmap never has more than one owner.

use super::check_dimension;
use crate::error::{SearchError, SearchResultOf};

const WORD_BITS: usize = 64;

/// Word-packed bitmap over the `2^n` vertices of a hypercube
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitState {
    dimension: usize,
    words: Vec<u64>,
}

impl BitState {
    /// Create an all-free bitmap for `Q_dimension`
    pub fn new(dimension: usize) -> SearchResultOf<Self> {
        check_dimension(dimension)?;
        let num_vertices = 1usize << dimension;
        let num_words = (num_vertices + WORD_BITS - 1) / WORD_BITS;
        Ok(Self {
            dimension,
            words: vec![0; num_words],
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of vertices (`2^n`)
    pub fn num_vertices(&self) -> usize {
        1usize << self.dimension
    }

    /// Number of 64-bit words backing the bitmap
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Mark `vertex` as occupied or forbidden.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is outside `[0, 2^n)`. Use [`BitState::try_mark`]
    /// for untrusted input.
    #[inline]
    pub fn mark(&mut self, vertex: usize) {
        assert!(
            vertex < self.num_vertices(),
            "vertex {} out of range [0, {})",
            vertex,
            self.num_vertices()
        );
        self.words[vertex / WORD_BITS] |= 1u64 << (vertex % WORD_BITS);
    }

    /// Checked variant of [`BitState::mark`]
    pub fn try_mark(&mut self, vertex: usize) -> SearchResultOf<()> {
        self.check_vertex(vertex)?;
        self.mark(vertex);
        Ok(())
    }

    /// Check whether `vertex` is marked.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is outside `[0, 2^n)`.
    #[inline]
    pub fn is_marked(&self, vertex: usize) -> bool {
        assert!(
            vertex < self.num_vertices(),
            "vertex {} out of range [0, {})",
            vertex,
            self.num_vertices()
        );
        self.words[vertex / WORD_BITS] & (1u64 << (vertex % WORD_BITS)) != 0
    }

    /// Checked variant of [`BitState::is_marked`]
    pub fn try_is_marked(&self, vertex: usize) -> SearchResultOf<bool> {
        self.check_vertex(vertex)?;
        Ok(self.is_marked(vertex))
    }

    /// Mark all `n` hypercube neighbours of `vertex`
    pub fn mark_neighbors(&mut self, vertex: usize) {
        for axis in 0..self.dimension {
            self.mark(vertex ^ (1usize << axis));
        }
    }

    /// Number of unmarked neighbours of `vertex`
    pub fn count_unmarked_neighbors(&self, vertex: usize) -> usize {
        (0..self.dimension)
            .filter(|&axis| !self.is_marked(vertex ^ (1usize << axis)))
            .count()
    }

    /// Population count of marked vertices
    pub fn count_marked(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Number of free vertices (the fitness measure)
    pub fn count_unmarked(&self) -> usize {
        self.num_vertices() - self.count_marked()
    }

    fn check_vertex(&self, vertex: usize) -> SearchResultOf<()> {
        if vertex >= self.num_vertices() {
            return Err(SearchError::IndexOutOfRange {
                vertex,
                num_vertices: self.num_vertices(),
            });
        }
        Ok(())
    }
}
