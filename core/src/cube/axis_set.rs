//! Set of hypercube axes as a 64-bit mask

use std::fmt;

/// A set of axes (transition values) represented as a bitset.
///
/// Bit i is set if axis i is in the set. Iteration is always ascending,
/// which the search relies on for its deterministic child order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AxisSet(u64);

impl AxisSet {
    /// Create an empty axis set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Create the set `{0, 1, .., dimension - 1}`
    pub fn below(dimension: usize) -> Self {
        if dimension >= 64 {
            Self(u64::MAX)
        } else {
            Self((1u64 << dimension) - 1)
        }
    }

    /// Create a set from a slice of axes
    pub fn from_axes(axes: &[u8]) -> Self {
        let mut set = Self::empty();
        for &axis in axes {
            set.insert(axis);
        }
        set
    }

    pub fn contains(self, axis: u8) -> bool {
        axis < 64 && (self.0 >> axis) & 1 != 0
    }

    pub fn insert(&mut self, axis: u8) {
        debug_assert!(axis < 64, "axis {} does not fit in an AxisSet", axis);
        self.0 |= 1 << axis;
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Number of axes in the set
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Largest axis in the set, if any
    pub fn max(self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(63 - self.0.leading_zeros() as u8)
        }
    }

    /// Iterate over axes in ascending order
    pub fn iter(self) -> impl Iterator<Item = u8> {
        AxisSetIter { bits: self.0 }
    }
}

struct AxisSetIter {
    bits: u64,
}

impl Iterator for AxisSetIter {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let axis = self.bits.trailing_zeros() as u8;
        // clear lowest set bit
        self.bits &= self.bits - 1;
        Some(axis)
    }
}

impl fmt::Display for AxisSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, axis) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", axis)?;
        }
        write!(f, "}}")
    }
}
