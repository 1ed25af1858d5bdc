//! Kochut canonical form for transition sequences
//!
//! Every snake is equivalent, under hypercube symmetry, to one whose
//! transitions start with 0 and never jump more than one past the largest
//! axis used so far. Restricting the search to those sequences drops the
//! rotations and reflections of every shape.

use super::MoveRule;
use crate::cube::{AxisSet, SearchNode};

/// Check whether a transition sequence is in canonical form
pub fn is_canonical(transitions: &[u8]) -> bool {
    let Some((&first, rest)) = transitions.split_first() else {
        return true;
    };
    if first != 0 {
        return false;
    }

    let mut max_used = 0u8;
    for &axis in rest {
        let next = max_used.saturating_add(1);
        if axis > next {
            return false;
        }
        if axis == next {
            max_used = axis;
        }
    }
    true
}

/// Axes a canonical sequence may use next
///
/// - empty sequence: `{0}`
/// - otherwise: axes already present plus `max + 1`
pub fn legal_next_dims(transitions: &[u8]) -> AxisSet {
    next_from_used(AxisSet::from_axes(transitions))
}

fn next_from_used(used: AxisSet) -> AxisSet {
    match used.max() {
        None => AxisSet::from_axes(&[0]),
        Some(max) if max < 63 => {
            let mut next = used;
            next.insert(max + 1);
            next
        }
        Some(_) => used,
    }
}

/// Plain canonical-form rule
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonical;

impl MoveRule for Canonical {
    fn id(&self) -> &'static str {
        "canonical"
    }

    fn candidates(&self, node: &SearchNode) -> AxisSet {
        next_from_used(node.used_axes()).intersection(AxisSet::below(node.dimension()))
    }
}

/// Canonical form plus one always-open axis
///
/// Used when a seed from `Q_s` is searched in `Q_{s+1}`: the new axis `s`
/// must stay reachable even if the seed never used axis `s - 1`.
#[derive(Debug, Clone, Copy)]
pub struct PrimedCanonical {
    open_axis: u8,
}

impl PrimedCanonical {
    pub fn new(open_axis: u8) -> Self {
        Self { open_axis }
    }
}

impl MoveRule for PrimedCanonical {
    fn id(&self) -> &'static str {
        "primed_canonical"
    }

    fn candidates(&self, node: &SearchNode) -> AxisSet {
        next_from_used(node.used_axes())
            .union(AxisSet::from_axes(&[self.open_axis]))
            .intersection(AxisSet::below(node.dimension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::rule_for;

    fn axes(set: AxisSet) -> Vec<u8> {
        set.iter().collect()
    }

    #[test]
    fn test_is_canonical() {
        assert!(is_canonical(&[]));
        assert!(is_canonical(&[0]));
        assert!(is_canonical(&[0, 1, 2, 0, 1]));
        assert!(!is_canonical(&[1, 0, 2]));
        assert!(!is_canonical(&[0, 1, 3]));
        assert!(!is_canonical(&[0, 2]));
    }

    #[test]
    fn test_legal_next_dims_empty() {
        assert_eq!(axes(legal_next_dims(&[])), vec![0]);
    }

    #[test]
    fn test_legal_next_dims() {
        assert_eq!(axes(legal_next_dims(&[0])), vec![0, 1]);
        assert_eq!(axes(legal_next_dims(&[0, 1, 0])), vec![0, 1, 2]);
        assert_eq!(axes(legal_next_dims(&[0, 1, 2, 0])), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_generated_sequences_are_canonical() {
        // walk every sequence up to length 6 built only from legal_next_dims
        let mut frontier: Vec<Vec<u8>> = vec![vec![]];
        for _ in 0..6 {
            let mut next = Vec::new();
            for seq in &frontier {
                assert!(is_canonical(seq), "{:?} should be canonical", seq);
                for axis in legal_next_dims(seq).iter() {
                    let mut child = seq.clone();
                    child.push(axis);
                    next.push(child);
                }
            }
            frontier = next;
        }
        assert!(frontier.iter().all(|s| is_canonical(s)));
    }

    #[test]
    fn test_canonical_rule_clips_to_dimension() {
        let node = SearchNode::from_transitions(&[0, 1, 2], 3).unwrap();
        assert_eq!(axes(Canonical.candidates(&node)), vec![0, 1, 2]);
    }

    #[test]
    fn test_legal_moves_respect_occupancy() {
        let node = SearchNode::from_transitions(&[0, 1], 3).unwrap();
        // canonical allows {0,1,2}; only 2 is free
        assert_eq!(axes(Canonical.legal_moves(&node)), vec![2]);
    }

    #[test]
    fn test_primed_rule_opens_new_axis() {
        // seed from Q4 that never used axis 3, searched in Q5
        let node = SearchNode::from_transitions(&[0, 1, 2, 0], 5).unwrap();
        let rule = PrimedCanonical::new(4);
        assert_eq!(axes(rule.candidates(&node)), vec![0, 1, 2, 3, 4]);
        assert_eq!(axes(Canonical.candidates(&node)), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_rule_for() {
        assert_eq!(rule_for(None).id(), "canonical");
        assert_eq!(rule_for(Some(3)).id(), "primed_canonical");
    }
}
