//! Shared helpers for integration tests

#![allow(dead_code)]

/// Vertex sequence of a transition sequence, computed independently of the library
pub fn vertices(transitions: &[u8]) -> Vec<usize> {
    let mut vertex = 0usize;
    let mut out = vec![vertex];
    for &axis in transitions {
        vertex ^= 1 << axis;
        out.push(vertex);
    }
    out
}

/// Panics unless `transitions` is a snake in `Q_dimension`
///
/// Consecutive vertices differ in one bit; all other pairs in at least two.
pub fn assert_valid_snake(transitions: &[u8], dimension: usize) {
    for (i, &axis) in transitions.iter().enumerate() {
        assert!(
            (axis as usize) < dimension,
            "transition {} uses axis {} outside Q{}",
            i,
            axis,
            dimension
        );
    }

    let path = vertices(transitions);
    for i in 0..path.len() {
        for j in i + 1..path.len() {
            let distance = (path[i] ^ path[j]).count_ones();
            if j == i + 1 {
                assert_eq!(distance, 1, "vertices {} and {} are not adjacent", i, j);
            } else {
                assert!(
                    distance > 1,
                    "vertices {} ({}) and {} ({}) touch",
                    i,
                    path[i],
                    j,
                    path[j]
                );
            }
        }
    }
}
