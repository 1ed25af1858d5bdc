//! Transition/vertex conversion and snake validation
//!
//! A snake is stored as its transition sequence: the bit flipped at each
//! step, starting from vertex 0. Vertex `i` of the snake is the XOR-fold of
//! the first `i` transitions.

use crate::error::{SearchError, SearchResultOf};
use thiserror::Error;

/// First constraint a candidate snake breaks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnakeViolation {
    #[error("transition {index} has value {axis}, must be in range [0, {dimension})")]
    AxisOutOfRange {
        index: usize,
        axis: u8,
        dimension: usize,
    },

    #[error("consecutive vertices {index} and {next} have Hamming distance {distance}, expected 1")]
    NotAdjacent {
        index: usize,
        next: usize,
        distance: u32,
    },

    #[error("non-consecutive vertices {earlier} and {later} have Hamming distance {distance}, must be > 1")]
    Touching {
        earlier: usize,
        later: usize,
        distance: u32,
    },
}

impl From<SnakeViolation> for SearchError {
    fn from(violation: SnakeViolation) -> Self {
        SearchError::InvalidSeed(violation.to_string())
    }
}

/// Number of differing bits between two vertex labels
#[inline]
pub fn hamming_distance(a: usize, b: usize) -> u32 {
    (a ^ b).count_ones()
}

/// Vertex reached from 0 after applying every transition
pub fn current_vertex(transitions: &[u8]) -> usize {
    transitions
        .iter()
        .fold(0usize, |vertex, &axis| vertex ^ (1usize << axis))
}

/// Expand a transition sequence into its vertex sequence (starting at 0)
pub fn transitions_to_vertices(transitions: &[u8]) -> Vec<usize> {
    let mut vertices = Vec::with_capacity(transitions.len() + 1);
    let mut vertex = 0usize;
    vertices.push(vertex);
    for &axis in transitions {
        vertex ^= 1usize << axis;
        vertices.push(vertex);
    }
    vertices
}

/// Recover the transition sequence from a vertex sequence
///
/// Fails if two consecutive vertices are identical or differ in more than
/// one bit.
pub fn vertices_to_transitions(vertices: &[usize]) -> Result<Vec<u8>, SnakeViolation> {
    vertices
        .windows(2)
        .enumerate()
        .map(|(index, pair)| {
            let diff = pair[0] ^ pair[1];
            if diff.count_ones() != 1 {
                return Err(SnakeViolation::NotAdjacent {
                    index,
                    next: index + 1,
                    distance: diff.count_ones(),
                });
            }
            Ok(diff.trailing_zeros() as u8)
        })
        .collect()
}

/// Check both snake constraints on a vertex sequence
///
/// - consecutive vertices have Hamming distance exactly 1
/// - non-consecutive vertices have Hamming distance > 1
pub fn validate_snake(vertices: &[usize]) -> Result<(), SnakeViolation> {
    for (index, pair) in vertices.windows(2).enumerate() {
        let distance = hamming_distance(pair[0], pair[1]);
        if distance != 1 {
            return Err(SnakeViolation::NotAdjacent {
                index,
                next: index + 1,
                distance,
            });
        }
    }

    for later in 2..vertices.len() {
        for earlier in 0..later - 1 {
            let distance = hamming_distance(vertices[earlier], vertices[later]);
            if distance <= 1 {
                return Err(SnakeViolation::Touching {
                    earlier,
                    later,
                    distance,
                });
            }
        }
    }

    Ok(())
}

/// Check that a transition sequence is a valid snake in `Q_dimension`
pub fn validate_transitions(transitions: &[u8], dimension: usize) -> Result<(), SnakeViolation> {
    if let Some((index, &axis)) = transitions
        .iter()
        .enumerate()
        .find(|&(_, &axis)| axis as usize >= dimension)
    {
        return Err(SnakeViolation::AxisOutOfRange {
            index,
            axis,
            dimension,
        });
    }
    validate_snake(&transitions_to_vertices(transitions))
}

/// Parse a transition sequence written in hex
///
/// Comma-separated text ("0,1,1f,2") is read token by token, which allows
/// axes of 16 and above. Otherwise every hex digit is one transition
/// ("0120") and any other character is ignored.
pub fn parse_hex_transitions(text: &str) -> SearchResultOf<Vec<u8>> {
    if !text.contains(',') {
        return Ok(text
            .chars()
            .filter_map(|c| c.to_digit(16))
            .map(|d| d as u8)
            .collect());
    }
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            u8::from_str_radix(token, 16)
                .map_err(|_| SearchError::InvalidSeed(format!("bad hex transition '{}'", token)))
        })
        .collect()
}

/// Inverse of [`parse_hex_transitions`]
///
/// One digit per transition while every axis is below 16, comma-separated
/// otherwise.
pub fn format_hex_transitions(transitions: &[u8]) -> String {
    if transitions.iter().all(|&axis| axis < 16) {
        transitions.iter().map(|&axis| format!("{:x}", axis)).collect()
    } else {
        transitions
            .iter()
            .map(|&axis| format!("{:x}", axis))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Smallest dimension that can hold the sequence (`max + 1`, or 1 if empty)
pub fn detect_dimension(transitions: &[u8]) -> usize {
    transitions
        .iter()
        .max()
        .map(|&axis| axis as usize + 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hamming_distance() {
        assert_eq!(hamming_distance(0b000, 0b001), 1);
        assert_eq!(hamming_distance(0b000, 0b111), 3);
        assert_eq!(hamming_distance(5, 5), 0);
    }

    #[test]
    fn test_transitions_to_vertices() {
        assert_eq!(transitions_to_vertices(&[0, 1, 2, 0]), vec![0, 1, 3, 7, 6]);
        assert_eq!(transitions_to_vertices(&[]), vec![0]);
    }

    #[test]
    fn test_current_vertex_matches_last_vertex() {
        let seq = [0, 1, 2, 0, 3, 1];
        let vertices = transitions_to_vertices(&seq);
        assert_eq!(current_vertex(&seq), *vertices.last().unwrap());
    }

    #[test]
    fn test_vertices_to_transitions() {
        assert_eq!(
            vertices_to_transitions(&[0, 1, 3, 7, 6]).unwrap(),
            vec![0, 1, 2, 0]
        );
        assert!(vertices_to_transitions(&[0]).unwrap().is_empty());
    }

    #[test]
    fn test_vertices_to_transitions_rejects_jumps() {
        assert!(vertices_to_transitions(&[0, 3]).is_err());
        assert!(vertices_to_transitions(&[2, 2]).is_err());
    }

    #[test]
    fn test_validate_snake() {
        assert!(validate_snake(&[0, 1, 3, 7, 6]).is_ok());
        assert!(validate_snake(&[0]).is_ok());

        // 0 and 2 are the same vertex
        let err = validate_snake(&[0, 1, 0]).unwrap_err();
        assert_eq!(
            err,
            SnakeViolation::Touching {
                earlier: 0,
                later: 2,
                distance: 0
            }
        );

        // 0 -> 1 -> 3 -> 2 closes back next to 0
        assert!(validate_snake(&[0, 1, 3, 2]).is_err());
    }

    #[test]
    fn test_validate_transitions_range() {
        let err = validate_transitions(&[0, 1, 3], 3).unwrap_err();
        assert!(matches!(err, SnakeViolation::AxisOutOfRange { index: 2, .. }));
        assert!(validate_transitions(&[0, 1, 2, 0], 3).is_ok());
        assert!(validate_transitions(&[0, 0], 3).is_err());
    }

    #[test]
    fn test_parse_hex_transitions() {
        assert_eq!(parse_hex_transitions("0120").unwrap(), vec![0, 1, 2, 0]);
        assert_eq!(parse_hex_transitions("0,1,2,0").unwrap(), vec![0, 1, 2, 0]);
        assert_eq!(parse_hex_transitions("012a B").unwrap(), vec![0, 1, 2, 10, 11]);
        assert_eq!(parse_hex_transitions("0, 1f ,10,").unwrap(), vec![0, 31, 16]);
        assert!(matches!(
            parse_hex_transitions("0,1,zz"),
            Err(SearchError::InvalidSeed(_))
        ));
    }

    #[test]
    fn test_format_hex_transitions() {
        assert_eq!(format_hex_transitions(&[0, 1, 2, 10]), "012a");
        assert_eq!(format_hex_transitions(&[]), "");

        // axes past 15 need separators to stay unambiguous
        let wide = [0, 1, 16, 0, 29];
        let text = format_hex_transitions(&wide);
        assert_eq!(text, "0,1,10,0,1d");
        assert_eq!(parse_hex_transitions(&text).unwrap(), wide.to_vec());
    }

    #[test]
    fn test_detect_dimension() {
        assert_eq!(detect_dimension(&[]), 1);
        assert_eq!(detect_dimension(&[0, 1, 2, 0]), 3);
    }

    #[test]
    fn test_violation_becomes_invalid_seed() {
        let violation = validate_transitions(&[0, 0], 2).unwrap_err();
        let err: SearchError = violation.into();
        assert!(matches!(err, SearchError::InvalidSeed(_)));
    }
}
