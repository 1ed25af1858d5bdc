//! Seed and configuration loaders
//!
//! Seeds are known snakes used to prime higher-dimensional searches. They
//! come either as JSON (`{"dimension": 4, "transitions": [0,1,2,0,3,...]}`)
//! or as a hex string with one digit per transition.

use crate::cube::{detect_dimension, parse_hex_transitions, validate_transitions};
use crate::error::{SearchError, SearchResultOf};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A known snake in a given dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFile {
    /// Dimension the snake lives in
    pub dimension: usize,

    /// Transition sequence
    pub transitions: Vec<u8>,

    /// Optional: where the snake came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SeedFile {
    pub fn new(dimension: usize, transitions: Vec<u8>) -> Self {
        Self {
            dimension,
            transitions,
            source: None,
        }
    }

    /// Parse a hex transition string
    ///
    /// Without an explicit dimension the smallest one that fits is used.
    pub fn from_hex(text: &str, dimension: Option<usize>) -> SearchResultOf<Self> {
        let transitions = parse_hex_transitions(text)?;
        let dimension = dimension.unwrap_or_else(|| detect_dimension(&transitions));
        let seed = Self::new(dimension, transitions);
        seed.validate()?;
        Ok(seed)
    }

    /// Check the snake constraints in `self.dimension`
    pub fn validate(&self) -> SearchResultOf<()> {
        validate_transitions(&self.transitions, self.dimension)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Write the seed as pretty JSON
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> SearchResultOf<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Load and validate a seed from a JSON file
pub fn load_seed<P: AsRef<Path>>(path: P) -> SearchResultOf<SeedFile> {
    let contents = fs::read_to_string(path)?;
    let seed: SeedFile = serde_json::from_str(&contents)?;
    seed.validate()?;
    Ok(seed)
}

/// Load a JSON config (`BeamConfig`, `PrimingConfig`, ...)
///
/// Missing fields take their defaults.
pub fn load_config<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> SearchResultOf<T> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
