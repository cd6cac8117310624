//! Pipeline configuration: user-tunable thresholds plus the internally
//! fixed-but-overridable MinHash/LSH constants.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::{Result, SimilarityError};
use super::validation::{validate_positive_u32, validate_positive_usize, validate_unit_range};

/// Configuration for a single `find_similar_regions` run.
///
/// The three thresholds (`region_length`, `candidate_threshold`,
/// `line_threshold`) are the knobs an embedding application is expected to
/// tune; the remainder have sane, schema-documented defaults and exist so a
/// caller can override them (e.g. in tests that want a smaller vocabulary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum number of lines a region must span (on the longer side) to
    /// be emitted by the ranker.
    pub region_length: u32,

    /// Minimum Jaccard similarity between two lines' MinHash signatures for
    /// them to be treated as a candidate pair.
    pub candidate_threshold: f64,

    /// Minimum per-line similarity required for a region to keep growing
    /// during expansion.
    pub line_threshold: f64,

    /// Character-shingle length.
    pub shingle_size: usize,

    /// Number of MinHash permutations (signature length).
    pub num_hashes: usize,

    /// Number of LSH bands. Must evenly divide `num_hashes`.
    pub num_bands: usize,

    /// Seed for the permutation generator, so signatures are reproducible
    /// across runs and platforms.
    pub seed: u64,

    /// When `true`, region expansion marks only the diagonal fingerprint-id
    /// pairs actually walked as visited, instead of the full Cartesian
    /// product of both sides' traversed ids. Defaults to `false` to match
    /// the wider, more conservative marking behavior of the system this
    /// crate's algorithm is descended from.
    pub tight_visited_marking: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            region_length: 10,
            candidate_threshold: 0.5,
            line_threshold: 0.8,
            shingle_size: 5,
            num_hashes: 100,
            num_bands: 10,
            seed: 0,
            tight_visited_marking: false,
        }
    }
}

impl Config {
    /// Load and validate a `Config` from a JSON file on disk.
    ///
    /// Locating the file is the embedder's responsibility (no search path,
    /// no environment variable resolution, no CLI flag parsing lives here);
    /// this is offered purely as a convenience once a path is known.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SimilarityError::io(format!("reading config file {}", path.display()), e)
        })?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every field, returning the first violation found.
    pub fn validate(&self) -> Result<()> {
        validate_positive_u32(self.region_length, "region_length")?;
        validate_unit_range(self.candidate_threshold, "candidate_threshold")?;
        validate_unit_range(self.line_threshold, "line_threshold")?;
        validate_positive_usize(self.shingle_size, "shingle_size")?;
        validate_positive_usize(self.num_hashes, "num_hashes")?;
        validate_positive_usize(self.num_bands, "num_bands")?;

        if self.num_hashes % self.num_bands != 0 {
            return Err(SimilarityError::config_field(
                format!(
                    "num_hashes ({}) must be evenly divisible by num_bands ({})",
                    self.num_hashes, self.num_bands
                ),
                "num_bands",
            ));
        }

        debug!(
            region_length = self.region_length,
            candidate_threshold = self.candidate_threshold,
            line_threshold = self.line_threshold,
            num_hashes = self.num_hashes,
            num_bands = self.num_bands,
            "config validated"
        );

        Ok(())
    }

    /// Number of MinHash components per LSH band.
    pub fn hashes_per_band(&self) -> usize {
        self.num_hashes / self.num_bands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_divisible_bands() {
        let config = Config {
            num_hashes: 100,
            num_bands: 7,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let config = Config {
            candidate_threshold: 1.2,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn hashes_per_band_divides_evenly() {
        let config = Config::default();
        assert_eq!(config.hashes_per_band(), 10);
    }

    #[test]
    fn round_trips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
