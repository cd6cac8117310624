//! Orchestration: ties the normalizer, shingler, MinHash builder, LSH
//! bander, candidate graph, region expander and ranker into the single
//! public entry point this crate exposes.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::config::Config;
use crate::core::errors::Result;

use super::graph::CandidateGraph;
use super::lsh::BandBuckets;
use super::minhash::PermutationTable;
use super::normalize::SourceFile;
use super::rank::find_regions;
use super::region::ExpandedRegion;
use super::store::SignatureStore;

/// A single near-duplicate contiguous line region spanning two files.
///
/// Line numbers are 1-based and inclusive of both endpoints, matching the
/// original file's own line numbering (not the normalized line sequence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Path of the first file, as given in the input `SourceFile`.
    pub file_a: String,
    /// Path of the second file, as given in the input `SourceFile`.
    pub file_b: String,
    /// First original line number covered in `file_a`.
    pub a_start: u32,
    /// Last original line number covered in `file_a`.
    pub a_end: u32,
    /// First original line number covered in `file_b`.
    pub b_start: u32,
    /// Last original line number covered in `file_b`.
    pub b_end: u32,
    /// Raw source text of the matched span in `file_a`.
    pub code_a: String,
    /// Raw source text of the matched span in `file_b`.
    pub code_b: String,
}

/// Run the full pipeline over `files` and return every near-duplicate
/// region found, longest first.
///
/// A failure in any phase aborts the whole run: this function returns
/// `Err` and no partial `Vec<Region>`, never a partially-populated result.
/// Per-file normalization failures do not fall into this category — they
/// degrade to "skip this file's unreadable lines" internally and are
/// logged, not surfaced as an error.
pub fn find_similar_regions(files: &[SourceFile], config: &Config) -> Result<Vec<Region>> {
    config.validate()?;

    if files.len() < 2 {
        return Ok(Vec::new());
    }

    let start = Instant::now();

    let vocab = SignatureStore::build_vocabulary(files, config.shingle_size);
    info!(vocabulary_size = vocab.len(), "built shingle vocabulary");

    let perm_table = PermutationTable::generate(vocab.len().max(1), config.num_hashes, config.seed);

    let store = SignatureStore::build(files, config.shingle_size, &vocab, &perm_table);
    info!(signed_lines = store.len(), "built signature store");
    store.validate(config.num_hashes)?;

    let buckets = BandBuckets::build(&store, config.num_bands, config.hashes_per_band());

    let graph = CandidateGraph::build(&store, &buckets, config.candidate_threshold);
    info!(candidate_edges = graph.edges().count(), "built candidate graph");

    let expanded = find_regions(&store, &graph, config);
    info!(region_count = expanded.len(), "expanded and ranked regions");

    let regions = expanded
        .into_iter()
        .map(|region| materialize(region, files))
        .collect();

    info!(elapsed_ms = start.elapsed().as_millis(), "pipeline complete");

    Ok(regions)
}

/// Turn an `ExpandedRegion` (fingerprint-id space) into a public `Region`
/// (file-path and raw-source-text space) by slicing the original,
/// un-normalized `SourceFile` content the pipeline already holds — no
/// second disk read.
fn materialize(region: ExpandedRegion, files: &[SourceFile]) -> Region {
    let file_a = &files[region.file_a as usize];
    let file_b = &files[region.file_b as usize];

    Region {
        file_a: file_a.path.clone(),
        file_b: file_b.path.clone(),
        a_start: region.a_start,
        a_end: region.a_end,
        b_start: region.b_start,
        b_end: region.b_end,
        code_a: slice_lines(&file_a.as_str(), region.a_start, region.a_end),
        code_b: slice_lines(&file_b.as_str(), region.b_start, region.b_end),
    }
}

/// Extract original lines `start..=end` (1-based, inclusive) from raw
/// source text.
fn slice_lines(source: &str, start: u32, end: u32) -> String {
    source
        .lines()
        .enumerate()
        .filter(|(i, _)| {
            let line_no = (*i + 1) as u32;
            line_no >= start && line_no <= end
        })
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_regions() {
        let regions = find_similar_regions(&[], &Config::default()).unwrap();
        assert!(regions.is_empty());
    }

    #[test]
    fn single_file_yields_no_regions() {
        let files = vec![SourceFile::new("a.py", b"x = 1\n".to_vec())];
        let regions = find_similar_regions(&files, &Config::default()).unwrap();
        assert!(regions.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected_before_running() {
        let files = vec![
            SourceFile::new("a.py", b"x = 1\n".to_vec()),
            SourceFile::new("b.py", b"x = 1\n".to_vec()),
        ];
        let config = Config {
            num_hashes: 100,
            num_bands: 7,
            ..Config::default()
        };
        assert!(find_similar_regions(&files, &config).is_err());
    }

    #[test]
    fn finds_an_identical_block_across_two_files() {
        let block: String = (1..=40)
            .map(|i| format!("unique_statement_token_{i}_marker\n"))
            .collect();
        let files = vec![
            SourceFile::new("a.py", block.as_bytes().to_vec()),
            SourceFile::new("b.py", block.as_bytes().to_vec()),
        ];
        let config = Config {
            region_length: 15,
            candidate_threshold: 0.3,
            line_threshold: 0.5,
            num_hashes: 40,
            num_bands: 8,
            ..Config::default()
        };
        let regions = find_similar_regions(&files, &config).unwrap();
        assert!(!regions.is_empty());
        let top = &regions[0];
        assert_eq!(top.file_a, "a.py");
        assert_eq!(top.file_b, "b.py");
        assert!(top.a_end - top.a_start + 1 >= 15);
        assert!(!top.code_a.is_empty());
    }

    #[test]
    fn slice_lines_is_inclusive_and_one_based() {
        let src = "l1\nl2\nl3\nl4\n";
        assert_eq!(slice_lines(src, 2, 3), "l2\nl3");
    }
}
