//! Determinism: identical inputs and a fixed seed always produce the
//! identical output, in the identical order.

use refactor_radar::{find_similar_regions, Config, SourceFile};

fn corpus() -> Vec<SourceFile> {
    let block: String = (1..=25)
        .map(|i| format!("deterministic_marker_{i}_payload\n"))
        .collect();
    vec![
        SourceFile::new("x.py", block.as_bytes().to_vec()),
        SourceFile::new("y.py", block.as_bytes().to_vec()),
    ]
}

fn config() -> Config {
    Config {
        region_length: 8,
        candidate_threshold: 0.3,
        line_threshold: 0.5,
        num_hashes: 40,
        num_bands: 8,
        seed: 12345,
        ..Config::default()
    }
}

#[test]
fn repeated_runs_with_the_same_seed_agree() {
    let files = corpus();
    let cfg = config();

    let first = find_similar_regions(&files, &cfg).unwrap();
    let second = find_similar_regions(&files, &cfg).unwrap();

    assert_eq!(first, second);
}

#[test]
fn different_seeds_still_agree_on_result_shape() {
    let files = corpus();
    let mut cfg_a = config();
    cfg_a.seed = 1;
    let mut cfg_b = config();
    cfg_b.seed = 2;

    let a = find_similar_regions(&files, &cfg_a).unwrap();
    let b = find_similar_regions(&files, &cfg_b).unwrap();

    // The permutation table differs, but the underlying near-duplicate
    // block is unambiguous enough that both seeds should still find it.
    assert_eq!(a.len(), b.len());
}
