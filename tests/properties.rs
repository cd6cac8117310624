//! Property-based tests for the quantified invariants the pipeline must
//! hold regardless of input, exercised with `proptest` rather than fixed
//! examples.

use proptest::prelude::*;

use refactor_radar::similarity::graph::jaccard_similarity;
use refactor_radar::similarity::minhash::{build_signature, PermutationTable, Vocabulary};
use refactor_radar::similarity::shingles::shingle_set;
use refactor_radar::similarity::store::SignatureStore;
use refactor_radar::{Config, SourceFile};

proptest! {
    /// Property 1 (shingle invariance): a line of length <= k has no
    /// shingles; a line of length > k has exactly len(L) - k + 1 windows
    /// (with duplicates collapsed once in the set).
    #[test]
    fn prop_shingle_invariance(code in "[a-z]{0,40}", k in 1usize..10) {
        let chars = code.chars().count();
        match shingle_set(&code, k) {
            None => prop_assert!(chars <= k),
            Some(set) => {
                prop_assert!(chars > k);
                prop_assert!(set.len() <= chars - k + 1);
                prop_assert!(!set.is_empty());
            }
        }
    }

    /// Property 2 (signature bounds): every signature has the configured
    /// length, and every component is within [0, vocab_size].
    #[test]
    fn prop_signature_bounds(code in "[a-z]{6,60}", num_hashes in 4usize..32) {
        let vocab = Vocabulary::build(vec![code.as_str()].into_iter(), 5);
        let perm_table = PermutationTable::generate(vocab.len().max(1), num_hashes, 7);
        if let Some(sig) = build_signature(&code, 5, &vocab, &perm_table) {
            prop_assert_eq!(sig.len(), num_hashes);
            for component in &sig {
                prop_assert!(*component as usize <= vocab.len());
            }
        }
    }

    /// Property 3 (Jaccard range): similarity is always in [0, 1], and a
    /// signature is always identical to itself.
    #[test]
    fn prop_jaccard_range(a in prop::collection::vec(0u32..1000, 5..50)) {
        let sim_self = jaccard_similarity(&a, &a);
        prop_assert!((0.0..=1.0).contains(&sim_self));
        prop_assert_eq!(sim_self, 1.0);
    }

    /// Property 3, two-argument form: similarity between two independent
    /// (possibly differently-valued, equal-length) signatures stays in
    /// range.
    #[test]
    fn prop_jaccard_range_pairwise(
        a in prop::collection::vec(0u32..20, 10),
        b in prop::collection::vec(0u32..20, 10),
    ) {
        let sim = jaccard_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&sim));
    }

    /// Property 4 (linkage symmetry): for every signed line x, if
    /// x.next = y then y.prev = x, and they share a file.
    #[test]
    fn prop_linkage_symmetry(
        lines_a in prop::collection::vec("[a-z_]{6,20}", 2..8),
        lines_b in prop::collection::vec("[a-z_]{6,20}", 2..8),
    ) {
        let content_a = lines_a.join("\n") + "\n";
        let content_b = lines_b.join("\n") + "\n";
        let files = vec![
            SourceFile::new("a.py", content_a.into_bytes()),
            SourceFile::new("b.py", content_b.into_bytes()),
        ];
        let vocab = SignatureStore::build_vocabulary(&files, 5);
        let perm_table = PermutationTable::generate(vocab.len().max(1), 16, 3);
        let store = SignatureStore::build(&files, 5, &vocab, &perm_table);

        for id in 0..store.len() as u32 {
            if let Some(next) = store.next(id) {
                prop_assert_eq!(store.prev(next), Some(id));
                prop_assert_eq!(store.get(next).file_index, store.get(id).file_index);
            }
        }
    }
}

/// Property 7 (length gate) and 9 (monotone output), exercised end-to-end
/// across a family of region_length thresholds for a fixed corpus.
#[test]
fn prop_length_gate_and_monotone_order_across_thresholds() {
    let block: String = (1..=40)
        .map(|i| format!("repeated_clone_body_line_{i}_token\n"))
        .collect();
    let files = vec![
        SourceFile::new("a.py", block.as_bytes().to_vec()),
        SourceFile::new("b.py", block.as_bytes().to_vec()),
    ];

    for region_length in [5u32, 10, 20, 35, 100] {
        let config = Config {
            region_length,
            candidate_threshold: 0.3,
            line_threshold: 0.5,
            num_hashes: 40,
            num_bands: 8,
            ..Config::default()
        };
        let regions = refactor_radar::find_similar_regions(&files, &config).unwrap();

        for region in &regions {
            let length = (region.a_end - region.a_start + 1).max(region.b_end - region.b_start + 1);
            assert!(length >= region_length);
            assert_ne!(region.file_a, region.file_b);
        }

        for pair in regions.windows(2) {
            let len0 = (pair[0].a_end - pair[0].a_start + 1).max(pair[0].b_end - pair[0].b_start + 1);
            let len1 = (pair[1].a_end - pair[1].a_start + 1).max(pair[1].b_end - pair[1].b_start + 1);
            assert!(len0 >= len1, "output must be ordered by length descending");
        }
    }
}
