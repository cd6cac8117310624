//! MinHash Builder: a global shingle vocabulary with stable indices, a set
//! of seeded pseudo-random permutations over that vocabulary, and the
//! per-line signature computation that folds a line's shingles through
//! those permutations.

use indexmap::IndexSet;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::shingles::shingle_set;

/// Insertion-ordered shingle vocabulary. Insertion order is fixed by the
/// caller's iteration order (a deterministic, path-sorted, in-file-order
/// walk over the corpus), not by whichever thread observed a shingle
/// first, so that the resulting vocabulary indices — and therefore every
/// downstream signature and bucket key — are reproducible.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    shingles: IndexSet<String>,
}

impl Vocabulary {
    /// Build a vocabulary from an ordered sequence of already-normalized
    /// line strings, shingling each at length `k`.
    pub fn build<'a>(lines: impl Iterator<Item = &'a str>, k: usize) -> Self {
        let mut shingles = IndexSet::new();
        for line in lines {
            if let Some(line_shingles) = shingle_set(line, k) {
                let mut ordered: Vec<String> = line_shingles.into_iter().collect();
                ordered.sort_unstable();
                for shingle in ordered {
                    shingles.insert(shingle);
                }
            }
        }
        Vocabulary { shingles }
    }

    /// Stable index of a shingle, if present.
    pub fn index_of(&self, shingle: &str) -> Option<u32> {
        self.shingles.get_index_of(shingle).map(|i| i as u32)
    }

    /// Number of distinct shingles in the vocabulary.
    pub fn len(&self) -> usize {
        self.shingles.len()
    }

    /// Whether the vocabulary has no entries.
    pub fn is_empty(&self) -> bool {
        self.shingles.is_empty()
    }
}

/// `num_hashes` pseudo-random permutations of `0..vocab_size`, stored
/// shingle-major: row `v` holds the `num_hashes` permuted ranks for
/// vocabulary index `v`, contiguous in memory. Folding a line's shingle
/// set into a signature then touches one contiguous row per shingle
/// instead of striding across `num_hashes` separate permutation vectors.
#[derive(Debug, Clone)]
pub struct PermutationTable {
    table: Vec<u32>,
    vocab_size: usize,
    num_hashes: usize,
}

impl PermutationTable {
    /// Generate `num_hashes` permutations of `0..vocab_size` using a
    /// seeded PRNG, so the table (and every signature derived from it) is
    /// reproducible across runs and platforms for a fixed seed.
    pub fn generate(vocab_size: usize, num_hashes: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut table = vec![0u32; vocab_size * num_hashes];

        let mut column: Vec<u32> = (0..vocab_size as u32).collect();
        for h in 0..num_hashes {
            column.shuffle(&mut rng);
            for (v, &rank) in column.iter().enumerate() {
                table[v * num_hashes + h] = rank;
            }
        }

        PermutationTable {
            table,
            vocab_size,
            num_hashes,
        }
    }

    /// The `num_hashes` permuted ranks for vocabulary index `v`.
    fn row(&self, v: u32) -> &[u32] {
        let start = v as usize * self.num_hashes;
        &self.table[start..start + self.num_hashes]
    }

    /// Number of vocabulary entries this table was built for.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Number of hash permutations (signature length).
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }
}

/// Fold a line's shingle set through the permutation table into a MinHash
/// signature.
///
/// Returns `None` if the line is too short to produce any shingle at all
/// (length ≤ `shingle_size`) — such a line has no signature and must be
/// excluded from the signature store entirely, not given a placeholder:
/// two unrelated short lines from different files would otherwise both
/// land on the same placeholder and register as a perfect match.
///
/// Returns `Some([vocab_size; num_hashes])` in the defensive case where the
/// line does have shingles but none of them appear in the vocabulary —
/// unreachable in this crate's single-pass vocabulary-then-signature
/// construction, since the vocabulary is built from the same corpus, but
/// defined so the function stays total rather than panicking if that
/// invariant is ever violated. `vocab_size` can never collide with a real
/// min-fold result since every real permuted rank is strictly less than
/// `vocab_size`.
pub fn build_signature(
    code: &str,
    shingle_size: usize,
    vocab: &Vocabulary,
    perm_table: &PermutationTable,
) -> Option<Vec<u32>> {
    let sentinel = perm_table.vocab_size() as u32;
    let num_hashes = perm_table.num_hashes();

    let shingles = shingle_set(code, shingle_size)?;

    let mut indices: Vec<u32> = shingles
        .iter()
        .filter_map(|s| vocab.index_of(s))
        .collect();

    if indices.is_empty() {
        return Some(vec![sentinel; num_hashes]);
    }
    indices.sort_unstable();

    let mut signature = vec![u32::MAX; num_hashes];
    for idx in indices {
        let row = perm_table.row(idx);
        for h in 0..num_hashes {
            if row[h] < signature[h] {
                signature[h] = row[h];
            }
        }
    }
    Some(signature)
}
