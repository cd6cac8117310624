//! Candidate Graph: turns LSH buckets into a deduplicated, undirected
//! adjacency over fingerprint ids, gated by exact Jaccard similarity.

use rayon::prelude::*;

use super::lsh::BandBuckets;
use super::store::SignatureStore;

/// Exact Jaccard similarity between two equal-length MinHash signatures:
/// the fraction of components that agree. Returns `0.0` if the lengths
/// differ, which should never happen within a single pipeline run since
/// every signature is built from the same `PermutationTable`.
pub fn jaccard_similarity(a: &[u32], b: &[u32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let matches = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
    matches as f64 / a.len() as f64
}

/// A flat, sorted, deduplicated undirected adjacency over fingerprint ids.
/// Stored as `(u32, u32)` pairs with `a < b`, each direction also present
/// so a neighbor lookup for any id is a single contiguous binary-searched
/// range rather than a hash lookup.
#[derive(Debug, Default)]
pub struct CandidateGraph {
    edges: Vec<(u32, u32)>,
}

impl CandidateGraph {
    /// Enumerate every pair within every multi-line LSH bucket (in
    /// parallel across buckets), keep the ones whose exact Jaccard
    /// similarity clears `candidate_threshold`, then sort and dedup into
    /// the final adjacency.
    pub fn build(store: &SignatureStore, buckets: &BandBuckets, candidate_threshold: f64) -> Self {
        let bucket_list: Vec<&Vec<u32>> = buckets.buckets().collect();

        let local_edges: Vec<Vec<(u32, u32)>> = bucket_list
            .par_iter()
            .map(|bucket| {
                let mut found = Vec::new();
                for i in 0..bucket.len() {
                    for j in (i + 1)..bucket.len() {
                        let (id_a, id_b) = (bucket[i], bucket[j]);
                        if id_a == id_b {
                            continue;
                        }
                        let sig_a = &store.get(id_a).signature;
                        let sig_b = &store.get(id_b).signature;
                        let sim = jaccard_similarity(sig_a, sig_b);
                        if sim >= candidate_threshold {
                            let (lo, hi) = if id_a < id_b {
                                (id_a, id_b)
                            } else {
                                (id_b, id_a)
                            };
                            found.push((lo, hi));
                            found.push((hi, lo));
                        }
                    }
                }
                found
            })
            .collect();

        let mut edges: Vec<(u32, u32)> = local_edges.into_iter().flatten().collect();
        edges.sort_unstable();
        edges.dedup();

        CandidateGraph { edges }
    }

    /// Every neighbor of `id` in the candidate graph.
    pub fn neighbors(&self, id: u32) -> impl Iterator<Item = u32> + '_ {
        let start = self.edges.partition_point(|&(a, _)| a < id);
        self.edges[start..]
            .iter()
            .take_while(move |&&(a, _)| a == id)
            .map(|&(_, b)| b)
    }

    /// Every distinct undirected edge, `a < b`, each appearing once.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edges.iter().copied().filter(|&(a, b)| a < b)
    }

    /// Number of directed entries stored (twice the undirected edge count).
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the candidate graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jaccard_is_one_for_identical_signatures() {
        let sig = vec![1, 2, 3, 4];
        assert_eq!(jaccard_similarity(&sig, &sig), 1.0);
    }

    #[test]
    fn jaccard_is_zero_for_mismatched_lengths() {
        assert_eq!(jaccard_similarity(&[1, 2], &[1, 2, 3]), 0.0);
    }

    #[test]
    fn jaccard_counts_partial_matches() {
        let a = vec![1, 2, 3, 4];
        let b = vec![1, 2, 9, 9];
        assert_eq!(jaccard_similarity(&a, &b), 0.5);
    }
}
