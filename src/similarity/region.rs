//! Region Expander: grows a single candidate edge into the largest
//! contiguous matching block by walking each file's prev/next chain in
//! lockstep while per-line similarity stays above `line_threshold`.

use std::collections::HashSet;

use super::graph::jaccard_similarity;
use super::store::SignatureStore;

/// A contiguous near-duplicate region spanning two files, expressed in
/// fingerprint ids plus the original line ranges it covers. Carries every
/// id traversed on each side so the caller can mark the visited set.
#[derive(Debug, Clone)]
pub struct ExpandedRegion {
    /// `SourceFile` index for the first side.
    pub file_a: u32,
    /// `SourceFile` index for the second side.
    pub file_b: u32,
    /// First original line number covered on side A.
    pub a_start: u32,
    /// Last original line number covered on side A.
    pub a_end: u32,
    /// First original line number covered on side B.
    pub b_start: u32,
    /// Last original line number covered on side B.
    pub b_end: u32,
    /// `max(a_end - a_start + 1, b_end - b_start + 1)`.
    pub length: u32,
    /// Every fingerprint id walked on side A, in traversal order.
    pub traversed_a: Vec<u32>,
    /// Every fingerprint id walked on side B, in traversal order.
    pub traversed_b: Vec<u32>,
}

/// Attempt to grow a region from a single candidate pair `(id1, id2)`.
///
/// Returns `None` if the pair's own similarity doesn't clear
/// `line_threshold` — there is nothing to grow from. Otherwise walks
/// backward via `prev` links and forward via `next` links on both files in
/// lockstep, stopping on either side running out of links or the pair's
/// similarity dropping below threshold.
pub fn expand(
    store: &SignatureStore,
    id1: u32,
    id2: u32,
    line_threshold: f64,
) -> Option<ExpandedRegion> {
    let base_sim = jaccard_similarity(&store.get(id1).signature, &store.get(id2).signature);
    if base_sim < line_threshold {
        return None;
    }

    let mut traversed_a = vec![id1];
    let mut traversed_b = vec![id2];

    let mut cur_a = id1;
    let mut cur_b = id2;
    while let (Some(pa), Some(pb)) = (store.prev(cur_a), store.prev(cur_b)) {
        let sim = jaccard_similarity(&store.get(pa).signature, &store.get(pb).signature);
        if sim < line_threshold {
            break;
        }
        traversed_a.push(pa);
        traversed_b.push(pb);
        cur_a = pa;
        cur_b = pb;
    }

    let mut cur_a = id1;
    let mut cur_b = id2;
    while let (Some(na), Some(nb)) = (store.next(cur_a), store.next(cur_b)) {
        let sim = jaccard_similarity(&store.get(na).signature, &store.get(nb).signature);
        if sim < line_threshold {
            break;
        }
        traversed_a.push(na);
        traversed_b.push(nb);
        cur_a = na;
        cur_b = nb;
    }

    let a_lines: Vec<u32> = traversed_a
        .iter()
        .map(|&id| store.get(id).original_line_number)
        .collect();
    let b_lines: Vec<u32> = traversed_b
        .iter()
        .map(|&id| store.get(id).original_line_number)
        .collect();

    let a_start = *a_lines.iter().min().expect("non-empty traversal");
    let a_end = *a_lines.iter().max().expect("non-empty traversal");
    let b_start = *b_lines.iter().min().expect("non-empty traversal");
    let b_end = *b_lines.iter().max().expect("non-empty traversal");
    let length = (a_end - a_start + 1).max(b_end - b_start + 1);

    Some(ExpandedRegion {
        file_a: store.get(id1).file_index,
        file_b: store.get(id2).file_index,
        a_start,
        a_end,
        b_start,
        b_end,
        length,
        traversed_a,
        traversed_b,
    })
}

/// Mark fingerprint-id pairs as visited so a later candidate edge that
/// falls entirely within an already-expanded region doesn't spawn a
/// redundant, overlapping region.
///
/// When `tight` is `false` (the default), every combination of ids
/// traversed on side A with ids traversed on side B is marked — wider
/// than the contiguous diagonal actually walked, which can suppress a
/// legitimate, distinct region that happens to share some traversed lines
/// with this one. When `tight` is `true`, only the diagonal pairs actually
/// walked in lockstep are marked.
pub fn mark_visited(
    visited: &mut HashSet<(u32, u32)>,
    traversed_a: &[u32],
    traversed_b: &[u32],
    tight: bool,
) {
    if tight {
        for (&a, &b) in traversed_a.iter().zip(traversed_b.iter()) {
            visited.insert((a, b));
            visited.insert((b, a));
        }
    } else {
        for &a in traversed_a {
            for &b in traversed_b {
                visited.insert((a, b));
                visited.insert((b, a));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::minhash::PermutationTable;
    use crate::similarity::normalize::SourceFile;

    fn build_store(a: &str, b: &str) -> SignatureStore {
        let files = vec![SourceFile::new("a.py", a.as_bytes().to_vec()), SourceFile::new("b.py", b.as_bytes().to_vec())];
        let vocab = SignatureStore::build_vocabulary(&files, 5);
        let perm_table = PermutationTable::generate(vocab.len().max(1), 20, 1);
        SignatureStore::build(&files, 5, &vocab, &perm_table)
    }

    #[test]
    fn expands_identical_blocks_across_files() {
        let block = "line_one_here\nline_two_here\nline_three_here\n";
        let store = build_store(block, block);
        let region = expand(&store, 0, 3, 0.5).unwrap();
        assert_eq!(region.a_start, 1);
        assert_eq!(region.a_end, 3);
        assert_eq!(region.b_start, 1);
        assert_eq!(region.b_end, 3);
        assert_eq!(region.length, 3);
    }

    #[test]
    fn below_threshold_pair_does_not_expand() {
        let store = build_store("aaaaaaaaaa\n", "zzzzzzzzzz\n");
        assert!(expand(&store, 0, 1, 0.99).is_none());
    }

    #[test]
    fn tight_marking_only_marks_diagonal() {
        let mut visited = HashSet::new();
        mark_visited(&mut visited, &[0, 1, 2], &[10, 11, 12], true);
        assert!(visited.contains(&(0, 10)));
        assert!(!visited.contains(&(0, 11)));
    }

    #[test]
    fn wide_marking_marks_full_cartesian_product() {
        let mut visited = HashSet::new();
        mark_visited(&mut visited, &[0, 1], &[10, 11], false);
        assert!(visited.contains(&(0, 10)));
        assert!(visited.contains(&(0, 11)));
        assert!(visited.contains(&(1, 10)));
        assert!(visited.contains(&(1, 11)));
    }
}
