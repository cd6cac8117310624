//! Ranker / Dedup: drains candidate edges into expanded regions, ranked
//! longest-first, with a visited set preventing the same underlying match
//! from being reported more than once.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use super::graph::CandidateGraph;
use super::region::{expand, mark_visited, ExpandedRegion};
use super::store::SignatureStore;
use crate::core::config::Config;

/// Max-heap wrapper ordering `ExpandedRegion`s by `length`.
struct RankedRegion(ExpandedRegion);

impl PartialEq for RankedRegion {
    fn eq(&self, other: &Self) -> bool {
        self.0.length == other.0.length
    }
}
impl Eq for RankedRegion {}
impl PartialOrd for RankedRegion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for RankedRegion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.length.cmp(&other.0.length)
    }
}

/// Walk every candidate edge, expand it into a region, and return every
/// region whose length clears `config.region_length`, longest first.
///
/// Same-file pairs are skipped (a near-duplicate region only means
/// anything across two distinct files). Regions are deduplicated via a
/// visited set over the fingerprint ids each expansion actually traversed
/// — see `region::mark_visited` for the wide-vs-tight marking tradeoff.
///
/// The heap is drained fully rather than stopping at the first region
/// below `region_length`: because `BinaryHeap::pop` yields a
/// non-increasing sequence, the first region that fails the length check
/// means every remaining region fails it too, so the loop still does no
/// more work than necessary — but it no longer drops the single longest
/// region the way popping-before-checking would.
pub fn find_regions(store: &SignatureStore, graph: &CandidateGraph, config: &Config) -> Vec<ExpandedRegion> {
    let mut visited: HashSet<(u32, u32)> = HashSet::new();
    let mut heap: BinaryHeap<RankedRegion> = BinaryHeap::new();

    for (a, b) in graph.edges() {
        if visited.contains(&(a, b)) {
            continue;
        }
        if store.get(a).file_index == store.get(b).file_index {
            continue;
        }
        if let Some(region) = expand(store, a, b, config.line_threshold) {
            mark_visited(
                &mut visited,
                &region.traversed_a,
                &region.traversed_b,
                config.tight_visited_marking,
            );
            heap.push(RankedRegion(region));
        }
    }

    let mut out = Vec::new();
    while let Some(RankedRegion(region)) = heap.pop() {
        if region.length < config.region_length {
            break;
        }
        out.push(region);
    }
    out
}
