//! LSH Bander: splits each line's MinHash signature into bands and groups
//! lines that land in the same bucket for a given band, producing the
//! candidate pairs the rest of the pipeline will Jaccard-gate.

use std::hash::{Hash, Hasher};

use ahash::AHashMap;
use rayon::prelude::*;

use super::store::SignatureStore;

/// Hash one band's slice of signature components into a bucket key.
/// Because signature components are exact vocabulary indices rather than
/// already-hashed values, two lines land in the same bucket whenever their
/// band slices are literally equal; the hash here exists purely so the
/// bucket table can use a fast integer key instead of comparing slices.
fn band_key(band: &[u32]) -> u64 {
    let mut hasher = ahash::AHasher::default();
    band.hash(&mut hasher);
    hasher.finish()
}

/// Per-band hash tables mapping a bucket key to every line id that landed
/// in it.
#[derive(Debug, Default)]
pub struct BandBuckets {
    bands: Vec<AHashMap<u64, Vec<u32>>>,
}

impl BandBuckets {
    /// Split every line's signature in `store` into `num_bands` bands of
    /// `hashes_per_band` components each and bucket them. Bucketing itself
    /// (hashing each line's bands) parallelizes across lines; insertion
    /// into the shared per-band tables is the sequential merge step.
    pub fn build(store: &SignatureStore, num_bands: usize, hashes_per_band: usize) -> Self {
        let keyed: Vec<(u32, Vec<u64>)> = (0..store.len() as u32)
            .into_par_iter()
            .map(|id| {
                let signature = &store.get(id).signature;
                let keys = (0..num_bands)
                    .map(|band_idx| {
                        let start = band_idx * hashes_per_band;
                        let end = (start + hashes_per_band).min(signature.len());
                        band_key(&signature[start..end])
                    })
                    .collect();
                (id, keys)
            })
            .collect();

        let mut bands: Vec<AHashMap<u64, Vec<u32>>> = (0..num_bands)
            .map(|_| AHashMap::default())
            .collect();

        for (id, keys) in keyed {
            for (band_idx, key) in keys.into_iter().enumerate() {
                bands[band_idx].entry(key).or_default().push(id);
            }
        }

        BandBuckets { bands }
    }

    /// Every bucket across every band that holds two or more lines — the
    /// raw candidate groups before pairwise enumeration.
    pub fn buckets(&self) -> impl Iterator<Item = &Vec<u32>> {
        self.bands
            .iter()
            .flat_map(|band| band.values())
            .filter(|bucket| bucket.len() > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::minhash::PermutationTable;
    use crate::similarity::normalize::SourceFile;

    #[test]
    fn identical_signatures_share_a_bucket() {
        let files = vec![
            SourceFile::new("a.py", b"x = 1\n".to_vec()),
            SourceFile::new("b.py", b"x = 1\n".to_vec()),
        ];
        let vocab = SignatureStore::build_vocabulary(&files, 3);
        let perm_table = PermutationTable::generate(vocab.len().max(1), 20, 1);
        let store = SignatureStore::build(&files, 3, &vocab, &perm_table);

        let buckets = BandBuckets::build(&store, 4, 5);
        let grouped: Vec<&Vec<u32>> = buckets.buckets().collect();
        assert!(grouped.iter().any(|b| b.contains(&0) && b.contains(&1)));
    }
}
