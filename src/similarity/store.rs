//! Signature Store: a flat, densely-indexed table of per-line MinHash
//! signatures, with per-file prev/next links forming each file's line
//! order as a doubly-linked list over dense `u32` ids.

use rayon::prelude::*;

use crate::core::errors::{Result, SimilarityError};

use super::minhash::{build_signature, PermutationTable, Vocabulary};
use super::normalize::{normalize, SourceFile};

/// One normalized, signed line. `id` is this record's position in the
/// owning `SignatureStore`'s flat vector (a dense `u32` fingerprint id),
/// used everywhere downstream instead of a `(file, line)` string key.
#[derive(Debug, Clone)]
pub struct SignedLine {
    /// Index into the `SourceFile` slice this store was built from.
    pub file_index: u32,
    /// 1-based line number in the original (pre-normalization) file.
    pub original_line_number: u32,
    /// Normalized code text for this line.
    pub code: String,
    /// MinHash signature.
    pub signature: Vec<u32>,
    /// Previous line within the same file's normalized sequence, if any.
    pub prev: Option<u32>,
    /// Next line within the same file's normalized sequence, if any.
    pub next: Option<u32>,
}

/// Flat, dense-id-indexed store of every normalized line across a corpus,
/// built in two passes: signatures first (parallel, order-independent),
/// then prev/next linking (sequential per file, since each file's chain
/// depends on the order its lines were assigned ids in).
#[derive(Debug, Default)]
pub struct SignatureStore {
    lines: Vec<SignedLine>,
}

impl SignatureStore {
    /// Build the global shingle vocabulary from every file's normalized
    /// lines, in deterministic file-then-line order.
    pub fn build_vocabulary(files: &[SourceFile], shingle_size: usize) -> Vocabulary {
        let normalized: Vec<Vec<String>> = files
            .par_iter()
            .map(|file| {
                normalize(&file.as_str())
                    .into_iter()
                    .map(|l| l.code)
                    .collect()
            })
            .collect();

        Vocabulary::build(
            normalized.iter().flat_map(|lines| lines.iter().map(String::as_str)),
            shingle_size,
        )
    }

    /// Normalize every file, compute per-line signatures in parallel, then
    /// link each file's lines into a prev/next chain.
    ///
    /// A normalized line too short to produce any shingle has no signature
    /// and is dropped here rather than stored under a placeholder — per
    /// the data model, such a line is absent from the store, so it cannot
    /// spuriously match another short, unrelated line elsewhere in the
    /// corpus. Prev/next links skip over dropped lines transparently,
    /// since they are computed from each file's surviving signed lines
    /// only.
    pub fn build(
        files: &[SourceFile],
        shingle_size: usize,
        vocab: &Vocabulary,
        perm_table: &PermutationTable,
    ) -> Self {
        // Phase 1: normalize each file (parallel across files).
        let per_file_lines: Vec<Vec<(u32, String)>> = files
            .par_iter()
            .map(|file| {
                normalize(&file.as_str())
                    .into_iter()
                    .map(|l| (l.original_line_number, l.code))
                    .collect()
            })
            .collect();

        // Phase 2: compute signatures for every line (parallel across
        // lines, independent of file boundaries), dropping lines with no
        // signature at all.
        let mut lines: Vec<SignedLine> = Vec::new();
        let mut file_boundaries: Vec<(usize, usize)> = Vec::with_capacity(files.len());

        let flat: Vec<(u32, u32, String)> = per_file_lines
            .iter()
            .enumerate()
            .flat_map(|(file_idx, file_lines)| {
                file_lines
                    .iter()
                    .map(move |(orig, code)| (file_idx as u32, *orig, code.clone()))
            })
            .collect();

        let signatures: Vec<Option<Vec<u32>>> = flat
            .par_iter()
            .map(|(_, _, code)| build_signature(code, shingle_size, vocab, perm_table))
            .collect();

        let mut cursor = 0usize;
        for file_lines in &per_file_lines {
            let start = lines.len();
            for (i, (orig, code)) in file_lines.iter().enumerate() {
                let global_idx = cursor + i;
                let signature = match &signatures[global_idx] {
                    Some(sig) => sig.clone(),
                    None => continue,
                };
                lines.push(SignedLine {
                    file_index: flat[global_idx].0,
                    original_line_number: *orig,
                    code: code.clone(),
                    signature,
                    prev: None,
                    next: None,
                });
            }
            cursor += file_lines.len();
            file_boundaries.push((start, lines.len()));
        }

        // Phase 3: link prev/next within each file's contiguous range of
        // surviving signed lines.
        for (start, end) in file_boundaries {
            for i in start..end {
                if i > start {
                    lines[i].prev = Some((i - 1) as u32);
                }
                if i + 1 < end {
                    lines[i].next = Some((i + 1) as u32);
                }
            }
        }

        SignatureStore { lines }
    }

    /// Number of signed lines in the store.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the store holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Fetch a signed line by its dense id. Panics if `id` is out of
    /// range — callers only ever hold ids this store itself produced.
    pub fn get(&self, id: u32) -> &SignedLine {
        &self.lines[id as usize]
    }

    /// The previous line in the same file's normalized sequence, if any.
    pub fn prev(&self, id: u32) -> Option<u32> {
        self.lines[id as usize].prev
    }

    /// The next line in the same file's normalized sequence, if any.
    pub fn next(&self, id: u32) -> Option<u32> {
        self.lines[id as usize].next
    }

    /// Iterate over every signed line's id alongside its record.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &SignedLine)> {
        self.lines.iter().enumerate().map(|(i, l)| (i as u32, l))
    }

    /// Check the two invariants spec.md §3/§7 require of every signed
    /// line: every signature has exactly `expected_len` components, and
    /// `prev`/`next` links are reflexive within the same file. Called once
    /// by the pipeline right after construction; a failure here means a
    /// bug in this crate, not bad input, so it is reported as
    /// `SimilarityError::Invariant` and aborts the run rather than being
    /// silently tolerated downstream.
    pub fn validate(&self, expected_len: usize) -> Result<()> {
        for (id, line) in self.iter() {
            if line.signature.len() != expected_len {
                return Err(SimilarityError::invariant_with_context(
                    format!(
                        "signature length mismatch: expected {expected_len}, got {}",
                        line.signature.len()
                    ),
                    format!("fingerprint id {id}"),
                ));
            }

            if let Some(next_id) = line.next {
                let next = self.get(next_id);
                if next.prev != Some(id) {
                    return Err(SimilarityError::invariant_with_context(
                        "dangling next link: next.prev does not point back",
                        format!("fingerprint id {id} -> {next_id}"),
                    ));
                }
                if next.file_index != line.file_index {
                    return Err(SimilarityError::invariant_with_context(
                        "next link crosses file boundary",
                        format!("fingerprint id {id} -> {next_id}"),
                    ));
                }
            }

            if let Some(prev_id) = line.prev {
                let prev = self.get(prev_id);
                if prev.next != Some(id) {
                    return Err(SimilarityError::invariant_with_context(
                        "dangling prev link: prev.next does not point back",
                        format!("fingerprint id {id} -> {prev_id}"),
                    ));
                }
            }
        }
        Ok(())
    }
}
