//! Near-duplicate source region detection.
//!
//! Given a set of already-read source files, finds contiguous blocks of
//! lines that closely match across distinct files. The pipeline runs in
//! five phases:
//!
//! 1. **Normalize** each file into a sequence of code lines, discarding
//!    imports, comments, decorators, blank lines and multi-line string
//!    bodies (`similarity::normalize`).
//! 2. **Shingle and MinHash** every normalized line into a fixed-length
//!    signature over a shared vocabulary of character shingles
//!    (`similarity::shingles`, `similarity::minhash`).
//! 3. **Band** each signature with LSH to find candidate near-duplicate
//!    line pairs without an all-pairs comparison (`similarity::lsh`).
//! 4. **Graph and expand**: gate candidates by exact Jaccard similarity,
//!    then grow each surviving pair outward along each file's line order
//!    into the largest contiguous matching block (`similarity::graph`,
//!    `similarity::region`).
//! 5. **Rank and dedup**: emit every region at least `region_length` lines
//!    long, longest first, with no region reported twice
//!    (`similarity::rank`).
//!
//! This crate intentionally does not walk directories, filter file
//! extensions, expose a CLI, render reports, or compare files by AST or
//! semantic equivalence — those are an embedding application's job. It
//! does carry its own configuration schema and validation, structured
//! errors, and structured logging, since those are not concerns an
//! embedder should have to re-invent.

#![warn(missing_docs)]

#[cfg(feature = "mimalloc")]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod core;
pub mod similarity;

pub use core::config::Config;
pub use core::errors::{Result, SimilarityError};
pub use similarity::{find_similar_regions, Region, SourceFile};
