//! Shingler: breaks a normalized line of code into fixed-length character
//! shingles.

use std::collections::HashSet;

/// Produce the set of all length-`k` character shingles in `code`.
///
/// Shingling is char-based rather than byte-based: a fixed-length *byte*
/// window can split a multi-byte UTF-8 codepoint in half on non-ASCII
/// source, which would make `&code[i..i+k]` panic or produce invalid UTF-8.
/// Operating on `char`s sidesteps that entirely at the cost of an extra
/// `Vec<char>` collection per line, which is cheap relative to the rest of
/// the pipeline.
///
/// Returns `None` if the line has `k` or fewer characters — too short to
/// produce any shingle at all, mirroring the "no shingles" sentinel this
/// crate's signature generator relies on (see `minhash::build_signature`).
pub fn shingle_set(code: &str, k: usize) -> Option<HashSet<String>> {
    let chars: Vec<char> = code.chars().collect();
    if chars.len() <= k {
        return None;
    }

    let mut set = HashSet::with_capacity(chars.len() - k);
    for window in chars.windows(k) {
        set.insert(window.iter().collect());
    }
    Some(set)
}
