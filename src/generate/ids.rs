//! Identifier pools. Every entity kind carries a distinct lexical
//! pattern so rows are visually attributable at a glance.

use std::collections::HashSet;

use rand::Rng;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const UPPER_DIGIT: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Sequential zero-padded identifiers, e.g. `MRN1000000`, `MRN1000001`.
/// Unique by construction.
pub fn sequential(prefix: &str, base: u64, width: usize, count: usize) -> Vec<String> {
    (0..count as u64)
        .map(|i| format!("{prefix}{:0width$}", base + i, width = width))
        .collect()
}

/// Random uppercase-alphanumeric code of fixed length (QR codes,
/// practice codes).
pub fn alnum_code(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| UPPER_DIGIT[rng.gen_range(0..UPPER_DIGIT.len())] as char)
        .collect()
}

/// Random uppercase-letter code of fixed length (ward prefixes, names).
pub fn upper_code(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| UPPER[rng.gen_range(0..UPPER.len())] as char)
        .collect()
}

/// Random numeric identifiers with a prefix, unique within the pool.
/// The caller keeps `count` far below the range size, so rejection
/// sampling terminates quickly.
pub fn unique_numeric(
    rng: &mut impl Rng,
    prefix: &str,
    range: std::ops::RangeInclusive<u64>,
    count: usize,
) -> Vec<String> {
    let mut seen = HashSet::with_capacity(count);
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let n = rng.gen_range(range.clone());
        if seen.insert(n) {
            out.push(format!("{prefix}{n}"));
        }
    }
    out
}
