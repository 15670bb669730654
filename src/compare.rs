//! Binary Blob Comparison
//!
//! Byte-exact equality assertion over two blobs, with a per-offset
//! diagnostic listing so a failing font-table comparison shows where the
//! buffers diverge, not just that they do.

use crate::font::Blob;

/// One differing offset between two equal-length buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteDiff {
    pub offset: usize,
    pub expected: u8,
    pub actual: u8,
}

/// List every differing offset between two equal-length buffers.
///
/// The buffers must have the same length; a length mismatch is a caller
/// error (debug-asserted), not something this listing can describe.
pub fn diff_blobs(expected: &Blob, actual: &Blob) -> Vec<ByteDiff> {
    debug_assert_eq!(
        expected.len(),
        actual.len(),
        "diff_blobs called with differing lengths"
    );
    expected
        .data()
        .iter()
        .zip(actual.data())
        .enumerate()
        .filter(|(_, (expected, actual))| expected != actual)
        .map(|(offset, (&expected, &actual))| ByteDiff {
            offset,
            expected,
            actual,
        })
        .collect()
}

/// Assert two blobs are byte-identical.
///
/// A length mismatch fails immediately, without a byte-level scan. With
/// equal lengths, every differing offset is first reported on stderr as
/// `+offset expected != actual` in hex; the final full-buffer assertion is
/// the authoritative pass/fail signal, the listing is diagnostic only.
pub fn assert_blobs_equal(expected: &Blob, actual: &Blob) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "blob length mismatch: expected {} bytes, actual {} bytes",
        expected.len(),
        actual.len()
    );
    if expected.data() != actual.data() {
        for diff in diff_blobs(expected, actual) {
            eprintln!("+{} {:02x} != {:02x}", diff.offset, diff.expected, diff.actual);
        }
    }
    assert!(
        expected.data() == actual.data(),
        "blob contents differ; offsets listed above"
    );
}
