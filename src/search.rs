//! Per-chunk substring search: two binary searches over a chunk's suffix
//! array, followed by entry-boundary recovery and per-chunk deduplication.

use std::collections::HashSet;
use std::ops::Range;

use crate::chunk::ChunkView;
use crate::SENTINEL;

/// The half-open range `[lo, hi)` of suffix-array indices whose suffix
/// starts with `query`.
fn matching_range(view: &ChunkView, query: &[u8]) -> Range<usize> {
    let n = view.suffix_array.len();

    // The m-byte prefix window of the suffix at SA[i], per spec.md §4.4
    // steps 2-3 (`T[SA[i]..SA[i]+m]`). Comparing the full remaining suffix
    // instead would make a suffix that merely *starts with* query compare as
    // strictly greater than query (the shorter slice of two sharing a common
    // prefix is Less), since every real match is followed by at least the
    // chunk's trailing sentinel.
    let prefix_at = |i: usize| -> &[u8] {
        let pos = view.suffix_array.get(i);
        let end = (pos + query.len()).min(view.text.len());
        &view.text[pos..end]
    };

    // smallest index i such that suffix(SA[i])[..m] >= query
    let lo = partition_point(n, |i| prefix_at(i) < query);
    // smallest index i such that suffix(SA[i])[..m] > query
    let hi = partition_point(n, |i| prefix_at(i) <= query);

    lo..hi
}

fn partition_point(n: usize, mut is_before: impl FnMut(usize) -> bool) -> usize {
    let mut lo = 0;
    let mut hi = n;

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if is_before(mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    lo
}

/// Returns the byte range `[L+1, R)` of the entry enclosing `pos`: the
/// maximal substring of `text` containing `pos` and no sentinel byte.
fn entry_bounds(text: &[u8], pos: usize) -> Range<usize> {
    let start = memchr::memrchr(SENTINEL, &text[..pos]).map_or(0, |i| i + 1);
    let end = memchr::memchr(SENTINEL, &text[pos..]).map_or(text.len(), |i| pos + i);

    start..end
}

/// Number of occurrences of `query` in this chunk (spec step 5: `hi - lo`).
pub(crate) fn count_occurrences(view: &ChunkView, query: &[u8]) -> usize {
    let range = matching_range(view, query);
    range.end - range.start
}

/// The distinct entries (by byte range, deduplicated within this chunk)
/// that contain `query` at least once.
pub(crate) fn matching_entries<'a>(view: &ChunkView<'a>, query: &[u8]) -> Vec<&'a [u8]> {
    let range = matching_range(view, query);
    let mut seen_starts = HashSet::new();
    let mut entries = Vec::new();

    for i in range {
        let pos = view.suffix_array.get(i);
        let bounds = entry_bounds(view.text, pos);

        if seen_starts.insert(bounds.start) {
            entries.push(&view.text[bounds]);
        }
    }

    entries
}

/// Number of distinct entries (deduplicated within this chunk) that contain
/// `query` at least once.
pub(crate) fn count_entries(view: &ChunkView, query: &[u8]) -> usize {
    let range = matching_range(view, query);
    let mut seen_starts = HashSet::new();

    for i in range {
        let pos = view.suffix_array.get(i);
        seen_starts.insert(entry_bounds(view.text, pos).start);
    }

    seen_starts.len()
}
