use std::collections::HashSet;

use proptest::prelude::*;
use subdex::{Reader, Writer};
use tempfile::NamedTempFile;

/// Reference implementation of `count_occurrences`: a left-to-right scan
/// advancing by one byte on every match, counting overlaps.
fn naive_count_occurrences(entry: &[u8], query: &[u8]) -> usize {
    if query.is_empty() || query.len() > entry.len() {
        return 0;
    }

    (0..=entry.len() - query.len())
        .filter(|&i| &entry[i..i + query.len()] == query)
        .count()
}

fn build_and_open(entries: &[Vec<u8>], max_chunk_len: Option<usize>) -> (Reader, tempfile::TempPath) {
    let path = NamedTempFile::new().unwrap().into_temp_path();
    let mut writer = Writer::new(&path, max_chunk_len).unwrap();
    for entry in entries {
        writer.add_entry(entry).unwrap();
    }
    writer.finalize().unwrap();
    let reader = Reader::open(&path).unwrap();
    (reader, path)
}

fn arb_entry() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=4, 1..24)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn any_contiguous_slice_of_an_entry_is_found(
        entries in prop::collection::vec(arb_entry(), 1..12),
        slice_start in 0usize..20,
        slice_len in 1usize..8,
    ) {
        let (reader, _path) = build_and_open(&entries, None);

        for entry in &entries {
            if slice_start >= entry.len() {
                continue;
            }
            let end = (slice_start + slice_len).min(entry.len());
            if end <= slice_start {
                continue;
            }
            let query = &entry[slice_start..end];

            let results: HashSet<Vec<u8>> = reader.search(query).unwrap().into_iter().collect();
            prop_assert!(results.contains(entry));
        }
    }

    #[test]
    fn count_occurrences_matches_naive_scalar_scan(
        entries in prop::collection::vec(arb_entry(), 1..10),
        query in prop::collection::vec(1u8..=4, 1..5),
    ) {
        let (reader, _path) = build_and_open(&entries, None);

        let expected: usize = entries.iter().map(|e| naive_count_occurrences(e, &query)).sum();
        prop_assert_eq!(reader.count_occurrences(&query).unwrap(), expected);
    }

    #[test]
    fn count_entries_matches_reference_containment(
        entries in prop::collection::vec(arb_entry(), 1..10),
        query in prop::collection::vec(1u8..=4, 1..5),
    ) {
        let (reader, _path) = build_and_open(&entries, None);

        let expected = entries
            .iter()
            .filter(|e| naive_count_occurrences(e, &query) > 0)
            .count();
        prop_assert_eq!(reader.count_entries(&query).unwrap(), expected);
    }

    #[test]
    fn parallel_and_sequential_return_the_same_multiset(
        entries in prop::collection::vec(arb_entry(), 1..30),
        max_chunk_len in prop::option::of(4usize..64),
        query in prop::collection::vec(1u8..=4, 1..4),
    ) {
        let (reader, _path) = build_and_open(&entries, max_chunk_len);

        let mut parallel = reader.search_parallel(&query).unwrap();
        let mut sequential = reader.search_sequential(&query).unwrap();
        parallel.sort();
        sequential.sort();
        prop_assert_eq!(parallel, sequential);
    }

    #[test]
    fn chunking_threshold_does_not_change_the_search_multiset(
        entries in prop::collection::vec(arb_entry(), 1..30),
        threshold_a in 4usize..64,
        threshold_b in 64usize..512,
        query in prop::collection::vec(1u8..=4, 1..4),
    ) {
        let (reader_a, _path_a) = build_and_open(&entries, Some(threshold_a));
        let (reader_b, _path_b) = build_and_open(&entries, Some(threshold_b));

        let mut a = reader_a.search(&query).unwrap();
        let mut b = reader_b.search(&query).unwrap();
        a.sort();
        b.sort();
        prop_assert_eq!(a, b);
    }
}
