use subdex::Writer;
use tempfile::NamedTempFile;

fn main() {
    // This example shows how a low max_chunk_len forces the writer to split
    // entries across several chunk records, and that searches return the
    // same results regardless of how the index happens to be chunked.

    let path = NamedTempFile::new().unwrap().into_temp_path();

    let mut writer = Writer::new(&path, Some(8)).unwrap();
    for entry in ["abcd", "efgh", "ijkl", "mnop"] {
        writer.add_entry(entry).unwrap();
    }
    // dump_data forces a flush even if the buffer hasn't crossed the threshold yet.
    writer.dump_data().unwrap();
    writer.finalize().unwrap();

    let reader = subdex::Reader::open(&path).unwrap();
    println!("index has {} chunk(s)", reader.chunk_count());

    assert_eq!(reader.search_sequential(b"f").unwrap(), vec![b"efgh".to_vec()]);

    // search_parallel fans one task per chunk out to the reader's worker pool;
    // the result multiset is identical to search_sequential's, just possibly
    // in a different order.
    let mut parallel = reader.search_parallel(b"ij").unwrap();
    parallel.sort();
    assert_eq!(parallel, vec![b"ijkl".to_vec()]);
}
