use subdex::{Reader, Writer};
use tempfile::NamedTempFile;

fn main() {
    // This example shows how to build and query a chunked suffix-array index.

    let path = NamedTempFile::new().unwrap().into_temp_path();

    let mut writer = Writer::new(&path, None).unwrap();
    for entry in ["one", "two", "three", "four", "five"] {
        writer.add_entry(entry).unwrap();
    }
    writer.finalize().unwrap();

    let reader = Reader::open(&path).unwrap();

    let query = b"our";
    for entry in reader.search(query).unwrap() {
        println!(
            "Found {query:?} in entry {:?}.",
            String::from_utf8_lossy(&entry)
        );
    }

    // for many queries, search_multiple can be used for convenience
    let many_queries = [b"f".as_slice(), b"t", b"seven"];
    let hits = reader.search_multiple(many_queries).unwrap();
    println!("{} total hits across {} queries.", hits.len(), many_queries.len());

    println!("entries containing \"o\": {}", reader.count_entries(b"o").unwrap());
}
