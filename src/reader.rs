//! Opens a finalized index file and answers substring queries against it.

use std::fs::File;
use std::path::Path;
use std::sync::OnceLock;

use memchr::memchr;
use memmap2::Mmap;
use rayon::prelude::*;

use crate::chunk::{self, ChunkDirEntry};
use crate::error::{IndexError, Result};
use crate::search;
use crate::SENTINEL;

/// A matched entry, returned by value as the raw bytes recorded in the
/// index (see [`Reader::search`] and friends).
pub type Entry = Vec<u8>;

/// Opens a [chunked suffix-array index](crate) and answers substring
/// queries against it.
///
/// The file is memory-mapped once at open; the chunk directory (the
/// `(text_offset, text_len, sa_offset)` of each record) is parsed eagerly
/// in one linear pass over the length prefixes. Every query after that is
/// read-only over the mapped bytes, so a `Reader` can be shared across
/// threads (it is `Send + Sync`) and queried concurrently.
pub struct Reader {
    mmap: Mmap,
    directory: Vec<ChunkDirEntry>,
    pool: OnceLock<rayon::ThreadPool>,
}

impl Reader {
    /// Opens `path` read-only and parses its chunk directory.
    ///
    /// Fails with [`IndexError::NotFound`] if `path` does not exist, or
    /// [`IndexError::CorruptIndex`] if the file's length prefixes are
    /// inconsistent with its size.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                IndexError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                IndexError::Io(err)
            }
        })?;

        // SAFETY: the mapping is read-only for the lifetime of this Reader;
        // external modification of the backing file is a documented
        // precondition violation (the index file is exclusively written by
        // a single Writer and never concurrently modified while a Reader
        // holds it open), matching spec.md's concurrency model.
        let mmap = unsafe { Mmap::map(&file)? };

        let directory = chunk::parse_directory(&mmap).map_err(|err| {
            log::warn!("corrupt index at {}: {err}", path.display());
            err
        })?;

        log::debug!(
            "opened index {} with {} chunk(s)",
            path.display(),
            directory.len()
        );

        Ok(Reader {
            mmap,
            directory,
            pool: OnceLock::new(),
        })
    }

    /// Number of chunk records in this index.
    pub fn chunk_count(&self) -> usize {
        self.directory.len()
    }

    fn data(&self) -> &[u8] {
        &self.mmap
    }

    fn pool(&self) -> &rayon::ThreadPool {
        self.pool.get_or_init(|| {
            rayon::ThreadPoolBuilder::new()
                .build()
                .expect("failed to build the reader's query thread pool")
        })
    }

    /// An unsearchable query (empty, or containing the sentinel byte)
    /// returns no results without touching any chunk, per spec.md §6 and
    /// its Open Question on the sentinel-byte case.
    fn is_searchable(query: &[u8]) -> bool {
        !query.is_empty() && memchr(SENTINEL, query).is_none()
    }

    /// Alias for [`search_parallel`](Self::search_parallel).
    pub fn search(&self, substring: impl AsRef<[u8]>) -> Result<Vec<Entry>> {
        self.search_parallel(substring)
    }

    /// Convenience: concatenates `search(s)` over each `s` in `substrings`.
    pub fn search_multiple<S: AsRef<[u8]>>(
        &self,
        substrings: impl IntoIterator<Item = S>,
    ) -> Result<Vec<Entry>> {
        let mut results = Vec::new();
        for substring in substrings {
            results.extend(self.search(substring)?);
        }
        Ok(results)
    }

    /// Searches chunks in file order on the calling thread.
    pub fn search_sequential(&self, substring: impl AsRef<[u8]>) -> Result<Vec<Entry>> {
        let query = substring.as_ref();
        if !Self::is_searchable(query) {
            return Ok(Vec::new());
        }

        let data = self.data();
        let mut results = Vec::new();
        for dir_entry in &self.directory {
            let view = dir_entry.view(data);
            results.extend(search::matching_entries(&view, query).into_iter().map(<[u8]>::to_vec));
        }

        Ok(results)
    }

    /// Dispatches one task per chunk to the reader's worker pool (created
    /// lazily on first use) and concatenates results. Result order across
    /// chunks is not guaranteed.
    pub fn search_parallel(&self, substring: impl AsRef<[u8]>) -> Result<Vec<Entry>> {
        let query = substring.as_ref();
        if !Self::is_searchable(query) {
            return Ok(Vec::new());
        }

        let data = self.data();
        let directory = &self.directory;

        let per_chunk: Vec<Vec<Entry>> = self.pool().install(|| {
            directory
                .par_iter()
                .map(|dir_entry| {
                    let view = dir_entry.view(data);
                    search::matching_entries(&view, query)
                        .into_iter()
                        .map(<[u8]>::to_vec)
                        .collect()
                })
                .collect()
        });

        Ok(per_chunk.into_iter().flatten().collect())
    }

    /// Number of distinct entries in the index that contain `substring` at
    /// least once.
    pub fn count_entries(&self, substring: impl AsRef<[u8]>) -> Result<usize> {
        let query = substring.as_ref();
        if !Self::is_searchable(query) {
            return Ok(0);
        }

        let data = self.data();
        Ok(self
            .directory
            .iter()
            .map(|dir_entry| search::count_entries(&dir_entry.view(data), query))
            .sum())
    }

    /// Total number of occurrences of `substring` across all entries,
    /// counting overlapping occurrences the way a left-to-right scan
    /// advancing by one byte on each match would.
    pub fn count_occurrences(&self, substring: impl AsRef<[u8]>) -> Result<usize> {
        let query = substring.as_ref();
        if !Self::is_searchable(query) {
            return Ok(0);
        }

        let data = self.data();
        Ok(self
            .directory
            .iter()
            .map(|dir_entry| search::count_occurrences(&dir_entry.view(data), query))
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::Writer;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("subdex-reader-test-{name}-{}", std::process::id()))
    }

    fn build_index(path: &Path, entries: &[&str], max_chunk_len: Option<usize>) {
        let mut writer = Writer::new(path, max_chunk_len).unwrap();
        for entry in entries {
            writer.add_entry(entry.as_bytes()).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn open_missing_file_is_not_found() {
        assert!(matches!(
            Reader::open("subdex-definitely-missing-index-file"),
            Err(IndexError::NotFound { .. })
        ));
    }

    #[test]
    fn open_corrupt_file_is_corrupt_index() {
        let path = temp_path("corrupt");
        std::fs::write(&path, [0xffu8, 0xff, 0xff, 0xff]).unwrap();

        assert!(matches!(
            Reader::open(&path),
            Err(IndexError::CorruptIndex { .. })
        ));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn end_to_end_scenario_one() {
        let path = temp_path("scenario-one");
        build_index(
            &path,
            &[
                "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
            ],
            None,
        );

        let reader = Reader::open(&path).unwrap();

        assert_eq!(reader.search(b"four").unwrap(), vec![b"four".to_vec()]);

        let f_matches: std::collections::HashSet<Vec<u8>> =
            reader.search(b"f").unwrap().into_iter().collect();
        assert_eq!(
            f_matches,
            std::collections::HashSet::from([b"four".to_vec(), b"five".to_vec()])
        );

        assert_eq!(reader.search(b"our").unwrap(), vec![b"four".to_vec()]);
        assert!(reader.search(b"aaa").unwrap().is_empty());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn end_to_end_scenario_two_overlap_and_counts() {
        let path = temp_path("scenario-two");
        build_index(
            &path,
            &[
                "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
                "tenten",
            ],
            None,
        );

        let reader = Reader::open(&path).unwrap();

        let ten_matches: std::collections::HashSet<Vec<u8>> =
            reader.search(b"ten").unwrap().into_iter().collect();
        assert_eq!(
            ten_matches,
            std::collections::HashSet::from([b"ten".to_vec(), b"tenten".to_vec()])
        );

        assert!(reader.search(b"onet").unwrap().is_empty());
        assert_eq!(reader.search(b"one").unwrap(), vec![b"one".to_vec()]);
        assert_eq!(reader.count_occurrences(b"ten").unwrap(), 3);
        assert_eq!(reader.count_entries(b"ten").unwrap(), 2);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn non_ascii_byte_sequences_match_exactly() {
        let path = temp_path("non-ascii");
        build_index(&path, &["诶比西"], None);

        let reader = Reader::open(&path).unwrap();

        assert_eq!(
            reader.search("诶".as_bytes()).unwrap(),
            vec!["诶比西".as_bytes().to_vec()]
        );
        assert_eq!(
            reader.search("诶比".as_bytes()).unwrap(),
            vec!["诶比西".as_bytes().to_vec()]
        );
        assert!(reader.search("比诶".as_bytes()).unwrap().is_empty());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn query_containing_sentinel_byte_is_empty() {
        let path = temp_path("sentinel-query");
        build_index(&path, &["abc"], None);

        let reader = Reader::open(&path).unwrap();
        assert!(reader.search(b"a\0b").unwrap().is_empty());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let path = temp_path("parallel-vs-sequential");
        build_index(
            &path,
            &[
                "some short string",
                "another but now a longer string",
                "more text to add",
            ],
            Some(8),
        );

        let reader = Reader::open(&path).unwrap();

        for query in [b"short".as_slice(), b"string".as_slice(), b"text".as_slice()] {
            let mut parallel: Vec<_> = reader.search_parallel(query).unwrap();
            let mut sequential: Vec<_> = reader.search_sequential(query).unwrap();
            parallel.sort();
            sequential.sort();
            assert_eq!(parallel, sequential);
        }
    }

    #[test]
    fn search_multiple_concatenates_results() {
        let path = temp_path("search-multiple");
        build_index(&path, &["four", "five", "six"], None);

        let reader = Reader::open(&path).unwrap();
        let mut results = reader.search_multiple([b"four".as_slice(), b"six".as_slice()]).unwrap();
        results.sort();

        let mut expected = vec![b"four".to_vec(), b"six".to_vec()];
        expected.sort();
        assert_eq!(results, expected);
    }
}
