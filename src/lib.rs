/*! A persistent, chunked suffix-array index for substring search over a
 * collection of text entries.
 *
 * A [`Writer`] ingests entries one at a time, groups them into
 * bounded-size chunks, builds a suffix array over each chunk (via
 * [`libsais`], the same SA-IS backend genedex uses for its FM-Index), and
 * appends both the chunk's raw text and its suffix array to a single
 * on-disk index file. A [`Reader`] opens such a file and, given a query
 * substring, returns every stored entry that contains that substring as a
 * contiguous byte subsequence, by running two binary searches over each
 * chunk's suffix array.
 *
 * Matching is exact and byte-level: no regular expressions, wildcards,
 * case folding, or tokenization. Non-ASCII text is matched as raw bytes.
 *
 * ## Usage
 *
 * ```
 * use subdex::{Reader, Writer};
 * use tempfile::NamedTempFile;
 *
 * let path = NamedTempFile::new().unwrap().into_temp_path();
 *
 * let mut writer = Writer::new(&path, None).unwrap();
 * writer.add_entry("four").unwrap();
 * writer.add_entry("five").unwrap();
 * writer.finalize().unwrap();
 *
 * let reader = Reader::open(&path).unwrap();
 * assert_eq!(reader.search(b"four").unwrap(), vec![b"four".to_vec()]);
 * assert_eq!(reader.count_entries(b"f").unwrap(), 2);
 * ```
 *
 * ## Index file format
 *
 * The file is a sequence of chunk records with no header or footer. Each
 * record is a little-endian length-prefixed text blob followed by a
 * little-endian length-prefixed block of packed `u32` suffix-array
 * offsets; see the [`chunk`] module documentation for the exact layout.
 *
 * ## Safety
 *
 * [`Reader::open`] memory-maps the index file; the mapping is only sound
 * if the file is not modified by another process while the `Reader` is
 * alive, matching this crate's single-writer, read-only-reader
 * concurrency model.
 */

mod chunk;
mod config;
mod error;
mod reader;
mod search;
mod suffix_array;
mod writer;

#[doc(inline)]
pub use error::{IndexError, Result};
#[doc(inline)]
pub use reader::{Entry, Reader};
#[doc(inline)]
pub use writer::Writer;

/// The byte value that separates entries within a chunk and terminates
/// each chunk's text blob. Smaller than any byte a stored entry may
/// contain; queries containing it always return no results.
pub(crate) const SENTINEL: u8 = 0x00;
