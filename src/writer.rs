//! Ingests entries, groups them into bounded-size chunks and appends each
//! chunk's suffix-array record to the index file.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::thread::JoinHandle;

use memchr::memchr;

use crate::chunk;
use crate::config::{self, DEFAULT_MAX_CHUNK_LEN};
use crate::error::{IndexError, Result};
use crate::suffix_array;
use crate::SENTINEL;

/// A single in-flight background flush: the suffix array build and the
/// write of the resulting chunk record, running on its own thread while
/// the caller keeps accumulating the next chunk.
struct PendingFlush {
    handle: JoinHandle<Result<()>>,
}

impl PendingFlush {
    fn join(self) -> Result<()> {
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => Err(IndexError::Io(std::io::Error::other(
                "chunk flush thread panicked",
            ))),
        }
    }
}

/// Accumulates entries into chunks and persists a [chunked suffix-array
/// index](crate) to a single file.
///
/// `add_entry` appends to an in-memory buffer; once the buffer crosses
/// `max_chunk_len`, the buffer is handed to a background thread that builds
/// its suffix array and appends the resulting record to the file, while the
/// caller immediately starts filling a fresh buffer. This is a single-slot
/// pipeline: at most one flush is ever in flight, and the next flush waits
/// for it before starting. `finalize` drains the pipeline and syncs the
/// file.
pub struct Writer {
    file: File,
    max_chunk_len: usize,
    buffer: Vec<u8>,
    pending: Option<PendingFlush>,
    chunk_count: usize,
}

impl Writer {
    /// Opens `path` for exclusive write (truncating any existing file).
    ///
    /// `max_chunk_len` defaults to 512 MiB and must fit under 2^32 bytes,
    /// since suffix-array offsets are packed as `u32`.
    pub fn new(path: impl AsRef<Path>, max_chunk_len: Option<usize>) -> Result<Self> {
        let max_chunk_len = max_chunk_len.unwrap_or(DEFAULT_MAX_CHUNK_LEN);
        config::validate_max_chunk_len(max_chunk_len)?;

        let file = File::create(path.as_ref())?;

        Ok(Writer {
            file,
            max_chunk_len,
            buffer: Vec::new(),
            pending: None,
            chunk_count: 0,
        })
    }

    /// Appends `text` to the chunk buffer, followed by one sentinel byte.
    /// Flushes the buffer if it now exceeds the configured threshold.
    ///
    /// Rejects an empty `text` and a `text` containing the sentinel byte
    /// (`0x00`) with `IndexError::InvalidArgument`.
    pub fn add_entry(&mut self, text: impl AsRef<[u8]>) -> Result<()> {
        let text = text.as_ref();

        if text.is_empty() {
            return Err(IndexError::InvalidArgument {
                reason: "entry text must be non-empty".into(),
            });
        }

        if memchr(SENTINEL, text).is_some() {
            return Err(IndexError::InvalidArgument {
                reason: "entry text must not contain the sentinel byte (0x00)".into(),
            });
        }

        self.buffer.extend_from_slice(text);
        self.buffer.push(SENTINEL);

        if self.buffer.len() >= self.max_chunk_len {
            self.flush()?;
        }

        Ok(())
    }

    /// Reads `path` as UTF-8 lines (terminator stripped) and calls
    /// [`add_entry`](Self::add_entry) for each non-empty line.
    pub fn add_entries_from_file_lines(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);

        for line in reader.lines() {
            let line = line?;
            if !line.is_empty() {
                self.add_entry(line)?;
            }
        }

        Ok(())
    }

    /// Forces a flush of the current chunk buffer, if it is non-empty.
    pub fn dump_data(&mut self) -> Result<()> {
        self.flush()
    }

    /// Flushes any pending chunk, waits for the background flush pipeline
    /// to drain, and syncs the file to disk.
    pub fn finalize(mut self) -> Result<()> {
        self.flush()?;
        self.wait_pending()?;
        self.file.sync_all()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let text = std::mem::take(&mut self.buffer);
        let text_len = text.len() as u64;
        if text_len >= u32::MAX as u64 {
            return Err(IndexError::SizeLimit { chunk_len: text_len });
        }

        // Single-slot pipeline: the previous flush must be done writing
        // before this one starts, since both share the same file offset.
        self.wait_pending()?;

        let mut file = self.file.try_clone()?;
        let chunk_index = self.chunk_count;
        self.chunk_count += 1;

        let handle = std::thread::spawn(move || -> Result<()> {
            let entry_count = text.iter().filter(|&&b| b == SENTINEL).count();
            let sa = suffix_array::build(&text)?;

            let mut record = Vec::with_capacity(8 + text.len() + sa.len() * 4);
            chunk::encode_chunk(&mut record, &text, &sa)?;
            file.write_all(&record)?;

            log::debug!(
                "flushed chunk {chunk_index}: {} bytes, {entry_count} entries",
                text.len()
            );

            Ok(())
        });

        self.pending = Some(PendingFlush { handle });
        Ok(())
    }

    fn wait_pending(&mut self) -> Result<()> {
        if let Some(pending) = self.pending.take() {
            pending.join()?;
        }
        Ok(())
    }
}
