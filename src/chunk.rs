//! The on-disk chunk record layout and directory parsing.
//!
//! ```text
//! uint32  text_len        ( = n )
//! bytes   text[text_len]  ( T, including trailing sentinel )
//! uint32  sa_byte_len     ( = n * 4 )
//! bytes   sa[sa_byte_len] ( SA as packed little-endian uint32 offsets )
//! ```
//!
//! Records are concatenated with no padding and no file header or footer.

use std::io::Write;

use crate::error::{IndexError, Result};

const LEN_PREFIX_SIZE: usize = 4;

/// Writes one chunk record (`text`, with its already-built suffix array
/// `sa`) to `writer`.
pub(crate) fn encode_chunk<W: Write>(writer: &mut W, text: &[u8], sa: &[u32]) -> Result<()> {
    debug_assert_eq!(sa.len(), text.len());

    let text_len: u32 = text.len().try_into().map_err(|_| IndexError::SizeLimit {
        chunk_len: text.len() as u64,
    })?;
    let sa_byte_len: u32 = (sa.len() * 4).try_into().map_err(|_| IndexError::SizeLimit {
        chunk_len: text.len() as u64,
    })?;

    writer.write_all(&text_len.to_le_bytes())?;
    writer.write_all(text)?;
    writer.write_all(&sa_byte_len.to_le_bytes())?;
    for offset in sa {
        writer.write_all(&offset.to_le_bytes())?;
    }

    Ok(())
}

/// Byte ranges, within the full index file, of one parsed chunk record.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChunkDirEntry {
    pub(crate) text_offset: usize,
    pub(crate) text_len: usize,
    pub(crate) sa_offset: usize,
}

/// A borrowed view over one chunk's text and suffix array, without copying
/// either out of the backing file.
pub(crate) struct ChunkView<'a> {
    pub(crate) text: &'a [u8],
    pub(crate) suffix_array: SuffixArrayView<'a>,
}

impl ChunkDirEntry {
    pub(crate) fn view<'a>(&self, data: &'a [u8]) -> ChunkView<'a> {
        let text = &data[self.text_offset..self.text_offset + self.text_len];
        let sa_bytes = &data[self.sa_offset..self.sa_offset + self.text_len * 4];

        ChunkView {
            text,
            suffix_array: SuffixArrayView { bytes: sa_bytes },
        }
    }
}

/// A read-only view over a packed little-endian `u32` suffix array.
///
/// Backed by raw file (or mmap) bytes at an arbitrary, not necessarily
/// 4-byte-aligned offset, so offsets are read with [`u32::from_le_bytes`]
/// rather than [`bytemuck::cast_slice`] (which requires alignment the
/// mapped sub-slice cannot guarantee).
#[derive(Clone, Copy)]
pub(crate) struct SuffixArrayView<'a> {
    bytes: &'a [u8],
}

impl<'a> SuffixArrayView<'a> {
    pub(crate) fn len(&self) -> usize {
        self.bytes.len() / LEN_PREFIX_SIZE
    }

    pub(crate) fn get(&self, index: usize) -> usize {
        let start = index * LEN_PREFIX_SIZE;
        let bytes: [u8; 4] = self.bytes[start..start + LEN_PREFIX_SIZE]
            .try_into()
            .expect("slice of length 4");
        u32::from_le_bytes(bytes) as usize
    }
}

/// Parses the chunk directory of an index file: one linear pass reading
/// only the two length prefixes of each record and validating them against
/// the remaining file size.
pub(crate) fn parse_directory(data: &[u8]) -> Result<Vec<ChunkDirEntry>> {
    let mut entries = Vec::new();
    let mut pos = 0usize;

    while pos < data.len() {
        let text_len = read_u32(data, pos, "text_len")? as usize;
        pos += LEN_PREFIX_SIZE;

        if text_len == 0 {
            return Err(corrupt("chunk text_len is zero"));
        }

        let text_offset = pos;
        pos = pos
            .checked_add(text_len)
            .filter(|&p| p <= data.len())
            .ok_or_else(|| corrupt("chunk text is truncated"))?;

        let sa_byte_len = read_u32(data, pos, "sa_byte_len")? as usize;
        pos += LEN_PREFIX_SIZE;

        if sa_byte_len != text_len * LEN_PREFIX_SIZE {
            return Err(corrupt(format!(
                "sa_byte_len {sa_byte_len} does not match 4 * text_len {text_len}"
            )));
        }

        let sa_offset = pos;
        pos = pos
            .checked_add(sa_byte_len)
            .filter(|&p| p <= data.len())
            .ok_or_else(|| corrupt("suffix array block is truncated"))?;

        entries.push(ChunkDirEntry {
            text_offset,
            text_len,
            sa_offset,
        });
    }

    Ok(entries)
}

fn read_u32(data: &[u8], pos: usize, field: &str) -> Result<u32> {
    let end = pos
        .checked_add(LEN_PREFIX_SIZE)
        .filter(|&e| e <= data.len())
        .ok_or_else(|| corrupt(format!("truncated {field} length prefix")))?;

    let bytes: [u8; 4] = data[pos..end].try_into().expect("slice of length 4");
    Ok(u32::from_le_bytes(bytes))
}

fn corrupt(reason: impl Into<String>) -> IndexError {
    IndexError::CorruptIndex {
        reason: reason.into(),
    }
}
