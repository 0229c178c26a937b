//! Suffix-array construction for a single chunk's text buffer.

use crate::error::{IndexError, Result};

/// Builds the suffix array of `text`, returned as `text.len()` many `u32`
/// offsets in sorted (lexicographic-by-suffix) order.
///
/// Backed by [`libsais`], the same SA-IS construction library genedex uses
/// for its FM-Index. Construction runs on the calling thread; chunk-level
/// parallelism is handled by the caller (the writer's background flush
/// thread, or the reader's query dispatcher), not by this function.
pub(crate) fn build(text: &[u8]) -> Result<Vec<u32>> {
    if text.is_empty() {
        return Err(IndexError::CorruptIndex {
            reason: "cannot build a suffix array over empty chunk text".into(),
        });
    }

    let sa = libsais::SuffixArrayConstruction::for_text(text)
        .in_owned_buffer32()
        .single_threaded()
        .run()
        .map_err(|err| IndexError::CorruptIndex {
            reason: format!("suffix array construction failed: {err:?}"),
        })?
        .into_vec();

    // libsais never produces negative offsets for a plain byte text; the
    // writer's size-limit check keeps text.len() (and thus every offset)
    // within u32 range before build() is ever called.
    Ok(sa.into_iter().map(|offset| offset as u32).collect())
}
