use crate::error::{IndexError, Result};

/// Default chunk-size threshold, in bytes of accumulated entry text
/// (including sentinels): 512 MiB, per spec.
pub const DEFAULT_MAX_CHUNK_LEN: usize = 512 * 1024 * 1024;

/// Validates a caller-supplied `max_chunk_len`: it must be nonzero and must
/// fit under the 32-bit suffix-array offset range (spec.md invariant 5).
pub(crate) fn validate_max_chunk_len(max_chunk_len: usize) -> Result<()> {
    if max_chunk_len == 0 {
        return Err(IndexError::InvalidArgument {
            reason: "max_chunk_len must be nonzero".into(),
        });
    }

    if max_chunk_len as u64 >= u32::MAX as u64 {
        return Err(IndexError::InvalidArgument {
            reason: format!("max_chunk_len must be below 2^32, got {max_chunk_len}"),
        });
    }

    Ok(())
}
