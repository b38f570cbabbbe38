//! Delimiter scanning and alignment arithmetic, shared by both readers.

use crate::{ReaderError, Result};

/// Returns the number of bytes in `window` before the first `delimiter`, or `window.len()` if
/// the delimiter does not occur.
#[inline]
pub fn scan_until(window: &[u8], delimiter: u8) -> usize {
    window
        .iter()
        .position(|&b| b == delimiter)
        .unwrap_or(window.len())
}

/// Limits a scan to `max_len` bytes of `rest`. `None` scans all of `rest`.
#[inline]
pub(crate) fn window(rest: &[u8], max_len: Option<usize>) -> &[u8] {
    match max_len {
        Some(n) if n < rest.len() => &rest[..n],
        _ => rest,
    }
}

/// Computes the position after padding `position` up to a multiple of `stride`.
///
/// A position that is already aligned is returned unchanged.
pub fn aligned_position(position: u64, stride: i64) -> Result<u64> {
    if stride <= 0 {
        return Err(ReaderError::InvalidArgument("alignment stride must be positive"));
    }
    let stride = stride as u64;
    let pad = stride - position % stride;
    if pad == stride {
        return Ok(position);
    }
    position
        .checked_add(pad)
        .ok_or(ReaderError::InvalidArgument("aligned position overflows"))
}
