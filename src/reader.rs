use alloc::vec::Vec;
use core::fmt;

use tracing::{debug, trace};

use crate::codec::{decode_7bit_i32, decode_7bit_i64, decode_array_into, decode_span};
use crate::scan::{aligned_position, scan_until, window};
use crate::{
    CountPrefix, Endian, EndianMode, EndianRead, ReaderConfig, ReaderError, Result, Scalar,
    ScalarKind, SeekFrom, Value,
};

/// Reads values from a borrowed slice of bytes, with a seekable cursor.
///
/// Multi-byte values are decoded in the byte order selected by each call: the reader's
/// configured order (`read_u32`), or an explicit one (`read_u32_le`, `read_u32_be`).
///
/// The reader never copies the region it reads from. Byte-level reads (`read`, `read_until`,
/// `get_buffer`, ...) return subslices with the region's lifetime `'a`.
///
/// There are two kinds of short read, and they behave differently:
///
/// * `read`, `read_into` and the delimiter scans return fewer bytes than requested if the
///   region ends first. This is not an error.
/// * Fixed-width reads (`read_scalar`, `read_array`, `read_exact`, `align`) fail with
///   `ReaderError::BufferUnderflow` and leave the position where it was.
///
/// The position may be moved past the end of the region with `seek`; subsequent reads simply
/// return no data.
///
/// After `close`, every operation except `close` and `is_closed` fails with
/// `ReaderError::Closed`.
pub struct BufferReader<'a> {
    /// The region being read. `None` once the reader has been closed.
    data: Option<&'a [u8]>,
    pos: u64,
    endian: Endian,
    count_prefix: CountPrefix,
    writable: bool,
}

impl<'a> BufferReader<'a> {
    /// Creates a reader over `data` with the given default byte order.
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self::with_config(data, ReaderConfig::new(endian))
    }

    /// Creates a reader over a region that was lent mutably. `writable` reports `true`.
    ///
    /// The reader never writes to the region.
    pub fn new_mut(data: &'a mut [u8], endian: Endian) -> Self {
        let mut reader = Self::new(data, endian);
        reader.writable = true;
        reader
    }

    /// Creates a reader from an endianness selector character, `'<'` or `'>'`.
    pub fn from_selector(data: &'a [u8], endian: char) -> Result<Self> {
        Ok(Self::new(data, Endian::from_char(endian)?))
    }

    /// Creates a reader with explicit configuration.
    pub fn with_config(data: &'a [u8], config: ReaderConfig) -> Self {
        debug!(
            len = data.len(),
            endian = %config.endian.as_char(),
            "opened buffer reader"
        );
        Self {
            data: Some(data),
            pos: 0,
            endian: config.endian,
            count_prefix: config.count_prefix,
            writable: false,
        }
    }

    /// The whole region, or `Closed`.
    #[inline(always)]
    fn region(&self) -> Result<&'a [u8]> {
        self.data.ok_or(ReaderError::Closed)
    }

    /// The bytes from the position to the end of the region. Empty if the position is past the
    /// end.
    #[inline(always)]
    fn rest(&self) -> Result<&'a [u8]> {
        let data = self.region()?;
        let start = usize::try_from(self.pos).unwrap_or(usize::MAX);
        Ok(data.get(start..).unwrap_or(&[]))
    }

    /// Exactly `len` bytes at the position, without advancing.
    #[inline(always)]
    fn span(&self, len: usize) -> Result<&'a [u8]> {
        let rest = self.rest()?;
        match rest.get(..len) {
            Some(span) => Ok(span),
            None => {
                trace!(needed = len, available = rest.len(), pos = self.pos, "buffer underflow");
                Err(ReaderError::underflow(len as u64, rest.len() as u64))
            }
        }
    }

    #[inline(always)]
    fn advance(&mut self, len: usize) {
        self.pos += len as u64;
    }

    /// The reader's default byte order.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Changes the reader's default byte order.
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// The strategy used by uncounted array reads.
    pub fn count_prefix(&self) -> CountPrefix {
        self.count_prefix
    }

    /// Replaces the strategy used by uncounted array reads.
    pub fn set_count_prefix(&mut self, count_prefix: CountPrefix) {
        self.count_prefix = count_prefix;
    }

    /// Returns `true` once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.data.is_none()
    }

    /// Length of the region.
    pub fn len(&self) -> Result<usize> {
        Ok(self.region()?.len())
    }

    /// Returns `true` if the region is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.region()?.is_empty())
    }

    /// Number of bytes between the position and the end of the region.
    pub fn remaining(&self) -> Result<usize> {
        Ok(self.rest()?.len())
    }

    /// Returns the current position.
    pub fn tell(&self) -> Result<u64> {
        self.region()?;
        Ok(self.pos)
    }

    /// Moves the position and returns the new position.
    ///
    /// Seeking past the end of the region is allowed. Seeking before the start fails with
    /// `InvalidArgument` and leaves the position unchanged.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let len = self.region()?.len() as u64;
        let Some(new_pos) = pos.resolve(self.pos, len) else {
            return Err(ReaderError::InvalidArgument("negative seek position"));
        };
        trace!(from = self.pos, to = new_pos, "seek");
        self.pos = new_pos;
        Ok(new_pos)
    }

    /// Reads up to `n` bytes; `None` reads everything that remains.
    ///
    /// Returns fewer bytes than requested (possibly none) if the region ends first.
    pub fn read(&mut self, n: Option<usize>) -> Result<&'a [u8]> {
        let rest = self.rest()?;
        let len = n.map_or(rest.len(), |n| n.min(rest.len()));
        self.advance(len);
        Ok(&rest[..len])
    }

    /// Copies as many bytes as fit into `dest` and returns the number copied.
    pub fn read_into(&mut self, dest: &mut [u8]) -> Result<usize> {
        let rest = self.rest()?;
        let len = dest.len().min(rest.len());
        dest[..len].copy_from_slice(&rest[..len]);
        self.advance(len);
        Ok(len)
    }

    /// Reads a slice of bytes whose length is exactly `len`. This function returns a slice
    /// reference to the bytes; it does not copy them.
    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8]> {
        let span = self.span(len)?;
        self.advance(len);
        Ok(span)
    }

    /// Reads a small array of bytes, with a constant length.
    #[inline(always)]
    pub fn read_cbytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.span(N)?);
        self.advance(N);
        Ok(out)
    }

    /// Reads one value of type `T`.
    #[inline]
    pub fn read_scalar<T: Scalar>(&mut self, mode: EndianMode) -> Result<T> {
        let span = self.span(T::SIZE)?;
        let value = decode_span::<T>(span, mode, self.endian);
        self.advance(T::SIZE);
        Ok(value)
    }

    /// Reads `count` values of type `T`. If `count` is `None`, the count is first read using
    /// the reader's `CountPrefix`.
    ///
    /// If the array does not fit in the remaining bytes, this fails with `BufferUnderflow` and
    /// the position is restored to where it was before the call, including any count prefix.
    pub fn read_array<T: Scalar>(
        &mut self,
        count: Option<usize>,
        mode: EndianMode,
    ) -> Result<Vec<T>> {
        let start = self.pos;
        let result = match count {
            Some(count) => self.read_counted::<T>(count, mode),
            None => self
                .read_count()
                .and_then(|count| self.read_counted::<T>(count, mode)),
        };
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    /// Reads an array of `T` whose count is produced by `count`, which is given this reader and
    /// typically decodes a length prefix from it.
    ///
    /// `count` must produce an integer value; otherwise this fails with `TypeMismatch`. On any
    /// failure the position is restored to where it was before the call.
    pub fn read_array_with<T, F>(&mut self, count: F, mode: EndianMode) -> Result<Vec<T>>
    where
        T: Scalar,
        F: FnOnce(&mut Self) -> Result<Value>,
    {
        let start = self.pos;
        let result = count(self)
            .and_then(|v| v.as_count())
            .and_then(|count| self.read_counted::<T>(count, mode));
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    fn read_counted<T: Scalar>(&mut self, count: usize, mode: EndianMode) -> Result<Vec<T>> {
        let Some(len) = count.checked_mul(T::SIZE) else {
            return Err(ReaderError::underflow(u64::MAX, self.remaining()? as u64));
        };
        let span = self.span(len)?;
        let mut out = Vec::with_capacity(count);
        decode_array_into::<T>(span, mode, self.endian, &mut out);
        self.advance(len);
        Ok(out)
    }

    /// Reads an array length using the configured `CountPrefix`.
    pub fn read_count(&mut self) -> Result<usize> {
        match self.count_prefix {
            CountPrefix::Unset => Err(ReaderError::Unsupported("uncounted array read")),
            CountPrefix::Scalar { kind, .. } if !kind.is_integer() => {
                Err(ReaderError::TypeMismatch("count prefix must be an integer type"))
            }
            CountPrefix::Scalar { kind, mode } => self.read_value(kind, mode)?.as_count(),
            CountPrefix::SevenBitEncoded => Value::I32(self.read_7bit_encoded_i32()?).as_count(),
        }
    }

    /// Reads a variable-length integer and returns the value in `i32`.
    ///
    /// On failure the position is left after the bytes that were consumed.
    pub fn read_7bit_encoded_i32(&mut self) -> Result<i32> {
        decode_7bit_i32(|| self.read_u8())
    }

    /// Reads a variable-length integer and returns the value in `i64`.
    pub fn read_7bit_encoded_i64(&mut self) -> Result<i64> {
        decode_7bit_i64(|| self.read_u8())
    }

    for_each_scalar!(scalar_methods);

    /// Reads the bytes up to, but not including, the first `delimiter`, scanning at most
    /// `max_len` bytes (`None` scans everything that remains).
    ///
    /// The delimiter is not consumed; it is the next byte to be read. If no delimiter is found
    /// the whole scanned window is returned.
    pub fn read_until(&mut self, delimiter: u8, max_len: Option<usize>) -> Result<&'a [u8]> {
        let window = window(self.rest()?, max_len);
        let len = scan_until(window, delimiter);
        self.advance(len);
        Ok(&window[..len])
    }

    /// Reads up to the next `'\n'`, which is not consumed.
    pub fn read_line(&mut self, max_len: Option<usize>) -> Result<&'a [u8]> {
        self.read_until(b'\n', max_len)
    }

    /// Reads up to the next NUL byte, which is not consumed.
    pub fn read_cstring(&mut self, max_len: Option<usize>) -> Result<&'a [u8]> {
        self.read_until(b'\0', max_len)
    }

    /// Reads lines within the next `max_len` bytes (`None` for everything that remains).
    ///
    /// Stops at the first empty line. Because `read_line` leaves the `'\n'` unconsumed, a
    /// newline immediately at the position ends the scan.
    pub fn read_lines(&mut self, max_len: Option<usize>) -> Result<Vec<&'a [u8]>> {
        let window_len = window(self.rest()?, max_len).len() as u64;
        let end = self.pos + window_len;
        let mut lines = Vec::new();
        while self.pos < end {
            let line = self.read_line(Some((end - self.pos) as usize))?;
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines)
    }

    /// Like `read_until`, returning a `bstr::BStr`.
    #[cfg(feature = "bstr")]
    pub fn read_until_bstr(
        &mut self,
        delimiter: u8,
        max_len: Option<usize>,
    ) -> Result<&'a bstr::BStr> {
        Ok(bstr::BStr::new(self.read_until(delimiter, max_len)?))
    }

    /// Like `read_line`, returning a `bstr::BStr`.
    #[cfg(feature = "bstr")]
    pub fn read_line_bstr(&mut self, max_len: Option<usize>) -> Result<&'a bstr::BStr> {
        self.read_until_bstr(b'\n', max_len)
    }

    /// Like `read_cstring`, returning a `bstr::BStr`.
    #[cfg(feature = "bstr")]
    pub fn read_cstring_bstr(&mut self, max_len: Option<usize>) -> Result<&'a bstr::BStr> {
        self.read_until_bstr(b'\0', max_len)
    }

    /// Advances the position to the next multiple of `stride` and returns it.
    ///
    /// Fails with `InvalidArgument` if `stride` is not positive, and with `BufferUnderflow` if
    /// the padded position would be past the end of the region.
    pub fn align(&mut self, stride: i64) -> Result<u64> {
        let len = self.region()?.len() as u64;
        let new_pos = aligned_position(self.pos, stride)?;
        if new_pos != self.pos {
            if new_pos > len {
                return Err(ReaderError::underflow(
                    new_pos - self.pos,
                    len.saturating_sub(self.pos),
                ));
            }
            trace!(from = self.pos, to = new_pos, stride, "align");
            self.pos = new_pos;
        }
        Ok(self.pos)
    }

    /// Aligns to a 4-byte boundary.
    pub fn align_default(&mut self) -> Result<u64> {
        self.align(4)
    }

    /// Returns a copy of the whole region, independent of the position.
    pub fn get_value(&self) -> Result<Vec<u8>> {
        Ok(self.region()?.to_vec())
    }

    /// Returns the whole region, independent of the position, without copying.
    pub fn get_buffer(&self) -> Result<&'a [u8]> {
        self.region()
    }

    /// Releases the region. Every later operation fails with `Closed`. Closing twice is not an
    /// error.
    pub fn close(&mut self) {
        if self.data.take().is_some() {
            debug!(pos = self.pos, "closed buffer reader");
        }
    }

    /// Always `true` while open.
    pub fn readable(&self) -> Result<bool> {
        self.region().map(|_| true)
    }

    /// Always `true` while open.
    pub fn seekable(&self) -> Result<bool> {
        self.region().map(|_| true)
    }

    /// `true` if the region was lent mutably (see `new_mut`).
    pub fn writable(&self) -> Result<bool> {
        self.region().map(|_| self.writable)
    }

    /// Always `false` while open.
    pub fn isatty(&self) -> Result<bool> {
        self.region().map(|_| false)
    }

    /// Does nothing while open.
    pub fn flush(&self) -> Result<()> {
        self.region().map(|_| ())
    }

    /// A memory region has no file descriptor; always fails.
    pub fn fileno(&self) -> Result<i32> {
        self.region()?;
        Err(ReaderError::Unsupported("fileno"))
    }

    /// A memory region has no underlying raw stream; always fails.
    pub fn detach(&mut self) -> Result<()> {
        self.region()?;
        Err(ReaderError::Unsupported("detach"))
    }
}

impl EndianRead for BufferReader<'_> {
    fn endian(&self) -> Endian {
        self.endian
    }

    fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    fn read_value(&mut self, kind: ScalarKind, mode: EndianMode) -> Result<Value> {
        let span = self.span(kind.size())?;
        let value = kind.decode(span, mode, self.endian);
        self.advance(kind.size());
        Ok(value)
    }

    fn read_values(
        &mut self,
        kind: ScalarKind,
        count: Option<usize>,
        mode: EndianMode,
    ) -> Result<Vec<Value>> {
        let start = self.pos;
        let result = count
            .map_or_else(|| self.read_count(), Ok)
            .and_then(|count| {
                let Some(len) = count.checked_mul(kind.size()) else {
                    return Err(ReaderError::underflow(u64::MAX, self.remaining()? as u64));
                };
                let span = self.span(len)?;
                self.advance(len);
                Ok(kind.decode_all(span, mode, self.endian))
            });
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    fn position(&mut self) -> Result<u64> {
        self.tell()
    }

    fn align(&mut self, stride: i64) -> Result<u64> {
        BufferReader::align(self, stride)
    }
}

impl fmt::Debug for BufferReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data {
            None => f.write_str("BufferReader [closed]"),
            Some(data) => f
                .debug_struct("BufferReader")
                .field("pos", &self.pos)
                .field("len", &data.len())
                .field("endian", &self.endian.as_char())
                .field("closed", &false)
                .finish(),
        }
    }
}
