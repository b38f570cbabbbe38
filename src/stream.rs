//! Decoding from stream-like objects.
//!
//! A `StreamReader` pulls every value it decodes from a `Stream`. Unlike `BufferReader`, it
//! cannot know in advance how many bytes are left, so a stream that returns fewer bytes than a
//! fixed-width read needs is an error (`ReaderError::ShortRead`) rather than a truncation.

use alloc::vec::Vec;
use core::fmt;
use core::ops::BitOr;

use tracing::{debug, trace};

use crate::codec::{decode_7bit_i32, decode_7bit_i64, decode_array_into, decode_span};
use crate::scan::aligned_position;
use crate::{
    CountPrefix, Endian, EndianMode, EndianRead, ReaderConfig, ReaderError, Result, Scalar,
    ScalarKind, SeekFrom, Value,
};

/// The set of operations a `Stream` provides.
///
/// `StreamReader` reads this once, at construction, and consults the cached copy before
/// forwarding any optional operation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Capabilities(u16);

impl Capabilities {
    /// `Stream::read`.
    pub const READ: Self = Self(1 << 0);
    /// `Stream::write`.
    pub const WRITE: Self = Self(1 << 1);
    /// `Stream::seek`.
    pub const SEEK: Self = Self(1 << 2);
    /// `Stream::tell`.
    pub const TELL: Self = Self(1 << 3);
    /// `Stream::flush`.
    pub const FLUSH: Self = Self(1 << 4);
    /// `Stream::close`.
    pub const CLOSE: Self = Self(1 << 5);
    /// `Stream::readable`.
    pub const READABLE: Self = Self(1 << 6);
    /// `Stream::writable`.
    pub const WRITABLE: Self = Self(1 << 7);
    /// `Stream::seekable`.
    pub const SEEKABLE: Self = Self(1 << 8);
    /// `Stream::isatty`.
    pub const ISATTY: Self = Self(1 << 9);
    /// `Stream::truncate`.
    pub const TRUNCATE: Self = Self(1 << 10);
    /// `Stream::readinto`.
    pub const READINTO: Self = Self(1 << 11);
    /// `Stream::readline`.
    pub const READLINE: Self = Self(1 << 12);
    /// `Stream::readlines`.
    pub const READLINES: Self = Self(1 << 13);
    /// `Stream::fileno`.
    pub const FILENO: Self = Self(1 << 14);

    /// The operations `StreamReader` cannot work without: `read`, `seek` and `tell`.
    pub const REQUIRED: Self = Self::READ.union(Self::SEEK).union(Self::TELL);

    /// The operations in either set.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if every operation in `other` is in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// A stream-like source of bytes.
///
/// `read`, `seek` and `tell` are required. The other operations are optional; their default
/// bodies fail with `Unsupported`. An implementation that provides any of them should also
/// list it in `capabilities`, because `StreamReader` will not forward operations that are not
/// listed.
pub trait Stream {
    /// Reads up to `n` bytes. Returning fewer than `n` bytes signals the end of the stream.
    fn read(&mut self, n: usize) -> Result<Vec<u8>>;

    /// Moves the stream position and returns the new absolute position.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64>;

    /// Returns the stream position.
    fn tell(&mut self) -> Result<u64>;

    /// The operations this stream provides.
    fn capabilities(&self) -> Capabilities {
        Capabilities::REQUIRED
    }

    /// Writes `buf` and returns the number of bytes written.
    fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        Err(ReaderError::Unsupported("write"))
    }

    /// Flushes buffered writes.
    fn flush(&mut self) -> Result<()> {
        Err(ReaderError::Unsupported("flush"))
    }

    /// Closes the stream.
    fn close(&mut self) -> Result<()> {
        Err(ReaderError::Unsupported("close"))
    }

    /// Reports whether the stream can be read.
    fn readable(&mut self) -> Result<bool> {
        Err(ReaderError::Unsupported("readable"))
    }

    /// Reports whether the stream can be written.
    fn writable(&mut self) -> Result<bool> {
        Err(ReaderError::Unsupported("writable"))
    }

    /// Reports whether the stream supports random access.
    fn seekable(&mut self) -> Result<bool> {
        Err(ReaderError::Unsupported("seekable"))
    }

    /// Reports whether the stream is an interactive terminal.
    fn isatty(&mut self) -> Result<bool> {
        Err(ReaderError::Unsupported("isatty"))
    }

    /// Resizes the stream to `size` bytes (the current position if `None`).
    fn truncate(&mut self, _size: Option<u64>) -> Result<u64> {
        Err(ReaderError::Unsupported("truncate"))
    }

    /// Reads into `buf` and returns the number of bytes read.
    fn readinto(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Err(ReaderError::Unsupported("readinto"))
    }

    /// Reads one line, including its terminating `'\n'` if present.
    fn readline(&mut self, _limit: Option<usize>) -> Result<Vec<u8>> {
        Err(ReaderError::Unsupported("readline"))
    }

    /// Reads lines until the end of the stream, or until `hint` bytes have been read.
    fn readlines(&mut self, _hint: Option<usize>) -> Result<Vec<Vec<u8>>> {
        Err(ReaderError::Unsupported("readlines"))
    }

    /// The underlying file descriptor.
    fn fileno(&mut self) -> Result<i32> {
        Err(ReaderError::Unsupported("fileno"))
    }

    /// Returns `true` if the stream has been closed.
    fn closed(&mut self) -> Result<bool> {
        Ok(false)
    }
}

impl<S: Stream + ?Sized> Stream for &mut S {
    fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        (**self).read(n)
    }
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        (**self).seek(pos)
    }
    fn tell(&mut self) -> Result<u64> {
        (**self).tell()
    }
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }
    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
    fn readable(&mut self) -> Result<bool> {
        (**self).readable()
    }
    fn writable(&mut self) -> Result<bool> {
        (**self).writable()
    }
    fn seekable(&mut self) -> Result<bool> {
        (**self).seekable()
    }
    fn isatty(&mut self) -> Result<bool> {
        (**self).isatty()
    }
    fn truncate(&mut self, size: Option<u64>) -> Result<u64> {
        (**self).truncate(size)
    }
    fn readinto(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).readinto(buf)
    }
    fn readline(&mut self, limit: Option<usize>) -> Result<Vec<u8>> {
        (**self).readline(limit)
    }
    fn readlines(&mut self, hint: Option<usize>) -> Result<Vec<Vec<u8>>> {
        (**self).readlines(hint)
    }
    fn fileno(&mut self) -> Result<i32> {
        (**self).fileno()
    }
    fn closed(&mut self) -> Result<bool> {
        (**self).closed()
    }
}

/// Adapts any `std::io::Read + Seek` object to `Stream`.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoStream<T> {
    inner: T,
}

#[cfg(feature = "std")]
impl<T: std::io::Read + std::io::Seek> IoStream<T> {
    /// Wraps `inner`.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Accesses the inner object.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Accesses the inner object.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Extracts the inner object.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<T: std::io::Read + std::io::Seek> Stream for IoStream<T> {
    /// Reads until `n` bytes have been read or the inner reader reaches EOF.
    fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        use std::io::Read;

        // `n` may come from an untrusted length prefix; do not reserve it up front.
        let mut buf = Vec::new();
        self.inner.by_ref().take(n as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        Ok(self.inner.seek(pos.into())?)
    }

    fn tell(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::REQUIRED
            | Capabilities::READABLE
            | Capabilities::WRITABLE
            | Capabilities::SEEKABLE
            | Capabilities::READINTO
            | Capabilities::READLINE
            | Capabilities::READLINES
    }

    fn readable(&mut self) -> Result<bool> {
        Ok(true)
    }

    fn writable(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn seekable(&mut self) -> Result<bool> {
        Ok(true)
    }

    fn readinto(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.inner.read(buf) {
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                result => return Ok(result?),
            }
        }
    }

    fn readline(&mut self, limit: Option<usize>) -> Result<Vec<u8>> {
        let mut line = Vec::new();
        while limit.map_or(true, |limit| line.len() < limit) {
            let mut b = [0u8; 1];
            if self.readinto(&mut b)? == 0 {
                break;
            }
            line.push(b[0]);
            if b[0] == b'\n' {
                break;
            }
        }
        Ok(line)
    }

    fn readlines(&mut self, hint: Option<usize>) -> Result<Vec<Vec<u8>>> {
        let mut lines = Vec::new();
        let mut total = 0;
        loop {
            let line = self.readline(None)?;
            if line.is_empty() {
                break;
            }
            total += line.len();
            lines.push(line);
            if hint.is_some_and(|hint| hint > 0 && total >= hint) {
                break;
            }
        }
        Ok(lines)
    }
}

/// Reads values from a `Stream`.
///
/// The reader does not own the stream's lifecycle: it never closes the stream, and dropping
/// the reader does nothing to it. Pass `&mut stream` to keep using the stream afterwards.
///
/// Every fixed-width read requests exactly the bytes it needs from `Stream::read` and fails
/// with `ShortRead` if the stream returns fewer. A failed scalar or array read seeks the stream
/// back to where it was before the call, including any count prefix.
pub struct StreamReader<S> {
    stream: S,
    endian: Endian,
    count_prefix: CountPrefix,
    capabilities: Capabilities,
}

impl<S: Stream> StreamReader<S> {
    /// Creates a reader over `stream` with the given default byte order.
    ///
    /// Fails with `Unsupported` if the stream does not provide `read`, `seek` and `tell`.
    pub fn new(stream: S, endian: Endian) -> Result<Self> {
        Self::with_config(stream, ReaderConfig::new(endian))
    }

    /// Creates a reader from an endianness selector character, `'<'` or `'>'`.
    pub fn from_selector(stream: S, endian: char) -> Result<Self> {
        Self::new(stream, Endian::from_char(endian)?)
    }

    /// Creates a reader with explicit configuration.
    pub fn with_config(stream: S, config: ReaderConfig) -> Result<Self> {
        let capabilities = stream.capabilities();
        if !capabilities.contains(Capabilities::REQUIRED) {
            debug!(?capabilities, "stream lacks read, seek or tell");
            return Err(ReaderError::Unsupported("stream without read, seek and tell"));
        }
        debug!(?capabilities, endian = %config.endian.as_char(), "opened stream reader");
        Ok(Self {
            stream,
            endian: config.endian,
            count_prefix: config.count_prefix,
            capabilities,
        })
    }

    /// Accesses the stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Accesses the stream.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Extracts the stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// The capabilities resolved at construction.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
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

    /// Reads exactly `n` bytes from the stream, or fails with `ShortRead` after seeking back
    /// over the bytes that were returned.
    fn pull(&mut self, n: usize) -> Result<Vec<u8>> {
        let buf = self.stream.read(n)?;
        if buf.len() != n {
            trace!(expected = n, actual = buf.len(), "short read");
            if !buf.is_empty() {
                let back = i64::try_from(buf.len())
                    .map_err(|_| ReaderError::InvalidArgument("short read too long to undo"))?;
                self.stream.seek(SeekFrom::Current(-back))?;
            }
            return Err(ReaderError::ShortRead {
                expected: n,
                actual: buf.len(),
            });
        }
        Ok(buf)
    }

    /// Runs `f`, seeking the stream back to its starting position if `f` fails.
    fn restoring<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let start = self.stream.tell()?;
        let result = f(self);
        if result.is_err() {
            trace!(to = start, "restoring stream position");
            self.stream.seek(SeekFrom::Start(start))?;
        }
        result
    }

    fn require(&self, op: Capabilities, name: &'static str) -> Result<()> {
        if self.capabilities.contains(op) {
            Ok(())
        } else {
            Err(ReaderError::Unsupported(name))
        }
    }

    /// Reads one value of type `T`.
    pub fn read_scalar<T: Scalar>(&mut self, mode: EndianMode) -> Result<T> {
        let buf = self.pull(T::SIZE)?;
        Ok(decode_span::<T>(&buf, mode, self.endian))
    }

    /// Reads `count` values of type `T` with a single stream read. If `count` is `None`, the
    /// count is first read using the reader's `CountPrefix`.
    ///
    /// On failure the stream is moved back to where it was before the call.
    pub fn read_array<T: Scalar>(
        &mut self,
        count: Option<usize>,
        mode: EndianMode,
    ) -> Result<Vec<T>> {
        self.restoring(|r| {
            let count = match count {
                Some(count) => count,
                None => r.read_count()?,
            };
            r.read_counted::<T>(count, mode)
        })
    }

    /// Reads an array of `T` whose count is produced by `count`, which is given this reader and
    /// typically decodes a length prefix from it.
    pub fn read_array_with<T, F>(&mut self, count: F, mode: EndianMode) -> Result<Vec<T>>
    where
        T: Scalar,
        F: FnOnce(&mut Self) -> Result<Value>,
    {
        self.restoring(|r| {
            let count = count(r)?.as_count()?;
            r.read_counted::<T>(count, mode)
        })
    }

    fn read_counted<T: Scalar>(&mut self, count: usize, mode: EndianMode) -> Result<Vec<T>> {
        let len = count
            .checked_mul(T::SIZE)
            .ok_or(ReaderError::InvalidArgument("array size overflows"))?;
        let buf = self.pull(len)?;
        let mut out = Vec::with_capacity(count);
        decode_array_into::<T>(&buf, mode, self.endian, &mut out);
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
    pub fn read_7bit_encoded_i32(&mut self) -> Result<i32> {
        decode_7bit_i32(|| self.read_u8())
    }

    /// Reads a variable-length integer and returns the value in `i64`.
    pub fn read_7bit_encoded_i64(&mut self) -> Result<i64> {
        decode_7bit_i64(|| self.read_u8())
    }

    for_each_scalar!(scalar_methods);

    /// Reads the bytes up to, but not including, the first `delimiter`, reading at most
    /// `max_len` bytes (`None` reads until the end of the stream).
    ///
    /// Bytes are pulled one at a time. When the delimiter is found the stream is moved back by
    /// one byte, so the delimiter is the next byte to be read.
    pub fn read_until(&mut self, delimiter: u8, max_len: Option<usize>) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        while max_len.map_or(true, |max| out.len() < max) {
            let b = self.stream.read(1)?;
            let Some(&b) = b.first() else {
                break;
            };
            if b == delimiter {
                self.stream.seek(SeekFrom::Current(-1))?;
                break;
            }
            out.push(b);
        }
        Ok(out)
    }

    /// Reads up to the next NUL byte, which is not consumed.
    pub fn read_cstring(&mut self, max_len: Option<usize>) -> Result<Vec<u8>> {
        self.read_until(b'\0', max_len)
    }

    /// Advances the stream position to the next multiple of `stride`, using the stream's `tell`
    /// and `seek`, and returns the new position. No upper bound is checked here; the stream may
    /// reject the seek.
    pub fn align(&mut self, stride: i64) -> Result<u64> {
        if stride <= 0 {
            return Err(ReaderError::InvalidArgument("alignment stride must be positive"));
        }
        let pos = self.stream.tell()?;
        let new_pos = aligned_position(pos, stride)?;
        if new_pos == pos {
            return Ok(pos);
        }
        trace!(from = pos, to = new_pos, stride, "align");
        self.stream.seek(SeekFrom::Start(new_pos))
    }

    /// Aligns to a 4-byte boundary.
    pub fn align_default(&mut self) -> Result<u64> {
        self.align(4)
    }

    /// Reads up to `n` bytes, forwarded to the stream unchecked.
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        self.stream.read(n)
    }

    /// Forwards to `Stream::seek`.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.stream.seek(pos)
    }

    /// Forwards to `Stream::tell`.
    pub fn tell(&mut self) -> Result<u64> {
        self.stream.tell()
    }

    /// Forwards to `Stream::closed`.
    pub fn closed(&mut self) -> Result<bool> {
        self.stream.closed()
    }

    /// Forwards to `Stream::write`, if the stream provides it.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.require(Capabilities::WRITE, "write")?;
        self.stream.write(buf)
    }

    /// Forwards to `Stream::flush`, if the stream provides it.
    pub fn flush(&mut self) -> Result<()> {
        self.require(Capabilities::FLUSH, "flush")?;
        self.stream.flush()
    }

    /// Forwards to `Stream::close`, if the stream provides it.
    pub fn close(&mut self) -> Result<()> {
        self.require(Capabilities::CLOSE, "close")?;
        self.stream.close()
    }

    /// Forwards to `Stream::readable`, if the stream provides it.
    pub fn readable(&mut self) -> Result<bool> {
        self.require(Capabilities::READABLE, "readable")?;
        self.stream.readable()
    }

    /// Forwards to `Stream::writable`, if the stream provides it.
    pub fn writable(&mut self) -> Result<bool> {
        self.require(Capabilities::WRITABLE, "writable")?;
        self.stream.writable()
    }

    /// Forwards to `Stream::seekable`, if the stream provides it.
    pub fn seekable(&mut self) -> Result<bool> {
        self.require(Capabilities::SEEKABLE, "seekable")?;
        self.stream.seekable()
    }

    /// Forwards to `Stream::isatty`, if the stream provides it.
    pub fn isatty(&mut self) -> Result<bool> {
        self.require(Capabilities::ISATTY, "isatty")?;
        self.stream.isatty()
    }

    /// Forwards to `Stream::truncate`, if the stream provides it.
    pub fn truncate(&mut self, size: Option<u64>) -> Result<u64> {
        self.require(Capabilities::TRUNCATE, "truncate")?;
        self.stream.truncate(size)
    }

    /// Forwards to `Stream::readinto`, if the stream provides it.
    pub fn readinto(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.require(Capabilities::READINTO, "readinto")?;
        self.stream.readinto(buf)
    }

    /// Forwards to `Stream::readline`, if the stream provides it. Unlike `read_until`, the
    /// stream's own line semantics apply.
    pub fn readline(&mut self, limit: Option<usize>) -> Result<Vec<u8>> {
        self.require(Capabilities::READLINE, "readline")?;
        self.stream.readline(limit)
    }

    /// Forwards to `Stream::readlines`, if the stream provides it.
    pub fn readlines(&mut self, hint: Option<usize>) -> Result<Vec<Vec<u8>>> {
        self.require(Capabilities::READLINES, "readlines")?;
        self.stream.readlines(hint)
    }

    /// Forwards to `Stream::fileno`, if the stream provides it.
    pub fn fileno(&mut self) -> Result<i32> {
        self.require(Capabilities::FILENO, "fileno")?;
        self.stream.fileno()
    }
}

impl<S: Stream> EndianRead for StreamReader<S> {
    fn endian(&self) -> Endian {
        self.endian
    }

    fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    fn read_value(&mut self, kind: ScalarKind, mode: EndianMode) -> Result<Value> {
        let buf = self.pull(kind.size())?;
        Ok(kind.decode(&buf, mode, self.endian))
    }

    fn read_values(
        &mut self,
        kind: ScalarKind,
        count: Option<usize>,
        mode: EndianMode,
    ) -> Result<Vec<Value>> {
        self.restoring(|r| {
            let count = match count {
                Some(count) => count,
                None => r.read_count()?,
            };
            let len = count
                .checked_mul(kind.size())
                .ok_or(ReaderError::InvalidArgument("array size overflows"))?;
            let buf = r.pull(len)?;
            Ok(kind.decode_all(&buf, mode, r.endian))
        })
    }

    fn position(&mut self) -> Result<u64> {
        self.stream.tell()
    }

    fn align(&mut self, stride: i64) -> Result<u64> {
        StreamReader::align(self, stride)
    }
}

impl<S: fmt::Debug> fmt::Debug for StreamReader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamReader")
            .field("endian", &self.endian.as_char())
            .field("stream", &self.stream)
            .finish()
    }
}
