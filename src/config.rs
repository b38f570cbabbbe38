use crate::{CountPrefix, Endian};

/// Construction settings shared by `BufferReader` and `StreamReader`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct ReaderConfig {
    /// Byte order used by reads with `EndianMode::Default`.
    pub endian: Endian,
    /// How uncounted array reads obtain their length.
    pub count_prefix: CountPrefix,
}

impl ReaderConfig {
    /// A configuration with the given byte order and no count prefix.
    pub const fn new(endian: Endian) -> Self {
        Self {
            endian,
            count_prefix: CountPrefix::Unset,
        }
    }

    /// Sets the byte order.
    pub const fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Sets the count prefix.
    pub const fn with_count_prefix(mut self, count_prefix: CountPrefix) -> Self {
        self.count_prefix = count_prefix;
        self
    }
}

/// Enumeration of possible methods to seek within a reader.
///
/// Mirrors `std::io::SeekFrom`, which is not available without `std`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SeekFrom {
    /// Sets the position to the given number of bytes.
    Start(u64),
    /// Sets the position to the end of the data plus the given offset.
    End(i64),
    /// Sets the position to the current position plus the given offset.
    Current(i64),
}

impl SeekFrom {
    /// Computes the absolute target. Returns `None` if it would be negative or overflow.
    pub(crate) fn resolve(self, current: u64, end: u64) -> Option<u64> {
        let (base, offset) = match self {
            Self::Start(n) => return Some(n),
            Self::End(n) => (end, n),
            Self::Current(n) => (current, n),
        };
        u64::try_from(i128::from(base) + i128::from(offset)).ok()
    }
}

#[cfg(feature = "std")]
impl From<std::io::SeekFrom> for SeekFrom {
    fn from(pos: std::io::SeekFrom) -> Self {
        match pos {
            std::io::SeekFrom::Start(n) => Self::Start(n),
            std::io::SeekFrom::End(n) => Self::End(n),
            std::io::SeekFrom::Current(n) => Self::Current(n),
        }
    }
}

#[cfg(feature = "std")]
impl From<SeekFrom> for std::io::SeekFrom {
    fn from(pos: SeekFrom) -> Self {
        match pos {
            SeekFrom::Start(n) => Self::Start(n),
            SeekFrom::End(n) => Self::End(n),
            SeekFrom::Current(n) => Self::Current(n),
        }
    }
}
