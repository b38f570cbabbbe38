use crate::{ReaderError, Result};

/// The byte order of multi-byte values.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Endian {
    /// Little-endian (least-significant byte first). Selector `'<'`.
    Little,
    /// Big-endian (most-significant byte first). Selector `'>'`.
    Big,
}

impl Endian {
    /// The native byte order of the target architecture.
    pub const NATIVE: Endian = Self::native();

    /// Returns the native byte order of the target architecture.
    pub const fn native() -> Self {
        #[cfg(target_endian = "big")]
        let endian = Self::Big;

        #[cfg(target_endian = "little")]
        let endian = Self::Little;

        endian
    }

    /// Parses a one-character endianness selector. Only `'<'` (little) and `'>'` (big) are
    /// accepted.
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            '<' => Ok(Self::Little),
            '>' => Ok(Self::Big),
            _ => Err(ReaderError::InvalidArgument(
                "invalid endian value, use '<' for little-endian or '>' for big-endian",
            )),
        }
    }

    /// The selector character for this byte order.
    pub const fn as_char(self) -> char {
        match self {
            Self::Little => '<',
            Self::Big => '>',
        }
    }
}

impl Default for Endian {
    /// Readers default to little-endian, regardless of the host.
    fn default() -> Self {
        Self::Little
    }
}

impl TryFrom<char> for Endian {
    type Error = ReaderError;

    fn try_from(c: char) -> Result<Self> {
        Self::from_char(c)
    }
}

/// Selects the byte order used for a single read.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum EndianMode {
    /// Use the reader's configured byte order.
    #[default]
    Default,
    /// Always little-endian.
    Little,
    /// Always big-endian.
    Big,
}

impl EndianMode {
    /// Resolves this mode against a reader's configured byte order.
    pub const fn resolve(self, reader: Endian) -> Endian {
        match self {
            Self::Default => reader,
            Self::Little => Endian::Little,
            Self::Big => Endian::Big,
        }
    }

    /// Returns `true` if a value of `size` bytes, laid out in host order, must be byte-swapped
    /// to honor this mode. Single-byte values never swap.
    pub const fn needs_swap(self, reader: Endian, size: usize) -> bool {
        if size <= 1 {
            return false;
        }
        // Compare discriminants; `PartialEq` is not usable in `const fn`.
        self.resolve(reader) as u8 != Endian::NATIVE as u8
    }

    /// The accessor name suffix for this mode: `""`, `"_le"` or `"_be"`.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Default => "",
            Self::Little => "_le",
            Self::Big => "_be",
        }
    }
}

impl From<Endian> for EndianMode {
    fn from(endian: Endian) -> Self {
        match endian {
            Endian::Little => Self::Little,
            Endian::Big => Self::Big,
        }
    }
}
