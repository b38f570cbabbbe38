/// Error type for `BufferReader` and `StreamReader`.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// An argument was out of range: a bad size, alignment stride, endianness selector or seek
    /// target.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A `BufferReader` read needs more bytes than remain in the backing region. The read
    /// position is unchanged.
    #[error("read exceeds buffer length ({needed} bytes needed, {available} available)")]
    BufferUnderflow {
        /// Bytes the read required.
        needed: u64,
        /// Bytes remaining in the region at the time of the read.
        available: u64,
    },

    /// The stream returned fewer bytes than a fixed-width read requested.
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Bytes requested from the stream.
        expected: usize,
        /// Bytes the stream actually returned.
        actual: usize,
    },

    /// The reader has been closed.
    #[error("I/O operation on closed reader")]
    Closed,

    /// A length strategy or stream handle produced a value of the wrong shape.
    #[error("type mismatch: {0}")]
    TypeMismatch(&'static str),

    /// The operation is not available on this reader or stream.
    #[error("{0} is not supported on this reader")]
    Unsupported(&'static str),

    /// The input is malformed.
    #[error("invalid data: {0}")]
    InvalidData(&'static str),

    /// An error reported by an underlying `std::io` object.
    #[cfg(feature = "std")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReaderError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::BufferUnderflow { .. } => ErrorKind::BufferUnderflow,
            Self::ShortRead { .. } => ErrorKind::ShortRead,
            Self::Closed => ErrorKind::Closed,
            Self::TypeMismatch(_) => ErrorKind::TypeMismatch,
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::InvalidData(_) => ErrorKind::InvalidData,
            #[cfg(feature = "std")]
            Self::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn underflow(needed: u64, available: u64) -> Self {
        Self::BufferUnderflow { needed, available }
    }
}

/// A `Copy` discriminant of `ReaderError`, for matching without borrowing the error.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorKind {
    /// See `ReaderError::InvalidArgument`.
    InvalidArgument,
    /// See `ReaderError::BufferUnderflow`.
    BufferUnderflow,
    /// See `ReaderError::ShortRead`.
    ShortRead,
    /// See `ReaderError::Closed`.
    Closed,
    /// See `ReaderError::TypeMismatch`.
    TypeMismatch,
    /// See `ReaderError::Unsupported`.
    Unsupported,
    /// See `ReaderError::InvalidData`.
    InvalidData,
    /// See `ReaderError::Io`.
    Io,
}

/// Result type for reader operations.
pub type Result<T> = core::result::Result<T, ReaderError>;
