//! Reads fixed-width scalars and arrays from byte buffers and streams, with the byte order
//! chosen per reader or per call.
//!
//! Two readers share one decoding contract (`EndianRead`):
//!
//! * `BufferReader` reads from a borrowed `&[u8]` with its own cursor. Byte-level reads
//!   truncate at the end of the region; fixed-width reads fail with `BufferUnderflow`.
//! * `StreamReader` pulls bytes from a `Stream` on demand. Any fixed-width read that gets
//!   fewer bytes than it needs fails with `ShortRead`.
//!
//! Every scalar type (`u8`..`u64`, `i8`..`i64`, `f16`, `f32`, `f64`) can be read in the
//! reader's configured byte order (`read_u32`), or explicitly little-endian (`read_u32_le`) or
//! big-endian (`read_u32_be`), singly or as an array (`read_u32_array`). Half-precision values
//! are widened to `f64`.
//!
//! ```
//! use endianed_binary_io::{BufferReader, Endian};
//!
//! let mut r = BufferReader::new(&[1, 2, 3, 4, 1, 2, 3, 4], Endian::Little);
//! assert_eq!(r.read_u32().unwrap(), 0x04030201);
//! assert_eq!(r.read_u32_be().unwrap(), 0x01020304);
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod table;

mod codec;
mod config;
mod endian;
mod error;
mod reader;
pub mod scan;
mod stream;

#[cfg(test)]
mod tests;

pub use codec::{decode_array_into, decode_scalar, CountPrefix, Scalar, ScalarKind, Value};
pub use config::{ReaderConfig, SeekFrom};
pub use endian::{Endian, EndianMode};
pub use error::{ErrorKind, ReaderError, Result};
pub use reader::BufferReader;
#[cfg(feature = "std")]
pub use stream::IoStream;
pub use stream::{Capabilities, Stream, StreamReader};
pub use table::{lookup, lookup_array, Accessor, EndianRead, ACCESSORS, ARRAY_ACCESSORS};
