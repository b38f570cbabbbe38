//! Conversion of byte spans to typed values.
//!
//! Every multi-byte value is first interpreted in host byte order and then swapped if the
//! requested byte order differs from the host's. Single-byte values are never swapped.

use alloc::vec::Vec;
use half::f16;

use crate::{Endian, EndianMode, ReaderError, Result};

/// A fixed-width value that the readers can decode.
///
/// This trait is sealed; it is implemented for `u8`, `u16`, `u32`, `u64`, `i8`, `i16`, `i32`,
/// `i64`, `half::f16`, `f32` and `f64`.
pub trait Scalar: Copy + sealed::Sealed {
    /// Encoded width, in bytes.
    const SIZE: usize;

    /// Runtime descriptor for this type.
    const KIND: ScalarKind;

    /// Byte array holding one encoded value.
    type Bytes: Default + AsRef<[u8]> + AsMut<[u8]>;

    /// Interprets `bytes` in host byte order.
    fn from_ne_bytes(bytes: Self::Bytes) -> Self;

    /// Reverses the byte order of the value.
    fn swap_bytes(self) -> Self;

    /// Wraps the value in a `Value`.
    fn into_value(self) -> Value;
}

mod sealed {
    pub trait Sealed {}
}

macro_rules! int_scalar {
    ($($t:ty => $kind:ident, $n:literal;)*) => {
        $(
            impl sealed::Sealed for $t {}

            impl Scalar for $t {
                const SIZE: usize = $n;
                const KIND: ScalarKind = ScalarKind::$kind;
                type Bytes = [u8; $n];

                #[inline(always)]
                fn from_ne_bytes(bytes: [u8; $n]) -> Self {
                    zerocopy::transmute!(bytes)
                }

                #[inline(always)]
                fn swap_bytes(self) -> Self {
                    <$t>::swap_bytes(self)
                }

                fn into_value(self) -> Value {
                    Value::$kind(self)
                }
            }
        )*
    };
}

int_scalar! {
    u8 => U8, 1;
    u16 => U16, 2;
    u32 => U32, 4;
    u64 => U64, 8;
    i8 => I8, 1;
    i16 => I16, 2;
    i32 => I32, 4;
    i64 => I64, 8;
}

macro_rules! float_scalar {
    ($($t:ty => $kind:ident, $bits:ty, $n:literal;)*) => {
        $(
            impl sealed::Sealed for $t {}

            impl Scalar for $t {
                const SIZE: usize = $n;
                const KIND: ScalarKind = ScalarKind::$kind;
                type Bytes = [u8; $n];

                #[inline(always)]
                fn from_ne_bytes(bytes: [u8; $n]) -> Self {
                    let bits: $bits = zerocopy::transmute!(bytes);
                    <$t>::from_bits(bits)
                }

                #[inline(always)]
                fn swap_bytes(self) -> Self {
                    <$t>::from_bits(self.to_bits().swap_bytes())
                }

                fn into_value(self) -> Value {
                    Value::$kind(self)
                }
            }
        )*
    };
}

float_scalar! {
    f16 => F16, u16, 2;
    f32 => F32, u32, 4;
    f64 => F64, u64, 8;
}

/// Decodes one value from `bytes`, resolving `mode` against the reader's byte order.
#[inline]
pub fn decode_scalar<T: Scalar>(bytes: T::Bytes, mode: EndianMode, reader: Endian) -> T {
    let value = T::from_ne_bytes(bytes);
    if mode.needs_swap(reader, T::SIZE) {
        value.swap_bytes()
    } else {
        value
    }
}

/// Decodes one value from a span whose length is exactly `T::SIZE`.
///
/// Panics if the span has the wrong length; callers slice it to size first.
#[inline]
pub(crate) fn decode_span<T: Scalar>(span: &[u8], mode: EndianMode, reader: Endian) -> T {
    let mut bytes = T::Bytes::default();
    bytes.as_mut().copy_from_slice(span);
    decode_scalar::<T>(bytes, mode, reader)
}

/// Decodes consecutive values from `bytes` and appends them to `out`, in source order.
///
/// `bytes.len()` must be a multiple of `T::SIZE`; any trailing partial element is ignored.
pub fn decode_array_into<T: Scalar>(
    bytes: &[u8],
    mode: EndianMode,
    reader: Endian,
    out: &mut Vec<T>,
) {
    out.reserve(bytes.len() / T::SIZE);
    out.extend(
        bytes
            .chunks_exact(T::SIZE)
            .map(|chunk| decode_span::<T>(chunk, mode, reader)),
    );
}

/// Runtime descriptor of a scalar type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[allow(missing_docs)]
pub enum ScalarKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    /// IEEE-754 half precision; widened to `f64` by the convenience accessors.
    F16,
    F32,
    F64,
}

impl ScalarKind {
    /// Encoded width, in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 | Self::F16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    /// Returns `true` for the integer kinds.
    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::F16 | Self::F32 | Self::F64)
    }

    /// The type's short name, e.g. `"u32"`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F16 => "f16",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Decodes one value of this kind. `span.len()` must equal `self.size()`.
    pub(crate) fn decode(self, span: &[u8], mode: EndianMode, reader: Endian) -> Value {
        match self {
            Self::U8 => decode_span::<u8>(span, mode, reader).into_value(),
            Self::U16 => decode_span::<u16>(span, mode, reader).into_value(),
            Self::U32 => decode_span::<u32>(span, mode, reader).into_value(),
            Self::U64 => decode_span::<u64>(span, mode, reader).into_value(),
            Self::I8 => decode_span::<i8>(span, mode, reader).into_value(),
            Self::I16 => decode_span::<i16>(span, mode, reader).into_value(),
            Self::I32 => decode_span::<i32>(span, mode, reader).into_value(),
            Self::I64 => decode_span::<i64>(span, mode, reader).into_value(),
            Self::F16 => decode_span::<f16>(span, mode, reader).into_value(),
            Self::F32 => decode_span::<f32>(span, mode, reader).into_value(),
            Self::F64 => decode_span::<f64>(span, mode, reader).into_value(),
        }
    }

    /// Decodes every whole element of `bytes`, in source order.
    pub(crate) fn decode_all(self, bytes: &[u8], mode: EndianMode, reader: Endian) -> Vec<Value> {
        bytes
            .chunks_exact(self.size())
            .map(|chunk| self.decode(chunk, mode, reader))
            .collect()
    }
}

/// A decoded value whose type is only known at runtime.
#[derive(Copy, Clone, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F16(f16),
    F32(f32),
    F64(f64),
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::U8(_) => ScalarKind::U8,
            Self::U16(_) => ScalarKind::U16,
            Self::U32(_) => ScalarKind::U32,
            Self::U64(_) => ScalarKind::U64,
            Self::I8(_) => ScalarKind::I8,
            Self::I16(_) => ScalarKind::I16,
            Self::I32(_) => ScalarKind::I32,
            Self::I64(_) => ScalarKind::I64,
            Self::F16(_) => ScalarKind::F16,
            Self::F32(_) => ScalarKind::F32,
            Self::F64(_) => ScalarKind::F64,
        }
    }

    /// Returns the value as an `i128` if it is an integer.
    pub fn as_integer(&self) -> Option<i128> {
        match *self {
            Self::U8(v) => Some(v.into()),
            Self::U16(v) => Some(v.into()),
            Self::U32(v) => Some(v.into()),
            Self::U64(v) => Some(v.into()),
            Self::I8(v) => Some(v.into()),
            Self::I16(v) => Some(v.into()),
            Self::I32(v) => Some(v.into()),
            Self::I64(v) => Some(v.into()),
            Self::F16(_) | Self::F32(_) | Self::F64(_) => None,
        }
    }

    /// Returns the value widened to `f64`. Integers wider than 53 bits lose precision.
    pub fn to_f64(&self) -> f64 {
        match *self {
            Self::U8(v) => v.into(),
            Self::U16(v) => v.into(),
            Self::U32(v) => v.into(),
            Self::U64(v) => v as f64,
            Self::I8(v) => v.into(),
            Self::I16(v) => v.into(),
            Self::I32(v) => v.into(),
            Self::I64(v) => v as f64,
            Self::F16(v) => v.to_f64(),
            Self::F32(v) => v.into(),
            Self::F64(v) => v,
        }
    }

    /// Interprets the value as an array element count.
    ///
    /// Fails with `TypeMismatch` for floating-point values and with `InvalidArgument` for
    /// negative ones.
    pub fn as_count(&self) -> Result<usize> {
        let Some(n) = self.as_integer() else {
            return Err(ReaderError::TypeMismatch(
                "array length strategy did not produce an integer",
            ));
        };
        if n < 0 {
            return Err(ReaderError::InvalidArgument("negative array count"));
        }
        usize::try_from(n).map_err(|_| ReaderError::InvalidArgument("array count too large"))
    }
}

/// How a reader obtains an array length when a read does not supply one.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum CountPrefix {
    /// No strategy; uncounted array reads fail with `Unsupported`.
    #[default]
    Unset,

    /// The count is an integer scalar of the given kind, read immediately before the elements.
    Scalar {
        /// Integer type of the prefix.
        kind: ScalarKind,
        /// Byte order of the prefix.
        mode: EndianMode,
    },

    /// The count is a 7-bit variable-length `i32`, as written by .NET's
    /// `BinaryWriter.Write7BitEncodedInt`.
    SevenBitEncoded,
}

impl CountPrefix {
    /// A prefix of integer `kind` in the reader's byte order.
    pub const fn scalar(kind: ScalarKind) -> Self {
        Self::Scalar {
            kind,
            mode: EndianMode::Default,
        }
    }
}

/// Decodes a 7-bit variable-length integer into `i32`, pulling one byte at a time from `next`.
///
/// Each byte encodes 7 bits of the integer and 1 bit indicating whether there are more bytes
/// following this one. Because 32 is not evenly divisible by 7, the last byte has some
/// meaningless bits in them; they are not validated.
pub(crate) fn decode_7bit_i32(mut next: impl FnMut() -> Result<u8>) -> Result<i32> {
    const MORE: u8 = 0x80;

    let mut shift: u32 = 0;
    let mut n: u32 = 0;

    loop {
        let b = next()?;
        n |= ((b & 0x7f) as u32) << shift;

        if (b & MORE) == 0 {
            break;
        }

        shift += 7;
        if shift >= 32 {
            return Err(ReaderError::InvalidData("7-bit encoded i32 is too long"));
        }
    }

    Ok(n as i32)
}

/// Decodes a 7-bit variable-length integer into `i64`.
pub(crate) fn decode_7bit_i64(mut next: impl FnMut() -> Result<u8>) -> Result<i64> {
    const MORE: u8 = 0x80;

    let mut shift: u32 = 0;
    let mut n: u64 = 0;

    loop {
        let b = next()?;
        n |= ((b & 0x7f) as u64) << shift;

        if (b & MORE) == 0 {
            break;
        }

        shift += 7;
        if shift >= 64 {
            return Err(ReaderError::InvalidData("7-bit encoded i64 is too long"));
        }
    }

    Ok(n as i64)
}
