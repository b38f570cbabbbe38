//! Named accessors.
//!
//! Every scalar type is readable in three byte-order modes, both as a single value and as an
//! array. Rather than spelling out each combination, `for_each_scalar!` holds one row per type
//! and the accessor table and the typed reader methods are both generated from it.

use alloc::vec::Vec;

use crate::{Endian, EndianMode, ReaderError, Result, ScalarKind, Value};

/// Invokes `$m!` with one row per scalar type:
/// `type as output_type: Kind { default, le, be; default_array, le_array, be_array }`.
macro_rules! for_each_scalar {
    ($m:ident) => {
        $m! {
            u8 as u8: U8 { read_u8, read_u8_le, read_u8_be; read_u8_array, read_u8_array_le, read_u8_array_be }
            u16 as u16: U16 { read_u16, read_u16_le, read_u16_be; read_u16_array, read_u16_array_le, read_u16_array_be }
            u32 as u32: U32 { read_u32, read_u32_le, read_u32_be; read_u32_array, read_u32_array_le, read_u32_array_be }
            u64 as u64: U64 { read_u64, read_u64_le, read_u64_be; read_u64_array, read_u64_array_le, read_u64_array_be }
            i8 as i8: I8 { read_i8, read_i8_le, read_i8_be; read_i8_array, read_i8_array_le, read_i8_array_be }
            i16 as i16: I16 { read_i16, read_i16_le, read_i16_be; read_i16_array, read_i16_array_le, read_i16_array_be }
            i32 as i32: I32 { read_i32, read_i32_le, read_i32_be; read_i32_array, read_i32_array_le, read_i32_array_be }
            i64 as i64: I64 { read_i64, read_i64_le, read_i64_be; read_i64_array, read_i64_array_le, read_i64_array_be }
            half::f16 as f64: F16 { read_f16, read_f16_le, read_f16_be; read_f16_array, read_f16_array_le, read_f16_array_be }
            f32 as f32: F32 { read_f32, read_f32_le, read_f32_be; read_f32_array, read_f32_array_le, read_f32_array_be }
            f64 as f64: F64 { read_f64, read_f64_le, read_f64_be; read_f64_array, read_f64_array_le, read_f64_array_be }
        }
    };
}

/// Expands to the typed convenience methods of a reader. The reader must provide
/// `read_scalar::<T>(mode)` and `read_array::<T>(count, mode)`.
macro_rules! scalar_methods {
    ($(
        $t:ty as $out:ty: $kind:ident {
            $d:ident, $le:ident, $be:ident;
            $da:ident, $lea:ident, $bea:ident
        }
    )*) => {
        $(
            #[doc = concat!("Reads a `", stringify!($t), "` in the reader's byte order.")]
            #[inline]
            pub fn $d(&mut self) -> $crate::Result<$out> {
                self.read_scalar::<$t>($crate::EndianMode::Default).map(<$out>::from)
            }

            #[doc = concat!("Reads a `", stringify!($t), "` in little-endian byte order.")]
            #[inline]
            pub fn $le(&mut self) -> $crate::Result<$out> {
                self.read_scalar::<$t>($crate::EndianMode::Little).map(<$out>::from)
            }

            #[doc = concat!("Reads a `", stringify!($t), "` in big-endian byte order.")]
            #[inline]
            pub fn $be(&mut self) -> $crate::Result<$out> {
                self.read_scalar::<$t>($crate::EndianMode::Big).map(<$out>::from)
            }

            #[doc = concat!("Reads an array of `", stringify!($t), "` in the reader's byte order.")]
            #[doc = ""]
            #[doc = "If `count` is `None`, the count is read using the reader's `CountPrefix`."]
            pub fn $da(&mut self, count: Option<usize>) -> $crate::Result<alloc::vec::Vec<$out>> {
                self.read_array::<$t>(count, $crate::EndianMode::Default)
                    .map(|v| v.into_iter().map(<$out>::from).collect())
            }

            #[doc = concat!("Reads an array of `", stringify!($t), "` in little-endian byte order.")]
            pub fn $lea(&mut self, count: Option<usize>) -> $crate::Result<alloc::vec::Vec<$out>> {
                self.read_array::<$t>(count, $crate::EndianMode::Little)
                    .map(|v| v.into_iter().map(<$out>::from).collect())
            }

            #[doc = concat!("Reads an array of `", stringify!($t), "` in big-endian byte order.")]
            pub fn $bea(&mut self, count: Option<usize>) -> $crate::Result<alloc::vec::Vec<$out>> {
                self.read_array::<$t>(count, $crate::EndianMode::Big)
                    .map(|v| v.into_iter().map(<$out>::from).collect())
            }
        )*
    };
}

/// One entry of the accessor table.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Accessor {
    /// Method name, e.g. `"read_u32_be"` or `"read_f16_array_le"`.
    pub name: &'static str,
    /// The type the accessor decodes.
    pub kind: ScalarKind,
    /// The byte order the accessor decodes with.
    pub mode: EndianMode,
}

macro_rules! accessor_tables {
    ($(
        $t:ty as $out:ty: $kind:ident {
            $d:ident, $le:ident, $be:ident;
            $da:ident, $lea:ident, $bea:ident
        }
    )*) => {
        /// Single-value accessors, three per scalar type.
        pub static ACCESSORS: &[Accessor] = &[
            $(
                Accessor { name: stringify!($d), kind: ScalarKind::$kind, mode: EndianMode::Default },
                Accessor { name: stringify!($le), kind: ScalarKind::$kind, mode: EndianMode::Little },
                Accessor { name: stringify!($be), kind: ScalarKind::$kind, mode: EndianMode::Big },
            )*
        ];

        /// Array accessors, three per scalar type.
        pub static ARRAY_ACCESSORS: &[Accessor] = &[
            $(
                Accessor { name: stringify!($da), kind: ScalarKind::$kind, mode: EndianMode::Default },
                Accessor { name: stringify!($lea), kind: ScalarKind::$kind, mode: EndianMode::Little },
                Accessor { name: stringify!($bea), kind: ScalarKind::$kind, mode: EndianMode::Big },
            )*
        ];
    };
}

for_each_scalar!(accessor_tables);

/// Finds a single-value accessor by name.
pub fn lookup(name: &str) -> Option<&'static Accessor> {
    ACCESSORS.iter().find(|a| a.name == name)
}

/// Finds an array accessor by name.
pub fn lookup_array(name: &str) -> Option<&'static Accessor> {
    ARRAY_ACCESSORS.iter().find(|a| a.name == name)
}

/// The decoding contract shared by `BufferReader` and `StreamReader`.
///
/// This allows a format layer to drive decoding without knowing where the bytes come from,
/// and to select accessors by name.
pub trait EndianRead {
    /// The reader's configured byte order.
    fn endian(&self) -> Endian;

    /// Changes the reader's configured byte order.
    fn set_endian(&mut self, endian: Endian);

    /// Reads one value of `kind`.
    fn read_value(&mut self, kind: ScalarKind, mode: EndianMode) -> Result<Value>;

    /// Reads `count` values of `kind`. If `count` is `None`, the count is read using the
    /// reader's `CountPrefix`.
    fn read_values(
        &mut self,
        kind: ScalarKind,
        count: Option<usize>,
        mode: EndianMode,
    ) -> Result<Vec<Value>>;

    /// Returns the current position.
    fn position(&mut self) -> Result<u64>;

    /// Advances the position to the next multiple of `stride`.
    fn align(&mut self, stride: i64) -> Result<u64>;

    /// Reads one value using the accessor named `name`, e.g. `"read_u32_be"`.
    fn read_named(&mut self, name: &str) -> Result<Value> {
        let accessor = lookup(name).ok_or(ReaderError::Unsupported("unknown accessor"))?;
        self.read_value(accessor.kind, accessor.mode)
    }

    /// Reads an array using the accessor named `name`, e.g. `"read_u16_array_le"`.
    fn read_named_array(&mut self, name: &str, count: Option<usize>) -> Result<Vec<Value>> {
        let accessor = lookup_array(name).ok_or(ReaderError::Unsupported("unknown accessor"))?;
        self.read_values(accessor.kind, count, accessor.mode)
    }
}
