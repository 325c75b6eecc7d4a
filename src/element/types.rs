//! Element type tags and native-endian element access.

use crate::error::OracleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scalar element kind of a captured vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Signed 8-bit integer.
    Int8,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 64-bit integer.
    Uint64,
    /// Signed 64-bit integer.
    Int64,
    /// IEEE-754 binary32.
    Float32,
    /// IEEE-754 binary64.
    Float64,
}

impl ElementType {
    /// Every element type, in tag order.
    pub const ALL: [ElementType; 10] = [
        ElementType::Int8,
        ElementType::Uint8,
        ElementType::Int16,
        ElementType::Uint16,
        ElementType::Uint32,
        ElementType::Int32,
        ElementType::Uint64,
        ElementType::Int64,
        ElementType::Float32,
        ElementType::Float64,
    ];

    /// Width of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            ElementType::Int8 | ElementType::Uint8 => 1,
            ElementType::Int16 | ElementType::Uint16 => 2,
            ElementType::Uint32 | ElementType::Int32 | ElementType::Float32 => 4,
            ElementType::Uint64 | ElementType::Int64 | ElementType::Float64 => 8,
        }
    }

    /// True for the floating-point kinds.
    pub const fn is_float(self) -> bool {
        matches!(self, ElementType::Float32 | ElementType::Float64)
    }

    /// Lowercase name, also used in snapshots.
    pub const fn name(self) -> &'static str {
        match self {
            ElementType::Int8 => "int8",
            ElementType::Uint8 => "uint8",
            ElementType::Int16 => "int16",
            ElementType::Uint16 => "uint16",
            ElementType::Uint32 => "uint32",
            ElementType::Int32 => "int32",
            ElementType::Uint64 => "uint64",
            ElementType::Int64 => "int64",
            ElementType::Float32 => "float32",
            ElementType::Float64 => "float64",
        }
    }

    /// Render one element for diagnostics.
    ///
    /// `bytes` must hold at least [`size`](Self::size) bytes in native order.
    /// Floats use the shortest text that round-trips.
    pub fn format_element(self, bytes: &[u8]) -> String {
        match self {
            ElementType::Int8 => i8::from_ne_bytes(ne_array(bytes)).to_string(),
            ElementType::Uint8 => u8::from_ne_bytes(ne_array(bytes)).to_string(),
            ElementType::Int16 => i16::from_ne_bytes(ne_array(bytes)).to_string(),
            ElementType::Uint16 => u16::from_ne_bytes(ne_array(bytes)).to_string(),
            ElementType::Uint32 => u32::from_ne_bytes(ne_array(bytes)).to_string(),
            ElementType::Int32 => i32::from_ne_bytes(ne_array(bytes)).to_string(),
            ElementType::Uint64 => u64::from_ne_bytes(ne_array(bytes)).to_string(),
            ElementType::Int64 => i64::from_ne_bytes(ne_array(bytes)).to_string(),
            ElementType::Float32 => format!("{:?}", f32::from_ne_bytes(ne_array(bytes))),
            ElementType::Float64 => format!("{:?}", f64::from_ne_bytes(ne_array(bytes))),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementType {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| OracleError::UnknownElementType(s.to_string()))
    }
}

/// Copy the leading `N` bytes into an array.
pub(crate) fn ne_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

/// Rust scalar types that map onto an [`ElementType`].
///
/// Lets a harness push typed slices instead of filling records byte by byte.
pub trait Element: Copy {
    /// Tag of this scalar type.
    const TYPE: ElementType;

    /// Write the native-endian bytes of `self` into `out`.
    ///
    /// `out` is exactly `Self::TYPE.size()` bytes long.
    fn write_ne(self, out: &mut [u8]);
}

macro_rules! impl_element {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const TYPE: ElementType = ElementType::$tag;

                fn write_ne(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

impl_element! {
    i8 => Int8,
    u8 => Uint8,
    i16 => Int16,
    u16 => Uint16,
    u32 => Uint32,
    i32 => Int32,
    u64 => Uint64,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
}
