//! Lane and width model.
//!
//! Every vector in this crate is tagged at compile time with an element kind
//! (the [`Lane`] type), a lane count and a total bit width (the [`Width`]
//! marker). [`Shape`] is the runtime mirror of that tag, used by the
//! [`dynamic`](crate::dynamic) layer and for diagnostics.

use std::fmt;
use std::str::FromStr;

use bytemuck::Pod;
use half::f16;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimdError};
use crate::reinterpret::{Bits128, Bits256, Bits512, Bits64, RawBits};

/// Element kind of a vector lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    /// IEEE 754 half precision. Storage only: no arithmetic is defined on it.
    F16,
    F32,
    F64,
}

impl LaneKind {
    /// All kinds, integers first.
    pub const ALL: [LaneKind; 11] = [
        LaneKind::I8,
        LaneKind::I16,
        LaneKind::I32,
        LaneKind::I64,
        LaneKind::U8,
        LaneKind::U16,
        LaneKind::U32,
        LaneKind::U64,
        LaneKind::F16,
        LaneKind::F32,
        LaneKind::F64,
    ];

    /// Width of one lane in bits.
    pub const fn bits(self) -> usize {
        match self {
            LaneKind::I8 | LaneKind::U8 => 8,
            LaneKind::I16 | LaneKind::U16 | LaneKind::F16 => 16,
            LaneKind::I32 | LaneKind::U32 | LaneKind::F32 => 32,
            LaneKind::I64 | LaneKind::U64 | LaneKind::F64 => 64,
        }
    }

    /// True for signed integer kinds.
    pub const fn is_signed(self) -> bool {
        matches!(self, LaneKind::I8 | LaneKind::I16 | LaneKind::I32 | LaneKind::I64)
    }

    /// True for unsigned integer kinds.
    pub const fn is_unsigned(self) -> bool {
        matches!(self, LaneKind::U8 | LaneKind::U16 | LaneKind::U32 | LaneKind::U64)
    }

    /// True for floating-point kinds.
    pub const fn is_float(self) -> bool {
        matches!(self, LaneKind::F16 | LaneKind::F32 | LaneKind::F64)
    }

    /// Short lowercase name, as used in type names (`u8`, `f32`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            LaneKind::I8 => "i8",
            LaneKind::I16 => "i16",
            LaneKind::I32 => "i32",
            LaneKind::I64 => "i64",
            LaneKind::U8 => "u8",
            LaneKind::U16 => "u16",
            LaneKind::U32 => "u32",
            LaneKind::U64 => "u64",
            LaneKind::F16 => "f16",
            LaneKind::F32 => "f32",
            LaneKind::F64 => "f64",
        }
    }
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LaneKind {
    type Err = SimdError;

    fn from_str(s: &str) -> Result<Self> {
        LaneKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| SimdError::invalid_argument(format!("unknown lane kind `{}`", s)))
    }
}

/// Scalar element type that can occupy a vector lane.
///
/// Sealed: the set of lane types is closed.
pub trait Lane:
    Pod + Zero + Default + PartialEq + PartialOrd + fmt::Debug + Send + Sync + sealed::Sealed + 'static
{
    /// Runtime tag for this lane type.
    const KIND: LaneKind;
}

mod sealed {
    pub trait Sealed {}
}

macro_rules! impl_lane {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Lane for $ty {
                const KIND: LaneKind = LaneKind::$kind;
            }
        )*
    };
}

impl_lane! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f16 => F16,
    f32 => F32,
    f64 => F64,
}

/// Compile-time total bit width of a vector.
///
/// Two vector types can be reinterpreted into each other exactly when their
/// `Width` types are equal.
pub trait Width: Copy + Send + Sync + 'static {
    /// Total width in bits.
    const BITS: usize;
    /// Width-tagged raw container used for bit-level reinterpretation.
    type Bits: RawBits<Bytes = Self::Bytes>;
    /// Byte array of exactly `BITS / 8` bytes.
    type Bytes: Copy + fmt::Debug + PartialEq + AsRef<[u8]> + AsMut<[u8]> + Send + Sync + 'static;
    /// All-zero byte array.
    const ZERO_BYTES: Self::Bytes;
}

/// 64-bit vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct W64;

/// 128-bit vectors: one native register on every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct W128;

/// 256-bit vectors: composite of two 128-bit halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct W256;

/// 512-bit vectors: composite of two 256-bit halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct W512;

impl Width for W64 {
    const BITS: usize = 64;
    type Bits = Bits64;
    type Bytes = [u8; 8];
    const ZERO_BYTES: [u8; 8] = [0; 8];
}

impl Width for W128 {
    const BITS: usize = 128;
    type Bits = Bits128;
    type Bytes = [u8; 16];
    const ZERO_BYTES: [u8; 16] = [0; 16];
}

impl Width for W256 {
    const BITS: usize = 256;
    type Bits = Bits256;
    type Bytes = [u8; 32];
    const ZERO_BYTES: [u8; 32] = [0; 32];
}

impl Width for W512 {
    const BITS: usize = 512;
    type Bits = Bits512;
    type Bytes = [u8; 64];
    const ZERO_BYTES: [u8; 64] = [0; 64];
}

/// Runtime description of a canonical vector type: element kind and lane count.
///
/// Only canonical shapes can be constructed: 128, 256 or 512 bits for every
/// kind except `f16`, which exists only as `f16x4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Shape {
    kind: LaneKind,
    lanes: usize,
}

impl Shape {
    /// Create a shape, rejecting non-canonical combinations.
    pub fn new(kind: LaneKind, lanes: usize) -> Result<Self> {
        let shape = Self { kind, lanes };
        if shape.is_canonical() {
            Ok(shape)
        } else {
            Err(SimdError::invalid_argument(format!(
                "`{}` is not a supported vector shape",
                shape
            )))
        }
    }

    /// Shape of a lane type at a known-valid lane count.
    pub(crate) const fn of(kind: LaneKind, lanes: usize) -> Self {
        Self { kind, lanes }
    }

    fn is_canonical(&self) -> bool {
        if self.kind == LaneKind::F16 {
            return self.lanes == 4;
        }
        match self.kind.bits().checked_mul(self.lanes) {
            Some(bits) => matches!(bits, 128 | 256 | 512) && self.lanes.is_power_of_two(),
            None => false,
        }
    }

    /// Element kind.
    pub fn kind(&self) -> LaneKind {
        self.kind
    }

    /// Number of lanes.
    pub fn lanes(&self) -> usize {
        self.lanes
    }

    /// Total width in bits.
    pub fn bits(&self) -> usize {
        self.kind.bits() * self.lanes
    }

    /// Total width in bytes.
    pub fn bytes(&self) -> usize {
        self.bits() / 8
    }

    /// All canonical shapes, ordered by width then kind.
    pub fn all() -> Vec<Shape> {
        let mut shapes = vec![Shape::of(LaneKind::F16, 4)];
        for bits in [128, 256, 512] {
            for kind in LaneKind::ALL {
                if kind != LaneKind::F16 {
                    shapes.push(Shape::of(kind, bits / kind.bits()));
                }
            }
        }
        shapes
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.kind, self.lanes)
    }
}

impl FromStr for Shape {
    type Err = SimdError;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, lanes) = s
            .split_once('x')
            .ok_or_else(|| SimdError::invalid_argument(format!("malformed shape `{}`", s)))?;
        let kind: LaneKind = kind.parse()?;
        let lanes: usize = lanes
            .parse()
            .map_err(|_| SimdError::invalid_argument(format!("malformed lane count in `{}`", s)))?;
        Shape::new(kind, lanes)
    }
}

impl TryFrom<String> for Shape {
    type Error = SimdError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Shape> for String {
    fn from(shape: Shape) -> Self {
        shape.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_lane_kind_properties() {
        assert_eq!(LaneKind::U8.bits(), 8);
        assert_eq!(LaneKind::F16.bits(), 16);
        assert_eq!(LaneKind::F64.bits(), 64);
        assert!(LaneKind::I32.is_signed());
        assert!(LaneKind::U64.is_unsigned());
        assert!(LaneKind::F32.is_float());
        assert!(!LaneKind::F32.is_signed());
    }

    #[test]
    fn test_lane_kind_constants() {
        assert_eq!(<u16 as Lane>::KIND, LaneKind::U16);
        assert_eq!(<f16 as Lane>::KIND, LaneKind::F16);
        assert_eq!(<i64 as Lane>::KIND, LaneKind::I64);
    }

    #[test]
    fn test_shape_parse_and_display() {
        let shape: Shape = "f32x8".parse().unwrap();
        assert_eq!(shape.kind(), LaneKind::F32);
        assert_eq!(shape.lanes(), 8);
        assert_eq!(shape.bits(), 256);
        assert_eq!(shape.to_string(), "f32x8");
    }

    #[test]
    fn test_shape_rejects_non_canonical() {
        assert!(Shape::new(LaneKind::U8, 8).is_err());
        assert!(Shape::new(LaneKind::F16, 8).is_err());
        assert!(Shape::new(LaneKind::I32, 32).is_err());
        assert!("f32".parse::<Shape>().is_err());
        assert!("q8x16".parse::<Shape>().is_err());
        assert!("u8xsixteen".parse::<Shape>().is_err());

        // lane counts whose bit width overflows usize
        let err = "u64x2305843009213693952".parse::<Shape>().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert!(Shape::new(LaneKind::U8, usize::MAX).is_err());
        assert!(Shape::new(LaneKind::F64, 1usize << (usize::BITS - 1)).is_err());
    }

    #[test]
    fn test_all_shapes_are_canonical() {
        let shapes = Shape::all();
        assert_eq!(shapes.len(), 31);
        for shape in shapes {
            assert_eq!(Shape::new(shape.kind(), shape.lanes()).unwrap(), shape);
        }
    }

    #[test]
    fn test_width_bytes() {
        assert_eq!(W128::ZERO_BYTES.len() * 8, W128::BITS);
        assert_eq!(W512::ZERO_BYTES.len() * 8, W512::BITS);
    }
}
