//! Vector type model.
//!
//! A vector is a fixed-width bit pattern tagged with its lane type and lane
//! count. Widths up to the native register (128 bits) are *hardware vectors*
//! ([`Simd128`], one backend register). Wider vectors are *composites*
//! ([`Composite`]): an ordered `lo`/`hi` pair of half-width vectors, so
//! `f32x8` is `Composite<f32x4>` and `f32x16` is `Composite<f32x8>`.
//!
//! Every canonical (lane type, lane count) pair has exactly one type alias,
//! generated below. All of them implement [`SimdVector`].

mod mask;

pub use mask::{Mask128, SimdMask};

use std::fmt;
use std::marker::PhantomData;

use half::f16;

use crate::backend::{ActiveBackend, Backend, Reg};
use crate::reinterpret::{Bits128, Bits256, Bits512, Bits64, RawBits};
use crate::types::{Lane, Shape, Width, W128, W256, W512, W64};

/// Common interface of every vector type.
pub trait SimdVector: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Element type of one lane.
    type Lane: Lane;
    /// Total bit width.
    type Width: Width;
    /// Plain array with one element per lane.
    type Array: Copy
        + fmt::Debug
        + PartialEq
        + AsRef<[Self::Lane]>
        + AsMut<[Self::Lane]>
        + Send
        + Sync;

    /// Number of lanes.
    const LANES: usize;

    /// Vector with every lane set to `value`.
    fn splat(value: Self::Lane) -> Self;

    /// Vector holding `array`, lane 0 first.
    fn from_array(array: Self::Array) -> Self;

    /// Lanes as a plain array, lane 0 first.
    fn to_array(self) -> Self::Array;

    /// Raw bits, for reinterpretation.
    fn into_bits(self) -> <Self::Width as Width>::Bits;

    /// Vector from raw bits of the same width.
    fn from_bits(bits: <Self::Width as Width>::Bits) -> Self;

    /// All bits zero.
    #[inline]
    fn zero() -> Self {
        Self::from_bytes(<Self::Width as Width>::ZERO_BYTES)
    }

    /// Load the first `LANES` elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` is shorter than `LANES`.
    #[inline]
    fn load(slice: &[Self::Lane]) -> Self {
        assert!(
            slice.len() >= Self::LANES,
            "load needs {} lanes, slice has {}",
            Self::LANES,
            slice.len()
        );
        let mut array = Self::zero().to_array();
        array.as_mut().copy_from_slice(&slice[..Self::LANES]);
        Self::from_array(array)
    }

    /// Store all lanes into the first `LANES` elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` is shorter than `LANES`.
    #[inline]
    fn store(self, slice: &mut [Self::Lane]) {
        assert!(
            slice.len() >= Self::LANES,
            "store needs {} lanes, slice has {}",
            Self::LANES,
            slice.len()
        );
        slice[..Self::LANES].copy_from_slice(self.to_array().as_ref());
    }

    /// Value of lane `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= LANES`.
    #[inline]
    fn lane(self, index: usize) -> Self::Lane {
        self.to_array().as_ref()[index]
    }

    /// Little-endian byte image, lane 0 first.
    #[inline]
    fn to_bytes(self) -> <Self::Width as Width>::Bytes {
        self.into_bits().to_bytes()
    }

    /// Vector from its byte image.
    #[inline]
    fn from_bytes(bytes: <Self::Width as Width>::Bytes) -> Self {
        Self::from_bits(<<Self::Width as Width>::Bits as RawBits>::from_bytes(bytes))
    }

    /// Runtime shape of this type.
    #[inline]
    fn shape() -> Shape {
        Shape::of(<Self::Lane as Lane>::KIND, Self::LANES)
    }
}

// ============================================================================
// Hardware vectors
// ============================================================================

/// 128-bit hardware vector: one native register of the active backend.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Simd128<T> {
    reg: Reg,
    lane: PhantomData<T>,
}

impl<T> Simd128<T> {
    #[inline]
    pub(crate) fn from_reg(reg: Reg) -> Self {
        Self {
            reg,
            lane: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn reg(self) -> Reg {
        self.reg
    }
}

/// 64-bit vector. Only `f16x4` uses this width; it has no native register
/// and is stored as plain bytes.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Simd64<T> {
    bytes: [u8; 8],
    lane: PhantomData<T>,
}

/// Vector wider than the native register: two half-width vectors.
///
/// `lo` holds lanes `[0, n/2)` and `hi` holds `[n/2, n)`. The halves are
/// separate values; a composite is never a single hardware register.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Composite<H> {
    /// Lanes `[0, n/2)`.
    pub lo: H,
    /// Lanes `[n/2, n)`.
    pub hi: H,
}

impl<H> Composite<H> {
    /// Build a double-width vector from two halves.
    #[inline]
    pub const fn combine(lo: H, hi: H) -> Self {
        Self { lo, hi }
    }
}

impl<H: Copy> Composite<H> {
    /// Lower half (lanes `[0, n/2)`).
    #[inline]
    pub fn get_low(self) -> H {
        self.lo
    }

    /// Upper half (lanes `[n/2, n)`).
    #[inline]
    pub fn get_high(self) -> H {
        self.hi
    }

    /// Copy with the lower half replaced.
    #[inline]
    pub fn set_low(self, lo: H) -> Self {
        Self { lo, hi: self.hi }
    }

    /// Copy with the upper half replaced.
    #[inline]
    pub fn set_high(self, hi: H) -> Self {
        Self { lo: self.lo, hi }
    }
}

/// Build a double-width vector from two equal-shape halves.
#[inline]
pub fn combine<H>(lo: H, hi: H) -> Composite<H> {
    Composite::combine(lo, hi)
}

/// Lower half of a composite vector.
#[inline]
pub fn get_low<H: Copy>(v: Composite<H>) -> H {
    v.get_low()
}

/// Upper half of a composite vector.
#[inline]
pub fn get_high<H: Copy>(v: Composite<H>) -> H {
    v.get_high()
}

/// `v` with its lower half replaced by `lo`.
#[inline]
pub fn set_low<H: Copy>(v: Composite<H>, lo: H) -> Composite<H> {
    v.set_low(lo)
}

/// `v` with its upper half replaced by `hi`.
#[inline]
pub fn set_high<H: Copy>(v: Composite<H>, hi: H) -> Composite<H> {
    v.set_high(hi)
}

// ============================================================================
// Canonical types
// ============================================================================

macro_rules! impl_simd128 {
    ($($name:ident: $lane:ty, $n:literal;)*) => {
        $(
            #[allow(non_camel_case_types)]
            #[doc = concat!("128-bit vector of ", stringify!($n), " `", stringify!($lane), "` lanes.")]
            pub type $name = Simd128<$lane>;

            impl SimdVector for Simd128<$lane> {
                type Lane = $lane;
                type Width = W128;
                type Array = [$lane; $n];
                const LANES: usize = $n;

                #[inline]
                fn splat(value: $lane) -> Self {
                    Self::from_array([value; $n])
                }

                #[inline]
                fn from_array(array: [$lane; $n]) -> Self {
                    Self::from_reg(ActiveBackend::from_bytes(bytemuck::cast(array)))
                }

                #[inline]
                fn to_array(self) -> [$lane; $n] {
                    bytemuck::cast(ActiveBackend::to_bytes(self.reg))
                }

                #[inline]
                fn into_bits(self) -> Bits128 {
                    Bits128(self.reg)
                }

                #[inline]
                fn from_bits(bits: Bits128) -> Self {
                    Self::from_reg(bits.0)
                }
            }

            impl fmt::Debug for Simd128<$lane> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_tuple(stringify!($name)).field(&self.to_array()).finish()
                }
            }

            impl PartialEq for Simd128<$lane> {
                #[inline]
                fn eq(&self, other: &Self) -> bool {
                    self.to_array() == other.to_array()
                }
            }
        )*
    };
}

macro_rules! impl_composite {
    ($($name:ident = $half:ident: $lane:ty, $n:literal / $half_n:literal, $width:ty, $bits:ident;)*) => {
        $(
            #[allow(non_camel_case_types)]
            #[doc = concat!(
                "Vector of ", stringify!($n), " `", stringify!($lane),
                "` lanes, stored as two `", stringify!($half), "` halves."
            )]
            pub type $name = Composite<$half>;

            impl SimdVector for Composite<$half> {
                type Lane = $lane;
                type Width = $width;
                type Array = [$lane; $n];
                const LANES: usize = $n;

                #[inline]
                fn splat(value: $lane) -> Self {
                    let half = $half::splat(value);
                    Self::combine(half, half)
                }

                #[inline]
                fn from_array(array: [$lane; $n]) -> Self {
                    let lo: [$lane; $half_n] = std::array::from_fn(|i| array[i]);
                    let hi: [$lane; $half_n] = std::array::from_fn(|i| array[$half_n + i]);
                    Self::combine($half::from_array(lo), $half::from_array(hi))
                }

                #[inline]
                fn to_array(self) -> [$lane; $n] {
                    let lo = self.lo.to_array();
                    let hi = self.hi.to_array();
                    std::array::from_fn(|i| if i < $half_n { lo[i] } else { hi[i - $half_n] })
                }

                #[inline]
                fn into_bits(self) -> $bits {
                    $bits {
                        lo: self.lo.into_bits(),
                        hi: self.hi.into_bits(),
                    }
                }

                #[inline]
                fn from_bits(bits: $bits) -> Self {
                    Self::combine($half::from_bits(bits.lo), $half::from_bits(bits.hi))
                }
            }
        )*
    };
}

impl_simd128! {
    i8x16: i8, 16;
    i16x8: i16, 8;
    i32x4: i32, 4;
    i64x2: i64, 2;
    u8x16: u8, 16;
    u16x8: u16, 8;
    u32x4: u32, 4;
    u64x2: u64, 2;
    f32x4: f32, 4;
    f64x2: f64, 2;
}

impl_composite! {
    i8x32 = i8x16: i8, 32 / 16, W256, Bits256;
    i16x16 = i16x8: i16, 16 / 8, W256, Bits256;
    i32x8 = i32x4: i32, 8 / 4, W256, Bits256;
    i64x4 = i64x2: i64, 4 / 2, W256, Bits256;
    u8x32 = u8x16: u8, 32 / 16, W256, Bits256;
    u16x16 = u16x8: u16, 16 / 8, W256, Bits256;
    u32x8 = u32x4: u32, 8 / 4, W256, Bits256;
    u64x4 = u64x2: u64, 4 / 2, W256, Bits256;
    f32x8 = f32x4: f32, 8 / 4, W256, Bits256;
    f64x4 = f64x2: f64, 4 / 2, W256, Bits256;
}

impl_composite! {
    i8x64 = i8x32: i8, 64 / 32, W512, Bits512;
    i16x32 = i16x16: i16, 32 / 16, W512, Bits512;
    i32x16 = i32x8: i32, 16 / 8, W512, Bits512;
    i64x8 = i64x4: i64, 8 / 4, W512, Bits512;
    u8x64 = u8x32: u8, 64 / 32, W512, Bits512;
    u16x32 = u16x16: u16, 32 / 16, W512, Bits512;
    u32x16 = u32x8: u32, 16 / 8, W512, Bits512;
    u64x8 = u64x4: u64, 8 / 4, W512, Bits512;
    f32x16 = f32x8: f32, 16 / 8, W512, Bits512;
    f64x8 = f64x4: f64, 8 / 4, W512, Bits512;
}

/// 64-bit vector of four half-precision lanes. Storage only.
#[allow(non_camel_case_types)]
pub type f16x4 = Simd64<f16>;

impl SimdVector for Simd64<f16> {
    type Lane = f16;
    type Width = W64;
    type Array = [f16; 4];
    const LANES: usize = 4;

    #[inline]
    fn splat(value: f16) -> Self {
        Self::from_array([value; 4])
    }

    #[inline]
    fn from_array(array: [f16; 4]) -> Self {
        Self {
            bytes: bytemuck::cast(array),
            lane: PhantomData,
        }
    }

    #[inline]
    fn to_array(self) -> [f16; 4] {
        bytemuck::cast(self.bytes)
    }

    #[inline]
    fn into_bits(self) -> Bits64 {
        Bits64(self.bytes)
    }

    #[inline]
    fn from_bits(bits: Bits64) -> Self {
        Self {
            bytes: bits.0,
            lane: PhantomData,
        }
    }
}

impl fmt::Debug for Simd64<f16> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("f16x4").field(&self.to_array()).finish()
    }
}

impl PartialEq for Simd64<f16> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

impl<T> Default for Simd128<T> {
    #[inline]
    fn default() -> Self {
        Self::from_reg(ActiveBackend::zero())
    }
}

impl<T> Default for Simd64<T> {
    #[inline]
    fn default() -> Self {
        Self {
            bytes: [0; 8],
            lane: PhantomData,
        }
    }
}

impl<H: Default> Default for Composite<H> {
    #[inline]
    fn default() -> Self {
        Self::combine(H::default(), H::default())
    }
}
