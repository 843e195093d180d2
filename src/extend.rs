//! Lane extension and narrowing.
//!
//! Extension widens every lane to the next integer width. Unsigned sources
//! are interleaved with a zero register (zero fill); signed sources are
//! interleaved with their own `x < 0` mask (sign fill). A 128-bit source that
//! extends into 256 bits widens its low half natively, moves the upper 64 bits
//! into position and widens them the same way, then combines the two.
//!
//! Narrowing packs the low half-width bits of every lane of `a`, then of `b`,
//! into one vector. It truncates; nothing saturates.
//!
//! Only adjacent widths with the same signedness are connected; anything else
//! is rejected at compile time:
//!
//! ```compile_fail
//! use lanewise::{extend, u32x4, u8x16, SimdVector};
//!
//! // 8 -> 32 skips a width
//! let wide: u32x4 = extend(u8x16::splat(1));
//! ```
//!
//! ```compile_fail
//! use lanewise::{narrow, f32x4, SimdVector};
//!
//! // float lanes do not narrow
//! let packed = narrow(f32x4::splat(1.0), f32x4::splat(2.0));
//! ```

use crate::backend::{ActiveBackend, Backend, Reg};
use crate::vector::*;

/// Lane widening from `Self` into `D`.
#[diagnostic::on_unimplemented(
    message = "no lane extension from `{Self}` to `{D}`",
    label = "cannot extend `{Self}` into `{D}`",
    note = "extension connects adjacent integer lane widths (8 -> 16, 16 -> 32, 32 -> 64) of the same signedness"
)]
pub trait ExtendTo<D: SimdVector>: SimdVector {
    /// Widen every lane of `self`, zero-filling unsigned and sign-filling
    /// signed lanes.
    fn extend(self) -> D;
}

/// Widen the lanes of `source` into `D`.
///
/// A destination with the same total width as the source extends the low
/// half of the source lanes (`u8x16 -> u16x8`); a destination twice as wide
/// extends all of them (`u8x16 -> u16x16`).
///
/// ```
/// use lanewise::{extend, i16x8, i8x16, u16x16, u8x16, SimdVector};
///
/// let bytes = u8x16::from_array(std::array::from_fn(|i| 250 + (i as u8 % 6)));
/// let words: u16x16 = extend(bytes);
/// assert_eq!(words.lane(0), 250);
/// assert_eq!(words.lane(15), 253);
///
/// let signed: i16x8 = extend(i8x16::splat(-3));
/// assert_eq!(signed.to_array(), [-3; 8]);
/// ```
#[inline]
pub fn extend<D, S>(source: S) -> D
where
    D: SimdVector,
    S: ExtendTo<D>,
{
    source.extend()
}

/// Truncating pack of two equal-shape vectors into one with half-width lanes.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be narrowed",
    label = "no narrower lane type for `{Self}`",
    note = "narrowing is defined for 16, 32 and 64-bit integer lanes"
)]
pub trait Narrow: SimdVector {
    /// Vector with twice the lanes at half the lane width.
    type Output: SimdVector;

    /// Low half-width bits of every lane of `self`, then of `other`.
    fn narrow(self, other: Self) -> Self::Output;
}

/// Narrow `a` and `b` into one vector: lanes of `a` first, then lanes of `b`.
///
/// ```
/// use lanewise::{narrow, u16x8, SimdVector};
///
/// let a = u16x8::splat(0x1234);
/// let b = u16x8::splat(0x00ff);
/// let bytes = narrow(a, b).to_array();
/// assert_eq!(bytes[..8], [0x34; 8]);
/// assert_eq!(bytes[8..], [0xff; 8]);
/// ```
#[inline]
pub fn narrow<V: Narrow>(a: V, b: V) -> V::Output {
    a.narrow(b)
}

macro_rules! impl_extend_low {
    ($($src:ident => $dst:ident: $unpack:ident, $fill:expr;)*) => {
        $(
            impl ExtendTo<$dst> for $src {
                #[inline]
                fn extend(self) -> $dst {
                    let fill: fn(Reg) -> Reg = $fill;
                    $dst::from_reg(ActiveBackend::$unpack(self.reg(), fill(self.reg())))
                }
            }
        )*
    };
}

impl_extend_low! {
    u8x16 => u16x8: unpacklo_8, |_| ActiveBackend::zero();
    u16x8 => u32x4: unpacklo_16, |_| ActiveBackend::zero();
    u32x4 => u64x2: unpacklo_32, |_| ActiveBackend::zero();
    i8x16 => i16x8: unpacklo_8, ActiveBackend::sign_mask_8;
    i16x8 => i32x4: unpacklo_16, ActiveBackend::sign_mask_16;
    i32x4 => i64x2: unpacklo_32, ActiveBackend::sign_mask_32;
}

macro_rules! impl_extend_full {
    ($($src:ident => $dst:ident = $half:ident;)*) => {
        $(
            impl ExtendTo<$dst> for $src {
                #[inline]
                fn extend(self) -> $dst {
                    let upper = $src::from_reg(ActiveBackend::dup_high_64(self.reg()));
                    combine(extend::<$half, _>(self), extend::<$half, _>(upper))
                }
            }
        )*
    };
}

impl_extend_full! {
    u8x16 => u16x16 = u16x8;
    u16x8 => u32x8 = u32x4;
    u32x4 => u64x4 = u64x2;
    i8x16 => i16x16 = i16x8;
    i16x8 => i32x8 = i32x4;
    i32x4 => i64x4 = i64x2;
}

macro_rules! impl_extend_composite {
    ($($src:ident => $dst:ident = $half:ident;)*) => {
        $(
            impl ExtendTo<$dst> for $src {
                #[inline]
                fn extend(self) -> $dst {
                    combine(
                        extend::<$half, _>(self.lo),
                        extend::<$half, _>(self.hi),
                    )
                }
            }
        )*
    };
}

impl_extend_composite! {
    u8x32 => u16x32 = u16x16;
    u16x16 => u32x16 = u32x8;
    u32x8 => u64x8 = u64x4;
    i8x32 => i16x32 = i16x16;
    i16x16 => i32x16 = i32x8;
    i32x8 => i64x8 = i64x4;
}

macro_rules! impl_narrow {
    ($($src:ident => $dst:ident: $pack:ident;)*) => {
        $(
            impl Narrow for $src {
                type Output = $dst;

                #[inline]
                fn narrow(self, other: Self) -> $dst {
                    $dst::from_reg(ActiveBackend::$pack(self.reg(), other.reg()))
                }
            }
        )*
    };
}

impl_narrow! {
    u16x8 => u8x16: pack_low_16;
    u32x4 => u16x8: pack_low_32;
    u64x2 => u32x4: pack_low_64;
    i16x8 => i8x16: pack_low_16;
    i32x4 => i16x8: pack_low_32;
    i64x2 => i32x4: pack_low_64;
}

impl<H> Narrow for Composite<H>
where
    H: Narrow,
    Composite<H>: SimdVector,
    Composite<H::Output>: SimdVector,
{
    type Output = Composite<H::Output>;

    #[inline]
    fn narrow(self, other: Self) -> Composite<H::Output> {
        combine(self.lo.narrow(self.hi), other.lo.narrow(other.hi))
    }
}
