//! Numeric lane conversion.
//!
//! [`convert`] changes the lane kind and keeps lane count and order. Float to
//! integer rounds to nearest, ties to even; [`truncate`] is the round toward
//! zero variant and exists only for float to integer pairs. Integer to float
//! is exact up to the mantissa width and rounds to nearest-even above it.
//!
//! Native 128-bit pairs map onto one backend primitive. Pairs that mix lane
//! counts (four `f64` lanes against four 32-bit lanes) split the 256-bit side
//! into its halves and use the backend's packed pair primitives. Composite
//! vectors convert `lo` and `hi` independently and combine the results, so
//! every pair defined on halves is defined on the doubled shapes.
//!
//! NaN and out-of-range float lanes give backend-defined integers; see
//! [`BackendInfo`](crate::backend::BackendInfo).
//!
//! Pairs without an implementation do not compile:
//!
//! ```compile_fail
//! use lanewise::{convert, f32x4, u8x16, SimdVector};
//!
//! let floats: f32x4 = convert(u8x16::splat(1));
//! ```
//!
//! ```compile_fail
//! use lanewise::{truncate, f32x4, i32x4, SimdVector};
//!
//! // truncation is only defined from float lanes to integer lanes
//! let floats: f32x4 = truncate(i32x4::splat(1));
//! ```

use half::f16;

use crate::backend::{ActiveBackend, Backend};
use crate::config::Rounding;
use crate::vector::*;

/// Value-converting lane conversion from `Self` into `D`.
#[diagnostic::on_unimplemented(
    message = "no conversion from `{Self}` to `{D}`",
    label = "`{Self}` cannot be converted into `{D}`",
    note = "conversions are defined between integer and float lanes of equal lane count, and between f16x4 and f32x4"
)]
pub trait ConvertTo<D: SimdVector>: SimdVector {
    /// Convert every lane, rounding to nearest where precision is lost.
    fn convert(self) -> D;
}

/// Float to integer conversion rounding toward zero.
#[diagnostic::on_unimplemented(
    message = "no truncating conversion from `{Self}` to `{D}`",
    label = "`{Self}` cannot be truncated into `{D}`",
    note = "truncation is only defined from float lanes to integer lanes of equal lane count"
)]
pub trait TruncateTo<D: SimdVector>: SimdVector {
    /// Convert every lane, discarding the fractional part.
    fn truncate(self) -> D;
}

/// Convert the lanes of `source` into `D`.
///
/// ```
/// use lanewise::{convert, f32x4, i32x4, SimdVector};
///
/// let v = f32x4::from_array([2.7, -2.7, 2.5, 3.5]);
/// let rounded: i32x4 = convert(v);
/// assert_eq!(rounded.to_array(), [3, -3, 2, 4]);
/// ```
#[inline]
pub fn convert<D, S>(source: S) -> D
where
    D: SimdVector,
    S: ConvertTo<D>,
{
    source.convert()
}

/// Convert float lanes of `source` into integer lanes of `D`, rounding toward
/// zero.
///
/// ```
/// use lanewise::{truncate, f32x4, i32x4, SimdVector};
///
/// let v = f32x4::from_array([2.7, -2.7, 0.9, -0.9]);
/// let truncated: i32x4 = truncate(v);
/// assert_eq!(truncated.to_array(), [2, -2, 0, 0]);
/// ```
#[inline]
pub fn truncate<D, S>(source: S) -> D
where
    D: SimdVector,
    S: TruncateTo<D>,
{
    source.truncate()
}

// ============================================================================
// Native 128-bit pairs
// ============================================================================

macro_rules! impl_convert_native {
    ($($src:ident => $dst:ident: $op:ident $(($rounding:expr))?;)*) => {
        $(
            impl ConvertTo<$dst> for $src {
                #[inline]
                fn convert(self) -> $dst {
                    $dst::from_reg(ActiveBackend::$op(self.reg() $(, $rounding)?))
                }
            }
        )*
    };
}

macro_rules! impl_truncate_native {
    ($($src:ident => $dst:ident: $op:ident;)*) => {
        $(
            impl TruncateTo<$dst> for $src {
                #[inline]
                fn truncate(self) -> $dst {
                    $dst::from_reg(ActiveBackend::$op(self.reg(), Rounding::TowardZero))
                }
            }
        )*
    };
}

impl_convert_native! {
    i32x4 => f32x4: i32_to_f32;
    u32x4 => f32x4: u32_to_f32;
    i64x2 => f64x2: i64_to_f64;
    f32x4 => i32x4: f32_to_i32(Rounding::Nearest);
    f32x4 => u32x4: f32_to_u32(Rounding::Nearest);
    f64x2 => i64x2: f64_to_i64(Rounding::Nearest);
}

impl_truncate_native! {
    f32x4 => i32x4: f32_to_i32;
    f32x4 => u32x4: f32_to_u32;
    f64x2 => i64x2: f64_to_i64;
}

// ============================================================================
// Pairs mixing lane counts: four 32-bit lanes against four f64 lanes
// ============================================================================

macro_rules! impl_convert_to_f64x4 {
    ($($src:ident: $op:ident;)*) => {
        $(
            impl ConvertTo<f64x4> for $src {
                #[inline]
                fn convert(self) -> f64x4 {
                    let reg = self.reg();
                    combine(
                        f64x2::from_reg(ActiveBackend::$op(reg)),
                        f64x2::from_reg(ActiveBackend::$op(ActiveBackend::dup_high_64(reg))),
                    )
                }
            }
        )*
    };
}

impl_convert_to_f64x4! {
    i32x4: i32_lo_to_f64;
    u32x4: u32_lo_to_f64;
    f32x4: f32_lo_to_f64;
}

macro_rules! impl_convert_from_f64x4 {
    ($($dst:ident: $op:ident;)*) => {
        $(
            impl ConvertTo<$dst> for f64x4 {
                #[inline]
                fn convert(self) -> $dst {
                    $dst::from_reg(ActiveBackend::$op(self.lo.reg(), self.hi.reg(), Rounding::Nearest))
                }
            }

            impl TruncateTo<$dst> for f64x4 {
                #[inline]
                fn truncate(self) -> $dst {
                    $dst::from_reg(ActiveBackend::$op(self.lo.reg(), self.hi.reg(), Rounding::TowardZero))
                }
            }
        )*
    };
}

impl_convert_from_f64x4! {
    i32x4: f64_pair_to_i32;
    u32x4: f64_pair_to_u32;
}

impl ConvertTo<f32x4> for f64x4 {
    #[inline]
    fn convert(self) -> f32x4 {
        f32x4::from_reg(ActiveBackend::f64_pair_to_f32(self.lo.reg(), self.hi.reg()))
    }
}

// ============================================================================
// Half precision, lane by lane
// ============================================================================

impl ConvertTo<f32x4> for f16x4 {
    #[inline]
    fn convert(self) -> f32x4 {
        f32x4::from_array(self.to_array().map(f16::to_f32))
    }
}

impl ConvertTo<f16x4> for f32x4 {
    #[inline]
    fn convert(self) -> f16x4 {
        f16x4::from_array(self.to_array().map(f16::from_f32))
    }
}

// ============================================================================
// Composite recursion
// ============================================================================

impl<S, D> ConvertTo<Composite<D>> for Composite<S>
where
    S: ConvertTo<D>,
    D: SimdVector,
    Composite<S>: SimdVector,
    Composite<D>: SimdVector,
{
    #[inline]
    fn convert(self) -> Composite<D> {
        combine(self.lo.convert(), self.hi.convert())
    }
}

impl<S, D> TruncateTo<Composite<D>> for Composite<S>
where
    S: TruncateTo<D>,
    D: SimdVector,
    Composite<S>: SimdVector,
    Composite<D>: SimdVector,
{
    #[inline]
    fn truncate(self) -> Composite<D> {
        combine(self.lo.truncate(), self.hi.truncate())
    }
}
