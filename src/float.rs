//! Floating-point vector operations.
//!
//! Arithmetic, comparison, selection and rounding for `f32` and `f64`
//! vectors of every width. 128-bit vectors map onto backend primitives;
//! composites apply the operation to both halves.

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::backend::{ActiveBackend, Backend, RoundMode};
use crate::vector::*;

/// Operations on float vectors.
///
/// `compare_*` return a per-lane [`SimdMask`]; `select` consumes it.
/// `unpacklo`/`unpackhi` interleave within each 128-bit block.
pub trait SimdFloat: SimdVector {
    /// Lane mask produced by comparisons.
    type Mask: SimdMask;

    /// Lane-wise sum.
    fn add(self, other: Self) -> Self;
    /// Lane-wise difference.
    fn sub(self, other: Self) -> Self;
    /// Lane-wise product.
    fn mul(self, other: Self) -> Self;
    /// Lane-wise quotient.
    fn div(self, other: Self) -> Self;
    /// Lane-wise minimum.
    fn min(self, other: Self) -> Self;
    /// Lane-wise maximum.
    fn max(self, other: Self) -> Self;
    /// Lane-wise square root.
    fn sqrt(self) -> Self;

    /// True where the lanes are equal; NaN never compares equal.
    fn compare_eq(self, other: Self) -> Self::Mask;
    /// True where the lanes differ or either is NaN.
    fn compare_neq(self, other: Self) -> Self::Mask;
    /// True where `self < other`.
    fn compare_lt(self, other: Self) -> Self::Mask;
    /// True where `self <= other`.
    fn compare_le(self, other: Self) -> Self::Mask;

    /// Lanes of `a` where `mask` is set, lanes of `b` elsewhere.
    fn select(mask: Self::Mask, a: Self, b: Self) -> Self;

    /// Round to nearest integer, ties to even.
    fn round(self) -> Self;
    /// Round toward zero.
    fn trunc(self) -> Self;
    /// Round toward negative infinity.
    fn floor(self) -> Self;
    /// Round toward positive infinity.
    fn ceil(self) -> Self;

    /// Bitwise AND of the lane bits.
    fn bitwise_and(self, other: Self) -> Self;
    /// Bitwise OR of the lane bits.
    fn bitwise_or(self, other: Self) -> Self;
    /// Bitwise XOR of the lane bits.
    fn bitwise_xor(self, other: Self) -> Self;
    /// `!self & other`.
    fn bitwise_nand(self, other: Self) -> Self;
    /// Every lane bit flipped.
    fn bitwise_not(self) -> Self;

    /// Interleave the low lanes of each 128-bit block of `self` and `other`.
    fn unpacklo(self, other: Self) -> Self;
    /// Interleave the high lanes of each 128-bit block of `self` and `other`.
    fn unpackhi(self, other: Self) -> Self;

    /// True where `self > other`.
    #[inline]
    fn compare_gt(self, other: Self) -> Self::Mask {
        other.compare_lt(self)
    }

    /// True where `self >= other`.
    #[inline]
    fn compare_ge(self, other: Self) -> Self::Mask {
        other.compare_le(self)
    }

    /// Every lane divided by the scalar `s`.
    #[inline]
    fn div_scalar(self, s: Self::Lane) -> Self {
        SimdFloat::div(self, Self::splat(s))
    }

    /// `self + b * c`.
    #[inline]
    fn madd(self, b: Self, c: Self) -> Self {
        self.add(b.mul(c))
    }

    /// `self - b * c`.
    #[inline]
    fn msub(self, b: Self, c: Self) -> Self {
        self.sub(b.mul(c))
    }

    /// `0 - self`.
    #[inline]
    fn neg(self) -> Self {
        Self::zero().sub(self)
    }

    /// Absolute value: the sign bit cleared.
    fn abs(self) -> Self;

    /// `-1`, `0` or `+1` per lane; NaN gives `0`.
    fn sign(self) -> Self;

    /// `1 / self`.
    fn rcp(self) -> Self;

    /// `1 / sqrt(self)`.
    #[inline]
    fn rsqrt(self) -> Self {
        self.sqrt().rcp()
    }

    /// `self - floor(self)`.
    #[inline]
    fn fract(self) -> Self {
        self.sub(self.floor())
    }

    /// Reciprocal for callers that accept an approximation. Exact here.
    #[inline]
    fn fast_rcp(self) -> Self {
        self.rcp()
    }

    /// Reciprocal square root for callers that accept an approximation. Exact here.
    #[inline]
    fn fast_rsqrt(self) -> Self {
        self.rsqrt()
    }

    /// Square root for callers that accept an approximation. Exact here.
    #[inline]
    fn fast_sqrt(self) -> Self {
        self.sqrt()
    }
}

macro_rules! impl_float128 {
    (
        $ty:ident: $lane:ty {
            add: $add:ident, sub: $sub:ident, mul: $mul:ident, div: $div:ident,
            min: $min:ident, max: $max:ident, sqrt: $sqrt:ident,
            eq: $eq:ident, neq: $neq:ident, lt: $lt:ident, le: $le:ident,
            round: $round:ident, unpacklo: $unpacklo:ident, unpackhi: $unpackhi:ident,
        }
    ) => {
        impl SimdFloat for $ty {
            type Mask = Mask128<$lane>;

            #[inline]
            fn add(self, other: Self) -> Self {
                Self::from_reg(ActiveBackend::$add(self.reg(), other.reg()))
            }

            #[inline]
            fn sub(self, other: Self) -> Self {
                Self::from_reg(ActiveBackend::$sub(self.reg(), other.reg()))
            }

            #[inline]
            fn mul(self, other: Self) -> Self {
                Self::from_reg(ActiveBackend::$mul(self.reg(), other.reg()))
            }

            #[inline]
            fn div(self, other: Self) -> Self {
                Self::from_reg(ActiveBackend::$div(self.reg(), other.reg()))
            }

            #[inline]
            fn min(self, other: Self) -> Self {
                Self::from_reg(ActiveBackend::$min(self.reg(), other.reg()))
            }

            #[inline]
            fn max(self, other: Self) -> Self {
                Self::from_reg(ActiveBackend::$max(self.reg(), other.reg()))
            }

            #[inline]
            fn sqrt(self) -> Self {
                Self::from_reg(ActiveBackend::$sqrt(self.reg()))
            }

            #[inline]
            fn compare_eq(self, other: Self) -> Mask128<$lane> {
                Mask128::from_reg(ActiveBackend::$eq(self.reg(), other.reg()))
            }

            #[inline]
            fn compare_neq(self, other: Self) -> Mask128<$lane> {
                Mask128::from_reg(ActiveBackend::$neq(self.reg(), other.reg()))
            }

            #[inline]
            fn compare_lt(self, other: Self) -> Mask128<$lane> {
                Mask128::from_reg(ActiveBackend::$lt(self.reg(), other.reg()))
            }

            #[inline]
            fn compare_le(self, other: Self) -> Mask128<$lane> {
                Mask128::from_reg(ActiveBackend::$le(self.reg(), other.reg()))
            }

            #[inline]
            fn select(mask: Mask128<$lane>, a: Self, b: Self) -> Self {
                let m = mask.reg();
                Self::from_reg(ActiveBackend::or(
                    ActiveBackend::and(m, a.reg()),
                    ActiveBackend::andnot(m, b.reg()),
                ))
            }

            #[inline]
            fn round(self) -> Self {
                Self::from_reg(ActiveBackend::$round(self.reg(), RoundMode::Nearest))
            }

            #[inline]
            fn trunc(self) -> Self {
                Self::from_reg(ActiveBackend::$round(self.reg(), RoundMode::Trunc))
            }

            #[inline]
            fn floor(self) -> Self {
                Self::from_reg(ActiveBackend::$round(self.reg(), RoundMode::Floor))
            }

            #[inline]
            fn ceil(self) -> Self {
                Self::from_reg(ActiveBackend::$round(self.reg(), RoundMode::Ceil))
            }

            #[inline]
            fn bitwise_and(self, other: Self) -> Self {
                Self::from_reg(ActiveBackend::and(self.reg(), other.reg()))
            }

            #[inline]
            fn bitwise_or(self, other: Self) -> Self {
                Self::from_reg(ActiveBackend::or(self.reg(), other.reg()))
            }

            #[inline]
            fn bitwise_xor(self, other: Self) -> Self {
                Self::from_reg(ActiveBackend::xor(self.reg(), other.reg()))
            }

            #[inline]
            fn bitwise_nand(self, other: Self) -> Self {
                Self::from_reg(ActiveBackend::andnot(self.reg(), other.reg()))
            }

            #[inline]
            fn bitwise_not(self) -> Self {
                Self::from_reg(ActiveBackend::xor(
                    self.reg(),
                    ActiveBackend::from_bytes([0xff; 16]),
                ))
            }

            #[inline]
            fn unpacklo(self, other: Self) -> Self {
                Self::from_reg(ActiveBackend::$unpacklo(self.reg(), other.reg()))
            }

            #[inline]
            fn unpackhi(self, other: Self) -> Self {
                Self::from_reg(ActiveBackend::$unpackhi(self.reg(), other.reg()))
            }

            #[inline]
            fn abs(self) -> Self {
                Self::splat(-0.0).bitwise_nand(self)
            }

            #[inline]
            fn sign(self) -> Self {
                let zero = Self::zero();
                let positive = Self::select(self.compare_gt(zero), Self::splat(1.0), zero);
                Self::select(self.compare_lt(zero), Self::splat(-1.0), positive)
            }

            #[inline]
            fn rcp(self) -> Self {
                SimdFloat::div(Self::splat(1.0), self)
            }
        }
    };
}

impl_float128! {
    f32x4: f32 {
        add: add_f32, sub: sub_f32, mul: mul_f32, div: div_f32,
        min: min_f32, max: max_f32, sqrt: sqrt_f32,
        eq: cmp_eq_f32, neq: cmp_neq_f32, lt: cmp_lt_f32, le: cmp_le_f32,
        round: round_f32, unpacklo: unpacklo_32, unpackhi: unpackhi_32,
    }
}

impl_float128! {
    f64x2: f64 {
        add: add_f64, sub: sub_f64, mul: mul_f64, div: div_f64,
        min: min_f64, max: max_f64, sqrt: sqrt_f64,
        eq: cmp_eq_f64, neq: cmp_neq_f64, lt: cmp_lt_f64, le: cmp_le_f64,
        round: round_f64, unpacklo: unpacklo_64, unpackhi: unpackhi_64,
    }
}

impl<H> SimdFloat for Composite<H>
where
    H: SimdFloat,
    Composite<H>: SimdVector,
{
    type Mask = Composite<H::Mask>;

    #[inline]
    fn add(self, other: Self) -> Self {
        combine(self.lo.add(other.lo), self.hi.add(other.hi))
    }

    #[inline]
    fn sub(self, other: Self) -> Self {
        combine(self.lo.sub(other.lo), self.hi.sub(other.hi))
    }

    #[inline]
    fn mul(self, other: Self) -> Self {
        combine(self.lo.mul(other.lo), self.hi.mul(other.hi))
    }

    #[inline]
    fn div(self, other: Self) -> Self {
        combine(self.lo.div(other.lo), self.hi.div(other.hi))
    }

    #[inline]
    fn min(self, other: Self) -> Self {
        combine(self.lo.min(other.lo), self.hi.min(other.hi))
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        combine(self.lo.max(other.lo), self.hi.max(other.hi))
    }

    #[inline]
    fn sqrt(self) -> Self {
        combine(self.lo.sqrt(), self.hi.sqrt())
    }

    #[inline]
    fn compare_eq(self, other: Self) -> Self::Mask {
        combine(self.lo.compare_eq(other.lo), self.hi.compare_eq(other.hi))
    }

    #[inline]
    fn compare_neq(self, other: Self) -> Self::Mask {
        combine(self.lo.compare_neq(other.lo), self.hi.compare_neq(other.hi))
    }

    #[inline]
    fn compare_lt(self, other: Self) -> Self::Mask {
        combine(self.lo.compare_lt(other.lo), self.hi.compare_lt(other.hi))
    }

    #[inline]
    fn compare_le(self, other: Self) -> Self::Mask {
        combine(self.lo.compare_le(other.lo), self.hi.compare_le(other.hi))
    }

    #[inline]
    fn select(mask: Self::Mask, a: Self, b: Self) -> Self {
        combine(H::select(mask.lo, a.lo, b.lo), H::select(mask.hi, a.hi, b.hi))
    }

    #[inline]
    fn round(self) -> Self {
        combine(self.lo.round(), self.hi.round())
    }

    #[inline]
    fn trunc(self) -> Self {
        combine(self.lo.trunc(), self.hi.trunc())
    }

    #[inline]
    fn floor(self) -> Self {
        combine(self.lo.floor(), self.hi.floor())
    }

    #[inline]
    fn ceil(self) -> Self {
        combine(self.lo.ceil(), self.hi.ceil())
    }

    #[inline]
    fn bitwise_and(self, other: Self) -> Self {
        combine(self.lo.bitwise_and(other.lo), self.hi.bitwise_and(other.hi))
    }

    #[inline]
    fn bitwise_or(self, other: Self) -> Self {
        combine(self.lo.bitwise_or(other.lo), self.hi.bitwise_or(other.hi))
    }

    #[inline]
    fn bitwise_xor(self, other: Self) -> Self {
        combine(self.lo.bitwise_xor(other.lo), self.hi.bitwise_xor(other.hi))
    }

    #[inline]
    fn bitwise_nand(self, other: Self) -> Self {
        combine(self.lo.bitwise_nand(other.lo), self.hi.bitwise_nand(other.hi))
    }

    #[inline]
    fn bitwise_not(self) -> Self {
        combine(self.lo.bitwise_not(), self.hi.bitwise_not())
    }

    #[inline]
    fn unpacklo(self, other: Self) -> Self {
        combine(self.lo.unpacklo(other.lo), self.hi.unpacklo(other.hi))
    }

    #[inline]
    fn unpackhi(self, other: Self) -> Self {
        combine(self.lo.unpackhi(other.lo), self.hi.unpackhi(other.hi))
    }

    #[inline]
    fn abs(self) -> Self {
        combine(self.lo.abs(), self.hi.abs())
    }

    #[inline]
    fn sign(self) -> Self {
        combine(self.lo.sign(), self.hi.sign())
    }

    #[inline]
    fn rcp(self) -> Self {
        combine(self.lo.rcp(), self.hi.rcp())
    }
}

macro_rules! impl_float_ops {
    ($([$($gen:tt)*] $ty:ty [$($bound:tt)*];)*) => {
        $(
            impl<$($gen)*> Add for $ty
            where
                $($bound)*
            {
                type Output = Self;

                #[inline]
                fn add(self, rhs: Self) -> Self {
                    SimdFloat::add(self, rhs)
                }
            }

            impl<$($gen)*> Sub for $ty
            where
                $($bound)*
            {
                type Output = Self;

                #[inline]
                fn sub(self, rhs: Self) -> Self {
                    SimdFloat::sub(self, rhs)
                }
            }

            impl<$($gen)*> Mul for $ty
            where
                $($bound)*
            {
                type Output = Self;

                #[inline]
                fn mul(self, rhs: Self) -> Self {
                    SimdFloat::mul(self, rhs)
                }
            }

            impl<$($gen)*> Div for $ty
            where
                $($bound)*
            {
                type Output = Self;

                #[inline]
                fn div(self, rhs: Self) -> Self {
                    SimdFloat::div(self, rhs)
                }
            }

            impl<$($gen)*> Neg for $ty
            where
                $($bound)*
            {
                type Output = Self;

                #[inline]
                fn neg(self) -> Self {
                    SimdFloat::neg(self)
                }
            }
        )*
    };
}

impl_float_ops! {
    [] f32x4 [];
    [] f64x2 [];
    [H] Composite<H> [Composite<H>: SimdFloat];
}
