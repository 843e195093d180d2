//! Portable backend using the `wide` crate.
//!
//! Works on any platform. Float arithmetic goes through `wide`'s `f32x4` and
//! `f64x2`; shuffles, packs and conversions that `wide` has no direct
//! equivalent for are done lane by lane on plain arrays.
//!
//! Float-to-integer conversions saturate: NaN becomes 0 and out-of-range
//! values clamp to the destination's minimum or maximum.

use bytemuck::Pod;
use wide::{f32x4, f64x2, u8x16};

use super::{Backend, RoundMode};
use crate::config::Rounding;

/// Backend built on `wide`, available on every target.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortableBackend;

#[inline]
fn lanes<T: Pod, const N: usize>(r: u8x16) -> [T; N] {
    bytemuck::cast(r)
}

#[inline]
fn pack<T: Pod, const N: usize>(lanes: [T; N]) -> u8x16 {
    bytemuck::cast(lanes)
}

#[inline]
fn map<A: Pod, B: Pod, const N: usize>(r: u8x16, f: impl Fn(A) -> B) -> u8x16 {
    pack::<B, N>(lanes::<A, N>(r).map(f))
}

#[inline]
fn zip<A: Pod, B: Pod, const N: usize>(a: u8x16, b: u8x16, f: impl Fn(A, A) -> B) -> u8x16 {
    let a = lanes::<A, N>(a);
    let b = lanes::<A, N>(b);
    pack::<B, N>(std::array::from_fn(|i| f(a[i], b[i])))
}

#[inline]
fn bits(a: u8x16, b: u8x16, f: impl Fn(u128, u128) -> u128) -> u8x16 {
    bytemuck::cast(f(bytemuck::cast(a), bytemuck::cast(b)))
}

#[inline]
fn interleave<T: Pod, const N: usize>(a: u8x16, b: u8x16, start: usize) -> u8x16 {
    let a = lanes::<T, N>(a);
    let b = lanes::<T, N>(b);
    pack::<T, N>(std::array::from_fn(|i| {
        let src = start + i / 2;
        if i % 2 == 0 {
            a[src]
        } else {
            b[src]
        }
    }))
}

#[inline]
fn f32s(r: u8x16) -> f32x4 {
    bytemuck::cast(r)
}

#[inline]
fn f64s(r: u8x16) -> f64x2 {
    bytemuck::cast(r)
}

#[inline]
fn mask32(b: bool) -> u32 {
    if b {
        u32::MAX
    } else {
        0
    }
}

#[inline]
fn mask64(b: bool) -> u64 {
    if b {
        u64::MAX
    } else {
        0
    }
}

#[inline]
fn round_f32_lane(x: f32, mode: RoundMode) -> f32 {
    match mode {
        RoundMode::Nearest => x.round_ties_even(),
        RoundMode::Floor => x.floor(),
        RoundMode::Ceil => x.ceil(),
        RoundMode::Trunc => x.trunc(),
    }
}

#[inline]
fn round_f64_lane(x: f64, mode: RoundMode) -> f64 {
    match mode {
        RoundMode::Nearest => x.round_ties_even(),
        RoundMode::Floor => x.floor(),
        RoundMode::Ceil => x.ceil(),
        RoundMode::Trunc => x.trunc(),
    }
}

#[inline]
fn integral_f32(x: f32, rounding: Rounding) -> f32 {
    match rounding {
        Rounding::Nearest => x.round_ties_even(),
        Rounding::TowardZero => x.trunc(),
    }
}

#[inline]
fn integral_f64(x: f64, rounding: Rounding) -> f64 {
    match rounding {
        Rounding::Nearest => x.round_ties_even(),
        Rounding::TowardZero => x.trunc(),
    }
}

impl Backend for PortableBackend {
    const NAME: &'static str = "portable";
    const OUT_OF_RANGE: &'static str = "saturate to the destination range, NaN becomes 0";

    type Reg = u8x16;

    #[inline]
    fn zero() -> u8x16 {
        bytemuck::Zeroable::zeroed()
    }

    #[inline]
    fn from_bytes(bytes: [u8; 16]) -> u8x16 {
        bytemuck::cast(bytes)
    }

    #[inline]
    fn to_bytes(r: u8x16) -> [u8; 16] {
        bytemuck::cast(r)
    }

    #[inline]
    fn and(a: u8x16, b: u8x16) -> u8x16 {
        bits(a, b, |a, b| a & b)
    }

    #[inline]
    fn or(a: u8x16, b: u8x16) -> u8x16 {
        bits(a, b, |a, b| a | b)
    }

    #[inline]
    fn xor(a: u8x16, b: u8x16) -> u8x16 {
        bits(a, b, |a, b| a ^ b)
    }

    #[inline]
    fn andnot(a: u8x16, b: u8x16) -> u8x16 {
        bits(a, b, |a, b| !a & b)
    }

    #[inline]
    fn unpacklo_8(a: u8x16, b: u8x16) -> u8x16 {
        interleave::<u8, 16>(a, b, 0)
    }

    #[inline]
    fn unpacklo_16(a: u8x16, b: u8x16) -> u8x16 {
        interleave::<u16, 8>(a, b, 0)
    }

    #[inline]
    fn unpacklo_32(a: u8x16, b: u8x16) -> u8x16 {
        interleave::<u32, 4>(a, b, 0)
    }

    #[inline]
    fn unpackhi_32(a: u8x16, b: u8x16) -> u8x16 {
        interleave::<u32, 4>(a, b, 2)
    }

    #[inline]
    fn unpacklo_64(a: u8x16, b: u8x16) -> u8x16 {
        interleave::<u64, 2>(a, b, 0)
    }

    #[inline]
    fn unpackhi_64(a: u8x16, b: u8x16) -> u8x16 {
        interleave::<u64, 2>(a, b, 1)
    }

    #[inline]
    fn sign_mask_8(a: u8x16) -> u8x16 {
        map::<i8, i8, 16>(a, |x| x >> 7)
    }

    #[inline]
    fn sign_mask_16(a: u8x16) -> u8x16 {
        map::<i16, i16, 8>(a, |x| x >> 15)
    }

    #[inline]
    fn sign_mask_32(a: u8x16) -> u8x16 {
        map::<i32, i32, 4>(a, |x| x >> 31)
    }

    #[inline]
    fn pack_low_16(a: u8x16, b: u8x16) -> u8x16 {
        let a = lanes::<u16, 8>(a);
        let b = lanes::<u16, 8>(b);
        pack::<u8, 16>(std::array::from_fn(|i| {
            if i < 8 {
                a[i] as u8
            } else {
                b[i - 8] as u8
            }
        }))
    }

    #[inline]
    fn pack_low_32(a: u8x16, b: u8x16) -> u8x16 {
        let a = lanes::<u32, 4>(a);
        let b = lanes::<u32, 4>(b);
        pack::<u16, 8>(std::array::from_fn(|i| {
            if i < 4 {
                a[i] as u16
            } else {
                b[i - 4] as u16
            }
        }))
    }

    #[inline]
    fn pack_low_64(a: u8x16, b: u8x16) -> u8x16 {
        let a = lanes::<u64, 2>(a);
        let b = lanes::<u64, 2>(b);
        pack::<u32, 4>([a[0] as u32, a[1] as u32, b[0] as u32, b[1] as u32])
    }

    #[inline]
    fn add_f32(a: u8x16, b: u8x16) -> u8x16 {
        bytemuck::cast(f32s(a) + f32s(b))
    }

    #[inline]
    fn sub_f32(a: u8x16, b: u8x16) -> u8x16 {
        bytemuck::cast(f32s(a) - f32s(b))
    }

    #[inline]
    fn mul_f32(a: u8x16, b: u8x16) -> u8x16 {
        bytemuck::cast(f32s(a) * f32s(b))
    }

    #[inline]
    fn div_f32(a: u8x16, b: u8x16) -> u8x16 {
        bytemuck::cast(f32s(a) / f32s(b))
    }

    #[inline]
    fn min_f32(a: u8x16, b: u8x16) -> u8x16 {
        bytemuck::cast(f32s(a).min(f32s(b)))
    }

    #[inline]
    fn max_f32(a: u8x16, b: u8x16) -> u8x16 {
        bytemuck::cast(f32s(a).max(f32s(b)))
    }

    #[inline]
    fn sqrt_f32(a: u8x16) -> u8x16 {
        bytemuck::cast(f32s(a).sqrt())
    }

    #[inline]
    fn cmp_eq_f32(a: u8x16, b: u8x16) -> u8x16 {
        zip::<f32, u32, 4>(a, b, |x, y| mask32(x == y))
    }

    #[inline]
    fn cmp_neq_f32(a: u8x16, b: u8x16) -> u8x16 {
        zip::<f32, u32, 4>(a, b, |x, y| mask32(x != y))
    }

    #[inline]
    fn cmp_lt_f32(a: u8x16, b: u8x16) -> u8x16 {
        zip::<f32, u32, 4>(a, b, |x, y| mask32(x < y))
    }

    #[inline]
    fn cmp_le_f32(a: u8x16, b: u8x16) -> u8x16 {
        zip::<f32, u32, 4>(a, b, |x, y| mask32(x <= y))
    }

    #[inline]
    fn round_f32(a: u8x16, mode: RoundMode) -> u8x16 {
        map::<f32, f32, 4>(a, |x| round_f32_lane(x, mode))
    }

    #[inline]
    fn add_f64(a: u8x16, b: u8x16) -> u8x16 {
        bytemuck::cast(f64s(a) + f64s(b))
    }

    #[inline]
    fn sub_f64(a: u8x16, b: u8x16) -> u8x16 {
        bytemuck::cast(f64s(a) - f64s(b))
    }

    #[inline]
    fn mul_f64(a: u8x16, b: u8x16) -> u8x16 {
        bytemuck::cast(f64s(a) * f64s(b))
    }

    #[inline]
    fn div_f64(a: u8x16, b: u8x16) -> u8x16 {
        bytemuck::cast(f64s(a) / f64s(b))
    }

    #[inline]
    fn min_f64(a: u8x16, b: u8x16) -> u8x16 {
        bytemuck::cast(f64s(a).min(f64s(b)))
    }

    #[inline]
    fn max_f64(a: u8x16, b: u8x16) -> u8x16 {
        bytemuck::cast(f64s(a).max(f64s(b)))
    }

    #[inline]
    fn sqrt_f64(a: u8x16) -> u8x16 {
        bytemuck::cast(f64s(a).sqrt())
    }

    #[inline]
    fn cmp_eq_f64(a: u8x16, b: u8x16) -> u8x16 {
        zip::<f64, u64, 2>(a, b, |x, y| mask64(x == y))
    }

    #[inline]
    fn cmp_neq_f64(a: u8x16, b: u8x16) -> u8x16 {
        zip::<f64, u64, 2>(a, b, |x, y| mask64(x != y))
    }

    #[inline]
    fn cmp_lt_f64(a: u8x16, b: u8x16) -> u8x16 {
        zip::<f64, u64, 2>(a, b, |x, y| mask64(x < y))
    }

    #[inline]
    fn cmp_le_f64(a: u8x16, b: u8x16) -> u8x16 {
        zip::<f64, u64, 2>(a, b, |x, y| mask64(x <= y))
    }

    #[inline]
    fn round_f64(a: u8x16, mode: RoundMode) -> u8x16 {
        map::<f64, f64, 2>(a, |x| round_f64_lane(x, mode))
    }

    #[inline]
    fn i32_to_f32(a: u8x16) -> u8x16 {
        map::<i32, f32, 4>(a, |x| x as f32)
    }

    #[inline]
    fn u32_to_f32(a: u8x16) -> u8x16 {
        map::<u32, f32, 4>(a, |x| x as f32)
    }

    #[inline]
    fn f32_to_i32(a: u8x16, rounding: Rounding) -> u8x16 {
        map::<f32, i32, 4>(a, |x| integral_f32(x, rounding) as i32)
    }

    #[inline]
    fn f32_to_u32(a: u8x16, rounding: Rounding) -> u8x16 {
        map::<f32, u32, 4>(a, |x| integral_f32(x, rounding) as u32)
    }

    #[inline]
    fn i64_to_f64(a: u8x16) -> u8x16 {
        map::<i64, f64, 2>(a, |x| x as f64)
    }

    #[inline]
    fn f64_to_i64(a: u8x16, rounding: Rounding) -> u8x16 {
        map::<f64, i64, 2>(a, |x| integral_f64(x, rounding) as i64)
    }

    #[inline]
    fn i32_lo_to_f64(a: u8x16) -> u8x16 {
        let a = lanes::<i32, 4>(a);
        pack::<f64, 2>([a[0] as f64, a[1] as f64])
    }

    #[inline]
    fn u32_lo_to_f64(a: u8x16) -> u8x16 {
        let a = lanes::<u32, 4>(a);
        pack::<f64, 2>([a[0] as f64, a[1] as f64])
    }

    #[inline]
    fn f32_lo_to_f64(a: u8x16) -> u8x16 {
        let a = lanes::<f32, 4>(a);
        pack::<f64, 2>([a[0] as f64, a[1] as f64])
    }

    #[inline]
    fn f64_pair_to_i32(lo: u8x16, hi: u8x16, rounding: Rounding) -> u8x16 {
        let lo = lanes::<f64, 2>(lo);
        let hi = lanes::<f64, 2>(hi);
        pack::<i32, 4>([lo[0], lo[1], hi[0], hi[1]].map(|x| integral_f64(x, rounding) as i32))
    }

    #[inline]
    fn f64_pair_to_u32(lo: u8x16, hi: u8x16, rounding: Rounding) -> u8x16 {
        let lo = lanes::<f64, 2>(lo);
        let hi = lanes::<f64, 2>(hi);
        pack::<u32, 4>([lo[0], lo[1], hi[0], hi[1]].map(|x| integral_f64(x, rounding) as u32))
    }

    #[inline]
    fn f64_pair_to_f32(lo: u8x16, hi: u8x16) -> u8x16 {
        let lo = lanes::<f64, 2>(lo);
        let hi = lanes::<f64, 2>(hi);
        pack::<f32, 4>([lo[0], lo[1], hi[0], hi[1]].map(|x| x as f32))
    }
}
