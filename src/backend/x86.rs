//! x86_64 backend using SSE2 intrinsics.
//!
//! SSE2 is part of the x86_64 baseline, so every intrinsic used here is
//! available on any CPU this module compiles for. Rounding primitives use
//! SSE4.1 `roundps`/`roundpd` when the crate is built with that target
//! feature and fall back to the portable lane loops otherwise. Operations
//! with no SSE2 instruction (64-bit integer conversions, f64 to u32) also
//! run through the portable backend.
//!
//! Float-to-i32 conversions follow the hardware: NaN and out-of-range lanes
//! become the "integer indefinite" value `i32::MIN`. `convert` assumes the
//! default MXCSR rounding mode (nearest, ties to even).

use std::arch::x86_64::*;

use super::portable::PortableBackend;
use super::{Backend, RoundMode};
use crate::config::Rounding;

/// Backend built on SSE2 intrinsics.
#[derive(Debug, Clone, Copy, Default)]
pub struct X86Backend;

type Portable = <PortableBackend as Backend>::Reg;

#[inline]
fn to_portable(a: __m128i) -> Portable {
    PortableBackend::from_bytes(X86Backend::to_bytes(a))
}

#[inline]
fn from_portable(a: Portable) -> __m128i {
    X86Backend::from_bytes(PortableBackend::to_bytes(a))
}

#[inline]
fn ps(a: __m128i) -> __m128 {
    unsafe { _mm_castsi128_ps(a) }
}

#[inline]
fn pd(a: __m128i) -> __m128d {
    unsafe { _mm_castsi128_pd(a) }
}

#[inline]
fn from_ps(a: __m128) -> __m128i {
    unsafe { _mm_castps_si128(a) }
}

#[inline]
fn from_pd(a: __m128d) -> __m128i {
    unsafe { _mm_castpd_si128(a) }
}

/// Float-to-u32 on top of the signed conversion: lanes at or above 2^31 are
/// shifted down by 2^31 before converting and the top bit is restored after.
#[inline]
unsafe fn f32_to_u32_sse2(a: __m128, rounding: Rounding) -> __m128i {
    let two31 = _mm_set1_ps(2_147_483_648.0);
    let big = _mm_cmpge_ps(a, two31);
    let shifted = _mm_sub_ps(a, _mm_and_ps(big, two31));
    let converted = match rounding {
        Rounding::Nearest => _mm_cvtps_epi32(shifted),
        Rounding::TowardZero => _mm_cvttps_epi32(shifted),
    };
    let top = _mm_and_si128(_mm_castps_si128(big), _mm_set1_epi32(i32::MIN));
    _mm_xor_si128(converted, top)
}

#[cfg(target_feature = "sse4.1")]
#[inline]
fn round_ps(a: __m128i, mode: RoundMode) -> __m128i {
    unsafe {
        let a = ps(a);
        from_ps(match mode {
            RoundMode::Nearest => _mm_round_ps(a, _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC),
            RoundMode::Floor => _mm_round_ps(a, _MM_FROUND_TO_NEG_INF | _MM_FROUND_NO_EXC),
            RoundMode::Ceil => _mm_round_ps(a, _MM_FROUND_TO_POS_INF | _MM_FROUND_NO_EXC),
            RoundMode::Trunc => _mm_round_ps(a, _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC),
        })
    }
}

#[cfg(not(target_feature = "sse4.1"))]
#[inline]
fn round_ps(a: __m128i, mode: RoundMode) -> __m128i {
    from_portable(PortableBackend::round_f32(to_portable(a), mode))
}

#[cfg(target_feature = "sse4.1")]
#[inline]
fn round_pd(a: __m128i, mode: RoundMode) -> __m128i {
    unsafe {
        let a = pd(a);
        from_pd(match mode {
            RoundMode::Nearest => _mm_round_pd(a, _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC),
            RoundMode::Floor => _mm_round_pd(a, _MM_FROUND_TO_NEG_INF | _MM_FROUND_NO_EXC),
            RoundMode::Ceil => _mm_round_pd(a, _MM_FROUND_TO_POS_INF | _MM_FROUND_NO_EXC),
            RoundMode::Trunc => _mm_round_pd(a, _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC),
        })
    }
}

#[cfg(not(target_feature = "sse4.1"))]
#[inline]
fn round_pd(a: __m128i, mode: RoundMode) -> __m128i {
    from_portable(PortableBackend::round_f64(to_portable(a), mode))
}

impl Backend for X86Backend {
    const NAME: &'static str = "x86_64-sse2";
    const OUT_OF_RANGE: &'static str =
        "i32 lanes become i32::MIN, u32 lanes are unspecified, 64-bit lanes saturate with NaN as 0";

    type Reg = __m128i;

    #[inline]
    fn zero() -> __m128i {
        unsafe { _mm_setzero_si128() }
    }

    #[inline]
    fn from_bytes(bytes: [u8; 16]) -> __m128i {
        unsafe { _mm_loadu_si128(bytes.as_ptr() as *const __m128i) }
    }

    #[inline]
    fn to_bytes(r: __m128i) -> [u8; 16] {
        let mut out = [0u8; 16];
        unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, r) };
        out
    }

    #[inline]
    fn and(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_and_si128(a, b) }
    }

    #[inline]
    fn or(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_or_si128(a, b) }
    }

    #[inline]
    fn xor(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_xor_si128(a, b) }
    }

    #[inline]
    fn andnot(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_andnot_si128(a, b) }
    }

    #[inline]
    fn unpacklo_8(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_unpacklo_epi8(a, b) }
    }

    #[inline]
    fn unpacklo_16(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_unpacklo_epi16(a, b) }
    }

    #[inline]
    fn unpacklo_32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_unpacklo_epi32(a, b) }
    }

    #[inline]
    fn unpackhi_32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_unpackhi_epi32(a, b) }
    }

    #[inline]
    fn unpacklo_64(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_unpacklo_epi64(a, b) }
    }

    #[inline]
    fn unpackhi_64(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_unpackhi_epi64(a, b) }
    }

    #[inline]
    fn sign_mask_8(a: __m128i) -> __m128i {
        unsafe { _mm_cmplt_epi8(a, _mm_setzero_si128()) }
    }

    #[inline]
    fn sign_mask_16(a: __m128i) -> __m128i {
        unsafe { _mm_srai_epi16(a, 15) }
    }

    #[inline]
    fn sign_mask_32(a: __m128i) -> __m128i {
        unsafe { _mm_srai_epi32(a, 31) }
    }

    #[inline]
    fn pack_low_16(a: __m128i, b: __m128i) -> __m128i {
        // packus saturates, so clear the high bytes first
        unsafe {
            let mask = _mm_set1_epi16(0x00ff);
            _mm_packus_epi16(_mm_and_si128(a, mask), _mm_and_si128(b, mask))
        }
    }

    #[inline]
    fn pack_low_32(a: __m128i, b: __m128i) -> __m128i {
        // sign-extend the low halves so the saturating pack is exact
        unsafe {
            let a = _mm_srai_epi32(_mm_slli_epi32(a, 16), 16);
            let b = _mm_srai_epi32(_mm_slli_epi32(b, 16), 16);
            _mm_packs_epi32(a, b)
        }
    }

    #[inline]
    fn pack_low_64(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_ps(_mm_shuffle_ps(ps(a), ps(b), 0b10_00_10_00)) }
    }

    #[inline]
    fn add_f32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_ps(_mm_add_ps(ps(a), ps(b))) }
    }

    #[inline]
    fn sub_f32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_ps(_mm_sub_ps(ps(a), ps(b))) }
    }

    #[inline]
    fn mul_f32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_ps(_mm_mul_ps(ps(a), ps(b))) }
    }

    #[inline]
    fn div_f32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_ps(_mm_div_ps(ps(a), ps(b))) }
    }

    #[inline]
    fn min_f32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_ps(_mm_min_ps(ps(a), ps(b))) }
    }

    #[inline]
    fn max_f32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_ps(_mm_max_ps(ps(a), ps(b))) }
    }

    #[inline]
    fn sqrt_f32(a: __m128i) -> __m128i {
        unsafe { from_ps(_mm_sqrt_ps(ps(a))) }
    }

    #[inline]
    fn cmp_eq_f32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_ps(_mm_cmpeq_ps(ps(a), ps(b))) }
    }

    #[inline]
    fn cmp_neq_f32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_ps(_mm_cmpneq_ps(ps(a), ps(b))) }
    }

    #[inline]
    fn cmp_lt_f32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_ps(_mm_cmplt_ps(ps(a), ps(b))) }
    }

    #[inline]
    fn cmp_le_f32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_ps(_mm_cmple_ps(ps(a), ps(b))) }
    }

    #[inline]
    fn round_f32(a: __m128i, mode: RoundMode) -> __m128i {
        round_ps(a, mode)
    }

    #[inline]
    fn add_f64(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_pd(_mm_add_pd(pd(a), pd(b))) }
    }

    #[inline]
    fn sub_f64(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_pd(_mm_sub_pd(pd(a), pd(b))) }
    }

    #[inline]
    fn mul_f64(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_pd(_mm_mul_pd(pd(a), pd(b))) }
    }

    #[inline]
    fn div_f64(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_pd(_mm_div_pd(pd(a), pd(b))) }
    }

    #[inline]
    fn min_f64(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_pd(_mm_min_pd(pd(a), pd(b))) }
    }

    #[inline]
    fn max_f64(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_pd(_mm_max_pd(pd(a), pd(b))) }
    }

    #[inline]
    fn sqrt_f64(a: __m128i) -> __m128i {
        unsafe { from_pd(_mm_sqrt_pd(pd(a))) }
    }

    #[inline]
    fn cmp_eq_f64(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_pd(_mm_cmpeq_pd(pd(a), pd(b))) }
    }

    #[inline]
    fn cmp_neq_f64(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_pd(_mm_cmpneq_pd(pd(a), pd(b))) }
    }

    #[inline]
    fn cmp_lt_f64(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_pd(_mm_cmplt_pd(pd(a), pd(b))) }
    }

    #[inline]
    fn cmp_le_f64(a: __m128i, b: __m128i) -> __m128i {
        unsafe { from_pd(_mm_cmple_pd(pd(a), pd(b))) }
    }

    #[inline]
    fn round_f64(a: __m128i, mode: RoundMode) -> __m128i {
        round_pd(a, mode)
    }

    #[inline]
    fn i32_to_f32(a: __m128i) -> __m128i {
        unsafe { from_ps(_mm_cvtepi32_ps(a)) }
    }

    #[inline]
    fn u32_to_f32(a: __m128i) -> __m128i {
        // both halves convert exactly; the final add rounds once
        unsafe {
            let hi = _mm_cvtepi32_ps(_mm_srli_epi32(a, 16));
            let lo = _mm_cvtepi32_ps(_mm_and_si128(a, _mm_set1_epi32(0xffff)));
            from_ps(_mm_add_ps(_mm_mul_ps(hi, _mm_set1_ps(65536.0)), lo))
        }
    }

    #[inline]
    fn f32_to_i32(a: __m128i, rounding: Rounding) -> __m128i {
        unsafe {
            match rounding {
                Rounding::Nearest => _mm_cvtps_epi32(ps(a)),
                Rounding::TowardZero => _mm_cvttps_epi32(ps(a)),
            }
        }
    }

    #[inline]
    fn f32_to_u32(a: __m128i, rounding: Rounding) -> __m128i {
        unsafe { f32_to_u32_sse2(ps(a), rounding) }
    }

    #[inline]
    fn i64_to_f64(a: __m128i) -> __m128i {
        from_portable(PortableBackend::i64_to_f64(to_portable(a)))
    }

    #[inline]
    fn f64_to_i64(a: __m128i, rounding: Rounding) -> __m128i {
        from_portable(PortableBackend::f64_to_i64(to_portable(a), rounding))
    }

    #[inline]
    fn i32_lo_to_f64(a: __m128i) -> __m128i {
        unsafe { from_pd(_mm_cvtepi32_pd(a)) }
    }

    #[inline]
    fn u32_lo_to_f64(a: __m128i) -> __m128i {
        // bias into signed range, convert exactly, then undo the bias
        unsafe {
            let biased = _mm_xor_si128(a, _mm_set1_epi32(i32::MIN));
            let d = _mm_cvtepi32_pd(biased);
            from_pd(_mm_add_pd(d, _mm_set1_pd(2_147_483_648.0)))
        }
    }

    #[inline]
    fn f32_lo_to_f64(a: __m128i) -> __m128i {
        unsafe { from_pd(_mm_cvtps_pd(ps(a))) }
    }

    #[inline]
    fn f64_pair_to_i32(lo: __m128i, hi: __m128i, rounding: Rounding) -> __m128i {
        unsafe {
            let (lo, hi) = match rounding {
                Rounding::Nearest => (_mm_cvtpd_epi32(pd(lo)), _mm_cvtpd_epi32(pd(hi))),
                Rounding::TowardZero => (_mm_cvttpd_epi32(pd(lo)), _mm_cvttpd_epi32(pd(hi))),
            };
            _mm_unpacklo_epi64(lo, hi)
        }
    }

    #[inline]
    fn f64_pair_to_u32(lo: __m128i, hi: __m128i, rounding: Rounding) -> __m128i {
        from_portable(PortableBackend::f64_pair_to_u32(
            to_portable(lo),
            to_portable(hi),
            rounding,
        ))
    }

    #[inline]
    fn f64_pair_to_f32(lo: __m128i, hi: __m128i) -> __m128i {
        unsafe { from_ps(_mm_movelh_ps(_mm_cvtpd_ps(pd(lo)), _mm_cvtpd_ps(pd(hi)))) }
    }
}
