//! Hardware backends.
//!
//! A backend supplies the fixed set of native 128-bit primitives that the
//! vector engines compose: register load/store, bitwise logic, interleaves,
//! sign masks, truncating packs, float arithmetic/compare/rounding and
//! lane conversions. Wider vectors never reach a backend directly; they are
//! decomposed into 128-bit halves first.
//!
//! # Architecture
//!
//! - `portable`: any target, built on the `wide` crate with per-lane
//!   fallbacks where `wide` has no matching operation.
//! - `x86`: x86_64 SSE2 intrinsics, with SSE4.1 rounding when the crate is
//!   compiled with `target_feature = "sse4.1"`.
//!
//! Exactly one backend is active, chosen at build time: `x86` on x86_64,
//! `portable` elsewhere or when the `portable` cargo feature is enabled. The
//! choice is exposed as [`ActiveBackend`]; [`BackendInfo`] describes it.
//!
//! # Numeric conventions
//!
//! Every backend rounds float-to-integer `convert` to nearest, ties to even,
//! and int-to-float conversions to nearest-even. Results for NaN or
//! out-of-range sources are backend-defined; see each backend's
//! `OUT_OF_RANGE` description.

pub mod portable;
#[cfg(target_arch = "x86_64")]
pub mod x86;

use std::sync::Once;

use serde::Serialize;

use crate::config::Rounding;

/// Rounding for float-to-float rounding primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundMode {
    /// Nearest integer, ties to even.
    Nearest,
    /// Toward negative infinity.
    Floor,
    /// Toward positive infinity.
    Ceil,
    /// Toward zero.
    Trunc,
}

/// Native primitive set of a hardware backend.
///
/// All operations work on one 128-bit register (`Reg`), whatever the lane
/// kind: the lane interpretation is part of the operation name. Masks are
/// registers with every lane all-ones or all-zeros.
pub trait Backend: Copy + Send + Sync + 'static {
    /// Backend name.
    const NAME: &'static str;
    /// Width of one native register in bits.
    const NATIVE_BITS: usize = 128;
    /// Out-of-range float-to-integer behavior, for diagnostics.
    const OUT_OF_RANGE: &'static str;

    /// Native 128-bit register.
    type Reg: Copy + Send + Sync + 'static;

    // ===== Memory =====
    /// All bits zero.
    fn zero() -> Self::Reg;
    /// Register from its little-endian byte image.
    fn from_bytes(bytes: [u8; 16]) -> Self::Reg;
    /// Byte image of a register.
    fn to_bytes(r: Self::Reg) -> [u8; 16];

    // ===== Bitwise =====
    /// Bitwise AND.
    fn and(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Bitwise OR.
    fn or(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Bitwise XOR.
    fn xor(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// `!a & b`.
    fn andnot(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    // ===== Interleave =====
    /// `[a0, b0, a1, b1, ...]` over the low eight 8-bit lanes.
    fn unpacklo_8(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// `[a0, b0, a1, b1, ...]` over the low four 16-bit lanes.
    fn unpacklo_16(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// `[a0, b0, a1, b1]` over the low two 32-bit lanes.
    fn unpacklo_32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// `[a2, b2, a3, b3]` over the high two 32-bit lanes.
    fn unpackhi_32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// `[a0, b0]` over 64-bit lanes.
    fn unpacklo_64(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// `[a1, b1]` over 64-bit lanes.
    fn unpackhi_64(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Copy the upper 64 bits into both halves.
    #[inline]
    fn dup_high_64(a: Self::Reg) -> Self::Reg {
        Self::unpackhi_64(a, a)
    }

    // ===== Sign masks =====
    /// All-ones in every signed 8-bit lane that is negative.
    fn sign_mask_8(a: Self::Reg) -> Self::Reg;
    /// All-ones in every signed 16-bit lane that is negative.
    fn sign_mask_16(a: Self::Reg) -> Self::Reg;
    /// All-ones in every signed 32-bit lane that is negative.
    fn sign_mask_32(a: Self::Reg) -> Self::Reg;

    // ===== Truncating packs =====
    /// Low byte of every 16-bit lane of `a`, then of `b`.
    fn pack_low_16(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Low 16 bits of every 32-bit lane of `a`, then of `b`.
    fn pack_low_32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Low 32 bits of every 64-bit lane of `a`, then of `b`.
    fn pack_low_64(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    // ===== f32 arithmetic =====
    /// Lane-wise addition.
    fn add_f32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise subtraction.
    fn sub_f32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise multiplication.
    fn mul_f32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise division.
    fn div_f32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise minimum.
    fn min_f32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise maximum.
    fn max_f32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise square root.
    fn sqrt_f32(a: Self::Reg) -> Self::Reg;
    /// Equal, false when either operand is NaN.
    fn cmp_eq_f32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Not-equal, true when either operand is NaN.
    fn cmp_neq_f32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Less than.
    fn cmp_lt_f32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Less than or equal.
    fn cmp_le_f32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Round every lane to an integral value.
    fn round_f32(a: Self::Reg, mode: RoundMode) -> Self::Reg;

    // ===== f64 arithmetic =====
    /// Lane-wise addition.
    fn add_f64(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise subtraction.
    fn sub_f64(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise multiplication.
    fn mul_f64(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise division.
    fn div_f64(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise minimum.
    fn min_f64(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise maximum.
    fn max_f64(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise square root.
    fn sqrt_f64(a: Self::Reg) -> Self::Reg;
    /// Equal, false when either operand is NaN.
    fn cmp_eq_f64(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Not-equal, true when either operand is NaN.
    fn cmp_neq_f64(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Less than.
    fn cmp_lt_f64(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Less than or equal.
    fn cmp_le_f64(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Round every lane to an integral value.
    fn round_f64(a: Self::Reg, mode: RoundMode) -> Self::Reg;

    // ===== Same-width conversions =====
    /// i32 lanes to f32, nearest-even.
    fn i32_to_f32(a: Self::Reg) -> Self::Reg;
    /// u32 lanes to f32, nearest-even.
    fn u32_to_f32(a: Self::Reg) -> Self::Reg;
    /// f32 lanes to i32 under `rounding`.
    fn f32_to_i32(a: Self::Reg, rounding: Rounding) -> Self::Reg;
    /// f32 lanes to u32 under `rounding`.
    fn f32_to_u32(a: Self::Reg, rounding: Rounding) -> Self::Reg;
    /// i64 lanes to f64, nearest-even.
    fn i64_to_f64(a: Self::Reg) -> Self::Reg;
    /// f64 lanes to i64 under `rounding`.
    fn f64_to_i64(a: Self::Reg, rounding: Rounding) -> Self::Reg;

    // ===== Lane-count-mixing conversions =====
    /// Low two i32 lanes to two f64 lanes.
    fn i32_lo_to_f64(a: Self::Reg) -> Self::Reg;
    /// Low two u32 lanes to two f64 lanes.
    fn u32_lo_to_f64(a: Self::Reg) -> Self::Reg;
    /// Low two f32 lanes to two f64 lanes.
    fn f32_lo_to_f64(a: Self::Reg) -> Self::Reg;
    /// Four f64 lanes (`lo`, then `hi`) to four packed i32 lanes.
    fn f64_pair_to_i32(lo: Self::Reg, hi: Self::Reg, rounding: Rounding) -> Self::Reg;
    /// Four f64 lanes (`lo`, then `hi`) to four packed u32 lanes.
    fn f64_pair_to_u32(lo: Self::Reg, hi: Self::Reg, rounding: Rounding) -> Self::Reg;
    /// Four f64 lanes (`lo`, then `hi`) to four packed f32 lanes.
    fn f64_pair_to_f32(lo: Self::Reg, hi: Self::Reg) -> Self::Reg;
}

/// Backend selected at build time.
#[cfg(all(target_arch = "x86_64", not(feature = "portable")))]
pub type ActiveBackend = x86::X86Backend;

/// Backend selected at build time.
#[cfg(any(not(target_arch = "x86_64"), feature = "portable"))]
pub type ActiveBackend = portable::PortableBackend;

/// Native register of the active backend.
pub type Reg = <ActiveBackend as Backend>::Reg;

/// Enumeration of CPU SIMD support levels detected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SimdSupportLevel {
    /// No known SIMD extension.
    Scalar,
    /// SSE2 (x86_64 baseline).
    Sse2,
    /// SSE4.1.
    Sse41,
    /// AVX2.
    Avx2,
    /// AVX-512F.
    Avx512,
    /// NEON (aarch64 baseline).
    Neon,
}

/// Detect the highest supported SIMD level at runtime.
///
/// This does not change the active backend, which is fixed at build time; it
/// tells whether a build with more target features would run on this CPU.
pub fn simd_support_level() -> SimdSupportLevel {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx512f") {
            SimdSupportLevel::Avx512
        } else if is_x86_feature_detected!("avx2") {
            SimdSupportLevel::Avx2
        } else if is_x86_feature_detected!("sse4.1") {
            SimdSupportLevel::Sse41
        } else {
            SimdSupportLevel::Sse2
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        SimdSupportLevel::Neon
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        SimdSupportLevel::Scalar
    }
}

/// Description of a backend's conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendInfo {
    /// Backend name.
    pub name: &'static str,
    /// Native register width in bits.
    pub native_bits: usize,
    /// Rounding used by float-to-integer `convert`.
    pub rounding: &'static str,
    /// Behavior of float-to-integer conversion for NaN and out-of-range lanes.
    pub out_of_range: &'static str,
    /// SIMD level of the running CPU.
    pub cpu_level: SimdSupportLevel,
}

impl BackendInfo {
    /// Describe backend `B`.
    pub fn of<B: Backend>() -> Self {
        Self {
            name: B::NAME,
            native_bits: B::NATIVE_BITS,
            rounding: "nearest, ties to even",
            out_of_range: B::OUT_OF_RANGE,
            cpu_level: simd_support_level(),
        }
    }

    /// Describe the backend selected at build time.
    ///
    /// The first call logs the selection at debug level.
    pub fn active() -> Self {
        static LOGGED: Once = Once::new();

        let info = Self::of::<ActiveBackend>();
        LOGGED.call_once(|| {
            log::debug!(
                "lanewise backend: {} ({}-bit native, cpu level {:?})",
                info.name,
                info.native_bits,
                info.cpu_level
            );
        });
        info
    }
}

#[cfg(test)]
mod tests;
