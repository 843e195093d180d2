//! Tests for backend primitives.

use super::portable::PortableBackend;
use super::*;
use crate::config::Rounding;

fn reg<B: Backend, T: bytemuck::Pod, const N: usize>(lanes: [T; N]) -> B::Reg {
    B::from_bytes(bytemuck::cast(lanes))
}

fn read<B: Backend, T: bytemuck::Pod, const N: usize>(r: B::Reg) -> [T; N] {
    bytemuck::cast(B::to_bytes(r))
}

// ========================================================================
// Portable backend
// ========================================================================

type P = PortableBackend;

#[test]
fn test_portable_bytes_round_trip() {
    let bytes: [u8; 16] = std::array::from_fn(|i| i as u8 * 3);
    assert_eq!(P::to_bytes(P::from_bytes(bytes)), bytes);
    assert_eq!(P::to_bytes(P::zero()), [0u8; 16]);
}

#[test]
fn test_portable_andnot() {
    let a = reg::<P, u32, 4>([0xffff_0000, 0, u32::MAX, 0x0f0f_0f0f]);
    let b = reg::<P, u32, 4>([u32::MAX; 4]);
    let r: [u32; 4] = read::<P, u32, 4>(P::andnot(a, b));
    assert_eq!(r, [0x0000_ffff, u32::MAX, 0, 0xf0f0_f0f0]);
}

#[test]
fn test_portable_unpack() {
    let a = reg::<P, u32, 4>([1, 2, 3, 4]);
    let b = reg::<P, u32, 4>([5, 6, 7, 8]);
    assert_eq!(read::<P, u32, 4>(P::unpacklo_32(a, b)), [1, 5, 2, 6]);
    assert_eq!(read::<P, u32, 4>(P::unpackhi_32(a, b)), [3, 7, 4, 8]);

    let a = reg::<P, u64, 2>([1, 2]);
    let b = reg::<P, u64, 2>([3, 4]);
    assert_eq!(read::<P, u64, 2>(P::unpacklo_64(a, b)), [1, 3]);
    assert_eq!(read::<P, u64, 2>(P::unpackhi_64(a, b)), [2, 4]);
    assert_eq!(read::<P, u64, 2>(P::dup_high_64(a)), [2, 2]);
}

#[test]
fn test_portable_sign_mask() {
    let a = reg::<P, i16, 8>([0, -1, 5, i16::MIN, i16::MAX, -300, 1, -2]);
    assert_eq!(read::<P, i16, 8>(P::sign_mask_16(a)), [0, -1, 0, -1, 0, -1, 0, -1]);
}

#[test]
fn test_portable_pack_low() {
    let a = reg::<P, u16, 8>([0x1234, 0x00ff, 0xff00, 1, 2, 3, 4, 0xabcd]);
    let b = reg::<P, u16, 8>([0x0100; 8]);
    let r = read::<P, u8, 16>(P::pack_low_16(a, b));
    assert_eq!(&r[..8], &[0x34, 0xff, 0x00, 1, 2, 3, 4, 0xcd]);
    assert_eq!(&r[8..], &[0; 8]);

    let a = reg::<P, u64, 2>([0x1_0000_0002, u64::MAX]);
    let b = reg::<P, u64, 2>([7, 0x8000_0000]);
    assert_eq!(read::<P, u32, 4>(P::pack_low_64(a, b)), [2, u32::MAX, 7, 0x8000_0000]);
}

#[test]
fn test_portable_round_modes() {
    let a = reg::<P, f32, 4>([2.5, -2.5, 1.5, -0.4]);
    assert_eq!(read::<P, f32, 4>(P::round_f32(a, RoundMode::Nearest)), [2.0, -2.0, 2.0, -0.0]);
    assert_eq!(read::<P, f32, 4>(P::round_f32(a, RoundMode::Floor)), [2.0, -3.0, 1.0, -1.0]);
    assert_eq!(read::<P, f32, 4>(P::round_f32(a, RoundMode::Ceil)), [3.0, -2.0, 2.0, -0.0]);
    assert_eq!(read::<P, f32, 4>(P::round_f32(a, RoundMode::Trunc)), [2.0, -2.0, 1.0, -0.0]);
}

#[test]
fn test_portable_float_to_int_saturates() {
    let a = reg::<P, f32, 4>([f32::NAN, 1e20, -1e20, -3.7]);
    assert_eq!(
        read::<P, i32, 4>(P::f32_to_i32(a, Rounding::Nearest)),
        [0, i32::MAX, i32::MIN, -4]
    );
    assert_eq!(
        read::<P, u32, 4>(P::f32_to_u32(a, Rounding::TowardZero)),
        [0, u32::MAX, 0, 0]
    );
}

#[test]
fn test_portable_f64_pair_conversions() {
    let lo = reg::<P, f64, 2>([0.5, 1.5]);
    let hi = reg::<P, f64, 2>([-2.5, 3.25]);
    assert_eq!(
        read::<P, i32, 4>(P::f64_pair_to_i32(lo, hi, Rounding::Nearest)),
        [0, 2, -2, 3]
    );
    assert_eq!(
        read::<P, i32, 4>(P::f64_pair_to_i32(lo, hi, Rounding::TowardZero)),
        [0, 1, -2, 3]
    );
    assert_eq!(read::<P, f32, 4>(P::f64_pair_to_f32(lo, hi)), [0.5, 1.5, -2.5, 3.25]);
}

#[test]
fn test_backend_info() {
    let info = BackendInfo::of::<PortableBackend>();
    assert_eq!(info.name, "portable");
    assert_eq!(info.native_bits, 128);
    assert_eq!(info.rounding, "nearest, ties to even");

    let active = BackendInfo::active();
    assert_eq!(active.name, <ActiveBackend as Backend>::NAME);
    let json = serde_json::to_string(&active).unwrap();
    assert!(json.contains("\"native_bits\":128"));

    // later calls skip the log but describe the same backend
    assert_eq!(BackendInfo::active(), active);
}

#[test]
fn test_simd_support_level() {
    let level = simd_support_level();
    #[cfg(target_arch = "x86_64")]
    assert!(level >= SimdSupportLevel::Sse2);
    #[cfg(target_arch = "aarch64")]
    assert_eq!(level, SimdSupportLevel::Neon);
    let _ = level;
}

// ========================================================================
// x86 backend parity with the portable backend
// ========================================================================

#[cfg(target_arch = "x86_64")]
mod parity {
    use super::super::x86::X86Backend;
    use super::*;

    type X = X86Backend;

    /// Run a binary primitive on both backends and compare the byte images.
    fn same2(
        a: [u8; 16],
        b: [u8; 16],
        p: fn(<P as Backend>::Reg, <P as Backend>::Reg) -> <P as Backend>::Reg,
        x: fn(<X as Backend>::Reg, <X as Backend>::Reg) -> <X as Backend>::Reg,
    ) {
        let expected = P::to_bytes(p(P::from_bytes(a), P::from_bytes(b)));
        let actual = X::to_bytes(x(X::from_bytes(a), X::from_bytes(b)));
        assert_eq!(actual, expected, "inputs {:?} {:?}", a, b);
    }

    fn same1(
        a: [u8; 16],
        p: fn(<P as Backend>::Reg) -> <P as Backend>::Reg,
        x: fn(<X as Backend>::Reg) -> <X as Backend>::Reg,
    ) {
        let expected = P::to_bytes(p(P::from_bytes(a)));
        let actual = X::to_bytes(x(X::from_bytes(a)));
        assert_eq!(actual, expected, "input {:?}", a);
    }

    fn pattern(seed: u8) -> [u8; 16] {
        std::array::from_fn(|i| (i as u8).wrapping_mul(37).wrapping_add(seed))
    }

    #[test]
    fn test_bitwise_and_shuffles_match() {
        for seed in [0u8, 1, 77, 128, 255] {
            let a = pattern(seed);
            let b = pattern(seed.wrapping_add(91));
            same2(a, b, P::and, X::and);
            same2(a, b, P::or, X::or);
            same2(a, b, P::xor, X::xor);
            same2(a, b, P::andnot, X::andnot);
            same2(a, b, P::unpacklo_8, X::unpacklo_8);
            same2(a, b, P::unpacklo_16, X::unpacklo_16);
            same2(a, b, P::unpacklo_32, X::unpacklo_32);
            same2(a, b, P::unpackhi_32, X::unpackhi_32);
            same2(a, b, P::unpacklo_64, X::unpacklo_64);
            same2(a, b, P::unpackhi_64, X::unpackhi_64);
            same2(a, b, P::pack_low_16, X::pack_low_16);
            same2(a, b, P::pack_low_32, X::pack_low_32);
            same2(a, b, P::pack_low_64, X::pack_low_64);
            same1(a, P::sign_mask_8, X::sign_mask_8);
            same1(a, P::sign_mask_16, X::sign_mask_16);
            same1(a, P::sign_mask_32, X::sign_mask_32);
            same1(a, P::dup_high_64, X::dup_high_64);
        }
    }

    #[test]
    fn test_float_arithmetic_matches() {
        let a: [u8; 16] = bytemuck::cast([1.5f32, -2.25, 1e10, 0.0]);
        let b: [u8; 16] = bytemuck::cast([0.5f32, 4.0, 3.0, 7.0]);
        same2(a, b, P::add_f32, X::add_f32);
        same2(a, b, P::sub_f32, X::sub_f32);
        same2(a, b, P::mul_f32, X::mul_f32);
        same2(a, b, P::div_f32, X::div_f32);
        same2(a, b, P::min_f32, X::min_f32);
        same2(a, b, P::max_f32, X::max_f32);
        same2(a, b, P::cmp_eq_f32, X::cmp_eq_f32);
        same2(a, b, P::cmp_neq_f32, X::cmp_neq_f32);
        same2(a, b, P::cmp_lt_f32, X::cmp_lt_f32);
        same2(a, b, P::cmp_le_f32, X::cmp_le_f32);
        same1(b, P::sqrt_f32, X::sqrt_f32);

        let a: [u8; 16] = bytemuck::cast([1.5f64, -2.25]);
        let b: [u8; 16] = bytemuck::cast([-1.5f64, 9.0]);
        same2(a, b, P::add_f64, X::add_f64);
        same2(a, b, P::sub_f64, X::sub_f64);
        same2(a, b, P::mul_f64, X::mul_f64);
        same2(a, b, P::div_f64, X::div_f64);
        same2(a, b, P::min_f64, X::min_f64);
        same2(a, b, P::max_f64, X::max_f64);
        same2(a, b, P::cmp_eq_f64, X::cmp_eq_f64);
        same2(a, b, P::cmp_lt_f64, X::cmp_lt_f64);
        same2(a, b, P::cmp_le_f64, X::cmp_le_f64);
        same1(b, P::sqrt_f64, X::sqrt_f64);
    }

    #[test]
    fn test_rounding_matches() {
        let a: [u8; 16] = bytemuck::cast([2.5f32, -2.5, 0.49999997, -7.75]);
        for mode in [RoundMode::Nearest, RoundMode::Floor, RoundMode::Ceil, RoundMode::Trunc] {
            assert_eq!(
                X::to_bytes(X::round_f32(X::from_bytes(a), mode)),
                P::to_bytes(P::round_f32(P::from_bytes(a), mode)),
                "{:?}",
                mode
            );
        }
        let a: [u8; 16] = bytemuck::cast([-0.5f64, 3.5]);
        for mode in [RoundMode::Nearest, RoundMode::Floor, RoundMode::Ceil, RoundMode::Trunc] {
            assert_eq!(
                X::to_bytes(X::round_f64(X::from_bytes(a), mode)),
                P::to_bytes(P::round_f64(P::from_bytes(a), mode)),
                "{:?}",
                mode
            );
        }
    }

    #[test]
    fn test_in_range_conversions_match() {
        let ints: [u8; 16] = bytemuck::cast([0i32, -1, 16_777_217, i32::MIN]);
        same1(ints, P::i32_to_f32, X::i32_to_f32);
        same1(ints, P::i32_lo_to_f64, X::i32_lo_to_f64);

        let uints: [u8; 16] = bytemuck::cast([0u32, u32::MAX, 16_777_217, 0x8000_0001]);
        same1(uints, P::u32_to_f32, X::u32_to_f32);
        same1(uints, P::u32_lo_to_f64, X::u32_lo_to_f64);

        let floats: [u8; 16] = bytemuck::cast([2.5f32, 3.5, 1e9, 3e9]);
        same1(floats, P::f32_lo_to_f64, X::f32_lo_to_f64);
        for rounding in [Rounding::Nearest, Rounding::TowardZero] {
            assert_eq!(
                X::to_bytes(X::f32_to_u32(X::from_bytes(floats), rounding)),
                P::to_bytes(P::f32_to_u32(P::from_bytes(floats), rounding))
            );
        }

        let signed: [u8; 16] = bytemuck::cast([2.5f32, -3.5, 1e9, -0.5]);
        for rounding in [Rounding::Nearest, Rounding::TowardZero] {
            assert_eq!(
                X::to_bytes(X::f32_to_i32(X::from_bytes(signed), rounding)),
                P::to_bytes(P::f32_to_i32(P::from_bytes(signed), rounding))
            );
        }

        let lo: [u8; 16] = bytemuck::cast([0.5f64, -1.5]);
        let hi: [u8; 16] = bytemuck::cast([2_000_000_000.25f64, -2_000_000_000.75]);
        for rounding in [Rounding::Nearest, Rounding::TowardZero] {
            assert_eq!(
                X::to_bytes(X::f64_pair_to_i32(X::from_bytes(lo), X::from_bytes(hi), rounding)),
                P::to_bytes(P::f64_pair_to_i32(P::from_bytes(lo), P::from_bytes(hi), rounding))
            );
        }
        assert_eq!(
            X::to_bytes(X::f64_pair_to_f32(X::from_bytes(lo), X::from_bytes(hi))),
            P::to_bytes(P::f64_pair_to_f32(P::from_bytes(lo), P::from_bytes(hi)))
        );
    }

    #[test]
    fn test_x86_out_of_range_is_indefinite() {
        let a: [u8; 16] = bytemuck::cast([f32::NAN, 1e20, -1e20, 1.0]);
        let r: [i32; 4] = bytemuck::cast(X::to_bytes(X::f32_to_i32(
            X::from_bytes(a),
            Rounding::Nearest,
        )));
        assert_eq!(r, [i32::MIN, i32::MIN, i32::MIN, 1]);
    }
}
