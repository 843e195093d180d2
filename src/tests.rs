//! Cross-module properties of the vector layer.

use rand::prelude::*;

use crate::prelude::*;

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed_1a4e)
}

// ========================================================================
// Reinterpretation
// ========================================================================

#[test]
fn test_reinterpret_preserves_bytes_across_kinds() {
    let mut rng = rng();
    for _ in 0..64 {
        let bytes: [u8; 16] = rng.gen();
        let v = u8x16::from_bytes(bytes);

        assert_eq!(reinterpret::<i16x8, _>(v).to_bytes(), bytes);
        assert_eq!(reinterpret::<u32x4, _>(v).to_bytes(), bytes);
        assert_eq!(reinterpret::<i64x2, _>(v).to_bytes(), bytes);

        // float lanes keep NaN payloads untouched
        let floats: f32x4 = reinterpret(v);
        assert_eq!(floats.to_bytes(), bytes);
        assert_eq!(reinterpret::<u8x16, _>(floats), v);
        let doubles: f64x2 = reinterpret(floats);
        assert_eq!(reinterpret::<u8x16, _>(doubles), v);
    }
}

#[test]
fn test_reinterpret_composites() {
    let mut rng = rng();
    let lanes: [u64; 8] = std::array::from_fn(|_| rng.gen());
    let v = u64x8::from_array(lanes);

    let bytes: u8x64 = reinterpret(v);
    assert_eq!(bytes.to_bytes(), v.to_bytes());
    assert_eq!(reinterpret::<u64x8, _>(bytes), v);

    // halves stay halves
    let floats: f32x16 = reinterpret(v);
    assert_eq!(floats.lo.to_bytes(), v.lo.to_bytes());
    assert_eq!(floats.hi.hi.to_bytes(), v.hi.hi.to_bytes());
}

#[test]
fn test_reinterpret_f16() {
    let v = u16x8::from_array([0x3c00, 0xc000, 0x7c00, 0, 1, 2, 3, 4]);
    let lo = f16x4::from_bytes(std::array::from_fn(|i| v.to_bytes()[i]));
    assert_eq!(lo.to_array()[0].to_f32(), 1.0);
    assert_eq!(lo.to_array()[1].to_f32(), -2.0);
    assert!(lo.to_array()[2].is_infinite());
    let back: f16x4 = reinterpret(lo);
    assert_eq!(back, lo);
}

// ========================================================================
// Composite consistency
// ========================================================================

#[test]
fn test_composite_halves_match_lane_order() {
    let mut rng = rng();
    let lanes: [i16; 32] = std::array::from_fn(|_| rng.gen());
    let v = i16x32::from_array(lanes);

    assert_eq!(get_low(v).to_array().as_slice(), &lanes[..16]);
    assert_eq!(get_high(v).to_array().as_slice(), &lanes[16..]);
    assert_eq!(get_low(get_high(v)).to_array().as_slice(), &lanes[16..24]);
    assert_eq!(combine(get_low(v), get_high(v)), v);

    let patched = set_high(v, i16x16::splat(-1));
    assert_eq!(&patched.to_array()[..16], &lanes[..16]);
    assert_eq!(&patched.to_array()[16..], &[-1; 16]);
    assert_eq!(set_low(patched, get_low(v)).lo, v.lo);
}

#[test]
fn test_composite_byte_image_is_concatenation() {
    let v = f64x4::from_array([1.0, -2.0, 0.5, f64::MAX]);
    let bytes = v.to_bytes();
    assert_eq!(&bytes[..16], &v.lo.to_bytes());
    assert_eq!(&bytes[16..], &v.hi.to_bytes());
}

// ========================================================================
// Extend and narrow
// ========================================================================

#[test]
fn test_extend_narrow_chain_round_trips() {
    let mut rng = rng();
    for _ in 0..32 {
        let lanes: [i8; 16] = rng.gen();
        let v = i8x16::from_array(lanes);

        let words: i16x16 = extend(v);
        let dwords: i32x16 = extend(words);
        let qwords: i64x8 = extend(dwords.lo);
        for i in 0..8 {
            assert_eq!(qwords.lane(i), lanes[i] as i64);
        }

        let back_words = narrow(dwords.lo, dwords.hi);
        assert_eq!(back_words, words);
        assert_eq!(narrow(back_words.lo, back_words.hi), v);
    }
}

#[test]
fn test_narrow_keeps_low_bits_only() {
    let mut rng = rng();
    let a: [u32; 4] = rng.gen();
    let b: [u32; 4] = rng.gen();
    let packed = narrow(u32x4::from_array(a), u32x4::from_array(b)).to_array();
    for i in 0..4 {
        assert_eq!(packed[i], a[i] as u16);
        assert_eq!(packed[4 + i], b[i] as u16);
    }
}

// ========================================================================
// Conversion
// ========================================================================

#[test]
fn test_int_float_int_round_trip() {
    let mut rng = rng();
    for _ in 0..256 {
        // f32 holds every integer up to 2^24 exactly
        let small: [i32; 4] = std::array::from_fn(|_| rng.gen_range(-(1 << 24)..=(1 << 24)));
        let floats: f32x4 = convert(i32x4::from_array(small));
        assert_eq!(convert::<i32x4, _>(floats).to_array(), small);
        assert_eq!(truncate::<i32x4, _>(floats).to_array(), small);

        // f64 holds every i32 and u32
        let any: [i32; 4] = rng.gen();
        let doubles: f64x4 = convert(i32x4::from_array(any));
        assert_eq!(convert::<i32x4, _>(doubles).to_array(), any);

        let unsigned: [u32; 4] = rng.gen();
        let doubles: f64x4 = convert(u32x4::from_array(unsigned));
        assert_eq!(convert::<u32x4, _>(doubles).to_array(), unsigned);

        let wide: [i64; 2] = std::array::from_fn(|_| rng.gen_range(-(1i64 << 53)..=(1i64 << 53)));
        let doubles: f64x2 = convert(i64x2::from_array(wide));
        assert_eq!(convert::<i64x2, _>(doubles).to_array(), wide);
    }
}

#[test]
fn test_truncate_versus_convert() {
    let v = f32x4::from_array([2.7, -2.7, 2.5, -2.5]);
    assert_eq!(convert::<i32x4, _>(v).to_array(), [3, -3, 2, -2]);
    assert_eq!(truncate::<i32x4, _>(v).to_array(), [2, -2, 2, -2]);

    let v = f64x2::from_array([2.7, -2.7]);
    assert_eq!(convert::<i64x2, _>(v).to_array(), [3, -3]);
    assert_eq!(truncate::<i64x2, _>(v).to_array(), [2, -2]);
}

#[test]
fn test_composite_conversion_is_per_half() {
    let mut rng = rng();
    let lanes: [f32; 16] = std::array::from_fn(|_| rng.gen_range(-1.0e6f32..1.0e6));
    let v = f32x16::from_array(lanes);

    let whole: i32x16 = convert(v);
    let lo: i32x8 = convert(v.lo);
    let hi: i32x8 = convert(v.hi);
    assert_eq!(whole, combine(lo, hi));

    let whole: i32x16 = truncate(v);
    assert_eq!(whole.lo.hi, truncate::<i32x4, _>(v.lo.hi));

    let doubles = f64x8::from_array(std::array::from_fn(|i| lanes[i] as f64));
    let narrowed: f32x8 = convert(doubles);
    let expected: [f32; 8] = std::array::from_fn(|i| lanes[i]);
    assert_eq!(narrowed.to_array(), expected);
}

#[test]
fn test_convert_matches_scalar_rounding() {
    let mut rng = rng();
    for _ in 0..256 {
        let lanes: [f32; 4] = std::array::from_fn(|_| rng.gen_range(-1.0e5f32..1.0e5) / 4.0);
        let rounded = convert::<i32x4, _>(f32x4::from_array(lanes)).to_array();
        let truncated = truncate::<i32x4, _>(f32x4::from_array(lanes)).to_array();
        for i in 0..4 {
            assert_eq!(rounded[i], lanes[i].round_ties_even() as i32);
            assert_eq!(truncated[i], lanes[i].trunc() as i32);
        }
    }
}

// ========================================================================
// Typed and runtime layers agree
// ========================================================================

#[test]
fn test_dynamic_matches_typed() {
    let mut rng = rng();
    let lanes: [f64; 8] = std::array::from_fn(|_| rng.gen_range(-1.0e4..1.0e4));
    let v = f64x8::from_array(lanes);
    let any = AnyVector::from(v);

    let typed: i32x8 = convert(v);
    let runtime = any
        .convert("i32x8".parse().unwrap(), &ConvertConfig::new())
        .unwrap();
    assert_eq!(i32x8::try_from(runtime).unwrap(), typed);

    let typed: i64x8 = truncate(v);
    let runtime = any
        .convert("i64x8".parse().unwrap(), &ConvertConfig::truncating())
        .unwrap();
    assert_eq!(i64x8::try_from(runtime).unwrap(), typed);

    let typed: u8x64 = reinterpret(v);
    let runtime = any.reinterpret("u8x64".parse().unwrap()).unwrap();
    assert_eq!(u8x64::try_from(runtime).unwrap(), typed);
}

#[test]
fn test_dynamic_rejects_what_typed_rejects() {
    let config = ConvertConfig::new();
    for from in Shape::all() {
        let v = AnyVector::zero(from);
        for to in Shape::all() {
            let reinterpreted = v.reinterpret(to);
            assert_eq!(reinterpreted.is_ok(), from.bits() == to.bits());

            // integer to integer and float to float with the same kind never convert
            if from.kind() == to.kind() {
                let err = v.convert(to, &config).unwrap_err();
                assert_eq!(err.code(), ErrorCode::UnsupportedConversion);
            }
            // lane counts are always preserved
            if from.lanes() != to.lanes() {
                assert!(v.convert(to, &config).is_err());
            }
        }
    }
}
