//! Bit-level reinterpretation between vectors of equal total width.
//!
//! Every vector converts losslessly into the raw container of its width
//! ([`Bits64`], [`Bits128`], [`Bits256`], [`Bits512`]) and back. Hardware
//! vectors hand over their register unchanged; composite vectors hand over
//! their halves, so a reinterpretation of a 512-bit value recurses down to
//! four register relabels and never touches lane values.
//!
//! The size check is the `Width` equality in the signature of
//! [`reinterpret`]: a mismatched pair does not compile.
//!
//! ```compile_fail
//! use lanewise::{f32x4, f32x8, reinterpret, SimdVector};
//!
//! // 128 bits into 256 bits
//! let wide: f32x8 = reinterpret(f32x4::splat(1.0));
//! ```

use crate::backend::{ActiveBackend, Backend, Reg};
use crate::vector::SimdVector;

/// Width-tagged raw bit container.
pub trait RawBits: Copy + Send + Sync + 'static {
    /// Byte image of the container.
    type Bytes;

    /// Little-endian byte image.
    fn to_bytes(self) -> Self::Bytes;

    /// Container holding exactly `bytes`.
    fn from_bytes(bytes: Self::Bytes) -> Self;
}

/// Raw bits of a 64-bit vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bits64(pub(crate) [u8; 8]);

/// Raw bits of a 128-bit vector: one native register.
#[derive(Clone, Copy)]
pub struct Bits128(pub(crate) Reg);

/// Raw bits of a 256-bit vector.
#[derive(Clone, Copy)]
pub struct Bits256 {
    pub(crate) lo: Bits128,
    pub(crate) hi: Bits128,
}

/// Raw bits of a 512-bit vector.
#[derive(Clone, Copy)]
pub struct Bits512 {
    pub(crate) lo: Bits256,
    pub(crate) hi: Bits256,
}

impl RawBits for Bits64 {
    type Bytes = [u8; 8];

    #[inline]
    fn to_bytes(self) -> [u8; 8] {
        self.0
    }

    #[inline]
    fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }
}

impl RawBits for Bits128 {
    type Bytes = [u8; 16];

    #[inline]
    fn to_bytes(self) -> [u8; 16] {
        ActiveBackend::to_bytes(self.0)
    }

    #[inline]
    fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(ActiveBackend::from_bytes(bytes))
    }
}

impl RawBits for Bits256 {
    type Bytes = [u8; 32];

    #[inline]
    fn to_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[..16].copy_from_slice(&self.lo.to_bytes());
        out[16..].copy_from_slice(&self.hi.to_bytes());
        out
    }

    #[inline]
    fn from_bytes(bytes: [u8; 32]) -> Self {
        let (lo, hi) = split_bytes::<16, 32>(bytes);
        Self {
            lo: Bits128::from_bytes(lo),
            hi: Bits128::from_bytes(hi),
        }
    }
}

impl RawBits for Bits512 {
    type Bytes = [u8; 64];

    #[inline]
    fn to_bytes(self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.lo.to_bytes());
        out[32..].copy_from_slice(&self.hi.to_bytes());
        out
    }

    #[inline]
    fn from_bytes(bytes: [u8; 64]) -> Self {
        let (lo, hi) = split_bytes::<32, 64>(bytes);
        Self {
            lo: Bits256::from_bytes(lo),
            hi: Bits256::from_bytes(hi),
        }
    }
}

#[inline]
fn split_bytes<const HALF: usize, const FULL: usize>(bytes: [u8; FULL]) -> ([u8; HALF], [u8; HALF]) {
    debug_assert_eq!(HALF * 2, FULL);
    let lo = std::array::from_fn(|i| bytes[i]);
    let hi = std::array::from_fn(|i| bytes[HALF + i]);
    (lo, hi)
}

/// Reinterpret the bits of `source` as a vector of type `D`.
///
/// `D` must have the same total width as the source. No lane value is
/// converted: the byte image of the result equals the byte image of the
/// source.
///
/// ```
/// use lanewise::{reinterpret, u32x4, u8x16, SimdVector};
///
/// let v = u32x4::from_array([0x0403_0201, 0, 0, 0x8000_0000]);
/// let bytes: u8x16 = reinterpret(v);
/// assert_eq!(bytes.to_array()[..4], [1, 2, 3, 4]);
/// assert_eq!(bytes.to_array()[15], 0x80);
/// ```
#[inline]
pub fn reinterpret<D, S>(source: S) -> D
where
    S: SimdVector,
    D: SimdVector<Width = S::Width>,
{
    D::from_bits(source.into_bits())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::*;

    #[test]
    fn test_reinterpret_preserves_bytes_128() {
        let v = f32x4::from_array([1.0, -2.5, f32::NAN, f32::INFINITY]);
        let bits: u32x4 = reinterpret(v);
        assert_eq!(
            bits.to_array(),
            [1.0f32.to_bits(), (-2.5f32).to_bits(), f32::NAN.to_bits(), f32::INFINITY.to_bits()]
        );
        assert_eq!(v.to_bytes(), bits.to_bytes());
    }

    #[test]
    fn test_reinterpret_composite_recurses() {
        let v = u16x16::from_array(std::array::from_fn(|i| (i as u16) << 8 | i as u16));
        let bytes: u8x32 = reinterpret(v);
        for i in 0..16 {
            assert_eq!(bytes.lane(2 * i), i as u8);
            assert_eq!(bytes.lane(2 * i + 1), i as u8);
        }
        let back: u16x16 = reinterpret(bytes);
        assert_eq!(back, v);
    }

    #[test]
    fn test_reinterpret_512_round_trip() {
        let v = i64x8::from_array([-1, 2, i64::MIN, 4, 5, i64::MAX, 7, 0]);
        let as_f64: f64x8 = reinterpret(v);
        let as_u8: u8x64 = reinterpret(as_f64);
        let back: i64x8 = reinterpret(as_u8);
        assert_eq!(back, v);
        assert_eq!(as_u8.to_bytes(), v.to_bytes());
    }

    #[test]
    fn test_reinterpret_f16x4() {
        let v = f16x4::from_array([
            half::f16::from_f32(1.0),
            half::f16::from_f32(-0.5),
            half::f16::ZERO,
            half::f16::INFINITY,
        ]);
        let bits = v.into_bits().to_bytes();
        assert_eq!(&bits[..2], &0x3c00u16.to_le_bytes());
        assert_eq!(f16x4::from_bits(Bits64::from_bytes(bits)), v);
    }

    #[test]
    fn test_bits_byte_layout() {
        let bytes: [u8; 64] = std::array::from_fn(|i| i as u8);
        let bits = Bits512::from_bytes(bytes);
        assert_eq!(bits.lo.lo.to_bytes()[0], 0);
        assert_eq!(bits.hi.lo.to_bytes()[0], 32);
        assert_eq!(bits.hi.hi.to_bytes()[15], 63);
        assert_eq!(bits.to_bytes(), bytes);
    }
}
