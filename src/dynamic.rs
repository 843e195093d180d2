//! Runtime-shaped vectors.
//!
//! [`AnyVector`] holds a value of any canonical vector type together with
//! its shape, for code that only learns shapes at runtime (pipeline
//! descriptions, serialized configs). Reinterpretation and conversion go
//! through explicit tables that mirror the typed trait impls one for one;
//! anything outside the tables is an error returned before any bits are
//! touched.

use std::fmt;

use crate::config::{ConvertConfig, Rounding};
use crate::convert::{convert, truncate};
use crate::error::{Result, SimdError};
use crate::types::{Shape, Width};
use crate::vector::*;

macro_rules! any_vector {
    ($($variant:ident($ty:ident)),* $(,)?) => {
        /// A vector of any canonical shape.
        #[derive(Clone, Copy, PartialEq)]
        pub enum AnyVector {
            $(
                #[allow(missing_docs)]
                $variant($ty),
            )*
        }

        impl AnyVector {
            /// Shape of the held vector.
            pub fn shape(&self) -> Shape {
                match self {
                    $(AnyVector::$variant(_) => $ty::shape(),)*
                }
            }

            /// Little-endian byte image of the held vector.
            pub fn to_bytes(&self) -> Vec<u8> {
                match self {
                    $(AnyVector::$variant(v) => v.to_bytes().as_ref().to_vec(),)*
                }
            }

            /// Vector of `shape` holding `bytes`.
            ///
            /// Fails with `InvalidArgument` unless `bytes` is exactly as long
            /// as the shape is wide.
            pub fn from_bytes(shape: Shape, bytes: &[u8]) -> Result<Self> {
                if bytes.len() != shape.bytes() {
                    return Err(SimdError::invalid_argument(format!(
                        "{} needs {} bytes, got {}",
                        shape,
                        shape.bytes(),
                        bytes.len()
                    )));
                }
                $(
                    if shape == $ty::shape() {
                        let mut buf = <<$ty as SimdVector>::Width as Width>::ZERO_BYTES;
                        buf.as_mut().copy_from_slice(bytes);
                        return Ok(AnyVector::$variant($ty::from_bytes(buf)));
                    }
                )*
                Err(SimdError::invalid_argument(format!("`{}` has no vector type", shape)))
            }
        }

        impl fmt::Debug for AnyVector {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(AnyVector::$variant(v) => v.fmt(f),)*
                }
            }
        }

        $(
            impl From<$ty> for AnyVector {
                #[inline]
                fn from(v: $ty) -> Self {
                    AnyVector::$variant(v)
                }
            }

            impl TryFrom<AnyVector> for $ty {
                type Error = SimdError;

                fn try_from(value: AnyVector) -> Result<Self> {
                    match value {
                        AnyVector::$variant(v) => Ok(v),
                        other => Err(SimdError::invalid_argument(format!(
                            "expected {}, found {}",
                            $ty::shape(),
                            other.shape()
                        ))),
                    }
                }
            }
        )*
    };
}

any_vector! {
    F16x4(f16x4),
    I8x16(i8x16),
    I16x8(i16x8),
    I32x4(i32x4),
    I64x2(i64x2),
    U8x16(u8x16),
    U16x8(u16x8),
    U32x4(u32x4),
    U64x2(u64x2),
    F32x4(f32x4),
    F64x2(f64x2),
    I8x32(i8x32),
    I16x16(i16x16),
    I32x8(i32x8),
    I64x4(i64x4),
    U8x32(u8x32),
    U16x16(u16x16),
    U32x8(u32x8),
    U64x4(u64x4),
    F32x8(f32x8),
    F64x4(f64x4),
    I8x64(i8x64),
    I16x32(i16x32),
    I32x16(i32x16),
    I64x8(i64x8),
    U8x64(u8x64),
    U16x32(u16x32),
    U32x16(u32x16),
    U64x8(u64x8),
    F32x16(f32x16),
    F64x8(f64x8),
}

/// Match `$value` against `(source variant, destination type)` rows and apply
/// `$op` to the first row whose destination shape equals `$to`.
macro_rules! dispatch {
    ($value:expr, $to:expr, $op:ident; $($src:ident => $dst:ident($dst_ty:ident),)*) => {
        match $value {
            $(
                AnyVector::$src(v) if $to == $dst_ty::shape() => {
                    Some(AnyVector::$dst($op::<$dst_ty, _>(*v)))
                }
            )*
            _ => None,
        }
    };
}

impl AnyVector {
    /// All-zero vector of `shape`.
    pub fn zero(shape: Shape) -> Self {
        // canonical shapes always have a variant, so only the length check
        // in from_bytes can fail, and the length is right by construction
        match Self::from_bytes(shape, &vec![0u8; shape.bytes()]) {
            Ok(v) => v,
            Err(_) => unreachable!("every canonical shape has a vector type"),
        }
    }

    /// Reinterpret the bits as a vector of shape `to`.
    ///
    /// Fails with `SizeMismatch` when the widths differ.
    pub fn reinterpret(&self, to: Shape) -> Result<AnyVector> {
        let from = self.shape();
        if from.bits() != to.bits() {
            log::debug!("rejected reinterpret {} -> {}: width mismatch", from, to);
            return Err(SimdError::size_mismatch(from, to));
        }
        AnyVector::from_bytes(to, &self.to_bytes())
    }

    /// Convert the lanes into shape `to`.
    ///
    /// `config.rounding` selects `convert` (nearest) or `truncate` (toward
    /// zero). Fails with `UnsupportedConversion` for pairs the typed API does
    /// not define, including `TowardZero` on anything but float to integer.
    pub fn convert(&self, to: Shape, config: &ConvertConfig) -> Result<AnyVector> {
        let converted = match config.rounding {
            Rounding::Nearest => self.convert_nearest(to),
            Rounding::TowardZero => self.convert_toward_zero(to),
        };
        converted.ok_or_else(|| {
            let from = self.shape();
            log::debug!(
                "rejected convert {} -> {} with rounding {}",
                from,
                to,
                config.rounding.name()
            );
            SimdError::unsupported_conversion(
                from,
                to,
                format!("rounding {}", config.rounding.name()),
            )
        })
    }

    fn convert_nearest(&self, to: Shape) -> Option<AnyVector> {
        dispatch!(self, to, convert;
            I32x4 => F32x4(f32x4),
            U32x4 => F32x4(f32x4),
            I64x2 => F64x2(f64x2),
            F32x4 => I32x4(i32x4),
            F32x4 => U32x4(u32x4),
            F64x2 => I64x2(i64x2),
            I32x4 => F64x4(f64x4),
            U32x4 => F64x4(f64x4),
            F32x4 => F64x4(f64x4),
            F64x4 => I32x4(i32x4),
            F64x4 => U32x4(u32x4),
            F64x4 => F32x4(f32x4),
            F16x4 => F32x4(f32x4),
            F32x4 => F16x4(f16x4),
            I32x8 => F32x8(f32x8),
            U32x8 => F32x8(f32x8),
            I64x4 => F64x4(f64x4),
            F32x8 => I32x8(i32x8),
            F32x8 => U32x8(u32x8),
            F64x4 => I64x4(i64x4),
            I32x8 => F64x8(f64x8),
            U32x8 => F64x8(f64x8),
            F32x8 => F64x8(f64x8),
            F64x8 => I32x8(i32x8),
            F64x8 => U32x8(u32x8),
            F64x8 => F32x8(f32x8),
            I32x16 => F32x16(f32x16),
            U32x16 => F32x16(f32x16),
            I64x8 => F64x8(f64x8),
            F32x16 => I32x16(i32x16),
            F32x16 => U32x16(u32x16),
            F64x8 => I64x8(i64x8),
        )
    }

    fn convert_toward_zero(&self, to: Shape) -> Option<AnyVector> {
        dispatch!(self, to, truncate;
            F32x4 => I32x4(i32x4),
            F32x4 => U32x4(u32x4),
            F64x2 => I64x2(i64x2),
            F64x4 => I32x4(i32x4),
            F64x4 => U32x4(u32x4),
            F32x8 => I32x8(i32x8),
            F32x8 => U32x8(u32x8),
            F64x4 => I64x4(i64x4),
            F64x8 => I32x8(i32x8),
            F64x8 => U32x8(u32x8),
            F32x16 => I32x16(i32x16),
            F32x16 => U32x16(u32x16),
            F64x8 => I64x8(i64x8),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn shape(s: &str) -> Shape {
        s.parse().unwrap()
    }

    #[test]
    fn test_every_shape_has_a_variant() {
        for s in Shape::all() {
            let v = AnyVector::zero(s);
            assert_eq!(v.shape(), s);
            assert_eq!(v.to_bytes(), vec![0u8; s.bytes()]);
        }
    }

    #[test]
    fn test_from_bytes_checks_length() {
        let err = AnyVector::from_bytes(shape("u8x16"), &[0u8; 15]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_reinterpret() {
        let v = AnyVector::from(f32x4::splat(1.0));
        let bits = v.reinterpret(shape("u32x4")).unwrap();
        assert_eq!(u32x4::try_from(bits).unwrap(), u32x4::splat(0x3f80_0000));

        let err = v.reinterpret(shape("f32x8")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SizeMismatch);
    }

    #[test]
    fn test_convert_with_rounding() {
        let v = AnyVector::from(f64x4::from_array([2.7, -2.7, 0.5, 1.5]));
        let nearest = v.convert(shape("i32x4"), &ConvertConfig::new()).unwrap();
        assert_eq!(i32x4::try_from(nearest).unwrap().to_array(), [3, -3, 0, 2]);

        let truncated = v.convert(shape("i32x4"), &ConvertConfig::truncating()).unwrap();
        assert_eq!(i32x4::try_from(truncated).unwrap().to_array(), [2, -2, 0, 1]);
    }

    #[test]
    fn test_unsupported_pairs() {
        let ints = AnyVector::from(i32x4::splat(3));
        let err = ints
            .convert(shape("f32x4"), &ConvertConfig::truncating())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedConversion);

        let bytes = AnyVector::from(u8x16::splat(1));
        let err = bytes.convert(shape("f32x4"), &ConvertConfig::new()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedConversion);
        assert!(err.message().contains("u8x16"));
    }

    #[test]
    fn test_try_from_wrong_shape() {
        let v = AnyVector::from(u16x8::splat(1));
        let err = u8x16::try_from(v).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }
}
