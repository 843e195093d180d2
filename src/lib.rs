//! # lanewise
//!
//! Width-generic SIMD vectors with bit-exact reinterpretation, lane
//! extension, narrowing and numeric conversion.
//!
//! ## Overview
//!
//! Every vector type carries its lane kind, lane count and total width in
//! its type:
//!
//! - **Hardware vectors**: 128-bit values held in one register of the active
//!   backend (`u8x16`, `i32x4`, `f64x2`, ...)
//! - **Composite vectors**: 256 and 512-bit values stored as a `lo`/`hi` pair
//!   of half-width vectors (`f32x8 = Composite<f32x4>`)
//! - **Half precision**: `f16x4`, a 64-bit storage-only vector
//!
//! Operations that cannot be valid for a pair of types (reinterpreting across
//! widths, extending 8-bit lanes straight to 32 bits, converting bytes to
//! floats) do not compile. The [`dynamic`] layer offers the same operations
//! on runtime shapes and reports the same rules as [`SimdError`]s.
//!
//! ## Quick Start
//!
//! ```rust
//! use lanewise::prelude::*;
//!
//! // reinterpret keeps every bit
//! let ones = f32x4::splat(1.0);
//! let bits: u32x4 = reinterpret(ones);
//! assert_eq!(bits.to_array(), [0x3f80_0000; 4]);
//!
//! // extend widens lanes; a destination twice as wide takes all of them
//! let bytes = u8x16::from_array(std::array::from_fn(|i| i as u8 * 16));
//! let words: u16x16 = extend(bytes);
//! assert_eq!(words.lane(15), 240);
//!
//! // narrow packs the low halves of two vectors back into one
//! assert_eq!(narrow(words.lo, words.hi), bytes);
//!
//! // convert rounds to nearest even, truncate rounds toward zero
//! let v = f32x8::from_array([2.7, -2.7, 2.5, 3.5, 0.0, 1.0, -1.5, 7.0]);
//! let nearest: i32x8 = convert(v);
//! let toward_zero: i32x8 = truncate(v);
//! assert_eq!(nearest.to_array(), [3, -3, 2, 4, 0, 1, -2, 7]);
//! assert_eq!(toward_zero.to_array(), [2, -2, 2, 3, 0, 1, -1, 7]);
//! ```
//!
//! ## Runtime Shapes
//!
//! ```rust
//! use lanewise::{AnyVector, ConvertConfig, ErrorCode, Shape, f64x4, SimdVector};
//!
//! let v = AnyVector::from(f64x4::from_array([0.5, 1.5, -0.5, 9.9]));
//! let target: Shape = "i32x4".parse().unwrap();
//! let out = v.convert(target, &ConvertConfig::new()).unwrap();
//! assert_eq!(out.shape(), target);
//!
//! let err = v.reinterpret("u8x16".parse().unwrap()).unwrap_err();
//! assert_eq!(err.code(), ErrorCode::SizeMismatch);
//! ```
//!
//! ## Backends
//!
//! | Backend | Selected when | Register |
//! |---------|---------------|----------|
//! | `x86_64-sse2` | `x86_64` without the `portable` feature | `__m128i` |
//! | `portable` | everywhere else | `wide::u8x16` |
//!
//! Both backends produce identical bits for every operation on in-range
//! input. NaN and out-of-range float to integer conversions are
//! backend-defined; [`BackendInfo`] describes them.
//!
//! ## Module Overview
//!
//! - [`types`]: Lane kinds, width markers and runtime shapes
//! - [`vector`]: Hardware and composite vector types, masks
//! - [`reinterpret`]: Bit-preserving reinterpretation
//! - [`extend`]: Lane widening and truncating narrowing
//! - [`convert`]: Numeric conversion between lane kinds
//! - [`float`]: Floating-point arithmetic, comparison and rounding
//! - [`dynamic`]: Runtime-shaped vectors
//! - [`backend`]: Register-level primitives

#![allow(clippy::module_inception)]
#![allow(clippy::needless_range_loop)]

pub mod backend;
pub mod convert;
pub mod dynamic;
pub mod extend;
pub mod float;
pub mod reinterpret;
pub mod types;
pub mod vector;

mod config;
mod error;

#[cfg(test)]
mod tests;

pub use backend::{
    simd_support_level, ActiveBackend, Backend, BackendInfo, RoundMode, SimdSupportLevel,
};
pub use config::{ConvertConfig, Rounding};
pub use convert::{convert, truncate, ConvertTo, TruncateTo};
pub use dynamic::AnyVector;
pub use error::{ErrorCode, Result, SimdError};
pub use extend::{extend, narrow, ExtendTo, Narrow};
pub use float::SimdFloat;
pub use reinterpret::reinterpret;
pub use types::{Lane, LaneKind, Shape, Width, W128, W256, W512, W64};
pub use vector::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::convert::{convert, truncate, ConvertTo, TruncateTo};
    pub use crate::extend::{extend, narrow, ExtendTo, Narrow};
    pub use crate::float::SimdFloat;
    pub use crate::reinterpret::reinterpret;
    pub use crate::vector::{
        combine, get_high, get_low, set_high, set_low, Composite, SimdMask, SimdVector,
    };

    // Vector types
    pub use crate::vector::{
        f16x4, f32x16, f32x4, f32x8, f64x2, f64x4, f64x8, i16x16, i16x32, i16x8, i32x16, i32x4,
        i32x8, i64x2, i64x4, i64x8, i8x16, i8x32, i8x64, u16x16, u16x32, u16x8, u32x16, u32x4,
        u32x8, u64x2, u64x4, u64x8, u8x16, u8x32, u8x64,
    };

    // Runtime layer
    pub use crate::config::{ConvertConfig, Rounding};
    pub use crate::dynamic::AnyVector;
    pub use crate::error::{ErrorCode, Result, SimdError};
    pub use crate::types::{LaneKind, Shape};
}
