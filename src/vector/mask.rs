//! Lane masks produced by float comparisons.

use std::fmt;
use std::marker::PhantomData;

use crate::backend::{ActiveBackend, Backend, Reg};
use crate::types::Lane;
use crate::vector::Composite;

/// Per-lane boolean result of a comparison.
///
/// Every lane is all-ones (true) or all-zeros (false). Masks come out of the
/// `compare_*` operations of [`SimdFloat`](crate::float::SimdFloat) and go
/// into `select`.
pub trait SimdMask: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Number of lanes.
    const LANES: usize;

    /// Whether lane `index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= LANES`.
    fn test(self, index: usize) -> bool;

    /// One bit per lane, lane 0 in bit 0.
    fn to_bitmask(self) -> u64;

    /// Lanes set in both masks.
    fn and(self, other: Self) -> Self;

    /// Lanes set in either mask.
    fn or(self, other: Self) -> Self;

    /// Lanes set in exactly one mask.
    fn xor(self, other: Self) -> Self;

    /// Lanes not set.
    fn not(self) -> Self;

    /// True if any lane is set.
    #[inline]
    fn any(self) -> bool {
        self.to_bitmask() != 0
    }

    /// True if every lane is set.
    #[inline]
    fn all(self) -> bool {
        self.to_bitmask().count_ones() as usize == Self::LANES
    }

    /// True if no lane is set.
    #[inline]
    fn none(self) -> bool {
        !self.any()
    }
}

/// Mask for a 128-bit vector of `T` lanes.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Mask128<T> {
    reg: Reg,
    lane: PhantomData<T>,
}

impl<T> Mask128<T> {
    #[inline]
    pub(crate) fn from_reg(reg: Reg) -> Self {
        Self {
            reg,
            lane: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn reg(self) -> Reg {
        self.reg
    }
}

impl<T: Lane> SimdMask for Mask128<T> {
    const LANES: usize = 16 / std::mem::size_of::<T>();

    #[inline]
    fn test(self, index: usize) -> bool {
        assert!(index < Self::LANES, "mask lane {} out of range", index);
        ActiveBackend::to_bytes(self.reg)[index * std::mem::size_of::<T>()] != 0
    }

    #[inline]
    fn to_bitmask(self) -> u64 {
        let bytes = ActiveBackend::to_bytes(self.reg);
        let stride = std::mem::size_of::<T>();
        (0..Self::LANES).fold(0, |bits, i| {
            if bytes[i * stride] != 0 {
                bits | (1 << i)
            } else {
                bits
            }
        })
    }

    #[inline]
    fn and(self, other: Self) -> Self {
        Self::from_reg(ActiveBackend::and(self.reg, other.reg))
    }

    #[inline]
    fn or(self, other: Self) -> Self {
        Self::from_reg(ActiveBackend::or(self.reg, other.reg))
    }

    #[inline]
    fn xor(self, other: Self) -> Self {
        Self::from_reg(ActiveBackend::xor(self.reg, other.reg))
    }

    #[inline]
    fn not(self) -> Self {
        Self::from_reg(ActiveBackend::xor(
            self.reg,
            ActiveBackend::from_bytes([0xff; 16]),
        ))
    }
}

impl<M: SimdMask> SimdMask for Composite<M> {
    const LANES: usize = 2 * M::LANES;

    #[inline]
    fn test(self, index: usize) -> bool {
        if index < M::LANES {
            self.lo.test(index)
        } else {
            self.hi.test(index - M::LANES)
        }
    }

    #[inline]
    fn to_bitmask(self) -> u64 {
        self.lo.to_bitmask() | (self.hi.to_bitmask() << M::LANES)
    }

    #[inline]
    fn and(self, other: Self) -> Self {
        Composite::combine(self.lo.and(other.lo), self.hi.and(other.hi))
    }

    #[inline]
    fn or(self, other: Self) -> Self {
        Composite::combine(self.lo.or(other.lo), self.hi.or(other.hi))
    }

    #[inline]
    fn xor(self, other: Self) -> Self {
        Composite::combine(self.lo.xor(other.lo), self.hi.xor(other.hi))
    }

    #[inline]
    fn not(self) -> Self {
        Composite::combine(self.lo.not(), self.hi.not())
    }
}

impl<T: Lane> fmt::Debug for Mask128<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lanes: Vec<bool> = (0..Self::LANES).map(|i| self.test(i)).collect();
        f.debug_tuple("Mask128").field(&lanes).finish()
    }
}

impl<T: Lane> PartialEq for Mask128<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.to_bitmask() == other.to_bitmask()
    }
}
