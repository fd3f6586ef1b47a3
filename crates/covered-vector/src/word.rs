//! Packed per-word storage shared by every vector kind.
//!
//! A [`WordStore`] holds one word-sized slice of a vector together with all of
//! its metadata planes. Which planes are live depends on the owning vector's
//! [`Kind`](crate::Kind); the plane indices below are also the order in which
//! planes appear in a database sub-record.

use std::fmt::Debug;
use std::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

/// Plane indices into a [`WordStore`].
pub mod plane {
    pub const VALUE_LOW: usize = 0;
    pub const VALUE_HIGH: usize = 1;

    // Signal and memory vectors.
    pub const TOGGLE_01: usize = 2;
    pub const TOGGLE_10: usize = 3;

    // Signal vectors.
    pub const SIG_SET: usize = 4;
    pub const SIG_MISC: usize = 5;

    // Memory vectors.
    pub const MEM_WRITE: usize = 4;
    pub const MEM_READ: usize = 5;

    // Expression vectors.
    pub const EVAL_A: usize = 2;
    pub const EVAL_B: usize = 3;
    pub const EVAL_C: usize = 4;
    pub const EVAL_D: usize = 5;
    pub const EXP_SET: usize = 6;

    /// Largest plane count of any kind.
    pub const MAX_PLANES: usize = 7;
}

/// Word type a vector's planes are packed into.
///
/// Only `u32` backs [`Vector`](crate::Vector) today; the trait keeps the
/// masking arithmetic independent of the word size.
pub trait PlaneWord:
    Copy
    + Eq
    + Debug
    + Default
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
{
    const BITS: u32;
    const ZERO: Self;
    const ONES: Self;

    fn count_ones(self) -> u32;

    /// Mask with the low `n` bits set. `n == 0` yields zero.
    fn low_mask(n: u32) -> Self {
        if n >= Self::BITS {
            Self::ONES
        } else if n == 0 {
            Self::ZERO
        } else {
            !(Self::ONES << n)
        }
    }

    /// Mask with bits `lo..=hi` set (both relative to this word).
    fn range_mask(lo: u32, hi: u32) -> Self {
        debug_assert!(lo <= hi && hi < Self::BITS);
        Self::low_mask(hi + 1) & !Self::low_mask(lo)
    }

    fn bit(self, index: u32) -> bool {
        (self >> index) & Self::low_mask(1) != Self::ZERO
    }

    fn with_bit(self, index: u32, value: bool) -> Self {
        let b = Self::low_mask(1) << index;
        if value { self | b } else { self & !b }
    }
}

impl PlaneWord for u32 {
    const BITS: u32 = u32::BITS;
    const ZERO: Self = 0;
    const ONES: Self = u32::MAX;

    fn count_ones(self) -> u32 {
        u32::count_ones(self)
    }
}

impl PlaneWord for u64 {
    const BITS: u32 = u64::BITS;
    const ZERO: Self = 0;
    const ONES: Self = u64::MAX;

    fn count_ones(self) -> u32 {
        u64::count_ones(self)
    }
}

/// Number of `W` words needed to hold `width` bits.
pub fn words_for<W: PlaneWord>(width: usize) -> usize {
    width.div_ceil(W::BITS as usize)
}

/// Valid-bit mask of the most significant word of a `width`-bit vector.
pub fn top_mask<W: PlaneWord>(width: usize) -> W {
    debug_assert!(width > 0);
    W::low_mask(((width - 1) % W::BITS as usize) as u32 + 1)
}

/// One word-sized slice of a vector across all of its planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WordStore<W: PlaneWord = u32> {
    planes: [W; plane::MAX_PLANES],
}

impl<W: PlaneWord> WordStore<W> {
    pub fn new(value_low: W, value_high: W) -> Self {
        let mut planes = [W::ZERO; plane::MAX_PLANES];
        planes[plane::VALUE_LOW] = value_low;
        planes[plane::VALUE_HIGH] = value_high;
        Self { planes }
    }

    #[inline]
    pub fn get(&self, index: usize) -> W {
        self.planes[index]
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: W) {
        self.planes[index] = value;
    }

    /// Sticky update: bits already set are never cleared.
    #[inline]
    pub fn or(&mut self, index: usize, value: W) {
        self.planes[index] = self.planes[index] | value;
    }

    /// `(value_low, value_high)` of this word.
    #[inline]
    pub fn value(&self) -> (W, W) {
        (self.planes[plane::VALUE_LOW], self.planes[plane::VALUE_HIGH])
    }

    /// Replace the value bits selected by `mask`, leaving the rest alone.
    #[inline]
    pub fn assign_value(&mut self, mask: W, low: W, high: W) {
        let (l, h) = self.value();
        self.planes[plane::VALUE_LOW] = (l & !mask) | (low & mask);
        self.planes[plane::VALUE_HIGH] = (h & !mask) | (high & mask);
    }

    /// Zero every plane at or above `from`.
    pub fn clear_planes(&mut self, from: usize) {
        self.planes[from..].fill(W::ZERO);
    }
}

/// A single four-state bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bit {
    Zero,
    One,
    X,
    Z,
}

impl Bit {
    /// Decode from the `(value_low, value_high)` plane pair.
    pub fn from_planes(low: bool, high: bool) -> Self {
        match (low, high) {
            (false, false) => Bit::Zero,
            (true, false) => Bit::One,
            (false, true) => Bit::X,
            (true, true) => Bit::Z,
        }
    }

    pub fn planes(self) -> (bool, bool) {
        match self {
            Bit::Zero => (false, false),
            Bit::One => (true, false),
            Bit::X => (false, true),
            Bit::Z => (true, true),
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, Bit::Zero | Bit::One)
    }

    pub fn to_char(self) -> char {
        match self {
            Bit::Zero => '0',
            Bit::One => '1',
            Bit::X => 'x',
            Bit::Z => 'z',
        }
    }

    /// Parse a single value-change character (`0`, `1`, `x`, `z`, any case).
    ///
    /// `?` is a literal digit, not a value-change character, and is rejected.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Bit::Zero),
            '1' => Some(Bit::One),
            'x' | 'X' => Some(Bit::X),
            'z' | 'Z' => Some(Bit::Z),
            _ => None,
        }
    }
}
