//! Detached low/high word pairs used as operator inputs and results.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::vector::{Vector, WORD_BITS, Word, word_count};
use crate::word::{Bit, PlaneWord, top_mask};

/// Three-valued truth of a whole operand, as used by logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    False,
    True,
    Unknown,
}

/// A width-bounded value buffer, sized at acquisition and dropped on return.
///
/// Bits above `width` are always zero in both planes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scratch {
    width: usize,
    signed: bool,
    pub(crate) low: Vec<Word>,
    pub(crate) high: Vec<Word>,
}

impl Scratch {
    pub fn zeroed(width: usize) -> Self {
        let n = word_count(width);
        Self {
            width,
            signed: false,
            low: vec![0; n],
            high: vec![0; n],
        }
    }

    pub fn unknown(width: usize) -> Self {
        let mut s = Self::zeroed(width);
        s.high.fill(Word::ONES);
        s.mask_top();
        s
    }

    /// Snapshot the value planes of `v`.
    pub fn from_vector(v: &Vector) -> Self {
        let (low, high) = v.words().iter().map(|w| w.value()).unzip();
        Self {
            width: v.width(),
            signed: v.is_signed(),
            low,
            high,
        }
    }

    /// Known value of `width` bits from an unsigned integer, truncated.
    pub fn from_biguint(width: usize, value: &BigUint) -> Self {
        let mut s = Self::zeroed(width);
        for (dst, digit) in s.low.iter_mut().zip(value.to_u32_digits()) {
            *dst = digit;
        }
        s.mask_top();
        s
    }

    /// Known value of `width` bits holding `value` modulo 2^width.
    pub fn from_bigint(width: usize, value: &BigInt) -> Self {
        let magnitude = if value.sign() == Sign::Minus {
            let modulus = BigInt::one() << width;
            let wrapped = (value % &modulus) + &modulus;
            wrapped.magnitude().clone()
        } else {
            value.magnitude().clone()
        };
        Self::from_biguint(width, &magnitude)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn with_signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    pub fn low(&self) -> &[Word] {
        &self.low
    }

    pub fn high(&self) -> &[Word] {
        &self.high
    }

    pub(crate) fn mask_top(&mut self) {
        if self.width == 0 {
            return;
        }
        let mask = top_mask::<Word>(self.width);
        if let Some(l) = self.low.last_mut() {
            *l &= mask;
        }
        if let Some(h) = self.high.last_mut() {
            *h &= mask;
        }
    }

    /// Word `i`, zero-extended past the buffer.
    #[inline]
    pub fn word(&self, i: usize) -> (Word, Word) {
        (
            self.low.get(i).copied().unwrap_or(0),
            self.high.get(i).copied().unwrap_or(0),
        )
    }

    pub fn bit(&self, index: usize) -> Bit {
        if index >= self.width {
            return Bit::Zero;
        }
        let (l, h) = self.word(index / WORD_BITS);
        let off = (index % WORD_BITS) as u32;
        Bit::from_planes(l.bit(off), h.bit(off))
    }

    pub fn set_bit(&mut self, index: usize, bit: Bit) {
        debug_assert!(index < self.width);
        let (l, h) = bit.planes();
        let (w, off) = (index / WORD_BITS, (index % WORD_BITS) as u32);
        self.low[w] = self.low[w].with_bit(off, l);
        self.high[w] = self.high[w].with_bit(off, h);
    }

    pub fn has_unknown(&self) -> bool {
        self.high.iter().any(|&h| h != 0)
    }

    pub fn is_not_zero(&self) -> bool {
        self.low.iter().any(|&l| l != 0)
    }

    /// Reduce to 1 if any bit is a known 1, 0 if every bit is a known 0, else X.
    pub fn truth(&self) -> Truth {
        let any_one = self.low.iter().zip(&self.high).any(|(&l, &h)| l & !h != 0);
        if any_one {
            Truth::True
        } else if self.has_unknown() {
            Truth::Unknown
        } else {
            Truth::False
        }
    }

    /// The most significant bit.
    pub fn msb(&self) -> Bit {
        self.bit(self.width - 1)
    }

    /// Copy into a buffer of `width` bits, truncating or extending.
    ///
    /// With `sign_extend`, the most significant bit (including `x`/`z`) fills
    /// the new upper bits; otherwise they are zero.
    pub fn resized(&self, width: usize, sign_extend: bool) -> Scratch {
        let mut out = Scratch::zeroed(width);
        out.signed = self.signed;
        for (i, (low, high)) in out.low.iter_mut().zip(out.high.iter_mut()).enumerate() {
            (*low, *high) = self.word(i);
        }
        if width > self.width && sign_extend && self.width > 0 {
            let (fl, fh) = self.msb().planes();
            out.fill_range(self.width, width, fl, fh);
        }
        out.mask_top();
        out
    }

    /// Set bits `from..to` to the given plane values.
    pub(crate) fn fill_range(&mut self, from: usize, to: usize, low: bool, high: bool) {
        let to = to.min(self.width);
        let mut i = from;
        while i < to {
            let w = i / WORD_BITS;
            let lo = (i % WORD_BITS) as u32;
            let hi = ((to - 1 - w * WORD_BITS).min(WORD_BITS - 1)) as u32;
            let mask = Word::range_mask(lo, hi);
            self.low[w] = if low { self.low[w] | mask } else { self.low[w] & !mask };
            self.high[w] = if high { self.high[w] | mask } else { self.high[w] & !mask };
            i = (w + 1) * WORD_BITS;
        }
    }

    /// OR `src` into this buffer starting at bit `at`; bits past `width` are dropped.
    pub(crate) fn insert(&mut self, at: usize, src: &Scratch) {
        if at >= self.width {
            return;
        }
        let ws = at / WORD_BITS;
        let bs = (at % WORD_BITS) as u32;
        for j in 0..src.low.len() {
            let (l, h) = src.word(j);
            let idx = ws + j;
            if idx < self.low.len() {
                self.low[idx] |= l << bs;
                self.high[idx] |= h << bs;
            }
            if bs != 0 && idx + 1 < self.low.len() {
                self.low[idx + 1] |= l >> (Word::BITS - bs);
                self.high[idx + 1] |= h >> (Word::BITS - bs);
            }
        }
        self.mask_top();
    }

    /// Shift toward the MSB by `amount`, zero-filling; width is unchanged.
    pub(crate) fn shifted_left(&self, amount: usize) -> Scratch {
        let mut out = Scratch::zeroed(self.width);
        out.signed = self.signed;
        if amount < self.width {
            out.insert(amount, self);
        }
        out
    }

    /// Shift toward the LSB by `amount`, zero-filling; width is unchanged.
    pub(crate) fn shifted_right(&self, amount: usize) -> Scratch {
        let mut out = Scratch::zeroed(self.width);
        out.signed = self.signed;
        if amount >= self.width {
            return out;
        }
        let ws = amount / WORD_BITS;
        let bs = (amount % WORD_BITS) as u32;
        for (i, (low, high)) in out.low.iter_mut().zip(out.high.iter_mut()).enumerate() {
            let (l0, h0) = self.word(i + ws);
            let (l1, h1) = self.word(i + ws + 1);
            *low = l0 >> bs;
            *high = h0 >> bs;
            if bs != 0 {
                *low |= l1 << (Word::BITS - bs);
                *high |= h1 << (Word::BITS - bs);
            }
        }
        out.mask_top();
        out
    }

    /// Unsigned magnitude of the low plane.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_slice(&self.low)
    }

    /// Value of the low plane as a two's complement integer of `width` bits.
    pub fn to_bigint(&self) -> BigInt {
        let mag = BigInt::from(self.to_biguint());
        if self.width > 0 && self.msb() == Bit::One {
            mag - (BigInt::one() << self.width)
        } else {
            mag
        }
    }

    /// Low plane as a shift/replication count; saturates at `usize::MAX`.
    pub(crate) fn to_count(&self) -> usize {
        let v = self.to_biguint();
        if v.is_zero() {
            return 0;
        }
        let digits = v.to_u64_digits();
        if digits.len() > 1 {
            return usize::MAX;
        }
        usize::try_from(digits[0]).unwrap_or(usize::MAX)
    }

    /// Commit to every bit of `tgt` through the coverage engine.
    ///
    /// The buffer is resized (zero-extended or truncated) to the target width.
    pub fn commit(&self, tgt: &mut Vector) -> bool {
        if self.width == tgt.width() {
            tgt.set_coverage_and_assign(&self.low, &self.high, 0, tgt.width() - 1)
        } else {
            let fitted = self.resized(tgt.width(), false);
            tgt.set_coverage_and_assign(&fitted.low, &fitted.high, 0, tgt.width() - 1)
        }
    }
}
