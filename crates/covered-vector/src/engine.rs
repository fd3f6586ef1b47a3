//! The single gate through which every value change of a vector passes.
//!
//! Operators never write value planes themselves: they compute a result into
//! a [`Scratch`](crate::Scratch) and hand it to
//! [`Vector::set_coverage_and_assign`], which folds the change into the sticky
//! coverage planes before committing it.

use crate::vector::{Kind, Vector, WORD_BITS, Word};
use crate::word::{PlaneWord, plane};

/// Known-0 to known-1 and known-1 to known-0 transitions between two values.
#[inline]
fn known_transitions(old_low: Word, old_high: Word, new_low: Word, new_high: Word) -> (Word, Word) {
    let old0 = !old_low & !old_high;
    let old1 = old_low & !old_high;
    let new0 = !new_low & !new_high;
    let new1 = new_low & !new_high;
    (old0 & new1, old1 & new0)
}

impl Vector {
    /// Assign bits `lsb..=msb` from the scratch planes and update coverage.
    ///
    /// `low`/`high` are indexed by absolute word position of this vector and
    /// must cover word `msb / 32`. Returns `true` if any committed value bit
    /// differs from its previous value.
    pub fn set_coverage_and_assign(&mut self, low: &[Word], high: &[Word], lsb: usize, msb: usize) -> bool {
        assert!(
            lsb <= msb && msb < self.width(),
            "assignment range [{msb}:{lsb}] outside {}-bit vector",
            self.width()
        );
        let lindex = lsb / WORD_BITS;
        let hindex = msb / WORD_BITS;
        assert!(
            low.len() > hindex && high.len() > hindex,
            "scratch buffer too short for bit {msb}"
        );

        let kind = self.kind();
        let two_state = self.is_2state();
        let mut words = self.words_mut();
        let mut changed = false;

        for i in lindex..=hindex {
            let mut mask = Word::ONES;
            if i == lindex {
                mask &= Word::ONES << (lsb % WORD_BITS) as u32;
            }
            if i == hindex {
                mask &= Word::low_mask((msb % WORD_BITS) as u32 + 1);
            }

            let (mut new_low, mut new_high) = (low[i] & mask, high[i] & mask);
            if two_state {
                new_low &= !new_high;
                new_high = 0;
            }

            let entry = &mut words[i];
            let (cur_low, cur_high) = entry.value();
            let (old_low, old_high) = (cur_low & mask, cur_high & mask);
            if old_low != new_low || old_high != new_high {
                changed = true;
            }

            match kind {
                Kind::Plain => {}
                Kind::Signal => {
                    let (t01, t10) = known_transitions(old_low, old_high, new_low, new_high);
                    let prior = entry.get(plane::SIG_SET) & mask;
                    entry.or(plane::TOGGLE_01, t01 & prior);
                    entry.or(plane::TOGGLE_10, t10 & prior);
                    entry.or(plane::SIG_SET, mask);
                }
                Kind::Expression => entry.or(plane::EXP_SET, mask),
                Kind::Memory => {
                    let (t01, t10) = known_transitions(old_low, old_high, new_low, new_high);
                    entry.or(plane::TOGGLE_01, t01 & mask);
                    entry.or(plane::TOGGLE_10, t10 & mask);
                    entry.or(plane::MEM_WRITE, mask);
                }
            }

            entry.assign_value(mask, new_low, new_high);
        }

        changed
    }

    /// Assign this vector's value from `src`, truncated to the narrower width.
    pub fn set_value(&mut self, src: &Vector) -> bool {
        let width = self.width().min(src.width());
        let (low, high): (Vec<Word>, Vec<Word>) = src.words().iter().map(|w| w.value()).unzip();
        self.set_coverage_and_assign(&low, &high, 0, width - 1)
    }

    /// Drive every bit to X.
    pub fn set_to_x(&mut self) -> bool {
        crate::Scratch::unknown(self.width()).commit(self)
    }

    /// Replicate bit `last` into every higher bit.
    ///
    /// Unknown bits (`x`/`z`) always replicate; a known bit replicates for
    /// signed vectors and fills with zero for unsigned ones.
    pub fn bit_fill(&mut self, last: usize) -> bool {
        assert!(last < self.width(), "bit-fill position {last} out of range");
        if last + 1 == self.width() {
            return false;
        }
        let fill = match self.bit(last) {
            b @ (crate::Bit::X | crate::Bit::Z) => b,
            b if self.is_signed() => b,
            _ => crate::Bit::Zero,
        };
        let (fill_low, fill_high) = fill.planes();
        let n = self.word_count();
        let low = vec![if fill_low { Word::ONES } else { 0 }; n];
        let high = vec![if fill_high { Word::ONES } else { 0 }; n];
        self.set_coverage_and_assign(&low, &high, last + 1, self.width() - 1)
    }

    /// Set the race-checker assigned bits for `lsb..=msb` of a signal.
    ///
    /// Returns `true` if any of those bits had already been marked.
    pub fn set_assigned(&mut self, msb: usize, lsb: usize) -> bool {
        assert_eq!(self.kind(), Kind::Signal, "assigned bits exist only on signals");
        assert!(lsb <= msb && msb < self.width(), "range [{msb}:{lsb}] out of bounds");
        let mut words = self.words_mut();
        let mut prev = false;
        for i in lsb..=msb {
            let w = &mut words[i / WORD_BITS];
            let bit = 1 << (i % WORD_BITS);
            prev |= w.get(plane::SIG_MISC) & bit != 0;
            w.or(plane::SIG_MISC, bit);
        }
        prev
    }
}
