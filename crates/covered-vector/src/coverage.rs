//! Value queries, integer conversions and coverage readers.

use itertools::Itertools;
use num_bigint::BigUint;

use crate::vector::{Kind, Vector, WORD_BITS, Word};
use crate::word::{PlaneWord, plane, top_mask};
use crate::Scratch;

/// `(known_zero, known_one)` masks of word `i`; bits past `width` are in neither.
fn known_masks(s: &Scratch, i: usize) -> (Word, Word) {
    let (l, h) = s.word(i);
    let valid = if (i + 1) * WORD_BITS <= s.width() {
        Word::ONES
    } else if i * WORD_BITS < s.width() {
        top_mask::<Word>(s.width())
    } else {
        0
    };
    (!l & !h & valid, l & !h & valid)
}

impl Vector {
    /// True if any bit is `x` or `z`.
    pub fn is_unknown(&self) -> bool {
        self.words().iter().any(|w| w.get(plane::VALUE_HIGH) != 0)
    }

    /// True if any bit is a known 1.
    pub fn is_not_zero(&self) -> bool {
        self.words()
            .iter()
            .any(|w| w.get(plane::VALUE_LOW) & !w.get(plane::VALUE_HIGH) != 0)
    }

    /// True if a signal has ever been assigned.
    pub fn is_set(&self) -> bool {
        match self.kind().set_plane() {
            Some(p) => self.words().iter().any(|w| w.get(p) != 0),
            None => false,
        }
    }

    /// Low 32 bits of the value plane, sign-extended when the vector is signed.
    pub fn to_int(&self) -> i32 {
        let raw = self.words()[0].get(plane::VALUE_LOW);
        let width = self.width().min(32) as u32;
        if self.is_signed() && width < 32 && raw.bit(width - 1) {
            (raw | !Word::low_mask(width)) as i32
        } else {
            raw as i32
        }
    }

    /// Low 64 bits of the value plane, sign-extended when the vector is signed.
    pub fn to_u64(&self) -> u64 {
        let words = self.words();
        let mut raw = u64::from(words[0].get(plane::VALUE_LOW));
        if let Some(w) = words.get(1) {
            raw |= u64::from(w.get(plane::VALUE_LOW)) << 32;
        }
        let width = self.width().min(64) as u32;
        if self.is_signed() && width < 64 && raw.bit(width - 1) {
            raw |= !u64::low_mask(width);
        }
        raw
    }

    /// Unsigned value of the low plane.
    pub fn to_biguint(&self) -> BigUint {
        Scratch::from_vector(self).to_biguint()
    }

    /// Assign a known integer, truncated to the width.
    pub fn set_int(&mut self, value: i32) -> bool {
        self.set_u64(i64::from(value) as u64)
    }

    pub fn set_u64(&mut self, value: u64) -> bool {
        self.set_biguint(&BigUint::from(value))
    }

    pub fn set_biguint(&mut self, value: &BigUint) -> bool {
        Scratch::from_biguint(self.width(), value).commit(self)
    }

    // ─────────────────────────────────────────────────────────
    //  Combinational evaluation coverage
    // ─────────────────────────────────────────────────────────

    fn or_evals(&mut self, planes: &[(usize, Vec<Word>)]) {
        assert_eq!(self.kind(), Kind::Expression, "eval planes exist only on expressions");
        let mut words = self.words_mut();
        for (p, masks) in planes {
            for (w, m) in words.iter_mut().zip(masks) {
                w.or(*p, *m);
            }
        }
    }

    /// Unary operand: `eval_a` records known 0, `eval_b` known 1.
    pub fn set_unary_evals(&mut self) {
        let s = Scratch::from_vector(self);
        let (zero, one): (Vec<Word>, Vec<Word>) = (0..self.word_count()).map(|i| known_masks(&s, i)).unzip();
        self.or_evals(&[(plane::EVAL_A, zero), (plane::EVAL_B, one)]);
    }

    /// `&`-style coverage: each side 0 on its own, and both 1.
    pub fn set_and_comb_evals(&mut self, left: &Vector, right: &Vector) {
        let (l, r) = (Scratch::from_vector(left), Scratch::from_vector(right));
        let (a, b, c): (Vec<Word>, Vec<Word>, Vec<Word>) = (0..self.word_count())
            .map(|i| {
                let ((l0, l1), (r0, r1)) = (known_masks(&l, i), known_masks(&r, i));
                (l0, r0, l1 & r1)
            })
            .multiunzip();
        self.or_evals(&[(plane::EVAL_A, a), (plane::EVAL_B, b), (plane::EVAL_C, c)]);
    }

    /// `|`-style coverage: each side 1 on its own, and both 0.
    pub fn set_or_comb_evals(&mut self, left: &Vector, right: &Vector) {
        let (l, r) = (Scratch::from_vector(left), Scratch::from_vector(right));
        let (a, b, c): (Vec<Word>, Vec<Word>, Vec<Word>) = (0..self.word_count())
            .map(|i| {
                let ((l0, l1), (r0, r1)) = (known_masks(&l, i), known_masks(&r, i));
                (l1, r1, l0 & r0)
            })
            .multiunzip();
        self.or_evals(&[(plane::EVAL_A, a), (plane::EVAL_B, b), (plane::EVAL_C, c)]);
    }

    /// Full truth table coverage: `eval_a..d` record `00`, `01`, `10`, `11`.
    pub fn set_other_comb_evals(&mut self, left: &Vector, right: &Vector) {
        let (l, r) = (Scratch::from_vector(left), Scratch::from_vector(right));
        let (a, b, c, d): (Vec<Word>, Vec<Word>, Vec<Word>, Vec<Word>) = (0..self.word_count())
            .map(|i| {
                let ((l0, l1), (r0, r1)) = (known_masks(&l, i), known_masks(&r, i));
                (l0 & r0, l0 & r1, l1 & r0, l1 & r1)
            })
            .multiunzip();
        self.or_evals(&[
            (plane::EVAL_A, a),
            (plane::EVAL_B, b),
            (plane::EVAL_C, c),
            (plane::EVAL_D, d),
        ]);
    }

    // ─────────────────────────────────────────────────────────
    //  Coverage readers
    // ─────────────────────────────────────────────────────────

    fn plane_bit(&self, p: usize, index: usize) -> bool {
        assert!(index < self.width(), "bit {index} out of range");
        self.plane(index / WORD_BITS, p).bit((index % WORD_BITS) as u32)
    }

    fn count_planes(&self, planes: &[usize]) -> u32 {
        self.words()
            .iter()
            .map(|w| planes.iter().map(|&p| w.get(p).count_ones()).sum::<u32>())
            .sum()
    }

    pub fn eval_a(&self, index: usize) -> bool {
        self.plane_bit(plane::EVAL_A, index)
    }

    pub fn eval_b(&self, index: usize) -> bool {
        self.plane_bit(plane::EVAL_B, index)
    }

    pub fn eval_c(&self, index: usize) -> bool {
        self.plane_bit(plane::EVAL_C, index)
    }

    pub fn eval_d(&self, index: usize) -> bool {
        self.plane_bit(plane::EVAL_D, index)
    }

    /// Number of set `eval_a` and `eval_b` bits.
    pub fn eval_ab_count(&self) -> u32 {
        self.count_planes(&[plane::EVAL_A, plane::EVAL_B])
    }

    pub fn eval_abc_count(&self) -> u32 {
        self.count_planes(&[plane::EVAL_A, plane::EVAL_B, plane::EVAL_C])
    }

    pub fn eval_abcd_count(&self) -> u32 {
        self.count_planes(&[plane::EVAL_A, plane::EVAL_B, plane::EVAL_C, plane::EVAL_D])
    }

    /// `(toggle_0to1, toggle_1to0)` bit counts; zero for kinds without toggles.
    pub fn toggle_count(&self) -> (u32, u32) {
        match self.kind() {
            Kind::Signal | Kind::Memory => (
                self.count_planes(&[plane::TOGGLE_01]),
                self.count_planes(&[plane::TOGGLE_10]),
            ),
            Kind::Plain | Kind::Expression => (0, 0),
        }
    }

    /// `(written, read)` bit counts of a memory vector.
    pub fn mem_rw_count(&self) -> (u32, u32) {
        assert_eq!(self.kind(), Kind::Memory, "read/write planes exist only on memories");
        (
            self.count_planes(&[plane::MEM_WRITE]),
            self.count_planes(&[plane::MEM_READ]),
        )
    }

    /// Kinds without toggle planes render as all zeros, as in `toggle_count`.
    fn toggle_string(&self, p: usize) -> String {
        if !matches!(self.kind(), Kind::Signal | Kind::Memory) {
            return "0".repeat(self.width());
        }
        let words = self.words();
        (0..self.width())
            .rev()
            .map(|i| {
                let on = words[i / WORD_BITS].get(p).bit((i % WORD_BITS) as u32);
                if on { '1' } else { '0' }
            })
            .join("")
    }

    /// `toggle_0to1` as a binary string, most significant bit first.
    pub fn toggle01_string(&self) -> String {
        self.toggle_string(plane::TOGGLE_01)
    }

    pub fn toggle10_string(&self) -> String {
        self.toggle_string(plane::TOGGLE_10)
    }
}
