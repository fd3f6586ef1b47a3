//! Two's complement arithmetic.
//!
//! Any unknown operand bit makes the whole result `x`. Results wrap silently
//! to the target width.

use log::error;
use num_bigint::{BigInt, BigUint};

use super::{both_signed, operand};
use crate::vector::{WORD_BITS, Word};
use crate::{OpError, Scratch, Vector};

/// Word-wise ripple carry of `a + b + carry_in`, at the width of `a`.
fn ripple_add(a: &Scratch, b: &Scratch, carry_in: bool) -> Scratch {
    let mut out = Scratch::zeroed(a.width());
    let mut carry = u64::from(carry_in);
    for (i, dst) in out.low.iter_mut().enumerate() {
        let sum = u64::from(a.word(i).0) + u64::from(b.word(i).0) + carry;
        *dst = sum as Word;
        carry = sum >> WORD_BITS;
    }
    out.mask_top();
    out
}

fn complement(a: &Scratch) -> Scratch {
    let mut out = a.clone();
    for l in out.low.iter_mut() {
        *l = !*l;
    }
    out.mask_top();
    out
}

/// Schoolbook product truncated to the width of `a`.
fn schoolbook(a: &Scratch, b: &Scratch) -> Scratch {
    let n = a.low().len();
    let mut acc = vec![0u64; n];
    for i in 0..n {
        let ai = u64::from(a.word(i).0);
        if ai == 0 {
            continue;
        }
        let mut carry = 0u64;
        for j in 0..n - i {
            let cur = acc[i + j] + ai * u64::from(b.word(j).0) + carry;
            acc[i + j] = cur & u64::from(Word::MAX);
            carry = cur >> WORD_BITS;
        }
    }
    let mut out = Scratch::zeroed(a.width());
    for (dst, src) in out.low.iter_mut().zip(acc) {
        *dst = src as Word;
    }
    out.mask_top();
    out
}

/// Both operands at the target width, sign-extended when both are signed.
fn operands(tgt: &Vector, left: &Vector, right: &Vector) -> (Scratch, Scratch) {
    let signed = both_signed(left, right);
    let width = tgt.width();
    (operand(left, width, signed), operand(right, width, signed))
}

pub fn add(tgt: &mut Vector, left: &Vector, right: &Vector) -> bool {
    let (a, b) = operands(tgt, left, right);
    if a.has_unknown() || b.has_unknown() {
        return tgt.set_to_x();
    }
    ripple_add(&a, &b, false).commit(tgt)
}

pub fn subtract(tgt: &mut Vector, left: &Vector, right: &Vector) -> bool {
    let (a, b) = operands(tgt, left, right);
    if a.has_unknown() || b.has_unknown() {
        return tgt.set_to_x();
    }
    ripple_add(&a, &complement(&b), true).commit(tgt)
}

pub fn multiply(tgt: &mut Vector, left: &Vector, right: &Vector) -> bool {
    let (a, b) = operands(tgt, left, right);
    if a.has_unknown() || b.has_unknown() {
        return tgt.set_to_x();
    }
    schoolbook(&a, &b).commit(tgt)
}

/// Two's complement negation of `src`.
pub fn negate(tgt: &mut Vector, src: &Vector) -> bool {
    let a = operand(src, tgt.width(), src.is_signed());
    if a.has_unknown() {
        return tgt.set_to_x();
    }
    let zero = Scratch::zeroed(tgt.width());
    ripple_add(&zero, &complement(&a), true).commit(tgt)
}

/// Increment `tgt` in place.
pub fn inc(tgt: &mut Vector) -> bool {
    let a = Scratch::from_vector(tgt);
    if a.has_unknown() {
        return tgt.set_to_x();
    }
    ripple_add(&a, &Scratch::zeroed(a.width()), true).commit(tgt)
}

/// Decrement `tgt` in place.
pub fn dec(tgt: &mut Vector) -> bool {
    let a = Scratch::from_vector(tgt);
    if a.has_unknown() {
        return tgt.set_to_x();
    }
    let ones = complement(&Scratch::zeroed(a.width()));
    ripple_add(&a, &ones, false).commit(tgt)
}

#[derive(Clone, Copy)]
enum DivKind {
    Quotient,
    Remainder,
}

fn divrem(tgt: &mut Vector, left: &Vector, right: &Vector, kind: DivKind) -> Result<bool, OpError> {
    let a = Scratch::from_vector(left);
    let b = Scratch::from_vector(right);
    if a.has_unknown() || b.has_unknown() {
        return Ok(tgt.set_to_x());
    }
    if !b.is_not_zero() {
        let err = match kind {
            DivKind::Quotient => OpError::DivisionByZero,
            DivKind::Remainder => OpError::ModulusByZero,
        };
        error!("{err}: {left} by {right}");
        return Err(err);
    }
    let width = tgt.width();
    let result = if both_signed(left, right) {
        let (x, y): (BigInt, BigInt) = (a.to_bigint(), b.to_bigint());
        let r = match kind {
            DivKind::Quotient => x / y,
            DivKind::Remainder => x % y,
        };
        Scratch::from_bigint(width, &r)
    } else {
        let (x, y): (BigUint, BigUint) = (a.to_biguint(), b.to_biguint());
        let r = match kind {
            DivKind::Quotient => x / y,
            DivKind::Remainder => x % y,
        };
        Scratch::from_biguint(width, &r)
    };
    Ok(result.commit(tgt))
}

/// `left / right`. A known zero divisor is fatal for the run.
pub fn divide(tgt: &mut Vector, left: &Vector, right: &Vector) -> Result<bool, OpError> {
    divrem(tgt, left, right, DivKind::Quotient)
}

/// `left % right`; the remainder takes the sign of the dividend.
pub fn modulus(tgt: &mut Vector, left: &Vector, right: &Vector) -> Result<bool, OpError> {
    divrem(tgt, left, right, DivKind::Remainder)
}
