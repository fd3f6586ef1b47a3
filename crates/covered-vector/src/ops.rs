//! Four-state operators.
//!
//! Every operator takes already-allocated operand vectors and a target,
//! computes into a [`Scratch`] sized to the target and commits the result
//! through [`Vector::set_coverage_and_assign`]. The returned `bool` reports
//! whether the target's value changed.

mod arith;
mod bitwise;
mod compare;
mod reduce;
mod shift;
mod structural;

pub use arith::{add, dec, divide, inc, modulus, multiply, negate, subtract};
pub use bitwise::{BitwiseOp, bitwise, unary_inv};
pub use compare::{CaseOp, CompareOp, LogicalOp, case_compare, compare, logical};
pub use reduce::{ReduceOp, reduce};
pub use shift::{ShiftOp, shift};
pub use structural::{concat, expand, part_assign, part_select};

use crate::{Bit, Scratch, Vector};

/// Both operands are treated as signed only when both are declared signed.
pub(crate) fn both_signed(left: &Vector, right: &Vector) -> bool {
    left.is_signed() && right.is_signed()
}

/// Commit a single result bit, zero-extended over the whole target.
pub(crate) fn commit_bit(tgt: &mut Vector, bit: Bit) -> bool {
    let mut s = Scratch::zeroed(tgt.width());
    s.set_bit(0, bit);
    s.commit(tgt)
}

/// Snapshot `v` at `width` bits, sign-extending when `sign_extend` is set.
pub(crate) fn operand(v: &Vector, width: usize, sign_extend: bool) -> Scratch {
    Scratch::from_vector(v).resized(width, sign_extend)
}
