use std::cmp::Ordering;

use super::{both_signed, commit_bit, operand};
use crate::scratch::Truth;
use crate::{Bit, Scratch, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// Case equality family; never produces `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseOp {
    /// `===`
    Ceq,
    /// `!==`
    Cne,
    /// `casex` item match: `x` or `z` in either operand is a wildcard.
    CaseX,
    /// `casez` item match: `z` in either operand is a wildcard.
    CaseZ,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

impl CompareOp {
    fn holds(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Lt => ord.is_lt(),
            CompareOp::Le => ord.is_le(),
            CompareOp::Gt => ord.is_gt(),
            CompareOp::Ge => ord.is_ge(),
            CompareOp::Eq => ord.is_eq(),
            CompareOp::Ne => ord.is_ne(),
        }
    }
}

/// Order two known values of equal width, most significant word first.
fn order(a: &Scratch, b: &Scratch, signed: bool) -> Ordering {
    if signed {
        match (a.msb(), b.msb()) {
            (Bit::One, Bit::Zero) => return Ordering::Less,
            (Bit::Zero, Bit::One) => return Ordering::Greater,
            _ => {}
        }
    }
    a.low().iter().rev().cmp(b.low().iter().rev())
}

/// Relational and logical equality operators.
///
/// Any unknown bit in either operand makes the result `x`.
pub fn compare(tgt: &mut Vector, left: &Vector, right: &Vector, op: CompareOp) -> bool {
    let signed = both_signed(left, right);
    let width = left.width().max(right.width());
    let a = operand(left, width, signed);
    let b = operand(right, width, signed);
    let bit = if a.has_unknown() || b.has_unknown() {
        Bit::X
    } else if op.holds(order(&a, &b, signed)) {
        Bit::One
    } else {
        Bit::Zero
    };
    commit_bit(tgt, bit)
}

/// Case equality operators; `x` and `z` compare as literal values.
pub fn case_compare(tgt: &mut Vector, left: &Vector, right: &Vector, op: CaseOp) -> bool {
    let width = left.width().max(right.width());
    let a = operand(left, width, false);
    let b = operand(right, width, false);
    let equal = (0..a.low().len()).all(|i| {
        let (la, ha) = a.word(i);
        let (lb, hb) = b.word(i);
        let wildcard = match op {
            CaseOp::Ceq | CaseOp::Cne => 0,
            CaseOp::CaseX => ha | hb,
            CaseOp::CaseZ => (la & ha) | (lb & hb),
        };
        ((la ^ lb) | (ha ^ hb)) & !wildcard == 0
    });
    let matched = if op == CaseOp::Cne { !equal } else { equal };
    commit_bit(tgt, if matched { Bit::One } else { Bit::Zero })
}

/// `&&` and `||` over the truth of each whole operand.
pub fn logical(tgt: &mut Vector, left: &Vector, right: &Vector, op: LogicalOp) -> bool {
    let a = Scratch::from_vector(left).truth();
    let b = Scratch::from_vector(right).truth();
    let bit = match (op, a, b) {
        (LogicalOp::And, Truth::False, _) | (LogicalOp::And, _, Truth::False) => Bit::Zero,
        (LogicalOp::And, Truth::True, Truth::True) => Bit::One,
        (LogicalOp::Or, Truth::True, _) | (LogicalOp::Or, _, Truth::True) => Bit::One,
        (LogicalOp::Or, Truth::False, Truth::False) => Bit::Zero,
        _ => Bit::X,
    };
    commit_bit(tgt, bit)
}
