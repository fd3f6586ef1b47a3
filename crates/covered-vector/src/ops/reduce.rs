use super::commit_bit;
use crate::scratch::Truth;
use crate::vector::Word;
use crate::word::top_mask;
use crate::{Bit, Scratch, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Nxor,
    /// Logical `!`
    Not,
}

fn invert(bit: Bit) -> Bit {
    match bit {
        Bit::Zero => Bit::One,
        Bit::One => Bit::Zero,
        _ => Bit::X,
    }
}

fn fold(s: &Scratch, op: ReduceOp) -> Bit {
    let mut any_zero = false;
    let mut any_one = false;
    let mut parity = 0u32;
    for i in 0..s.low().len() {
        let (l, h) = s.word(i);
        any_one |= l & !h != 0;
        parity ^= l.count_ones() & 1;
        if i + 1 == s.low().len() {
            let valid = top_mask::<Word>(s.width());
            any_zero |= !l & !h & valid != 0;
        } else {
            any_zero |= !l & !h != 0;
        }
    }
    let unknown = s.has_unknown();
    let and = if any_zero {
        Bit::Zero
    } else if unknown {
        Bit::X
    } else {
        Bit::One
    };
    let or = if any_one {
        Bit::One
    } else if unknown {
        Bit::X
    } else {
        Bit::Zero
    };
    let xor = match (unknown, parity) {
        (true, _) => Bit::X,
        (false, 0) => Bit::Zero,
        (false, _) => Bit::One,
    };
    match op {
        ReduceOp::And => and,
        ReduceOp::Nand => invert(and),
        ReduceOp::Or => or,
        ReduceOp::Nor => invert(or),
        ReduceOp::Xor => xor,
        ReduceOp::Nxor => invert(xor),
        ReduceOp::Not => match s.truth() {
            Truth::True => Bit::Zero,
            Truth::False => Bit::One,
            Truth::Unknown => Bit::X,
        },
    }
}

/// Fold every bit of `src` into one result bit.
pub fn reduce(tgt: &mut Vector, src: &Vector, op: ReduceOp) -> bool {
    let bit = fold(&Scratch::from_vector(src), op);
    commit_bit(tgt, bit)
}
