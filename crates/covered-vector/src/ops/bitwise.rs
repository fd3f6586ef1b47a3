use super::operand;
use crate::vector::Word;
use crate::{Scratch, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitwiseOp {
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Nxor,
}

impl BitwiseOp {
    /// `(known_one, known_zero)` result masks for one word pair.
    ///
    /// Bits in neither mask are X.
    fn fold(self, (la, ha): (Word, Word), (lb, hb): (Word, Word)) -> (Word, Word) {
        let (k1a, k0a) = (la & !ha, !la & !ha);
        let (k1b, k0b) = (lb & !hb, !lb & !hb);
        let unknown = ha | hb;
        match self {
            BitwiseOp::And => (k1a & k1b, k0a | k0b),
            BitwiseOp::Nand => (k0a | k0b, k1a & k1b),
            BitwiseOp::Or => (k1a | k1b, k0a & k0b),
            BitwiseOp::Nor => (k0a & k0b, k1a | k1b),
            BitwiseOp::Xor => ((la ^ lb) & !unknown, !(la ^ lb) & !unknown),
            BitwiseOp::Nxor => (!(la ^ lb) & !unknown, (la ^ lb) & !unknown),
        }
    }
}

/// Per-bit `&`, `~&`, `|`, `~|`, `^` or `~^` of `left` and `right`.
///
/// Operands narrower than the target are zero-extended on both planes.
pub fn bitwise(tgt: &mut Vector, left: &Vector, right: &Vector, op: BitwiseOp) -> bool {
    let width = tgt.width();
    let a = operand(left, width, false);
    let b = operand(right, width, false);
    let mut out = Scratch::zeroed(width);
    for (i, (low, high)) in out.low.iter_mut().zip(out.high.iter_mut()).enumerate() {
        let (one, zero) = op.fold(a.word(i), b.word(i));
        *low = one;
        *high = !(one | zero);
    }
    out.mask_top();
    out.commit(tgt)
}

/// Bitwise `~`: known bits invert, `x` and `z` both become `x`.
pub fn unary_inv(tgt: &mut Vector, src: &Vector) -> bool {
    let width = tgt.width();
    let a = operand(src, width, src.is_signed());
    let mut out = Scratch::zeroed(width);
    for (i, (low, high)) in out.low.iter_mut().zip(out.high.iter_mut()).enumerate() {
        let (l, h) = a.word(i);
        *low = !l & !h;
        *high = h;
    }
    out.mask_top();
    out.commit(tgt)
}
