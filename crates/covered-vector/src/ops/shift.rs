use super::operand;
use crate::{Scratch, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftOp {
    /// `<<` and `<<<`
    Left,
    /// `>>`
    Right,
    /// `>>>`: fills from the operand's most significant bit.
    ArithmeticRight,
}

/// Shift `left` by the amount held in `right`.
///
/// An unknown bit anywhere in the amount makes the whole result `x`. The
/// operand is first extended to the target width, sign-extending when it is
/// signed (always for an arithmetic right shift).
pub fn shift(tgt: &mut Vector, left: &Vector, right: &Vector, op: ShiftOp) -> bool {
    let amount = Scratch::from_vector(right);
    if amount.has_unknown() {
        return tgt.set_to_x();
    }
    let n = amount.to_count();
    let width = tgt.width().max(left.width());
    let sign_extend = left.is_signed() || op == ShiftOp::ArithmeticRight;
    let value = operand(left, width, sign_extend);
    let shifted = match op {
        ShiftOp::Left => value.shifted_left(n),
        ShiftOp::Right => value.shifted_right(n),
        ShiftOp::ArithmeticRight => {
            let mut s = value.shifted_right(n);
            let (fill_low, fill_high) = value.msb().planes();
            s.fill_range(width.saturating_sub(n), width, fill_low, fill_high);
            s
        }
    };
    shifted.commit(tgt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kind;

    fn plain(bits: &str) -> Vector {
        let mut v = Vector::new(bits.len(), Kind::Plain);
        v.vcd_assign(bits, bits.len() - 1, 0).unwrap();
        v
    }

    #[test]
    fn unknown_amount_poisons_result() {
        let mut t = Vector::new(4, Kind::Plain);
        shift(&mut t, &plain("0110"), &plain("0x"), ShiftOp::Left);
        assert_eq!(t.to_string(), "4'bxxxx");
    }

    #[test]
    fn shifts_fill_per_operator() {
        let mut t = Vector::new(4, Kind::Plain);
        shift(&mut t, &plain("1011"), &plain("01"), ShiftOp::Left);
        assert_eq!(t.to_string(), "4'b0110");
        shift(&mut t, &plain("1011"), &plain("01"), ShiftOp::Right);
        assert_eq!(t.to_string(), "4'b0101");
        shift(&mut t, &plain("1011"), &plain("01"), ShiftOp::ArithmeticRight);
        assert_eq!(t.to_string(), "4'b1101");
        shift(&mut t, &plain("z011"), &plain("10"), ShiftOp::ArithmeticRight);
        assert_eq!(t.to_string(), "4'bzzz0");
    }

    #[test]
    fn oversized_amount_clears_or_fills() {
        let mut t = Vector::new(4, Kind::Plain);
        shift(&mut t, &plain("1011"), &plain("111"), ShiftOp::Left);
        assert_eq!(t.to_string(), "4'b0000");
        shift(&mut t, &plain("1011"), &plain("111"), ShiftOp::ArithmeticRight);
        assert_eq!(t.to_string(), "4'b1111");
    }
}
