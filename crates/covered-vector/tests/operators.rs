use covered_vector::ops::{self, BitwiseOp, CaseOp, CompareOp, ReduceOp, ShiftOp};
use covered_vector::{Bit, Kind, OpError, Vector};
use num_bigint::BigUint;
use proptest::prelude::*;
use test_case::test_case;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------
fn bits(value: &str) -> Vector {
    let mut v = Vector::new(value.len(), Kind::Plain);
    v.vcd_assign(value, value.len() - 1, 0).unwrap();
    v
}

fn known(width: usize, value: u64) -> Vector {
    let mut v = Vector::new(width, Kind::Plain);
    v.set_u64(value);
    v
}

fn wide(width: usize, value: &BigUint) -> Vector {
    let mut v = Vector::new(width, Kind::Plain);
    v.set_biguint(value);
    v
}

fn mask(width: usize) -> u64 {
    if width == 64 { u64::MAX } else { (1u64 << width) - 1 }
}

// ---------------------------------------------------------------------------
// Bitwise truth tables
// ---------------------------------------------------------------------------
#[test_case(BitwiseOp::And,  "0000xxxx1111zzzz", "01xz01xz01xz01xz", "00000xxx01xx0xxx" ; "and")]
#[test_case(BitwiseOp::Or,   "0000xxxx1111zzzz", "01xz01xz01xz01xz", "01xxx1xx1111x1xx" ; "or")]
#[test_case(BitwiseOp::Xor,  "0000xxxx1111zzzz", "01xz01xz01xz01xz", "01xxxxxx10xxxxxx" ; "xor")]
#[test_case(BitwiseOp::Nand, "0000xxxx1111zzzz", "01xz01xz01xz01xz", "11111xxx10xx1xxx" ; "nand")]
#[test_case(BitwiseOp::Nor,  "0000xxxx1111zzzz", "01xz01xz01xz01xz", "10xxx0xx0000x0xx" ; "nor")]
#[test_case(BitwiseOp::Nxor, "0000xxxx1111zzzz", "01xz01xz01xz01xz", "10xxxxxx01xxxxxx" ; "nxor")]
fn test_bitwise_truth_table(op: BitwiseOp, a: &str, b: &str, expected: &str) {
    let mut t = Vector::new(a.len(), Kind::Plain);
    ops::bitwise(&mut t, &bits(a), &bits(b), op);
    assert_eq!(t.to_string(), format!("{}'b{expected}", a.len()));
}

// ---------------------------------------------------------------------------
// Relational and case equality
// ---------------------------------------------------------------------------
#[test_case(CompareOp::Lt, 3, 5, Bit::One)]
#[test_case(CompareOp::Le, 5, 5, Bit::One)]
#[test_case(CompareOp::Gt, 3, 5, Bit::Zero)]
#[test_case(CompareOp::Ge, 6, 5, Bit::One)]
#[test_case(CompareOp::Eq, 5, 5, Bit::One)]
#[test_case(CompareOp::Ne, 5, 5, Bit::Zero)]
fn test_relational_known_operands(op: CompareOp, a: u64, b: u64, expected: Bit) {
    let mut t = Vector::new(1, Kind::Plain);
    ops::compare(&mut t, &known(8, a), &known(8, b), op);
    assert_eq!(t.bit(0), expected);
}

#[test_case(CompareOp::Lt)]
#[test_case(CompareOp::Le)]
#[test_case(CompareOp::Gt)]
#[test_case(CompareOp::Ge)]
#[test_case(CompareOp::Eq)]
#[test_case(CompareOp::Ne)]
fn test_relational_unknown_is_x(op: CompareOp) {
    let mut t = Vector::new(1, Kind::Plain);
    ops::compare(&mut t, &bits("1z00"), &bits("0001"), op);
    assert_eq!(t.bit(0), Bit::X);
    ops::compare(&mut t, &bits("0001"), &bits("x000"), op);
    assert_eq!(t.bit(0), Bit::X);
}

#[test_case(CaseOp::Ceq, "1x0z", "1x0z", Bit::One)]
#[test_case(CaseOp::Ceq, "1x0z", "1z0z", Bit::Zero)]
#[test_case(CaseOp::Cne, "1x0z", "1z0z", Bit::One)]
#[test_case(CaseOp::CaseX, "1x01", "1101", Bit::One)]
#[test_case(CaseOp::CaseX, "1z01", "1101", Bit::One)]
#[test_case(CaseOp::CaseZ, "1z01", "1101", Bit::One)]
#[test_case(CaseOp::CaseZ, "1x01", "1101", Bit::Zero)]
fn test_case_equality_never_x(op: CaseOp, a: &str, b: &str, expected: Bit) {
    let mut t = Vector::new(1, Kind::Plain);
    ops::case_compare(&mut t, &bits(a), &bits(b), op);
    assert_eq!(t.bit(0), expected);
}

#[test]
fn test_relational_result_fills_wide_target() {
    let mut t = Vector::new(4, Kind::Signal);
    ops::compare(&mut t, &known(8, 1), &known(8, 2), CompareOp::Lt);
    assert_eq!(t.to_string(), "4'b0001");
}

// ---------------------------------------------------------------------------
// Reductions
// ---------------------------------------------------------------------------
#[test_case(ReduceOp::And,  "1111", Bit::One)]
#[test_case(ReduceOp::And,  "11x1", Bit::X)]
#[test_case(ReduceOp::And,  "01x1", Bit::Zero)]
#[test_case(ReduceOp::Nand, "1111", Bit::Zero)]
#[test_case(ReduceOp::Or,   "0000", Bit::Zero)]
#[test_case(ReduceOp::Or,   "00z0", Bit::X)]
#[test_case(ReduceOp::Nor,  "0100", Bit::Zero)]
#[test_case(ReduceOp::Xor,  "0111", Bit::One)]
#[test_case(ReduceOp::Nxor, "0111", Bit::Zero)]
#[test_case(ReduceOp::Not,  "0000", Bit::One)]
fn test_reductions(op: ReduceOp, src: &str, expected: Bit) {
    let mut t = Vector::new(1, Kind::Plain);
    ops::reduce(&mut t, &bits(src), op);
    assert_eq!(t.bit(0), expected);
}

#[test]
fn test_and_reduce_ignores_bits_past_width() {
    let mut t = Vector::new(1, Kind::Plain);
    ops::reduce(&mut t, &known(33, (1 << 33) - 1), ReduceOp::And);
    assert_eq!(t.bit(0), Bit::One);
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------
#[test]
fn test_divide_by_zero_is_fatal() {
    let mut t = Vector::new(8, Kind::Plain);
    assert_eq!(
        ops::divide(&mut t, &known(8, 10), &known(8, 0)),
        Err(OpError::DivisionByZero)
    );
    assert_eq!(
        ops::modulus(&mut t, &known(8, 10), &known(8, 0)),
        Err(OpError::ModulusByZero)
    );
    // the target is left untouched
    assert_eq!(t.to_u64(), 0);
}

#[test_case("add")]
#[test_case("subtract")]
#[test_case("multiply")]
#[test_case("divide")]
#[test_case("modulus")]
fn test_unknown_operand_poisons_arithmetic(op: &str) {
    let mut t = known(8, 0x55);
    let (a, b) = (bits("0000001z"), known(8, 3));
    match op {
        "add" => {
            ops::add(&mut t, &a, &b);
        }
        "subtract" => {
            ops::subtract(&mut t, &a, &b);
        }
        "multiply" => {
            ops::multiply(&mut t, &a, &b);
        }
        "divide" => {
            ops::divide(&mut t, &a, &b).unwrap();
        }
        _ => {
            ops::modulus(&mut t, &a, &b).unwrap();
        }
    }
    assert_eq!(t.to_string(), "8'bxxxxxxxx");
}

#[test]
fn test_carry_straddles_word_boundary() {
    for width in [31usize, 32, 33, 63, 64, 65] {
        let a = wide(width, &((BigUint::from(1u8) << (width - 1)) - 1u8));
        let mut t = Vector::new(width, Kind::Plain);
        ops::add(&mut t, &a, &a);
        let expected = ((BigUint::from(1u8) << width) - 2u8) % (BigUint::from(1u8) << width);
        assert_eq!(t.to_biguint(), expected, "width {width}");
    }
}

proptest! {
    #[test]
    fn test_narrow_arithmetic_matches_native(width in 1usize..=32, a in any::<u32>(), b in any::<u32>()) {
        let m = mask(width);
        let (a, b) = (u64::from(a) & m, u64::from(b) & m);
        let (va, vb) = (known(width, a), known(width, b));
        let mut t = Vector::new(width, Kind::Plain);

        ops::add(&mut t, &va, &vb);
        prop_assert_eq!(t.to_u64(), a.wrapping_add(b) & m);
        ops::subtract(&mut t, &va, &vb);
        prop_assert_eq!(t.to_u64(), a.wrapping_sub(b) & m);
        ops::multiply(&mut t, &va, &vb);
        prop_assert_eq!(t.to_u64(), a.wrapping_mul(b) & m);
        if b != 0 {
            ops::divide(&mut t, &va, &vb).unwrap();
            prop_assert_eq!(t.to_u64(), a / b);
            ops::modulus(&mut t, &va, &vb).unwrap();
            prop_assert_eq!(t.to_u64(), a % b);
        }
    }

    #[test]
    fn test_wide_arithmetic_matches_bigint(
        width in 33usize..=200,
        a in proptest::collection::vec(any::<u32>(), 7),
        b in proptest::collection::vec(any::<u32>(), 7),
    ) {
        let modulus = BigUint::from(1u8) << width;
        let a = BigUint::from_slice(&a) % &modulus;
        let b = BigUint::from_slice(&b) % &modulus;
        let (va, vb) = (wide(width, &a), wide(width, &b));
        let mut t = Vector::new(width, Kind::Plain);

        ops::add(&mut t, &va, &vb);
        prop_assert_eq!(t.to_biguint(), (&a + &b) % &modulus);
        ops::subtract(&mut t, &va, &vb);
        prop_assert_eq!(t.to_biguint(), (&a + &modulus - &b) % &modulus);
        ops::multiply(&mut t, &va, &vb);
        prop_assert_eq!(t.to_biguint(), (&a * &b) % &modulus);
    }

    #[test]
    fn test_shifts_match_native(width in 1usize..=32, a in any::<u32>(), n in 0u64..40) {
        let m = mask(width);
        let a = u64::from(a) & m;
        let mut t = Vector::new(width, Kind::Plain);
        ops::shift(&mut t, &known(width, a), &known(8, n), ShiftOp::Left);
        let expected = if n >= width as u64 { 0 } else { (a << n) & m };
        prop_assert_eq!(t.to_u64(), expected);
        ops::shift(&mut t, &known(width, a), &known(8, n), ShiftOp::Right);
        let expected = if n >= width as u64 { 0 } else { a >> n };
        prop_assert_eq!(t.to_u64(), expected);
    }
}

// ---------------------------------------------------------------------------
// Structural
// ---------------------------------------------------------------------------
#[test]
fn test_concatenation_spans_words() {
    let mut t = Vector::new(64, Kind::Plain);
    ops::concat(&mut t, &known(32, 0xdead_beef), &known(32, 0x0123_4567));
    assert_eq!(t.to_u64(), 0xdead_beef_0123_4567);
}

#[test]
fn test_replication_with_unknown_count_is_x() {
    let mut t = Vector::new(4, Kind::Plain);
    ops::expand(&mut t, &bits("x1"), &bits("1"));
    assert_eq!(t.to_string(), "4'bxxxx");
    ops::expand(&mut t, &known(3, 4), &bits("1"));
    assert_eq!(t.to_string(), "4'b1111");
}

#[test]
fn test_logical_not_and_inversion() {
    let mut t = Vector::new(1, Kind::Plain);
    ops::logical(&mut t, &bits("x0"), &bits("10"), ops::LogicalOp::Or);
    assert_eq!(t.bit(0), Bit::One);
    ops::logical(&mut t, &bits("x0"), &bits("00"), ops::LogicalOp::Or);
    assert_eq!(t.bit(0), Bit::X);
    let mut inv = Vector::new(4, Kind::Plain);
    ops::unary_inv(&mut inv, &bits("1z00"));
    assert_eq!(inv.to_string(), "4'b0x11");
}
