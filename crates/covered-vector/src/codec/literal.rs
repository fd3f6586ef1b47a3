//! Verilog integer and string literals.

use std::str::FromStr;

use itertools::Itertools;
use log::warn;
use num_bigint::BigUint;

use crate::{Bit, Kind, LiteralError, MAX_BIT_WIDTH, Scratch, Vector};

/// Radix a literal was written in, or should be printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    Binary,
    Octal,
    Hex,
    Decimal,
    /// Quoted string, eight bits per character.
    QString,
}

impl Base {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'b' => Some(Base::Binary),
            'o' => Some(Base::Octal),
            'h' => Some(Base::Hex),
            'd' => Some(Base::Decimal),
            _ => None,
        }
    }

    fn bits_per_digit(self) -> usize {
        match self {
            Base::Binary => 1,
            Base::Octal => 3,
            Base::Hex => 4,
            Base::Decimal | Base::QString => unreachable!("no fixed digit width for {self:?}"),
        }
    }

    fn letter(self) -> char {
        match self {
            Base::Binary => 'b',
            Base::Octal => 'o',
            Base::Hex => 'h',
            Base::Decimal => 'd',
            Base::QString => unreachable!("strings have no radix letter"),
        }
    }
}

fn check_width(width: usize) -> Result<usize, LiteralError> {
    if width == 0 {
        return Err(LiteralError::ZeroWidth);
    }
    if width > MAX_BIT_WIDTH {
        warn!("literal width {width} exceeds maximum of {MAX_BIT_WIDTH}");
        return Err(LiteralError::TooWide { width });
    }
    Ok(width)
}

fn digit_bits(c: char, base: Base) -> Option<Result<u32, Bit>> {
    match c {
        'x' | 'X' => Some(Err(Bit::X)),
        'z' | 'Z' | '?' => Some(Err(Bit::Z)),
        _ => {
            let radix = 1 << base.bits_per_digit();
            c.to_digit(radix).map(Ok)
        }
    }
}

/// Fill `s` from a string of based digits, least significant digit last.
fn fill_based(s: &mut Scratch, digits: &str, base: Base) -> Result<(), LiteralError> {
    let per = base.bits_per_digit();
    let mut pos = 0;
    let mut leading = None;
    for c in digits.chars().rev() {
        let bits = digit_bits(c, base)
            .ok_or_else(|| LiteralError::Malformed(format!("invalid digit `{c}` in {digits}")))?;
        for i in 0..per {
            if pos + i < s.width() {
                let bit = match bits {
                    Ok(v) if (v >> i) & 1 == 1 => Bit::One,
                    Ok(_) => Bit::Zero,
                    Err(b) => b,
                };
                s.set_bit(pos + i, bit);
            }
        }
        pos += per;
        leading = Some(bits);
    }
    // x and z in the leftmost digit extend to the full width
    if let Some(Err(fill)) = leading {
        let (l, h) = fill.planes();
        s.fill_range(pos.min(s.width()), s.width(), l, h);
    }
    Ok(())
}

fn fill_decimal(s: &mut Scratch, digits: &str) -> Result<(), LiteralError> {
    match digits {
        "x" | "X" => *s = Scratch::unknown(s.width()),
        "z" | "Z" | "?" => {
            let w = s.width();
            s.fill_range(0, w, true, true);
        }
        _ => {
            let value = BigUint::parse_bytes(digits.as_bytes(), 10)
                .ok_or_else(|| LiteralError::Malformed(format!("invalid decimal digits `{digits}`")))?;
            *s = Scratch::from_biguint(s.width(), &value);
        }
    }
    Ok(())
}

impl Vector {
    /// Parse a sized, unsized or plain decimal Verilog literal, or a quoted
    /// string, into a new plain vector.
    pub fn from_literal(text: &str) -> Result<(Vector, Base), LiteralError> {
        let text = text.trim();
        if let Some(inner) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
            return Ok((Vector::from_quoted(inner)?, Base::QString));
        }

        let (size, rest, signed) = match text.split_once('\'') {
            Some((size, rest)) => {
                let size = size.trim().replace('_', "");
                let width = if size.is_empty() {
                    32
                } else {
                    size.parse::<usize>()
                        .map_err(|_| LiteralError::Malformed(format!("invalid size in `{text}`")))?
                };
                let (signed, rest) = match rest.strip_prefix(['s', 'S']) {
                    Some(r) => (true, r),
                    None => (false, rest),
                };
                (width, rest, signed)
            }
            // plain decimal
            None => (32, "", true),
        };
        let width = check_width(size)?;

        let (base, digits) = if rest.is_empty() && !text.contains('\'') {
            (Base::Decimal, text)
        } else {
            let mut chars = rest.chars();
            let base = chars
                .next()
                .and_then(Base::from_char)
                .ok_or_else(|| LiteralError::Malformed(format!("missing radix in `{text}`")))?;
            (base, chars.as_str())
        };
        let digits: String = digits.trim().chars().filter(|&c| c != '_').collect();
        if digits.is_empty() {
            return Err(LiteralError::Malformed(format!("no digits in `{text}`")));
        }

        let mut s = Scratch::zeroed(width);
        match base {
            Base::Decimal => fill_decimal(&mut s, &digits)?,
            _ => fill_based(&mut s, &digits, base)?,
        }
        let mut vec = Vector::new(width, Kind::Plain).signed(signed);
        s.commit(&mut vec);
        Ok((vec, base))
    }

    /// Pack a string eight bits per character, first character most significant.
    pub fn from_quoted(text: &str) -> Result<Vector, LiteralError> {
        let bytes = text.as_bytes();
        let width = check_width(bytes.len() * 8)?;
        let value = BigUint::from_bytes_be(bytes);
        let mut vec = Vector::new(width, Kind::Plain);
        vec.set_biguint(&value);
        Ok(vec)
    }

    /// Render the value in the given radix.
    ///
    /// Binary, octal and hex produce a sized literal with leading zero digits
    /// suppressed. A digit made only of `x` (or only of `z`) prints as a lower
    /// case letter; a digit mixing unknown and known bits prints upper case.
    pub fn to_radix_string(&self, base: Base) -> String {
        let s = Scratch::from_vector(self);
        match base {
            Base::QString => quoted_string(&s),
            Base::Decimal => decimal_string(&s, self.is_signed()),
            _ => {
                let sign = if self.is_signed() { "s" } else { "" };
                format!("{}'{}{}{}", self.width(), sign, base.letter(), based_digits(&s, base))
            }
        }
    }
}

fn unknown_char(bits: &[Bit]) -> Option<char> {
    let x = bits.iter().filter(|b| **b == Bit::X).count();
    let z = bits.iter().filter(|b| **b == Bit::Z).count();
    match (x, z) {
        (0, 0) => None,
        (n, 0) if n == bits.len() => Some('x'),
        (0, n) if n == bits.len() => Some('z'),
        (n, _) if n > 0 => Some('X'),
        _ => Some('Z'),
    }
}

fn based_digits(s: &Scratch, base: Base) -> String {
    let per = base.bits_per_digit();
    let groups = s.width().div_ceil(per);
    let mut out = String::with_capacity(groups);
    for g in (0..groups).rev() {
        let bits: Vec<Bit> = (g * per..((g + 1) * per).min(s.width())).map(|i| s.bit(i)).collect();
        let c = match unknown_char(&bits) {
            Some(c) => c,
            None => {
                let value = bits
                    .iter()
                    .enumerate()
                    .fold(0, |acc, (i, b)| acc | (u32::from(*b == Bit::One) << i));
                char::from_digit(value, 16).unwrap_or('?')
            }
        };
        if c == '0' && out.is_empty() && g != 0 {
            continue;
        }
        out.push(c);
    }
    out
}

fn decimal_string(s: &Scratch, signed: bool) -> String {
    if s.has_unknown() {
        let bits: Vec<Bit> = (0..s.width()).map(|i| s.bit(i)).collect();
        return unknown_char(&bits).unwrap_or('x').to_string();
    }
    if signed {
        s.to_bigint().to_string()
    } else {
        s.to_biguint().to_string()
    }
}

fn quoted_string(s: &Scratch) -> String {
    let bytes = s.width().div_ceil(8);
    (0..bytes)
        .rev()
        .map(|k| {
            (0..8)
                .filter(|&i| s.bit(k * 8 + i) == Bit::One)
                .fold(0u8, |acc, i| acc | (1 << i))
        })
        .skip_while(|&b| b == 0)
        .map(char::from)
        .join("")
}

impl FromStr for Vector {
    type Err = LiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Vector::from_literal(s).map(|(v, _)| v)
    }
}
