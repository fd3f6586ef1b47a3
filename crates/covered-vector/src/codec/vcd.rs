use crate::{Bit, LiteralError, Scratch, Vector};

impl Vector {
    /// Assign a VCD binary value change to bits `lsb..=msb`.
    ///
    /// Characters (`0`, `1`, `x`, `z`, either case) are most significant
    /// first. Bits above the string are left-extended: `0` and `1` extend
    /// with `0`, `x` with `x`, `z` with `z`. Characters beyond `msb` are
    /// dropped.
    pub fn vcd_assign(&mut self, value: &str, msb: usize, lsb: usize) -> Result<bool, LiteralError> {
        assert!(
            lsb <= msb && msb < self.width(),
            "value change range [{msb}:{lsb}] outside {}-bit vector",
            self.width()
        );
        let bits = value
            .chars()
            .map(|c| {
                Bit::from_char(c)
                    .ok_or_else(|| LiteralError::Malformed(format!("invalid value change `{value}`")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let Some(&leading) = bits.first() else {
            return Err(LiteralError::Malformed("empty value change".into()));
        };

        let mut s = Scratch::zeroed(self.width());
        let mut pos = lsb;
        for &bit in bits.iter().rev() {
            if pos > msb {
                break;
            }
            s.set_bit(pos, bit);
            pos += 1;
        }
        if pos <= msb {
            let fill = match leading {
                Bit::X | Bit::Z => leading,
                Bit::Zero | Bit::One => Bit::Zero,
            };
            let (l, h) = fill.planes();
            s.fill_range(pos, msb + 1, l, h);
        }
        Ok(self.set_coverage_and_assign(s.low(), s.high(), lsb, msb))
    }
}
