//! Pure bit rearrangement: part-select, replication and concatenation.

use crate::vector::{WORD_BITS, Word};
use crate::word::{PlaneWord, plane};
use crate::{Kind, Scratch, Vector};

fn check_range(v: &Vector, lsb: usize, msb: usize) {
    assert!(
        lsb <= msb && msb < v.width(),
        "part-select [{msb}:{lsb}] outside {}-bit vector",
        v.width()
    );
}

/// Set `read` for bits `lsb..=msb` of a memory vector.
fn mark_read(mem: &Vector, lsb: usize, msb: usize) {
    let (first, last) = (lsb / WORD_BITS, msb / WORD_BITS);
    let mut words = mem.words_mut();
    for (i, w) in words.iter_mut().enumerate().take(last + 1).skip(first) {
        let lo = if i == first { (lsb % WORD_BITS) as u32 } else { 0 };
        let hi = if i == last {
            (msb % WORD_BITS) as u32
        } else {
            Word::BITS - 1
        };
        w.or(plane::MEM_READ, Word::range_mask(lo, hi));
    }
}

/// `tgt = src[msb:lsb]`, zero-extended or truncated to the target width.
///
/// Selecting out of a memory vector records the selected bits as read.
pub fn part_select(tgt: &mut Vector, src: &Vector, lsb: usize, msb: usize) -> bool {
    check_range(src, lsb, msb);
    let selected = Scratch::from_vector(src)
        .shifted_right(lsb)
        .resized(msb - lsb + 1, false);
    if src.kind() == Kind::Memory {
        mark_read(src, lsb, msb);
    }
    selected.commit(tgt)
}

/// `tgt[msb:lsb] = src`, extending `src` by its signedness.
pub fn part_assign(tgt: &mut Vector, lsb: usize, msb: usize, src: &Vector) -> bool {
    check_range(tgt, lsb, msb);
    let value = Scratch::from_vector(src).resized(msb - lsb + 1, src.is_signed());
    let mut placed = Scratch::zeroed(tgt.width());
    placed.insert(lsb, &value);
    tgt.set_coverage_and_assign(placed.low(), placed.high(), lsb, msb)
}

/// Replication `{count{value}}`, truncated to the target width.
///
/// An unknown replication count makes the result `x`.
pub fn expand(tgt: &mut Vector, count: &Vector, value: &Vector) -> bool {
    let n = Scratch::from_vector(count);
    if n.has_unknown() {
        return tgt.set_to_x();
    }
    let item = Scratch::from_vector(value);
    let mut out = Scratch::zeroed(tgt.width());
    let mut pos = 0;
    for _ in 0..n.to_count() {
        if pos >= tgt.width() {
            break;
        }
        out.insert(pos, &item);
        pos += item.width();
    }
    out.commit(tgt)
}

/// Concatenation `{left, right}`: `right` occupies the least significant bits.
pub fn concat(tgt: &mut Vector, left: &Vector, right: &Vector) -> bool {
    let r = Scratch::from_vector(right);
    let mut out = Scratch::zeroed(tgt.width());
    out.insert(0, &r);
    out.insert(r.width(), &Scratch::from_vector(left));
    out.commit(tgt)
}
