use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::word::{Bit, PlaneWord, WordStore, plane, top_mask, words_for};

/// Word type backing every [`Vector`].
pub type Word = u32;

pub(crate) const WORD_BITS: usize = Word::BITS as usize;

/// Hard upper bound on any vector width.
pub const MAX_BIT_WIDTH: usize = 65536;

/// Number of words a `width`-bit vector occupies.
pub fn word_count(width: usize) -> usize {
    words_for::<Word>(width)
}

/// The role a vector plays, which decides its set of planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Transient computation result: value planes only.
    Plain,
    Signal,
    Expression,
    Memory,
}

impl Kind {
    pub fn plane_count(self) -> usize {
        match self {
            Kind::Plain => 2,
            Kind::Signal => 6,
            Kind::Expression => 7,
            Kind::Memory => 6,
        }
    }

    pub(crate) fn code(self) -> u8 {
        match self {
            Kind::Plain => 0,
            Kind::Signal => 1,
            Kind::Expression => 2,
            Kind::Memory => 3,
        }
    }

    pub(crate) fn from_code(code: u8) -> Self {
        match code & 0x3 {
            0 => Kind::Plain,
            1 => Kind::Signal,
            2 => Kind::Expression,
            _ => Kind::Memory,
        }
    }

    /// Plane holding the sticky "has been assigned" bit, if any.
    pub fn set_plane(self) -> Option<usize> {
        match self {
            Kind::Signal => Some(plane::SIG_SET),
            Kind::Expression => Some(plane::EXP_SET),
            Kind::Plain | Kind::Memory => None,
        }
    }

    fn starts_unknown(self) -> bool {
        !matches!(self, Kind::Plain)
    }
}

/// Word representation of a vector's planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    #[default]
    U32,
}

impl DataType {
    pub(crate) fn code(self) -> u8 {
        match self {
            DataType::U32 => 0,
        }
    }

    pub(crate) fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DataType::U32),
            _ => None,
        }
    }
}

/// Shared handle to a vector's words.
pub type WordHandle = Rc<RefCell<Vec<WordStore<Word>>>>;

/// Where a vector's words live.
#[derive(Debug, Clone)]
pub enum Storage {
    /// Width-only vector with no words.
    Unallocated,
    /// The vector allocated these words and is responsible for persisting them.
    Owned(WordHandle),
    /// Alias of another vector's words (e.g. identical FSM input/output state).
    Borrowed(WordHandle),
}

/// A four-state bit vector with per-kind coverage planes.
#[derive(Debug)]
pub struct Vector {
    width: usize,
    kind: Kind,
    data_type: DataType,
    is_signed: bool,
    is_2state: bool,
    storage: Storage,
}

impl Vector {
    /// Allocate a `width`-bit vector of the given kind.
    pub fn new(width: usize, kind: Kind) -> Self {
        Self::create(width, kind, DataType::U32, true)
    }

    /// Create a vector; with `allocate == false` only the width is recorded.
    ///
    /// Panics if `width` is zero or exceeds [`MAX_BIT_WIDTH`].
    pub fn create(width: usize, kind: Kind, data_type: DataType, allocate: bool) -> Self {
        assert!(width > 0, "vector width must be non-zero");
        assert!(
            width <= MAX_BIT_WIDTH,
            "vector width {width} exceeds maximum of {MAX_BIT_WIDTH}"
        );
        let storage = if allocate {
            Storage::Owned(Rc::new(RefCell::new(initial_words(width, kind, false))))
        } else {
            Storage::Unallocated
        };
        Self {
            width,
            kind,
            data_type,
            is_signed: false,
            is_2state: false,
            storage,
        }
    }

    /// Mark the vector 2-state; any unknown bits collapse to known values.
    pub fn two_state(mut self, enable: bool) -> Self {
        self.is_2state = enable;
        if enable {
            if let Some(handle) = self.handle() {
                for w in handle.borrow_mut().iter_mut() {
                    let (l, h) = w.value();
                    w.set(plane::VALUE_LOW, l & !h);
                    w.set(plane::VALUE_HIGH, 0);
                }
            }
        }
        self
    }

    pub fn signed(mut self, enable: bool) -> Self {
        self.is_signed = enable;
        self
    }

    pub(crate) fn set_flags(&mut self, is_signed: bool, is_2state: bool) {
        self.is_signed = is_signed;
        self.is_2state = is_2state;
    }

    /// A non-owning vector viewing this vector's words.
    pub fn alias(&self) -> Vector {
        let storage = match self.handle() {
            Some(h) => Storage::Borrowed(Rc::clone(h)),
            None => Storage::Unallocated,
        };
        Vector {
            storage,
            ..self.metadata()
        }
    }

    /// Deep copy into fresh storage; `None` for a width-only vector.
    pub fn deep_clone(&self) -> Option<Vector> {
        let words = self.handle()?.borrow().clone();
        Some(Vector {
            storage: Storage::Owned(Rc::new(RefCell::new(words))),
            ..self.metadata()
        })
    }

    fn metadata(&self) -> Vector {
        Vector {
            width: self.width,
            kind: self.kind,
            data_type: self.data_type,
            is_signed: self.is_signed,
            is_2state: self.is_2state,
            storage: Storage::Unallocated,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn is_signed(&self) -> bool {
        self.is_signed
    }

    pub fn is_2state(&self) -> bool {
        self.is_2state
    }

    pub fn owns_storage(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    pub fn is_allocated(&self) -> bool {
        !matches!(self.storage, Storage::Unallocated)
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn word_count(&self) -> usize {
        word_count(self.width)
    }

    fn handle(&self) -> Option<&WordHandle> {
        match &self.storage {
            Storage::Owned(h) | Storage::Borrowed(h) => Some(h),
            Storage::Unallocated => None,
        }
    }

    /// Read access to the words. Panics on a width-only vector.
    pub fn words(&self) -> Ref<'_, [WordStore<Word>]> {
        let handle = self
            .handle()
            .expect("width-only vector has no word storage");
        Ref::map(handle.borrow(), |w| w.as_slice())
    }

    pub(crate) fn words_mut(&self) -> RefMut<'_, Vec<WordStore<Word>>> {
        self.handle()
            .expect("width-only vector has no word storage")
            .borrow_mut()
    }

    pub(crate) fn shares_storage_with(&self, other: &Vector) -> bool {
        match (self.handle(), other.handle()) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Raw plane word.
    pub fn plane(&self, word: usize, plane: usize) -> Word {
        assert!(plane < self.kind.plane_count(), "plane {plane} not present");
        self.words()[word].get(plane)
    }

    pub fn bit(&self, index: usize) -> Bit {
        assert!(index < self.width, "bit {index} out of range");
        let w = self.words()[index / WORD_BITS];
        let off = (index % WORD_BITS) as u32;
        let (l, h) = w.value();
        Bit::from_planes(l.bit(off), h.bit(off))
    }

    /// Bitwise-identical plane copy; widths and kinds must match.
    pub fn copy_from(&mut self, from: &Vector) {
        assert_eq!(self.width, from.width, "copy requires equal widths");
        assert_eq!(self.kind, from.kind, "copy requires equal kinds");
        if self.shares_storage_with(from) {
            return;
        }
        let src = from.words();
        self.words_mut().copy_from_slice(&src);
    }

    /// Copy `self.width()` bits of `from`, starting at bit `lsb`, into bit 0 onward.
    ///
    /// Bits past the top of `from` read as zero on every plane, so a wider
    /// target zero-extends the source.
    pub fn copy_range(&mut self, from: &Vector, lsb: usize) {
        assert_eq!(self.kind, from.kind, "copy_range requires equal kinds");
        assert!(
            lsb < from.width,
            "copy_range start bit {lsb} outside {}-bit source",
            from.width
        );
        let planes = self.kind.plane_count();
        let copied: Vec<WordStore<Word>> = {
            let src = from.words();
            (0..self.word_count())
                .map(|i| {
                    let mut w = WordStore::default();
                    for p in 0..planes {
                        w.set(p, extract_word(&src, p, lsb + i * WORD_BITS, from.width));
                    }
                    w
                })
                .collect()
        };
        let mut dst = self.words_mut();
        dst.copy_from_slice(&copied);
        mask_top_word(&mut dst, self.width, planes);
    }

    /// Reallocate at a new width, keeping the LSB-aligned overlap of all planes.
    pub fn resize(&mut self, width: usize) {
        assert!(width > 0 && width <= MAX_BIT_WIDTH, "invalid width {width}");
        let mut words = initial_words(width, self.kind, self.is_2state);
        if let Some(handle) = self.handle() {
            let old = handle.borrow();
            let keep = width.min(self.width);
            let planes = self.kind.plane_count();
            for (i, w) in words.iter_mut().enumerate().take(word_count(keep)) {
                let mask = if i + 1 == word_count(keep) {
                    top_mask::<Word>(keep)
                } else {
                    Word::ONES
                };
                for p in 0..planes {
                    w.set(p, (w.get(p) & !mask) | (old[i].get(p) & mask));
                }
            }
        }
        self.width = width;
        self.storage = Storage::Owned(Rc::new(RefCell::new(words)));
    }

    /// Union the coverage planes of `other` into this vector.
    pub fn merge(&mut self, other: &Vector) {
        assert_eq!(self.width, other.width, "merge requires equal widths");
        assert_eq!(self.kind, other.kind, "merge requires equal kinds");
        if self.shares_storage_with(other) {
            return;
        }
        let src = other.words();
        let planes = self.kind.plane_count();
        for (dst, src) in self.words_mut().iter_mut().zip(src.iter()) {
            for p in 2..planes {
                dst.or(p, src.get(p));
            }
        }
    }

    /// Clear every coverage plane, leaving the value untouched.
    pub fn reset_coverage(&mut self) {
        for w in self.words_mut().iter_mut() {
            w.clear_planes(2);
        }
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        if self.width != other.width
            || self.kind != other.kind
            || self.data_type != other.data_type
            || self.is_signed != other.is_signed
            || self.is_2state != other.is_2state
            || self.owns_storage() != other.owns_storage()
            || self.is_allocated() != other.is_allocated()
        {
            return false;
        }
        if !self.is_allocated() {
            return true;
        }
        let planes = self.kind.plane_count();
        let (a, b) = (self.words(), other.words());
        a.iter()
            .zip(b.iter())
            .all(|(x, y)| (0..planes).all(|p| x.get(p) == y.get(p)))
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'b", self.width)?;
        if !self.is_allocated() {
            return Ok(());
        }
        for i in (0..self.width).rev() {
            write!(f, "{}", self.bit(i).to_char())?;
        }
        Ok(())
    }
}

fn initial_words(width: usize, kind: Kind, two_state: bool) -> Vec<WordStore<Word>> {
    let n = word_count(width);
    let unknown = kind.starts_unknown() && !two_state;
    (0..n)
        .map(|i| {
            let high = if !unknown {
                0
            } else if i + 1 == n {
                top_mask::<Word>(width)
            } else {
                Word::ONES
            };
            WordStore::new(0, high)
        })
        .collect()
}

/// `WORD_BITS` bits of plane `p` starting at absolute bit `start`; bits past `width` read as 0.
pub(crate) fn extract_word(words: &[WordStore<Word>], p: usize, start: usize, width: usize) -> Word {
    if start >= width {
        return 0;
    }
    let idx = start / WORD_BITS;
    let off = (start % WORD_BITS) as u32;
    let mut v = words[idx].get(p) >> off;
    if off != 0 && idx + 1 < words.len() {
        v |= words[idx + 1].get(p) << (Word::BITS - off);
    }
    let avail = width - start;
    if avail < WORD_BITS {
        v &= Word::low_mask(avail as u32);
    }
    v
}

pub(crate) fn mask_top_word(words: &mut [WordStore<Word>], width: usize, planes: usize) {
    let mask = top_mask::<Word>(width);
    if let Some(last) = words.last_mut() {
        for p in 0..planes {
            last.set(p, last.get(p) & mask);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_signal_is_unknown_with_clear_coverage() {
        let v = Vector::new(40, Kind::Signal);
        assert_eq!(v.word_count(), 2);
        assert_eq!(v.plane(0, plane::VALUE_HIGH), u32::MAX);
        assert_eq!(v.plane(1, plane::VALUE_HIGH), 0xff);
        for w in 0..2 {
            for p in 2..Kind::Signal.plane_count() {
                assert_eq!(v.plane(w, p), 0);
            }
        }
    }

    #[test]
    fn two_state_and_plain_start_at_zero() {
        let v = Vector::new(8, Kind::Signal).two_state(true);
        assert_eq!(v.plane(0, plane::VALUE_HIGH), 0);
        let p = Vector::new(8, Kind::Plain);
        assert_eq!(p.words()[0].value(), (0, 0));
    }

    #[test]
    fn width_only_vector_clones_to_none() {
        let v = Vector::create(12, Kind::Signal, DataType::U32, false);
        assert!(!v.is_allocated());
        assert!(v.deep_clone().is_none());
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn zero_width_is_a_contract_violation() {
        let _ = Vector::new(0, Kind::Plain);
    }

    #[test]
    fn alias_sees_owner_updates() {
        let owner = Vector::new(4, Kind::Plain);
        let alias = owner.alias();
        assert!(!alias.owns_storage());
        owner.words_mut()[0].assign_value(0xf, 0x5, 0);
        assert_eq!(alias.to_string(), "4'b0101");
    }

    #[test]
    fn copy_range_aligns_to_bit_zero() {
        let src = Vector::new(48, Kind::Plain);
        src.words_mut()[0].assign_value(u32::MAX, 0xdead_beef, 0);
        src.words_mut()[1].assign_value(0xffff, 0x1234, 0);
        let mut dst = Vector::new(16, Kind::Plain);
        dst.copy_range(&src, 28);
        // bits 28..43 of 0x1234_dead_beef
        assert_eq!(dst.plane(0, plane::VALUE_LOW), (0x1234_dead_beef_u64 >> 28) as u32 & 0xffff);
    }

    #[test]
    fn copy_range_zero_extends_into_wider_target() {
        let src = Vector::new(4, Kind::Plain);
        src.words_mut()[0].assign_value(0xf, 0b1011, 0);
        let mut dst = Vector::new(8, Kind::Plain);
        dst.copy_range(&src, 0);
        assert_eq!(dst.to_string(), "8'b00001011");
        dst.copy_range(&src, 2);
        assert_eq!(dst.to_string(), "8'b00000010");
    }

    #[test]
    #[should_panic(expected = "outside 4-bit source")]
    fn copy_range_start_must_be_inside_source() {
        let src = Vector::new(4, Kind::Plain);
        let mut dst = Vector::new(2, Kind::Plain);
        dst.copy_range(&src, 4);
    }

    #[test]
    fn resize_keeps_low_bits_and_fills_unknown() {
        let mut v = Vector::new(4, Kind::Signal);
        v.words_mut()[0].assign_value(0xf, 0xa, 0);
        v.resize(8);
        assert_eq!(v.to_string(), "8'bxxxx1010");
        v.resize(2);
        assert_eq!(v.to_string(), "2'b10");
    }
}
