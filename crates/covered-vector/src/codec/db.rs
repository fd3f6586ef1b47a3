//! Database sub-record: `<width> <descriptor>` followed by one hex token per
//! plane per word, for vectors that own their storage.

use std::io::Write;

use log::{debug, error, warn};

use super::{expect_token, malformed};
use crate::vector::{DataType, Kind, Vector, Word, mask_top_word, word_count};
use crate::word::{PlaneWord, plane, top_mask};
use crate::{CodecError, CodecOptions, MAX_BIT_WIDTH};

const OWNS_STORAGE: u8 = 1 << 4;
const SIGNED: u8 = 1 << 5;
const TWO_STATE: u8 = 1 << 6;

/// Decoded descriptor byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Descriptor {
    kind: Kind,
    data_type: DataType,
    owns_storage: bool,
    is_signed: bool,
    is_2state: bool,
}

impl Descriptor {
    fn of(v: &Vector) -> Self {
        Self {
            kind: v.kind(),
            data_type: v.data_type(),
            owns_storage: v.owns_storage(),
            is_signed: v.is_signed(),
            is_2state: v.is_2state(),
        }
    }

    fn encode(self) -> u8 {
        let mut byte = self.kind.code() | (self.data_type.code() << 2);
        if self.owns_storage {
            byte |= OWNS_STORAGE;
        }
        if self.is_signed {
            byte |= SIGNED;
        }
        if self.is_2state {
            byte |= TWO_STATE;
        }
        byte
    }

    fn decode(byte: u8) -> Result<Self, CodecError> {
        if byte & 0x80 != 0 {
            return Err(CodecError::InvalidDescriptor(byte));
        }
        let data_type = DataType::from_code((byte >> 2) & 0x3).ok_or(CodecError::InvalidDescriptor(byte))?;
        Ok(Self {
            kind: Kind::from_code(byte & 0x3),
            data_type,
            owns_storage: byte & OWNS_STORAGE != 0,
            is_signed: byte & SIGNED != 0,
            is_2state: byte & TWO_STATE != 0,
        })
    }

    /// Number of plane tokens following the header.
    fn token_count(self, width: usize) -> usize {
        if self.owns_storage {
            word_count(width) * self.kind.plane_count()
        } else {
            0
        }
    }
}

fn read_header(line: &mut &str) -> Result<(usize, Descriptor), CodecError> {
    let token = expect_token(line, "vector width")?;
    let width: usize = token.parse().map_err(|_| malformed("vector width", token))?;
    if width == 0 {
        return Err(CodecError::ZeroWidth);
    }
    if width > MAX_BIT_WIDTH {
        return Err(CodecError::TooWide(width));
    }
    let token = expect_token(line, "vector descriptor")?;
    let byte: u8 = token.parse().map_err(|_| malformed("vector descriptor", token))?;
    Ok((width, Descriptor::decode(byte)?))
}

fn read_plane(line: &mut &str) -> Result<Word, CodecError> {
    let token = expect_token(line, "plane word")?;
    Word::from_str_radix(token, 16).map_err(|_| malformed("hexadecimal plane word", token))
}

impl Vector {
    /// Write this vector's sub-record; no trailing newline.
    pub fn db_write<W: Write>(&self, out: &mut W, options: &CodecOptions) -> Result<(), CodecError> {
        let desc = Descriptor::of(self);
        write!(out, "{} {}", self.width(), desc.encode())?;
        if desc.owns_storage {
            let planes = self.kind().plane_count();
            let n = self.word_count();
            let default_high = if self.is_2state() { 0 } else { Word::ONES };
            for (i, w) in self.words().iter().enumerate() {
                for p in 0..planes {
                    let value = match p {
                        _ if options.write_data || p > plane::VALUE_HIGH => w.get(p),
                        plane::VALUE_LOW => 0,
                        _ if i + 1 == n => default_high & top_mask::<Word>(self.width()),
                        _ => default_high,
                    };
                    write!(out, " {value:x}")?;
                }
            }
        }
        debug!(
            "wrote {}-bit {:?} vector record (data: {})",
            self.width(),
            self.kind(),
            options.write_data
        );
        Ok(())
    }

    /// Parse one sub-record, advancing `line` past it.
    pub fn db_read(line: &mut &str) -> Result<Vector, CodecError> {
        let (width, desc) = read_header(line).inspect_err(|e| error!("{e}"))?;
        let mut vec = Vector::create(width, desc.kind, desc.data_type, desc.owns_storage);
        vec.set_flags(desc.is_signed, desc.is_2state);
        if desc.owns_storage {
            let planes = desc.kind.plane_count();
            let mut words = vec.words_mut();
            for w in words.iter_mut() {
                for p in 0..planes {
                    w.set(p, read_plane(line).inspect_err(|e| error!("{e}"))?);
                }
            }
            mask_top_word(&mut words, width, planes);
        }
        debug!("read {width}-bit {:?} vector record", desc.kind);
        Ok(vec)
    }

    /// Union the coverage planes of one sub-record into this vector.
    ///
    /// Value planes are never merged. With `strict_merge` off, a record of a
    /// different width is skipped with a warning.
    pub fn db_merge(&mut self, line: &mut &str, options: &CodecOptions) -> Result<(), CodecError> {
        let (width, desc) = read_header(line).inspect_err(|e| error!("{e}"))?;
        if desc.kind != self.kind() {
            let err = CodecError::KindMismatch {
                expected: self.kind(),
                found: desc.kind,
            };
            error!("{err}");
            return Err(err);
        }
        if width != self.width() {
            if options.strict_merge {
                let err = CodecError::WidthMismatch {
                    expected: self.width(),
                    found: width,
                };
                error!("{err}");
                return Err(err);
            }
            warn!(
                "skipping merge of {width}-bit record into {}-bit vector",
                self.width()
            );
            for _ in 0..desc.token_count(width) {
                read_plane(line)?;
            }
            return Ok(());
        }

        let planes = desc.kind.plane_count();
        let mut incoming = Vec::with_capacity(desc.token_count(width));
        for _ in 0..desc.token_count(width) {
            incoming.push(read_plane(line).inspect_err(|e| error!("{e}"))?);
        }
        if desc.owns_storage && self.is_allocated() {
            let mut words = self.words_mut();
            for (w, chunk) in words.iter_mut().zip(incoming.chunks(planes)) {
                for (p, &value) in chunk.iter().enumerate().skip(2) {
                    w.or(p, value);
                }
            }
            mask_top_word(&mut words, width, planes);
        }
        debug!("merged {width}-bit {:?} vector record", desc.kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_layout() {
        let v = Vector::new(4, Kind::Memory).signed(true);
        assert_eq!(Descriptor::of(&v).encode(), 0b0011_0011);
        let d = Descriptor::decode(0b0101_0001).unwrap();
        assert_eq!(d.kind, Kind::Signal);
        assert!(d.owns_storage && d.is_2state && !d.is_signed);
        assert!(matches!(
            Descriptor::decode(0b0000_0100),
            Err(CodecError::InvalidDescriptor(4))
        ));
    }

    #[test]
    fn value_planes_default_without_data() {
        let mut v = Vector::new(36, Kind::Signal);
        v.set_u64(0x5);
        let mut out = Vec::new();
        v.db_write(&mut out, &CodecOptions::default().write_data(false)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "36 17 0 ffffffff 0 0 ffffffff 0 0 f 0 0 f 0");
    }

    #[test]
    fn truncated_record_is_an_error() {
        let mut line = "8 17 ff 0 0";
        assert!(matches!(
            Vector::db_read(&mut line),
            Err(CodecError::UnexpectedEnd { .. })
        ));
    }
}
