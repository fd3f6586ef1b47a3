mod codec;
mod coverage;
mod engine;
mod error;
mod options;
mod scratch;
mod vector;
mod word;

pub mod ops;

pub use codec::Base;
pub use error::{CodecError, LiteralError, OpError};
pub use options::CodecOptions;
pub use scratch::{Scratch, Truth};
pub use vector::{DataType, Kind, MAX_BIT_WIDTH, Storage, Vector, Word, WordHandle, word_count};
pub use word::{Bit, PlaneWord, WordStore, plane, top_mask, words_for};
