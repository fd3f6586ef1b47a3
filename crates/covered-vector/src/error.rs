use thiserror::Error;

/// Failure while reading or merging a database sub-record.
///
/// A corrupted record cannot be trusted incrementally, so every variant is
/// fatal for the run that produced it.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Malformed vector record: expected {expected}, found `{found}`")]
    Malformed { expected: &'static str, found: String },
    #[error("Unexpected end of vector record while reading {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("Invalid vector descriptor byte 0x{0:02x}")]
    InvalidDescriptor(u8),
    #[error("Vector width mismatch on merge: expected {expected}, found {found}")]
    WidthMismatch { expected: usize, found: usize },
    #[error("Vector kind mismatch on merge: expected {expected:?}, found {found:?}")]
    KindMismatch {
        expected: crate::Kind,
        found: crate::Kind,
    },
    #[error("Vector record has zero width")]
    ZeroWidth,
    #[error("Vector width {0} exceeds maximum of {max}", max = crate::MAX_BIT_WIDTH)]
    TooWide(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A Verilog literal could not be turned into a vector.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error("Literal width {width} exceeds maximum of {max}", max = crate::MAX_BIT_WIDTH)]
    TooWide { width: usize },
    #[error("Malformed literal: {0}")]
    Malformed(String),
    #[error("Literal has zero width")]
    ZeroWidth,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Modulus by zero")]
    ModulusByZero,
}
