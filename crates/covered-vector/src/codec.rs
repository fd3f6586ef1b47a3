//! Text encodings of a vector: database sub-records, Verilog literals and
//! VCD value changes.

mod db;
mod literal;
mod vcd;

pub use literal::Base;

use crate::CodecError;

/// Pop the next whitespace-separated token, advancing `line` past it.
fn next_token<'a>(line: &mut &'a str) -> Option<&'a str> {
    let rest = line.trim_start();
    if rest.is_empty() {
        *line = rest;
        return None;
    }
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let (token, tail) = rest.split_at(end);
    *line = tail;
    Some(token)
}

fn expect_token<'a>(line: &mut &'a str, expected: &'static str) -> Result<&'a str, CodecError> {
    next_token(line).ok_or(CodecError::UnexpectedEnd { expected })
}

fn malformed(expected: &'static str, found: &str) -> CodecError {
    CodecError::Malformed {
        expected,
        found: found.to_string(),
    }
}
