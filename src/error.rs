//! Error taxonomy for the decoding core
//!
//! The decoder is deliberately forgiving: truncation, unknown tags and
//! malformed text all degrade to diagnostic tree nodes instead of failing.
//! The variants here cover the few conditions that are reported to the
//! caller, either as a hard error (bad input hex) or collected into the
//! `errors` list of a `ParseResult`.

use thiserror::Error;

/// Errors that can surface from the decoding core
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("input contains non-hex characters")]
    NotHex,

    #[error("hex input has odd length")]
    OddLength,

    #[error("truncated input while reading {0}")]
    Truncated(&'static str),

    #[error("nesting deeper than {0} levels")]
    DepthExceeded(usize),

    #[error("builder for tag {tag} failed: {reason}")]
    BuilderFailed { tag: String, reason: String },
}
