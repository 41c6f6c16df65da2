//! Errors raised while assembling a function.
//!
//! The builder presumes a well-formed bitcode stream; every error here is
//! fatal to the containing build. There is no partial-failure mode — a
//! function either finalizes successfully or the build aborts.

use std::fmt;

/// Fatal assembly error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ModelError {
    /// A builder operation was issued out of protocol order, or the
    /// stream handed over data no table can decode.
    ProtocolViolation { reason: String },
    /// A block index is outside the allocated block array.
    IndexOutOfRange { index: u32, count: u32 },
    /// The symbol at `index` is not what the operation requires.
    TypeMismatch { index: u32, expected: &'static str },
    /// A symbol-table slot was referenced but never filled.
    UnresolvedForwardReference { index: u32 },
}

impl ModelError {
    pub(crate) fn protocol(reason: impl Into<String>) -> Self {
        ModelError::ProtocolViolation {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::ProtocolViolation { reason } => {
                write!(f, "builder protocol violation: {reason}")
            }
            ModelError::IndexOutOfRange { index, count } => {
                write!(f, "block index {index} out of range for {count} allocated blocks")
            }
            ModelError::TypeMismatch { index, expected } => {
                write!(f, "symbol {index} is not a {expected}")
            }
            ModelError::UnresolvedForwardReference { index } => {
                write!(f, "symbol {index} was referenced but never defined")
            }
        }
    }
}

impl std::error::Error for ModelError {}
