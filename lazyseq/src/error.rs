use std::fmt;

/// Errors raised by [`LazySeq`](crate::LazySeq) accessors.
///
/// These report misuse by the caller, never a runtime condition to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqError {
    /// An element accessor was called on the empty sequence
    InvalidState { operation: &'static str },
}

pub type Result<T> = std::result::Result<T, SeqError>;

impl fmt::Display for SeqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqError::InvalidState { operation } => {
                write!(f, "invalid state: calling {operation}() on empty sequence")
            }
        }
    }
}

impl std::error::Error for SeqError {}
