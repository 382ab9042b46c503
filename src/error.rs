//! Error type for the list core and command surface.
//!
//! Mirrors the existing `Lz4Error` / `DecompressError` / `Lz4HcError` idiom:
//! a plain enum, a hand-written `Display`, and a blanket `std::error::Error`
//! impl — no `thiserror` derive. Corruption of the listpack byte layout is
//! not representable here; it is a fatal condition and is raised as a panic
//! at the point of detection (see `listpack::blob`).

use std::fmt;

/// Errors surfaced to a command caller. Never propagated across the
/// listpack/node-list/facade boundary as a `Result` — those layers are
/// either infallible or panic on corruption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// Key exists but does not hold a list value.
    WrongType,
    /// Index argument (LSET) or timeout argument is outside the valid range.
    OutOfRange,
    /// Malformed command argument: bad LINSERT direction, non-integer
    /// count/index/timeout, or a negative timeout.
    Syntax(&'static str),
    /// Operation requires the key to already exist (LSET).
    NoSuchKey,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::WrongType => write!(
                f,
                "WRONGTYPE Operation against a key holding the wrong kind of value"
            ),
            ListError::OutOfRange => write!(f, "ERR index out of range"),
            ListError::Syntax(what) => write!(f, "ERR syntax error: {what}"),
            ListError::NoSuchKey => write!(f, "ERR no such key"),
        }
    }
}

impl std::error::Error for ListError {}

pub type ListResult<T> = Result<T, ListError>;
