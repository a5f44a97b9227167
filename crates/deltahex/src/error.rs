//! Error types shared by every layer of the document core.

use std::io;

use thiserror::Error;

use crate::code_type::CodeType;

/// Coarse classification of a [`DeltaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A position, length, index or digit outside its valid bounds.
    Range,
    /// An operation that is illegal in the current state (double undo, stale handle, ...).
    InvalidState,
    /// Failure of the backing storage.
    Io,
}

/// Errors produced by the document, operation and command layers.
#[derive(Debug, Error)]
pub enum DeltaError {
    /// A single byte position outside the document.
    #[error("position {position} is out of range for document of size {size}")]
    PositionOutOfRange {
        /// Requested byte position.
        position: u64,
        /// Document size at the time of the request.
        size: u64,
    },
    /// A byte range that does not fit into the document.
    #[error("range {start}..{end} is out of bounds for document of size {size}")]
    RangeOutOfBounds {
        /// Inclusive start of the range.
        start: u64,
        /// Exclusive end of the range.
        end: u64,
        /// Document size at the time of the request.
        size: u64,
    },
    /// A removal that did not remove exactly the requested number of bytes.
    #[error("removed {removed} bytes but {expected} were requested")]
    RemoveMismatch {
        /// Requested length.
        expected: u64,
        /// Bytes actually removed.
        removed: u64,
    },
    /// A file segment that references bytes past the end of the backing source.
    #[error("file range {start}..{end} exceeds backing source of length {source_len}")]
    SourceRangeOutOfBounds {
        /// Inclusive start in the backing source.
        start: u64,
        /// Exclusive end in the backing source.
        end: u64,
        /// Length of the backing source.
        source_len: u64,
    },
    /// Linked sequence index outside `[0, len)`.
    #[error("index {index} is out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Sequence length.
        len: usize,
    },
    /// A digit that does not exist in the numeral system being edited.
    #[error("digit {digit} is not valid for {code_type:?} code")]
    InvalidDigit {
        /// Offending digit value.
        digit: u8,
        /// Numeral system in use.
        code_type: CodeType,
    },
    /// A code offset past the last digit of a byte.
    #[error("code offset {code_offset} exceeds {max_digits} digits per byte")]
    InvalidCodeOffset {
        /// Requested code offset.
        code_offset: usize,
        /// Digits per byte in the numeral system in use.
        max_digits: usize,
    },
    /// Input a live edit does not understand (e.g. a non-delete key for a delete edit).
    #[error("unexpected edit input {0:#04x}")]
    UnexpectedInput(u8),
    /// Node handle that is not linked into the sequence.
    #[error("node is not linked into this sequence")]
    DetachedNode,
    /// Operation not allowed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    /// Backing storage failure outside the page cache.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DeltaError {
    /// Returns the taxonomy class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PositionOutOfRange { .. }
            | Self::RangeOutOfBounds { .. }
            | Self::RemoveMismatch { .. }
            | Self::SourceRangeOutOfBounds { .. }
            | Self::IndexOutOfRange { .. }
            | Self::InvalidDigit { .. }
            | Self::InvalidCodeOffset { .. } => ErrorKind::Range,
            Self::UnexpectedInput(_) | Self::DetachedNode | Self::InvalidState(_) => {
                ErrorKind::InvalidState
            }
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T, E = DeltaError> = std::result::Result<T, E>;
