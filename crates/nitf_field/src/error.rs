//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
///
/// Every variant other than [`Error::IOError`] carries the byte offset of the reader at the
/// point the problem was detected.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// A required literal marker did not match
    #[error("structural mismatch at offset {offset}: {message}")]
    Structural { offset: u64, message: String },

    /// Fewer bytes were available than a fixed field requires
    #[error("short read at offset {offset}: needed {needed} bytes, found {found}")]
    ShortRead { offset: u64, needed: u64, found: u64 },

    /// A field that must decode as a number or date did not
    #[error("bad format at offset {offset}: {message}")]
    BadFormat { offset: u64, message: String },

    /// A deliberately unimplemented feature was encountered
    #[error("unsupported structure at offset {offset}: {message}")]
    UnsupportedStructure { offset: u64, message: String },
}

/// Coarse classification of a parse failure
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The underlying source failed
    Io,
    /// A required marker mismatched, the input is misaligned or corrupt
    Structural,
    /// The input is truncated
    ShortRead,
    /// A numeric or date field failed to decode
    BadFormat,
    /// The input uses a feature this library does not handle
    UnsupportedStructure,
    /// A record layout schema could not be loaded
    Schema,
}

impl Error {
    /// Build an [`Error::Structural`] at `offset`
    pub fn structural(offset: u64, message: impl Into<String>) -> Self {
        Error::Structural {
            offset,
            message: message.into(),
        }
    }

    /// Build an [`Error::BadFormat`] at `offset`
    pub fn bad_format(offset: u64, message: impl Into<String>) -> Self {
        Error::BadFormat {
            offset,
            message: message.into(),
        }
    }

    /// Build an [`Error::UnsupportedStructure`] at `offset`
    pub fn unsupported(offset: u64, message: impl Into<String>) -> Self {
        Error::UnsupportedStructure {
            offset,
            message: message.into(),
        }
    }

    /// The kind of failure this error represents
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IOError(_) => ErrorKind::Io,
            Error::Structural { .. } => ErrorKind::Structural,
            Error::ShortRead { .. } => ErrorKind::ShortRead,
            Error::BadFormat { .. } => ErrorKind::BadFormat,
            Error::UnsupportedStructure { .. } => ErrorKind::UnsupportedStructure,
        }
    }

    /// Move an error raised by a reader over a sub-slice to the absolute position of that slice
    pub fn rebase(self, base: u64) -> Self {
        match self {
            Error::IOError(e) => Error::IOError(e),
            Error::Structural { offset, message } => Error::Structural {
                offset: base + offset,
                message,
            },
            Error::ShortRead {
                offset,
                needed,
                found,
            } => Error::ShortRead {
                offset: base + offset,
                needed,
                found,
            },
            Error::BadFormat { offset, message } => Error::BadFormat {
                offset: base + offset,
                message,
            },
            Error::UnsupportedStructure { offset, message } => Error::UnsupportedStructure {
                offset: base + offset,
                message,
            },
        }
    }

    /// The byte offset the error was raised at, if known
    pub fn offset(&self) -> Option<u64> {
        match self {
            Error::IOError(_) => None,
            Error::Structural { offset, .. }
            | Error::ShortRead { offset, .. }
            | Error::BadFormat { offset, .. }
            | Error::UnsupportedStructure { offset, .. } => Some(*offset),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
