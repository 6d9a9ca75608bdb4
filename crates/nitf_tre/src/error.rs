//! Error types that can be emitted from this library

use miette::Diagnostic;
use nitf_field::ErrorKind;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`nitf_field::Error`]
    #[error(transparent)]
    FieldError(#[from] nitf_field::Error),

    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`serde_json::Error`]
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// a schema entry is malformed
    #[error("invalid schema for {tag}: {message}")]
    InvalidSchema { tag: String, message: String },
}

impl Error {
    /// The kind of failure this error represents
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FieldError(e) => e.kind(),
            Error::IOError(_) => ErrorKind::Io,
            Error::JsonError(_) | Error::InvalidSchema { .. } => ErrorKind::Schema,
        }
    }

    /// The byte offset the error was raised at, if known
    pub fn offset(&self) -> Option<u64> {
        match self {
            Error::FieldError(e) => e.offset(),
            _ => None,
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
