//! This library handles the fixed-width field encoding shared by every part of a **NITF** file.
//!
//! # Field Encoding
//!
//! NITF (and its NATO profile NSIF) headers are made of fixed-width fields laid out back to
//! back with no delimiters. The width of every field is known in advance, either from the
//! standard or from a length read earlier in the same header.
//!
//! | Kind      | Encoding                                                        | Example          |
//! |-----------|-----------------------------------------------------------------|------------------|
//! | Text      | BCS-A / ECS-A characters, left justified, space padded          | `"TITLE     "`   |
//! | Integer   | ASCII decimal digits, zero padded on the left                   | `"000042"`       |
//! | Date/time | ASCII digits in a version dependent layout                      | `"20240131120000"` |
//! | Colour    | Three unsigned bytes, red, green then blue                      | `0x00 0x80 0xFF` |
//!
//! Text is decoded as ISO 8859-1 so that every byte maps to exactly one character and the
//! byte offset of every field stays predictable.
//!
//! ## Errors
//!
//! Every failure carries the byte offset the reader had reached. See [`error::ErrorKind`]
//! for the classification shared by the crates built on top of this one.
//!

pub mod date;
pub mod error;
pub mod read;
pub mod security;
pub mod types;

pub use date::{DatePattern, DateTime};
pub use error::{Error, ErrorKind};
pub use read::FieldReader;
pub use security::{Classification, SecurityMetadata};
pub use types::{FileType, Rgb};
