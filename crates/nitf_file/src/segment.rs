//! Pieces shared by every segment subheader
//!

use nitf_field::{Error as FieldError, FieldReader, FileType};
use nitf_tre::{TreCollection, TreReader};
use std::{fmt, io::Read};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::Result;

/// Width of the length field that opens every TRE extension area
pub const EXTENSION_LENGTH_WIDTH: usize = 5;

/// Width of the overflow index that follows a non-zero extension length
pub const OVERFLOW_WIDTH: usize = 3;

/// The kinds of segment a file can carry
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SegmentKind {
    Image,
    /// NITF 2.1 and NSIF only
    Graphic,
    /// NITF 2.0 only
    Symbol,
    /// NITF 2.0 only
    Label,
    Text,
    DataExtension,
}

impl SegmentKind {
    /// The two character marker that opens the subheader
    pub const fn marker(&self) -> &'static str {
        match self {
            SegmentKind::Image => "IM",
            SegmentKind::Graphic | SegmentKind::Symbol => "SY",
            SegmentKind::Label => "LA",
            SegmentKind::Text => "TE",
            SegmentKind::DataExtension => "DE",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SegmentKind::Image => "image",
            SegmentKind::Graphic => "graphic",
            SegmentKind::Symbol => "symbol",
            SegmentKind::Label => "label",
            SegmentKind::Text => "text",
            SegmentKind::DataExtension => "data extension",
        })
    }
}

/// Behaviour common to every segment
///
/// Each segment type reads its own subheader; the file parser takes care of lengths,
/// payloads and overflow.
pub trait Segment: Sized {
    const KIND: SegmentKind;

    /// Read the subheader, starting at its two character marker
    fn read<R: Read>(
        reader: &mut FieldReader<R>,
        file_type: FileType,
        tres: &mut TreReader<'_>,
    ) -> Result<Self>;

    /// Segment identifier
    fn id(&self) -> &str;

    /// Display level, `0` for segments that have none
    fn display_level(&self) -> u32 {
        0
    }

    /// Level of the segment this one is attached to, `0` when unattached
    fn attachment_level(&self) -> u32 {
        0
    }

    fn tres(&self) -> &TreCollection;

    fn tres_mut(&mut self) -> &mut TreCollection;

    /// Payload bytes, present only when extraction was requested
    fn data(&self) -> Option<&[u8]>;

    fn set_data(&mut self, data: Vec<u8>);
}

/// A row and column pair, as used by `ILOC`, `SLOC`, `LLOC` and graphic bounds
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Location {
    pub row: i32,
    pub column: i32,
}

impl Location {
    /// Width of an encoded location, five characters per coordinate
    pub const WIDTH: usize = 10;

    /// Read `RRRRRCCCCC`, each half a signed integer
    pub fn read<R: Read>(reader: &mut FieldReader<R>) -> Result<Self> {
        let start = reader.offset();
        let text = reader.read_fixed_text(Self::WIDTH)?;
        let (row, column) = text.split_at(Self::WIDTH / 2);

        match (parse_signed(row), parse_signed(column)) {
            (Some(row), Some(column)) => Ok(Location { row, column }),
            _ => Err(FieldError::bad_format(start, format!("invalid location {text:?}")).into()),
        }
    }
}

fn parse_signed(text: &str) -> Option<i32> {
    let text = text.trim();
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// One user defined or extended TRE area of a header
#[derive(Debug, Default)]
pub(crate) struct Extension {
    pub tres: TreCollection,
    /// 1-based index of the DES holding the rest of the area
    pub overflow: Option<u32>,
}

/// Read `length(5)` then, when non-zero, `overflow(3)` followed by `length - 3` bytes of TREs
pub(crate) fn read_extension<R: Read>(
    reader: &mut FieldReader<R>,
    tres: &mut TreReader<'_>,
    area: &str,
) -> Result<Extension> {
    let start = reader.offset();
    let length = reader.read_fixed_long(EXTENSION_LENGTH_WIDTH)?;
    if length == 0 {
        return Ok(Extension::default());
    }

    if length < OVERFLOW_WIDTH as u64 {
        return Err(FieldError::structural(
            start,
            format!("{area} length {length} cannot hold its overflow index"),
        )
        .into());
    }

    let overflow = reader.read_fixed_int(OVERFLOW_WIDTH)?;
    let tres = tres.read_block(reader, length - OVERFLOW_WIDTH as u64)?;
    Ok(Extension {
        tres,
        overflow: (overflow != 0).then_some(overflow),
    })
}

/// Read a three digit display or attachment level
pub(crate) fn read_level<R: Read>(reader: &mut FieldReader<R>) -> Result<u32> {
    Ok(reader.read_fixed_int(3)?)
}
