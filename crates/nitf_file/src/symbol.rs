//! Symbol segment subheaders, NITF 2.0
//!

use nitf_field::{FieldReader, FileType, Rgb, SecurityMetadata};
use nitf_tre::{TreCollection, TreReader};
use std::io::Read;
use tracing::instrument;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    error::Result,
    segment::{read_extension, read_level, Location, Segment, SegmentKind},
};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SymbolSegment {
    pub id: String,
    pub name: String,
    pub security: SecurityMetadata,
    pub encryption: u32,
    /// `B` bitmap, `C` CGM or `O` object
    pub symbol_type: String,
    pub lines: u32,
    pub pixels_per_line: u32,
    pub line_width: u32,
    pub bits_per_pixel: u32,
    pub display_level: u32,
    pub attachment_level: u32,
    pub location: Location,
    pub second_location: Location,
    pub colour: String,
    pub number: String,
    pub rotation: u32,
    /// Colour look-up table of a bitmap symbol
    pub lut: Vec<Rgb>,
    pub extended_overflow: Option<u32>,
    pub tres: TreCollection,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub data: Option<Vec<u8>>,
}

impl Segment for SymbolSegment {
    const KIND: SegmentKind = SegmentKind::Symbol;

    #[instrument(skip_all, fields(offset = reader.offset()))]
    fn read<R: Read>(
        reader: &mut FieldReader<R>,
        file_type: FileType,
        tres: &mut TreReader<'_>,
    ) -> Result<Self> {
        reader.verify_literal(Self::KIND.marker())?;

        let id = reader.read_trimmed_text(10)?;
        let name = reader.read_trimmed_text(20)?;
        let security = SecurityMetadata::read(reader, file_type)?;
        let encryption = reader.read_fixed_int(1)?;
        let symbol_type = reader.read_trimmed_text(1)?;
        let lines = reader.read_fixed_int(4)?;
        let pixels_per_line = reader.read_fixed_int(4)?;
        let line_width = reader.read_fixed_int(4)?;
        let bits_per_pixel = reader.read_fixed_int(1)?;
        let display_level = read_level(reader)?;
        let attachment_level = read_level(reader)?;
        let location = Location::read(reader)?;
        let second_location = Location::read(reader)?;
        let colour = reader.read_trimmed_text(1)?;
        let number = reader.read_trimmed_text(6)?;
        let rotation = reader.read_fixed_int(3)?;

        let entries = reader.read_fixed_int(3)?;
        let lut = (0..entries)
            .map(|_| reader.read_rgb())
            .collect::<nitf_field::error::Result<Vec<_>>>()?;

        let extended = read_extension(reader, tres, "SXSHD")?;

        Ok(SymbolSegment {
            id,
            name,
            security,
            encryption,
            symbol_type,
            lines,
            pixels_per_line,
            line_width,
            bits_per_pixel,
            display_level,
            attachment_level,
            location,
            second_location,
            colour,
            number,
            rotation,
            lut,
            extended_overflow: extended.overflow,
            tres: extended.tres,
            data: None,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_level(&self) -> u32 {
        self.display_level
    }

    fn attachment_level(&self) -> u32 {
        self.attachment_level
    }

    fn tres(&self) -> &TreCollection {
        &self.tres
    }

    fn tres_mut(&mut self) -> &mut TreCollection {
        &mut self.tres
    }

    fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    fn set_data(&mut self, data: Vec<u8>) {
        self.data = Some(data);
    }
}
