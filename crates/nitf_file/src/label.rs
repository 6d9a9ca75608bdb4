//! Label segment subheaders, NITF 2.0
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
pub struct LabelSegment {
    pub id: String,
    pub security: SecurityMetadata,
    pub encryption: u32,
    pub font_style: String,
    pub cell_width: u32,
    pub cell_height: u32,
    pub display_level: u32,
    pub attachment_level: u32,
    pub location: Location,
    pub text_colour: Rgb,
    pub background_colour: Rgb,
    pub extended_overflow: Option<u32>,
    pub tres: TreCollection,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub data: Option<Vec<u8>>,
}

impl LabelSegment {
    /// Label text, decoded the same way as header fields
    pub fn text(&self) -> Option<String> {
        self.data
            .as_ref()
            .map(|bytes| bytes.iter().map(|&b| b as char).collect())
    }
}

impl Segment for LabelSegment {
    const KIND: SegmentKind = SegmentKind::Label;

    #[instrument(skip_all, fields(offset = reader.offset()))]
    fn read<R: Read>(
        reader: &mut FieldReader<R>,
        file_type: FileType,
        tres: &mut TreReader<'_>,
    ) -> Result<Self> {
        reader.verify_literal(Self::KIND.marker())?;

        let id = reader.read_trimmed_text(10)?;
        let security = SecurityMetadata::read(reader, file_type)?;
        let encryption = reader.read_fixed_int(1)?;
        let font_style = reader.read_trimmed_text(1)?;
        let cell_width = reader.read_fixed_int(2)?;
        let cell_height = reader.read_fixed_int(2)?;
        let display_level = read_level(reader)?;
        let attachment_level = read_level(reader)?;
        let location = Location::read(reader)?;
        let text_colour = reader.read_rgb()?;
        let background_colour = reader.read_rgb()?;
        let extended = read_extension(reader, tres, "LXSHD")?;

        Ok(LabelSegment {
            id,
            security,
            encryption,
            font_style,
            cell_width,
            cell_height,
            display_level,
            attachment_level,
            location,
            text_colour,
            background_colour,
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
