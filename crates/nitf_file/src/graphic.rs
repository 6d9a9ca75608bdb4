//! Graphic segment subheaders, NITF 2.1 and NSIF
//!

use nitf_field::{FieldReader, FileType, SecurityMetadata};
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
pub struct GraphicSegment {
    pub id: String,
    pub name: String,
    pub security: SecurityMetadata,
    pub encryption: u32,
    /// `C` for CGM, the only format defined
    pub format: String,
    pub display_level: u32,
    pub attachment_level: u32,
    pub location: Location,
    pub first_bound: Location,
    pub colour: String,
    pub second_bound: Location,
    pub extended_overflow: Option<u32>,
    pub tres: TreCollection,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub data: Option<Vec<u8>>,
}

impl Segment for GraphicSegment {
    const KIND: SegmentKind = SegmentKind::Graphic;

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
        let format = reader.read_trimmed_text(1)?;
        // SSTRUCT, reserved
        reader.read_fixed_text(13)?;
        let display_level = read_level(reader)?;
        let attachment_level = read_level(reader)?;
        let location = Location::read(reader)?;
        let first_bound = Location::read(reader)?;
        let colour = reader.read_trimmed_text(1)?;
        let second_bound = Location::read(reader)?;
        // SRES, reserved
        reader.read_fixed_text(2)?;
        let extended = read_extension(reader, tres, "SXSHD")?;

        Ok(GraphicSegment {
            id,
            name,
            security,
            encryption,
            format,
            display_level,
            attachment_level,
            location,
            first_bound,
            colour,
            second_bound,
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
