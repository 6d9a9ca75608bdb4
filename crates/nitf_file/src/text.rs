//! Text segment subheaders
//!

use nitf_field::{DateTime, FieldReader, FileType, SecurityMetadata};
use nitf_tre::{TreCollection, TreReader};
use std::io::Read;
use tracing::instrument;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    error::Result,
    segment::{read_extension, read_level, Segment, SegmentKind},
};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TextSegment {
    pub id: String,
    /// Always `0` in NITF 2.0, which has no `TXTALVL`
    pub attachment_level: u32,
    /// `None` when `TXTDT` is blank or malformed
    pub date: Option<DateTime>,
    pub title: String,
    pub security: SecurityMetadata,
    pub encryption: u32,
    /// `STA`, `UT1`, `U8S` or `MTF`
    pub format: String,
    pub extended_overflow: Option<u32>,
    pub tres: TreCollection,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub data: Option<Vec<u8>>,
}

impl TextSegment {
    /// Payload decoded the same way as header fields
    pub fn text(&self) -> Option<String> {
        self.data
            .as_ref()
            .map(|bytes| bytes.iter().map(|&b| b as char).collect())
    }
}

impl Segment for TextSegment {
    const KIND: SegmentKind = SegmentKind::Text;

    #[instrument(skip_all, fields(offset = reader.offset()))]
    fn read<R: Read>(
        reader: &mut FieldReader<R>,
        file_type: FileType,
        tres: &mut TreReader<'_>,
    ) -> Result<Self> {
        reader.verify_literal(Self::KIND.marker())?;

        let (id, attachment_level) = if file_type.is_legacy() {
            (reader.read_trimmed_text(10)?, 0)
        } else {
            (reader.read_trimmed_text(7)?, read_level(reader)?)
        };
        let date = reader.read_date(14, file_type.date_pattern())?;
        let title = reader.read_trimmed_text(80)?;
        let security = SecurityMetadata::read(reader, file_type)?;
        let encryption = reader.read_fixed_int(1)?;
        let format = reader.read_trimmed_text(3)?;
        let extended = read_extension(reader, tres, "TXSHD")?;

        Ok(TextSegment {
            id,
            attachment_level,
            date,
            title,
            security,
            encryption,
            format,
            extended_overflow: extended.overflow,
            tres: extended.tres,
            data: None,
        })
    }

    fn id(&self) -> &str {
        &self.id
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
