//! Image segment subheaders
//!

use nitf_field::{DateTime, FieldReader, FileType, SecurityMetadata};
use nitf_tre::{TreCollection, TreReader};
use std::io::Read;
use tracing::{instrument, trace};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    error::Result,
    segment::{read_extension, read_level, Location, Segment, SegmentKind},
};

/// Compression codes that carry no `COMRAT` field
const UNCOMPRESSED: [&str; 2] = ["NC", "NM"];

/// Per-band fields of an image subheader
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ImageBand {
    pub representation: String,
    pub subcategory: String,
    pub filter_condition: String,
    pub filter_code: String,
    /// One entry per look-up table, each `NELUT` bytes long
    pub luts: Vec<Vec<u8>>,
}

impl ImageBand {
    fn read<R: Read>(reader: &mut FieldReader<R>) -> Result<Self> {
        let mut band = ImageBand {
            representation: reader.read_trimmed_text(2)?,
            subcategory: reader.read_trimmed_text(6)?,
            filter_condition: reader.read_trimmed_text(1)?,
            filter_code: reader.read_trimmed_text(3)?,
            luts: Vec::new(),
        };

        let lut_count = reader.read_fixed_int(1)?;
        if lut_count > 0 {
            let entries = reader.read_fixed_int(5)? as usize;
            for _ in 0..lut_count {
                band.luts.push(reader.read_bytes(entries)?);
            }
        }

        Ok(band)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ImageSegment {
    pub id: String,
    pub date: DateTime,
    pub target_id: String,
    pub title: String,
    pub security: SecurityMetadata,
    pub encryption: u32,
    pub source: String,
    pub rows: u32,
    pub columns: u32,
    pub pixel_value_type: String,
    pub representation: String,
    pub category: String,
    pub actual_bits_per_pixel: u32,
    pub justification: String,
    pub coordinate_system: String,
    /// Corner coordinates, absent when the coordinate system says there are none
    pub geolocation: Option<String>,
    pub comments: Vec<String>,
    pub compression: String,
    pub compression_rate: Option<String>,
    pub bands: Vec<ImageBand>,
    pub sync_code: u32,
    pub mode: String,
    pub blocks_per_row: u32,
    pub blocks_per_column: u32,
    pub pixels_per_block_horizontal: u32,
    pub pixels_per_block_vertical: u32,
    pub bits_per_pixel: u32,
    pub display_level: u32,
    pub attachment_level: u32,
    pub location: Location,
    pub magnification: String,
    pub user_defined_overflow: Option<u32>,
    pub extended_overflow: Option<u32>,
    pub tres: TreCollection,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub data: Option<Vec<u8>>,
}

impl ImageSegment {
    /// Number of pixels in the image
    pub fn pixel_count(&self) -> u64 {
        self.rows as u64 * self.columns as u64
    }

    /// Whether the image data is stored without compression
    pub fn is_uncompressed(&self) -> bool {
        UNCOMPRESSED.contains(&self.compression.as_str())
    }
}

impl Segment for ImageSegment {
    const KIND: SegmentKind = SegmentKind::Image;

    #[instrument(skip_all, fields(offset = reader.offset()))]
    fn read<R: Read>(
        reader: &mut FieldReader<R>,
        file_type: FileType,
        tres: &mut TreReader<'_>,
    ) -> Result<Self> {
        reader.verify_literal(Self::KIND.marker())?;
        let legacy = file_type.is_legacy();

        let id = reader.read_trimmed_text(10)?;
        let date = reader.read_date_strict(14, file_type.date_pattern())?;
        let target_id = reader.read_trimmed_text(17)?;
        let title = reader.read_trimmed_text(80)?;
        let security = SecurityMetadata::read(reader, file_type)?;
        let encryption = reader.read_fixed_int(1)?;
        let source = reader.read_trimmed_text(42)?;
        let rows = reader.read_fixed_int(8)?;
        let columns = reader.read_fixed_int(8)?;
        let pixel_value_type = reader.read_trimmed_text(3)?;
        let representation = reader.read_trimmed_text(8)?;
        let category = reader.read_trimmed_text(8)?;
        let actual_bits_per_pixel = reader.read_fixed_int(2)?;
        let justification = reader.read_trimmed_text(1)?;

        let coordinate_system = reader.read_trimmed_text(1)?;
        // 2.0 spells "no coordinates" as N, 2.1 leaves the field blank
        let has_geolocation = if legacy {
            coordinate_system != "N"
        } else {
            !coordinate_system.is_empty()
        };
        let geolocation = if has_geolocation {
            Some(reader.read_fixed_text(60)?)
        } else {
            None
        };

        let comment_count = reader.read_fixed_int(1)?;
        let comments = (0..comment_count)
            .map(|_| reader.read_trimmed_text(80))
            .collect::<nitf_field::error::Result<Vec<_>>>()?;

        let compression = reader.read_trimmed_text(2)?;
        let compression_rate = if UNCOMPRESSED.contains(&compression.as_str()) {
            None
        } else {
            Some(reader.read_trimmed_text(4)?)
        };

        let mut band_count = reader.read_fixed_int(1)?;
        if band_count == 0 && !legacy {
            band_count = reader.read_fixed_int(5)?;
        }
        let bands = (0..band_count)
            .map(|_| ImageBand::read(reader))
            .collect::<Result<Vec<_>>>()?;
        trace!(bands = bands.len(), %compression, "read image bands");

        let sync_code = reader.read_fixed_int(1)?;
        let mode = reader.read_trimmed_text(1)?;
        let blocks_per_row = reader.read_fixed_int(4)?;
        let blocks_per_column = reader.read_fixed_int(4)?;
        let pixels_per_block_horizontal = reader.read_fixed_int(4)?;
        let pixels_per_block_vertical = reader.read_fixed_int(4)?;
        let bits_per_pixel = reader.read_fixed_int(2)?;
        let display_level = read_level(reader)?;
        let attachment_level = read_level(reader)?;
        let location = Location::read(reader)?;
        let magnification = reader.read_trimmed_text(4)?;

        let user_defined = read_extension(reader, tres, "UDID")?;
        let extended = read_extension(reader, tres, "IXSHD")?;

        let mut collection = user_defined.tres;
        collection.add_all(extended.tres);

        Ok(ImageSegment {
            id,
            date,
            target_id,
            title,
            security,
            encryption,
            source,
            rows,
            columns,
            pixel_value_type,
            representation,
            category,
            actual_bits_per_pixel,
            justification,
            coordinate_system,
            geolocation,
            comments,
            compression,
            compression_rate,
            bands,
            sync_code,
            mode,
            blocks_per_row,
            blocks_per_column,
            pixels_per_block_horizontal,
            pixels_per_block_vertical,
            bits_per_pixel,
            display_level,
            attachment_level,
            location,
            magnification,
            user_defined_overflow: user_defined.overflow,
            extended_overflow: extended.overflow,
            tres: collection,
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
