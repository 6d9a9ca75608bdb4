//! The file header
//!

use nitf_field::{DateTime, Error as FieldError, FieldReader, FileType, Rgb, SecurityMetadata};
use std::io::Read;
use tracing::{debug, instrument};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::Result;

/// `FL` value announcing that the real file length is only known at the end of the stream
pub const STREAMING_FILE_LENGTH: u64 = 999_999_999_999;

/// Fixed fields of the file header, up to and including `HL`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FileHeader {
    pub file_type: FileType,
    pub complexity_level: u32,
    pub standard_type: String,
    pub originating_station: String,
    pub date: DateTime,
    pub title: String,
    pub security: SecurityMetadata,
    pub copy_number: u32,
    pub number_of_copies: u32,
    pub encryption: u32,
    /// NITF 2.1 and NSIF only
    pub background_colour: Option<Rgb>,
    pub originator_name: String,
    pub originator_phone: String,
    /// Length of the whole file, taken from the stream in streaming mode
    pub file_length: u64,
    pub header_length: u64,
    /// Whether `FL` held the streaming sentinel
    pub streaming: bool,
    /// 1-based index of the DES continuing the user defined TREs
    pub user_defined_overflow: Option<u32>,
    /// 1-based index of the DES continuing the extended TREs
    pub extended_overflow: Option<u32>,
}

impl FileHeader {
    /// Read from the profile marker through `HL`
    #[instrument(skip_all)]
    pub fn read<R: Read>(reader: &mut FieldReader<R>) -> Result<Self> {
        let start = reader.offset();
        let marker = reader.read_fixed_text(FileType::WIDTH)?;
        let file_type = FileType::from_marker(&marker).ok_or_else(|| {
            FieldError::structural(start, format!("unrecognised file marker {marker:?}"))
        })?;
        debug!(%file_type, "reading file header");

        let complexity_level = reader.read_fixed_int(2)?;
        let standard_type = reader.read_trimmed_text(4)?;
        let originating_station = reader.read_trimmed_text(10)?;
        let date = reader.read_date_strict(14, file_type.date_pattern())?;
        let title = reader.read_trimmed_text(80)?;
        let security = SecurityMetadata::read(reader, file_type)?;
        let copy_number = reader.read_fixed_int(5)?;
        let number_of_copies = reader.read_fixed_int(5)?;
        let encryption = reader.read_fixed_int(1)?;

        let (background_colour, originator_name) = if file_type.is_legacy() {
            (None, reader.read_trimmed_text(27)?)
        } else {
            (Some(reader.read_rgb()?), reader.read_trimmed_text(24)?)
        };
        let originator_phone = reader.read_trimmed_text(18)?;

        let length_offset = reader.offset();
        let mut file_length = reader.read_fixed_long(12)?;
        let streaming = file_length == STREAMING_FILE_LENGTH;
        if streaming {
            file_length = reader.stream_len()?.ok_or_else(|| {
                FieldError::unsupported(
                    length_offset,
                    "streaming file length on a source that cannot seek",
                )
            })?;
            debug!(file_length, "streaming file, length taken from the source");
        }
        let header_length = reader.read_fixed_long(6)?;

        Ok(FileHeader {
            file_type,
            complexity_level,
            standard_type,
            originating_station,
            date,
            title,
            security,
            copy_number,
            number_of_copies,
            encryption,
            background_colour,
            originator_name,
            originator_phone,
            file_length,
            header_length,
            streaming,
            user_defined_overflow: None,
            extended_overflow: None,
        })
    }
}
