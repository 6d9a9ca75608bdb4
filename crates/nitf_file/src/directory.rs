//! The segment length directory of the file header
//!

use nitf_field::{Error as FieldError, FieldReader, FileType};
use std::io::Read;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{error::Result, segment::SegmentKind};

const COUNT_WIDTH: usize = 3;

/// Subheader and payload length of one segment
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SegmentLength {
    pub subheader: u64,
    pub data: u64,
}

/// Lengths of every segment, grouped by kind in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Directory {
    pub images: Vec<SegmentLength>,
    pub graphics: Vec<SegmentLength>,
    pub symbols: Vec<SegmentLength>,
    pub labels: Vec<SegmentLength>,
    pub texts: Vec<SegmentLength>,
    pub data_extensions: Vec<SegmentLength>,
}

impl Directory {
    /// Read the directory in the order used by `file_type`
    pub fn read<R: Read>(reader: &mut FieldReader<R>, file_type: FileType) -> Result<Self> {
        let mut directory = Directory {
            images: read_lengths(reader, SegmentKind::Image, 6, 10)?,
            ..Default::default()
        };

        if file_type.is_legacy() {
            directory.symbols = read_lengths(reader, SegmentKind::Symbol, 4, 6)?;
            directory.labels = read_lengths(reader, SegmentKind::Label, 4, 3)?;
        } else {
            directory.graphics = read_lengths(reader, SegmentKind::Graphic, 4, 6)?;
            require_none(reader, "NUMX")?;
        }

        directory.texts = read_lengths(reader, SegmentKind::Text, 4, 5)?;
        directory.data_extensions = read_lengths(reader, SegmentKind::DataExtension, 4, 9)?;
        require_none(reader, "NUMRES")?;

        Ok(directory)
    }

    /// Lengths listed for `kind`
    pub fn lengths(&self, kind: SegmentKind) -> &[SegmentLength] {
        match kind {
            SegmentKind::Image => &self.images,
            SegmentKind::Graphic => &self.graphics,
            SegmentKind::Symbol => &self.symbols,
            SegmentKind::Label => &self.labels,
            SegmentKind::Text => &self.texts,
            SegmentKind::DataExtension => &self.data_extensions,
        }
    }
}

fn read_lengths<R: Read>(
    reader: &mut FieldReader<R>,
    kind: SegmentKind,
    subheader_width: usize,
    data_width: usize,
) -> Result<Vec<SegmentLength>> {
    let count = reader.read_fixed_int(COUNT_WIDTH)?;
    debug!(%kind, count, "reading segment lengths");

    (0..count)
        .map(|_| {
            let subheader = reader.read_fixed_long(subheader_width)?;
            let start = reader.offset();
            let data = reader.read_fixed_long(data_width)?;
            if is_all_nines(data, data_width) {
                return Err(FieldError::unsupported(
                    start,
                    format!("{kind} segment uses a streaming placeholder length"),
                )
                .into());
            }
            Ok(SegmentLength { subheader, data })
        })
        .collect()
}

fn require_none<R: Read>(reader: &mut FieldReader<R>, field: &str) -> Result<()> {
    let start = reader.offset();
    match reader.read_fixed_int(COUNT_WIDTH)? {
        0 => Ok(()),
        count => Err(FieldError::unsupported(
            start,
            format!("{field} is {count}, reserved segments are not handled"),
        )
        .into()),
    }
}

fn is_all_nines(value: u64, width: usize) -> bool {
    10u64
        .checked_pow(width as u32)
        .is_some_and(|limit| value == limit - 1)
}
