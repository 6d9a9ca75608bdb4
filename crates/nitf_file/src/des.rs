//! Data extension segment subheaders and TRE overflow
//!

use nitf_field::{FieldReader, FileType, SecurityMetadata};
use nitf_tre::{TreCollection, TreReader};
use std::io::Read;
use tracing::{debug, instrument};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    error::Result,
    segment::{Segment, SegmentKind},
};

/// DES identifier of a TRE overflow segment in NITF 2.1 and NSIF
pub const TRE_OVERFLOW: &str = "TRE_OVERFLOW";

/// DES identifiers of a TRE overflow segment in NITF 2.0
pub const LEGACY_TRE_OVERFLOW: [&str; 2] = ["Registered Extensions", "Controlled Extensions"];

/// Where the TREs of an overflow segment belong
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Overflow {
    /// Name of the extension area that overflowed, for example `UDHD` or `IXSHD`
    pub area: String,
    /// 1-based index of the owning segment, `0` for the file header
    pub item: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DataExtensionSegment {
    pub id: String,
    pub version: u32,
    pub security: SecurityMetadata,
    /// Present only for TRE overflow segments
    pub overflow: Option<Overflow>,
    /// `DESSHF`, left unparsed
    pub user_defined_subheader: String,
    /// Always empty, overflowed TREs are merged into their owner
    pub tres: TreCollection,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub data: Option<Vec<u8>>,
}

/// Whether a DES with identifier `id` carries overflowed TREs
pub fn is_overflow_id(id: &str, file_type: FileType) -> bool {
    if file_type.is_legacy() {
        LEGACY_TRE_OVERFLOW.contains(&id)
    } else {
        id == TRE_OVERFLOW
    }
}

impl Segment for DataExtensionSegment {
    const KIND: SegmentKind = SegmentKind::DataExtension;

    #[instrument(skip_all, fields(offset = reader.offset()))]
    fn read<R: Read>(
        reader: &mut FieldReader<R>,
        file_type: FileType,
        _tres: &mut TreReader<'_>,
    ) -> Result<Self> {
        reader.verify_literal(Self::KIND.marker())?;

        let id = reader.read_trimmed_text(25)?;
        let version = reader.read_fixed_int(2)?;
        let security = SecurityMetadata::read(reader, file_type)?;

        let overflow = if is_overflow_id(&id, file_type) {
            let overflow = Overflow {
                area: reader.read_trimmed_text(6)?,
                item: reader.read_fixed_int(3)?,
            };
            debug!(area = %overflow.area, item = overflow.item, "tre overflow segment");
            Some(overflow)
        } else {
            None
        };

        let subheader_length = reader.read_fixed_int(4)? as usize;
        let user_defined_subheader = reader.read_fixed_text(subheader_length)?;

        Ok(DataExtensionSegment {
            id,
            version,
            security,
            overflow,
            user_defined_subheader,
            tres: TreCollection::new(),
            data: None,
        })
    }

    fn id(&self) -> &str {
        &self.id
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
