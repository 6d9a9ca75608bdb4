//! Security metadata blocks.
//!
//! Every subheader carries a security block. NITF 2.1 and NSIF 1.0 share one fixed 167
//! character layout; NITF 2.0 uses an older layout with an optional downgrade event field.
//!
//! | Field | 2.1 width | 2.0 width |
//! |-------|-----------|-----------|
//! | Classification | 1 | 1 |
//! | Classification system | 2 | - |
//! | Codewords | 11 | 40 |
//! | Control and handling | 2 | 40 |
//! | Release instructions | 20 | 40 |
//! | Declassification type | 2 | - |
//! | Declassification date | 8 | - |
//! | Declassification exemption | 4 | - |
//! | Downgrade | 1 | - |
//! | Downgrade date | 8 | - |
//! | Classification text | 43 | - |
//! | Classification authority type | 1 | - |
//! | Classification authority | 40 | 20 |
//! | Classification reason | 1 | - |
//! | Source date | 8 | - |
//! | Control number | 15 | 20 |
//! | Downgrade date/marker | - | 6 |
//! | Downgrade event (marker `999998` only) | - | 40 |

use std::fmt;
use std::io::Read;

use tracing::trace;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    error::{Error, Result},
    read::FieldReader,
    types::FileType,
};

/// Downgrade marker that introduces a downgrade event in NITF 2.0 security blocks
pub const DOWNGRADE_EVENT_MARKER: &str = "999998";

/// Security classification level
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Classification {
    Unclassified,
    Restricted,
    Confidential,
    Secret,
    TopSecret,
}

impl Classification {
    /// Look up the single character classification code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "U" => Some(Classification::Unclassified),
            "R" => Some(Classification::Restricted),
            "C" => Some(Classification::Confidential),
            "S" => Some(Classification::Secret),
            "T" => Some(Classification::TopSecret),
            _ => None,
        }
    }

    /// The single character code for this level
    pub const fn code(&self) -> char {
        match self {
            Classification::Unclassified => 'U',
            Classification::Restricted => 'R',
            Classification::Confidential => 'C',
            Classification::Secret => 'S',
            Classification::TopSecret => 'T',
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Classification::Unclassified => "UNCLASSIFIED",
            Classification::Restricted => "RESTRICTED",
            Classification::Confidential => "CONFIDENTIAL",
            Classification::Secret => "SECRET",
            Classification::TopSecret => "TOP SECRET",
        })
    }
}

/// Security fields of a file header or segment subheader
///
/// Text values are stored trimmed. Fields that do not exist in the file's version are left
/// empty.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SecurityMetadata {
    pub classification: Classification,
    pub classification_system: String,
    pub codewords: String,
    pub control_and_handling: String,
    pub release_instructions: String,
    pub declassification_type: String,
    pub declassification_date: String,
    pub declassification_exemption: String,
    pub downgrade: String,
    pub downgrade_date: String,
    pub classification_text: String,
    pub classification_authority_type: String,
    pub classification_authority: String,
    pub classification_reason: String,
    pub source_date: String,
    pub control_number: String,
    /// NITF 2.0 only, present when the downgrade marker is `999998`
    pub downgrade_event: Option<String>,
}

impl SecurityMetadata {
    /// An empty block at the given level
    pub fn new(classification: Classification) -> Self {
        SecurityMetadata {
            classification,
            classification_system: String::new(),
            codewords: String::new(),
            control_and_handling: String::new(),
            release_instructions: String::new(),
            declassification_type: String::new(),
            declassification_date: String::new(),
            declassification_exemption: String::new(),
            downgrade: String::new(),
            downgrade_date: String::new(),
            classification_text: String::new(),
            classification_authority_type: String::new(),
            classification_authority: String::new(),
            classification_reason: String::new(),
            source_date: String::new(),
            control_number: String::new(),
            downgrade_event: None,
        }
    }

    /// Read a security block in the layout used by `file_type`
    pub fn read<R: Read>(reader: &mut FieldReader<R>, file_type: FileType) -> Result<Self> {
        let start = reader.offset();
        let classification = read_classification(reader)?;
        let mut security = SecurityMetadata::new(classification);

        if file_type.is_legacy() {
            security.codewords = reader.read_trimmed_text(40)?;
            security.control_and_handling = reader.read_trimmed_text(40)?;
            security.release_instructions = reader.read_trimmed_text(40)?;
            security.classification_authority = reader.read_trimmed_text(20)?;
            security.control_number = reader.read_trimmed_text(20)?;
            security.downgrade_date = reader.read_trimmed_text(6)?;
            if security.downgrade_date == DOWNGRADE_EVENT_MARKER {
                security.downgrade_event = Some(reader.read_trimmed_text(40)?);
            }
        } else {
            security.classification_system = reader.read_trimmed_text(2)?;
            security.codewords = reader.read_trimmed_text(11)?;
            security.control_and_handling = reader.read_trimmed_text(2)?;
            security.release_instructions = reader.read_trimmed_text(20)?;
            security.declassification_type = reader.read_trimmed_text(2)?;
            security.declassification_date = reader.read_trimmed_text(8)?;
            security.declassification_exemption = reader.read_trimmed_text(4)?;
            security.downgrade = reader.read_trimmed_text(1)?;
            security.downgrade_date = reader.read_trimmed_text(8)?;
            security.classification_text = reader.read_trimmed_text(43)?;
            security.classification_authority_type = reader.read_trimmed_text(1)?;
            security.classification_authority = reader.read_trimmed_text(40)?;
            security.classification_reason = reader.read_trimmed_text(1)?;
            security.source_date = reader.read_trimmed_text(8)?;
            security.control_number = reader.read_trimmed_text(15)?;
        }

        trace!(
            %classification,
            width = reader.offset() - start,
            "read security block"
        );
        Ok(security)
    }
}

fn read_classification<R: Read>(reader: &mut FieldReader<R>) -> Result<Classification> {
    let start = reader.offset();
    let code = reader.read_fixed_text(1)?;
    Classification::from_code(&code)
        .ok_or_else(|| Error::bad_format(start, format!("unknown classification code {code:?}")))
}
