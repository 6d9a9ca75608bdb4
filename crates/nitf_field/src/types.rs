//! Small value types shared by every segment.

use std::fmt;

use binrw::BinRead;

use crate::date::DatePattern;

#[cfg(feature = "serde")]
use serde::Serialize;

/// File type and version, taken from the first nine characters of a file
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum FileType {
    /// `NITF02.00`
    Nitf20,
    /// `NITF02.10`
    Nitf21,
    /// `NSIF01.00`, field-for-field identical to NITF 2.1
    Nsif10,
}

impl FileType {
    /// Width of the combined profile name and version field
    pub const WIDTH: usize = 9;

    /// Match the nine character profile and version marker
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "NITF02.00" => Some(FileType::Nitf20),
            "NITF02.10" => Some(FileType::Nitf21),
            "NSIF01.00" => Some(FileType::Nsif10),
            _ => None,
        }
    }

    /// The nine character marker that opens a file of this type
    pub const fn marker(&self) -> &'static str {
        match self {
            FileType::Nitf20 => "NITF02.00",
            FileType::Nitf21 => "NITF02.10",
            FileType::Nsif10 => "NSIF01.00",
        }
    }

    /// Whether the file uses the NITF 2.0 field layouts
    pub const fn is_legacy(&self) -> bool {
        matches!(self, FileType::Nitf20)
    }

    /// Layout of the 14 character date and time fields
    pub const fn date_pattern(&self) -> DatePattern {
        match self {
            FileType::Nitf20 => DatePattern::DayTimeMonthYear,
            FileType::Nitf21 | FileType::Nsif10 => DatePattern::CenturyDateTime,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Binary colour triple, stored as three unsigned bytes
#[derive(BinRead, Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(big)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    /// Number of bytes a colour triple occupies
    pub const WIDTH: usize = 3;
}
