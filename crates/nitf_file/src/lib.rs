//! # NITF File Format Documentation
//!
//! This crate reads files in the **NITF** format (National Imagery Transmission Format) and
//! its NATO profile **NSIF**. A file is a header followed by any number of segments, each a
//! subheader and a payload. Versions `NITF02.00`, `NITF02.10` and `NSIF01.00` are supported.
//!
//! ## File Structure
//!
//! | Part                | Description                                                       |
//! |---------------------|-------------------------------------------------------------------|
//! | File header         | Identification, security, file and header lengths                 |
//! | Segment directory   | Per kind: a 3 digit count, then a subheader and payload length each |
//! | Header TREs         | `UDHDL` and `XHDL` extension areas                                |
//! | Image segments      | `IM` subheader then pixel data                                    |
//! | Graphic segments    | `SY` subheader then CGM data, NITF 2.1 and NSIF                   |
//! | Symbol segments     | `SY` subheader then symbol data, NITF 2.0                         |
//! | Label segments      | `LA` subheader then label text, NITF 2.0                          |
//! | Text segments       | `TE` subheader then text                                          |
//! | Data extensions     | `DE` subheader then data, possibly overflowed TREs                |
//!
//! ### Segment Directory
//!
//! | Kind      | Count field | Subheader length | Payload length | Versions      |
//! |-----------|-------------|------------------|----------------|---------------|
//! | Image     | `NUMI`      | 6                | 10             | all           |
//! | Graphic   | `NUMS`      | 4                | 6              | 2.1, NSIF     |
//! | Symbol    | `NUMS`      | 4                | 6              | 2.0           |
//! | Label     | `NUML`      | 4                | 3              | 2.0           |
//! | Reserved  | `NUMX`      | -                | -              | 2.1, NSIF     |
//! | Text      | `NUMT`      | 4                | 5              | all           |
//! | DES       | `NUMDES`    | 4                | 9              | all           |
//! | Reserved  | `NUMRES`    | 4                | 7              | all           |
//!
//! Reserved counts must be zero.
//!
//! ### TRE Overflow
//!
//! When an extension area is too large for its subheader, the remaining TREs are stored in a
//! data extension segment named `TRE_OVERFLOW` (`Registered Extensions` or
//! `Controlled Extensions` in NITF 2.0). Its `DESOFLW` field names the area and `DESITEM`
//! the 1-based index of the owning segment. Those TREs are appended to the owner's collection.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.ntf`, `.nitf`, `.nsf`
//! - **Encoding**: fixed-width ASCII fields, see [`nitf_field`]
//!

pub mod des;
pub mod directory;
pub mod error;
pub mod file;
pub mod graphic;
pub mod header;
pub mod image;
pub mod label;
pub mod options;
pub mod read;
pub mod segment;
pub mod symbol;
pub mod text;

pub use des::DataExtensionSegment;
pub use file::File;
pub use graphic::GraphicSegment;
pub use header::FileHeader;
pub use image::{ImageBand, ImageSegment};
pub use label::LabelSegment;
pub use options::ParseOptions;
pub use read::FileParser;
pub use segment::{Location, Segment, SegmentKind};
pub use symbol::SymbolSegment;
pub use text::TextSegment;
