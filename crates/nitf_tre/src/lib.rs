//! This library reads **Tagged Record Extensions** (TREs) embedded in NITF headers.
//!
//! # TRE Record Format
//!
//! TREs are carried in the user defined and extended data areas of the file header and of
//! every segment subheader, and in overflow data extension segments. An area holds records
//! back to back until its declared length is used up:
//!
//! | Offset (bytes) | Field  | Description                                                 |
//! |----------------|--------|-------------------------------------------------------------|
//! | 0x0000         | CETAG  | 6 bytes: Tag naming the record layout, space padded         |
//! | 0x0006         | CEL    | 5 bytes: ASCII decimal length of the data that follows      |
//! | 0x000B         | CEDATA | CEL bytes: Fields laid out as the tag's schema describes    |
//!
//! ## Schemas
//!
//! The layout of CEDATA is not hard-coded. A [`SchemaRegistry`] maps each tag to a list of
//! directives (fixed-width fields and loops, possibly nested) and [`TreReader`] interprets
//! those directives to build a [`TreGroup`] tree. A loop may repeat a literal number of times
//! or as many times as a field read earlier in the same group says.
//!
//! Records whose tag has no schema are skipped whole and reported as a
//! [`TreDiagnostic::UnknownTag`], so new extensions never stop a file from being read.
//!
//! ## Additional Information
//!
//! - A record must use exactly the number of bytes it declares.
//! - Conditional layout directives are recognised in schemas but rejected when used.
//!

pub mod collection;
pub mod error;
pub mod read;
pub mod schema;
pub mod types;

pub use collection::TreCollection;
pub use read::{TreDiagnostic, TreReader};
pub use schema::SchemaRegistry;
pub use types::{Tre, TreEntry, TreGroup};
