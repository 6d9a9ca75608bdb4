//! The parsed file
//!

use nitf_field::{DateTime, FileType};
use nitf_tre::{SchemaRegistry, TreCollection, TreDiagnostic};
use std::{
    fs,
    io::{BufReader, Read, Seek},
    path::Path,
};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    des::DataExtensionSegment,
    error::Result,
    graphic::GraphicSegment,
    header::FileHeader,
    image::ImageSegment,
    label::LabelSegment,
    options::ParseOptions,
    read::FileParser,
    segment::Segment,
    symbol::SymbolSegment,
    text::TextSegment,
};

/// Everything read from a NITF or NSIF file
///
/// ```no_run
/// use nitf_file::{File, ParseOptions};
/// use nitf_tre::SchemaRegistry;
///
/// # fn doit() -> nitf_file::error::Result<()> {
/// let registry = SchemaRegistry::builtin()?;
/// let file = File::open("image.ntf", &registry, ParseOptions::default())?;
///
/// println!("{} with {} images", file.file_type(), file.images.len());
/// for (owner, tres) in file.tre_collections() {
///     println!("{owner}: {:?}", tres.unique_names());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct File {
    pub header: FileHeader,
    /// TREs from `UDHD` and `XHD`, with any overflow appended
    pub tres: TreCollection,
    pub images: Vec<ImageSegment>,
    pub graphics: Vec<GraphicSegment>,
    pub symbols: Vec<SymbolSegment>,
    pub labels: Vec<LabelSegment>,
    pub texts: Vec<TextSegment>,
    pub data_extensions: Vec<DataExtensionSegment>,
    /// Problems that did not stop the parse
    pub diagnostics: Vec<TreDiagnostic>,
}

impl File {
    pub(crate) fn new(header: FileHeader) -> Self {
        File {
            header,
            tres: TreCollection::new(),
            images: Vec::new(),
            graphics: Vec::new(),
            symbols: Vec::new(),
            labels: Vec::new(),
            texts: Vec::new(),
            data_extensions: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Parse from a source that can only be read forwards
    pub fn read<R: Read>(
        reader: R,
        registry: &SchemaRegistry,
        options: ParseOptions,
    ) -> Result<File> {
        FileParser::new(reader, registry, options).parse()
    }

    /// Parse from a seekable source, which also allows streaming mode files
    pub fn read_seekable<R: Read + Seek>(
        reader: R,
        registry: &SchemaRegistry,
        options: ParseOptions,
    ) -> Result<File> {
        FileParser::seekable(reader, registry, options).parse()
    }

    /// Open and parse the file at `path`
    pub fn open(
        path: impl AsRef<Path>,
        registry: &SchemaRegistry,
        options: ParseOptions,
    ) -> Result<File> {
        let reader = BufReader::new(fs::File::open(path)?);
        File::read_seekable(reader, registry, options)
    }

    pub fn file_type(&self) -> FileType {
        self.header.file_type
    }

    pub fn complexity_level(&self) -> u32 {
        self.header.complexity_level
    }

    pub fn date(&self) -> DateTime {
        self.header.date
    }

    pub fn title(&self) -> &str {
        &self.header.title
    }

    /// Every non-empty TRE collection, labelled with its owner
    pub fn tre_collections(&self) -> Vec<(String, &TreCollection)> {
        let mut collections = Vec::new();
        if !self.tres.is_empty() {
            collections.push(("file header".to_string(), &self.tres));
        }

        collect(&mut collections, &self.images);
        collect(&mut collections, &self.graphics);
        collect(&mut collections, &self.symbols);
        collect(&mut collections, &self.labels);
        collect(&mut collections, &self.texts);
        collections
    }
}

fn collect<'a, S: Segment>(into: &mut Vec<(String, &'a TreCollection)>, segments: &'a [S]) {
    for (index, segment) in segments.iter().enumerate() {
        if !segment.tres().is_empty() {
            into.push((format!("{} {}", S::KIND, index + 1), segment.tres()));
        }
    }
}
