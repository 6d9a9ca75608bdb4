//! The file parsing state machine
//!

use nitf_field::{Error as FieldError, FieldReader, FileType};
use nitf_tre::{SchemaRegistry, TreCollection, TreReader};
use std::{
    fmt,
    io::{Read, Seek},
};
use tracing::{debug, instrument};

use crate::{
    des::{DataExtensionSegment, Overflow},
    directory::{Directory, SegmentLength},
    error::Result,
    file::File,
    graphic::GraphicSegment,
    header::FileHeader,
    image::ImageSegment,
    label::LabelSegment,
    options::ParseOptions,
    segment::{read_extension, Segment, SegmentKind},
    symbol::SymbolSegment,
    text::TextSegment,
};

/// Steps of a parse, in the order they run
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseState {
    FileHeader,
    Directory,
    UserDefinedTres,
    ExtendedTres,
    Images,
    Graphics,
    Symbols,
    Labels,
    Texts,
    DataExtensions,
    Done,
}

impl ParseState {
    /// The step after this one; segment steps with nothing listed simply read nothing
    pub fn next(self) -> ParseState {
        match self {
            ParseState::FileHeader => ParseState::Directory,
            ParseState::Directory => ParseState::UserDefinedTres,
            ParseState::UserDefinedTres => ParseState::ExtendedTres,
            ParseState::ExtendedTres => ParseState::Images,
            ParseState::Images => ParseState::Graphics,
            ParseState::Graphics => ParseState::Symbols,
            ParseState::Symbols => ParseState::Labels,
            ParseState::Labels => ParseState::Texts,
            ParseState::Texts => ParseState::DataExtensions,
            ParseState::DataExtensions | ParseState::Done => ParseState::Done,
        }
    }
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Reads a whole file from one sequential cursor
///
/// ```
/// use nitf_file::{read::FileParser, ParseOptions};
/// use nitf_tre::SchemaRegistry;
///
/// let registry = SchemaRegistry::builtin().unwrap();
/// let err = FileParser::new(&b"NOTNITF"[..], &registry, ParseOptions::default())
///     .parse()
///     .unwrap_err();
/// assert_eq!(err.offset(), Some(0));
/// ```
pub struct FileParser<'a, R> {
    reader: FieldReader<R>,
    tres: TreReader<'a>,
    options: ParseOptions,
}

impl<'a, R: Read + Seek> FileParser<'a, R> {
    /// Parse a seekable source, which also allows streaming mode files
    pub fn seekable(reader: R, registry: &'a SchemaRegistry, options: ParseOptions) -> Self {
        FileParser {
            reader: FieldReader::seekable(reader),
            tres: TreReader::new(registry),
            options,
        }
    }
}

impl<'a, R: Read> FileParser<'a, R> {
    /// Parse a source that can only be read forwards
    pub fn new(reader: R, registry: &'a SchemaRegistry, options: ParseOptions) -> Self {
        FileParser {
            reader: FieldReader::new(reader),
            tres: TreReader::new(registry),
            options,
        }
    }

    /// Run every step, failing on the first fatal problem
    #[instrument(skip_all)]
    pub fn parse(mut self) -> Result<File> {
        let start = self.reader.offset();
        let header = FileHeader::read(&mut self.reader)?;
        let file_type = header.file_type;

        let mut file = File::new(header);
        let mut directory = Directory::default();
        let mut state = ParseState::FileHeader.next();

        while state != ParseState::Done {
            debug!(%state, offset = self.reader.offset(), "parse step");
            match state {
                ParseState::FileHeader | ParseState::Done => {}
                ParseState::Directory => {
                    directory = Directory::read(&mut self.reader, file_type)?;
                }
                ParseState::UserDefinedTres => {
                    let extension = read_extension(&mut self.reader, &mut self.tres, "UDHD")?;
                    file.header.user_defined_overflow = extension.overflow;
                    file.tres.add_all(extension.tres);
                }
                ParseState::ExtendedTres => {
                    let extension = read_extension(&mut self.reader, &mut self.tres, "XHD")?;
                    file.header.extended_overflow = extension.overflow;
                    file.tres.add_all(extension.tres);
                    self.check_length(start, file.header.header_length, "file header")?;
                }
                ParseState::Images => {
                    file.images = self.read_segments(&directory.images, file_type)?;
                }
                ParseState::Graphics => {
                    file.graphics = self.read_segments(&directory.graphics, file_type)?;
                }
                ParseState::Symbols => {
                    file.symbols = self.read_segments(&directory.symbols, file_type)?;
                }
                ParseState::Labels => {
                    file.labels = self.read_segments(&directory.labels, file_type)?;
                }
                ParseState::Texts => {
                    file.texts = self.read_segments(&directory.texts, file_type)?;
                }
                ParseState::DataExtensions => {
                    self.read_data_extensions(&mut file, &directory.data_extensions)?;
                }
            }
            state = state.next();
        }

        file.diagnostics = self.tres.into_diagnostics();
        debug!(
            images = file.images.len(),
            texts = file.texts.len(),
            data_extensions = file.data_extensions.len(),
            diagnostics = file.diagnostics.len(),
            "parsed file"
        );
        Ok(file)
    }

    fn read_segments<S: Segment>(
        &mut self,
        lengths: &[SegmentLength],
        file_type: FileType,
    ) -> Result<Vec<S>> {
        let extract = self.extract(S::KIND);
        lengths
            .iter()
            .map(|length| {
                let mut segment = self.read_subheader::<S>(length, file_type)?;
                if let Some(data) = self.read_payload(length.data, extract)? {
                    segment.set_data(data);
                }
                Ok(segment)
            })
            .collect()
    }

    #[instrument(skip(self, length, file_type), fields(kind = %S::KIND, offset = self.reader.offset()))]
    fn read_subheader<S: Segment>(
        &mut self,
        length: &SegmentLength,
        file_type: FileType,
    ) -> Result<S> {
        let start = self.reader.offset();
        let segment = S::read(&mut self.reader, file_type, &mut self.tres)?;
        self.check_length(start, length.subheader, &format!("{} subheader", S::KIND))?;
        debug!(id = segment.id(), data = length.data, "read subheader");
        Ok(segment)
    }

    fn read_payload(&mut self, length: u64, extract: bool) -> Result<Option<Vec<u8>>> {
        let start = self.reader.offset();
        if extract {
            let length = usize::try_from(length).map_err(|_| {
                FieldError::unsupported(start, format!("payload of {length} bytes cannot be held"))
            })?;
            return Ok(Some(self.reader.read_bytes(length)?));
        }

        let skipped = self.reader.skip(length)?;
        if skipped != length {
            return Err(FieldError::ShortRead {
                offset: start,
                needed: length,
                found: skipped,
            }
            .into());
        }
        Ok(None)
    }

    fn read_data_extensions(&mut self, file: &mut File, lengths: &[SegmentLength]) -> Result<()> {
        let file_type = file.header.file_type;
        let extract = self.extract(SegmentKind::DataExtension);

        for length in lengths {
            let mut segment: DataExtensionSegment = self.read_subheader(length, file_type)?;

            match &segment.overflow {
                Some(overflow) => {
                    let start = self.reader.offset();
                    let tres = self.tres.read_block(&mut self.reader, length.data)?;
                    merge_overflow(file, overflow, tres, start)?;
                }
                None => {
                    if let Some(data) = self.read_payload(length.data, extract)? {
                        segment.set_data(data);
                    }
                }
            }

            file.data_extensions.push(segment);
        }

        Ok(())
    }

    fn check_length(&self, start: u64, expected: u64, what: &str) -> Result<()> {
        let consumed = self.reader.offset() - start;
        if consumed != expected {
            return Err(FieldError::structural(
                self.reader.offset(),
                format!("{what} declares {expected} bytes but {consumed} were read"),
            )
            .into());
        }
        Ok(())
    }

    fn extract(&self, kind: SegmentKind) -> bool {
        match kind {
            SegmentKind::Image => self.options.extract_images,
            SegmentKind::Graphic => self.options.extract_graphics,
            SegmentKind::Symbol => self.options.extract_symbols,
            SegmentKind::Label => self.options.extract_labels,
            SegmentKind::Text => self.options.extract_texts,
            SegmentKind::DataExtension => self.options.extract_des,
        }
    }
}

/// Append overflowed TREs to the header or segment that owns them
fn merge_overflow(
    file: &mut File,
    overflow: &Overflow,
    tres: TreCollection,
    offset: u64,
) -> Result<()> {
    debug!(area = %overflow.area, item = overflow.item, count = tres.len(), "merging overflow");

    match overflow.area.as_str() {
        "UDHD" | "XHD" => match overflow.item {
            0 => {
                file.tres.merge(tres);
                Ok(())
            }
            item => Err(FieldError::unsupported(
                offset,
                format!("{} overflow names item {item}, expected 0", overflow.area),
            )
            .into()),
        },
        "UDID" | "IXSHD" => merge_into(&mut file.images, overflow, tres, offset),
        "SXSHD" if file.header.file_type.is_legacy() => {
            merge_into(&mut file.symbols, overflow, tres, offset)
        }
        "SXSHD" => merge_into(&mut file.graphics, overflow, tres, offset),
        "LXSHD" => merge_into(&mut file.labels, overflow, tres, offset),
        "TXSHD" => merge_into(&mut file.texts, overflow, tres, offset),
        area => Err(FieldError::unsupported(offset, format!("unknown overflow area {area:?}")).into()),
    }
}

fn merge_into<S: Segment>(
    segments: &mut [S],
    overflow: &Overflow,
    tres: TreCollection,
    offset: u64,
) -> Result<()> {
    let count = segments.len();
    let segment = (overflow.item as usize)
        .checked_sub(1)
        .and_then(|index| segments.get_mut(index))
        .ok_or_else(|| {
            FieldError::unsupported(
                offset,
                format!(
                    "{} overflow names {} {} but the file has {count}",
                    overflow.area,
                    S::KIND,
                    overflow.item
                ),
            )
        })?;

    segment.tres_mut().merge(tres);
    Ok(())
}
