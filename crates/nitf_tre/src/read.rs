//! Schema-driven TRE parsing
//!

use nitf_field::{Error as FieldError, FieldReader};
use std::io::Read;
use tracing::{debug, instrument, warn};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    collection::TreCollection,
    error::{Error, Result},
    schema::{Directive, LoopCount, SchemaRegistry, TreSchema},
    types::{Tre, TreEntry, TreGroup},
};

/// Width of the tag that opens every TRE record
pub const TAG_WIDTH: usize = 6;

/// Width of the length that follows the tag
pub const LENGTH_WIDTH: usize = 5;

/// A non-fatal problem met while parsing TREs
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TreDiagnostic {
    /// The registry has no layout for `tag`; its `length` bytes were skipped
    UnknownTag { tag: String, offset: u64, length: u64 },
    /// A schema field of `tag` had no name; its `length` bytes were skipped
    UnnamedField { tag: String, offset: u64, length: usize },
}

/// Reads TRE records from a shared [`FieldReader`] using a [`SchemaRegistry`]
///
/// ```
/// use nitf_field::FieldReader;
/// use nitf_tre::{SchemaRegistry, TreReader};
///
/// # fn doit() -> nitf_tre::error::Result<()> {
/// let registry = SchemaRegistry::from_json(r#"{ "tres": { "TEST_A": { "layout": [
///     { "field": { "name": "GREETING", "length": 5 } }
/// ] } } }"#)?;
///
/// let mut input = FieldReader::new(&b"TEST_A00005HELLO"[..]);
/// let mut tres = TreReader::new(&registry);
/// let collection = tres.read_block(&mut input, 16)?;
///
/// assert_eq!(collection[0].group.value("GREETING"), Some("HELLO"));
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct TreReader<'a> {
    registry: &'a SchemaRegistry,
    diagnostics: Vec<TreDiagnostic>,
    // absolute offset of the record body being walked
    base: u64,
}

impl<'a> TreReader<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        TreReader {
            registry,
            diagnostics: Vec::new(),
            base: 0,
        }
    }

    /// Problems recorded so far
    pub fn diagnostics(&self) -> &[TreDiagnostic] {
        &self.diagnostics
    }

    /// Consume the reader, returning the problems it recorded
    pub fn into_diagnostics(self) -> Vec<TreDiagnostic> {
        self.diagnostics
    }

    /// Read a run of TRE records that fills exactly `length` bytes
    #[instrument(skip(self, reader), fields(offset = reader.offset()))]
    pub fn read_block<R: Read>(
        &mut self,
        reader: &mut FieldReader<R>,
        length: u64,
    ) -> Result<TreCollection> {
        let start = reader.offset();
        let header = (TAG_WIDTH + LENGTH_WIDTH) as u64;
        let mut collection = TreCollection::new();

        loop {
            let consumed = reader.offset() - start;
            if consumed == length {
                break;
            }

            let remaining = length - consumed;
            if remaining < header {
                return Err(FieldError::structural(
                    reader.offset(),
                    format!("{remaining} bytes left in tre block, too few for a record header"),
                )
                .into());
            }

            let tag = reader.read_trimmed_text(TAG_WIDTH)?;
            let declared = reader.read_fixed_long(LENGTH_WIDTH)?;
            if declared > remaining - header {
                return Err(FieldError::structural(
                    reader.offset(),
                    format!(
                        "tre {tag} declares {declared} bytes but only {} remain in its block",
                        remaining - header
                    ),
                )
                .into());
            }

            if let Some(tre) = self.parse(&tag, declared, reader)? {
                collection.add(tre);
            }
        }

        Ok(collection)
    }

    /// Parse the body of one record whose tag and length have already been read
    ///
    /// Returns `None` when the registry does not know `tag`; the body is skipped and a
    /// [`TreDiagnostic::UnknownTag`] is recorded.
    pub fn parse<R: Read>(
        &mut self,
        tag: &str,
        declared: u64,
        reader: &mut FieldReader<R>,
    ) -> Result<Option<Tre>> {
        let start = reader.offset();

        let registry = self.registry;
        let Some(schema) = registry.get(tag) else {
            warn!(tag, offset = start, length = declared, "skipping unknown tre");
            let skipped = reader.skip(declared)?;
            if skipped != declared {
                return Err(FieldError::ShortRead {
                    offset: start,
                    needed: declared,
                    found: skipped,
                }
                .into());
            }
            self.diagnostics.push(TreDiagnostic::UnknownTag {
                tag: tag.to_string(),
                offset: start,
                length: declared,
            });
            return Ok(None);
        };

        let body = reader.read_bytes(declared as usize)?;
        self.base = start;
        let group = self
            .parse_body(schema, &body)
            .map_err(|e| rebase(e, start))?;

        debug!(tag, offset = start, length = declared, "parsed tre");
        Ok(Some(Tre::new(tag, schema.prefix.clone(), group)))
    }

    fn parse_body(&mut self, schema: &TreSchema, body: &[u8]) -> Result<TreGroup> {
        let mut reader = FieldReader::new(body);
        let group = self.walk(&schema.tag, &schema.layout, &mut reader)?;

        let consumed = reader.offset();
        if consumed != body.len() as u64 {
            return Err(FieldError::structural(
                consumed,
                format!(
                    "tre {} declares {} bytes but its layout consumed {consumed}",
                    schema.tag,
                    body.len()
                ),
            )
            .into());
        }

        Ok(group)
    }

    fn walk(
        &mut self,
        tag: &str,
        layout: &[Directive],
        reader: &mut FieldReader<&[u8]>,
    ) -> Result<TreGroup> {
        let mut group = TreGroup::new();

        for directive in layout {
            match directive {
                Directive::Field(field) => match &field.name {
                    Some(name) => {
                        let value = reader.read_fixed_text(field.length)?;
                        group.push(TreEntry::leaf(name, value));
                    }
                    None => {
                        let offset = reader.offset();
                        warn!(tag, offset, length = field.length, "skipping unnamed field");
                        let skipped = reader.skip(field.length as u64)?;
                        if skipped != field.length as u64 {
                            return Err(FieldError::ShortRead {
                                offset,
                                needed: field.length as u64,
                                found: skipped,
                            }
                            .into());
                        }
                        self.diagnostics.push(TreDiagnostic::UnnamedField {
                            tag: tag.to_string(),
                            offset: self.base + offset,
                            length: field.length,
                        });
                    }
                },
                Directive::Loop(looped) => {
                    let count = match &looped.count {
                        LoopCount::Literal(count) => *count,
                        LoopCount::CounterRef(counter) => {
                            resolve_counter(tag, &group, counter, reader.offset())?
                        }
                    };

                    let mut groups = Vec::new();
                    for _ in 0..count {
                        groups.push(self.walk(tag, &looped.body, reader)?);
                    }
                    group.push(TreEntry::repeated(&looped.name, groups));
                }
                Directive::Conditional { condition } => {
                    return Err(FieldError::unsupported(
                        reader.offset(),
                        format!("tre {tag} uses conditional layout {condition:?}"),
                    )
                    .into());
                }
            }
        }

        Ok(group)
    }
}

/// Counters only resolve against fields already read into the same group
fn resolve_counter(tag: &str, group: &TreGroup, counter: &str, offset: u64) -> Result<usize> {
    let Some(text) = group.value(counter) else {
        return Err(FieldError::structural(
            offset,
            format!("tre {tag} loop counter {counter} has not been read"),
        )
        .into());
    };

    group
        .int_value(counter)
        .and_then(|count| usize::try_from(count).ok())
        .ok_or_else(|| {
            FieldError::bad_format(
                offset,
                format!("tre {tag} loop counter {counter} is not an integer: {text:?}"),
            )
            .into()
        })
}

fn rebase(error: Error, base: u64) -> Error {
    match error {
        Error::FieldError(e) => e.rebase(base).into(),
        other => other,
    }
}
