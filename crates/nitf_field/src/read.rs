//! Sequential fixed-width field reading
//!

use binrw::BinRead;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use tracing::trace;

use crate::{
    date::{DatePattern, DateTime},
    error::{Error, Result},
    types::Rgb,
};

const SKIP_CHUNK: usize = 8 * 1024;
const READ_CHUNK: usize = 64 * 1024;

type SeekFn<R> = fn(&mut R, SeekFrom) -> io::Result<u64>;

/// A cursor over a byte source that reads NITF fixed-width fields
///
/// Every read advances a single offset, which is reported in every error raised. Whether the
/// source can seek is decided once, by the constructor used.
///
/// ```
/// use nitf_field::FieldReader;
///
/// # fn doit() -> nitf_field::error::Result<()> {
/// let mut reader = FieldReader::new(&b"NITF02.10  0042"[..]);
/// reader.verify_literal("NITF")?;
/// assert_eq!(reader.read_fixed_text(5)?, "02.10");
/// assert_eq!(reader.read_fixed_int(6)?, 42);
/// assert_eq!(reader.offset(), 15);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct FieldReader<R> {
    inner: R,
    offset: u64,
    /// Only set by [`FieldReader::seekable`]
    seek: Option<SeekFn<R>>,
}

impl<R: Read + Seek> FieldReader<R> {
    /// Wrap a seekable source
    pub fn seekable(inner: R) -> Self {
        let seek: SeekFn<R> = |reader, pos| reader.seek(pos);
        FieldReader {
            inner,
            offset: 0,
            seek: Some(seek),
        }
    }
}

impl<R: Read> FieldReader<R> {
    /// Wrap a source that can only be read forwards
    pub fn new(inner: R) -> Self {
        FieldReader {
            inner,
            offset: 0,
            seek: None,
        }
    }

    /// Bytes consumed since the reader was created
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Whether the underlying source supports seeking
    pub fn can_seek(&self) -> bool {
        self.seek.is_some()
    }

    /// Unwrap and return the inner source
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Total length of a seekable source, leaving the position untouched
    ///
    /// Returns `None` for forward-only sources.
    pub fn stream_len(&mut self) -> Result<Option<u64>> {
        let Some(seek) = self.seek else {
            return Ok(None);
        };

        let current = seek(&mut self.inner, SeekFrom::Current(0))?;
        let end = seek(&mut self.inner, SeekFrom::End(0))?;
        seek(&mut self.inner, SeekFrom::Start(current))?;

        Ok(Some(end))
    }

    /// Read exactly `n` raw bytes
    ///
    /// The buffer grows with the bytes actually read, so a length taken from the file never
    /// allocates more than the source holds.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(n.min(READ_CHUNK));
        let found = (&mut self.inner).take(n as u64).read_to_end(&mut buffer)?;
        if found < n {
            return Err(Error::ShortRead {
                offset: self.offset,
                needed: n as u64,
                found: found as u64,
            });
        }
        self.offset += found as u64;
        Ok(buffer)
    }

    /// Read exactly `n` characters
    ///
    /// Field text is BCS/ECS-A, each byte is taken as its ISO 8859-1 code point.
    pub fn read_fixed_text(&mut self, n: usize) -> Result<String> {
        let bytes = self.read_bytes(n)?;
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    /// Read `n` characters with the surrounding space padding removed
    pub fn read_trimmed_text(&mut self, n: usize) -> Result<String> {
        Ok(self.read_fixed_text(n)?.trim().to_string())
    }

    /// Read an `n` digit unsigned integer
    pub fn read_fixed_int(&mut self, n: usize) -> Result<u32> {
        let start = self.offset;
        let text = self.read_fixed_text(n)?;
        parse_digits(&text)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| {
                Error::bad_format(start, format!("expected {n} digit integer, found {text:?}"))
            })
    }

    /// Read an `n` digit unsigned integer that may exceed 32 bits
    pub fn read_fixed_long(&mut self, n: usize) -> Result<u64> {
        let start = self.offset;
        let text = self.read_fixed_text(n)?;
        parse_digits(&text).ok_or_else(|| {
            Error::bad_format(start, format!("expected {n} digit integer, found {text:?}"))
        })
    }

    /// Read an `n` character date, yielding `None` when it does not match `pattern`
    ///
    /// Truncated input is still an error.
    pub fn read_date(&mut self, n: usize, pattern: DatePattern) -> Result<Option<DateTime>> {
        let text = self.read_fixed_text(n)?;
        Ok(DateTime::parse(text.trim_end(), pattern))
    }

    /// Read an `n` character date that must match `pattern`
    pub fn read_date_strict(&mut self, n: usize, pattern: DatePattern) -> Result<DateTime> {
        let start = self.offset;
        let text = self.read_fixed_text(n)?;
        DateTime::parse(text.trim_end(), pattern).ok_or_else(|| {
            Error::bad_format(start, format!("expected {pattern} date, found {text:?}"))
        })
    }

    /// Read `expected.len()` bytes and require them to equal `expected`
    pub fn verify_literal(&mut self, expected: &str) -> Result<()> {
        let start = self.offset;
        let found = self.read_fixed_text(expected.len())?;
        if found != expected {
            return Err(Error::structural(
                start,
                format!("expected {expected:?}, found {found:?}"),
            ));
        }
        Ok(())
    }

    /// Read a binary colour triple
    pub fn read_rgb(&mut self) -> Result<Rgb> {
        let start = self.offset;
        let bytes = self.read_bytes(Rgb::WIDTH)?;
        Rgb::read(&mut Cursor::new(bytes))
            .map_err(|e| Error::bad_format(start, format!("invalid colour triple: {e}")))
    }

    /// Advance past `n` bytes, returning how many were actually skipped
    ///
    /// Stops early only at the end of the source.
    pub fn skip(&mut self, n: u64) -> Result<u64> {
        let skipped = match self.seek {
            Some(seek) => {
                let current = seek(&mut self.inner, SeekFrom::Current(0))?;
                let end = seek(&mut self.inner, SeekFrom::End(0))?;
                let target = current.saturating_add(n).min(end.max(current));
                seek(&mut self.inner, SeekFrom::Start(target))?;
                target - current
            }
            None => self.skip_by_reading(n)?,
        };

        trace!(requested = n, skipped, offset = self.offset, "skipped bytes");
        self.offset += skipped;
        Ok(skipped)
    }

    fn skip_by_reading(&mut self, n: u64) -> Result<u64> {
        let mut scratch = [0u8; SKIP_CHUNK];
        let mut remaining = n;
        while remaining > 0 {
            let want = remaining.min(SKIP_CHUNK as u64) as usize;
            match self.inner.read(&mut scratch[..want]) {
                Ok(0) => break,
                Ok(got) => remaining -= got as u64,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(n - remaining)
    }
}

/// Digits with optional space padding, rejecting blank fields and signs
fn parse_digits(text: &str) -> Option<u64> {
    let digits = text.trim_matches(' ');
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
