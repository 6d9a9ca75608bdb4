//! Parse configuration

use bon::Builder;

/// Which segment payloads to keep in memory
///
/// Every flag defaults to `false`, in which case the payload is skipped. Metadata is parsed
/// the same way whatever the flags say.
///
/// ```
/// use nitf_file::ParseOptions;
///
/// let options = ParseOptions::builder().extract_texts(true).build();
/// assert!(options.extract_texts);
/// assert!(!options.extract_images);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Builder)]
pub struct ParseOptions {
    #[builder(default)]
    pub extract_images: bool,

    #[builder(default)]
    pub extract_graphics: bool,

    #[builder(default)]
    pub extract_symbols: bool,

    #[builder(default)]
    pub extract_labels: bool,

    #[builder(default)]
    pub extract_texts: bool,

    /// Data extension payloads; overflow segments are always parsed for their TREs instead
    #[builder(default)]
    pub extract_des: bool,
}

impl ParseOptions {
    /// Keep every payload
    pub fn extract_all() -> Self {
        ParseOptions {
            extract_images: true,
            extract_graphics: true,
            extract_symbols: true,
            extract_labels: true,
            extract_texts: true,
            extract_des: true,
        }
    }
}
