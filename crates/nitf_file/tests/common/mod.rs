//! In-memory builders for NITF test files
#![allow(dead_code)]

pub const REGISTRY: &str = r#"{ "tres": {
    "TEST_A": { "prefix": "test_", "layout": [
        { "field": { "name": "VALUE", "length": 2 } }
    ] },
    "TEST_B": { "layout": [
        { "field": { "name": "COUNT", "length": 1 } },
        { "loop": { "counter": "COUNT", "name": "ITEMS", "layout": [
            { "field": { "name": "ITEM", "length": 3 } }
        ] } }
    ] }
} }"#;

pub fn pad(value: &str, width: usize) -> String {
    format!("{value:<width$}")
}

/// One TRE record
pub fn tre(tag: &str, body: &str) -> Vec<u8> {
    format!("{tag:<6}{:05}{body}", body.len()).into_bytes()
}

/// An extension area: length, overflow index, then records
pub fn extension(tres: &[u8], overflow: u32) -> Vec<u8> {
    if tres.is_empty() {
        return b"00000".to_vec();
    }
    let mut out = format!("{:05}{overflow:03}", tres.len() + 3).into_bytes();
    out.extend_from_slice(tres);
    out
}

/// Unclassified security block, 167 bytes in both layouts
pub fn security() -> String {
    format!("U{}", " ".repeat(166))
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Nitf20,
    Nitf21,
    Nsif10,
}

impl Version {
    fn marker(&self) -> &'static str {
        match self {
            Version::Nitf20 => "NITF02.00",
            Version::Nitf21 => "NITF02.10",
            Version::Nsif10 => "NSIF01.00",
        }
    }

    fn legacy(&self) -> bool {
        *self == Version::Nitf20
    }
}

type Part = (Vec<u8>, Vec<u8>);

pub struct NitfBuilder {
    version: Version,
    file_length: Option<String>,
    user_defined: Vec<u8>,
    user_defined_overflow: u32,
    extended: Vec<u8>,
    pub images: Vec<Part>,
    pub graphics: Vec<Part>,
    pub symbols: Vec<Part>,
    pub labels: Vec<Part>,
    pub texts: Vec<Part>,
    pub data_extensions: Vec<Part>,
}

impl NitfBuilder {
    pub fn new(version: Version) -> Self {
        NitfBuilder {
            version,
            file_length: None,
            user_defined: Vec::new(),
            user_defined_overflow: 0,
            extended: Vec::new(),
            images: Vec::new(),
            graphics: Vec::new(),
            symbols: Vec::new(),
            labels: Vec::new(),
            texts: Vec::new(),
            data_extensions: Vec::new(),
        }
    }

    /// Replace the computed `FL` with `value`
    pub fn file_length(mut self, value: &str) -> Self {
        self.file_length = Some(value.to_string());
        self
    }

    pub fn user_defined_tres(mut self, tres: Vec<u8>, overflow: u32) -> Self {
        self.user_defined = tres;
        self.user_defined_overflow = overflow;
        self
    }

    pub fn extended_tres(mut self, tres: Vec<u8>) -> Self {
        self.extended = tres;
        self
    }

    pub fn image(mut self, subheader: Vec<u8>, data: &[u8]) -> Self {
        self.images.push((subheader, data.to_vec()));
        self
    }

    pub fn graphic(mut self, subheader: Vec<u8>, data: &[u8]) -> Self {
        self.graphics.push((subheader, data.to_vec()));
        self
    }

    pub fn symbol(mut self, subheader: Vec<u8>, data: &[u8]) -> Self {
        self.symbols.push((subheader, data.to_vec()));
        self
    }

    pub fn label(mut self, subheader: Vec<u8>, data: &[u8]) -> Self {
        self.labels.push((subheader, data.to_vec()));
        self
    }

    pub fn text(mut self, subheader: Vec<u8>, data: &[u8]) -> Self {
        self.texts.push((subheader, data.to_vec()));
        self
    }

    pub fn data_extension(mut self, subheader: Vec<u8>, data: &[u8]) -> Self {
        self.data_extensions.push((subheader, data.to_vec()));
        self
    }

    /// Offset of the `FL` field
    pub fn file_length_offset(&self) -> u64 {
        self.fixed_fields().len() as u64
    }

    fn fixed_fields(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(self.version.marker().as_bytes());
        out.extend_from_slice(b"03BF01");
        out.extend_from_slice(pad("STATION", 10).as_bytes());
        if self.version.legacy() {
            out.extend_from_slice(b"31120000ZJAN24");
        } else {
            out.extend_from_slice(b"20240131120000");
        }
        out.extend_from_slice(pad("Test file", 80).as_bytes());
        out.extend_from_slice(security().as_bytes());
        out.extend_from_slice(b"00001000010");
        if self.version.legacy() {
            out.extend_from_slice(pad("ORIGINATOR", 27).as_bytes());
        } else {
            out.extend_from_slice(&[0x00, 0x80, 0xff]);
            out.extend_from_slice(pad("ORIGINATOR", 24).as_bytes());
        }
        out.extend_from_slice(pad("555 0100", 18).as_bytes());
        out
    }

    fn directory(&self) -> Vec<u8> {
        fn lengths(parts: &[Part], subheader: usize, data: usize) -> String {
            let mut out = format!("{:03}", parts.len());
            for (s, d) in parts {
                out += &format!("{:0subheader$}{:0data$}", s.len(), d.len());
            }
            out
        }

        let mut out = lengths(&self.images, 6, 10);
        if self.version.legacy() {
            out += &lengths(&self.symbols, 4, 6);
            out += &lengths(&self.labels, 4, 3);
        } else {
            out += &lengths(&self.graphics, 4, 6);
            out += "000";
        }
        out += &lengths(&self.texts, 4, 5);
        out += &lengths(&self.data_extensions, 4, 9);
        out += "000";
        out.into_bytes()
    }

    pub fn build(&self) -> Vec<u8> {
        let fixed = self.fixed_fields();
        let mut rest = self.directory();
        rest.extend(extension(&self.user_defined, self.user_defined_overflow));
        rest.extend(extension(&self.extended, 0));

        let header_length = fixed.len() + 12 + 6 + rest.len();
        let segments: Vec<&Part> = self
            .images
            .iter()
            .chain(&self.graphics)
            .chain(&self.symbols)
            .chain(&self.labels)
            .chain(&self.texts)
            .chain(&self.data_extensions)
            .collect();
        let file_length = header_length
            + segments
                .iter()
                .map(|(s, d)| s.len() + d.len())
                .sum::<usize>();

        let mut out = fixed;
        let file_length = self
            .file_length
            .clone()
            .unwrap_or_else(|| format!("{file_length:012}"));
        out.extend_from_slice(file_length.as_bytes());
        out.extend_from_slice(format!("{header_length:06}").as_bytes());
        out.extend(rest);
        for (subheader, data) in segments {
            out.extend_from_slice(subheader);
            out.extend_from_slice(data);
        }
        out
    }
}

/// NITF 2.1 image subheader for a 2x2 single band image
pub fn image_subheader(tres: &[u8]) -> Vec<u8> {
    let mut out = String::from("IM");
    out += &pad("IMAGE1", 10);
    out += "20240131120000";
    out += &pad("TARGET", 17);
    out += &pad("A test image", 80);
    out += &security();
    out += "0";
    out += &pad("SENSOR", 42);
    out += "0000000200000002";
    out += "INT";
    out += &pad("MONO", 8);
    out += &pad("VIS", 8);
    out += "08R";
    out += "G";
    out += &"+32.000000-117.000000".repeat(3)[..60];
    out += "1";
    out += &pad("first comment", 80);
    out += "NC";
    out += "1";
    out += "M ";
    out += &pad("", 6);
    out += "N   ";
    out += "1";
    out += "00004";
    let mut bytes = out.into_bytes();
    bytes.extend_from_slice(&[0, 85, 170, 255]);

    let mut tail = String::from("0B");
    tail += "0001000100020002";
    tail += "08";
    tail += "001000";
    tail += "-000100010";
    tail += "1.0 ";
    bytes.extend(tail.into_bytes());
    bytes.extend(extension(tres, 0));
    bytes.extend(extension(&[], 0));
    bytes
}

/// NITF 2.1 graphic subheader
pub fn graphic_subheader(tres: &[u8]) -> Vec<u8> {
    let mut out = String::from("SY");
    out += &pad("GRAPHIC1", 10);
    out += &pad("Outline", 20);
    out += &security();
    out += "0";
    out += "C";
    out += &"0".repeat(13);
    out += "002";
    out += "001";
    out += "0001000020";
    out += "0000000000";
    out += "C";
    out += "0010000100";
    out += "00";
    let mut bytes = out.into_bytes();
    bytes.extend(extension(tres, 0));
    bytes
}

/// Text subheader in the layout of `version`
pub fn text_subheader(version: Version, tres: &[u8]) -> Vec<u8> {
    let mut out = String::from("TE");
    match version {
        Version::Nitf20 => {
            out += &pad("TEXT1", 10);
            out += "31120000ZJAN24";
        }
        _ => {
            out += &pad("TEXT1", 7);
            out += "002";
            out += "20240131120000";
        }
    }
    out += &pad("Notes", 80);
    out += &security();
    out += "0";
    out += "STA";
    let mut bytes = out.into_bytes();
    bytes.extend(extension(tres, 0));
    bytes
}

/// NITF 2.0 symbol subheader with a two entry look-up table
pub fn symbol_subheader(tres: &[u8]) -> Vec<u8> {
    let mut out = String::from("SY");
    out += &pad("SYMBOL1", 10);
    out += &pad("Marker", 20);
    out += &security();
    out += "0";
    out += "B";
    out += "0002";
    out += "0002";
    out += "0000";
    out += "1";
    out += "003";
    out += "000";
    out += "0000500006";
    out += "0000000000";
    out += " ";
    out += "000000";
    out += "090";
    out += "002";
    let mut bytes = out.into_bytes();
    bytes.extend_from_slice(&[0, 0, 0, 255, 255, 255]);
    bytes.extend(extension(tres, 0));
    bytes
}

/// NITF 2.0 label subheader
pub fn label_subheader(tres: &[u8]) -> Vec<u8> {
    let mut out = String::from("LA");
    out += &pad("LABEL1", 10);
    out += &security();
    out += "0";
    out += " ";
    out += "08";
    out += "12";
    out += "004";
    out += "000";
    out += "0010000020";
    let mut bytes = out.into_bytes();
    bytes.extend_from_slice(&[255, 0, 0, 0, 0, 255]);
    bytes.extend(extension(tres, 0));
    bytes
}

/// A DES subheader; overflow segments get `DESOFLW` and `DESITEM`
pub fn des_subheader(id: &str, overflow: Option<(&str, u32)>) -> Vec<u8> {
    let mut out = String::from("DE");
    out += &pad(id, 25);
    out += "01";
    out += &security();
    if let Some((area, item)) = overflow {
        out += &pad(area, 6);
        out += &format!("{item:03}");
    }
    out += "0004";
    out += "ABCD";
    out.into_bytes()
}
