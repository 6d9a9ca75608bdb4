mod common;

use common::{
    des_subheader, graphic_subheader, image_subheader, label_subheader, symbol_subheader,
    text_subheader, tre, NitfBuilder, Version, REGISTRY,
};
use nitf_field::{Classification, DateTime, ErrorKind, FileType, Rgb};
use nitf_file::{error::Result, File, Location, ParseOptions, Segment};
use nitf_tre::{SchemaRegistry, TreDiagnostic};
use pretty_assertions::assert_eq;
use std::io::Cursor;
use tracing_test::traced_test;

fn registry() -> SchemaRegistry {
    SchemaRegistry::from_json(REGISTRY).unwrap()
}

fn parse(bytes: &[u8], options: ParseOptions) -> Result<File> {
    File::read(bytes, &registry(), options)
}

#[test]
fn minimal_current_header() -> Result<()> {
    let bytes = NitfBuilder::new(Version::Nitf21).build();
    let file = parse(&bytes, ParseOptions::default())?;

    assert_eq!(file.file_type(), FileType::Nitf21);
    assert_eq!(file.complexity_level(), 3);
    assert_eq!(file.header.standard_type, "BF01");
    assert_eq!(file.header.originating_station, "STATION");
    assert_eq!(Some(file.date()), DateTime::new(2024, 1, 31, 12, 0, 0));
    assert_eq!(file.title(), "Test file");
    assert_eq!(file.header.security.classification, Classification::Unclassified);
    assert_eq!(file.header.copy_number, 1);
    assert_eq!(file.header.number_of_copies, 1);
    assert_eq!(
        file.header.background_colour,
        Some(Rgb {
            red: 0,
            green: 0x80,
            blue: 0xff
        })
    );
    assert_eq!(file.header.originator_name, "ORIGINATOR");
    assert_eq!(file.header.file_length, bytes.len() as u64);
    assert_eq!(file.header.header_length, bytes.len() as u64);
    assert!(!file.header.streaming);

    assert!(file.images.is_empty());
    assert!(file.graphics.is_empty());
    assert!(file.symbols.is_empty());
    assert!(file.labels.is_empty());
    assert!(file.texts.is_empty());
    assert!(file.data_extensions.is_empty());
    assert!(file.tres.is_empty());
    assert!(file.diagnostics.is_empty());
    Ok(())
}

#[test]
fn nsif_reads_as_current_layout() -> Result<()> {
    let bytes = NitfBuilder::new(Version::Nsif10)
        .text(text_subheader(Version::Nsif10, &[]), b"hello")
        .build();
    let file = parse(&bytes, ParseOptions::default())?;

    assert_eq!(file.file_type(), FileType::Nsif10);
    assert_eq!(file.texts[0].attachment_level, 2);
    Ok(())
}

#[traced_test]
#[test]
fn unknown_tre_then_known_tre() -> Result<()> {
    let mut tres = tre("AAAAAA", "0123456789");
    tres.extend(tre("TEST_B", "2abcdef"));
    let builder = NitfBuilder::new(Version::Nitf21).user_defined_tres(tres, 0);
    let bytes = builder.build();

    let file = parse(&bytes, ParseOptions::default())?;

    assert_eq!(file.diagnostics.len(), 1);
    assert!(matches!(
        &file.diagnostics[0],
        TreDiagnostic::UnknownTag { tag, length: 10, .. } if tag == "AAAAAA"
    ));
    assert_eq!(file.tres.unique_names(), vec!["TEST_B"]);

    let known = &file.tres[0].group;
    assert_eq!(known.int_value("COUNT"), Some(2));
    let items: Vec<_> = known
        .groups("ITEMS")
        .unwrap()
        .iter()
        .filter_map(|g| g.value("ITEM"))
        .collect();
    assert_eq!(items, vec!["abc", "def"]);
    assert!(logs_contain("skipping unknown tre"));
    Ok(())
}

#[test]
fn streaming_length_needs_seek() {
    let builder = NitfBuilder::new(Version::Nitf21)
        .text(text_subheader(Version::Nitf21, &[]), b"payload")
        .file_length("999999999999");
    let bytes = builder.build();

    let err = parse(&bytes, ParseOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedStructure);
    assert_eq!(err.offset(), Some(builder.file_length_offset()));
}

#[test]
fn streaming_length_from_seekable_source() -> Result<()> {
    let bytes = NitfBuilder::new(Version::Nitf21)
        .text(text_subheader(Version::Nitf21, &[]), b"payload")
        .file_length("999999999999")
        .build();

    let options = ParseOptions::builder().extract_texts(true).build();
    let file = File::read_seekable(Cursor::new(&bytes), &registry(), options)?;

    assert!(file.header.streaming);
    assert_eq!(file.header.file_length, bytes.len() as u64);
    assert_eq!(file.texts[0].text().as_deref(), Some("payload"));
    Ok(())
}

#[test]
fn retention_only_changes_payloads() -> Result<()> {
    let bytes = NitfBuilder::new(Version::Nitf21)
        .image(image_subheader(&tre("TEST_A", "11")), &[1, 2, 3, 4])
        .graphic(graphic_subheader(&[]), b"CGM")
        .text(text_subheader(Version::Nitf21, &[]), b"some text")
        .data_extension(des_subheader("CSATTA DES", None), b"DESDATA")
        .build();

    let skipped = parse(&bytes, ParseOptions::default())?;
    let mut retained = parse(&bytes, ParseOptions::extract_all())?;

    assert_eq!(skipped.images[0].data(), None);
    assert_eq!(retained.images[0].data(), Some(&[1u8, 2, 3, 4][..]));
    assert_eq!(retained.graphics[0].data(), Some(&b"CGM"[..]));
    assert_eq!(retained.texts[0].text().as_deref(), Some("some text"));
    assert_eq!(retained.data_extensions[0].data(), Some(&b"DESDATA"[..]));

    retained.images[0].data = None;
    retained.graphics[0].data = None;
    retained.texts[0].data = None;
    retained.data_extensions[0].data = None;
    assert_eq!(retained, skipped);
    Ok(())
}

#[test]
fn read_image_subheader() -> Result<()> {
    let bytes = NitfBuilder::new(Version::Nitf21)
        .image(image_subheader(&tre("TEST_A", "42")), &[0; 4])
        .build();
    let file = parse(&bytes, ParseOptions::default())?;
    let image = &file.images[0];

    assert_eq!(image.id(), "IMAGE1");
    assert_eq!(image.target_id, "TARGET");
    assert_eq!(image.rows, 2);
    assert_eq!(image.columns, 2);
    assert_eq!(image.pixel_count(), 4);
    assert_eq!(image.pixel_value_type, "INT");
    assert_eq!(image.representation, "MONO");
    assert_eq!(image.coordinate_system, "G");
    assert_eq!(image.geolocation.as_ref().map(String::len), Some(60));
    assert_eq!(image.comments, vec!["first comment"]);
    assert!(image.is_uncompressed());
    assert_eq!(image.compression_rate, None);
    assert_eq!(image.bands.len(), 1);
    assert_eq!(image.bands[0].representation, "M");
    assert_eq!(image.bands[0].luts, vec![vec![0, 85, 170, 255]]);
    assert_eq!(image.mode, "B");
    assert_eq!(image.pixels_per_block_horizontal, 2);
    assert_eq!(image.bits_per_pixel, 8);
    assert_eq!(image.display_level(), 1);
    assert_eq!(image.attachment_level(), 0);
    assert_eq!(image.location, Location { row: -1, column: 10 });
    assert_eq!(image.magnification, "1.0");
    assert_eq!(image.tres.first("TEST_A").map(|t| t.prefix.as_str()), Some("test_"));
    Ok(())
}

#[test]
fn read_graphic_subheader() -> Result<()> {
    let bytes = NitfBuilder::new(Version::Nitf21)
        .graphic(graphic_subheader(&tre("TEST_A", "07")), b"CGM")
        .build();
    let file = parse(&bytes, ParseOptions::default())?;
    let graphic = &file.graphics[0];

    assert_eq!(graphic.id, "GRAPHIC1");
    assert_eq!(graphic.name, "Outline");
    assert_eq!(graphic.format, "C");
    assert_eq!(graphic.display_level, 2);
    assert_eq!(graphic.attachment_level, 1);
    assert_eq!(graphic.location, Location { row: 10, column: 20 });
    assert_eq!(graphic.second_bound, Location { row: 100, column: 100 });
    assert_eq!(graphic.tres.len(), 1);
    Ok(())
}

#[test]
fn read_legacy_file() -> Result<()> {
    let bytes = NitfBuilder::new(Version::Nitf20)
        .symbol(symbol_subheader(&[]), &[0xaa])
        .label(label_subheader(&tre("TEST_A", "01")), b"HELLO")
        .text(text_subheader(Version::Nitf20, &[]), b"notes")
        .build();

    let options = ParseOptions::builder()
        .extract_labels(true)
        .extract_symbols(true)
        .build();
    let file = parse(&bytes, options)?;

    assert_eq!(file.file_type(), FileType::Nitf20);
    assert_eq!(Some(file.date()), DateTime::new(2024, 1, 31, 12, 0, 0));
    assert_eq!(file.header.background_colour, None);
    assert!(file.graphics.is_empty());

    let symbol = &file.symbols[0];
    assert_eq!(symbol.symbol_type, "B");
    assert_eq!(symbol.display_level, 3);
    assert_eq!(symbol.location, Location { row: 5, column: 6 });
    assert_eq!(symbol.rotation, 90);
    assert_eq!(symbol.lut.len(), 2);
    assert_eq!(symbol.lut[1], Rgb { red: 255, green: 255, blue: 255 });
    assert_eq!(symbol.data(), Some(&[0xaa][..]));

    let label = &file.labels[0];
    assert_eq!(label.cell_width, 8);
    assert_eq!(label.cell_height, 12);
    assert_eq!(label.text_colour, Rgb { red: 255, green: 0, blue: 0 });
    assert_eq!(label.background_colour, Rgb { red: 0, green: 0, blue: 255 });
    assert_eq!(label.text().as_deref(), Some("HELLO"));
    assert_eq!(label.tres.len(), 1);

    let text = &file.texts[0];
    assert_eq!(text.id, "TEXT1");
    assert_eq!(text.attachment_level, 0);
    assert_eq!(text.format, "STA");
    assert_eq!(text.data(), None);
    Ok(())
}

#[test]
fn overflow_is_merged_into_its_owner() -> Result<()> {
    let mut overflow = tre("TEST_A", "02");
    overflow.extend(tre("TEST_A", "03"));

    let bytes = NitfBuilder::new(Version::Nitf21)
        .user_defined_tres(tre("TEST_A", "00"), 2)
        .text(text_subheader(Version::Nitf21, &tre("TEST_A", "01")), b"")
        .data_extension(des_subheader("TRE_OVERFLOW", Some(("TXSHD", 1))), &overflow)
        .data_extension(des_subheader("TRE_OVERFLOW", Some(("UDHD", 0))), &tre("TEST_A", "04"))
        .build();
    let file = parse(&bytes, ParseOptions::default())?;

    let values: Vec<_> = file.texts[0]
        .tres
        .by_name("TEST_A")
        .iter()
        .filter_map(|t| t.group.value("VALUE"))
        .collect();
    assert_eq!(values, vec!["01", "02", "03"]);

    assert_eq!(file.header.user_defined_overflow, Some(2));
    assert_eq!(file.tres.by_name("TEST_A").len(), 2);
    assert_eq!(file.data_extensions.len(), 2);
    assert!(file.data_extensions.iter().all(|d| d.overflow.is_some()));
    Ok(())
}

#[test]
fn legacy_overflow_targets_symbols() -> Result<()> {
    let bytes = NitfBuilder::new(Version::Nitf20)
        .symbol(symbol_subheader(&[]), &[])
        .data_extension(
            des_subheader("Registered Extensions", Some(("SXSHD", 1))),
            &tre("TEST_A", "09"),
        )
        .build();
    let file = parse(&bytes, ParseOptions::default())?;

    assert_eq!(file.symbols[0].tres.len(), 1);
    assert_eq!(file.tre_collections().len(), 1);
    assert_eq!(file.tre_collections()[0].0, "symbol 1");
    Ok(())
}

#[test]
fn overflow_to_missing_segment_is_unsupported() {
    let bytes = NitfBuilder::new(Version::Nitf21)
        .data_extension(
            des_subheader("TRE_OVERFLOW", Some(("IXSHD", 1))),
            &tre("TEST_A", "00"),
        )
        .build();
    let err = parse(&bytes, ParseOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedStructure);
}

#[test]
fn unknown_overflow_area_is_unsupported() {
    let bytes = NitfBuilder::new(Version::Nitf21)
        .data_extension(des_subheader("TRE_OVERFLOW", Some(("BOGUS", 0))), &[])
        .build();
    let err = parse(&bytes, ParseOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedStructure);
}

#[test]
fn subheader_length_must_match_directory() {
    let mut builder = NitfBuilder::new(Version::Nitf21).text(text_subheader(Version::Nitf21, &[]), b"");
    // one byte of the subheader is pushed into the payload
    let (subheader, data) = &mut builder.texts[0];
    data.insert(0, subheader.pop().unwrap());
    let bytes = builder.build();

    let err = parse(&bytes, ParseOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn truncated_payload_is_a_short_read() {
    let mut bytes = NitfBuilder::new(Version::Nitf21)
        .text(text_subheader(Version::Nitf21, &[]), b"0123456789")
        .build();
    bytes.truncate(bytes.len() - 4);

    let err = parse(&bytes, ParseOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShortRead);

    let err = parse(&bytes, ParseOptions::extract_all()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShortRead);
}

#[test]
fn oversized_payload_length_is_a_short_read() {
    let builder = NitfBuilder::new(Version::Nitf21).image(image_subheader(&[]), &[1, 2, 3, 4]);
    let mut bytes = builder.build();
    // FL, HL, NUMI and LISH precede LI
    let li = builder.file_length_offset() as usize + 12 + 6 + 3 + 6;
    bytes[li..li + 10].copy_from_slice(b"9999999998");

    let err = parse(&bytes, ParseOptions::extract_all()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShortRead);

    let err = parse(&bytes, ParseOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShortRead);
}

#[test]
fn malformed_file_date_is_bad_format() {
    let mut bytes = NitfBuilder::new(Version::Nitf21).build();
    // FHDR, CLEVEL, STYPE and OSTAID precede FDT
    bytes[25..39].copy_from_slice(b"NOT A DATE!!!!");

    let err = parse(&bytes, ParseOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadFormat);
    assert_eq!(err.offset(), Some(25));
}

#[test]
fn malformed_image_date_is_bad_format() {
    let mut subheader = image_subheader(&[]);
    // IM and IID1 precede IDATIM
    subheader[12..26].copy_from_slice(b"99999999999999");
    let builder = NitfBuilder::new(Version::Nitf21).image(subheader, &[0; 4]);
    let bytes = builder.build();

    let err = parse(&bytes, ParseOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadFormat);
}

#[test]
fn unknown_marker_is_structural() {
    let mut bytes = NitfBuilder::new(Version::Nitf21).build();
    bytes[..4].copy_from_slice(b"JPEG");

    let err = parse(&bytes, ParseOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.offset(), Some(0));
}

#[test]
fn bad_segment_marker_is_structural() {
    let mut subheader = text_subheader(Version::Nitf21, &[]);
    subheader[..2].copy_from_slice(b"XX");
    let bytes = NitfBuilder::new(Version::Nitf21).text(subheader, b"").build();

    let err = parse(&bytes, ParseOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}
