use super::*;
use crate::codec::fourcc;
use crate::fixtures::*;
use romsort_core::util::MIB;
use std::io::Write;

const META: u64 = 0x200;

fn parse_bytes(buf: Vec<u8>) -> DiscImageMetadata {
    let size = buf.len() as u64;
    parse_reader(&mut cursor(buf), size).unwrap()
}

fn cd_image(tags: &[&[u8; 4]]) -> Vec<u8> {
    let mut buf = v5_header([fourcc(b"cdlz"), fourcc(b"cdzl"), 0, 0], 650 * MIB, 19_584, META);
    put_chain(&mut buf, META, tags, 64);
    buf
}

#[test]
fn v5_cd_from_metadata() {
    let meta = parse_bytes(cd_image(&[b"CHT2"]));
    assert_eq!(meta.version, 5);
    assert_eq!(meta.media_type, MediaType::CdRom);
    assert_eq!(meta.media_source, MediaSource::Metadata);
    assert_eq!(meta.track_count, 1);
    assert_eq!(meta.compression, vec!["cd-lzma", "cd-zlib"]);
    assert_eq!(meta.raw_tags, vec!["CHT2"]);
    assert_eq!(meta.metadata_offset, META);
    assert_eq!(meta.hunk_size, 19_584);
    assert_eq!(meta.logical_bytes, 650 * MIB);
    assert!(meta.is_compressed());
    assert!(!meta.has_parent());
    assert_eq!(meta.platform_hint(), None);
}

#[test]
fn gd_rom_hints_dreamcast() {
    let meta = parse_bytes(cd_image(&[b"CHGD", b"CHGD", b"CHGD"]));
    assert_eq!(meta.media_type, MediaType::GdRom);
    assert_eq!(meta.track_count, 3);
    assert_eq!(meta.platform_hint(), Some("Dreamcast"));
}

#[test]
fn v4_metadata_is_walked() {
    let mut buf = v4_header(fourcc(b"zlib"), 10, 40_960, 4096, META);
    put_chain(&mut buf, META, &[b"GDDD"], 16);
    let meta = parse_bytes(buf);
    assert_eq!(meta.version, 4);
    assert_eq!(meta.media_type, MediaType::Hdd);
    assert_eq!(meta.media_source, MediaSource::Metadata);
}

#[test]
fn missing_metadata_falls_back_to_size() {
    let buf = v5_header([fourcc(b"cdlz"), 0, 0, 0], 0, 19_584, 0);
    let meta = parse_reader(&mut cursor(buf), 700 * MIB).unwrap();
    assert_eq!(meta.media_type, MediaType::CdRom);
    assert_eq!(meta.media_source, MediaSource::SizeHeuristic);
    assert_eq!(meta.track_count, 0);
    assert_eq!(meta.file_size, 700 * MIB);
}

#[test]
fn metadata_offset_past_end_falls_back_to_size() {
    let buf = v5_header([0; 4], 0, 0, 0xFFFF_FFFF);
    let meta = parse_bytes(buf);
    assert_eq!(meta.media_source, MediaSource::SizeHeuristic);
    assert_eq!(meta.media_type, MediaType::Unknown);
    assert!(meta.raw_tags.is_empty());
}

#[test]
fn inconclusive_metadata_keeps_tags() {
    let meta = parse_bytes(cd_image(&[b"XYZW"]));
    assert_eq!(meta.media_source, MediaSource::SizeHeuristic);
    assert_eq!(meta.raw_tags, vec!["XYZW"]);
}

#[test]
fn older_versions_use_size() {
    let buf = v3_header(1, 10, 40_960, 4096);
    let meta = parse_reader(&mut cursor(buf), 1200 * MIB).unwrap();
    assert_eq!(meta.version, 3);
    assert_eq!(meta.media_type, MediaType::GdRom);
    assert_eq!(meta.media_source, MediaSource::SizeHeuristic);
    assert_eq!(meta.compression, vec!["zlib"]);
}

#[test]
fn unsupported_version_degrades() {
    let meta = parse_reader(&mut cursor(preamble(124, 9)), 4000 * MIB).unwrap();
    assert_eq!(meta.version, 9);
    assert_eq!(meta.media_type, MediaType::Unknown);
    assert_eq!(meta.media_source, MediaSource::Unavailable);
    assert_eq!(meta.compression, vec!["unknown"]);
    assert_eq!(meta.logical_bytes, 0);
    assert_eq!(meta.hunk_size, 0);
    assert_eq!(meta.total_hunks, 0);
    assert_eq!(meta.file_size, 0);
    assert_eq!(meta.metadata_offset, 0);
    assert_eq!(meta.track_count, 0);
    assert_eq!(meta.content_hash, None);
}

#[test]
fn non_chd_is_an_error_from_reader() {
    let err = parse_reader(&mut cursor(vec![0u8; 512]), 512).unwrap_err();
    assert!(err.is_format_mismatch());
}

#[test]
fn parse_reads_files() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&cd_image(&[b"CHT2", b"CHT2"])).unwrap();
    file.flush().unwrap();

    let meta = parse(file.path()).expect("valid CHD");
    assert_eq!(meta.track_count, 2);
    assert_eq!(meta.file_size, file.as_file().metadata().unwrap().len());
}

#[test]
fn parse_returns_none_for_other_files() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"just some text").unwrap();
    assert_eq!(parse(file.path()), None);

    let dir = tempfile::tempdir().unwrap();
    assert_eq!(parse(&dir.path().join("missing.chd")), None);
    assert!(matches!(
        parse_file(&dir.path().join("missing.chd")),
        Err(ChdError::Io(_))
    ));
}

#[test]
fn serializes_to_json() {
    let meta = parse_bytes(cd_image(&[b"CHT2"]));
    let json = serde_json::to_value(&meta).unwrap();
    assert_eq!(json["version"], 5);
    assert_eq!(json["media_type"], "CdRom");
    assert_eq!(json["media_source"], "Metadata");
    assert_eq!(json["compression"][1], "cd-zlib");
}
