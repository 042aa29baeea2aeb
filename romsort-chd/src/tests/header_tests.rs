use super::*;
use crate::codec::fourcc;
use crate::fixtures::*;

fn read_header(buf: Vec<u8>) -> Result<ChdHeader, ChdError> {
    let mut reader = cursor(buf);
    let preamble = read_preamble(&mut reader)?;
    ChdHeader::read(&mut reader, &preamble)
}

// -- Preamble --

#[test]
fn rejects_missing_signature() {
    let mut buf = v5_header([0; 4], 0, 0, 0);
    buf[0] = b'X';
    assert!(matches!(read_header(buf), Err(ChdError::NotThisFormat)));
}

#[test]
fn empty_input_is_not_a_chd() {
    let err = read_header(Vec::new()).unwrap_err();
    assert!(err.is_format_mismatch());
}

#[test]
fn signature_without_preamble_is_truncated() {
    let err = read_header(CHD_MAGIC.to_vec()).unwrap_err();
    match err {
        ChdError::Truncated { expected, actual } => {
            assert_eq!(expected, 16);
            assert_eq!(actual, 8);
        }
        other => panic!("expected Truncated, got {:?}", other),
    }
}

#[test]
fn short_header_is_truncated() {
    let mut buf = v5_header([0; 4], 0, 0, 0);
    buf.truncate(100);
    match read_header(buf).unwrap_err() {
        ChdError::Truncated { expected, actual } => {
            assert_eq!(expected, 124);
            assert_eq!(actual, 100);
        }
        other => panic!("expected Truncated, got {:?}", other),
    }
}

#[test]
fn oversized_declared_length_is_capped() {
    let mut buf = v5_header([fourcc(b"zlib"), 0, 0, 0], 4096, 4096, 0);
    put_u32(&mut buf, 8, 100_000);
    let header = read_header(buf).unwrap();
    assert_eq!(header.version(), 5);
    assert_eq!(header.compression(), vec!["zlib"]);
}

#[test]
fn magic_probe_rewinds() {
    let mut reader = cursor(v5_header([0; 4], 0, 0, 0));
    assert!(has_chd_magic(&mut reader));
    assert_eq!(reader.position(), 0);

    let mut other = cursor(b"PK\x03\x04 not a disc image".to_vec());
    assert!(!has_chd_magic(&mut other));
}

// -- Versions --

#[test]
fn v5_fields() {
    let mut buf = v5_header(
        [fourcc(b"cdlz"), fourcc(b"cdzl"), fourcc(b"cdfl"), 0],
        1_000_000,
        19_584,
        0x1234,
    );
    put_bytes(&mut buf, 84, &[0xab; 20]);
    let header = read_header(buf).unwrap();

    assert_eq!(header.version(), 5);
    assert!(header.is_supported());
    assert_eq!(header.logical_bytes(), 1_000_000);
    assert_eq!(header.hunk_bytes(), 19_584);
    assert_eq!(header.total_hunks(), 52);
    assert_eq!(header.metadata_offset(), 0x1234);
    assert_eq!(header.compression(), vec!["cd-lzma", "cd-zlib", "cd-flac"]);
    assert_eq!(header.content_hash(), Some("ab".repeat(20)));
    assert_eq!(header.parent_hash(), None);
}

#[test]
fn v5_uncompressed_reports_none() {
    let header = read_header(v5_header([0; 4], 2048, 2048, 0)).unwrap();
    assert_eq!(header.compression(), vec!["none"]);
    assert_eq!(header.total_hunks(), 1);
}

#[test]
fn v5_zero_hunk_size_has_no_hunks() {
    let header = read_header(v5_header([0; 4], 2048, 0, 0)).unwrap();
    assert_eq!(header.total_hunks(), 0);
}

#[test]
fn v5_parent_hash() {
    let mut buf = v5_header([fourcc(b"lzma"), 0, 0, 0], 0, 0, 0);
    put_bytes(&mut buf, 104, &[0x01; 20]);
    let header = read_header(buf).unwrap();
    assert_eq!(header.parent_hash(), Some("01".repeat(20)));
    assert_eq!(header.content_hash(), None);
}

#[test]
fn v4_fields() {
    let header = read_header(v4_header(fourcc(b"zlib"), 300, 300 * 4096, 4096, 0x200)).unwrap();
    assert!(matches!(header, ChdHeader::V4(_)));
    assert_eq!(header.compression(), vec!["zlib"]);
    assert_eq!(header.total_hunks(), 300);
    assert_eq!(header.logical_bytes(), 300 * 4096);
    assert_eq!(header.hunk_bytes(), 4096);
    assert_eq!(header.metadata_offset(), 0x200);
}

#[test]
fn v3_uses_legacy_codec_and_no_metadata() {
    let header = read_header(v3_header(2, 10, 40_960, 4096)).unwrap();
    assert_eq!(header.version(), 3);
    assert_eq!(header.compression(), vec!["zlib+"]);
    assert_eq!(header.metadata_offset(), 0);
    assert_eq!(header.hunk_bytes(), 4096);
    assert_eq!(header.total_hunks(), 10);
}

#[test]
fn v1_geometry_uses_512_byte_sectors() {
    let header = read_header(geometry_header(8, 100, (10, 4, 32), None)).unwrap();
    assert_eq!(header.version(), 1);
    assert_eq!(header.hunk_bytes(), 4096);
    assert_eq!(header.logical_bytes(), 10 * 4 * 32 * 512);
    assert_eq!(header.compression(), vec!["zlib"]);
    assert_eq!(header.content_hash(), None);
}

#[test]
fn v2_geometry_reads_sector_size() {
    let header = read_header(geometry_header(8, 100, (10, 4, 32), Some(2048))).unwrap();
    assert_eq!(header.version(), 2);
    assert_eq!(header.hunk_bytes(), 8 * 2048);
    assert_eq!(header.logical_bytes(), 10 * 4 * 32 * 2048);
}

#[test]
fn unknown_version_is_unsupported_not_an_error() {
    let header = read_header(preamble(124, 6)).unwrap();
    assert_eq!(header, ChdHeader::Unsupported(6));
    assert!(!header.is_supported());
    assert_eq!(header.version(), 6);
    assert_eq!(header.compression(), vec!["unknown"]);
    assert_eq!(header.logical_bytes(), 0);
    assert_eq!(header.metadata_offset(), 0);
}

#[test]
fn version_zero_is_unsupported() {
    assert_eq!(read_header(preamble(16, 0)).unwrap(), ChdHeader::Unsupported(0));
}

#[test]
fn min_lengths() {
    assert_eq!(min_header_len(1), Some(76));
    assert_eq!(min_header_len(5), Some(124));
    assert_eq!(min_header_len(7), None);
}
