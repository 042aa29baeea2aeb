//! Compression codec names.
//!
//! v5 headers store up to four codecs as big-endian fourcc codes. v1–v4
//! store a single code; v1–v3 used small integers before fourccs existed.

/// Known codec fourccs and the names reported for them.
const CODEC_TABLE: &[(&[u8; 4], &str)] = &[
    (b"zlib", "zlib"),
    (b"lzma", "lzma"),
    (b"huff", "huffman"),
    (b"flac", "flac"),
    (b"cdzl", "cd-zlib"),
    (b"cdlz", "cd-lzma"),
    (b"cdfl", "cd-flac"),
    (b"cdzs", "cd-zstd"),
];

/// Pre-fourcc compression ids used by v1–v3 images.
const LEGACY_CODECS: &[(u32, &str)] = &[(0, "none"), (1, "zlib"), (2, "zlib+"), (3, "avhuff")];

/// Build a fourcc code from its four bytes.
pub const fn fourcc(tag: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*tag)
}

/// Name for a fourcc codec code. Never fails.
///
/// Zero is "none". Unknown codes are shown as their four characters when
/// those are printable ASCII, otherwise as a hex literal.
pub fn codec_name(code: u32) -> String {
    if code == 0 {
        return "none".to_string();
    }
    let bytes = code.to_be_bytes();
    CODEC_TABLE
        .iter()
        .find(|(tag, _)| **tag == bytes)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| tag_or_hex(code))
}

/// Name for a v1–v3 compression code.
pub fn legacy_codec_name(code: u32) -> String {
    LEGACY_CODECS
        .iter()
        .find(|(id, _)| *id == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| codec_name(code))
}

/// Render a fourcc as text, or as `0x%08x` if any byte is not printable.
pub fn tag_or_hex(code: u32) -> String {
    let bytes = code.to_be_bytes();
    if bytes.iter().all(|b| (0x20..0x7F).contains(b)) {
        bytes.iter().map(|&b| b as char).collect()
    } else {
        format!("0x{:08x}", code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codecs() {
        assert_eq!(codec_name(fourcc(b"cdlz")), "cd-lzma");
        assert_eq!(codec_name(fourcc(b"huff")), "huffman");
        assert_eq!(codec_name(fourcc(b"zlib")), "zlib");
        assert_eq!(codec_name(0), "none");
    }

    #[test]
    fn unknown_printable_codec_is_literal() {
        assert_eq!(codec_name(fourcc(b"zstd")), "zstd");
        assert_eq!(codec_name(fourcc(b"avhu")), "avhu");
    }

    #[test]
    fn unknown_binary_codec_is_hex() {
        assert_eq!(codec_name(0x0000_00FF), "0x000000ff");
        assert_eq!(codec_name(0xDEAD_BEEF), "0xdeadbeef");
    }

    #[test]
    fn legacy_codes() {
        assert_eq!(legacy_codec_name(0), "none");
        assert_eq!(legacy_codec_name(1), "zlib");
        assert_eq!(legacy_codec_name(2), "zlib+");
        assert_eq!(legacy_codec_name(3), "avhuff");
        assert_eq!(legacy_codec_name(fourcc(b"lzma")), "lzma");
        assert_eq!(legacy_codec_name(7), "0x00000007");
    }
}
