use super::*;
use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn identifier() -> Identifier {
    Identifier::new(ArchiveAnalyzer::without_tool(), IdentifyOptions::default())
}

fn write(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in files {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A v5 CHD header whose metadata directory holds one entry tagged `tag`.
fn chd_with_tag(tag: &[u8; 4]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"MComprHD");
    buf.extend_from_slice(&124u32.to_be_bytes());
    buf.extend_from_slice(&5u32.to_be_bytes());
    buf.resize(124, 0);
    // logical bytes, metadata offset, hunk bytes
    buf[32..40].copy_from_slice(&(650u64 * 1024 * 1024).to_be_bytes());
    buf[48..56].copy_from_slice(&124u64.to_be_bytes());
    buf[56..60].copy_from_slice(&19584u32.to_be_bytes());

    buf.extend_from_slice(tag);
    buf.extend_from_slice(&0u32.to_be_bytes());
    buf.extend_from_slice(&0u64.to_be_bytes());
    buf.extend_from_slice(&16u64.to_be_bytes());
    buf.extend_from_slice(&[0u8; 16]);
    buf
}

#[test]
fn direct_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "Super Mario Bros. (World).nes", b"NES\x1a");

    let id = identifier().identify(&path).unwrap();
    assert_eq!(id.console, ConsoleId::Known(Platform::Nes));
    assert!(id.is_identified());
    assert!(id.archive.is_none());
    assert!(id.disc.is_none());
}

#[test]
fn iso_content_picks_the_console() {
    let dir = tempfile::tempdir().unwrap();

    let mut ps2 = vec![0u8; 64];
    ps2.extend_from_slice(b"BOOT2 = cdrom0:\\SLUS_200.62;1");
    let path = write(dir.path(), "game.iso", &ps2);
    assert_eq!(identifier().identify(&path).unwrap().console, ConsoleId::Known(Platform::Ps2));

    let mut psp = vec![0u8; 64];
    psp.extend_from_slice(b"PSP GAME");
    let path = write(dir.path(), "other.iso", &psp);
    assert_eq!(identifier().identify(&path).unwrap().console, ConsoleId::Known(Platform::Psp));
}

#[test]
fn content_beyond_the_sniff_limit_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = vec![0u8; 256];
    data.extend_from_slice(b"PSP GAME");
    let path = write(dir.path(), "game.iso", &data);

    let short = Identifier::new(
        ArchiveAnalyzer::without_tool(),
        IdentifyOptions {
            content_sniff_bytes: 128,
            ..IdentifyOptions::default()
        },
    );
    // No hint seen: first candidate.
    assert_eq!(short.identify(&path).unwrap().console, ConsoleId::Known(Platform::Ps2));
    assert_eq!(identifier().identify(&path).unwrap().console, ConsoleId::Known(Platform::Psp));
}

#[test]
fn filename_hint_without_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "Game (Saturn).cue", b"FILE \"Game.bin\" BINARY\n");

    let id = identifier().identify(&path).unwrap();
    assert_eq!(id.console, ConsoleId::Known(Platform::Saturn));
}

#[test]
fn gd_rom_chd_is_dreamcast() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "Crazy Taxi.chd", &chd_with_tag(b"CHGD"));

    let id = identifier().identify(&path).unwrap();
    assert_eq!(id.console, ConsoleId::Known(Platform::Dreamcast));
    assert_eq!(id.platform_hint, Some("Dreamcast"));
    let disc = id.disc.unwrap();
    assert_eq!(disc.version, 5);
    assert_eq!(disc.track_count, 1);
}

#[test]
fn cd_rom_chd_stays_a_disc_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "game.chd", &chd_with_tag(b"CHT2"));

    let id = identifier().identify(&path).unwrap();
    assert_eq!(id.console, ConsoleId::DiscImage);
    assert_eq!(id.platform_hint, None);
    assert!(id.disc.is_some());
}

#[test]
fn unreadable_chd_keeps_the_extension_answer() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "broken.chd", b"definitely not a CHD image");

    let id = identifier().identify(&path).unwrap();
    assert_eq!(id.console, ConsoleId::DiscImage);
    assert!(id.disc.is_none());
}

#[test]
fn archive_with_one_rom() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "snes.zip",
        &zip_bytes(&[("Game.sfc", b"rom"), ("readme.txt", b"hi")]),
    );

    let id = identifier().identify(&path).unwrap();
    assert_eq!(id.console, ConsoleId::Known(Platform::Snes));
    assert_eq!(id.payloads, vec![("Game.sfc".to_string(), ConsoleId::Known(Platform::Snes))]);
    assert_eq!(id.archive.unwrap().entries.len(), 2);
}

#[test]
fn nested_archive_with_mixed_roms() {
    let dir = tempfile::tempdir().unwrap();
    let inner = zip_bytes(&[("game.nes", b"NES\x1a")]);
    let path = write(
        dir.path(),
        "bundle.zip",
        &zip_bytes(&[("top.gb", b"gb"), ("inner.zip", &inner)]),
    );

    let id = identifier().identify(&path).unwrap();
    assert_eq!(
        id.payloads,
        vec![
            ("top.gb".to_string(), ConsoleId::Known(Platform::GameBoy)),
            ("inner.zip/game.nes".to_string(), ConsoleId::Known(Platform::Nes)),
        ]
    );
    assert_eq!(id.console, ConsoleId::Unknown);
    assert_eq!(id.payload_consoles().len(), 2);

    let flat = Identifier::new(
        ArchiveAnalyzer::without_tool(),
        IdentifyOptions {
            scan_nested: false,
            ..IdentifyOptions::default()
        },
    );
    let id = flat.identify(&path).unwrap();
    assert_eq!(id.console, ConsoleId::Known(Platform::GameBoy));
    assert_eq!(id.payloads.len(), 1);
}

#[test]
fn corrupt_archive_is_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bad.zip", b"PK but not really");

    let id = identifier().identify(&path).unwrap();
    assert_eq!(id.console, ConsoleId::Unknown);
    assert!(id.payloads.is_empty());
}

#[test]
fn unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "notes.txt", b"hello");
    assert_eq!(identifier().identify(&path).unwrap().console, ConsoleId::Unknown);
}

#[test]
fn directories_and_missing_files_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        identifier().identify(dir.path()),
        Err(IdentifyError::NotAFile(_))
    ));
    assert!(matches!(
        identifier().identify(&dir.path().join("missing.nes")),
        Err(IdentifyError::Io(_))
    ));
}

#[test]
fn serializes_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "game.nes", b"NES\x1a");

    let id = identifier().identify(&path).unwrap();
    let json = serde_json::to_value(&id).unwrap();
    assert_eq!(json["console"], "nes");
    assert!(json["disc"].is_null());
}

#[test]
fn entry_names_resolve_without_content() {
    assert_eq!(resolve_entry("dir/Game (USA).sfc"), ConsoleId::Known(Platform::Snes));
    assert_eq!(resolve_entry("inner.zip/Game (PSP).iso"), ConsoleId::Known(Platform::Psp));
    assert_eq!(resolve_entry("README"), ConsoleId::Unknown);
    assert_eq!(resolve_entry("notes.txt"), ConsoleId::Unknown);
}

#[test]
fn options_follow_settings() {
    let settings = Settings::from_toml("[analysis]\nscan_nested = false\ncontent_sniff_bytes = 0\n");
    let options = IdentifyOptions::from(&settings.analysis);
    assert!(!options.scan_nested);
    assert_eq!(options.content_sniff_bytes, 0);
    assert!(IdentifyOptions::default().scan_nested);
}
