use super::*;
use std::collections::HashSet;

#[test]
fn canonical_names_round_trip() {
    for &platform in Platform::all() {
        let parsed: Platform = platform.short_name().parse().unwrap();
        assert_eq!(parsed, platform, "round-trip failed for {:?}", platform);
    }
}

#[test]
fn aliases_resolve_correctly() {
    let cases = [
        ("gc", Platform::GameCube),
        ("psx", Platform::Ps1),
        ("mega drive", Platform::Genesis),
        ("gbc", Platform::GameBoy),
        ("dc", Platform::Dreamcast),
        ("vcs", Platform::Atari2600),
        ("tg16", Platform::PcEngine),
        ("ngpc", Platform::NeoGeoPocket),
        ("wsc", Platform::WonderSwan),
    ];
    for (input, expected) in cases {
        let parsed: Platform = input.parse().unwrap();
        assert_eq!(
            parsed, expected,
            "alias '{}' should parse to {:?}",
            input, expected
        );
    }
}

#[test]
fn case_insensitive_parsing() {
    let parsed: Platform = "SNES".parse().unwrap();
    assert_eq!(parsed, Platform::Snes);
    let parsed: Platform = "PcEngine".parse().unwrap();
    assert_eq!(parsed, Platform::PcEngine);
}

#[test]
fn unknown_string_returns_err() {
    let result: Result<Platform, _> = "commodore64".parse();
    assert!(result.is_err());
}

#[test]
fn short_name_is_first_alias() {
    for &platform in Platform::all() {
        assert_eq!(
            platform.short_name(),
            platform.aliases()[0],
            "short_name should be first alias for {:?}",
            platform,
        );
    }
}

#[test]
fn aliases_are_unique_across_platforms() {
    let mut seen = HashSet::new();
    for &platform in Platform::all() {
        for alias in platform.aliases() {
            assert!(seen.insert(*alias), "alias '{}' is claimed twice", alias);
        }
    }
}

#[test]
fn serializes_as_short_name() {
    let json = serde_json::to_string(&Platform::Dreamcast).unwrap();
    assert_eq!(json, "\"dreamcast\"");
}
