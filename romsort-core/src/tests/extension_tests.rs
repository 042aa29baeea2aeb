use super::*;
use std::collections::HashSet;

#[test]
fn direct_extensions_ignore_hints() {
    for &(ext, console) in direct_rules() {
        let noisy = b"SEGA GENESIS PLAYSTATION BOOT2 (PSP)";
        assert_eq!(
            resolve(ext, Some(&noisy[..]), Some("Game (PSX) (Saturn).bin")),
            console,
            "direct extension {} should ignore hints",
            ext,
        );
        assert_eq!(resolve(ext, None, None), console);
    }
}

#[test]
fn ambiguous_extensions_default_to_first_candidate() {
    for rule in ambiguous_rules() {
        assert_eq!(
            resolve(rule.extension, None, None),
            rule.candidates[0].console,
            "{} without hints",
            rule.extension,
        );
        assert_eq!(
            resolve(rule.extension, Some(&b"nothing useful here"[..]), Some("plain name")),
            rule.candidates[0].console,
        );
    }
}

#[test]
fn second_candidate_wins_on_filename_hint() {
    for rule in ambiguous_rules() {
        let Some(second) = rule.candidates.get(1) else {
            continue;
        };
        let filename = format!("Some Game {}{}", second.hints[0], rule.extension);
        assert_eq!(
            resolve(rule.extension, None, Some(&filename)),
            second.console,
            "filename '{}' should select {:?}",
            filename,
            second.console,
        );
    }
}

#[test]
fn no_extension_in_both_tables() {
    let direct: HashSet<&str> = direct_rules().iter().map(|(e, _)| *e).collect();
    for rule in ambiguous_rules() {
        assert!(
            !direct.contains(rule.extension),
            "{} is both direct and ambiguous",
            rule.extension
        );
    }
}

#[test]
fn extensions_are_unique_and_normalized() {
    let mut seen = HashSet::new();
    for ext in known_extensions() {
        assert!(seen.insert(ext), "{} listed twice", ext);
        assert_eq!(normalize_extension(ext), ext);
    }
}

#[test]
fn ambiguous_candidate_lists_are_well_formed() {
    for rule in ambiguous_rules() {
        assert!(!rule.candidates.is_empty(), "{} has no candidates", rule.extension);
        let mut consoles = HashSet::new();
        for candidate in rule.candidates {
            assert!(
                consoles.insert(candidate.console),
                "{} lists {:?} twice",
                rule.extension,
                candidate.console
            );
        }
    }
}

#[test]
fn content_hint_selects_console() {
    let mut header = vec![0u8; 0x200];
    header[0x100..0x110].copy_from_slice(b"SEGA MEGA DRIVE ");
    assert_eq!(
        resolve(".bin", Some(header.as_slice()), None),
        ConsoleId::Known(Platform::Genesis)
    );

    let ps1 = b"\x00\x00CD001\x01\x00PLAYSTATION                     ";
    assert_eq!(resolve(".bin", Some(&ps1[..]), None), ConsoleId::Known(Platform::Ps1));
}

#[test]
fn content_hint_beats_lower_priority_filename_hint() {
    // Priority order decides, not which input the hint came from.
    assert_eq!(
        resolve(".iso", Some(&b"cdrom0:\\SLUS_123.45;1 BOOT2"[..]), Some("Game (PSP).iso")),
        ConsoleId::Known(Platform::Ps2)
    );
}

#[test]
fn hints_are_case_sensitive() {
    assert_eq!(
        resolve(".iso", None, Some("game (psp).iso")),
        ConsoleId::Known(Platform::Ps2)
    );
}

#[test]
fn extension_is_case_normalized() {
    assert_eq!(resolve(".NES", None, None), ConsoleId::Known(Platform::Nes));
    assert_eq!(resolve("nes", None, None), ConsoleId::Known(Platform::Nes));
    assert_eq!(resolve(".Chd", None, None), ConsoleId::DiscImage);
}

#[test]
fn unknown_extension_is_unknown() {
    assert_eq!(resolve(".txt", None, None), ConsoleId::Unknown);
    assert_eq!(resolve("", Some(&b"SEGA GENESIS"[..]), Some("x")), ConsoleId::Unknown);
    assert!(candidates(".txt").is_empty());
}

#[test]
fn resolve_path_uses_name_and_extension() {
    let path = Path::new("/roms/Sonic CD (Sega CD).cue");
    assert_eq!(resolve_path(path, None), ConsoleId::Known(Platform::SegaCd));
    assert_eq!(resolve_path(Path::new("/roms/README"), None), ConsoleId::Unknown);
}

#[test]
fn known_extension_lookup() {
    assert!(is_known_extension(".gba"));
    assert!(is_known_extension("ISO"));
    assert!(!is_known_extension(".zip"));
    assert_eq!(candidates(".rvz").len(), 2);
    assert_eq!(candidates(".gba"), vec![ConsoleId::Known(Platform::Gba)]);
}
