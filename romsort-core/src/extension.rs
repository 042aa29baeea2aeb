//! Extension → console resolution.
//!
//! Most ROM extensions belong to exactly one console and live in the direct
//! table. A handful (`.iso`, `.bin`, `.cue`, ...) are shared by several
//! families; those live in the ambiguous table with an ordered candidate list
//! and per-candidate hint substrings that are searched for in the file's
//! leading bytes and in its filename.

use std::path::Path;

use crate::{ConsoleId, Platform};

/// A console that may own an ambiguous extension, plus the literal
/// substrings that identify it.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub console: ConsoleId,
    pub hints: &'static [&'static str],
}

/// An extension shared by several consoles, in priority order.
///
/// The first candidate is the default when no hint matches.
#[derive(Debug, Clone, Copy)]
pub struct AmbiguousRule {
    pub extension: &'static str,
    pub candidates: &'static [Candidate],
}

const fn known(platform: Platform, hints: &'static [&'static str]) -> Candidate {
    Candidate {
        console: ConsoleId::Known(platform),
        hints,
    }
}

const fn direct(extension: &'static str, platform: Platform) -> (&'static str, ConsoleId) {
    (extension, ConsoleId::Known(platform))
}

/// Extensions owned by a single console.
const DIRECT_MAP: &[(&str, ConsoleId)] = &[
    direct(".nes", Platform::Nes),
    direct(".fds", Platform::Nes),
    direct(".unf", Platform::Nes),
    direct(".unif", Platform::Nes),
    direct(".smc", Platform::Snes),
    direct(".sfc", Platform::Snes),
    direct(".fig", Platform::Snes),
    direct(".swc", Platform::Snes),
    direct(".n64", Platform::N64),
    direct(".z64", Platform::N64),
    direct(".v64", Platform::N64),
    direct(".gcm", Platform::GameCube),
    direct(".gcz", Platform::GameCube),
    direct(".wbfs", Platform::Wii),
    direct(".wad", Platform::Wii),
    direct(".wux", Platform::WiiU),
    direct(".wua", Platform::WiiU),
    direct(".rpx", Platform::WiiU),
    direct(".gb", Platform::GameBoy),
    direct(".gbc", Platform::GameBoy),
    direct(".sgb", Platform::GameBoy),
    direct(".gba", Platform::Gba),
    direct(".agb", Platform::Gba),
    direct(".nds", Platform::Ds),
    direct(".dsi", Platform::Ds),
    direct(".3ds", Platform::N3ds),
    direct(".cia", Platform::N3ds),
    direct(".cci", Platform::N3ds),
    direct(".cxi", Platform::N3ds),
    direct(".vb", Platform::VirtualBoy),
    direct(".sg", Platform::Sg1000),
    direct(".sc", Platform::Sg1000),
    direct(".sms", Platform::MasterSystem),
    direct(".md", Platform::Genesis),
    direct(".gen", Platform::Genesis),
    direct(".smd", Platform::Genesis),
    direct(".32x", Platform::Sega32x),
    direct(".gdi", Platform::Dreamcast),
    direct(".cdi", Platform::Dreamcast),
    direct(".gg", Platform::GameGear),
    direct(".pbp", Platform::Psp),
    direct(".cso", Platform::Psp),
    direct(".vpk", Platform::Vita),
    direct(".xbe", Platform::Xbox),
    direct(".xex", Platform::Xbox360),
    direct(".a26", Platform::Atari2600),
    direct(".a52", Platform::Atari5200),
    direct(".a78", Platform::Atari7800),
    direct(".lnx", Platform::Lynx),
    direct(".j64", Platform::Jaguar),
    direct(".jag", Platform::Jaguar),
    direct(".pce", Platform::PcEngine),
    direct(".sgx", Platform::PcEngine),
    direct(".ngp", Platform::NeoGeoPocket),
    direct(".ngc", Platform::NeoGeoPocket),
    direct(".ws", Platform::WonderSwan),
    direct(".wsc", Platform::WonderSwan),
    direct(".col", Platform::ColecoVision),
    direct(".mx1", Platform::Msx),
    direct(".mx2", Platform::Msx),
    (".chd", ConsoleId::DiscImage),
];

/// Extensions shared by several consoles.
///
/// Hints are matched literally (case-sensitive). Content hints target the
/// strings consoles put in their headers (`SEGA GENESIS` at 0x100 of a
/// cartridge, the ISO 9660 system identifier, `ATARI7800` in an A78 header);
/// filename hints target the usual tags in dump names.
const AMBIGUOUS_MAP: &[AmbiguousRule] = &[
    AmbiguousRule {
        extension: ".iso",
        candidates: &[
            known(Platform::Ps2, &["BOOT2", "PlayStation 2", "(PS2)"]),
            known(Platform::Psp, &["(PSP)", "PSP GAME", "UMD_DATA"]),
            known(Platform::GameCube, &["(GC)", "GameCube", "(NGC)"]),
            known(Platform::Wii, &["(Wii)", "Nintendo Wii"]),
            known(Platform::Saturn, &["SEGA SEGASATURN", "(Saturn)"]),
            known(Platform::SegaCd, &["SEGADISCSYSTEM", "(Sega CD)", "(Mega CD)"]),
            known(Platform::Xbox, &["MICROSOFT*XBOX*MEDIA", "(Xbox)"]),
            known(Platform::Ps1, &["PS-X EXE", "(PS1)", "(PSX)"]),
        ],
    },
    AmbiguousRule {
        extension: ".bin",
        candidates: &[
            known(
                Platform::Genesis,
                &["SEGA GENESIS", "SEGA MEGA DRIVE", "(Genesis)", "(Mega Drive)"],
            ),
            known(Platform::Ps1, &["PLAYSTATION", "PS-X EXE", "(PS1)", "(PSX)"]),
            known(Platform::SegaCd, &["SEGADISCSYSTEM", "(Sega CD)", "(Mega CD)"]),
            known(Platform::Sega32x, &["SEGA 32X", "(32X)"]),
            known(Platform::Atari2600, &["(Atari 2600)", "(2600)"]),
        ],
    },
    AmbiguousRule {
        extension: ".cue",
        candidates: &[
            known(Platform::Ps1, &["(PS1)", "(PSX)", "PLAYSTATION"]),
            known(Platform::SegaCd, &["(Sega CD)", "(Mega CD)", "(SCD)"]),
            known(Platform::Saturn, &["(Saturn)", "(SAT)"]),
            known(
                Platform::PcEngineCd,
                &["(PC Engine CD)", "(TurboGrafx CD)", "(PCECD)"],
            ),
        ],
    },
    AmbiguousRule {
        extension: ".img",
        candidates: &[
            known(Platform::Ps1, &["PLAYSTATION", "(PS1)", "(PSX)"]),
            known(Platform::SegaCd, &["SEGADISCSYSTEM", "(Sega CD)"]),
            known(Platform::Saturn, &["SEGA SEGASATURN", "(Saturn)"]),
        ],
    },
    AmbiguousRule {
        extension: ".rom",
        candidates: &[
            known(Platform::Msx, &["(MSX)", "(MSX2)"]),
            known(Platform::ColecoVision, &["(Coleco)", "ColecoVision"]),
            known(Platform::Atari7800, &["ATARI7800", "(7800)"]),
        ],
    },
    AmbiguousRule {
        extension: ".rvz",
        candidates: &[
            known(Platform::GameCube, &["(GC)", "GameCube"]),
            known(Platform::Wii, &["(Wii)", "Nintendo Wii"]),
        ],
    },
];

/// Lower-case an extension and make sure it carries its leading dot.
pub fn normalize_extension(extension: &str) -> String {
    let lower = extension.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// Resolve an extension to a console.
///
/// Direct-table extensions ignore `content` and `filename` entirely. For
/// ambiguous extensions the candidates are tried in priority order and the
/// first whose hint occurs in the content (lossily decoded) or the filename
/// wins; with no match the first candidate is the answer. Unknown extensions
/// resolve to [`ConsoleId::Unknown`].
pub fn resolve(extension: &str, content: Option<&[u8]>, filename: Option<&str>) -> ConsoleId {
    let ext = normalize_extension(extension);

    if let Some(console) = direct_lookup(&ext) {
        return console;
    }

    let Some(rule) = ambiguous_lookup(&ext) else {
        return ConsoleId::Unknown;
    };

    let text = content.map(String::from_utf8_lossy);
    for candidate in rule.candidates {
        let hit = candidate.hints.iter().any(|hint| {
            text.as_deref().is_some_and(|t| t.contains(hint))
                || filename.is_some_and(|f| f.contains(hint))
        });
        if hit {
            return candidate.console;
        }
    }

    rule.candidates
        .first()
        .map(|c| c.console)
        .unwrap_or(ConsoleId::Unknown)
}

/// Resolve using a path's extension and file name.
///
/// Compound extensions are not considered; `game.tar.gz` resolves on `.gz`.
pub fn resolve_path(path: &Path, content: Option<&[u8]>) -> ConsoleId {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return ConsoleId::Unknown;
    };
    let filename = path.file_name().and_then(|n| n.to_str());
    resolve(ext, content, filename)
}

/// Whether the extension appears in either table.
pub fn is_known_extension(extension: &str) -> bool {
    let ext = normalize_extension(extension);
    direct_lookup(&ext).is_some() || ambiguous_lookup(&ext).is_some()
}

/// Every extension the resolver knows about, direct table first.
pub fn known_extensions() -> impl Iterator<Item = &'static str> {
    DIRECT_MAP
        .iter()
        .map(|(ext, _)| *ext)
        .chain(AMBIGUOUS_MAP.iter().map(|rule| rule.extension))
}

/// Priority list for an extension: one entry for direct extensions, the
/// full candidate list for ambiguous ones, empty when unknown.
pub fn candidates(extension: &str) -> Vec<ConsoleId> {
    let ext = normalize_extension(extension);
    if let Some(console) = direct_lookup(&ext) {
        return vec![console];
    }
    ambiguous_lookup(&ext)
        .map(|rule| rule.candidates.iter().map(|c| c.console).collect())
        .unwrap_or_default()
}

pub fn direct_rules() -> &'static [(&'static str, ConsoleId)] {
    DIRECT_MAP
}

pub fn ambiguous_rules() -> &'static [AmbiguousRule] {
    AMBIGUOUS_MAP
}

fn direct_lookup(ext: &str) -> Option<ConsoleId> {
    DIRECT_MAP
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, console)| *console)
}

fn ambiguous_lookup(ext: &str) -> Option<&'static AmbiguousRule> {
    AMBIGUOUS_MAP.iter().find(|rule| rule.extension == ext)
}

#[cfg(test)]
#[path = "tests/extension_tests.rs"]
mod tests;
