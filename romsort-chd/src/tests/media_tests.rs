use super::*;

#[test]
fn size_heuristic_boundaries() {
    let cases = [
        (0, MediaType::Unknown),
        (99, MediaType::Unknown),
        (100, MediaType::CdRom),
        (999, MediaType::CdRom),
        (1000, MediaType::GdRom),
        (1799, MediaType::GdRom),
        (1800, MediaType::Dvd),
        (4999, MediaType::Dvd),
        (5000, MediaType::Hdd),
        (250_000, MediaType::Hdd),
    ];
    for (mib, expected) in cases {
        assert_eq!(
            media_type_from_size(mib * MIB),
            expected,
            "{} MiB should be {:?}",
            mib,
            expected
        );
    }
}

#[test]
fn size_heuristic_just_below_boundary() {
    assert_eq!(media_type_from_size(100 * MIB - 1), MediaType::Unknown);
    assert_eq!(media_type_from_size(1000 * MIB - 1), MediaType::CdRom);
    assert_eq!(media_type_from_size(5000 * MIB - 1), MediaType::Dvd);
}

#[test]
fn platform_hint_only_for_unambiguous_media() {
    assert_eq!(MediaType::GdRom.platform_hint(), Some("Dreamcast"));
    assert_eq!(MediaType::LaserDisc.platform_hint(), Some("LaserDisc"));
    assert_eq!(MediaType::CdRom.platform_hint(), None);
    assert_eq!(MediaType::Dvd.platform_hint(), None);
    assert_eq!(MediaType::Hdd.platform_hint(), None);
    assert_eq!(MediaType::Unknown.platform_hint(), None);
}
