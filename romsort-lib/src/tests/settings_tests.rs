use super::*;

#[test]
fn defaults() {
    let settings = Settings::default();
    assert_eq!(settings.tools.seven_zip, None);
    assert_eq!(settings.tools.timeout_secs, 300);
    assert!(settings.analysis.scan_nested);
    assert_eq!(settings.analysis.content_sniff_bytes, 65536);
    assert_eq!(settings.timeout(), Duration::from_secs(300));
}

#[test]
fn reads_all_values() {
    let settings = Settings::from_toml(
        r#"
[tools]
seven_zip = "/usr/local/bin/7zz"
timeout_secs = 30

[analysis]
scan_nested = false
content_sniff_bytes = 4096
"#,
    );
    assert_eq!(settings.tools.seven_zip, Some(PathBuf::from("/usr/local/bin/7zz")));
    assert_eq!(settings.tools.timeout_secs, 30);
    assert!(!settings.analysis.scan_nested);
    assert_eq!(settings.analysis.content_sniff_bytes, 4096);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let settings = Settings::from_toml("[analysis]\nscan_nested = false\n");
    assert!(!settings.analysis.scan_nested);
    assert_eq!(settings.tools, ToolSettings::default());
    assert_eq!(settings.analysis.content_sniff_bytes, DEFAULT_SNIFF_BYTES);
}

#[test]
fn bad_values_fall_back_individually() {
    let settings = Settings::from_toml(
        r#"
[tools]
seven_zip = 7
timeout_secs = -5

[analysis]
scan_nested = "yes"
content_sniff_bytes = 128
"#,
    );
    assert_eq!(settings.tools.seven_zip, None);
    assert_eq!(settings.tools.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert!(settings.analysis.scan_nested);
    assert_eq!(settings.analysis.content_sniff_bytes, 128);
}

#[test]
fn garbage_falls_back_to_defaults() {
    assert_eq!(Settings::from_toml("[tools\nthis is = = not toml"), Settings::default());
    assert_eq!(Settings::from_toml(""), Settings::default());
}

#[test]
fn missing_file_is_default() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(Settings::load_from(&dir.path().join("nope.toml")), Settings::default());
}

#[test]
fn save_value_preserves_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("romsort").join("settings.toml");
    std::fs::create_dir_all(file.parent().unwrap()).unwrap();
    std::fs::write(&file, "[analysis]\nscan_nested = false\n").unwrap();

    save_value(&file, "tools", "seven_zip", Some(toml::Value::String("/opt/7zz".into()))).unwrap();
    let settings = Settings::load_from(&file);
    assert_eq!(settings.tools.seven_zip, Some(PathBuf::from("/opt/7zz")));
    assert!(!settings.analysis.scan_nested);

    save_value(&file, "tools", "seven_zip", None).unwrap();
    assert_eq!(Settings::load_from(&file).tools.seven_zip, None);
    assert!(!file.with_extension("toml.tmp").exists());
}

#[test]
fn save_value_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("new").join("settings.toml");

    save_value(&file, "tools", "timeout_secs", Some(toml::Value::Integer(12))).unwrap();
    assert_eq!(Settings::load_from(&file).tools.timeout_secs, 12);
}

#[test]
fn save_value_rejects_non_table_section() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("settings.toml");
    std::fs::write(&file, "tools = 3\n").unwrap();

    assert!(save_value(&file, "tools", "seven_zip", None).is_err());
}
