/// Configuration loading and validation tests
use songtag_cli::AppConfig;
use songtag_core::TagError;
use songtag_metadata::ArchiveScan;
use std::fs;

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let music = dir.path().join("music");
    fs::create_dir(&music).unwrap();

    let path = dir.path().join("songtag.toml");
    fs::write(
        &path,
        format!(
            r#"
[library]
music_directory = "{}"
uri_base = "nas"

[resolver]
synthetic_prefixes = ["Loose/"]
path_metadata = false
archive_scan = "stream"

[symphonia]
max_probe_bytes = 1024

[scan]
parallel = false
num_threads = 2
"#,
            music.display()
        ),
    )
    .unwrap();

    let config = AppConfig::load(Some(&path)).unwrap();
    config.validate().unwrap();

    assert_eq!(config.library.music_directory, music);
    assert_eq!(config.resolver.synthetic_prefixes, vec!["Loose/".to_string()]);
    assert!(!config.resolver.path_metadata);
    assert_eq!(config.resolver.archive_scan, ArchiveScan::Stream);
    assert_eq!(config.symphonia.max_probe_bytes, 1024);

    let scan = config.scan_config();
    assert!(!scan.parallel);
    assert_eq!(scan.num_threads, 2);
    assert_eq!(scan.uri_base, "nas");
}

#[test]
fn test_missing_sections_use_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("songtag.toml");
    fs::write(&path, "[library]\nuri_base = \"x\"\n").unwrap();

    let config = AppConfig::load(Some(&path)).unwrap();

    assert_eq!(config.library.uri_base, "x");
    assert_eq!(
        config.resolver.synthetic_prefixes,
        vec!["Untagged/".to_string(), "External/".to_string()]
    );
    assert!(config.resolver.path_metadata);
    assert_eq!(config.resolver.archive_scan, ArchiveScan::Detached);
    assert!(config.scan.parallel);
    assert!(config.symphonia.max_probe_bytes > 0);
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = AppConfig::load(Some(&dir.path().join("absent.toml")));

    assert!(matches!(result, Err(TagError::Config(_))));
}

#[test]
fn test_validate_rejects_bad_values() {
    let dir = tempfile::tempdir().unwrap();

    let mut config = AppConfig::default();
    config.library.music_directory = dir.path().join("nope");
    assert!(matches!(config.validate(), Err(TagError::Config(_))));

    config.library.music_directory = dir.path().to_path_buf();
    config.validate().unwrap();

    config.scan.num_threads = Some(0);
    assert!(matches!(config.validate(), Err(TagError::Config(_))));

    config.scan.num_threads = None;
    config.symphonia.max_probe_bytes = 0;
    assert!(matches!(config.validate(), Err(TagError::Config(_))));
}
