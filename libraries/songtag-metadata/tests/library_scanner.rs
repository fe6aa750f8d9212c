
use songtag_core::{TagError, TagType};
use songtag_metadata::{LibraryScanner, ScanConfig, ScanProgress};
use std::sync::Arc;
use test_helpers::{FakePlugin, Fixture, Scan};
use tokio::sync::mpsc;

const ARTIST: &[(TagType, &str)] = &[(TagType::Artist, "Tagged Artist")];

fn library() -> Fixture {
    let fixture = Fixture::new();
    fixture.write("a/1.mp3", b"x");
    fixture.write("a/2.mp3", b"x");
    fixture.write("b/c/3.mp3", b"x");
    fixture.write("bad.ogg", b"x");
    fixture.write("notes.txt", b"x");
    fixture
}

fn scanner(fixture: &Fixture, config: ScanConfig) -> LibraryScanner {
    let mp3 = FakePlugin::new("mp3", &["mp3"], Scan::Hit(ARTIST), Scan::Absent);
    let ogg = FakePlugin::new("ogg", &["ogg"], Scan::Miss, Scan::Absent);
    let resolver = Arc::new(fixture.resolver(vec![mp3, ogg]));

    LibraryScanner::with_config(resolver, fixture.storage(), config)
}

#[tokio::test]
async fn test_scan_resolves_supported_files() {
    let fixture = library();
    let config = ScanConfig {
        uri_base: "nas".to_string(),
        ..ScanConfig::default()
    };
    let scanner = scanner(&fixture, config);

    let result = scanner.scan(fixture.root(), None).await.unwrap();

    assert_eq!(result.stats.files_discovered, 4);
    assert_eq!(result.stats.files_scanned, 4);
    assert_eq!(result.stats.songs_resolved, 3);
    assert_eq!(result.stats.errors.len(), 1);
    assert!(result.stats.errors[0].0.ends_with("bad.ogg"));

    let uris: Vec<_> = result.songs.iter().map(|s| s.uri.as_str()).collect();
    assert_eq!(uris, ["nas/a/1.mp3", "nas/a/2.mp3", "nas/b/c/3.mp3"]);
    for song in &result.songs {
        assert_eq!(song.tag.get(TagType::Artist), Some("Tagged Artist"));
        assert!(song.mtime.is_some());
    }
}

#[tokio::test]
async fn test_sequential_scan_matches_parallel() {
    let fixture = library();

    let parallel = scanner(&fixture, ScanConfig::default())
        .scan(fixture.root(), None)
        .await
        .unwrap();

    let config = ScanConfig {
        parallel: false,
        ..ScanConfig::default()
    };
    let sequential = scanner(&fixture, config)
        .scan(fixture.root(), None)
        .await
        .unwrap();

    assert_eq!(parallel.songs, sequential.songs);
}

#[tokio::test]
async fn test_scan_reports_progress() {
    let fixture = library();
    let scanner = scanner(&fixture, ScanConfig::default());
    let (tx, mut rx) = mpsc::channel(100);

    scanner.scan(fixture.root(), Some(tx)).await.unwrap();

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert!(matches!(events.first(), Some(ScanProgress::Started { total_files: 4 })));
    assert!(matches!(
        events.last(),
        Some(ScanProgress::Completed { stats }) if stats.songs_resolved == 3
    ));

    let failures = events
        .iter()
        .filter(|e| matches!(e, ScanProgress::FileScanned { success: false, .. }))
        .count();
    assert_eq!(failures, 1);
}

#[tokio::test]
async fn test_scan_single_file_and_missing_path() {
    let fixture = library();
    let scanner = scanner(&fixture, ScanConfig::default());

    let result = scanner
        .scan(&fixture.root().join("a/2.mp3"), None)
        .await
        .unwrap();
    assert_eq!(result.songs.len(), 1);
    assert_eq!(result.songs[0].uri, "a/2.mp3");

    let missing = scanner.scan(&fixture.root().join("nope"), None).await;
    assert!(matches!(missing, Err(TagError::NotFound(_))));
}
