
use lofty::ItemKey;
use songtag_core::{LocalStreamOpener, TagBuilder, TagType};
use songtag_decoder::{DecoderRegistry, SymphoniaConfig};
use songtag_metadata::{ApeTagReader, ContainerTagReader, FallbackScanner, Id3TagReader, TagResolver};
use std::sync::Arc;
use test_helpers::{create_test_wav, write_id3v2, Fixture};

fn tagged_wav(fixture: &Fixture, uri: &str) {
    let path = fixture.root().join(uri);
    create_test_wav(&path);
    write_id3v2(
        &path,
        &[
            (ItemKey::TrackArtist, "Tagged"),
            (ItemKey::TrackTitle, "Embedded Title"),
            (ItemKey::Genre, "Rock; Pop"),
        ],
    );
}

fn default_resolver(fixture: &Fixture) -> TagResolver {
    TagResolver::new(
        Arc::new(DecoderRegistry::with_defaults(SymphoniaConfig::default())),
        Arc::new(fixture.storage()),
        Arc::new(LocalStreamOpener),
    )
}

#[test]
fn test_id3_reader_emits_embedded_items() {
    let fixture = Fixture::new();
    tagged_wav(&fixture, "plain.wav");
    let path = fixture.root().join("plain.wav");

    let mut builder = TagBuilder::new();
    Id3TagReader.scan(&path, &mut builder).unwrap();

    let tag = builder.commit();
    assert_eq!(tag.get(TagType::Artist), Some("Tagged"));
    assert_eq!(tag.get(TagType::Title), Some("Embedded Title"));
}

#[test]
fn test_ape_reader_skips_file_without_ape_tag() {
    let fixture = Fixture::new();
    tagged_wav(&fixture, "plain.wav");
    let path = fixture.root().join("plain.wav");

    let mut builder = TagBuilder::new();
    ApeTagReader.scan(&path, &mut builder).unwrap();
    assert!(builder.is_empty());

    // The default chain moves on to ID3
    assert!(FallbackScanner::default().scan(&path, &mut builder));
    assert_eq!(builder.get(TagType::Artist), Some("Tagged"));
}

#[test]
fn test_default_registry_resolves_tagged_file() {
    let fixture = Fixture::new();
    tagged_wav(&fixture, "plain.wav");

    let resolved = default_resolver(&fixture)
        .resolve_local_file("plain.wav")
        .unwrap();

    assert!(!resolved.tag.is_empty());
    assert_eq!(resolved.tag.get(TagType::Artist), Some("Tagged"));
    assert_eq!(resolved.tag.get(TagType::Title), Some("Embedded Title"));
    assert_eq!(
        resolved.tag.get_all(TagType::Genre).collect::<Vec<_>>(),
        ["Rock", "Pop"]
    );
    assert!(resolved.mtime.is_some());

    let duration = resolved.tag.duration().unwrap().to_ms();
    assert!(duration > 50 && duration < 150, "expected about 100ms, got {}", duration);
}

#[test]
fn test_default_registry_applies_media_path_layout() {
    let fixture = Fixture::new();
    tagged_wav(&fixture, "Media/ArtX/AlbY/04 Song.wav");

    let resolved = default_resolver(&fixture)
        .resolve_local_file("Media/ArtX/AlbY/04 Song.wav")
        .unwrap();
    let tag = resolved.tag;

    assert_eq!(tag.get_all(TagType::Artist).collect::<Vec<_>>(), ["ArtX"]);
    assert_eq!(tag.get(TagType::Album), Some("AlbY"));
    assert_eq!(tag.get(TagType::Track), Some("4"));
    assert_eq!(tag.get_all(TagType::Title).collect::<Vec<_>>(), ["Song"]);
    assert_eq!(tag.get_all(TagType::Genre).collect::<Vec<_>>(), ["wav"]);
}
