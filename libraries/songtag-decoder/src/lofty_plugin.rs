/// Decoder plugin reading tags with lofty
use crate::dictionary::{scan_dictionary, split_values};
use lofty::{AudioFile, ItemKey, Probe, TaggedFile, TaggedFileExt};
use songtag_core::{DecoderPlugin, InputStream, Result, SongTime, TagError, TagHandler, TagType};
use std::path::Path;

const SUFFIXES: &[&str] = &[
    "mp3", "mp2", "flac", "ogg", "oga", "opus", "spx", "m4a", "m4b", "mp4", "aac", "wav", "wave",
    "aif", "aiff", "aifc", "ape", "mpc", "wv",
];

const MIME_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/flac",
    "audio/x-flac",
    "audio/ogg",
    "audio/opus",
    "audio/mp4",
    "audio/aac",
    "audio/wav",
    "audio/x-wav",
    "audio/aiff",
    "audio/x-aiff",
    "audio/ape",
    "audio/x-musepack",
    "audio/x-wavpack",
];

/// Tag reader plugin backed by lofty
///
/// Supports both capabilities: direct file scans and stream scans.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyPlugin;

impl LoftyPlugin {
    /// Create a new plugin
    pub fn new() -> Self {
        Self
    }
}

impl DecoderPlugin for LoftyPlugin {
    fn name(&self) -> &str {
        "lofty"
    }

    fn supports_suffix(&self, suffix: &str) -> bool {
        SUFFIXES.iter().any(|s| s.eq_ignore_ascii_case(suffix))
    }

    fn supports_mime_type(&self, mime: &str) -> bool {
        MIME_TYPES.iter().any(|m| m.eq_ignore_ascii_case(mime))
    }

    fn can_scan_file(&self) -> bool {
        true
    }

    fn scan_file(&self, path: &Path, handler: &mut dyn TagHandler) -> Result<()> {
        let tagged_file = Probe::open(path)
            .map_err(|e| TagError::scan_failed(format!("Failed to open file: {}", e)))?
            .read()
            .map_err(|e| TagError::scan_failed(format!("Failed to read file: {}", e)))?;

        emit_tagged_file(&tagged_file, handler);
        Ok(())
    }

    fn can_scan_stream(&self) -> bool {
        true
    }

    fn scan_stream(&self, stream: &mut dyn InputStream, handler: &mut dyn TagHandler) -> Result<()> {
        let tagged_file = Probe::new(stream)
            .guess_file_type()?
            .read()
            .map_err(|e| TagError::scan_failed(format!("Failed to read stream: {}", e)))?;

        emit_tagged_file(&tagged_file, handler);
        Ok(())
    }
}

/// Emit duration and the primary (or first) tag of a lofty file
pub fn emit_tagged_file(tagged_file: &TaggedFile, handler: &mut dyn TagHandler) {
    let duration = tagged_file.properties().duration();
    if !duration.is_zero() {
        handler.on_duration(SongTime::from(duration));
    }

    // Prefer ID3v2 for MP3, Vorbis comments for OGG/FLAC
    if let Some(tag) = tagged_file.primary_tag().or(tagged_file.first_tag()) {
        emit_tag(tag, handler);
    }
}

/// Emit every text item of a lofty tag
pub fn emit_tag(tag: &lofty::Tag, handler: &mut dyn TagHandler) {
    for item in tag.items() {
        let Some(text) = item.value().text() else {
            continue;
        };

        match item.key() {
            ItemKey::ReplayGainTrackGain => handler.on_pair("replaygain_track_gain", text),
            ItemKey::ReplayGainTrackPeak => handler.on_pair("replaygain_track_peak", text),
            ItemKey::ReplayGainAlbumGain => handler.on_pair("replaygain_album_gain", text),
            ItemKey::ReplayGainAlbumPeak => handler.on_pair("replaygain_album_peak", text),
            ItemKey::Unknown(key) => scan_dictionary(&[(key.as_str(), text)], handler),
            key => {
                if let Some(kind) = tag_type_for(key) {
                    for part in split_values(text) {
                        handler.on_tag(kind, part);
                    }
                }
            }
        }
    }
}

fn tag_type_for(key: &ItemKey) -> Option<TagType> {
    let kind = match key {
        ItemKey::TrackArtist => TagType::Artist,
        ItemKey::TrackArtistSortOrder => TagType::ArtistSort,
        ItemKey::AlbumTitle => TagType::Album,
        ItemKey::AlbumArtist => TagType::AlbumArtist,
        ItemKey::AlbumArtistSortOrder => TagType::AlbumArtistSort,
        ItemKey::TrackTitle => TagType::Title,
        ItemKey::TrackNumber => TagType::Track,
        ItemKey::Genre => TagType::Genre,
        ItemKey::RecordingDate | ItemKey::Year => TagType::Date,
        ItemKey::Composer => TagType::Composer,
        ItemKey::Performer => TagType::Performer,
        ItemKey::Comment => TagType::Comment,
        ItemKey::DiscNumber => TagType::Disc,
        ItemKey::MusicBrainzArtistId => TagType::MusicBrainzArtistId,
        ItemKey::MusicBrainzReleaseId => TagType::MusicBrainzAlbumId,
        ItemKey::MusicBrainzReleaseArtistId => TagType::MusicBrainzAlbumArtistId,
        ItemKey::MusicBrainzRecordingId => TagType::MusicBrainzTrackId,
        ItemKey::MusicBrainzTrackId => TagType::MusicBrainzReleaseTrackId,
        _ => return None,
    };
    Some(kind)
}
