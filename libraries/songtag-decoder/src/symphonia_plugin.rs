//! Stream tag reader using Symphonia
//!
//! Symphonia probes the container and exposes metadata in two places: the
//! tags found while probing (e.g. a leading ID3v2 block) and the tags of
//! the container itself (e.g. Vorbis comments). Both are emitted, probe
//! metadata first.

use crate::dictionary::{scan_dictionary, split_values};
use serde::{Deserialize, Serialize};
use songtag_core::uri::uri_suffix;
use songtag_core::{DecoderPlugin, InputStream, Result, SongTime, TagError, TagHandler, TagType};
use std::io::{Cursor, Read};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, MetadataRevision, StandardTagKey, Value};
use symphonia::core::probe::Hint;
use tracing::trace;

const SUFFIXES: &[&str] = &["mp3", "flac", "ogg", "oga", "m4a", "mp4", "aac", "wav", "mka", "mkv", "webm"];

const MIME_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/flac",
    "audio/ogg",
    "audio/vorbis",
    "audio/mp4",
    "audio/aac",
    "audio/aacp",
    "audio/wav",
    "audio/x-wav",
    "audio/webm",
    "audio/x-matroska",
];

fn default_max_probe_bytes() -> u64 {
    16 * 1024 * 1024
}

/// Symphonia plugin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymphoniaConfig {
    /// Upper bound of bytes buffered from a stream before probing
    #[serde(default = "default_max_probe_bytes")]
    pub max_probe_bytes: u64,
}

impl Default for SymphoniaConfig {
    fn default() -> Self {
        Self {
            max_probe_bytes: default_max_probe_bytes(),
        }
    }
}

/// Stream-only plugin backed by Symphonia's format readers
#[derive(Debug, Clone, Default)]
pub struct SymphoniaPlugin {
    config: SymphoniaConfig,
}

impl SymphoniaPlugin {
    pub fn new(config: SymphoniaConfig) -> Self {
        Self { config }
    }
}

impl DecoderPlugin for SymphoniaPlugin {
    fn name(&self) -> &str {
        "symphonia"
    }

    fn supports_suffix(&self, suffix: &str) -> bool {
        SUFFIXES.iter().any(|s| s.eq_ignore_ascii_case(suffix))
    }

    fn supports_mime_type(&self, mime: &str) -> bool {
        MIME_TYPES.iter().any(|m| m.eq_ignore_ascii_case(mime))
    }

    fn can_scan_stream(&self) -> bool {
        true
    }

    fn scan_stream(&self, stream: &mut dyn InputStream, handler: &mut dyn TagHandler) -> Result<()> {
        let mut hint = Hint::new();
        if let Some(ext) = uri_suffix(stream.uri()) {
            hint.with_extension(ext);
        }
        if let Some(mime) = stream.mime_type() {
            hint.mime_type(mime);
        }

        let mut buffer = Vec::new();
        Read::take(&mut *stream, self.config.max_probe_bytes).read_to_end(&mut buffer)?;
        trace!("Buffered {} bytes for probing", buffer.len());

        let mss = MediaSourceStream::new(Box::new(Cursor::new(buffer)), Default::default());

        let mut probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| TagError::scan_failed(format!("Failed to probe stream: {}", e)))?;

        if let Some(track) = probed.format.default_track() {
            let params = &track.codec_params;
            if let (Some(time_base), Some(n_frames)) = (params.time_base, params.n_frames) {
                let time = time_base.calc_time(n_frames);
                let duration = SongTime::from_s_f64(time.seconds as f64 + time.frac);
                if !duration.is_zero() {
                    handler.on_duration(duration);
                }
            }
        }

        if let Some(metadata_log) = probed.metadata.get() {
            if let Some(revision) = metadata_log.current() {
                emit_revision(revision, handler);
            }
        }

        if let Some(revision) = probed.format.metadata().current() {
            emit_revision(revision, handler);
        }

        Ok(())
    }
}

fn emit_revision(revision: &MetadataRevision, handler: &mut dyn TagHandler) {
    for tag in revision.tags() {
        let value = extract_tag_value(&tag.value);
        if value.is_empty() {
            continue;
        }

        match tag.std_key {
            Some(StandardTagKey::ReplayGainTrackGain) => {
                handler.on_pair("replaygain_track_gain", &value);
            }
            Some(StandardTagKey::ReplayGainTrackPeak) => {
                handler.on_pair("replaygain_track_peak", &value);
            }
            Some(StandardTagKey::ReplayGainAlbumGain) => {
                handler.on_pair("replaygain_album_gain", &value);
            }
            Some(StandardTagKey::ReplayGainAlbumPeak) => {
                handler.on_pair("replaygain_album_peak", &value);
            }
            Some(key) => match tag_type_for(key) {
                Some(kind) => {
                    for part in split_values(&value) {
                        handler.on_tag(kind, part);
                    }
                }
                None => scan_dictionary(&[(tag.key.as_str(), value.as_str())], handler),
            },
            None => scan_dictionary(&[(tag.key.as_str(), value.as_str())], handler),
        }
    }
}

fn tag_type_for(key: StandardTagKey) -> Option<TagType> {
    let kind = match key {
        StandardTagKey::Artist => TagType::Artist,
        StandardTagKey::SortArtist => TagType::ArtistSort,
        StandardTagKey::Album => TagType::Album,
        StandardTagKey::AlbumArtist => TagType::AlbumArtist,
        StandardTagKey::SortAlbumArtist => TagType::AlbumArtistSort,
        StandardTagKey::TrackTitle => TagType::Title,
        StandardTagKey::TrackNumber => TagType::Track,
        StandardTagKey::Genre => TagType::Genre,
        StandardTagKey::Date => TagType::Date,
        StandardTagKey::Composer => TagType::Composer,
        StandardTagKey::Performer => TagType::Performer,
        StandardTagKey::Comment => TagType::Comment,
        StandardTagKey::DiscNumber => TagType::Disc,
        StandardTagKey::MusicBrainzArtistId => TagType::MusicBrainzArtistId,
        StandardTagKey::MusicBrainzAlbumId => TagType::MusicBrainzAlbumId,
        StandardTagKey::MusicBrainzAlbumArtistId => TagType::MusicBrainzAlbumArtistId,
        StandardTagKey::MusicBrainzRecordingId | StandardTagKey::MusicBrainzTrackId => {
            TagType::MusicBrainzTrackId
        }
        StandardTagKey::MusicBrainzReleaseTrackId => TagType::MusicBrainzReleaseTrackId,
        _ => return None,
    };
    Some(kind)
}

/// Text form of a tag value; binary blobs and flags have none
fn extract_tag_value(value: &Value) -> String {
    match value {
        Value::Binary(_) | Value::Flag => String::new(),
        Value::Boolean(b) => b.to_string(),
        Value::Float(f) => f.to_string(),
        Value::SignedInt(i) => i.to_string(),
        Value::UnsignedInt(u) => u.to_string(),
        Value::String(s) => s.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_only_capabilities() {
        let plugin = SymphoniaPlugin::default();
        assert!(!plugin.can_scan_file());
        assert!(plugin.can_scan_stream());
        assert!(plugin.supports_suffix("MKA"));
        assert!(plugin.supports_mime_type("audio/ogg"));
        assert!(!plugin.supports_suffix("ape"));
    }

    #[test]
    fn default_probe_limit_is_sixteen_mebibytes() {
        assert_eq!(SymphoniaConfig::default().max_probe_bytes, 16 * 1024 * 1024);
        let parsed: SymphoniaConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.max_probe_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn tag_values_are_trimmed_and_binary_is_dropped() {
        assert_eq!(extract_tag_value(&Value::String("  Low ".into())), "Low");
        assert_eq!(extract_tag_value(&Value::UnsignedInt(7)), "7");
        assert!(extract_tag_value(&Value::Binary(vec![1, 2].into_boxed_slice())).is_empty());
    }

    #[test]
    fn musicbrainz_keys_map_to_track_ids() {
        assert_eq!(
            tag_type_for(StandardTagKey::MusicBrainzRecordingId),
            Some(TagType::MusicBrainzTrackId)
        );
        assert_eq!(
            tag_type_for(StandardTagKey::MusicBrainzReleaseTrackId),
            Some(TagType::MusicBrainzReleaseTrackId)
        );
        assert_eq!(tag_type_for(StandardTagKey::Lyrics), None);
    }
}
