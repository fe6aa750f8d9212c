//! Mapping of demuxer-style key/value metadata onto tag items
//!
//! Container formats without a fixed tag vocabulary (Matroska, raw Vorbis
//! comments, MP4 freeform atoms, ...) expose their metadata as a flat
//! dictionary. Keys are matched against the canonical tag item names first,
//! then against a small alias table. Values holding several entries joined by
//! `"; "` are split into separate items.

use regex::Regex;
use songtag_core::{TagHandler, TagType};
use std::sync::OnceLock;

/// Alternate key names used by common muxers
const ALIASES: &[(&str, TagType)] = &[
    ("year", TagType::Date),
    ("author-sort", TagType::ArtistSort),
    ("album_artist", TagType::AlbumArtist),
    ("album_artist-sort", TagType::AlbumArtistSort),
];

/// The only free-form pair forwarded to the handler
pub const REPLAYGAIN_TRACK_GAIN_KEY: &str = "---:com.apple.iTunes:replaygain_track_gain";

fn delimiter() -> &'static Regex {
    static DELIMITER: OnceLock<Regex> = OnceLock::new();
    DELIMITER.get_or_init(|| Regex::new("; +").expect("delimiter pattern is valid"))
}

/// Split a multi-valued entry such as `"Rock; Pop"`
pub fn split_values(value: &str) -> impl Iterator<Item = &str> {
    delimiter().split(value)
}

fn copy_entries<K, V>(dict: &[(K, V)], name: &str, kind: TagType, handler: &mut dyn TagHandler)
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (key, value) in dict {
        if key.as_ref().eq_ignore_ascii_case(name) {
            for part in split_values(value.as_ref()) {
                handler.on_tag(kind, part);
            }
        }
    }
}

/// Emit every recognised entry of `dict` to `handler`
///
/// Items are emitted grouped by tag type in [`TagType::ALL`] order, followed
/// by aliased entries, followed by the replay gain pair.
pub fn scan_dictionary<K, V>(dict: &[(K, V)], handler: &mut dyn TagHandler)
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    for kind in TagType::ALL {
        copy_entries(dict, kind.name(), kind, handler);
    }

    for &(alias, kind) in ALIASES {
        copy_entries(dict, alias, kind, handler);
    }

    for (key, value) in dict {
        if key.as_ref() == REPLAYGAIN_TRACK_GAIN_KEY {
            handler.on_pair(key.as_ref(), value.as_ref());
        }
    }
}
