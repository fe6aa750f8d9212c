//! Path-derived metadata
//!
//! Libraries laid out as `.../Media/<artist>/<album>/[<track>]<title>[.<ext>]`
//! carry usable metadata in the path itself. A match overrides what the
//! decoder found for artist, album, track, title and genre.

use regex::Regex;
use songtag_core::{TagBuilder, TagType};
use std::sync::OnceLock;
use tracing::trace;

/// Anything, `Media/`, optional nested directories, artist and album
/// segments, then the file name: an optional dotted track number ended by a
/// separator, a lazy title and an optional extension.
///
/// The empty `anchor` group records that the track separator was not
/// followed by a word boundary.
const PATH_PATTERN: &str = r"\A.*?Media/(?:.*/)?(?P<artist>[^/]+)/+(?P<album>[^/]+)/+(?:(?P<track>[\d.]+)\W*[^\w(](?:\b|(?P<anchor>)))?(?P<title>[^/]+?)(?:\.(?P<ext>[^./]+))?$";

fn path_regex() -> &'static Regex {
    static PATH_REGEX: OnceLock<Regex> = OnceLock::new();
    PATH_REGEX.get_or_init(|| Regex::new(PATH_PATTERN).expect("path pattern is valid"))
}

/// Fields captured from a matching path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMatch<'a> {
    pub artist: &'a str,
    pub album: &'a str,
    /// Dotted numeric run in front of the title, e.g. `"1.02"`
    pub track_prefix: Option<&'a str>,
    /// Always empty when present
    pub anchor: Option<&'a str>,
    pub title: &'a str,
    /// Last dot-separated component of the file name
    pub extension: Option<&'a str>,
}

impl PathMatch<'_> {
    /// Track number reconstructed from the prefix, 0 without one
    pub fn track(&self) -> i64 {
        self.track_prefix.map_or(0, track_number)
    }
}

/// Match `path` against the media layout
///
/// Pure; no match is not an error.
pub fn try_synthesize(path: &str) -> Option<PathMatch<'_>> {
    let captures = path_regex().captures(path)?;

    let path_match = PathMatch {
        artist: captures.name("artist")?.as_str(),
        album: captures.name("album")?.as_str(),
        track_prefix: captures.name("track").map(|m| m.as_str()),
        anchor: captures.name("anchor").map(|m| m.as_str()),
        title: captures.name("title")?.as_str(),
        extension: captures.name("ext").map(|m| m.as_str()),
    };
    trace!(?path_match, "Path matched media layout");

    Some(path_match)
}

/// Merge dot-separated numeric components base 100: `"1.0.5"` is 105
///
/// Components that do not parse as a 32 bit integer are skipped without
/// shifting the total.
pub fn track_number(prefix: &str) -> i64 {
    prefix
        .split('.')
        .filter_map(|token| token.parse::<i32>().ok())
        .fold(0i64, |total, value| {
            total.saturating_mul(100).saturating_add(i64::from(value))
        })
}

/// Override builder fields with the captured path fields
///
/// Artist, album, track, title and genre are replaced. Genre receives the
/// file extension and is left cleared when there is none.
pub fn apply_path_metadata(builder: &mut TagBuilder, path_match: &PathMatch<'_>) {
    builder.replace(TagType::Artist, path_match.artist);
    builder.replace(TagType::Album, path_match.album);
    builder.replace(TagType::Track, &path_match.track().to_string());
    builder.replace(TagType::Title, path_match.title);
    builder.replace(TagType::Genre, path_match.extension.unwrap_or_default());
}

/// Tag layout for songs in a synthetic library section
///
/// Artist and track are dropped, the previous artist moves to genre and the
/// URI becomes the title.
pub fn apply_synthetic_prefix(builder: &mut TagBuilder, uri: &str) {
    let previous_artist = builder.get(TagType::Artist).map(str::to_owned);

    builder.clear(TagType::Artist);
    builder.clear(TagType::Track);
    builder.replace(TagType::Genre, previous_artist.as_deref().unwrap_or_default());
    builder.replace(TagType::Title, uri);
}
