/// Tag item types
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a single tag item
///
/// The declaration order is significant: it is the order in which
/// dictionary-style metadata is mapped onto tag items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagType {
    Artist,
    ArtistSort,
    Album,
    AlbumArtist,
    AlbumArtistSort,
    Title,
    Track,
    Name,
    Genre,
    Date,
    Composer,
    Performer,
    Comment,
    Disc,
    MusicBrainzArtistId,
    MusicBrainzAlbumId,
    MusicBrainzAlbumArtistId,
    MusicBrainzTrackId,
    MusicBrainzReleaseTrackId,
}

impl TagType {
    /// Every tag type, in declaration order
    pub const ALL: [TagType; 19] = [
        TagType::Artist,
        TagType::ArtistSort,
        TagType::Album,
        TagType::AlbumArtist,
        TagType::AlbumArtistSort,
        TagType::Title,
        TagType::Track,
        TagType::Name,
        TagType::Genre,
        TagType::Date,
        TagType::Composer,
        TagType::Performer,
        TagType::Comment,
        TagType::Disc,
        TagType::MusicBrainzArtistId,
        TagType::MusicBrainzAlbumId,
        TagType::MusicBrainzAlbumArtistId,
        TagType::MusicBrainzTrackId,
        TagType::MusicBrainzReleaseTrackId,
    ];

    /// Canonical item name, as used by tag dictionaries and protocol output
    pub fn name(self) -> &'static str {
        match self {
            TagType::Artist => "Artist",
            TagType::ArtistSort => "ArtistSort",
            TagType::Album => "Album",
            TagType::AlbumArtist => "AlbumArtist",
            TagType::AlbumArtistSort => "AlbumArtistSort",
            TagType::Title => "Title",
            TagType::Track => "Track",
            TagType::Name => "Name",
            TagType::Genre => "Genre",
            TagType::Date => "Date",
            TagType::Composer => "Composer",
            TagType::Performer => "Performer",
            TagType::Comment => "Comment",
            TagType::Disc => "Disc",
            TagType::MusicBrainzArtistId => "MUSICBRAINZ_ARTISTID",
            TagType::MusicBrainzAlbumId => "MUSICBRAINZ_ALBUMID",
            TagType::MusicBrainzAlbumArtistId => "MUSICBRAINZ_ALBUMARTISTID",
            TagType::MusicBrainzTrackId => "MUSICBRAINZ_TRACKID",
            TagType::MusicBrainzReleaseTrackId => "MUSICBRAINZ_RELEASETRACKID",
        }
    }

    /// Look up a tag type by its canonical name, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
