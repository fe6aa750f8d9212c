/// Song, directory and resource descriptor types
use super::Tag;
use crate::uri::build_uri;
use serde::Serialize;
use std::sync::Arc;
use std::time::SystemTime;

/// Kind of device a directory lives on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// Plain filesystem directory
    #[default]
    Regular,
    /// Virtual directory inside an archive file
    InArchive,
}

/// Parent directory context of a song
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directory {
    /// Library-relative path without a trailing slash ("" for the root)
    pub path: String,

    pub device: DeviceKind,
}

impl Directory {
    /// Create a regular directory
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            device: DeviceKind::Regular,
        }
    }

    /// Create a directory that represents the inside of an archive
    pub fn in_archive(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            device: DeviceKind::InArchive,
        }
    }

    pub fn is_in_archive(&self) -> bool {
        self.device == DeviceKind::InArchive
    }
}

/// A song in the music library
///
/// The song owns exactly one tag snapshot; updating it replaces the previous
/// snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Song {
    /// Library-relative URI, or an absolute filesystem path for songs
    /// outside the music directory
    pub uri: String,

    #[serde(skip)]
    pub parent: Option<Arc<Directory>>,

    pub tag: Option<Tag>,

    /// Modification time of the underlying file, if known
    pub mtime: Option<SystemTime>,
}

impl Song {
    /// Create a song without a tag
    pub fn new(uri: impl Into<String>, parent: Option<Arc<Directory>>) -> Self {
        Self {
            uri: uri.into(),
            parent,
            tag: None,
            mtime: None,
        }
    }

    /// True if the song is a member of an archive
    pub fn is_in_archive(&self) -> bool {
        self.parent.as_ref().is_some_and(|p| p.is_in_archive())
    }

    /// Resource descriptor for resolving this song's tag
    pub fn resource(&self) -> Resource {
        match &self.parent {
            Some(parent) if parent.is_in_archive() => Resource::ArchiveMember {
                uri: self.uri.clone(),
                archive: Arc::clone(parent),
            },
            parent => Resource::LocalFile {
                uri: self.uri.clone(),
                parent: parent.clone(),
            },
        }
    }

    /// Copy of this song with its URI re-rooted under `base` and its
    /// directory detached
    pub fn prefixed(&self, base: &str) -> DetachedSong {
        DetachedSong {
            uri: build_uri(base, &self.uri),
            tag: self.tag.clone().unwrap_or_default(),
            mtime: self.mtime,
        }
    }
}

/// A song that is not attached to the library's directory tree, e.g. a
/// remote stream in a playlist
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetachedSong {
    pub uri: String,
    pub tag: Tag,
    pub mtime: Option<SystemTime>,
}

impl DetachedSong {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    pub fn resource(&self) -> Resource {
        Resource::RemoteStream {
            uri: self.uri.clone(),
        }
    }
}

/// Where the bytes of a song come from
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// File on the local filesystem
    LocalFile {
        uri: String,
        parent: Option<Arc<Directory>>,
    },
    /// Member of an archive file
    ArchiveMember { uri: String, archive: Arc<Directory> },
    /// Stream opened through the input stream transport
    RemoteStream { uri: String },
}

impl Resource {
    pub fn uri(&self) -> &str {
        match self {
            Resource::LocalFile { uri, .. }
            | Resource::ArchiveMember { uri, .. }
            | Resource::RemoteStream { uri } => uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_parent_yields_archive_resource() {
        let archive = Arc::new(Directory::in_archive("Music/pack.zip"));
        let song = Song::new("Music/pack.zip/a.mp3", Some(archive));
        assert!(song.is_in_archive());
        assert!(matches!(song.resource(), Resource::ArchiveMember { .. }));
    }

    #[test]
    fn regular_parent_yields_local_resource() {
        let dir = Arc::new(Directory::new("Artist/Album"));
        let song = Song::new("Artist/Album/01.flac", Some(dir));
        assert!(!song.is_in_archive());
        assert_eq!(song.resource().uri(), "Artist/Album/01.flac");
        assert!(matches!(song.resource(), Resource::LocalFile { .. }));
    }

    #[test]
    fn prefixed_song_rebuilds_uri() {
        let song = Song::new("Artist/x.ogg", Some(Arc::new(Directory::new("Artist"))));
        assert_eq!(song.prefixed("nas").uri, "nas/Artist/x.ogg");
        assert_eq!(song.prefixed("").uri, "Artist/x.ogg");
    }
}
