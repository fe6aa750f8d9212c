/// Core traits for Songtag
use crate::error::{Result, TagError};
use crate::storage::FileInfo;
use crate::types::{SongTime, TagType};
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

/// Receiver of tag data emitted by decoder plugins and container readers
pub trait TagHandler {
    /// A tag item was found
    fn on_tag(&mut self, kind: TagType, value: &str);

    /// A metadata pair with no tag type was found (e.g. replay gain)
    fn on_pair(&mut self, key: &str, value: &str) {
        let _ = (key, value);
    }

    /// The song duration was determined
    fn on_duration(&mut self, duration: SongTime) {
        let _ = duration;
    }
}

/// Seekable byte stream opened through the input stream transport
///
/// Rewinding uses [`Seek::rewind`]; closing is dropping the stream.
pub trait InputStream: Read + Seek + Send {
    /// URI the stream was opened from (after redirects, if any)
    fn uri(&self) -> &str;

    /// MIME type advertised by the transport, if any
    fn mime_type(&self) -> Option<&str>;
}

/// Input stream transport
pub trait InputStreamOpener: Send + Sync {
    /// Open a stream and wait until it is ready for reading
    ///
    /// # Errors
    /// Returns `TagError::OpenFailed` if the stream cannot be readied
    fn open(&self, uri: &str) -> Result<Box<dyn InputStream>>;
}

/// Decoder plugin trait
///
/// Plugins advertise which resources they handle through suffix and MIME
/// predicates. Scanning files directly and scanning open streams are two
/// optional capabilities; a plugin that lacks one keeps the default
/// implementation, which reports the capability as absent.
pub trait DecoderPlugin: Send + Sync {
    /// Short plugin name for logging
    fn name(&self) -> &str;

    /// Does the plugin handle this file suffix? Comparison ignores ASCII case.
    fn supports_suffix(&self, suffix: &str) -> bool;

    /// Does the plugin handle this MIME type?
    fn supports_mime_type(&self, mime: &str) -> bool;

    fn can_scan_file(&self) -> bool {
        false
    }

    /// Read tags directly from a file
    ///
    /// # Errors
    /// Any error means "no tags from this plugin"; callers move on to the next
    /// candidate.
    fn scan_file(&self, path: &Path, handler: &mut dyn TagHandler) -> Result<()> {
        let _ = (path, handler);
        Err(TagError::unsupported(format!(
            "{} cannot scan files",
            self.name()
        )))
    }

    fn can_scan_stream(&self) -> bool {
        false
    }

    /// Read tags from an open stream positioned at its start
    ///
    /// # Errors
    /// Any error means "no tags from this plugin".
    fn scan_stream(&self, stream: &mut dyn InputStream, handler: &mut dyn TagHandler) -> Result<()> {
        let _ = (stream, handler);
        Err(TagError::unsupported(format!(
            "{} cannot scan streams",
            self.name()
        )))
    }
}

/// Storage abstraction mapping library URIs onto the filesystem
pub trait MusicStorage: Send + Sync {
    /// Filesystem path of a library URI, or `None` if it has no local
    /// representation
    fn map_to_filesystem(&self, uri: &str) -> Option<PathBuf>;

    /// Status of the file behind a library URI
    ///
    /// # Errors
    /// Returns `TagError::NotFound` if nothing exists at the URI
    fn file_info(&self, uri: &str) -> Result<FileInfo>;
}
