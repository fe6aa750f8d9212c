//! Tag resolution
//!
//! [`TagResolver`] turns a [`Resource`] into a committed [`Tag`]. Sources are
//! consulted in a fixed order:
//!
//! 1. decoder plugins matching the suffix (or MIME type, for streams), each
//!    trying a direct file scan and then a stream scan
//! 2. the fallback container readers, when no decoder produced a tag item
//! 3. path metadata, which overrides individual tag types
//!
//! Every call builds exactly one tag and replaces whatever the song had
//! before.

use crate::config::{ArchiveScan, ResolverConfig};
use crate::fallback::FallbackScanner;
use crate::path_pattern::{apply_path_metadata, apply_synthetic_prefix, try_synthesize};
use songtag_core::uri::uri_suffix;
use songtag_core::{
    DetachedSong, Directory, InputStream, InputStreamOpener, MusicStorage, Resource, Result, Song,
    Tag, TagBuilder, TagError,
};
use songtag_decoder::{DecoderRegistry, PluginRef};
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, trace, warn};

/// Result of a successful resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTag {
    pub tag: Tag,

    /// Modification time of the file, `None` for streams and archive members
    pub mtime: Option<SystemTime>,
}

/// Input stream opened on first use and reused by later plugin attempts
struct LazyStream<'a> {
    opener: &'a dyn InputStreamOpener,
    uri: &'a str,
    state: Option<Result<Box<dyn InputStream>>>,
}

impl<'a> LazyStream<'a> {
    fn new(opener: &'a dyn InputStreamOpener, uri: &'a str) -> Self {
        Self {
            opener,
            uri,
            state: None,
        }
    }

    /// The open stream, or `None` if opening failed (only attempted once)
    fn get(&mut self) -> Option<&mut dyn InputStream> {
        let (opener, uri) = (self.opener, self.uri);
        let state = self.state.get_or_insert_with(|| {
            opener
                .open(uri)
                .inspect_err(|e| warn!("Failed to open stream for {}: {}", uri, e))
        });

        match state {
            Ok(stream) => Some(stream.as_mut()),
            Err(_) => None,
        }
    }
}

/// Composes decoder plugins, fallback readers and path metadata into a tag
pub struct TagResolver {
    registry: Arc<DecoderRegistry>,
    storage: Arc<dyn MusicStorage>,
    streams: Arc<dyn InputStreamOpener>,
    fallback: FallbackScanner,
    config: ResolverConfig,
}

impl TagResolver {
    /// Create a resolver with the default fallback readers and configuration
    pub fn new(
        registry: Arc<DecoderRegistry>,
        storage: Arc<dyn MusicStorage>,
        streams: Arc<dyn InputStreamOpener>,
    ) -> Self {
        Self {
            registry,
            storage,
            streams,
            fallback: FallbackScanner::default(),
            config: ResolverConfig::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackScanner) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    /// Resolve the tag of any resource kind
    pub fn resolve(&self, resource: &Resource) -> Result<ResolvedTag> {
        match resource {
            Resource::LocalFile { uri, .. } => self.resolve_local_file(uri),
            Resource::ArchiveMember { uri, archive } => self.resolve_archive_member(uri, archive),
            Resource::RemoteStream { uri } => self.resolve_remote(uri),
        }
    }

    /// Resolve a file in the music directory
    ///
    /// # Errors
    /// - `InvalidResource` if the URI is empty or has no local path
    /// - `NotFound` / `NotRegular` if the file is missing or not a plain file
    /// - `Unsupported` if no plugin handles the suffix
    /// - `ScanFailed` if every source came up empty
    pub fn resolve_local_file(&self, uri: &str) -> Result<ResolvedTag> {
        if uri.is_empty() {
            return Err(TagError::invalid_resource("empty song URI"));
        }

        let path = self
            .storage
            .map_to_filesystem(uri)
            .ok_or_else(|| TagError::invalid_resource(format!("{uri} has no local path")))?;

        let info = self.storage.file_info(uri)?;
        if !info.is_regular {
            return Err(TagError::not_regular(path.display().to_string()));
        }

        let suffix = uri_suffix(uri)
            .ok_or_else(|| TagError::unsupported(format!("{uri} has no suffix")))?;
        let first = self
            .registry
            .first_plugin(suffix)
            .ok_or_else(|| TagError::unsupported(format!("no decoder plugin for .{suffix}")))?;

        let path_str = path.to_string_lossy();
        let mut stream = LazyStream::new(self.streams.as_ref(), &path_str);
        let mut decoded = None;
        let mut candidate = Some(first);

        while let Some(plugin) = candidate {
            if let Some(builder) = scan_file_with(plugin, &path) {
                decoded = Some(builder);
                break;
            }

            if plugin.can_scan_stream() {
                if let Some(input) = stream.get() {
                    if let Some(builder) = scan_stream_with(plugin, input) {
                        decoded = Some(builder);
                        break;
                    }
                }
            }

            candidate = self.registry.next_plugin(suffix, plugin);
        }
        drop(stream);

        let decoder_hit = decoded.is_some();
        let mut builder = decoded.unwrap_or_default();

        if builder.is_empty() && self.fallback.scan(&path, &mut builder) {
            debug!("Fallback readers found tags for {}", uri);
        }

        self.apply_path_rules(uri, &path_str, &mut builder);

        if !decoder_hit && builder.is_empty() {
            return Err(TagError::scan_failed(uri));
        }

        Ok(ResolvedTag {
            tag: builder.commit(),
            mtime: info.mtime,
        })
    }

    /// Resolve a member of an archive
    ///
    /// In [`ArchiveScan::Detached`] mode the member is accepted as soon as a
    /// plugin supports its suffix and gets an empty tag. In
    /// [`ArchiveScan::Stream`] mode it is scanned through the input stream
    /// transport. Neither mode uses the fallback readers or path metadata.
    pub fn resolve_archive_member(&self, uri: &str, archive: &Directory) -> Result<ResolvedTag> {
        if uri.is_empty() {
            return Err(TagError::invalid_resource("empty song URI"));
        }

        let suffix = uri_suffix(uri)
            .ok_or_else(|| TagError::unsupported(format!("{uri} has no suffix")))?;
        if !self.registry.supports_suffix(suffix) {
            return Err(TagError::unsupported(format!("no decoder plugin for .{suffix}")));
        }

        trace!("Resolving {} inside {}", uri, archive.path);

        match self.config.archive_scan {
            ArchiveScan::Detached => Ok(ResolvedTag {
                tag: Tag::default(),
                mtime: None,
            }),
            ArchiveScan::Stream => {
                let target = self
                    .storage
                    .map_to_filesystem(uri)
                    .map_or_else(|| uri.to_string(), |p| p.to_string_lossy().into_owned());

                let mut stream = self.streams.open(&target)?;
                let builder = self.scan_stream_candidates(stream.as_mut())?;
                drop(stream);

                let builder = builder.ok_or_else(|| TagError::scan_failed(uri))?;
                Ok(ResolvedTag {
                    tag: builder.commit(),
                    mtime: None,
                })
            }
        }
    }

    /// Resolve a stream opened through the input stream transport
    ///
    /// # Errors
    /// - `InvalidResource` if the URI is empty
    /// - `OpenFailed` if the stream could not be readied
    /// - `Unsupported` if the stream has neither suffix nor MIME type
    /// - `ScanFailed` if no plugin read the stream and the URI carries no
    ///   path metadata
    pub fn resolve_remote(&self, uri: &str) -> Result<ResolvedTag> {
        if uri.is_empty() {
            return Err(TagError::invalid_resource("empty stream URI"));
        }

        let mut stream = self.streams.open(uri)?;
        let decoded = self.scan_stream_candidates(stream.as_mut())?;
        drop(stream);

        let decoder_hit = decoded.is_some();
        let mut builder = decoded.unwrap_or_default();

        if self.config.path_metadata {
            if let Some(path_match) = try_synthesize(uri) {
                apply_path_metadata(&mut builder, &path_match);
            }
        }

        if !decoder_hit && builder.is_empty() {
            return Err(TagError::scan_failed(uri));
        }

        Ok(ResolvedTag {
            tag: builder.commit(),
            mtime: None,
        })
    }

    /// Re-resolve a library song, replacing its tag and modification time
    ///
    /// The song is left untouched on failure.
    pub fn update_song(&self, song: &mut Song) -> Result<()> {
        let resolved = self.resolve(&song.resource())?;
        song.tag = Some(resolved.tag);
        song.mtime = resolved.mtime;
        Ok(())
    }

    /// Re-resolve a detached (remote) song
    pub fn update_detached(&self, song: &mut DetachedSong) -> Result<()> {
        let resolved = self.resolve_remote(&song.uri)?;
        song.tag = resolved.tag;
        song.mtime = resolved.mtime;
        Ok(())
    }

    /// Create a song below `parent` and resolve its tag
    ///
    /// Archive parents resolve the song as an archive member.
    pub fn load_song(&self, uri: &str, parent: Option<Arc<Directory>>) -> Result<Song> {
        let mut song = Song::new(uri, parent);
        self.update_song(&mut song)?;
        Ok(song)
    }

    /// Try every plugin supporting the stream's suffix or MIME type
    ///
    /// `Ok(None)` means every candidate missed.
    fn scan_stream_candidates(&self, stream: &mut dyn InputStream) -> Result<Option<TagBuilder>> {
        let suffix = uri_suffix(stream.uri()).map(str::to_owned);
        let mime = stream.mime_type().map(str::to_owned);

        let candidates = self
            .registry
            .plugins_supporting(suffix.as_deref(), mime.as_deref())?;

        for plugin in candidates {
            if let Some(builder) = scan_stream_with(plugin, stream) {
                return Ok(Some(builder));
            }
        }

        Ok(None)
    }

    fn apply_path_rules(&self, uri: &str, path: &str, builder: &mut TagBuilder) {
        if let Some(prefix) = self.config.synthetic_prefix(uri) {
            trace!("{} is below synthetic prefix {}", uri, prefix);
            apply_synthetic_prefix(builder, uri);
            return;
        }

        if self.config.path_metadata {
            if let Some(path_match) = try_synthesize(path) {
                apply_path_metadata(builder, &path_match);
            }
        }
    }
}

impl std::fmt::Debug for TagResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagResolver")
            .field("registry", &self.registry)
            .field("fallback", &self.fallback)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Direct file scan into a fresh builder; `None` on a miss
fn scan_file_with(plugin: &PluginRef, path: &Path) -> Option<TagBuilder> {
    if !plugin.can_scan_file() {
        return None;
    }

    let mut builder = TagBuilder::new();
    match plugin.scan_file(path, &mut builder) {
        Ok(()) => {
            debug!("{} read {} tag items from {}", plugin.name(), builder.len(), path.display());
            Some(builder)
        }
        Err(e) => {
            debug!("{} could not scan {}: {}", plugin.name(), path.display(), e);
            None
        }
    }
}

/// Rewind, then stream scan into a fresh builder; `None` on a miss
fn scan_stream_with(plugin: &PluginRef, stream: &mut dyn InputStream) -> Option<TagBuilder> {
    if !plugin.can_scan_stream() {
        return None;
    }

    if let Err(e) = stream.rewind() {
        warn!("Failed to rewind {}: {}", stream.uri(), e);
    }

    let mut builder = TagBuilder::new();
    match plugin.scan_stream(stream, &mut builder) {
        Ok(()) => {
            debug!("{} read {} tag items from stream {}", plugin.name(), builder.len(), stream.uri());
            Some(builder)
        }
        Err(e) => {
            debug!("{} could not scan stream {}: {}", plugin.name(), stream.uri(), e);
            None
        }
    }
}
