/// Fallback container tag scanning
use lofty::{Probe, TaggedFile, TaggedFileExt};
use songtag_core::{Result, SongTime, TagError, TagHandler, TagType};
use songtag_decoder::lofty_plugin::emit_tag;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

/// Reader for one self-describing tag format embedded in audio files
pub trait ContainerTagReader: Send + Sync {
    /// Short reader name for logging
    fn name(&self) -> &str;

    /// Emit the tag items found in `path`
    ///
    /// # Errors
    /// Returns an error if the file could not be read; a readable file
    /// without this tag format is `Ok`.
    fn scan(&self, path: &Path, handler: &mut dyn TagHandler) -> Result<()>;
}

/// Shared handle to a container tag reader
pub type ReaderRef = Arc<dyn ContainerTagReader>;

fn read_tagged_file(path: &Path) -> Result<TaggedFile> {
    Probe::open(path)
        .map_err(|e| TagError::scan_failed(format!("Failed to open file: {}", e)))?
        .guess_file_type()?
        .read()
        .map_err(|e| TagError::scan_failed(format!("Failed to read file: {}", e)))
}

/// APE tags, usually found at the end of Monkey's Audio, Musepack and
/// WavPack files (and sometimes MP3)
#[derive(Debug, Clone, Copy, Default)]
pub struct ApeTagReader;

impl ContainerTagReader for ApeTagReader {
    fn name(&self) -> &str {
        "ape"
    }

    fn scan(&self, path: &Path, handler: &mut dyn TagHandler) -> Result<()> {
        let tagged_file = read_tagged_file(path)?;
        if let Some(tag) = tagged_file.tag(lofty::TagType::Ape) {
            emit_tag(tag, handler);
        }
        Ok(())
    }
}

/// ID3v2 tags, falling back to an ID3v1 trailer
#[derive(Debug, Clone, Copy, Default)]
pub struct Id3TagReader;

impl ContainerTagReader for Id3TagReader {
    fn name(&self) -> &str {
        "id3"
    }

    fn scan(&self, path: &Path, handler: &mut dyn TagHandler) -> Result<()> {
        let tagged_file = read_tagged_file(path)?;
        let tag = tagged_file
            .tag(lofty::TagType::Id3v2)
            .or_else(|| tagged_file.tag(lofty::TagType::Id3v1));

        if let Some(tag) = tag {
            emit_tag(tag, handler);
        }
        Ok(())
    }
}

/// Forwards to another handler while counting tag items
struct ItemCounter<'a> {
    inner: &'a mut dyn TagHandler,
    items: usize,
}

impl TagHandler for ItemCounter<'_> {
    fn on_tag(&mut self, kind: TagType, value: &str) {
        self.items += 1;
        self.inner.on_tag(kind, value);
    }

    fn on_pair(&mut self, key: &str, value: &str) {
        self.inner.on_pair(key, value);
    }

    fn on_duration(&mut self, duration: SongTime) {
        self.inner.on_duration(duration);
    }
}

/// Ordered set of container tag readers tried when decoders found nothing
///
/// The default order is APE, then ID3. Scanning stops at the first reader
/// that emits at least one tag item.
#[derive(Clone)]
pub struct FallbackScanner {
    readers: Vec<ReaderRef>,
}

impl Default for FallbackScanner {
    fn default() -> Self {
        Self::with_readers(vec![Arc::new(ApeTagReader), Arc::new(Id3TagReader)])
    }
}

impl FallbackScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_readers(readers: Vec<ReaderRef>) -> Self {
        Self { readers }
    }

    /// Try every reader in order; true if one of them emitted a tag item
    ///
    /// Items are appended to `handler`; nothing is cleared.
    pub fn scan(&self, path: &Path, handler: &mut dyn TagHandler) -> bool {
        self.readers.iter().any(|reader| {
            let mut counter = ItemCounter {
                inner: &mut *handler,
                items: 0,
            };

            match reader.scan(path, &mut counter) {
                Ok(()) => {
                    trace!("{} reader emitted {} items", reader.name(), counter.items);
                    counter.items > 0
                }
                Err(e) => {
                    debug!("{} reader failed on {}: {}", reader.name(), path.display(), e);
                    counter.items > 0
                }
            }
        })
    }
}

impl std::fmt::Debug for FallbackScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.readers.iter().map(|r| r.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songtag_core::TagBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedReader {
        name: &'static str,
        items: &'static [(TagType, &'static str)],
        fail: bool,
        calls: AtomicUsize,
    }

    impl FixedReader {
        fn new(name: &'static str, items: &'static [(TagType, &'static str)]) -> Arc<Self> {
            Arc::new(Self {
                name,
                items,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                items: &[],
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl ContainerTagReader for FixedReader {
        fn name(&self) -> &str {
            self.name
        }

        fn scan(&self, _path: &Path, handler: &mut dyn TagHandler) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TagError::scan_failed("broken"));
            }
            for (kind, value) in self.items {
                handler.on_tag(*kind, value);
            }
            Ok(())
        }
    }

    #[test]
    fn stops_at_first_reader_with_items() {
        let ape = FixedReader::new("ape", &[(TagType::Artist, "From APE")]);
        let id3 = FixedReader::new("id3", &[(TagType::Artist, "From ID3")]);
        let scanner = FallbackScanner::with_readers(vec![ape.clone(), id3.clone()]);

        let mut builder = TagBuilder::new();
        assert!(scanner.scan(Path::new("x.ape"), &mut builder));
        assert_eq!(builder.get(TagType::Artist), Some("From APE"));
        assert_eq!(id3.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_or_failing_reader_moves_on() {
        let ape = FixedReader::failing("ape");
        let empty = FixedReader::new("empty", &[]);
        let id3 = FixedReader::new("id3", &[(TagType::Title, "Song")]);
        let scanner = FallbackScanner::with_readers(vec![ape, empty.clone(), id3]);

        let mut builder = TagBuilder::new();
        assert!(scanner.scan(Path::new("x.mp3"), &mut builder));
        assert_eq!(builder.get(TagType::Title), Some("Song"));
        assert_eq!(empty.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn nothing_found_is_false() {
        let scanner = FallbackScanner::with_readers(vec![FixedReader::new("a", &[])]);
        let mut builder = TagBuilder::new();
        assert!(!scanner.scan(Path::new("x.mp3"), &mut builder));
        assert!(builder.is_empty());
    }

    #[test]
    fn default_order_is_ape_then_id3() {
        assert_eq!(format!("{:?}", FallbackScanner::new()), r#"["ape", "id3"]"#);
    }

    #[test]
    fn unreadable_file_yields_nothing() {
        let mut builder = TagBuilder::new();
        assert!(!FallbackScanner::new().scan(Path::new("/nonexistent/file.mp3"), &mut builder));
        assert!(builder.is_empty());
    }
}
