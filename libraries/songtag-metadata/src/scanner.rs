/// Library scanner implementation
use crate::resolver::TagResolver;
use songtag_core::uri::uri_suffix;
use songtag_core::{DetachedSong, Directory, LocalStorage, Result, TagError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info};

/// Scan configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Resolve files on several worker threads (default: true)
    pub parallel: bool,

    /// Number of worker threads (default: num_cpus)
    pub num_threads: usize,

    /// Follow symbolic links while walking (default: false)
    pub follow_links: bool,

    /// Base path the reported song URIs are re-rooted under (default: none)
    pub uri_base: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            num_threads: num_cpus::get(),
            follow_links: false,
            uri_base: String::new(),
        }
    }
}

/// Scan progress updates
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// Scanning started
    Started { total_files: usize },

    /// File resolved
    FileScanned {
        path: PathBuf,
        success: bool,
        error: Option<String>,
    },

    /// Scanning completed
    Completed { stats: ScanStats },
}

/// Scan statistics
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Number of files with a supported suffix
    pub files_discovered: usize,

    /// Number of files handed to the resolver
    pub files_scanned: usize,

    /// Number of songs with a resolved tag
    pub songs_resolved: usize,

    /// Errors encountered
    pub errors: Vec<(PathBuf, String)>,
}

/// Songs found by a scan, in discovery order
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub songs: Vec<DetachedSong>,
    pub stats: ScanStats,
}

/// Walks a music directory and resolves the tag of every supported file
pub struct LibraryScanner {
    resolver: Arc<TagResolver>,
    storage: LocalStorage,
    config: ScanConfig,
}

impl LibraryScanner {
    /// Create a new library scanner
    pub fn new(resolver: Arc<TagResolver>, storage: LocalStorage) -> Self {
        Self::with_config(resolver, storage, ScanConfig::default())
    }

    /// Create a scanner with custom configuration
    pub fn with_config(resolver: Arc<TagResolver>, storage: LocalStorage, config: ScanConfig) -> Self {
        Self {
            resolver,
            storage,
            config,
        }
    }

    /// Scan a directory (or a single file) below the music directory
    ///
    /// # Arguments
    /// * `path` - Directory to scan
    /// * `progress_tx` - Optional channel for progress updates
    pub async fn scan(
        &self,
        path: &Path,
        progress_tx: Option<mpsc::Sender<ScanProgress>>,
    ) -> Result<ScanResult> {
        let mut result = ScanResult::default();

        let files = self.discover_files(path)?;
        result.stats.files_discovered = files.len();
        info!("Discovered {} files below {}", files.len(), path.display());

        if let Some(ref tx) = progress_tx {
            let _ = tx
                .send(ScanProgress::Started {
                    total_files: files.len(),
                })
                .await;
        }

        let workers = if self.config.parallel {
            self.config.num_threads.max(1)
        } else {
            1
        };
        let semaphore = Arc::new(Semaphore::new(workers));
        let mut parents: HashMap<String, Arc<Directory>> = HashMap::new();
        let mut handles = Vec::with_capacity(files.len());

        for file_path in files {
            let uri = self
                .storage
                .relative_uri(&file_path)
                .unwrap_or_else(|| file_path.to_string_lossy().into_owned());
            let parent_path = uri.rsplit_once('/').map_or("", |(dir, _)| dir).to_string();
            let parent = Arc::clone(
                parents
                    .entry(parent_path.clone())
                    .or_insert_with(|| Arc::new(Directory::new(parent_path))),
            );

            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| TagError::Io(std::io::Error::other(e)))?;
            let resolver = Arc::clone(&self.resolver);

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                resolver.load_song(&uri, Some(parent))
            });
            handles.push((file_path, handle));
        }

        for (file_path, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome.map_err(|e| e.to_string()),
                Err(e) => Err(format!("Resolver task failed: {}", e)),
            };
            result.stats.files_scanned += 1;

            let error = match outcome {
                Ok(song) => {
                    result.stats.songs_resolved += 1;
                    result.songs.push(song.prefixed(&self.config.uri_base));
                    None
                }
                Err(e) => {
                    debug!("Failed to resolve {}: {}", file_path.display(), e);
                    result.stats.errors.push((file_path.clone(), e.clone()));
                    Some(e)
                }
            };

            if let Some(ref tx) = progress_tx {
                let _ = tx
                    .send(ScanProgress::FileScanned {
                        path: file_path,
                        success: error.is_none(),
                        error,
                    })
                    .await;
            }
        }

        info!(
            "Resolved {} of {} files ({} errors)",
            result.stats.songs_resolved,
            result.stats.files_scanned,
            result.stats.errors.len()
        );

        if let Some(ref tx) = progress_tx {
            let _ = tx
                .send(ScanProgress::Completed {
                    stats: result.stats.clone(),
                })
                .await;
        }

        Ok(result)
    }

    /// Discover supported files in a directory recursively
    fn discover_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.exists() {
            return Err(TagError::not_found(path.display().to_string()));
        }

        let mut files = Vec::new();

        if path.is_file() {
            if self.is_supported_file(path) {
                files.push(path.to_path_buf());
            }
            return Ok(files);
        }

        for entry in walkdir::WalkDir::new(path)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if entry.file_type().is_file() && self.is_supported_file(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Check if a decoder plugin handles the file's suffix
    fn is_supported_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(uri_suffix)
            .is_some_and(|suffix| self.resolver.registry().supports_suffix(suffix))
    }
}
