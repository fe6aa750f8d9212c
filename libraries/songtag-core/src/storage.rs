//! Local filesystem storage

use crate::error::{Result, TagError};
use crate::traits::MusicStorage;
use crate::uri::uri_has_scheme;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// Status of a file behind a library URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub is_regular: bool,
    pub is_directory: bool,
    pub mtime: Option<SystemTime>,
    pub size: u64,
}

/// Storage rooted at a local music directory
///
/// Relative URIs are resolved below the root, absolute paths and `file://`
/// URIs are used as they are. URIs that climb out of the root with `..` have
/// no filesystem representation.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Library-relative URI of a path below the root, with `/` separators
    pub fn relative_uri(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Option<Vec<&str>> = relative
            .components()
            .map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();
        parts.map(|p| p.join("/"))
    }
}

impl MusicStorage for LocalStorage {
    fn map_to_filesystem(&self, uri: &str) -> Option<PathBuf> {
        if let Some(path) = uri.strip_prefix("file://") {
            return Some(PathBuf::from(path));
        }
        if uri_has_scheme(uri) {
            return None;
        }

        let path = Path::new(uri);
        if path.is_absolute() {
            return Some(path.to_path_buf());
        }
        if path.components().any(|c| c == Component::ParentDir) {
            return None;
        }

        Some(self.root.join(path))
    }

    fn file_info(&self, uri: &str) -> Result<FileInfo> {
        let path = self
            .map_to_filesystem(uri)
            .ok_or_else(|| TagError::invalid_resource(format!("{uri} has no local path")))?;

        let metadata = std::fs::metadata(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TagError::not_found(path.display().to_string()),
            _ => TagError::Io(e),
        })?;

        Ok(FileInfo {
            is_regular: metadata.is_file(),
            is_directory: metadata.is_dir(),
            mtime: metadata.modified().ok(),
            size: metadata.len(),
        })
    }
}
