//! File-backed input streams

use crate::error::{Result, TagError};
use crate::traits::{InputStream, InputStreamOpener};
use crate::uri::uri_has_scheme;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Input stream reading a local file
pub struct FileInputStream {
    reader: BufReader<File>,
    uri: String,
    mime_type: Option<String>,
}

impl FileInputStream {
    /// Open a local file; the MIME type is guessed from its extension
    pub fn open(path: &Path, uri: impl Into<String>) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let mime_type = mime_guess::from_path(path).first_raw().map(String::from);

        Ok(Self {
            reader: BufReader::new(file),
            uri: uri.into(),
            mime_type,
        })
    }
}

impl Read for FileInputStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Seek for FileInputStream {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.reader.seek(pos)
    }
}

impl InputStream for FileInputStream {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }
}

/// Opener for plain paths and `file://` URIs
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStreamOpener;

impl InputStreamOpener for LocalStreamOpener {
    fn open(&self, uri: &str) -> Result<Box<dyn InputStream>> {
        let path = match uri.strip_prefix("file://") {
            Some(path) => path,
            None if uri_has_scheme(uri) => {
                return Err(TagError::open_failed(uri, "unsupported URI scheme"));
            }
            None => uri,
        };

        let stream =
            FileInputStream::open(Path::new(path), uri).map_err(|e| TagError::open_failed(uri, e))?;
        Ok(Box::new(stream))
    }
}
