/// Core error types for Songtag
use thiserror::Error;

/// Result type alias using `TagError`
pub type Result<T> = std::result::Result<T, TagError>;

/// Error type shared by every stage of tag resolution
#[derive(Error, Debug)]
pub enum TagError {
    /// No suffix/MIME type, or no decoder plugin registered for it
    #[error("Unsupported resource: {0}")]
    Unsupported(String),

    /// Filesystem resource is missing
    #[error("File not found: {0}")]
    NotFound(String),

    /// Filesystem resource exists but is not a plain file
    #[error("Not a regular file: {0}")]
    NotRegular(String),

    /// Input stream could not be opened or readied
    #[error("Failed to open {uri}: {reason}")]
    OpenFailed { uri: String, reason: String },

    /// Every decoder plugin and container reader missed
    #[error("No tags could be extracted from {0}")]
    ScanFailed(String),

    /// The resource could not even be classified (empty URI, scheme mismatch)
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TagError {
    /// Create an unsupported error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create a not found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a not-regular-file error
    pub fn not_regular(path: impl Into<String>) -> Self {
        Self::NotRegular(path.into())
    }

    /// Create an open failure for the given URI
    pub fn open_failed(uri: impl Into<String>, reason: impl ToString) -> Self {
        Self::OpenFailed {
            uri: uri.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a scan failure
    pub fn scan_failed(msg: impl Into<String>) -> Self {
        Self::ScanFailed(msg.into())
    }

    /// Create an invalid resource error
    pub fn invalid_resource(msg: impl Into<String>) -> Self {
        Self::InvalidResource(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
