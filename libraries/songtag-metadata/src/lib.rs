//! Songtag Metadata
//!
//! Tag resolution for songs in a music library.
//!
//! This crate provides:
//! - The tag resolver: decoder plugins, then fallback container readers,
//!   then path-derived metadata, committed into one tag per song
//! - APE and ID3 fallback readers
//! - Path metadata for `.../Media/<artist>/<album>/<track> <title>.<ext>` layouts
//! - Library scanning with progress reporting
//!
//! # Example
//!
//! ```rust,no_run
//! use songtag_core::{LocalStorage, LocalStreamOpener};
//! use songtag_decoder::{DecoderRegistry, SymphoniaConfig};
//! use songtag_metadata::TagResolver;
//! use std::sync::Arc;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = TagResolver::new(
//!     Arc::new(DecoderRegistry::with_defaults(SymphoniaConfig::default())),
//!     Arc::new(LocalStorage::new("/music")),
//!     Arc::new(LocalStreamOpener),
//! );
//!
//! let song = resolver.load_song("Media/Low/Secret Name/01 Starfire.flac", None)?;
//! println!("{:?}", song.tag);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod config;
mod fallback;
pub mod path_pattern;
mod resolver;
mod scanner;

pub use config::{ArchiveScan, ResolverConfig};
pub use fallback::{ApeTagReader, ContainerTagReader, FallbackScanner, Id3TagReader, ReaderRef};
pub use path_pattern::{try_synthesize, PathMatch};
pub use resolver::{ResolvedTag, TagResolver};
pub use scanner::{LibraryScanner, ScanConfig, ScanProgress, ScanResult, ScanStats};
